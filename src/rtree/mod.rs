//! A packed Hilbert R-tree over axis-aligned boxes.

pub mod knn;
pub mod node;


use crate::error::{GeoIndexError, Result};
use crate::geom::{Point, Rect};
use crate::scalar::Scalar;

pub use node::DEFAULT_MAX_CHILDREN;
use node::{pack, Arena};

/// A static R-tree over a fixed set of boxes, packed bottom-up along a
/// Hilbert curve (§4.4).
#[derive(Debug, Clone)]
pub struct RTree<S: Scalar> {
    boxes: Vec<Rect<S>>,
    arena: Arena<S>,
}

fn disjoint<S: Scalar>(a: &Rect<S>, b: &Rect<S>) -> bool {
    a.max_x < b.min_x || a.min_x > b.max_x || a.max_y < b.min_y || a.min_y > b.max_y
}

impl<S: Scalar> RTree<S> {
    /// Build a tree over `boxes` with the default `max_children` (16).
    pub fn new(boxes: Vec<Rect<S>>) -> Result<Self> {
        Self::new_with_max_children(boxes, DEFAULT_MAX_CHILDREN)
    }

    /// Build a tree over `boxes` with an explicit `max_children` (`>= 2`).
    pub fn new_with_max_children(boxes: Vec<Rect<S>>, max_children: usize) -> Result<Self> {
        let arena = pack(&boxes, max_children)?;
        Ok(Self { boxes, arena })
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn max_children(&self) -> usize {
        self.arena.max_children
    }

    /// Tree height; at least `ceil(log_max_children(N))` (§8, invariant 4).
    pub fn height(&self) -> usize {
        self.arena.height()
    }

    /// The original input boxes, in insertion order.
    pub fn boxes(&self) -> &[Rect<S>] {
        &self.boxes
    }

    // ---- find-subsets: items contained in the probe box ----

    fn find_subsets_indices_impl(&self, probe: &Rect<S>, out: &mut Vec<usize>) {
        if self.boxes.is_empty() {
            return;
        }
        let mut stack = vec![self.arena.root];
        while let Some(slot) = stack.pop() {
            let node = &self.arena.nodes[slot];
            if node.is_leaf() {
                if node.bbox.is_subset_of(probe) {
                    out.push(node.index);
                }
                continue;
            }
            if disjoint(&node.bbox, probe) {
                continue;
            }
            stack.extend(node.children.clone());
        }
    }

    pub fn find_subsets_indices(&self, probe: &Rect<S>) -> Vec<usize> {
        let mut out = Vec::new();
        self.find_subsets_indices_impl(probe, &mut out);
        out
    }

    pub fn find_subsets_primitives(&self, probe: &Rect<S>) -> Vec<Rect<S>> {
        self.find_subsets_indices(probe)
            .into_iter()
            .map(|i| self.boxes[i])
            .collect()
    }

    pub fn find_subsets_items(&self, probe: &Rect<S>) -> Vec<(usize, Rect<S>)> {
        self.find_subsets_indices(probe)
            .into_iter()
            .map(|i| (i, self.boxes[i]))
            .collect()
    }

    // ---- find-supersets: items containing the probe box ----

    fn find_supersets_indices_impl(&self, probe: &Rect<S>, out: &mut Vec<usize>) {
        if self.boxes.is_empty() {
            return;
        }
        let mut stack = vec![self.arena.root];
        while let Some(slot) = stack.pop() {
            let node = &self.arena.nodes[slot];
            if node.is_leaf() {
                if probe.is_subset_of(&node.bbox) {
                    out.push(node.index);
                }
                continue;
            }
            if !probe.is_subset_of(&node.bbox) {
                continue;
            }
            stack.extend(node.children.clone());
        }
    }

    pub fn find_supersets_indices(&self, probe: &Rect<S>) -> Vec<usize> {
        let mut out = Vec::new();
        self.find_supersets_indices_impl(probe, &mut out);
        out
    }

    pub fn find_supersets_primitives(&self, probe: &Rect<S>) -> Vec<Rect<S>> {
        self.find_supersets_indices(probe)
            .into_iter()
            .map(|i| self.boxes[i])
            .collect()
    }

    pub fn find_supersets_items(&self, probe: &Rect<S>) -> Vec<(usize, Rect<S>)> {
        self.find_supersets_indices(probe)
            .into_iter()
            .map(|i| (i, self.boxes[i]))
            .collect()
    }

    // ---- k-NN to a point ----

    pub fn n_nearest_indices(&self, n: usize, probe: Point<S>) -> Result<Vec<usize>> {
        if n == 0 {
            return Err(GeoIndexError::InvalidK);
        }
        if n >= self.len() {
            // §4.5 shortcut: the whole input, in its original order.
            return Ok((0..self.len()).collect());
        }
        Ok(knn::best_first_knn(
            &self.arena,
            n,
            &probe,
            |bbox: &Rect<S>, p: &Point<S>| bbox.squared_distance_to_point(*p),
            |index, p: &Point<S>| self.boxes[index].squared_distance_to_point(*p),
        ))
    }

    pub fn n_nearest_primitives(&self, n: usize, probe: Point<S>) -> Result<Vec<Rect<S>>> {
        Ok(self
            .n_nearest_indices(n, probe)?
            .into_iter()
            .map(|i| self.boxes[i])
            .collect())
    }

    pub fn n_nearest_items(&self, n: usize, probe: Point<S>) -> Result<Vec<(usize, Rect<S>)>> {
        Ok(self
            .n_nearest_indices(n, probe)?
            .into_iter()
            .map(|i| (i, self.boxes[i]))
            .collect())
    }
}
