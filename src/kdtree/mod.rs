//! A static, axis-alternating, median-split KD-tree over 2D points.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{GeoIndexError, Result};
use crate::geom::{Point, Rect};
use crate::scalar::Scalar;


/// The split axis at a KD node. Alternates with depth; the root is `X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn flip(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    fn of<S: Scalar>(self, p: Point<S>) -> S {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }
}

#[derive(Debug, Clone)]
struct KdNode<S: Scalar> {
    /// Position of this node's point in the original input sequence.
    index: usize,
    point: Point<S>,
    axis: Axis,
    left: Option<usize>,
    right: Option<usize>,
}

/// A static KD-tree over a fixed set of 2D points.
#[derive(Debug, Clone)]
pub struct KdTree<S: Scalar> {
    points: Vec<Point<S>>,
    nodes: Vec<KdNode<S>>,
    root: usize,
}

impl<S: Scalar> KdTree<S> {
    /// Build a tree over `points`. Errors if `points` is empty (§7).
    pub fn new(points: Vec<Point<S>>) -> Result<Self> {
        if points.is_empty() {
            return Err(GeoIndexError::EmptyInput);
        }
        tracing::debug!(count = points.len(), "building KD-tree");
        let mut nodes = Vec::with_capacity(points.len());
        let mut order: Vec<usize> = (0..points.len()).collect();
        let root = build(&mut order, Axis::X, &points, &mut nodes)
            .expect("non-empty input always yields a root");
        tracing::trace!(nodes = nodes.len(), "KD-tree built");
        Ok(Self {
            points,
            nodes,
            root,
        })
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The original input points, in insertion order.
    pub fn points(&self) -> &[Point<S>] {
        &self.points
    }

    /// Tree height: `floor(log2 N)` by construction (§8, invariant 2).
    pub fn height(&self) -> usize {
        height_of(&self.nodes, self.root)
    }

    // ---- box containment ----

    fn find_box_indices_impl(&self, query: &Rect<S>, out: &mut Vec<usize>) {
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if query.contains_point(node.point) {
                out.push(node.index);
            }
            let proj = node.axis.of(node.point);
            let (qmin, qmax) = match node.axis {
                Axis::X => (query.min_x, query.max_x),
                Axis::Y => (query.min_y, query.max_y),
            };
            if let Some(l) = node.left {
                if qmin <= proj {
                    stack.push(l);
                }
            }
            if let Some(r) = node.right {
                if proj <= qmax {
                    stack.push(r);
                }
            }
        }
    }

    pub fn find_box_indices(&self, query: &Rect<S>) -> Vec<usize> {
        let mut out = Vec::new();
        self.find_box_indices_impl(query, &mut out);
        out
    }

    pub fn find_box_primitives(&self, query: &Rect<S>) -> Vec<Point<S>> {
        self.find_box_indices(query)
            .into_iter()
            .map(|i| self.points[i])
            .collect()
    }

    pub fn find_box_items(&self, query: &Rect<S>) -> Vec<(usize, Point<S>)> {
        self.find_box_indices(query)
            .into_iter()
            .map(|i| (i, self.points[i]))
            .collect()
    }

    // ---- closed ball ----

    fn find_ball_indices_impl(&self, center: Point<S>, radius: S, out: &mut Vec<usize>) {
        let radius_sq = radius * radius;
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if squared_distance(node.point, center) <= radius_sq {
                out.push(node.index);
            }
            let proj = node.axis.of(node.point);
            let c = node.axis.of(center);
            let delta = c - proj;
            if let Some(l) = node.left {
                if delta <= radius {
                    stack.push(l);
                }
            }
            if let Some(r) = node.right {
                if -radius <= delta {
                    stack.push(r);
                }
            }
        }
    }

    pub fn find_ball_indices(&self, center: Point<S>, radius: S) -> Vec<usize> {
        let mut out = Vec::new();
        self.find_ball_indices_impl(center, radius, &mut out);
        out
    }

    pub fn find_ball_primitives(&self, center: Point<S>, radius: S) -> Vec<Point<S>> {
        self.find_ball_indices(center, radius)
            .into_iter()
            .map(|i| self.points[i])
            .collect()
    }

    pub fn find_ball_items(&self, center: Point<S>, radius: S) -> Vec<(usize, Point<S>)> {
        self.find_ball_indices(center, radius)
            .into_iter()
            .map(|i| (i, self.points[i]))
            .collect()
    }

    // ---- k-nearest-neighbor ----

    fn knn_search(&self, idx: usize, probe: Point<S>, n: usize, heap: &mut BinaryHeap<MaxHeapEntry<S>>) {
        let node = &self.nodes[idx];
        let proj = node.axis.of(node.point);
        let c = node.axis.of(probe);
        let delta = c - proj;
        let (near, far) = if delta < S::zero() {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };
        if let Some(near_idx) = near {
            self.knn_search(near_idx, probe, n, heap);
        }
        if let Some(far_idx) = far {
            let worst = heap.peek().map(|e| e.dist_sq);
            if heap.len() < n || delta * delta < worst.unwrap() {
                self.knn_search(far_idx, probe, n, heap);
            }
        }
        let d = squared_distance(node.point, probe);
        if heap.len() < n {
            heap.push(MaxHeapEntry {
                dist_sq: d,
                index: node.index,
            });
        } else if d < heap.peek().unwrap().dist_sq {
            heap.pop();
            heap.push(MaxHeapEntry {
                dist_sq: d,
                index: node.index,
            });
        }
    }

    fn n_nearest_sorted(&self, n: usize, probe: Point<S>) -> Result<Vec<(S, usize)>> {
        if n == 0 {
            return Err(GeoIndexError::InvalidK);
        }
        let mut heap = BinaryHeap::with_capacity(n.min(self.len()));
        self.knn_search(self.root, probe, n, &mut heap);
        let mut out: Vec<(S, usize)> = heap.into_iter().map(|e| (e.dist_sq, e.index)).collect();
        out.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap().then(a.1.cmp(&b.1)));
        Ok(out)
    }

    /// Exactly `min(n, len())` indices, the closest to `probe`, ascending by
    /// distance.
    pub fn n_nearest_indices(&self, n: usize, probe: Point<S>) -> Result<Vec<usize>> {
        Ok(self
            .n_nearest_sorted(n, probe)?
            .into_iter()
            .map(|(_, i)| i)
            .collect())
    }

    pub fn n_nearest_primitives(&self, n: usize, probe: Point<S>) -> Result<Vec<Point<S>>> {
        Ok(self
            .n_nearest_sorted(n, probe)?
            .into_iter()
            .map(|(_, i)| self.points[i])
            .collect())
    }

    pub fn n_nearest_items(&self, n: usize, probe: Point<S>) -> Result<Vec<(usize, Point<S>)>> {
        Ok(self
            .n_nearest_sorted(n, probe)?
            .into_iter()
            .map(|(_, i)| (i, self.points[i]))
            .collect())
    }

    pub fn nearest_index(&self, probe: Point<S>) -> Result<usize> {
        Ok(self.n_nearest_indices(1, probe)?[0])
    }

    pub fn nearest_primitive(&self, probe: Point<S>) -> Result<Point<S>> {
        Ok(self.n_nearest_primitives(1, probe)?[0])
    }

    pub fn nearest_item(&self, probe: Point<S>) -> Result<(usize, Point<S>)> {
        Ok(self.n_nearest_items(1, probe)?[0])
    }
}

fn squared_distance<S: Scalar>(a: Point<S>, b: Point<S>) -> S {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

fn height_of<S: Scalar>(nodes: &[KdNode<S>], idx: usize) -> usize {
    let node = &nodes[idx];
    let l = node.left.map_or(0, |i| 1 + height_of(nodes, i));
    let r = node.right.map_or(0, |i| 1 + height_of(nodes, i));
    l.max(r)
}

/// Recursively builds the arena: sorts the index range by the active axis,
/// splits at the lower median, and recurses on each half with the opposite
/// axis. Children are built (and pushed into the arena) before their
/// parent, so the root ends up last.
fn build<S: Scalar>(
    indices: &mut [usize],
    axis: Axis,
    points: &[Point<S>],
    nodes: &mut Vec<KdNode<S>>,
) -> Option<usize> {
    if indices.is_empty() {
        return None;
    }
    indices.sort_by(|&a, &b| {
        axis.of(points[a])
            .partial_cmp(&axis.of(points[b]))
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    let m = (indices.len() - 1) / 2;
    let pivot = indices[m];
    let next = axis.flip();
    let left = build(&mut indices[..m], next, points, nodes);
    let right = build(&mut indices[m + 1..], next, points, nodes);
    let idx = nodes.len();
    nodes.push(KdNode {
        index: pivot,
        point: points[pivot],
        axis,
        left,
        right,
    });
    Some(idx)
}

#[derive(Debug, Clone, Copy)]
struct MaxHeapEntry<S: Scalar> {
    dist_sq: S,
    index: usize,
}

impl<S: Scalar> PartialEq for MaxHeapEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.dist_sq == other.dist_sq
    }
}

impl<S: Scalar> Eq for MaxHeapEntry<S> {}

impl<S: Scalar> PartialOrd for MaxHeapEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Scalar> Ord for MaxHeapEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist_sq
            .partial_cmp(&other.dist_sq)
            .expect("NaN scalar is out of contract")
    }
}
