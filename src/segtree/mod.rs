//! A packed Hilbert R-tree over line segments, whose leaf distance metric
//! is segment-to-point or segment-to-segment rather than box-to-{point,
//! segment} (§4.4, §4.5).

#[cfg(test)]
mod tests;

use crate::error::{GeoIndexError, Result};
use crate::geom::{Point, Rect, Segment};
use crate::rtree::knn::best_first_knn;
use crate::rtree::node::{pack, Arena, DEFAULT_MAX_CHILDREN};
use crate::scalar::Scalar;

/// A static R-tree over a fixed set of line segments.
#[derive(Debug, Clone)]
pub struct SegTree<S: Scalar> {
    segments: Vec<Segment<S>>,
    arena: Arena<S>,
}

impl<S: Scalar> SegTree<S> {
    /// Build a tree over `segments` with the default `max_children` (16).
    pub fn new(segments: Vec<Segment<S>>) -> Result<Self> {
        Self::new_with_max_children(segments, DEFAULT_MAX_CHILDREN)
    }

    /// Build a tree over `segments` with an explicit `max_children` (`>= 2`).
    pub fn new_with_max_children(segments: Vec<Segment<S>>, max_children: usize) -> Result<Self> {
        let boxes: Vec<Rect<S>> = segments.iter().map(Rect::from_segment).collect();
        let arena = pack(&boxes, max_children)?;
        Ok(Self { segments, arena })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn max_children(&self) -> usize {
        self.arena.max_children
    }

    pub fn height(&self) -> usize {
        self.arena.height()
    }

    /// The original input segments, in insertion order.
    pub fn segments(&self) -> &[Segment<S>] {
        &self.segments
    }

    // ---- k-NN to a segment probe ----

    pub fn n_nearest_indices(&self, n: usize, probe: &Segment<S>) -> Result<Vec<usize>> {
        if n == 0 {
            return Err(GeoIndexError::InvalidK);
        }
        if n >= self.len() {
            return Ok((0..self.len()).collect());
        }
        Ok(best_first_knn(
            &self.arena,
            n,
            probe,
            |bbox: &Rect<S>, p: &Segment<S>| bbox.squared_distance_to_segment(p),
            |index, p: &Segment<S>| self.segments[index].squared_distance_to_segment(p),
        ))
    }

    pub fn n_nearest_primitives(&self, n: usize, probe: &Segment<S>) -> Result<Vec<Segment<S>>> {
        Ok(self
            .n_nearest_indices(n, probe)?
            .into_iter()
            .map(|i| self.segments[i])
            .collect())
    }

    pub fn n_nearest_items(
        &self,
        n: usize,
        probe: &Segment<S>,
    ) -> Result<Vec<(usize, Segment<S>)>> {
        Ok(self
            .n_nearest_indices(n, probe)?
            .into_iter()
            .map(|i| (i, self.segments[i]))
            .collect())
    }

    pub fn nearest_index(&self, probe: &Segment<S>) -> Result<usize> {
        Ok(self.n_nearest_indices(1, probe)?[0])
    }

    pub fn nearest_primitive(&self, probe: &Segment<S>) -> Result<Segment<S>> {
        Ok(self.n_nearest_primitives(1, probe)?[0])
    }

    pub fn nearest_item(&self, probe: &Segment<S>) -> Result<(usize, Segment<S>)> {
        Ok(self.n_nearest_items(1, probe)?[0])
    }

    // ---- k-NN to a point probe ----

    pub fn n_nearest_to_point_indices(&self, n: usize, probe: Point<S>) -> Result<Vec<usize>> {
        if n == 0 {
            return Err(GeoIndexError::InvalidK);
        }
        if n >= self.len() {
            return Ok((0..self.len()).collect());
        }
        Ok(best_first_knn(
            &self.arena,
            n,
            &probe,
            |bbox: &Rect<S>, p: &Point<S>| bbox.squared_distance_to_point(*p),
            |index, p: &Point<S>| self.segments[index].squared_distance_to_point(*p),
        ))
    }

    pub fn n_nearest_to_point_primitives(
        &self,
        n: usize,
        probe: Point<S>,
    ) -> Result<Vec<Segment<S>>> {
        Ok(self
            .n_nearest_to_point_indices(n, probe)?
            .into_iter()
            .map(|i| self.segments[i])
            .collect())
    }

    pub fn n_nearest_to_point_items(
        &self,
        n: usize,
        probe: Point<S>,
    ) -> Result<Vec<(usize, Segment<S>)>> {
        Ok(self
            .n_nearest_to_point_indices(n, probe)?
            .into_iter()
            .map(|i| (i, self.segments[i]))
            .collect())
    }

    pub fn nearest_to_point_index(&self, probe: Point<S>) -> Result<usize> {
        Ok(self.n_nearest_to_point_indices(1, probe)?[0])
    }

    pub fn nearest_to_point_primitive(&self, probe: Point<S>) -> Result<Segment<S>> {
        Ok(self.n_nearest_to_point_primitives(1, probe)?[0])
    }

    pub fn nearest_to_point_item(&self, probe: Point<S>) -> Result<(usize, Segment<S>)> {
        Ok(self.n_nearest_to_point_items(1, probe)?[0])
    }
}
