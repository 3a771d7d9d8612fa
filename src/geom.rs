//! Geometry primitives, predicates, and distance metrics.
//!
//! Every function here is total and allocation-free. Distances are squared
//! throughout; nothing in this module ever takes a square root.

use crate::scalar::Scalar;

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<S: Scalar> {
    pub x: S,
    pub y: S,
}

impl<S: Scalar> Point<S> {
    pub fn new(x: S, y: S) -> Self {
        Self { x, y }
    }

    fn sub(self, other: Self) -> (S, S) {
        (self.x - other.x, self.y - other.y)
    }
}

/// An axis-aligned rectangle, `min_x <= max_x` and `min_y <= max_y`.
///
/// Degenerate rectangles (zero width and/or height) are legal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<S: Scalar> {
    pub min_x: S,
    pub min_y: S,
    pub max_x: S,
    pub max_y: S,
}

impl<S: Scalar> Rect<S> {
    pub fn new(min_x: S, min_y: S, max_x: S, max_y: S) -> Self {
        debug_assert!(min_x <= max_x && min_y <= max_y);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The rect that exactly bounds a single point.
    pub fn from_point(p: Point<S>) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    /// The rect bounding a segment's two endpoints.
    pub fn from_segment(s: &Segment<S>) -> Self {
        let min_x = s.start.x.min(s.end.x);
        let max_x = s.start.x.max(s.end.x);
        let min_y = s.start.y.min(s.end.y);
        let max_y = s.start.y.max(s.end.y);
        Self::new(min_x, min_y, max_x, max_y)
    }

    pub fn is_degenerate_x(&self) -> bool {
        self.min_x == self.max_x
    }

    pub fn is_degenerate_y(&self) -> bool {
        self.min_y == self.max_y
    }

    /// Componentwise min of mins, max of maxes.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Closed containment: `min <= p <= max` on both axes.
    pub fn contains_point(&self, p: Point<S>) -> bool {
        self.min_x <= p.x && p.x <= self.max_x && self.min_y <= p.y && p.y <= self.max_y
    }

    /// Strict overlap: rects sharing only an edge do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        other.min_x < self.max_x
            && self.min_x < other.max_x
            && other.min_y < self.max_y
            && self.min_y < other.max_y
    }

    /// Closed subset test: every point of `self` lies in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        other.min_x <= self.min_x
            && self.max_x <= other.max_x
            && other.min_y <= self.min_y
            && self.max_y <= other.max_y
    }

    fn axis_gap(min: S, max: S, c: S) -> S {
        let zero = S::zero();
        (min - c).max(c - max).max(zero)
    }

    /// Squared distance from the rect to a point; zero if the point is inside.
    pub fn squared_distance_to_point(&self, p: Point<S>) -> S {
        let dx = Self::axis_gap(self.min_x, self.max_x, p.x);
        let dy = Self::axis_gap(self.min_y, self.max_y, p.y);
        dx * dx + dy * dy
    }

    fn as_sides(&self) -> [Segment<S>; 4] {
        let tl = Point::new(self.min_x, self.max_y);
        let tr = Point::new(self.max_x, self.max_y);
        let bl = Point::new(self.min_x, self.min_y);
        let br = Point::new(self.max_x, self.min_y);
        [
            Segment::new(bl, tl), // left
            Segment::new(br, tr), // right
            Segment::new(bl, br), // bottom
            Segment::new(tl, tr), // top
        ]
    }

    /// Squared distance from the rect to a segment.
    ///
    /// Zero if either endpoint lies inside the rect. A degenerate rect
    /// collapses to its single side (or a point) and the distance reduces
    /// to a segment-to-segment (or segment-to-point) distance.
    pub fn squared_distance_to_segment(&self, seg: &Segment<S>) -> S {
        if self.contains_point(seg.start) || self.contains_point(seg.end) {
            return S::zero();
        }
        if self.is_degenerate_x() && self.is_degenerate_y() {
            return seg.squared_distance_to_point(Point::new(self.min_x, self.min_y));
        }
        if self.is_degenerate_x() {
            let side = Segment::new(
                Point::new(self.min_x, self.min_y),
                Point::new(self.min_x, self.max_y),
            );
            return side.squared_distance_to_segment(seg);
        }
        if self.is_degenerate_y() {
            let side = Segment::new(
                Point::new(self.min_x, self.min_y),
                Point::new(self.max_x, self.min_y),
            );
            return side.squared_distance_to_segment(seg);
        }
        let mut best: Option<S> = None;
        for side in self.as_sides() {
            let d = side.squared_distance_to_segment(seg);
            if d == S::zero() {
                return S::zero();
            }
            best = Some(best.map_or(d, |b| b.min(d)));
        }
        best.unwrap_or(S::zero())
    }
}

/// An ordered pair of distinct points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<S: Scalar> {
    pub start: Point<S>,
    pub end: Point<S>,
}

fn dot<S: Scalar>(a: (S, S), b: (S, S)) -> S {
    a.0 * b.0 + a.1 * b.1
}

fn cross<S: Scalar>(a: (S, S), b: (S, S)) -> S {
    a.0 * b.1 - a.1 * b.0
}

impl<S: Scalar> Segment<S> {
    pub fn new(start: Point<S>, end: Point<S>) -> Self {
        Self { start, end }
    }

    /// Squared distance from the segment to a point: the point is projected
    /// onto the segment's supporting line, clamped to `[0, 1]`, and the
    /// squared distance is taken to that clamped foot.
    pub fn squared_distance_to_point(&self, p: Point<S>) -> S {
        let dir = self.end.sub(self.start);
        let to_point = p.sub(self.start);
        let len_sq = dot(dir, dir);
        let factor = if len_sq == S::zero() {
            S::zero()
        } else {
            (dot(to_point, dir) / len_sq)
                .max(S::zero())
                .min(S::one())
        };
        let foot_x = self.start.x + dir.0 * factor;
        let foot_y = self.start.y + dir.1 * factor;
        let dx = p.x - foot_x;
        let dy = p.y - foot_y;
        dx * dx + dy * dy
    }

    /// Squared distance between two segments: zero if they touch or cross;
    /// otherwise the minimum of the four endpoint-to-other-segment
    /// distances.
    pub fn squared_distance_to_segment(&self, other: &Self) -> S {
        if segments_intersect(self, other) {
            return S::zero();
        }
        let a = self.squared_distance_to_point(other.start);
        let b = self.squared_distance_to_point(other.end);
        let c = other.squared_distance_to_point(self.start);
        let d = other.squared_distance_to_point(self.end);
        a.min(b).min(c).min(d)
    }
}

fn orientation<S: Scalar>(a: Point<S>, b: Point<S>, c: Point<S>) -> S {
    cross(b.sub(a), c.sub(a))
}

fn on_segment<S: Scalar>(p: Point<S>, q: Point<S>, r: Point<S>) -> bool {
    // Precondition: p, q, r are collinear. Is r within the bounding box of p,q?
    r.x <= p.x.max(q.x) && r.x >= p.x.min(q.x) && r.y <= p.y.max(q.y) && r.y >= p.y.min(q.y)
}

/// Whether two segments touch or cross (the `NONE`-relationship oracle of
/// `geom::Segment` distances: `true` here is "not NONE").
pub fn segments_intersect<S: Scalar>(a: &Segment<S>, b: &Segment<S>) -> bool {
    fn sign<S: Scalar>(v: S) -> i8 {
        if v > S::zero() {
            1
        } else if v < S::zero() {
            -1
        } else {
            0
        }
    }

    let zero = S::zero();
    let o1 = orientation(a.start, a.end, b.start);
    let o2 = orientation(a.start, a.end, b.end);
    let o3 = orientation(b.start, b.end, a.start);
    let o4 = orientation(b.start, b.end, a.end);

    let (s1, s2, s3, s4) = (sign(o1), sign(o2), sign(o3), sign(o4));
    if s1 != s2 && s3 != s4 && s1 != 0 && s2 != 0 && s3 != 0 && s4 != 0 {
        return true;
    }

    if o1 == zero && on_segment(a.start, a.end, b.start) {
        return true;
    }
    if o2 == zero && on_segment(a.start, a.end, b.end) {
        return true;
    }
    if o3 == zero && on_segment(b.start, b.end, a.start) {
        return true;
    }
    if o4 == zero && on_segment(b.start, b.end, a.end) {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point<f64> {
        Point::new(x, y)
    }

    #[test]
    fn rect_contains_is_closed() {
        let r = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert!(r.contains_point(p(0.0, 0.0)));
        assert!(r.contains_point(p(2.0, 2.0)));
        assert!(!r.contains_point(p(2.1, 0.0)));
    }

    #[test]
    fn rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(1.0, 0.0, 2.0, 1.0);
        assert!(!a.overlaps(&b), "sharing only an edge must not overlap");
        let c = Rect::new(0.5, 0.0, 2.0, 1.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn rect_subset_is_closed() {
        let inner = Rect::new(0.0, 0.0, 1.0, 1.0);
        let outer = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert!(inner.is_subset_of(&outer));
        assert!(outer.is_subset_of(&outer));
    }

    #[test]
    fn rect_point_distance_zero_when_inside() {
        let r = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert_eq!(r.squared_distance_to_point(p(1.0, 1.0)), 0.0);
        assert_eq!(r.squared_distance_to_point(p(4.0, 0.0)), 4.0);
        assert_eq!(r.squared_distance_to_point(p(4.0, 5.0)), 4.0 + 9.0);
    }

    #[test]
    fn segment_point_distance_clamps_to_endpoints() {
        let s = Segment::new(p(0.0, 0.0), p(10.0, 0.0));
        assert_eq!(s.squared_distance_to_point(p(-1.0, 0.0)), 1.0);
        assert_eq!(s.squared_distance_to_point(p(11.0, 0.0)), 1.0);
        assert_eq!(s.squared_distance_to_point(p(5.0, 3.0)), 9.0);
    }

    #[test]
    fn segments_crossing_intersect() {
        let a = Segment::new(p(0.0, 0.0), p(2.0, 2.0));
        let b = Segment::new(p(0.0, 2.0), p(2.0, 0.0));
        assert!(segments_intersect(&a, &b));
        assert_eq!(a.squared_distance_to_segment(&b), 0.0);
    }

    #[test]
    fn segments_parallel_disjoint_take_endpoint_min() {
        let a = Segment::new(p(0.0, 0.0), p(10.0, 0.0));
        let b = Segment::new(p(0.0, 3.0), p(10.0, 3.0));
        assert_eq!(a.squared_distance_to_segment(&b), 9.0);
    }

    #[test]
    fn box_segment_distance_degenerate_box_is_a_point() {
        let r = Rect::new(5.0, 5.0, 5.0, 5.0);
        let s = Segment::new(p(0.0, 5.0), p(3.0, 5.0));
        assert_eq!(r.squared_distance_to_segment(&s), 4.0);
    }
}
