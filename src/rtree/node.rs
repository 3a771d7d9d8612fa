//! The arena node type and bulk-packing builder shared by the plain
//! (box) R-tree and the segmental (line-segment) R-tree.

use std::ops::Range;

use num_traits::{NumCast, ToPrimitive};

use crate::error::{GeoIndexError, Result};
use crate::geom::Rect;
use crate::hilbert::{hilbert, HILBERT_MAX};
use crate::scalar::Scalar;

/// Default `max_children` for both R-tree flavors (§6).
pub const DEFAULT_MAX_CHILDREN: usize = 16;

/// A node in the packed Hilbert R-tree arena.
///
/// `children` is a contiguous range of arena slots; an empty range marks a
/// leaf. `index` is the dense numbering of §3: for a leaf it equals the
/// item's original input position; for an internal node it is assigned
/// during packing and continues upward from the leaf range, so the root
/// holds the largest index in the tree.
#[derive(Debug, Clone)]
pub struct RNode<S: Scalar> {
    pub bbox: Rect<S>,
    pub index: usize,
    pub children: Range<usize>,
}

impl<S: Scalar> RNode<S> {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The packed arena produced by [`pack`].
#[derive(Debug, Clone)]
pub struct Arena<S: Scalar> {
    pub nodes: Vec<RNode<S>>,
    pub root: usize,
    pub max_children: usize,
}

impl<S: Scalar> Arena<S> {
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    fn height_of(&self, slot: usize) -> usize {
        let node = &self.nodes[slot];
        if node.is_leaf() {
            return 0;
        }
        1 + node
            .children
            .clone()
            .map(|c| self.height_of(c))
            .max()
            .unwrap_or(0)
    }
}

/// Bulk-loads `boxes` into a packed Hilbert R-tree arena (§4.4).
///
/// `boxes[i]` is the bounding box of the item at original input position
/// `i`; the segmental tree calls this with each segment's endpoint-derived
/// box and recovers the segment itself via `index`.
pub fn pack<S: Scalar>(boxes: &[Rect<S>], max_children: usize) -> Result<Arena<S>> {
    if max_children < 2 {
        return Err(GeoIndexError::InvalidMaxChildren { got: max_children });
    }
    let n = boxes.len();
    tracing::debug!(count = n, max_children, "packing R-tree");

    let mut nodes: Vec<RNode<S>> = Vec::with_capacity(n * 2);

    if n == 0 {
        // A sentinel leaf so `Arena::height()` and friends stay total over an
        // empty input. It holds no real item: `index` is out-of-band and
        // callers must never walk into it, so `RTree`/`SegTree` skip the
        // traversal entirely for an empty tree rather than touch `root`.
        let zero = S::zero();
        nodes.push(RNode {
            bbox: Rect::new(zero, zero, zero, zero),
            index: usize::MAX,
            children: 0..0,
        });
        return Ok(Arena {
            nodes,
            root: 0,
            max_children,
        });
    }

    let mut outer = boxes[0];
    for b in &boxes[1..] {
        outer = outer.merge(b);
    }

    if n <= max_children {
        for (i, b) in boxes.iter().enumerate() {
            nodes.push(RNode {
                bbox: *b,
                index: i,
                children: 0..0,
            });
        }
        let root = nodes.len();
        nodes.push(RNode {
            bbox: outer,
            index: root,
            children: 0..n,
        });
        tracing::trace!(root, "R-tree packed as a single level");
        return Ok(Arena {
            nodes,
            root,
            max_children,
        });
    }

    let order = hilbert_order(boxes, &outer);
    for orig in order {
        nodes.push(RNode {
            bbox: boxes[orig],
            index: orig,
            children: 0..0,
        });
    }

    let mut level_start = 0usize;
    let mut level_len = n;
    while level_len > 1 {
        let groups = (level_len + max_children - 1) / max_children;
        let pass_start = nodes.len();
        for g in 0..groups {
            let lo = level_start + g * max_children;
            let hi = (lo + max_children).min(level_start + level_len);
            let mut bbox = nodes[lo].bbox;
            for child in &nodes[lo + 1..hi] {
                bbox = bbox.merge(&child.bbox);
            }
            let index = nodes.len();
            nodes.push(RNode {
                bbox,
                index,
                children: lo..hi,
            });
        }
        level_start = pass_start;
        level_len = groups;
    }

    let root = nodes.len() - 1;
    tracing::trace!(root, height = "multi-level", "R-tree packed");
    Ok(Arena {
        nodes,
        root,
        max_children,
    })
}

/// Orders item positions `0..boxes.len()` ascending by the Hilbert key of
/// their box center, mapped onto `outer`. A degenerate `outer` (zero width
/// and/or height) maps the affected axis's key to 0 (§9, open question).
fn hilbert_order<S: Scalar>(boxes: &[Rect<S>], outer: &Rect<S>) -> Vec<usize> {
    let two = S::one() + S::one();
    let width = outer.max_x - outer.min_x;
    let height = outer.max_y - outer.min_y;
    let hmax: S = NumCast::from(HILBERT_MAX).expect("HILBERT_MAX fits in Scalar");

    let keys: Vec<u32> = boxes
        .iter()
        .map(|b| {
            let u = if width == S::zero() {
                0
            } else {
                let num = hmax * (b.min_x + b.max_x - two * outer.min_x);
                let den = two * width;
                (num / den).floor().to_u32().unwrap_or(0).min(HILBERT_MAX)
            };
            let v = if height == S::zero() {
                0
            } else {
                let num = hmax * (b.min_y + b.max_y - two * outer.min_y);
                let den = two * height;
                (num / den).floor().to_u32().unwrap_or(0).min(HILBERT_MAX)
            };
            hilbert(u, v)
        })
        .collect();

    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]).then(a.cmp(&b)));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rect<f64> {
        Rect::new(min_x, min_y, max_x, max_y)
    }

    #[test]
    fn single_level_when_within_max_children() {
        let boxes = vec![b(0.0, 0.0, 1.0, 1.0), b(2.0, 2.0, 3.0, 3.0)];
        let arena = pack(&boxes, 4).unwrap();
        assert!(arena.nodes[arena.root].children.len() == 2);
        assert_eq!(arena.nodes[arena.root].bbox, b(0.0, 0.0, 3.0, 3.0));
    }

    #[test]
    fn internal_box_equals_merge_of_children() {
        let boxes: Vec<_> = (0..40)
            .map(|i| {
                let x = (i * 7 % 23) as f64;
                let y = (i * 11 % 19) as f64;
                Rect::new(x, y, x + 1.0, y + 1.0)
            })
            .collect();
        let arena = pack(&boxes, 4).unwrap();
        for node in &arena.nodes {
            if !node.is_leaf() {
                let mut merged = arena.nodes[node.children.start].bbox;
                for c in &arena.nodes[node.children.start + 1..node.children.end] {
                    merged = merged.merge(&c.bbox);
                }
                assert_eq!(merged, node.bbox);
            }
        }
    }

    #[test]
    fn leaf_indices_cover_every_input_position_exactly_once() {
        let boxes: Vec<_> = (0..37)
            .map(|i| {
                let x = (i * 3 % 17) as f64;
                Rect::new(x, 0.0, x + 1.0, 1.0)
            })
            .collect();
        let arena = pack(&boxes, 4).unwrap();
        let mut seen: Vec<usize> = arena
            .nodes
            .iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.index)
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..37).collect::<Vec<_>>());
    }

    #[test]
    fn rejects_small_max_children() {
        let boxes = vec![b(0.0, 0.0, 1.0, 1.0)];
        let err = pack(&boxes, 1).unwrap_err();
        assert!(matches!(err, GeoIndexError::InvalidMaxChildren { got: 1 }));
    }

    #[test]
    fn height_meets_lower_bound() {
        let boxes: Vec<_> = (0..100)
            .map(|i| {
                let x = i as f64;
                Rect::new(x, 0.0, x + 1.0, 1.0)
            })
            .collect();
        let max_children = 4usize;
        let arena = pack(&boxes, max_children).unwrap();
        let lower_bound = (100f64.ln() / (max_children as f64).ln()).ceil() as usize;
        assert!(arena.height() >= lower_bound);
    }
}
