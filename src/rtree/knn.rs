//! Best-first branch-and-bound k-NN search, shared by the plain R-tree and
//! the segmental R-tree (§4.5). Each tree supplies its own internal-node
//! and leaf metrics; the traversal and tie-break/queue machinery live here
//! once.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::geom::Rect;
use crate::scalar::Scalar;

use super::node::Arena;

/// A priority-queue distance key that lets an exact zero (an intersecting
/// or contained leaf) dominate every other candidate regardless of
/// floating-point noise in how it was computed (§4.5, zero-collision
/// convention). Equivalent in effect to the reference's `-infinity`
/// substitution, without requiring `Scalar` to model infinity.
#[derive(Debug, Clone, Copy)]
enum DistKey<S: Scalar> {
    Zero,
    Value(S),
}

impl<S: Scalar> DistKey<S> {
    fn from_value(d: S) -> Self {
        if d == S::zero() {
            DistKey::Zero
        } else {
            DistKey::Value(d)
        }
    }
}

impl<S: Scalar> PartialEq for DistKey<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl<S: Scalar> Eq for DistKey<S> {}

impl<S: Scalar> PartialOrd for DistKey<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Scalar> Ord for DistKey<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (DistKey::Zero, DistKey::Zero) => Ordering::Equal,
            (DistKey::Zero, DistKey::Value(_)) => Ordering::Less,
            (DistKey::Value(_), DistKey::Zero) => Ordering::Greater,
            (DistKey::Value(a), DistKey::Value(b)) => {
                a.partial_cmp(b).expect("NaN scalar is out of contract")
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry<S: Scalar> {
    dist: DistKey<S>,
    tie: i64,
    slot: usize,
}

impl<S: Scalar> PartialEq for Entry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.dist == other.dist && self.tie == other.tie
    }
}
impl<S: Scalar> Eq for Entry<S> {}

impl<S: Scalar> PartialOrd for Entry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Scalar> Ord for Entry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist.cmp(&other.dist).then(self.tie.cmp(&other.tie))
    }
}

/// Best-first search over `arena` for the `n` items closest to `probe`,
/// under the metrics supplied by the caller. Returns original input
/// indices, ascending by distance. `internal_metric` bounds a subtree via
/// its bounding box; `leaf_metric` is the exact distance for a single
/// item, looked up by its original index (letting the segmental tree
/// index back into its own segment slice).
///
/// Assumes `n <= ` the number of items in `arena`; callers apply the
/// `n >= len` shortcut of §4.5 themselves, since only they know `len`.
pub fn best_first_knn<S: Scalar, P: ?Sized>(
    arena: &Arena<S>,
    n: usize,
    probe: &P,
    internal_metric: impl Fn(&Rect<S>, &P) -> S,
    leaf_metric: impl Fn(usize, &P) -> S,
) -> Vec<usize> {
    let mut out = Vec::with_capacity(n);
    if n == 0 {
        return out;
    }

    let mut heap: BinaryHeap<Reverse<Entry<S>>> = BinaryHeap::new();
    heap.push(Reverse(Entry {
        dist: DistKey::Value(S::zero()),
        tie: 0,
        slot: arena.root,
    }));

    while out.len() < n {
        let Some(Reverse(top)) = heap.pop() else {
            break;
        };
        let node = &arena.nodes[top.slot];
        if node.is_leaf() {
            out.push(node.index);
            continue;
        }
        for slot in node.children.clone() {
            let child = &arena.nodes[slot];
            let (dist, tie) = if child.is_leaf() {
                (leaf_metric(child.index, probe), child.index as i64)
            } else {
                (
                    internal_metric(&child.bbox, probe),
                    -(child.index as i64) - 1,
                )
            };
            heap.push(Reverse(Entry {
                dist: DistKey::from_value(dist),
                tie,
                slot,
            }));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtree::node::pack;

    #[test]
    fn finds_the_single_closest_box() {
        let boxes: Vec<_> = (0..50)
            .map(|i| {
                let x = i as f64;
                Rect::new(x, 0.0, x + 1.0, 1.0)
            })
            .collect();
        let arena = pack(&boxes, 4).unwrap();
        let probe = 10.4_f64;
        let got = best_first_knn(
            &arena,
            1,
            &probe,
            |bbox: &Rect<f64>, p: &f64| {
                let dx = (bbox.min_x - p).max(p - bbox.max_x).max(0.0);
                dx * dx
            },
            |index, p: &f64| {
                let bbox = &boxes[index];
                let dx = (bbox.min_x - p).max(p - bbox.max_x).max(0.0);
                dx * dx
            },
        );
        assert_eq!(got, vec![10]);
    }
}
