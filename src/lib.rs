#![doc = include_str!("../README.md")]

pub mod error;
pub mod geom;
pub mod hilbert;
pub mod kdtree;
pub mod rtree;
pub mod scalar;
pub mod segtree;

pub use error::GeoIndexError;
pub use geom::{Point, Rect, Segment};
pub use kdtree::KdTree;
pub use rtree::RTree;
pub use scalar::Scalar;
pub use segtree::SegTree;
