//! The numeric kind shared by every index in this crate.

use num_traits::Float;

/// A coordinate type usable with every tree in this crate.
///
/// Blanket-implemented for any [`num_traits::Float`], so `f32` and `f64`
/// both work out of the box. All comparisons done by the trees use squared
/// distances, so `Scalar` never needs to take a square root.
pub trait Scalar: Float + std::fmt::Debug + Send + Sync + 'static {}

impl<T: Float + std::fmt::Debug + Send + Sync + 'static> Scalar for T {}
