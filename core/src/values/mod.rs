//! Runtime values produced while evaluating a payoff expression.
//!
//! Vectors live in a `bumpalo` arena that the caller owns and resets between
//! batches, so a [`Value`] is a small `Copy` handle.

mod broadcast;
mod value;

pub use broadcast::{ShapeMismatch, broadcast_len, map_numbers, map_truth};
pub use value::Value;
