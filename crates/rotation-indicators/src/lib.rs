//! Decimal indicators for momentum ranking.
//!
//! This crate provides exact (fixed-point) implementations of:
//! - Simple moving averages, batch (`Sma`, `mean`) and streaming (`StreamingSma`)
//! - Trailing returns over a fixed lookback (`TrailingReturn`)
//!
//! All indicators degrade gracefully on short history instead of failing.

pub mod momentum;
pub mod moving_average;

pub use momentum::{ReturnMode, TrailingReturn, RETURN_EPSILON};
pub use moving_average::{mean, Sma, StreamingSma};
