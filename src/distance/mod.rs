//! Distance and travel time matrices.
//!
//! Provides a dense depot-plus-sites distance matrix built once per instance.

mod matrix;

pub use matrix::DistanceMatrix;
