//! Filter operations
//!
//! This module provides sliding-window filter operations for image processing:
//! zero-padded 2D correlation with square kernels and median filtering.

/// Filter kernels
pub mod kernels;

/// 2D correlation with square kernels
mod convolution;
pub use convolution::*;

/// Median filtering
mod median;
pub use median::*;
