#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image cropping module.
pub mod crop;

/// edge maps from gradient magnitude and direction.
pub mod edges;

/// image enhancement module.
pub mod enhance;

/// image filtering module.
pub mod filter;

/// sobel gradient module.
pub mod gradient;

/// compute image histogram module.
pub mod histogram;

/// module containing parallelization utilities.
pub mod parallel;

/// image processing metrics module.
pub mod metrics;

/// noise generation and noise statistics.
pub mod noise;

/// operations to normalize images.
pub mod normalize;

/// image padding module.
pub mod padding;

/// signal sampling and quantization.
pub mod signal;
