//! Image and signal quality metrics.
//!
//! This module provides functions for quantitatively comparing a reference
//! with a degraded version of it, e.g. an image against its noisy or filtered
//! copy, or a sampled signal against its quantized copy.
//!
//! # Available Metrics
//!
//! - **MSE** (Mean Squared Error): Average squared difference between samples
//! - **RMSE** (Root Mean Squared Error): Square root of the MSE
//! - **PSNR** (Peak Signal-to-Noise Ratio): Quality metric in dB scale

mod mse;

pub use mse::{mse, mse_slice, psnr, psnr_slice, rmse, rmse_slice};
