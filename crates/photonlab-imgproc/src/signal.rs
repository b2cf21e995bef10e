//! Sampling and uniform quantization of 1D signals.
//!
//! These are the building blocks of the image formation pipeline before any
//! pixel exists: a continuous signal is sampled at a fixed rate, then every
//! sample is mapped to one of `2^bits` evenly spaced levels.

use photonlab_image::ImageError;

/// Evenly spaced sample times over `[start, start + duration)`.
///
/// The number of samples is `floor(sampling_freq * duration)` and the last
/// sample lies strictly before `start + duration`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidSampling`] if the duration or the frequency is
/// negative or not finite.
///
/// # Example
///
/// ```
/// use photonlab_imgproc::signal::sample_times;
///
/// let times = sample_times(1.0, 4.0, 0.0).unwrap();
/// assert_eq!(times, vec![0.0, 0.25, 0.5, 0.75]);
/// ```
pub fn sample_times(duration: f64, sampling_freq: f64, start: f64) -> Result<Vec<f64>, ImageError> {
    if !(duration.is_finite() && sampling_freq.is_finite() && start.is_finite())
        || duration < 0.0
        || sampling_freq < 0.0
    {
        return Err(ImageError::InvalidSampling(duration, sampling_freq));
    }

    let n_samples = (sampling_freq * duration) as usize;
    if n_samples == 0 {
        return Ok(vec![]);
    }

    let step = duration / n_samples as f64;
    Ok((0..n_samples).map(|i| start + i as f64 * step).collect())
}

/// Evaluate `sin(2 pi f t)` at the given times.
pub fn sine_wave(times: &[f64], freq: f64) -> Vec<f64> {
    times
        .iter()
        .map(|t| (2.0 * std::f64::consts::PI * freq * t).sin())
        .collect()
}

/// The output of a uniform quantizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantized {
    /// The reconstructed amplitude of every sample.
    pub values: Vec<f64>,
    /// The level index of every sample, in `[0, 2^bits)`.
    pub codes: Vec<u32>,
}

/// Quantize samples uniformly over `[min, max]` with `2^num_bits` levels.
///
/// With `L = 2^num_bits` levels and step `(max - min) / (L - 1)`, every sample
/// gets the code `round((x - min) / step)` clipped to `[0, L - 1]`, and the
/// value `min + code * step`. Ties round to the even code. Samples outside
/// `[min, max]` saturate.
///
/// # Errors
///
/// Returns [`ImageError::InvalidQuantizationBits`] if `num_bits` is not in
/// `1..=32` and [`ImageError::InvalidIntensityRange`] if `max <= min`.
///
/// # Example
///
/// ```
/// use photonlab_imgproc::signal::quantize_uniform;
///
/// let q = quantize_uniform(&[-1.0, -0.2, 0.3, 2.0], 2, -1.0, 1.0).unwrap();
/// assert_eq!(q.codes, vec![0, 1, 2, 3]);
/// ```
pub fn quantize_uniform(
    samples: &[f64],
    num_bits: u32,
    min: f64,
    max: f64,
) -> Result<Quantized, ImageError> {
    if num_bits == 0 || num_bits > 32 {
        return Err(ImageError::InvalidQuantizationBits(num_bits));
    }

    if max.partial_cmp(&min) != Some(std::cmp::Ordering::Greater) {
        return Err(ImageError::InvalidIntensityRange(min, max));
    }

    let top = ((1u64 << num_bits) - 1) as f64;
    let range = max - min;

    let codes: Vec<u32> = samples
        .iter()
        .map(|x| ((x - min) / range * top).round_ties_even().clamp(0.0, top) as u32)
        .collect();

    let values = codes
        .iter()
        .map(|&q| min + q as f64 * range / top)
        .collect();

    Ok(Quantized { values, codes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sample_times() -> Result<(), ImageError> {
        let times = sample_times(2.0, 8.0, 0.08)?;
        assert_eq!(times.len(), 16);
        assert_relative_eq!(times[0], 0.08);
        assert_relative_eq!(times[15], 0.08 + 15.0 * 0.125);
        assert!(times.iter().all(|&t| t < 2.08));

        // fractional sample counts are truncated
        assert_eq!(sample_times(1.0, 2.5, 0.0)?.len(), 2);
        assert!(sample_times(0.0, 8.0, 0.0)?.is_empty());

        assert_eq!(
            sample_times(1.0, -1.0, 0.0),
            Err(ImageError::InvalidSampling(1.0, -1.0))
        );
        Ok(())
    }

    #[test]
    fn test_sine_wave() {
        let wave = sine_wave(&[0.0, 0.05, 0.1], 5.0);
        assert_relative_eq!(wave[0], 0.0);
        assert_relative_eq!(wave[1], 1.0);
        assert_relative_eq!(wave[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quantize_uniform() -> Result<(), ImageError> {
        let samples = [-1.0, -0.5, 0.0, 0.5, 1.0, -3.0, 3.0];
        let q = quantize_uniform(&samples, 3, -1.0, 1.0)?;

        // 8 levels, step 2 / 7
        assert_eq!(q.codes, vec![0, 2, 4, 5, 7, 0, 7]);
        assert_relative_eq!(q.values[0], -1.0);
        assert_relative_eq!(q.values[4], 1.0);
        assert_relative_eq!(q.values[2], -1.0 + 4.0 * 2.0 / 7.0);

        // every value is within half a step of the clipped input
        let step = 2.0 / 7.0;
        for (x, v) in samples.iter().zip(q.values.iter()) {
            assert!((x.clamp(-1.0, 1.0) - v).abs() <= step / 2.0 + 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_quantize_invalid() {
        assert_eq!(
            quantize_uniform(&[0.0], 0, -1.0, 1.0),
            Err(ImageError::InvalidQuantizationBits(0))
        );
        assert_eq!(
            quantize_uniform(&[0.0], 33, -1.0, 1.0),
            Err(ImageError::InvalidQuantizationBits(33))
        );
        assert_eq!(
            quantize_uniform(&[0.0], 8, 1.0, 1.0),
            Err(ImageError::InvalidIntensityRange(1.0, 1.0))
        );
    }
}
