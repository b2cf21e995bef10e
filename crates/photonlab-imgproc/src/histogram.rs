use photonlab_image::{Image, ImageError};
use rayon::prelude::*;

/// Lookup table from an 8-bit intensity to its histogram bin.
///
/// Bin `i` covers the intensities `[i * 256 / num_bins, (i + 1) * 256 / num_bins)`.
pub(crate) fn bin_lut(num_bins: usize) -> Result<[usize; 256], ImageError> {
    if num_bins == 0 || num_bins > 256 {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    let mut lut = [0usize; 256];
    for (i, bin) in lut.iter_mut().enumerate() {
        *bin = (i * num_bins) >> 8;
    }
    Ok(lut)
}

/// Compute the pixel intensity histogram of an image.
///
/// NOTE: this is limited to 8-bit 1-channel images. The counts are added to
/// the values already in `hist`.
///
/// # Arguments
///
/// * `src` - The input image to compute the histogram.
/// * `hist` - The output histogram.
/// * `num_bins` - The number of bins to use for the histogram, in `1..=256`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidHistogramBins`] if the number of bins is out of
/// range or does not match the length of `hist`.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::histogram::compute_histogram;
///
/// let image = Image::<u8, 1>::new(
///   ImageSize {
///     width: 3,
///     height: 3,
///   },
///   vec![0, 2, 4, 128, 130, 132, 254, 255, 255],
/// ).unwrap();
///
/// let mut histogram = vec![0; 3];
///
/// compute_histogram(&image, &mut histogram, 3).unwrap();
/// assert_eq!(histogram, vec![3, 3, 3]);
/// ```
pub fn compute_histogram(
    src: &Image<u8, 1>,
    hist: &mut [usize],
    num_bins: usize,
) -> Result<(), ImageError> {
    let lut = bin_lut(num_bins)?;

    if hist.len() != num_bins {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    let counts = src
        .as_slice()
        .par_chunks(4096)
        .fold(
            || vec![0usize; num_bins],
            |mut local, chunk| {
                for &px in chunk {
                    local[lut[px as usize]] += 1;
                }
                local
            },
        )
        .reduce(
            || vec![0usize; num_bins],
            |mut a, b| {
                a.iter_mut().zip(b.iter()).for_each(|(a, b)| *a += b);
                a
            },
        );

    hist.iter_mut()
        .zip(counts.iter())
        .for_each(|(h, c)| *h += c);

    Ok(())
}

/// Turn histogram counts into a probability distribution.
///
/// Every count is divided by the total, so the result sums to one. A histogram
/// without any counts gives all zeros.
pub fn normalized_histogram(hist: &[usize]) -> Vec<f64> {
    let total: usize = hist.iter().sum();
    if total == 0 {
        return vec![0.0; hist.len()];
    }
    hist.iter().map(|&c| c as f64 / total as f64).collect()
}

/// The running sum of a distribution.
///
/// # Example
///
/// ```
/// use photonlab_imgproc::histogram::cumulative_distribution;
///
/// let cdf = cumulative_distribution(&[0.25, 0.5, 0.25]);
/// assert_eq!(cdf, vec![0.25, 0.75, 1.0]);
/// ```
pub fn cumulative_distribution(dist: &[f64]) -> Vec<f64> {
    dist.iter()
        .scan(0.0, |acc, &p| {
            *acc += p;
            Some(*acc)
        })
        .collect()
}
