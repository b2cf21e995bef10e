//! Noise generation and noise statistics.
//!
//! Two noise models are provided:
//!
//! * **Salt and pepper** ([`add_salt_pepper_noise`]) - Impulse noise on 8-bit images
//! * **Gaussian** ([`add_gaussian_noise`]) - Additive noise scaled by the signal range
//!
//! Noise is measured with [`region_stats`] on a user selected region, or with
//! [`patch_stats`] on the [`center_patch`] of a dark frame.
//!
//! All random functions take the generator as an argument, so a seeded
//! [`rand::rngs::StdRng`] gives reproducible results.

use num_traits::ToPrimitive;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use photonlab_image::{Image, ImageError, ImageSize};

use crate::crop::crop_image;

fn check_probability(p: f64) -> Result<f64, ImageError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ImageError::InvalidProbability(p));
    }
    Ok(p)
}

/// Add salt and pepper noise to an image.
///
/// For every pixel a uniform value `r` in `[0, 1)` is drawn. The pixel turns
/// white (255) when `r < salt_prob`, and black (0) when `r > 1 - pepper_prob`.
/// Pepper wins when both apply. Other pixels are copied from `src`.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, 1).
/// * `dst` - The noisy image with shape (H, W, 1).
/// * `salt_prob` - Probability of a white pixel, in `[0, 1]`.
/// * `pepper_prob` - Probability of a black pixel, in `[0, 1]`.
/// * `rng` - The random number generator.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::noise::add_salt_pepper_noise;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let image = Image::<u8, 1>::from_size_val(ImageSize { width: 8, height: 8 }, 128).unwrap();
/// let mut noisy = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(0);
/// add_salt_pepper_noise(&image, &mut noisy, 0.1, 0.1, &mut rng).unwrap();
/// assert!(noisy.as_slice().iter().all(|&v| v == 0 || v == 128 || v == 255));
/// ```
pub fn add_salt_pepper_noise<R: Rng + ?Sized>(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    salt_prob: f64,
    pepper_prob: f64,
    rng: &mut R,
) -> Result<(), ImageError> {
    check_probability(salt_prob)?;
    check_probability(pepper_prob)?;

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // the draws must follow the pixel order to be reproducible, so this stays serial
    for (&v, out) in src.as_slice().iter().zip(dst.as_slice_mut().iter_mut()) {
        let r: f64 = rng.random();
        *out = v;
        if r < salt_prob {
            *out = 255;
        }
        if r > 1.0 - pepper_prob {
            *out = 0;
        }
    }

    Ok(())
}

/// Add gaussian noise proportional to the dynamic range of a signal.
///
/// The noise follows `N(mean, std * (max - min))` where `min` and `max` are
/// taken from the signal itself.
///
/// # Returns
///
/// The `(noisy, noise)` pair, both of the length of `signal`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidStandardDeviation`] if `std` is negative or
/// not finite.
pub fn add_gaussian_noise<R: Rng + ?Sized>(
    signal: &[f64],
    mean: f64,
    std: f64,
    rng: &mut R,
) -> Result<(Vec<f64>, Vec<f64>), ImageError> {
    if !std.is_finite() || std < 0.0 {
        return Err(ImageError::InvalidStandardDeviation(std));
    }

    let Some(&first) = signal.first() else {
        return Ok((vec![], vec![]));
    };

    let (min, max) = signal
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let sigma = std * (max - min);

    let normal =
        Normal::new(mean, sigma).map_err(|_| ImageError::InvalidStandardDeviation(sigma))?;

    let noise: Vec<f64> = (0..signal.len()).map(|_| normal.sample(rng)).collect();
    let noisy = signal.iter().zip(noise.iter()).map(|(s, n)| s + n).collect();

    Ok((noisy, noise))
}

/// A rectangular region `[x1, x2) x [y1, y2)` of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left column, inclusive.
    pub x1: usize,
    /// Top row, inclusive.
    pub y1: usize,
    /// Right column, exclusive.
    pub x2: usize,
    /// Bottom row, exclusive.
    pub y2: usize,
}

impl Region {
    /// Build a region from two opposite corners given in any order.
    ///
    /// # Example
    ///
    /// ```
    /// use photonlab_imgproc::noise::Region;
    ///
    /// let region = Region::from_corners((40, 10), (20, 30));
    /// assert_eq!(region, Region { x1: 20, y1: 10, x2: 40, y2: 30 });
    /// ```
    pub fn from_corners(a: (usize, usize), b: (usize, usize)) -> Self {
        Self {
            x1: a.0.min(b.0),
            y1: a.1.min(b.1),
            x2: a.0.max(b.0),
            y2: a.1.max(b.1),
        }
    }

    /// The size of the region.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.x2.saturating_sub(self.x1),
            height: self.y2.saturating_sub(self.y1),
        }
    }
}

/// Statistics of the values in an image region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStats {
    /// Mean value.
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// `mean / std`, infinite for a flat region.
    pub snr: f64,
    /// Width of the region.
    pub width: usize,
    /// Height of the region.
    pub height: usize,
    /// Number of pixels in the region.
    pub num_pixels: usize,
}

fn mean_and_variance(values: &[f64], ddof: usize) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    (mean, sq / (n - ddof as f64))
}

fn to_f64_image<T>(image: &Image<T, 1>) -> Vec<f64>
where
    T: Copy + ToPrimitive,
{
    image
        .as_slice()
        .iter()
        .map(|v| v.to_f64().unwrap_or(f64::NAN))
        .collect()
}

/// Compute the noise statistics of a region of a single channel image.
///
/// # Errors
///
/// Returns [`ImageError::InvalidRegion`] if the region is empty or does not
/// fit inside the image.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::noise::{region_stats, Region};
///
/// let image = Image::<u16, 1>::new(ImageSize { width: 2, height: 2 }, vec![10, 20, 10, 20]).unwrap();
/// let stats = region_stats(&image, Region { x1: 0, y1: 0, x2: 2, y2: 2 }).unwrap();
///
/// assert_eq!(stats.mean, 15.0);
/// assert_eq!(stats.std, 5.0);
/// assert_eq!(stats.snr, 3.0);
/// ```
pub fn region_stats<T>(image: &Image<T, 1>, region: Region) -> Result<RegionStats, ImageError>
where
    T: Copy + Send + Sync + ToPrimitive,
{
    let size = region.size();
    if size.width == 0 || size.height == 0 {
        return Err(ImageError::InvalidRegion(
            region.x1,
            region.x2,
            region.y1,
            region.y2,
            image.cols(),
            image.rows(),
        ));
    }

    let Some(&fill) = image.as_slice().first() else {
        return Err(ImageError::InvalidRegion(
            region.x1, region.x2, region.y1, region.y2, 0, 0,
        ));
    };

    let mut patch = Image::<T, 1>::from_size_val(size, fill)?;
    crop_image(image, &mut patch, region.x1, region.y1)?;

    let values = to_f64_image(&patch);
    let (mean, variance) = mean_and_variance(&values, 0);
    let std = variance.sqrt();
    let snr = if std > 0.0 { mean / std } else { f64::INFINITY };

    Ok(RegionStats {
        mean,
        std,
        snr,
        width: size.width,
        height: size.height,
        num_pixels: size.area(),
    })
}

/// Extract the square patch at the center of an image.
///
/// The patch is clamped to the image, so small images give a smaller patch.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::noise::center_patch;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 4, height: 4 }, (0..16).collect()).unwrap();
/// let patch = center_patch(&image, 2).unwrap();
///
/// assert_eq!(patch.as_slice(), &[5, 6, 9, 10]);
/// ```
pub fn center_patch<T>(image: &Image<T, 1>, patch_size: usize) -> Result<Image<T, 1>, ImageError>
where
    T: Copy + Send + Sync,
{
    let (h, w) = (image.rows(), image.cols());
    let (cy, cx) = (h / 2, w / 2);
    let y0 = cy.saturating_sub(patch_size / 2);
    let x0 = cx.saturating_sub(patch_size / 2);
    let y1 = h.min(y0 + patch_size);
    let x1 = w.min(x0 + patch_size);

    let size = ImageSize {
        width: x1 - x0,
        height: y1 - y0,
    };

    let Some(&fill) = image.as_slice().first() else {
        return Image::new(size, vec![]);
    };

    let mut patch = Image::<T, 1>::from_size_val(size, fill)?;
    crop_image(image, &mut patch, x0, y0)?;
    Ok(patch)
}

/// Mean and sample standard deviation of a patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchStats {
    /// Mean value.
    pub mean: f64,
    /// Sample standard deviation (one delta degree of freedom).
    pub std: f64,
}

/// Compute the mean and sample standard deviation of a single channel image.
///
/// Images with fewer than two pixels have an undefined sample deviation,
/// reported as NaN.
pub fn patch_stats<T>(image: &Image<T, 1>) -> PatchStats
where
    T: Copy + ToPrimitive,
{
    let values = to_f64_image(image);
    let (mean, variance) = mean_and_variance(&values, 1);
    let std = if values.len() < 2 {
        f64::NAN
    } else {
        variance.sqrt()
    };
    PatchStats { mean, std }
}
