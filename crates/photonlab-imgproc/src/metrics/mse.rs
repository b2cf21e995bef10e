use num_traits::ToPrimitive;

use photonlab_image::{Image, ImageError};

fn mean_squared_error<T: Copy + ToPrimitive>(a: &[T], b: &[T]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }

    let sum = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x.to_f64().unwrap_or(f64::NAN) - y.to_f64().unwrap_or(f64::NAN);
            d * d
        })
        .sum::<f64>();

    sum / a.len() as f64
}

fn peak_signal_to_noise(reference: impl Iterator<Item = f64>, mse: f64, peak: Option<f64>) -> f64 {
    if mse == 0.0 {
        return f64::INFINITY;
    }

    let peak = peak.unwrap_or_else(|| reference.fold(0.0, |acc: f64, v| acc.max(v.abs())));

    10.0 * (peak * peak / mse).log10()
}

/// Compute the mean squared error (MSE) between two images.
///
/// The MSE is defined as:
///
/// $ MSE = \frac{1}{n} \sum_{i=1}^{n} (I_1 - I_2)^2 $
///
/// where `I_1` and `I_2` are the two images and `n` is the number of samples.
/// Two empty images have an error of zero.
///
/// # Arguments
///
/// * `image1` - The first input image with shape (H, W, C).
/// * `image2` - The second input image with shape (H, W, C).
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::metrics::mse;
///
/// let image1 = Image::<u8, 1>::new(
///    ImageSize {
///      width: 2,
///      height: 2,
///    },
///    vec![0, 1, 2, 3],
/// )
/// .unwrap();
///
/// let image2 = Image::<u8, 1>::new(
///    ImageSize {
///      width: 2,
///      height: 2,
///    },
///    vec![0, 3, 2, 3],
/// )
/// .unwrap();
///
/// assert_eq!(mse(&image1, &image2).unwrap(), 1.0);
/// ```
pub fn mse<T, const C: usize>(image1: &Image<T, C>, image2: &Image<T, C>) -> Result<f64, ImageError>
where
    T: Copy + ToPrimitive,
{
    if image1.size() != image2.size() {
        return Err(ImageError::InvalidImageSize(
            image1.cols(),
            image1.rows(),
            image2.cols(),
            image2.rows(),
        ));
    }

    Ok(mean_squared_error(image1.as_slice(), image2.as_slice()))
}

/// Compute the root mean squared error between two images.
pub fn rmse<T, const C: usize>(image1: &Image<T, C>, image2: &Image<T, C>) -> Result<f64, ImageError>
where
    T: Copy + ToPrimitive,
{
    Ok(mse(image1, image2)?.sqrt())
}

/// Compute the peak signal-to-noise ratio (PSNR) between two images.
///
/// The PSNR is defined as:
///
/// $ PSNR = 10 \log_{10} \left( \frac{MAX^2}{MSE} \right) $
///
/// where `MAX` is the peak value and `MSE` is the mean squared error.
///
/// # Arguments
///
/// * `reference` - The reference image with shape (H, W, C).
/// * `test` - The degraded image with shape (H, W, C).
/// * `peak` - The peak value, defaults to the largest absolute value of `reference`.
///
/// # Returns
///
/// The PSNR in decibels, `+inf` when the images are identical.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::metrics::psnr;
///
/// let reference = Image::<u8, 1>::new(ImageSize { width: 2, height: 1 }, vec![255, 0]).unwrap();
/// let test = Image::<u8, 1>::new(ImageSize { width: 2, height: 1 }, vec![255, 0]).unwrap();
///
/// assert_eq!(psnr(&reference, &test, Some(255.0)).unwrap(), f64::INFINITY);
/// ```
pub fn psnr<T, const C: usize>(
    reference: &Image<T, C>,
    test: &Image<T, C>,
    peak: Option<f64>,
) -> Result<f64, ImageError>
where
    T: Copy + ToPrimitive,
{
    let mse = mse(reference, test)?;
    let values = reference
        .as_slice()
        .iter()
        .map(|v| v.to_f64().unwrap_or(f64::NAN));
    Ok(peak_signal_to_noise(values, mse, peak))
}

/// Compute the mean squared error between two signals of equal length.
///
/// # Errors
///
/// Returns [`ImageError::SignalLengthMismatch`] if the lengths differ.
pub fn mse_slice(a: &[f64], b: &[f64]) -> Result<f64, ImageError> {
    if a.len() != b.len() {
        return Err(ImageError::SignalLengthMismatch(b.len(), a.len()));
    }
    Ok(mean_squared_error(a, b))
}

/// Compute the root mean squared error between two signals of equal length.
pub fn rmse_slice(a: &[f64], b: &[f64]) -> Result<f64, ImageError> {
    Ok(mse_slice(a, b)?.sqrt())
}

/// Compute the PSNR between a reference signal and a degraded copy.
///
/// See [`psnr`] for the definition and the default peak.
pub fn psnr_slice(reference: &[f64], test: &[f64], peak: Option<f64>) -> Result<f64, ImageError> {
    let mse = mse_slice(reference, test)?;
    Ok(peak_signal_to_noise(reference.iter().copied(), mse, peak))
}
