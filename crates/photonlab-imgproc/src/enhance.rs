use photonlab_image::{Image, ImageError};

use crate::filter::clip_to_u8;
use crate::histogram::{bin_lut, compute_histogram, cumulative_distribution, normalized_histogram};
use crate::parallel;

/// Map the intensity range `[r_min, r_max]` linearly onto `[0, 255]`.
///
/// dst(x,y) = (src(x,y) - r_min) / (r_max - r_min) * 255
///
/// Values outside `[r_min, r_max]` saturate and the result is truncated to 8 bits.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, 1), of any numeric type.
/// * `dst` - The output image with shape (H, W, 1).
/// * `r_min` - The intensity mapped to 0.
/// * `r_max` - The intensity mapped to 255.
///
/// # Errors
///
/// Returns [`ImageError::InvalidIntensityRange`] if `r_max <= r_min` and
/// [`ImageError::InvalidImageSize`] if `src` and `dst` differ in size.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::enhance::contrast_stretch;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![100, 125, 150]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// contrast_stretch(&image, &mut dst, 100.0, 150.0).unwrap();
/// assert_eq!(dst.as_slice(), &[0, 127, 255]);
/// ```
pub fn contrast_stretch<T>(
    src: &Image<T, 1>,
    dst: &mut Image<u8, 1>,
    r_min: f64,
    r_max: f64,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + num_traits::ToPrimitive,
{
    if r_max.partial_cmp(&r_min) != Some(std::cmp::Ordering::Greater) {
        return Err(ImageError::InvalidIntensityRange(r_min, r_max));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let range = r_max - r_min;

    parallel::par_iter_rows_val(src, dst, |&v, out| {
        let v = v.to_f64().unwrap_or(f64::NAN);
        *out = clip_to_u8((v - r_min) / range * 255.0);
    });

    Ok(())
}

/// Equalize the histogram of an 8-bit image.
///
/// Every pixel is replaced by the cumulative distribution of its bin scaled
/// to 255 and truncated, which spreads the most populated intensities over
/// the whole range.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, 1).
/// * `dst` - The output image with shape (H, W, 1).
/// * `num_bins` - The number of histogram bins, in `1..=256`.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::enhance::equalize_histogram;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 4, height: 1 }, vec![10, 10, 20, 30]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// equalize_histogram(&image, &mut dst, 256).unwrap();
/// assert_eq!(dst.as_slice(), &[127, 127, 191, 255]);
/// ```
pub fn equalize_histogram(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    num_bins: usize,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let lut = bin_lut(num_bins)?;

    let mut hist = vec![0; num_bins];
    compute_histogram(src, &mut hist, num_bins)?;
    let cdf = cumulative_distribution(&normalized_histogram(&hist));

    let mut mapping = [0u8; 256];
    for (m, &bin) in mapping.iter_mut().zip(lut.iter()) {
        *m = clip_to_u8(cdf[bin] * 255.0);
    }

    parallel::par_iter_rows_val(src, dst, |&v, out| {
        *out = mapping[v as usize];
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_stretch() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([4, 1].into(), vec![50, 75, 100, 200])?;
        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        contrast_stretch(&image, &mut dst, 50.0, 100.0)?;
        // 25 / 50 * 255 = 127.5 truncates, 200 saturates
        assert_eq!(dst.as_slice(), &[0, 127, 255, 255]);

        contrast_stretch(&image, &mut dst, 75.0, 200.0)?;
        assert_eq!(dst.as_slice(), &[0, 0, 51, 255]);
        Ok(())
    }

    #[test]
    fn test_contrast_stretch_float_input() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([3, 1].into(), vec![0.0, 0.5, 1.0])?;
        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        contrast_stretch(&image, &mut dst, 0.0, 1.0)?;
        assert_eq!(dst.as_slice(), &[0, 127, 255]);
        Ok(())
    }

    #[test]
    fn test_contrast_stretch_invalid_range() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let mut dst = image.clone();
        assert_eq!(
            contrast_stretch(&image, &mut dst, 10.0, 10.0),
            Err(ImageError::InvalidIntensityRange(10.0, 10.0))
        );
        assert_eq!(
            contrast_stretch(&image, &mut dst, 20.0, 10.0),
            Err(ImageError::InvalidIntensityRange(20.0, 10.0))
        );
        assert!(contrast_stretch(&image, &mut dst, f64::NAN, 10.0).is_err());
        Ok(())
    }

    #[test]
    fn test_equalize_histogram() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([4, 1].into(), vec![10, 10, 20, 30])?;
        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        equalize_histogram(&image, &mut dst, 256)?;
        assert_eq!(dst.as_slice(), &[127, 127, 191, 255]);

        // a single bin maps everything to the top
        equalize_histogram(&image, &mut dst, 1)?;
        assert!(dst.as_slice().iter().all(|&v| v == 255));
        Ok(())
    }

    #[test]
    fn test_equalize_is_monotonic() -> Result<(), ImageError> {
        let data = (0..64).map(|i: u32| ((i * i) % 97) as u8).collect();
        let image = Image::<u8, 1>::new([8, 8].into(), data)?;
        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        equalize_histogram(&image, &mut dst, 256)?;

        let src = image.as_slice();
        let out = dst.as_slice();
        for i in 0..src.len() {
            for j in 0..src.len() {
                if src[i] <= src[j] {
                    assert!(out[i] <= out[j]);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_equalize_invalid_bins() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let mut dst = image.clone();
        assert_eq!(
            equalize_histogram(&image, &mut dst, 0),
            Err(ImageError::InvalidHistogramBins(0))
        );
        Ok(())
    }
}
