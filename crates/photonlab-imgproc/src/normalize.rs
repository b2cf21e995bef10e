//! Intensity normalization and clipping.
//!
//! * **Min-Max Normalization** ([`normalize_min_max`]) - Map the value range of an image onto `[min, max]`
//! * **Clipping** ([`clip`]) - Saturate every value into `[min, max]`
//!
//! ```text
//! normalized = (pixel - img_min) * (max - min) / (img_max - img_min) + min
//! ```

use num_traits::Float;

use photonlab_image::{Image, ImageError};

use crate::parallel;

/// Find the minimum and maximum values in an image.
///
/// # Returns
///
/// The `(min, max)` over all channels, or `None` for an empty image.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::normalize::find_min_max;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![7, 2, 9]).unwrap();
/// assert_eq!(find_min_max(&image), Some((2, 9)));
/// ```
pub fn find_min_max<T, const C: usize>(image: &Image<T, C>) -> Option<(T, T)>
where
    T: Copy + PartialOrd,
{
    let first = *image.as_slice().first()?;

    let mut min = first;
    let mut max = first;

    for &x in image.as_slice().iter() {
        if x < min {
            min = x;
        }
        if x > max {
            max = x;
        }
    }

    Some((min, max))
}

/// Normalize an image using its minimum and maximum values.
///
/// The formula for normalizing an image is:
///
/// (image - img_min) * (max - min) / (img_max - img_min) + min
///
/// The range is taken over all channels. An image with a single value
/// everywhere is filled with `min`.
///
/// # Arguments
///
/// * `src` - The input image of shape (height, width, channels).
/// * `dst` - The output image of shape (height, width, channels).
/// * `min` - The value the image minimum is mapped to.
/// * `max` - The value the image maximum is mapped to.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::normalize::normalize_min_max;
///
/// let image = Image::<f64, 1>::new(ImageSize { width: 3, height: 1 }, vec![10.0, 15.0, 20.0]).unwrap();
/// let mut normalized = Image::<f64, 1>::from_size_val(image.size(), 0.0).unwrap();
///
/// normalize_min_max(&image, &mut normalized, 0.0, 255.0).unwrap();
/// assert_eq!(normalized.as_slice(), &[0.0, 127.5, 255.0]);
/// ```
pub fn normalize_min_max<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    min: T,
    max: T,
) -> Result<(), ImageError>
where
    T: Send + Sync + Float,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let Some((min_val, max_val)) = find_min_max(src) else {
        return Ok(());
    };

    if max_val - min_val == T::zero() {
        dst.as_slice_mut().iter_mut().for_each(|v| *v = min);
        return Ok(());
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        src_pixel
            .iter()
            .zip(dst_pixel.iter_mut())
            .for_each(|(&src_val, dst_val)| {
                *dst_val = (src_val - min_val) * (max - min) / (max_val - min_val) + min;
            });
    });

    Ok(())
}

/// Clip the values of an image into `[min, max]`.
///
/// # Arguments
///
/// * `src` - The input image of shape (height, width, channels).
/// * `dst` - The output image of shape (height, width, channels).
/// * `min` - The lower bound.
/// * `max` - The upper bound.
///
/// # Errors
///
/// Returns [`ImageError::InvalidIntensityRange`] if `min > max`.
pub fn clip<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    min: T,
    max: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + num_traits::ToPrimitive,
{
    if min > max {
        return Err(ImageError::InvalidIntensityRange(
            min.to_f64().unwrap_or(f64::NAN),
            max.to_f64().unwrap_or(f64::NAN),
        ));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows_val(src, dst, |&v, out| {
        *out = if v < min {
            min
        } else if v > max {
            max
        } else {
            v
        };
    });

    Ok(())
}
