use std::cmp::Ordering;

use photonlab_image::{Image, ImageError};

use crate::padding::{spatial_padding, Padding2D, PaddingMode};
use crate::parallel;

/// Replace every pixel by the median of its `size x size` neighborhood.
///
/// The borders are handled by replicating the outermost rows and columns. For
/// every window the samples are sorted and the element at index `len / 2` is
/// taken, which is the true median since the window holds an odd number of
/// samples.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `size` - The side length of the window, must be odd.
///
/// # Errors
///
/// Returns [`ImageError::InvalidKernelSize`] if `size` is even and
/// [`ImageError::InvalidImageSize`] if `src` and `dst` differ in size.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::filter::median_blur;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize { width: 3, height: 3 },
///     vec![10, 10, 10, 10, 255, 10, 10, 10, 10],
/// )
/// .unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// median_blur(&image, &mut dst, 3).unwrap();
/// assert!(dst.as_slice().iter().all(|&v| v == 10));
/// ```
pub fn median_blur<T>(src: &Image<T, 1>, dst: &mut Image<T, 1>, size: usize) -> Result<(), ImageError>
where
    T: Copy + PartialOrd + Send + Sync,
{
    if size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(size));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let Some(&fill) = src.as_slice().first() else {
        return Ok(());
    };

    let padding = Padding2D::uniform(size / 2);
    let mut padded = Image::<T, 1>::from_size_val(padding.padded_size(src.size()), fill)?;
    spatial_padding(src, &mut padded, padding, PaddingMode::Replicate, [fill])?;

    let padded_cols = padded.cols();
    let padded_data = padded.as_slice();

    parallel::par_iter_rows_indexed(dst, |r, dst_row| {
        let mut window = Vec::with_capacity(size * size);
        for (c, out) in dst_row.iter_mut().enumerate() {
            window.clear();
            for ky in 0..size {
                let offset = (r + ky) * padded_cols + c;
                window.extend_from_slice(&padded_data[offset..offset + size]);
            }
            window.sort_unstable_by(nan_last);
            *out = window[window.len() / 2];
        }
    });

    Ok(())
}

/// Total order over partially ordered samples, unordered ones (NaN) sort last.
#[inline]
#[allow(clippy::eq_op)]
fn nan_last<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or_else(|| (a != a).cmp(&(b != b)))
}
