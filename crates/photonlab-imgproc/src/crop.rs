use photonlab_image::{Image, ImageError};

use crate::parallel;

/// Crop an image to a specified region.
///
/// The size of the region is the size of `dst`.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image to store the cropped image.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
///
/// # Errors
///
/// Returns [`ImageError::InvalidRegion`] if the region does not fit inside `src`.
///
/// # Examples
///
/// ```rust
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::<_, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0u8).unwrap();
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let (x2, y2) = (x + dst.cols(), y + dst.rows());
    if x2 > src.cols() || y2 > src.rows() {
        return Err(ImageError::InvalidRegion(
            x,
            x2,
            y,
            y2,
            src.cols(),
            src.rows(),
        ));
    }

    let dst_cols = dst.cols();
    let src_cols = src.cols();
    let src_data = src.as_slice();

    parallel::par_iter_rows_indexed(dst, |i, dst_row| {
        // get the slice at the top left corner
        let offset = (y + i) * src_cols * C + x * C;
        dst_row.copy_from_slice(&src_data[offset..offset + dst_cols * C]);
    });

    Ok(())
}
