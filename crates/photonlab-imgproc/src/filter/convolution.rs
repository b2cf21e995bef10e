use photonlab_image::{Image, ImageError};

use super::kernels::Kernel;
use crate::padding::{spatial_padding, Padding2D, PaddingMode};
use crate::parallel;

/// Correlate a single channel image with a square kernel using zero padding.
///
/// The kernel is applied as-is (cross-correlation, no 180 degree flip). The
/// image is padded with zeros by the kernel radius on every side and the
/// output keeps the size of the input. Results are full precision and are not
/// clipped.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1), of any numeric type.
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel` - The kernel to apply.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if `src` and `dst` differ in size.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::filter::{filter2d, kernels::KernelPreset};
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![0, 10, 0]).unwrap();
/// let mut dst = Image::<f64, 1>::from_size_val(image.size(), 0.0).unwrap();
///
/// filter2d(&image, &mut dst, &KernelPreset::SobelVertical.kernel()).unwrap();
/// assert_eq!(dst.as_slice(), &[20.0, 0.0, -20.0]);
/// ```
pub fn filter2d<T>(
    src: &Image<T, 1>,
    dst: &mut Image<f64, 1>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + num_traits::NumCast,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if src.is_empty() {
        return Ok(());
    }

    let src_f64 = src.cast::<f64>()?;

    let padding = Padding2D::uniform(kernel.radius());
    let mut padded = Image::<f64, 1>::from_size_val(padding.padded_size(src.size()), 0.0)?;
    spatial_padding(&src_f64, &mut padded, padding, PaddingMode::Constant, [0.0])?;

    let ksize = kernel.size();
    let kdata = kernel.as_slice();
    let padded_cols = padded.cols();
    let padded_data = padded.as_slice();

    // the window of output pixel (r, c) starts at (r, c) in the padded image
    parallel::par_iter_rows_indexed(dst, |r, dst_row| {
        for (c, out) in dst_row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for ky in 0..ksize {
                let row_offset = (r + ky) * padded_cols + c;
                let window_row = &padded_data[row_offset..row_offset + ksize];
                let kernel_row = &kdata[ky * ksize..(ky + 1) * ksize];
                for (v, k) in window_row.iter().zip(kernel_row.iter()) {
                    sum += v * k;
                }
            }
            *out = sum;
        }
    });

    Ok(())
}

/// Convolve a single channel image with a square kernel into an 8-bit image.
///
/// Computes [`filter2d`] and stores every sample clipped to `[0, 255]` and
/// truncated toward zero. Negative responses and fractional parts are lost,
/// and kernels with a large positive sum saturate at 255.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1), of any numeric type.
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel` - The kernel to apply.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::filter::{convolve, kernels::KernelPreset};
///
/// let image = Image::<u8, 1>::from_size_val(ImageSize { width: 5, height: 5 }, 100).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// convolve(&image, &mut dst, &KernelPreset::Gaussian.kernel()).unwrap();
/// assert_eq!(dst.get_pixel(2, 2, 0).unwrap(), &100);
/// assert_eq!(dst.get_pixel(0, 0, 0).unwrap(), &56);
/// ```
pub fn convolve<T>(
    src: &Image<T, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + num_traits::NumCast,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let mut response = Image::<f64, 1>::from_size_val(src.size(), 0.0)?;
    filter2d(src, &mut response, kernel)?;

    parallel::par_iter_rows_val(&response, dst, |&v, out| {
        *out = clip_to_u8(v);
    });

    Ok(())
}

/// Clip to `[0, 255]` and truncate toward zero.
#[inline]
pub(crate) fn clip_to_u8(v: f64) -> u8 {
    // NaN maps to 0, like a saturating cast
    v.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::kernels::KernelPreset;
    use photonlab_image::ImageSize;

    fn ramp(width: usize, height: usize) -> Result<Image<u8, 1>, ImageError> {
        let data = (0..width * height).map(|i| (i * 7 % 256) as u8).collect();
        Image::new(ImageSize { width, height }, data)
    }

    #[test]
    fn test_convolve_preserves_shape() -> Result<(), ImageError> {
        for (width, height) in [(1, 1), (4, 3), (7, 2)] {
            let image = ramp(width, height)?;
            for ksize in [1, 3, 5, 7] {
                let kernel = Kernel::new(ksize, vec![0.5; ksize * ksize])?;
                let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;
                convolve(&image, &mut dst, &kernel)?;
                assert_eq!(dst.size(), image.size());
            }
        }
        Ok(())
    }

    #[test]
    fn test_convolve_identity() -> Result<(), ImageError> {
        let image = ramp(6, 5)?;
        for ksize in [1, 3, 5] {
            let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;
            convolve(&image, &mut dst, &Kernel::identity(ksize)?)?;
            assert_eq!(dst.as_slice(), image.as_slice());
        }
        Ok(())
    }

    #[test]
    fn test_filter2d_is_not_flipped() -> Result<(), ImageError> {
        // a single bright pixel reproduces the kernel rotated by 180 degrees
        let mut image = Image::<f64, 1>::from_size_val([3, 3].into(), 0.0)?;
        image.set_pixel(1, 1, 0, 1.0)?;

        let kernel = Kernel::new(3, (1..=9).map(|v| v as f64).collect())?;
        let mut dst = Image::<f64, 1>::from_size_val(image.size(), 0.0)?;
        filter2d(&image, &mut dst, &kernel)?;

        assert_eq!(
            dst.as_slice(),
            &[9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]
        );
        Ok(())
    }

    #[test]
    fn test_filter2d_zero_padding() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([3, 3].into(), 1)?;
        let kernel = Kernel::new(3, vec![1.0; 9])?;
        let mut dst = Image::<f64, 1>::from_size_val(image.size(), 0.0)?;
        filter2d(&image, &mut dst, &kernel)?;

        #[rustfmt::skip]
        let expected = [
            4.0, 6.0, 4.0,
            6.0, 9.0, 6.0,
            4.0, 6.0, 4.0,
        ];
        assert_eq!(dst.as_slice(), &expected);
        Ok(())
    }

    #[test]
    fn test_convolve_flat_sobel_is_zero() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([5, 5].into(), 100)?;
        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        convolve(&image, &mut dst, &KernelPreset::SobelHorizontal.kernel())?;

        // the top border sees zero padding above and a positive step below
        let interior: Vec<u8> = (1..4)
            .flat_map(|r| dst.as_slice()[r * 5..(r + 1) * 5].to_vec())
            .collect();
        assert!(interior.iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn test_convolve_clips() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([3, 3].into(), 200)?;

        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        convolve(&image, &mut dst, &KernelPreset::Sharpening.kernel())?;
        // corners: 5 * 200 - 2 * 200 = 600
        assert_eq!(dst.get_pixel(0, 0, 0)?, &255);
        assert_eq!(dst.get_pixel(1, 1, 0)?, &200);

        let negative = Kernel::new(1, vec![-1.0])?;
        convolve(&image, &mut dst, &negative)?;
        assert!(dst.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn test_convolve_truncates() -> Result<(), ImageError> {
        let image = Image::<f64, 1>::new([2, 1].into(), vec![10.9, 3.2])?;
        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        convolve(&image, &mut dst, &Kernel::identity(1)?)?;
        assert_eq!(dst.as_slice(), &[10, 3]);
        Ok(())
    }

    #[test]
    fn test_convolve_empty_image() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 0,
            height: 0,
        };
        let image = Image::<u8, 1>::new(size, vec![])?;
        let mut dst = Image::<u8, 1>::new(size, vec![])?;
        convolve(&image, &mut dst, &KernelPreset::Box.kernel())?;
        assert!(dst.is_empty());
        Ok(())
    }

    #[test]
    fn test_convolve_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        let mut dst = Image::<u8, 1>::from_size_val([2, 3].into(), 0)?;
        let res = convolve(&image, &mut dst, &KernelPreset::Box.kernel());
        assert_eq!(res, Err(ImageError::InvalidImageSize(3, 3, 2, 3)));
        Ok(())
    }
}
