use photonlab_image::{Image, ImageError, ImageSize};
use rayon::prelude::*;

/// A border type for the spatial padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// This border type fills the border with a single, constant value.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    Constant,

    /// This border type takes the outermost row or column of pixels and repeats it into the padded region.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,
}

impl PaddingMode {
    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the padding mode.
    ///
    /// Returns `None` when the index falls into a constant border, or when there
    /// is nothing to replicate (`len == 0`).
    ///
    /// # Arguments
    /// - `i`: The (possibly out-of-range) coordinate index.
    /// - `len`: The valid length of the dimension.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        match self {
            PaddingMode::Constant => (i >= 0 && (i as usize) < len).then_some(i as usize),
            PaddingMode::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
        }
    }
}

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// The same amount of padding on all four sides.
    pub fn uniform(pad: usize) -> Self {
        Self {
            top: pad,
            bottom: pad,
            left: pad,
            right: pad,
        }
    }

    /// The size of an image of `size` once this padding is applied.
    pub fn padded_size(&self, size: ImageSize) -> ImageSize {
        ImageSize {
            width: size.width + self.left + self.right,
            height: size.height + self.top + self.bottom,
        }
    }

    /// Validates that a new image size correctly matches the expected dimensions
    /// after applying this padding to an existing image.
    ///
    /// # Example
    /// ```rust
    /// use photonlab_image::ImageSize;
    /// use photonlab_imgproc::padding::Padding2D;
    /// let padding = Padding2D { top: 1, bottom: 1, left: 2, right: 2 };
    /// let old_size = ImageSize { width: 4, height: 4 };
    /// let new_size = ImageSize { width: 8, height: 6 };
    ///
    /// assert!(padding.validate_size(old_size, new_size));
    /// ```
    pub fn validate_size(&self, old_size: ImageSize, new_size: ImageSize) -> bool {
        self.padded_size(old_size) == new_size
    }
}

/// Pads an image on all four sides, placing the source in the center of `dst`.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image where the padded output will be stored.
/// * `padding` - The amount of padding (in pixels) for all four sides defined in [`Padding2D`].
/// * `padding_mode` - The type of border handling to use defined in [`PaddingMode`].
/// * `constant_value` - The value used for constant padding, one per channel. It is
///   also used for replicate padding of an empty source, where there is nothing to repeat.
///
/// # Errors
///
/// Returns an error if the size of `dst` does not match with the expected size
/// i.e. after applying padding specified in argument `padding` on `src`.
///
/// # Example
///
/// ```rust
/// use photonlab_image::{ImageSize, Image};
/// use photonlab_imgproc::padding::{PaddingMode, Padding2D, spatial_padding};
///
/// let src = Image::<u8, 1>::new(ImageSize { width: 2, height: 2 }, vec![1, 2, 3, 4]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(ImageSize { width: 4, height: 4 }, 9).unwrap();
///
/// spatial_padding(&src, &mut dst, Padding2D::uniform(1), PaddingMode::Constant, [0u8]).unwrap();
///
/// assert_eq!(
///     dst.as_slice(),
///     &[0, 0, 0, 0, 0, 1, 2, 0, 0, 3, 4, 0, 0, 0, 0, 0]
/// );
/// ```
pub fn spatial_padding<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    padding: Padding2D,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if !padding.validate_size(src.size(), dst.size()) {
        let expected = padding.padded_size(src.size());
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            expected.width,
            expected.height,
        ));
    }

    let old_width = src.width();
    let old_height = src.height();
    let new_width = dst.width();
    if new_width == 0 {
        return Ok(());
    }

    let old_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(new_width * C)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let src_y = padding_mode.map_index(y as isize - padding.top as isize, old_height);
            dst_row
                .chunks_exact_mut(C)
                .enumerate()
                .for_each(|(x, dst_pixel)| {
                    let src_x =
                        padding_mode.map_index(x as isize - padding.left as isize, old_width);
                    match (src_y, src_x) {
                        (Some(sy), Some(sx)) => {
                            let offset = (sy * old_width + sx) * C;
                            dst_pixel.copy_from_slice(&old_data[offset..offset + C]);
                        }
                        _ => dst_pixel.copy_from_slice(&constant_value),
                    }
                });
        });

    Ok(())
}
