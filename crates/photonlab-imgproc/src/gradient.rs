//! Sobel gradient magnitude and direction.
//!
//! The gradient is computed by correlating the image with the two 3x3 Sobel
//! kernels of [`crate::filter::kernels::sobel_kernels`] and combining the
//! responses per pixel:
//!
//! ```text
//! magnitude = sqrt(gx² + gy²)
//! angle     = (atan2(gy, gx) in degrees + 360) mod 360
//! ```

use photonlab_image::{Image, ImageError};

use crate::filter::{self, kernels};
use crate::parallel;

/// How the two Sobel responses are computed before they are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientMode {
    /// Each response goes through [`filter::convolve`], i.e. it is clipped to
    /// `[0, 255]` and truncated to 8 bits before the magnitude and angle are
    /// computed. Negative derivatives become zero, so angles stay in `[0, 90]`.
    ///
    /// The clipped responses are combined in `f64`. Squaring them in 8-bit
    /// arithmetic would wrap modulo 256 (a 255 response would give a magnitude
    /// of 1), which is not reproduced.
    #[default]
    Clipped,
    /// Each response is the full precision signed output of [`filter::filter2d`].
    Signed,
}

impl GradientMode {
    /// The name of the mode as used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            GradientMode::Clipped => "clipped",
            GradientMode::Signed => "signed",
        }
    }
}

impl std::fmt::Display for GradientMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for GradientMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clipped" => Ok(GradientMode::Clipped),
            "signed" => Ok(GradientMode::Signed),
            _ => Err(format!(
                "unknown gradient mode '{s}', expected 'clipped' or 'signed'"
            )),
        }
    }
}

/// Gradient magnitude and direction of an image.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    /// Non-negative gradient magnitude.
    pub magnitude: Image<f64, 1>,
    /// Gradient direction in degrees within `[0, 360)`.
    pub angle: Image<f64, 1>,
}

impl GradientField {
    /// The `(min, max)` of the magnitude, or `None` for an empty image.
    pub fn magnitude_range(&self) -> Option<(f64, f64)> {
        let data = self.magnitude.as_slice();
        let first = *data.first()?;
        Some(
            data.iter()
                .fold((first, first), |(lo, hi), &m| (lo.min(m), hi.max(m))),
        )
    }
}

/// Compute the horizontal and vertical Sobel responses of an image.
///
/// # Returns
///
/// The `(gx, gy)` responses, `gx` from the horizontal kernel and `gy` from the
/// vertical kernel, as floating point images of the size of `src`.
pub fn sobel_derivatives<T>(
    src: &Image<T, 1>,
    mode: GradientMode,
) -> Result<(Image<f64, 1>, Image<f64, 1>), ImageError>
where
    T: Copy + num_traits::NumCast,
{
    let (kernel_x, kernel_y) = kernels::sobel_kernels();

    let mut gx = Image::<f64, 1>::from_size_val(src.size(), 0.0)?;
    let mut gy = Image::<f64, 1>::from_size_val(src.size(), 0.0)?;

    match mode {
        GradientMode::Clipped => {
            let mut response = Image::<u8, 1>::from_size_val(src.size(), 0)?;

            filter::convolve(src, &mut response, &kernel_x)?;
            parallel::par_iter_rows_val(&response, &mut gx, |&v, out| *out = v as f64);

            filter::convolve(src, &mut response, &kernel_y)?;
            parallel::par_iter_rows_val(&response, &mut gy, |&v, out| *out = v as f64);
        }
        GradientMode::Signed => {
            filter::filter2d(src, &mut gx, &kernel_x)?;
            filter::filter2d(src, &mut gy, &kernel_y)?;
        }
    }

    Ok((gx, gy))
}

/// Map an `atan2` result in radians to degrees within `[0, 360)`.
#[inline]
pub fn normalize_angle_degrees(radians: f64) -> f64 {
    let angle = (radians.to_degrees() + 360.0) % 360.0;
    // -0.0 and values that round up to 360 both land on 0
    if angle >= 360.0 || angle == 0.0 {
        0.0
    } else {
        angle
    }
}

/// Compute the gradient magnitude and direction of an image with Sobel operators.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1), of any numeric type.
/// * `mode` - How the Sobel responses are computed, see [`GradientMode`].
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::gradient::{spatial_gradient, GradientMode};
///
/// let image = Image::<u8, 1>::from_size_val(ImageSize { width: 4, height: 4 }, 10).unwrap();
/// let field = spatial_gradient(&image, GradientMode::Signed).unwrap();
///
/// assert!(field.magnitude.as_slice().iter().all(|&m| m >= 0.0));
/// assert!(field.angle.as_slice().iter().all(|&a| (0.0..360.0).contains(&a)));
/// ```
pub fn spatial_gradient<T>(src: &Image<T, 1>, mode: GradientMode) -> Result<GradientField, ImageError>
where
    T: Copy + num_traits::NumCast,
{
    let (gx, gy) = sobel_derivatives(src, mode)?;

    let mut magnitude = Image::<f64, 1>::from_size_val(src.size(), 0.0)?;
    parallel::par_iter_rows_val_two(&gx, &gy, &mut magnitude, |&x, &y, out| {
        *out = (x * x + y * y).sqrt();
    });

    let mut angle = Image::<f64, 1>::from_size_val(src.size(), 0.0)?;
    parallel::par_iter_rows_val_two(&gx, &gy, &mut angle, |&x, &y, out| {
        *out = normalize_angle_degrees(y.atan2(x));
    });

    Ok(GradientField { magnitude, angle })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use photonlab_image::ImageSize;

    fn step_image(width: usize, height: usize, step: usize) -> Result<Image<u8, 1>, ImageError> {
        let data = (0..height)
            .flat_map(|_| (0..width).map(move |c| if c < step { 0 } else { 255 }))
            .collect();
        Image::new(ImageSize { width, height }, data)
    }

    #[test]
    fn test_normalize_angle_degrees() {
        assert_eq!(normalize_angle_degrees(0.0), 0.0);
        assert_eq!(normalize_angle_degrees(-0.0), 0.0);
        assert_relative_eq!(normalize_angle_degrees(std::f64::consts::FRAC_PI_2), 90.0);
        assert_relative_eq!(normalize_angle_degrees(std::f64::consts::PI), 180.0);
        assert_relative_eq!(normalize_angle_degrees(-std::f64::consts::FRAC_PI_2), 270.0);
        assert!(normalize_angle_degrees(-1e-18) < 360.0);
    }

    #[test]
    fn test_gradient_mode_names() {
        assert_eq!(GradientMode::default(), GradientMode::Clipped);
        for mode in [GradientMode::Clipped, GradientMode::Signed] {
            assert_eq!(mode.to_string().parse::<GradientMode>(), Ok(mode));
        }
        assert!("unclipped".parse::<GradientMode>().is_err());
    }

    #[test]
    fn test_gradient_flat_image() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([6, 6].into(), 80)?;
        let field = spatial_gradient(&image, GradientMode::Signed)?;

        for r in 1..5 {
            for c in 1..5 {
                assert_eq!(field.magnitude.get_pixel(c, r, 0)?, &0.0);
                assert_eq!(field.angle.get_pixel(c, r, 0)?, &0.0);
            }
        }
        Ok(())
    }

    #[test]
    fn test_gradient_signed_step() -> Result<(), ImageError> {
        let image = step_image(6, 5, 3)?;
        let (gx, gy) = sobel_derivatives(&image, GradientMode::Signed)?;

        // interior pixels next to the step see the full vertical edge response
        assert_eq!(gy.get_pixel(2, 2, 0)?, &1020.0);
        assert_eq!(gy.get_pixel(3, 2, 0)?, &1020.0);
        assert_eq!(gx.get_pixel(2, 2, 0)?, &0.0);

        let field = spatial_gradient(&image, GradientMode::Signed)?;
        assert_relative_eq!(*field.magnitude.get_pixel(2, 2, 0)?, 1020.0);
        assert_relative_eq!(*field.angle.get_pixel(2, 2, 0)?, 90.0);

        // the last column falls back to zero padding: a negative response
        assert_eq!(gy.get_pixel(5, 2, 0)?, &-1020.0);
        assert_relative_eq!(*field.angle.get_pixel(5, 2, 0)?, 270.0);
        Ok(())
    }

    #[test]
    fn test_gradient_clipped_step() -> Result<(), ImageError> {
        let image = step_image(6, 5, 3)?;
        let (_, gy) = sobel_derivatives(&image, GradientMode::Clipped)?;

        assert_eq!(gy.get_pixel(2, 2, 0)?, &255.0);
        // negative responses are clipped away
        assert_eq!(gy.get_pixel(5, 2, 0)?, &0.0);

        let field = spatial_gradient(&image, GradientMode::Clipped)?;
        assert!(field
            .angle
            .as_slice()
            .iter()
            .all(|&a| (0.0..=90.0).contains(&a)));
        Ok(())
    }

    #[test]
    fn test_gradient_clipped_magnitude_does_not_wrap() -> Result<(), ImageError> {
        let image = step_image(10, 7, 5)?;
        let field = spatial_gradient(&image, GradientMode::Clipped)?;

        let row: Vec<f64> = (0..10)
            .map(|c| field.magnitude.get_pixel(c, 3, 0).copied())
            .collect::<Result<_, _>>()?;
        assert_eq!(
            row,
            vec![0.0, 0.0, 0.0, 0.0, 255.0, 255.0, 0.0, 0.0, 0.0, 0.0]
        );
        Ok(())
    }

    #[test]
    fn test_gradient_field_invariants() -> Result<(), ImageError> {
        let data = (0..64).map(|i: u32| ((i * 37 + 11) % 256) as u8).collect();
        let image = Image::<u8, 1>::new([8, 8].into(), data)?;

        for mode in [GradientMode::Clipped, GradientMode::Signed] {
            let field = spatial_gradient(&image, mode)?;
            assert_eq!(field.magnitude.size(), image.size());
            assert_eq!(field.angle.size(), image.size());
            assert!(field.magnitude.as_slice().iter().all(|&m| m >= 0.0));
            assert!(field
                .angle
                .as_slice()
                .iter()
                .all(|&a| (0.0..360.0).contains(&a)));
        }
        Ok(())
    }

    #[test]
    fn test_magnitude_range() -> Result<(), ImageError> {
        let image = step_image(6, 5, 3)?;
        let field = spatial_gradient(&image, GradientMode::Clipped)?;
        let (lo, hi) = field.magnitude_range().expect("non empty");
        assert_eq!(lo, 0.0);
        assert_relative_eq!(hi, (2.0f64 * 255.0 * 255.0).sqrt());

        let empty = Image::<u8, 1>::new([0, 0].into(), vec![])?;
        let field = spatial_gradient(&empty, GradientMode::Clipped)?;
        assert_eq!(field.magnitude_range(), None);
        Ok(())
    }
}
