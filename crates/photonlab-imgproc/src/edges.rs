use photonlab_image::{Image, ImageError};

use crate::gradient::{spatial_gradient, GradientMode};
use crate::parallel;

/// The value of an edge pixel in an edge map.
pub const EDGE: u8 = 255;

/// Mark the pixels whose gradient magnitude is strictly above a threshold.
///
/// # Arguments
///
/// * `magnitude` - The gradient magnitude with shape (H, W, 1).
/// * `dst` - The edge map with shape (H, W, 1), 255 for edges and 0 otherwise.
/// * `threshold` - A magnitude equal to the threshold is not an edge.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::edges::threshold_magnitude;
///
/// let magnitude = Image::<f64, 1>::new(ImageSize { width: 3, height: 1 }, vec![7.9, 8.0, 8.0001]).unwrap();
/// let mut edges = Image::<u8, 1>::from_size_val(magnitude.size(), 0).unwrap();
///
/// threshold_magnitude(&magnitude, &mut edges, 8.0).unwrap();
/// assert_eq!(edges.as_slice(), &[0, 0, 255]);
/// ```
pub fn threshold_magnitude(
    magnitude: &Image<f64, 1>,
    dst: &mut Image<u8, 1>,
    threshold: f64,
) -> Result<(), ImageError> {
    if magnitude.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            magnitude.cols(),
            magnitude.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows_val(magnitude, dst, |&m, out| {
        *out = if m > threshold { EDGE } else { 0 };
    });

    Ok(())
}

/// A closed range of gradient directions in degrees.
///
/// When `min > max` the range wraps around 0 degrees, e.g. `350..=10` holds
/// the angles `>= 350` together with the angles `<= 10`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRange {
    min: f64,
    max: f64,
}

impl AngleRange {
    /// Create a new angle range.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidAngleRange`] if a bound is NaN or infinite.
    pub fn new(min: f64, max: f64) -> Result<Self, ImageError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ImageError::InvalidAngleRange(min, max));
        }
        Ok(Self { min, max })
    }

    /// The lower bound in degrees.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// The upper bound in degrees.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether the range crosses 0 degrees.
    pub fn wraps(&self) -> bool {
        self.min > self.max
    }

    /// Check if an angle lies in the range, bounds included.
    ///
    /// # Example
    ///
    /// ```
    /// use photonlab_imgproc::edges::AngleRange;
    ///
    /// let range = AngleRange::new(350.0, 10.0).unwrap();
    /// assert!(range.contains(5.0));
    /// assert!(range.contains(350.0));
    /// assert!(!range.contains(180.0));
    /// ```
    #[inline]
    pub fn contains(&self, angle: f64) -> bool {
        if self.wraps() {
            angle >= self.min || angle <= self.max
        } else {
            angle >= self.min && angle <= self.max
        }
    }
}

/// Mark the pixels whose gradient direction lies in an angle range.
///
/// # Arguments
///
/// * `angle` - The gradient direction in degrees with shape (H, W, 1).
/// * `dst` - The edge map with shape (H, W, 1), 255 for edges and 0 otherwise.
/// * `range` - The accepted directions.
pub fn mask_direction(
    angle: &Image<f64, 1>,
    dst: &mut Image<u8, 1>,
    range: AngleRange,
) -> Result<(), ImageError> {
    if angle.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            angle.cols(),
            angle.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows_val(angle, dst, |&a, out| {
        *out = if range.contains(a) { EDGE } else { 0 };
    });

    Ok(())
}

/// Detect edges by thresholding the Sobel gradient magnitude.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1), of any numeric type.
/// * `dst` - The edge map with shape (H, W, 1).
/// * `threshold` - Pixels with a magnitude strictly above it are edges.
/// * `mode` - How the Sobel responses are computed.
///
/// # Example
///
/// ```
/// use photonlab_image::{Image, ImageSize};
/// use photonlab_imgproc::edges::sobel_edges;
/// use photonlab_imgproc::gradient::GradientMode;
///
/// let image = Image::<u8, 1>::from_size_val(ImageSize { width: 5, height: 5 }, 100).unwrap();
/// let mut edges = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// sobel_edges(&image, &mut edges, 50.0, GradientMode::Signed).unwrap();
/// assert_eq!(edges.get_pixel(2, 2, 0).unwrap(), &0);
/// ```
pub fn sobel_edges<T>(
    src: &Image<T, 1>,
    dst: &mut Image<u8, 1>,
    threshold: f64,
    mode: GradientMode,
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

    let field = spatial_gradient(src, mode)?;

    if let Some((lo, hi)) = field.magnitude_range() {
        log::debug!("gradient magnitude range: [{lo:.2}, {hi:.2}]");
    }

    threshold_magnitude(&field.magnitude, dst, threshold)?;

    log::debug!(
        "sobel edges above {threshold}: {}",
        EdgeStats::from_edge_map(dst)
    );

    Ok(())
}

/// Detect the pixels whose Sobel gradient points in a given direction.
///
/// The magnitude is not thresholded: flat regions have a direction of 0
/// degrees and are marked whenever the range holds 0.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1), of any numeric type.
/// * `dst` - The edge map with shape (H, W, 1).
/// * `range` - The accepted directions.
/// * `mode` - How the Sobel responses are computed.
pub fn directional_edges<T>(
    src: &Image<T, 1>,
    dst: &mut Image<u8, 1>,
    range: AngleRange,
    mode: GradientMode,
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

    let field = spatial_gradient(src, mode)?;
    mask_direction(&field.angle, dst, range)?;

    log::debug!(
        "directional edges in [{}, {}]: {}",
        range.min(),
        range.max(),
        EdgeStats::from_edge_map(dst)
    );

    Ok(())
}

/// Summary of an edge map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStats {
    /// Number of edge pixels.
    pub edge_pixels: usize,
    /// Number of pixels in the map.
    pub total_pixels: usize,
    /// Share of edge pixels in percent, 0 for an empty map.
    pub percentage: f64,
}

impl EdgeStats {
    /// Count the non-zero pixels of an edge map.
    pub fn from_edge_map(map: &Image<u8, 1>) -> Self {
        let edge_pixels = map.as_slice().iter().filter(|&&v| v != 0).count();
        let total_pixels = map.numel();
        let percentage = if total_pixels == 0 {
            0.0
        } else {
            100.0 * edge_pixels as f64 / total_pixels as f64
        };
        Self {
            edge_pixels,
            total_pixels,
            percentage,
        }
    }
}

impl std::fmt::Display for EdgeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}/{} edge pixels ({:.2}%)",
            self.edge_pixels, self.total_pixels, self.percentage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_threshold_is_strict() -> Result<(), ImageError> {
        let magnitude = Image::<f64, 1>::new([4, 1].into(), vec![0.0, 8.0, 8.0001, 100.0])?;
        let mut dst = Image::<u8, 1>::from_size_val(magnitude.size(), 7)?;
        threshold_magnitude(&magnitude, &mut dst, 8.0)?;
        assert_eq!(dst.as_slice(), &[0, 0, 255, 255]);
        Ok(())
    }

    #[test]
    fn test_threshold_extremes() -> Result<(), ImageError> {
        let magnitude = Image::<f64, 1>::new([3, 1].into(), vec![0.0, 1.0, 1e9])?;
        let mut dst = Image::<u8, 1>::from_size_val(magnitude.size(), 0)?;

        threshold_magnitude(&magnitude, &mut dst, f64::INFINITY)?;
        assert_eq!(dst.as_slice(), &[0, 0, 0]);

        threshold_magnitude(&magnitude, &mut dst, -1.0)?;
        assert_eq!(dst.as_slice(), &[255, 255, 255]);
        Ok(())
    }

    #[test]
    fn test_angle_range() -> Result<(), ImageError> {
        let range = AngleRange::new(45.0, 135.0)?;
        assert!(!range.wraps());
        assert!(range.contains(45.0));
        assert!(range.contains(90.0));
        assert!(range.contains(135.0));
        assert!(!range.contains(135.5));
        assert!(!range.contains(0.0));

        let wrapped = AngleRange::new(350.0, 10.0)?;
        assert!(wrapped.wraps());
        assert!(wrapped.contains(5.0));
        assert!(wrapped.contains(350.0));
        assert!(wrapped.contains(10.0));
        assert!(wrapped.contains(0.0));
        assert!(!wrapped.contains(180.0));
        assert!(!wrapped.contains(349.9));

        let degenerate = AngleRange::new(90.0, 90.0)?;
        assert!(degenerate.contains(90.0));
        assert!(!degenerate.contains(90.1));
        Ok(())
    }

    #[test]
    fn test_angle_range_rejects_non_finite() {
        assert!(matches!(
            AngleRange::new(f64::NAN, 10.0),
            Err(ImageError::InvalidAngleRange(_, _))
        ));
        assert_eq!(
            AngleRange::new(0.0, f64::INFINITY),
            Err(ImageError::InvalidAngleRange(0.0, f64::INFINITY))
        );
    }

    #[test]
    fn test_mask_direction() -> Result<(), ImageError> {
        let angle = Image::<f64, 1>::new([4, 1].into(), vec![5.0, 180.0, 350.0, 10.0])?;
        let mut dst = Image::<u8, 1>::from_size_val(angle.size(), 0)?;
        mask_direction(&angle, &mut dst, AngleRange::new(350.0, 10.0)?)?;
        assert_eq!(dst.as_slice(), &[255, 0, 255, 255]);
        Ok(())
    }

    #[test]
    fn test_sobel_edges_flat_interior() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([5, 5].into(), 100)?;
        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        for mode in [GradientMode::Clipped, GradientMode::Signed] {
            sobel_edges(&image, &mut dst, 50.0, mode)?;
            for r in 1..4 {
                for c in 1..4 {
                    assert_eq!(dst.get_pixel(c, r, 0)?, &0);
                }
            }
            assert!(dst.as_slice().iter().all(|&v| v == 0 || v == EDGE));
        }
        Ok(())
    }

    #[test]
    fn test_directional_edges_vertical_step() -> Result<(), ImageError> {
        // a dark to bright step along x points the gradient at 90 degrees
        let data = (0..5)
            .flat_map(|_| [0u8, 0, 255, 255, 255])
            .collect();
        let image = Image::<u8, 1>::new([5, 5].into(), data)?;
        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        directional_edges(&image, &mut dst, AngleRange::new(80.0, 100.0)?, GradientMode::Signed)?;
        assert_eq!(dst.get_pixel(1, 2, 0)?, &255);
        assert_eq!(dst.get_pixel(2, 2, 0)?, &255);
        // flat interior has an angle of 0
        assert_eq!(dst.get_pixel(3, 2, 0)?, &0);
        Ok(())
    }

    #[test]
    fn test_edge_stats() -> Result<(), ImageError> {
        let map = Image::<u8, 1>::new([4, 1].into(), vec![0, 255, 255, 0])?;
        let stats = EdgeStats::from_edge_map(&map);
        assert_eq!(stats.edge_pixels, 2);
        assert_eq!(stats.total_pixels, 4);
        assert_relative_eq!(stats.percentage, 50.0);
        assert_eq!(stats.to_string(), "2/4 edge pixels (50.00%)");

        let empty = Image::<u8, 1>::new([0, 3].into(), vec![])?;
        assert_eq!(EdgeStats::from_edge_map(&empty).percentage, 0.0);
        Ok(())
    }

    #[test]
    fn test_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        let mut dst = Image::<u8, 1>::from_size_val([3, 2].into(), 0)?;
        assert_eq!(
            sobel_edges(&image, &mut dst, 1.0, GradientMode::Clipped),
            Err(ImageError::InvalidImageSize(3, 3, 3, 2))
        );
        Ok(())
    }
}
