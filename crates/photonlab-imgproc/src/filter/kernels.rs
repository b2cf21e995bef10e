use std::str::FromStr;

use photonlab_image::ImageError;

/// A square 2D filter kernel with an odd side length.
///
/// Coefficients are stored row-major and applied as-is, without flipping.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    size: usize,
    data: Vec<f64>,
}

impl Kernel {
    /// Create a new kernel from its side length and row-major coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidKernelSize`] if `size` is even (including zero) and
    /// [`ImageError::InvalidKernelData`] if `data` does not hold `size * size` values.
    ///
    /// # Example
    ///
    /// ```
    /// use photonlab_imgproc::filter::kernels::Kernel;
    ///
    /// let kernel = Kernel::new(3, vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
    /// assert_eq!(kernel.radius(), 1);
    ///
    /// assert!(Kernel::new(2, vec![0.25; 4]).is_err());
    /// ```
    pub fn new(size: usize, data: Vec<f64>) -> Result<Self, ImageError> {
        if size % 2 == 0 {
            return Err(ImageError::InvalidKernelSize(size));
        }

        if data.len() != size * size {
            return Err(ImageError::InvalidKernelData(data.len(), size * size));
        }

        Ok(Self { size, data })
    }

    /// The identity kernel: one at the center, zero elsewhere.
    pub fn identity(size: usize) -> Result<Self, ImageError> {
        if size % 2 == 0 {
            return Err(ImageError::InvalidKernelSize(size));
        }
        let mut data = vec![0.0; size * size];
        data[size * size / 2] = 1.0;
        Self::new(size, data)
    }

    fn from_rows<const N: usize>(rows: [[f64; N]; N], scale: f64) -> Self {
        Self {
            size: N,
            data: rows.iter().flatten().map(|v| v * scale).collect(),
        }
    }

    /// The side length of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The half width of the kernel, i.e. the amount of padding it needs.
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// The row-major coefficients.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The coefficient at `(row, col)`, if inside the kernel.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(self.data[row * self.size + col])
    }

    /// The sum of all coefficients.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// The fixed 3x3 kernels of the filter bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KernelPreset {
    /// Mean of the 3x3 neighborhood.
    Box,
    /// Binomial approximation of a gaussian, `[1 2 1]^T [1 2 1] / 16`.
    Gaussian,
    /// Vertical derivative, responds to horizontal edges.
    SobelHorizontal,
    /// Horizontal derivative, responds to vertical edges.
    SobelVertical,
    /// Laplacian based sharpening.
    Sharpening,
    /// Directional relief.
    Emboss,
}

impl KernelPreset {
    /// Every preset, in filter bank order.
    pub const ALL: [KernelPreset; 6] = [
        KernelPreset::Box,
        KernelPreset::Gaussian,
        KernelPreset::SobelHorizontal,
        KernelPreset::SobelVertical,
        KernelPreset::Sharpening,
        KernelPreset::Emboss,
    ];

    /// The name of the preset as used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            KernelPreset::Box => "box",
            KernelPreset::Gaussian => "gaussian",
            KernelPreset::SobelHorizontal => "sobel_horizontal",
            KernelPreset::SobelVertical => "sobel_vertical",
            KernelPreset::Sharpening => "sharpening",
            KernelPreset::Emboss => "emboss",
        }
    }

    /// Build the kernel coefficients.
    pub fn kernel(&self) -> Kernel {
        match self {
            KernelPreset::Box => Kernel::from_rows([[1.0; 3]; 3], 1.0 / 9.0),
            KernelPreset::Gaussian => Kernel::from_rows(
                [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]],
                1.0 / 16.0,
            ),
            KernelPreset::SobelHorizontal => Kernel::from_rows(
                [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]],
                1.0,
            ),
            KernelPreset::SobelVertical => Kernel::from_rows(
                [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]],
                1.0,
            ),
            KernelPreset::Sharpening => Kernel::from_rows(
                [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]],
                1.0,
            ),
            KernelPreset::Emboss => Kernel::from_rows(
                [[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]],
                1.0,
            ),
        }
    }
}

impl std::fmt::Display for KernelPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KernelPreset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = KernelPreset::ALL.iter().map(|p| p.name()).collect();
                format!("unknown filter '{s}', expected one of: {}", names.join(", "))
            })
    }
}

/// The full filter bank, in [`KernelPreset::ALL`] order.
pub fn filter_bank() -> Vec<(KernelPreset, Kernel)> {
    KernelPreset::ALL
        .into_iter()
        .map(|preset| (preset, preset.kernel()))
        .collect()
}

/// Create the 3x3 sobel kernels.
///
/// # Returns
///
/// The `(horizontal, vertical)` kernels. The horizontal kernel differentiates
/// along the rows and the vertical kernel along the columns.
pub fn sobel_kernels() -> (Kernel, Kernel) {
    (
        KernelPreset::SobelHorizontal.kernel(),
        KernelPreset::SobelVertical.kernel(),
    )
}
