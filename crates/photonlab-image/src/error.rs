/// An error type for the image and image processing modules.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must share a size do not.
    #[error("Image size ({0}x{1}) does not match the expected size ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel data cannot be cast to the target type.
    #[error("Failed to cast image data to {0}")]
    CastError(String),

    /// Error when a pixel coordinate lies outside the image.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a kernel side length is not odd.
    #[error("Kernel size must be odd, got {0}")]
    InvalidKernelSize(usize),

    /// Error when the kernel coefficients do not fill a square of the given size.
    #[error("Kernel data length ({0}) does not match the kernel size ({1})")]
    InvalidKernelData(usize, usize),

    /// Error when the number of histogram bins is not supported.
    #[error("Invalid number of histogram bins: {0}")]
    InvalidHistogramBins(usize),

    /// Error when an intensity range is empty or inverted.
    #[error("Invalid intensity range: min ({0}) must be lower than max ({1})")]
    InvalidIntensityRange(f64, f64),

    /// Error when an angle bound is not a finite number.
    #[error("Invalid angle range: [{0}, {1}]")]
    InvalidAngleRange(f64, f64),

    /// Error when a probability lies outside [0, 1].
    #[error("Probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    /// Error when a region does not fit inside the image or is empty.
    #[error("Invalid region [{0}, {1}) x [{2}, {3}) for image of size {4}x{5}")]
    InvalidRegion(usize, usize, usize, usize, usize, usize),

    /// Error when the number of quantization bits is not supported.
    #[error("Number of quantization bits must be within [1, 32], got {0}")]
    InvalidQuantizationBits(u32),

    /// Error when two signals that must share a length do not.
    #[error("Signal length ({0}) does not match the expected length ({1})")]
    SignalLengthMismatch(usize, usize),

    /// Error when a noise standard deviation is negative or not finite.
    #[error("Invalid noise standard deviation: {0}")]
    InvalidStandardDeviation(f64),

    /// Error when a sampling frequency or duration is not a positive finite number.
    #[error("Invalid sampling parameters: duration {0}, frequency {1}")]
    InvalidSampling(f64, f64),
}
