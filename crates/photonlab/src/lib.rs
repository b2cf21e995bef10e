#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use photonlab_image as image;

#[doc(inline)]
pub use photonlab_imgproc as imgproc;
