#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use blurrer_image as image;

#[doc(inline)]
pub use blurrer_imgproc as imgproc;

#[doc(inline)]
pub use blurrer_io as io;

/// Filter a decoded raster, keeping its channel layout.
pub mod run;
