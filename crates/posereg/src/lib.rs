#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use posereg_3d as k3d;

#[doc(inline)]
pub use posereg_dataset as dataset;

#[doc(inline)]
pub use posereg_image as image;

#[doc(inline)]
pub use posereg_imgproc as imgproc;

#[doc(inline)]
pub use posereg_io as io;
