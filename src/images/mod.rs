//! Images Module
//!
//! Decoding and cached loading of raster images.

mod decoded;
mod loader;

pub use decoded::DecodedImage;
pub use loader::{is_remote, ImageLoader};
