//! Decoded raster images in the layout the compositor draws from.

use image::DynamicImage;
use tiny_skia::{IntSize, Pixmap};

/// A decoded image, stored as premultiplied RGBA.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixmap: Pixmap,
}

impl DecodedImage {
    /// Decodes encoded bytes (PNG, JPEG, GIF, WebP).
    ///
    /// Returns the decoder's message on failure.
    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        let image = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
        Self::from_dynamic(&image).ok_or_else(|| "image has zero width or height".to_string())
    }

    /// Converts to premultiplied RGBA, as tiny-skia expects.
    pub fn from_dynamic(image: &DynamicImage) -> Option<Self> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return None;
        }

        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = a as f32 / 255.0;
            data.push((r as f32 * alpha).round() as u8);
            data.push((g as f32 * alpha).round() as u8);
            data.push((b as f32 * alpha).round() as u8);
            data.push(a);
        }

        let size = IntSize::from_wh(width, height)?;
        Pixmap::from_vec(data, size).map(|pixmap| Self { pixmap })
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}
