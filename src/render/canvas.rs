//! Raster canvas over a tiny-skia pixmap.
//!
//! Offers the handful of primitives the cards need: rect and circle fills,
//! scaled image blits, circular avatar clips, text runs, and PNG encoding.

use tiny_skia::{
    Color, FillRule, FilterQuality, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Transform,
};

use crate::error::{AppError, Result};
use crate::images::DecodedImage;
use crate::render::Font;

/// Builds an opaque color from `0xRRGGBB`.
pub fn rgb(hex: u32) -> Color {
    Color::from_rgba8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 255)
}

/// Horizontal anchor of a text run relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A drawing surface.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            AppError::Internal(format!("invalid canvas size {}x{}", width, height))
        })?;
        Ok(Self { pixmap })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn fill(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    /// Fills a rectangle; degenerate rectangles draw nothing.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let paint = solid(color);
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };
        let paint = solid(color);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Draws `image` scaled into the `width` x `height` box at `(x, y)`.
    pub fn draw_image(&mut self, image: &DecodedImage, x: f32, y: f32, width: f32, height: f32) {
        self.blit(image, x, y, width, height, None);
    }

    /// Draws `image` into a `size` square clipped to its inscribed circle.
    pub fn draw_image_in_circle(&mut self, image: &DecodedImage, x: f32, y: f32, size: f32) {
        let radius = size / 2.0;
        let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
            return;
        };
        let Some(circle) = PathBuilder::from_circle(x + radius, y + radius, radius) else {
            return;
        };
        mask.fill_path(&circle, FillRule::Winding, true, Transform::identity());

        self.blit(image, x, y, size, size, Some(&mask));
    }

    /// Draws a round avatar with a ring of `outline_width` around it.
    ///
    /// `None` draws the ring around a flat placeholder disc.
    pub fn draw_avatar(
        &mut self,
        image: Option<&DecodedImage>,
        x: f32,
        y: f32,
        size: f32,
        outline: Color,
        outline_width: f32,
    ) {
        let radius = size / 2.0;
        let (cx, cy) = (x + radius, y + radius);

        self.fill_circle(cx, cy, radius + outline_width, outline);
        match image {
            Some(image) => self.draw_image_in_circle(image, x, y, size),
            None => self.fill_circle(cx, cy, radius, rgb(PLACEHOLDER)),
        }
    }

    /// Width of `text` in `font` at `size` px; zero without a font.
    pub fn measure_text(font: Option<&Font>, text: &str, size: f32) -> f32 {
        font.map(|f| f.measure(text, size)).unwrap_or(0.0)
    }

    /// Draws a single text run with its baseline at `y`.
    ///
    /// Without a font nothing is drawn.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_text(
        &mut self,
        font: Option<&Font>,
        text: &str,
        size: f32,
        x: f32,
        y: f32,
        align: TextAlign,
        color: Color,
    ) {
        let Some(font) = font else {
            return;
        };

        let start = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - font.measure(text, size) / 2.0,
            TextAlign::Right => x - font.measure(text, size),
        };

        let paint = solid(color);
        for glyph in font.outlines(text, size, start, y) {
            self.pixmap
                .fill_path(&glyph, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    /// Encodes the canvas as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| AppError::Internal(format!("PNG encoding failed: {}", e)))
    }

    fn blit(
        &mut self,
        image: &DecodedImage,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        mask: Option<&Mask>,
    ) {
        if image.width() == 0 || image.height() == 0 || width <= 0.0 || height <= 0.0 {
            return;
        }

        let sx = width / image.width() as f32;
        let sy = height / image.height() as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };

        self.pixmap.draw_pixmap(
            0,
            0,
            image.pixmap().as_ref(),
            &paint,
            Transform::from_row(sx, 0.0, 0.0, sy, x, y),
            mask,
        );
    }
}

/// Fill used where an avatar could not be loaded at all.
const PLACEHOLDER: u32 = 0x5865f2;

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}
