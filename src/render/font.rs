//! Font loading, text measurement and glyph outlines.
//!
//! Glyphs are emitted as tiny-skia paths built from ttf-parser outlines, in
//! font design units (y-up) and then mapped to device pixels.

use std::path::Path;
use std::sync::Arc;

use tiny_skia::{Path as SkPath, PathBuilder, Transform};
use tracing::{info, warn};

/// Converts ttf-parser glyph outlines to tiny-skia paths.
struct GlyphOutlineBuilder {
    builder: PathBuilder,
}

impl ttf_parser::OutlineBuilder for GlyphOutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Maps design units to device pixels, flipping Y for tiny-skia.
fn glyph_transform(scale: f32, x: f32, baseline: f32) -> Transform {
    Transform::from_row(scale, 0.0, 0.0, -scale, x, baseline)
}

/// A parsed TrueType/OpenType font.
///
/// Holds the raw bytes; the face is re-parsed per call, which only reads
/// table offsets.
#[derive(Clone)]
pub struct Font {
    data: Arc<Vec<u8>>,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Font {
    /// Returns `None` if the bytes are not a parsable font.
    pub fn from_bytes(data: Vec<u8>) -> Option<Self> {
        ttf_parser::Face::parse(&data, 0).ok()?;
        Some(Self {
            data: Arc::new(data),
        })
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, 0).ok()
    }

    /// Width in pixels of `text` set at `size` px.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        let scale = size / face.units_per_em() as f32;

        text.chars()
            .filter_map(|c| face.glyph_index(c))
            .filter_map(|gid| face.glyph_hor_advance(gid))
            .map(|advance| advance as f32 * scale)
            .sum()
    }

    /// Device-space outlines of `text`, pen starting at `(x, baseline)`.
    ///
    /// Characters missing from the font advance nothing and draw nothing.
    pub fn outlines(&self, text: &str, size: f32, x: f32, baseline: f32) -> Vec<SkPath> {
        let Some(face) = self.face() else {
            return Vec::new();
        };
        let scale = size / face.units_per_em() as f32;

        let mut pen_x = x;
        let mut paths = Vec::new();
        for c in text.chars() {
            let Some(gid) = face.glyph_index(c) else {
                continue;
            };

            let mut builder = GlyphOutlineBuilder {
                builder: PathBuilder::new(),
            };
            if face.outline_glyph(gid, &mut builder).is_some() {
                if let Some(path) = builder
                    .builder
                    .finish()
                    .and_then(|p| p.transform(glyph_transform(scale, pen_x, baseline)))
                {
                    paths.push(path);
                }
            }

            pen_x += face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale;
        }
        paths
    }
}

/// The two faces cards are set in.
#[derive(Debug, Clone, Default)]
pub struct Fonts {
    pub regular: Option<Font>,
    pub bold: Option<Font>,
}

impl Fonts {
    /// Loads `arial.ttf` and `Rubik-Bold.ttf` from `fonts_dir`.
    ///
    /// Missing or unreadable files are logged; text set in a missing face is
    /// skipped rather than failing the render.
    pub fn load(fonts_dir: &Path) -> Self {
        let fonts = Self {
            regular: load_font(&fonts_dir.join("arial.ttf")),
            bold: load_font(&fonts_dir.join("Rubik-Bold.ttf")),
        };
        if fonts.regular.is_none() && fonts.bold.is_none() {
            warn!(
                "No fonts found in {}; cards will be rendered without text",
                fonts_dir.display()
            );
        }
        fonts
    }

    /// Regular face, falling back to bold.
    pub fn regular(&self) -> Option<&Font> {
        self.regular.as_ref().or(self.bold.as_ref())
    }

    /// Bold face, falling back to regular.
    pub fn bold(&self) -> Option<&Font> {
        self.bold.as_ref().or(self.regular.as_ref())
    }
}

fn load_font(path: &Path) -> Option<Font> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let font = Font::from_bytes(bytes);
            match &font {
                Some(_) => info!("Loaded font {}", path.display()),
                None => warn!("{} is not a valid font", path.display()),
            }
            font
        }
        Err(e) => {
            warn!("Font {} unavailable: {}", path.display(), e);
            None
        }
    }
}
