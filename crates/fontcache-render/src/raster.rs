use crate::bitmap::Bitmap;
use crate::color::Color;

/// Vertical metrics reported by a rasterization source, in pixels.
///
/// `descent` is the positive distance from the baseline to the lowest
/// descender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontMetrics {
    pub height: i32,
    pub ascent: i32,
    pub descent: i32,
}

impl FontMetrics {
    pub const fn new(height: i32, ascent: i32, descent: i32) -> Self {
        Self {
            height,
            ascent,
            descent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// The source has been closed or was never attached.
    Unavailable,
    /// The source has no glyph for this codepoint.
    MissingGlyph(u32),
    /// The source failed for another reason.
    Failed(String),
}

impl std::fmt::Display for RasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterError::Unavailable => write!(f, "Rasterization source unavailable"),
            RasterError::MissingGlyph(cp) => write!(f, "No glyph for codepoint {:#x}", cp),
            RasterError::Failed(msg) => write!(f, "Rasterization failed: {}", msg),
        }
    }
}

impl std::error::Error for RasterError {}

/// A source of glyph images.
///
/// Codepoints are the packed UTF-8 keys used by the glyph cache: the UTF-8
/// bytes of one character, most significant byte first.
pub trait GlyphRasterizer {
    fn metrics(&self) -> FontMetrics;

    /// Render one glyph cell, `line height` pixels tall and as wide as the
    /// glyph's advance.
    fn rasterize(&mut self, codepoint: u32, color: Color) -> Result<Bitmap, RasterError>;
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for Box<R> {
    fn metrics(&self) -> FontMetrics {
        (**self).metrics()
    }

    fn rasterize(&mut self, codepoint: u32, color: Color) -> Result<Bitmap, RasterError> {
        (**self).rasterize(codepoint, color)
    }
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for &mut R {
    fn metrics(&self) -> FontMetrics {
        (**self).metrics()
    }

    fn rasterize(&mut self, codepoint: u32, color: Color) -> Result<Bitmap, RasterError> {
        (**self).rasterize(codepoint, color)
    }
}
