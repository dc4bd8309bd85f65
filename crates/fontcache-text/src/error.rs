use fontcache_render::{RasterError, RenderError};

use crate::codec::Codepoint;
use crate::packer::PackError;

/// Errors that can occur while caching or drawing glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// No rasterization source is attached, or it has been closed.
    SourceUnavailable,

    /// The source has no glyph for this codepoint.
    MissingGlyph(Codepoint),

    /// The source failed to render a glyph.
    Rasterization(String),

    /// A freshly grown atlas level still had no room for the glyph.
    AtlasFull {
        codepoint: Codepoint,
        level: usize,
    },

    /// The glyph is wider or taller than an entire atlas level.
    GlyphTooLarge {
        codepoint: Codepoint,
        width: i32,
        atlas_width: i32,
        atlas_height: i32,
    },

    /// Atlas levels must be installed in order.
    LevelOutOfRange {
        level: usize,
        levels: usize,
    },

    /// The render backend failed.
    Render(RenderError),

    /// Font loading failed.
    FontLoadError(String),

    /// Generic IO error.
    IoError(String),
}

impl std::fmt::Display for TextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextError::SourceUnavailable => write!(f, "Glyph source unavailable"),
            TextError::MissingGlyph(cp) => write!(f, "No glyph for codepoint {:#x}", cp),
            TextError::Rasterization(msg) => write!(f, "Glyph rasterization failed: {}", msg),
            TextError::AtlasFull { codepoint, level } => write!(
                f,
                "No room for codepoint {:#x} on new atlas level {}",
                codepoint, level
            ),
            TextError::GlyphTooLarge {
                codepoint,
                width,
                atlas_width,
                atlas_height,
            } => write!(
                f,
                "Glyph {:#x} is {} px wide but atlas levels are {}x{}",
                codepoint, width, atlas_width, atlas_height
            ),
            TextError::LevelOutOfRange { level, levels } => write!(
                f,
                "Cannot set atlas level {} on a font with {} levels",
                level, levels
            ),
            TextError::Render(err) => write!(f, "Render error: {}", err),
            TextError::FontLoadError(msg) => write!(f, "Failed to load font: {}", msg),
            TextError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for TextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextError::Render(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RenderError> for TextError {
    fn from(err: RenderError) -> Self {
        TextError::Render(err)
    }
}

impl From<RasterError> for TextError {
    fn from(err: RasterError) -> Self {
        match err {
            RasterError::Unavailable => TextError::SourceUnavailable,
            RasterError::MissingGlyph(cp) => TextError::MissingGlyph(cp),
            RasterError::Failed(msg) => TextError::Rasterization(msg),
        }
    }
}

impl From<std::io::Error> for TextError {
    fn from(err: std::io::Error) -> Self {
        TextError::IoError(err.to_string())
    }
}

impl TextError {
    pub(crate) fn from_pack(codepoint: Codepoint, err: PackError) -> Self {
        match err {
            PackError::Exhausted { next_level } => TextError::AtlasFull {
                codepoint,
                level: next_level.saturating_sub(1),
            },
            PackError::Oversized { width, atlas } => TextError::GlyphTooLarge {
                codepoint,
                width,
                atlas_width: atlas.width,
                atlas_height: atlas.height,
            },
        }
    }
}

/// Result type for text operations.
pub type TextResult<T> = Result<T, TextError>;
