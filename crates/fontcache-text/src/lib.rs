//! fontcache text - glyph atlas caching and text layout
//!
//! Glyphs are rasterized once, packed into atlas textures and drawn from
//! there on every later call:
//! - A glyph map keyed by UTF-8 codepoint finds cached glyphs
//! - A shelf packer places new glyphs on the current atlas level, and a new
//!   level is allocated when it fills up
//! - Fonts preload a loading string up front and rasterize anything else
//!   lazily on first use
//! - Layout wraps text greedily by words, aligns it and answers caret and
//!   hit-test queries
//!
//! ## Quick Start
//!
//! ```rust
//! use fontcache_render::{Rect, SoftwareBackend, Vec2};
//! use fontcache_test_utils::MockRasterizer;
//! use fontcache_text::{Effect, Font, FontConfig, FormatBuffer, TextAlign};
//!
//! let mut backend = SoftwareBackend::new(640, 480);
//! let mut font = Font::new(FontConfig::default());
//! font.load(&mut backend, MockRasterizer::monospace(16, 8)).unwrap();
//!
//! let mut buf = FormatBuffer::new();
//! let score = 1200;
//! font.draw(&mut backend, Vec2::new(10.0, 10.0), buf.format(format_args!("Score: {}", score)));
//!
//! let effect = Effect::default().with_align(TextAlign::Center);
//! font.draw_effect(&mut backend, Vec2::new(320.0, 40.0), effect, "centered");
//!
//! let area = font.draw_box(&mut backend, Rect::new(10, 80, 120, 200), "wrapped inside a box");
//! assert_eq!(area, Rect::new(10, 80, 120, 200));
//! ```
//!
//! ## Features
//!
//! - **cosmic** (default): [`CosmicRasterizer`], a glyph source that renders
//!   system or bundled fonts through cosmic-text

pub mod atlas;
pub mod cache;
pub mod codec;
#[cfg(feature = "cosmic")]
pub mod cosmic;
pub mod draw;
pub mod error;
pub mod font;
pub mod format;
pub mod glyph_map;
pub mod layout;
pub mod measure;
pub mod packer;
pub mod preload;
pub mod utf8;

pub use atlas::{AtlasLevel, AtlasLevels};
pub use cache::GlyphCache;
pub use codec::{Codepoint, Codepoints, EncodedCodepoint, codepoints, decode, encode};
pub use error::{TextError, TextResult};
pub use font::{Effect, Font, FontConfig, TextAlign};
pub use format::FormatBuffer;
pub use glyph_map::{GlyphEntry, GlyphId, GlyphMap};
pub use layout::break_lines;
pub use packer::{AtlasPacker, PackError, PackingCursor};
pub use preload::PreloadReport;

#[cfg(feature = "cosmic")]
pub use cosmic::{CosmicRasterizer, FontAttributes, FontDatabase, FontStyle, FontSystem, FontWeight};
