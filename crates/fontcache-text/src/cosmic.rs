//! A [`GlyphRasterizer`] backed by cosmic-text.
//!
//! Each codepoint is shaped on its own into a one-line buffer and rendered
//! with swash into a cell as wide as the glyph's advance and as tall as the
//! line, with the baseline at the font's ascent.

use std::sync::Arc;

use cosmic_text::{Attrs, Buffer, Metrics, Shaping, SwashCache, SwashContent, fontdb};
use fontcache_core::profiling::profile_function;
use fontcache_render::{Bitmap, Color, FontMetrics, GlyphRasterizer, RasterError, Rgba8};
use parking_lot::RwLock;

use crate::codec::char_of;
use crate::error::TextResult;

/// Font faces a [`FontSystem`] can choose from.
///
/// Loading only indexes faces. Glyph outlines are read when a rasterizer
/// first asks for them.
pub struct FontDatabase {
    inner: fontdb::Database,
}

impl FontDatabase {
    /// Index every font installed on this machine.
    pub fn new() -> Self {
        let mut inner = fontdb::Database::new();
        inner.load_system_fonts();
        tracing::debug!("Indexed {} system font faces", inner.len());
        Self { inner }
    }

    /// No faces at all; fill it with the `load_*` methods.
    pub fn empty() -> Self {
        Self {
            inner: fontdb::Database::new(),
        }
    }

    /// Index the faces of an in-memory font file or collection and return
    /// how many were added. Bytes that are not a font add nothing.
    pub fn load_font_data(&mut self, data: Vec<u8>) -> usize {
        self.indexing(|db| {
            db.load_font_source(fontdb::Source::Binary(Arc::new(data)));
        })
    }

    pub fn load_font_file(&mut self, path: impl AsRef<std::path::Path>) -> TextResult<()> {
        self.inner.load_font_file(path)?;
        Ok(())
    }

    /// Index every font file under `path`, recursively, and return how many
    /// faces were added. A missing directory adds nothing.
    pub fn load_fonts_dir(&mut self, path: impl AsRef<std::path::Path>) -> usize {
        self.indexing(|db| db.load_fonts_dir(path))
    }

    fn indexing(&mut self, load: impl FnOnce(&mut fontdb::Database)) -> usize {
        let before = self.inner.len();
        load(&mut self.inner);
        let added = self.inner.len().saturating_sub(before);
        tracing::trace!("Indexed {} font faces", added);
        added
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.inner
            .faces()
            .any(|face| face.families.iter().any(|(name, _)| name == family))
    }

    /// Family names, sorted and deduplicated.
    pub fn list_families(&self) -> Vec<String> {
        let families: std::collections::BTreeSet<&str> = self
            .inner
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.as_str()))
            .collect();
        families.into_iter().map(String::from).collect()
    }

    /// Number of indexed faces.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// The cosmic-text font system every [`CosmicRasterizer`] shapes with.
///
/// Clones share one system, so faces it has already parsed are reused by
/// every rasterizer built from it.
#[derive(Clone)]
pub struct FontSystem {
    inner: Arc<RwLock<cosmic_text::FontSystem>>,
}

impl FontSystem {
    /// Takes ownership of `db`. Fallback fonts follow the system locale.
    pub fn new(db: FontDatabase) -> Self {
        let locale = sys_locale::get_locale().unwrap_or_else(|| String::from("en-US"));
        tracing::debug!("Creating font system for locale {}", locale);
        Self {
            inner: Arc::new(RwLock::new(cosmic_text::FontSystem::new_with_locale_and_db(
                locale, db.inner,
            ))),
        }
    }

    pub fn with_system_fonts() -> Self {
        Self::new(FontDatabase::new())
    }

    pub(crate) fn inner(&self) -> Arc<RwLock<cosmic_text::FontSystem>> {
        Arc::clone(&self.inner)
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::with_system_fonts()
    }
}

/// Weight on the CSS scale, 100 (thin) to 900 (black).
///
/// The nearest weight the family provides is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const LIGHT: Self = Self(300);
    pub const NORMAL: Self = Self(400);
    pub const MEDIUM: Self = Self(500);
    pub const BOLD: Self = Self(700);

    fn to_cosmic(self) -> cosmic_text::Weight {
        cosmic_text::Weight(self.0)
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    /// Slanted upright glyphs; families without one fall back to italic.
    Oblique,
}

impl FontStyle {
    fn to_cosmic(self) -> cosmic_text::Style {
        match self {
            FontStyle::Normal => cosmic_text::Style::Normal,
            FontStyle::Italic => cosmic_text::Style::Italic,
            FontStyle::Oblique => cosmic_text::Style::Oblique,
        }
    }
}

/// Family, weight and style selecting the face a rasterizer renders with.
#[derive(Debug, Clone, PartialEq)]
pub struct FontAttributes {
    pub family: String,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl FontAttributes {
    /// Generic families ("sans-serif", "serif", "monospace") resolve to
    /// whatever the system maps them to.
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::NORMAL,
            style: FontStyle::Normal,
        }
    }

    pub fn sans_serif() -> Self {
        Self::new("sans-serif")
    }

    pub fn serif() -> Self {
        Self::new("serif")
    }

    pub fn monospace() -> Self {
        Self::new("monospace")
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub(crate) fn to_cosmic(&self) -> Attrs<'_> {
        let family = match self.family.as_str() {
            "sans-serif" => cosmic_text::Family::SansSerif,
            "serif" => cosmic_text::Family::Serif,
            "monospace" => cosmic_text::Family::Monospace,
            name => cosmic_text::Family::Name(name),
        };
        Attrs::new()
            .family(family)
            .weight(self.weight.to_cosmic())
            .style(self.style.to_cosmic())
    }
}

impl Default for FontAttributes {
    fn default() -> Self {
        Self::sans_serif()
    }
}

/// Rasterizes single codepoints with cosmic-text and swash.
pub struct CosmicRasterizer {
    font_system: Arc<RwLock<cosmic_text::FontSystem>>,
    swash_cache: SwashCache,
    attrs: FontAttributes,
    metrics: Metrics,
    font_metrics: FontMetrics,
    closed: bool,
}

impl CosmicRasterizer {
    /// Line height defaults to 1.2 × the font size.
    pub fn new(font_system: &FontSystem, attrs: FontAttributes, font_size: f32) -> Self {
        Self::with_line_height(font_system, attrs, font_size, font_size * 1.2)
    }

    pub fn with_line_height(
        font_system: &FontSystem,
        attrs: FontAttributes,
        font_size: f32,
        line_height: f32,
    ) -> Self {
        let metrics = Metrics::new(font_size, line_height);
        let font_system = font_system.inner();
        let font_metrics = measure_line(&font_system, &attrs, metrics);
        tracing::debug!(
            "Cosmic rasterizer for {:?} at {}px: {:?}",
            attrs.family,
            font_size,
            font_metrics
        );
        Self {
            font_system,
            swash_cache: SwashCache::new(),
            attrs,
            metrics,
            font_metrics,
            closed: false,
        }
    }

    pub fn font_size(&self) -> f32 {
        self.metrics.font_size
    }

    pub fn attributes(&self) -> &FontAttributes {
        &self.attrs
    }

    /// Every later [`GlyphRasterizer::rasterize`] fails with
    /// [`RasterError::Unavailable`].
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Line height plus baseline position of one shaped line.
fn measure_line(
    font_system: &RwLock<cosmic_text::FontSystem>,
    attrs: &FontAttributes,
    metrics: Metrics,
) -> FontMetrics {
    let height = metrics.line_height.ceil() as i32;
    let mut fs = font_system.write();
    let mut buffer = Buffer::new(&mut fs, metrics);
    buffer.set_text(&mut fs, "Ag", attrs.to_cosmic(), Shaping::Advanced);
    buffer.shape_until_scroll(&mut fs, false);

    let baseline = buffer
        .layout_runs()
        .next()
        .map(|run| run.line_y.round() as i32)
        .unwrap_or_else(|| (metrics.font_size * 0.8).round() as i32);
    let ascent = baseline.clamp(0, height);
    FontMetrics::new(height, ascent, height - ascent)
}

impl GlyphRasterizer for CosmicRasterizer {
    fn metrics(&self) -> FontMetrics {
        self.font_metrics
    }

    fn rasterize(&mut self, codepoint: u32, color: Color) -> Result<Bitmap, RasterError> {
        profile_function!();

        if self.closed {
            return Err(RasterError::Unavailable);
        }
        let ch = char_of(codepoint).ok_or(RasterError::MissingGlyph(codepoint))?;
        let mut utf8 = [0u8; 4];
        let text = ch.encode_utf8(&mut utf8);

        let mut fs = self.font_system.write();
        let mut buffer = Buffer::new(&mut fs, self.metrics);
        buffer.set_text(&mut fs, text, self.attrs.to_cosmic(), Shaping::Advanced);
        buffer.shape_until_scroll(&mut fs, false);

        let mut advance = 0.0f32;
        let mut glyphs = Vec::new();
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                advance = advance.max(glyph.x + glyph.w);
                glyphs.push(glyph.physical((0.0, run.line_y), 1.0));
            }
        }
        if glyphs.is_empty() {
            return Err(RasterError::MissingGlyph(codepoint));
        }

        let height = self.font_metrics.height.max(0) as u32;
        let mut cell = Bitmap::new(advance.ceil().max(0.0) as u32, height);
        let tint = color.to_rgba8();

        for physical in glyphs {
            let Some(image) = self.swash_cache.get_image(&mut fs, physical.cache_key) else {
                continue;
            };
            let (w, h) = (image.placement.width, image.placement.height);
            if w == 0 || h == 0 {
                continue;
            }
            let glyph = match image.content {
                SwashContent::Mask => Bitmap::from_alpha_mask(w, h, &image.data, tint),
                SwashContent::Color => Bitmap::from_pixels(
                    w,
                    h,
                    image
                        .data
                        .chunks_exact(4)
                        .map(|px| Rgba8::new(px[0], px[1], px[2], px[3]))
                        .collect(),
                ),
                SwashContent::SubpixelMask => {
                    let coverage: Vec<u8> = image
                        .data
                        .chunks_exact(4)
                        .map(|px| px[0].max(px[1]).max(px[2]))
                        .collect();
                    Bitmap::from_alpha_mask(w, h, &coverage, tint)
                }
            };
            let Some(glyph) = glyph else {
                return Err(RasterError::Failed(format!(
                    "glyph image for {:#x} does not match its {}x{} placement",
                    codepoint, w, h
                )));
            };
            cell.blit(
                &glyph,
                physical.x + image.placement.left,
                physical.y - image.placement.top,
                None,
            );
        }

        Ok(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_builder() {
        let attrs = FontAttributes::monospace()
            .weight(FontWeight::BOLD)
            .style(FontStyle::Italic);
        assert_eq!(attrs.family, "monospace");
        assert_eq!(attrs.weight, FontWeight::BOLD);
        assert_eq!(attrs.style, FontStyle::Italic);
        assert_eq!(FontAttributes::default(), FontAttributes::sans_serif());
    }

    #[test]
    fn test_empty_database() {
        let db = FontDatabase::empty();
        assert!(db.is_empty());
        assert!(db.list_families().is_empty());
        assert!(!db.has_family("serif"));
    }

    #[test]
    fn test_attributes_map_onto_cosmic() {
        let named = FontAttributes::new("Fira Code")
            .weight(FontWeight::BOLD)
            .style(FontStyle::Oblique);
        let attrs = named.to_cosmic();
        assert_eq!(attrs.family, cosmic_text::Family::Name("Fira Code"));
        assert_eq!(attrs.weight, cosmic_text::Weight::BOLD);
        assert_eq!(attrs.style, cosmic_text::Style::Oblique);

        let generic = FontAttributes::monospace();
        let attrs = generic.to_cosmic();
        assert_eq!(attrs.family, cosmic_text::Family::Monospace);
        assert_eq!(attrs.weight, cosmic_text::Weight::NORMAL);
        assert_eq!(attrs.style, cosmic_text::Style::Normal);

        assert_eq!(FontWeight(650).to_cosmic(), cosmic_text::Weight(650));
        assert!(FontWeight::LIGHT < FontWeight::default());
    }

    #[test]
    fn test_bytes_that_are_not_a_font_add_nothing() {
        let mut db = FontDatabase::empty();
        assert_eq!(db.load_font_data(b"definitely not a font".to_vec()), 0);
        assert_eq!(db.load_font_data(Vec::new()), 0);
        assert!(db.is_empty());
        assert!(db.list_families().is_empty());
    }

    #[test]
    fn test_fonts_dir_without_fonts_adds_nothing() {
        let mut db = FontDatabase::empty();
        assert_eq!(db.load_fonts_dir("/nonexistent/fontcache/fonts"), 0);

        let dir = std::env::temp_dir().join(format!("fontcache-fonts-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("broken.ttf"), b"not a font either").unwrap();
        let added = db.load_fonts_dir(&dir);
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(added, 0);
        assert!(db.is_empty());
    }

    #[test]
    fn test_missing_font_file_is_io_error() {
        let mut db = FontDatabase::empty();
        let err = db
            .load_font_file("/nonexistent/fontcache/missing.ttf")
            .unwrap_err();
        assert!(matches!(err, crate::error::TextError::IoError(_)));
    }
}
