//! The public font object.
//!
//! A [`Font`] owns one [`GlyphCache`] plus the metrics and settings used to
//! lay text out. It is created empty, filled by [`Font::load`] (bulk
//! preload of the loading string, then lazy resolution of everything else)
//! and reset with [`Font::clear`].
//!
//! # Example
//!
//! ```rust
//! use fontcache_render::{SoftwareBackend, Vec2};
//! use fontcache_test_utils::MockRasterizer;
//! use fontcache_text::{Font, FontConfig};
//!
//! let mut backend = SoftwareBackend::new(320, 240);
//! let mut font = Font::new(FontConfig::default());
//! font.load(&mut backend, MockRasterizer::monospace(16, 8)).unwrap();
//!
//! let rect = font.draw(&mut backend, Vec2::new(10.0, 10.0), "Hello");
//! assert_eq!(rect.width, 40);
//! ```

use fontcache_core::geometry::Rect;
use fontcache_core::math::Vec2;
use fontcache_core::profiling::profile_function;
use fontcache_render::{
    Color, DefaultDrawPrimitive, DrawPrimitive, FilterMode, FontMetrics, GlyphRasterizer,
    RenderBackend, TextureId,
};

use crate::cache::{GlyphCache, SPACE};
use crate::codec::Codepoint;
use crate::error::{TextError, TextResult};
use crate::glyph_map::{GlyphEntry, GlyphId, GlyphMap};
use crate::preload::PreloadReport;
use crate::utf8::loading;

/// Horizontal alignment relative to the draw position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Alignment, scale and color applied to one draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effect {
    pub align: TextAlign,
    pub scale: Vec2,
    pub color: Color,
}

impl Effect {
    pub fn new(align: TextAlign, scale: Vec2, color: Color) -> Self {
        Self {
            align,
            scale,
            color,
        }
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Default for Effect {
    fn default() -> Self {
        Self::new(TextAlign::Left, Vec2::ONE, Color::BLACK)
    }
}

/// Creation-time settings for a [`Font`].
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    /// Buckets in the glyph map. Fixed for the life of the font.
    /// Default: 300
    pub bucket_count: usize,
    /// Atlas levels are `atlas_scale × line height` pixels square.
    /// Default: 12
    pub atlas_scale: i32,
    /// A tab is this many spaces wide.
    /// Default: 4
    pub tab_width: i32,
    /// Upper bound on levels created by one preload pass.
    /// Default: 10
    pub max_preload_levels: usize,
    /// Filter for atlas textures.
    /// Default: nearest
    pub filter: FilterMode,
    /// Characters rasterized up front by [`Font::load`].
    /// Default: printable ASCII
    pub loading_string: String,
    pub default_color: Color,
    pub letter_spacing: i32,
    pub line_spacing: i32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            bucket_count: GlyphMap::DEFAULT_BUCKETS,
            atlas_scale: 12,
            tab_width: 4,
            max_preload_levels: 10,
            filter: FilterMode::Nearest,
            loading_string: loading::ASCII.to_string(),
            default_color: Color::BLACK,
            letter_spacing: 0,
            line_spacing: 0,
        }
    }
}

impl FontConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Small atlas levels and a short preload budget.
    ///
    /// Best for fonts that only ever draw a handful of labels.
    pub fn small() -> Self {
        Self {
            atlas_scale: 8,
            max_preload_levels: 4,
            ..Default::default()
        }
    }

    /// The default configuration.
    pub fn medium() -> Self {
        Self::default()
    }

    /// Large levels, a wider map and Latin-1 preloaded alongside ASCII.
    ///
    /// Best for text-heavy applications with many distinct glyphs.
    pub fn large() -> Self {
        Self {
            bucket_count: 1024,
            atlas_scale: 16,
            max_preload_levels: 16,
            loading_string: loading::ASCII_LATIN_1.to_string(),
            ..Default::default()
        }
    }

    pub fn with_bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = bucket_count;
        self
    }

    pub fn with_atlas_scale(mut self, atlas_scale: i32) -> Self {
        self.atlas_scale = atlas_scale;
        self
    }

    pub fn with_tab_width(mut self, tab_width: i32) -> Self {
        self.tab_width = tab_width;
        self
    }

    pub fn with_max_preload_levels(mut self, levels: usize) -> Self {
        self.max_preload_levels = levels;
        self
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// An empty loading string makes the font fully lazy.
    pub fn with_loading_string(mut self, loading_string: impl Into<String>) -> Self {
        self.loading_string = loading_string.into();
        self
    }

    pub fn with_default_color(mut self, color: Color) -> Self {
        self.default_color = color;
        self
    }

    pub fn with_letter_spacing(mut self, spacing: i32) -> Self {
        self.letter_spacing = spacing;
        self
    }

    pub fn with_line_spacing(mut self, spacing: i32) -> Self {
        self.line_spacing = spacing;
        self
    }
}

/// A cached font: glyph atlas, metrics and layout settings.
///
/// Every method that may rasterize or draw takes the backend explicitly, so
/// one font can be used with whichever backend owns its atlas textures.
pub struct Font {
    pub(crate) cache: GlyphCache,
    config: FontConfig,
    height: i32,
    ascent: i32,
    descent: i32,
    baseline: i32,
    pub(crate) letter_spacing: i32,
    pub(crate) line_spacing: i32,
    pub(crate) default_color: Color,
    loading_string: String,
    max_preload_levels: usize,
    source: Option<Box<dyn GlyphRasterizer>>,
    pub(crate) draw_primitive: Box<dyn DrawPrimitive>,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("height", &self.height)
            .field("ascent", &self.ascent)
            .field("descent", &self.descent)
            .field("baseline", &self.baseline)
            .field("glyphs", &self.cache.map().len())
            .field("levels", &self.cache.levels().len())
            .field("has_source", &self.source.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(FontConfig::default())
    }
}

impl Font {
    /// Create an empty font. Nothing is drawable until [`Font::load`].
    pub fn new(config: FontConfig) -> Self {
        Self {
            cache: GlyphCache::new(
                config.bucket_count,
                config.atlas_scale,
                config.filter,
                config.tab_width,
            ),
            height: 0,
            ascent: 0,
            descent: 0,
            baseline: 0,
            letter_spacing: config.letter_spacing,
            line_spacing: config.line_spacing,
            default_color: config.default_color,
            loading_string: config.loading_string.clone(),
            max_preload_levels: config.max_preload_levels,
            source: None,
            draw_primitive: Box::new(DefaultDrawPrimitive),
            config,
        }
    }

    /// Take ownership of `source`, preload the loading string and keep the
    /// source for lazy resolution of everything else.
    ///
    /// Previously cached glyphs and the old source are dropped first.
    /// Settings changed through the setters are kept.
    pub fn load<R>(&mut self, backend: &mut dyn RenderBackend, source: R) -> TextResult<PreloadReport>
    where
        R: GlyphRasterizer + 'static,
    {
        profile_function!();

        self.unload(backend);
        let mut source: Box<dyn GlyphRasterizer> = Box::new(source);
        self.apply_metrics(source.metrics())?;
        let report = self.cache.preload(
            backend,
            source.as_mut(),
            &self.loading_string,
            self.max_preload_levels,
        );
        self.source = Some(source);
        Ok(report)
    }

    /// Preload from a borrowed source without keeping it.
    ///
    /// Codepoints outside the loading string will fail to resolve and draw
    /// as spaces.
    pub fn load_static(
        &mut self,
        backend: &mut dyn RenderBackend,
        source: &mut dyn GlyphRasterizer,
    ) -> TextResult<PreloadReport> {
        profile_function!();

        self.unload(backend);
        self.apply_metrics(source.metrics())?;
        Ok(self.cache.preload(
            backend,
            source,
            &self.loading_string,
            self.max_preload_levels,
        ))
    }

    fn apply_metrics(&mut self, metrics: FontMetrics) -> TextResult<()> {
        let height = metrics.height.max(metrics.ascent + metrics.descent);
        if height <= 0 {
            return Err(TextError::FontLoadError(format!(
                "source reports a line height of {}",
                height
            )));
        }
        self.height = height;
        self.ascent = metrics.ascent;
        self.descent = metrics.descent;
        self.baseline = height - metrics.descent;
        self.cache.set_line_height(height);
        tracing::debug!(
            "Loaded font metrics: height {}, ascent {}, descent {}",
            height,
            metrics.ascent,
            metrics.descent
        );
        Ok(())
    }

    /// Detach the rasterization source. Cached glyphs keep working; misses
    /// fail from now on.
    pub fn close_source(&mut self) -> Option<Box<dyn GlyphRasterizer>> {
        self.source.take()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Forget glyphs, source and metrics but keep the current settings.
    fn unload(&mut self, backend: &mut dyn RenderBackend) {
        self.cache.clear(backend);
        self.source = None;
        self.height = 0;
        self.ascent = 0;
        self.descent = 0;
        self.baseline = 0;
    }

    /// Destroy every atlas level, drop the source and return to the state
    /// of a freshly created font. The draw primitive is kept.
    pub fn clear(&mut self, backend: &mut dyn RenderBackend) {
        self.cache.clear(backend);
        self.cache = GlyphCache::new(
            self.config.bucket_count,
            self.config.atlas_scale,
            self.config.filter,
            self.config.tab_width,
        );
        self.source = None;
        self.height = 0;
        self.ascent = 0;
        self.descent = 0;
        self.baseline = 0;
        self.letter_spacing = self.config.letter_spacing;
        self.line_spacing = self.config.line_spacing;
        self.default_color = self.config.default_color;
        self.loading_string = self.config.loading_string.clone();
        self.max_preload_levels = self.config.max_preload_levels;
    }

    /// Destroy every texture this font owns.
    pub fn release(mut self, backend: &mut dyn RenderBackend) {
        self.cache.clear(backend);
    }

    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    pub fn cache(&self) -> &GlyphCache {
        &self.cache
    }

    /// Find a glyph, rasterizing it on a miss.
    pub fn glyph(
        &mut self,
        backend: &mut dyn RenderBackend,
        codepoint: Codepoint,
    ) -> TextResult<GlyphEntry> {
        self.cache
            .resolve(backend, self.source.as_deref_mut(), codepoint)
    }

    /// Resolve `codepoint`, falling back to the space glyph. Returns the
    /// codepoint actually used.
    pub(crate) fn glyph_or_space(
        &mut self,
        backend: &mut dyn RenderBackend,
        codepoint: Codepoint,
    ) -> Option<(Codepoint, GlyphEntry)> {
        match self.glyph(backend, codepoint) {
            Ok(entry) => Some((codepoint, entry)),
            Err(e) => {
                tracing::trace!("Substituting space for {:#x}: {}", codepoint, e);
                self.glyph(backend, SPACE).ok().map(|entry| (SPACE, entry))
            }
        }
    }

    /// Record a glyph by hand. The rectangle must already hold the glyph's
    /// pixels on `entry.cache_level`.
    pub fn set_glyph(&mut self, codepoint: Codepoint, entry: GlyphEntry) -> GlyphId {
        self.cache.insert(codepoint, entry)
    }

    pub fn num_codepoints(&self) -> usize {
        self.cache.map().len()
    }

    /// Every cached codepoint, in map order.
    pub fn codepoints(&self) -> Vec<Codepoint> {
        self.cache.map().codepoints().collect()
    }

    pub fn num_cache_levels(&self) -> usize {
        self.cache.levels().len()
    }

    pub fn cache_level(&self, level: usize) -> Option<TextureId> {
        self.cache.levels().texture(level)
    }

    /// Install an externally created texture as atlas level `level`. See
    /// [`GlyphCache::set_level`].
    pub fn set_cache_level(
        &mut self,
        backend: &dyn RenderBackend,
        level: usize,
        texture: TextureId,
    ) -> TextResult<Option<TextureId>> {
        self.cache.set_level(backend, level, texture)
    }

    pub fn letter_spacing(&self) -> i32 {
        self.letter_spacing
    }

    pub fn set_letter_spacing(&mut self, spacing: i32) {
        self.letter_spacing = spacing;
    }

    pub fn line_spacing(&self) -> i32 {
        self.line_spacing
    }

    pub fn set_line_spacing(&mut self, spacing: i32) {
        self.line_spacing = spacing;
    }

    pub fn default_color(&self) -> Color {
        self.default_color
    }

    pub fn set_default_color(&mut self, color: Color) {
        self.default_color = color;
    }

    pub fn filter(&self) -> FilterMode {
        self.cache.filter()
    }

    /// Applies to atlas levels created after the call.
    pub fn set_filter(&mut self, filter: FilterMode) {
        self.cache.set_filter(filter);
    }

    pub fn tab_width(&self) -> i32 {
        self.cache.tab_width()
    }

    /// Applies to the tab glyph the next time it is cached.
    pub fn set_tab_width(&mut self, tab_width: i32) {
        self.cache.set_tab_width(tab_width);
    }

    pub fn loading_string(&self) -> &str {
        &self.loading_string
    }

    /// Used by the next [`Font::load`].
    pub fn set_loading_string(&mut self, loading_string: impl Into<String>) {
        self.loading_string = loading_string.into();
    }

    pub fn max_preload_levels(&self) -> usize {
        self.max_preload_levels
    }

    pub fn set_max_preload_levels(&mut self, levels: usize) {
        self.max_preload_levels = levels;
    }

    /// Route every glyph quad through `primitive`.
    pub fn set_draw_primitive(&mut self, primitive: impl DrawPrimitive + 'static) {
        self.draw_primitive = Box::new(primitive);
    }

    pub fn reset_draw_primitive(&mut self) {
        self.draw_primitive = Box::new(DefaultDrawPrimitive);
    }

    pub fn line_height(&self) -> i32 {
        self.height
    }

    pub fn baseline(&self) -> i32 {
        self.baseline
    }

    /// Widest glyph cached so far.
    pub fn max_width(&self) -> i32 {
        let map = self.cache.map();
        map.codepoints()
            .filter_map(|cp| map.lookup(cp))
            .map(|entry| entry.rect.width)
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn font_ascent(&self) -> i32 {
        self.ascent
    }

    pub(crate) fn font_descent(&self) -> i32 {
        self.descent
    }

    /// Rectangle that `text` would cover if drawn at `pos`.
    pub fn bounds(
        &mut self,
        backend: &mut dyn RenderBackend,
        pos: Vec2,
        align: TextAlign,
        scale: Vec2,
        text: &str,
    ) -> Rect<i32> {
        let width = (self.width(backend, text) as f32 * scale.x) as i32;
        let height = (self.height(text) as f32 * scale.y) as i32;
        let x = pos.x as i32;
        let x = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2,
            TextAlign::Right => x - width,
        };
        Rect::new(x, pos.y as i32, width, height)
    }
}
