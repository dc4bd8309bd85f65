//! Glyph resolution: map lookup, and on a miss rasterize, pack, grow and
//! upload.
//!
//! ```text
//! lookup ──hit──▶ entry
//!   │miss
//!   ▼
//! rasterize ──Unavailable──▶ SourceUnavailable (nothing cached)
//!   │
//!   ▼
//! pack ──Exhausted──▶ grow one level ──▶ pack again (second failure surfaces)
//!   │   └─Oversized──▶ GlyphTooLarge
//!   ▼
//! upload inside a TargetScope ──▶ insert into map
//! ```

use fontcache_core::geometry::{Rect, Size};
use fontcache_core::profiling::profile_function;
use fontcache_render::{
    Bitmap, Color, FilterMode, GlyphRasterizer, RasterError, RenderBackend, RenderError,
    TargetScope, TextureDescriptor, TextureId,
};

use crate::atlas::AtlasLevels;
use crate::codec::Codepoint;
use crate::error::{TextError, TextResult};
use crate::glyph_map::{GlyphEntry, GlyphId, GlyphMap};
use crate::packer::{AtlasPacker, PackError, PackingCursor};

pub(crate) const SPACE: Codepoint = b' ' as Codepoint;
pub(crate) const TAB: Codepoint = b'\t' as Codepoint;

/// The glyph map, packing cursor and atlas levels of one font.
#[derive(Debug, Clone)]
pub struct GlyphCache {
    map: GlyphMap,
    packer: AtlasPacker,
    levels: AtlasLevels,
    atlas_scale: i32,
    filter: FilterMode,
    tab_width: i32,
    color: Color,
}

impl GlyphCache {
    pub fn new(bucket_count: usize, atlas_scale: i32, filter: FilterMode, tab_width: i32) -> Self {
        Self {
            map: GlyphMap::new(bucket_count),
            packer: AtlasPacker::new(0),
            levels: AtlasLevels::new(),
            atlas_scale,
            filter,
            tab_width,
            color: Color::WHITE,
        }
    }

    pub fn map(&self) -> &GlyphMap {
        &self.map
    }

    pub fn levels(&self) -> &AtlasLevels {
        &self.levels
    }

    pub fn cursor(&self) -> PackingCursor {
        self.packer.cursor()
    }

    pub fn line_height(&self) -> i32 {
        self.packer.line_height()
    }

    pub(crate) fn set_line_height(&mut self, line_height: i32) {
        self.packer.set_line_height(line_height);
    }

    /// Side length of a newly allocated atlas level.
    pub fn atlas_size(&self) -> Size<i32> {
        let side = self.atlas_scale * self.packer.line_height();
        Size::new(side, side)
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Applies to levels created from now on.
    pub fn set_filter(&mut self, filter: FilterMode) {
        self.filter = filter;
    }

    pub fn tab_width(&self) -> i32 {
        self.tab_width
    }

    pub fn set_tab_width(&mut self, tab_width: i32) {
        self.tab_width = tab_width;
    }

    pub(crate) fn packer_mut(&mut self) -> &mut AtlasPacker {
        &mut self.packer
    }

    pub(crate) fn map_mut(&mut self) -> &mut GlyphMap {
        &mut self.map
    }

    pub(crate) fn levels_mut(&mut self) -> &mut AtlasLevels {
        &mut self.levels
    }

    /// Set the color modulation of every level. New levels inherit it.
    pub fn set_color(&mut self, backend: &mut dyn RenderBackend, color: Color) {
        self.color = color;
        for texture in self.levels.textures() {
            if let Err(e) = backend.set_texture_color(texture, color) {
                tracing::warn!("Failed to set color on atlas level {:?}: {}", texture, e);
            }
        }
    }

    /// Record an entry without touching any texture.
    pub fn insert(&mut self, codepoint: Codepoint, entry: GlyphEntry) -> GlyphId {
        self.map.insert(codepoint, entry)
    }

    pub fn lookup(&self, codepoint: Codepoint) -> Option<GlyphEntry> {
        self.map.lookup(codepoint).copied()
    }

    /// Find a glyph, rasterizing and uploading it on a miss.
    pub fn resolve(
        &mut self,
        backend: &mut dyn RenderBackend,
        mut source: Option<&mut (dyn GlyphRasterizer + '_)>,
        codepoint: Codepoint,
    ) -> TextResult<GlyphEntry> {
        if let Some(entry) = self.lookup(codepoint) {
            return Ok(entry);
        }
        profile_function!();

        let bitmap = if codepoint == TAB {
            if source.is_none() {
                return Err(TextError::SourceUnavailable);
            }
            let space = self
                .resolve(backend, source.as_deref_mut(), SPACE)
                .map(|e| e.rect.width)
                .unwrap_or(0);
            Bitmap::new(
                (self.tab_width * space).max(0) as u32,
                self.packer.line_height().max(0) as u32,
            )
        } else {
            let Some(source) = source else {
                return Err(TextError::SourceUnavailable);
            };
            source.rasterize(codepoint, Color::WHITE)?
        };

        let entry = self.place(backend, codepoint, bitmap.width() as i32)?;
        let texture = self
            .levels
            .texture(entry.cache_level)
            .ok_or(TextError::AtlasFull {
                codepoint,
                level: entry.cache_level,
            })?;
        upload_glyph(backend, texture, &bitmap, entry.rect)?;

        self.map.insert(codepoint, entry);
        tracing::trace!(
            "Cached glyph {:#x} on level {} at {:?}",
            codepoint,
            entry.cache_level,
            entry.rect
        );
        Ok(entry)
    }

    /// Reserve a cell, growing by one level if the current one is full.
    fn place(
        &mut self,
        backend: &mut dyn RenderBackend,
        codepoint: Codepoint,
        width: i32,
    ) -> TextResult<GlyphEntry> {
        if self.cursor().level >= self.levels.len() {
            let level = self.grow(backend)?;
            self.packer.start_level(level);
        }

        let atlas = self.level_size(self.cursor().level);
        match self.packer.pack(width, atlas) {
            Ok(entry) => Ok(entry),
            Err(PackError::Exhausted { next_level }) => {
                let level = if next_level < self.levels.len() {
                    next_level
                } else {
                    self.grow(backend)?
                };
                self.packer.start_level(level);
                let atlas = self.level_size(level);
                self.packer
                    .pack(width, atlas)
                    .map_err(|e| TextError::from_pack(codepoint, e))
            }
            Err(e) => Err(TextError::from_pack(codepoint, e)),
        }
    }

    fn level_size(&self, level: usize) -> Size<i32> {
        self.levels
            .get(level)
            .map(|l| l.size)
            .unwrap_or_else(|| self.atlas_size())
    }

    /// Allocate one empty target-capable level.
    pub(crate) fn grow(&mut self, backend: &mut dyn RenderBackend) -> TextResult<usize> {
        let size = self.atlas_size();
        let texture = match create_level_texture(backend, size, self.filter) {
            Ok(texture) => texture,
            Err(e) => {
                tracing::error!(
                    "Ran out of packing space and could not add atlas level {}: {}",
                    self.levels.len(),
                    e
                );
                return Err(e);
            }
        };

        {
            let cleared = TargetScope::enter(backend, Some(texture))
                .and_then(|mut scope| scope.clear(Color::TRANSPARENT));
            if let Err(e) = cleared {
                tracing::error!("Failed to clear new atlas level: {}", e);
                backend.destroy_texture(texture);
                return Err(e.into());
            }
        }

        if let Err(e) = backend.set_texture_color(texture, self.color) {
            tracing::warn!("Failed to set color on new atlas level: {}", e);
        }
        let level = self.levels.push(texture, size.width, size.height);
        tracing::debug!(
            "Grew glyph atlas to {} levels ({}x{})",
            self.levels.len(),
            size.width,
            size.height
        );
        Ok(level)
    }

    /// Install a texture created elsewhere as atlas level `level`.
    ///
    /// An existing level is replaced and its old texture handed back to the
    /// caller; `level == levels().len()` appends. Entries already pointing at
    /// a replaced level keep their rectangles.
    pub fn set_level(
        &mut self,
        backend: &dyn RenderBackend,
        level: usize,
        texture: TextureId,
    ) -> TextResult<Option<TextureId>> {
        let size = backend
            .texture_size(texture)
            .ok_or(RenderError::UnknownTexture(texture))?;
        let (width, height) = (size.width as i32, size.height as i32);
        if level < self.levels.len() {
            Ok(self
                .levels
                .replace(level, texture, width, height)
                .map(|old| old.texture))
        } else if level == self.levels.len() {
            self.levels.push(texture, width, height);
            Ok(None)
        } else {
            Err(TextError::LevelOutOfRange {
                level,
                levels: self.levels.len(),
            })
        }
    }

    /// Destroy all levels and forget every glyph.
    pub fn clear(&mut self, backend: &mut dyn RenderBackend) {
        self.levels.destroy_all(backend);
        self.map.clear();
        self.packer.start_level(0);
    }
}

pub(crate) fn create_level_texture(
    backend: &mut dyn RenderBackend,
    size: Size<i32>,
    filter: FilterMode,
) -> TextResult<TextureId> {
    let desc = TextureDescriptor::render_target(
        size.width.max(0) as u32,
        size.height.max(0) as u32,
        filter,
    );
    Ok(backend.create_texture(&desc)?)
}

fn upload_glyph(
    backend: &mut dyn RenderBackend,
    texture: TextureId,
    bitmap: &Bitmap,
    rect: Rect<i32>,
) -> TextResult<()> {
    if rect.is_empty() || bitmap.width() == 0 || bitmap.height() == 0 {
        return Ok(());
    }
    let mut scope = TargetScope::enter(backend, Some(texture))?;
    scope.copy_bitmap(bitmap, rect)?;
    Ok(())
}

/// Rasterization errors that mean no glyph will ever come from this source.
pub(crate) fn is_permanent(err: &RasterError) -> bool {
    matches!(err, RasterError::Unavailable)
}
