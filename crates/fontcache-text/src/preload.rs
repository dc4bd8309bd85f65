//! Bulk preloading of a loading string into fresh atlas levels.
//!
//! Glyphs are packed onto a CPU surface the size of one level. When the
//! packer reports the level exhausted, the surface is uploaded as a new
//! atlas level and packing continues on a clean surface. Entries enter the
//! glyph map only once their level has been uploaded.

use fontcache_core::alloc::HashSet;
use fontcache_core::geometry::{Rect, Size};
use fontcache_core::profiling::profile_function;
use fontcache_render::{Bitmap, Color, GlyphRasterizer, RenderBackend, RenderError, TargetScope};

use crate::cache::{GlyphCache, SPACE, TAB, create_level_texture, is_permanent};
use crate::codec::{Codepoint, codepoints};
use crate::error::{TextError, TextResult};
use crate::glyph_map::GlyphEntry;
use crate::packer::PackError;

/// What a preload pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreloadReport {
    /// Glyphs that now live in the map.
    pub glyphs_cached: usize,
    /// Atlas levels uploaded.
    pub levels_created: usize,
    /// Codepoints the source could not render or that did not fit a level.
    pub skipped: usize,
    /// The level limit was hit or the source closed; the remaining
    /// codepoints are left to lazy resolution.
    pub aborted: bool,
}

struct Surface {
    bitmap: Bitmap,
    pending: Vec<(Codepoint, GlyphEntry)>,
}

impl Surface {
    fn new(size: Size<i32>) -> Self {
        Self {
            bitmap: Bitmap::new(size.width.max(0) as u32, size.height.max(0) as u32),
            pending: Vec::new(),
        }
    }

    fn place(&mut self, codepoint: Codepoint, glyph: &Bitmap, entry: GlyphEntry) {
        let cell = entry.rect;
        self.bitmap.blit(glyph, cell.x, cell.y, Some(cell));
        self.pending.push((codepoint, entry));
    }
}

impl GlyphCache {
    /// Rasterize and pack every codepoint of `loading` onto new levels.
    ///
    /// At most `max_levels` levels are created. Codepoints already in the
    /// map are left alone.
    pub fn preload(
        &mut self,
        backend: &mut dyn RenderBackend,
        source: &mut dyn GlyphRasterizer,
        loading: &str,
        max_levels: usize,
    ) -> PreloadReport {
        profile_function!();

        let mut report = PreloadReport::default();
        let size = self.atlas_size();
        let first_level = self.levels().len();
        self.packer_mut().start_level(first_level);

        let mut surface = Surface::new(size);
        let mut surfaces_used = 1;
        let mut seen: HashSet<Codepoint> = HashSet::default();
        let mut space_width: Option<i32> = None;

        for (_, codepoint) in codepoints(loading) {
            if self.map().contains(codepoint) || !seen.insert(codepoint) {
                continue;
            }

            let glyph = if codepoint == TAB {
                let space = match space_width {
                    Some(w) => w,
                    None => self.space_width_hint(source),
                };
                Bitmap::new(
                    (self.tab_width() * space).max(0) as u32,
                    self.line_height().max(0) as u32,
                )
            } else {
                match source.rasterize(codepoint, Color::WHITE) {
                    Ok(bitmap) => bitmap,
                    Err(e) if is_permanent(&e) => {
                        tracing::warn!("Glyph source closed during preload: {}", e);
                        report.aborted = true;
                        break;
                    }
                    Err(e) => {
                        tracing::trace!("Skipping {:#x} during preload: {}", codepoint, e);
                        report.skipped += 1;
                        continue;
                    }
                }
            };
            if codepoint == SPACE {
                space_width = Some(glyph.width() as i32);
            }

            let width = glyph.width() as i32;
            match self.packer_mut().pack(width, size) {
                Ok(entry) => surface.place(codepoint, &glyph, entry),
                Err(PackError::Exhausted { .. }) => {
                    if surfaces_used >= max_levels {
                        tracing::warn!(
                            "Could not create enough atlas levels to fit the loading string ({} levels)",
                            max_levels
                        );
                        report.aborted = true;
                        break;
                    }
                    let full = std::mem::replace(&mut surface, Surface::new(size));
                    if let Err(e) = self.finalize(backend, full, &mut report) {
                        tracing::error!("Failed to upload preloaded atlas level: {}", e);
                        report.aborted = true;
                        return report;
                    }
                    surfaces_used += 1;

                    match self.packer_mut().pack(width, size) {
                        Ok(entry) => surface.place(codepoint, &glyph, entry),
                        Err(_) => report.skipped += 1,
                    }
                }
                Err(e @ PackError::Oversized { .. }) => {
                    tracing::warn!("Skipping {:#x} during preload: {}", codepoint, e);
                    report.skipped += 1;
                }
            }
        }

        if !surface.pending.is_empty() {
            if let Err(e) = self.finalize(backend, surface, &mut report) {
                tracing::error!("Failed to upload preloaded atlas level: {}", e);
                report.aborted = true;
            }
        }

        tracing::debug!(
            "Preloaded {} glyphs into {} atlas levels ({} skipped{})",
            report.glyphs_cached,
            report.levels_created,
            report.skipped,
            if report.aborted { ", aborted" } else { "" }
        );
        report
    }

    fn space_width_hint(&self, source: &mut dyn GlyphRasterizer) -> i32 {
        if let Some(entry) = self.lookup(SPACE) {
            return entry.rect.width;
        }
        source
            .rasterize(SPACE, Color::WHITE)
            .map(|b| b.width() as i32)
            .unwrap_or(0)
    }

    /// Upload a filled surface as the next level and commit its entries.
    fn finalize(
        &mut self,
        backend: &mut dyn RenderBackend,
        surface: Surface,
        report: &mut PreloadReport,
    ) -> TextResult<()> {
        let size = Size::new(
            surface.bitmap.width() as i32,
            surface.bitmap.height() as i32,
        );
        let texture = match create_level_texture(backend, size, self.filter()) {
            Ok(texture) => {
                if let Err(e) = upload_surface(backend, texture, &surface.bitmap) {
                    backend.destroy_texture(texture);
                    return Err(e);
                }
                texture
            }
            // The level becomes a plain texture that later glyphs cannot be rendered into.
            Err(TextError::Render(RenderError::TargetsUnsupported)) => {
                tracing::debug!("Render targets unsupported, keeping preloaded level static");
                backend.create_texture_from_bitmap(&surface.bitmap, self.filter())?
            }
            Err(e) => return Err(e),
        };

        let level = self.levels_mut().push(texture, size.width, size.height);
        let count = surface.pending.len();
        for (codepoint, entry) in surface.pending {
            debug_assert_eq!(entry.cache_level, level);
            self.map_mut().insert(codepoint, entry);
        }
        report.levels_created += 1;
        report.glyphs_cached += count;
        tracing::debug!("Uploaded preloaded atlas level {} with {} glyphs", level, count);
        Ok(())
    }
}

/// Copy `bitmap` onto the whole of a target texture through a temporary
/// static texture.
fn upload_surface(
    backend: &mut dyn RenderBackend,
    texture: fontcache_render::TextureId,
    bitmap: &Bitmap,
) -> TextResult<()> {
    let staging = backend.create_texture_from_bitmap(bitmap, fontcache_render::FilterMode::Nearest)?;
    let full = Rect::new(0, 0, bitmap.width() as i32, bitmap.height() as i32);
    let copied = TargetScope::enter(backend, Some(texture)).and_then(|mut scope| {
        scope.clear(Color::TRANSPARENT)?;
        scope.copy_texture(staging, full, full)
    });
    backend.destroy_texture(staging);
    Ok(copied?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontcache_render::{FilterMode, RenderBackend, SoftwareBackend};
    use fontcache_test_utils::{MockRasterizer, MockRenderBackend};

    use crate::utf8::loading;

    fn cache(line_height: i32, atlas_scale: i32) -> GlyphCache {
        let mut cache = GlyphCache::new(300, atlas_scale, FilterMode::Linear, 4);
        cache.set_line_height(line_height);
        cache
    }

    #[test]
    fn test_ascii_fits_one_level() {
        let mut backend = MockRenderBackend::new();
        let mut raster = MockRasterizer::monospace(10, 6);
        let mut cache = cache(10, 12);

        let report = cache.preload(&mut backend, &mut raster, loading::ASCII, 10);
        assert_eq!(report.glyphs_cached, 95);
        assert_eq!(report.levels_created, 1);
        assert!(!report.aborted);
        assert_eq!(cache.map().len(), 95);
        assert!(cache.lookup(u32::from(b'~')).is_some());
    }

    #[test]
    fn test_spills_onto_more_levels() {
        let mut backend = MockRenderBackend::new();
        let mut raster = MockRasterizer::monospace(10, 6);
        // 40x40 levels: three rows of four cells
        let mut cache = cache(10, 4);

        let report = cache.preload(&mut backend, &mut raster, "abcdefghijklmnopqrstuvwxyz", 10);
        assert_eq!(report.glyphs_cached, 26);
        assert_eq!(report.levels_created, 3);
        assert_eq!(cache.levels().len(), 3);
        for cp in "abcdefghijklmnopqrstuvwxyz".bytes() {
            let entry = cache.lookup(u32::from(cp)).unwrap();
            assert!(entry.cache_level < 3);
        }
    }

    #[test]
    fn test_level_limit_aborts() {
        let mut backend = MockRenderBackend::new();
        let mut raster = MockRasterizer::monospace(10, 6);
        let mut cache = cache(10, 4);

        let report = cache.preload(&mut backend, &mut raster, "abcdefghijklmnopqrstuvwxyz", 1);
        assert!(report.aborted);
        assert_eq!(report.levels_created, 1);
        assert_eq!(report.glyphs_cached, 12);
        assert!(cache.lookup(u32::from(b'a')).is_some());
        assert!(cache.lookup(u32::from(b'z')).is_none());

        // the rest resolves lazily onto a new level
        let z = cache
            .resolve(&mut backend, Some(&mut raster), u32::from(b'z'))
            .unwrap();
        assert_eq!(z.cache_level, 1);
    }

    #[test]
    fn test_missing_glyphs_are_skipped() {
        let mut backend = MockRenderBackend::new();
        let mut raster = MockRasterizer::monospace(10, 6).with_missing(u32::from(b'b'));
        let mut cache = cache(10, 12);

        let report = cache.preload(&mut backend, &mut raster, "abc", 10);
        assert_eq!(report.glyphs_cached, 2);
        assert_eq!(report.skipped, 1);
        assert!(cache.lookup(u32::from(b'b')).is_none());
    }

    #[test]
    fn test_preload_restores_render_state() {
        let mut backend = MockRenderBackend::new();
        let mut raster = MockRasterizer::monospace(10, 6);
        let mut cache = cache(10, 12);
        backend.set_viewport(Some(Rect::new(10, 10, 100, 100)));
        let before = backend.save_state();

        cache.preload(&mut backend, &mut raster, loading::ASCII, 10);
        assert_eq!(backend.save_state(), before);
        // staging textures are released
        assert_eq!(backend.live_textures(), cache.levels().len());
    }

    #[test]
    fn test_empty_loading_string_creates_nothing() {
        let mut backend = MockRenderBackend::new();
        let mut raster = MockRasterizer::monospace(10, 6);
        let mut cache = cache(10, 12);
        let report = cache.preload(&mut backend, &mut raster, "", 10);
        assert_eq!(report, PreloadReport::default());
        assert_eq!(backend.count_texture_creates(), 0);
    }

    #[test]
    fn test_levels_stay_static_without_render_targets() {
        let mut backend = SoftwareBackend::new(16, 16).without_render_targets();
        let mut raster = MockRasterizer::monospace(10, 6);
        let mut cache = cache(10, 12);

        let report = cache.preload(&mut backend, &mut raster, "ab", 10);
        assert!(!report.aborted);
        assert_eq!(report.levels_created, 1);
        assert_eq!(report.glyphs_cached, 2);
        assert_eq!(backend.live_textures(), 1);

        let a = cache.lookup(u32::from(b'a')).unwrap();
        let level = cache.levels().get(a.cache_level).unwrap();
        let bitmap = backend.texture_bitmap(level.texture).unwrap();
        assert_eq!(bitmap.pixel(a.rect.x as u32, a.rect.y as u32).unwrap().a, 255);

        // nothing can be rendered into a static level afterwards
        assert!(
            cache
                .resolve(&mut backend, Some(&mut raster), u32::from(b'c'))
                .is_err()
        );
        assert!(cache.lookup(u32::from(b'c')).is_none());
    }

    #[test]
    fn test_upload_failure_aborts() {
        let mut backend = MockRenderBackend::new().fail_texture_creation_after(0);
        let mut raster = MockRasterizer::monospace(10, 6);
        let mut cache = cache(10, 12);
        let report = cache.preload(&mut backend, &mut raster, "abc", 10);
        assert!(report.aborted);
        assert_eq!(report.glyphs_cached, 0);
        assert!(cache.map().is_empty());
    }
}
