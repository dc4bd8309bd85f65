//! Atlas levels: the ordered list of textures glyphs are packed into.

use fontcache_core::geometry::Size;
use fontcache_render::{RenderBackend, TextureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLevel {
    pub texture: TextureId,
    pub size: Size<i32>,
}

/// Append-only list of atlas levels. Level indices stay valid until
/// [`AtlasLevels::destroy_all`].
#[derive(Debug, Clone, Default)]
pub struct AtlasLevels {
    levels: Vec<AtlasLevel>,
}

impl AtlasLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, texture: TextureId, width: i32, height: i32) -> usize {
        self.levels.push(AtlasLevel {
            texture,
            size: Size::new(width, height),
        });
        self.levels.len() - 1
    }

    /// Swap the texture of an existing level, handing back the old one.
    pub fn replace(
        &mut self,
        level: usize,
        texture: TextureId,
        width: i32,
        height: i32,
    ) -> Option<AtlasLevel> {
        let slot = self.levels.get_mut(level)?;
        Some(std::mem::replace(
            slot,
            AtlasLevel {
                texture,
                size: Size::new(width, height),
            },
        ))
    }

    pub fn get(&self, level: usize) -> Option<&AtlasLevel> {
        self.levels.get(level)
    }

    pub fn texture(&self, level: usize) -> Option<TextureId> {
        self.levels.get(level).map(|l| l.texture)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AtlasLevel> {
        self.levels.iter()
    }

    pub fn textures(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.levels.iter().map(|l| l.texture)
    }

    /// Destroy every level texture and forget the levels.
    pub fn destroy_all(&mut self, backend: &mut dyn RenderBackend) {
        for level in self.levels.drain(..) {
            backend.destroy_texture(level.texture);
        }
    }
}
