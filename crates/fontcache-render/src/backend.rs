//! The render backend seam.
//!
//! Everything the glyph cache needs from a renderer goes through
//! [`RenderBackend`]: texture lifetime, render-target switching, clip,
//! viewport and scale state, and textured quad drawing. Atlas mutation is
//! always bracketed by a [`TargetScope`] so the application's render state is
//! left exactly as it was found.

use std::ops::{Deref, DerefMut};

use fontcache_core::geometry::{Rect, Size};
use fontcache_core::math::Vec2;

use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::error::RenderResult;

/// Opaque handle to a backend texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    #[default]
    Rgba8,
}

/// Texture sampling used when glyphs are drawn scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

bitflags::bitflags! {
    /// Mirroring applied when drawing a texture region.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flip: u8 {
        const HORIZONTAL = 1 << 0;
        const VERTICAL = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureDescriptor {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub filter: FilterMode,
    /// Whether the texture may be bound with [`RenderBackend::set_render_target`].
    pub render_target: bool,
}

impl TextureDescriptor {
    pub fn render_target(width: u32, height: u32, filter: FilterMode) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Rgba8,
            filter,
            render_target: true,
        }
    }
}

/// Snapshot of the mutable render state a glyph upload may disturb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub target: Option<TextureId>,
    pub clip: Option<Rect<i32>>,
    pub viewport: Option<Rect<i32>>,
    pub scale: Vec2,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            target: None,
            clip: None,
            viewport: None,
            scale: Vec2::ONE,
        }
    }
}

/// A renderer capable of hosting glyph atlases.
///
/// `None` as a render target means the default (window) target. Rectangles
/// passed to the copy and draw operations are in the current target's
/// logical coordinates, i.e. before viewport offset and scale are applied.
pub trait RenderBackend {
    fn create_texture(&mut self, desc: &TextureDescriptor) -> RenderResult<TextureId>;

    /// Create a static texture initialised from `bitmap`.
    fn create_texture_from_bitmap(
        &mut self,
        bitmap: &Bitmap,
        filter: FilterMode,
    ) -> RenderResult<TextureId>;

    fn destroy_texture(&mut self, texture: TextureId);

    fn texture_size(&self, texture: TextureId) -> Option<Size<u32>>;

    /// Color modulation applied when `texture` is drawn.
    fn set_texture_color(&mut self, texture: TextureId, color: Color) -> RenderResult<()>;

    fn render_target(&self) -> Option<TextureId>;
    fn set_render_target(&mut self, target: Option<TextureId>) -> RenderResult<()>;

    fn clip_rect(&self) -> Option<Rect<i32>>;
    fn set_clip_rect(&mut self, clip: Option<Rect<i32>>);

    fn viewport(&self) -> Option<Rect<i32>>;
    fn set_viewport(&mut self, viewport: Option<Rect<i32>>);

    fn scale(&self) -> Vec2;
    fn set_scale(&mut self, scale: Vec2);

    /// Fill the whole current target, ignoring clip.
    fn clear(&mut self, color: Color) -> RenderResult<()>;

    /// Replace the pixels under `dest` with `bitmap` (no blending).
    fn copy_bitmap(&mut self, bitmap: &Bitmap, dest: Rect<i32>) -> RenderResult<()>;

    /// Replace the pixels under `dest` with `src` of `texture` (no blending).
    fn copy_texture(
        &mut self,
        texture: TextureId,
        src: Rect<i32>,
        dest: Rect<i32>,
    ) -> RenderResult<()>;

    /// Alpha-blend `src` of `texture` into `dest`, honouring color modulation.
    fn draw_texture(
        &mut self,
        texture: TextureId,
        src: Rect<i32>,
        dest: Rect<i32>,
        flip: Flip,
    ) -> RenderResult<()>;

    fn save_state(&self) -> RenderState {
        RenderState {
            target: self.render_target(),
            clip: self.clip_rect(),
            viewport: self.viewport(),
            scale: self.scale(),
        }
    }

    /// Reapply a snapshot. The target is restored first since switching
    /// targets may reset the rest of the state.
    fn restore_state(&mut self, state: &RenderState) {
        if let Err(e) = self.set_render_target(state.target) {
            tracing::warn!("Failed to restore render target {:?}: {}", state.target, e);
        }
        self.set_viewport(state.viewport);
        self.set_clip_rect(state.clip);
        self.set_scale(state.scale);
    }
}

/// Switches the render target for as long as it lives and restores the
/// previous target, clip, viewport and scale when dropped.
///
/// ```ignore
/// let mut scope = TargetScope::enter(backend, Some(atlas))?;
/// scope.copy_bitmap(&glyph, dest)?;
/// // state restored here, including on the `?` path
/// ```
pub struct TargetScope<'a> {
    backend: &'a mut dyn RenderBackend,
    saved: RenderState,
}

impl<'a> TargetScope<'a> {
    pub fn enter(
        backend: &'a mut dyn RenderBackend,
        target: Option<TextureId>,
    ) -> RenderResult<Self> {
        let saved = backend.save_state();
        if let Err(e) = backend.set_render_target(target) {
            backend.restore_state(&saved);
            return Err(e);
        }
        backend.set_viewport(None);
        backend.set_clip_rect(None);
        backend.set_scale(Vec2::ONE);
        Ok(Self { backend, saved })
    }

    pub fn saved_state(&self) -> &RenderState {
        &self.saved
    }
}

impl<'a> Deref for TargetScope<'a> {
    type Target = dyn RenderBackend + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.backend
    }
}

impl<'a> DerefMut for TargetScope<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.backend
    }
}

impl Drop for TargetScope<'_> {
    fn drop(&mut self) {
        self.backend.restore_state(&self.saved);
    }
}
