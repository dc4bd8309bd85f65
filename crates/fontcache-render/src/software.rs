//! A CPU reference implementation of [`RenderBackend`].
//!
//! Every texture is a [`Bitmap`] and the default target is an in-memory
//! screen. Scaled draws use nearest-neighbour sampling regardless of the
//! texture's filter mode. It exists so the cache can be exercised and
//! inspected pixel by pixel without a GPU.

use fontcache_core::alloc::HashMap;
use fontcache_core::geometry::{Rect, Size};
use fontcache_core::math::Vec2;

use crate::backend::{FilterMode, Flip, RenderBackend, TextureDescriptor, TextureId};
use crate::bitmap::{Bitmap, Rgba8};
use crate::color::Color;
use crate::error::{RenderError, RenderResult};

#[derive(Debug, Clone)]
struct SoftTexture {
    bitmap: Bitmap,
    filter: FilterMode,
    render_target: bool,
    color: Rgba8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compose {
    Replace,
    Blend,
}

pub struct SoftwareBackend {
    screen: Bitmap,
    textures: HashMap<TextureId, SoftTexture>,
    next_id: u32,
    target: Option<TextureId>,
    clip: Option<Rect<i32>>,
    viewport: Option<Rect<i32>>,
    scale: Vec2,
    max_texture_size: u32,
    supports_targets: bool,
}

impl SoftwareBackend {
    pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 8192;

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            screen: Bitmap::new(width, height),
            textures: HashMap::default(),
            next_id: 1,
            target: None,
            clip: None,
            viewport: None,
            scale: Vec2::ONE,
            max_texture_size: Self::DEFAULT_MAX_TEXTURE_SIZE,
            supports_targets: true,
        }
    }

    /// Reject textures larger than `size` on either axis.
    pub fn with_max_texture_size(mut self, size: u32) -> Self {
        self.max_texture_size = size;
        self
    }

    /// Emulate a renderer without render-target support.
    pub fn without_render_targets(mut self) -> Self {
        self.supports_targets = false;
        self
    }

    pub fn screen(&self) -> &Bitmap {
        &self.screen
    }

    pub fn texture_bitmap(&self, texture: TextureId) -> Option<&Bitmap> {
        self.textures.get(&texture).map(|t| &t.bitmap)
    }

    pub fn texture_filter(&self, texture: TextureId) -> Option<FilterMode> {
        self.textures.get(&texture).map(|t| t.filter)
    }

    pub fn texture_color(&self, texture: TextureId) -> Option<Rgba8> {
        self.textures.get(&texture).map(|t| t.color)
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    fn alloc_id(&mut self) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        id
    }

    fn check_size(&self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::TextureCreationFailed {
                width,
                height,
                reason: "zero-sized texture".to_string(),
            });
        }
        if width > self.max_texture_size || height > self.max_texture_size {
            return Err(RenderError::TextureCreationFailed {
                width,
                height,
                reason: format!("exceeds maximum size {}", self.max_texture_size),
            });
        }
        Ok(())
    }

    fn target_bitmap_mut(&mut self) -> RenderResult<&mut Bitmap> {
        match self.target {
            None => Ok(&mut self.screen),
            Some(id) => self
                .textures
                .get_mut(&id)
                .map(|t| &mut t.bitmap)
                .ok_or(RenderError::UnknownTexture(id)),
        }
    }

    /// Map a logical rectangle into target pixels.
    fn to_physical(&self, r: Rect<i32>) -> Rect<i32> {
        let (ox, oy) = self.viewport.map(|v| (v.x, v.y)).unwrap_or((0, 0));
        Rect::new(
            ox + (r.x as f32 * self.scale.x) as i32,
            oy + (r.y as f32 * self.scale.y) as i32,
            (r.width as f32 * self.scale.x) as i32,
            (r.height as f32 * self.scale.y) as i32,
        )
    }

    fn effective_clip(&self, bounds: Rect<i32>) -> Rect<i32> {
        let mut clip = bounds;
        if let Some(vp) = self.viewport {
            clip = clip.intersect(&vp);
        }
        if let Some(c) = self.clip {
            clip = clip.intersect(&self.to_physical(c));
        }
        clip
    }

    fn compose(
        &mut self,
        src: &Bitmap,
        dest: Rect<i32>,
        flip: Flip,
        tint: Rgba8,
        mode: Compose,
    ) -> RenderResult<()> {
        if src.width() == 0 || src.height() == 0 {
            return Ok(());
        }
        let phys = self.to_physical(dest);
        if phys.is_empty() {
            return Ok(());
        }
        let target_bounds = match self.target {
            None => self.screen.bounds(),
            Some(id) => self
                .textures
                .get(&id)
                .map(|t| t.bitmap.bounds())
                .ok_or(RenderError::UnknownTexture(id))?,
        };
        let area = phys.intersect(&self.effective_clip(target_bounds));
        let target = self.target_bitmap_mut()?;

        let sw = src.width() as i64;
        let sh = src.height() as i64;
        for py in area.y..area.bottom() {
            let mut v = ((py - phys.y) as i64 * sh / phys.height as i64).clamp(0, sh - 1);
            if flip.contains(Flip::VERTICAL) {
                v = sh - 1 - v;
            }
            for px in area.x..area.right() {
                let mut u = ((px - phys.x) as i64 * sw / phys.width as i64).clamp(0, sw - 1);
                if flip.contains(Flip::HORIZONTAL) {
                    u = sw - 1 - u;
                }
                let Some(texel) = src.pixel(u as u32, v as u32) else {
                    continue;
                };
                let out = match mode {
                    Compose::Replace => texel,
                    Compose::Blend => {
                        let dst = target.pixel(px as u32, py as u32).unwrap_or_default();
                        texel.modulate(tint).blend_over(dst)
                    }
                };
                target.set_pixel(px as u32, py as u32, out);
            }
        }
        Ok(())
    }

    fn texture_region(&self, texture: TextureId, src: Rect<i32>) -> RenderResult<(Bitmap, Rgba8)> {
        let tex = self
            .textures
            .get(&texture)
            .ok_or(RenderError::UnknownTexture(texture))?;
        Ok((tex.bitmap.sub_bitmap(src), tex.color))
    }
}

impl RenderBackend for SoftwareBackend {
    fn create_texture(&mut self, desc: &TextureDescriptor) -> RenderResult<TextureId> {
        self.check_size(desc.width, desc.height)?;
        if desc.render_target && !self.supports_targets {
            return Err(RenderError::TargetsUnsupported);
        }
        let id = self.alloc_id();
        self.textures.insert(
            id,
            SoftTexture {
                bitmap: Bitmap::new(desc.width, desc.height),
                filter: desc.filter,
                render_target: desc.render_target,
                color: Rgba8::WHITE,
            },
        );
        Ok(id)
    }

    fn create_texture_from_bitmap(
        &mut self,
        bitmap: &Bitmap,
        filter: FilterMode,
    ) -> RenderResult<TextureId> {
        self.check_size(bitmap.width(), bitmap.height())?;
        let id = self.alloc_id();
        self.textures.insert(
            id,
            SoftTexture {
                bitmap: bitmap.clone(),
                filter,
                render_target: false,
                color: Rgba8::WHITE,
            },
        );
        Ok(id)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
        if self.target == Some(texture) {
            self.target = None;
        }
    }

    fn texture_size(&self, texture: TextureId) -> Option<Size<u32>> {
        self.textures
            .get(&texture)
            .map(|t| Size::new(t.bitmap.width(), t.bitmap.height()))
    }

    fn set_texture_color(&mut self, texture: TextureId, color: Color) -> RenderResult<()> {
        let tex = self
            .textures
            .get_mut(&texture)
            .ok_or(RenderError::UnknownTexture(texture))?;
        tex.color = color.to_rgba8();
        Ok(())
    }

    fn render_target(&self) -> Option<TextureId> {
        self.target
    }

    fn set_render_target(&mut self, target: Option<TextureId>) -> RenderResult<()> {
        if let Some(id) = target {
            if !self.supports_targets {
                return Err(RenderError::TargetsUnsupported);
            }
            let tex = self.textures.get(&id).ok_or(RenderError::UnknownTexture(id))?;
            if !tex.render_target {
                return Err(RenderError::NotRenderTarget(id));
            }
        }
        self.target = target;
        self.clip = None;
        self.viewport = None;
        self.scale = Vec2::ONE;
        Ok(())
    }

    fn clip_rect(&self) -> Option<Rect<i32>> {
        self.clip
    }

    fn set_clip_rect(&mut self, clip: Option<Rect<i32>>) {
        self.clip = clip;
    }

    fn viewport(&self) -> Option<Rect<i32>> {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Option<Rect<i32>>) {
        self.viewport = viewport;
    }

    fn scale(&self) -> Vec2 {
        self.scale
    }

    fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    fn clear(&mut self, color: Color) -> RenderResult<()> {
        let px = color.to_rgba8();
        self.target_bitmap_mut()?.fill(px);
        Ok(())
    }

    fn copy_bitmap(&mut self, bitmap: &Bitmap, dest: Rect<i32>) -> RenderResult<()> {
        self.compose(bitmap, dest, Flip::empty(), Rgba8::WHITE, Compose::Replace)
    }

    fn copy_texture(
        &mut self,
        texture: TextureId,
        src: Rect<i32>,
        dest: Rect<i32>,
    ) -> RenderResult<()> {
        let (region, _) = self.texture_region(texture, src)?;
        self.compose(&region, dest, Flip::empty(), Rgba8::WHITE, Compose::Replace)
    }

    fn draw_texture(
        &mut self,
        texture: TextureId,
        src: Rect<i32>,
        dest: Rect<i32>,
        flip: Flip,
    ) -> RenderResult<()> {
        let (region, tint) = self.texture_region(texture, src)?;
        self.compose(&region, dest, flip, tint, Compose::Blend)
    }
}
