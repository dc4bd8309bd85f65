//! Mock implementation of RenderBackend for testing.
//!
//! Textures have sizes and flags but no pixels. Render state behaves like a
//! real backend so save/restore round trips can be asserted.

use fontcache_core::alloc::HashMap;
use fontcache_core::geometry::{Rect, Size};
use fontcache_core::math::Vec2;
use fontcache_render::{
    Bitmap, Color, FilterMode, Flip, RenderBackend, RenderError, RenderResult, RenderState,
    TextureDescriptor, TextureId,
};
use parking_lot::Mutex;

/// Records a backend operation for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateTexture {
        width: u32,
        height: u32,
        filter: FilterMode,
        render_target: bool,
    },
    CreateTextureFromBitmap {
        width: u32,
        height: u32,
    },
    DestroyTexture(TextureId),
    SetTextureColor {
        texture: TextureId,
        color: Color,
    },
    SetRenderTarget(Option<TextureId>),
    SetClipRect(Option<Rect<i32>>),
    SetViewport(Option<Rect<i32>>),
    SetScale(Vec2),
    Clear(Color),
    CopyBitmap {
        dest: Rect<i32>,
    },
    CopyTexture {
        texture: TextureId,
        src: Rect<i32>,
        dest: Rect<i32>,
    },
    DrawTexture {
        texture: TextureId,
        src: Rect<i32>,
        dest: Rect<i32>,
        flip: Flip,
    },
}

#[derive(Debug, Clone)]
struct MockTexture {
    width: u32,
    height: u32,
    render_target: bool,
    color: Color,
}

/// Mock implementation of [`RenderBackend`] for testing.
pub struct MockRenderBackend {
    /// Recorded calls for verification
    calls: Mutex<Vec<BackendCall>>,

    textures: HashMap<TextureId, MockTexture>,
    next_id: u32,
    state: RenderState,

    /// Remaining successful texture creations before failures start
    texture_budget: Option<usize>,
}

impl MockRenderBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            textures: HashMap::default(),
            next_id: 1,
            state: RenderState::default(),
            texture_budget: None,
        }
    }

    /// Let the next `n` texture creations succeed and fail every one after.
    pub fn fail_texture_creation_after(mut self, n: usize) -> Self {
        self.texture_budget = Some(n);
        self
    }

    /// Make every further texture creation fail.
    pub fn set_fail_texture_creation(&mut self, fail: bool) {
        self.texture_budget = if fail { Some(0) } else { None };
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().clone()
    }

    /// Count texture creations of either kind.
    pub fn count_texture_creates(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    BackendCall::CreateTexture { .. } | BackendCall::CreateTextureFromBitmap { .. }
                )
            })
            .count()
    }

    /// Count glyph uploads into atlas levels.
    pub fn count_uploads(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    BackendCall::CopyBitmap { .. } | BackendCall::CopyTexture { .. }
                )
            })
            .count()
    }

    /// Count textured quad draws.
    pub fn count_draws(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, BackendCall::DrawTexture { .. }))
            .count()
    }

    /// Count render target switches.
    pub fn count_target_switches(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, BackendCall::SetRenderTarget(_)))
            .count()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn texture_color(&self, texture: TextureId) -> Option<Color> {
        self.textures.get(&texture).map(|t| t.color)
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().push(call);
    }

    fn take_budget(&mut self, width: u32, height: u32) -> RenderResult<()> {
        match self.texture_budget {
            Some(0) => Err(RenderError::TextureCreationFailed {
                width,
                height,
                reason: "mock texture budget exhausted".to_string(),
            }),
            Some(ref mut n) => {
                *n -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn insert_texture(&mut self, texture: MockTexture) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.textures.insert(id, texture);
        id
    }
}

impl Default for MockRenderBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for MockRenderBackend {
    fn create_texture(&mut self, desc: &TextureDescriptor) -> RenderResult<TextureId> {
        self.record(BackendCall::CreateTexture {
            width: desc.width,
            height: desc.height,
            filter: desc.filter,
            render_target: desc.render_target,
        });
        self.take_budget(desc.width, desc.height)?;
        Ok(self.insert_texture(MockTexture {
            width: desc.width,
            height: desc.height,
            render_target: desc.render_target,
            color: Color::WHITE,
        }))
    }

    fn create_texture_from_bitmap(
        &mut self,
        bitmap: &Bitmap,
        _filter: FilterMode,
    ) -> RenderResult<TextureId> {
        self.record(BackendCall::CreateTextureFromBitmap {
            width: bitmap.width(),
            height: bitmap.height(),
        });
        self.take_budget(bitmap.width(), bitmap.height())?;
        Ok(self.insert_texture(MockTexture {
            width: bitmap.width(),
            height: bitmap.height(),
            render_target: false,
            color: Color::WHITE,
        }))
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.record(BackendCall::DestroyTexture(texture));
        self.textures.remove(&texture);
    }

    fn texture_size(&self, texture: TextureId) -> Option<Size<u32>> {
        self.textures
            .get(&texture)
            .map(|t| Size::new(t.width, t.height))
    }

    fn set_texture_color(&mut self, texture: TextureId, color: Color) -> RenderResult<()> {
        self.record(BackendCall::SetTextureColor { texture, color });
        let tex = self
            .textures
            .get_mut(&texture)
            .ok_or(RenderError::UnknownTexture(texture))?;
        tex.color = color;
        Ok(())
    }

    fn render_target(&self) -> Option<TextureId> {
        self.state.target
    }

    fn set_render_target(&mut self, target: Option<TextureId>) -> RenderResult<()> {
        self.record(BackendCall::SetRenderTarget(target));
        if let Some(id) = target {
            let tex = self.textures.get(&id).ok_or(RenderError::UnknownTexture(id))?;
            if !tex.render_target {
                return Err(RenderError::NotRenderTarget(id));
            }
        }
        self.state = RenderState {
            target,
            ..RenderState::default()
        };
        Ok(())
    }

    fn clip_rect(&self) -> Option<Rect<i32>> {
        self.state.clip
    }

    fn set_clip_rect(&mut self, clip: Option<Rect<i32>>) {
        self.record(BackendCall::SetClipRect(clip));
        self.state.clip = clip;
    }

    fn viewport(&self) -> Option<Rect<i32>> {
        self.state.viewport
    }

    fn set_viewport(&mut self, viewport: Option<Rect<i32>>) {
        self.record(BackendCall::SetViewport(viewport));
        self.state.viewport = viewport;
    }

    fn scale(&self) -> Vec2 {
        self.state.scale
    }

    fn set_scale(&mut self, scale: Vec2) {
        self.record(BackendCall::SetScale(scale));
        self.state.scale = scale;
    }

    fn clear(&mut self, color: Color) -> RenderResult<()> {
        self.record(BackendCall::Clear(color));
        Ok(())
    }

    fn copy_bitmap(&mut self, _bitmap: &Bitmap, dest: Rect<i32>) -> RenderResult<()> {
        self.record(BackendCall::CopyBitmap { dest });
        Ok(())
    }

    fn copy_texture(
        &mut self,
        texture: TextureId,
        src: Rect<i32>,
        dest: Rect<i32>,
    ) -> RenderResult<()> {
        self.record(BackendCall::CopyTexture { texture, src, dest });
        if !self.textures.contains_key(&texture) {
            return Err(RenderError::UnknownTexture(texture));
        }
        Ok(())
    }

    fn draw_texture(
        &mut self,
        texture: TextureId,
        src: Rect<i32>,
        dest: Rect<i32>,
        flip: Flip,
    ) -> RenderResult<()> {
        self.record(BackendCall::DrawTexture {
            texture,
            src,
            dest,
            flip,
        });
        if !self.textures.contains_key(&texture) {
            return Err(RenderError::UnknownTexture(texture));
        }
        Ok(())
    }
}
