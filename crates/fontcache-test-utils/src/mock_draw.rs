use std::sync::Arc;

use fontcache_core::geometry::Rect;
use fontcache_core::math::Vec2;
use fontcache_render::{DrawPrimitive, RenderBackend, TextureId};
use parking_lot::Mutex;

/// One glyph quad handed to a [`RecordingDrawPrimitive`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub texture: TextureId,
    pub src: Rect<i32>,
    pub dest: Vec2,
    pub scale: Vec2,
}

/// A draw primitive that records every glyph instead of drawing it.
///
/// Clones share one log, so keep a clone before handing the primitive to a
/// font:
///
/// ```rust
/// use fontcache_test_utils::RecordingDrawPrimitive;
///
/// let recorder = RecordingDrawPrimitive::new();
/// let handle = recorder.clone();
/// // font.set_draw_primitive(Box::new(recorder));
/// assert!(handle.calls().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingDrawPrimitive {
    calls: Arc<Mutex<Vec<DrawCall>>>,
}

impl RecordingDrawPrimitive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Destination x of every recorded glyph, in draw order.
    pub fn xs(&self) -> Vec<f32> {
        self.calls.lock().iter().map(|c| c.dest.x).collect()
    }

    /// Destination y of every recorded glyph, in draw order.
    pub fn ys(&self) -> Vec<f32> {
        self.calls.lock().iter().map(|c| c.dest.y).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }
}

impl DrawPrimitive for RecordingDrawPrimitive {
    fn draw(
        &mut self,
        _backend: &mut dyn RenderBackend,
        texture: TextureId,
        src: Rect<i32>,
        dest: Vec2,
        scale: Vec2,
    ) -> Rect<i32> {
        self.calls.lock().push(DrawCall {
            texture,
            src,
            dest,
            scale,
        });
        let scale = scale.abs();
        Rect::new(
            dest.x as i32,
            dest.y as i32,
            (src.width as f32 * scale.x) as i32,
            (src.height as f32 * scale.y) as i32,
        )
    }
}
