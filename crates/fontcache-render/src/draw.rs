use fontcache_core::geometry::Rect;
use fontcache_core::math::Vec2;

use crate::backend::{Flip, RenderBackend, TextureId};

/// Draws one cached glyph. Fonts hold a boxed primitive so applications can
/// route glyph quads through their own batching.
pub trait DrawPrimitive {
    /// Draw `src` of `texture` with its top-left at `dest`, scaled by
    /// `scale`. A negative scale component mirrors along that axis. Returns
    /// the rectangle that was touched.
    fn draw(
        &mut self,
        backend: &mut dyn RenderBackend,
        texture: TextureId,
        src: Rect<i32>,
        dest: Vec2,
        scale: Vec2,
    ) -> Rect<i32>;
}

/// Straight textured-quad draw through [`RenderBackend::draw_texture`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDrawPrimitive;

impl DrawPrimitive for DefaultDrawPrimitive {
    fn draw(
        &mut self,
        backend: &mut dyn RenderBackend,
        texture: TextureId,
        src: Rect<i32>,
        dest: Vec2,
        scale: Vec2,
    ) -> Rect<i32> {
        let mut flip = Flip::empty();
        if scale.x < 0.0 {
            flip |= Flip::HORIZONTAL;
        }
        if scale.y < 0.0 {
            flip |= Flip::VERTICAL;
        }
        let scale = scale.abs();

        let rect = Rect::new(
            dest.x as i32,
            dest.y as i32,
            (src.width as f32 * scale.x) as i32,
            (src.height as f32 * scale.y) as i32,
        );

        match backend.draw_texture(texture, src, rect, flip) {
            Ok(()) => rect,
            Err(e) => {
                tracing::warn!("Glyph draw failed on {:?}: {}", texture, e);
                Rect::at(rect.x, rect.y)
            }
        }
    }
}

impl<F> DrawPrimitive for F
where
    F: FnMut(&mut dyn RenderBackend, TextureId, Rect<i32>, Vec2, Vec2) -> Rect<i32>,
{
    fn draw(
        &mut self,
        backend: &mut dyn RenderBackend,
        texture: TextureId,
        src: Rect<i32>,
        dest: Vec2,
        scale: Vec2,
    ) -> Rect<i32> {
        self(backend, texture, src, dest, scale)
    }
}
