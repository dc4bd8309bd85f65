//! Aligned rendering.
//!
//! Left-aligned text is drawn glyph by glyph from the pen position. Centered
//! and right-aligned text is drawn one `\n` line at a time, each line shifted
//! left by all or half of its measured width. Every draw returns the
//! rectangle it touched.

use fontcache_core::geometry::Rect;
use fontcache_core::math::Vec2;
use fontcache_core::profiling::profile_function;
use fontcache_render::{Color, RenderBackend};

use crate::cache::SPACE;
use crate::codec::{Codepoint, codepoints};
use crate::font::{Effect, Font, TextAlign};

pub(crate) const NEWLINE: Codepoint = b'\n' as Codepoint;

impl Font {
    /// Draw `text` with its top-left corner at `pos` in the default color.
    pub fn draw(&mut self, backend: &mut dyn RenderBackend, pos: Vec2, text: &str) -> Rect<i32> {
        let color = self.default_color;
        self.cache.set_color(backend, color);
        self.render_left(backend, pos.x, pos.y, Vec2::ONE, text)
    }

    pub fn draw_scale(
        &mut self,
        backend: &mut dyn RenderBackend,
        pos: Vec2,
        scale: Vec2,
        text: &str,
    ) -> Rect<i32> {
        let color = self.default_color;
        self.cache.set_color(backend, color);
        self.render_left(backend, pos.x, pos.y, scale, text)
    }

    pub fn draw_align(
        &mut self,
        backend: &mut dyn RenderBackend,
        pos: Vec2,
        align: TextAlign,
        text: &str,
    ) -> Rect<i32> {
        let color = self.default_color;
        self.cache.set_color(backend, color);
        self.render_aligned(backend, pos.x, pos.y, Vec2::ONE, align, text)
    }

    pub fn draw_color(
        &mut self,
        backend: &mut dyn RenderBackend,
        pos: Vec2,
        color: Color,
        text: &str,
    ) -> Rect<i32> {
        self.cache.set_color(backend, color);
        self.render_left(backend, pos.x, pos.y, Vec2::ONE, text)
    }

    pub fn draw_effect(
        &mut self,
        backend: &mut dyn RenderBackend,
        pos: Vec2,
        effect: Effect,
        text: &str,
    ) -> Rect<i32> {
        self.cache.set_color(backend, effect.color);
        self.render_aligned(backend, pos.x, pos.y, effect.scale, effect.align, text)
    }

    /// Draw `text` wrapped to `bounds.width` and clipped to `bounds`.
    ///
    /// The clip rectangle in effect before the call is intersected with the
    /// box and put back afterwards. Returns `bounds`.
    pub fn draw_box(
        &mut self,
        backend: &mut dyn RenderBackend,
        bounds: Rect<i32>,
        text: &str,
    ) -> Rect<i32> {
        let effect = Effect::new(TextAlign::Left, Vec2::ONE, self.default_color);
        self.draw_box_effect(backend, bounds, effect, text)
    }

    pub fn draw_box_effect(
        &mut self,
        backend: &mut dyn RenderBackend,
        bounds: Rect<i32>,
        effect: Effect,
        text: &str,
    ) -> Rect<i32> {
        profile_function!();

        let old_clip = backend.clip_rect();
        let clip = match old_clip {
            Some(old) => old.intersect(&bounds),
            None => bounds,
        };
        backend.set_clip_rect(Some(clip));

        self.cache.set_color(backend, effect.color);
        self.render_column(backend, bounds, effect.scale, effect.align, text);

        backend.set_clip_rect(old_clip);
        bounds
    }

    /// Draw `text` wrapped to `width` with its top edge at `pos.y`.
    ///
    /// Returns the column: `(x, y, width, total height)`.
    pub fn draw_column(
        &mut self,
        backend: &mut dyn RenderBackend,
        pos: Vec2,
        width: i32,
        text: &str,
    ) -> Rect<i32> {
        let effect = Effect::new(TextAlign::Left, Vec2::ONE, self.default_color);
        self.draw_column_effect(backend, pos, width, effect, text)
    }

    /// Like [`Font::draw_column`]; a centered or right-aligned column is
    /// anchored at `pos.x` by its middle or right edge.
    pub fn draw_column_effect(
        &mut self,
        backend: &mut dyn RenderBackend,
        pos: Vec2,
        width: i32,
        effect: Effect,
        text: &str,
    ) -> Rect<i32> {
        profile_function!();

        self.cache.set_color(backend, effect.color);

        let mut column = Rect::new(pos.x as i32, pos.y as i32, width, 0);
        match effect.align {
            TextAlign::Left => {}
            TextAlign::Center => column.x -= width / 2,
            TextAlign::Right => column.x -= width,
        }

        column.height = self.render_column(backend, column, effect.scale, effect.align, text);
        column
    }

    /// Wrap to `bounds.width` and draw line by line. Returns the height used.
    fn render_column(
        &mut self,
        backend: &mut dyn RenderBackend,
        bounds: Rect<i32>,
        scale: Vec2,
        align: TextAlign,
        text: &str,
    ) -> i32 {
        let lines = self.wrapped_lines(backend, bounds.width, text);
        let line_height = self.line_height();
        let mut y = bounds.y;
        for line in &lines {
            let x = match align {
                TextAlign::Left => bounds.x,
                TextAlign::Center => bounds.x + bounds.width / 2,
                TextAlign::Right => bounds.x + bounds.width,
            };
            self.render_aligned(backend, x as f32, y as f32, scale, align, line);
            y += line_height;
        }
        y - bounds.y
    }

    fn render_aligned(
        &mut self,
        backend: &mut dyn RenderBackend,
        x: f32,
        y: f32,
        scale: Vec2,
        align: TextAlign,
        text: &str,
    ) -> Rect<i32> {
        match align {
            TextAlign::Left => self.render_left(backend, x, y, scale, text),
            TextAlign::Center => self.render_shifted(backend, x, y, scale, 0.5, text),
            TextAlign::Right => self.render_shifted(backend, x, y, scale, 1.0, text),
        }
    }

    pub(crate) fn render_left(
        &mut self,
        backend: &mut dyn RenderBackend,
        x: f32,
        y: f32,
        scale: Vec2,
        text: &str,
    ) -> Rect<i32> {
        profile_function!();

        let mut dirty = Rect::at(x as i32, y as i32);
        let line_advance = (self.line_height() + self.line_spacing) as f32 * scale.y;
        let letter_spacing = self.letter_spacing as f32 * scale.x;
        let (mut pen_x, mut pen_y) = (x, y);

        for (_, codepoint) in codepoints(text) {
            if codepoint == NEWLINE {
                pen_x = x;
                pen_y += line_advance;
                continue;
            }

            let Some((codepoint, entry)) = self.glyph_or_space(backend, codepoint) else {
                continue;
            };

            if codepoint != SPACE {
                match self.cache.levels().texture(entry.cache_level) {
                    Some(texture) => {
                        let drawn = self.draw_primitive.draw(
                            backend,
                            texture,
                            entry.rect,
                            Vec2::new(pen_x, pen_y),
                            scale,
                        );
                        dirty = if dirty.width == 0 || dirty.height == 0 {
                            drawn
                        } else {
                            dirty.union(&drawn)
                        };
                    }
                    None => tracing::warn!(
                        "Glyph {:#x} points at missing atlas level {}",
                        codepoint,
                        entry.cache_level
                    ),
                }
            }

            pen_x += entry.rect.width as f32 * scale.x + letter_spacing;
        }

        dirty
    }

    /// Draw each line shifted left by `anchor` of its scaled width.
    fn render_shifted(
        &mut self,
        backend: &mut dyn RenderBackend,
        x: f32,
        y: f32,
        scale: Vec2,
        anchor: f32,
        text: &str,
    ) -> Rect<i32> {
        let mut dirty: Option<Rect<i32>> = None;
        let line_advance = self.line_height() as f32 * scale.y;
        let mut line_y = y;
        for line in text.split('\n') {
            let width = self.width(backend, line) as f32 * scale.x;
            let drawn = self.render_left(backend, x - width * anchor, line_y, scale, line);
            line_y += line_advance;
            if drawn.is_empty() {
                continue;
            }
            dirty = Some(match dirty {
                Some(rect) => rect.union(&drawn),
                None => drawn,
            });
        }
        dirty.unwrap_or_else(|| Rect::at(x as i32, y as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontcache_render::FilterMode;
    use fontcache_test_utils::{
        BackendCall, MockRasterizer, MockRenderBackend, RecordingDrawPrimitive,
    };

    use crate::font::FontConfig;

    fn font() -> (Font, MockRenderBackend, RecordingDrawPrimitive) {
        let mut backend = MockRenderBackend::new();
        let mut font = Font::new(FontConfig::default().with_filter(FilterMode::Linear));
        let recorder = RecordingDrawPrimitive::new();
        font.set_draw_primitive(recorder.clone());
        font.load(&mut backend, MockRasterizer::monospace(10, 6))
            .unwrap();
        backend.clear_calls();
        (font, backend, recorder)
    }

    #[test]
    fn test_draw_left_advances_pen() {
        let (mut font, mut backend, recorder) = font();
        let rect = font.draw(&mut backend, Vec2::new(10.0, 20.0), "abc");
        assert_eq!(recorder.xs(), vec![10.0, 16.0, 22.0]);
        assert_eq!(recorder.ys(), vec![20.0, 20.0, 20.0]);
        assert_eq!(rect, Rect::new(10, 20, 18, 10));
    }

    #[test]
    fn test_space_advances_without_drawing() {
        let (mut font, mut backend, recorder) = font();
        let rect = font.draw(&mut backend, Vec2::ZERO, "a b");
        assert_eq!(recorder.xs(), vec![0.0, 12.0]);
        assert_eq!(rect, Rect::new(0, 0, 18, 10));
    }

    #[test]
    fn test_empty_text_returns_anchor() {
        let (mut font, mut backend, recorder) = font();
        let rect = font.draw(&mut backend, Vec2::new(5.0, 7.0), "");
        assert_eq!(rect, Rect::at(5, 7));
        assert_eq!(recorder.count(), 0);
        let rect = font.draw(&mut backend, Vec2::new(5.0, 7.0), "   ");
        assert_eq!(rect, Rect::at(5, 7));
    }

    #[test]
    fn test_newline_and_spacing() {
        let (mut font, mut backend, recorder) = font();
        font.set_letter_spacing(2);
        font.set_line_spacing(3);
        font.draw(&mut backend, Vec2::new(1.0, 1.0), "ab\ncd");
        assert_eq!(recorder.xs(), vec![1.0, 9.0, 1.0, 9.0]);
        assert_eq!(recorder.ys(), vec![1.0, 1.0, 14.0, 14.0]);
    }

    #[test]
    fn test_scale_multiplies_advance() {
        let (mut font, mut backend, recorder) = font();
        font.set_letter_spacing(1);
        let rect = font.draw_scale(&mut backend, Vec2::ZERO, Vec2::new(2.0, 3.0), "ab");
        assert_eq!(recorder.xs(), vec![0.0, 14.0]);
        assert_eq!(rect, Rect::new(0, 0, 26, 30));
    }

    #[test]
    fn test_center_and_right_alignment() {
        let (mut font, mut backend, recorder) = font();
        let rect = font.draw_align(&mut backend, Vec2::new(100.0, 0.0), TextAlign::Center, "abcd");
        assert_eq!(recorder.xs()[0], 88.0);
        assert_eq!(rect, Rect::new(88, 0, 24, 10));

        recorder.clear_calls();
        let rect = font.draw_align(&mut backend, Vec2::new(100.0, 0.0), TextAlign::Right, "ab\nabcd");
        assert_eq!(recorder.xs(), vec![88.0, 94.0, 76.0, 82.0, 88.0, 94.0]);
        assert_eq!(recorder.ys(), vec![0.0, 0.0, 10.0, 10.0, 10.0, 10.0]);
        assert_eq!(rect, Rect::new(76, 0, 24, 20));
    }

    #[test]
    fn test_aligned_rect_skips_blank_lines() {
        let (mut font, mut backend, recorder) = font();
        let rect = font.draw_align(&mut backend, Vec2::new(100.0, 0.0), TextAlign::Right, "\nab");
        assert_eq!(recorder.ys(), vec![10.0, 10.0]);
        assert_eq!(rect, Rect::new(88, 10, 12, 10));

        let rect = font.draw_align(&mut backend, Vec2::new(100.0, 0.0), TextAlign::Center, "ab\n\n");
        assert_eq!(rect, Rect::new(94, 0, 12, 10));

        let rect = font.draw_align(&mut backend, Vec2::new(100.0, 5.0), TextAlign::Center, "\n  \n");
        assert_eq!(rect, Rect::at(100, 5));
    }

    #[test]
    fn test_missing_glyph_draws_as_space() {
        let mut backend = MockRenderBackend::new();
        let mut font = Font::new(FontConfig::default().with_loading_string(" "));
        let recorder = RecordingDrawPrimitive::new();
        font.set_draw_primitive(recorder.clone());
        let source = MockRasterizer::monospace(10, 6).with_missing(u32::from(b'b'));
        font.load(&mut backend, source).unwrap();

        font.draw(&mut backend, Vec2::ZERO, "abc");
        assert_eq!(recorder.xs(), vec![0.0, 12.0]);
    }

    #[test]
    fn test_draw_sets_level_color() {
        let (mut font, mut backend, _) = font();
        font.draw_color(&mut backend, Vec2::ZERO, Color::RED, "a");
        let level = font.cache_level(0).unwrap();
        assert_eq!(backend.texture_color(level), Some(Color::RED));

        font.draw(&mut backend, Vec2::ZERO, "a");
        assert_eq!(backend.texture_color(level), Some(Color::BLACK));
    }

    #[test]
    fn test_draw_effect_combines_settings() {
        let (mut font, mut backend, recorder) = font();
        let effect = Effect::default()
            .with_align(TextAlign::Right)
            .with_scale(Vec2::new(2.0, 2.0))
            .with_color(Color::BLUE);
        let rect = font.draw_effect(&mut backend, Vec2::new(50.0, 0.0), effect, "ab");
        assert_eq!(recorder.xs(), vec![26.0, 38.0]);
        assert_eq!(rect, Rect::new(26, 0, 24, 20));
        assert_eq!(
            backend.texture_color(font.cache_level(0).unwrap()),
            Some(Color::BLUE)
        );
    }

    #[test]
    fn test_draw_box_clips_and_restores() {
        let (mut font, mut backend, recorder) = font();
        let outer = Rect::new(0, 0, 40, 40);
        backend.set_clip_rect(Some(outer));
        backend.clear_calls();

        let bounds = Rect::new(10, 10, 60, 100);
        let rect = font.draw_box(&mut backend, bounds, "The quick brown fox");
        assert_eq!(rect, bounds);
        assert_eq!(backend.clip_rect(), Some(outer));

        let clips: Vec<_> = backend
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::SetClipRect(clip) => Some(clip),
                _ => None,
            })
            .collect();
        assert_eq!(clips, vec![Some(Rect::new(10, 10, 30, 30)), Some(outer)]);

        // "The quick " is exactly 60 wide
        assert_eq!(recorder.ys().first(), Some(&10.0));
        assert_eq!(recorder.ys().last(), Some(&20.0));
    }

    #[test]
    fn test_draw_box_without_prior_clip() {
        let (mut font, mut backend, _) = font();
        font.draw_box(&mut backend, Rect::new(0, 0, 30, 30), "ab");
        assert_eq!(backend.clip_rect(), None);
    }

    #[test]
    fn test_draw_column_reports_height() {
        let (mut font, mut backend, recorder) = font();
        let rect = font.draw_column(&mut backend, Vec2::new(5.0, 5.0), 36, "aaa bbb ccc");
        assert_eq!(rect, Rect::new(5, 5, 36, 30));
        assert_eq!(recorder.count(), 9);
    }

    #[test]
    fn test_draw_column_centered_shifts_box() {
        let (mut font, mut backend, recorder) = font();
        let effect = Effect::default().with_align(TextAlign::Center);
        let rect = font.draw_column_effect(&mut backend, Vec2::new(100.0, 0.0), 40, effect, "ab");
        assert_eq!(rect, Rect::new(80, 0, 40, 10));
        // each line is centered on the column's middle
        assert_eq!(recorder.xs(), vec![94.0, 100.0]);
    }
}
