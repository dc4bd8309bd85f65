//! Renders text with a system font into the software backend and prints
//! the result as ASCII art.
//!
//! Run with `--profile` to serve puffin data on port 8585 while the frames
//! are drawn.

use fontcache_core::logging;
use fontcache_core::profiling::{ProfilingBackend, init_profiling, new_frame};
use fontcache_render::{Bitmap, Color, Rect, RenderBackend, SoftwareBackend, Vec2};
use fontcache_text::{
    CosmicRasterizer, Effect, Font, FontAttributes, FontConfig, FontDatabase, FontSystem,
    FormatBuffer, TextAlign,
};

const WIDTH: u32 = 240;
const HEIGHT: u32 = 96;

fn main() {
    logging::init();
    if std::env::args().any(|arg| arg == "--profile") {
        init_profiling(ProfilingBackend::PuffinHttp);
    }

    let db = FontDatabase::new();
    if db.is_empty() {
        tracing::error!("No system fonts found");
        return;
    }
    tracing::info!("Found {} font faces", db.len());
    let fonts = FontSystem::new(db);

    let mut backend = SoftwareBackend::new(WIDTH, HEIGHT);
    let mut font = Font::new(FontConfig::medium().with_default_color(Color::WHITE));
    let source = CosmicRasterizer::new(&fonts, FontAttributes::monospace(), 14.0);
    let report = font.load(&mut backend, source).expect("Failed to load font");
    tracing::info!(
        "Preloaded {} glyphs into {} atlas levels",
        report.glyphs_cached,
        report.levels_created
    );

    let mut label = FormatBuffer::with_capacity(32);
    for frame in 0..3 {
        new_frame();
        backend.clear(Color::BLACK).expect("Failed to clear screen");

        let text = label.format(format_args!("frame {}", frame));
        font.draw(&mut backend, Vec2::new(2.0, 2.0), text);

        let centered = Effect::new(TextAlign::Center, Vec2::ONE, Color::WHITE);
        font.draw_column_effect(
            &mut backend,
            Vec2::new(WIDTH as f32 / 2.0, 24.0),
            WIDTH as i32 - 8,
            centered,
            "glyphs are cached in atlas levels",
        );
        font.draw_box(
            &mut backend,
            Rect::new(2, 56, 120, 36),
            "clipped to a box that is far too small for all of this text",
        );
    }

    print_screen(backend.screen());
    font.release(&mut backend);
}

fn print_screen(screen: &Bitmap) {
    const RAMP: &[u8] = b" .:-=+*#%@";
    for y in (0..screen.height()).step_by(2) {
        let line: String = (0..screen.width())
            .map(|x| {
                let px = screen.pixel(x, y).unwrap_or_default();
                let luma = (px.r as u32 * 3 + px.g as u32 * 6 + px.b as u32) / 10;
                RAMP[(luma as usize * (RAMP.len() - 1)) / 255] as char
            })
            .collect();
        println!("{}", line.trim_end());
    }
}
