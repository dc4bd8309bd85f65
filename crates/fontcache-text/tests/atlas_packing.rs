//! Atlas layout invariants across preloading and lazy growth.

use fontcache_core::geometry::Rect;
use fontcache_render::Vec2;
use fontcache_test_utils::{MockRasterizer, MockRenderBackend};
use fontcache_text::utf8::loading;
use fontcache_text::{Font, FontConfig, GlyphEntry, codec};

fn small_atlas_font(backend: &mut MockRenderBackend) -> Font {
    let config = FontConfig::default()
        .with_atlas_scale(5)
        .with_max_preload_levels(3)
        .with_loading_string(loading::ASCII);
    let mut font = Font::new(config);
    let source = MockRasterizer::monospace(10, 6)
        .with_width(codec::codepoint_of('W'), 12)
        .with_width(codec::codepoint_of('i'), 2)
        .with_width(codec::codepoint_of('Ā'), 20);
    font.load(backend, source).expect("mock source loads");
    font
}

fn entries(font: &Font) -> Vec<(u32, GlyphEntry)> {
    font.codepoints()
        .into_iter()
        .map(|cp| (cp, font.cache().lookup(cp).expect("listed codepoint is cached")))
        .collect()
}

fn overlaps(a: &Rect<i32>, b: &Rect<i32>) -> bool {
    a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
}

#[test]
fn test_preload_stops_at_level_limit() {
    let mut backend = MockRenderBackend::new();
    let font = small_atlas_font(&mut backend);
    assert_eq!(font.num_cache_levels(), 3);
    assert!(font.num_codepoints() < loading::ASCII.chars().count());
}

#[test]
fn test_entries_stay_inside_padded_levels() {
    let mut backend = MockRenderBackend::new();
    let mut font = small_atlas_font(&mut backend);
    font.draw(&mut backend, Vec2::ZERO, loading::ASCII_LATIN_1);
    font.draw(&mut backend, Vec2::ZERO, "ĀĀā");
    assert!(font.num_cache_levels() > 3);

    for (cp, entry) in entries(&font) {
        let level = font
            .cache()
            .levels()
            .get(entry.cache_level)
            .expect("entry points at an existing level");
        let bounds = Rect::new(0, 0, level.size.width, level.size.height);
        assert!(
            bounds.contains_with_margin(&entry.rect, 1),
            "{:#x} at {:?} escapes level {:?}",
            cp,
            entry.rect,
            level.size
        );
    }
}

#[test]
fn test_entries_never_overlap_within_a_level() {
    let mut backend = MockRenderBackend::new();
    let mut font = small_atlas_font(&mut backend);
    font.draw(&mut backend, Vec2::ZERO, loading::LATIN_1);

    let all = entries(&font);
    for (i, (cp_a, a)) in all.iter().enumerate() {
        for (cp_b, b) in &all[i + 1..] {
            if a.cache_level != b.cache_level {
                continue;
            }
            assert!(
                !overlaps(&a.rect, &b.rect),
                "{:#x} {:?} overlaps {:#x} {:?}",
                cp_a,
                a.rect,
                cp_b,
                b.rect
            );
        }
    }
}

#[test]
fn test_cached_glyphs_resolve_without_backend_calls() {
    let mut backend = MockRenderBackend::new();
    let mut font = small_atlas_font(&mut backend);
    let text = "Wide Wii and ÿ";
    let width = font.width(&mut backend, text);

    backend.clear_calls();
    assert_eq!(font.width(&mut backend, text), width);
    assert_eq!(backend.call_count(), 0);
}
