//! Benchmarks for measurement, wrapping and hit testing

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fontcache_render::SoftwareBackend;
use fontcache_test_utils::MockRasterizer;
use fontcache_text::{Font, break_lines};

fn setup() -> (Font, SoftwareBackend) {
    let mut backend = SoftwareBackend::new(64, 64);
    let mut font = Font::default();
    font.load(&mut backend, MockRasterizer::monospace(16, 9))
        .expect("Failed to load mock font");
    (font, backend)
}

fn paragraph() -> String {
    "The quick brown fox jumps over the lazy dog. ".repeat(12)
}

fn bench_width(c: &mut Criterion) {
    let (mut font, mut backend) = setup();
    let mut group = c.benchmark_group("width");

    let long_text = paragraph();
    let texts: Vec<(&str, &str)> = vec![
        ("single_word", "Hello"),
        ("sentence", "The quick brown fox jumps over the lazy dog"),
        ("multi_line", "first line\nsecond, longer line\nthird"),
        ("long_text", &long_text),
    ];

    for (name, content) in texts {
        group.bench_function(name, |b| {
            b.iter(|| black_box(font.width(&mut backend, content)));
        });
    }

    group.finish();
}

fn bench_break_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("break_lines");
    let text = paragraph();

    for column in [40, 120, 320, 640] {
        group.bench_with_input(BenchmarkId::from_parameter(column), &column, |b, &column| {
            b.iter(|| {
                black_box(break_lines(&text, Some(column), false, |line| {
                    line.chars().count() as i32 * 9
                }))
            });
        });
    }

    group.finish();
}

fn bench_wrapped_lines(c: &mut Criterion) {
    let (mut font, mut backend) = setup();
    let mut group = c.benchmark_group("wrapped_lines");
    let text = paragraph();

    for width in [120, 320, 640] {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| black_box(font.wrapped_lines(&mut backend, width, &text)));
        });
    }

    group.finish();
}

fn bench_hit_testing(c: &mut Criterion) {
    let (mut font, mut backend) = setup();
    let mut group = c.benchmark_group("hit_testing");
    let text = paragraph();

    group.bench_function("caret_offset", |b| {
        b.iter(|| black_box(font.caret_offset(&mut backend, 300, Some(320), &text)));
    });
    group.bench_function("position_from_offset", |b| {
        b.iter(|| black_box(font.position_from_offset(&mut backend, 150, 80, Some(320), &text)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_width,
    bench_break_lines,
    bench_wrapped_lines,
    bench_hit_testing
);
criterion_main!(benches);
