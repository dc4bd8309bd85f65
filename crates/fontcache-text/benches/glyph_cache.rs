//! Benchmarks for glyph preloading, lookup and lazy resolution

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fontcache_render::{SoftwareBackend, Vec2};
use fontcache_test_utils::MockRasterizer;
use fontcache_text::utf8::loading;
use fontcache_text::{Font, FontConfig, codec};

fn setup(config: FontConfig) -> (Font, SoftwareBackend) {
    let mut backend = SoftwareBackend::new(640, 480);
    let mut font = Font::new(config);
    font.load(&mut backend, MockRasterizer::monospace(16, 9))
        .expect("Failed to load mock font");
    (font, backend)
}

fn bench_preload(c: &mut Criterion) {
    let mut group = c.benchmark_group("preload");

    for (name, loading_string) in [
        ("ascii", loading::ASCII),
        ("ascii_latin_1", loading::ASCII_LATIN_1),
    ] {
        group.throughput(Throughput::Elements(loading_string.chars().count() as u64));
        group.bench_function(name, |b| {
            let mut backend = SoftwareBackend::new(64, 64);
            b.iter(|| {
                let mut font = Font::new(FontConfig::default().with_loading_string(loading_string));
                let report = font
                    .load(&mut backend, MockRasterizer::monospace(16, 9))
                    .expect("Failed to load mock font");
                font.release(&mut backend);
                black_box(report)
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let (font, _backend) = setup(FontConfig::default().with_loading_string(loading::ASCII_LATIN_1));
    let mut group = c.benchmark_group("lookup");

    let codepoints: Vec<_> = codec::codepoints(loading::ASCII_LATIN_1).map(|(_, cp)| cp).collect();
    group.throughput(Throughput::Elements(codepoints.len() as u64));
    group.bench_function("hit", |b| {
        b.iter(|| {
            for &cp in &codepoints {
                black_box(font.cache().lookup(cp));
            }
        });
    });
    group.bench_function("miss", |b| {
        b.iter(|| black_box(font.cache().lookup(codec::codepoint_of('世'))));
    });

    group.finish();
}

fn bench_bucket_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket_count");
    let codepoints: Vec<_> = codec::codepoints(loading::ASCII_LATIN_1).map(|(_, cp)| cp).collect();

    for buckets in [1usize, 16, 64, 300, 1024] {
        let config = FontConfig::default()
            .with_bucket_count(buckets)
            .with_loading_string(loading::ASCII_LATIN_1);
        let (font, _backend) = setup(config);
        group.bench_with_input(BenchmarkId::from_parameter(buckets), &buckets, |b, _| {
            b.iter(|| {
                for &cp in &codepoints {
                    black_box(font.cache().lookup(cp));
                }
            });
        });
    }

    group.finish();
}

fn bench_lazy_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("lazy_resolve");
    let text: String = ('\u{100}'..'\u{180}').collect();
    group.throughput(Throughput::Elements(text.chars().count() as u64));

    group.bench_function("latin_extended_a", |b| {
        let mut backend = SoftwareBackend::new(64, 64);
        b.iter(|| {
            let mut font = Font::new(FontConfig::default().with_loading_string(""));
            font.load(&mut backend, MockRasterizer::monospace(16, 9))
                .expect("Failed to load mock font");
            black_box(font.width(&mut backend, &text));
            font.release(&mut backend);
        });
    });

    group.finish();
}

fn bench_draw(c: &mut Criterion) {
    let (mut font, mut backend) = setup(FontConfig::default());
    let mut group = c.benchmark_group("draw");

    let long_text = "Lorem ipsum dolor sit amet. ".repeat(4);
    let texts: Vec<(&str, &str)> = vec![
        ("single_char", "A"),
        ("short_sentence", "Hello, World!"),
        ("multi_line", "The quick brown fox\njumps over\nthe lazy dog"),
        ("long_text", &long_text),
    ];

    for (name, content) in texts {
        group.bench_function(name, |b| {
            b.iter(|| black_box(font.draw(&mut backend, Vec2::new(4.0, 4.0), content)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_preload,
    bench_lookup,
    bench_bucket_counts,
    bench_lazy_resolve,
    bench_draw
);
criterion_main!(benches);
