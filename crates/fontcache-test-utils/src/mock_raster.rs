//! A deterministic glyph source.
//!
//! Every glyph is a solid cell `height` pixels tall and as wide as its
//! configured advance, so layout results depend only on the widths a test
//! sets up.

use std::sync::Arc;

use fontcache_core::alloc::{HashMap, HashSet};
use fontcache_render::{Bitmap, Color, FontMetrics, GlyphRasterizer, RasterError};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct Shared {
    closed: bool,
    rasterized: Vec<u32>,
}

/// Inspect or close a [`MockRasterizer`] after it has been moved into a font.
#[derive(Debug, Clone)]
pub struct MockRasterizerHandle {
    shared: Arc<Mutex<Shared>>,
}

impl MockRasterizerHandle {
    /// Make the source permanently unavailable.
    pub fn close(&self) {
        self.shared.lock().closed = true;
    }

    /// Codepoints rasterized so far, in call order.
    pub fn rasterized(&self) -> Vec<u32> {
        self.shared.lock().rasterized.clone()
    }

    pub fn rasterize_count(&self) -> usize {
        self.shared.lock().rasterized.len()
    }

    pub fn clear(&self) {
        self.shared.lock().rasterized.clear();
    }
}

#[derive(Debug, Clone)]
pub struct MockRasterizer {
    metrics: FontMetrics,
    default_width: u32,
    widths: HashMap<u32, u32>,
    missing: HashSet<u32>,
    shared: Arc<Mutex<Shared>>,
}

impl MockRasterizer {
    /// Every glyph `width` wide, cells `height` tall. Ascent is 80% of the
    /// height, descent the rest.
    pub fn monospace(height: i32, width: u32) -> Self {
        let ascent = height * 4 / 5;
        Self {
            metrics: FontMetrics::new(height, ascent, height - ascent),
            default_width: width,
            widths: HashMap::default(),
            missing: HashSet::default(),
            shared: Arc::new(Mutex::new(Shared::default())),
        }
    }

    pub fn with_metrics(mut self, metrics: FontMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Override the advance of one codepoint.
    pub fn with_width(mut self, codepoint: u32, width: u32) -> Self {
        self.widths.insert(codepoint, width);
        self
    }

    /// Report `MissingGlyph` for this codepoint.
    pub fn with_missing(mut self, codepoint: u32) -> Self {
        self.missing.insert(codepoint);
        self
    }

    pub fn handle(&self) -> MockRasterizerHandle {
        MockRasterizerHandle {
            shared: self.shared.clone(),
        }
    }

    pub fn width_of(&self, codepoint: u32) -> u32 {
        self.widths
            .get(&codepoint)
            .copied()
            .unwrap_or(self.default_width)
    }
}

impl GlyphRasterizer for MockRasterizer {
    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn rasterize(&mut self, codepoint: u32, color: Color) -> Result<Bitmap, RasterError> {
        let mut shared = self.shared.lock();
        if shared.closed {
            return Err(RasterError::Unavailable);
        }
        if self.missing.contains(&codepoint) {
            return Err(RasterError::MissingGlyph(codepoint));
        }
        shared.rasterized.push(codepoint);

        let mut bitmap = Bitmap::new(self.width_of(codepoint), self.metrics.height.max(0) as u32);
        bitmap.fill(color.to_rgba8());
        Ok(bitmap)
    }
}
