//! CPU-side RGBA pixel surfaces.
//!
//! Rasterizers hand glyphs over as [`Bitmap`]s, and the preloader packs many
//! glyphs into one bitmap before uploading it as a whole atlas level.

use fontcache_core::geometry::Rect;

/// One 8-bit-per-channel RGBA pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

static_assertions::assert_eq_size!(Rgba8, u32);

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Multiply every channel by a modulation color.
    pub fn modulate(self, m: Rgba8) -> Rgba8 {
        let mul = |a: u8, b: u8| ((a as u16 * b as u16 + 127) / 255) as u8;
        Rgba8::new(
            mul(self.r, m.r),
            mul(self.g, m.g),
            mul(self.b, m.b),
            mul(self.a, m.a),
        )
    }

    /// Source-over blend of `self` onto `dst`.
    pub fn blend_over(self, dst: Rgba8) -> Rgba8 {
        let sa = self.a as u32;
        if sa == 255 {
            return self;
        }
        if sa == 0 {
            return dst;
        }
        let inv = 255 - sa;
        let mix = |s: u8, d: u8| ((s as u32 * sa + d as u32 * inv + 127) / 255) as u8;
        Rgba8::new(
            mix(self.r, dst.r),
            mix(self.g, dst.g),
            mix(self.b, dst.b),
            (sa + (dst.a as u32 * inv + 127) / 255).min(255) as u8,
        )
    }
}

/// A row-major RGBA image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl Bitmap {
    /// Fully transparent bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::TRANSPARENT; (width as usize) * (height as usize)],
        }
    }

    /// Wrap existing pixels; `None` when the length does not match.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba8>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a tinted bitmap from an 8-bit coverage mask.
    pub fn from_alpha_mask(width: u32, height: u32, mask: &[u8], tint: Rgba8) -> Option<Self> {
        if mask.len() != (width as usize) * (height as usize) {
            return None;
        }
        let pixels = mask
            .iter()
            .map(|&coverage| {
                Rgba8::new(
                    tint.r,
                    tint.g,
                    tint.b,
                    ((coverage as u16 * tint.a as u16 + 127) / 255) as u8,
                )
            })
            .collect();
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn bounds(&self) -> Rect<i32> {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get((y as usize) * (self.width as usize) + x as usize)
            .copied()
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize) * (self.width as usize) + x as usize;
        self.pixels[idx] = px;
    }

    pub fn fill(&mut self, px: Rgba8) {
        self.pixels.fill(px);
    }

    /// Fill only the pixels inside `rect`, clipped to the bitmap.
    pub fn fill_rect(&mut self, rect: Rect<i32>, px: Rgba8) {
        let r = rect.intersect(&self.bounds());
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                self.set_pixel(x as u32, y as u32, px);
            }
        }
    }

    /// Copy `src` (no blending) with its top-left at `(x, y)`, limited to
    /// `clip` and to this bitmap's bounds.
    pub fn blit(&mut self, src: &Bitmap, x: i32, y: i32, clip: Option<Rect<i32>>) {
        let mut dest = Rect::new(x, y, src.width as i32, src.height as i32).intersect(&self.bounds());
        if let Some(clip) = clip {
            dest = dest.intersect(&clip);
        }
        for dy in dest.y..dest.bottom() {
            for dx in dest.x..dest.right() {
                if let Some(px) = src.pixel((dx - x) as u32, (dy - y) as u32) {
                    self.set_pixel(dx as u32, dy as u32, px);
                }
            }
        }
    }

    /// Extract a sub-rectangle, clipped to the bitmap.
    pub fn sub_bitmap(&self, rect: Rect<i32>) -> Bitmap {
        let r = rect.intersect(&self.bounds());
        let mut out = Bitmap::new(r.width as u32, r.height as u32);
        for y in 0..r.height {
            for x in 0..r.width {
                if let Some(px) = self.pixel((r.x + x) as u32, (r.y + y) as u32) {
                    out.set_pixel(x as u32, y as u32, px);
                }
            }
        }
        out
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|px| px.a == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_blank() {
        let bmp = Bitmap::new(4, 3);
        assert_eq!(bmp.pixels().len(), 12);
        assert!(bmp.is_blank());
        assert_eq!(bmp.as_bytes().len(), 48);
    }

    #[test]
    fn test_blit_clips_to_bounds() {
        let mut dst = Bitmap::new(4, 4);
        let mut src = Bitmap::new(3, 3);
        src.fill(Rgba8::WHITE);
        dst.blit(&src, 2, 2, None);
        assert_eq!(dst.pixel(3, 3), Some(Rgba8::WHITE));
        assert_eq!(dst.pixel(1, 1), Some(Rgba8::TRANSPARENT));
    }

    #[test]
    fn test_blit_respects_clip() {
        let mut dst = Bitmap::new(4, 4);
        let mut src = Bitmap::new(4, 4);
        src.fill(Rgba8::WHITE);
        dst.blit(&src, 0, 0, Some(Rect::new(0, 0, 2, 2)));
        assert_eq!(dst.pixel(1, 1), Some(Rgba8::WHITE));
        assert_eq!(dst.pixel(2, 2), Some(Rgba8::TRANSPARENT));
    }

    #[test]
    fn test_alpha_mask_scales_alpha() {
        let bmp = Bitmap::from_alpha_mask(2, 1, &[255, 0], Rgba8::WHITE).unwrap();
        assert_eq!(bmp.pixel(0, 0).unwrap().a, 255);
        assert_eq!(bmp.pixel(1, 0).unwrap().a, 0);
    }

    #[test]
    fn test_from_pixels_rejects_wrong_length() {
        assert!(Bitmap::from_pixels(2, 2, vec![Rgba8::WHITE; 3]).is_none());
    }

    #[test]
    fn test_blend_over_opaque_replaces() {
        let red = Rgba8::new(255, 0, 0, 255);
        assert_eq!(red.blend_over(Rgba8::WHITE), red);
        assert_eq!(Rgba8::TRANSPARENT.blend_over(red), red);
    }
}
