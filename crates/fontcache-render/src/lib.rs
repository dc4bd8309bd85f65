//! fontcache render interfaces
//!
//! The glyph cache talks to two collaborators it does not implement itself:
//!
//! - a [`GlyphRasterizer`] that turns a codepoint into a pixel [`Bitmap`]
//! - a [`RenderBackend`] that owns textures, render targets and quad drawing
//!
//! This crate defines both seams, the injectable [`DrawPrimitive`] used for
//! every glyph quad, and a CPU [`SoftwareBackend`] that implements the
//! backend with plain pixel buffers.
//!
//! Every atlas mutation goes through a [`TargetScope`], which snapshots the
//! backend's target, clip, viewport and scale and puts them back when the
//! scope is dropped.

pub mod backend;
pub mod bitmap;
pub mod color;
pub mod draw;
pub mod error;
pub mod raster;
pub mod software;

pub use backend::{
    FilterMode, Flip, PixelFormat, RenderBackend, RenderState, TargetScope, TextureDescriptor,
    TextureId,
};
pub use bitmap::{Bitmap, Rgba8};
pub use color::Color;
pub use draw::{DefaultDrawPrimitive, DrawPrimitive};
pub use error::{RenderError, RenderResult};
pub use raster::{FontMetrics, GlyphRasterizer, RasterError};
pub use software::SoftwareBackend;

pub use fontcache_core::geometry::Rect;
pub use fontcache_core::math::Vec2;
