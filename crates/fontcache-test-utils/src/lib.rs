//! Test utilities for the fontcache crates.
//!
//! Everything here records what it was asked to do instead of touching a
//! real renderer or font file:
//!
//! - [`MockRenderBackend`] - a [`RenderBackend`](fontcache_render::RenderBackend)
//!   that tracks textures and render state and logs every call
//! - [`RecordingDrawPrimitive`] - a draw primitive that logs each glyph quad
//! - [`MockRasterizer`] - a deterministic glyph source with configurable
//!   widths and failures
//!
//! # Example
//!
//! ```rust
//! use fontcache_render::{FilterMode, RenderBackend, TextureDescriptor};
//! use fontcache_test_utils::MockRenderBackend;
//!
//! let mut backend = MockRenderBackend::new();
//! backend
//!     .create_texture(&TextureDescriptor::render_target(64, 64, FilterMode::Linear))
//!     .unwrap();
//! assert_eq!(backend.count_texture_creates(), 1);
//! ```
//!
//! Recorders keep their logs behind `parking_lot::Mutex` so that handles
//! cloned before an object is boxed into a font can still be inspected
//! afterwards.

pub mod mock_backend;
pub mod mock_draw;
pub mod mock_raster;

pub use mock_backend::*;
pub use mock_draw::*;
pub use mock_raster::*;
