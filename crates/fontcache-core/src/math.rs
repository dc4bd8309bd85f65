//! Math types re-exported from [`glam`].
//!
//! Pen positions and per-axis scale factors are [`Vec2`]; a negative
//! component of a scale mirrors the drawn glyph on that axis.
//!
//! ```
//! use fontcache_core::math::Vec2;
//!
//! let scale = Vec2::new(2.0, -1.0);
//! assert!(scale.y < 0.0);
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::Vec2;
