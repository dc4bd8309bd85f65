//! fontcache core
//!
//! Small utilities shared by the glyph cache, the render interfaces and the
//! test helpers: geometry, hashed collections, math re-exports, logging and
//! profiling setup.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
