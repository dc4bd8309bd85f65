use std::fmt::{self, Write};

/// A reusable, caller-owned buffer for formatted text.
///
/// Formatting into the same buffer every frame avoids a fresh allocation
/// per draw call once the buffer has grown to fit:
///
/// ```rust
/// use fontcache_text::FormatBuffer;
///
/// let mut buf = FormatBuffer::new();
/// assert_eq!(buf.format(format_args!("Score: {}", 42)), "Score: 42");
/// assert_eq!(buf.format(format_args!("{:>3}", 7)), "  7");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormatBuffer {
    buf: String,
}

impl FormatBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    /// Replace the contents with `args` and borrow the result.
    pub fn format(&mut self, args: fmt::Arguments<'_>) -> &str {
        self.buf.clear();
        if let Err(e) = self.buf.write_fmt(args) {
            tracing::warn!("Formatting into text buffer failed: {}", e);
        }
        &self.buf
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
