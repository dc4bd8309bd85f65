use crate::backend::TextureId;

/// Errors reported by a [`RenderBackend`](crate::RenderBackend).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The backend could not allocate a texture.
    TextureCreationFailed {
        width: u32,
        height: u32,
        reason: String,
    },

    /// The handle does not name a live texture.
    UnknownTexture(TextureId),

    /// The texture exists but was not created as a render target.
    NotRenderTarget(TextureId),

    /// Render targets are not supported by this backend.
    TargetsUnsupported,

    /// Any other backend failure.
    Backend(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::TextureCreationFailed {
                width,
                height,
                reason,
            } => write!(f, "Failed to create {}x{} texture: {}", width, height, reason),
            RenderError::UnknownTexture(id) => write!(f, "Unknown texture {:?}", id),
            RenderError::NotRenderTarget(id) => {
                write!(f, "Texture {:?} is not a render target", id)
            }
            RenderError::TargetsUnsupported => write!(f, "Render targets are not supported"),
            RenderError::Backend(msg) => write!(f, "Render backend error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Result type for backend operations.
pub type RenderResult<T> = Result<T, RenderError>;
