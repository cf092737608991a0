/// Convenience result type used across the editor.
pub type EditorResult<T> = Result<T, EditorError>;

/// Top-level error taxonomy used by editor APIs.
///
/// Every failure is local to one editing session; nothing here is fatal to the host.
#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    /// Invalid host- or user-provided data (colors, sizes, canvas dimensions, scripts).
    #[error("validation error: {0}")]
    Validation(String),

    /// The source image could not be fetched.
    #[error("load error: {0}")]
    Load(String),

    /// The source image bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The operation needs a loaded source image and none is available yet.
    #[error("editor not ready: {0}")]
    NotReady(String),

    /// Pixel extraction refused because the source image is cross-origin restricted.
    #[error("tainted canvas: {0}")]
    Tainted(String),

    /// Rasterization failures (surface sizes, buffer mismatches).
    #[error("render error: {0}")]
    Render(String),

    /// Errors while encoding the exported bitmap.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EditorError {
    /// Build an [`EditorError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`EditorError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build an [`EditorError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build an [`EditorError::NotReady`] value.
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }

    /// Build an [`EditorError::Tainted`] value.
    pub fn tainted(msg: impl Into<String>) -> Self {
        Self::Tainted(msg.into())
    }

    /// Build an [`EditorError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`EditorError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
