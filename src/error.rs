use thiserror::Error;

/// Result type alias for operations that may fail with [`TraceError`].
pub type TraceResult<T> = std::result::Result<T, TraceError>;

/// Error types that can occur while loading a palette or slicing a grid.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Image loading or decoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// An optimiser was asked to trace the transparent colour.
    #[error("colour 0 is always transparent and cannot be traced")]
    TransparentCurrent,
    /// An optimiser's current colour also appeared in its future set.
    #[error("current colour {0} must not appear in the future set")]
    CurrentInFuture(u32),
    /// A pixel carried an alpha value other than 0 or 255.
    #[error(
        "unsupported alpha {alpha} at ({x}, {y}); pixels must be fully opaque or fully transparent"
    )]
    UnsupportedAlpha { x: u32, y: u32, alpha: u8 },
    /// The image used more distinct opaque colours than the palette allows.
    #[error("too many colours; palettes need fewer than {limit} entries")]
    PaletteOverflow { limit: usize },
}
