use thiserror::Error;

/// Errors surfaced to the caller when a chart cannot be constructed.
///
/// Data problems inside the sheet (nameless rows, dangling advisees, cycles)
/// are not errors: they are logged and the tree degrades gracefully.
#[derive(Error, Debug)]
pub enum SunburstError {
    #[error("Failed to read sheet export: {0}")]
    Sheet(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid palette color `{0}`")]
    InvalidColor(String),

    #[error("Palette must contain at least one color")]
    EmptyPalette,

    #[error("Invalid value for `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: &'static str },

    #[error("Viewport must be positive and finite, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

pub type Result<T> = std::result::Result<T, SunburstError>;
