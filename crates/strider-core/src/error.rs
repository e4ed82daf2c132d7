use thiserror::Error;

/// Top-level error type for strider crates.
#[derive(Debug, Error)]
pub enum StriderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Height field expects {expected} samples ({columns}x{rows}), got {got}")]
    HeightFieldShape {
        columns: usize,
        rows: usize,
        expected: usize,
        got: usize,
    },
}

/// Configuration loading errors.
///
/// Values themselves are never range-checked; a nonsensical stance or
/// scale produces degenerate geometry rather than an error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
