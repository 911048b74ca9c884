use std::path::PathBuf;

/// Errors produced by core `gloss` operations.
#[derive(Debug, thiserror::Error)]
pub enum GlossError {
    #[error("dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("failed to read dataset {}: {source}", .path.display())]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {}: {source}", .path.display())]
    DatasetParse {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("unsupported dataset format: {} (expected .csv, .json, .toml or .xlsx)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("invalid logical operator: {0} (expected AND or OR)")]
    InvalidOperator(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
