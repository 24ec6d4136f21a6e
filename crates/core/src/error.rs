use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TreemapError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid hierarchy json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node {name:?} has a non-numeric value {raw:?}")]
    InvalidValue { name: String, raw: String },
    #[error("invalid chart config: {0}")]
    InvalidConfig(String),
    #[error("hierarchy has no positive values to lay out")]
    EmptyHierarchy,
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("pdf export failed: {0}")]
    Pdf(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TreemapError>;
