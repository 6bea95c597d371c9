//! Error taxonomy for the pipeline.
//!
//! Every stage returns `Result<_, PipelineError>`; nothing below `main`
//! terminates the process. The three data-integrity classes carry the
//! offending file, month set, or country so the final log line can name it.

use thiserror::Error;

/// Result type alias used by every pipeline stage.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Unified error type for the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    // Ingestion format (exit 2)
    #[error("bad month token in file name: {file}")]
    BadMonthToken { file: String },

    #[error("{file}: missing required column `{column}`")]
    MissingColumn { file: String, column: String },

    // Continuity (exit 3)
    #[error("file set is not contiguous months: {months:?}")]
    NonContiguousMonths { months: Vec<u32> },

    // Geocode resolution (exit 4)
    #[error("unable to geo-locate country: {country}")]
    UnresolvedCountry { country: String },

    // Ambient failures (exit 1)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("bad scan pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("invalid geocode endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("geocoding transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PipelineError {
    /// Process exit status for this failure class. Distinct per class so a
    /// caller can tell a malformed file from a reporting gap from a failed
    /// lookup without parsing stderr.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::BadMonthToken { .. } | PipelineError::MissingColumn { .. } => 2,
            PipelineError::NonContiguousMonths { .. } => 3,
            PipelineError::UnresolvedCountry { .. } => 4,
            _ => 1,
        }
    }
}
