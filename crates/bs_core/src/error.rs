use std::fmt;
use thiserror::Error;

/// HTTP statuses the completion backend uses for rate limiting and
/// temporary unavailability.
pub const TRANSIENT_STATUSES: [u16; 2] = [429, 503];

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("failed to fetch page: {0}")]
    FetchFailed(String),

    #[error("no meaningful content found")]
    InsufficientContent,
}

/// Failure reported by a completion backend.
///
/// `status` carries the HTTP status when the backend answered with one;
/// transport failures (DNS, TLS, malformed bodies) leave it empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CompletionError {
    pub status: Option<u16>,
    pub message: String,
}

impl CompletionError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(Some(status), message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    pub fn is_transient(&self) -> bool {
        self.status
            .map(|status| TRANSIENT_STATUSES.contains(&status))
            .unwrap_or(false)
    }
}

/// The two model-backed stages of a summarisation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Summarizing,
    Translating,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Summarizing => write!(f, "summarizing"),
            Stage::Translating => write!(f, "translating"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("completion failed while {stage}: {source}")]
    Completion {
        stage: Stage,
        #[source]
        source: CompletionError,
    },

    #[error("completion still failing while {stage} after {attempts} attempts: {source}")]
    RetriesExhausted {
        stage: Stage,
        attempts: u32,
        #[source]
        source: CompletionError,
    },
}

impl PipelineError {
    pub fn cause(&self) -> &CompletionError {
        match self {
            PipelineError::Completion { source, .. } => source,
            PipelineError::RetriesExhausted { source, .. } => source,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Completion { stage, .. } => *stage,
            PipelineError::RetriesExhausted { stage, .. } => *stage,
        }
    }
}
