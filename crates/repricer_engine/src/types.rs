use std::fmt;

use crate::decode::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    /// Address after redirects. Row matching still uses the requested URL.
    pub final_url: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: u64 },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "page of {actual} bytes exceeds {max_bytes}")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Why a single listing could not be scraped. The job logs it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Tally of one job run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub urls_seen: usize,
    pub invalid_urls: usize,
    pub extraction_failures: usize,
    pub rows_not_found: usize,
    /// Rows whose price and quantity were queued for writing.
    pub rows_matched: usize,
    pub cells_written: usize,
    /// Cells lost to failed or malformed writes, or to cancellation.
    pub cells_dropped: usize,
    pub batches_flushed: usize,
    pub batches_failed: usize,
    pub cancelled: bool,
    /// Set when the run could not read its snapshot and did nothing.
    pub snapshot_failed: bool,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} urls, {} rows matched, {} cells written, {} cells dropped, \
             {} invalid, {} failed, {} not found",
            self.urls_seen,
            self.rows_matched,
            self.cells_written,
            self.cells_dropped,
            self.invalid_urls,
            self.extraction_failures,
            self.rows_not_found,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Started { document: String, urls: usize },
    UrlProcessed { index: usize, url: String, row: Option<usize> },
    BatchFlushed { cells: usize },
    BatchFailed { cells: usize, message: String },
    Finished(RunReport),
}
