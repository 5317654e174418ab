use std::fmt;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Pipeline stage an [`IngestError`] is attributed to.
///
/// Every error is terminal for the run that raised it; the stage tag tells
/// the caller (typically a UI error banner) where the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// URL format detection, before any I/O.
    Detect,
    /// Network retrieval of the raw payload.
    Fetch,
    /// Magic-number validation of the claimed format.
    Validate,
    /// Container extraction (gzip, zip).
    Extract,
    /// Tabular parsing of the extracted payload.
    Parse,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detect => "detect",
            Self::Fetch => "fetch",
            Self::Validate => "validate",
            Self::Extract => "extract",
            Self::Parse => "parse",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type returned by the ingestion pipeline.
///
/// A single error enum shared across all stages; use [`IngestError::stage`]
/// to recover which stage produced it.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The URL's suffix matches no supported source format. Raised before
    /// any network call.
    #[error("unsupported source format for url '{url}'")]
    UnsupportedFormat { url: String },

    /// Network failure or non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The payload does not start with the magic bytes of its claimed
    /// format (server/URL mismatch, e.g. an HTML error page).
    #[error("invalid {expected} signature: payload starts with {found:02x?}")]
    InvalidSignature { expected: &'static str, found: Vec<u8> },

    /// A gzip stream could not be decompressed (truncated, bad checksum).
    #[error("failed to decompress gzip payload: {message}")]
    Decompression { message: String },

    /// A zip archive could not be opened or read.
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A zip archive contains no `.csv` member.
    #[error("zip archive has no csv member")]
    NoTabularMember,

    /// CSV tokenization error (ragged records, invalid quoting).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    /// Excel workbook error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Two columns share the same header name.
    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    /// The payload cannot be shaped into a rectangular table.
    #[error("malformed tabular data: {message}")]
    Malformed { message: String },
}

impl IngestError {
    /// The pipeline stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            Self::UnsupportedFormat { .. } => Stage::Detect,
            Self::Transport(_) => Stage::Fetch,
            Self::InvalidSignature { .. } => Stage::Validate,
            Self::Decompression { .. } | Self::Zip(_) | Self::NoTabularMember => Stage::Extract,
            Self::Csv(_) | Self::DuplicateColumn { .. } | Self::Malformed { .. } => Stage::Parse,
            #[cfg(feature = "excel")]
            Self::Excel(_) => Stage::Parse,
        }
    }
}
