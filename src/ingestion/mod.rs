//! Ingestion pipeline entrypoints and stage implementations.
//!
//! Most callers should use [`ingest_from_url`] (from [`pipeline`]) which:
//!
//! - detects the source format from the URL suffix (or an override via
//!   [`IngestOptions`])
//! - fetches, validates, extracts and parses the payload into a
//!   [`crate::types::Table`] with an inferred [`crate::schema::Schema`]
//! - optionally reports the outcome to an [`IngestObserver`]
//!
//! Stage-specific functions are also available under:
//! - [`fetch`]
//! - [`signature`]
//! - [`extract`]
//! - [`csv`], [`json`] (and [`excel`] with the `excel` feature)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod extract;
pub mod fetch;
pub mod json;
pub mod observability;
pub mod pipeline;
pub mod signature;

pub use observability::{
    CompositeObserver, FileObserver, IngestContext, IngestObserver, IngestSeverity, IngestStats,
    StdErrObserver,
};
pub use pipeline::{ingest_from_url, IngestOptions, IngestRequest, Ingested, SourceFormat};

use crate::error::{IngestError, IngestResult};

/// Reject duplicate column names before a table is built.
pub(crate) fn check_unique_columns<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> IngestResult<()> {
    let mut seen = std::collections::HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(IngestError::DuplicateColumn {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
