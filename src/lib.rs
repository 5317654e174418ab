//! `tabular-ingest` fetches a remote tabular dataset and turns it into an
//! in-memory [`types::Table`] plus an inferred [`schema::Schema`], the
//! numeric/categorical partition of its columns that drives chart menus in
//! an interactive dashboard.
//!
//! The primary entrypoint is [`ingestion::ingest_from_url`], which runs the
//! full pipeline: detect the format from the URL suffix, fetch the bytes,
//! validate the claimed format's magic number, unwrap container formats,
//! parse, and analyze column roles. Any failure is an
//! [`error::IngestError`] tagged with the [`error::Stage`] that produced it.
//!
//! ## Supported sources (detected by URL suffix)
//!
//! - **CSV**: `.csv`
//! - **Zip-archived CSV**: `.zip` (first `.csv` member, archive order)
//! - **Gzip-compressed CSV**: `.gz` (magic bytes checked before inflating)
//! - **Excel**: `.xlsx` (requires the Cargo feature `excel`, on by default)
//! - **JSON**: `.json` (array-of-objects or NDJSON)
//!
//! Anything else is refused before a single byte is fetched.
//!
//! ## Quick example
//!
//! ```no_run
//! use tabular_ingest::ingestion::{ingest_from_url, IngestOptions};
//! use tabular_ingest::profile;
//!
//! # fn main() -> Result<(), tabular_ingest::IngestError> {
//! let out = ingest_from_url(
//!     "https://example.com/Heart%20Disease%20Data.csv.gz",
//!     &IngestOptions::default(),
//! )?;
//!
//! // Preview and missing-value counts for the dashboard header.
//! let preview = profile::head(&out.table, 5);
//! println!("{} rows, preview of {}", out.table.row_count(), preview.row_count());
//! for (column, nulls) in profile::missing_counts(&out.table) {
//!     println!("{column}: {nulls} missing");
//! }
//!
//! // Chart menus select from the inferred column roles.
//! println!("numeric: {:?}", out.schema.numeric_columns);
//! println!("categorical: {:?}", out.schema.categorical_columns);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: the pipeline and its stage implementations
//! - [`types`]: in-memory table types
//! - [`schema`]: numeric/categorical column-role inference
//! - [`profile`]: preview, missing counts, value counts, correlation
//! - [`error`]: the shared error type and its stage tags
//!
//! ## Ownership and concurrency
//!
//! A run is strictly sequential and owns every intermediate buffer; the
//! returned table and schema are the only artifacts that survive it, owned
//! by the caller. Runs share no state, so concurrent sessions are
//! independent and repeated runs against unchanged remote content return
//! structurally identical results. Callers wanting to avoid repeated
//! fetches can memoize results keyed by URL; the pipeline itself never
//! caches.

pub mod error;
pub mod ingestion;
pub mod profile;
pub mod schema;
pub mod types;

pub use error::{IngestError, IngestResult, Stage};
pub use ingestion::{ingest_from_url, IngestOptions, Ingested, SourceFormat};
