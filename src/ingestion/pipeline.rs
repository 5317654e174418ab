//! Unified ingestion pipeline.
//!
//! [`ingest_from_url`] runs detect → fetch → validate → extract → parse →
//! analyze, short-circuiting at the first error:
//!
//! - The source format is detected from the URL suffix (or forced via
//!   [`IngestOptions::format`]).
//! - An unrecognized suffix fails with
//!   [`IngestError::UnsupportedFormat`](crate::error::IngestError::UnsupportedFormat)
//!   before any network call; there is nothing the pipeline could do with
//!   the bytes, so the fetch is not wasted.
//! - If an [`IngestObserver`] is provided, success/failure/alerts are
//!   reported to it.
//!
//! A run owns all of its intermediate buffers; nothing is cached or shared
//! across runs, so repeated calls against an unchanged remote resource
//! return structurally identical results.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{IngestError, IngestResult};
use crate::schema::Schema;
use crate::types::Table;

use super::observability::{IngestContext, IngestObserver, IngestSeverity, IngestStats};
use super::{extract, fetch, json, signature};

/// Container/content format of a remote source, detected from its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Comma-separated values.
    Csv,
    /// Zip archive wrapping a CSV member.
    Zip,
    /// Gzip-compressed CSV.
    Gzip,
    /// Excel workbook (requires the `excel` feature to parse).
    Excel,
    /// JSON array-of-objects or NDJSON.
    Json,
    /// Extension not recognized; the pipeline refuses to fetch these.
    Unknown,
}

impl SourceFormat {
    /// Ordered suffix table; first match wins.
    const SUFFIXES: &'static [(&'static str, SourceFormat)] = &[
        (".csv", SourceFormat::Csv),
        (".zip", SourceFormat::Zip),
        (".gz", SourceFormat::Gzip),
        (".xlsx", SourceFormat::Excel),
        (".json", SourceFormat::Json),
    ];

    /// Detect the source format from a URL's suffix (case-insensitive).
    ///
    /// Query string and fragment are ignored. Always returns a tag;
    /// unrecognized suffixes map to [`SourceFormat::Unknown`].
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let path = path.to_ascii_lowercase();
        for (suffix, format) in Self::SUFFIXES {
            if path.ends_with(suffix) {
                return *format;
            }
        }
        SourceFormat::Unknown
    }
}

/// Options controlling a single ingestion run.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestOptions {
    /// If `None`, the format is detected from the URL suffix.
    pub format: Option<SourceFormat>,
    /// Timeout applied to the fetch step, the only unbounded-latency stage.
    pub fetch_timeout: Duration,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestSeverity,
}

impl fmt::Debug for IngestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestOptions")
            .field("format", &self.format)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            format: None,
            fetch_timeout: Duration::from_secs(30),
            observer: None,
            alert_at_or_above: IngestSeverity::Critical,
        }
    }
}

/// Successful ingestion output: the parsed table and its column roles.
///
/// These are the only artifacts that outlive a pipeline run; the caller
/// (typically a UI session) owns them outright.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested {
    pub table: Table,
    pub schema: Schema,
}

/// Ingest the tabular dataset behind `url`.
///
/// # Examples
///
/// ```no_run
/// use tabular_ingest::ingestion::{ingest_from_url, IngestOptions};
///
/// # fn main() -> Result<(), tabular_ingest::IngestError> {
/// let out = ingest_from_url(
///     "https://example.com/heart_disease.csv.gz",
///     &IngestOptions::default(),
/// )?;
/// println!(
///     "rows={} numeric={:?}",
///     out.table.row_count(),
///     out.schema.numeric_columns
/// );
/// # Ok(())
/// # }
/// ```
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >=
///   `options.alert_at_or_above`
pub fn ingest_from_url(url: &str, options: &IngestOptions) -> IngestResult<Ingested> {
    let format = options.format.unwrap_or_else(|| SourceFormat::from_url(url));
    let ctx = IngestContext {
        url: url.to_string(),
        format,
    };

    let result = run_stages(url, format, options);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(out) => obs.on_success(
                &ctx,
                IngestStats {
                    rows: out.table.row_count(),
                    columns: out.table.columns().len(),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn run_stages(url: &str, format: SourceFormat, options: &IngestOptions) -> IngestResult<Ingested> {
    if format == SourceFormat::Unknown {
        return Err(IngestError::UnsupportedFormat {
            url: url.to_string(),
        });
    }

    let raw = fetch::fetch_url(url, options.fetch_timeout)?;
    signature::validate_signature(&raw, format)?;
    let payload = extract::extract(raw, format)?;
    let table = parse(&payload, format)?;
    let schema = Schema::analyze(&table);

    Ok(Ingested { table, schema })
}

/// Parse extracted bytes according to the original source format.
///
/// Zip and gzip containers always wrap CSV content.
fn parse(payload: &[u8], format: SourceFormat) -> IngestResult<Table> {
    match format {
        SourceFormat::Csv | SourceFormat::Zip | SourceFormat::Gzip => {
            super::csv::parse_csv(payload)
        }
        SourceFormat::Json => json::parse_json(payload),
        SourceFormat::Excel => parse_excel_dispatch(payload),
        SourceFormat::Unknown => unreachable!("unknown format rejected before fetch"),
    }
}

fn parse_excel_dispatch(payload: &[u8]) -> IngestResult<Table> {
    #[cfg(feature = "excel")]
    {
        super::excel::parse_excel(payload)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = payload;
        Err(IngestError::Malformed {
            message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

fn severity_for_error(e: &IngestError) -> IngestSeverity {
    match e {
        // Infrastructure failures; everything else is a data problem.
        IngestError::Transport(_) => IngestSeverity::Critical,
        _ => IngestSeverity::Error,
    }
}

/// Owned ingestion request, convenient for enqueueing work in a job system.
#[derive(Clone)]
pub struct IngestRequest {
    /// URL of the remote dataset.
    pub url: String,
    /// Options controlling the run.
    pub options: IngestOptions,
}

impl fmt::Debug for IngestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestRequest")
            .field("url", &self.url)
            .field("options", &self.options)
            .finish()
    }
}

impl IngestRequest {
    /// Execute the request by calling [`ingest_from_url`].
    pub fn run(&self) -> IngestResult<Ingested> {
        ingest_from_url(&self.url, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::SourceFormat;

    #[test]
    fn detects_known_suffixes() {
        assert_eq!(SourceFormat::from_url("http://x/d.csv"), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_url("http://x/d.zip"), SourceFormat::Zip);
        assert_eq!(SourceFormat::from_url("http://x/d.gz"), SourceFormat::Gzip);
        assert_eq!(
            SourceFormat::from_url("http://x/d.xlsx"),
            SourceFormat::Excel
        );
        assert_eq!(
            SourceFormat::from_url("http://x/d.json"),
            SourceFormat::Json
        );
    }

    #[test]
    fn compound_suffix_takes_outermost_container() {
        // `.csv.gz` is a gzip stream wrapping csv; the container wins.
        assert_eq!(
            SourceFormat::from_url("https://example.com/Heart%20Disease%20Data.csv.gz"),
            SourceFormat::Gzip
        );
    }

    #[test]
    fn detection_is_case_insensitive_and_ignores_query() {
        assert_eq!(
            SourceFormat::from_url("http://x/Data.CSV?download=1"),
            SourceFormat::Csv
        );
        assert_eq!(
            SourceFormat::from_url("http://x/d.json#records"),
            SourceFormat::Json
        );
    }

    #[test]
    fn unrecognized_suffix_maps_to_unknown() {
        assert_eq!(
            SourceFormat::from_url("http://x/d.parquet"),
            SourceFormat::Unknown
        );
        assert_eq!(SourceFormat::from_url("http://x/data"), SourceFormat::Unknown);
    }
}
