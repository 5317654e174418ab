//! Network retrieval of raw payload bytes.

use std::time::Duration;

use crate::error::IngestResult;

/// Fetch the raw bytes behind `url` with a single blocking GET.
///
/// Non-success HTTP statuses are errors. No retries and no caching here:
/// retry policy belongs to the caller, who can simply resubmit the URL.
/// `timeout` bounds the whole request, the pipeline's only
/// unbounded-latency operation.
pub fn fetch_url(url: &str, timeout: Duration) -> IngestResult<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;
    let response = client.get(url).send()?.error_for_status()?;
    let bytes = response.bytes()?;
    Ok(bytes.to_vec())
}
