//! Container extraction: unwrap gzip streams and zip archives down to the
//! single tabular payload.

use std::io::{Cursor, Read};

use flate2::read::GzDecoder;
use zip::ZipArchive;

use super::pipeline::SourceFormat;
use crate::error::{IngestError, IngestResult};

/// Extract the tabular payload from `payload` according to `format`.
///
/// - `Csv`/`Excel`/`Json`: pass-through, the payload already is the tabular
///   content.
/// - `Gzip`: decompress the single stream.
/// - `Zip`: return the first member, in archive listing order, whose name
///   ends in `.csv`. Any further `.csv` members are ignored without
///   warning; archive order is authoritative.
pub fn extract(payload: Vec<u8>, format: SourceFormat) -> IngestResult<Vec<u8>> {
    match format {
        SourceFormat::Gzip => decompress_gzip(&payload),
        SourceFormat::Zip => extract_zip_csv(payload),
        _ => Ok(payload),
    }
}

fn decompress_gzip(payload: &[u8]) -> IngestResult<Vec<u8>> {
    let mut decoder = GzDecoder::new(payload);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| IngestError::Decompression {
            message: e.to_string(),
        })?;
    Ok(out)
}

fn extract_zip_csv(payload: Vec<u8>) -> IngestResult<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(payload))?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if !entry.name().to_ascii_lowercase().ends_with(".csv") {
            continue;
        }
        let mut out = Vec::new();
        entry
            .read_to_end(&mut out)
            .map_err(|e| IngestError::Decompression {
                message: e.to_string(),
            })?;
        return Ok(out);
    }
    Err(IngestError::NoTabularMember)
}
