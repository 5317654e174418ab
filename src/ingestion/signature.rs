//! Magic-number validation for payloads with a claimed binary format.
//!
//! A URL ending in the expected extension does not guarantee the server
//! returned the expected byte stream (redirects, HTML error pages, renamed
//! files), so gzip payloads are checked before decompression. Other formats
//! are currently accepted as-is and left to fail in their parsers.

use super::pipeline::SourceFormat;
use crate::error::{IngestError, IngestResult};

/// Leading bytes of every gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Check that `payload` carries the magic number of its claimed format.
///
/// Only gzip is checked today; all other formats succeed unconditionally.
/// Payloads shorter than the magic number fail the check.
pub fn validate_signature(payload: &[u8], format: SourceFormat) -> IngestResult<()> {
    match format {
        SourceFormat::Gzip => {
            if payload.len() < GZIP_MAGIC.len() || payload[..2] != GZIP_MAGIC {
                return Err(IngestError::InvalidSignature {
                    expected: "gzip",
                    found: payload.iter().copied().take(2).collect(),
                });
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_signature, GZIP_MAGIC};
    use crate::error::{IngestError, Stage};
    use crate::ingestion::SourceFormat;

    #[test]
    fn accepts_gzip_magic() {
        let payload = [GZIP_MAGIC[0], GZIP_MAGIC[1], 0x08, 0x00];
        assert!(validate_signature(&payload, SourceFormat::Gzip).is_ok());
    }

    #[test]
    fn rejects_wrong_magic_regardless_of_length() {
        let html = b"<!DOCTYPE html><html>not found</html>";
        let err = validate_signature(html, SourceFormat::Gzip).unwrap_err();
        assert!(matches!(err, IngestError::InvalidSignature { .. }));
        assert_eq!(err.stage(), Stage::Validate);
    }

    #[test]
    fn rejects_payload_shorter_than_magic() {
        let err = validate_signature(&[0x1f], SourceFormat::Gzip).unwrap_err();
        assert!(matches!(err, IngestError::InvalidSignature { .. }));
    }

    #[test]
    fn other_formats_are_not_checked() {
        assert!(validate_signature(b"anything", SourceFormat::Csv).is_ok());
        assert!(validate_signature(b"anything", SourceFormat::Zip).is_ok());
        assert!(validate_signature(b"", SourceFormat::Json).is_ok());
    }
}
