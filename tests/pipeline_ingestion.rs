use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use flate2::write::GzEncoder;
use flate2::Compression;

use tabular_ingest::ingestion::{
    ingest_from_url, IngestContext, IngestObserver, IngestOptions, IngestSeverity, IngestStats,
};
use tabular_ingest::{IngestError, Stage};

/// Serve `body` over plain HTTP on a loopback port for `accepts`
/// sequential connections, ignoring the request itself.
fn serve(status_line: &'static str, body: Vec<u8>, accepts: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for _ in 0..accepts {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let header = format!(
                "{status_line}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(&body);
        }
    });

    format!("http://{addr}")
}

fn gzip_bytes(content: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content).unwrap();
    encoder.finish().unwrap()
}

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<IngestStats>>,
    failures: Mutex<Vec<IngestSeverity>>,
    alerts: Mutex<Vec<IngestSeverity>>,
}

impl IngestObserver for RecordingObserver {
    fn on_success(&self, _ctx: &IngestContext, stats: IngestStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &IngestContext, severity: IngestSeverity, _error: &IngestError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &IngestContext, severity: IngestSeverity, _error: &IngestError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn unsupported_format_short_circuits_before_any_network_call() {
    // Nothing listens on this address; the run must fail on detection
    // alone, not on a connection attempt.
    let err = ingest_from_url(
        "http://127.0.0.1:9/data.parquet",
        &IngestOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    assert_eq!(err.stage(), Stage::Detect);
}

#[test]
fn end_to_end_csv_ingestion() {
    let base = serve("HTTP/1.1 200 OK", b"a,b\n1,x\n2,y\n".to_vec(), 1);
    let url = format!("{base}/data.csv");

    let out = ingest_from_url(&url, &IngestOptions::default()).unwrap();
    assert_eq!(out.table.row_count(), 2);
    assert_eq!(
        out.table.column_names().collect::<Vec<_>>(),
        vec!["a", "b"]
    );
    assert!(out.schema.is_numeric("a"));
    assert!(out.schema.is_categorical("b"));
}

#[test]
fn end_to_end_gzip_ingestion() {
    let body = gzip_bytes(b"age,sex\n63,Male\n41,Female\n");
    let base = serve("HTTP/1.1 200 OK", body, 1);
    let url = format!("{base}/heart.csv.gz");

    let out = ingest_from_url(&url, &IngestOptions::default()).unwrap();
    assert_eq!(out.table.row_count(), 2);
    assert!(out.schema.is_numeric("age"));
    assert!(out.schema.is_categorical("sex"));
}

#[test]
fn mislabeled_gzip_fails_signature_validation() {
    // Plain CSV served from a .gz URL: the extension lies about the bytes.
    let base = serve("HTTP/1.1 200 OK", b"a,b\n1,2\n".to_vec(), 1);
    let url = format!("{base}/data.csv.gz");

    let err = ingest_from_url(&url, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::InvalidSignature { .. }));
    assert_eq!(err.stage(), Stage::Validate);
}

#[test]
fn repeated_runs_on_unchanged_content_are_identical() {
    let base = serve("HTTP/1.1 200 OK", b"a,b\n1,x\n2,y\n".to_vec(), 2);
    let url = format!("{base}/data.csv");
    let opts = IngestOptions::default();

    let first = ingest_from_url(&url, &opts).unwrap();
    let second = ingest_from_url(&url, &opts).unwrap();
    assert_eq!(first.table, second.table);
    assert_eq!(first.schema, second.schema);
}

#[test]
fn http_error_status_is_a_transport_failure() {
    let base = serve("HTTP/1.1 404 Not Found", b"gone".to_vec(), 1);
    let url = format!("{base}/data.csv");

    let err = ingest_from_url(&url, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::Transport(_)));
    assert_eq!(err.stage(), Stage::Fetch);
}

#[test]
fn observer_sees_success_with_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let base = serve("HTTP/1.1 200 OK", b"a,b\n1,x\n".to_vec(), 1);
    let url = format!("{base}/data.csv");

    let opts = IngestOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };
    ingest_from_url(&url, &opts).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes, vec![IngestStats { rows: 1, columns: 2 }]);
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_transport_error() {
    let obs = Arc::new(RecordingObserver::default());
    let base = serve("HTTP/1.1 500 Internal Server Error", Vec::new(), 1);
    let url = format!("{base}/data.csv");

    let opts = IngestOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: IngestSeverity::Critical,
        ..Default::default()
    };
    let _ = ingest_from_url(&url, &opts).unwrap_err();

    let failures = obs.failures.lock().unwrap().clone();
    let alerts = obs.alerts.lock().unwrap().clone();
    assert_eq!(failures, vec![IngestSeverity::Critical]);
    assert_eq!(alerts, vec![IngestSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_data_errors() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: IngestSeverity::Critical,
        ..Default::default()
    };

    // Unsupported format -> Error severity (not Critical) -> no alert.
    let _ = ingest_from_url("http://127.0.0.1:9/data.bin", &opts).unwrap_err();

    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(failures, vec![IngestSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn format_override_wins_over_url_suffix() {
    use tabular_ingest::SourceFormat;

    // Served CSV behind an extensionless URL; the override makes it work.
    let base = serve("HTTP/1.1 200 OK", b"a\n1\n".to_vec(), 1);
    let url = format!("{base}/download");

    let opts = IngestOptions {
        format: Some(SourceFormat::Csv),
        ..Default::default()
    };
    let out = ingest_from_url(&url, &opts).unwrap();
    assert_eq!(out.table.row_count(), 1);
}
