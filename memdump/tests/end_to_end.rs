//! Capture, decode and export a dump through the public API.

use memdump::prelude::*;
use memdump_core::{LOG_START, VALUES_START};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

fn logger_frame(rows: i64) -> Vec<u8> {
    let mut encoder = FrameEncoder::new(["timestamp", "battery_mv", "altitude_cm"]);
    for i in 0..rows {
        encoder.push_row([i * 10, 3300 - i, 0xFFFF_0000 + i]);
    }
    // A partial row the device had not finished writing.
    encoder.raw(&[0xAB, 0xCD]).finish()
}

async fn device(mut link: DuplexStream, frame: Vec<u8>) {
    let mut cmd = [0u8; 1];
    link.read_exact(&mut cmd).await.unwrap();
    assert_eq!(cmd[0], b'A');
    for part in frame.chunks(512) {
        link.write_all(part).await.unwrap();
        link.read_exact(&mut cmd).await.unwrap();
        assert_eq!(cmd[0], b'B');
    }
    let mut rest = Vec::new();
    let _ = link.read_to_end(&mut rest).await;
}

#[tokio::test(start_paused = true)]
async fn test_capture_decode_export() {
    let frame = logger_frame(500);
    let (host, link) = tokio::io::duplex(64 * 1024);
    tokio::spawn(device(link, frame.clone()));

    let mut session = DumpSession::new(host, CaptureConfig::default());
    session.request_dump().await.unwrap();
    let dataset = session.run_to_completion().await.unwrap();

    assert_eq!(dataset, decode(&frame).unwrap());
    assert_eq!(dataset.width(), 3);
    assert_eq!(dataset.height(), 500);
    assert_eq!(dataset.discarded_bytes(), 2);
    assert_eq!(dataset.rows()[499].cells(), [4990, 2801, 0xFFFF_0000 + 499]);

    let dir = tempfile::tempdir().unwrap();
    let path = export_csv(&dataset, &dir.path().join("flight"), &CsvOptions::default()).unwrap();
    let text = std::fs::read_to_string(path).unwrap();
    let mut lines = text.split("\n\r");
    assert_eq!(lines.next(), Some("timestamp;battery_mv;altitude_cm;"));
    assert_eq!(lines.next(), Some("0;3300;4294901760;"));
    assert_eq!(text.matches("\n\r").count(), 501);
}

#[test]
fn test_growing_buffer_never_loses_rows() {
    let frame = logger_frame(64);
    let mut buffer = CaptureBuffer::new();
    let mut incremental = IncrementalDecoder::default();
    let mut seen_rows = 0;

    for chunk in frame.chunks(37) {
        buffer.extend(chunk);
        let full = FrameDecoder::new().decode(&buffer);
        let fast = incremental.decode(&buffer);
        assert_eq!(full, fast);
        if let Ok(dataset) = full {
            assert!(dataset.height() >= seen_rows);
            seen_rows = dataset.height();
        }
    }
    assert_eq!(seen_rows, 64);
}

#[test]
fn test_reordered_markers_are_rejected() {
    let mut buffer = VALUES_START.bytes().to_vec();
    buffer.extend_from_slice(LOG_START.bytes());
    buffer.extend_from_slice(b"A;B");
    let err = decode(&buffer).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidHeaderRegion { .. }));
}

#[test]
fn test_coalesced_progress_over_large_frame() {
    let frame = logger_frame(10_000);
    let mut events: Vec<(usize, usize)> = Vec::new();
    let dataset = FrameDecoder::new()
        .decode_with_progress(&frame, &mut |c: usize, t: usize| events.push((c, t)))
        .unwrap();
    assert_eq!(dataset.height(), 10_000);
    assert_eq!(events.len(), 100);
    assert_eq!(events.last(), Some(&(10_000, 10_000)));
}
