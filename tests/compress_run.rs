//! End-to-end run through the public API with a scripted backend:
//! inspect -> plan -> execute -> select -> promote, checking the final
//! artifact on disk and that the trial scratch space is swept away.

use gifslim::{run, CompressionBackend, CompressionRequest, ParameterSet};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// Both tests touch TMPDIR, so they must not overlap.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Minimal well-formed GIF89a with `frames` image blocks, padded with
/// trailing bytes to `total_len` so file size is controllable.
fn gif_bytes(frames: usize, total_len: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"GIF89a");
    // Logical screen descriptor, no global color table.
    bytes.extend_from_slice(&[0x10, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00]);
    for _ in 0..frames {
        // Graphic control extension.
        bytes.extend_from_slice(&[0x21, 0xF9, 0x04, 0x00, 0x0A, 0x00, 0x00, 0x00]);
        // Image descriptor, no local color table.
        bytes.push(0x2C);
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x10, 0x00, 0x00]);
        // LZW minimum code size + one data sub-block + terminator.
        bytes.push(0x02);
        bytes.extend_from_slice(&[0x01, 0xFF, 0x00]);
    }
    bytes.push(0x3B);
    if bytes.len() < total_len {
        bytes.resize(total_len, 0);
    }
    bytes
}

/// Backend producing honest artifacts whose size shrinks with stride and
/// grows with color table size, so the search has a real gradient.
struct StubBackend {
    base_len: usize,
    calls: AtomicUsize,
}

impl StubBackend {
    fn new(base_len: usize) -> Self {
        Self {
            base_len,
            calls: AtomicUsize::new(0),
        }
    }
}

impl CompressionBackend for StubBackend {
    fn is_available(&self) -> bool {
        true
    }

    fn run_once(
        &self,
        _input: &Path,
        output: &Path,
        params: &ParameterSet,
        frame_count: usize,
    ) -> gifslim::Result<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let frames = params.expected_frames(frame_count);
        let len = self.base_len / params.frame_stride + params.color_table_size * 16;
        fs::write(output, gif_bytes(frames, len))?;
        Ok(())
    }
}

#[test]
fn full_run_promotes_winner_and_sweeps_scratch() {
    let _guard = ENV_LOCK.lock().unwrap();
    let work = tempfile::tempdir().unwrap();
    let input = work.path().join("input.gif");
    let output = work.path().join("out/slim.gif");
    fs::write(&input, gif_bytes(20, 400 * 1024)).unwrap();

    // Point trial scratch space at a private dir we can audit afterwards.
    let scratch_root = work.path().join("scratch");
    fs::create_dir_all(&scratch_root).unwrap();
    let saved_tmpdir = std::env::var_os("TMPDIR");
    std::env::set_var("TMPDIR", &scratch_root);

    let backend = StubBackend::new(200 * 1024);
    let request = CompressionRequest::new(input.clone(), output.clone(), 150.0, 10, 2).unwrap();
    let result = run(&backend, &request).unwrap();

    match saved_tmpdir {
        Some(v) => std::env::set_var("TMPDIR", v),
        None => std::env::remove_var("TMPDIR"),
    }

    assert!(result.success);
    assert!(result.compressed_size_kb <= 150.0);
    assert!(backend.calls.load(Ordering::Relaxed) > 0);

    // Winner landed at the requested path and is a readable GIF.
    let produced = gifslim::inspect(&output).unwrap();
    assert!(produced.frame_count >= request.min_frames(20));
    assert!((produced.size_kb - result.compressed_size_kb).abs() < 0.01);

    // Input untouched, losing artifacts gone with their scratch dir.
    assert!(input.exists());
    let leftovers: Vec<_> = fs::read_dir(&scratch_root).unwrap().collect();
    assert!(leftovers.is_empty(), "scratch not swept: {:?}", leftovers);
}

#[test]
fn best_effort_run_still_writes_output() {
    let _guard = ENV_LOCK.lock().unwrap();
    let work = tempfile::tempdir().unwrap();
    let input = work.path().join("input.gif");
    let output = work.path().join("slim.gif");
    fs::write(&input, gif_bytes(8, 900 * 1024)).unwrap();

    // No artifact will fit a 1 KB target.
    let backend = StubBackend::new(600 * 1024);
    let request = CompressionRequest::new(input, output.clone(), 1.0, 25, 2).unwrap();
    let result = run(&backend, &request).unwrap();

    assert!(!result.success);
    assert!(output.exists());
    assert!(result.message.contains("best effort"));
}
