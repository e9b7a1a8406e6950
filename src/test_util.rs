//! Shared fixtures for unit tests: hand-assembled GIF containers small
//! enough to reason about byte by byte.

use std::io::Write;

/// Minimal syntactically valid GIF: header, logical screen descriptor (no
/// global color table), `frames` image blocks each preceded by a graphic
/// control extension, trailer. Pixel data is opaque to the structural
/// scanner, so the LZW payload is arbitrary.
pub(crate) fn synthetic_gif(frames: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"GIF89a");
    bytes.extend_from_slice(&[0x10, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00]);
    for _ in 0..frames {
        bytes.extend_from_slice(&[0x21, 0xF9, 0x04, 0x00, 0x0A, 0x00, 0x00, 0x00]);
        bytes.push(0x2C);
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x10, 0x00, 0x00]);
        bytes.push(0x02);
        bytes.extend_from_slice(&[0x03, 0xAA, 0xBB, 0xCC, 0x00]);
    }
    bytes.push(0x3B);
    bytes
}

/// Same container padded with trailing bytes (after the trailer, which the
/// scanner never reads past) so tests can dictate exact file sizes.
pub(crate) fn synthetic_gif_padded(frames: usize, total_len: usize) -> Vec<u8> {
    let mut bytes = synthetic_gif(frames);
    if bytes.len() < total_len {
        bytes.resize(total_len, 0);
    }
    bytes
}

pub(crate) fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("create temp fixture");
    f.write_all(bytes).expect("write temp fixture");
    f
}
