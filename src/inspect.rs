//! GifInspector: cheap structural scan of a GIF container.
//!
//! Reports file size (from fs metadata, O(1)) and frame count by walking the
//! container's block sequence - image descriptors, extension blocks, data
//! sub-blocks - without ever decoding pixel data. A full raster decode of a
//! 1000-frame GIF just to count frames would dominate the whole search, so
//! the scanner skips LZW payloads wholesale.

use crate::errors::{GifSlimError, Result};
use crate::types::GifMetadata;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

const HEADER_LEN: usize = 6;
const TRAILER: u8 = 0x3B;
const EXTENSION_INTRODUCER: u8 = 0x21;
const IMAGE_SEPARATOR: u8 = 0x2C;

/// Inspect a GIF without decoding it. Read-only, idempotent for an
/// unmodified file.
pub fn inspect(path: &Path) -> Result<GifMetadata> {
    let meta = fs::metadata(path).map_err(|e| map_open_error(e, path))?;
    let size_kb = meta.len() as f64 / 1024.0;

    let file = File::open(path).map_err(|e| map_open_error(e, path))?;
    let frame_count = scan_frames(BufReader::new(file), path)?;

    Ok(GifMetadata {
        size_kb,
        frame_count,
    })
}

fn map_open_error(e: std::io::Error, path: &Path) -> GifSlimError {
    if e.kind() == std::io::ErrorKind::NotFound {
        GifSlimError::InputNotFound(path.display().to_string())
    } else {
        GifSlimError::Io(e)
    }
}

/// Walk the block structure and count image descriptors.
fn scan_frames<R: Read>(mut reader: R, path: &Path) -> Result<usize> {
    let mut header = [0u8; HEADER_LEN];
    reader
        .read_exact(&mut header)
        .map_err(|_| GifSlimError::NotAGif(path.display().to_string()))?;
    if &header != b"GIF87a" && &header != b"GIF89a" {
        return Err(GifSlimError::NotAGif(path.display().to_string()));
    }

    // Logical screen descriptor: width, height, packed, background, aspect.
    let mut lsd = [0u8; 7];
    reader
        .read_exact(&mut lsd)
        .map_err(|_| truncated(path, "logical screen descriptor"))?;

    // Global color table, if flagged.
    if lsd[4] & 0x80 != 0 {
        let table_len = 3 * (2usize << (lsd[4] & 0x07));
        skip(&mut reader, table_len).map_err(|_| truncated(path, "global color table"))?;
    }

    let mut frames = 0usize;
    loop {
        let introducer = match read_byte(&mut reader) {
            Ok(b) => b,
            Err(_) => return Err(truncated(path, "missing trailer")),
        };
        match introducer {
            TRAILER => return Ok(frames),
            EXTENSION_INTRODUCER => {
                // Label byte, then data sub-blocks until a zero-length block.
                read_byte(&mut reader).map_err(|_| truncated(path, "extension label"))?;
                skip_sub_blocks(&mut reader).map_err(|_| truncated(path, "extension data"))?;
            }
            IMAGE_SEPARATOR => {
                // Descriptor: left, top, width, height (u16 each), packed.
                let mut descriptor = [0u8; 9];
                reader
                    .read_exact(&mut descriptor)
                    .map_err(|_| truncated(path, "image descriptor"))?;
                if descriptor[8] & 0x80 != 0 {
                    let table_len = 3 * (2usize << (descriptor[8] & 0x07));
                    skip(&mut reader, table_len)
                        .map_err(|_| truncated(path, "local color table"))?;
                }
                // LZW minimum code size, then compressed data sub-blocks.
                read_byte(&mut reader).map_err(|_| truncated(path, "LZW code size"))?;
                skip_sub_blocks(&mut reader).map_err(|_| truncated(path, "image data"))?;
                frames += 1;
            }
            other => {
                return Err(truncated(
                    path,
                    &format!("unexpected block introducer 0x{:02X}", other),
                ));
            }
        }
    }
}

fn truncated(path: &Path, what: &str) -> GifSlimError {
    GifSlimError::Truncated(format!("{} ({})", path.display(), what))
}

fn read_byte<R: Read>(reader: &mut R) -> std::io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn skip<R: Read>(reader: &mut R, len: usize) -> std::io::Result<()> {
    let n = std::io::copy(&mut reader.by_ref().take(len as u64), &mut std::io::sink())?;
    if n as usize == len {
        Ok(())
    } else {
        Err(std::io::ErrorKind::UnexpectedEof.into())
    }
}

/// Data sub-blocks: length-prefixed runs terminated by a zero-length block.
fn skip_sub_blocks<R: Read>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let len = read_byte(reader)?;
        if len == 0 {
            return Ok(());
        }
        skip(reader, len as usize)?;
    }
}
