//! Atomic-enough file persistence for chunk and world metadata blobs, with
//! the compression-flag header described in §4.C.

use std::fs;
use std::path::Path;

use crate::rle;

const FLAG_UNCOMPRESSED: u8 = 0;
const FLAG_COMPRESSED: u8 = 1;

/// Writes `data` to `path`, creating any missing parent directories.
/// When `use_compression` is set, the payload is RLE-compressed and a
/// 4-byte little-endian original-size hint (advisory only) follows the
/// flag byte.
///
/// # Errors
/// Returns the underlying I/O error on directory creation or write failure.
pub fn save_to_file(path: &Path, data: &[u8], use_compression: bool) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut buf = Vec::with_capacity(data.len() + 5);
    if use_compression {
        buf.push(FLAG_COMPRESSED);
        buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        buf.extend_from_slice(&rle::compress(data));
    } else {
        buf.push(FLAG_UNCOMPRESSED);
        buf.extend_from_slice(data);
    }

    fs::write(path, buf)
}

/// Reads and decompresses (if flagged) the file at `path`. Fails soft:
/// a missing file or a header shorter than one byte returns an empty
/// buffer, which the caller treats as "not present".
#[must_use]
pub fn load_from_file(path: &Path) -> Vec<u8> {
    let Ok(raw) = fs::read(path) else {
        return Vec::new();
    };
    if raw.is_empty() {
        return Vec::new();
    }

    let flag = raw[0];
    match flag {
        FLAG_COMPRESSED => {
            if raw.len() < 5 {
                return Vec::new();
            }
            rle::decompress(&raw[5..])
        }
        _ => raw[1..].to_vec(),
    }
}

#[must_use]
pub fn file_exists(path: &Path) -> bool {
    path.exists()
}
