//! Compression codec for opaque byte payloads.
//!
//! Compresses and decompresses byte buffers (concretely, JSON-serialized
//! track payloads) in the zlib container format via `flate2`. The container
//! does not record the uncompressed size, so decompression discovers a
//! sufficient output buffer empirically: start from a hint, double on
//! exhaustion, give up after a fixed number of attempts. Compression gets a
//! single attempt with a 2x margin; an encode failure is surfaced rather
//! than worked around.

use crate::error::{FogmapError, Result};
use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

/// Smallest destination buffer for compression; covers container overhead on
/// tiny inputs.
const MIN_ENCODE_CAPACITY: usize = 64;

/// Default decompression size hint: 64 KiB.
pub const DEFAULT_DECODE_HINT: usize = 64 * 1024;

/// Maximum decompression attempts before giving up.
const MAX_DECODE_ATTEMPTS: u32 = 8;

/// Compress a byte buffer into the zlib format.
///
/// Empty input returns empty output. The destination buffer is sized at
/// `max(64, 2 * input.len())` and the primitive is invoked exactly once;
/// anything short of a completed stream with output is [`FogmapError::EncodeFailed`].
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let capacity = data.len().saturating_mul(2).max(MIN_ENCODE_CAPACITY);
    let mut out = Vec::with_capacity(capacity);
    let mut encoder = Compress::new(Compression::default(), true);

    let status = encoder
        .compress_vec(data, &mut out, FlushCompress::Finish)
        .map_err(|_| FogmapError::EncodeFailed)?;
    if !matches!(status, Status::StreamEnd) || out.is_empty() {
        return Err(FogmapError::EncodeFailed);
    }

    Ok(out)
}

/// Decompress a zlib-format buffer with the default size hint.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decompress_with_hint(data, DEFAULT_DECODE_HINT)
}

/// Decompress a zlib-format buffer, starting from `size_hint` bytes of
/// output capacity.
///
/// Empty input returns empty output. The initial capacity is
/// `max(size_hint, 4 * input.len())`; if the stream does not end within
/// that buffer, capacity doubles and decompression restarts from scratch,
/// up to 8 attempts total. Corrupt input fails immediately with
/// [`FogmapError::DecodeFailed`].
pub fn decompress_with_hint(data: &[u8], size_hint: usize) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut capacity = size_hint.max(data.len().saturating_mul(4));
    for _ in 0..MAX_DECODE_ATTEMPTS {
        let mut out = Vec::with_capacity(capacity);
        let mut decoder = Decompress::new(true);
        match decoder.decompress_vec(data, &mut out, FlushDecompress::Finish) {
            Ok(Status::StreamEnd) => return Ok(out),
            // Output filled before the stream ended, or the stream was cut
            // short; the true size is unknown, so grow and start over.
            Ok(_) => capacity = capacity.saturating_mul(2),
            Err(_) => return Err(FogmapError::DecodeFailed),
        }
    }

    Err(FogmapError::DecodeFailed)
}
