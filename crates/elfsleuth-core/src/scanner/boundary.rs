//! Boundary-safe streaming signature search.
//!
//! Files may be larger than RAM, so content is read in fixed-size chunks
//! and searched chunk by chunk. A match that straddles two chunks would be
//! invisible to independent chunk searches, so the last `overlap = L - 1`
//! bytes of each chunk are carried to the front of the next read: every
//! L-byte occurrence, wherever it falls, then appears intact in at least
//! one search window.
//!
//! Buffer layout (`overlap + buffer_size` bytes):
//!
//! ```text
//! [ carry: overlap bytes ][ fresh read: up to buffer_size bytes ]
//! ```
//!
//! On the first iteration nothing has been carried yet, so the carry
//! region holds no valid data and is excluded from the search window
//! (searching it would match against unwritten buffer content).

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use memchr::memmem;

use crate::signature::Signature;

/// Smallest chunk size used regardless of signature length.
pub const MIN_BUFFER_SIZE: usize = 4096;

/// Headroom added on top of the signature length when the signature is
/// large enough to dominate the chunk size.
pub const EXTRA_BUFFER: usize = 1024;

/// Chunk size for a given signature: `max(4096, L + 1024)`.
#[inline]
pub fn buffer_size_for(signature: &Signature) -> usize {
    MIN_BUFFER_SIZE.max(signature.len() + EXTRA_BUFFER)
}

/// Check whether `signature` occurs anywhere in the file at `path`.
///
/// Memory use is bounded by the chunk size, independent of file size.
/// Open and read failures are surfaced as errors rather than folded into
/// "not found"; the orchestrator turns them into per-file error reports.
pub fn contains_signature(path: &Path, signature: &Signature) -> io::Result<bool> {
    let file = File::open(path)?;
    scan_reader(file, signature, buffer_size_for(signature))
}

/// Chunked search over any reader, with an explicit chunk size.
///
/// The result is invariant under `buffer_size` (sizes smaller than the
/// signature are clamped up to it); the parameter exists so tests can force
/// matches onto chunk boundaries with tiny buffers.
pub fn scan_reader<R: Read>(
    mut reader: R,
    signature: &Signature,
    buffer_size: usize,
) -> io::Result<bool> {
    let sig = signature.as_bytes();
    let buffer_size = buffer_size.max(sig.len());
    let overlap = signature.overlap();
    let finder = memmem::Finder::new(sig);

    let mut buf = vec![0u8; overlap + buffer_size];
    let mut carry_len = 0usize;

    loop {
        let bytes_read = read_to_capacity(&mut reader, &mut buf[overlap..])?;

        // Valid window: the carried tail of the previous chunk (empty on
        // the first pass) plus the bytes just read.
        let window = &buf[overlap - carry_len..overlap + bytes_read];
        if finder.find(window).is_some() {
            return Ok(true);
        }

        // A short read past here means EOF: a partial signature at the
        // very end of the file can never complete, so stop.
        if bytes_read < buffer_size {
            return Ok(false);
        }

        if overlap > 0 {
            // Carry the last `overlap` bytes of this chunk to the front.
            // The chunk was full, so it has at least overlap + 1 bytes and
            // the source range starts past the carry region.
            buf.copy_within(bytes_read..bytes_read + overlap, 0);
            carry_len = overlap;
        }
    }
}

/// Read until `buf` is full or EOF, retrying on interruption.
///
/// A plain `read` may return fewer bytes than requested mid-file, which
/// would be indistinguishable from EOF to the scan loop above.
fn read_to_capacity<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
