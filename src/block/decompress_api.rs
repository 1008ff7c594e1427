//! Public LZO1X block decompression API.
//!
//!   - [`decompress`]: the window-based call: explicit source offset and
//!     length, explicit destination offset, liblzo-style status result.
//!   - [`decompress_safe`]: `Result`-returning variant that appends to a
//!     vector.
//!   - [`decompress_safe_limited`]: the same with a cap on the output
//!     size, for callers that know the expected length.
//!   - [`decompress_to_vec`]: convenience wrapper allocating the output.
//!
//! All of them share [`decompress_generic`] and differ only in how the
//! window is described and how the outcome is reported.

use super::decompress_core::decompress_generic;
use super::types::{DecompressError, LzoStatus};

/// Decompresses `src[src_offset..src_offset + src_len]` into `dst` starting
/// at `dst_offset`.
///
/// `dst` may be pre-sized by the caller: bytes from `dst_offset` on are
/// overwritten, and the vector grows when the output runs past its end.
/// Back-references may not reach below `dst_offset`.
///
/// Returns the status together with the number of bytes written past
/// `dst_offset`. On any status other than [`LzoStatus::Ok`] the written
/// bytes are a partial result and must not be used.
///
/// A window that does not fit the buffers (`src_offset + src_len` past the
/// end of `src`, or `dst_offset` past the end of `dst`) yields
/// [`LzoStatus::Error`] without touching `dst`.
pub fn decompress(
    src: &[u8],
    src_offset: usize,
    src_len: usize,
    dst: &mut Vec<u8>,
    dst_offset: usize,
) -> (LzoStatus, usize) {
    let window = match src_offset
        .checked_add(src_len)
        .and_then(|end| src.get(src_offset..end))
    {
        Some(window) => window,
        None => return (LzoStatus::Error, 0),
    };
    match decompress_generic(window, dst, dst_offset, None) {
        (Ok(()), written) => (LzoStatus::Ok, written),
        (Err(e), written) => (e.into(), written),
    }
}

/// Decompresses the whole of `src`, appending the output to `dst`.
///
/// Existing content of `dst` is preserved and is not reachable by
/// back-references. Returns the number of bytes appended.
pub fn decompress_safe(src: &[u8], dst: &mut Vec<u8>) -> Result<usize, DecompressError> {
    let start = dst.len();
    let (result, written) = decompress_generic(src, dst, start, None);
    result.map(|()| written)
}

/// Like [`decompress_safe`], but a stream that would append more than
/// `max_out` bytes fails with [`DecompressError::Malformed`] before `dst`
/// grows past that bound.
pub fn decompress_safe_limited(
    src: &[u8],
    dst: &mut Vec<u8>,
    max_out: usize,
) -> Result<usize, DecompressError> {
    let start = dst.len();
    let (result, written) = decompress_generic(src, dst, start, Some(max_out));
    result.map(|()| written)
}

/// Decompresses `src` into a new vector. `size_hint` is only used to
/// pre-allocate; the output may be longer or shorter.
pub fn decompress_to_vec(src: &[u8], size_hint: usize) -> Result<Vec<u8>, DecompressError> {
    let mut out = Vec::with_capacity(size_hint);
    decompress_safe(src, &mut out)?;
    Ok(out)
}
