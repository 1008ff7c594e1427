//! LZO1X format constants, status codes, and the decoder error type.
//!
//! The numeric status values are the ones liblzo returns from
//! `lzo1x_decompress_safe` (lzoconf.h), so callers that interoperate with
//! C code can pass them through unchanged.

use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Match-band constants (lzo1x.h / lzo1x_d.ch)
// ─────────────────────────────────────────────────────────────────────────────

/// Longest distance of a 2-byte M1 match following a match.
pub const M1_MAX_OFFSET: usize = 0x0400;
/// Longest distance of an M2 match (control byte ≥ 64).
pub const M2_MAX_OFFSET: usize = 0x0800;
/// Longest distance of an M3 match (control byte 32..64).
pub const M3_MAX_OFFSET: usize = 0x4000;
/// Longest distance of an M4 match (control byte 16..32).
pub const M4_MAX_OFFSET: usize = 0xbfff;

/// Shortest / longest match lengths representable inline in each band.
pub const M2_MIN_LEN: usize = 3;
pub const M2_MAX_LEN: usize = 8;
pub const M3_MAX_LEN: usize = 33;
pub const M4_MAX_LEN: usize = 9;

/// Control-byte markers for the match bands.
pub const M1_MARKER: u8 = 0;
pub const M2_MARKER: u8 = 64;
pub const M3_MARKER: u8 = 32;
pub const M4_MARKER: u8 = 16;

/// Largest first byte that is still a regular control byte. Anything above
/// encodes an initial literal run of `byte - 17`.
pub const FIRST_LITERAL_BIAS: u8 = 17;

/// The three bytes every LZO1X stream ends with: an M4 match of length
/// field 1 and distance zero.
pub const END_OF_STREAM: [u8; 3] = [M4_MARKER | 1, 0, 0];

// ─────────────────────────────────────────────────────────────────────────────
// Status codes
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of a decompression call, carrying the liblzo numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum LzoStatus {
    /// The whole stream decoded and every declared input byte was consumed.
    Ok = 0,
    /// Generic inconsistency (bad end marker, invalid call window, …).
    Error = -1,
    /// The decoder needed bytes beyond the declared input length.
    InputOverrun = -4,
    /// A back-reference pointed before the start of the output window.
    LookbehindOverrun = -6,
    /// The end marker was reached with declared input left over.
    InputNotConsumed = -8,
}

impl LzoStatus {
    /// The numeric liblzo code (`LZO_E_*`).
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Maps a liblzo code back to a status. Codes this decoder never produces
    /// (out of memory, output overrun, …) collapse to [`LzoStatus::Error`].
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => LzoStatus::Ok,
            -4 => LzoStatus::InputOverrun,
            -6 => LzoStatus::LookbehindOverrun,
            -8 => LzoStatus::InputNotConsumed,
            _ => LzoStatus::Error,
        }
    }

    pub fn is_ok(self) -> bool {
        self == LzoStatus::Ok
    }
}

impl From<DecompressError> for LzoStatus {
    fn from(e: DecompressError) -> Self {
        match e {
            DecompressError::Malformed => LzoStatus::Error,
            DecompressError::InputOverrun => LzoStatus::InputOverrun,
            DecompressError::LookbehindOverrun => LzoStatus::LookbehindOverrun,
            DecompressError::InputNotConsumed => LzoStatus::InputNotConsumed,
        }
    }
}

/// Errors returned by the `Result`-based decompression entry points.
///
/// One variant per non-`Ok` [`LzoStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecompressError {
    #[error("malformed LZO1X stream")]
    Malformed,
    #[error("LZO1X input overrun: stream needs more bytes than supplied")]
    InputOverrun,
    #[error("LZO1X lookbehind overrun: back-reference before start of output")]
    LookbehindOverrun,
    #[error("LZO1X input not consumed: trailing bytes after end of stream")]
    InputNotConsumed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Small helpers shared by the encoder and decoder
// ─────────────────────────────────────────────────────────────────────────────

/// Reads a little-endian `u32` starting at `pos`.
///
/// Callers guarantee `pos + 4 <= buf.len()`.
#[inline(always)]
pub(crate) fn read_le32(buf: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]])
}
