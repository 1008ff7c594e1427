//! LZO1X-1 block compression.
//!
//! A single-probe hash-table compressor in the style of liblzo's
//! `lzo1x_1_compress`: the input is processed in chunks of at most
//! `M4_MAX_OFFSET + 1` bytes so every match distance fits an M4 encoding,
//! literals not yet emitted are carried across chunk boundaries, and the
//! stream is terminated with the standard end-of-stream marker.

use super::types::{
    read_le32, END_OF_STREAM, FIRST_LITERAL_BIAS, M2_MAX_LEN, M2_MAX_OFFSET, M3_MARKER,
    M3_MAX_LEN, M3_MAX_OFFSET, M4_MARKER, M4_MAX_LEN, M4_MAX_OFFSET,
};

/// Log₂ of the number of dictionary slots.
pub const D_BITS: u32 = 14;
const D_SIZE: usize = 1 << D_BITS;
const D_MASK: usize = D_SIZE - 1;

/// Inputs are compressed in chunks of this size so that dictionary entries
/// fit in `u16` and every distance stays within the M4 band.
const CHUNK_SIZE: usize = M4_MAX_OFFSET + 1;

/// The last bytes of a chunk are never searched for matches.
const CHUNK_TAIL: usize = 20;

/// Longest literal run that can be folded into the first byte of a stream.
const MAX_FIRST_LITERAL_RUN: usize = 238;

/// Worst-case compressed size for an input of `len` bytes.
pub const fn compress_bound(len: usize) -> usize {
    len + len / 16 + 64 + 3
}

#[inline(always)]
fn dindex(dv: u32) -> usize {
    (dv.wrapping_mul(0x1824_429d) >> (32 - D_BITS)) as usize & D_MASK
}

/// Appends a zero-run length: one `0x00` per 255, then the remainder.
fn push_zero_run(dst: &mut Vec<u8>, mut n: usize) {
    while n > 255 {
        n -= 255;
        dst.push(0);
    }
    dst.push(n as u8);
}

/// Emits a literal run that precedes a match.
///
/// Runs of 1..=3 bytes are folded into the low bits of the previous match's
/// second-to-last byte, which is always present here because a chunk cannot
/// start with such a short run.
fn push_literals(dst: &mut Vec<u8>, lit: &[u8]) {
    let t = lit.len();
    if t == 0 {
        return;
    }
    if t <= 3 {
        let n = dst.len();
        dst[n - 2] |= t as u8;
    } else if t <= 18 {
        dst.push((t - 3) as u8);
    } else {
        dst.push(0);
        push_zero_run(dst, t - 18);
    }
    dst.extend_from_slice(lit);
}

fn push_match(dst: &mut Vec<u8>, m_off: usize, m_len: usize) {
    if m_len <= M2_MAX_LEN && m_off <= M2_MAX_OFFSET {
        let off = m_off - 1;
        dst.push((((m_len - 1) << 5) | ((off & 7) << 2)) as u8);
        dst.push((off >> 3) as u8);
    } else if m_off <= M3_MAX_OFFSET {
        let off = m_off - 1;
        if m_len <= M3_MAX_LEN {
            dst.push(M3_MARKER | (m_len - 2) as u8);
        } else {
            dst.push(M3_MARKER);
            push_zero_run(dst, m_len - M3_MAX_LEN);
        }
        dst.push((off << 2) as u8);
        dst.push((off >> 6) as u8);
    } else {
        let off = m_off - M3_MAX_OFFSET;
        let high = ((off >> 11) & 8) as u8;
        if m_len <= M4_MAX_LEN {
            dst.push(M4_MARKER | high | (m_len - 2) as u8);
        } else {
            dst.push(M4_MARKER | high);
            push_zero_run(dst, m_len - M4_MAX_LEN);
        }
        dst.push((off << 2) as u8);
        dst.push((off >> 6) as u8);
    }
}

/// Compresses `src[start..end]`, where `src[lit_start..start]` are literals
/// carried over from the previous chunk. Returns the index of the first byte
/// that has not been emitted yet.
fn compress_chunk(
    src: &[u8],
    start: usize,
    end: usize,
    mut lit_start: usize,
    dict: &mut [u16],
    dst: &mut Vec<u8>,
) -> usize {
    let ip_end = end - CHUNK_TAIL;
    let carried = start - lit_start;
    let mut ip = start + 4usize.saturating_sub(carried);

    'literal: loop {
        ip += 1 + ((ip - lit_start) >> 5);
        loop {
            if ip >= ip_end {
                return lit_start;
            }
            let dv = read_le32(src, ip);
            let slot = dindex(dv);
            let m_pos = start + dict[slot] as usize;
            dict[slot] = (ip - start) as u16;
            if dv != read_le32(src, m_pos) {
                continue 'literal;
            }

            push_literals(dst, &src[lit_start..ip]);

            let mut m_len = 4;
            while ip + m_len < ip_end && src[ip + m_len] == src[m_pos + m_len] {
                m_len += 1;
            }
            let m_off = ip - m_pos;
            ip += m_len;
            lit_start = ip;
            push_match(dst, m_off, m_len);
        }
    }
}

/// Compresses `src` as one LZO1X-1 stream appended to `dst`.
///
/// Returns the number of bytes appended. `dst` is never truncated; its
/// existing content is left untouched.
pub fn compress(src: &[u8], dst: &mut Vec<u8>) -> usize {
    let out_start = dst.len();
    dst.reserve(compress_bound(src.len()));

    let mut dict = vec![0u16; D_SIZE];
    let mut pos = 0usize;
    let mut lit_start = 0usize;
    while src.len() - pos > CHUNK_TAIL {
        let end = pos + (src.len() - pos).min(CHUNK_SIZE);
        dict.fill(0);
        lit_start = compress_chunk(src, pos, end, lit_start, &mut dict, dst);
        pos = end;
    }

    let tail = &src[lit_start..];
    let t = tail.len();
    if t > 0 {
        if dst.len() == out_start && t <= MAX_FIRST_LITERAL_RUN {
            dst.push(FIRST_LITERAL_BIAS + t as u8);
        } else if t <= 3 {
            let n = dst.len();
            dst[n - 2] |= t as u8;
        } else if t <= 18 {
            dst.push((t - 3) as u8);
        } else {
            dst.push(0);
            push_zero_run(dst, t - 18);
        }
        dst.extend_from_slice(tail);
    }
    dst.extend_from_slice(&END_OF_STREAM);

    dst.len() - out_start
}

/// Compresses `src` into a freshly allocated vector.
pub fn compress_to_vec(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(compress_bound(src.len()));
    compress(src, &mut out);
    out
}
