//! LZO1X block decompression core engine.
//!
//! Implements the control-byte state machine of liblzo's
//! `lzo1x_decompress_safe`:
//!   - an optional initial literal run encoded in the first byte (> 17),
//!   - literal runs with zero-run length extension,
//!   - the four match bands (M1..M4) with their distance layouts,
//!   - 0–3 trailing literals carried in the low bits of a match,
//!   - the `0x11 0x00 0x00` end-of-stream marker.
//!
//! # Security boundary
//!
//! Every source read is bounds-checked against the declared input window and
//! every back-reference is checked against the start of the output window
//! before a single byte of it is copied. Malformed input returns a
//! [`DecompressError`]; it never panics.

use core::cmp::Ordering;

use super::types::{DecompressError, FIRST_LITERAL_BIAS, M2_MAX_OFFSET, M3_MAX_OFFSET};

/// Decoder position inside the stream grammar.
///
/// liblzo expresses these as `goto` labels; here each label is a state and
/// the main loop is a plain `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Top of the main loop: the next byte is a control byte in literal
    /// context (`< 16` starts a literal run).
    Control,
    /// A literal run was just copied. A following control byte `< 16` is a
    /// 3-byte match at distance `> M2_MAX_OFFSET`.
    AfterLiteralRun,
    /// Decode the match whose control byte is carried here.
    Match(usize),
    /// Copy this many (1..=3) literals, then decode the next match.
    TrailingLiterals(usize),
}

/// One decompression call. Lives only for the duration of
/// [`decompress_generic`].
struct Decoder<'a> {
    /// The declared input window.
    src: &'a [u8],
    ip: usize,
    dst: &'a mut Vec<u8>,
    /// Absolute write index into `dst`.
    op: usize,
    /// Start of the output window; no back-reference may reach below it.
    low: usize,
    /// Absolute index the write cursor may not pass.
    limit: usize,
}

impl<'a> Decoder<'a> {
    #[inline(always)]
    fn need_ip(&self, n: usize) -> Result<(), DecompressError> {
        if self.src.len() - self.ip < n {
            Err(DecompressError::InputOverrun)
        } else {
            Ok(())
        }
    }

    #[inline(always)]
    fn peek(&self) -> Result<u8, DecompressError> {
        self.src
            .get(self.ip)
            .copied()
            .ok_or(DecompressError::InputOverrun)
    }

    #[inline(always)]
    fn next_byte(&mut self) -> Result<usize, DecompressError> {
        let b = self.peek()?;
        self.ip += 1;
        Ok(b as usize)
    }

    /// Reads a zero-run extended length: every `0x00` adds 255, the first
    /// non-zero byte terminates and is added together with `base`.
    fn extended_length(&mut self, base: usize) -> Result<usize, DecompressError> {
        let mut t: usize = 0;
        while self.peek()? == 0 {
            t = t.checked_add(255).ok_or(DecompressError::Malformed)?;
            self.ip += 1;
        }
        let last = self.next_byte()?;
        t.checked_add(base + last).ok_or(DecompressError::Malformed)
    }

    /// Reads the two little-endian-ish distance bytes of an M3/M4 match:
    /// `(b0 >> 2) + (b1 << 6)`.
    #[inline(always)]
    fn read_distance(&mut self) -> Result<usize, DecompressError> {
        self.need_ip(2)?;
        let b0 = self.src[self.ip] as usize;
        let b1 = self.src[self.ip + 1] as usize;
        self.ip += 2;
        Ok((b0 >> 2) + (b1 << 6))
    }

    /// Fails when `n` more output bytes would pass the output limit.
    #[inline(always)]
    fn need_op(&self, n: usize) -> Result<(), DecompressError> {
        if self.limit - self.op < n {
            Err(DecompressError::Malformed)
        } else {
            Ok(())
        }
    }

    #[inline(always)]
    fn put(&mut self, b: u8) {
        if self.op < self.dst.len() {
            self.dst[self.op] = b;
        } else {
            self.dst.push(b);
        }
        self.op += 1;
    }

    /// Copies `n` literal bytes from the input. Literals never overlap the
    /// output, so this is a block copy.
    fn copy_literals(&mut self, n: usize) -> Result<(), DecompressError> {
        self.need_ip(n)?;
        self.need_op(n)?;
        let src = self.src;
        let lit = &src[self.ip..self.ip + n];
        let in_place = self.dst.len().saturating_sub(self.op).min(n);
        self.dst[self.op..self.op + in_place].copy_from_slice(&lit[..in_place]);
        self.dst.extend_from_slice(&lit[in_place..]);
        self.ip += n;
        self.op += n;
        Ok(())
    }

    /// Resolves a back-reference `distance` bytes behind the write cursor.
    #[inline(always)]
    fn back_ref(&self, distance: usize) -> Result<usize, DecompressError> {
        match self.op.checked_sub(distance) {
            Some(pos) if pos >= self.low => Ok(pos),
            _ => Err(DecompressError::LookbehindOverrun),
        }
    }

    /// Copies `len` bytes from `pos` to the write cursor one byte at a time.
    /// Source and destination overlap whenever the distance is shorter than
    /// `len`; that is how runs are encoded.
    #[inline(always)]
    fn copy_match(&mut self, pos: usize, len: usize) -> Result<(), DecompressError> {
        self.need_op(len)?;
        for i in 0..len {
            let b = self.dst[pos + i];
            self.put(b);
        }
        Ok(())
    }

    /// Trailing literal count lives in the low two bits of the byte two
    /// positions back (the control byte for M1/M2, the first distance byte
    /// for M3/M4).
    #[inline(always)]
    fn after_match(&self) -> State {
        match (self.src[self.ip - 2] & 3) as usize {
            0 => State::Control,
            n => State::TrailingLiterals(n),
        }
    }

    /// Decodes one match. Returns `None` when `t` is the end-of-stream marker.
    fn decode_match(&mut self, t: usize) -> Result<Option<State>, DecompressError> {
        if t >= 64 {
            // M2: 3..=8 bytes, distance 1..=0x800.
            let d = self.next_byte()?;
            let pos = self.back_ref(1 + ((t >> 2) & 7) + (d << 3))?;
            self.copy_match(pos, (t >> 5) + 1)?;
        } else if t >= 32 {
            // M3: distance 1..=0x4000.
            let mut len = t & 31;
            if len == 0 {
                len = self.extended_length(31)?;
            }
            let d = self.read_distance()?;
            let pos = self.back_ref(1 + d)?;
            self.copy_match(pos, len + 2)?;
        } else if t >= 16 {
            // M4: distance 0x4001..=0xbfff, or the end marker at distance 0.
            let high = (t & 8) << 11;
            let mut len = t & 7;
            if len == 0 {
                len = self.extended_length(7)?;
            }
            let d = self.read_distance()?;
            if high + d == 0 {
                return if len == 1 {
                    Ok(None)
                } else {
                    Err(DecompressError::Malformed)
                };
            }
            let pos = self.back_ref(high + d + M3_MAX_OFFSET)?;
            self.copy_match(pos, len + 2)?;
        } else {
            // M1 after a match: 2 bytes, distance 1..=0x400.
            let d = self.next_byte()?;
            let pos = self.back_ref(1 + (t >> 2) + (d << 2))?;
            self.copy_match(pos, 2)?;
        }
        Ok(Some(self.after_match()))
    }

    fn run(&mut self) -> Result<(), DecompressError> {
        let mut state = State::Control;

        if let Some(&first) = self.src.first() {
            if first > FIRST_LITERAL_BIAS {
                self.ip = 1;
                let t = (first - FIRST_LITERAL_BIAS) as usize;
                if t < 4 {
                    state = State::TrailingLiterals(t);
                } else {
                    self.need_ip(t + 3)?;
                    self.copy_literals(t)?;
                    state = State::AfterLiteralRun;
                }
            }
        }

        loop {
            state = match state {
                State::Control => {
                    self.need_ip(3)?;
                    let mut t = self.next_byte()?;
                    if t >= 16 {
                        State::Match(t)
                    } else {
                        if t == 0 {
                            t = self.extended_length(15)?;
                        }
                        self.need_ip(t + 6)?;
                        self.copy_literals(t + 3)?;
                        State::AfterLiteralRun
                    }
                }
                State::AfterLiteralRun => {
                    let t = self.next_byte()?;
                    if t >= 16 {
                        State::Match(t)
                    } else {
                        let d = self.next_byte()?;
                        let pos = self.back_ref(1 + M2_MAX_OFFSET + (t >> 2) + (d << 2))?;
                        self.copy_match(pos, 3)?;
                        self.after_match()
                    }
                }
                State::Match(t) => match self.decode_match(t)? {
                    Some(next) => next,
                    None => return self.finish(),
                },
                State::TrailingLiterals(n) => {
                    self.need_ip(n + 3)?;
                    self.copy_literals(n)?;
                    State::Match(self.next_byte()?)
                }
            };
        }
    }

    /// Consumed-length check performed at the end marker.
    fn finish(&self) -> Result<(), DecompressError> {
        match self.ip.cmp(&self.src.len()) {
            Ordering::Equal => Ok(()),
            Ordering::Less => Err(DecompressError::InputNotConsumed),
            Ordering::Greater => Err(DecompressError::InputOverrun),
        }
    }
}

/// Core LZO1X decompression loop.
///
/// Decodes the whole of `src` into `dst`, starting at index `dst_offset`.
/// Bytes already in `dst` at or past `dst_offset` are overwritten; the vector
/// grows once the write cursor reaches its end. Back-references may only
/// reach back to `dst_offset`.
///
/// With `max_out` set, a stream that would write more than `max_out` bytes
/// past `dst_offset` stops with [`DecompressError::Malformed`] before the
/// excess is written.
///
/// Returns the outcome together with the number of bytes written past
/// `dst_offset`, which on error counts the partial output.
pub(crate) fn decompress_generic(
    src: &[u8],
    dst: &mut Vec<u8>,
    dst_offset: usize,
    max_out: Option<usize>,
) -> (Result<(), DecompressError>, usize) {
    if dst_offset > dst.len() {
        return (Err(DecompressError::Malformed), 0);
    }
    let mut decoder = Decoder {
        src,
        ip: 0,
        dst,
        op: dst_offset,
        low: dst_offset,
        limit: max_out.map_or(usize::MAX, |m| dst_offset.saturating_add(m)),
    };
    let result = decoder.run();
    (result, decoder.op - decoder.low)
}
