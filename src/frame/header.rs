//! lzop header encoding and parsing.
//!
//! Everything after the magic, up to and including the file name, is
//! covered by the header checksum. Fields that only exist from version
//! 0x0940 on are written unconditionally (we always write a 0x1040 header)
//! and parsed conditionally.

use std::io::{Read, Write};

use super::types::{
    adler32, map_eof, FrameError, FramePrefs, Method, F_ADLER32_C, F_ADLER32_D, F_CRC32_C,
    F_CRC32_D, F_H_CRC32, F_H_EXTRA_FIELD, F_H_FILTER, F_MULTIPART, F_OS_UNIX, F_STDIN,
    LEVEL_DEFAULT, LZOP_MAGIC, LZOP_VERSION, LZOP_VERSION_NEEDED, LZO_LIB_VERSION,
    MIN_READ_VERSION, VERSION_EXTENDED_HEADER,
};

/// Parsed (or to-be-written) lzop header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u16,
    pub lib_version: u16,
    pub version_needed: u16,
    pub method: Method,
    pub level: u8,
    pub flags: u32,
    pub filter: u32,
    pub mode: u32,
    /// Seconds since the epoch.
    pub mtime: u64,
    pub name: String,
}

impl FrameHeader {
    /// Header describing a container written with `prefs`.
    pub fn for_prefs(prefs: &FramePrefs) -> Self {
        let mut flags = F_ADLER32_D | F_OS_UNIX;
        if prefs.checksum_compressed {
            flags |= F_ADLER32_C;
        }
        if prefs.from_stdin {
            flags |= F_STDIN;
        }
        Self {
            version: LZOP_VERSION,
            lib_version: LZO_LIB_VERSION,
            version_needed: LZOP_VERSION_NEEDED,
            method: Method::Lzo1x1,
            level: LEVEL_DEFAULT,
            flags,
            filter: 0,
            mode: prefs.mode,
            mtime: prefs.mtime,
            name: prefs.name.clone(),
        }
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    /// Name bytes as stored: at most 255 bytes, cut on a char boundary.
    fn stored_name(&self) -> &[u8] {
        let mut end = self.name.len().min(255);
        while !self.name.is_char_boundary(end) {
            end -= 1;
        }
        &self.name.as_bytes()[..end]
    }

    /// Checksummed part of the header.
    fn body(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(32 + self.name.len());
        body.extend_from_slice(&self.version.to_be_bytes());
        body.extend_from_slice(&self.lib_version.to_be_bytes());
        if self.version >= VERSION_EXTENDED_HEADER {
            body.extend_from_slice(&self.version_needed.to_be_bytes());
        }
        body.push(self.method as u8);
        if self.version >= VERSION_EXTENDED_HEADER {
            body.push(self.level);
        }
        body.extend_from_slice(&self.flags.to_be_bytes());
        if self.has_flag(F_H_FILTER) {
            body.extend_from_slice(&self.filter.to_be_bytes());
        }
        body.extend_from_slice(&self.mode.to_be_bytes());
        body.extend_from_slice(&(self.mtime as u32).to_be_bytes());
        if self.version >= VERSION_EXTENDED_HEADER {
            body.extend_from_slice(&((self.mtime >> 32) as u32).to_be_bytes());
        }
        let name = self.stored_name();
        body.push(name.len() as u8);
        body.extend_from_slice(name);
        body
    }

    /// Size of the encoded header, magic and checksum included.
    pub fn encoded_len(&self) -> usize {
        LZOP_MAGIC.len() + self.body().len() + 4
    }
}

/// Writes magic, header and header checksum. Returns the bytes written.
pub fn write_header<W: Write>(writer: &mut W, header: &FrameHeader) -> Result<usize, FrameError> {
    let body = header.body();
    writer.write_all(&LZOP_MAGIC)?;
    writer.write_all(&body)?;
    writer.write_all(&adler32(&body).to_be_bytes())?;
    Ok(LZOP_MAGIC.len() + body.len() + 4)
}

/// Reads header fields while keeping a copy of every byte for the checksum.
struct Recorder<'a, R: Read> {
    inner: &'a mut R,
    seen: Vec<u8>,
}

impl<'a, R: Read> Recorder<'a, R> {
    fn bytes<const N: usize>(&mut self) -> Result<[u8; N], FrameError> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf).map_err(map_eof)?;
        self.seen.extend_from_slice(&buf);
        Ok(buf)
    }

    fn u8(&mut self) -> Result<u8, FrameError> {
        Ok(self.bytes::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16, FrameError> {
        Ok(u16::from_be_bytes(self.bytes()?))
    }

    fn u32(&mut self) -> Result<u32, FrameError> {
        Ok(u32::from_be_bytes(self.bytes()?))
    }
}

/// Reads and validates an lzop header, magic included.
pub fn read_header<R: Read>(reader: &mut R) -> Result<FrameHeader, FrameError> {
    let mut magic = [0u8; LZOP_MAGIC.len()];
    reader.read_exact(&mut magic).map_err(|e| match map_eof(e) {
        FrameError::Truncated => FrameError::BadMagic,
        other => other,
    })?;
    if magic != LZOP_MAGIC {
        return Err(FrameError::BadMagic);
    }

    let mut rec = Recorder {
        inner: reader,
        seen: Vec::with_capacity(64),
    };

    let version = rec.u16()?;
    if version < MIN_READ_VERSION {
        return Err(FrameError::UnsupportedVersion(version));
    }
    let lib_version = rec.u16()?;
    let version_needed = if version >= VERSION_EXTENDED_HEADER {
        let needed = rec.u16()?;
        if needed > LZOP_VERSION || needed < MIN_READ_VERSION {
            return Err(FrameError::UnsupportedVersion(needed));
        }
        needed
    } else {
        0
    };
    let method = Method::try_from(rec.u8()?)?;
    let level = if version >= VERSION_EXTENDED_HEADER {
        rec.u8()?
    } else {
        0
    };
    let flags = rec.u32()?;
    let filter = if flags & F_H_FILTER != 0 { rec.u32()? } else { 0 };
    let mode = rec.u32()?;
    let mtime_low = rec.u32()? as u64;
    let mtime_high = if version >= VERSION_EXTENDED_HEADER {
        rec.u32()? as u64
    } else {
        0
    };
    let name_len = rec.u8()? as usize;
    let mut name = vec![0u8; name_len];
    rec.inner.read_exact(&mut name).map_err(map_eof)?;
    rec.seen.extend_from_slice(&name);

    let mut stored = [0u8; 4];
    rec.inner.read_exact(&mut stored).map_err(map_eof)?;
    let stored = u32::from_be_bytes(stored);

    if flags & F_H_CRC32 != 0 {
        return Err(FrameError::Unsupported("CRC-32 header checksum"));
    }
    let computed = adler32(&rec.seen);
    if stored != computed {
        return Err(FrameError::HeaderChecksum { stored, computed });
    }

    if flags & (F_CRC32_D | F_CRC32_C) != 0 {
        return Err(FrameError::Unsupported("CRC-32 block checksums"));
    }
    if flags & F_H_EXTRA_FIELD != 0 {
        return Err(FrameError::Unsupported("extra header field"));
    }
    if flags & F_MULTIPART != 0 {
        return Err(FrameError::Unsupported("multipart archive"));
    }
    if filter != 0 {
        return Err(FrameError::Unsupported("filter"));
    }

    Ok(FrameHeader {
        version,
        lib_version,
        version_needed,
        method,
        level,
        flags,
        filter,
        mode,
        mtime: mtime_low | (mtime_high << 32),
        name: String::from_utf8_lossy(&name).into_owned(),
    })
}

/// Whether the block layout carries an uncompressed-data checksum.
pub(crate) fn has_data_checksum(header: &FrameHeader) -> bool {
    header.has_flag(F_ADLER32_D)
}

/// Whether the block layout carries a compressed-data checksum.
pub(crate) fn has_packed_checksum(header: &FrameHeader) -> bool {
    header.has_flag(F_ADLER32_C)
}
