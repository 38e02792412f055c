// Byte-level helpers shared by every container parser

use std::io::{Read, Seek, SeekFrom};

use crate::error::{ParseError, Result};

/// Borrow `len` bytes starting at `offset`, failing instead of panicking.
pub fn bytes_at(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get(offset..end))
        .ok_or(ParseError::OutOfBounds { offset, len })
}

fn array_at<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes_at(buf, offset, N)?);
    Ok(out)
}

/// Read a single byte
pub fn byte(buf: &[u8], offset: usize) -> Result<u8> {
    buf.get(offset)
        .copied()
        .ok_or(ParseError::OutOfBounds { offset, len: 1 })
}

/// Read big-endian 16-bit integer
pub fn be16(buf: &[u8], offset: usize) -> Result<u16> {
    array_at(buf, offset).map(u16::from_be_bytes)
}

/// Read big-endian 24-bit integer
pub fn be24(buf: &[u8], offset: usize) -> Result<u32> {
    let [a, b, c] = array_at::<3>(buf, offset)?;
    Ok(u32::from_be_bytes([0, a, b, c]))
}

/// Read big-endian 32-bit integer
pub fn be32(buf: &[u8], offset: usize) -> Result<u32> {
    array_at(buf, offset).map(u32::from_be_bytes)
}

/// Read little-endian 16-bit integer
pub fn le16(buf: &[u8], offset: usize) -> Result<u16> {
    array_at(buf, offset).map(u16::from_le_bytes)
}

/// Read little-endian 32-bit integer
pub fn le32(buf: &[u8], offset: usize) -> Result<u32> {
    array_at(buf, offset).map(u32::from_le_bytes)
}

/// Read little-endian 64-bit integer
pub fn le64(buf: &[u8], offset: usize) -> Result<u64> {
    array_at(buf, offset).map(u64::from_le_bytes)
}

/// Decode a synchsafe integer (7 bits per byte, top bit always clear)
pub fn unsyncsafe(x: u32) -> u32 {
    ((x & 0x7f00_0000) >> 3) | ((x & 0x007f_0000) >> 2) | ((x & 0x0000_7f00) >> 1) | (x & 0x0000_007f)
}

/// Encode the low 28 bits of `x` as a synchsafe integer
pub fn syncsafe(x: u32) -> u32 {
    ((x & 0x0fe0_0000) << 3) | ((x & 0x001f_c000) << 2) | ((x & 0x0000_3f80) << 1) | (x & 0x0000_007f)
}

/// Random-access reader with absolute offsets.
///
/// Every read seeks first, so parsers never depend on where a previous
/// read left the underlying stream.
#[derive(Debug)]
pub struct ByteCursor<R> {
    inner: R,
    len: u64,
}

impl<R: Read + Seek> ByteCursor<R> {
    pub fn new(mut inner: R) -> std::io::Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(ByteCursor { inner, len })
    }

    /// Total length of the source in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fill `buf` completely from `offset`, failing on a short source
    pub fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(buf)?;
        Ok(())
    }

    /// Read as many bytes as are available from `offset`, up to `buf.len()`
    pub fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        self.inner.seek(SeekFrom::Start(offset))?;
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
