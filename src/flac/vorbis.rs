// Vorbis comment block, shared by FLAC, Ogg Vorbis and Opus
//
// Layout (all lengths little-endian 32-bit):
//   [vendor length][vendor string][comment count]
//   ([comment length]["KEY=value"]) * comment count

use std::io::{Read, Seek};

use tracing::trace;

use crate::error::{ParseError, Result};
use crate::tags::TagMap;
use crate::utils::io::{le32, ByteCursor};

/// Upper bound on how much of a declared comment block is read into memory
pub const MAX_COMMENT_BYTES: u64 = 524_288;

/// Common Vorbis comment field names
pub struct VorbisFields;
impl VorbisFields {
    pub const TITLE: &'static str = "TITLE";
    pub const ARTIST: &'static str = "ARTIST";
    pub const ALBUM: &'static str = "ALBUM";
    pub const ALBUMARTIST: &'static str = "ALBUMARTIST";
    pub const DATE: &'static str = "DATE";
    pub const YEAR: &'static str = "YEAR";
    pub const TRACKNUMBER: &'static str = "TRACKNUMBER";
    pub const DISCNUMBER: &'static str = "DISCNUMBER";
    pub const GENRE: &'static str = "GENRE";
    pub const COMPOSER: &'static str = "COMPOSER";
    pub const R128_BASE_GAIN: &'static str = "R128_BASE_GAIN";
    pub const REPLAYGAIN_TRACK_GAIN: &'static str = "REPLAYGAIN_TRACK_GAIN";
    pub const REPLAYGAIN_ALBUM_GAIN: &'static str = "REPLAYGAIN_ALBUM_GAIN";
}

/// Read the comment block of `payload_len` bytes at `offset` and append its
/// entries to `tags`.
///
/// At most [`MAX_COMMENT_BYTES`] are read; entries reaching past that point
/// (or past the end of the source) fail with [`ParseError::Malformed`] after
/// the preceding entries have been stored.
pub fn read_vorbis_comment<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    offset: u64,
    payload_len: u64,
    tags: &mut TagMap,
) -> Result<()> {
    let capped = payload_len.min(MAX_COMMENT_BYTES) as usize;
    let mut buffer = vec![0u8; capped];
    let available = cursor.read_at(offset, &mut buffer)?;
    buffer.truncate(available);

    parse_comment_block(&buffer, tags)
}

/// Parse an in-memory comment block into `tags`
pub fn parse_comment_block(buffer: &[u8], tags: &mut TagMap) -> Result<()> {
    let mut pos = 0usize;

    let vendor_length = read_length(buffer, &mut pos)?;
    pos = advance(buffer, pos, vendor_length)?;

    let comment_count = read_length(buffer, &mut pos)?;
    trace!(comment_count, "parsing vorbis comments");

    for _ in 0..comment_count {
        let comment_length = read_length(buffer, &mut pos)?;
        let start = pos;
        pos = advance(buffer, pos, comment_length)?;

        let comment = String::from_utf8_lossy(&buffer[start..pos]);
        if let Some((field, value)) = comment.split_once('=') {
            tags.append(field, value);
        }
    }

    Ok(())
}

fn read_length(buffer: &[u8], pos: &mut usize) -> Result<usize> {
    if pos.saturating_add(4) > buffer.len() {
        return Err(ParseError::Malformed("vorbis comment length past end of block"));
    }
    let length = le32(buffer, *pos)? as usize;
    *pos += 4;
    Ok(length)
}

fn advance(buffer: &[u8], pos: usize, length: usize) -> Result<usize> {
    match pos.checked_add(length) {
        Some(end) if end <= buffer.len() => Ok(end),
        _ => Err(ParseError::Malformed("vorbis comment overruns block")),
    }
}
