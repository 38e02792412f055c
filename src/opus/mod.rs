// OPUS format support (in OGG container)
//
// OPUS audio codec uses OGG container format with Vorbis Comment for metadata.
// This module handles OPUS-specific metadata while reusing the OGG infrastructure.
//
// OPUS File Structure:
// - Uses OGG container (similar to OGG Vorbis)
// - Identification header: "OpusHead" (19 bytes) alone on the first page
// - Comment header: "OpusTags" (8 bytes) followed by Vorbis Comment on the second page
// - Audio data pages
//
// Reference:
// - https://wiki.xiph.org/OggOpus
// - RFC 7845: Ogg Encapsulation for the Opus Audio Codec

use std::io::{Read, Seek};

use tracing::{debug, trace};

use crate::error::Result;
use crate::flac::vorbis::{read_vorbis_comment, VorbisFields};
use crate::ogg::page::{last_granule_position, OggPage};
use crate::tags::TagMap;
use crate::utils::io::{byte, le16, le32, ByteCursor};

pub const OPUS_SIGNATURE: &[u8; 8] = b"OpusHead";
pub const OPUS_TAGS: &[u8; 8] = b"OpusTags";

/// Size of the fixed OpusHead structure
const OPUS_HEAD_LEN: u64 = 19;

/// Highest version this parser understands; the upper nibble marks
/// incompatible revisions
const MAX_VERSION: u8 = 15;

/// Opus granule positions always count 48 kHz samples
const GRANULE_RATE: f64 = 48_000.0;

/// Decoded OpusHead packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpusHead {
    pub version: u8,
    pub channels: u8,
    pub pre_skip: u16,
    pub input_sample_rate: u32,
    /// Q7.8 fixed point gain in dB
    pub output_gain: i16,
    pub mapping_family: u8,
}

impl OpusHead {
    /// Parse the fixed 19-byte structure. `None` if the signature is missing.
    pub fn parse(data: &[u8]) -> Result<Option<Self>> {
        if data.len() < OPUS_SIGNATURE.len() || &data[..OPUS_SIGNATURE.len()] != OPUS_SIGNATURE {
            return Ok(None);
        }

        Ok(Some(OpusHead {
            version: byte(data, 8)?,
            channels: byte(data, 9)?,
            pre_skip: le16(data, 10)?,
            input_sample_rate: le32(data, 12)?,
            output_gain: le16(data, 16)? as i16,
            mapping_family: byte(data, 18)?,
        }))
    }

    fn read<R: Read + Seek>(cursor: &mut ByteCursor<R>, offset: u64, payload_len: u64) -> Result<Option<Self>> {
        if payload_len < OPUS_HEAD_LEN {
            return Ok(None);
        }
        let mut data = [0u8; OPUS_HEAD_LEN as usize];
        cursor.read_exact_at(offset, &mut data)?;
        Self::parse(&data)
    }
}

/// Check the `OpusTags` signature and parse the comment block behind it.
/// Returns `false` when the signature is missing.
pub fn read_opus_tags<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    offset: u64,
    payload_len: u64,
    tags: &mut TagMap,
) -> Result<bool> {
    let skip = OPUS_TAGS.len() as u64;
    if payload_len < skip {
        return Ok(false);
    }

    let mut signature = [0u8; 8];
    cursor.read_exact_at(offset, &mut signature)?;
    if &signature != OPUS_TAGS {
        return Ok(false);
    }

    read_vorbis_comment(cursor, offset + skip, payload_len - skip, tags)?;
    Ok(true)
}

/// Playback length from the last granule position, minus the pre-skip
pub fn granule_duration(granule_position: u64, pre_skip: u16) -> Option<f64> {
    // -1 marks a page on which no packet finishes
    if granule_position == u64::MAX || granule_position <= pre_skip as u64 {
        return None;
    }
    Some((granule_position - pre_skip as u64) as f64 / GRANULE_RATE)
}

/// Read an Opus stream: OpusHead on the first page, OpusTags on the second.
///
/// Leaves `tags` untouched when the first page is not a usable OpusHead, so
/// the caller can try plain Ogg Vorbis instead. The header gain is always
/// stored as `R128_BASE_GAIN`, replacing any earlier value.
pub fn read_opus<R: Read + Seek>(cursor: &mut ByteCursor<R>, tags: &mut TagMap) -> Result<()> {
    let first = OggPage::read(cursor, 0)?;
    let head = match OpusHead::read(cursor, first.header_size, first.payload_size)? {
        Some(head) if head.version <= MAX_VERSION => head,
        Some(head) => {
            debug!(version = head.version, "unsupported opus version");
            return Ok(());
        }
        None => return Ok(()),
    };
    trace!(?head, "opus head");

    let offset = first.next_offset(0);
    let second = OggPage::read(cursor, offset)?;
    if !read_opus_tags(cursor, offset + second.header_size, second.payload_size, tags)? {
        debug!("second ogg page does not carry OpusTags");
        return Ok(());
    }

    tags.set(VorbisFields::R128_BASE_GAIN, head.output_gain.to_string());

    let granule = last_granule_position(cursor)?;
    tags.inherit_duration(granule.and_then(|g| granule_duration(g, head.pre_skip)));
    Ok(())
}

/// Whether [`read_opus`] accepts this stream: a supported OpusHead on the
/// first page and OpusTags on the second
pub fn is_opus_file<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> bool {
    let mut scratch = TagMap::new();
    if let Err(e) = read_opus(cursor, &mut scratch) {
        debug!(error = %e, "opus header check failed");
    }
    !scratch.is_empty()
}
