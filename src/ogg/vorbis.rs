// OGG Vorbis identification and comment headers
// The comment payload is the same Vorbis comment block FLAC uses

use std::io::{Read, Seek};

use tracing::{debug, trace};

use crate::error::{ParseError, Result};
use crate::flac::vorbis::read_vorbis_comment;
use crate::ogg::page::OggPage;
use crate::tags::{StreamInfo, TagMap};
use crate::utils::io::{byte, le32, ByteCursor};

/// Upper bound on pages visited while looking for the headers
const MAX_PAGES: usize = 64;

pub const VORBIS_IDENTIFICATION: &[u8; 7] = b"\x01vorbis";
pub const VORBIS_COMMENT: &[u8; 7] = b"\x03vorbis";

const PACKET_TYPE_IDENTIFICATION: u8 = 0x01;
const PACKET_TYPE_COMMENT: u8 = 0x03;

/// Fixed part of the identification header that carries stream parameters
const IDENTIFICATION_LEN: u64 = 28;

/// Decode the identification header. Returns `None` when the packet is too
/// short or does not carry the `\x01vorbis` signature.
pub fn read_identification<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    offset: u64,
    payload_len: u64,
) -> Result<Option<StreamInfo>> {
    if payload_len < IDENTIFICATION_LEN {
        return Ok(None);
    }

    let mut data = [0u8; IDENTIFICATION_LEN as usize];
    cursor.read_exact_at(offset, &mut data)?;
    if &data[..VORBIS_IDENTIFICATION.len()] != VORBIS_IDENTIFICATION {
        return Ok(None);
    }

    let version = le32(&data, 7)?;
    trace!(version, "vorbis identification header");

    Ok(Some(StreamInfo {
        channels: byte(&data, 11)?,
        sample_rate: le32(&data, 12)?,
        max_bitrate: le32(&data, 16)? as i32,
        nominal_bitrate: le32(&data, 20)? as i32,
        min_bitrate: le32(&data, 24)? as i32,
        ..StreamInfo::default()
    }))
}

/// Check the `\x03vorbis` signature and hand the rest of the packet to the
/// Vorbis comment parser.
pub fn read_comment_header<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    offset: u64,
    payload_len: u64,
    tags: &mut TagMap,
) -> Result<()> {
    let mut signature = [0u8; 7];
    cursor.read_exact_at(offset, &mut signature)?;
    if &signature != VORBIS_COMMENT {
        return Err(ParseError::Malformed("missing vorbis comment signature"));
    }

    let skip = VORBIS_COMMENT.len() as u64;
    read_vorbis_comment(cursor, offset + skip, payload_len.saturating_sub(skip), tags)
}

/// Rough duration from the nominal bitrate and the file size.
///
/// This ignores container overhead and the final granule position, so it is
/// only an estimate.
pub fn estimate_duration(file_len: u64, info: &StreamInfo) -> Option<f64> {
    let bytes_per_second = info.nominal_bitrate / 8;
    (file_len > 0 && bytes_per_second > 0).then(|| (file_len / bytes_per_second as u64) as f64)
}

/// Walk the Ogg pages until both the identification and the comment header
/// have been seen, storing comments and the estimated duration in `tags`.
pub fn read_ogg_vorbis<R: Read + Seek>(cursor: &mut ByteCursor<R>, tags: &mut TagMap) -> Result<()> {
    let mut stream_info = None;
    let walk = walk_headers(cursor, tags, &mut stream_info);

    if let Some(info) = stream_info {
        tags.inherit_duration(estimate_duration(cursor.len(), &info));
    }
    walk
}

fn walk_headers<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    tags: &mut TagMap,
    stream_info: &mut Option<StreamInfo>,
) -> Result<()> {
    let mut offset = 0u64;
    let mut need_identification = true;
    let mut need_comment = true;

    for _ in 0..MAX_PAGES {
        if offset >= cursor.len() {
            debug!(offset, "ogg stream ended before both vorbis headers were found");
            return Ok(());
        }

        let page = OggPage::read(cursor, offset)?;
        let payload_offset = offset + page.header_size;

        match page.packet_type {
            Some(PACKET_TYPE_IDENTIFICATION) => {
                *stream_info = read_identification(cursor, payload_offset, page.payload_size)?;
                need_identification = false;
            }
            Some(PACKET_TYPE_COMMENT) => {
                need_comment = false;
                read_comment_header(cursor, payload_offset, page.payload_size, tags)?;
            }
            _ => {}
        }

        if !need_identification && !need_comment {
            return Ok(());
        }
        offset = page.next_offset(offset);
    }

    debug!("page budget exhausted while looking for vorbis headers");
    Ok(())
}
