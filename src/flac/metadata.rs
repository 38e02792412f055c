// FLAC metadata block walk

use std::io::{Read, Seek};

use tracing::{debug, trace};

use crate::error::Result;
use crate::flac::vorbis::read_vorbis_comment;
use crate::tags::{StreamInfo, TagMap};
use crate::utils::io::{be16, be24, be32, ByteCursor};

/// FLAC file signature
pub const FLAC_SIGNATURE: &[u8; 4] = b"fLaC";

/// Upper bound on metadata blocks visited before giving up
const MAX_BLOCKS: usize = 64;

/// Minimum STREAMINFO payload needed to reach the sample count
const STREAMINFO_MIN_LEN: u32 = 18;

/// FLAC metadata block types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlacMetadataBlockType {
    StreamInfo,
    Padding,
    Application,
    SeekTable,
    VorbisComment,
    CueSheet,
    Picture,
    Reserved(u8),
}

impl FlacMetadataBlockType {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => FlacMetadataBlockType::StreamInfo,
            1 => FlacMetadataBlockType::Padding,
            2 => FlacMetadataBlockType::Application,
            3 => FlacMetadataBlockType::SeekTable,
            4 => FlacMetadataBlockType::VorbisComment,
            5 => FlacMetadataBlockType::CueSheet,
            6 => FlacMetadataBlockType::Picture,
            other => FlacMetadataBlockType::Reserved(other),
        }
    }
}

/// FLAC metadata block header
#[derive(Debug)]
pub struct FlacMetadataBlockHeader {
    pub is_last: bool,
    pub block_type: FlacMetadataBlockType,
    pub length: u32,
}

impl FlacMetadataBlockHeader {
    pub const HEADER_SIZE: u64 = 4;

    /// Read the block header at `offset`
    pub fn read<R: Read + Seek>(cursor: &mut ByteCursor<R>, offset: u64) -> Result<Self> {
        let mut buffer = [0u8; Self::HEADER_SIZE as usize];
        cursor.read_exact_at(offset, &mut buffer)?;
        Ok(Self::parse(u32::from_be_bytes(buffer)))
    }

    /// Split the big-endian header word into flag, type and length
    pub fn parse(raw: u32) -> Self {
        FlacMetadataBlockHeader {
            is_last: raw & 0x8000_0000 != 0,
            block_type: FlacMetadataBlockType::from_byte(((raw >> 24) & 0x7F) as u8),
            length: raw & 0x00FF_FFFF,
        }
    }
}

/// Decode the fixed STREAMINFO fields.
///
/// The 36-bit sample count is truncated to its low 32 bits.
pub fn parse_streaminfo(data: &[u8]) -> Result<StreamInfo> {
    // 20 bits sample rate, 3 bits channels - 1, 5 bits bits-per-sample - 1,
    // then the top 4 bits of the sample count
    let packed = be32(data, 10)?;

    Ok(StreamInfo {
        min_block_size: be16(data, 0)?,
        max_block_size: be16(data, 2)?,
        min_frame_size: be24(data, 4)?,
        max_frame_size: be24(data, 7)?,
        sample_rate: packed >> 12,
        channels: ((packed >> 9) & 0x07) as u8 + 1,
        bits_per_sample: ((packed >> 4) & 0x1F) as u8 + 1,
        total_samples: be32(data, 14)? as u64,
        ..StreamInfo::default()
    })
}

/// Whole seconds of audio described by STREAMINFO
pub fn streaminfo_duration(info: &StreamInfo) -> Option<f64> {
    (info.sample_rate > 0).then(|| (info.total_samples / info.sample_rate as u64) as f64)
}

/// Walk the metadata blocks after the `fLaC` signature, filling `tags` from
/// the VORBIS_COMMENT block and the duration from STREAMINFO.
pub fn read_flac<R: Read + Seek>(cursor: &mut ByteCursor<R>, tags: &mut TagMap) -> Result<()> {
    let mut offset = FLAC_SIGNATURE.len() as u64;
    let mut stream_info: Option<StreamInfo> = None;
    let mut found_comment = false;

    for _ in 0..MAX_BLOCKS {
        let header = FlacMetadataBlockHeader::read(cursor, offset)?;
        let payload_offset = offset + FlacMetadataBlockHeader::HEADER_SIZE;
        trace!(block_type = ?header.block_type, length = header.length, offset, "flac metadata block");

        match header.block_type {
            FlacMetadataBlockType::StreamInfo if header.length >= STREAMINFO_MIN_LEN => {
                let mut data = [0u8; STREAMINFO_MIN_LEN as usize];
                cursor.read_exact_at(payload_offset, &mut data)?;
                stream_info = Some(parse_streaminfo(&data)?);
            }
            FlacMetadataBlockType::VorbisComment => {
                let result = read_vorbis_comment(cursor, payload_offset, header.length as u64, tags);
                found_comment = true;
                if let Err(e) = result {
                    tags.inherit_duration(stream_info.as_ref().and_then(streaminfo_duration));
                    return Err(e);
                }
            }
            _ => {}
        }

        if header.is_last || (stream_info.is_some() && found_comment) {
            break;
        }
        offset = payload_offset + header.length as u64;
    }

    if stream_info.is_none() || !found_comment {
        debug!(found_streaminfo = stream_info.is_some(), found_comment, "flac block walk ended early");
    }

    tags.inherit_duration(stream_info.as_ref().and_then(streaminfo_duration));
    Ok(())
}
