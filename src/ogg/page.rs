use std::io::{Read, Seek};

use crate::error::{ParseError, Result};
use crate::ogg::{OGG_CAPTURE_PATTERN, OGG_PAGE_HEADER_SIZE};
use crate::utils::io::{le32, le64, ByteCursor};

/// How far back from the end of a stream the last page is searched for
const TAIL_SEARCH_BYTES: u64 = 65_536;

/// One physical Ogg page, located but not read past its first payload byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OggPage {
    /// Fixed header plus segment table
    pub header_size: u64,
    /// Sum of the segment table entries
    pub payload_size: u64,
    /// First payload byte, or `None` for an empty page
    pub packet_type: Option<u8>,
    pub header_type: u8,
    pub granule_position: u64,
    pub sequence: u32,
}

impl OggPage {
    /// Parse the page starting at `offset`
    pub fn read<R: Read + Seek>(cursor: &mut ByteCursor<R>, offset: u64) -> Result<Self> {
        let mut header = [0u8; OGG_PAGE_HEADER_SIZE as usize];
        cursor.read_exact_at(offset, &mut header)?;

        if &header[..OGG_CAPTURE_PATTERN.len()] != OGG_CAPTURE_PATTERN {
            return Err(ParseError::Malformed("invalid ogg capture pattern"));
        }

        let segment_count = header[26] as usize;
        let mut segment_table = vec![0u8; segment_count];
        cursor.read_exact_at(offset + OGG_PAGE_HEADER_SIZE, &mut segment_table)?;

        let header_size = OGG_PAGE_HEADER_SIZE + segment_count as u64;
        let payload_size = segment_table.iter().map(|&x| x as u64).sum::<u64>();

        // Peek at the packet type without reading the payload
        let packet_type = if payload_size > 0 {
            let mut first = [0u8; 1];
            match cursor.read_at(offset + header_size, &mut first)? {
                1 => Some(first[0]),
                _ => None,
            }
        } else {
            None
        };

        Ok(OggPage {
            header_size,
            payload_size,
            packet_type,
            header_type: header[5],
            granule_position: le64(&header, 6)?,
            sequence: le32(&header, 18)?,
        })
    }

    /// Offset of the page following one that starts at `offset`
    pub fn next_offset(&self, offset: u64) -> u64 {
        offset + self.header_size + self.payload_size
    }
}

/// Granule position of the last page header found near the end of the stream
pub fn last_granule_position<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Option<u64>> {
    let tail_len = cursor.len().min(TAIL_SEARCH_BYTES);
    let start = cursor.len() - tail_len;
    let mut tail = vec![0u8; tail_len as usize];
    cursor.read_exact_at(start, &mut tail)?;

    let header_len = OGG_PAGE_HEADER_SIZE as usize;
    let found = tail
        .windows(OGG_CAPTURE_PATTERN.len())
        .enumerate()
        .rev()
        .filter(|(_, window)| *window == OGG_CAPTURE_PATTERN)
        .find(|(pos, _)| pos + header_len <= tail.len())
        .map(|(pos, _)| pos);

    match found {
        Some(pos) => Ok(Some(le64(&tail, pos + 6)?)),
        None => Ok(None),
    }
}
