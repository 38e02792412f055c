// ID3v2 tag implementation

use std::io::{Read, Seek};

use tracing::{debug, trace};

use crate::error::Result;
use crate::id3::frames::TextFrame;
use crate::tags::TagMap;
use crate::utils::io::{be32, unsyncsafe, ByteCursor};

/// ID3v2 header structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3v2Header {
    /// Major version and revision, e.g. (4, 0) for ID3v2.4.0
    pub version: (u8, u8),
    pub flags: u8,
    /// Tag size excluding this header (and the footer, if any)
    pub size: u32,
}

impl Id3v2Header {
    pub const HEADER_SIZE: u64 = 10;
    const ID: [u8; 3] = [b'I', b'D', b'3'];
    const FLAG_FOOTER: u8 = 0x10;

    /// Read ID3v2 header from the start of the source
    pub fn read<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Option<Self>> {
        let mut buffer = [0u8; Self::HEADER_SIZE as usize];
        cursor.read_exact_at(0, &mut buffer)?;
        Self::parse(&buffer)
    }

    pub fn parse(buffer: &[u8; 10]) -> Result<Option<Self>> {
        if buffer[0..3] != Self::ID {
            return Ok(None);
        }

        Ok(Some(Id3v2Header {
            version: (buffer[3], buffer[4]),
            flags: buffer[5],
            size: unsyncsafe(be32(buffer, 6)?),
        }))
    }

    pub fn has_footer(&self) -> bool {
        self.flags & Self::FLAG_FOOTER != 0
    }

    /// Offset of the first byte after the tag, where audio frames begin
    pub fn tag_end(&self) -> u64 {
        let footer = if self.has_footer() { Self::HEADER_SIZE } else { 0 };
        Self::HEADER_SIZE + self.size as u64 + footer
    }
}

/// ID3v2 frame header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3FrameHeader {
    pub frame_id: String,
    pub size: u32,
    pub flags: u16,
}

impl Id3FrameHeader {
    pub const SIZE: u64 = 10;

    /// Frame sizes are synchsafe from ID3v2.4 on and plain big-endian before
    pub fn parse(buffer: &[u8; 10], major_version: u8) -> Result<Self> {
        let raw = be32(buffer, 4)?;
        let size = if major_version >= 4 { unsyncsafe(raw) } else { raw };

        Ok(Id3FrameHeader {
            frame_id: String::from_utf8_lossy(&buffer[0..4]).to_string(),
            size,
            flags: u16::from_be_bytes([buffer[8], buffer[9]]),
        })
    }

    fn is_text(&self) -> bool {
        self.frame_id.starts_with('T')
    }
}

/// Walk the frames of the tag described by `header`, storing text frames in
/// `tags`. The first value seen for a key wins.
pub fn read_frames<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    header: &Id3v2Header,
    tags: &mut TagMap,
) -> Result<()> {
    let mut remaining = header.size as u64;
    let mut offset = Id3v2Header::HEADER_SIZE;

    while remaining > Id3FrameHeader::SIZE {
        let mut buffer = [0u8; Id3FrameHeader::SIZE as usize];
        cursor.read_exact_at(offset, &mut buffer)?;
        remaining -= Id3FrameHeader::SIZE;
        offset += Id3FrameHeader::SIZE;

        let frame = Id3FrameHeader::parse(&buffer, header.version.0)?;
        let size = frame.size as u64;
        if size < 1 || size > remaining {
            // Padding, or a size that cannot be trusted
            trace!(frame_id = %frame.frame_id, size, remaining, "end of id3v2 frames");
            break;
        }
        if offset + size > cursor.len() {
            debug!(frame_id = %frame.frame_id, size, offset, "id3v2 frame runs past end of file");
            break;
        }

        if frame.is_text() {
            let mut payload = vec![0u8; size as usize];
            cursor.read_exact_at(offset, &mut payload)?;
            if let Some(text) = TextFrame::decode(&frame.frame_id, &payload) {
                if !tags.insert_if_absent(&text.key, text.value) {
                    debug!(frame_id = %frame.frame_id, key = %text.key, "duplicate id3v2 text frame ignored");
                }
            }
        }

        remaining -= size;
        offset += size;
    }

    Ok(())
}

/// ID3v2 tag as seen by the dispatcher
#[derive(Debug)]
pub struct Id3v2Tag {
    pub header: Id3v2Header,
}

impl Id3v2Tag {
    /// Read the header and the text frames into `tags`
    pub fn read<R: Read + Seek>(cursor: &mut ByteCursor<R>, tags: &mut TagMap) -> Result<Option<Self>> {
        let header = match Id3v2Header::read(cursor)? {
            Some(h) => h,
            None => return Ok(None),
        };
        trace!(version = ?header.version, size = header.size, "id3v2 header");

        read_frames(cursor, &header, tags)?;
        Ok(Some(Id3v2Tag { header }))
    }

    /// Where a Xing/LAME header would start
    pub fn end_offset(&self) -> u64 {
        self.header.tag_end()
    }
}
