// Ogg container support
//
// Page header, 27 bytes plus the segment table:
//   "OggS" capture pattern, version 0
//   header type (0x01 continued, 0x02 first page, 0x04 last page)
//   granule position (u64 LE), serial, sequence, CRC
//   segment count, then one lacing value per segment
//
// A Vorbis stream starts with its identification header (packet type 1) and
// the comment header (packet type 3). Opus streams reuse the page layout with
// OpusHead/OpusTags packets; see crate::opus.

pub mod page;
pub mod vorbis;

pub use page::OggPage;
pub use vorbis::read_ogg_vorbis;

/// OGG signature
pub const OGG_SIGNATURE: &[u8; 4] = b"OggS";

/// Signature plus the version byte, which must be zero
pub const OGG_CAPTURE_PATTERN: &[u8; 5] = b"OggS\0";

pub const OGG_PAGE_HEADER_SIZE: u64 = 27;
