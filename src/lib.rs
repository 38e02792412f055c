//! tagsniff - audio tag and duration extraction without a media framework.
//!
//! The container is sniffed from its first bytes and handed to the matching
//! parser: FLAC metadata blocks, Ogg Opus or Ogg Vorbis headers, an ID3v2 tag
//! (followed by the Xing/LAME header of the first MPEG frame) or a bare
//! Xing/LAME header. Extraction is best effort: whatever could be read before
//! a parse failure is returned, and failures never reach the caller.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::debug;

pub mod error;
pub mod field_mapping;
pub mod flac;
pub mod id3;
pub mod ogg;
pub mod opus;
pub mod tags;
pub mod utils;
pub mod xing;

#[cfg(test)]
mod fixtures;

pub use error::{ParseError, Result};
pub use flac::VorbisFields;
pub use tags::{FileType, StreamInfo, TagMap};
pub use utils::ByteCursor;

use flac::FLAC_SIGNATURE;
use id3::Id3v2Tag;
use ogg::OGG_SIGNATURE;

/// First bytes of an MPEG-1 Layer III frame without CRC
const MPEG_SYNC: [u8; 2] = [0xFF, 0xFB];

const ID3_SIGNATURE: &[u8; 3] = b"ID3";

/// Tags copied from the Xing/LAME header into an ID3v2 result when missing
const LAME_INHERITED: [&str; 2] = [
    VorbisFields::REPLAYGAIN_TRACK_GAIN,
    VorbisFields::REPLAYGAIN_ALBUM_GAIN,
];

/// Container family decided from the magic prefix alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magic {
    Flac,
    Ogg,
    Mpeg,
    Id3v2,
}

impl Magic {
    pub fn from_prefix(prefix: &[u8]) -> Option<Self> {
        if prefix.starts_with(FLAC_SIGNATURE) {
            Some(Magic::Flac)
        } else if prefix.starts_with(OGG_SIGNATURE) {
            Some(Magic::Ogg)
        } else if prefix.starts_with(&MPEG_SYNC) {
            Some(Magic::Mpeg)
        } else if prefix.starts_with(ID3_SIGNATURE) {
            Some(Magic::Id3v2)
        } else {
            None
        }
    }
}

fn read_magic<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Option<Magic>> {
    let mut prefix = [0u8; 4];
    let read = cursor.read_at(0, &mut prefix)?;
    Ok(Magic::from_prefix(&prefix[..read]))
}

/// Run the parser selected by the magic prefix, accumulating into `tags`.
///
/// `tags` keeps everything stored before an error. The file type is set only
/// once the selected parser has finished.
pub fn parse_tags<R: Read + Seek>(cursor: &mut ByteCursor<R>, tags: &mut TagMap) -> Result<()> {
    let Some(magic) = read_magic(cursor)? else {
        debug!("unrecognized magic prefix");
        return Ok(());
    };
    debug!(?magic, "detected container");

    let file_type = match magic {
        Magic::Flac => {
            flac::read_flac(cursor, tags)?;
            FileType::Flac
        }
        Magic::Ogg => {
            // Opus and Vorbis share the Ogg signature; only a successful
            // OpusHead/OpusTags decode tells them apart
            let mut opus_tags = TagMap::new();
            let opus = opus::read_opus(cursor, &mut opus_tags);
            if !opus_tags.is_empty() {
                *tags = opus_tags;
                opus?;
                FileType::Opus
            } else {
                if let Err(e) = opus {
                    debug!(error = %e, "not an opus stream, trying vorbis");
                }
                ogg::read_ogg_vorbis(cursor, tags)?;
                FileType::OggVorbis
            }
        }
        Magic::Mpeg => {
            xing::read_xing(cursor, 0, tags)?;
            FileType::Mp3Lame
        }
        Magic::Id3v2 => {
            let tag = Id3v2Tag::read(cursor, tags)?
                .ok_or(ParseError::Malformed("missing ID3v2 header"))?;

            let mut lame = TagMap::new();
            xing::read_xing(cursor, tag.end_offset(), &mut lame)?;
            tags.inherit_from(&lame, &LAME_INHERITED);
            FileType::Mp3Id3v2
        }
    };

    tags.set_file_type(file_type);
    Ok(())
}

/// Extract tags from an open random-access source.
///
/// Never fails: I/O and parse errors yield whatever had been read so far,
/// possibly an empty map.
pub fn read_tags_from<R: Read + Seek>(reader: R) -> TagMap {
    let mut tags = TagMap::new();
    let mut cursor = match ByteCursor::new(reader) {
        Ok(cursor) => cursor,
        Err(e) => {
            debug!(error = %e, "cannot size source");
            return tags;
        }
    };

    if let Err(e) = parse_tags(&mut cursor, &mut tags) {
        debug!(error = %e, tags = tags.len(), "returning partial tags");
    }
    tags
}

/// Extract tags from the file at `path`; see [`read_tags_from`]
pub fn read_tags(path: impl AsRef<Path>) -> TagMap {
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => read_tags_from(BufReader::new(file)),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "cannot open file");
            TagMap::new()
        }
    }
}

/// Audio file handle
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub path: PathBuf,
    pub file_type: Option<FileType>,
}

impl AudioFile {
    /// Open `path` and detect its container format
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file_type = Self::detect_file_type(&path)?;
        Ok(AudioFile { path, file_type })
    }

    /// Detect the file type from the magic prefix. Ogg streams count as Opus
    /// only when the Opus header pages would be accepted by [`read_tags`].
    pub fn detect_file_type(path: &Path) -> Result<Option<FileType>> {
        let file = File::open(path)?;
        let mut cursor = ByteCursor::new(BufReader::new(file))?;

        let file_type = match read_magic(&mut cursor)? {
            Some(Magic::Flac) => Some(FileType::Flac),
            Some(Magic::Ogg) if opus::is_opus_file(&mut cursor) => Some(FileType::Opus),
            Some(Magic::Ogg) => Some(FileType::OggVorbis),
            Some(Magic::Mpeg) => Some(FileType::Mp3Lame),
            Some(Magic::Id3v2) => Some(FileType::Mp3Id3v2),
            None => None,
        };
        Ok(file_type)
    }

    /// Read the tags of this file
    pub fn read_tags(&self) -> TagMap {
        read_tags(&self.path)
    }
}
