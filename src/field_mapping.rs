// Field mapping between ID3v2 frame ids and Vorbis comment keys
//
// ID3v2 names its text frames with four-character ids (TIT2, TPE1, ...) while
// FLAC, Ogg Vorbis and Opus use free-form keys (TITLE, ARTIST, ...). Every
// parser reports Vorbis keys so callers see one vocabulary.

use crate::flac::vorbis::VorbisFields;

/// Format-specific field mappings
pub struct FieldMappings;

impl FieldMappings {
    // ID3v2 frame IDs
    pub const ID3V2_TITLE: &'static str = "TIT2";
    pub const ID3V2_ARTIST: &'static str = "TPE1";
    pub const ID3V2_ALBUM: &'static str = "TALB";
    pub const ID3V2_ALBUMARTIST: &'static str = "TPE2";
    pub const ID3V2_TRACK: &'static str = "TRCK";
    pub const ID3V2_DISC: &'static str = "TPOS";
    pub const ID3V2_GENRE: &'static str = "TCON";
    pub const ID3V2_YEAR: &'static str = "TYER";
    pub const ID3V2_RECORDING_TIME: &'static str = "TDRC";
    pub const ID3V2_COMPOSER: &'static str = "TCOM";
    pub const ID3V2_USER_TEXT: &'static str = "TXXX";

    const ID3V2_TO_VORBIS: &'static [(&'static str, &'static str)] = &[
        (Self::ID3V2_TITLE, VorbisFields::TITLE),
        (Self::ID3V2_ALBUM, VorbisFields::ALBUM),
        (Self::ID3V2_ARTIST, VorbisFields::ARTIST),
        (Self::ID3V2_ALBUMARTIST, VorbisFields::ALBUMARTIST),
        (Self::ID3V2_TRACK, VorbisFields::TRACKNUMBER),
        (Self::ID3V2_DISC, VorbisFields::DISCNUMBER),
        (Self::ID3V2_GENRE, VorbisFields::GENRE),
        (Self::ID3V2_YEAR, VorbisFields::YEAR),
        (Self::ID3V2_RECORDING_TIME, VorbisFields::YEAR),
        (Self::ID3V2_COMPOSER, VorbisFields::COMPOSER),
    ];

    /// Vorbis key for an ID3v2 text frame id, if it has one
    pub fn id3v2_to_vorbis(frame_id: &str) -> Option<&'static str> {
        Self::ID3V2_TO_VORBIS
            .iter()
            .find(|(id, _)| *id == frame_id)
            .map(|(_, key)| *key)
    }
}
