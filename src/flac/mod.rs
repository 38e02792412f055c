// FLAC metadata handling module

pub mod metadata;
pub mod vorbis;

pub use metadata::{read_flac, FlacMetadataBlockHeader, FlacMetadataBlockType, FLAC_SIGNATURE};
pub use vorbis::{read_vorbis_comment, VorbisFields};
