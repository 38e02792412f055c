// ID3 metadata handling module
pub mod frames;
pub mod v2;

pub use v2::{Id3v2Header, Id3v2Tag};
