// Tag model returned by every parser

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Container format detected by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileType {
    #[serde(rename = "FLAC")]
    Flac,
    #[serde(rename = "OPUS")]
    Opus,
    #[serde(rename = "OGG")]
    OggVorbis,
    #[serde(rename = "MP3/Lame")]
    Mp3Lame,
    #[serde(rename = "MP3/ID3v2")]
    Mp3Id3v2,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Flac => "FLAC",
            FileType::Opus => "OPUS",
            FileType::OggVorbis => "OGG",
            FileType::Mp3Lame => "MP3/Lame",
            FileType::Mp3Id3v2 => "MP3/ID3v2",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags of one file, keyed by upper-case name.
///
/// A key may carry several values (repeated Vorbis comments); their order is
/// the order in which they were found. `duration` and `type` are kept as
/// typed fields and only show up as keys in [`TagMap::to_flat_map`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TagMap {
    #[serde(rename = "type")]
    file_type: Option<FileType>,
    duration: Option<f64>,
    tags: BTreeMap<String, Vec<String>>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the values already stored under `key`
    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        self.tags
            .entry(key.to_uppercase())
            .or_default()
            .push(value.into());
    }

    /// Store `value` only if `key` has no value yet. Returns whether it was stored.
    pub fn insert_if_absent(&mut self, key: &str, value: impl Into<String>) -> bool {
        let key = key.to_uppercase();
        if self.tags.contains_key(&key) {
            return false;
        }
        self.tags.insert(key, vec![value.into()]);
        true
    }

    /// Replace whatever is stored under `key` with the single `value`
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.tags.insert(key.to_uppercase(), vec![value.into()]);
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.tags.get(&key.to_uppercase()).map(Vec::as_slice)
    }

    /// First value stored under `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tags.contains_key(&key.to_uppercase())
    }

    /// Number of distinct tag keys, not counting `duration` and `type`
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Duration in seconds
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn set_duration(&mut self, seconds: f64) {
        self.duration = Some(seconds);
    }

    /// Take `seconds` only when no duration is known yet
    pub fn inherit_duration(&mut self, seconds: Option<f64>) {
        if self.duration.is_none() {
            self.duration = seconds;
        }
    }

    pub fn file_type(&self) -> Option<FileType> {
        self.file_type
    }

    pub fn set_file_type(&mut self, file_type: FileType) {
        self.file_type = Some(file_type);
    }

    /// Copy the named keys and the duration from `other` where this map has none
    pub fn inherit_from(&mut self, other: &TagMap, keys: &[&str]) {
        for key in keys {
            if let Some(values) = other.get(key) {
                if !self.contains_key(key) {
                    self.tags.insert(key.to_uppercase(), values.to_vec());
                }
            }
        }
        self.inherit_duration(other.duration);
    }

    /// String view with the synthetic `duration` and `type` keys folded in
    pub fn to_flat_map(&self) -> BTreeMap<String, Vec<String>> {
        let mut flat = self.tags.clone();
        if let Some(duration) = self.duration {
            flat.insert("duration".to_string(), vec![duration.to_string()]);
        }
        if let Some(file_type) = self.file_type {
            flat.insert("type".to_string(), vec![file_type.to_string()]);
        }
        flat
    }
}

/// Stream parameters decoded from an identification or STREAMINFO block.
///
/// Only used to derive a duration; fields a format does not carry stay zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamInfo {
    pub sample_rate: u32,
    pub channels: u8,
    pub bits_per_sample: u8,
    pub min_block_size: u16,
    pub max_block_size: u16,
    pub min_frame_size: u32,
    pub max_frame_size: u32,
    pub min_bitrate: i32,
    pub nominal_bitrate: i32,
    pub max_bitrate: i32,
    pub total_samples: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_upper_cased() {
        let mut tags = TagMap::new();
        tags.append("Title", "A");
        assert_eq!(tags.get("TITLE"), Some(&["A".to_string()][..]));
        assert_eq!(tags.first("title"), Some("A"));
        assert_eq!(tags.iter().next().unwrap().0, "TITLE");
    }

    #[test]
    fn test_append_keeps_order() {
        let mut tags = TagMap::new();
        tags.append("ARTIST", "B");
        tags.append("artist", "C");
        assert_eq!(tags.get("ARTIST").unwrap(), ["B", "C"]);
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_insert_if_absent_keeps_first() {
        let mut tags = TagMap::new();
        assert!(tags.insert_if_absent("TITLE", "X"));
        assert!(!tags.insert_if_absent("TITLE", "Y"));
        assert_eq!(tags.get("TITLE").unwrap(), ["X"]);
    }

    #[test]
    fn test_set_replaces() {
        let mut tags = TagMap::new();
        tags.append("R128_BASE_GAIN", "1");
        tags.append("R128_BASE_GAIN", "2");
        tags.set("R128_BASE_GAIN", "3");
        assert_eq!(tags.get("R128_BASE_GAIN").unwrap(), ["3"]);
    }

    #[test]
    fn test_inherit_from_only_fills_gaps() {
        let mut tags = TagMap::new();
        tags.append("REPLAYGAIN_TRACK_GAIN", "-1.0 dB");
        tags.set_duration(10.0);

        let mut other = TagMap::new();
        other.append("REPLAYGAIN_TRACK_GAIN", "-2.0 dB");
        other.append("REPLAYGAIN_ALBUM_GAIN", "-3.0 dB");
        other.set_duration(20.0);

        tags.inherit_from(&other, &["REPLAYGAIN_TRACK_GAIN", "REPLAYGAIN_ALBUM_GAIN"]);
        assert_eq!(tags.first("REPLAYGAIN_TRACK_GAIN"), Some("-1.0 dB"));
        assert_eq!(tags.first("REPLAYGAIN_ALBUM_GAIN"), Some("-3.0 dB"));
        assert_eq!(tags.duration(), Some(10.0));
    }

    #[test]
    fn test_flat_map_has_synthetic_keys() {
        let mut tags = TagMap::new();
        tags.append("TITLE", "Song");
        tags.set_duration(240.0);
        tags.set_file_type(FileType::Flac);

        let flat = tags.to_flat_map();
        assert_eq!(flat["duration"], ["240"]);
        assert_eq!(flat["type"], ["FLAC"]);
        assert_eq!(flat["TITLE"], ["Song"]);
        assert_eq!(tags.len(), 1);
    }
}
