// On-disk fixture builders shared by the integration tests
#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use tagsniff::utils::io::syncsafe;
use tempfile::TempDir;

/// Write `data` to `name` inside a fresh temporary directory
pub fn write_fixture(name: &str, data: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(data).unwrap();
    (dir, path)
}

pub fn vorbis_comment(entries: &[(&str, &str)]) -> Vec<u8> {
    let vendor = b"reference libFLAC 1.4.3";
    let mut out = (vendor.len() as u32).to_le_bytes().to_vec();
    out.extend(vendor);
    out.extend((entries.len() as u32).to_le_bytes());
    for (key, value) in entries {
        let entry = format!("{key}={value}");
        out.extend((entry.len() as u32).to_le_bytes());
        out.extend(entry.as_bytes());
    }
    out
}

pub fn flac(sample_rate: u32, total_samples: u32, comments: &[(&str, &str)]) -> Vec<u8> {
    let mut streaminfo = vec![0x10, 0x00, 0x10, 0x00, 0, 0, 0, 0, 0, 0];
    streaminfo.push((sample_rate >> 12) as u8);
    streaminfo.push((sample_rate >> 4) as u8);
    // stereo, 16 bits per sample
    streaminfo.push((((sample_rate & 0xF) as u8) << 4) | (1 << 1));
    streaminfo.push(0xF0);
    streaminfo.extend(total_samples.to_be_bytes());
    streaminfo.extend([0u8; 16]);

    let comment = vorbis_comment(comments);
    let mut out = b"fLaC".to_vec();
    out.extend((streaminfo.len() as u32).to_be_bytes());
    out.extend(streaminfo);
    out.extend((0x8400_0000 | comment.len() as u32).to_be_bytes());
    out.extend(comment);
    out
}

pub fn ogg_page(packet: &[u8], granule: u64, sequence: u32) -> Vec<u8> {
    let mut lacing = vec![255u8; packet.len() / 255];
    lacing.push((packet.len() % 255) as u8);

    let mut out = b"OggS\x00".to_vec();
    out.push(if sequence == 0 { 0x02 } else { 0x00 });
    out.extend(granule.to_le_bytes());
    out.extend(7u32.to_le_bytes());
    out.extend(sequence.to_le_bytes());
    out.extend([0u8; 4]);
    out.push(lacing.len() as u8);
    out.extend(lacing);
    out.extend(packet);
    out
}

pub fn vorbis_headers(nominal_bitrate: i32, comments: &[(&str, &str)]) -> Vec<u8> {
    let mut ident = b"\x01vorbis".to_vec();
    ident.extend(0u32.to_le_bytes());
    ident.push(2);
    ident.extend(44_100u32.to_le_bytes());
    ident.extend(0i32.to_le_bytes());
    ident.extend(nominal_bitrate.to_le_bytes());
    ident.extend(0i32.to_le_bytes());
    ident.extend([0xB8, 0x01]);

    let mut comment = b"\x03vorbis".to_vec();
    comment.extend(vorbis_comment(comments));
    comment.push(0x01);

    let mut out = ogg_page(&ident, 0, 0);
    out.extend(ogg_page(&comment, 0, 1));
    out
}

pub fn opus_headers(pre_skip: u16, gain: i16, comments: &[(&str, &str)]) -> Vec<u8> {
    let mut head = b"OpusHead\x01\x02".to_vec();
    head.extend(pre_skip.to_le_bytes());
    head.extend(48_000u32.to_le_bytes());
    head.extend(gain.to_le_bytes());
    head.push(0);

    let mut tags = b"OpusTags".to_vec();
    tags.extend(vorbis_comment(comments));

    let mut out = ogg_page(&head, 0, 0);
    out.extend(ogg_page(&tags, 0, 1));
    out
}

/// ID3v2.4 text frame, UTF-8 encoded
pub fn id3_text_frame(id: &str, text: &str) -> Vec<u8> {
    let mut payload = vec![3u8];
    payload.extend(text.as_bytes());
    let mut out = id.as_bytes().to_vec();
    out.extend(syncsafe(payload.len() as u32).to_be_bytes());
    out.extend([0u8; 2]);
    out.extend(payload);
    out
}

pub fn id3_tag(frames: &[Vec<u8>], padding: usize) -> Vec<u8> {
    let mut body: Vec<u8> = frames.concat();
    body.resize(body.len() + padding, 0);
    let mut out = b"ID3\x04\x00\x00".to_vec();
    out.extend(syncsafe(body.len() as u32).to_be_bytes());
    out.extend(body);
    out
}

/// MPEG-1 Layer III, 44.1 kHz frame with an `Info` header and LAME gains
pub fn lame_frame(total_frames: u32, track_gain: u16, album_gain: u16) -> Vec<u8> {
    let mut out = vec![0u8; 417];
    out[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
    out[0x24..0x28].copy_from_slice(b"Info");
    out[0x2B] = 0x01;
    out[0x2C..0x30].copy_from_slice(&total_frames.to_be_bytes());
    out[0x9C..0xA5].copy_from_slice(b"LAME3.100");
    out[0xAB..0xAD].copy_from_slice(&track_gain.to_be_bytes());
    out[0xAD..0xAF].copy_from_slice(&album_gain.to_be_bytes());
    out
}
