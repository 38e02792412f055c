// In-memory builders for container fixtures used by the unit tests

/// Encode a Vorbis comment block
pub fn vorbis_comment(vendor: &str, entries: &[(&str, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend((vendor.len() as u32).to_le_bytes());
    out.extend(vendor.as_bytes());
    out.extend((entries.len() as u32).to_le_bytes());
    for (key, value) in entries {
        let entry = format!("{key}={value}");
        out.extend((entry.len() as u32).to_le_bytes());
        out.extend(entry.as_bytes());
    }
    out
}

/// Encode a FLAC metadata block header followed by its payload
pub fn flac_block(block_type: u8, is_last: bool, payload: &[u8]) -> Vec<u8> {
    let mut header = (payload.len() as u32) & 0x00FF_FFFF;
    header |= ((block_type as u32) & 0x7F) << 24;
    if is_last {
        header |= 0x8000_0000;
    }
    let mut out = header.to_be_bytes().to_vec();
    out.extend(payload);
    out
}

/// Encode a 34-byte STREAMINFO payload
pub fn flac_streaminfo(sample_rate: u32, channels: u8, bits_per_sample: u8, total_samples: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(34);
    out.extend(4096u16.to_be_bytes());
    out.extend(4096u16.to_be_bytes());
    out.extend(&16u32.to_be_bytes()[1..]);
    out.extend(&14_000u32.to_be_bytes()[1..]);
    let bps = bits_per_sample - 1;
    out.push((sample_rate >> 12) as u8);
    out.push((sample_rate >> 4) as u8);
    out.push((((sample_rate & 0xF) as u8) << 4) | ((channels - 1) << 1) | (bps >> 4));
    out.push(((bps & 0xF) << 4) | ((total_samples >> 32) as u8 & 0xF));
    out.extend((total_samples as u32).to_be_bytes());
    out.extend([0u8; 16]);
    out
}

/// Build a complete FLAC stream from metadata blocks
pub fn flac_file(blocks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"fLaC".to_vec();
    for block in blocks {
        out.extend(block);
    }
    out
}

/// Wrap one packet into an Ogg page with proper lacing
pub fn ogg_page(packet: &[u8], granule: u64, sequence: u32) -> Vec<u8> {
    let mut lacing = vec![255u8; packet.len() / 255];
    lacing.push((packet.len() % 255) as u8);

    let mut out = b"OggS".to_vec();
    out.push(0); // version
    out.push(if sequence == 0 { 0x02 } else { 0x00 });
    out.extend(granule.to_le_bytes());
    out.extend(0x1234_5678u32.to_le_bytes()); // serial
    out.extend(sequence.to_le_bytes());
    out.extend([0u8; 4]); // crc, not checked
    out.push(lacing.len() as u8);
    out.extend(lacing);
    out.extend(packet);
    out
}

/// Vorbis identification header packet
pub fn vorbis_identification(channels: u8, sample_rate: u32, nominal_bitrate: i32) -> Vec<u8> {
    let mut out = b"\x01vorbis".to_vec();
    out.extend(0u32.to_le_bytes());
    out.push(channels);
    out.extend(sample_rate.to_le_bytes());
    out.extend(0i32.to_le_bytes());
    out.extend(nominal_bitrate.to_le_bytes());
    out.extend(0i32.to_le_bytes());
    out.push(0xB8); // blocksizes
    out.push(0x01); // framing
    out
}

/// Vorbis comment header packet
pub fn vorbis_comment_packet(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut out = b"\x03vorbis".to_vec();
    out.extend(vorbis_comment("Xiph.Org libVorbis I 20200704", entries));
    out.push(0x01);
    out
}

/// OpusHead packet
pub fn opus_head(version: u8, channels: u8, pre_skip: u16, sample_rate: u32, gain: i16) -> Vec<u8> {
    let mut out = b"OpusHead".to_vec();
    out.push(version);
    out.push(channels);
    out.extend(pre_skip.to_le_bytes());
    out.extend(sample_rate.to_le_bytes());
    out.extend(gain.to_le_bytes());
    out.push(0); // mapping family
    out
}

/// OpusTags packet
pub fn opus_tags(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut out = b"OpusTags".to_vec();
    out.extend(vorbis_comment("libopus 1.4", entries));
    out
}

/// ID3v2 frame with a 4-byte id; sizes are synchsafe for version 4
pub fn id3_frame(version: u8, id: &str, payload: &[u8]) -> Vec<u8> {
    let size = payload.len() as u32;
    let size = if version >= 4 { crate::utils::io::syncsafe(size) } else { size };
    let mut out = id.as_bytes().to_vec();
    out.extend(size.to_be_bytes());
    out.extend([0u8; 2]);
    out.extend(payload);
    out
}

/// Text frame payload with encoding byte 3 (UTF-8)
pub fn id3_text(text: &str) -> Vec<u8> {
    let mut out = vec![3u8];
    out.extend(text.as_bytes());
    out
}

/// ID3v2 tag: header plus frames plus `padding` zero bytes
pub fn id3_tag(version: u8, frames: &[Vec<u8>], padding: usize) -> Vec<u8> {
    let body: Vec<u8> = frames.iter().flatten().copied().chain(std::iter::repeat(0).take(padding)).collect();
    let mut out = b"ID3".to_vec();
    out.push(version);
    out.push(0); // revision
    out.push(0); // flags
    out.extend(crate::utils::io::syncsafe(body.len() as u32).to_be_bytes());
    out.extend(body);
    out
}

/// First MPEG-1 Layer III frame (44.1 kHz, stereo) carrying a Xing/Info header.
///
/// `gains` is the raw (track, album) ReplayGain pair of the LAME extension.
pub fn xing_frame(marker: &[u8; 4], total_frames: Option<u32>, gains: Option<(u16, u16)>) -> Vec<u8> {
    let mut out = vec![0u8; 417];
    out[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
    out[0x24..0x28].copy_from_slice(marker);
    if let Some(frames) = total_frames {
        out[0x2B] = 0x01;
        out[0x2C..0x30].copy_from_slice(&frames.to_be_bytes());
    }
    if let Some((track, album)) = gains {
        out[0x9C..0xA5].copy_from_slice(b"LAME3.100");
        out[0xAB..0xAD].copy_from_slice(&track.to_be_bytes());
        out[0xAD..0xAF].copy_from_slice(&album.to_be_bytes());
    }
    out
}
