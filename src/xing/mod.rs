// Xing/LAME header support
//
// LAME and Xing encoders put an info header into the first MPEG audio frame.
// For MPEG-1 stereo streams it sits 0x24 bytes into the frame:
//   "Xing" (VBR) or "Info" (CBR) marker (4 bytes)
//   flags (4 bytes, big-endian; bit 0 = frame count present)
//   total frame count (4 bytes, big-endian)
// The LAME extension that follows carries ReplayGain values at 0xAB.

use std::io::{Read, Seek};

use tracing::trace;

use crate::error::Result;
use crate::flac::vorbis::VorbisFields;
use crate::tags::TagMap;
use crate::utils::io::{be32, byte, ByteCursor};

const XING_OFFSET: u64 = 0x24;
const REPLAY_GAIN_OFFSET: u64 = 0xAB;
const FLAG_FRAMES: u8 = 0x01;

const XING_MARKER: &[u8; 4] = b"Xing";
const INFO_MARKER: &[u8; 4] = b"Info";

// Indexed by [version index][sample rate index]
const SAMPLE_RATES: [[u32; 3]; 4] = [
    [11_025, 12_000, 8_000],  // MPEG 2.5
    [0, 0, 0],                // reserved
    [22_050, 24_000, 16_000], // MPEG 2
    [44_100, 48_000, 32_000], // MPEG 1
];

// Indexed by [version index][layer index]; layer index 1 is Layer III
const SAMPLES_PER_FRAME: [[u32; 4]; 4] = [
    [0, 576, 1_152, 384],   // MPEG 2.5
    [0, 0, 0, 0],           // reserved
    [0, 576, 1_152, 384],   // MPEG 2
    [0, 1_152, 1_152, 384], // MPEG 1
];

/// Play time of `total_frames` frames described by the MPEG frame header word.
/// `None` for reserved version, layer or sample rate indices.
pub fn frame_duration(mpeg_header: u32, total_frames: u32) -> Option<f64> {
    let rate_index = ((mpeg_header >> 10) & 0x03) as usize;
    let layer_index = ((mpeg_header >> 17) & 0x03) as usize;
    let version_index = ((mpeg_header >> 19) & 0x03) as usize;

    let sample_rate = *SAMPLE_RATES[version_index].get(rate_index)?;
    let samples_per_frame = SAMPLES_PER_FRAME[version_index][layer_index];
    if sample_rate == 0 || samples_per_frame == 0 {
        return None;
    }

    Some(samples_per_frame as f64 / sample_rate as f64 * total_frames as f64)
}

/// Decode one 16-bit LAME ReplayGain field; `name_code` 1 is track, 2 is album
fn replay_gain(raw: u16, name_code: u16) -> Option<String> {
    if raw >> 13 != name_code {
        return None;
    }
    let magnitude = (raw & 0x01FF) as f64 / 10.0;
    let value = if raw & 0x0200 != 0 { -magnitude } else { magnitude };
    Some(format!("{value:.1} dB"))
}

/// Read the Xing/LAME header of the MPEG frame starting at `offset`.
///
/// Stores `duration` when the frame count is present and the frame header
/// indices are valid, plus the LAME ReplayGain values. A source too short to
/// hold the header leaves `tags` untouched.
pub fn read_xing<R: Read + Seek>(cursor: &mut ByteCursor<R>, offset: u64, tags: &mut TagMap) -> Result<()> {
    let mut chunk = [0u8; 12];
    if offset + XING_OFFSET + chunk.len() as u64 > cursor.len() {
        return Ok(());
    }
    cursor.read_exact_at(offset + XING_OFFSET, &mut chunk)?;

    let marker = &chunk[..4];
    if marker != XING_MARKER && marker != INFO_MARKER {
        trace!(offset, "no xing/info marker");
        return Ok(());
    }

    if byte(&chunk, 7)? & FLAG_FRAMES != 0 {
        let total_frames = be32(&chunk, 8)?;
        let mut frame_header = [0u8; 4];
        cursor.read_exact_at(offset, &mut frame_header)?;
        let mpeg_header = u32::from_be_bytes(frame_header);

        match frame_duration(mpeg_header, total_frames) {
            Some(seconds) => tags.inherit_duration(Some(seconds)),
            None => trace!(mpeg_header, "unsupported mpeg frame header"),
        }
    }

    let mut gains = [0u8; 4];
    if offset + REPLAY_GAIN_OFFSET + gains.len() as u64 <= cursor.len() {
        cursor.read_exact_at(offset + REPLAY_GAIN_OFFSET, &mut gains)?;
        let raw = be32(&gains, 0)?;
        if let Some(gain) = replay_gain((raw >> 16) as u16, 1) {
            tags.append(VorbisFields::REPLAYGAIN_TRACK_GAIN, gain);
        }
        if let Some(gain) = replay_gain(raw as u16, 2) {
            tags.append(VorbisFields::REPLAYGAIN_ALBUM_GAIN, gain);
        }
    }

    Ok(())
}
