// ID3v2 text frame decoding

use crate::field_mapping::FieldMappings;
use crate::utils::encoding::{decode_text, TextEncoding};

/// Tag key and value carried by one text frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
    pub key: String,
    pub value: String,
}

impl TextFrame {
    /// Decode a frame whose id starts with `T`.
    ///
    /// Known ids map to their Vorbis key, `TXXX` carries its own key before
    /// the first terminator, and any other text frame keeps its raw id.
    pub fn decode(frame_id: &str, payload: &[u8]) -> Option<Self> {
        if frame_id == FieldMappings::ID3V2_USER_TEXT {
            return Self::decode_user_text(payload);
        }

        let key = FieldMappings::id3v2_to_vorbis(frame_id).unwrap_or(frame_id);
        Some(TextFrame {
            key: key.to_string(),
            value: decode_text(payload),
        })
    }

    /// Split a `TXXX` payload into description and value, both decoded with
    /// the frame's encoding
    fn decode_user_text(payload: &[u8]) -> Option<Self> {
        let (&id, body) = payload.split_first()?;
        let width = TextEncoding::from_byte(id)?.terminator_len();

        let split = body
            .chunks_exact(width)
            .position(|unit| unit.iter().all(|&b| b == 0))?
            * width;

        let mut key = vec![id];
        key.extend_from_slice(&body[..split]);
        let mut value = vec![id];
        value.extend_from_slice(&body[split + width..]);

        let key = decode_text(&key);
        if key.is_empty() {
            return None;
        }
        Some(TextFrame {
            key,
            value: decode_text(&value),
        })
    }
}
