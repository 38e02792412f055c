// Encoding utilities for ID3v2 text frames

use encoding_rs::mem::decode_latin1;
use encoding_rs::{UTF_16BE, UTF_16LE, UTF_8};

/// Text encodings announced by the first byte of an ID3v2 text frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Iso8859_1 = 0,
    Utf16 = 1,
    Utf16BE = 2,
    Utf8 = 3,
}

impl TextEncoding {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(TextEncoding::Iso8859_1),
            1 => Some(TextEncoding::Utf16),
            2 => Some(TextEncoding::Utf16BE),
            3 => Some(TextEncoding::Utf8),
            _ => None,
        }
    }

    /// Width of the NUL terminator in this encoding
    pub fn terminator_len(self) -> usize {
        match self {
            TextEncoding::Utf16 | TextEncoding::Utf16BE => 2,
            TextEncoding::Iso8859_1 | TextEncoding::Utf8 => 1,
        }
    }
}

/// Decode a text payload whose first byte is the encoding id.
///
/// Unknown encodings decode to an empty string. Trailing NUL terminators
/// are dropped.
pub fn decode_text(data: &[u8]) -> String {
    let Some((&id, body)) = data.split_first() else {
        return String::new();
    };
    let Some(encoding) = TextEncoding::from_byte(id) else {
        return String::new();
    };

    let decoded = match encoding {
        // Every byte is its own code point, 0x80-0x9F included
        TextEncoding::Iso8859_1 => decode_latin1(body),
        TextEncoding::Utf8 => UTF_8.decode(body).0,
        TextEncoding::Utf16 => match body {
            [0xFE, 0xFF, rest @ ..] => UTF_16BE.decode_without_bom_handling(rest).0,
            [0xFF, 0xFE, rest @ ..] => UTF_16LE.decode_without_bom_handling(rest).0,
            rest => UTF_16LE.decode_without_bom_handling(rest).0,
        },
        TextEncoding::Utf16BE => match body {
            [0xFE, 0xFF, rest @ ..] => UTF_16BE.decode_without_bom_handling(rest).0,
            rest => UTF_16BE.decode_without_bom_handling(rest).0,
        },
    };

    decoded.trim_end_matches('\0').to_string()
}
