/*!
 * Byte encoding detection and conversion.
 *
 * Subtitle files from the wild arrive as UTF-8, UTF-16 with a byte-order
 * mark, or one of the Windows single-byte code pages used for Serbian text
 * (Windows-1250 for Latin script, Windows-1251 for Cyrillic). This module
 * sniffs which one a buffer is in and converts between bytes and `String`.
 */

mod code_pages;

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::EncodingError;
use code_pages::{WINDOWS_1250_HIGH, WINDOWS_1251_HIGH};

/// Share of high-range bytes among non-whitespace bytes at or above which an
/// invalid-UTF-8 buffer is taken to be Cyrillic (Windows-1251).
pub const CYRILLIC_HIGH_BYTE_RATIO: f64 = 0.20;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Encodings the codec can read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "utf-16le")]
    Utf16Le,
    #[serde(rename = "utf-16be")]
    Utf16Be,
    #[serde(rename = "windows-1250")]
    Windows1250,
    #[serde(rename = "windows-1251")]
    Windows1251,
}

impl TextEncoding {
    /// Canonical lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16Le => "utf-16le",
            Self::Utf16Be => "utf-16be",
            Self::Windows1250 => "windows-1250",
            Self::Windows1251 => "windows-1251",
        }
    }

    /// Short label for listings (`1250`, `UTF-8`, ...)
    pub fn short_label(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Windows1250 => "1250",
            Self::Windows1251 => "1251",
        }
    }

    /// Human-readable name used in change notes
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Windows1250 => "Windows-1250",
            Self::Windows1251 => "Windows-1251",
        }
    }

    fn high_table(&self) -> Option<&'static [u16; 128]> {
        match self {
            Self::Windows1250 => Some(&WINDOWS_1250_HIGH),
            Self::Windows1251 => Some(&WINDOWS_1251_HIGH),
            _ => None,
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TextEncoding {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-16le" | "utf16le" => Ok(Self::Utf16Le),
            "utf-16be" | "utf16be" => Ok(Self::Utf16Be),
            "windows-1250" | "cp1250" | "1250" => Ok(Self::Windows1250),
            "windows-1251" | "cp1251" | "1251" => Ok(Self::Windows1251),
            _ => Err(EncodingError::Unsupported(s.to_string())),
        }
    }
}

/// Guess the encoding of a raw buffer.
///
/// A byte-order mark wins; otherwise well-formed UTF-8 (pure ASCII included)
/// is UTF-8; otherwise the density of high-range bytes picks between the
/// Cyrillic and Latin-extended code pages.
pub fn detect_encoding(bytes: &[u8]) -> TextEncoding {
    if bytes.starts_with(&UTF8_BOM) {
        return TextEncoding::Utf8;
    }
    if bytes.starts_with(&UTF16LE_BOM) {
        return TextEncoding::Utf16Le;
    }
    if bytes.starts_with(&UTF16BE_BOM) {
        return TextEncoding::Utf16Be;
    }

    if std::str::from_utf8(bytes).is_ok() {
        return TextEncoding::Utf8;
    }

    let ratio = high_byte_ratio(bytes);
    debug!("Buffer is not UTF-8, high byte ratio {:.3}", ratio);
    if ratio >= CYRILLIC_HIGH_BYTE_RATIO {
        TextEncoding::Windows1251
    } else {
        TextEncoding::Windows1250
    }
}

fn high_byte_ratio(bytes: &[u8]) -> f64 {
    let mut non_whitespace = 0usize;
    let mut high = 0usize;
    for &b in bytes {
        if b.is_ascii_whitespace() {
            continue;
        }
        non_whitespace += 1;
        if b >= 0x80 {
            high += 1;
        }
    }

    if non_whitespace == 0 {
        0.0
    } else {
        high as f64 / non_whitespace as f64
    }
}

/// Decode a buffer under the given encoding, consuming a matching BOM.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<String, EncodingError> {
    match encoding {
        TextEncoding::Utf8 => {
            let body = bytes.strip_prefix(&UTF8_BOM[..]).unwrap_or(bytes);
            let bom_len = bytes.len() - body.len();
            std::str::from_utf8(body)
                .map(str::to_string)
                .map_err(|e| EncodingError::Malformed {
                    encoding: encoding.as_str(),
                    offset: bom_len + e.valid_up_to(),
                })
        }
        TextEncoding::Utf16Le => decode_utf16(bytes, &UTF16LE_BOM, encoding, u16::from_le_bytes),
        TextEncoding::Utf16Be => decode_utf16(bytes, &UTF16BE_BOM, encoding, u16::from_be_bytes),
        TextEncoding::Windows1250 | TextEncoding::Windows1251 => decode_single_byte(bytes, encoding),
    }
}

fn decode_utf16(
    bytes: &[u8],
    bom: &[u8; 2],
    encoding: TextEncoding,
    to_unit: fn([u8; 2]) -> u16,
) -> Result<String, EncodingError> {
    let body = bytes.strip_prefix(&bom[..]).unwrap_or(bytes);
    let bom_len = bytes.len() - body.len();

    if body.len() % 2 != 0 {
        return Err(EncodingError::Malformed {
            encoding: encoding.as_str(),
            offset: bytes.len() - 1,
        });
    }

    let units = body.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    let mut text = String::with_capacity(body.len() / 2);
    let mut offset = bom_len;
    for decoded in char::decode_utf16(units) {
        match decoded {
            Ok(ch) => {
                text.push(ch);
                offset += ch.len_utf16() * 2;
            }
            Err(_) => {
                return Err(EncodingError::Malformed {
                    encoding: encoding.as_str(),
                    offset,
                });
            }
        }
    }
    Ok(text)
}

fn decode_single_byte(bytes: &[u8], encoding: TextEncoding) -> Result<String, EncodingError> {
    let Some(table) = encoding.high_table() else {
        return Err(EncodingError::Unsupported(encoding.as_str().to_string()));
    };

    let mut text = String::with_capacity(bytes.len());
    for (offset, &b) in bytes.iter().enumerate() {
        if b < 0x80 {
            text.push(b as char);
            continue;
        }
        let ch = match table[(b - 0x80) as usize] {
            0 => None,
            code => char::from_u32(code as u32),
        };
        match ch {
            Some(ch) => text.push(ch),
            None => {
                return Err(EncodingError::UnmappableByte {
                    encoding: encoding.as_str(),
                    byte: b,
                    offset,
                });
            }
        }
    }
    Ok(text)
}

/// Encode text under the given encoding. UTF-16 output starts with its BOM.
pub fn encode(text: &str, encoding: TextEncoding) -> Result<Vec<u8>, EncodingError> {
    match encoding {
        TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        TextEncoding::Utf16Le => {
            let mut out = UTF16LE_BOM.to_vec();
            out.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
            Ok(out)
        }
        TextEncoding::Utf16Be => {
            let mut out = UTF16BE_BOM.to_vec();
            out.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
            Ok(out)
        }
        TextEncoding::Windows1250 | TextEncoding::Windows1251 => encode_single_byte(text, encoding),
    }
}

fn encode_single_byte(text: &str, encoding: TextEncoding) -> Result<Vec<u8>, EncodingError> {
    let Some(table) = encoding.high_table() else {
        return Err(EncodingError::Unsupported(encoding.as_str().to_string()));
    };

    let mut out = Vec::with_capacity(text.len());
    for (position, ch) in text.chars().enumerate() {
        let code = ch as u32;
        if code < 0x80 {
            out.push(code as u8);
            continue;
        }
        let index = table
            .iter()
            .position(|&mapped| mapped != 0 && mapped as u32 == code);
        match index {
            Some(index) => out.push(0x80 + index as u8),
            None => {
                return Err(EncodingError::Unrepresentable {
                    encoding: encoding.as_str(),
                    ch,
                    code,
                    position,
                });
            }
        }
    }
    Ok(out)
}
