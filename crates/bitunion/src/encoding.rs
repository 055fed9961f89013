//! Text encodings for string fields.

use std::fmt;

/// Character encoding used to turn string field bytes into text and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoding {
    /// UTF-8. Any valid UTF-8 byte sequence is accepted.
    #[default]
    Utf8,
    /// ASCII. Every byte must be in 0..=0x7F.
    Ascii,
    /// ISO-8859-1. Every byte maps to the code point of the same value.
    Latin1,
}

impl Encoding {
    /// Parses a codec label such as `"utf-8"`, `"ascii"` or `"latin-1"`. Case and separators are ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "utf8" | "u8" => Some(Encoding::Utf8),
            "ascii" | "usascii" | "646" => Some(Encoding::Ascii),
            "latin1" | "latin" | "l1" | "iso88591" | "8859" | "cp819" => Some(Encoding::Latin1),
            _ => None,
        }
    }

    /// Decodes `bytes`, returning `None` if they are not valid in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
            Encoding::Ascii => {
                if bytes.iter().any(|b| *b > 0x7F) {
                    return None;
                }
                String::from_utf8(bytes.to_vec()).ok()
            }
            Encoding::Latin1 => Some(bytes.iter().map(|b| char::from(*b)).collect()),
        }
    }

    /// Encodes `text`, returning `None` if a character has no representation.
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        match self {
            Encoding::Utf8 => Some(text.as_bytes().to_vec()),
            Encoding::Ascii => text.is_ascii().then(|| text.as_bytes().to_vec()),
            Encoding::Latin1 => text.chars().map(|c| u8::try_from(c).ok()).collect(),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Ascii => "ascii",
            Encoding::Latin1 => "latin-1",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(Encoding::from_label("utf-8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::from_label("UTF8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::from_label("ascii"), Some(Encoding::Ascii));
        assert_eq!(Encoding::from_label("ISO-8859-1"), Some(Encoding::Latin1));
        assert_eq!(Encoding::from_label("latin_1"), Some(Encoding::Latin1));
        assert_eq!(Encoding::from_label("ebcdic"), None);
    }

    #[test]
    fn test_ascii() {
        assert_eq!(Encoding::Ascii.decode(b"bar\0"), Some("bar\0".to_string()));
        assert_eq!(Encoding::Ascii.decode(&[0x62, 0xff]), None);
        assert_eq!(Encoding::Ascii.encode("bär"), None);
    }

    #[test]
    fn test_utf8() {
        assert_eq!(Encoding::Utf8.encode("bär"), Some(vec![0x62, 0xc3, 0xa4, 0x72]));
        assert_eq!(Encoding::Utf8.decode(&[0xff, 0xff]), None);
    }

    #[test]
    fn test_latin1() {
        assert_eq!(Encoding::Latin1.encode("bär"), Some(vec![0x62, 0xe4, 0x72]));
        assert_eq!(Encoding::Latin1.decode(&[0x62, 0xe4, 0x72]), Some("bär".to_string()));
        assert_eq!(Encoding::Latin1.encode("€"), None);
    }
}
