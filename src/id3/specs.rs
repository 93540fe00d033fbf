use crate::common::error::Result;
use crate::id3::header::TagVersion;

/// Text encoding types used in ID3v2 frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Encoding {
    Latin1 = 0,
    Utf16 = 1,
    Utf8 = 3,
}

impl Encoding {
    /// Default encoding for a given ID3 version.
    pub fn default_for_version(version: TagVersion) -> Self {
        match version {
            TagVersion::V4 => Encoding::Utf8,
            TagVersion::V3 => Encoding::Utf16,
        }
    }

    /// Whether this encoding may appear in a tag of the given version.
    /// UTF-8 was only introduced with v2.4.
    pub fn is_valid_for(self, version: TagVersion) -> bool {
        !(self == Encoding::Utf8 && version == TagVersion::V3)
    }

    pub fn terminator(self) -> &'static [u8] {
        match self {
            Encoding::Latin1 | Encoding::Utf8 => &[0],
            Encoding::Utf16 => &[0, 0],
        }
    }
}

fn is_ascii(text: &str) -> bool {
    text.bytes().all(|b| b < 128)
}

/// Pick the encoding actually written for `strings`.
/// UTF-16 is only kept when some character falls outside ASCII.
pub fn negotiate(requested: Encoding, strings: &[&str]) -> Encoding {
    if requested == Encoding::Utf16 && strings.iter().all(|s| is_ascii(s)) {
        Encoding::Latin1
    } else {
        requested
    }
}

fn encoded_len(text: &str, encoding: Encoding) -> usize {
    match encoding {
        Encoding::Latin1 => text.chars().count() + 1,
        Encoding::Utf16 => text.encode_utf16().count() * 2 + 2,
        Encoding::Utf8 => text.len() + 1,
    }
}

fn put_text(buf: &mut Vec<u8>, text: &str, encoding: Encoding) {
    match encoding {
        Encoding::Latin1 => {
            buf.extend(text.chars().map(|c| if c as u32 <= 0xFF { c as u8 } else { b'?' }));
        }
        Encoding::Utf16 => {
            for c in text.encode_utf16() {
                buf.extend_from_slice(&c.to_le_bytes());
            }
        }
        Encoding::Utf8 => buf.extend_from_slice(text.as_bytes()),
    }
    buf.extend_from_slice(encoding.terminator());
}

/// Encode the body of a text frame: the encoding byte, a BOM for UTF-16,
/// then `text` and optionally `value`, each NUL terminated.
///
/// Two strings are used by TXXX frames, where the first is the description
/// and the second follows directly after the first terminator.
pub fn encode_text_body(text: &str, value: Option<&str>, requested: Encoding) -> Result<Vec<u8>> {
    let encoding = match value {
        Some(v) => negotiate(requested, &[text, v]),
        None => negotiate(requested, &[text]),
    };

    let mut len = 1 + encoded_len(text, encoding);
    if let Some(v) = value {
        len += encoded_len(v, encoding);
    }
    if encoding == Encoding::Utf16 {
        len += 2;
    }

    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;

    buf.push(encoding as u8);
    if encoding == Encoding::Utf16 {
        buf.extend_from_slice(&0xFEFFu16.to_le_bytes());
    }
    put_text(&mut buf, text, encoding);
    if let Some(v) = value {
        put_text(&mut buf, v, encoding);
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_utf16_request_matches_latin1() {
        let downgraded = encode_text_body("Title", None, Encoding::Utf16).unwrap();
        let latin1 = encode_text_body("Title", None, Encoding::Latin1).unwrap();
        assert_eq!(downgraded, latin1);
        assert_eq!(downgraded, b"\x00Title\x00");

        let pair = encode_text_body("key", Some("value"), Encoding::Utf16).unwrap();
        assert_eq!(pair, encode_text_body("key", Some("value"), Encoding::Latin1).unwrap());
    }

    #[test]
    fn non_ascii_keeps_utf16_with_bom() {
        let body = encode_text_body("é", None, Encoding::Utf16).unwrap();
        assert_eq!(body, [0x01, 0xFF, 0xFE, 0xE9, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn non_ascii_value_upgrades_whole_pair() {
        let body = encode_text_body("k", Some("ü"), Encoding::Utf16).unwrap();
        assert_eq!(
            body,
            [0x01, 0xFF, 0xFE, b'k', 0x00, 0x00, 0x00, 0xFC, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn utf16_surrogate_pairs() {
        let body = encode_text_body("\u{1F3B5}", None, Encoding::Utf16).unwrap();
        assert_eq!(body, [0x01, 0xFF, 0xFE, 0x3C, 0xD8, 0xB5, 0xDF, 0x00, 0x00]);
    }

    #[test]
    fn utf8_is_never_downgraded() {
        let body = encode_text_body("abc", None, Encoding::Utf8).unwrap();
        assert_eq!(body, b"\x03abc\x00");

        let body = encode_text_body("naïve", None, Encoding::Utf8).unwrap();
        assert_eq!(body[0], 3);
        assert_eq!(&body[1..body.len() - 1], "naïve".as_bytes());
    }

    #[test]
    fn latin1_replaces_unmappable() {
        let body = encode_text_body("é\u{20AC}", None, Encoding::Latin1).unwrap();
        assert_eq!(body, [0x00, 0xE9, b'?', 0x00]);
    }

    #[test]
    fn empty_strings_still_terminated() {
        assert_eq!(encode_text_body("", None, Encoding::Utf8).unwrap(), [3, 0]);
        assert_eq!(encode_text_body("", Some(""), Encoding::Utf16).unwrap(), [0, 0, 0]);
    }

    #[test]
    fn utf8_invalid_for_v3() {
        assert!(!Encoding::Utf8.is_valid_for(TagVersion::V3));
        assert!(Encoding::Utf16.is_valid_for(TagVersion::V3));
        assert_eq!(Encoding::default_for_version(TagVersion::V3), Encoding::Utf16);
        assert_eq!(Encoding::default_for_version(TagVersion::V4), Encoding::Utf8);
    }
}
