use std::fmt;

use crate::common::error::TagError;

/// Size of the tag header, and of every frame header in v2.3/v2.4.
pub const HEADER_SIZE: usize = 10;

/// Largest value a 4-byte syncsafe integer can carry (2^28 - 1).
pub const MAX_SYNCSAFE: u32 = 0x0FFF_FFFF;

/// Default tag magic.
pub const ID3_MAGIC: [u8; 3] = *b"ID3";

/// Syncsafe integer encoding used in ID3v2 tags.
/// Each byte uses only 7 bits (MSB is always 0).
pub struct BitPaddedInt;

impl BitPaddedInt {
    /// Decode a syncsafe integer from bytes.
    /// `bits` is the number of significant bits per byte (7 for syncsafe, 8 for normal).
    pub fn decode(data: &[u8], bits: u8) -> u32 {
        let mut result: u32 = 0;
        let mask = (1u32 << bits) - 1;
        for &b in data {
            result = (result << bits) | (b as u32 & mask);
        }
        result
    }

    /// Decode standard syncsafe (7 bits per byte).
    pub fn syncsafe(data: &[u8]) -> u32 {
        Self::decode(data, 7)
    }

    /// Decode as normal integer (8 bits per byte).
    pub fn normal(data: &[u8]) -> u32 {
        Self::decode(data, 8)
    }

    /// Encode a 28-bit size as the 4-byte syncsafe form, most significant first.
    /// Bits above 28 are dropped.
    pub fn encode_size(size: u32) -> [u8; 4] {
        [
            (size >> 21 & 0x7F) as u8,
            (size >> 14 & 0x7F) as u8,
            (size >> 7 & 0x7F) as u8,
            (size & 0x7F) as u8,
        ]
    }

    /// Check if data could be a valid syncsafe integer (no high bits set).
    pub fn has_valid_padding(data: &[u8]) -> bool {
        data.iter().all(|&b| b & 0x80 == 0)
    }
}

/// Major version of the tag being produced.
///
/// Fixed for a whole session. v2.3 writes frame sizes as plain big-endian
/// integers while v2.4 writes them syncsafe, so the two layouts are not
/// interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TagVersion {
    V3,
    #[default]
    V4,
}

impl TagVersion {
    pub fn major(self) -> u8 {
        match self {
            TagVersion::V3 => 3,
            TagVersion::V4 => 4,
        }
    }

    /// Encode a frame body length for this version's frame header.
    pub fn frame_size(self, len: u32) -> [u8; 4] {
        match self {
            TagVersion::V3 => len.to_be_bytes(),
            TagVersion::V4 => BitPaddedInt::encode_size(len),
        }
    }
}

impl TryFrom<u8> for TagVersion {
    type Error = TagError;

    fn try_from(major: u8) -> Result<Self, Self::Error> {
        match major {
            3 => Ok(TagVersion::V3),
            4 => Ok(TagVersion::V4),
            other => Err(TagError::UnsupportedVersion(other)),
        }
    }
}

impl fmt::Display for TagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID3v2.{}", self.major())
    }
}
