use std::fmt;
use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use log::trace;

use crate::common::error::{Result, TagError};
use crate::id3::header::{TagVersion, HEADER_SIZE};

/// Four-character frame identifier, held as the big-endian integer of its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u32);

impl FrameId {
    /// User-defined text frame, the catch-all for keys without a dedicated frame.
    pub const TXXX: FrameId = FrameId::new(*b"TXXX");

    pub const fn new(id: [u8; 4]) -> Self {
        FrameId(u32::from_be_bytes(id))
    }

    /// Build an id from a metadata key, if the key is exactly four bytes long.
    pub fn from_key(key: &str) -> Option<Self> {
        let bytes: [u8; 4] = key.as_bytes().try_into().ok()?;
        Some(FrameId::new(bytes))
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.to_bytes() {
            write!(f, "{}", b.escape_ascii())?;
        }
        Ok(())
    }
}

/// Write one frame: id, size (plain for v2.3, syncsafe for v2.4), zero flags, body.
/// Returns the number of bytes written, header included.
pub fn write_frame<W: Write>(
    writer: &mut W,
    version: TagVersion,
    id: FrameId,
    body: &[u8],
) -> Result<usize> {
    let len = body.len() as u32;

    writer.write_u32::<BigEndian>(id.as_u32()).map_err(TagError::Write)?;
    writer.write_all(&version.frame_size(len)).map_err(TagError::Write)?;
    writer.write_u16::<BigEndian>(0).map_err(TagError::Write)?;
    writer.write_all(body).map_err(TagError::Write)?;

    trace!("wrote {} frame, {} byte body", id, body.len());
    Ok(HEADER_SIZE + body.len())
}
