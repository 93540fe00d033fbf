use std::io::{Cursor, Seek, SeekFrom, Write};

use byteorder::{BigEndian, WriteBytesExt};
use log::{debug, warn};

use crate::common::error::{Result, TagError};
use crate::id3::frames::{self, FrameId};
use crate::id3::header::{BitPaddedInt, TagVersion, ID3_MAGIC, MAX_SYNCSAFE};
use crate::id3::metadata::Metadata;
use crate::id3::specs::{self, Encoding};
use crate::id3::tables::{self, Resolution};

/// Options for producing a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub version: TagVersion,
    pub magic: [u8; 3],
    /// Overrides the version's default text encoding.
    pub encoding: Option<Encoding>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            version: TagVersion::V4,
            magic: ID3_MAGIC,
            encoding: None,
        }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: TagVersion) -> Self {
        self.version = version;
        self
    }

    pub fn magic(mut self, magic: [u8; 3]) -> Self {
        self.magic = magic;
        self
    }

    /// Like [`WriteOptions::magic`], for magic coming in as an unchecked slice.
    pub fn magic_bytes(self, magic: &[u8]) -> Result<Self> {
        let magic: [u8; 3] = magic
            .try_into()
            .map_err(|_| TagError::InvalidMagic(magic.len()))?;
        Ok(self.magic(magic))
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Text encoding frames are written with, before the per-frame ASCII check.
    pub fn text_encoding(&self) -> Encoding {
        let requested = self
            .encoding
            .unwrap_or_else(|| Encoding::default_for_version(self.version));
        if requested.is_valid_for(self.version) {
            requested
        } else {
            debug!("{:?} is not valid in {}, using UTF-16", requested, self.version);
            Encoding::Utf16
        }
    }
}

/// State for writing one tag into a seekable stream.
///
/// [`EncodingSession::start`] writes the header with a placeholder size,
/// frames are appended, and [`EncodingSession::finish`] seeks back once to
/// patch in the final size. The session borrows the stream exclusively until
/// it is finished or dropped.
pub struct EncodingSession<'w, W: Write + Seek> {
    writer: &'w mut W,
    version: TagVersion,
    encoding: Encoding,
    size_pos: u64,
    len: u64,
}

impl<'w, W: Write + Seek> EncodingSession<'w, W> {
    /// Write the tag header and reserve its size field.
    pub fn start(writer: &'w mut W, options: &WriteOptions) -> Result<Self> {
        let version = options.version;

        writer.write_all(&options.magic).map_err(TagError::Write)?;
        writer.write_u8(version.major()).map_err(TagError::Write)?;
        writer.write_u8(0).map_err(TagError::Write)?; // revision
        writer.write_u8(0).map_err(TagError::Write)?; // flags

        let size_pos = writer.stream_position().map_err(TagError::Seek)?;
        writer.write_u32::<BigEndian>(0).map_err(TagError::Write)?;

        debug!("started {} tag, size field at offset {}", version, size_pos);
        Ok(EncodingSession {
            writer,
            version,
            encoding: options.text_encoding(),
            size_pos,
            len: 0,
        })
    }

    pub fn version(&self) -> TagVersion {
        self.version
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Bytes of frame data written so far, frame headers included.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Write one text frame with an explicit id and body text.
    pub fn write_text_frame(&mut self, id: FrameId, text: &str) -> Result<usize> {
        let body = specs::encode_text_body(text, None, self.encoding)?;
        self.write_raw_frame(id, &body)
    }

    /// Write a TXXX frame carrying `key` as description and `value` as text.
    pub fn write_user_text_frame(&mut self, key: &str, value: &str) -> Result<usize> {
        let body = specs::encode_text_body(key, Some(value), self.encoding)?;
        self.write_raw_frame(FrameId::TXXX, &body)
    }

    /// Write one entry whose key is already normalized.
    pub fn write_entry(&mut self, key: &str, value: &str) -> Result<usize> {
        match tables::resolve(key, self.version) {
            Resolution::Known(id) => self.write_text_frame(id, value),
            Resolution::UserText => self.write_user_text_frame(key, value),
        }
    }

    /// Normalize the keys of `metadata` and write a frame per entry, in order.
    /// Stops at the first error; frames written before it stay in the stream.
    pub fn write_metadata(&mut self, metadata: &Metadata) -> Result<()> {
        let normalized = tables::normalize_keys(metadata, self.version);
        for (key, value) in normalized.iter() {
            self.write_entry(key, value)?;
        }
        Ok(())
    }

    fn write_raw_frame(&mut self, id: FrameId, body: &[u8]) -> Result<usize> {
        let written = frames::write_frame(&mut *self.writer, self.version, id, body)?;
        self.len += written as u64;
        Ok(written)
    }

    /// Patch the reserved size field, leaving the stream where it was.
    pub fn finish(self) -> Result<()> {
        if self.len > u64::from(MAX_SYNCSAFE) {
            warn!(
                "tag size {} exceeds the syncsafe limit, size field will be truncated",
                self.len
            );
        }

        let writer = self.writer;
        let end = writer.stream_position().map_err(TagError::Seek)?;
        writer
            .seek(SeekFrom::Start(self.size_pos))
            .map_err(TagError::Seek)?;
        writer
            .write_all(&BitPaddedInt::encode_size(self.len as u32))
            .map_err(TagError::Write)?;
        writer.seek(SeekFrom::Start(end)).map_err(TagError::Seek)?;

        debug!("finished {} tag, {} bytes of frames", self.version, self.len);
        Ok(())
    }
}

/// Write a complete tag for `metadata` at the stream's current position.
pub fn write_simple<W: Write + Seek>(
    writer: &mut W,
    metadata: &Metadata,
    options: &WriteOptions,
) -> Result<()> {
    let mut session = EncodingSession::start(writer, options)?;
    session.write_metadata(metadata)?;
    session.finish()
}

/// Build a complete tag in memory, for sinks that cannot seek.
/// Returns the full tag data including header.
pub fn render_tag(metadata: &Metadata, options: &WriteOptions) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_simple(&mut cursor, metadata, options)?;
    Ok(cursor.into_inner())
}
