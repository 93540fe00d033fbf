//! ID3v2.3 / ID3v2.4 tag writing.

pub mod header;
pub mod specs;
pub mod frames;
pub mod metadata;
pub mod tables;
pub mod writer;

pub use frames::FrameId;
pub use header::TagVersion;
pub use metadata::Metadata;
pub use specs::Encoding;
pub use writer::{render_tag, write_simple, EncodingSession, WriteOptions};
