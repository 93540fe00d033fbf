use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagError {
    #[error("could not reserve frame buffer: {0}")]
    ResourceExhausted(#[from] TryReserveError),

    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("seek failed: {0}")]
    Seek(#[source] std::io::Error),

    #[error("ID3 unsupported version: ID3v2.{0}")]
    UnsupportedVersion(u8),

    #[error("magic must be 3 bytes, got {0}")]
    InvalidMagic(usize),
}

#[cfg(feature = "python")]
mod python {
    use pyo3::create_exception;
    use pyo3::exceptions::PyException;

    use super::TagError;

    create_exception!(id3v2_writer, ID3WriteError, PyException);

    impl From<TagError> for pyo3::PyErr {
        fn from(err: TagError) -> pyo3::PyErr {
            match err {
                TagError::ResourceExhausted(e) => {
                    pyo3::exceptions::PyMemoryError::new_err(e.to_string())
                }
                TagError::Write(e) | TagError::Seek(e) => {
                    pyo3::exceptions::PyIOError::new_err(e.to_string())
                }
                TagError::UnsupportedVersion(_) | TagError::InvalidMagic(_) => {
                    pyo3::exceptions::PyValueError::new_err(err.to_string())
                }
            }
        }
    }
}

#[cfg(feature = "python")]
pub use python::ID3WriteError;

pub type Result<T> = std::result::Result<T, TagError>;
