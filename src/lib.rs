pub mod common;
pub mod id3;

pub use common::error::{Result, TagError};
pub use id3::{render_tag, write_simple, EncodingSession, Encoding, FrameId, Metadata, TagVersion, WriteOptions};

#[cfg(feature = "python")]
mod python_bindings {
use super::*;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

/// Render a complete ID3v2 tag from (key, value) pairs.
#[pyfunction]
#[pyo3(signature = (entries, version=4, magic="ID3"))]
fn render_id3v2<'py>(
    py: Python<'py>,
    entries: Vec<(String, String)>,
    version: u8,
    magic: &str,
) -> PyResult<Bound<'py, PyBytes>> {
    let options = WriteOptions::new()
        .version(TagVersion::try_from(version)?)
        .magic_bytes(magic.as_bytes())?;
    let metadata: Metadata = entries.into_iter().collect();

    let data = render_tag(&metadata, &options)?;
    Ok(PyBytes::new(py, &data))
}

#[pymodule]
fn id3v2_writer(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(render_id3v2, m)?)?;
    m.add("ID3WriteError", m.py().get_type::<common::error::ID3WriteError>())?;
    Ok(())
}
}
