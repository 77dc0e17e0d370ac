use pyo3::prelude::*;

mod fasta;
mod orf;
mod utils;

#[pymodule]
fn _native(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    orf::register(m)?;
    fasta::register(m)?;
    Ok(())
}
