#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyRuntimeWarning;
use pyo3::prelude::*;
use pyo3::types::PyModule;

use crate::orf::Orf;
use crate::utils;
use orfscan_core::emit::{OrfEmitter, OrfRecord};
use orfscan_core::io::IndexedFasta;
use orfscan_core::{BioResult, SequenceSource};

/// Scan every record of a FASTA file on disk, numbering ORFs across records.
///
/// A record that cannot be scanned is skipped with a `RuntimeWarning`; ORFs
/// from the other records are still returned.
#[pyfunction]
#[pyo3(signature = (path, code=1, min_len=20, start="none", strand="both"))]
fn scan_fasta(
    py: Python<'_>,
    path: &str,
    code: u8,
    min_len: usize,
    start: &str,
    strand: &str,
) -> PyResult<Vec<Orf>> {
    let scanner = utils::build_scanner(code, min_len, start, strand)?;
    let (records, skipped) = py
        .allow_threads(|| -> BioResult<(Vec<OrfRecord>, Vec<String>)> {
            let mut fasta = IndexedFasta::open(path)?;
            let mut emitter = OrfEmitter::new();
            let mut out = Vec::new();
            let mut skipped = Vec::new();
            for i in 0..fasta.len() {
                let result = match fasta.source(i) {
                    Some(Ok(mut source)) => scanner
                        .scan_to(&mut source, &mut emitter, &mut out)
                        .map_err(|e| format!("skipping '{}': {}", source.name(), e)),
                    Some(Err(e)) => {
                        Err(format!("skipping record {} of '{}': {}", i + 1, path, e))
                    }
                    None => break,
                };
                if let Err(msg) = result {
                    skipped.push(msg);
                }
            }
            Ok((out, skipped))
        })
        .map_err(utils::to_py_err)?;

    let category = py.get_type_bound::<PyRuntimeWarning>();
    for msg in &skipped {
        PyErr::warn_bound(py, category.as_any(), msg, 1)?;
    }
    Ok(records.into_iter().map(Orf::from).collect())
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(scan_fasta, m)?)?;
    Ok(())
}
