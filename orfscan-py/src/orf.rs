#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyModule;

use crate::utils;
use orfscan_core::emit::OrfRecord;
use orfscan_core::io::{FastaOrfWriter, OrfSink};
use orfscan_core::seq::{NucleotideSeq, SeqRecord};
use orfscan_core::{GeneticCode, Strand};

#[pyclass(frozen)]
pub struct Orf {
    #[pyo3(get)]
    number: usize,
    #[pyo3(get)]
    source: String,
    #[pyo3(get)]
    start: usize,
    #[pyo3(get)]
    end: usize,
    #[pyo3(get)]
    frame: u8,
    #[pyo3(get)]
    desc: Option<String>,
    #[pyo3(get)]
    protein: String,
    inner: OrfRecord,
}

impl From<OrfRecord> for Orf {
    fn from(record: OrfRecord) -> Self {
        Self {
            number: record.number,
            source: record.source.to_string(),
            start: record.start,
            end: record.end,
            frame: record.frame.index(),
            desc: record.desc.as_deref().map(str::to_string),
            protein: record.protein.as_str().to_string(),
            inner: record,
        }
    }
}

#[pymethods]
impl Orf {
    #[getter]
    fn length(&self) -> usize {
        self.inner.length()
    }

    #[getter]
    fn strand(&self) -> &'static str {
        match self.inner.strand() {
            Strand::Forward => "+",
            Strand::Reverse => "-",
        }
    }

    #[pyo3(signature = (line_width=60))]
    fn to_fasta(&self, line_width: usize) -> PyResult<String> {
        let mut writer = FastaOrfWriter::new(Vec::new()).with_line_width(line_width);
        writer.write_orf(&self.inner).map_err(utils::to_py_err)?;
        String::from_utf8(writer.into_inner()).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn __len__(&self) -> usize {
        self.inner.length()
    }

    fn __repr__(&self) -> String {
        format!(
            "Orf(number={}, source='{}', start={}, end={}, frame={}, length={})",
            self.number,
            self.source,
            self.start,
            self.end,
            self.frame,
            self.inner.length()
        )
    }
}

#[pyfunction]
#[pyo3(signature = (seq, name="seq", desc=None, code=1, min_len=20, start="none", strand="both"))]
#[allow(clippy::too_many_arguments)]
fn scan_orfs(
    py: Python<'_>,
    seq: &Bound<'_, PyAny>,
    name: &str,
    desc: Option<&str>,
    code: u8,
    min_len: usize,
    start: &str,
    strand: &str,
) -> PyResult<Vec<Orf>> {
    let bytes = utils::extract_dna_bytes(seq)?;
    let seq = NucleotideSeq::new(bytes).map_err(utils::to_py_err)?;
    let mut record = SeqRecord::new(name, seq);
    if let Some(desc) = desc {
        record = record.with_desc(desc);
    }
    let scanner = utils::build_scanner(code, min_len, start, strand)?;

    let records = py
        .allow_threads(|| scanner.scan_records(std::slice::from_ref(&record)))
        .map_err(utils::to_py_err)?;
    Ok(records.into_iter().map(Orf::from).collect())
}

#[pyfunction]
fn genetic_codes() -> Vec<(u8, &'static str)> {
    GeneticCode::available()
}

/// Translate `seq` from its first base; stops appear as `*`.
#[pyfunction]
#[pyo3(signature = (seq, code=1))]
fn translate(seq: &Bound<'_, PyAny>, code: u8) -> PyResult<String> {
    let bytes = utils::extract_dna_bytes(seq)?;
    let code = GeneticCode::new(code).map_err(utils::to_py_err)?;
    String::from_utf8(code.translate_bytes(&bytes)).map_err(|e| PyValueError::new_err(e.to_string()))
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Orf>()?;
    m.add_function(wrap_pyfunction!(scan_orfs, m)?)?;
    m.add_function(wrap_pyfunction!(genetic_codes, m)?)?;
    m.add_function(wrap_pyfunction!(translate, m)?)?;
    Ok(())
}
