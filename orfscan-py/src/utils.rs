use pyo3::exceptions::{PyIOError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyString;

use orfscan_core::error::BioError;
use orfscan_core::{OrfScanner, ScanConfig, StartPolicy, StrandSelection};

pub fn extract_dna_bytes(obj: &Bound<'_, PyAny>) -> PyResult<Vec<u8>> {
    if let Ok(s) = obj.downcast::<PyString>() {
        return Ok(s.to_str()?.as_bytes().to_vec());
    }

    obj.extract::<Vec<u8>>()
        .map_err(|_| PyTypeError::new_err("expected str or bytes-like object"))
}

pub fn parse_start(start: &str) -> PyResult<StartPolicy> {
    match start.to_ascii_lowercase().as_str() {
        "none" | "any" => Ok(StartPolicy::None),
        "aug" | "atg" => Ok(StartPolicy::RequireAug),
        "initiator" | "init" => Ok(StartPolicy::RequireAnyInitiator),
        _ => Err(PyValueError::new_err(
            "start must be one of 'none', 'aug', 'initiator'",
        )),
    }
}

pub fn parse_strand(strand: &str) -> PyResult<StrandSelection> {
    match strand.to_ascii_lowercase().as_str() {
        "both" => Ok(StrandSelection::Both),
        "watson" | "forward" | "+" => Ok(StrandSelection::WatsonOnly),
        "crick" | "reverse" | "-" => Ok(StrandSelection::CrickOnly),
        _ => Err(PyValueError::new_err(
            "strand must be one of 'both', 'watson', 'crick'",
        )),
    }
}

pub fn to_py_err(err: BioError) -> PyErr {
    match err {
        BioError::Io(io) => PyIOError::new_err(io.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

pub fn build_scanner(code: u8, min_len: usize, start: &str, strand: &str) -> PyResult<OrfScanner> {
    let config = ScanConfig {
        genetic_code: code,
        min_len,
        start_policy: parse_start(start)?,
        strands: parse_strand(strand)?,
        ..Default::default()
    };
    OrfScanner::new(config).map_err(to_py_err)
}
