use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BioError {
    #[error("invalid character '{ch}' at position {pos}")]
    InvalidChar { ch: char, pos: usize },

    #[error("unknown genetic code id {id} (expected one of 1-6, 9-14, 16, 21-25)")]
    InvalidCodeId { id: u8 },

    #[error("sequence '{name}' cannot be rewound; restrict the scan to the top strand")]
    NonRewindableSource { name: String },

    #[error("window start {start} is beyond the end of '{name}' (length {len})")]
    OutOfRange {
        name: String,
        start: usize,
        len: usize,
    },

    #[error("invalid window: size {window}, overlap {overlap} (overlap must be >= 2 and < size)")]
    InvalidWindow { window: usize, overlap: usize },

    #[error("invalid configuration: {msg}")]
    InvalidConfig { msg: String },

    #[error("fasta format error at line {line}: {msg}")]
    FastaFormat { msg: &'static str, line: usize },

    #[error("fasta index error for '{name}': {msg}")]
    FastaIndex { name: String, msg: &'static str },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("table output error: {source}")]
    Table {
        #[source]
        source: csv::Error,
    },
}

impl From<csv::Error> for BioError {
    fn from(source: csv::Error) -> Self {
        BioError::Table { source }
    }
}

pub type BioResult<T> = Result<T, BioError>;
