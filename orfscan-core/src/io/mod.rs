pub mod fai;
pub mod fasta;
pub mod table;

use crate::emit::OrfRecord;
use crate::error::BioResult;

pub use fai::{FaiEntry, FaiIndex, IndexedFasta, IndexedFastaSource};
pub use fasta::{FastaOrfWriter, FastaReader, FastaRecords, FastaStreamSource};
pub use table::TableOrfWriter;

/// Destination for numbered ORFs.
pub trait OrfSink {
    fn write_orf(&mut self, record: &OrfRecord) -> BioResult<()>;

    /// Flush anything buffered. Called once after the last record.
    fn finish(&mut self) -> BioResult<()> {
        Ok(())
    }
}

impl OrfSink for Vec<OrfRecord> {
    fn write_orf(&mut self, record: &OrfRecord) -> BioResult<()> {
        self.push(record.clone());
        Ok(())
    }
}

impl<K: OrfSink + ?Sized> OrfSink for &mut K {
    fn write_orf(&mut self, record: &OrfRecord) -> BioResult<()> {
        (**self).write_orf(record)
    }

    fn finish(&mut self) -> BioResult<()> {
        (**self).finish()
    }
}

impl<K: OrfSink + ?Sized> OrfSink for Box<K> {
    fn write_orf(&mut self, record: &OrfRecord) -> BioResult<()> {
        (**self).write_orf(record)
    }

    fn finish(&mut self) -> BioResult<()> {
        (**self).finish()
    }
}

/// Drop ASCII whitespace (including line terminators) from one input line.
pub(crate) fn push_residues(line: &[u8], out: &mut Vec<u8>) {
    let body = match line.last() {
        Some(b'\n') => &line[..line.len() - 1],
        _ => line,
    };
    if memchr::memchr3(b' ', b'\t', b'\r', body).is_none() {
        out.extend_from_slice(body);
        return;
    }
    out.extend(body.iter().copied().filter(|b| !b.is_ascii_whitespace()));
}
