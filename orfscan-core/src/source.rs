//! Where nucleotides come from.
//!
//! The scanner reads a sequence through [`SequenceSource`] in bounded
//! windows. Forward-only sources (pipes, stdin) can feed the top strand;
//! scanning the bottom strand needs a rewindable source with a known length.

use crate::error::{BioError, BioResult};
use crate::seq::{NucleotideSeq, SeqRecord};

pub trait SequenceSource {
    fn name(&self) -> &str;

    fn desc(&self) -> Option<&str>;

    /// Total number of nucleotides, when known before reading to the end.
    /// Rewindable sources always know it.
    fn total_len(&self) -> Option<usize>;

    /// Offset the next [`read_next`](SequenceSource::read_next) starts at.
    fn position(&self) -> usize;

    /// Append up to `max` nucleotides starting at [`position`] to `buf` and
    /// return how many were appended. Fewer than `max` means the sequence
    /// ended.
    ///
    /// [`position`]: SequenceSource::position
    fn read_next(&mut self, max: usize, buf: &mut Vec<u8>) -> BioResult<usize>;

    fn is_rewindable(&self) -> bool {
        false
    }

    /// Move the read position to `offset`.
    fn seek(&mut self, _offset: usize) -> BioResult<()> {
        Err(BioError::NonRewindableSource {
            name: self.name().to_string(),
        })
    }
}

/// A sequence already held in memory.
#[derive(Clone, Debug)]
pub struct MemorySource<'a> {
    name: &'a str,
    desc: Option<&'a str>,
    bytes: &'a [u8],
    pos: usize,
    rewindable: bool,
}

impl<'a> MemorySource<'a> {
    pub fn new(record: &'a SeqRecord<NucleotideSeq>) -> Self {
        Self::from_parts(record.id(), record.desc(), record.seq().as_bytes())
    }

    /// Wrap raw bytes without validating them; symbols that are not
    /// nucleotides translate to `X`.
    pub fn from_parts(name: &'a str, desc: Option<&'a str>, bytes: &'a [u8]) -> Self {
        Self {
            name,
            desc,
            bytes,
            pos: 0,
            rewindable: true,
        }
    }

    /// Behave like a pipe: no seeking and no length up front.
    pub fn forward_only(mut self) -> Self {
        self.rewindable = false;
        self
    }
}

impl SequenceSource for MemorySource<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn desc(&self) -> Option<&str> {
        self.desc
    }

    fn total_len(&self) -> Option<usize> {
        self.rewindable.then_some(self.bytes.len())
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn read_next(&mut self, max: usize, buf: &mut Vec<u8>) -> BioResult<usize> {
        let end = self.pos.saturating_add(max).min(self.bytes.len());
        let n = end - self.pos;
        buf.extend_from_slice(&self.bytes[self.pos..end]);
        self.pos = end;
        Ok(n)
    }

    fn is_rewindable(&self) -> bool {
        self.rewindable
    }

    fn seek(&mut self, offset: usize) -> BioResult<()> {
        if !self.rewindable {
            return Err(BioError::NonRewindableSource {
                name: self.name.to_string(),
            });
        }
        if offset > self.bytes.len() {
            return Err(BioError::OutOfRange {
                name: self.name.to_string(),
                start: offset,
                len: self.bytes.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_forward_in_chunks() {
        let mut src = MemorySource::from_parts("s", None, b"ACGTACG");
        let mut buf = Vec::new();
        assert_eq!(src.read_next(3, &mut buf).unwrap(), 3);
        assert_eq!(src.read_next(3, &mut buf).unwrap(), 3);
        assert_eq!(src.read_next(3, &mut buf).unwrap(), 1);
        assert_eq!(buf, b"ACGTACG");
        assert_eq!(src.read_next(3, &mut buf).unwrap(), 0);
    }

    #[test]
    fn seeks_when_rewindable() {
        let mut src = MemorySource::from_parts("s", Some("d"), b"ACGTACG");
        src.seek(4).unwrap();
        let mut buf = Vec::new();
        src.read_next(10, &mut buf).unwrap();
        assert_eq!(buf, b"ACG");
        assert!(matches!(src.seek(8), Err(BioError::OutOfRange { .. })));
    }

    #[test]
    fn forward_only_refuses_to_seek() {
        let mut src = MemorySource::from_parts("s", None, b"ACGT").forward_only();
        assert!(!src.is_rewindable());
        assert_eq!(src.total_len(), None);
        assert!(matches!(
            src.seek(0),
            Err(BioError::NonRewindableSource { .. })
        ));
    }

    #[test]
    fn wraps_a_record() {
        let rec = SeqRecord::new("chr1", NucleotideSeq::new(b"ACGT".to_vec()).unwrap())
            .with_desc("test");
        let src = MemorySource::new(&rec);
        assert_eq!(src.name(), "chr1");
        assert_eq!(src.desc(), Some("test"));
        assert_eq!(src.total_len(), Some(4));
    }
}
