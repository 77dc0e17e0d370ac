//! Ordering and numbering of scan results.
//!
//! The scanner returns [`OrfHit`]s for one sequence; [`OrfEmitter`] sorts them
//! by leftmost top-strand coordinate (forward strand first on ties, then frame
//! number), numbers them, and hands [`OrfRecord`]s to an [`OrfSink`].

use crate::error::BioResult;
use crate::frame::{ClosedOrf, Frame, Strand};
use crate::io::OrfSink;
use crate::seq::ProteinSeq;

/// One ORF found in a sequence, in 1-based top-strand coordinates.
///
/// `start` is the first nucleotide of the first codon, `end` the last
/// nucleotide of the last codon before the stop. Bottom-strand hits have
/// `start > end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrfHit {
    pub frame: Frame,
    pub start: usize,
    pub end: usize,
    pub protein: ProteinSeq,
}

impl OrfHit {
    /// Map a closed ORF from strand offsets onto the top strand of a sequence
    /// of `seq_len` nucleotides.
    pub fn from_closed(orf: ClosedOrf, seq_len: usize) -> Self {
        let (start, end) = match orf.frame.strand() {
            Strand::Forward => (orf.first + 1, orf.stop),
            Strand::Reverse => (seq_len - orf.first, seq_len + 1 - orf.stop),
        };
        Self {
            frame: orf.frame,
            start,
            end,
            protein: orf.protein,
        }
    }

    pub fn leftmost(&self) -> usize {
        self.start.min(self.end)
    }

    pub fn length(&self) -> usize {
        self.protein.len()
    }
}

/// Sort hits into emission order.
pub fn sort_hits(hits: &mut [OrfHit]) {
    hits.sort_by_key(|h| (h.leftmost(), h.frame.strand(), h.frame.index()));
}

/// A numbered ORF ready for output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrfRecord {
    pub number: usize,
    pub source: Box<str>,
    pub start: usize,
    pub end: usize,
    pub frame: Frame,
    pub desc: Option<Box<str>>,
    pub protein: ProteinSeq,
}

impl OrfRecord {
    /// Length in amino acids.
    pub fn length(&self) -> usize {
        self.protein.len()
    }

    pub fn strand(&self) -> Strand {
        self.frame.strand()
    }

    /// `orf<N>`
    pub fn name(&self) -> String {
        format!("orf{}", self.number)
    }
}

/// Numbers ORFs densely from 1 across every sequence of a run.
#[derive(Clone, Debug)]
pub struct OrfEmitter {
    next_number: usize,
}

impl Default for OrfEmitter {
    fn default() -> Self {
        Self { next_number: 1 }
    }
}

impl OrfEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number the next record will get.
    pub fn next_number(&self) -> usize {
        self.next_number
    }

    /// Order, number and write the hits of one sequence. Returns how many
    /// records were written.
    pub fn emit<K>(
        &mut self,
        source: &str,
        desc: Option<&str>,
        mut hits: Vec<OrfHit>,
        sink: &mut K,
    ) -> BioResult<usize>
    where
        K: OrfSink + ?Sized,
    {
        sort_hits(&mut hits);
        let source: Box<str> = source.into();
        let desc: Option<Box<str>> = desc.map(Into::into);
        let count = hits.len();
        for hit in hits {
            let record = OrfRecord {
                number: self.next_number,
                source: source.clone(),
                start: hit.start,
                end: hit.end,
                frame: hit.frame,
                desc: desc.clone(),
                protein: hit.protein,
            };
            sink.write_orf(&record)?;
            self.next_number += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(frame: u8, start: usize, end: usize, protein: &[u8]) -> OrfHit {
        OrfHit {
            frame: Frame::new(frame).unwrap(),
            start,
            end,
            protein: ProteinSeq::from_bytes_unchecked(protein.to_vec()),
        }
    }

    #[test]
    fn maps_forward_offsets() {
        let closed = ClosedOrf {
            frame: Frame::FORWARD[0],
            first: 0,
            stop: 6,
            protein: ProteinSeq::from_bytes_unchecked(b"MK".to_vec()),
        };
        let h = OrfHit::from_closed(closed, 9);
        assert_eq!((h.start, h.end), (1, 6));
    }

    #[test]
    fn maps_reverse_offsets() {
        let closed = ClosedOrf {
            frame: Frame::REVERSE[0],
            first: 0,
            stop: 6,
            protein: ProteinSeq::from_bytes_unchecked(b"MK".to_vec()),
        };
        let h = OrfHit::from_closed(closed, 9);
        assert_eq!((h.start, h.end), (9, 4));
        assert_eq!(h.leftmost(), 4);
    }

    #[test]
    fn orders_by_leftmost_then_strand_then_frame() {
        let mut hits = vec![
            hit(4, 30, 10, b"A"),
            hit(2, 11, 40, b"B"),
            hit(1, 10, 30, b"C"),
            hit(6, 9, 1, b"D"),
            hit(5, 40, 10, b"E"),
        ];
        sort_hits(&mut hits);
        let order: Vec<u8> = hits.iter().map(|h| h.protein.as_bytes()[0]).collect();
        assert_eq!(order, b"DCAEB");
    }

    #[test]
    fn numbering_continues_across_sequences() {
        let mut emitter = OrfEmitter::new();
        let mut out: Vec<OrfRecord> = Vec::new();
        let n = emitter
            .emit("a", None, vec![hit(1, 5, 10, b"MK"), hit(1, 1, 3, b"M")], &mut out)
            .unwrap();
        assert_eq!(n, 2);
        emitter
            .emit("b", Some("second"), vec![hit(4, 9, 1, b"MKP")], &mut out)
            .unwrap();
        let numbers: Vec<usize> = out.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(out[0].start, 1);
        assert_eq!(&*out[2].source, "b");
        assert_eq!(out[2].desc.as_deref(), Some("second"));
        assert_eq!(out[2].length(), 3);
        assert_eq!(out[2].name(), "orf3");
        assert_eq!(emitter.next_number(), 4);
    }
}
