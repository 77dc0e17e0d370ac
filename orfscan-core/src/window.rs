//! Bounded view of a sequence.
//!
//! A [`WindowBuffer`] holds `[start, end)` of the top strand. Frames read
//! codons out of it in either orientation; complements are computed on read.
//! Consecutive top-strand windows overlap by a few nucleotides so a codon
//! that straddles the boundary is seen whole by the next window.

use crate::alphabets::nucleotide::complement;
use crate::error::{BioError, BioResult};
use crate::source::SequenceSource;

/// Smallest overlap that keeps every codon intact across a window boundary.
pub const MIN_OVERLAP: usize = 2;

#[derive(Clone, Debug, Default)]
pub struct WindowBuffer {
    bytes: Vec<u8>,
    start: usize,
    at_end: bool,
}

impl WindowBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the buffer with `[start, start + len)`, clipped to the end of the
    /// sequence, and return the number of nucleotides held.
    ///
    /// When `start` falls inside the range already held and the source sits
    /// right after it, the held tail is reused and only new nucleotides are
    /// read, so a forward-only source can feed successive windows. Any other
    /// placement seeks the source.
    pub fn load<S>(&mut self, source: &mut S, start: usize, len: usize) -> BioResult<usize>
    where
        S: SequenceSource + ?Sized,
    {
        let total = source.total_len();
        if let Some(total) = total {
            if start > total {
                return Err(BioError::OutOfRange {
                    name: source.name().to_string(),
                    start,
                    len: total,
                });
            }
        }

        let held_end = self.end();
        let reuse = !self.bytes.is_empty()
            && start >= self.start
            && start <= held_end
            && source.position() == held_end;
        if reuse {
            self.bytes.drain(..start - self.start);
        } else {
            self.bytes.clear();
            if source.position() != start {
                source.seek(start)?;
            }
        }
        self.start = start;

        let want = len.saturating_sub(self.bytes.len());
        self.bytes.truncate(len);
        let got = source.read_next(want, &mut self.bytes)?;
        self.at_end = got < want || total.is_some_and(|t| self.end() >= t);
        Ok(self.bytes.len())
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.bytes.len()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the held range reaches the end of the sequence.
    pub fn is_at_end(&self) -> bool {
        self.at_end
    }

    #[inline]
    pub fn symbol_at(&self, offset: usize) -> u8 {
        self.bytes[offset]
    }

    #[inline]
    pub fn complement_at(&self, offset: usize) -> u8 {
        complement(self.bytes[offset])
    }

    /// Top-strand codon whose first base is at `offset`.
    #[inline]
    pub fn codon_at(&self, offset: usize) -> [u8; 3] {
        [
            self.symbol_at(offset),
            self.symbol_at(offset + 1),
            self.symbol_at(offset + 2),
        ]
    }

    /// Bottom-strand codon whose first base pairs with the top-strand base at
    /// `offset`; the codon reads leftwards on the top strand.
    #[inline]
    pub fn rc_codon_at(&self, offset: usize) -> [u8; 3] {
        [
            self.complement_at(offset),
            self.complement_at(offset - 1),
            self.complement_at(offset - 2),
        ]
    }
}
