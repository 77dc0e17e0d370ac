//! Per-frame ORF state machines.
//!
//! Each of the six reading frames owns a [`FrameState`] that consumes codons
//! in order, opening an ORF at a qualifying codon and closing it at the next
//! stop. State survives window advances, so an ORF may be longer than any
//! single window.

use crate::alphabets::protein::METHIONINE;
use crate::config::StartPolicy;
use crate::gencode::{is_aug, GeneticCode};
use crate::seq::ProteinSeq;
use crate::window::WindowBuffer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

/// A strand plus a phase (0, 1 or 2) from the 5' end of that strand.
///
/// Frames 1-3 start at top-strand offsets 0, 1, 2. Frames 4-6 start at the
/// last, second-to-last and third-to-last nucleotide and read the bottom
/// strand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frame {
    strand: Strand,
    phase: u8,
}

impl Frame {
    pub const FORWARD: [Frame; 3] = [
        Frame::at(Strand::Forward, 0),
        Frame::at(Strand::Forward, 1),
        Frame::at(Strand::Forward, 2),
    ];

    pub const REVERSE: [Frame; 3] = [
        Frame::at(Strand::Reverse, 0),
        Frame::at(Strand::Reverse, 1),
        Frame::at(Strand::Reverse, 2),
    ];

    const fn at(strand: Strand, phase: u8) -> Self {
        Self { strand, phase }
    }

    /// Frame from its 1-based number.
    pub fn new(index: u8) -> Option<Self> {
        match index {
            1..=3 => Some(Self::at(Strand::Forward, index - 1)),
            4..=6 => Some(Self::at(Strand::Reverse, index - 4)),
            _ => None,
        }
    }

    /// 1-based frame number, 1-6.
    pub fn index(self) -> u8 {
        match self.strand {
            Strand::Forward => self.phase + 1,
            Strand::Reverse => self.phase + 4,
        }
    }

    pub fn strand(self) -> Strand {
        self.strand
    }

    pub fn phase(self) -> usize {
        self.phase as usize
    }
}

/// Read-only parameters every frame consults while stepping.
#[derive(Clone, Copy, Debug)]
pub struct FrameRules<'a> {
    pub code: &'a GeneticCode,
    pub policy: StartPolicy,
    pub min_len: usize,
}

/// An ORF closed by a stop codon and long enough to keep.
///
/// Offsets are 0-based in the frame's own strand: top-strand offsets for
/// frames 1-3, offsets from the last nucleotide for frames 4-6.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClosedOrf {
    pub frame: Frame,
    /// First base of the first codon.
    pub first: usize,
    /// First base of the terminating stop codon.
    pub stop: usize,
    pub protein: ProteinSeq,
}

#[derive(Clone, Debug)]
pub struct FrameState {
    frame: Frame,
    next: usize,
    open_start: Option<usize>,
    accumulated: ProteinSeq,
    closed: Vec<ClosedOrf>,
    codons: usize,
}

impl FrameState {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            next: frame.phase(),
            open_start: None,
            accumulated: ProteinSeq::default(),
            closed: Vec::new(),
            codons: 0,
        }
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn is_open(&self) -> bool {
        self.open_start.is_some()
    }

    /// Residues of the ORF currently open.
    pub fn accumulated(&self) -> &ProteinSeq {
        &self.accumulated
    }

    /// Codons consumed so far.
    pub fn codons_consumed(&self) -> usize {
        self.codons
    }

    /// Feed one codon whose first base sits at strand offset `pos`.
    pub fn step(&mut self, codon: &[u8; 3], pos: usize, rules: &FrameRules<'_>) {
        let translation = rules.code.translate(codon);
        match self.open_start {
            None => {
                if translation.is_stop() {
                    return;
                }
                let residue = match rules.policy {
                    StartPolicy::None => translation.residue(),
                    StartPolicy::RequireAug if is_aug(codon) => METHIONINE,
                    StartPolicy::RequireAnyInitiator if rules.code.is_initiator(codon) => {
                        METHIONINE
                    }
                    _ => return,
                };
                self.open_start = Some(pos);
                self.accumulated.push(residue);
            }
            Some(first) => {
                if !translation.is_stop() {
                    self.accumulated.push(translation.residue());
                    return;
                }
                let protein = std::mem::take(&mut self.accumulated);
                self.open_start = None;
                if protein.len() >= rules.min_len {
                    self.closed.push(ClosedOrf {
                        frame: self.frame,
                        first,
                        stop: pos,
                        protein,
                    });
                }
            }
        }
    }

    /// Consume every whole codon of this frame that ends inside `window`.
    ///
    /// `seq_len` is the full sequence length; only reverse frames use it, to
    /// turn bottom-strand offsets into positions in the window.
    pub fn consume(&mut self, window: &WindowBuffer, seq_len: usize, rules: &FrameRules<'_>) {
        let ws = window.start();
        match self.frame.strand {
            Strand::Forward => {
                debug_assert!(self.next >= ws);
                while self.next + 3 <= window.end() {
                    let codon = window.codon_at(self.next - ws);
                    self.step(&codon, self.next, rules);
                    self.next += 3;
                    self.codons += 1;
                }
            }
            Strand::Reverse => {
                let strand_end = seq_len - ws;
                debug_assert!(self.next + window.end() >= seq_len);
                while self.next + 3 <= strand_end {
                    let top = seq_len - 1 - self.next;
                    let codon = window.rc_codon_at(top - ws);
                    self.step(&codon, self.next, rules);
                    self.next += 3;
                    self.codons += 1;
                }
            }
        }
    }

    /// Take the ORFs closed since the last call.
    pub fn drain_closed(&mut self) -> Vec<ClosedOrf> {
        std::mem::take(&mut self.closed)
    }

    /// End of sequence: an ORF still open has no stop codon and is dropped.
    pub fn finish(&mut self) {
        self.open_start = None;
        self.accumulated = ProteinSeq::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(code: &GeneticCode, policy: StartPolicy, min_len: usize) -> FrameRules<'_> {
        FrameRules {
            code,
            policy,
            min_len,
        }
    }

    fn feed(state: &mut FrameState, seq: &[u8], rules: &FrameRules<'_>) {
        for (i, c) in seq.chunks_exact(3).enumerate() {
            state.step(&[c[0], c[1], c[2]], i * 3, rules);
        }
    }

    #[test]
    fn frame_numbering() {
        for i in 1..=6 {
            assert_eq!(Frame::new(i).unwrap().index(), i);
        }
        assert!(Frame::new(0).is_none());
        assert!(Frame::new(7).is_none());
        assert_eq!(Frame::new(5).unwrap().strand(), Strand::Reverse);
        assert_eq!(Frame::new(5).unwrap().phase(), 1);
        assert!(Frame::FORWARD[2] < Frame::REVERSE[0]);
    }

    #[test]
    fn closes_at_stop_and_excludes_it() {
        let code = GeneticCode::standard();
        let r = rules(&code, StartPolicy::None, 1);
        let mut state = FrameState::new(Frame::FORWARD[0]);
        feed(&mut state, b"ATGAAATAG", &r);
        let closed = state.drain_closed();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].first, 0);
        assert_eq!(closed[0].stop, 6);
        assert_eq!(closed[0].protein.as_bytes(), b"MK");
        assert!(!state.is_open());
    }

    #[test]
    fn stop_while_idle_does_not_open() {
        let code = GeneticCode::standard();
        let r = rules(&code, StartPolicy::None, 1);
        let mut state = FrameState::new(Frame::FORWARD[0]);
        feed(&mut state, b"TAATAGGCC", &r);
        assert!(state.is_open());
        assert_eq!(state.accumulated().as_bytes(), b"A");
        state.step(b"TAA", 9, &r);
        let closed = state.drain_closed();
        assert_eq!(closed.len(), 1);
        assert_eq!((closed[0].first, closed[0].stop), (6, 9));
    }

    #[test]
    fn require_aug_skips_other_codons() {
        let code = GeneticCode::standard();
        let r = rules(&code, StartPolicy::RequireAug, 1);
        let mut state = FrameState::new(Frame::FORWARD[0]);
        feed(&mut state, b"CTGAAAATGCCCTAA", &r);
        let closed = state.drain_closed();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].first, 6);
        assert_eq!(closed[0].protein.as_bytes(), b"MP");
    }

    #[test]
    fn any_initiator_is_translated_as_methionine() {
        let code = GeneticCode::standard();
        let r = rules(&code, StartPolicy::RequireAnyInitiator, 1);
        let mut state = FrameState::new(Frame::FORWARD[0]);
        feed(&mut state, b"GTGCTGAAATGA", &r);
        let closed = state.drain_closed();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].first, 3);
        assert_eq!(closed[0].protein.as_bytes(), b"MK");
    }

    #[test]
    fn initiator_keeps_natural_residue_without_policy() {
        let code = GeneticCode::standard();
        let r = rules(&code, StartPolicy::None, 1);
        let mut state = FrameState::new(Frame::FORWARD[0]);
        feed(&mut state, b"CTGAAATGA", &r);
        assert_eq!(state.drain_closed()[0].protein.as_bytes(), b"LK");
    }

    #[test]
    fn short_orfs_are_discarded() {
        let code = GeneticCode::standard();
        let r = rules(&code, StartPolicy::None, 3);
        let mut state = FrameState::new(Frame::FORWARD[0]);
        feed(&mut state, b"ATGAAATAGATGAAACCCTAG", &r);
        let closed = state.drain_closed();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].protein.as_bytes(), b"MKP");
    }

    #[test]
    fn ambiguous_codons_extend_with_unknown_residue() {
        let code = GeneticCode::standard();
        let r = rules(&code, StartPolicy::None, 1);
        let mut state = FrameState::new(Frame::FORWARD[0]);
        feed(&mut state, b"ATGNNNGCNTAA", &r);
        assert_eq!(state.drain_closed()[0].protein.as_bytes(), b"MXA");
    }

    #[test]
    fn finish_drops_open_orf() {
        let code = GeneticCode::standard();
        let r = rules(&code, StartPolicy::None, 1);
        let mut state = FrameState::new(Frame::FORWARD[0]);
        feed(&mut state, b"ATGAAA", &r);
        assert!(state.is_open());
        state.finish();
        assert!(!state.is_open());
        assert!(state.accumulated().is_empty());
        assert!(state.drain_closed().is_empty());
    }
}
