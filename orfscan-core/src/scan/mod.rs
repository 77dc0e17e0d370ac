//! Six-frame scan driver.
//!
//! The top strand is scanned left to right in overlapping windows, feeding
//! frames 1-3. The bottom strand is then scanned in reverse-complement
//! coordinates: each window covers `[rs, re)` of the bottom strand, which is
//! `[L - re, L - rs)` of the top strand, and feeds frames 4-6. Frame states
//! carry open ORFs from one window to the next, so results do not depend on
//! the window size.

use crate::config::ScanConfig;
use crate::emit::{sort_hits, OrfEmitter, OrfHit, OrfRecord};
use crate::error::{BioError, BioResult};
use crate::frame::{Frame, FrameRules, FrameState};
use crate::gencode::GeneticCode;
use crate::io::OrfSink;
use crate::seq::{NucleotideSeq, SeqRecord};
use crate::source::{MemorySource, SequenceSource};
use crate::window::WindowBuffer;
use log::{debug, info};

#[derive(Clone, Debug)]
pub struct OrfScanner {
    config: ScanConfig,
    code: GeneticCode,
}

impl OrfScanner {
    pub fn new(config: ScanConfig) -> BioResult<Self> {
        config.validate()?;
        let code = GeneticCode::new(config.genetic_code)?;
        Ok(Self { config, code })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn code(&self) -> &GeneticCode {
        &self.code
    }

    fn rules(&self) -> FrameRules<'_> {
        FrameRules {
            code: &self.code,
            policy: self.config.start_policy,
            min_len: self.config.min_len,
        }
    }

    /// Scan one sequence and return its ORFs in emission order.
    ///
    /// Fails with [`BioError::NonRewindableSource`] before reading anything
    /// when the bottom strand is requested from a source that cannot seek.
    pub fn scan<S>(&self, source: &mut S) -> BioResult<Vec<OrfHit>>
    where
        S: SequenceSource + ?Sized,
    {
        let strands = self.config.strands;
        let reverse_len = if strands.includes_reverse() {
            match source.total_len() {
                Some(len) if source.is_rewindable() => Some(len),
                _ => {
                    return Err(BioError::NonRewindableSource {
                        name: source.name().to_string(),
                    })
                }
            }
        } else {
            None
        };

        let mut hits = Vec::new();
        let mut seq_len = reverse_len.unwrap_or(0);

        if strands.includes_forward() {
            let mut frames = new_frames(&Frame::FORWARD);
            seq_len = self.run_forward(source, &mut frames)?;
            collect_hits(&mut frames, seq_len, &mut hits);
        }
        if let Some(len) = reverse_len {
            let mut frames = new_frames(&Frame::REVERSE);
            self.run_reverse(source, len, &mut frames)?;
            collect_hits(&mut frames, len, &mut hits);
        }

        sort_hits(&mut hits);
        info!(
            "{}: scanned {} nt, {} ORFs of at least {} aa",
            source.name(),
            seq_len,
            hits.len(),
            self.config.min_len
        );
        Ok(hits)
    }

    /// Scan one sequence and hand its ORFs to `sink`. Nothing is written if
    /// the scan fails.
    pub fn scan_to<S, K>(
        &self,
        source: &mut S,
        emitter: &mut OrfEmitter,
        sink: &mut K,
    ) -> BioResult<usize>
    where
        S: SequenceSource + ?Sized,
        K: OrfSink + ?Sized,
    {
        let hits = self.scan(source)?;
        emitter.emit(source.name(), source.desc(), hits, sink)
    }

    /// Scan in-memory records, numbering ORFs from 1 across all of them.
    pub fn scan_records(&self, records: &[SeqRecord<NucleotideSeq>]) -> BioResult<Vec<OrfRecord>> {
        let mut emitter = OrfEmitter::new();
        let mut out = Vec::new();
        for record in records {
            let mut source = MemorySource::new(record);
            self.scan_to(&mut source, &mut emitter, &mut out)?;
        }
        Ok(out)
    }

    /// Feed the top strand to `frames` and return the sequence length.
    pub(crate) fn run_forward<S>(
        &self,
        source: &mut S,
        frames: &mut [FrameState],
    ) -> BioResult<usize>
    where
        S: SequenceSource + ?Sized,
    {
        let window_size = self.config.window_size;
        let overlap = self.config.overlap;
        let rules = self.rules();
        let mut window = WindowBuffer::new();
        let mut start = 0;

        loop {
            window.load(source, start, window_size)?;
            debug!(
                "{}: top strand window {}..{}",
                source.name(),
                window.start(),
                window.end()
            );
            par_for_each_mut!(frames, |state: &mut FrameState| {
                state.consume(&window, 0, &rules)
            });
            if window.is_at_end() {
                return Ok(window.end());
            }
            start = window.end() - overlap;
        }
    }

    /// Feed the bottom strand of a sequence of `len` nucleotides to `frames`.
    pub(crate) fn run_reverse<S>(
        &self,
        source: &mut S,
        len: usize,
        frames: &mut [FrameState],
    ) -> BioResult<()>
    where
        S: SequenceSource + ?Sized,
    {
        let window_size = self.config.window_size;
        let overlap = self.config.overlap;
        let rules = self.rules();
        let mut window = WindowBuffer::new();
        let mut rs = 0;

        loop {
            let re = (rs + window_size).min(len);
            window.load(source, len - re, re - rs)?;
            debug!(
                "{}: bottom strand window {}..{} (top {}..{})",
                source.name(),
                rs,
                re,
                window.start(),
                window.end()
            );
            par_for_each_mut!(frames, |state: &mut FrameState| {
                state.consume(&window, len, &rules)
            });
            if re == len {
                return Ok(());
            }
            rs = re - overlap;
        }
    }
}

fn new_frames(frames: &[Frame; 3]) -> Vec<FrameState> {
    frames.iter().copied().map(FrameState::new).collect()
}

fn collect_hits(frames: &mut [FrameState], seq_len: usize, hits: &mut Vec<OrfHit>) {
    for state in frames {
        state.finish();
        hits.extend(
            state
                .drain_closed()
                .into_iter()
                .map(|orf| OrfHit::from_closed(orf, seq_len)),
        );
    }
}
