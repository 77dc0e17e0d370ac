//! Random access into FASTA files through a `samtools faidx` style index.
//!
//! Each record is located by the byte offset of its first residue and its
//! line geometry (residues per line, bytes per line). With that, any
//! nucleotide offset maps to a byte offset, so the bottom strand of a
//! chromosome can be scanned window by window straight from disk. Records
//! whose lines vary in length keep a table of line starts instead.

use crate::error::{BioError, BioResult};
use crate::io::fasta::{parse_header, FastaHeader};
use crate::source::SequenceSource;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaiEntry {
    pub name: Box<str>,
    pub desc: Option<Box<str>>,
    /// Residues in the record.
    pub length: usize,
    /// Byte offset of the first residue.
    pub offset: u64,
    /// Residues on the first line.
    pub line_bases: usize,
    /// Bytes of the first line including the terminator.
    pub line_width: usize,
    /// Start of every sequence line, kept only when the lines vary in length.
    lines: Option<Box<[LineStart]>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LineStart {
    pos: usize,
    offset: u64,
}

impl FaiEntry {
    fn new(header: FastaHeader, offset: u64) -> Self {
        Self {
            name: header.id,
            desc: header.desc,
            length: 0,
            offset,
            line_bases: 0,
            line_width: 0,
            lines: None,
        }
    }

    /// Byte offset of residue `pos` (0-based).
    pub fn byte_offset(&self, pos: usize) -> u64 {
        if let Some(lines) = &self.lines {
            let i = lines.partition_point(|l| l.pos <= pos).saturating_sub(1);
            return match lines.get(i) {
                Some(l) => l.offset + (pos - l.pos) as u64,
                None => self.offset,
            };
        }
        if self.line_bases == 0 {
            return self.offset;
        }
        let line = pos / self.line_bases;
        let col = pos % self.line_bases;
        self.offset + (line * self.line_width + col) as u64
    }

    /// Whether the record's lines vary in length, so offsets come from a
    /// per-line table instead of the line geometry.
    pub fn is_ragged(&self) -> bool {
        self.lines.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Slot {
    Entry(FaiEntry),
    /// A record without a usable header; its sequence lines are skipped.
    Malformed { msg: &'static str, line: usize },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaiIndex {
    slots: Vec<Slot>,
}

/// The record currently being indexed.
struct Pending {
    entry: FaiEntry,
    data_lines: usize,
    /// Set once a line shorter than `line_bases` has been seen.
    short_line: bool,
    lines: Option<Vec<LineStart>>,
}

impl Pending {
    fn new(entry: FaiEntry) -> Self {
        Self {
            entry,
            data_lines: 0,
            short_line: false,
            lines: None,
        }
    }

    fn push_line(&mut self, offset: u64, bases: usize, width: usize, terminated: bool) {
        if bases == 0 {
            self.short_line |= self.data_lines > 0;
            return;
        }
        if self.lines.is_none() {
            let entry = &mut self.entry;
            if self.data_lines == 0 {
                entry.offset = offset;
                entry.line_bases = bases;
                entry.line_width = width;
            } else if self.short_line
                || bases > entry.line_bases
                || (bases == entry.line_bases && width != entry.line_width && terminated)
            {
                self.make_ragged();
            } else if bases < entry.line_bases {
                self.short_line = true;
            }
        }
        if let Some(lines) = self.lines.as_mut() {
            lines.push(LineStart {
                pos: self.entry.length,
                offset,
            });
        }
        self.entry.length += bases;
        self.data_lines += 1;
    }

    /// Switch to a per-line table, rebuilding the regular lines seen so far.
    fn make_ragged(&mut self) {
        let entry = &self.entry;
        let lines = (0..self.data_lines)
            .map(|i| LineStart {
                pos: i * entry.line_bases,
                offset: entry.offset + (i * entry.line_width) as u64,
            })
            .collect();
        self.lines = Some(lines);
    }

    fn finish(self) -> FaiEntry {
        let mut entry = self.entry;
        entry.lines = self.lines.map(Vec::into_boxed_slice);
        entry
    }
}

impl FaiIndex {
    /// Index a FASTA file by reading it once from the start.
    ///
    /// Only I/O errors fail the build. A malformed header, or text before the
    /// first header, is kept as a malformed record that
    /// [`record`](FaiIndex::record) reports; the records around it are
    /// indexed normally.
    pub fn build<R: BufRead>(mut reader: R) -> BioResult<Self> {
        let mut slots = Vec::new();
        let mut pending: Option<Pending> = None;
        let mut skipping = false;
        let mut line = Vec::new();
        let mut offset = 0u64;
        let mut line_no = 0usize;

        loop {
            line.clear();
            let n = reader.read_until(b'\n', &mut line)?;
            if n == 0 {
                break;
            }
            line_no += 1;
            let line_offset = offset;
            offset += n as u64;

            if line.first() == Some(&b'>') {
                if let Some(done) = pending.take() {
                    slots.push(Slot::Entry(done.finish()));
                }
                match parse_header(&line, line_no) {
                    Ok(header) => {
                        pending = Some(Pending::new(FaiEntry::new(header, offset)));
                        skipping = false;
                    }
                    Err(BioError::FastaFormat { msg, line: at }) => {
                        slots.push(Slot::Malformed { msg, line: at });
                        skipping = true;
                    }
                    Err(err) => return Err(err),
                }
                continue;
            }

            let bases = match memchr::memchr2(b'\r', b'\n', &line) {
                Some(idx) => idx,
                None => line.len(),
            };
            match pending.as_mut() {
                Some(current) => {
                    current.push_line(line_offset, bases, n, line.last() == Some(&b'\n'))
                }
                None if bases == 0 || skipping => {}
                None => {
                    slots.push(Slot::Malformed {
                        msg: "expected header line starting with '>'",
                        line: line_no,
                    });
                    skipping = true;
                }
            }
        }

        if let Some(done) = pending {
            slots.push(Slot::Entry(done.finish()));
        }
        Ok(Self { slots })
    }

    /// Well-formed records, in file order.
    pub fn entries(&self) -> impl Iterator<Item = &FaiEntry> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Entry(entry) => Some(entry),
            Slot::Malformed { .. } => None,
        })
    }

    /// Record `i` in file order, or the error that made it unreadable.
    pub fn record(&self, i: usize) -> Option<BioResult<&FaiEntry>> {
        Some(match self.slots.get(i)? {
            Slot::Entry(entry) => Ok(entry),
            Slot::Malformed { msg, line } => Err(BioError::FastaFormat {
                msg: *msg,
                line: *line,
            }),
        })
    }

    pub fn get(&self, name: &str) -> Option<&FaiEntry> {
        self.entries().find(|e| &*e.name == name)
    }

    /// Records in the file, malformed ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A FASTA file plus its index.
pub struct IndexedFasta<R> {
    reader: R,
    index: FaiIndex,
}

impl IndexedFasta<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> BioResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: BufRead + Seek> IndexedFasta<R> {
    pub fn from_reader(mut reader: R) -> BioResult<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let index = FaiIndex::build(&mut reader)?;
        Ok(Self { reader, index })
    }

    pub fn index(&self) -> &FaiIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Rewindable source over record `i`, or the error that made the record
    /// unreadable.
    pub fn source(&mut self, i: usize) -> Option<BioResult<IndexedFastaSource<'_, R>>> {
        let entry = match self.index.record(i)? {
            Ok(entry) => entry,
            Err(err) => return Some(Err(err)),
        };
        Some(Ok(IndexedFastaSource {
            reader: &mut self.reader,
            entry,
            pos: 0,
            raw: Vec::new(),
        }))
    }
}

pub struct IndexedFastaSource<'a, R> {
    reader: &'a mut R,
    entry: &'a FaiEntry,
    pos: usize,
    raw: Vec<u8>,
}

impl<R: Read + Seek> SequenceSource for IndexedFastaSource<'_, R> {
    fn name(&self) -> &str {
        &self.entry.name
    }

    fn desc(&self) -> Option<&str> {
        self.entry.desc.as_deref()
    }

    fn total_len(&self) -> Option<usize> {
        Some(self.entry.length)
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn read_next(&mut self, max: usize, buf: &mut Vec<u8>) -> BioResult<usize> {
        let n = max.min(self.entry.length - self.pos);
        if n == 0 {
            return Ok(0);
        }
        let from = self.entry.byte_offset(self.pos);
        let to = self.entry.byte_offset(self.pos + n - 1) + 1;

        self.raw.clear();
        self.reader.seek(SeekFrom::Start(from))?;
        (&mut *self.reader).take(to - from).read_to_end(&mut self.raw)?;

        let before = buf.len();
        buf.extend(self.raw.iter().copied().filter(|&b| b != b'\n' && b != b'\r'));
        if buf.len() - before != n {
            buf.truncate(before);
            return Err(BioError::FastaIndex {
                name: self.entry.name.to_string(),
                msg: "file does not match its index",
            });
        }
        self.pos += n;
        Ok(n)
    }

    fn is_rewindable(&self) -> bool {
        true
    }

    fn seek(&mut self, offset: usize) -> BioResult<()> {
        if offset > self.entry.length {
            return Err(BioError::OutOfRange {
                name: self.entry.name.to_string(),
                start: offset,
                len: self.entry.length,
            });
        }
        self.pos = offset;
        Ok(())
    }
}
