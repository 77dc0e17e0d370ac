use crate::emit::OrfRecord;
use crate::error::{BioError, BioResult};
use crate::io::{push_residues, OrfSink};
use crate::seq::{NucleotideSeq, SeqRecord};
use crate::source::SequenceSource;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Write};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FastaHeader {
    pub id: Box<str>,
    pub desc: Option<Box<str>>,
    pub line: usize,
}

/// Streaming FASTA reader.
///
/// Sequence data is handed out in caller-sized pieces, so a record never has
/// to fit in memory.
pub struct FastaReader<R> {
    reader: R,
    line_no: usize,
    pending_header: Option<BioResult<FastaHeader>>,
    line: Vec<u8>,
    carry: Vec<u8>,
    carry_pos: usize,
    in_record: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            pending_header: None,
            line: Vec::new(),
            carry: Vec::new(),
            carry_pos: 0,
            in_record: false,
        }
    }

    /// Advance to the next record header, skipping any unread sequence of the
    /// current record.
    pub fn next_header(&mut self) -> Option<BioResult<FastaHeader>> {
        if self.in_record {
            if let Err(err) = self.skip_seq() {
                return Some(Err(err));
            }
        }
        if let Some(header) = self.pending_header.take() {
            self.in_record = true;
            return Some(header);
        }

        loop {
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    if self.line.first() == Some(&b'>') {
                        // A malformed header still opens a record so that its
                        // sequence lines are skipped with it.
                        self.in_record = true;
                        return Some(parse_header(&self.line, self.line_no));
                    }
                    if self.line.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    return Some(Err(BioError::FastaFormat {
                        msg: "expected header line starting with '>'",
                        line: self.line_no,
                    }));
                }
                Err(err) => return Some(Err(BioError::Io(err))),
            }
        }
    }

    /// Append up to `max` residues of the current record to `out`. Returns 0
    /// once the record is exhausted.
    pub fn read_seq(&mut self, max: usize, out: &mut Vec<u8>) -> BioResult<usize> {
        let mut n = 0;
        while n < max {
            if self.carry_pos < self.carry.len() {
                let take = (max - n).min(self.carry.len() - self.carry_pos);
                out.extend_from_slice(&self.carry[self.carry_pos..self.carry_pos + take]);
                self.carry_pos += take;
                n += take;
                continue;
            }
            if !self.in_record || !self.fill_carry()? {
                break;
            }
        }
        Ok(n)
    }

    /// Hand out the current record as a forward-only [`SequenceSource`].
    pub fn next_source(&mut self) -> Option<BioResult<FastaStreamSource<'_, R>>> {
        let header = match self.next_header()? {
            Ok(header) => header,
            Err(err) => return Some(Err(err)),
        };
        Some(Ok(FastaStreamSource {
            reader: self,
            header,
            pos: 0,
        }))
    }

    /// Read the next sequence line into the carry buffer. Returns `false` at
    /// the end of the record.
    fn fill_carry(&mut self) -> BioResult<bool> {
        self.carry.clear();
        self.carry_pos = 0;
        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                self.in_record = false;
                return Ok(false);
            }
            self.line_no += 1;
            if self.line.first() == Some(&b'>') {
                self.pending_header = Some(parse_header(&self.line, self.line_no));
                self.in_record = false;
                return Ok(false);
            }
            push_residues(&self.line, &mut self.carry);
            if !self.carry.is_empty() {
                return Ok(true);
            }
        }
    }

    fn skip_seq(&mut self) -> BioResult<()> {
        while self.fill_carry()? {}
        self.carry.clear();
        self.carry_pos = 0;
        Ok(())
    }
}

/// One FASTA record read straight off a forward-only stream.
pub struct FastaStreamSource<'r, R> {
    reader: &'r mut FastaReader<R>,
    header: FastaHeader,
    pos: usize,
}

impl<R> FastaStreamSource<'_, R> {
    pub fn header(&self) -> &FastaHeader {
        &self.header
    }
}

impl<R: BufRead> SequenceSource for FastaStreamSource<'_, R> {
    fn name(&self) -> &str {
        &self.header.id
    }

    fn desc(&self) -> Option<&str> {
        self.header.desc.as_deref()
    }

    fn total_len(&self) -> Option<usize> {
        None
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn read_next(&mut self, max: usize, buf: &mut Vec<u8>) -> BioResult<usize> {
        let n = self.reader.read_seq(max, buf)?;
        self.pos += n;
        Ok(n)
    }
}

/// Whole records, validated as nucleotide sequences.
pub struct FastaRecords<R> {
    reader: FastaReader<R>,
    seq_buf: Vec<u8>,
}

impl<R: BufRead> FastaRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: FastaReader::new(reader),
            seq_buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for FastaRecords<R> {
    type Item = BioResult<SeqRecord<NucleotideSeq>>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = match self.reader.next_header()? {
            Ok(header) => header,
            Err(err) => return Some(Err(err)),
        };

        self.seq_buf.clear();
        if let Err(err) = self.reader.read_seq(usize::MAX, &mut self.seq_buf) {
            return Some(Err(err));
        }

        let capacity = self.seq_buf.capacity();
        let bytes = std::mem::replace(&mut self.seq_buf, Vec::with_capacity(capacity));
        let seq = match NucleotideSeq::new(bytes) {
            Ok(seq) => seq,
            Err(err) => return Some(Err(err)),
        };

        Some(Ok(SeqRecord {
            id: header.id,
            desc: header.desc,
            seq,
        }))
    }
}

pub fn read_fasta_records_from_path(
    path: impl AsRef<Path>,
) -> BioResult<Vec<SeqRecord<NucleotideSeq>>> {
    let file = File::open(path)?;
    FastaRecords::new(BufReader::new(file)).collect()
}

pub fn read_fasta_records_from_bytes(data: &[u8]) -> BioResult<Vec<SeqRecord<NucleotideSeq>>> {
    FastaRecords::new(Cursor::new(data)).collect()
}

pub(crate) fn parse_header(
    header_line: &[u8],
    line_no: usize,
) -> BioResult<FastaHeader> {
    let header_line = String::from_utf8_lossy(header_line);
    let header = header_line.strip_prefix('>').ok_or(BioError::FastaFormat {
        msg: "expected header line starting with '>'",
        line: line_no,
    })?;

    let header = header.trim_end_matches(&['\n', '\r'][..]).trim_start();
    if header.is_empty() {
        return Err(BioError::FastaFormat {
            msg: "empty header",
            line: line_no,
        });
    }

    let (id, desc) = match header.find(|c: char| c.is_whitespace()) {
        Some(idx) => {
            let id = &header[..idx];
            let desc = header[idx..].trim();
            let desc = if desc.is_empty() { None } else { Some(desc) };
            (id, desc)
        }
        None => (header, None),
    };

    Ok(FastaHeader {
        id: id.into(),
        desc: desc.map(|s| s.into()),
        line: line_no,
    })
}

/// Writes ORFs as FASTA:
///
/// ```text
/// >orf1 source=chr1 coords=1..6 length=2 frame=1 description
/// MK
/// ```
pub struct FastaOrfWriter<W: Write> {
    writer: W,
    line_width: usize,
}

impl<W: Write> FastaOrfWriter<W> {
    pub const DEFAULT_LINE_WIDTH: usize = 60;

    pub fn new(writer: W) -> Self {
        Self {
            writer,
            line_width: Self::DEFAULT_LINE_WIDTH,
        }
    }

    /// Residues per protein line; `0` writes each protein on one line.
    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OrfSink for FastaOrfWriter<W> {
    fn write_orf(&mut self, record: &OrfRecord) -> BioResult<()> {
        write!(
            self.writer,
            ">orf{} source={} coords={}..{} length={} frame={}",
            record.number,
            record.source,
            record.start,
            record.end,
            record.length(),
            record.frame.index()
        )?;
        if let Some(desc) = &record.desc {
            write!(self.writer, " {desc}")?;
        }
        self.writer.write_all(b"\n")?;

        let protein = record.protein.as_bytes();
        if self.line_width == 0 {
            self.writer.write_all(protein)?;
            self.writer.write_all(b"\n")?;
        } else {
            for chunk in protein.chunks(self.line_width) {
                self.writer.write_all(chunk)?;
                self.writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> BioResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::seq::ProteinSeq;

    fn reader(data: &'static [u8]) -> FastaReader<Cursor<&'static [u8]>> {
        FastaReader::new(Cursor::new(data))
    }

    #[test]
    fn parse_single_record() {
        let records = read_fasta_records_from_bytes(b">seq1\nACGT\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), "seq1");
        assert_eq!(records[0].desc(), None);
        assert_eq!(records[0].seq().as_bytes(), b"ACGT");
    }

    #[test]
    fn header_with_description() {
        let records = read_fasta_records_from_bytes(b">seq1 some desc here\nAC\nGT\n").unwrap();
        assert_eq!(records[0].id(), "seq1");
        assert_eq!(records[0].desc(), Some("some desc here"));
        assert_eq!(records[0].seq().as_bytes(), b"ACGT");
    }

    #[test]
    fn empty_sequence_allowed() {
        let records = read_fasta_records_from_bytes(b">seq1\n>seq2\nA\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].seq().as_bytes(), b"");
        assert_eq!(records[1].seq().as_bytes(), b"A");
    }

    #[test]
    fn invalid_format_before_header() {
        let err = read_fasta_records_from_bytes(b"ACGT\n>seq1\nAC\n").unwrap_err();
        match err {
            BioError::FastaFormat { line: 1, .. } => {}
            other => panic!("expected fasta format error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_sequence_char() {
        let err = read_fasta_records_from_bytes(b">seq1\nAC#\n").unwrap_err();
        match err {
            BioError::InvalidChar { ch: '#', pos: 2 } => {}
            other => panic!("expected invalid char error, got {other:?}"),
        }
    }

    #[test]
    fn reads_records_from_path() {
        use std::io::Write as _;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b">chr1 x\nACGU\nNN\n").unwrap();
        file.flush().unwrap();
        let records = read_fasta_records_from_path(file.path()).unwrap();
        assert_eq!(records[0].seq().as_bytes(), b"ACGUNN");
    }

    #[test]
    fn reads_sequence_in_pieces() {
        let mut r = reader(b">a\nACGTA\r\nCG\n\nTT\n>b desc\nGGG");
        let header = r.next_header().unwrap().unwrap();
        assert_eq!(&*header.id, "a");
        let mut out = Vec::new();
        assert_eq!(r.read_seq(3, &mut out).unwrap(), 3);
        assert_eq!(r.read_seq(3, &mut out).unwrap(), 3);
        assert_eq!(r.read_seq(100, &mut out).unwrap(), 3);
        assert_eq!(r.read_seq(100, &mut out).unwrap(), 0);
        assert_eq!(out, b"ACGTACGTT");

        let header = r.next_header().unwrap().unwrap();
        assert_eq!(&*header.id, "b");
        assert_eq!(header.desc.as_deref(), Some("desc"));
        assert_eq!(header.line, 6);
        out.clear();
        r.read_seq(100, &mut out).unwrap();
        assert_eq!(out, b"GGG");
        assert!(r.next_header().is_none());
    }

    #[test]
    fn unread_sequence_is_skipped() {
        let mut r = reader(b">a\nAAAA\nCCCC\n>b\nGG\n");
        r.next_header().unwrap().unwrap();
        let mut out = Vec::new();
        r.read_seq(2, &mut out).unwrap();
        let header = r.next_header().unwrap().unwrap();
        assert_eq!(&*header.id, "b");
        out.clear();
        r.read_seq(10, &mut out).unwrap();
        assert_eq!(out, b"GG");
    }

    #[test]
    fn bad_header_fails_only_its_own_record() {
        let records: Vec<_> =
            FastaRecords::new(Cursor::new(&b">a\nACGT\n>\nTTTT\n>b\nGG\n"[..])).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_ref().unwrap().seq().as_bytes(), b"ACGT");
        assert!(matches!(
            records[1],
            Err(BioError::FastaFormat { line: 3, .. })
        ));
        assert_eq!(records[2].as_ref().unwrap().id(), "b");
    }

    #[test]
    fn stream_source_is_forward_only() {
        let mut r = reader(b">chr1 test\nACGT\nAC\n");
        let mut src = r.next_source().unwrap().unwrap();
        assert_eq!(src.name(), "chr1");
        assert_eq!(src.desc(), Some("test"));
        assert_eq!(src.total_len(), None);
        assert!(!src.is_rewindable());
        let mut buf = Vec::new();
        assert_eq!(src.read_next(5, &mut buf).unwrap(), 5);
        assert_eq!(src.position(), 5);
        assert!(matches!(
            src.seek(0),
            Err(BioError::NonRewindableSource { .. })
        ));
    }

    fn record(number: usize, desc: Option<&str>, protein: &[u8]) -> OrfRecord {
        OrfRecord {
            number,
            source: "chr1".into(),
            start: 9,
            end: 4,
            frame: Frame::new(4).unwrap(),
            desc: desc.map(Into::into),
            protein: ProteinSeq::from_bytes_unchecked(protein.to_vec()),
        }
    }

    #[test]
    fn writes_header_and_protein() {
        let mut w = FastaOrfWriter::new(Vec::new());
        w.write_orf(&record(1, Some("human chr1"), b"MK")).unwrap();
        w.write_orf(&record(2, None, b"MP")).unwrap();
        w.finish().unwrap();
        let text = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(
            text,
            ">orf1 source=chr1 coords=9..4 length=2 frame=4 human chr1\nMK\n\
             >orf2 source=chr1 coords=9..4 length=2 frame=4\nMP\n"
        );
    }

    #[test]
    fn wraps_protein_lines() {
        let mut w = FastaOrfWriter::new(Vec::new()).with_line_width(4);
        w.write_orf(&record(1, None, b"MKPLAVW")).unwrap();
        let text = String::from_utf8(w.into_inner()).unwrap();
        assert!(text.ends_with("\nMKPL\nAVW\n"));

        let mut w = FastaOrfWriter::new(Vec::new()).with_line_width(0);
        w.write_orf(&record(1, None, b"MKPLAVW")).unwrap();
        let text = String::from_utf8(w.into_inner()).unwrap();
        assert!(text.ends_with("\nMKPLAVW\n"));
    }
}
