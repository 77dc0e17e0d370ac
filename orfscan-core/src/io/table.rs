use crate::emit::OrfRecord;
use crate::error::{BioError, BioResult};
use crate::frame::Strand;
use crate::io::OrfSink;
use csv::{Writer, WriterBuilder};
use std::io::Write;

const HEADER: [&str; 8] = [
    "orf", "source", "start", "end", "strand", "frame", "length", "protein",
];

/// Writes ORFs as a tab-separated table with one header row.
pub struct TableOrfWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> TableOrfWriter<W> {
    pub fn new(writer: W) -> BioResult<Self> {
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(writer);
        writer.write_record(HEADER)?;
        Ok(Self { writer })
    }

    pub fn into_inner(self) -> BioResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| BioError::Io(e.into_error()))
    }
}

impl<W: Write> OrfSink for TableOrfWriter<W> {
    fn write_orf(&mut self, record: &OrfRecord) -> BioResult<()> {
        let strand = match record.strand() {
            Strand::Forward => "+",
            Strand::Reverse => "-",
        };
        let name = record.name();
        let start = record.start.to_string();
        let end = record.end.to_string();
        let frame = record.frame.index().to_string();
        let length = record.length().to_string();
        let row: [&str; 8] = [
            &name,
            &record.source,
            &start,
            &end,
            strand,
            &frame,
            &length,
            record.protein.as_str(),
        ];
        self.writer.write_record(row)?;
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

    #[test]
    fn writes_tab_separated_rows() {
        let mut w = TableOrfWriter::new(Vec::new()).unwrap();
        w.write_orf(&OrfRecord {
            number: 3,
            source: "chr2".into(),
            start: 30,
            end: 4,
            frame: Frame::new(6).unwrap(),
            desc: Some("ignored".into()),
            protein: ProteinSeq::from_bytes_unchecked(b"MKPL".to_vec()),
        })
        .unwrap();
        w.finish().unwrap();
        let text = String::from_utf8(w.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "orf\tsource\tstart\tend\tstrand\tframe\tlength\tprotein\n\
             orf3\tchr2\t30\t4\t-\t6\t4\tMKPL\n"
        );
    }

    #[test]
    fn empty_run_still_has_header() {
        let mut w = TableOrfWriter::new(Vec::new()).unwrap();
        w.finish().unwrap();
        let text = String::from_utf8(w.into_inner().unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
