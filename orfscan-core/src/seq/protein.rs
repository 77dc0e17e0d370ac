use crate::alphabets::protein::STOP;
use crate::seq::traits::SeqBytes;
use crate::error::BioResult;

/// Translated amino-acid sequence. Produced by translation only, so the
/// bytes are always ASCII residue letters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ProteinSeq {
    bytes: Vec<u8>,
}

impl ProteinSeq {
    #[inline]
    pub(crate) fn from_bytes_unchecked(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> &str {
        // Residues are ASCII by construction.
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn contains_stop(&self) -> bool {
        memchr::memchr(STOP, &self.bytes).is_some()
    }

    #[inline]
    pub(crate) fn push(&mut self, residue: u8) {
        self.bytes.push(residue);
    }
}

impl SeqBytes for ProteinSeq {
    fn as_bytes(&self) -> &[u8] {
        ProteinSeq::as_bytes(self)
    }

    fn from_bytes(bytes: Vec<u8>) -> BioResult<Self> {
        Ok(ProteinSeq::from_bytes_unchecked(bytes))
    }
}
