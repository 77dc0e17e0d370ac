use crate::alphabets::nucleotide;
use crate::error::{BioError, BioResult};
use crate::seq::traits::SeqBytes;

/// Validated DNA or RNA sequence. Any IUPAC nucleotide symbol in either case
/// is accepted; `U` and `T` are interchangeable for translation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NucleotideSeq {
    bytes: Vec<u8>,
}

impl NucleotideSeq {
    pub fn new(bytes: Vec<u8>) -> BioResult<Self> {
        if let Some((pos, b)) = nucleotide::iupac_alphabet().first_invalid(&bytes) {
            return Err(BioError::InvalidChar { ch: b as char, pos });
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl SeqBytes for NucleotideSeq {
    fn as_bytes(&self) -> &[u8] {
        NucleotideSeq::as_bytes(self)
    }

    fn from_bytes(bytes: Vec<u8>) -> BioResult<Self> {
        NucleotideSeq::new(bytes)
    }
}
