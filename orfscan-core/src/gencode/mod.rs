//! Genetic code tables.
//!
//! A [`GeneticCode`] maps codons to residues and knows which codons may
//! initiate translation. Tables are selected by their NCBI `transl_table` id
//! and never change after construction, so one instance can be shared by any
//! number of readers.

mod tables;

use crate::alphabets::nucleotide::{base_rank, expand};
use crate::alphabets::protein::{STOP, UNKNOWN};
use crate::error::{BioError, BioResult};
use bit_set::BitSet;
use std::sync::LazyLock;
use tables::RAW_TABLES;
use vector_map::VecMap;

/// Index of `ATG` in NCBI table order.
const ATG_INDEX: usize = 35;

/// Result of translating one codon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Translation {
    Amino(u8),
    Stop,
    /// The codon is ambiguous or contains non-nucleotide symbols.
    Unknown,
}

impl Translation {
    #[inline]
    pub fn residue(self) -> u8 {
        match self {
            Translation::Amino(aa) => aa,
            Translation::Stop => STOP,
            Translation::Unknown => UNKNOWN,
        }
    }

    #[inline]
    pub fn is_stop(self) -> bool {
        matches!(self, Translation::Stop)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneticCode {
    id: u8,
    name: &'static str,
    residues: [u8; 64],
    initiators: BitSet,
}

static CODES: LazyLock<VecMap<u8, GeneticCode>> = LazyLock::new(|| {
    let mut codes = VecMap::new();
    for raw in RAW_TABLES.iter() {
        let initiators = raw
            .starts
            .iter()
            .enumerate()
            .filter(|&(_, &flag)| flag == b'M')
            .map(|(idx, _)| idx)
            .collect();
        codes.insert(
            raw.id,
            GeneticCode {
                id: raw.id,
                name: raw.name,
                residues: *raw.residues,
                initiators,
            },
        );
    }
    codes
});

impl GeneticCode {
    /// Look up a table by NCBI id.
    pub fn new(id: u8) -> BioResult<Self> {
        CODES
            .get(&id)
            .cloned()
            .ok_or(BioError::InvalidCodeId { id })
    }

    /// The standard code (NCBI table 1).
    pub fn standard() -> Self {
        Self::new(1).expect("table 1 is always registered")
    }

    /// `(id, name)` of every selectable table, ascending by id.
    pub fn available() -> Vec<(u8, &'static str)> {
        RAW_TABLES.iter().map(|raw| (raw.id, raw.name)).collect()
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Translate one codon.
    ///
    /// Codons containing IUPAC ambiguity symbols are expanded; if every
    /// expansion agrees the common result is returned, otherwise
    /// [`Translation::Unknown`].
    pub fn translate(&self, codon: &[u8; 3]) -> Translation {
        if let Some(idx) = codon_index(codon) {
            return self.lookup(idx);
        }

        let mut resolved = None;
        for &a in expand(codon[0]) {
            for &b in expand(codon[1]) {
                for &c in expand(codon[2]) {
                    let t = self.lookup(rank_index(a, b, c));
                    match resolved {
                        None => resolved = Some(t),
                        Some(prev) if prev != t => return Translation::Unknown,
                        Some(_) => {}
                    }
                }
            }
        }
        resolved.unwrap_or(Translation::Unknown)
    }

    /// Whether `codon` is in this table's initiator set. An ambiguous codon
    /// qualifies only when every expansion does.
    pub fn is_initiator(&self, codon: &[u8; 3]) -> bool {
        if let Some(idx) = codon_index(codon) {
            return self.initiators.contains(idx);
        }

        let mut any = false;
        for &a in expand(codon[0]) {
            for &b in expand(codon[1]) {
                for &c in expand(codon[2]) {
                    if !self.initiators.contains(rank_index(a, b, c)) {
                        return false;
                    }
                    any = true;
                }
            }
        }
        any
    }

    /// Translate `seq` codon by codon from its first base, ignoring a trailing
    /// partial codon. Stops are written as `*`.
    pub fn translate_bytes(&self, seq: &[u8]) -> Vec<u8> {
        seq.chunks_exact(3)
            .map(|c| self.translate(&[c[0], c[1], c[2]]).residue())
            .collect()
    }

    #[inline]
    fn lookup(&self, idx: usize) -> Translation {
        match self.residues[idx] {
            b'*' => Translation::Stop,
            aa => Translation::Amino(aa),
        }
    }
}

impl Default for GeneticCode {
    fn default() -> Self {
        Self::standard()
    }
}

/// `true` for `ATG`/`AUG` in any case.
#[inline]
pub fn is_aug(codon: &[u8; 3]) -> bool {
    codon_index(codon) == Some(ATG_INDEX)
}

#[inline]
fn rank_index(a: u8, b: u8, c: u8) -> usize {
    ((a as usize) << 4) | ((b as usize) << 2) | (c as usize)
}

#[inline]
fn codon_index(codon: &[u8; 3]) -> Option<usize> {
    Some(rank_index(
        base_rank(codon[0])?,
        base_rank(codon[1])?,
        base_rank(codon[2])?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_basics() {
        let gc = GeneticCode::standard();
        assert_eq!(gc.translate(b"ATG"), Translation::Amino(b'M'));
        assert_eq!(gc.translate(b"aaa"), Translation::Amino(b'K'));
        assert_eq!(gc.translate(b"UUU"), Translation::Amino(b'F'));
        assert_eq!(gc.translate(b"TAG"), Translation::Stop);
        assert_eq!(gc.translate(b"TGA"), Translation::Stop);
        assert_eq!(gc.translate(b"taa"), Translation::Stop);
    }

    #[test]
    fn standard_initiators() {
        let gc = GeneticCode::standard();
        assert!(gc.is_initiator(b"ATG"));
        assert!(gc.is_initiator(b"CTG"));
        assert!(gc.is_initiator(b"uug"));
        assert!(!gc.is_initiator(b"GTG"));
        assert!(!gc.is_initiator(b"AAA"));
    }

    #[test]
    fn every_listed_id_resolves() {
        for (id, name) in GeneticCode::available() {
            let gc = GeneticCode::new(id).unwrap();
            assert_eq!(gc.id(), id);
            assert_eq!(gc.name(), name);
            assert!(gc.is_initiator(b"ATG"), "table {id} lacks ATG");
        }
        assert_eq!(GeneticCode::available().len(), 18);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        for id in [0u8, 7, 8, 15, 17, 20, 26, 255] {
            match GeneticCode::new(id) {
                Err(BioError::InvalidCodeId { id: got }) => assert_eq!(got, id),
                other => panic!("expected InvalidCodeId for {id}, got {other:?}"),
            }
        }
    }

    #[test]
    fn alternative_tables_differ_where_expected() {
        let mito = GeneticCode::new(2).unwrap();
        assert_eq!(mito.translate(b"TGA"), Translation::Amino(b'W'));
        assert_eq!(mito.translate(b"AGA"), Translation::Stop);
        assert_eq!(mito.translate(b"ATA"), Translation::Amino(b'M'));

        let ciliate = GeneticCode::new(6).unwrap();
        assert_eq!(ciliate.translate(b"TAA"), Translation::Amino(b'Q'));
        assert_eq!(ciliate.translate(b"TGA"), Translation::Stop);

        let bacterial = GeneticCode::new(11).unwrap();
        assert!(bacterial.is_initiator(b"GTG"));
        assert!(bacterial.is_initiator(b"ATT"));
    }

    #[test]
    fn degenerate_codons() {
        let gc = GeneticCode::standard();
        assert_eq!(gc.translate(b"GCN"), Translation::Amino(b'A'));
        assert_eq!(gc.translate(b"TAR"), Translation::Stop);
        assert_eq!(gc.translate(b"NNN"), Translation::Unknown);
        assert_eq!(gc.translate(b"ATN"), Translation::Unknown);
        assert_eq!(gc.translate(b"A-G"), Translation::Unknown);
        assert_eq!(gc.translate(b"ATN").residue(), b'X');
    }

    #[test]
    fn degenerate_initiators() {
        let gc = GeneticCode::standard();
        // CTG and TTG are both initiators in the standard code.
        assert!(gc.is_initiator(b"YTG"));
        assert!(!gc.is_initiator(b"NTG"));
        assert!(!gc.is_initiator(b"#TG"));
    }

    #[test]
    fn aug_detection() {
        assert!(is_aug(b"ATG"));
        assert!(is_aug(b"aug"));
        assert!(!is_aug(b"CTG"));
        assert!(!is_aug(b"ATN"));
    }

    #[test]
    fn translate_bytes_drops_trailing_partial_codon() {
        let gc = GeneticCode::standard();
        assert_eq!(gc.translate_bytes(b"ATGAAATAGC"), b"MK*");
    }
}
