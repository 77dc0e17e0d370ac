//! Nucleotide symbols shared by DNA and RNA input.
//!
//! Everything here is case-insensitive and treats `U` as `T`.

use crate::alphabets::Alphabet;
use std::sync::LazyLock;

static IUPAC: LazyLock<Alphabet> =
    LazyLock::new(|| Alphabet::new(b"ACGTURYSWKMBDHVNacgturyswkmbdhvn"));

/// IUPAC nucleotide alphabet for DNA and RNA, both cases.
pub fn iupac_alphabet() -> &'static Alphabet {
    &IUPAC
}

static COMPLEMENT: LazyLock<[u8; 256]> = LazyLock::new(|| {
    let mut comp = [0; 256];
    comp.iter_mut().enumerate().for_each(|(v, a)| {
        *a = v as u8;
    });
    b"AGCTYRWSKMDVHBN"
        .iter()
        .zip(b"TCGARYWSMKHBDVN".iter())
        .for_each(|(&a, &b)| {
            comp[a as usize] = b;
            comp[a as usize + 32] = b + 32;
        });
    comp[b'U' as usize] = b'A';
    comp[b'u' as usize] = b'a';
    comp
});

/// Complement of a nucleotide symbol, preserving case. Bytes that are not
/// nucleotides map to themselves.
#[inline]
pub fn complement(a: u8) -> u8 {
    COMPLEMENT[a as usize]
}

pub fn reverse_complement(text: &[u8]) -> Vec<u8> {
    text.iter().rev().map(|&a| complement(a)).collect()
}

/// Rank of a concrete base in NCBI table order (T/U=0, C=1, A=2, G=3), or
/// `None` for anything else.
#[inline]
pub fn base_rank(a: u8) -> Option<u8> {
    match a {
        b'T' | b't' | b'U' | b'u' => Some(0),
        b'C' | b'c' => Some(1),
        b'A' | b'a' => Some(2),
        b'G' | b'g' => Some(3),
        _ => None,
    }
}

/// Concrete bases (as ranks) a symbol may stand for. Empty for non-nucleotides.
pub fn expand(a: u8) -> &'static [u8] {
    const T: u8 = 0;
    const C: u8 = 1;
    const A: u8 = 2;
    const G: u8 = 3;
    match a.to_ascii_uppercase() {
        b'T' | b'U' => &[T],
        b'C' => &[C],
        b'A' => &[A],
        b'G' => &[G],
        b'R' => &[A, G],
        b'Y' => &[C, T],
        b'S' => &[C, G],
        b'W' => &[A, T],
        b'K' => &[G, T],
        b'M' => &[A, C],
        b'B' => &[C, G, T],
        b'D' => &[A, G, T],
        b'H' => &[A, C, T],
        b'V' => &[A, C, G],
        b'N' => &[A, C, G, T],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_iupac_words() {
        assert!(iupac_alphabet().first_invalid(b"GATTACA").is_none());
        assert!(iupac_alphabet().first_invalid(b"gauuaca").is_none());
        assert!(iupac_alphabet().first_invalid(b"NNRYK").is_none());
    }

    #[test]
    fn rejects_non_nucleotide_symbols() {
        assert!(iupac_alphabet().first_invalid(b"#").is_some());
        assert!(iupac_alphabet().first_invalid(b"42").is_some());
    }

    #[test]
    fn complement_keeps_case() {
        assert_eq!(complement(b'A'), b'T');
        assert_eq!(complement(b'g'), b'c');
        assert_eq!(complement(b'U'), b'A');
        assert_eq!(complement(b'R'), b'Y');
        assert_eq!(complement(b'N'), b'N');
    }

    #[test]
    fn reverse_complement_basic() {
        assert_eq!(reverse_complement(b"ATGAAATAG"), b"CTATTTCAT");
    }

    #[test]
    fn expand_degenerate() {
        assert_eq!(expand(b'n').len(), 4);
        assert_eq!(expand(b'R'), &[2, 3]);
        assert!(expand(b'-').is_empty());
    }
}
