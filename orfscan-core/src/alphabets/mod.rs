pub mod nucleotide;
pub mod protein;

use bit_set::BitSet;
use std::borrow::Borrow;

#[derive(Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Alphabet {
    pub symbols: BitSet,
}

impl Alphabet {
    pub fn new<C, T>(symbols: T) -> Self
    where
        C: Borrow<u8>,
        T: IntoIterator<Item = C>,
    {
        let mut s = BitSet::new();
        s.extend(symbols.into_iter().map(|c| *c.borrow() as usize));

        Alphabet { symbols: s }
    }

    #[inline]
    pub fn contains(&self, a: u8) -> bool {
        self.symbols.contains(a as usize)
    }

    /// Position and value of the first byte outside the alphabet.
    pub fn first_invalid(&self, text: &[u8]) -> Option<(usize, u8)> {
        text.iter()
            .enumerate()
            .find(|&(_, &b)| !self.contains(b))
            .map(|(pos, &b)| (pos, b))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_invalid_reports_position() {
        let a = Alphabet::new(b"ACGT");
        assert_eq!(a.first_invalid(b"ACGT"), None);
        assert_eq!(a.first_invalid(b"ACxT"), Some((2, b'x')));
    }

    #[test]
    fn len_counts_distinct_symbols() {
        let a = Alphabet::new(b"AACG");
        assert_eq!(a.len(), 3);
        assert!(!a.is_empty());
        assert!(Alphabet::default().is_empty());
    }
}
