/// Residue written for codons that cannot be resolved to one amino acid.
pub const UNKNOWN: u8 = b'X';

/// Symbol used for stop codons in translated text.
pub const STOP: u8 = b'*';

/// Residue an initiator codon is forced to when a start codon is required.
pub const METHIONINE: u8 = b'M';
