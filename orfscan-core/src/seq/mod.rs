pub mod nucleotide;
pub mod protein;
pub mod record;
pub mod traits;

pub use nucleotide::NucleotideSeq;
pub use protein::ProteinSeq;
pub use record::SeqRecord;
