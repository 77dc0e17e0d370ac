#[macro_use]
mod par;

pub mod alphabets;
pub mod config;
pub mod emit;
pub mod error;
pub mod frame;
pub mod gencode;
pub mod io;
pub mod scan;
pub mod seq;
pub mod source;
pub mod window;

pub use config::{ScanConfig, StartPolicy, StrandSelection};
pub use emit::{OrfEmitter, OrfHit, OrfRecord};
pub use error::{BioError, BioResult};
pub use frame::{Frame, Strand};
pub use gencode::{GeneticCode, Translation};
pub use scan::OrfScanner;
pub use source::{MemorySource, SequenceSource};
