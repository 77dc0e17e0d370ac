//! Scan configuration.
//!
//! ```rust
//! use orfscan_core::config::{ScanConfig, StartPolicy, StrandSelection};
//!
//! let config = ScanConfig {
//!     genetic_code: 11,
//!     min_len: 50,
//!     start_policy: StartPolicy::RequireAnyInitiator,
//!     strands: StrandSelection::WatsonOnly,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{BioError, BioResult};
use crate::gencode::GeneticCode;
use crate::window::MIN_OVERLAP;

/// Which codons may open an ORF.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StartPolicy {
    /// Any non-stop codon opens an ORF; ORFs run stop to stop.
    #[default]
    None,
    /// Only `ATG`/`AUG` opens an ORF. The initiator is translated as `M`.
    RequireAug,
    /// Any initiator of the selected table opens an ORF. The initiator is
    /// translated as `M`.
    RequireAnyInitiator,
}

/// Strands to scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StrandSelection {
    #[default]
    Both,
    /// Top strand only (frames 1-3).
    WatsonOnly,
    /// Bottom strand only (frames 4-6).
    CrickOnly,
}

impl StrandSelection {
    pub fn includes_forward(self) -> bool {
        matches!(self, StrandSelection::Both | StrandSelection::WatsonOnly)
    }

    pub fn includes_reverse(self) -> bool {
        matches!(self, StrandSelection::Both | StrandSelection::CrickOnly)
    }
}

/// Everything the scanner needs to know about a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    /// NCBI translation table id.
    ///
    /// **Default**: `1` (standard code)
    pub genetic_code: u8,

    /// Minimum ORF length in amino acids; shorter ORFs are dropped.
    ///
    /// **Default**: `20`
    pub min_len: usize,

    /// **Default**: [`StartPolicy::None`]
    pub start_policy: StartPolicy,

    /// **Default**: [`StrandSelection::Both`]
    pub strands: StrandSelection,

    /// Nucleotides held in memory per window.
    ///
    /// Has no effect on results, only on memory use and the number of reads
    /// issued to the source.
    ///
    /// **Default**: 1 Mnt
    pub window_size: usize,

    /// Nucleotides re-read at the start of each window. Must be at least
    /// [`MIN_OVERLAP`] and smaller than `window_size`.
    ///
    /// **Default**: `3`
    pub overlap: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            genetic_code: 1,
            min_len: 20,
            start_policy: StartPolicy::None,
            strands: StrandSelection::Both,
            window_size: 1 << 20,
            overlap: 3,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> BioResult<()> {
        GeneticCode::new(self.genetic_code)?;
        if self.min_len == 0 {
            return Err(BioError::InvalidConfig {
                msg: "minimum ORF length must be at least 1".to_string(),
            });
        }
        if self.overlap < MIN_OVERLAP || self.overlap >= self.window_size {
            return Err(BioError::InvalidWindow {
                window: self.window_size,
                overlap: self.overlap,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScanConfig::default();
        assert_eq!(config.genetic_code, 1);
        assert_eq!(config.min_len, 20);
        assert_eq!(config.start_policy, StartPolicy::None);
        assert_eq!(config.strands, StrandSelection::Both);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_unknown_code() {
        let config = ScanConfig {
            genetic_code: 7,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BioError::InvalidCodeId { id: 7 })
        ));
    }

    #[test]
    fn rejects_bad_windows() {
        for (window_size, overlap) in [(100, 1), (100, 100), (2, 2)] {
            let config = ScanConfig {
                window_size,
                overlap,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(BioError::InvalidWindow { .. })
            ));
        }
    }

    #[test]
    fn rejects_zero_min_len() {
        let config = ScanConfig {
            min_len: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BioError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn strand_selection() {
        assert!(StrandSelection::Both.includes_forward());
        assert!(StrandSelection::Both.includes_reverse());
        assert!(!StrandSelection::WatsonOnly.includes_reverse());
        assert!(!StrandSelection::CrickOnly.includes_forward());
    }
}
