use serde::Deserialize;

use crate::{conservation::ConservationScorer, substitution_matrix::NEV_BLOSUM62};

pub use crate::conservation::GapScoring;

/// Settings of a scoring run that are read from a configuration file.
///
/// Every field is optional in the file.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub gap_scoring: GapScoring,
    /// Number of worker threads. If unset, one thread per CPU is used.
    pub threads: Option<usize>,
    /// Write a header row before the result rows.
    pub write_header: bool,
}

impl ScoringConfig {
    pub fn scorer(&self) -> ConservationScorer<'static> {
        ConservationScorer::new(&NEV_BLOSUM62, self.gap_scoring)
    }
}
