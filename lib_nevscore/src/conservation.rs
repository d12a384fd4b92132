use std::fmt::Display;

use log::debug;
use noisy_float::types::{R64, r64};
use serde::Deserialize;

use crate::{
    alignment::{AlignmentHit, GAP},
    position_mapper::{ResiduePair, map_position},
    signature::{SignatureGroup, SignatureGroups},
    substitution_matrix::{NEV_BLOSUM62, SubstitutionMatrix},
};


/// How a covered signature position with a gap in the subject is scored.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapScoring {
    /// The position contributes nothing to the score.
    #[default]
    Ignore,
    /// The gap is scored with the gap column of the matrix.
    Penalise,
}

/// Scores residue pairs against a substitution matrix.
#[derive(Debug, Clone, Copy)]
pub struct ConservationScorer<'matrix> {
    matrix: &'matrix SubstitutionMatrix,
    gap_scoring: GapScoring,
}

/// The scoring result of one signature group for one hit.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScoredGroup {
    pub residue_pairs: Vec<ResiduePair>,
    /// The score achieved by the subject divided by the best achievable score.
    pub normalized_score: R64,
}

/// One row of the result table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHit {
    pub identifier: String,
    pub subject_sequence: String,
    pub confidence_value: f64,
    /// One entry per signature group, in the order of the groups.
    pub per_group: Vec<ScoredGroup>,
}

impl Default for ConservationScorer<'static> {
    fn default() -> Self {
        Self::new(&NEV_BLOSUM62, GapScoring::default())
    }
}

impl<'matrix> ConservationScorer<'matrix> {
    pub fn new(matrix: &'matrix SubstitutionMatrix, gap_scoring: GapScoring) -> Self {
        Self {
            matrix,
            gap_scoring,
        }
    }

    /// Returns the actual and the maximum possible score of `pair`.
    ///
    /// Pairs that are not covered, or whose residues are not in the matrix, score `(0, 0)`.
    pub fn score_pair(&self, pair: &ResiduePair) -> (i64, i64) {
        let ResiduePair::Covered {
            subject_residue,
            expected_residue,
            ..
        } = *pair
        else {
            return (0, 0);
        };

        if subject_residue == GAP && self.gap_scoring == GapScoring::Ignore {
            return (0, 0);
        }

        match (
            self.matrix.score(subject_residue, expected_residue),
            self.matrix.self_score(expected_residue),
        ) {
            (Some(actual), Some(maximum)) => (actual.into(), maximum.into()),
            _ => (0, 0),
        }
    }

    /// Computes the normalised conservation score of a signature group.
    ///
    /// The score is 1.0 if every covered position carries its expected residue,
    /// and 0.0 if no position contributes to the maximum possible score.
    pub fn score_group<'pair>(&self, pairs: impl IntoIterator<Item = &'pair ResiduePair>) -> R64 {
        let (actual, maximum) = pairs
            .into_iter()
            .map(|pair| self.score_pair(pair))
            .fold((0, 0), |(actual, maximum), (pair_actual, pair_maximum)| {
                (actual + pair_actual, maximum + pair_maximum)
            });

        if maximum == 0 {
            r64(0.0)
        } else {
            r64(actual as f64 / maximum as f64)
        }
    }

    /// Maps and scores all positions of `group` in `alignment`.
    pub fn score_signature_group(
        &self,
        alignment: &AlignmentHit,
        group: &SignatureGroup,
    ) -> ScoredGroup {
        let residue_pairs: Vec<_> = group
            .positions()
            .iter()
            .map(|position| map_position(alignment, position))
            .collect();
        let normalized_score = self.score_group(&residue_pairs);

        ScoredGroup {
            residue_pairs,
            normalized_score,
        }
    }

    /// Builds the result row of `alignment`.
    ///
    /// The row has one entry per signature group, and no entries if there are no groups.
    pub fn score_hit(&self, alignment: &AlignmentHit, groups: &SignatureGroups) -> ScoredHit {
        let per_group: Vec<_> = groups
            .iter()
            .map(|group| self.score_signature_group(alignment, group))
            .collect();
        debug!(
            "Scored {:?}: {:?}",
            alignment.identifier,
            per_group
                .iter()
                .map(|group| group.normalized_score.raw())
                .collect::<Vec<_>>()
        );

        ScoredHit {
            identifier: alignment.identifier.clone(),
            subject_sequence: alignment.subject_aligned.clone(),
            confidence_value: alignment.confidence_value,
            per_group,
        }
    }
}

impl ScoredGroup {
    /// The residue pairs as a list of `'column,residue'` entries, subject side first.
    pub fn residue_pairs_text(&self) -> String {
        self.to_string()
    }
}

impl Display for ScoredGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (index, pair) in self.residue_pairs.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{pair}")?;
        }
        write!(f, "]")
    }
}
