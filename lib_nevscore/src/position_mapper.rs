//! Translation of query coordinates into columns of a gapped alignment.

use std::fmt::Display;

use log::trace;

use crate::{
    alignment::{AlignmentHit, GAP},
    signature::SignaturePosition,
};


/// The residue found in a hit at a signature position.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ResiduePair {
    /// The signature position lies within the aligned region of the hit.
    Covered {
        /// The aligned subject character, which may be a gap.
        subject_residue: u8,
        /// One-based column in the alignment, minus the gaps of the subject before it.
        subject_column: usize,
        /// One-based column in the alignment, minus the gaps of the query before it.
        query_column: usize,
        expected_residue: u8,
    },
    /// The signature position lies outside the aligned region of the hit.
    NotCovered { expected_residue: u8 },
}

impl ResiduePair {
    pub fn expected_residue(&self) -> u8 {
        match self {
            Self::Covered {
                expected_residue, ..
            }
            | Self::NotCovered { expected_residue } => *expected_residue,
        }
    }

    /// The subject residue, which is a gap for uncovered positions.
    pub fn subject_residue(&self) -> u8 {
        match self {
            Self::Covered {
                subject_residue, ..
            } => *subject_residue,
            Self::NotCovered { .. } => GAP,
        }
    }

    /// The subject-side column, which is 0 for uncovered positions.
    pub fn subject_column(&self) -> usize {
        match self {
            Self::Covered { subject_column, .. } => *subject_column,
            Self::NotCovered { .. } => 0,
        }
    }

    /// The query-side column, which is 0 for uncovered positions.
    pub fn query_column(&self) -> usize {
        match self {
            Self::Covered { query_column, .. } => *query_column,
            Self::NotCovered { .. } => 0,
        }
    }

    pub fn is_covered(&self) -> bool {
        matches!(self, Self::Covered { .. })
    }
}

/// Finds the aligned subject residue at the query coordinate of `position`.
///
/// Positions before the first aligned query residue or after the last aligned column
/// are not covered by the hit and produce [`ResiduePair::NotCovered`].
pub fn map_position(alignment: &AlignmentHit, position: &SignaturePosition) -> ResiduePair {
    let expected_residue = position.expected_residue;
    let not_covered = ResiduePair::NotCovered { expected_residue };

    // Distance of the residue from the first aligned query residue, counting from one.
    let Some(base_offset) = position
        .position
        .checked_sub(alignment.query_start)
        .and_then(|distance| distance.checked_add(1))
    else {
        trace!(
            "Position {} lies outside the alignment starting at {} of {:?}",
            position.position, alignment.query_start, alignment.identifier
        );
        return not_covered;
    };

    let query = alignment.query_aligned();
    let subject = alignment.subject_aligned();
    // The window never shrinks, so it cannot fit if its initial size does not.
    let offset = if base_offset > query.len() {
        base_offset
    } else {
        expand_over_gaps(query, base_offset)
    };

    if offset > query.len() || offset > subject.len() {
        trace!(
            "Position {} lies after the alignment end of {:?}",
            position.position, alignment.identifier
        );
        return not_covered;
    }

    ResiduePair::Covered {
        subject_residue: subject[offset - 1],
        subject_column: offset - count_gaps(&subject[..offset]),
        query_column: offset - count_gaps(&query[..offset]),
        expected_residue,
    }
}

/// Grows a window of `base_offset` characters until it contains `base_offset` non-gap characters.
///
/// Every gap inside the window pushes its end outwards, and the newly covered characters
/// may contain further gaps, so the window is re-scanned until it stops growing.
/// Gaps beyond the end of `aligned` are not counted, so the returned window may exceed it.
/// `base_offset` must not exceed the length of `aligned`, otherwise the window may overflow.
fn expand_over_gaps(aligned: &[u8], base_offset: usize) -> usize {
    let mut offset = base_offset;
    loop {
        let scanned = &aligned[..offset.min(aligned.len())];
        let expanded = base_offset + count_gaps(scanned);
        if expanded == offset {
            return offset;
        }
        offset = expanded;
    }
}

fn count_gaps(aligned: &[u8]) -> usize {
    aligned.iter().filter(|&&character| character == GAP).count()
}

impl Display for ResiduePair {
    /// Shows the subject and expected sides as `'column,residue'` entries.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{},{}', '{},{}'",
            self.subject_column(),
            char::from(self.subject_residue()),
            self.query_column(),
            char::from(self.expected_residue()),
        )
    }
}
