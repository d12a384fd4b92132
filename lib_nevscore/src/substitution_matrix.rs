use std::{
    collections::HashMap,
    io::Write,
    sync::LazyLock,
};

use crate::{alignment::GAP, error::Result};

/// The residues of [`NEV_BLOSUM62`] in the order of its rows.
const RESIDUE_ORDER: &[u8; 20] = b"CSTPAGNDEQHRKMILVFWY";

/// Lower triangle of the substitution scores, row by row in [`RESIDUE_ORDER`].
#[rustfmt::skip]
const LOWER_TRIANGLE: [&[i32]; 20] = [
    /* C */ &[9],
    /* S */ &[-2, 5],
    /* T */ &[-1, 1, 5],
    /* P */ &[-4, -1, -2, 8],
    /* A */ &[-1, 1, 0, -1, 5],
    /* G */ &[-4, -1, -2, -3, 0, 6],
    /* N */ &[-3, 0, 0, -3, -2, -1, 6],
    /* D */ &[-4, -1, -1, -2, -2, -2, 1, 6],
    /* E */ &[-5, 0, -1, -2, -1, -3, -1, 1, 6],
    /* Q */ &[-4, 0, -1, -2, -1, -2, 0, -1, 2, 6],
    /* H */ &[-4, -1, -2, -3, -2, -3, 0, -2, 0, 1, 8],
    /* R */ &[-4, -1, -1, -2, -2, -3, -1, -2, -1, 1, 0, 6],
    /* K */ &[-4, -1, -1, -1, -1, -2, 0, -1, 1, 1, -1, 2, 5],
    /* M */ &[-2, -2, -1, -3, -1, -4, -3, -4, -2, 0, -2, -2, -2, 6],
    /* I */ &[-2, -3, -1, -4, -2, -5, -4, -4, -4, -3, -4, -3, -3, 1, 5],
    /* L */ &[-2, -3, -2, -3, -2, -4, -4, -5, -4, -3, -3, -3, -3, 2, 1, 4],
    /* V */ &[-1, -2, 0, -3, 0, -4, -4, -4, -3, -3, -4, -3, -3, 1, 3, 1, 4],
    /* F */ &[-3, -3, -2, -4, -3, -4, -4, -4, -4, -4, -2, -4, -4, 0, -1, 0, -1, 6],
    /* W */ &[-3, -4, -4, -5, -3, -4, -4, -6, -4, -3, -3, -4, -4, -2, -3, -2, -3, 0, 11],
    /* Y */ &[-3, -2, -2, -4, -2, -4, -3, -4, -3, -2, 2, -3, -3, -2, -2, -2, -2, 3, 2, 7],
];

/// Score of aligning any residue against a gap.
const GAP_SCORE: i32 = -5;

/// The BLOSUM62 variant used for conservation scoring.
///
/// It differs from the published BLOSUM62 in some entries and scores gaps with -5.
pub static NEV_BLOSUM62: LazyLock<SubstitutionMatrix> = LazyLock::new(|| {
    let mut matrix = SubstitutionMatrix::with_residues(RESIDUE_ORDER.iter().copied().chain([GAP]));
    for (row, scores) in LOWER_TRIANGLE.iter().enumerate() {
        debug_assert_eq!(scores.len(), row + 1);
        for (column, &score) in scores.iter().enumerate() {
            matrix.insert(RESIDUE_ORDER[row], RESIDUE_ORDER[column], score);
        }
        matrix.insert(RESIDUE_ORDER[row], GAP, GAP_SCORE);
    }
    matrix
});

/// A symmetric table of substitution scores between residues.
///
/// Scores are stored once per unordered residue pair.
/// Lookups of pairs that are not in the table return `None`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SubstitutionMatrix {
    residues: Vec<u8>,
    scores: HashMap<(u8, u8), i32>,
}

impl SubstitutionMatrix {
    fn with_residues(residues: impl IntoIterator<Item = u8>) -> Self {
        Self {
            residues: residues.into_iter().collect(),
            scores: HashMap::new(),
        }
    }

    fn insert(&mut self, a: u8, b: u8, score: i32) {
        self.scores.insert(unordered_key(a, b), score);
    }

    /// The residues that label the rows and columns, in display order.
    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    /// Returns the substitution score of `a` and `b`, in any order.
    ///
    /// Residues are compared case-insensitively.
    pub fn score(&self, a: u8, b: u8) -> Option<i32> {
        self.scores
            .get(&unordered_key(a.to_ascii_uppercase(), b.to_ascii_uppercase()))
            .copied()
    }

    /// Returns the score of `residue` against itself, the best score in its row.
    pub fn self_score(&self, residue: u8) -> Option<i32> {
        self.score(residue, residue)
    }

    /// Writes the matrix as a square table, with `.` for pairs without a score.
    pub fn write_plain(&self, mut writer: impl Write) -> Result<()> {
        let column_width = self
            .scores
            .values()
            .map(|score| format!("{score}").len())
            .max()
            .unwrap_or(1);

        write!(writer, "  |")?;
        for &residue in &self.residues {
            write!(writer, " {: >column_width$}", char::from(residue))?;
        }
        writeln!(writer)?;

        write!(writer, "--+")?;
        for _ in 0..(self.residues.len() * (column_width + 1)) {
            write!(writer, "-")?;
        }
        writeln!(writer)?;

        for &row in &self.residues {
            write!(writer, "{} |", char::from(row))?;
            for &column in &self.residues {
                match self.score(row, column) {
                    Some(score) => write!(writer, " {score: >column_width$}")?,
                    None => write!(writer, " {: >column_width$}", ".")?,
                }
            }
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn unordered_key(a: u8, b: u8) -> (u8, u8) {
    if a <= b { (a, b) } else { (b, a) }
}
