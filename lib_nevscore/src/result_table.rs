//! Scoring of whole hit lists and output of the result table.

use std::{
    io::Write,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use log::{debug, info, warn};
use rayon::{ThreadPoolBuilder, prelude::*};

use crate::{
    alignment::AlignmentHit,
    conservation::{ConservationScorer, ScoredHit},
    error::{Error, Result},
    signature::SignatureGroups,
};

#[cfg(test)]
mod tests;

/// An input hit that was rejected before scoring.
#[derive(Debug)]
pub struct SkippedHit {
    /// Index of the hit in the input.
    pub index: usize,
    pub error: Error,
}

/// The rows of a scoring run, in input order.
#[derive(Debug)]
pub struct ResultTable {
    group_count: usize,
    rows: Vec<ScoredHit>,
    skipped: Vec<SkippedHit>,
}

/// Settings of a scoring run.
#[derive(Debug, Clone, Copy)]
pub struct ScoringRun<'run> {
    groups: &'run SignatureGroups,
    scorer: ConservationScorer<'run>,
    threads: Option<usize>,
}

impl<'run> ScoringRun<'run> {
    pub fn new(groups: &'run SignatureGroups, scorer: ConservationScorer<'run>) -> Self {
        Self {
            groups,
            scorer,
            threads: None,
        }
    }

    /// Limits the number of worker threads. By default, rayon picks the number of CPUs.
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Scores every valid hit against all signature groups.
    ///
    /// Hits that failed to parse are recorded as [`SkippedHit`]s and do not produce rows.
    /// `cancelled` is checked before each hit. If it is set, the run stops and
    /// returns [`Error::Cancelled`] without any rows.
    pub fn score(
        &self,
        hits: impl IntoIterator<Item = Result<AlignmentHit>>,
        cancelled: &AtomicBool,
    ) -> Result<ResultTable> {
        let mut valid_hits = Vec::new();
        let mut skipped = Vec::new();
        for (index, hit) in hits.into_iter().enumerate() {
            match hit {
                Ok(hit) => valid_hits.push(hit),
                Err(error) => {
                    warn!("Skipping alignment hit {index}: {error}");
                    skipped.push(SkippedHit { index, error });
                }
            }
        }

        info!(
            "Scoring {} alignment hits against {} signature groups",
            valid_hits.len(),
            self.groups.len()
        );

        let mut pool_builder = ThreadPoolBuilder::new();
        if let Some(threads) = self.threads {
            pool_builder = pool_builder.num_threads(threads);
        }
        let pool = pool_builder.build()?;
        debug!("Using {} worker threads", pool.current_num_threads());

        let completed_hits = AtomicUsize::new(0);
        let rows: Option<Vec<_>> = pool.install(|| {
            valid_hits
                .par_iter()
                .map(|hit| {
                    if cancelled.load(Ordering::Relaxed) {
                        return None;
                    }
                    let row = self.scorer.score_hit(hit, self.groups);
                    completed_hits.fetch_add(1, Ordering::Relaxed);
                    Some(row)
                })
                .collect()
        });

        let Some(rows) = rows else {
            let completed_hits = completed_hits.load(Ordering::Relaxed);
            warn!("Scoring cancelled after {completed_hits} hits");
            return Err(Error::Cancelled { completed_hits });
        };

        info!(
            "Scored {} alignment hits, skipped {}",
            rows.len(),
            skipped.len()
        );

        Ok(ResultTable {
            group_count: self.groups.len(),
            rows,
            skipped,
        })
    }
}

impl ResultTable {
    pub fn rows(&self) -> &[ScoredHit] {
        &self.rows
    }

    pub fn skipped(&self) -> &[SkippedHit] {
        &self.skipped
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// The names of the columns, as written by [`write_csv`](Self::write_csv) if requested.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec![
            "identifier".to_string(),
            "subject_sequence".to_string(),
            "confidence_value".to_string(),
        ];
        names.extend((1..=self.group_count).map(|group| format!("group_{group}_residues")));
        names.push(String::new());
        names.extend((1..=self.group_count).map(|group| format!("group_{group}_score")));
        names
    }

    /// Writes one CSV record per row.
    ///
    /// The columns are the identifier, the subject sequence and the confidence value,
    /// followed by the residue pairs of all groups, an empty column and the scores of all groups.
    /// Rows therefore have at least six columns as soon as there is one group.
    pub fn write_csv(&self, writer: impl Write, header: bool) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        if header {
            writer.write_record(self.column_names())?;
        }

        for row in &self.rows {
            let mut record = vec![
                row.identifier.clone(),
                row.subject_sequence.clone(),
                format_float(row.confidence_value),
            ];
            record.extend(row.per_group.iter().map(|group| group.residue_pairs_text()));
            record.push(String::new());
            record.extend(
                row.per_group
                    .iter()
                    .map(|group| format_float(group.normalized_score.raw())),
            );
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Writes the rows without scores as `~`-separated lines.
    ///
    /// Every field, including the last one, is followed by `" ~ "`.
    pub fn write_raw(&self, mut writer: impl Write) -> Result<()> {
        for row in &self.rows {
            write!(writer, "{} ~ ", row.identifier)?;
            write!(writer, "{} ~ ", row.subject_sequence)?;
            write!(writer, "{} ~ ", format_float(row.confidence_value))?;
            for group in &row.per_group {
                write!(writer, "{group} ~ ")?;
            }
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// Formats a float with the shortest representation that reads back to the same value.
///
/// Whole numbers keep their fractional part (`1.0`), and values below `1e-4`
/// or from `1e16` upwards use scientific notation (`1e-10`).
pub fn format_float(value: f64) -> String {
    format!("{value:?}")
}
