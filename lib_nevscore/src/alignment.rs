use log::trace;
use serde::Deserialize;

use crate::error::{Error, Result};

pub mod io;

/// The character used for gaps in aligned sequences.
pub const GAP: u8 = b'-';

/// One pairwise alignment of the query against a database hit.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentHit {
    pub identifier: String,
    /// The aligned subject, including gap characters.
    pub subject_aligned: String,
    /// The aligned query, including gap characters.
    pub query_aligned: String,
    /// One-based query coordinate of the first aligned query residue.
    pub query_start: usize,
    /// The expect value reported by the search.
    pub confidence_value: f64,
}

/// An alignment hit as found in an input document, before validation.
///
/// Input documents may omit fields or contain malformed values.
/// Such hits are rejected one by one by [`validate`](Self::validate)
/// without affecting the other hits of the same document.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
pub struct RawAlignmentHit {
    pub identifier: Option<String>,
    pub subject_aligned: Option<String>,
    pub query_aligned: Option<String>,
    pub query_start: Option<String>,
    pub confidence_value: Option<String>,
}

impl AlignmentHit {
    pub fn new(
        identifier: impl Into<String>,
        subject_aligned: impl Into<String>,
        query_aligned: impl Into<String>,
        query_start: usize,
        confidence_value: f64,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            subject_aligned: subject_aligned.into(),
            query_aligned: query_aligned.into(),
            query_start,
            confidence_value,
        }
    }

    pub fn subject_aligned(&self) -> &[u8] {
        self.subject_aligned.as_bytes()
    }

    pub fn query_aligned(&self) -> &[u8] {
        self.query_aligned.as_bytes()
    }
}

impl RawAlignmentHit {
    pub fn validate(self) -> Result<AlignmentHit> {
        let identifier = self
            .identifier
            .ok_or(Error::MissingHitField("identifier"))?;
        let subject_aligned = self
            .subject_aligned
            .ok_or(Error::MissingHitField("subject_aligned"))?;
        let query_aligned = self
            .query_aligned
            .ok_or(Error::MissingHitField("query_aligned"))?;
        let query_start = self
            .query_start
            .ok_or(Error::MissingHitField("query_start"))?;
        let confidence_value = self
            .confidence_value
            .ok_or(Error::MissingHitField("confidence_value"))?;

        trace!("Validating alignment hit {identifier:?}");

        let query_start = match query_start.trim().parse::<usize>() {
            Ok(query_start) if query_start > 0 => query_start,
            _ => return Err(Error::InvalidQueryStart(query_start)),
        };
        let confidence_value = confidence_value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|confidence_value| !confidence_value.is_nan())
            .ok_or(Error::InvalidConfidenceValue(confidence_value))?;

        let subject_aligned = subject_aligned.trim().to_ascii_uppercase();
        let query_aligned = query_aligned.trim().to_ascii_uppercase();
        if subject_aligned.is_empty() || query_aligned.is_empty() {
            return Err(Error::EmptyAlignment);
        }
        if !subject_aligned.is_ascii() || !query_aligned.is_ascii() {
            return Err(Error::NonAsciiAlignment);
        }
        if subject_aligned.len() != query_aligned.len() {
            return Err(Error::AlignedLengthMismatch {
                query_length: query_aligned.len(),
                subject_length: subject_aligned.len(),
            });
        }

        Ok(AlignmentHit {
            identifier: identifier.trim().to_string(),
            subject_aligned,
            query_aligned,
            query_start,
            confidence_value,
        })
    }
}
