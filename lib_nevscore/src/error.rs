use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("An IO error occurred: {0}.")]
    Io(#[from] std::io::Error),

    #[error("A CSV error occurred: {0}.")]
    Csv(#[from] csv::Error),

    #[error("A parsing error of kind '{kind:?}' occurred when the remaining input was '{input}'.")]
    Parser {
        input: String,
        kind: nom::error::ErrorKind,
    },

    #[error("Parsing was unsuccessful due to incomplete input: {0:?}.")]
    ParserIncomplete(nom::Needed),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("The alignment hit is missing the field '{0}'.")]
    MissingHitField(&'static str),

    #[error("The query start '{0}' of the alignment hit is not a positive integer.")]
    InvalidQueryStart(String),

    #[error("The confidence value '{0}' of the alignment hit is not a number.")]
    InvalidConfidenceValue(String),

    #[error("The aligned query and subject strings are empty.")]
    EmptyAlignment,

    #[error("The aligned query or subject contains non-ASCII characters.")]
    NonAsciiAlignment,

    #[error(
        "The aligned query has length {query_length}, but the aligned subject has length {subject_length}."
    )]
    AlignedLengthMismatch {
        query_length: usize,
        subject_length: usize,
    },

    #[error("The scoring run was cancelled after {completed_hits} hits.")]
    Cancelled { completed_hits: usize },

    #[error("The worker thread pool could not be built: {0}.")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
