use crate::QueryId;

/// Caller-usage errors raised by the read paths of the tables.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// IDF was requested for a term that was never inserted.
    #[error("unknown term: '{0}'")]
    UnknownTerm(String),
    /// IDF was requested before any document was inserted.
    #[error("empty corpus")]
    EmptyCorpus,
    /// Document frequency of zero makes `N / df` undefined.
    #[error("document frequency is zero")]
    ZeroDocumentFrequency,
    /// Relevance judgments were requested for a query that has none.
    #[error("no relevance judgments for query {0}")]
    UnknownQuery(QueryId),
    /// IDF precision outside the supported number of decimal digits.
    #[error("invalid idf precision: {0} (expected 0..=9)")]
    InvalidPrecision(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
