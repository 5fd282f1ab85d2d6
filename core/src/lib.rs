//! In-memory tables for evaluating a retrieval run: an inverted index with
//! truncated IDF weights, per-query term frequencies, and relevance
//! judgments (qrels).
//!
//! Tokenization, ranking, and precision/recall are left to the caller; these
//! tables only count what they are fed.

pub mod config;
pub mod error;
pub mod index;
pub mod persist;
pub mod qrels;
pub mod query;
pub mod shared;

pub use config::IndexConfig;
pub use error::{Error, Result};
pub use index::{truncated_idf, DocId, IdfEntry, InvertedIndex, TermPosting};
pub use qrels::RelevanceTable;
pub use query::{QueryId, QueryTermTable, QueryTerms};
pub use shared::SharedIndex;

use std::fmt;

/// Writes `{a, b, c}`.
pub(crate) fn write_braced<I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    f.write_str("{")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("}")
}
