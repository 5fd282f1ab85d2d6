use crate::error::{Error, Result};
use crate::query::QueryId;
use crate::{write_braced, DocId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Query id → set of documents judged relevant (qrels).
///
/// Lookups of a query that was never judged fail with
/// [`Error::UnknownQuery`]; use [`RelevanceTable::get`] for an optional read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceTable {
    qrels: BTreeMap<QueryId, BTreeSet<DocId>>,
}

impl RelevanceTable {
    pub fn new() -> Self { Self::default() }

    /// Idempotent: judging the same pair twice changes nothing.
    pub fn insert_judgment(&mut self, query_id: QueryId, doc_id: DocId) {
        self.qrels.entry(query_id).or_default().insert(doc_id);
    }

    pub fn relevant_documents(&self, query_id: QueryId) -> Result<&BTreeSet<DocId>> {
        self.qrels.get(&query_id).ok_or(Error::UnknownQuery(query_id))
    }

    /// Judgments for every id in `lower..upper`; the first unjudged id fails the call.
    pub fn relevant_documents_in_range(
        &self,
        lower_inclusive: QueryId,
        upper_exclusive: QueryId,
    ) -> Result<BTreeMap<QueryId, BTreeSet<DocId>>> {
        (lower_inclusive..upper_exclusive)
            .map(|id| self.relevant_documents(id).map(|docs| (id, docs.clone())))
            .collect()
    }

    pub fn get(&self, query_id: QueryId) -> Option<&BTreeSet<DocId>> {
        self.qrels.get(&query_id)
    }

    pub fn is_relevant(&self, query_id: QueryId, doc_id: DocId) -> bool {
        self.qrels.get(&query_id).is_some_and(|docs| docs.contains(&doc_id))
    }

    pub fn total_queries(&self) -> usize { self.qrels.len() }

    pub fn total_judgments(&self) -> usize {
        self.qrels.values().map(BTreeSet::len).sum()
    }

    /// A judged query always has at least one relevant document.
    pub fn is_consistent(&self) -> bool {
        self.qrels.values().all(|docs| !docs.is_empty())
    }

    pub fn snapshot(&self) -> BTreeMap<QueryId, BTreeSet<DocId>> {
        self.qrels.clone()
    }

    pub fn merge(&mut self, other: RelevanceTable) {
        tracing::debug!(queries = other.qrels.len(), "merging relevance table");
        for (query_id, docs) in other.qrels {
            self.qrels.entry(query_id).or_default().extend(docs);
        }
    }
}

impl fmt::Display for RelevanceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Relevances dictionary: ")?;
        for (query_id, docs) in &self.qrels {
            write!(f, "{query_id} --> ")?;
            write_braced(f, docs)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unjudged_query_is_an_error() {
        let mut qrels = RelevanceTable::new();
        qrels.insert_judgment(4, 40);
        assert_eq!(qrels.relevant_documents(5), Err(Error::UnknownQuery(5)));
        assert!(qrels.get(5).is_none());
        assert!(qrels.is_relevant(4, 40));
        assert!(!qrels.is_relevant(4, 41));
    }

    #[test]
    fn empty_range_is_empty() {
        let qrels = RelevanceTable::new();
        assert!(qrels.relevant_documents_in_range(3, 3).unwrap().is_empty());
    }

    #[test]
    fn display_matches_debug_dump() {
        let mut qrels = RelevanceTable::new();
        qrels.insert_judgment(2, 9);
        qrels.insert_judgment(1, 5);
        qrels.insert_judgment(1, 3);
        assert_eq!(qrels.to_string(), "Relevances dictionary: \n1 --> {3, 5}\n2 --> {9}\n");
    }
}
