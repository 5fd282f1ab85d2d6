use crate::write_braced;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type QueryId = u32;

/// Term counts for one query, as exported by [`QueryTermTable::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTerms {
    pub query_id: QueryId,
    /// `(term, occurrences)` sorted by term.
    pub terms: Vec<(String, u32)>,
}

/// Query id → (term → occurrences). A plain frequency table; no IDF here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTermTable {
    queries: HashMap<QueryId, HashMap<String, u32>>,
    total_queries: usize,
}

impl QueryTermTable {
    pub fn new() -> Self { Self::default() }

    pub fn insert_occurrence(&mut self, term: &str, query_id: QueryId) {
        self.add_occurrences(term, query_id, 1);
    }

    fn add_occurrences(&mut self, term: &str, query_id: QueryId, count: u32) {
        if !self.queries.contains_key(&query_id) {
            tracing::trace!(query_id, "new query");
            self.total_queries += 1;
        }
        let terms = self.queries.entry(query_id).or_default();
        match terms.get_mut(term) {
            Some(n) => *n += count,
            None => {
                terms.insert(term.to_owned(), count);
            }
        }
    }

    /// 0 when either the query or the term is absent.
    pub fn term_frequency(&self, query_id: QueryId, term: &str) -> u32 {
        self.queries
            .get(&query_id)
            .and_then(|terms| terms.get(term))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_queries(&self) -> usize { self.total_queries }

    pub fn query(&self, query_id: QueryId) -> Option<&HashMap<String, u32>> {
        self.queries.get(&query_id)
    }

    /// Whether `total_queries` and the stored counts agree with the map.
    pub fn is_consistent(&self) -> bool {
        self.total_queries == self.queries.len()
            && self
                .queries
                .values()
                .all(|terms| !terms.is_empty() && terms.values().all(|&n| n > 0))
    }

    pub fn query_ids(&self) -> Vec<QueryId> {
        let mut ids: Vec<QueryId> = self.queries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Queries ordered by id, terms ordered lexically.
    pub fn snapshot(&self) -> Vec<QueryTerms> {
        self.query_ids()
            .into_iter()
            .map(|query_id| {
                let mut terms: Vec<(String, u32)> = self.queries[&query_id]
                    .iter()
                    .map(|(t, &n)| (t.clone(), n))
                    .collect();
                terms.sort_by(|a, b| a.0.cmp(&b.0));
                QueryTerms { query_id, terms }
            })
            .collect()
    }

    pub fn merge(&mut self, other: QueryTermTable) {
        tracing::debug!(queries = other.total_queries, "merging query table");
        for (query_id, terms) in other.queries {
            for (term, count) in terms {
                self.add_occurrences(&term, query_id, count);
            }
        }
    }
}

impl fmt::Display for QueryTermTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for QueryTerms { query_id, terms } in self.snapshot() {
            write!(f, "{query_id} -- ")?;
            write_braced(f, terms.iter().map(|(t, n)| format!("'{t}': {n}")))?;
            writeln!(f)?;
        }
        Ok(())
    }
}
