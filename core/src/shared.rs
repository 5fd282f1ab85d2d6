use crate::error::Result;
use crate::{DocId, InvertedIndex};
use parking_lot::RwLock;
use std::sync::Arc;

/// An [`InvertedIndex`] behind one lock, for ingestion from several threads.
///
/// Every mutation takes the write lock, so the create-or-increment step on
/// the nested maps never interleaves.
#[derive(Debug, Clone, Default)]
pub struct SharedIndex {
    inner: Arc<RwLock<InvertedIndex>>,
}

impl SharedIndex {
    pub fn new(index: InvertedIndex) -> Self {
        Self { inner: Arc::new(RwLock::new(index)) }
    }

    pub fn insert_occurrence(&self, term: &str, doc_id: DocId) {
        self.inner.write().insert_occurrence(term, doc_id);
    }

    pub fn idf(&self, term: &str) -> Result<f64> { self.inner.read().idf(term) }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.inner.read().document_frequency(term)
    }

    pub fn corpus_size(&self) -> usize { self.inner.read().corpus_size() }

    /// Take the index back once ingestion is over; clones the index if other
    /// handles are still alive.
    pub fn into_inner(self) -> InvertedIndex {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => lock.into_inner(),
            Err(shared) => shared.read().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrent_writers_lose_no_updates() {
        let shared = SharedIndex::default();
        std::thread::scope(|s| {
            for worker in 0..4u32 {
                let handle = shared.clone();
                s.spawn(move || {
                    for doc in 0..50u32 {
                        handle.insert_occurrence("term", doc);
                        handle.insert_occurrence(&format!("w{worker}"), doc);
                    }
                });
            }
        });
        let index = shared.into_inner();
        assert_eq!(index.corpus_size(), 50);
        assert_eq!(index.document_frequency("term"), 50);
        assert_eq!(index.occurrences("term", 7), 4);
        assert_eq!(index.distinct_term_count(), 5);
    }
}
