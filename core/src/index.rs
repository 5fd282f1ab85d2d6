use crate::config::{IndexConfig, MAX_IDF_PRECISION};
use crate::error::{Error, Result};
use crate::write_braced;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

pub type DocId = u32;

/// Documents containing one term, with per-document occurrence counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPosting {
    doc_counts: HashMap<DocId, u32>,
    document_frequency: u32,
}

impl TermPosting {
    pub fn new() -> Self { Self::default() }

    /// Count one more occurrence of the term in `doc_id`.
    pub fn insert_doc(&mut self, doc_id: DocId) {
        self.add_occurrences(doc_id, 1);
    }

    fn add_occurrences(&mut self, doc_id: DocId, count: u32) {
        let slot = self.doc_counts.entry(doc_id).or_insert(0);
        if *slot == 0 {
            self.document_frequency += 1;
        }
        *slot += count;
    }

    pub fn document_frequency(&self) -> u32 { self.document_frequency }

    pub fn occurrences(&self, doc_id: DocId) -> u32 {
        self.doc_counts.get(&doc_id).copied().unwrap_or(0)
    }

    /// `(doc_id, occurrences)` pairs in no particular order.
    pub fn documents(&self) -> impl Iterator<Item = (DocId, u32)> + '_ {
        self.doc_counts.iter().map(|(&d, &c)| (d, c))
    }

    fn is_consistent(&self) -> bool {
        self.document_frequency as usize == self.doc_counts.len()
            && self.doc_counts.values().all(|&c| c > 0)
    }

    fn sorted_counts(&self) -> BTreeMap<DocId, u32> {
        self.documents().collect()
    }
}

/// `trunc(log10(N / df) * 10^precision) / 10^precision`.
///
/// Truncation is toward zero, so `log10(100 / 3) = 1.5228..` yields `1.522`
/// at three digits, never `1.523`.
pub fn truncated_idf(corpus_size: usize, document_frequency: u32, precision: u32) -> Result<f64> {
    if corpus_size == 0 {
        return Err(Error::EmptyCorpus);
    }
    if document_frequency == 0 {
        return Err(Error::ZeroDocumentFrequency);
    }
    if precision > MAX_IDF_PRECISION {
        return Err(Error::InvalidPrecision(precision));
    }
    let scale = 10f64.powi(precision as i32);
    let ratio = corpus_size as f64 / document_frequency as f64;
    Ok((ratio.log10() * scale).trunc() / scale)
}

/// One row of [`InvertedIndex::snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdfEntry {
    pub term: String,
    pub document_frequency: u32,
    pub idf: f64,
}

/// Term → posting map plus the set of every document seen.
///
/// IDF is never cached: each call reads the corpus size at that moment, so
/// values move as documents keep streaming in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    terms: HashMap<String, TermPosting>,
    corpus_doc_ids: HashSet<DocId>,
    total_distinct_terms: usize,
    config: IndexConfig,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, ..Self::default() })
    }

    pub fn config(&self) -> &IndexConfig { &self.config }

    pub fn insert_occurrence(&mut self, term: &str, doc_id: DocId) {
        match self.terms.get_mut(term) {
            Some(posting) => posting.insert_doc(doc_id),
            None => {
                tracing::trace!(term, "new term");
                let mut posting = TermPosting::new();
                posting.insert_doc(doc_id);
                self.terms.insert(term.to_owned(), posting);
                self.total_distinct_terms += 1;
            }
        }
        self.corpus_doc_ids.insert(doc_id);
    }

    pub fn idf(&self, term: &str) -> Result<f64> {
        let posting = self
            .terms
            .get(term)
            .ok_or_else(|| Error::UnknownTerm(term.to_owned()))?;
        truncated_idf(self.corpus_size(), posting.document_frequency, self.config.idf_precision)
    }

    /// Total lookup: 0 for terms never inserted.
    pub fn document_frequency(&self, term: &str) -> u32 {
        self.terms.get(term).map_or(0, TermPosting::document_frequency)
    }

    pub fn occurrences(&self, term: &str, doc_id: DocId) -> u32 {
        self.terms.get(term).map_or(0, |p| p.occurrences(doc_id))
    }

    pub fn posting(&self, term: &str) -> Option<&TermPosting> { self.terms.get(term) }

    pub fn corpus_size(&self) -> usize { self.corpus_doc_ids.len() }

    pub fn distinct_term_count(&self) -> usize { self.total_distinct_terms }

    pub fn contains_document(&self, doc_id: DocId) -> bool {
        self.corpus_doc_ids.contains(&doc_id)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.keys().map(String::as_str)
    }

    /// IDF of every term, sorted by term.
    pub fn idf_all(&self) -> Result<Vec<(String, f64)>> {
        self.snapshot()
            .map(|rows| rows.into_iter().map(|e| (e.term, e.idf)).collect())
    }

    /// Read-only export of `(term, df, idf)` rows, sorted by term.
    pub fn snapshot(&self) -> Result<Vec<IdfEntry>> {
        let mut rows = Vec::with_capacity(self.terms.len());
        for (term, posting) in &self.terms {
            rows.push(IdfEntry {
                term: term.clone(),
                document_frequency: posting.document_frequency,
                idf: truncated_idf(self.corpus_size(), posting.document_frequency, self.config.idf_precision)?,
            });
        }
        rows.sort_by(|a, b| a.term.cmp(&b.term));
        Ok(rows)
    }

    /// Whether the stored counters agree with the maps they summarize.
    /// Only tables read back from disk can fail this.
    pub fn is_consistent(&self) -> bool {
        let mut seen: HashSet<DocId> = HashSet::with_capacity(self.corpus_doc_ids.len());
        for posting in self.terms.values() {
            if !posting.is_consistent() {
                return false;
            }
            seen.extend(posting.doc_counts.keys().copied());
        }
        self.total_distinct_terms == self.terms.len() && seen == self.corpus_doc_ids
    }

    /// Fold a shard built by another writer into this index.
    pub fn merge(&mut self, other: InvertedIndex) {
        tracing::debug!(
            terms = other.terms.len(),
            docs = other.corpus_doc_ids.len(),
            "merging index shard"
        );
        for (term, shard) in other.terms {
            let posting = match self.terms.entry(term) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => {
                    self.total_distinct_terms += 1;
                    e.insert(TermPosting::new())
                }
            };
            for (doc_id, count) in shard.doc_counts {
                posting.add_occurrences(doc_id, count);
            }
        }
        self.corpus_doc_ids.extend(other.corpus_doc_ids);
    }
}

impl fmt::Display for InvertedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sorted: BTreeMap<&String, &TermPosting> = self.terms.iter().collect();
        for (term, posting) in sorted {
            write!(f, "{term}--")?;
            write_braced(f, posting.sorted_counts().iter().map(|(d, c)| format!("{d}: {c}")))?;
            writeln!(f)?;
        }
        Ok(())
    }
}
