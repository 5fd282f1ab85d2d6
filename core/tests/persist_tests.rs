use irtables::persist::{
    load_index, load_meta, load_qrels, load_queries, save_index, save_meta, save_qrels, save_queries,
    IndexPaths, MetaFile, FORMAT_VERSION,
};
use irtables::{IndexConfig, InvertedIndex, QueryTermTable, RelevanceTable};
use std::fs;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tempfile::tempdir;

#[test]
fn tables_survive_a_round_trip() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path().join("tables"));

    let mut index = InvertedIndex::new();
    for (term, doc) in [("rust", 0), ("rust", 1), ("rust", 1), ("index", 2)] {
        index.insert_occurrence(term, doc);
    }
    let mut queries = QueryTermTable::new();
    queries.insert_occurrence("rust", 1);
    let mut qrels = RelevanceTable::new();
    qrels.insert_judgment(1, 1);

    save_index(&paths, &index).unwrap();
    save_queries(&paths, &queries).unwrap();
    save_qrels(&paths, &qrels).unwrap();
    save_meta(&paths, &MetaFile::describe(&index, &queries)).unwrap();

    let loaded = load_index(&paths).unwrap();
    assert_eq!(loaded.snapshot().unwrap(), index.snapshot().unwrap());
    assert_eq!(loaded.occurrences("rust", 1), 2);
    assert_eq!(loaded.distinct_term_count(), 2);
    assert_eq!(load_queries(&paths).unwrap(), queries);
    assert_eq!(load_qrels(&paths).unwrap(), qrels);

    let meta = load_meta(&paths).unwrap();
    assert_eq!(meta.corpus_size, 3);
    assert_eq!(meta.distinct_terms, 2);
    assert_eq!(meta.total_queries, 1);
    assert_eq!(meta.version, FORMAT_VERSION);
    assert!(!meta.created_at.is_empty());
}

#[test]
fn loading_missing_tables_fails() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    assert!(load_index(&paths).is_err());
    assert!(load_meta(&paths).is_err());
}

#[test]
fn loading_rejects_stale_counters() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());

    // Field order of the serialized tables: maps first, then counters.
    let queries: HashMap<u32, HashMap<String, u32>> = HashMap::from([(1, HashMap::from([("x".to_string(), 1)]))]);
    fs::write(dir.path().join("queries.bin"), bincode::serialize(&(queries, 3usize)).unwrap()).unwrap();
    assert!(load_queries(&paths).is_err());

    let qrels: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::from([(1, BTreeSet::new())]);
    fs::write(dir.path().join("qrels.bin"), bincode::serialize(&qrels).unwrap()).unwrap();
    assert!(load_qrels(&paths).is_err());

    let posting = (HashMap::from([(7u32, 2u32)]), 5u32);
    let terms: HashMap<String, (HashMap<u32, u32>, u32)> = HashMap::from([("x".to_string(), posting)]);
    let docs: HashSet<u32> = HashSet::from([7]);
    let index = (terms, docs, 1usize, IndexConfig::default());
    fs::write(dir.path().join("index.bin"), bincode::serialize(&index).unwrap()).unwrap();
    assert!(load_index(&paths).is_err());
}

#[test]
fn saved_tables_pass_consistency_checks() {
    let mut index = InvertedIndex::new();
    index.insert_occurrence("x", 7);
    index.insert_occurrence("x", 7);
    let mut other = InvertedIndex::new();
    other.insert_occurrence("y", 8);
    index.merge(other);
    assert!(index.is_consistent());

    let mut queries = QueryTermTable::new();
    queries.insert_occurrence("x", 1);
    assert!(queries.is_consistent());
}
