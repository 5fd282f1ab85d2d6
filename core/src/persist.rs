use crate::{InvertedIndex, QueryTermTable, RelevanceTable};
use anyhow::{ensure, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFile {
    pub corpus_size: usize,
    pub distinct_terms: usize,
    pub total_queries: usize,
    pub created_at: String,
    pub version: u32,
}

impl MetaFile {
    /// Summary of the given tables, stamped with the current UTC time.
    pub fn describe(index: &InvertedIndex, queries: &QueryTermTable) -> Self {
        Self {
            corpus_size: index.corpus_size(),
            distinct_terms: index.distinct_term_count(),
            total_queries: queries.total_queries(),
            created_at: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_default(),
            version: FORMAT_VERSION,
        }
    }
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn index(&self) -> PathBuf { self.root.join("index.bin") }
    fn queries(&self) -> PathBuf { self.root.join("queries.bin") }
    fn qrels(&self) -> PathBuf { self.root.join("qrels.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

fn write_bin<T: Serialize>(root: &Path, file: PathBuf, value: &T) -> Result<()> {
    create_dir_all(root)?;
    let mut f = File::create(&file)?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    tracing::info!(path = %file.display(), bytes = bytes.len(), "saved table");
    Ok(())
}

fn read_bin<T: DeserializeOwned>(file: PathBuf) -> Result<T> {
    let mut f = File::open(&file)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let value = bincode::deserialize(&buf)?;
    tracing::info!(path = %file.display(), bytes = buf.len(), "loaded table");
    Ok(value)
}

pub fn save_index(paths: &IndexPaths, index: &InvertedIndex) -> Result<()> {
    write_bin(&paths.root, paths.index(), index)
}

pub fn load_index(paths: &IndexPaths) -> Result<InvertedIndex> {
    let index: InvertedIndex = read_bin(paths.index())?;
    index.config().validate()?;
    ensure!(index.is_consistent(), "inconsistent index table in {}", paths.index().display());
    Ok(index)
}

pub fn save_queries(paths: &IndexPaths, queries: &QueryTermTable) -> Result<()> {
    write_bin(&paths.root, paths.queries(), queries)
}

pub fn load_queries(paths: &IndexPaths) -> Result<QueryTermTable> {
    let queries: QueryTermTable = read_bin(paths.queries())?;
    ensure!(queries.is_consistent(), "inconsistent query table in {}", paths.queries().display());
    Ok(queries)
}

pub fn save_qrels(paths: &IndexPaths, qrels: &RelevanceTable) -> Result<()> {
    write_bin(&paths.root, paths.qrels(), qrels)
}

pub fn load_qrels(paths: &IndexPaths) -> Result<RelevanceTable> {
    let qrels: RelevanceTable = read_bin(paths.qrels())?;
    ensure!(qrels.is_consistent(), "empty relevance set in {}", paths.qrels().display());
    Ok(qrels)
}

/// Human-readable summary next to the binary tables.
pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut writer = BufWriter::new(File::create(paths.meta())?);
    serde_json::to_writer_pretty(&mut writer, meta)?;
    writer.flush()?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let reader = BufReader::new(File::open(paths.meta())?);
    let meta: MetaFile = serde_json::from_reader(reader)?;
    ensure!(meta.version == FORMAT_VERSION, "unsupported table format version {}", meta.version);
    Ok(meta)
}
