use crate::config::SearchConfig;
use crate::tokenizer::tokenize;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Documents are keyed by the path they were read from.
pub type DocId = String;

/// A qualifying file that could not be read during a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Inverted index plus the document store it was built from.
///
/// Each document is posted at most once per term. Built in one pass and never
/// mutated afterwards; a rebuild produces a fresh value.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<DocId>>,
    docs: BTreeMap<DocId, String>,
    skipped: Vec<SkippedFile>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Walk `root` and index every readable file the config allows.
    ///
    /// Unreadable directory entries and files are logged and skipped; they
    /// never fail the build.
    pub fn build(root: &Path, config: &SearchConfig) -> Self {
        let mut index = Self::new();
        for entry in WalkDir::new(root).follow_links(config.follow_links) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && config.allows_extension(entry.path()) {
                index.ingest_file(entry.path());
            }
        }

        tracing::info!(
            root = %root.display(),
            num_docs = index.num_docs(),
            num_terms = index.num_terms(),
            skipped = index.skipped.len(),
            "index build complete"
        );
        index
    }

    // ids must round-trip to exactly one file, so non-UTF-8 paths are skipped
    fn ingest_file(&mut self, path: &Path) {
        let doc_id = match path.to_str() {
            Some(doc_id) => doc_id.to_string(),
            None => {
                tracing::warn!(path = %path.display(), "skipping file with non-UTF-8 path");
                self.skip(path, "path is not valid UTF-8".to_string());
                return;
            }
        };
        match fs::read_to_string(path) {
            Ok(content) => self.add_document(doc_id, content),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "could not read file");
                self.skip(path, err.to_string());
            }
        }
    }

    fn skip(&mut self, path: &Path, reason: String) {
        self.skipped.push(SkippedFile { path: path.to_path_buf(), reason });
    }

    /// Post `doc_id` under every distinct term of `content` and store the content.
    pub(crate) fn add_document(&mut self, doc_id: DocId, content: String) {
        let terms: HashSet<String> = tokenize(&content).into_iter().collect();
        for term in terms {
            self.postings.entry(term).or_default().push(doc_id.clone());
        }
        self.docs.insert(doc_id, content);
    }

    /// Documents containing `term`; empty if the term was never seen.
    pub fn postings(&self, term: &str) -> &[DocId] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn content(&self, doc_id: &str) -> Option<&str> {
        self.docs.get(doc_id).map(String::as_str)
    }

    /// Indexed document ids in ascending order.
    pub fn doc_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.docs.keys().map(String::as_str)
    }

    pub fn skipped(&self) -> &[SkippedFile] { &self.skipped }

    pub fn num_docs(&self) -> usize { self.docs.len() }

    pub fn num_terms(&self) -> usize { self.postings.len() }
}
