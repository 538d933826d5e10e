use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::index::{DocId, InvertedIndex, SkippedFile};
use crate::preview;
use crate::tokenizer::tokenize;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// How query tokens are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// A document matches if it contains any query token.
    #[default]
    Token,
    /// A document must contain every query token and the literal phrase.
    Phrase,
}

impl From<bool> for SearchMode {
    fn from(phrase_mode: bool) -> Self {
        if phrase_mode { SearchMode::Phrase } else { SearchMode::Token }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub path: DocId,
    pub preview: String,
}

/// Search engine over one root directory.
///
/// Owns the inverted index and document store exclusively. Queries borrow it
/// immutably; rebuilds need `&mut self`, so no query can observe a
/// half-built index.
#[derive(Debug)]
pub struct Searcher {
    root: PathBuf,
    config: SearchConfig,
    index: InvertedIndex,
}

impl Searcher {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::with_config(root, SearchConfig::default())
    }

    pub fn with_config<P: AsRef<Path>>(root: P, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let root = checked_root(root.as_ref())?;
        let index = InvertedIndex::build(&root, &config);
        Ok(Self { root, config, index })
    }

    /// Re-walk the current root and replace the whole index.
    ///
    /// The new index is built before the old one is dropped; on error the
    /// existing index is left untouched.
    pub fn rebuild(&mut self) -> Result<()> {
        let root = checked_root(&self.root)?;
        self.index = InvertedIndex::build(&root, &self.config);
        Ok(())
    }

    /// Point the engine at a different directory, discarding the old index.
    pub fn set_root<P: AsRef<Path>>(&mut self, root: P) -> Result<()> {
        let root = checked_root(root.as_ref())?;
        let index = InvertedIndex::build(&root, &self.config);
        self.root = root;
        self.index = index;
        Ok(())
    }

    /// Run `query` and return one hit per matching document, ordered by id.
    ///
    /// Never fails: a query with no usable tokens, or with no matches, yields
    /// an empty list.
    pub fn search(&self, query: &str, mode: SearchMode) -> Vec<SearchHit> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        let matches = match mode {
            SearchMode::Token => self.any_token(&tokens),
            SearchMode::Phrase => self.phrase(query, &tokens),
        };
        tracing::debug!(query, ?mode, hits = matches.len(), "search complete");

        matches
            .into_iter()
            .filter_map(|doc_id| {
                let content = self.index.content(doc_id)?;
                Some(SearchHit {
                    path: doc_id.to_string(),
                    preview: preview::extract(content, &tokens, self.config.preview_length),
                })
            })
            .collect()
    }

    /// Raw content of an indexed document.
    pub fn get_content(&self, doc_id: &str) -> Result<&str> {
        self.index
            .content(doc_id)
            .ok_or_else(|| SearchError::DocumentNotFound(doc_id.to_string()))
    }

    pub fn documents(&self) -> impl Iterator<Item = &str> + '_ { self.index.doc_ids() }

    pub fn document_count(&self) -> usize { self.index.num_docs() }

    pub fn term_count(&self) -> usize { self.index.num_terms() }

    pub fn skipped(&self) -> &[SkippedFile] { self.index.skipped() }

    pub fn root(&self) -> &Path { &self.root }

    pub fn config(&self) -> &SearchConfig { &self.config }

    // union of posting lists
    fn any_token(&self, tokens: &[String]) -> BTreeSet<&str> {
        tokens
            .iter()
            .flat_map(|t| self.index.postings(t))
            .map(String::as_str)
            .collect()
    }

    // intersection of posting lists
    fn every_token(&self, tokens: &[String]) -> BTreeSet<&str> {
        let mut terms = tokens.iter();
        let mut candidates: BTreeSet<&str> = match terms.next() {
            Some(first) => self.index.postings(first).iter().map(String::as_str).collect(),
            None => return BTreeSet::new(),
        };
        for term in terms {
            if candidates.is_empty() {
                break;
            }
            let docs: HashSet<&str> = self.index.postings(term).iter().map(String::as_str).collect();
            candidates.retain(|doc_id| docs.contains(doc_id));
        }
        candidates
    }

    fn phrase(&self, query: &str, tokens: &[String]) -> BTreeSet<&str> {
        let pattern = match phrase_pattern(query) {
            Some(pattern) => pattern,
            None => return BTreeSet::new(),
        };
        self.every_token(tokens)
            .into_iter()
            .filter(|doc_id| {
                self.index
                    .content(doc_id)
                    .is_some_and(|content| verify_phrase(content, &pattern, tokens, self.config.phrase_context))
            })
            .collect()
    }
}

fn checked_root(root: &Path) -> Result<PathBuf> {
    if !root.exists() {
        return Err(SearchError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(SearchError::RootNotDirectory(root.to_path_buf()));
    }
    Ok(std::path::absolute(root)?)
}

/// Case-insensitive literal match of the query, where any whitespace run in
/// the query matches any whitespace run in the text.
fn phrase_pattern(query: &str) -> Option<Regex> {
    let words: Vec<String> = query.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return None;
    }
    RegexBuilder::new(&words.join(r"\s+"))
        .case_insensitive(true)
        .build()
        .ok()
}

/// True once some occurrence of `pattern` has every query stem within
/// `context` characters on either side. Stops at the first such occurrence.
fn verify_phrase(content: &str, pattern: &Regex, tokens: &[String], context: usize) -> bool {
    pattern.find_iter(content).any(|m| {
        let start = preview::step_back(content, m.start(), context);
        let end = preview::step_forward(content, m.end(), context);
        let window = tokenize(&content[start..end]);
        tokens.iter().all(|t| window.contains(t))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn mode_from_flag() {
        assert_eq!(SearchMode::from(true), SearchMode::Phrase);
        assert_eq!(SearchMode::from(false), SearchMode::Token);
    }

    #[test]
    fn phrase_pattern_spans_whitespace() {
        let pat = phrase_pattern("Repeating   phrase").unwrap();
        assert!(pat.is_match("a repeating\nphrase"));
        assert!(!pat.is_match("repeating the phrase"));
        assert!(phrase_pattern("   ").is_none());
    }

    #[test]
    fn phrase_pattern_escapes_metacharacters() {
        let pat = phrase_pattern("c++ (beta)").unwrap();
        assert!(pat.is_match("try C++ (beta) today"));
        assert!(!pat.is_match("try cc (beta) today"));
    }

    #[test]
    fn verify_rejects_match_inside_longer_word() {
        let pat = phrase_pattern("cat").unwrap();
        assert!(!verify_phrase("concatenate strings", &pat, &toks(&["cat"]), 30));
        assert!(verify_phrase("concatenate the cat", &pat, &toks(&["cat"]), 30));
    }

    #[test]
    fn verify_window_follows_context_width() {
        let pat = phrase_pattern("cat").unwrap();
        let tokens = toks(&["cat"]);
        assert!(!verify_phrase("concatenate strings", &pat, &tokens, 30));
        assert!(!verify_phrase("concatenate strings", &pat, &tokens, 2));
        assert!(verify_phrase("concatenate strings", &pat, &tokens, 0));
    }

    #[test]
    fn verify_accepts_exact_phrase() {
        let pat = phrase_pattern("lazy dog").unwrap();
        let tokens = tokenize("lazy dog");
        assert!(verify_phrase("the Lazy Dog sleeps", &pat, &tokens, 30));
        assert!(!verify_phrase("the lazy brown dog", &pat, &tokens, 30));
    }
}
