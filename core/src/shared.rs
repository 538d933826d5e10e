//! Shared handle for engines that are rebuilt while other threads query.
//!
//! Each generation is an immutable `Arc<Searcher>`. Rebuilds construct the
//! next generation without holding the read/write lock and swap it in under a
//! short write lock, so a reader sees either the old index or the new one.
//! Builders are serialized by a separate mutex held from snapshot to swap, so
//! a rebuild that started before a directory switch can never reinstall the
//! old directory after it.

use crate::config::SearchConfig;
use crate::error::Result;
use crate::search::{SearchHit, SearchMode, Searcher};
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub struct SharedSearcher {
    current: RwLock<Arc<Searcher>>,
    build_lock: Mutex<()>,
}

impl SharedSearcher {
    pub fn new(searcher: Searcher) -> Self {
        Self { current: RwLock::new(Arc::new(searcher)), build_lock: Mutex::new(()) }
    }

    pub fn open<P: AsRef<Path>>(root: P, config: SearchConfig) -> Result<Self> {
        Ok(Self::new(Searcher::with_config(root, config)?))
    }

    /// The current generation. Stays valid after later swaps.
    pub fn snapshot(&self) -> Arc<Searcher> {
        self.current.read().clone()
    }

    pub fn search(&self, query: &str, mode: SearchMode) -> Vec<SearchHit> {
        self.snapshot().search(query, mode)
    }

    pub fn get_content(&self, doc_id: &str) -> Result<String> {
        self.snapshot().get_content(doc_id).map(str::to_owned)
    }

    /// Install `searcher` as the current generation, returning the previous one.
    /// Waits for any in-flight rebuild or switch to finish first.
    pub fn replace(&self, searcher: Searcher) -> Arc<Searcher> {
        let _building = self.build_lock.lock();
        self.install(searcher)
    }

    /// Build an index for `root` with the current config and swap it in.
    pub fn switch_root<P: AsRef<Path>>(&self, root: P) -> Result<()> {
        let _building = self.build_lock.lock();
        let config = self.snapshot().config().clone();
        let next = Searcher::with_config(root, config)?;
        self.install(next);
        Ok(())
    }

    /// Re-walk the current root and swap in the result.
    pub fn rebuild(&self) -> Result<()> {
        let _building = self.build_lock.lock();
        let current = self.snapshot();
        let next = Searcher::with_config(current.root(), current.config().clone())?;
        drop(current);
        self.install(next);
        Ok(())
    }

    // caller must hold `build_lock`
    fn install(&self, searcher: Searcher) -> Arc<Searcher> {
        let next = Arc::new(searcher);
        std::mem::replace(&mut *self.current.write(), next)
    }

    /// Run [`rebuild`](Self::rebuild) on a worker thread; joining the handle
    /// is the completion notification.
    pub fn rebuild_in_background(self: &Arc<Self>) -> JoinHandle<Result<()>> {
        let this = Arc::clone(self);
        thread::spawn(move || this.rebuild())
    }
}
