pub mod config;
pub mod error;
pub mod index;
pub mod preview;
pub mod search;
pub mod shared;
pub mod tokenizer;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use index::{DocId, InvertedIndex, SkippedFile};
pub use search::{SearchHit, SearchMode, Searcher};
pub use shared::SharedSearcher;
