pub mod codec;
pub mod config;
pub mod corpus;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod index;
pub mod merger;
pub mod posting;
pub mod ranker;
pub mod sieve;
pub mod tokenizer;

pub use config::{BetterRankerConfig, IndexConfig, SearchOptions};
pub use corpus::{Corpus, Document, InMemoryCorpus};
pub use engine::{Hit, SimpleSearchEngine};
pub use error::{Error, Result};
pub use index::{DocId, InMemoryInvertedIndex, InvertedIndex, Postings, TermId};
pub use posting::{Posting, PostingList};
pub use ranker::{BetterRanker, Ranker, SimpleRanker};
pub use sieve::Sieve;
