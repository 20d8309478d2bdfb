//! `lexrag`: in-memory lexical retrieval for retrieval-augmented generation.
//!
//! Ranks the documents of a small in-process corpus against a free-text query, so the
//! top hits can be pasted into a prompt for a downstream generation step. No embedding
//! service is involved: documents are TF-IDF vectors over a vocabulary fit on the corpus.
//!
//! Scope:
//! - In-memory corpora, refit from scratch on every addition
//! - Deterministic ranking (cosine similarity desc, tie-break by doc id asc)
//! - Fixed English normalization (lower-case, alphanumeric split, stop-words)
//!
//! Non-goals:
//! - Persistence across restarts
//! - Approximate nearest-neighbor search, learned embeddings
//! - Network transport or calling a generation model
//!
//! ```
//! use lexrag::RetrievalIndex;
//!
//! let index = RetrievalIndex::new();
//! index
//!     .add_documents(&["the cat sat", "the dog ran", "cats and dogs"], None)
//!     .unwrap();
//! let hits = index.query("cat", 2).unwrap();
//! assert_eq!(hits[0].text, "the cat sat");
//! ```
//!
//! References:
//! - Spärck Jones (1972): term specificity / IDF motivation
//! - Salton & Buckley (1988): term-weighting approaches in automatic text retrieval

pub mod collection;
pub mod config;
pub mod index;
pub mod model;
pub mod tokenize;
pub mod vector;

pub use collection::{Client, Collection, OpenOutcome};
pub use config::IndexConfig;
pub use error::Error;
pub use index::{Document, Hit, Metadata, RetrievalIndex, Snapshot};
pub use model::LexicalModel;
pub use vector::SparseVector;

mod error {
    /// Errors for lexical retrieval.
    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        /// A caller-supplied argument was out of range or inconsistent.
        #[error("invalid argument: {0}")]
        InvalidArgument(String),
        /// A collection with this name already exists.
        #[error("collection already exists: {0}")]
        CollectionExists(String),
    }
}
