//! In-memory retrieval index: corpus + fitted TF-IDF vectors, ranked by cosine similarity.
//!
//! Every `add_documents` call refits the lexical model over the *whole* corpus and replaces
//! every document vector and id. That costs O(total corpus size) per call; batch additions
//! into a single call where possible.
//!
//! Readers and the writer never share mutable state: the index holds an immutable
//! [`Snapshot`] behind an `Arc`, a query clones the `Arc` and ranks against it, and an
//! addition builds a complete replacement snapshot before swapping it in. Additions are
//! serialized by a separate writer lock.

use crate::config::IndexConfig;
use crate::model::LexicalModel;
use crate::vector::{cosine_similarity, SparseVector};
use crate::Error;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Document metadata (string keys to string values).
pub type Metadata = BTreeMap<String, String>;

/// Default metadata for the document at `position` in the corpus.
pub fn default_metadata(position: usize) -> Metadata {
    let mut m = Metadata::new();
    m.insert("source".to_string(), format!("document_{position}"));
    m
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Position in the corpus as of the last fit (reassigned on every rebuild).
    pub id: u32,
    /// Original raw text.
    pub text: String,
    /// Caller-supplied or default metadata.
    pub metadata: Metadata,
    /// TF-IDF weights in the current fitted space.
    pub vector: SparseVector,
}

/// One ranked query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Document id at query time.
    pub id: u32,
    /// Document text.
    pub text: String,
    /// Document metadata.
    pub metadata: Metadata,
    /// Cosine similarity against the query, in `[0, 1]`.
    pub score: f32,
}

/// Immutable corpus state observed by queries.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    documents: Vec<Document>,
    model: LexicalModel,
}

impl Snapshot {
    /// Documents in id order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Model fitted over exactly these documents.
    pub fn model(&self) -> &LexicalModel {
        &self.model
    }

    fn rank(&self, query: &SparseVector, n_results: usize) -> Vec<Hit> {
        let mut scored: Vec<(u32, f32)> = self
            .documents
            .iter()
            .map(|doc| (doc.id, cosine_similarity(query, &doc.vector)))
            .collect();

        // Deterministic: score desc, then doc_id asc.
        scored.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(n_results);

        scored
            .into_iter()
            .map(|(id, score)| {
                let doc = &self.documents[id as usize];
                Hit {
                    id,
                    text: doc.text.clone(),
                    metadata: doc.metadata.clone(),
                    score,
                }
            })
            .collect()
    }
}

/// Retrieval index over a small in-memory corpus.
#[derive(Debug, Default)]
pub struct RetrievalIndex {
    config: IndexConfig,
    snapshot: RwLock<Arc<Snapshot>>,
    writer: Mutex<()>,
}

impl RetrievalIndex {
    /// Create an empty index with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with the given configuration.
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Index configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Current snapshot (read-only view; unaffected by later additions).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    /// Number of documents in the corpus.
    pub fn len(&self) -> usize {
        self.snapshot.read().documents.len()
    }

    /// Whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Owned copies of every document, in id order.
    pub fn documents(&self) -> Vec<Document> {
        self.snapshot().documents.clone()
    }

    /// Append documents and refit over the whole combined corpus.
    ///
    /// - `metadatas`, if supplied and non-empty, must be parallel to `docs`.
    /// - Documents without metadata get `{"source": "document_<position>"}`, where position
    ///   is the index in the combined corpus.
    /// - Every document's id and vector is recomputed; O(total corpus size).
    ///
    /// Returns the number of documents added.
    pub fn add_documents<S: AsRef<str>>(
        &self,
        docs: &[S],
        metadatas: Option<Vec<Metadata>>,
    ) -> Result<usize, Error> {
        let metadatas = metadatas.filter(|m| !m.is_empty());
        if let Some(m) = &metadatas {
            if m.len() != docs.len() {
                return Err(Error::InvalidArgument(format!(
                    "metadatas length {} does not match docs length {}",
                    m.len(),
                    docs.len()
                )));
            }
        }

        let _writer = self.writer.lock();
        let current = self.snapshot();
        let base = current.documents.len();

        let mut entries: Vec<(String, Metadata)> = current
            .documents
            .iter()
            .map(|d| (d.text.clone(), d.metadata.clone()))
            .collect();
        match metadatas {
            Some(m) => entries.extend(docs.iter().map(|d| d.as_ref().to_string()).zip(m)),
            None => entries.extend(
                docs.iter()
                    .enumerate()
                    .map(|(i, d)| (d.as_ref().to_string(), default_metadata(base + i))),
            ),
        }

        let next = rebuild(entries);
        info!(
            added = docs.len(),
            corpus = next.documents.len(),
            terms = next.model.num_terms(),
            "added documents"
        );
        *self.snapshot.write() = Arc::new(next);
        Ok(docs.len())
    }

    /// Top-`n_results` documents by cosine similarity to `query_text`.
    ///
    /// Ties are broken by ascending id. An empty corpus yields an empty vec; a query with
    /// no known terms scores every document 0.
    pub fn query(&self, query_text: &str, n_results: usize) -> Result<Vec<Hit>, Error> {
        if n_results == 0 {
            return Err(Error::InvalidArgument(
                "n_results must be positive".to_string(),
            ));
        }
        let snapshot = self.snapshot();
        if snapshot.documents.is_empty() {
            return Ok(Vec::new());
        }
        let query = snapshot.model.transform(query_text);
        let hits = snapshot.rank(&query, n_results);
        debug!(
            n_results,
            query_terms = query.len(),
            hits = hits.len(),
            "ranked query"
        );
        Ok(hits)
    }

    /// `query` with the configured default result count.
    pub fn query_default(&self, query_text: &str) -> Result<Vec<Hit>, Error> {
        self.query(query_text, self.config.default_n_results)
    }
}

fn rebuild(entries: Vec<(String, Metadata)>) -> Snapshot {
    let mut model = LexicalModel::new();
    let vectors = {
        let texts: Vec<&str> = entries.iter().map(|(t, _)| t.as_str()).collect();
        model.fit(&texts)
    };
    let documents = entries
        .into_iter()
        .zip(vectors)
        .enumerate()
        .map(|(id, ((text, metadata), vector))| Document {
            id: id as u32,
            text,
            metadata,
            vector,
        })
        .collect();
    Snapshot { documents, model }
}
