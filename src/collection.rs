//! Named collections of retrieval indices.
//!
//! A [`Client`] owns any number of independent indices keyed by name. Opening a collection
//! is an explicit construct-or-load step that reports which branch was taken, so callers
//! seed a collection exactly once (on [`OpenOutcome::Created`]).

use crate::config::IndexConfig;
use crate::index::{Hit, Metadata, RetrievalIndex};
use crate::Error;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Which branch `get_or_create_collection` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The collection did not exist and was created empty.
    Created,
    /// An existing collection was returned.
    Loaded,
}

/// Shared handle to one named retrieval index.
#[derive(Debug, Clone)]
pub struct Collection {
    name: Arc<str>,
    index: Arc<RetrievalIndex>,
}

impl Collection {
    fn new(name: &str, config: IndexConfig) -> Self {
        Self {
            name: Arc::from(name),
            index: Arc::new(RetrievalIndex::with_config(config)),
        }
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying index.
    pub fn index(&self) -> &RetrievalIndex {
        &self.index
    }

    /// Number of stored documents.
    pub fn count(&self) -> usize {
        self.index.len()
    }

    /// See [`RetrievalIndex::add_documents`].
    pub fn add_documents<S: AsRef<str>>(
        &self,
        docs: &[S],
        metadatas: Option<Vec<Metadata>>,
    ) -> Result<usize, Error> {
        self.index.add_documents(docs, metadatas)
    }

    /// See [`RetrievalIndex::query`].
    pub fn query(&self, query_text: &str, n_results: usize) -> Result<Vec<Hit>, Error> {
        self.index.query(query_text, n_results)
    }

    /// Retrieved texts joined by blank lines, ready to paste into a prompt.
    ///
    /// Empty when the collection holds no documents.
    pub fn context_for_query(&self, question: &str, n_results: usize) -> Result<String, Error> {
        let hits = self.index.query(question, n_results)?;
        Ok(join_context(&hits))
    }
}

/// Join hit texts with a blank line between them.
pub fn join_context(hits: &[Hit]) -> String {
    hits.iter()
        .map(|h| h.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// In-process registry of named collections.
#[derive(Debug, Default)]
pub struct Client {
    config: IndexConfig,
    collections: RwLock<HashMap<String, Collection>>,
}

impl Client {
    /// Create a client whose new collections use the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client whose new collections use `config`.
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            config,
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Return the named collection, creating it if absent.
    pub fn get_or_create_collection(&self, name: &str) -> (Collection, OpenOutcome) {
        if let Some(c) = self.get_collection(name) {
            debug!(collection = name, "loaded collection");
            return (c, OpenOutcome::Loaded);
        }
        let mut collections = self.collections.write();
        // Re-check under the write lock: another caller may have created it.
        if let Some(c) = collections.get(name) {
            debug!(collection = name, "loaded collection");
            return (c.clone(), OpenOutcome::Loaded);
        }
        let c = Collection::new(name, self.config);
        collections.insert(name.to_string(), c.clone());
        debug!(collection = name, "created collection");
        (c, OpenOutcome::Created)
    }

    /// Create a new empty collection; fails if the name is taken.
    pub fn create_collection(&self, name: &str) -> Result<Collection, Error> {
        let mut collections = self.collections.write();
        if collections.contains_key(name) {
            return Err(Error::CollectionExists(name.to_string()));
        }
        let c = Collection::new(name, self.config);
        collections.insert(name.to_string(), c.clone());
        debug!(collection = name, "created collection");
        Ok(c)
    }

    /// Handle to the named collection, if present.
    pub fn get_collection(&self, name: &str) -> Option<Collection> {
        self.collections.read().get(name).cloned()
    }

    /// Remove a collection. Returns whether it existed.
    ///
    /// Outstanding handles keep working on their own copy of the index.
    pub fn delete_collection(&self, name: &str) -> bool {
        self.collections.write().remove(name).is_some()
    }

    /// Collection names, sorted.
    pub fn list_collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWLEDGE_BASE: &[&str] = &[
        "Python is a high-level, interpreted programming language known for its readability and versatility.",
        "Flask is a lightweight web framework for Python, designed to make getting started quick and easy.",
        "ChromaDB is an open-source embedding database designed for storing and searching vector embeddings.",
        "Retrieval Augmented Generation (RAG) combines retrieval mechanisms with text generation to create more accurate AI responses.",
        "Gemini is Google's state-of-the-art generative AI model, designed to handle complex natural language tasks.",
    ];

    fn seeded(client: &Client, name: &str) -> (Collection, OpenOutcome) {
        let (c, outcome) = client.get_or_create_collection(name);
        if outcome == OpenOutcome::Created {
            let metas = vec![
                Metadata::from([("source".to_string(), "knowledge_base".to_string())]);
                KNOWLEDGE_BASE.len()
            ];
            c.add_documents(KNOWLEDGE_BASE, Some(metas)).unwrap();
        }
        (c, outcome)
    }

    #[test]
    fn construct_or_load_reports_branch_and_seeds_once() {
        let client = Client::new();
        let (first, outcome) = seeded(&client, "knowledge_collection");
        assert_eq!(outcome, OpenOutcome::Created);
        assert_eq!(first.count(), KNOWLEDGE_BASE.len());

        let (second, outcome) = seeded(&client, "knowledge_collection");
        assert_eq!(outcome, OpenOutcome::Loaded);
        assert_eq!(second.count(), KNOWLEDGE_BASE.len());
    }

    #[test]
    fn context_joins_hits_with_blank_lines() {
        let client = Client::new();
        let (c, _) = seeded(&client, "kb");
        let context = c.context_for_query("What is the Flask web framework?", 2).unwrap();
        let parts: Vec<&str> = context.split("\n\n").collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], KNOWLEDGE_BASE[1]);
    }

    #[test]
    fn context_of_empty_collection_is_empty() {
        let client = Client::new();
        let (c, _) = client.get_or_create_collection("empty");
        assert_eq!(c.context_for_query("anything", 3).unwrap(), "");
    }

    #[test]
    fn create_twice_fails() {
        let client = Client::new();
        client.create_collection("docs").unwrap();
        assert!(matches!(
            client.create_collection("docs"),
            Err(Error::CollectionExists(name)) if name == "docs"
        ));
    }

    #[test]
    fn collections_are_independent() {
        let client = Client::with_config(IndexConfig::context());
        let (a, _) = client.get_or_create_collection("a");
        let (b, _) = client.get_or_create_collection("b");
        a.add_documents(&["only in a"], None).unwrap();
        assert_eq!(a.count(), 1);
        assert_eq!(b.count(), 0);
        assert_eq!(a.index().config().default_n_results, 2);
        assert_eq!(client.list_collections(), vec!["a", "b"]);
    }

    #[test]
    fn delete_and_recreate() {
        let client = Client::new();
        let (c, _) = client.get_or_create_collection("tmp");
        c.add_documents(&["kept by handle"], None).unwrap();
        assert!(client.delete_collection("tmp"));
        assert!(!client.delete_collection("tmp"));
        assert!(client.get_collection("tmp").is_none());
        assert_eq!(c.count(), 1);

        let (fresh, outcome) = client.get_or_create_collection("tmp");
        assert_eq!(outcome, OpenOutcome::Created);
        assert_eq!(fresh.count(), 0);
        assert_eq!(fresh.name(), "tmp");
    }
}
