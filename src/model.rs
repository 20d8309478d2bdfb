//! TF-IDF lexical model: vocabulary + smoothed inverse document frequency.
//!
//! The model is always fit over a complete corpus snapshot; there is no incremental update.
//! Fitting twice on the same corpus yields the same vocabulary order, the same IDF table,
//! and the same document vectors.
//!
//! Weights:
//! - `tf(t, d) = count(t, d) / |d|` (raw frequency over surviving tokens)
//! - `idf(t) = ln((1 + N) / (1 + df(t))) + 1` (never zero, never undefined)
//! - `w(t, d) = tf(t, d) * idf(t)`
//!
//! References:
//! - Spärck Jones (1972): term specificity / IDF motivation.

use crate::tokenize::tokenize;
use crate::vector::SparseVector;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Fitted vocabulary and IDF statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexicalModel {
    // term -> dimension; `terms[dim]` is the inverse.
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f32>,
    num_docs: usize,
}

fn compute_tf(count: usize, doc_len: usize) -> f32 {
    if doc_len == 0 {
        return 0.0;
    }
    count as f32 / doc_len as f32
}

fn compute_idf(num_docs: usize, doc_frequency: usize) -> f32 {
    ((1.0 + num_docs as f32) / (1.0 + doc_frequency as f32)).ln() + 1.0
}

impl LexicalModel {
    /// Create an unfitted model (empty vocabulary).
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild vocabulary and IDF from exactly `corpus`, returning one weight vector per
    /// document in input order.
    ///
    /// Dimensions are assigned in first-occurrence order: documents in input order, then
    /// tokens in position order.
    pub fn fit<S: AsRef<str>>(&mut self, corpus: &[S]) -> Vec<SparseVector> {
        let tokenized: Vec<Vec<String>> = corpus.iter().map(|d| tokenize(d.as_ref())).collect();

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut terms: Vec<String> = Vec::new();
        let mut doc_freq: Vec<usize> = Vec::new();

        for tokens in &tokenized {
            let mut seen: HashSet<usize> = HashSet::new();
            for token in tokens {
                let dim = match vocabulary.get(token) {
                    Some(&dim) => dim,
                    None => {
                        let dim = terms.len();
                        vocabulary.insert(token.clone(), dim);
                        terms.push(token.clone());
                        doc_freq.push(0);
                        dim
                    }
                };
                if seen.insert(dim) {
                    doc_freq[dim] += 1;
                }
            }
        }

        let num_docs = corpus.len();
        self.idf = doc_freq
            .iter()
            .map(|&df| compute_idf(num_docs, df))
            .collect();
        self.vocabulary = vocabulary;
        self.terms = terms;
        self.num_docs = num_docs;

        tokenized.iter().map(|tokens| self.weigh(tokens)).collect()
    }

    /// Project `text` into the fitted space.
    ///
    /// TF is computed against `text` alone; terms outside the fitted vocabulary contribute
    /// nothing. An unfitted model always returns the zero vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&tokenize(text))
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let doc_len = tokens.len();
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for token in tokens {
            if let Some(&dim) = self.vocabulary.get(token) {
                *counts.entry(dim).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .map(|(dim, count)| (dim, compute_tf(count, doc_len) * self.idf[dim]))
            .collect()
    }

    /// Whether the model has been fit on at least one document.
    pub fn is_fitted(&self) -> bool {
        self.num_docs > 0
    }

    /// Number of documents in the corpus the model was last fit on.
    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    /// Vocabulary size (number of dimensions).
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Terms in dimension order.
    pub fn vocabulary(&self) -> &[String] {
        &self.terms
    }

    /// IDF table in dimension order.
    pub fn idf(&self) -> &[f32] {
        &self.idf
    }

    /// Dimension index of a normalized term.
    pub fn dimension(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// IDF of a normalized term, if it is in the vocabulary.
    pub fn idf_of(&self, term: &str) -> Option<f32> {
        self.dimension(term).map(|dim| self.idf[dim])
    }
}
