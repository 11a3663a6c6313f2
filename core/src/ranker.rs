//! Per-document scoring accumulators.
//!
//! A ranker scores one candidate at a time: `reset` on the candidate,
//! `update` once per matching query term, then `evaluate`. Scores are only
//! comparable among documents scored by the same ranker configuration.

use crate::config::BetterRankerConfig;
use crate::corpus::Corpus;
use crate::index::InvertedIndex;
use crate::posting::Posting;
use crate::DocId;

pub trait Ranker {
    fn reset(&mut self, doc_id: DocId);

    /// Fold in one query term found in the current document.
    ///
    /// # Panics
    ///
    /// Panics if `posting` belongs to another document than the last `reset`.
    fn update(&mut self, term: &str, multiplicity: u32, posting: &Posting);

    fn evaluate(&self) -> f64;
}

fn check_document(current: Option<DocId>, posting: &Posting) {
    assert_eq!(
        current,
        Some(posting.doc_id),
        "ranker updated with a posting for another document"
    );
}

/// Sums `multiplicity * term_frequency` over the matched query terms.
#[derive(Debug, Default, Clone)]
pub struct SimpleRanker {
    doc_id: Option<DocId>,
    score: f64,
}

impl SimpleRanker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ranker for SimpleRanker {
    fn reset(&mut self, doc_id: DocId) {
        self.doc_id = Some(doc_id);
        self.score = 0.0;
    }

    fn update(&mut self, _term: &str, multiplicity: u32, posting: &Posting) {
        check_document(self.doc_id, posting);
        self.score += multiplicity as f64 * posting.term_frequency as f64;
    }

    fn evaluate(&self) -> f64 {
        self.score
    }
}

/// TF-IDF blended with a static quality score read from a document field.
///
/// `idf = log2(N / df)`, taken as 0 when the term occurs nowhere. The final
/// score is `dynamic_weight * tf_idf + static_weight * static_score`, where a
/// missing or non-numeric static field counts as 0.
pub struct BetterRanker<'a> {
    corpus: &'a dyn Corpus,
    index: &'a dyn InvertedIndex,
    config: BetterRankerConfig,
    doc_id: Option<DocId>,
    dynamic_score: f64,
}

impl<'a> BetterRanker<'a> {
    pub fn new(corpus: &'a dyn Corpus, index: &'a dyn InvertedIndex) -> Self {
        Self::with_config(corpus, index, BetterRankerConfig::default())
    }

    pub fn with_config(corpus: &'a dyn Corpus, index: &'a dyn InvertedIndex, config: BetterRankerConfig) -> Self {
        Self { corpus, index, config, doc_id: None, dynamic_score: 0.0 }
    }

    fn idf(&self, term: &str) -> f64 {
        let df = self.index.get_document_frequency(term);
        if df == 0 {
            return 0.0;
        }
        (self.corpus.size() as f64 / df as f64).log2()
    }

    fn static_score(&self) -> f64 {
        self.doc_id
            .and_then(|id| self.corpus.get_document(id))
            .and_then(|doc| doc.numeric_field(&self.config.static_score_field))
            .unwrap_or(0.0)
    }
}

impl Ranker for BetterRanker<'_> {
    fn reset(&mut self, doc_id: DocId) {
        self.doc_id = Some(doc_id);
        self.dynamic_score = 0.0;
    }

    fn update(&mut self, term: &str, multiplicity: u32, posting: &Posting) {
        check_document(self.doc_id, posting);
        let tf = posting.term_frequency as f64;
        self.dynamic_score += multiplicity as f64 * tf * self.idf(term);
    }

    fn evaluate(&self) -> f64 {
        self.config.dynamic_weight * self.dynamic_score + self.config.static_weight * self.static_score()
    }
}
