//! N-of-M ranked retrieval over an inverted index.
//!
//! For a query with M distinct terms, a document matches when it contains at
//! least N of them, with N derived from the client's match threshold. This is
//! a soft AND: 1-of-M behaves like OR, M-of-M like AND. Evaluation is
//! document-at-a-time: one cursor per term advances in document-id lockstep
//! and each candidate is scored completely before the next.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::SearchOptions;
use crate::corpus::{Corpus, Document};
use crate::error::Result;
use crate::index::{InvertedIndex, Postings};
use crate::posting::Posting;
use crate::ranker::Ranker;
use crate::sieve::Sieve;
use crate::DocId;

/// A ranked result.
#[derive(Debug, Clone, Serialize)]
pub struct Hit<'a> {
    pub score: f64,
    pub document: &'a Document,
}

/// Distinct query terms in first-occurrence order, with occurrence counts.
pub fn count_terms(terms: Vec<String>) -> Vec<(String, u32)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counted: Vec<(String, u32)> = Vec::new();
    for term in terms {
        match positions.get(&term) {
            Some(&i) => counted[i].1 += 1,
            None => {
                positions.insert(term.clone(), counted.len());
                counted.push((term, 1));
            }
        }
    }
    counted
}

/// Position in one query term's posting list.
struct Cursor<'a> {
    term: String,
    multiplicity: u32,
    postings: Postings<'a>,
    head: Option<Posting>,
}

impl<'a> Cursor<'a> {
    fn open(term: String, multiplicity: u32, mut postings: Postings<'a>) -> Self {
        let head = postings.next();
        Self { term, multiplicity, postings, head }
    }

    fn doc_id(&self) -> Option<DocId> {
        self.head.map(|p| p.doc_id)
    }

    fn is_on(&self, doc_id: DocId) -> bool {
        self.doc_id() == Some(doc_id)
    }

    fn advance(&mut self) {
        self.head = self.postings.next();
    }
}

pub struct SimpleSearchEngine<'a, C: ?Sized, I: ?Sized> {
    corpus: &'a C,
    index: &'a I,
}

impl<'a, C, I> SimpleSearchEngine<'a, C, I>
where
    C: Corpus + ?Sized,
    I: InvertedIndex + ?Sized,
{
    pub fn new(corpus: &'a C, index: &'a I) -> Self {
        Self { corpus, index }
    }

    /// Evaluate `query`, returning at most `options.hit_count()` hits, best
    /// first. Only the returned documents are fetched from the corpus.
    pub fn evaluate<R: Ranker + ?Sized>(
        &self,
        query: &str,
        options: &SearchOptions,
        ranker: &mut R,
    ) -> Result<Vec<Hit<'a>>> {
        let unique_terms = count_terms(self.index.get_terms(query));
        let m = unique_terms.len();
        if m == 0 {
            tracing::debug!(query, "empty query");
            return Ok(Vec::new());
        }
        let n = options.required_matches(m);

        // Out-of-vocabulary terms count towards M but start out exhausted.
        let mut active: Vec<Cursor<'_>> = unique_terms
            .into_iter()
            .map(|(term, multiplicity)| {
                let postings = self.index.get_postings_iterator(&term);
                Cursor::open(term, multiplicity, postings)
            })
            .filter(|c| c.head.is_some())
            .collect();

        let mut sieve = Sieve::new(options.hit_count())?;
        let mut candidates = 0usize;

        // Once fewer than N cursors remain, no later document can match.
        while active.len() >= n {
            let Some(frontier) = active.iter().filter_map(Cursor::doc_id).min() else {
                break;
            };
            let on_frontier = active.iter().filter(|c| c.is_on(frontier)).count();
            if on_frontier >= n {
                candidates += 1;
                ranker.reset(frontier);
                for cursor in active.iter().filter(|c| c.is_on(frontier)) {
                    if let Some(posting) = &cursor.head {
                        ranker.update(&cursor.term, cursor.multiplicity, posting);
                    }
                }
                sieve.sift(ranker.evaluate(), frontier);
            }
            for cursor in active.iter_mut().filter(|c| c.is_on(frontier)) {
                cursor.advance();
            }
            active.retain(|c| c.head.is_some());
        }

        let hits: Vec<Hit<'a>> = sieve
            .winners()
            .into_iter()
            .filter_map(|(score, doc_id)| self.corpus.get_document(doc_id).map(|document| Hit { score, document }))
            .collect();
        tracing::debug!(query, unique_terms = m, required = n, candidates, hits = hits.len(), "evaluated query");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::InMemoryCorpus;
    use crate::index::InMemoryInvertedIndex;
    use crate::ranker::SimpleRanker;
    use crate::tokenizer::{SimpleNormalizer, SimpleTokenizer};

    fn corpus(texts: &[&str]) -> InMemoryCorpus {
        let mut corpus = InMemoryCorpus::new();
        for (i, text) in texts.iter().enumerate() {
            corpus.add_document(Document::from_pairs(i as DocId, [("body", *text)])).unwrap();
        }
        corpus
    }

    fn index(corpus: &InMemoryCorpus) -> InMemoryInvertedIndex {
        InMemoryInvertedIndex::new(corpus, &["body"], Box::new(SimpleNormalizer), Box::new(SimpleTokenizer), false)
            .unwrap()
    }

    fn run(corpus: &InMemoryCorpus, index: &InMemoryInvertedIndex, query: &str, threshold: f64) -> Vec<(f64, DocId)> {
        let engine = SimpleSearchEngine::new(corpus, index);
        let options = SearchOptions::new(threshold, 10).unwrap();
        engine
            .evaluate(query, &options, &mut SimpleRanker::new())
            .unwrap()
            .into_iter()
            .map(|h| (h.score, h.document.doc_id))
            .collect()
    }

    #[test]
    fn counts_terms_in_order() {
        let terms = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(count_terms(terms), vec![("b".to_string(), 2), ("a".to_string(), 1)]);
    }

    #[test]
    fn two_document_scenario() {
        let corpus = corpus(&["this is a test", "test test probe"]);
        let index = index(&corpus);
        assert_eq!(index.get_document_frequency("test"), 2);
        assert_eq!(run(&corpus, &index, "test", 1.0), vec![(2.0, 1), (1.0, 0)]);
    }

    #[test]
    fn empty_query_has_no_hits() {
        let corpus = corpus(&["alpha beta"]);
        let index = index(&corpus);
        assert!(run(&corpus, &index, "", 1.0).is_empty());
        assert!(run(&corpus, &index, "  ,;  ", 0.5).is_empty());
    }

    #[test]
    fn unknown_terms_still_count_towards_m() {
        let corpus = corpus(&["alpha beta", "alpha", "beta gamma"]);
        let index = index(&corpus);
        // M = 2, N = 2: "zeta" can never match.
        assert!(run(&corpus, &index, "alpha zeta", 1.0).is_empty());
        // N = 1.
        assert_eq!(run(&corpus, &index, "alpha zeta", 0.5).len(), 2);
    }

    #[test]
    fn and_or_extremes() {
        let corpus = corpus(&["a b", "a", "b", "c"]);
        let index = index(&corpus);
        let ids = |hits: Vec<(f64, DocId)>| {
            let mut ids: Vec<DocId> = hits.into_iter().map(|h| h.1).collect();
            ids.sort_unstable();
            ids
        };
        assert_eq!(ids(run(&corpus, &index, "a b", 1.0)), vec![0]);
        assert_eq!(ids(run(&corpus, &index, "a b", 0.5)), vec![0, 1, 2]);
    }

    #[test]
    fn duplicate_query_terms_fold_into_multiplicity() {
        let corpus = corpus(&["baj baj baj", "baj"]);
        let index = index(&corpus);
        assert_eq!(run(&corpus, &index, "baj BAJ    baj", 1.0), vec![(9.0, 0), (3.0, 1)]);
    }
}
