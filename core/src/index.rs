use std::collections::HashMap;

use crate::config::IndexConfig;
use crate::corpus::Corpus;
use crate::dictionary::InMemoryDictionary;
use crate::error::Result;
use crate::posting::{Posting, PostingList};
use crate::tokenizer::{Normalizer, SimpleTokenizer, Tokenizer};

pub type TermId = u32;
pub type DocId = u32;

/// A lazy pass over one term's postings.
pub type Postings<'a> = Box<dyn Iterator<Item = Posting> + 'a>;

/// Term lookup over an indexed corpus.
pub trait InvertedIndex {
    /// Normalized terms of `buffer`, processed exactly as indexed text is.
    fn get_terms(&self, buffer: &str) -> Vec<String>;

    /// Postings for `term`; empty for out-of-vocabulary terms.
    fn get_postings_iterator(&self, term: &str) -> Postings<'_>;

    /// Number of documents containing `term`.
    fn get_document_frequency(&self, term: &str) -> usize;

    fn contains(&self, term: &str) -> bool {
        self.get_document_frequency(term) > 0
    }
}

/// In-memory inverted index over a set of document fields.
pub struct InMemoryInvertedIndex {
    normalizer: Box<dyn Normalizer>,
    tokenizer: Box<dyn Tokenizer>,
    dictionary: InMemoryDictionary,
    posting_lists: Vec<PostingList>, // indexed by term id
    compressed: bool,
}

impl InMemoryInvertedIndex {
    pub fn new<C, S>(
        corpus: &C,
        fields: &[S],
        normalizer: Box<dyn Normalizer>,
        tokenizer: Box<dyn Tokenizer>,
        compressed: bool,
    ) -> Result<Self>
    where
        C: Corpus + ?Sized,
        S: AsRef<str>,
    {
        let mut index = Self {
            normalizer,
            tokenizer,
            dictionary: InMemoryDictionary::new(),
            posting_lists: Vec::new(),
            compressed,
        };
        index.build(corpus, fields)?;
        Ok(index)
    }

    pub fn from_config<C: Corpus + ?Sized>(corpus: &C, config: &IndexConfig) -> Result<Self> {
        Self::new(
            corpus,
            config.fields.as_slice(),
            config.normalizer.build(),
            Box::new(SimpleTokenizer),
            config.compressed,
        )
    }

    fn build<C, S>(&mut self, corpus: &C, fields: &[S]) -> Result<()>
    where
        C: Corpus + ?Sized,
        S: AsRef<str>,
    {
        // Documents arrive in increasing id order and each contributes at most
        // one posting per term, so every list stays sorted.
        let mut tf_counts: HashMap<TermId, u32> = HashMap::new();
        let mut documents = 0usize;
        for doc in corpus.iter() {
            for field in fields {
                let text = doc.text_field(field.as_ref());
                for term in self.get_terms(&text) {
                    let tid = self.dictionary.add_if_absent(&term);
                    *tf_counts.entry(tid).or_insert(0) += 1;
                }
            }
            let mut counted: Vec<(TermId, u32)> = tf_counts.drain().collect();
            counted.sort_unstable_by_key(|&(tid, _)| tid);
            for (tid, tf) in counted {
                while self.posting_lists.len() <= tid as usize {
                    self.posting_lists.push(PostingList::new(self.compressed));
                }
                self.posting_lists[tid as usize].append(Posting::new(doc.doc_id, tf))?;
            }
            documents += 1;
        }
        for list in self.posting_lists.iter_mut() {
            list.finalize()?;
        }
        tracing::info!(documents, terms = self.dictionary.len(), compressed = self.compressed, "index build complete");
        Ok(())
    }

    pub fn term_count(&self) -> usize {
        self.dictionary.len()
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// (term, document frequency) pairs in term id order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, usize)> {
        self.dictionary
            .iter()
            .map(move |(term, tid)| (term, self.posting_lists[tid as usize].len()))
    }

    pub fn dictionary(&self) -> &InMemoryDictionary {
        &self.dictionary
    }
}

impl InvertedIndex for InMemoryInvertedIndex {
    fn get_terms(&self, buffer: &str) -> Vec<String> {
        let normalized = self.normalizer.normalize(buffer);
        self.tokenizer.strings(&normalized).into_iter().map(str::to_string).collect()
    }

    fn get_postings_iterator(&self, term: &str) -> Postings<'_> {
        match self.dictionary.get_term_id(term) {
            Some(tid) => Box::new(self.posting_lists[tid as usize].iter()),
            None => Box::new(std::iter::empty()),
        }
    }

    fn get_document_frequency(&self, term: &str) -> usize {
        self.dictionary
            .get_term_id(term)
            .map_or(0, |tid| self.posting_lists[tid as usize].len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Document, InMemoryCorpus};
    use crate::tokenizer::SimpleNormalizer;

    fn index(corpus: &InMemoryCorpus, fields: &[&str], compressed: bool) -> InMemoryInvertedIndex {
        InMemoryInvertedIndex::new(corpus, fields, Box::new(SimpleNormalizer), Box::new(SimpleTokenizer), compressed)
            .unwrap()
    }

    fn pairs(index: &InMemoryInvertedIndex, term: &str) -> Vec<(DocId, u32)> {
        index.get_postings_iterator(term).map(|p| (p.doc_id, p.term_frequency)).collect()
    }

    #[test]
    fn access_postings() {
        for compressed in [false, true] {
            let mut corpus = InMemoryCorpus::new();
            corpus.add_document(Document::from_pairs(0, [("body", "this is a Test")])).unwrap();
            corpus.add_document(Document::from_pairs(1, [("body", "test TEST prØve")])).unwrap();
            let index = index(&corpus, &["body"], compressed);
            assert_eq!(index.get_terms("PRøvE wtf tesT"), vec!["prøve", "wtf", "test"]);
            assert_eq!(pairs(&index, "prøve"), vec![(1, 1)]);
            assert_eq!(pairs(&index, "wtf"), Vec::<(DocId, u32)>::new());
            assert_eq!(pairs(&index, "test"), vec![(0, 1), (1, 2)]);
            assert_eq!(index.get_document_frequency("wtf"), 0);
            assert_eq!(index.get_document_frequency("prøve"), 1);
            assert_eq!(index.get_document_frequency("test"), 2);
            assert!(index.contains("test"));
            assert!(!index.contains("wtf"));
        }
    }

    #[test]
    fn multiple_fields() {
        let mut corpus = InMemoryCorpus::new();
        corpus
            .add_document(Document::from_pairs(
                0,
                [
                    ("felt1", "Dette er en test. Test, sa jeg. TEST!"),
                    ("felt2", "test er det"),
                    ("felt3", "test TEsT"),
                ],
            ))
            .unwrap();
        let index = index(&corpus, &["felt1", "felt3"], false);
        let posting = index.get_postings_iterator("test").next().unwrap();
        assert_eq!(posting.doc_id, 0);
        assert_eq!(posting.term_frequency, 5);
    }

    #[test]
    fn missing_field_is_empty() {
        let mut corpus = InMemoryCorpus::new();
        corpus.add_document(Document::from_pairs(0, [("title", "alpha")])).unwrap();
        corpus.add_document(Document::from_pairs(1, [("body", "alpha beta")])).unwrap();
        let index = index(&corpus, &["body"], true);
        assert_eq!(pairs(&index, "alpha"), vec![(1, 1)]);
        assert_eq!(index.term_count(), 2);
    }

    #[test]
    fn every_term_has_a_non_empty_list() {
        let mut corpus = InMemoryCorpus::new();
        for (i, text) in ["a b c", "b c d", "", "d e"].iter().enumerate() {
            corpus.add_document(Document::from_pairs(i as DocId, [("body", *text)])).unwrap();
        }
        let index = index(&corpus, &["body"], false);
        let terms: Vec<(&str, usize)> = index.terms().collect();
        assert_eq!(terms, vec![("a", 1), ("b", 2), ("c", 2), ("d", 2), ("e", 1)]);
    }

    #[test]
    fn empty_corpus() {
        let corpus = InMemoryCorpus::new();
        let index = index(&corpus, &["body"], true);
        assert_eq!(index.term_count(), 0);
        assert_eq!(index.get_postings_iterator("x").count(), 0);
    }
}
