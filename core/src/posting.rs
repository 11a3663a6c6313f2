//! Postings and posting lists.
//!
//! A posting list holds the postings of exactly one term, sorted by strictly
//! increasing document id. Two representations share the [`PostingList`]
//! contract: plain postings, and a variable-byte coded stream of document id
//! gaps and term frequencies that is decoded lazily on iteration.

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{Error, Result};
use crate::DocId;

/// A (document, term frequency) entry in a non-positional inverted index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_frequency: u32,
}

impl Posting {
    pub fn new(doc_id: DocId, term_frequency: u32) -> Self {
        Self { doc_id, term_frequency }
    }
}

/// Postings stored as-is.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPostingList {
    postings: Vec<Posting>,
}

impl InMemoryPostingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, posting: Posting) -> Result<()> {
        if let Some(last) = self.postings.last() {
            if posting.doc_id <= last.doc_id {
                return Err(Error::NonMonotonicPosting { last: last.doc_id, got: posting.doc_id });
            }
        }
        self.postings.push(posting);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, Posting>> {
        self.postings.iter().copied()
    }
}

/// Postings stored as a byte stream: per posting, the gap to the previous
/// document id (the first against 0) followed by the term frequency.
///
/// Must be finalized once after the last append and before iteration.
#[derive(Debug, Default, Clone)]
pub struct CompressedPostingList {
    bytes: Vec<u8>,
    len: usize,
    last_doc_id: Option<DocId>,
    finalized: bool,
}

impl CompressedPostingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, posting: Posting) -> Result<()> {
        if self.finalized {
            return Err(Error::PostingListFinalized);
        }
        let gap = match self.last_doc_id {
            Some(last) if posting.doc_id <= last => {
                return Err(Error::NonMonotonicPosting { last, got: posting.doc_id });
            }
            Some(last) => posting.doc_id - last,
            None => posting.doc_id,
        };
        codec::encode(gap, &mut self.bytes);
        codec::encode(posting.term_frequency, &mut self.bytes);
        self.last_doc_id = Some(posting.doc_id);
        self.len += 1;
        Ok(())
    }

    pub fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Err(Error::PostingListFinalized);
        }
        self.bytes.shrink_to_fit();
        self.finalized = true;
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the encoded stream in bytes.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// # Panics
    ///
    /// Panics if the list has not been finalized.
    pub fn iter(&self) -> CompressedPostings<'_> {
        assert!(self.finalized, "compressed posting list iterated before finalize");
        CompressedPostings { bytes: &self.bytes, pos: 0, doc_id: 0 }
    }
}

/// Lazy decoder over a [`CompressedPostingList`].
#[derive(Debug, Clone)]
pub struct CompressedPostings<'a> {
    bytes: &'a [u8],
    pos: usize,
    doc_id: DocId,
}

impl<'a> Iterator for CompressedPostings<'a> {
    type Item = Posting;

    fn next(&mut self) -> Option<Posting> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let gap = codec::decode(self.bytes, &mut self.pos)?;
        let term_frequency = codec::decode(self.bytes, &mut self.pos)?;
        self.doc_id += gap;
        Some(Posting { doc_id: self.doc_id, term_frequency })
    }
}

/// A posting list in either representation.
#[derive(Debug, Clone)]
pub enum PostingList {
    Plain(InMemoryPostingList),
    Compressed(CompressedPostingList),
}

impl PostingList {
    pub fn new(compressed: bool) -> Self {
        if compressed {
            PostingList::Compressed(CompressedPostingList::new())
        } else {
            PostingList::Plain(InMemoryPostingList::new())
        }
    }

    /// The posting's document id must exceed the last appended one.
    pub fn append(&mut self, posting: Posting) -> Result<()> {
        match self {
            PostingList::Plain(list) => list.append(posting),
            PostingList::Compressed(list) => list.append(posting),
        }
    }

    /// Seals a compressed list; a no-op for plain lists.
    pub fn finalize(&mut self) -> Result<()> {
        match self {
            PostingList::Plain(_) => Ok(()),
            PostingList::Compressed(list) => list.finalize(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PostingList::Plain(list) => list.len(),
            PostingList::Compressed(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A fresh forward-only pass over the postings in document order.
    pub fn iter(&self) -> PostingListIter<'_> {
        match self {
            PostingList::Plain(list) => PostingListIter::Plain(list.iter()),
            PostingList::Compressed(list) => PostingListIter::Compressed(list.iter()),
        }
    }
}

pub enum PostingListIter<'a> {
    Plain(std::iter::Copied<std::slice::Iter<'a, Posting>>),
    Compressed(CompressedPostings<'a>),
}

impl<'a> Iterator for PostingListIter<'a> {
    type Item = Posting;

    fn next(&mut self) -> Option<Posting> {
        match self {
            PostingListIter::Plain(it) => it.next(),
            PostingListIter::Compressed(it) => it.next(),
        }
    }
}
