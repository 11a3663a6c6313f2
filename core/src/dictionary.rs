use std::collections::HashMap;

use crate::TermId;

/// Maps terms to dense ids, assigned first-come first-served.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDictionary {
    ids: HashMap<String, TermId>,
    terms: Vec<String>,
}

impl InMemoryDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the term's id, assigning the next free one if the term is new.
    pub fn add_if_absent(&mut self, term: &str) -> TermId {
        if let Some(&id) = self.ids.get(term) {
            return id;
        }
        let id = self.terms.len() as TermId;
        self.ids.insert(term.to_string(), id);
        self.terms.push(term.to_string());
        id
    }

    pub fn get_term_id(&self, term: &str) -> Option<TermId> {
        self.ids.get(term).copied()
    }

    pub fn get_term(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// (term, id) pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TermId)> {
        self.terms.iter().enumerate().map(|(id, t)| (t.as_str(), id as TermId))
    }
}
