//! Merging of posting streams sorted by document id.
//!
//! Both operators return lazy iterators whose output is itself sorted, so
//! they chain: `union(intersection(a, b), c)`. When both inputs hold the
//! same document, the posting from the first input is surfaced.

use std::cmp::Ordering;

use crate::posting::Posting;

/// Postings whose documents occur in both inputs.
pub fn intersection<A, B>(a: A, b: B) -> Intersection<A::IntoIter, B::IntoIter>
where
    A: IntoIterator<Item = Posting>,
    B: IntoIterator<Item = Posting>,
{
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    let current_a = a.next();
    let current_b = b.next();
    Intersection { a, b, current_a, current_b }
}

/// Postings whose documents occur in either input, without duplicates.
pub fn union<A, B>(a: A, b: B) -> Union<A::IntoIter, B::IntoIter>
where
    A: IntoIterator<Item = Posting>,
    B: IntoIterator<Item = Posting>,
{
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    let current_a = a.next();
    let current_b = b.next();
    Union { a, b, current_a, current_b }
}

pub struct Intersection<A, B> {
    a: A,
    b: B,
    current_a: Option<Posting>,
    current_b: Option<Posting>,
}

impl<A, B> Iterator for Intersection<A, B>
where
    A: Iterator<Item = Posting>,
    B: Iterator<Item = Posting>,
{
    type Item = Posting;

    fn next(&mut self) -> Option<Posting> {
        // Either side running dry ends the AND.
        while let (Some(pa), Some(pb)) = (self.current_a, self.current_b) {
            match pa.doc_id.cmp(&pb.doc_id) {
                Ordering::Equal => {
                    self.current_a = self.a.next();
                    self.current_b = self.b.next();
                    return Some(pa);
                }
                Ordering::Less => self.current_a = self.a.next(),
                Ordering::Greater => self.current_b = self.b.next(),
            }
        }
        None
    }
}

pub struct Union<A, B> {
    a: A,
    b: B,
    current_a: Option<Posting>,
    current_b: Option<Posting>,
}

impl<A, B> Iterator for Union<A, B>
where
    A: Iterator<Item = Posting>,
    B: Iterator<Item = Posting>,
{
    type Item = Posting;

    fn next(&mut self) -> Option<Posting> {
        match (self.current_a, self.current_b) {
            (Some(pa), Some(pb)) => match pa.doc_id.cmp(&pb.doc_id) {
                Ordering::Equal => {
                    self.current_a = self.a.next();
                    self.current_b = self.b.next();
                    Some(pa)
                }
                Ordering::Less => {
                    self.current_a = self.a.next();
                    Some(pa)
                }
                Ordering::Greater => {
                    self.current_b = self.b.next();
                    Some(pb)
                }
            },
            (Some(pa), None) => {
                self.current_a = self.a.next();
                Some(pa)
            }
            (None, Some(pb)) => {
                self.current_b = self.b.next();
                Some(pb)
            }
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocId;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn postings(ids: &[DocId], tf: u32) -> Vec<Posting> {
        ids.iter().map(|&d| Posting::new(d, tf)).collect()
    }

    fn ids(it: impl Iterator<Item = Posting>) -> Vec<DocId> {
        it.map(|p| p.doc_id).collect()
    }

    #[test]
    fn intersection_basic() {
        let a = postings(&[1, 3, 5, 7, 9], 1);
        let b = postings(&[2, 3, 4, 7, 10], 2);
        assert_eq!(ids(intersection(a.clone(), b)), vec![3, 7]);
        assert_eq!(ids(intersection(a, Vec::new())), Vec::<DocId>::new());
    }

    #[test]
    fn union_basic() {
        let a = postings(&[1, 3, 5], 1);
        let b = postings(&[2, 3, 8, 9], 2);
        assert_eq!(ids(union(a, b.clone())), vec![1, 2, 3, 5, 8, 9]);
        assert_eq!(ids(union(Vec::new(), b)), vec![2, 3, 8, 9]);
    }

    #[test]
    fn first_input_wins_ties() {
        let a = postings(&[4], 1);
        let b = postings(&[4], 2);
        assert_eq!(intersection(a.clone(), b.clone()).next(), Some(Posting::new(4, 1)));
        assert_eq!(union(b, a).next(), Some(Posting::new(4, 2)));
    }

    #[test]
    fn operators_chain() {
        let a = postings(&[1, 2, 3, 4], 1);
        let b = postings(&[2, 4, 6], 1);
        let c = postings(&[5, 6], 1);
        assert_eq!(ids(union(intersection(a, b), c)), vec![2, 4, 5, 6]);
    }

    proptest! {
        #[test]
        fn merges_agree_with_sets(
            a in prop::collection::btree_set(0u32..500, 0..80),
            b in prop::collection::btree_set(0u32..500, 0..80),
        ) {
            let pa: Vec<Posting> = a.iter().map(|&d| Posting::new(d, 1)).collect();
            let pb: Vec<Posting> = b.iter().map(|&d| Posting::new(d, 1)).collect();
            let and: Vec<DocId> = a.intersection(&b).copied().collect();
            let or: Vec<DocId> = a.union(&b).copied().collect::<BTreeSet<_>>().into_iter().collect();
            prop_assert_eq!(ids(intersection(pa.clone(), pb.clone())), and);
            prop_assert_eq!(ids(union(pa, pb)), or);
        }
    }
}
