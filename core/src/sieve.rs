//! Bounded top-k selection over a stream of scored payloads.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::error::{Error, Result};

/// Keeps the `capacity` highest-scoring entries offered to it.
///
/// Backed by a min-heap of at most `capacity` entries, so each `sift` costs
/// O(log k). On equal scores the entry offered first ranks higher: a later
/// entry never evicts an earlier one with the same score.
#[derive(Debug)]
pub struct Sieve<T> {
    capacity: usize,
    heap: BinaryHeap<Reverse<Entry<T>>>,
    offered: u64,
}

#[derive(Debug)]
struct Entry<T> {
    score: OrderedFloat<f64>,
    sequence: u64,
    payload: T,
}

// Greater means better: higher score, then earlier offer.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Sieve<T> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self { capacity, heap: BinaryHeap::with_capacity(capacity + 1), offered: 0 })
    }

    pub fn sift(&mut self, score: f64, payload: T) {
        let entry = Entry { score: OrderedFloat(score), sequence: self.offered, payload };
        self.offered += 1;
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(entry));
            return;
        }
        if let Some(mut worst) = self.heap.peek_mut() {
            if entry.score > worst.0.score {
                *worst = Reverse(entry);
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Lowest retained score, once the sieve is full.
    pub fn threshold(&self) -> Option<f64> {
        if self.heap.len() < self.capacity {
            return None;
        }
        self.heap.peek().map(|e| e.0.score.into_inner())
    }

    /// Retained entries, best first.
    pub fn winners(self) -> Vec<(f64, T)> {
        // Ascending order over Reverse is descending over entries.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(e)| (e.score.into_inner(), e.payload))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sifting() {
        let mut sieve = Sieve::new(3).unwrap();
        let names = ["one", "ten", "nine", "two", "five", "eight", "seven", "six", "three", "four"];
        let scores = [1.0, 10.0, 9.0, 2.0, 5.0, 8.0, 7.0, 6.0, 3.0, 4.0];
        for (score, name) in scores.iter().zip(names) {
            sieve.sift(*score, name);
        }
        assert_eq!(sieve.threshold(), Some(8.0));
        assert_eq!(sieve.winners(), vec![(10.0, "ten"), (9.0, "nine"), (8.0, "eight")]);
    }

    #[test]
    fn invalid_size() {
        assert!(matches!(Sieve::<u32>::new(0), Err(Error::InvalidCapacity(0))));
    }

    #[test]
    fn empty_sieve() {
        let sieve = Sieve::<&str>::new(3).unwrap();
        assert!(sieve.is_empty());
        assert_eq!(sieve.threshold(), None);
        assert!(sieve.winners().is_empty());
    }

    #[test]
    fn earlier_entry_wins_ties() {
        let mut sieve = Sieve::new(2).unwrap();
        sieve.sift(1.0, "a");
        sieve.sift(1.0, "b");
        sieve.sift(1.0, "c");
        sieve.sift(0.5, "d");
        assert_eq!(sieve.winners(), vec![(1.0, "a"), (1.0, "b")]);
    }

    #[test]
    fn a_better_score_evicts_the_latest_tie() {
        let mut sieve = Sieve::new(2).unwrap();
        sieve.sift(1.0, "a");
        sieve.sift(1.0, "b");
        sieve.sift(2.0, "c");
        assert_eq!(sieve.winners(), vec![(2.0, "c"), (1.0, "a")]);
    }

    proptest! {
        #[test]
        fn keeps_true_top_k(
            scores in prop::collection::vec(-1000i32..1000, 0..300),
            capacity in 1usize..20,
        ) {
            let mut sieve = Sieve::new(capacity).unwrap();
            for (i, &s) in scores.iter().enumerate() {
                sieve.sift(s as f64, i);
                prop_assert!(sieve.len() <= capacity);
            }
            let winners = sieve.winners();
            prop_assert_eq!(winners.len(), capacity.min(scores.len()));
            prop_assert!(winners.windows(2).all(|w| w[0].0 >= w[1].0));
            for (score, i) in &winners {
                prop_assert_eq!(*score, scores[*i] as f64);
            }

            let mut expected: Vec<f64> = scores.iter().map(|&s| s as f64).collect();
            expected.sort_by(|a, b| b.partial_cmp(a).unwrap());
            expected.truncate(capacity);
            let got: Vec<f64> = winners.iter().map(|w| w.0).collect();
            prop_assert_eq!(got, expected);
        }
    }
}
