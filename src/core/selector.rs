//! Candidate selection: least waste first, then fewest packages.

use super::candidate::Candidate;
use crate::error::{PackError, Result};

/// Ranking key of a terminal candidate. Smaller is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SelectionKey {
    pub waste: i128,
    pub count: u64,
}

impl SelectionKey {
    #[must_use]
    pub fn of(candidate: &Candidate, order: u64) -> Self {
        Self {
            waste: candidate.waste(order),
            count: candidate.count(),
        }
    }
}

/// Pick the candidate with the smallest `(waste, count)`.
///
/// Ties beyond that go to the candidate recorded first.
pub fn select(candidates: &[Candidate], order: u64) -> Result<&Candidate> {
    candidates
        .iter()
        .min_by_key(|candidate| SelectionKey::of(candidate, order))
        .ok_or(PackError::NoCandidatesFound { order })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_an_error() {
        let err = select(&[], 10).unwrap_err();
        assert!(matches!(err, PackError::NoCandidatesFound { order: 10 }));
    }

    #[test]
    fn least_waste_wins() {
        let candidates = vec![
            Candidate::from_pairs([(1000, 1)]),
            Candidate::from_pairs([(500, 1)]),
            Candidate::from_pairs([(5000, 1)]),
        ];
        let winner = select(&candidates, 251).unwrap();
        assert_eq!(winner, &Candidate::from_pairs([(500, 1)]));
    }

    #[test]
    fn equal_waste_prefers_fewer_packages() {
        let candidates = vec![
            Candidate::from_pairs([(250, 2)]),
            Candidate::from_pairs([(500, 1)]),
        ];
        let winner = select(&candidates, 251).unwrap();
        assert_eq!(winner, &Candidate::from_pairs([(500, 1)]));
        assert_eq!(SelectionKey::of(winner, 251), SelectionKey { waste: 249, count: 1 });
    }

    #[test]
    fn full_tie_keeps_first_recorded() {
        let candidates = vec![
            Candidate::from_pairs([(3, 1), (2, 1)]),
            Candidate::from_pairs([(4, 1), (1, 1)]),
        ];
        let winner = select(&candidates, 5).unwrap();
        assert_eq!(winner, &candidates[0]);
    }

    #[test]
    fn key_orders_waste_before_count() {
        let low_waste = SelectionKey { waste: 0, count: 9 };
        let high_waste = SelectionKey { waste: 1, count: 1 };
        assert!(low_waste < high_waste);
    }
}
