//! Candidate location and n-gram filtration.
//!
//! Location walks a query's n-gram multiset over the partition index and
//! merge-counts shared grams per candidate, capping each gram's contribution
//! at the candidate's multiplicity. Only candidates with a smaller global id
//! than the query are produced, so every unordered pair is considered
//! exactly once across the whole run.

use ahash::AHashMap;

use crate::detectors::index::PartitionIndex;
use crate::detectors::ngram::NgramSet;

/// Per-thread scratch for the location phase; cleared between queries
/// instead of reallocated.
#[derive(Debug, Default)]
pub struct LocationScratch {
    shared: AHashMap<u32, u32>,
}

impl LocationScratch {
    /// Create an empty scratch map.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Locate clone candidates for a query sequence.
///
/// Returns `(candidate_global_id, shared_gram_count)` pairs with
/// `candidate < query_id`, ascending by candidate id.
pub fn locate(
    index: &PartitionIndex,
    query: &NgramSet,
    query_id: u32,
    scratch: &mut LocationScratch,
) -> Vec<(u32, u32)> {
    scratch.shared.clear();

    for &(hash, query_multiplicity) in query.grams() {
        let postings = index.postings(hash);
        let mut i = 0;
        while i < postings.len() {
            let local = postings[i];
            let mut multiplicity = 1u32;
            while i + (multiplicity as usize) < postings.len()
                && postings[i + multiplicity as usize] == local
            {
                multiplicity += 1;
            }
            i += multiplicity as usize;

            let candidate = index.start() + local;
            if candidate < query_id {
                *scratch.shared.entry(candidate).or_insert(0) +=
                    query_multiplicity.min(multiplicity);
            }
        }
    }

    let mut candidates: Vec<(u32, u32)> = scratch
        .shared
        .iter()
        .map(|(&candidate, &shared)| (candidate, shared))
        .collect();
    candidates.sort_unstable_by_key(|&(candidate, _)| candidate);
    candidates
}

/// N-gram similarity as an integer percentage.
///
/// The denominator is the smaller multiset so the metric stays directly
/// comparable with the LCS ratio, which divides by the shorter sequence.
pub fn ngram_similarity(shared: u32, query_grams: u32, candidate_grams: u32) -> u32 {
    let smaller = query_grams.min(candidate_grams);
    if smaller == 0 {
        return 0;
    }
    ((u64::from(shared) * 100) / u64::from(smaller)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::corpus::synthetic_corpus;
    use crate::detectors::index::PartitionIndex;

    fn locate_against(
        corpus_tokens: &[&[u32]],
        start: usize,
        size: usize,
        query_tokens: &[u32],
        query_id: u32,
        gram_size: usize,
    ) -> Vec<(u32, u32)> {
        let corpus = synthetic_corpus(corpus_tokens);
        let index = PartitionIndex::build(&corpus, start, size, gram_size);
        let query = NgramSet::build(query_tokens, gram_size);
        let mut scratch = LocationScratch::new();
        locate(&index, &query, query_id, &mut scratch)
    }

    #[test]
    fn counts_shared_grams_per_candidate() {
        // Query [1,2,3,6,7] shares the 2-grams (1,2) and (2,3) with id 0
        let candidates = locate_against(
            &[&[1, 2, 3, 4, 5], &[1, 2, 3, 6, 7]],
            0,
            2,
            &[1, 2, 3, 6, 7],
            1,
            2,
        );
        assert_eq!(candidates, vec![(0, 2)]);
    }

    #[test]
    fn query_never_matches_itself_or_larger_ids() {
        // Index holds ids 0..3; query id 1 must only see id 0
        let candidates = locate_against(
            &[&[1, 2, 3], &[1, 2, 3], &[1, 2, 3]],
            0,
            3,
            &[1, 2, 3],
            1,
            2,
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].0, 0);
    }

    #[test]
    fn shared_count_caps_at_candidate_multiplicity() {
        // Query has (9,9) four times; candidate 0 only twice
        let candidates = locate_against(
            &[&[9, 9, 9], &[0, 0, 0]],
            0,
            2,
            &[9, 9, 9, 9, 9],
            1,
            2,
        );
        assert_eq!(candidates, vec![(0, 2)]);
    }

    #[test]
    fn candidates_come_back_ascending() {
        let candidates = locate_against(
            &[&[1, 2, 3], &[7, 7, 7], &[1, 2, 3], &[1, 2, 3]],
            0,
            4,
            &[1, 2, 3],
            3,
            2,
        );
        assert_eq!(
            candidates.iter().map(|c| c.0).collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[test]
    fn scratch_is_reusable_across_queries() {
        let corpus = synthetic_corpus(&[&[1, 2, 3], &[1, 2, 3]]);
        let index = PartitionIndex::build(&corpus, 0, 2, 2);
        let mut scratch = LocationScratch::new();

        let query = NgramSet::build(&[1, 2, 3], 2);
        let first = locate(&index, &query, 1, &mut scratch);
        let second = locate(&index, &query, 1, &mut scratch);
        assert_eq!(first, second);
    }

    #[test]
    fn similarity_is_floor_percentage_of_smaller_side() {
        assert_eq!(ngram_similarity(2, 4, 4), 50);
        assert_eq!(ngram_similarity(3, 7, 7), 42);
        assert_eq!(ngram_similarity(4, 4, 9), 100);
        assert_eq!(ngram_similarity(0, 4, 4), 0);
        assert_eq!(ngram_similarity(0, 0, 0), 0);
    }
}
