//! Partition-scoped inverted n-gram index.
//!
//! The index maps each n-gram hash to its posting list: partition-local
//! sequence ids in ascending order, with one entry per occurrence so
//! multiplicity is preserved. The flat postings array plus an offset/length
//! table avoids per-bucket allocation during the location phase.
//!
//! Partitioning is what bounds peak memory: one iteration only ever holds
//! the postings of `partition_size` sequences.

use ahash::AHashMap;

use crate::core::corpus::Corpus;
use crate::detectors::ngram::window_hashes;

/// Inverted index over the sequences of one partition `[start, start+size)`.
#[derive(Debug)]
pub struct PartitionIndex {
    /// Global id of the first sequence in the partition
    start: u32,

    /// Flat posting entries: partition-local ids, ascending, duplicates
    /// encode multiplicity
    postings: Vec<u32>,

    /// N-gram hash to (offset, length) into `postings`
    buckets: AHashMap<u64, (u32, u32)>,
}

impl PartitionIndex {
    /// Build the index for the partition starting at `start`, covering at
    /// most `size` sequences.
    pub fn build(corpus: &Corpus, start: usize, size: usize, gram_size: usize) -> Self {
        let end = start.saturating_add(size).min(corpus.len());

        let mut accumulator: AHashMap<u64, Vec<u32>> = AHashMap::new();
        for id in start..end {
            let local = (id - start) as u32;
            for hash in window_hashes(corpus.tokens_of(id), gram_size) {
                accumulator.entry(hash).or_default().push(local);
            }
        }

        let total: usize = accumulator.values().map(Vec::len).sum();
        let mut postings = Vec::with_capacity(total);
        let mut buckets = AHashMap::with_capacity(accumulator.len());
        for (hash, ids) in accumulator {
            buckets.insert(hash, (postings.len() as u32, ids.len() as u32));
            postings.extend(ids);
        }

        Self {
            start: start as u32,
            postings,
            buckets,
        }
    }

    /// Global id of the partition's first sequence.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Posting list for an n-gram hash; empty when absent.
    pub fn postings(&self, hash: u64) -> &[u32] {
        match self.buckets.get(&hash) {
            Some(&(offset, len)) => &self.postings[offset as usize..(offset + len) as usize],
            None => &[],
        }
    }

    /// Whether no sequence in the partition produced a gram.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
