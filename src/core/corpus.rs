//! Token-sequence corpus shared across detection phases.
//!
//! The corpus is produced once by the preprocessor, frozen, and then read by
//! every worker in every partition iteration. Sequence ids are dense, start
//! at 0, and equal the sequence's position in the corpus.

use std::path::PathBuf;

/// A function-level token sequence produced by the preprocessor.
#[derive(Debug, Clone)]
pub struct TokenSequence {
    /// Dense id; equals the sequence's position in the corpus
    pub id: u32,

    /// Canonical path of the file the function was extracted from
    pub file_path: PathBuf,

    /// First line of the function (1-indexed, inclusive)
    pub start_line: usize,

    /// Last line of the function (1-indexed, inclusive)
    pub end_line: usize,

    /// Normalized token hashes in source order
    pub tokens: Vec<u32>,
}

impl TokenSequence {
    /// Number of source lines the function spans.
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// Frozen, ordered collection of all token sequences in a run.
#[derive(Debug, Default)]
pub struct Corpus {
    sequences: Vec<TokenSequence>,
}

impl Corpus {
    /// Freeze a list of sequences into a corpus.
    ///
    /// Sequence ids must match their positions; the preprocessor guarantees
    /// this by assigning ids as it merges.
    pub fn new(sequences: Vec<TokenSequence>) -> Self {
        debug_assert!(sequences
            .iter()
            .enumerate()
            .all(|(idx, seq)| seq.id as usize == idx));
        Self { sequences }
    }

    /// Total number of sequences.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Whether the corpus holds no sequences.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Sequence by id.
    pub fn get(&self, id: usize) -> &TokenSequence {
        &self.sequences[id]
    }

    /// Token slice of a sequence by id.
    pub fn tokens_of(&self, id: usize) -> &[u32] {
        &self.sequences[id].tokens
    }

    /// Iterate over all sequences in id order.
    pub fn iter(&self) -> impl Iterator<Item = &TokenSequence> {
        self.sequences.iter()
    }
}

#[cfg(test)]
pub(crate) fn synthetic_corpus(token_lists: &[&[u32]]) -> Corpus {
    let sequences = token_lists
        .iter()
        .enumerate()
        .map(|(id, tokens)| TokenSequence {
            id: id as u32,
            file_path: PathBuf::from(format!("synthetic/{id}.java")),
            start_line: 1,
            end_line: tokens.len().max(1),
            tokens: tokens.to_vec(),
        })
        .collect();
    Corpus::new(sequences)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_positions() {
        let corpus = synthetic_corpus(&[&[1, 2, 3], &[4, 5]]);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0).id, 0);
        assert_eq!(corpus.get(1).id, 1);
        assert_eq!(corpus.tokens_of(1), &[4, 5]);
    }

    #[test]
    fn line_count_is_inclusive() {
        let seq = TokenSequence {
            id: 0,
            file_path: PathBuf::from("a.java"),
            start_line: 10,
            end_line: 15,
            tokens: vec![1],
        };
        assert_eq!(seq.line_count(), 6);
    }
}
