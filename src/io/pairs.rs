//! Clone-pair file writer.
//!
//! One accepted pair per line, UTF-8, LF-terminated:
//!
//! ```text
//! id1,id2,ngramSim[,lcsSim]
//! ```
//!
//! `lcsSim` is absent (no trailing comma) when the pair was accepted via the
//! fast path. `id1 < id2` always holds.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::errors::{DraupnirError, Result};

/// One accepted clone pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClonePair {
    /// Smaller sequence id
    pub id1: u32,

    /// Larger sequence id
    pub id2: u32,

    /// N-gram similarity percentage
    pub ngram_similarity: u32,

    /// LCS similarity percentage; `None` when the fast path accepted
    pub lcs_similarity: Option<u32>,
}

/// Buffered append-only writer for the pair file.
pub struct PairWriter {
    writer: BufWriter<File>,
    pairs: u64,
}

impl PairWriter {
    /// Create (truncate) the pair file.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|err| {
            DraupnirError::io(
                format!("cannot create pair file '{}'", path.display()),
                err,
            )
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            pairs: 0,
        })
    }

    /// Append one pair line.
    pub fn write_pair(&mut self, pair: &ClonePair) -> Result<()> {
        debug_assert!(pair.id1 < pair.id2);
        let result = match pair.lcs_similarity {
            Some(lcs) => writeln!(
                self.writer,
                "{},{},{},{}",
                pair.id1, pair.id2, pair.ngram_similarity, lcs
            ),
            None => writeln!(
                self.writer,
                "{},{},{}",
                pair.id1, pair.id2, pair.ngram_similarity
            ),
        };
        result.map_err(|err| DraupnirError::io("failed to write pair record", err))?;
        self.pairs += 1;
        Ok(())
    }

    /// Pairs written so far.
    pub fn pairs(&self) -> u64 {
        self.pairs
    }

    /// Flush and close the file.
    pub fn finish(mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|err| DraupnirError::io("failed to flush pair file", err))
    }
}
