//! Code-blocks snapshot writer.
//!
//! One line per accepted token sequence, index-aligned to the sequence id
//! (line K, 1-based, describes id K−1):
//!
//! ```text
//! filePath,startLine,endLine,methodName,returnType,[paramList],commitHash,tokenHash
//! ```
//!
//! The detector treats this file as write-only side output; the
//! post-processor joins pair ids against it to produce human-readable rows.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::errors::{DraupnirError, Result};
use crate::lang::common::FunctionSpan;
use crate::lang::normalizer;

/// Buffered writer for the code-blocks file.
pub struct CodeBlockWriter {
    writer: BufWriter<File>,
    lines: u64,
}

impl CodeBlockWriter {
    /// Create (truncate) the code-blocks file.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|err| {
            DraupnirError::io(
                format!("cannot create code-blocks file '{}'", path.display()),
                err,
            )
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    /// Append one record; must be called in sequence-id order.
    pub fn write_block(&mut self, file_path: &Path, span: &FunctionSpan, commit: &str) -> Result<()> {
        let token_hash = normalizer::sequence_hash(&span.tokens);
        writeln!(
            self.writer,
            "{},{},{},{},{},[{}],{},{:016x}",
            file_path.display(),
            span.start_line,
            span.end_line,
            span.metadata.name,
            span.metadata.return_type,
            span.metadata.parameters,
            commit,
            token_hash,
        )
        .map_err(|err| DraupnirError::io("failed to write code-blocks record", err))?;
        self.lines += 1;
        Ok(())
    }

    /// Records written so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Flush and close the file.
    pub fn finish(mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|err| DraupnirError::io("failed to flush code-blocks file", err))
    }
}
