//! Function-granularity preprocessing of a source tree.
//!
//! Enumerates source files in deterministic walk order, tokenizes them in
//! parallel, then merges the results sequentially: files in walk order,
//! functions in source order. Dense sequence ids are assigned during the
//! merge, and every accepted function is persisted as one code-blocks
//! record.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::core::config::DetectionConfig;
use crate::core::corpus::{Corpus, TokenSequence};
use crate::core::errors::{DraupnirError, Result};
use crate::io::code_blocks::CodeBlockWriter;
use crate::lang::common::FunctionSpan;
use crate::lang::registry::{self, LanguageInfo};

/// Counters reported after preprocessing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreprocessStats {
    /// Source files matching the language extensions
    pub files: usize,

    /// Files skipped because their parse failed
    pub skipped_files: usize,

    /// Functions below the minimum line or token thresholds
    pub skipped_functions: usize,

    /// Accepted token sequences
    pub sequences: usize,
}

/// Preprocessing stage: source tree in, frozen corpus out.
pub struct Preprocessor {
    config: Arc<DetectionConfig>,
}

impl Preprocessor {
    /// Create a preprocessor for the given configuration.
    pub fn new(config: Arc<DetectionConfig>) -> Self {
        Self { config }
    }

    /// Tokenize every function under `root` and persist the code-blocks file.
    pub fn run(&self, root: &Path, code_blocks_path: &Path) -> Result<(Corpus, PreprocessStats)> {
        let root = fs::canonicalize(root).map_err(|err| {
            DraupnirError::source(
                format!("cannot read source root '{}'", root.display()),
                err,
            )
        })?;

        let info = registry::language_info(&self.config.language).ok_or_else(|| {
            DraupnirError::config_field(
                format!("unknown language '{}'", self.config.language),
                "language",
            )
        })?;

        let files = discover_files(&root, info);
        info!(
            files = files.len(),
            language = info.key,
            "discovered source files"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.effective_threads())
            .build()
            .map_err(|err| DraupnirError::internal(format!("failed to build thread pool: {err}")))?;

        let language = self.config.language.clone();
        let per_file: Vec<(PathBuf, Result<Vec<FunctionSpan>>)> = pool.install(|| {
            files
                .into_par_iter()
                .map(|path| {
                    let spans = tokenize_file(&path, &language);
                    (path, spans)
                })
                .collect()
        });

        let commit = head_commit_hash(&root).unwrap_or_default();
        let mut writer = CodeBlockWriter::create(code_blocks_path)?;
        let mut sequences: Vec<TokenSequence> = Vec::new();
        let mut stats = PreprocessStats::default();

        for (path, result) in per_file {
            stats.files += 1;
            let spans = match result {
                Ok(spans) => spans,
                Err(err) if err.is_recoverable() => {
                    warn!(file = %path.display(), error = %err, "skipping unparsable file");
                    stats.skipped_files += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            for span in spans {
                let line_count = span.end_line - span.start_line + 1;
                if line_count < self.config.min_line || span.tokens.len() < self.config.min_token {
                    // Expected case, silently skipped
                    stats.skipped_functions += 1;
                    continue;
                }

                writer.write_block(&path, &span, &commit)?;
                sequences.push(TokenSequence {
                    id: sequences.len() as u32,
                    file_path: path.clone(),
                    start_line: span.start_line,
                    end_line: span.end_line,
                    tokens: span.tokens,
                });
            }
        }

        writer.finish()?;
        stats.sequences = sequences.len();
        info!(
            sequences = stats.sequences,
            skipped_files = stats.skipped_files,
            skipped_functions = stats.skipped_functions,
            "preprocessing complete"
        );

        Ok((Corpus::new(sequences), stats))
    }
}

/// Tokenize one file; read failures are fatal, parse failures recoverable.
fn tokenize_file(path: &Path, language: &str) -> Result<Vec<FunctionSpan>> {
    let bytes = fs::read(path).map_err(|err| {
        DraupnirError::source(format!("cannot read source file '{}'", path.display()), err)
    })?;
    // Lossy conversion: a stray invalid byte is a parser problem, not an
    // I/O problem
    let source = String::from_utf8_lossy(&bytes);

    let mut tokenizer = registry::tokenizer_for_language(language)?;
    let spans = tokenizer.extract_functions(&source, path)?;
    debug!(file = %path.display(), functions = spans.len(), "tokenized file");
    Ok(spans)
}

/// Enumerate matching files under `root` in deterministic walk order,
/// respecting repository ignore rules and skipping hidden entries.
fn discover_files(root: &Path, info: &LanguageInfo) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(true)
        .follow_links(false)
        .sort_by_file_path(|a, b| a.cmp(b));

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("failed to walk directory entry: {err}");
                continue;
            }
        };

        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }

        let path = entry.into_path();
        if registry::path_matches_language(&path, info) {
            files.push(path);
        }
    }

    files
}

/// Short hash of the checked-out commit, when the root sits in a repository.
fn head_commit_hash(root: &Path) -> Option<String> {
    let repo = git2::Repository::discover(root).ok()?;
    let head = repo.head().ok()?;
    let oid = head.target()?;
    let mut hash = oid.to_string();
    hash.truncate(12);
    Some(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config(min_line: usize, min_token: usize) -> Arc<DetectionConfig> {
        Arc::new(DetectionConfig {
            min_line,
            min_token,
            ..DetectionConfig::default()
        })
    }

    fn write_file(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn assigns_dense_ids_in_walk_then_source_order() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "A.java",
            "class A { void f() { int x = 1; } void g() { int y = 2; } }",
        );
        write_file(dir.path(), "B.java", "class B { void h() { int z = 3; } }");

        let blocks = dir.path().join("code_blocks.csv");
        let (corpus, stats) = Preprocessor::new(config(1, 1))
            .run(dir.path(), &blocks)
            .unwrap();

        assert_eq!(corpus.len(), 3);
        assert_eq!(stats.sequences, 3);
        // A.java sorts before B.java; f precedes g in source order
        assert!(corpus.get(0).file_path.ends_with("A.java"));
        assert!(corpus.get(1).file_path.ends_with("A.java"));
        assert!(corpus.get(2).file_path.ends_with("B.java"));
        assert!(corpus.get(0).start_line <= corpus.get(1).start_line);
    }

    #[test]
    fn code_blocks_lines_align_with_ids() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "Main.java",
            "class Main { void a() { int x = 0; } void b() { int y = 0; } }",
        );

        let blocks = dir.path().join("code_blocks.csv");
        let (corpus, _) = Preprocessor::new(config(1, 1))
            .run(dir.path(), &blocks)
            .unwrap();

        let contents = fs::read_to_string(&blocks).unwrap();
        assert_eq!(contents.lines().count(), corpus.len());
        for (id, line) in contents.lines().enumerate() {
            let seq = corpus.get(id);
            assert!(line.starts_with(&format!(
                "{},{},{}",
                seq.file_path.display(),
                seq.start_line,
                seq.end_line
            )));
        }
    }

    #[test]
    fn short_functions_are_silently_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "Tiny.java",
            "class Tiny { void small() { run(); } }",
        );

        let blocks = dir.path().join("code_blocks.csv");
        let (corpus, stats) = Preprocessor::new(config(6, 50))
            .run(dir.path(), &blocks)
            .unwrap();

        assert!(corpus.is_empty());
        assert_eq!(stats.skipped_functions, 1);
    }

    #[test]
    fn non_matching_extensions_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "notes.txt", "not source");
        write_file(dir.path(), "script.py", "def f():\n    pass\n");

        let blocks = dir.path().join("code_blocks.csv");
        let (_, stats) = Preprocessor::new(config(1, 1))
            .run(dir.path(), &blocks)
            .unwrap();

        // Only .java files are visible to the default (java) configuration
        assert_eq!(stats.files, 0);
    }

    #[test]
    fn missing_root_is_a_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocks = dir.path().join("code_blocks.csv");
        let missing = dir.path().join("no-such-dir");

        let err = Preprocessor::new(config(1, 1))
            .run(&missing, &blocks)
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_tree_produces_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let blocks = dir.path().join("code_blocks.csv");

        let (corpus, stats) = Preprocessor::new(config(6, 50))
            .run(dir.path(), &blocks)
            .unwrap();
        assert!(corpus.is_empty());
        assert_eq!(stats.files, 0);
        assert!(fs::read_to_string(&blocks).unwrap().is_empty());
    }
}
