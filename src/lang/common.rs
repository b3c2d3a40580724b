//! Shared tokenizer capability and parse-tree walking.
//!
//! Each language supplies one [`Tokenizer`] variant. The only behaviors the
//! core cares about are which subtrees constitute a function and which leaf
//! nodes are negligible (comments); everything else is shared here.

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use crate::core::errors::{DraupnirError, Result};
use crate::lang::normalizer;

/// Optional method metadata carried into the code-blocks file.
#[derive(Debug, Clone, Default)]
pub struct FunctionMetadata {
    /// Method or function name
    pub name: String,

    /// Surface return type; empty when the language or declaration has none
    pub return_type: String,

    /// Parameter list text without the surrounding parentheses
    pub parameters: String,
}

/// One function-level record extracted from a source file.
#[derive(Debug, Clone)]
pub struct FunctionSpan {
    /// First line of the function (1-indexed, inclusive)
    pub start_line: usize,

    /// Last line of the function (1-indexed, inclusive)
    pub end_line: usize,

    /// Normalized token hashes in source order
    pub tokens: Vec<u32>,

    /// Method metadata for the code-blocks record
    pub metadata: FunctionMetadata,
}

/// Language-specific function tokenization capability.
pub trait Tokenizer: Send {
    /// Canonical language key (matches CLI/config usage, e.g. "java").
    fn language(&self) -> &'static str;

    /// Extract every function in the file as a token-sequence record,
    /// in source order.
    fn extract_functions(&mut self, source: &str, file_path: &Path) -> Result<Vec<FunctionSpan>>;
}

/// Parse a source file, surfacing tree-sitter's opaque failure as a parse error.
pub(crate) fn parse_source(
    parser: &mut Parser,
    source: &str,
    language: &str,
    file_path: &Path,
) -> Result<Tree> {
    parser.parse(source, None).ok_or_else(|| {
        DraupnirError::parse_in_file(
            language,
            "parser returned no tree",
            file_path.display().to_string(),
        )
    })
}

/// Collect the normalized token hashes of every non-negligible leaf under
/// `node`, in source order.
pub(crate) fn collect_tokens(
    node: Node,
    source: &str,
    is_negligible: &dyn Fn(&str) -> bool,
) -> Vec<u32> {
    let mut tokens = Vec::new();
    collect_leaf_tokens(node, source, is_negligible, &mut tokens);
    tokens
}

fn collect_leaf_tokens(
    node: Node,
    source: &str,
    is_negligible: &dyn Fn(&str) -> bool,
    out: &mut Vec<u32>,
) {
    if is_negligible(node.kind()) {
        return;
    }

    if node.child_count() == 0 {
        if let Ok(text) = node.utf8_text(source.as_bytes()) {
            normalizer::normalize_into(text, out);
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_leaf_tokens(child, source, is_negligible, out);
    }
}

/// 1-indexed inclusive line range of a node.
pub(crate) fn line_range(node: Node) -> (usize, usize) {
    (
        node.start_position().row + 1,
        node.end_position().row + 1,
    )
}

/// Text of a node, empty on any encoding mismatch.
pub(crate) fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Parameter-list text of a node with the surrounding parentheses removed.
pub(crate) fn parameter_text(node: Node, source: &str) -> String {
    node_text(node, source)
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim()
        .to_string()
}
