//! Python tokenizer with tree-sitter integration.

use std::path::Path;

use tree_sitter::{Node, Parser};

use super::common::{self, FunctionMetadata, FunctionSpan, Tokenizer};
use crate::core::errors::{DraupnirError, Result};

/// Python-specific function tokenization.
///
/// Nested `def`s yield their own records in addition to contributing tokens
/// to the enclosing function.
pub struct PythonTokenizer {
    /// Tree-sitter parser for Python
    parser: Parser,
}

impl PythonTokenizer {
    /// Create a new Python tokenizer.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| {
                DraupnirError::parse("python", format!("failed to set Python language: {e:?}"))
            })?;

        Ok(Self { parser })
    }

    fn is_negligible(kind: &str) -> bool {
        kind == "comment"
    }

    fn metadata(node: Node, source: &str) -> FunctionMetadata {
        let name = node
            .child_by_field_name("name")
            .map(|n| common::node_text(n, source).to_string())
            .unwrap_or_default();

        // Most functions carry no `-> T` annotation; the column stays empty
        let return_type = node
            .child_by_field_name("return_type")
            .map(|n| common::node_text(n, source).to_string())
            .unwrap_or_default();

        let parameters = node
            .child_by_field_name("parameters")
            .map(|n| common::parameter_text(n, source))
            .unwrap_or_default();

        FunctionMetadata {
            name,
            return_type,
            parameters,
        }
    }

    fn walk(node: Node, source: &str, out: &mut Vec<FunctionSpan>) {
        if node.kind() == "function_definition" {
            let (start_line, end_line) = common::line_range(node);
            out.push(FunctionSpan {
                start_line,
                end_line,
                tokens: common::collect_tokens(node, source, &Self::is_negligible),
                metadata: Self::metadata(node, source),
            });
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            Self::walk(child, source, out);
        }
    }
}

impl Tokenizer for PythonTokenizer {
    fn language(&self) -> &'static str {
        "python"
    }

    fn extract_functions(&mut self, source: &str, file_path: &Path) -> Result<Vec<FunctionSpan>> {
        let tree = common::parse_source(&mut self.parser, source, "python", file_path)?;
        let mut functions = Vec::new();
        Self::walk(tree.root_node(), source, &mut functions);
        Ok(functions)
    }
}
