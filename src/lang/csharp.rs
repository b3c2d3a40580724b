//! C# tokenizer with tree-sitter integration.

use std::path::Path;

use tree_sitter::{Node, Parser};

use super::common::{self, FunctionMetadata, FunctionSpan, Tokenizer};
use crate::core::errors::{DraupnirError, Result};

/// C#-specific function tokenization.
pub struct CSharpTokenizer {
    /// Tree-sitter parser for C#
    parser: Parser,
}

impl CSharpTokenizer {
    /// Create a new C# tokenizer.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| {
                DraupnirError::parse("csharp", format!("failed to set C# language: {e:?}"))
            })?;

        Ok(Self { parser })
    }

    /// Whether a node represents a function-level declaration.
    fn is_function(kind: &str) -> bool {
        matches!(
            kind,
            "method_declaration" | "constructor_declaration" | "local_function_statement"
        )
    }

    fn is_negligible(kind: &str) -> bool {
        kind == "comment"
    }

    fn metadata(node: Node, source: &str) -> FunctionMetadata {
        let name = node
            .child_by_field_name("name")
            .map(|n| common::node_text(n, source).to_string())
            .unwrap_or_default();

        // The grammar names the return type field "returns"; older revisions
        // used "type", so fall back for compatibility.
        let return_type = node
            .child_by_field_name("returns")
            .or_else(|| node.child_by_field_name("type"))
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
        if Self::is_function(node.kind()) {
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

impl Tokenizer for CSharpTokenizer {
    fn language(&self) -> &'static str {
        "csharp"
    }

    fn extract_functions(&mut self, source: &str, file_path: &Path) -> Result<Vec<FunctionSpan>> {
        let tree = common::parse_source(&mut self.parser, source, "csharp", file_path)?;
        let mut functions = Vec::new();
        Self::walk(tree.root_node(), source, &mut functions);
        Ok(functions)
    }
}
