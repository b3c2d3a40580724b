//! C tokenizer with tree-sitter integration.

use std::path::Path;

use tree_sitter::{Node, Parser};

use super::common::{self, FunctionMetadata, FunctionSpan, Tokenizer};
use crate::core::errors::{DraupnirError, Result};

/// C-specific function tokenization.
pub struct CTokenizer {
    /// Tree-sitter parser for C
    parser: Parser,
}

impl CTokenizer {
    /// Create a new C tokenizer.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c::LANGUAGE.into())
            .map_err(|e| DraupnirError::parse("c", format!("failed to set C language: {e:?}")))?;

        Ok(Self { parser })
    }

    fn is_negligible(kind: &str) -> bool {
        kind == "comment"
    }

    /// The identifier buried in a (possibly pointer-wrapped) declarator chain.
    fn declarator_name(node: Node, source: &str) -> String {
        let mut current = node.child_by_field_name("declarator");
        while let Some(decl) = current {
            if decl.kind() == "identifier" {
                return common::node_text(decl, source).to_string();
            }
            current = decl.child_by_field_name("declarator");
        }
        String::new()
    }

    /// The function_declarator node of a definition, skipping pointer wrappers.
    fn function_declarator<'a>(node: Node<'a>) -> Option<Node<'a>> {
        let mut current = node.child_by_field_name("declarator");
        while let Some(decl) = current {
            if decl.kind() == "function_declarator" {
                return Some(decl);
            }
            current = decl.child_by_field_name("declarator");
        }
        None
    }

    fn metadata(node: Node, source: &str) -> FunctionMetadata {
        let return_type = node
            .child_by_field_name("type")
            .map(|n| common::node_text(n, source).to_string())
            .unwrap_or_default();

        let parameters = Self::function_declarator(node)
            .and_then(|decl| decl.child_by_field_name("parameters"))
            .map(|n| common::parameter_text(n, source))
            .unwrap_or_default();

        FunctionMetadata {
            name: Self::declarator_name(node, source),
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

impl Tokenizer for CTokenizer {
    fn language(&self) -> &'static str {
        "c"
    }

    fn extract_functions(&mut self, source: &str, file_path: &Path) -> Result<Vec<FunctionSpan>> {
        let tree = common::parse_source(&mut self.parser, source, "c", file_path)?;
        let mut functions = Vec::new();
        Self::walk(tree.root_node(), source, &mut functions);
        Ok(functions)
    }
}
