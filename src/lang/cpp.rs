//! C++ tokenizer with tree-sitter integration.

use std::path::Path;

use tree_sitter::{Node, Parser};

use super::common::{self, FunctionMetadata, FunctionSpan, Tokenizer};
use crate::core::errors::{DraupnirError, Result};

/// C++-specific function tokenization.
///
/// Covers free functions, member functions defined at class scope, and
/// out-of-line member definitions with qualified names.
pub struct CppTokenizer {
    /// Tree-sitter parser for C++
    parser: Parser,
}

impl CppTokenizer {
    /// Create a new C++ tokenizer.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_cpp::LANGUAGE.into())
            .map_err(|e| {
                DraupnirError::parse("cpp", format!("failed to set C++ language: {e:?}"))
            })?;

        Ok(Self { parser })
    }

    fn is_negligible(kind: &str) -> bool {
        kind == "comment"
    }

    /// Node kinds that can name a C++ function in a declarator chain.
    fn is_name_node(kind: &str) -> bool {
        matches!(
            kind,
            "identifier"
                | "field_identifier"
                | "qualified_identifier"
                | "operator_name"
                | "destructor_name"
        )
    }

    fn declarator_name(node: Node, source: &str) -> String {
        let mut current = node.child_by_field_name("declarator");
        while let Some(decl) = current {
            if Self::is_name_node(decl.kind()) {
                return common::node_text(decl, source).to_string();
            }
            current = decl.child_by_field_name("declarator");
        }
        String::new()
    }

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
        // Constructors and destructors have no type node
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

impl Tokenizer for CppTokenizer {
    fn language(&self) -> &'static str {
        "cpp"
    }

    fn extract_functions(&mut self, source: &str, file_path: &Path) -> Result<Vec<FunctionSpan>> {
        let tree = common::parse_source(&mut self.parser, source, "cpp", file_path)?;
        let mut functions = Vec::new();
        Self::walk(tree.root_node(), source, &mut functions);
        Ok(functions)
    }
}
