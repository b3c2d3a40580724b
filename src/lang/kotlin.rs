//! Kotlin tokenizer with tree-sitter integration.

use std::path::Path;

use tree_sitter::{Node, Parser};

use super::common::{self, FunctionMetadata, FunctionSpan, Tokenizer};
use crate::core::errors::{DraupnirError, Result};

/// Kotlin-specific function tokenization.
///
/// The Kotlin grammar exposes fewer named fields than the other grammars, so
/// name, parameter, and return-type extraction scan child node kinds instead.
pub struct KotlinTokenizer {
    /// Tree-sitter parser for Kotlin
    parser: Parser,
}

impl KotlinTokenizer {
    /// Create a new Kotlin tokenizer.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_kotlin_ng::LANGUAGE.into())
            .map_err(|e| {
                DraupnirError::parse("kotlin", format!("failed to set Kotlin language: {e:?}"))
            })?;

        Ok(Self { parser })
    }

    /// Whether a node represents a function-level declaration.
    fn is_function(kind: &str) -> bool {
        matches!(kind, "function_declaration" | "secondary_constructor")
    }

    fn is_negligible(kind: &str) -> bool {
        matches!(kind, "line_comment" | "multiline_comment" | "comment")
    }

    /// Whether a node kind names a Kotlin type in declaration position.
    fn is_type_node(kind: &str) -> bool {
        matches!(kind, "user_type" | "nullable_type" | "function_type")
    }

    fn metadata(node: Node, source: &str) -> FunctionMetadata {
        let mut name = String::new();
        let mut parameters = String::new();
        let mut return_type = String::new();
        let mut seen_parameters = false;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                // The grammar uses simple_identifier directly, not a name field
                "simple_identifier" if name.is_empty() => {
                    name = common::node_text(child, source).to_string();
                }
                "function_value_parameters" => {
                    parameters = common::parameter_text(child, source);
                    seen_parameters = true;
                }
                kind if seen_parameters && return_type.is_empty() && Self::is_type_node(kind) => {
                    return_type = common::node_text(child, source).to_string();
                }
                _ => {}
            }
        }

        if name.is_empty() && node.kind() == "secondary_constructor" {
            name = "constructor".to_string();
        }

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

impl Tokenizer for KotlinTokenizer {
    fn language(&self) -> &'static str {
        "kotlin"
    }

    fn extract_functions(&mut self, source: &str, file_path: &Path) -> Result<Vec<FunctionSpan>> {
        let tree = common::parse_source(&mut self.parser, source, "kotlin", file_path)?;
        let mut functions = Vec::new();
        Self::walk(tree.root_node(), source, &mut functions);
        Ok(functions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Vec<FunctionSpan> {
        let mut tokenizer = KotlinTokenizer::new().unwrap();
        tokenizer
            .extract_functions(source, Path::new("Test.kt"))
            .unwrap()
    }

    #[test]
    fn extracts_top_level_and_member_functions() {
        let source = r#"
fun greet(name: String): String {
    return "Hello, " + name
}

class Greeter {
    fun shout(name: String) {
        println(greet(name))
    }
}
"#;
        let functions = extract(source);
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].metadata.name, "greet");
        assert_eq!(functions[0].metadata.parameters, "name: String");
        assert_eq!(functions[0].metadata.return_type, "String");
        assert_eq!(functions[1].metadata.name, "shout");
        assert_eq!(functions[1].metadata.return_type, "");
    }

    #[test]
    fn comments_are_negligible() {
        let commented = extract("fun f(): Int {\n    // note\n    return 1\n}\n");
        let plain = extract("fun f(): Int {\n    return 1\n}\n");
        assert_eq!(commented[0].tokens, plain[0].tokens);
    }

    #[test]
    fn line_ranges_cover_the_declaration() {
        let functions = extract("fun f() {\n    g()\n}\n");
        assert_eq!(functions[0].start_line, 1);
        assert_eq!(functions[0].end_line, 3);
    }
}
