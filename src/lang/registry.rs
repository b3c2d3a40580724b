//! Language metadata and tokenizer factory.

use std::path::Path;

use crate::core::errors::{DraupnirError, Result};
use crate::lang::c_lang::CTokenizer;
use crate::lang::common::Tokenizer;
use crate::lang::cpp::CppTokenizer;
use crate::lang::csharp::CSharpTokenizer;
use crate::lang::java::JavaTokenizer;
use crate::lang::kotlin::KotlinTokenizer;
use crate::lang::python::PythonTokenizer;

/// Metadata describing one of the built-in language tokenizers.
#[derive(Debug, Clone, Copy)]
pub struct LanguageInfo {
    /// Canonical key (matches CLI/config usage, e.g. "java").
    pub key: &'static str,
    /// Human-friendly display name.
    pub name: &'static str,
    /// Source file extensions (without leading dots).
    pub extensions: &'static [&'static str],
}

const REGISTERED_LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        key: "java",
        name: "Java",
        extensions: &["java"],
    },
    LanguageInfo {
        key: "c",
        name: "C",
        extensions: &["c", "h"],
    },
    LanguageInfo {
        key: "cpp",
        name: "C++",
        extensions: &["cpp", "hpp"],
    },
    LanguageInfo {
        key: "csharp",
        name: "C#",
        extensions: &["cs"],
    },
    LanguageInfo {
        key: "python",
        name: "Python",
        extensions: &["py"],
    },
    LanguageInfo {
        key: "kotlin",
        name: "Kotlin",
        extensions: &["kt"],
    },
];

/// Return the languages compiled into this build.
pub fn registered_languages() -> &'static [LanguageInfo] {
    REGISTERED_LANGUAGES
}

/// Look up language metadata by key or common alias.
pub fn language_info(language: &str) -> Option<&'static LanguageInfo> {
    let key = normalize_language_key(language)?;
    REGISTERED_LANGUAGES.iter().find(|info| info.key == key)
}

/// Create the tokenizer variant for a language key.
pub fn tokenizer_for_language(language: &str) -> Result<Box<dyn Tokenizer>> {
    match normalize_language_key(language) {
        Some("java") => Ok(Box::new(JavaTokenizer::new()?)),
        Some("c") => Ok(Box::new(CTokenizer::new()?)),
        Some("cpp") => Ok(Box::new(CppTokenizer::new()?)),
        Some("csharp") => Ok(Box::new(CSharpTokenizer::new()?)),
        Some("python") => Ok(Box::new(PythonTokenizer::new()?)),
        Some("kotlin") => Ok(Box::new(KotlinTokenizer::new()?)),
        _ => Err(DraupnirError::config_field(
            format!("no tokenizer for language '{language}'"),
            "language",
        )),
    }
}

/// Whether a file path matches the language's extensions.
pub fn path_matches_language(path: &Path, info: &LanguageInfo) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    info.extensions.iter().any(|candidate| *candidate == ext)
}

/// Normalizes a language identifier to its canonical key.
fn normalize_language_key(language: &str) -> Option<&'static str> {
    match language.to_ascii_lowercase().as_str() {
        "java" => Some("java"),
        "c" => Some("c"),
        "cpp" | "c++" | "cxx" => Some("cpp"),
        "csharp" | "c#" | "cs" => Some("csharp"),
        "python" | "py" => Some("python"),
        "kotlin" | "kt" => Some("kotlin"),
        _ => None,
    }
}
