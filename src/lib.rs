//! # Draupnir: Large-Variance Code Clone Detection
//!
//! Draupnir finds function-level code clones across a source tree. Every
//! function is reduced to a sequence of normalized token hashes; candidate
//! clone pairs are located through a partitioned n-gram inverted index and
//! verified with a two-tier similarity check (cheap n-gram overlap first,
//! Hunt–Szymanski LCS only when the fast path is inconclusive).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          CLI Layer                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Core Engine   │  Detectors    │  Language     │  I/O        │
//! │                │               │  Tokenizers   │             │
//! │ • Pipeline     │ • N-grams     │ • Java        │ • Pair file │
//! │ • Preprocess   │ • Index       │ • C / C++     │ • Code      │
//! │ • Config       │ • Location    │ • C# / Kotlin │   blocks    │
//! │ • Errors       │ • LCS         │ • Python      │             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::atomic::AtomicBool;
//! use std::sync::Arc;
//!
//! use draupnir::core::config::DetectionConfig;
//! use draupnir::core::pipeline::{CloneDetector, Preprocessor};
//!
//! fn main() -> draupnir::Result<()> {
//!     let config = Arc::new(DetectionConfig::default());
//!     config.validate()?;
//!
//!     let (corpus, _) = Preprocessor::new(Arc::clone(&config))
//!         .run("./src".as_ref(), "code_blocks.csv".as_ref())?;
//!
//!     let interrupt = Arc::new(AtomicBool::new(false));
//!     let stats = CloneDetector::new(config).run(
//!         &Arc::new(corpus),
//!         "clone_pairs.csv".as_ref(),
//!         interrupt,
//!     )?;
//!     println!("{} clone pairs", stats.pairs);
//!     Ok(())
//! }
//! ```

#![warn(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Core engine modules
pub mod core {
    //! Core pipeline, configuration, and shared data structures.

    pub mod config;
    pub mod corpus;
    pub mod errors;
    pub mod pipeline;
}

// Detection algorithms
pub mod detectors {
    //! Clone detection algorithms: n-grams, inverted index, location, LCS.

    pub mod index;
    pub mod lcs;
    pub mod locate;
    pub mod ngram;
}

// Language-specific tokenizers
pub mod lang {
    //! Language-specific function tokenization.

    pub mod common;
    pub mod normalizer;
    // Tree-sitter tokenizers
    pub mod c_lang;
    pub mod cpp;
    pub mod csharp;
    pub mod java;
    pub mod kotlin;
    pub mod python;
    pub mod registry;

    pub use common::{FunctionMetadata, FunctionSpan, Tokenizer};
    pub use registry::{language_info, registered_languages, tokenizer_for_language};
}

// Output files
pub mod io {
    //! Pair-file and code-blocks output.

    pub mod code_blocks;
    pub mod pairs;
}

// Re-export primary types for convenience
pub use crate::core::config::DetectionConfig;
pub use crate::core::corpus::{Corpus, TokenSequence};
pub use crate::core::errors::{DraupnirError, Result};
pub use crate::core::pipeline::{CloneDetector, DetectionStats, Preprocessor};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
