//! Detection configuration.
//!
//! All options recognized by the pipeline, with serde support so a run can be
//! described in a YAML file and overridden from the command line.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{DraupnirError, Result};
use crate::lang::registry;

/// Configuration for one detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Language to tokenize; selects the tokenizer and file extensions
    pub language: String,

    /// Minimum function length in lines; shorter functions are skipped
    pub min_line: usize,

    /// Minimum token count after normalization
    pub min_token: usize,

    /// N-gram width used for indexing and filtration
    pub gram_size: usize,

    /// Number of index partitions; more partitions cap peak memory at the
    /// cost of extra passes over the query list
    pub partition_count: usize,

    /// Early-cutoff n-gram similarity percentage
    pub filtration_threshold: u32,

    /// Acceptance threshold for both the fast path and LCS verification
    pub verification_threshold: u32,

    /// Worker threads for preprocessing and detection; 0 means all cores
    pub threads: usize,
}

/// Default implementation for [`DetectionConfig`].
impl Default for DetectionConfig {
    /// Returns the default detection configuration.
    fn default() -> Self {
        Self {
            language: "java".to_string(),
            min_line: 6,
            min_token: 50,
            gram_size: 5,
            partition_count: 10,
            filtration_threshold: 10,
            verification_threshold: 70,
            threads: 0, // all available cores
        }
    }
}

/// Loading, validation, and derived values for [`DetectionConfig`].
impl DetectionConfig {
    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| {
            DraupnirError::config(format!(
                "cannot read configuration file '{}': {err}",
                path.display()
            ))
        })?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if registry::language_info(&self.language).is_none() {
            return Err(DraupnirError::config_field(
                format!("unknown language '{}'", self.language),
                "language",
            ));
        }

        if self.min_line == 0 {
            return Err(DraupnirError::config_field(
                "min_line must be greater than 0",
                "min_line",
            ));
        }

        if self.min_token == 0 {
            return Err(DraupnirError::config_field(
                "min_token must be greater than 0",
                "min_token",
            ));
        }

        if self.gram_size == 0 {
            return Err(DraupnirError::config_field(
                "gram_size must be greater than 0",
                "gram_size",
            ));
        }

        if self.partition_count == 0 {
            return Err(DraupnirError::config_field(
                "partition_count must be greater than 0",
                "partition_count",
            ));
        }

        if self.filtration_threshold > 100 {
            return Err(DraupnirError::config_field(
                "filtration_threshold must be a percentage in 0..=100",
                "filtration_threshold",
            ));
        }

        if self.verification_threshold > 100 {
            return Err(DraupnirError::config_field(
                "verification_threshold must be a percentage in 0..=100",
                "verification_threshold",
            ));
        }

        Ok(())
    }

    /// Worker count to use, resolving 0 to the number of available cores.
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}
