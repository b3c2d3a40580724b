//! CLI command implementations.

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use draupnir::core::config::DetectionConfig;
use draupnir::core::errors::{DraupnirError, Result};
use draupnir::core::pipeline::{CloneDetector, Preprocessor};
use draupnir::lang::registry;

use super::args::DetectArgs;

/// Run the full detection pipeline.
pub fn detect_command(args: DetectArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => DetectionConfig::from_yaml_file(path)?,
        None => DetectionConfig::default(),
    };
    apply_overrides(&mut config, &args);
    config.validate()?;
    let config = Arc::new(config);

    fs::create_dir_all(&args.out).map_err(|err| {
        DraupnirError::io(
            format!("cannot create output directory '{}'", args.out.display()),
            err,
        )
    })?;
    let pair_path = args.out.join("clone_pairs.csv");
    let blocks_path = args.out.join("code_blocks.csv");

    let interrupt = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupt);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)).map_err(|err| {
            DraupnirError::internal(format!("failed to install interrupt handler: {err}"))
        })?;
    }

    info!(
        root = %args.root.display(),
        language = %config.language,
        "starting clone detection"
    );

    let spinner = progress_spinner();
    spinner.set_message(format!("tokenizing {}", args.root.display()));

    let preprocessor = Preprocessor::new(Arc::clone(&config));
    let (corpus, pre_stats) = preprocessor.run(&args.root, &blocks_path)?;
    if interrupt.load(Ordering::SeqCst) {
        spinner.finish_and_clear();
        return Err(DraupnirError::Interrupted);
    }

    spinner.set_message(format!(
        "detecting clones across {} token sequences",
        corpus.len()
    ));

    let detector = CloneDetector::new(Arc::clone(&config));
    let stats = detector.run(&Arc::new(corpus), &pair_path, interrupt)?;

    spinner.finish_and_clear();

    println!(
        "{} files, {} token sequences, {} clone pairs",
        pre_stats.files, stats.sequences, stats.pairs
    );
    println!("pair file:        {}", pair_path.display());
    println!("code-blocks file: {}", blocks_path.display());
    Ok(())
}

/// Print the default configuration in YAML format.
pub fn print_default_config() -> Result<()> {
    let yaml = serde_yaml::to_string(&DetectionConfig::default())
        .map_err(DraupnirError::from)?;
    print!("{yaml}");
    Ok(())
}

/// List supported languages and their file extensions.
pub fn list_languages() -> Result<()> {
    println!("Supported languages:");
    for info in registry::registered_languages() {
        let extensions: Vec<String> = info
            .extensions
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect();
        println!("  {:<8} {:<8} {}", info.key, info.name, extensions.join(", "));
    }
    Ok(())
}

fn apply_overrides(config: &mut DetectionConfig, args: &DetectArgs) {
    if let Some(language) = &args.language {
        config.language = language.clone();
    }
    if let Some(min_line) = args.min_line {
        config.min_line = min_line;
    }
    if let Some(min_token) = args.min_token {
        config.min_token = min_token;
    }
    if let Some(gram_size) = args.gram_size {
        config.gram_size = gram_size;
    }
    if let Some(partition_count) = args.partition_count {
        config.partition_count = partition_count;
    }
    if let Some(filtration) = args.filtration_threshold {
        config.filtration_threshold = filtration;
    }
    if let Some(verification) = args.verification_threshold {
        config.verification_threshold = verification;
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
}

fn progress_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
