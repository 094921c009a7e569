// Declare modules
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod scanner;
pub mod sysinfo;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;

use self::cli::Cli;
use self::collector::collect;
use self::config::resolve_config;
use self::error::CollectError;
use self::formatter::OutputGenerator;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration
    let config = resolve_config(&args)?;
    log::info!("Included directories: {:?}", config.included_directories);
    log::info!("File extensions to include: {:?}", config.file_extensions);
    log::info!("Files to exclude: {:?}", config.exclude_files);
    if let Some(settings) = &config.influxdb {
        // Debug for InfluxDbConfig redacts the token.
        log::debug!("Telemetry sink configured: {:?}", settings);
    }

    // 3. Collect Files
    let collection = collect(&config, &args.root, &args.output)?;
    if collection.files.is_empty() {
        log::warn!("⚠️ No files matched the configured filters.");
    }

    // 4. Generate Output
    let summary = args.system_info.then(sysinfo::system_summary);
    let document =
        OutputGenerator::render(&config.llm_instructions, summary.as_deref(), &collection);

    // 5. Write the Context Document
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory {}", parent.display())
            })?;
        }
    }
    fs::write(&args.output, &document)
        .map_err(|e| CollectError::OutputWrite(args.output.clone(), e))?;

    log::info!(
        "Collected {} file(s), skipped {}, wrote {} bytes",
        collection.files.len(),
        collection.skipped.len(),
        document.len()
    );
    println!(
        "Context collection complete. Output written to {}",
        args.output.display()
    );

    Ok(())
}
