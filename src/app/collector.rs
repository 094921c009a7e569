use crate::app::error::CollectError;
use crate::app::models::{CollectedFile, Collection, CollectorConfig, SkipRecord};
use crate::app::scanner::Scanner;
use std::fs;
use std::path::Path;

/// Run one collection pass: enumerate, filter and read everything the
/// configuration selects under `root`.
///
/// Collection is best-effort per file. A file that cannot be read (missing
/// permissions, not valid UTF-8) becomes a skip record instead of failing
/// the run; a missing root or a missing included directory under the strict
/// policy fails the whole pass before anything is written.
pub fn collect(
    config: &CollectorConfig,
    root: &Path,
    output: &Path,
) -> Result<Collection, CollectError> {
    let root = fs::canonicalize(root).map_err(|_| CollectError::PathNotFound(root.to_path_buf()))?;
    if !root.is_dir() {
        return Err(CollectError::PathNotFound(root));
    }

    log::info!("Collecting files from {}", root.display());

    let scanner = Scanner::new(root, config, output)?;
    let outcome = scanner.scan()?;

    let mut files = Vec::new();
    let mut skipped = outcome.skipped;

    for entry in outcome.entries {
        match fs::read_to_string(&entry.path) {
            Ok(content) => {
                log::debug!("Read file: {}", entry.relative_path);
                files.push(CollectedFile {
                    relative_path: entry.relative_path,
                    content,
                });
            }
            Err(err) => {
                log::warn!("Skipping {}: {}", entry.relative_path, err);
                skipped.push(SkipRecord {
                    path: entry.relative_path,
                    reason: err.to_string(),
                });
            }
        }
    }

    log::info!(
        "Collected {} file(s) from included directories",
        files.len()
    );

    Ok(Collection { files, skipped })
}
