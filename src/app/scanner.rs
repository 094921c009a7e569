use crate::app::error::CollectError;
use crate::app::models::{CollectorConfig, FileEntry, SkipRecord};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything the walk produced: retained files plus skip records for
/// the directories and entries it could not collect.
#[derive(Debug)]
pub struct ScanOutcome {
    pub entries: Vec<FileEntry>,
    pub skipped: Vec<SkipRecord>,
}

#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    included_directories: Vec<String>,
    extensions: Vec<String>,
    exclude_set: GlobSet,
    output_file: Option<PathBuf>,
    strict: bool,
}

impl Scanner {
    /// `root` must already be canonicalized; relative paths are derived from it.
    pub fn new(
        root: PathBuf,
        config: &CollectorConfig,
        output: &Path,
    ) -> Result<Self, CollectError> {
        Ok(Self {
            included_directories: config.included_directories.clone(),
            extensions: config.file_extensions.clone(),
            exclude_set: build_globset(&config.exclude_files)?,
            output_file: absolute_output_path(output),
            strict: config.strict,
            root,
        })
    }

    /// Walk every included directory in configuration order. Within one
    /// directory entries come out in lexical path order, so an unchanged
    /// tree always produces the same sequence.
    pub fn scan(&self) -> Result<ScanOutcome, CollectError> {
        let mut entries = Vec::new();
        let mut skipped = Vec::new();
        let mut seen = HashSet::new();

        for dir in &self.included_directories {
            let resolved = self.root.join(dir);
            if !resolved.is_dir() {
                if self.strict {
                    return Err(CollectError::PathNotFound(resolved));
                }
                log::warn!("Included directory {} does not exist", resolved.display());
                skipped.push(SkipRecord {
                    path: dir.clone(),
                    reason: "directory not found".to_string(),
                });
                continue;
            }

            let mut batch = self.scan_directory(&resolved, &mut seen, &mut skipped);
            batch.sort_by(|a, b| a.path.cmp(&b.path));
            entries.extend(batch);
        }

        Ok(ScanOutcome { entries, skipped })
    }

    fn scan_directory(
        &self,
        dir: &Path,
        seen: &mut HashSet<String>,
        skipped: &mut Vec<SkipRecord>,
    ) -> Vec<FileEntry> {
        let mut batch = Vec::new();

        // Plain recursive walk: no gitignore or hidden-file filtering, the
        // configured extension and exclusion rules decide everything.
        let walker = WalkBuilder::new(dir).standard_filters(false).build();

        for result in walker {
            match result {
                Ok(entry) => {
                    if let Some(file) = self.process_entry(entry.path()) {
                        // Overlapping included directories emit a file once,
                        // under the first directory that reached it.
                        if seen.insert(file.relative_path.clone()) {
                            batch.push(file);
                        }
                    }
                }
                Err(err) => {
                    log::warn!("Error walking entry: {}", err);
                    skipped.push(self.walk_failure(dir, err));
                }
            }
        }

        batch
    }

    /// A traversal failure still has to show up in the skipped section.
    /// The walker names the failing path when it knows it; otherwise the
    /// record points at the directory being walked.
    fn walk_failure(&self, dir: &Path, err: ignore::Error) -> SkipRecord {
        let (path, reason) = match err {
            ignore::Error::WithPath { path, err } => (path, err.to_string()),
            err => (dir.to_path_buf(), err.to_string()),
        };
        let relative = diff_paths(&path, &self.root).unwrap_or(path);
        SkipRecord {
            path: relative.to_string_lossy().replace('\\', "/"),
            reason,
        }
    }

    fn process_entry(&self, path: &Path) -> Option<FileEntry> {
        if !path.is_file() {
            return None;
        }

        // Never descend into version control internals.
        if path.components().any(|c| c.as_os_str() == ".git") {
            return None;
        }

        // The document must not collect itself on a re-run.
        if self.output_file.as_deref() == Some(path) {
            return None;
        }

        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return None,
        };

        if !self.matches_extension(name) {
            return None;
        }
        if self.exclude_set.is_match(name) {
            log::debug!("Excluded file: {}", name);
            return None;
        }

        let relative = diff_paths(path, &self.root)?;
        let relative_path = relative.to_string_lossy().replace('\\', "/");

        Some(FileEntry {
            path: path.to_path_buf(),
            relative_path,
        })
    }

    /// Exact, case-sensitive suffix match on the file name, so ".env"
    /// matches a file literally named `.env`.
    fn matches_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

/// Helper to build efficient glob sets. Patterns apply to file names only,
/// never to directory components.
fn build_globset(patterns: &[String]) -> Result<GlobSet, CollectError> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(builder.build()?)
}

/// Resolve where the output document will land, if that place exists yet.
/// A parent that cannot be canonicalized cannot be scanned either.
fn absolute_output_path(output: &Path) -> Option<PathBuf> {
    let file_name = output.file_name()?;
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = fs::canonicalize(parent).ok()?;
    Some(parent.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config(dirs: &[&str], exts: &[&str], excludes: &[&str]) -> CollectorConfig {
        CollectorConfig {
            included_directories: dirs.iter().map(|s| s.to_string()).collect(),
            file_extensions: exts.iter().map(|s| s.to_string()).collect(),
            exclude_files: excludes.iter().map(|s| s.to_string()).collect(),
            llm_instructions: Vec::new(),
            influxdb: None,
            strict: false,
        }
    }

    fn scan(root: &Path, config: &CollectorConfig) -> ScanOutcome {
        let root = fs::canonicalize(root).unwrap();
        let scanner = Scanner::new(root, config, Path::new("/nowhere/out.txt")).unwrap();
        scanner.scan().unwrap()
    }

    fn relative_paths(outcome: &ScanOutcome) -> Vec<&str> {
        outcome
            .entries
            .iter()
            .map(|e| e.relative_path.as_str())
            .collect()
    }

    #[test]
    fn keeps_files_matching_extension_suffix_only() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "a").unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();
        fs::write(temp.path().join("noext"), "c").unwrap();

        let outcome = scan(temp.path(), &config(&["."], &[".py"], &[]));
        assert_eq!(relative_paths(&outcome), vec!["a.py"]);
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("lower.py"), "a").unwrap();
        fs::write(temp.path().join("upper.PY"), "b").unwrap();

        let outcome = scan(temp.path(), &config(&["."], &[".py"], &[]));
        assert_eq!(relative_paths(&outcome), vec!["lower.py"]);
    }

    #[test]
    fn dotfile_extension_matches_bare_dotfile() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".env"), "KEY=value").unwrap();
        fs::write(temp.path().join("notes.env"), "KEY=other").unwrap();

        let outcome = scan(temp.path(), &config(&["."], &[".env"], &[]));
        assert_eq!(relative_paths(&outcome), vec![".env", "notes.env"]);
    }

    #[test]
    fn exclusion_accepts_literals_and_globs() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("keep.py"), "a").unwrap();
        fs::write(temp.path().join("skip.py"), "b").unwrap();
        fs::write(temp.path().join("run.sh.py"), "c").unwrap();

        let outcome = scan(temp.path(), &config(&["."], &[".py"], &["skip.py", "run.*"]));
        assert_eq!(relative_paths(&outcome), vec!["keep.py"]);
    }

    #[test]
    fn exclusion_globs_never_match_directory_components() {
        let temp = TempDir::new().unwrap();
        let util_dir = temp.path().join("util");
        fs::create_dir(&util_dir).unwrap();
        fs::write(util_dir.join("keep.py"), "a").unwrap();
        fs::write(temp.path().join("utils.py"), "b").unwrap();

        // "util*" removes the file named utils.py but not files whose
        // parent directory happens to match.
        let outcome = scan(temp.path(), &config(&["."], &[".py"], &["util*"]));
        assert_eq!(relative_paths(&outcome), vec!["util/keep.py"]);
    }

    #[test]
    fn recurses_into_subdirectories() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("inner.py"), "a").unwrap();
        fs::write(temp.path().join("top.py"), "b").unwrap();

        let outcome = scan(temp.path(), &config(&["."], &[".py"], &[]));
        assert_eq!(relative_paths(&outcome), vec!["src/deep/inner.py", "top.py"]);
    }

    #[test]
    fn git_directory_is_never_collected() {
        let temp = TempDir::new().unwrap();
        let git_dir = temp.path().join(".git").join("hooks");
        fs::create_dir_all(&git_dir).unwrap();
        fs::write(git_dir.join("hook.py"), "a").unwrap();
        fs::write(temp.path().join("code.py"), "b").unwrap();

        let outcome = scan(temp.path(), &config(&["."], &[".py"], &[]));
        assert_eq!(relative_paths(&outcome), vec!["code.py"]);
    }

    #[test]
    fn directory_order_then_lexical_order_within_each() {
        let temp = TempDir::new().unwrap();
        let scripts = temp.path().join("scripts");
        let src = temp.path().join("src");
        fs::create_dir(&scripts).unwrap();
        fs::create_dir(&src).unwrap();
        fs::write(src.join("z.py"), "z").unwrap();
        fs::write(src.join("a.py"), "a").unwrap();
        fs::write(scripts.join("m.py"), "m").unwrap();

        // "src" is listed before "scripts", so its files come first even
        // though "scripts" sorts lower lexically.
        let outcome = scan(temp.path(), &config(&["src", "scripts"], &[".py"], &[]));
        assert_eq!(
            relative_paths(&outcome),
            vec!["src/a.py", "src/z.py", "scripts/m.py"]
        );
    }

    #[test]
    fn overlapping_directories_emit_a_file_once() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("a.py"), "a").unwrap();

        let outcome = scan(temp.path(), &config(&[".", "src"], &[".py"], &[]));
        assert_eq!(relative_paths(&outcome), vec!["src/a.py"]);
    }

    #[test]
    fn missing_directory_is_skipped_with_a_record() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "a").unwrap();

        let outcome = scan(temp.path(), &config(&[".", "missing"], &[".py"], &[]));
        assert_eq!(relative_paths(&outcome), vec!["a.py"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].path, "missing");
        assert_eq!(outcome.skipped[0].reason, "directory not found");
    }

    #[test]
    fn missing_directory_aborts_under_strict() {
        let temp = TempDir::new().unwrap();
        let mut cfg = config(&["missing"], &[".py"], &[]);
        cfg.strict = true;

        let root = fs::canonicalize(temp.path()).unwrap();
        let scanner = Scanner::new(root, &cfg, Path::new("/nowhere/out.txt")).unwrap();
        let err = scanner.scan().unwrap_err();
        assert!(matches!(err, CollectError::PathNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_recorded_as_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("top.py"), "a").unwrap();
        let locked = temp.path().join("sub");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.py"), "b").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Directory modes do not bind privileged users; nothing to observe then.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let outcome = scan(temp.path(), &config(&["."], &[".py"], &[]));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(relative_paths(&outcome), vec!["top.py"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].path, "sub");
        assert!(outcome.skipped[0].reason.contains("Permission denied"));
    }

    #[test]
    fn output_file_is_not_collected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::write(temp.path().join("context.txt"), "stale output").unwrap();

        let root = fs::canonicalize(temp.path()).unwrap();
        let output = root.join("context.txt");
        let scanner = Scanner::new(root, &config(&["."], &[".txt"], &[]), &output).unwrap();
        let outcome = scanner.scan().unwrap();
        assert_eq!(relative_paths(&outcome), vec!["a.txt"]);
    }

    #[test]
    fn invalid_exclude_pattern_is_a_setup_error() {
        let temp = TempDir::new().unwrap();
        let root = fs::canonicalize(temp.path()).unwrap();
        let err = Scanner::new(
            root,
            &config(&["."], &[".py"], &["broken["]),
            Path::new("/nowhere/out.txt"),
        )
        .unwrap_err();
        assert!(matches!(err, CollectError::InvalidGlob(_)));
    }
}
