use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Represents the final configuration after merging the document and CLI args.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub included_directories: Vec<String>,
    pub file_extensions: Vec<String>,
    pub exclude_files: Vec<String>,
    pub llm_instructions: Vec<String>,
    pub influxdb: Option<InfluxDbConfig>,
    pub strict: bool,
}

/// Connection settings for the external telemetry reporter.
///
/// The collector only carries these values; it never opens a connection.
#[derive(Clone, Deserialize)]
pub struct InfluxDbConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
}

// Keep the token out of logs and debug dumps.
impl fmt::Debug for InfluxDbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfluxDbConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("org", &self.org)
            .field("bucket", &self.bucket)
            .finish()
    }
}

/// Represents a single file retained by the scan, before its content is read.
#[derive(Debug)]
pub struct FileEntry {
    pub path: PathBuf,
    pub relative_path: String,
}

/// A file whose content made it into the output document.
#[derive(Debug)]
pub struct CollectedFile {
    pub relative_path: String,
    pub content: String,
}

/// A path the run could not collect, with the reason it was skipped.
#[derive(Debug)]
pub struct SkipRecord {
    pub path: String,
    pub reason: String,
}

/// Everything a single collection pass produced.
#[derive(Debug)]
pub struct Collection {
    pub files: Vec<CollectedFile>,
    pub skipped: Vec<SkipRecord>,
}
