use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Collect project files into a single context document for LLMs"
)]
pub struct Cli {
    /// Path to the configuration document (default: config.yaml, then
    /// ~/.config/collectctx/config.yaml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// File the context document is written to
    #[arg(long, short = 'o', default_value = "llm_context.txt")]
    pub output: PathBuf,

    /// Project root the included directories are resolved against
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Abort when an included directory does not exist instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Append a host system summary section to the document
    #[arg(long)]
    pub system_info: bool,
}
