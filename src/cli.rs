use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "esg-analyze")]
#[command(about = "ESG analysis of green finance project reports (PDF)")]
#[command(version)]
pub struct Args {
    /// PDF report, or a directory searched recursively for PDFs
    pub input: PathBuf,

    /// Groq API key (overrides GROQ_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model identifier (overrides GROQ_MODEL; default llama-3.3-70b-versatile)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Chat completions base URL (overrides GROQ_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// HTTP timeout for the analysis request, in seconds (none by default)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Write one <name>.md per report into this directory instead of printing
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Reject files larger than this many megabytes
    #[arg(long, default_value = "200")]
    pub max_size_mb: u64,

    /// Analyze reports even when no text could be extracted
    #[arg(long)]
    pub allow_empty: bool,

    /// Only extract and print the text; no API call
    #[arg(long)]
    pub extract_only: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
