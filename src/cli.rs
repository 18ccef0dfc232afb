use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"
{about}

{usage-heading} {usage}

{all-args}

{after-help}"#;

#[derive(Parser)]
#[command(name = "studybase")]
#[command(author, version)]
#[command(about = "AI-assisted search over academic course resources")]
#[command(after_help = "Examples:
  studybase search \"CS 61A midterm\"        Find resources for a course
  studybase search --format json \"phys 8b\"  Output results as JSON
  studybase serve --port 8080               Run the HTTP search API

Set ANTHROPIC_API_KEY to enable AI query analysis; without it the
deterministic fallback analysis is used.")]
#[command(help_template = HELP_TEMPLATE)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (defaults to the studybase home dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a one-shot study query against the configured store
    Search {
        /// Free-text study query (e.g. "Physics 8B electromagnetic waves")
        query: String,

        /// Maximum number of resources to return
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },

    /// Run the HTTP search API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Human,
    /// Pretty-printed JSON
    Json,
}
