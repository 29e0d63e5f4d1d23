use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "revu")]
#[command(about = "Credential-safe AI review workflow for Bitbucket pull requests", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the MCP server on stdio
    Mcp,

    /// List open pull requests with review status
    Prs,

    /// Redact credentials from a file (or stdin) and print the result
    Sanitize {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
    },
}
