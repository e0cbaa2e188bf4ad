use clap::{Parser, Subcommand, ValueEnum};

use crate::model::TargetExtension;

pub mod commands;
pub mod config;
pub mod output;

#[derive(Parser)]
#[command(
    name = "repath",
    version,
    about = "Rewrite TypeScript path aliases into relative imports for emitted modules"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Path to tsconfig.json (default: <project root>/tsconfig.json)
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Extension rewritten specifiers should carry
    #[arg(long, global = true)]
    pub ext: Option<TargetExtension>,

    /// Include only files matching this glob
    #[arg(long, global = true)]
    pub include: Vec<String>,

    /// Exclude files matching this glob
    #[arg(long, global = true)]
    pub exclude: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite specifiers in source files and write the results
    Convert {
        /// Source directory or single file (default: current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Output directory (default: next to each source file)
        #[arg(long)]
        out: Option<String>,

        /// Print rewritten text to stdout instead of writing (single file only)
        #[arg(long)]
        stdout: bool,
    },

    /// Print the resolved alias table
    Aliases,
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
