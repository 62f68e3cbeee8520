use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse and edit an S3 bucket as a directory tree
#[derive(Parser, Debug)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Show metadata of a path
    Stat { path: String },

    /// List the immediate children of a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Create a directory
    Mkdir { parent: String, name: String },

    /// Create an empty file
    Touch { parent: String, name: String },

    /// Upload a local file into a directory
    Put {
        file: PathBuf,
        dir: String,

        /// Entry name, defaults to the local file name
        #[arg(long)]
        name: Option<String>,

        /// Content type stored with the object
        #[arg(long, default_value = "application/octet-stream")]
        mime: String,
    },

    /// Download a file
    Get {
        path: String,

        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Delete a file
    Rm { path: String },

    /// Remove a directory marker
    Rmdir { path: String },
}
