use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A cli client for a file drop server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Origin of the file drop server, e.g. http://localhost:8080
    #[arg(short, long, global = true)]
    pub origin: Option<String>,

    /// Directory downloaded files are written to
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Do not draw progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Upload files and print the links to them
    Upload {
        #[arg(required = true)]
        file_paths: Vec<PathBuf>,
    },
    /// Download files by ID, e.g. 4f2a9c/notes.txt
    Download {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete files by ID
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Print the server address and usage guide
    Endpoint,
}

impl Cli {
    pub fn parse_arguments() -> Cli {
        Cli::parse()
    }
}
