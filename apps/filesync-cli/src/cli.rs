use std::path::PathBuf;

use clap::{Parser, Subcommand};
use filesync_protocol::ServerAddress;

#[derive(Debug, Parser)]
#[command(name = "filesync")]
#[command(author, version, about = "Move files to and from a FileSync server", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Server to talk to (host or host:port), overriding the configured one
    #[arg(short, long, global = true)]
    pub server: Option<ServerAddress>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Check that the server is reachable
    Ping,
    /// List files available on the server
    List,
    /// Upload local files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Download files from the server
    Download {
        /// Names of the files to download
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        names: Vec<String>,
        /// Download every file on the server
        #[arg(long)]
        all: bool,
        /// Directory to write into, instead of the configured one
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Delete a file on the server
    Delete {
        /// Name of the remote file
        name: String,
    },
    /// List files already downloaded
    Downloads {
        /// Directory to look in, instead of the configured one
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Save the server address and optional directories
    Set {
        /// Server address (host or host:port; port defaults to 5000)
        address: ServerAddress,
        /// Where downloads are written
        #[arg(long)]
        download_dir: Option<PathBuf>,
        /// Also copy downloads into a "FileSync Downloads" album under this directory
        #[arg(long)]
        media_root: Option<PathBuf>,
    },
    /// Print the effective configuration
    Show,
}
