use std::path::PathBuf;

use clap::Parser;

/// Command-line configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// IP address to listen on
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Root directory exposed to clients
    #[arg(long, default_value = ".")]
    pub root_dir: PathBuf,

    /// Maximum accepted upload size in bytes (unlimited when omitted)
    #[arg(long)]
    pub max_upload_size: Option<u64>,

    /// Chunk size for streamed file responses (in bytes)
    #[arg(long, default_value = "65536")]
    pub chunk_size: usize,
}
