use std::sync::Arc;

use args::Args;
use clap::Parser;
use log::{LevelFilter, error, info};
use server::ServerConfig;

use crate::files::PathResolver;

mod args;
mod files;
mod server;
mod web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    // The served root must exist before anything is exposed
    if !args.root_dir.exists() {
        error!("Root directory {:?} does not exist", args.root_dir);
        std::process::exit(1);
    }

    if !args.root_dir.is_dir() {
        error!("Root directory {:?} is not a directory", args.root_dir);
        std::process::exit(1);
    }

    // Canonicalize once at startup; every request path is checked against
    // this exact form
    let root_dir = match args.root_dir.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            error!(
                "Failed to canonicalize root directory {:?}: {}",
                args.root_dir, e
            );
            std::process::exit(1);
        }
    };

    info!("Serving root directory: {:?}", root_dir);
    match args.max_upload_size {
        Some(limit) => info!("Max upload size: {} bytes", limit),
        None => info!("Max upload size: unlimited"),
    }

    let config = Arc::new(ServerConfig {
        resolver: PathResolver::new(root_dir),
        max_upload_size: args.max_upload_size,
        chunk_size: args.chunk_size,
    });

    info!("Starting file server on {}:{}", args.host, args.port);
    server::run(config, &args.host, args.port).await
}
