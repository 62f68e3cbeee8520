//! RAX S3 Volume - Entry Point
//!
//! Runs a single volume operation against the configured bucket.

use clap::Parser;
use log::info;
use std::process;
use tokio::io::AsyncWriteExt;

use rax_s3_volume::commands::{Cli, handle_command};
use rax_s3_volume::error::TransferError;
use rax_s3_volume::error::handlers::{error_to_exit_code, handle_error};
use rax_s3_volume::utils::logging::setup_logging;
use rax_s3_volume::{S3Volume, VolumeConfig, VolumeError};

#[tokio::main]
async fn main() {
    setup_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        handle_error(&e);
        process::exit(error_to_exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<(), VolumeError> {
    let config = VolumeConfig::load(cli.config.as_deref())?;
    let volume = S3Volume::connect(&config).await?;
    info!("Connected to bucket {}", volume.bucket_name());

    let mut stdout = tokio::io::stdout();
    handle_command(&volume, cli.command, &mut stdout).await?;
    stdout
        .flush()
        .await
        .map_err(|e| VolumeError::from(TransferError::OutputWriteFailed(e)))
}
