use log::info;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tokio::fs::File;
use tokio::io::{self, AsyncWrite, AsyncWriteExt};

use crate::commands::parser::Command;
use crate::error::{TransferError, VolumeError};
use crate::metadata::StatRecord;
use crate::volume::Volume;

// Run a single command against the volume, writing any report to `out`
pub async fn handle_command<W>(
    volume: &dyn Volume,
    command: Command,
    out: &mut W,
) -> Result<(), VolumeError>
where
    W: AsyncWrite + Unpin + Send,
{
    match command {
        Command::Stat { path } => handle_cmd_stat(volume, &path, out).await,
        Command::Ls { path } => handle_cmd_ls(volume, &path, out).await,
        Command::Mkdir { parent, name } => {
            let path = volume.create_directory(&parent, &name).await?;
            write_line(out, &path).await
        }
        Command::Touch { parent, name } => {
            let path = volume.create_file(&parent, &name).await?;
            write_line(out, &path).await
        }
        Command::Put {
            file,
            dir,
            name,
            mime,
        } => handle_cmd_put(volume, &file, &dir, name, &mime, out).await,
        Command::Get { path, output } => handle_cmd_get(volume, &path, output.as_deref(), out).await,
        Command::Rm { path } => volume.delete(&path).await,
        Command::Rmdir { path } => volume.remove_directory(&path).await,
    }
}

// Command handler for STAT
async fn handle_cmd_stat<W>(volume: &dyn Volume, path: &str, out: &mut W) -> Result<(), VolumeError>
where
    W: AsyncWrite + Unpin + Send,
{
    let stat = volume.stat(path).await?;
    write_line(out, &format_stat(&volume.logical_path(path)?, &stat)).await
}

// Command handler for LS
async fn handle_cmd_ls<W>(volume: &dyn Volume, path: &str, out: &mut W) -> Result<(), VolumeError>
where
    W: AsyncWrite + Unpin + Send,
{
    for child in volume.list(path).await? {
        write_line(out, &child).await?;
    }
    Ok(())
}

// Command handler for PUT
async fn handle_cmd_put<W>(
    volume: &dyn Volume,
    file: &Path,
    dir: &str,
    name: Option<String>,
    mime: &str,
    out: &mut W,
) -> Result<(), VolumeError>
where
    W: AsyncWrite + Unpin + Send,
{
    let name = match name {
        Some(name) => name,
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| VolumeError::InvalidName(file.display().to_string()))?,
    };

    let mut source = File::open(file)
        .await
        .map_err(|e| VolumeError::from(TransferError::StreamReadFailed(e)))?;
    let path = volume.save(&mut source, dir, &name, mime).await?;
    info!("Uploaded {} to {}", file.display(), path);
    write_line(out, &path).await
}

// Command handler for GET
async fn handle_cmd_get<W>(
    volume: &dyn Volume,
    path: &str,
    output: Option<&Path>,
    out: &mut W,
) -> Result<(), VolumeError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut handle = volume.open_for_read(path).await?;

    let copied = match output {
        Some(target) => match File::create(target).await {
            Ok(mut file) => io::copy(&mut handle, &mut file).await,
            Err(e) => Err(e),
        },
        None => io::copy(&mut handle, out).await,
    };

    // Scratch copy goes away even when the copy failed
    volume.close(handle, path).await?;
    let written = copied.map_err(|e| VolumeError::from(TransferError::OutputWriteFailed(e)))?;
    info!("Downloaded {} ({} bytes)", path, written);
    Ok(())
}

fn format_stat(path: &str, stat: &StatRecord) -> String {
    let modified = stat
        .modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!(
        "{}\t{}\t{} bytes\tmodified {}\t{}{}",
        path,
        stat.mime,
        stat.size,
        modified,
        if stat.read { "r" } else { "-" },
        if stat.write { "w" } else { "-" },
    )
}

async fn write_line<W>(out: &mut W, line: &str) -> Result<(), VolumeError>
where
    W: AsyncWrite + Unpin + Send,
{
    out.write_all(format!("{}\n", line).as_bytes())
        .await
        .map_err(|e| VolumeError::from(TransferError::OutputWriteFailed(e)))
}
