//! Terminal implementation of the interactive channel
//!
//! Prompts go to the writer, replies are read line by line, and delivered
//! files are copied into the output directory.

use crate::channel::InteractiveChannel;
use crate::ChannelError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

/// Line-oriented channel over any async reader/writer pair
pub struct TerminalChannel<R, W> {
    lines: Lines<R>,
    writer: W,
    output_dir: PathBuf,
}

impl TerminalChannel<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Channel over the process's stdin and stdout
    pub fn stdio(output_dir: impl Into<PathBuf>) -> Self {
        Self::new(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            output_dir,
        )
    }
}

impl<R, W> TerminalChannel<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            lines: reader.lines(),
            writer,
            output_dir: output_dir.into(),
        }
    }

    /// Consumes the channel and returns the writer
    pub fn into_writer(self) -> W {
        self.writer
    }

    async fn write_block(&mut self, text: &str) -> Result<(), ChannelError> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl<R, W> InteractiveChannel for TerminalChannel<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn prompt_and_await_text(&mut self, prompt: &str) -> Result<String, ChannelError> {
        self.write_block(prompt).await?;
        self.writer.write_all(b"> ").await?;
        self.writer.flush().await?;

        match self.lines.next_line().await? {
            Some(line) => Ok(line),
            None => Err(ChannelError::Closed),
        }
    }

    async fn deliver_message(&mut self, text: &str) -> Result<(), ChannelError> {
        self.write_block(text).await
    }

    async fn deliver_file(&mut self, path: &Path, caption: &str) -> Result<(), ChannelError> {
        let file_name = path.file_name().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} has no file name", path.display()),
            )
        })?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let destination = free_destination(&self.output_dir, Path::new(file_name)).await?;
        tokio::fs::copy(path, &destination).await?;
        tracing::info!("Delivered {}", destination.display());

        let message = format!("{}\n📎 {}", caption, destination.display());
        self.write_block(&message).await
    }
}

/// First `name`, `name_2`, `name_3`... not yet present in `dir`
///
/// Batches with the same sanitized title must not replace each other's
/// delivered manifests.
async fn free_destination(dir: &Path, file_name: &Path) -> std::io::Result<PathBuf> {
    let candidate = dir.join(file_name);
    if !tokio::fs::try_exists(&candidate).await? {
        return Ok(candidate);
    }

    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = file_name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n = 2;
    loop {
        let candidate = dir.join(format!("{}_{}{}", stem, n, extension));
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        n += 1;
    }
}
