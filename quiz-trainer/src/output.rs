use std::io;

use crossterm::style::Stylize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub use crossterm::style::Color;

/// Line-oriented writer for a session's output stream.
///
/// Every write is flushed right away so prompts reach telnet/netcat peers
/// before the session blocks on the next line.
pub struct Output<W> {
    writer: W,
    colored: bool,
}

impl<W> Output<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W, colored: bool) -> Self {
        Self { writer, colored }
    }

    /// Wraps `text` in ANSI colour codes unless colouring is disabled.
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.colored {
            text.with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub async fn line(&mut self, text: &str) -> io::Result<()> {
        self.write(text).await?;
        self.write("\n").await
    }

    pub async fn colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        let painted = self.paint(text, color);
        self.line(&painted).await
    }

    /// Writes `Error: <message>`.
    pub async fn error(&mut self, message: &str) -> io::Result<()> {
        let line = format!(
            "{}: {}",
            self.paint("Error", Color::Red),
            self.paint(message, Color::Red)
        );
        self.line(&line).await
    }

    /// Writes `text` without a line break, for prompts.
    pub async fn prompt(&mut self, text: &str) -> io::Result<()> {
        self.write(text).await
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    async fn write(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await
    }
}
