//! Per-connection read-eval loop.
//!
//! A [`Session`] owns one client's input, output, prompt and random source
//! plus a handle on the shared store. [`Session::run`] prompts, reads a line,
//! hands the parsed command to [`crate::handlers`] and reports any
//! recoverable error. The prompt is only written at the top of the loop, so
//! every command (successful or not) is followed by exactly one prompt,
//! except `quit` and a lost stream which end the session.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::command::{Command, ParseError};
use crate::error::{QuizError, SessionError};
use crate::handlers;
use crate::output::{Color, Output};
use crate::store::QuizStore;

pub const BANNER: &str = "CORE quiz";
pub const FAREWELL: &str = "See you later!";
pub const DEFAULT_PROMPT: &str = "quiz> ";

const LINE_ENDINGS: &[char] = &['\n', '\r'];

/// Longest input line accepted; longer lines are dropped and reported.
pub const MAX_LINE_BYTES: usize = 8 * 1024;

/// One raw read from the client.
enum RawLine {
    Text(Vec<u8>),
    TooLong,
    End,
}

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Settings applied to every session a server or console starts.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub prompt: String,
    pub colored: bool,
    /// Ends the session when no line arrives for this long.
    pub idle_timeout: Option<Duration>,
    /// Fixed seed for `play`; entropy when `None`.
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            colored: true,
            idle_timeout: None,
            rng_seed: None,
        }
    }
}

pub struct Session<R, W> {
    reader: R,
    output: Output<W>,
    store: Arc<dyn QuizStore>,
    prompt: String,
    idle_timeout: Option<Duration>,
    rng: StdRng,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W, store: Arc<dyn QuizStore>, config: &SessionConfig) -> Self {
        let output = Output::new(writer, config.colored);
        let prompt = output.paint(&config.prompt, Color::Blue);
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            reader,
            output,
            store,
            prompt,
            idle_timeout: config.idle_timeout,
            rng,
        }
    }

    /// Runs until `quit`, end of input or idle timeout, then says goodbye.
    ///
    /// Only a failing stream is returned as an error.
    pub async fn run(&mut self) -> io::Result<()> {
        self.output.colored(BANNER, Color::Green).await?;

        loop {
            self.output.prompt(&self.prompt).await?;

            let line = match self.read_line().await {
                Ok(line) => line,
                Err(SessionError::Quiz(err)) => {
                    self.report(err).await?;
                    continue;
                }
                Err(SessionError::Io(err)) => return Err(err),
                Err(SessionError::Closed) => break,
            };

            match self.execute(&line).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(SessionError::Quiz(err)) => self.report(err).await?,
                Err(SessionError::Io(err)) => return Err(err),
                Err(SessionError::Closed) => break,
            }
        }

        if let Err(err) = self.output.line(FAREWELL).await {
            debug!(error = ?err, "could not deliver farewell");
        }
        Ok(())
    }

    /// Parses and executes one line of input.
    pub async fn execute(&mut self, line: &str) -> Result<Flow, SessionError> {
        match Command::parse(line) {
            Ok(None) => Ok(Flow::Continue),
            Ok(Some(command)) => {
                debug!(?command, "executing command");
                handlers::dispatch(self, command).await
            }
            Err(ParseError::Unknown(token)) => {
                handlers::unknown(self, &token).await?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Writes `prompt` and waits for the reply, without its line ending.
    pub async fn ask(&mut self, prompt: &str) -> Result<String, SessionError> {
        self.output.prompt(prompt).await?;
        self.read_line().await
    }

    pub fn output(&mut self) -> &mut Output<W> {
        &mut self.output
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        self.output.paint(text, color)
    }

    pub fn store(&self) -> &dyn QuizStore {
        self.store.as_ref()
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// The output stream, e.g. to inspect what a test session wrote.
    pub fn into_writer(self) -> W {
        self.output.into_inner()
    }

    /// Reads one line, decoding invalid UTF-8 with replacement characters.
    async fn read_line(&mut self) -> Result<String, SessionError> {
        let read = read_capped(&mut self.reader);

        let raw = match self.idle_timeout {
            Some(limit) => match timeout(limit, read).await {
                Ok(result) => result?,
                Err(_) => {
                    debug!(?limit, "session idle timeout");
                    self.output.line("Idle for too long, closing session.").await?;
                    return Err(SessionError::Closed);
                }
            },
            None => read.await?,
        };

        match raw {
            RawLine::Text(bytes) => Ok(String::from_utf8_lossy(&bytes)
                .trim_end_matches(LINE_ENDINGS)
                .to_string()),
            RawLine::TooLong => Err(QuizError::LineTooLong(MAX_LINE_BYTES).into()),
            RawLine::End => Err(SessionError::Closed),
        }
    }

    async fn report(&mut self, err: QuizError) -> io::Result<()> {
        match err {
            QuizError::Validation(problems) => {
                for problem in problems {
                    self.output.error(&problem).await?;
                }
                Ok(())
            }
            QuizError::Store(ref message) => {
                warn!(error = %message, "store operation failed");
                self.output.error(&err.to_string()).await
            }
            other => self.output.error(&other.to_string()).await,
        }
    }
}

/// Reads up to [`MAX_LINE_BYTES`] of the next line. The rest of a longer
/// line is consumed and discarded so it cannot be read as a command.
async fn read_capped<R>(reader: &mut R) -> io::Result<RawLine>
where
    R: AsyncBufRead + Unpin,
{
    let limit = MAX_LINE_BYTES as u64;
    let mut buf = Vec::new();
    if (&mut *reader).take(limit).read_until(b'\n', &mut buf).await? == 0 {
        return Ok(RawLine::End);
    }
    if buf.ends_with(b"\n") || buf.len() < MAX_LINE_BYTES {
        return Ok(RawLine::Text(buf));
    }

    loop {
        buf.clear();
        let read = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;
        if read == 0 || buf.ends_with(b"\n") {
            return Ok(RawLine::TooLong);
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;

    use super::*;
    use crate::store::MemoryStore;

    fn config() -> SessionConfig {
        SessionConfig {
            colored: false,
            rng_seed: Some(3),
            ..SessionConfig::default()
        }
    }

    async fn run_script(store: Arc<dyn QuizStore>, script: &str) -> String {
        let mut session = Session::new(script.as_bytes(), Vec::new(), store, &config());
        session.run().await.expect("session run");
        String::from_utf8(session.into_writer()).expect("utf8 output")
    }

    #[tokio::test]
    async fn blank_lines_only_prompt_again() {
        let output = run_script(Arc::new(MemoryStore::new()), "\n   \nquit\n").await;
        assert_eq!(
            output,
            format!("{BANNER}\n{DEFAULT_PROMPT}{DEFAULT_PROMPT}{DEFAULT_PROMPT}{FAREWELL}\n")
        );
    }

    #[tokio::test]
    async fn end_of_input_says_goodbye() {
        let output = run_script(Arc::new(MemoryStore::new()), "").await;
        assert_eq!(output, format!("{BANNER}\n{DEFAULT_PROMPT}{FAREWELL}\n"));
    }

    #[tokio::test]
    async fn crlf_line_endings_are_stripped() {
        let store = Arc::new(MemoryStore::new());
        store.create("Capital of Italy", "Rome").await.expect("create");
        let output = run_script(store, "show 1\r\nq\r\n").await;
        assert!(output.contains("[1]: Capital of Italy => Rome\n"));
    }

    #[tokio::test]
    async fn overlong_line_is_dropped_up_to_its_newline() {
        let mut input = vec![b'x'; MAX_LINE_BYTES * 3];
        input.extend_from_slice(b"\nnext\n");
        let mut reader: &[u8] = &input;

        assert!(matches!(read_capped(&mut reader).await.expect("read"), RawLine::TooLong));
        match read_capped(&mut reader).await.expect("read") {
            RawLine::Text(line) => assert_eq!(line, b"next\n"),
            _ => panic!("expected the following line"),
        }
        assert!(matches!(read_capped(&mut reader).await.expect("read"), RawLine::End));
    }

    #[tokio::test]
    async fn idle_session_is_closed() {
        let (client, server) = tokio::io::duplex(1024);
        let (server_read, server_write) = tokio::io::split(server);
        let config = SessionConfig {
            idle_timeout: Some(Duration::from_millis(50)),
            ..config()
        };
        let mut session = Session::new(
            tokio::io::BufReader::new(server_read),
            server_write,
            Arc::new(MemoryStore::new()),
            &config,
        );

        timeout(Duration::from_secs(2), session.run())
            .await
            .expect("session should end on its own")
            .expect("session run");
        drop(session);

        let mut received = String::new();
        let mut client = client;
        client
            .read_to_string(&mut received)
            .await
            .expect("read output");
        assert!(received.contains("Idle for too long"));
        assert!(received.ends_with(&format!("{FAREWELL}\n")));
    }
}
