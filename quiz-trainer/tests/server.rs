use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{bail, Result};
use quiz_trainer::{
    server::QuizServer,
    session::{SessionConfig, BANNER, DEFAULT_PROMPT, FAREWELL},
    store::{MemoryStore, QuizStore},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpListener, TcpStream,
    },
    sync::oneshot,
    task::JoinHandle,
    time::timeout,
};

const READ_TIMEOUT: Duration = Duration::from_secs(2);

struct TestServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl TestServer {
    async fn start(store: Arc<dyn QuizStore>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let config = SessionConfig {
            colored: false,
            ..SessionConfig::default()
        };
        let server = QuizServer::new(listener, store, config);
        let addr = server.local_addr()?;

        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.await;
            };
            let _ = server.run_until(shutdown).await;
        });

        Ok(Self {
            addr,
            shutdown,
            task,
        })
    }

    async fn stop(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}

struct Client {
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (reader, writer) = stream.into_split();
        let mut client = Self { reader, writer };

        let greeting = client.read_until(DEFAULT_PROMPT).await?;
        assert_eq!(greeting, format!("{BANNER}\n{DEFAULT_PROMPT}"));
        Ok(client)
    }

    async fn send(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Sends `line` and returns the output up to and including `marker`.
    async fn exchange(&mut self, line: &str, marker: &str) -> Result<String> {
        self.send(line).await?;
        self.read_until(marker).await
    }

    async fn read_until(&mut self, marker: &str) -> Result<String> {
        let mut received = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let read = timeout(READ_TIMEOUT, self.reader.read(&mut chunk)).await??;
            if read == 0 {
                bail!(
                    "connection closed before '{marker}', got {:?}",
                    String::from_utf8_lossy(&received)
                );
            }
            received.extend_from_slice(&chunk[..read]);

            let text = String::from_utf8_lossy(&received);
            if text.ends_with(marker) {
                return Ok(text.into_owned());
            }
        }
    }

    async fn read_to_end(&mut self) -> Result<String> {
        let mut received = String::new();
        timeout(READ_TIMEOUT, self.reader.read_to_string(&mut received)).await??;
        Ok(received)
    }
}

#[tokio::test]
async fn sessions_share_the_store() -> Result<()> {
    let server = TestServer::start(Arc::new(MemoryStore::new())).await?;
    let mut alice = Client::connect(server.addr).await?;
    let mut bob = Client::connect(server.addr).await?;

    alice.exchange("add", " Enter a question: ").await?;
    alice.exchange("Capital of Italy", " Enter the answer: ").await?;
    let added = alice.exchange("Rome", DEFAULT_PROMPT).await?;
    assert!(added.contains("Added: [1]: Capital of Italy => Rome"));

    let listed = bob.exchange("list", DEFAULT_PROMPT).await?;
    assert_eq!(listed, format!("[1]: Capital of Italy\n{DEFAULT_PROMPT}"));

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn quitting_ends_only_that_session() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    store.create("Capital of France", "Paris").await?;
    let server = TestServer::start(store).await?;

    let mut alice = Client::connect(server.addr).await?;
    let mut bob = Client::connect(server.addr).await?;

    alice.send("quit").await?;
    assert_eq!(alice.read_to_end().await?, format!("{FAREWELL}\n"));

    let shown = bob.exchange("show 1", DEFAULT_PROMPT).await?;
    assert_eq!(shown, format!("[1]: Capital of France => Paris\n{DEFAULT_PROMPT}"));

    // New clients are still accepted after one left.
    let mut carol = Client::connect(server.addr).await?;
    carol.exchange("credits", DEFAULT_PROMPT).await?;

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn concurrent_games_keep_separate_working_sets() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    store.create("First?", "yes").await?;
    store.create("Second?", "yes").await?;
    let server = TestServer::start(store).await?;

    let mut alice = Client::connect(server.addr).await?;
    let mut bob = Client::connect(server.addr).await?;

    alice.exchange("play", "?\n").await?;
    bob.exchange("play", "?\n").await?;
    alice.exchange("yes", "?\n").await?;
    bob.exchange("yes", "?\n").await?;

    let alice_done = alice.exchange("yes", DEFAULT_PROMPT).await?;
    let bob_done = bob.exchange("yes", DEFAULT_PROMPT).await?;
    for done in [alice_done, bob_done] {
        assert!(done.contains("CORRECT - 2 right so far\n"));
        assert!(done.contains("End of quiz. Score: 2\n"));
    }

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn abrupt_disconnect_does_not_stop_the_server() -> Result<()> {
    let server = TestServer::start(Arc::new(MemoryStore::new())).await?;

    let mut dropped = Client::connect(server.addr).await?;
    dropped.send("add").await?;
    drop(dropped);

    let mut client = Client::connect(server.addr).await?;
    let listed = client.exchange("list", DEFAULT_PROMPT).await?;
    assert_eq!(listed, DEFAULT_PROMPT);

    server.stop().await;
    Ok(())
}
