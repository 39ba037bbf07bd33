use std::{
    future::Future,
    net::SocketAddr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use anyhow::Result;
use tokio::{
    io::BufReader,
    net::{TcpListener, TcpStream},
    select,
};
use tracing::{info, warn};

use crate::session::{Session, SessionConfig};
use crate::store::QuizStore;

type SessionId = u64;

/// Accepts TCP clients and runs one isolated [`Session`] per connection.
///
/// Sessions share nothing but the store, so a client quitting or
/// disconnecting never affects the others.
pub struct QuizServer {
    listener: TcpListener,
    state: Arc<ServerState>,
}

struct ServerState {
    store: Arc<dyn QuizStore>,
    config: SessionConfig,
    next_id: AtomicU64,
}

impl ServerState {
    fn next_id(&self) -> SessionId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl QuizServer {
    pub fn new(listener: TcpListener, store: Arc<dyn QuizStore>, config: SessionConfig) -> Self {
        Self {
            listener,
            state: Arc::new(ServerState {
                store,
                config,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts clients until `shutdown` resolves, then returns. Sessions
    /// already spawned are not awaited; they stop when the runtime does.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let QuizServer { listener, state } = self;
        tokio::pin!(shutdown);

        loop {
            select! {
                _ = &mut shutdown => {
                    info!("quiz server shutting down");
                    break;
                }
                accept_result = listener.accept() => {
                    handle_accept_result(accept_result, &state);
                }
            }
        }

        Ok(())
    }

    pub async fn run_until_ctrl_c(self) -> Result<()> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = ?err, "failed to install ctrl-c handler");
            }
        })
        .await
    }
}

fn handle_accept_result(
    result: std::io::Result<(TcpStream, SocketAddr)>,
    state: &Arc<ServerState>,
) {
    match result {
        Ok((stream, peer)) => spawn_session(stream, peer, state),
        Err(err) => warn!(error = ?err, "failed to accept connection"),
    }
}

fn spawn_session(stream: TcpStream, peer: SocketAddr, state: &Arc<ServerState>) {
    let state = Arc::clone(state);
    let id = state.next_id();
    tokio::spawn(async move {
        info!(session = id, peer = %peer, "client connected");
        match handle_connection(stream, &state).await {
            Ok(()) => info!(session = id, peer = %peer, "client disconnected"),
            Err(err) => warn!(session = id, peer = %peer, error = ?err, "session closed with error"),
        }
    });
}

async fn handle_connection(stream: TcpStream, state: &ServerState) -> std::io::Result<()> {
    let (reader, writer) = stream.into_split();
    let mut session = Session::new(
        BufReader::new(reader),
        writer,
        Arc::clone(&state.store),
        &state.config,
    );
    session.run().await
}
