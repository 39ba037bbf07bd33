use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use quiz_trainer::{
    cli::{Cli, Command, StoreArgs},
    console, seed,
    server::QuizServer,
    session::SessionConfig,
    store::{MemoryStore, QuizStore, SqliteStore},
};

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stderr keeps logs out of the console session on stdout.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn open_store(args: &StoreArgs) -> Result<Arc<dyn QuizStore>> {
    let store: Arc<dyn QuizStore> = match &args.database {
        Some(path) => {
            let store = SqliteStore::open(path)
                .with_context(|| format!("failed to open database {}", path.display()))?;
            info!(path = %path.display(), "using sqlite quiz store");
            Arc::new(store)
        }
        None => {
            info!("using in-memory quiz store");
            Arc::new(MemoryStore::new())
        }
    };

    let quizzes = match (&args.seed_file, args.seed) {
        (Some(path), _) => Some(seed::load_file(path).await?),
        (None, true) => Some(seed::defaults()),
        (None, false) => None,
    };
    if let Some(quizzes) = quizzes {
        seed::seed_if_empty(store.as_ref(), &quizzes).await?;
    }

    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let store = open_store(&cli.store).await?;
    let mut config = SessionConfig {
        colored: !cli.no_color,
        ..SessionConfig::default()
    };

    match cli.command {
        Command::Serve(args) => {
            config.idle_timeout = args.idle_timeout.map(Duration::from_secs);
            let listener = TcpListener::bind(args.listen)
                .await
                .with_context(|| format!("failed to bind {}", args.listen))?;
            let server = QuizServer::new(listener, store, config);
            let addr = server.local_addr()?;
            info!("quiz server listening on {}", addr);
            if let Err(err) = server.run_until_ctrl_c().await {
                warn!("quiz server exited with error: {err:?}");
                return Err(err);
            }
        }
        Command::Console => console::run(store, config).await?,
    }

    Ok(())
}
