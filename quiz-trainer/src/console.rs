use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::info;

use crate::session::{Session, SessionConfig};
use crate::store::QuizStore;

/// Runs one session over stdin/stdout. Returning ends the process, so `quit`
/// or end of input exits with status 0.
pub async fn run(store: Arc<dyn QuizStore>, config: SessionConfig) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    info!("starting console session");
    let mut session = Session::new(stdin, stdout, store, &config);
    session.run().await.context("console session failed")?;
    Ok(())
}
