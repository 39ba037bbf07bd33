use std::{net::SocketAddr, path::PathBuf};

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Disable ANSI colours in session output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Accept telnet/netcat clients over TCP, one session per connection.
    Serve(ServeArgs),
    /// Run a single session on this terminal.
    Console,
}

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// SQLite database holding the quizzes. Without it quizzes live in memory.
    #[arg(long, global = true, env = "QUIZ_DATABASE")]
    pub database: Option<PathBuf>,

    /// Insert the built-in sample quizzes when the store is empty.
    #[arg(long, global = true)]
    pub seed: bool,

    /// Insert quizzes from a JSON file when the store is empty.
    #[arg(long, global = true)]
    pub seed_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Socket address the server should bind to. Use port 0 for an ephemeral port.
    #[arg(long, default_value = "127.0.0.1:3030")]
    pub listen: SocketAddr,

    /// Close sessions that send nothing for this many seconds.
    #[arg(long, value_name = "SECS")]
    pub idle_timeout: Option<u64>,
}
