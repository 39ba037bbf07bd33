//! Telnet-style quiz trainer.
//!
//! Users connect with telnet or netcat (or run the console on a terminal)
//! and manage question/answer quizzes with short commands: `list`, `show`,
//! `add`, `edit`, `delete`, `test` and `play`. Each module focuses on one
//! concern:
//!
//! - [`cli`] parses the command line for the `serve` and `console` modes.
//! - [`server`] accepts TCP connections and runs one session per client.
//! - [`console`] runs a single session over stdin/stdout.
//! - [`session`] is the per-connection prompt/read/dispatch loop.
//! - [`command`] parses input lines, validates ids and completes commands.
//! - [`handlers`] implements each command against the store.
//! - [`game`] holds the state of one `play` run.
//! - [`store`] defines the [`store::QuizStore`] trait with in-memory and
//!   SQLite backends.
//! - [`output`] writes plain or coloured lines to a session.
//! - [`seed`] fills an empty store with sample or file-provided quizzes.
//!
//! Integration tests drive sessions over in-memory streams and real TCP
//! sockets through this crate directly.

pub mod cli;
pub mod command;
pub mod console;
pub mod error;
pub mod game;
pub mod handlers;
pub mod model;
pub mod output;
pub mod seed;
pub mod server;
pub mod session;
pub mod store;
