//! mailsort Server
//!
//! HTTP front end for the email triage pipeline: accepts pasted text or an
//! uploaded `.txt`/`.pdf`, classifies it and returns a suggested reply.

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;
pub mod static_files;

pub use cli::Cli;
pub use config::ServerConfig;
pub use routes::create_router;
pub use state::AppState;
