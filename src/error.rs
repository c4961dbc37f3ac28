//! Error types for the lunar trading bot
//!
//! Configuration and wallet errors are fatal at startup; everything else is
//! recovered inside the iteration that raised it and never escapes the loop.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Subgraph query failed: {0}")]
    Subgraph(String),

    #[error("No viable swap route: {0}")]
    Route(String),

    #[error("Transaction simulation failed: {0}")]
    Simulation(String),

    #[error("Transaction submission failed: {0}")]
    Submission(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
