//! Enzyme Lunar Trading Bot
//!
//! An unattended trading agent for Enzyme Finance vaults that:
//! - Derives a trade signal from the current lunar phase
//! - Prices WETH/USDC swaps against Uniswap V3
//! - Routes swaps through the vault's IntegrationManager as `takeOrder` calls
//! - Submits transactions on a fixed 60-second cadence, forever
//!
//! # Security Model
//!
//! - The private key lives only inside the wallet module and is never logged
//! - Every transaction is dry-run via `eth_call` before any gas is spent
//! - All shared state (wallet, provider, vault snapshot) is read-only after
//!   startup, so iterations need no locking

pub mod config;
pub mod gas;
pub mod route;
pub mod runner;
pub mod scheduler;
pub mod signal;
pub mod subgraph;
pub mod submit;
pub mod swap;
pub mod vault;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use config::{BotConfig, Network};
pub use error::{Error, Result};
pub use runner::TradingSession;
pub use scheduler::{IterationOutcome, Scheduler};
