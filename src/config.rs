//! Configuration for the lunar trading bot
//!
//! Everything the bot needs from the outside world is resolved here, once, at
//! startup: per-network environment variables (node endpoint, subgraph
//! endpoint, vault address) and the per-network Enzyme/Uniswap deployment
//! table. A missing required variable is a fatal startup error; nothing in
//! the trading loop reads the environment again.

use crate::{Error, Result};
use alloy::primitives::{address, Address};
use std::str::FromStr;

/// Supported blockchain networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Ethereum,
    Polygon,
}

impl Network {
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Ethereum => 1,
            Network::Polygon => 137,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Polygon => "polygon",
        }
    }

    /// Environment variable holding the JSON-RPC endpoint URL
    pub fn node_endpoint_var(&self) -> &'static str {
        match self {
            Network::Ethereum => "ETHEREUM_NODE_ENDPOINT",
            Network::Polygon => "POLYGON_NODE_ENDPOINT",
        }
    }

    /// Environment variable holding the signing key
    pub fn private_key_var(&self) -> &'static str {
        match self {
            Network::Ethereum => "ETHEREUM_PRIVATE_KEY",
            Network::Polygon => "POLYGON_PRIVATE_KEY",
        }
    }

    /// Environment variable holding the Enzyme subgraph endpoint
    pub fn subgraph_endpoint_var(&self) -> &'static str {
        match self {
            Network::Ethereum => "ETHEREUM_SUBGRAPH_ENDPOINT",
            Network::Polygon => "POLYGON_SUBGRAPH_ENDPOINT",
        }
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ethereum" | "mainnet" => Ok(Network::Ethereum),
            "polygon" | "matic" => Ok(Network::Polygon),
            _ => Err(Error::Config(format!(
                "Unknown network: {s}. Supported: ethereum, polygon"
            ))),
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Environment variable holding the target vault address
pub const VAULT_ADDRESS_VAR: &str = "ENZYME_VAULT_ADDRESS";

/// Per-network protocol deployment addresses
#[derive(Debug, Clone, Copy)]
pub struct Deployment {
    /// Enzyme UniswapV3Adapter
    pub adapter: Address,
    /// Enzyme IntegrationManager
    pub integration_manager: Address,
    /// Uniswap V3 QuoterV2
    pub quoter: Address,
    /// Primary reserve asset (WETH)
    pub primary_asset: Address,
    /// Secondary asset (USDC)
    pub secondary_asset: Address,
}

impl Deployment {
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Ethereum => Deployment {
                adapter: address!("ed6a08e05cb4260388dc7cc60bc5fefcf1bcc86a"),
                integration_manager: address!("31329024f1a3e4a4b3336e0b1dfa74cc3fec633e"),
                quoter: address!("61ffe014ba17989e743c5f6cb21bf9697530b21e"),
                primary_asset: address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
                secondary_asset: address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
            },
            Network::Polygon => Deployment {
                adapter: address!("9ba1a10acb3fda2ce53bb8571b1be12f9c826048"),
                integration_manager: address!("92fcde09790671cf085864182b9670c77da0884b"),
                quoter: address!("61ffe014ba17989e743c5f6cb21bf9697530b21e"),
                primary_asset: address!("7ceb23fd6bc0add59e62ac25578270cff1b9f619"),
                secondary_asset: address!("2791bca1f2de4661ed88a30c99a7a9449aa84174"),
            },
        }
    }
}

/// Resolved bot configuration
///
/// Immutable after startup; shared by reference across iterations.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub network: Network,
    pub rpc_url: String,
    pub subgraph_endpoint: String,
    pub vault: Address,
    pub deployment: Deployment,
}

impl BotConfig {
    /// Resolve configuration from the environment for the given network
    ///
    /// Fails fast: any missing variable or malformed address aborts startup.
    pub fn from_env(network: Network) -> Result<Self> {
        let rpc_url = require_env(network.node_endpoint_var())?;
        let subgraph_endpoint = require_env(network.subgraph_endpoint_var())?;
        let vault_raw = require_env(VAULT_ADDRESS_VAR)?;
        let vault = Address::from_str(&vault_raw)
            .map_err(|e| Error::Config(format!("Invalid {VAULT_ADDRESS_VAR}: {e}")))?;

        Ok(Self {
            network,
            rpc_url,
            subgraph_endpoint,
            vault,
            deployment: Deployment::for_network(network),
        })
    }

    /// RPC endpoint URL for standalone commands that need no full config
    pub fn rpc_url_from_env(network: Network) -> Result<String> {
        require_env(network.node_endpoint_var())
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("Required environment variable {name} is not set")))
}
