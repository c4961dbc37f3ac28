//! Trading session and iteration logic
//!
//! A `TradingSession` is an immutable record of everything one process run
//! needs: resolved configuration, the signing wallet's provider, the vault
//! snapshot, and the oracle handles. It is built once by the async `connect`
//! factory and then passed by reference to stateless iteration functions; no
//! component mutates it.

use crate::config::{BotConfig, Network};
use crate::gas::{EthGasStation, GasOracle, PolygonGasStation};
use crate::route::{RouteOracle, UniswapV3Quoter};
use crate::scheduler::IterationOutcome;
use crate::signal::{self, TradeSignal};
use crate::subgraph::SubgraphClient;
use crate::swap;
use crate::vault::{self, VaultSnapshot};
use crate::wallet::SigningWallet;
use crate::{submit, Error, Result};
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use chrono::Utc;
use tracing::info;

sol! {
    function balanceOf(address account) external view returns (uint256);
}

/// Fraction of the outgoing asset balance to trade, in basis points (50%)
const TRADE_SIZE_BPS: u64 = 5_000;

const BPS_DENOMINATOR: u64 = 10_000;

/// Gas-price confirmation window for the mainnet oracle, in minutes
const GAS_PRICE_WAIT_MINUTES: f64 = 3.0;

/// What an iteration decided to do
#[derive(Debug, Clone)]
pub struct TradeIntent {
    pub direction: TradeSignal,
    pub incoming_asset: Address,
    pub outgoing_asset: Address,
    pub outgoing_amount: U256,
}

/// Immutable per-process session: configuration plus long-lived handles
pub struct TradingSession {
    config: BotConfig,
    wallet_address: Address,
    provider: DynProvider,
    snapshot: VaultSnapshot,
    route_oracle: Box<dyn RouteOracle>,
    gas_oracle: Box<dyn GasOracle>,
    dry_run: bool,
}

impl TradingSession {
    /// Resolve configuration, connect the provider, and fetch the vault
    /// snapshot
    ///
    /// Any failure here is fatal: the loop never starts with partial state.
    pub async fn connect(network: Network, dry_run: bool) -> Result<Self> {
        let config = BotConfig::from_env(network)?;
        let wallet = SigningWallet::from_env(network.private_key_var())?;
        let wallet_address = wallet.address();

        let url: url::Url = config
            .rpc_url
            .parse()
            .map_err(|e| Error::Config(format!("Invalid RPC URL: {e}")))?;
        let provider = ProviderBuilder::new()
            .wallet(wallet.wallet().clone())
            .connect_http(url)
            .erased();

        let subgraph = SubgraphClient::new(config.subgraph_endpoint.clone());
        let snapshot = subgraph.vault_snapshot(config.vault).await?;
        info!(
            vault = %config.vault,
            comptroller = %snapshot.comptroller,
            tracked_assets = snapshot.tracked_assets.len(),
            "loaded vault snapshot"
        );

        let route_oracle: Box<dyn RouteOracle> = Box::new(UniswapV3Quoter::new(
            provider.clone(),
            config.deployment.quoter,
        ));
        let gas_oracle: Box<dyn GasOracle> = match network {
            Network::Ethereum => Box::new(EthGasStation::new(GAS_PRICE_WAIT_MINUTES)),
            Network::Polygon => Box::new(PolygonGasStation::new()),
        };

        Ok(Self {
            config,
            wallet_address,
            provider,
            snapshot,
            route_oracle,
            gas_oracle,
            dry_run,
        })
    }

    /// Run one iteration end-to-end and classify the result
    ///
    /// Never returns an error: every failure is folded into the outcome so
    /// the scheduler can reschedule unconditionally.
    pub async fn run_iteration(&self) -> IterationOutcome {
        match self.trade_once().await {
            Ok(Some(result)) => IterationOutcome::Traded(result),
            Ok(None) => IterationOutcome::Skipped,
            Err(error) => IterationOutcome::Failed(error),
        }
    }

    async fn trade_once(&self) -> Result<Option<submit::SubmissionResult>> {
        let age = signal::lunar_age(Utc::now());
        info!(lunar_age = age, "evaluated lunar indicator");

        let Some(intent) = self.build_intent(signal::evaluate(age)).await? else {
            return Ok(None);
        };
        info!(
            direction = ?intent.direction,
            incoming = %intent.incoming_asset,
            outgoing = %intent.outgoing_asset,
            outgoing_amount = %intent.outgoing_amount,
            "built trade intent"
        );

        let route = self
            .route_oracle
            .quote(
                intent.outgoing_asset,
                intent.incoming_asset,
                intent.outgoing_amount,
            )
            .await?;
        info!(output_amount = %route.output_amount, "priced route");

        let deployment = &self.config.deployment;
        let call = swap::build_swap_call(
            deployment.adapter,
            deployment.integration_manager,
            self.snapshot.comptroller,
            intent.outgoing_amount,
            &route,
        )?;

        if self.dry_run {
            info!(
                comptroller = %call.comptroller,
                payload_len = call.payload.len(),
                "dry run: not submitting"
            );
            return Ok(None);
        }

        let result = submit::submit(
            &self.provider,
            self.gas_oracle.as_ref(),
            &call,
            self.wallet_address,
        )
        .await?;

        Ok(Some(result))
    }

    /// Map the signal to a sized trade intent, or `None` to skip
    async fn build_intent(&self, direction: TradeSignal) -> Result<Option<TradeIntent>> {
        let deployment = &self.config.deployment;
        let (incoming_id, outgoing_id) = match direction {
            TradeSignal::Hold => {
                info!("no trade window open");
                return Ok(None);
            }
            // New moon: sell the primary reserve asset into the secondary
            TradeSignal::Sell => (deployment.secondary_asset, deployment.primary_asset),
            // Full moon: buy the primary asset with the secondary
            TradeSignal::Buy => (deployment.primary_asset, deployment.secondary_asset),
        };

        let Some(incoming) = vault::resolve_asset(&self.snapshot, incoming_id) else {
            info!("vault tracks no assets");
            return Ok(None);
        };
        let Some(outgoing) = vault::resolve_asset(&self.snapshot, outgoing_id) else {
            info!("vault tracks no assets");
            return Ok(None);
        };

        let balance = self.vault_token_balance(outgoing.id).await?;
        let outgoing_amount =
            balance * U256::from(TRADE_SIZE_BPS) / U256::from(BPS_DENOMINATOR);
        if outgoing_amount.is_zero() {
            info!(asset = %outgoing.id, "vault holds no balance to trade");
            return Ok(None);
        }

        Ok(Some(TradeIntent {
            direction,
            incoming_asset: incoming.id,
            outgoing_asset: outgoing.id,
            outgoing_amount,
        }))
    }

    /// ERC20 balance of the vault for a token
    async fn vault_token_balance(&self, token: Address) -> Result<U256> {
        let call = balanceOfCall {
            account: self.config.vault,
        };
        let tx = TransactionRequest::default()
            .to(token)
            .input(Bytes::from(call.abi_encode()).into());

        let returned = self
            .provider
            .call(tx)
            .await
            .map_err(|e| Error::Rpc(format!("balanceOf call failed: {e}")))?;

        balanceOfCall::abi_decode_returns(&returned)
            .map_err(|e| Error::Rpc(format!("balanceOf returned malformed data: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::PricedRoute;
    use crate::swap::build_swap_call;
    use crate::vault::{resolve_asset, TrackedAsset};
    use alloy::primitives::address;

    #[test]
    fn low_window_sells_primary_into_secondary_end_to_end() {
        let weth = address!("00000000000000000000000000000000000000aa");
        let usdc = address!("00000000000000000000000000000000000000bb");
        let adapter = address!("0000000000000000000000000000000000000001");
        let integration_manager = address!("0000000000000000000000000000000000000002");
        let comptroller = address!("0000000000000000000000000000000000000003");

        let snapshot = VaultSnapshot {
            comptroller,
            tracked_assets: vec![TrackedAsset { id: weth }, TrackedAsset { id: usdc }],
        };

        // Lunar age 0.5 is inside the low window: sell WETH for USDC
        assert_eq!(signal::evaluate(0.5), TradeSignal::Sell);
        let outgoing = resolve_asset(&snapshot, weth).unwrap();
        let incoming = resolve_asset(&snapshot, usdc).unwrap();
        assert_eq!(outgoing.id, weth);
        assert_eq!(incoming.id, usdc);

        let route = PricedRoute {
            output_amount: U256::from(1_000u64),
            hop_addresses: vec![outgoing.id, incoming.id],
            hop_fees: vec![3_000],
        };
        let call = build_swap_call(
            adapter,
            integration_manager,
            snapshot.comptroller,
            U256::from(500u64),
            &route,
        )
        .unwrap();

        assert_eq!(call.adapter, adapter);
        assert_eq!(call.integration_manager, integration_manager);
        assert_eq!(call.comptroller, comptroller);
        assert_eq!(
            crate::swap::min_incoming_amount(route.output_amount),
            U256::from(950u64)
        );
    }

    #[test]
    fn trade_size_is_half_the_balance() {
        let balance = U256::from(1_000_000u64);
        let sized = balance * U256::from(TRADE_SIZE_BPS) / U256::from(BPS_DENOMINATOR);
        assert_eq!(sized, U256::from(500_000u64));
    }

    #[test]
    fn trade_size_truncates_odd_balances() {
        let balance = U256::from(3u64);
        let sized = balance * U256::from(TRADE_SIZE_BPS) / U256::from(BPS_DENOMINATOR);
        assert_eq!(sized, U256::from(1u64));
    }
}
