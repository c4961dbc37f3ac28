//! Uniswap V3 price-route lookup
//!
//! The route oracle turns (outgoing asset, incoming asset, amount) into a
//! priced path through Uniswap V3 pools. The production implementation quotes
//! QuoterV2 via `eth_call` across the standard fee tiers and keeps the best
//! single-hop route. A `PricedRoute` always carries complete path data; "no
//! route" is an error, not a partially-filled value.

use crate::{Error, Result};
use alloy::primitives::{
    aliases::{U160, U24},
    Address, Bytes, U256,
};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use tracing::debug;

sol! {
    struct QuoteExactInputSingleParams {
        address tokenIn;
        address tokenOut;
        uint256 amountIn;
        uint24 fee;
        uint160 sqrtPriceLimitX96;
    }

    function quoteExactInputSingle(QuoteExactInputSingleParams params)
        external
        returns (
            uint256 amountOut,
            uint160 sqrtPriceX96After,
            uint32 initializedTicksCrossed,
            uint256 gasEstimate
        );
}

/// Standard Uniswap V3 fee tiers in hundredths of a bip
const FEE_TIERS: [u32; 3] = [500, 3_000, 10_000];

/// A priced path through one or more liquidity pools
#[derive(Debug, Clone)]
pub struct PricedRoute {
    /// Quoted amount of the incoming asset
    pub output_amount: U256,
    /// Ordered hop addresses along the path
    pub hop_addresses: Vec<Address>,
    /// Ordered pool fee tiers along the path
    pub hop_fees: Vec<u32>,
}

/// Price-route oracle collaborator
#[async_trait]
pub trait RouteOracle: Send + Sync {
    /// Price a swap of `amount` of `outgoing` into `incoming`
    async fn quote(&self, outgoing: Address, incoming: Address, amount: U256)
        -> Result<PricedRoute>;
}

/// Route oracle backed by Uniswap V3 QuoterV2
pub struct UniswapV3Quoter {
    provider: DynProvider,
    quoter: Address,
}

impl UniswapV3Quoter {
    pub fn new(provider: DynProvider, quoter: Address) -> Self {
        Self { provider, quoter }
    }

    async fn quote_tier(
        &self,
        outgoing: Address,
        incoming: Address,
        amount: U256,
        fee: U24,
    ) -> Result<U256> {
        let call = quoteExactInputSingleCall {
            params: QuoteExactInputSingleParams {
                tokenIn: outgoing,
                tokenOut: incoming,
                amountIn: amount,
                fee,
                sqrtPriceLimitX96: U160::ZERO,
            },
        };

        let tx = TransactionRequest::default()
            .to(self.quoter)
            .input(Bytes::from(call.abi_encode()).into());

        let returned = self
            .provider
            .call(tx)
            .await
            .map_err(|e| Error::Route(format!("Quoter call failed: {e}")))?;

        let decoded = quoteExactInputSingleCall::abi_decode_returns(&returned)
            .map_err(|e| Error::Route(format!("Quoter returned malformed data: {e}")))?;

        Ok(decoded.amountOut)
    }
}

#[async_trait]
impl RouteOracle for UniswapV3Quoter {
    async fn quote(
        &self,
        outgoing: Address,
        incoming: Address,
        amount: U256,
    ) -> Result<PricedRoute> {
        let mut best: Option<(u32, U256)> = None;

        // A pool may not exist for every tier; a failed tier is not an error
        // as long as one tier quotes.
        for fee in FEE_TIERS {
            let Ok(fee24) = U24::try_from(fee) else {
                continue;
            };
            match self.quote_tier(outgoing, incoming, amount, fee24).await {
                Ok(amount_out) if !amount_out.is_zero() => {
                    debug!(fee, amount_out = %amount_out, "tier quoted");
                    if best.map_or(true, |(_, prev)| amount_out > prev) {
                        best = Some((fee, amount_out));
                    }
                }
                Ok(_) => debug!(fee, "tier quoted zero output"),
                Err(e) => debug!(fee, error = %e, "tier quote failed"),
            }
        }

        let (fee, output_amount) = best.ok_or_else(|| {
            Error::Route(format!(
                "No Uniswap V3 pool quotes {outgoing:#x} -> {incoming:#x}"
            ))
        })?;

        Ok(PricedRoute {
            output_amount,
            hop_addresses: vec![outgoing, incoming],
            hop_fees: vec![fee],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn fee_tiers_fit_uint24() {
        for fee in FEE_TIERS {
            assert!(U24::try_from(fee).is_ok());
        }
    }

    #[test]
    fn quoter_return_data_decodes() {
        // ABI-encode the four return values and decode them back
        use alloy::sol_types::SolValue;
        let encoded = (
            U256::from(1_000u64),
            U160::ZERO,
            0u32,
            U256::from(70_000u64),
        )
            .abi_encode_params();
        let decoded = quoteExactInputSingleCall::abi_decode_returns(&encoded).unwrap();
        assert_eq!(decoded.amountOut, U256::from(1_000u64));
    }

    #[test]
    fn single_hop_route_shape() {
        let out = address!("00000000000000000000000000000000000000aa");
        let inc = address!("00000000000000000000000000000000000000bb");
        let route = PricedRoute {
            output_amount: U256::from(1_000u64),
            hop_addresses: vec![out, inc],
            hop_fees: vec![3_000],
        };
        assert_eq!(route.hop_addresses.len(), route.hop_fees.len() + 1);
    }
}
