//! Enzyme swap-order encoding
//!
//! Builds the on-chain call for a vault swap: Uniswap V3 `takeOrder` args with
//! slippage protection, wrapped in the IntegrationManager's
//! `callOnIntegration` envelope, addressed at the vault's comptroller via
//! `callOnExtension`. All amount math is integer; nothing here touches the
//! network.

use crate::route::PricedRoute;
use crate::{Error, Result};
use alloy::primitives::{aliases::U24, Address, Bytes, FixedBytes, U256};
use alloy::sol;
use alloy::sol_types::{SolCall, SolValue};

sol! {
    function callOnExtension(address extension, uint256 actionId, bytes callArgs) external;

    function takeOrder(address vaultProxy, bytes orderData, bytes assetData) external;
}

/// IntegrationManager action id for calling an integration adapter
pub const CALL_ON_INTEGRATION: u64 = 0;

/// Slippage tolerance in basis points (5%)
const SLIPPAGE_BPS: u64 = 500;

const BPS_DENOMINATOR: u64 = 10_000;

/// The fully-formed on-chain call for one swap; built once per iteration
#[derive(Debug, Clone)]
pub struct EncodedSwapCall {
    pub adapter: Address,
    pub integration_manager: Address,
    pub comptroller: Address,
    /// Calldata for `comptroller.callOnExtension(...)`
    pub payload: Bytes,
}

/// Quoted output amount reduced by the slippage tolerance, truncating
pub fn min_incoming_amount(output_amount: U256) -> U256 {
    output_amount * U256::from(BPS_DENOMINATOR - SLIPPAGE_BPS) / U256::from(BPS_DENOMINATOR)
}

/// Build the encoded swap call for a priced route
///
/// A route without path or pool data aborts the build; that is a soft
/// failure handled by the caller, not a panic.
pub fn build_swap_call(
    adapter: Address,
    integration_manager: Address,
    comptroller: Address,
    outgoing_amount: U256,
    route: &PricedRoute,
) -> Result<EncodedSwapCall> {
    if route.hop_addresses.is_empty() || route.hop_fees.is_empty() {
        return Err(Error::Route(
            "Priced route is missing path or pool data".to_string(),
        ));
    }

    let min_incoming = min_incoming_amount(route.output_amount);
    let order_args = encode_take_order_args(route, outgoing_amount, min_incoming)?;
    let call_args = encode_call_on_integration_args(adapter, order_args);

    let payload = callOnExtensionCall {
        extension: integration_manager,
        actionId: U256::from(CALL_ON_INTEGRATION),
        callArgs: call_args.into(),
    }
    .abi_encode();

    Ok(EncodedSwapCall {
        adapter,
        integration_manager,
        comptroller,
        payload: payload.into(),
    })
}

/// ABI-encode the UniswapV3Adapter takeOrder arguments:
/// `(address[] pathAddresses, uint24[] pathFees, uint256 outgoingAssetAmount,
///   uint256 minIncomingAssetAmount)`
fn encode_take_order_args(
    route: &PricedRoute,
    outgoing_amount: U256,
    min_incoming: U256,
) -> Result<Vec<u8>> {
    let fees = route
        .hop_fees
        .iter()
        .map(|&fee| {
            U24::try_from(fee).map_err(|_| Error::Route(format!("Fee tier {fee} out of range")))
        })
        .collect::<Result<Vec<U24>>>()?;

    Ok((
        route.hop_addresses.clone(),
        fees,
        outgoing_amount,
        min_incoming,
    )
        .abi_encode_params())
}

/// ABI-encode the IntegrationManager callOnIntegration arguments:
/// `(address adapter, bytes4 selector, bytes integrationData)`
fn encode_call_on_integration_args(adapter: Address, order_args: Vec<u8>) -> Vec<u8> {
    let selector = FixedBytes::<4>::from(takeOrderCall::SELECTOR);
    (adapter, selector, Bytes::from(order_args)).abi_encode_params()
}
