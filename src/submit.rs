//! Transaction validation, gas sizing, and submission
//!
//! Each step is a distinct failure point: the dry-run catches reverts before
//! any gas is spent, the gas estimate is inflated to absorb state drift
//! between estimation and inclusion, and the gas price comes from a
//! chain-specific oracle. A failure at any step ends the iteration; it never
//! ends the process.

use crate::gas::GasOracle;
use crate::swap::EncodedSwapCall;
use crate::{Error, Result};
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, B256};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::decode_revert_reason;
use alloy::transports::{RpcError, TransportErrorKind};
use tracing::{debug, info};

/// Outcome of a successful submission
#[derive(Debug, Clone)]
pub struct SubmissionResult {
    pub transaction_hash: B256,
    pub gas_used: u64,
}

/// Gas estimate inflated by 10/9 (~11%), truncated
pub fn inflate_gas_limit(estimate: u64) -> u64 {
    estimate * 10 / 9
}

/// Gwei rounded up to a whole number, then converted to wei
pub fn gwei_to_wei(gwei: f64) -> u128 {
    (gwei.ceil() as u128) * 1_000_000_000
}

/// Validate, size, and submit an encoded swap call
pub async fn submit(
    provider: &DynProvider,
    gas_oracle: &dyn GasOracle,
    call: &EncodedSwapCall,
    from: Address,
) -> Result<SubmissionResult> {
    let tx = TransactionRequest::default()
        .from(from)
        .to(call.comptroller)
        .input(call.payload.clone().into());

    // Dry-run against current chain state; a revert aborts before gas is spent
    provider
        .call(tx.clone())
        .await
        .map_err(|e| Error::Simulation(describe_call_failure(&e)))?;

    let estimate = provider
        .estimate_gas(tx.clone())
        .await
        .map_err(|e| Error::Submission(format!("Gas estimation failed: {e}")))?;
    let gas_limit = inflate_gas_limit(estimate);

    let gwei = gas_oracle.recommended_gwei().await?;
    let gas_price = gwei_to_wei(gwei);

    debug!(gas_limit, gas_price, "sized transaction");

    let pending = provider
        .send_transaction(tx.with_gas_limit(gas_limit).with_gas_price(gas_price))
        .await
        .map_err(|e| Error::Submission(e.to_string()))?;

    let receipt = pending
        .get_receipt()
        .await
        .map_err(|e| Error::Submission(format!("Failed awaiting inclusion: {e}")))?;

    info!(
        transaction_hash = %receipt.transaction_hash,
        gas_used = receipt.gas_used as u64,
        "transaction included"
    );

    Ok(SubmissionResult {
        transaction_hash: receipt.transaction_hash,
        gas_used: receipt.gas_used as u64,
    })
}

/// Human-readable reason for a failed `eth_call`
///
/// Structured revert data is decoded when present; otherwise the RPC error
/// message is surfaced; otherwise the raw error.
fn describe_call_failure(err: &RpcError<TransportErrorKind>) -> String {
    if let Some(payload) = err.as_error_resp() {
        if let Some(data) = payload.as_revert_data() {
            if let Some(reason) = decode_revert_reason(&data) {
                return reason;
            }
            return format!("Reverted with data: {data}");
        }
        return payload.message.to_string();
    }
    err.to_string()
}
