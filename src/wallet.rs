//! Signing wallet
//!
//! SECURITY: This is the ONLY place where the private key exists.
//! - The key is read from the environment through `secrecy` and parsed
//!   directly into alloy's `PrivateKeySigner`
//! - It is never serialized and never logged (Debug redacts it)

use crate::{Error, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use secrecy::{ExposeSecret, SecretString};

/// Signing wallet holding the bot's private key
pub struct SigningWallet {
    /// Public address (safe to expose)
    address: Address,
    /// Ethereum wallet for alloy provider integration
    wallet: EthereumWallet,
}

impl SigningWallet {
    /// Load the wallet from an environment variable holding a hex key
    pub fn from_env(var_name: &str) -> Result<Self> {
        let key = SecretString::from(std::env::var(var_name).map_err(|_| {
            Error::Config(format!(
                "Required environment variable {var_name} is not set"
            ))
        })?);

        Self::from_hex(key.expose_secret())
    }

    /// Build the wallet from a hex-encoded private key
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::Wallet(format!("Invalid private key: {e}")))?;

        let address = signer.address();
        let wallet = EthereumWallet::from(signer);

        Ok(Self { address, wallet })
    }

    /// Public address of the signing key
    pub fn address(&self) -> Address {
        self.address
    }

    /// Wallet handle for use with alloy providers
    ///
    /// Exposes signing operations only, never the raw key.
    pub fn wallet(&self) -> &EthereumWallet {
        &self.wallet
    }
}

// Manual Debug so the key material can never leak through logging
impl std::fmt::Debug for SigningWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningWallet")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test key (DO NOT use in production!)
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn derives_address_from_hex_key() {
        let wallet = SigningWallet::from_hex(TEST_KEY).unwrap();
        assert_eq!(
            format!("{:#x}", wallet.address()),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn accepts_key_without_prefix() {
        let wallet = SigningWallet::from_hex(TEST_KEY.trim_start_matches("0x")).unwrap();
        assert_eq!(
            format!("{:#x}", wallet.address()),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn debug_redacts_key_material() {
        let wallet = SigningWallet::from_hex(TEST_KEY).unwrap();
        let debug_str = format!("{wallet:?}");
        assert!(!debug_str.contains("ac0974bec"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn rejects_malformed_key() {
        assert!(matches!(
            SigningWallet::from_hex("0xnotakey"),
            Err(Error::Wallet(_))
        ));
    }
}
