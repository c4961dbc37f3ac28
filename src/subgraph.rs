//! Enzyme subgraph client
//!
//! A single read against the Enzyme vault subgraph returning the vault's
//! tracked assets and comptroller address. Uses a raw GraphQL query string
//! over reqwest with a typed response envelope.

use crate::vault::{TrackedAsset, VaultSnapshot};
use crate::{Error, Result};
use alloy::primitives::Address;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;

const VAULT_DETAILS_QUERY: &str = r#"
    query VaultDetails($id: ID!) {
        vault(id: $id) {
            trackedAssets {
                id
            }
            comptroller {
                id
            }
        }
    }
"#;

/// Client for the Enzyme vault subgraph
pub struct SubgraphClient {
    client: Client,
    endpoint: String,
}

impl SubgraphClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    /// Fetch the vault's tracked-asset snapshot and comptroller address
    pub async fn vault_snapshot(&self, vault: Address) -> Result<VaultSnapshot> {
        // Subgraph entity ids are lowercase hex
        let variables = json!({ "id": format!("{vault:#x}") });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "query": VAULT_DETAILS_QUERY,
                "variables": variables
            }))
            .send()
            .await
            .map_err(|e| Error::Subgraph(format!("Request failed: {e}")))?;

        let body: GraphQlResponse<VaultDetailsData> = response
            .json()
            .await
            .map_err(|e| Error::Subgraph(format!("Failed to parse response: {e}")))?;

        if let Some(errors) = body.errors {
            return Err(Error::Subgraph(format!("GraphQL errors: {errors:?}")));
        }

        let details = body
            .data
            .and_then(|d| d.vault)
            .ok_or_else(|| Error::Subgraph(format!("Vault {vault:#x} not found")))?;

        details.try_into()
    }
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[allow(dead_code)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct VaultDetailsData {
    vault: Option<VaultDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VaultDetails {
    tracked_assets: Vec<AssetRef>,
    comptroller: ContractRef,
}

#[derive(Debug, Deserialize)]
struct AssetRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ContractRef {
    id: String,
}

impl TryFrom<VaultDetails> for VaultSnapshot {
    type Error = Error;

    fn try_from(details: VaultDetails) -> Result<Self> {
        let comptroller = parse_address(&details.comptroller.id)?;
        let tracked_assets = details
            .tracked_assets
            .iter()
            .map(|asset| Ok(TrackedAsset {
                id: parse_address(&asset.id)?,
            }))
            .collect::<Result<Vec<_>>>()?;

        Ok(VaultSnapshot {
            comptroller,
            tracked_assets,
        })
    }
}

fn parse_address(raw: &str) -> Result<Address> {
    Address::from_str(raw).map_err(|e| Error::Subgraph(format!("Invalid address {raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn parses_vault_details_response() {
        let raw = r#"{
            "data": {
                "vault": {
                    "trackedAssets": [
                        { "id": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2" },
                        { "id": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48" }
                    ],
                    "comptroller": {
                        "id": "0x0000000000000000000000000000000000000123"
                    }
                }
            }
        }"#;

        let body: GraphQlResponse<VaultDetailsData> = serde_json::from_str(raw).unwrap();
        let snapshot: VaultSnapshot = body.data.unwrap().vault.unwrap().try_into().unwrap();

        assert_eq!(snapshot.tracked_assets.len(), 2);
        assert_eq!(
            snapshot.tracked_assets[0].id,
            address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2")
        );
        assert_eq!(
            snapshot.comptroller,
            address!("0000000000000000000000000000000000000123")
        );
    }

    #[test]
    fn graphql_errors_surface() {
        let raw = r#"{ "errors": [ { "message": "indexing error" } ] }"#;
        let body: GraphQlResponse<VaultDetailsData> = serde_json::from_str(raw).unwrap();
        assert!(body.errors.is_some());
        assert!(body.data.is_none());
    }

    #[test]
    fn malformed_asset_id_is_rejected() {
        let details = VaultDetails {
            tracked_assets: vec![AssetRef {
                id: "not-an-address".to_string(),
            }],
            comptroller: ContractRef {
                id: "0x0000000000000000000000000000000000000123".to_string(),
            },
        };
        let result: Result<VaultSnapshot> = details.try_into();
        assert!(matches!(result, Err(Error::Subgraph(_))));
    }
}
