//! Chain-specific gas price oracles
//!
//! Mainnet uses a gas-station style API that reports prices in tenths of a
//! gwei per confirmation-speed category, each with an estimated wait in
//! minutes; the oracle picks the cheapest category expected to confirm within
//! the configured window. Polygon uses the Polygon gas station's `fast` tier.

use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const ETH_GAS_STATION_URL: &str = "https://ethgasstation.info/api/ethgasAPI.json";
const POLYGON_GAS_STATION_URL: &str = "https://gasstation.polygon.technology/v2";

/// Recommended gas price source
#[async_trait]
pub trait GasOracle: Send + Sync {
    /// Recommended gas price in gwei
    async fn recommended_gwei(&self) -> Result<f64>;
}

/// Mainnet oracle choosing the cheapest category confirming within a window
pub struct EthGasStation {
    client: Client,
    url: String,
    max_wait_minutes: f64,
}

impl EthGasStation {
    /// `max_wait_minutes` bounds how long a transaction may wait for inclusion
    pub fn new(max_wait_minutes: f64) -> Self {
        Self {
            client: Client::new(),
            url: ETH_GAS_STATION_URL.to_string(),
            max_wait_minutes,
        }
    }
}

#[async_trait]
impl GasOracle for EthGasStation {
    async fn recommended_gwei(&self) -> Result<f64> {
        let report: GasStationReport = self
            .client
            .get(&self.url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| Error::Submission(format!("Gas station response malformed: {e}")))?;

        Ok(report.price_for_wait(self.max_wait_minutes))
    }
}

/// Gas station price report; prices are in tenths of a gwei
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GasStationReport {
    safe_low: f64,
    average: f64,
    fast: f64,
    fastest: f64,
    safe_low_wait: f64,
    avg_wait: f64,
    fast_wait: f64,
    fastest_wait: f64,
}

impl GasStationReport {
    /// Cheapest category whose estimated wait fits the window, in gwei
    fn price_for_wait(&self, max_wait_minutes: f64) -> f64 {
        let categories = [
            (self.safe_low, self.safe_low_wait),
            (self.average, self.avg_wait),
            (self.fast, self.fast_wait),
            (self.fastest, self.fastest_wait),
        ];
        let tenths = categories
            .iter()
            .find(|(_, wait)| *wait <= max_wait_minutes)
            .map(|(price, _)| *price)
            .unwrap_or(self.fastest);
        tenths / 10.0
    }
}

/// Polygon gas station oracle
pub struct PolygonGasStation {
    client: Client,
    url: String,
}

impl PolygonGasStation {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            url: POLYGON_GAS_STATION_URL.to_string(),
        }
    }
}

impl Default for PolygonGasStation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GasOracle for PolygonGasStation {
    async fn recommended_gwei(&self) -> Result<f64> {
        let report: PolygonGasReport = self
            .client
            .get(&self.url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| Error::Submission(format!("Gas station response malformed: {e}")))?;

        Ok(report.fast.max_fee)
    }
}

#[derive(Debug, Deserialize)]
struct PolygonGasReport {
    fast: PolygonGasTier,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolygonGasTier {
    max_fee: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> GasStationReport {
        serde_json::from_value(serde_json::json!({
            "safeLow": 350.0,
            "average": 360.0,
            "fast": 480.0,
            "fastest": 580.0,
            "safeLowWait": 11.3,
            "avgWait": 1.4,
            "fastWait": 0.5,
            "fastestWait": 0.4
        }))
        .unwrap()
    }

    #[test]
    fn picks_cheapest_category_within_window() {
        // safeLow waits too long; average confirms within 3 minutes
        assert_eq!(report().price_for_wait(3.0), 36.0);
    }

    #[test]
    fn relaxed_window_allows_safe_low() {
        assert_eq!(report().price_for_wait(15.0), 35.0);
    }

    #[test]
    fn impossible_window_falls_back_to_fastest() {
        assert_eq!(report().price_for_wait(0.1), 58.0);
    }

    #[test]
    fn polygon_report_parses_fast_max_fee() {
        let raw = r#"{
            "safeLow": { "maxPriorityFee": 30.0, "maxFee": 30.5 },
            "standard": { "maxPriorityFee": 32.0, "maxFee": 32.6 },
            "fast": { "maxPriorityFee": 36.0, "maxFee": 36.7 },
            "estimatedBaseFee": 0.6,
            "blockTime": 2,
            "blockNumber": 1
        }"#;
        let report: PolygonGasReport = serde_json::from_str(raw).unwrap();
        assert_eq!(report.fast.max_fee, 36.7);
    }
}
