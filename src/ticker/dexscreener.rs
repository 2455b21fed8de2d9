//! Client for the DexScreener pair endpoint.

use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use snafu::{ensure, ResultExt as _};
use tracing::instrument;

use super::{DecodeSnafu, PairQuote, PairSource, RequestSnafu, StatusSnafu, TickerError};

/// Fetches `{endpoint}/{pair_address}` and reports the first pair.
#[derive(Debug, Clone)]
pub struct DexScreener {
    client: reqwest::Client,
    url: String,
}

impl DexScreener {
    pub fn new(client: reqwest::Client, endpoint: &str, pair_address: &str) -> Self {
        let url = format!("{}/{}", endpoint.trim_end_matches('/'), pair_address);
        Self { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PairSource for DexScreener {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Option<PairQuote>, TickerError> {
        let url = &self.url;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context(RequestSnafu { url })?;

        let status = response.status();
        ensure!(status.is_success(), StatusSnafu { url, status });

        let body = response.bytes().await.context(RequestSnafu { url })?;
        let payload: PairsResponse = serde_json::from_slice(&body).context(DecodeSnafu { url })?;

        Ok(payload.first())
    }
}

/// The API answers `"pairs": null` for unknown addresses.
#[derive(Debug, Deserialize)]
struct PairsResponse {
    #[serde(default)]
    pairs: Option<Vec<Pair>>,
}

impl PairsResponse {
    fn first(self) -> Option<PairQuote> {
        let pair = self.pairs?.into_iter().next()?;

        Some(PairQuote {
            price_usd: pair.price_usd,
            price_change_h24: pair.price_change.h24,
            volume_h24: pair.volume.h24,
            fdv: pair.fdv.unwrap_or_default(),
            liquidity_usd: pair.liquidity.map(|liquidity| liquidity.usd).unwrap_or_default(),
        })
    }
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pair {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    price_usd: f64,
    #[serde(default)]
    price_change: Window,
    #[serde(default)]
    volume: Window,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    fdv: Option<f64>,
    liquidity: Option<Liquidity>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
struct Window {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    h24: f64,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct Liquidity {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    usd: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Option<PairQuote> {
        serde_json::from_str::<PairsResponse>(body).unwrap().first()
    }

    #[test]
    fn url_joins_endpoint_and_pair() {
        let endpoint = "https://api.dexscreener.com/latest/dex/pairs/bsc/";
        let source = DexScreener::new(reqwest::Client::new(), endpoint, "0xabc");
        assert_eq!(source.url(), "https://api.dexscreener.com/latest/dex/pairs/bsc/0xabc");
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let quote = parse(
            r#"{
                "schemaVersion": "1.0.0",
                "pairs": [{
                    "chainId": "bsc",
                    "priceUsd": "0.001523",
                    "priceChange": { "h1": 0.2, "h24": -40.49 },
                    "volume": { "h24": "2850000" },
                    "fdv": 1470000,
                    "liquidity": { "usd": 162510.5, "base": 1, "quote": 2 }
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(quote.price_usd, 0.001523);
        assert_eq!(quote.price_change_h24, -40.49);
        assert_eq!(quote.volume_h24, 2_850_000.0);
        assert_eq!(quote.fdv, 1_470_000.0);
        assert_eq!(quote.liquidity_usd, 162_510.5);
    }

    #[test]
    fn only_the_first_pair_counts() {
        let quote = parse(r#"{ "pairs": [{ "priceUsd": "1" }, { "priceUsd": "2" }] }"#).unwrap();
        assert_eq!(quote.price_usd, 1.0);
        assert_eq!(quote.liquidity_usd, 0.0);
    }

    #[test]
    fn empty_or_missing_pairs_have_no_quote() {
        assert_eq!(parse(r#"{ "pairs": [] }"#), None);
        assert_eq!(parse(r#"{ "pairs": null }"#), None);
        assert_eq!(parse(r#"{ "schemaVersion": "1.0.0" }"#), None);
    }

    #[test]
    fn garbage_price_is_a_decode_error() {
        assert!(serde_json::from_str::<PairsResponse>(r#"{ "pairs": [{ "priceUsd": "n/a" }] }"#).is_err());
    }
}
