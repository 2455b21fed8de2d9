use std::future::Future;
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::StatusCode;
use serde::Serialize;
use snafu::{Location, Snafu};
use tokio::sync::watch;
use tracing::instrument;

use crate::format::{format_change, format_price, format_usd};

pub mod dexscreener;
mod task;

pub use dexscreener::DexScreener;
pub use task::TickerTask;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TickerError {
    #[snafu(display("request to `{url}` failed at {location}: {source}"))]
    Request {
        url: String,
        source: reqwest::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("`{url}` answered with status {status}"))]
    Status {
        url: String,
        status: StatusCode,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot decode the response from `{url}` at {location}: {source}"))]
    Decode {
        url: String,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

/// Market figures of the first pair returned by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PairQuote {
    pub price_usd: f64,
    pub price_change_h24: f64,
    pub volume_h24: f64,
    pub fdv: f64,
    pub liquidity_usd: f64,
}

/// Token figures as they are displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStats {
    pub price: String,
    pub price_change: f64,
    pub volume: String,
    pub market_cap: String,
    pub liquidity: String,
    pub holders: String,
    pub token_symbol: String,
    pub token_name: String,
}

static FALLBACK: Lazy<TokenStats> = Lazy::new(|| TokenStats {
    price: "$0.0015".to_string(),
    price_change: -40.49,
    volume: "$2.85M".to_string(),
    market_cap: "$1.47M".to_string(),
    liquidity: "$162.51K".to_string(),
    holders: "12,456".to_string(),
    token_symbol: "CTD".to_string(),
    token_name: "ChainTalkDaily".to_string(),
});

impl TokenStats {
    /// Placeholder figures shown until the first quote arrives or when there is none.
    pub fn fallback() -> Self {
        FALLBACK.clone()
    }

    pub fn from_quote(quote: &PairQuote) -> Self {
        Self {
            price: format_price(quote.price_usd),
            price_change: quote.price_change_h24,
            volume: format_usd(quote.volume_h24),
            market_cap: format_usd(quote.fdv),
            liquidity: format_usd(quote.liquidity_usd),
            ..Self::fallback()
        }
    }

    /// The 24h change with sign and percent, e.g. `-40.49%`.
    pub fn change_label(&self) -> String {
        format_change(self.price_change)
    }

    pub fn is_up(&self) -> bool {
        self.price_change >= 0.0
    }
}

/// Where quotes come from.
///
/// `Ok(None)` means the source answered but has no pair to report.
pub trait PairSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Option<PairQuote>, TickerError>> + Send;
}

/// Polls a [`PairSource`] and publishes display-ready [`TokenStats`].
#[derive(Debug)]
pub struct TokenTicker<S> {
    source: S,
    sender: watch::Sender<TokenStats>,
}

impl<S: PairSource> TokenTicker<S> {
    pub fn new(source: S) -> (Self, TokenFeed) {
        let (sender, receiver) = watch::channel(TokenStats::fallback());
        (Self { source, sender }, TokenFeed { receiver })
    }

    /// Fetches once and publishes the outcome.
    ///
    /// An empty answer publishes the fallback. A failed fetch is logged and the
    /// last published value stays in place.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        match self.source.fetch().await {
            Ok(Some(quote)) => {
                let stats = TokenStats::from_quote(&quote);
                tracing::debug!(price = %stats.price, "token stats refreshed");
                self.sender.send_replace(stats);
            }
            Ok(None) => {
                tracing::warn!("no pair in the response, showing fallback token stats");
                self.sender.send_replace(TokenStats::fallback());
            }
            Err(error) => {
                tracing::error!(error = ?error, "failed to refresh token stats: {}", error);
            }
        }
    }

    /// Polls every `period`, starting right away, until the returned task is stopped.
    pub fn spawn(self, period: Duration) -> TickerTask {
        TickerTask::spawn(self, period)
    }
}

/// Read side of a [`TokenTicker`]. Cheap to clone, never blocks.
#[derive(Debug, Clone)]
pub struct TokenFeed {
    receiver: watch::Receiver<TokenStats>,
}

impl TokenFeed {
    /// A feed that always shows the fallback figures.
    pub fn fallback() -> Self {
        Self::fixed(TokenStats::fallback())
    }

    /// A feed that never changes.
    pub fn fixed(stats: TokenStats) -> Self {
        let (_sender, receiver) = watch::channel(stats);
        Self { receiver }
    }

    pub fn current(&self) -> TokenStats {
        self.receiver.borrow().clone()
    }

    /// Waits for the next published value. Fails once the ticker is gone.
    pub async fn changed(&mut self) -> Result<TokenStats, watch::error::RecvError> {
        self.receiver.changed().await?;
        Ok(self.receiver.borrow_and_update().clone())
    }
}
