use std::sync::Arc;
use std::time::Duration;

use chaintalk::api::{self, AdminToken, App, TokenInfo};
use chaintalk::catalog::VideoCatalog;
use chaintalk::config;
use chaintalk::database::Database;
use chaintalk::error::{
    ApplicationError, BindAddressSnafu, ConnectDatabaseSnafu, HttpClientSnafu, SeedCatalogSnafu,
    SeedUsersSnafu, TemplatesSnafu, WebServerSnafu,
};
use chaintalk::logger;
use chaintalk::settings::SettingsStore;
use chaintalk::ticker::{DexScreener, TokenTicker};
use chaintalk::users::UserDirectory;
use dotenvy::dotenv;
use snafu::ResultExt as _;
use tokio::net::TcpListener;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = config::load()?;

    let _guard = logger::init(&config)?;

    let retry = ExponentialBackoff::from_millis(100).map(jitter).take(5);
    let database = Retry::start(retry, || Database::connect(&config.database))
        .await
        .context(ConnectDatabaseSnafu)?;

    let catalog = VideoCatalog::seeded().context(SeedCatalogSnafu)?;
    let users = UserDirectory::seeded().context(SeedUsersSnafu)?;

    let client = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .context(HttpClientSnafu)?;
    let source = DexScreener::new(client, &config.ticker.endpoint, &config.ticker.pair_address);
    let (ticker, token) = TokenTicker::new(source);
    let ticker = ticker.spawn(config.ticker.interval);

    let app = App::new(
        catalog,
        users,
        SettingsStore::default(),
        database,
        token,
        Arc::new(TokenInfo::from_config(&config.ticker)),
        AdminToken::new(config.admin_token.as_str()),
        api::templates().context(TemplatesSnafu)?,
    );

    if config.admin_token.is_empty() {
        tracing::warn!("ADMIN_TOKEN is empty, the admin API will reject every request");
    }

    let listener = TcpListener::bind(config.host)
        .await
        .context(BindAddressSnafu { address: config.host })?;
    tracing::info!("listening on {}", config.host);

    axum::serve(listener, api::router(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(WebServerSnafu)?;

    ticker.shutdown().await;
    tracing::info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", error);
        std::future::pending::<()>().await;
    }
}
