use std::sync::Arc;

use axum_template::engine::Engine;
use derive_new::new;
use serde::Serialize;
use tera::Tera;

use super::auth::AdminToken;
use crate::catalog::VideoCatalog;
use crate::config::TickerConfig;
use crate::database::Database;
use crate::settings::SettingsStore;
use crate::ticker::TokenFeed;
use crate::users::UserDirectory;

pub type Templates = Engine<Tera>;

/// Addresses shown on the token page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub token_address: String,
    pub pair_address: String,
}

impl TokenInfo {
    pub fn from_config(config: &TickerConfig) -> Self {
        Self::new(config.token_address.clone(), config.pair_address.clone())
    }

    pub fn chart_url(&self) -> String {
        format!("https://dexscreener.com/bsc/{}", self.pair_address)
    }
}

#[derive(Clone, new)]
pub struct App {
    pub catalog: VideoCatalog,
    pub users: UserDirectory,
    pub settings: SettingsStore,
    pub database: Database,
    pub token: TokenFeed,
    pub token_info: Arc<TokenInfo>,
    pub admin_token: AdminToken,
    pub templates: Templates,
}
