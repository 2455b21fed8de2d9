use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    pub twitter: String,
    pub telegram: String,
    pub discord: String,
    pub youtube: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notifications {
    pub comments: bool,
    pub uploads: bool,
    pub analytics: bool,
    pub marketing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_name: String,
    pub site_description: String,
    pub keywords: String,
    pub social: SocialLinks,
    pub analytics_id: String,
    pub maintenance_mode: bool,
    pub notifications: Notifications,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "ChainTalkDaily".to_string(),
            site_description: "Crypto Learning Platform with educational videos from CZ and Yi He"
                .to_string(),
            keywords: "crypto, blockchain, education, CZ, Yi He, cryptocurrency, learning"
                .to_string(),
            social: SocialLinks {
                twitter: "https://twitter.com/chaintalkdaily".to_string(),
                telegram: "https://t.me/chaintalkdaily".to_string(),
                discord: "https://discord.gg/chaintalkdaily".to_string(),
                youtube: "https://youtube.com/chaintalkdaily".to_string(),
            },
            analytics_id: "UA-123456789-1".to_string(),
            maintenance_mode: false,
            notifications: Notifications {
                comments: true,
                uploads: true,
                analytics: true,
                marketing: false,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SocialPatch {
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
    pub youtube: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NotificationsPatch {
    pub comments: Option<bool>,
    pub uploads: Option<bool>,
    pub analytics: Option<bool>,
    pub marketing: Option<bool>,
}

/// Fields to replace; nested groups merge field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    pub site_name: Option<String>,
    pub site_description: Option<String>,
    pub keywords: Option<String>,
    pub social: Option<SocialPatch>,
    pub analytics_id: Option<String>,
    pub maintenance_mode: Option<bool>,
    pub notifications: Option<NotificationsPatch>,
}

impl SettingsPatch {
    pub fn maintenance(enabled: bool) -> Self {
        Self {
            maintenance_mode: Some(enabled),
            ..Self::default()
        }
    }

    pub fn apply(self, settings: &mut SiteSettings) {
        let SettingsPatch {
            site_name,
            site_description,
            keywords,
            social,
            analytics_id,
            maintenance_mode,
            notifications,
        } = self;

        merge!(settings; site_name, site_description, keywords, analytics_id, maintenance_mode);

        if let Some(SocialPatch {
            twitter,
            telegram,
            discord,
            youtube,
        }) = social
        {
            merge!(settings.social; twitter, telegram, discord, youtube);
        }

        if let Some(NotificationsPatch {
            comments,
            uploads,
            analytics,
            marketing,
        }) = notifications
        {
            merge!(settings.notifications; comments, uploads, analytics, marketing);
        }
    }
}

/// Current site settings, shared by every handler.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    sender: Arc<watch::Sender<SiteSettings>>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(SiteSettings::default())
    }
}

impl SettingsStore {
    pub fn new(settings: SiteSettings) -> Self {
        Self {
            sender: Arc::new(watch::Sender::new(settings)),
        }
    }

    pub fn current(&self) -> SiteSettings {
        self.sender.borrow().clone()
    }

    pub fn maintenance_mode(&self) -> bool {
        self.sender.borrow().maintenance_mode
    }

    pub fn subscribe(&self) -> watch::Receiver<SiteSettings> {
        self.sender.subscribe()
    }

    /// Merges `patch` and answers with the settings this merge produced.
    #[instrument(skip(self))]
    pub fn update(&self, patch: SettingsPatch) -> SiteSettings {
        let mut merged = SiteSettings::default();
        self.sender.send_modify(|settings| {
            patch.apply(settings);
            merged = settings.clone();
        });

        tracing::info!(maintenance_mode = merged.maintenance_mode, "site settings updated");
        merged
    }
}
