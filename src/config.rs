use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::feed;

fn default_schedule_url() -> String {
    feed::SCHEDULE_URL.to_string()
}

fn default_update_url() -> String {
    feed::UPDATE_URL.to_string()
}

fn default_share_origin() -> String {
    "https://govoet.pages.dev".to_string()
}

fn default_stream_domain() -> String {
    "embedsports.top".to_string()
}

fn default_stream_backup_domain() -> String {
    "embedsports.me".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Schedule feed fetched by refresh.
    #[serde(default = "default_schedule_url")]
    pub schedule_url: String,
    /// Feed polled by the background update detector.
    #[serde(default = "default_update_url")]
    pub update_url: String,
    /// Origin used when building shareable match links.
    #[serde(default = "default_share_origin")]
    pub share_origin: String,
    /// Primary embed host, swapped for the backup by the "fix stream" action.
    #[serde(default = "default_stream_domain")]
    pub stream_domain: String,
    #[serde(default = "default_stream_backup_domain")]
    pub stream_backup_domain: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schedule_url: default_schedule_url(),
            update_url: default_update_url(),
            share_origin: default_share_origin(),
            stream_domain: default_stream_domain(),
            stream_backup_domain: default_stream_backup_domain(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, anyhow::Error> {
        if let Some(proj_dirs) = ProjectDirs::from("dev", "govoet", "govoet") {
            let config_path = proj_dirs.config_dir().join("config.json");
            if config_path.exists() {
                let content = fs::read_to_string(config_path)?;
                let config: AppConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }
        Ok(AppConfig::default())
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        if let Some(proj_dirs) = ProjectDirs::from("dev", "govoet", "govoet") {
            let config_dir = proj_dirs.config_dir();
            fs::create_dir_all(config_dir)?;
            let config_path = config_dir.join("config.json");
            let content = serde_json::to_string_pretty(self)?;
            fs::write(config_path, content)?;
        }
        Ok(())
    }
}
