use serde::{Deserialize, Serialize};

use crate::errors::FeedError;

/// Default schedule feed. Overridable via config file or `--url`.
pub const SCHEDULE_URL: &str = "https://weekendsch.pages.dev/sch/schedule.json";

/// Secondary feed polled by the background update detector.
pub const UPDATE_URL: &str = "https://gvtsch.pages.dev/sch.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamServer {
    pub url: String,
    pub label: String,
}

/// One match as delivered by the feed. All date/time/duration fields are
/// raw strings; any of them may carry the "live" override sentinel instead
/// of a real value, so parsing is deferred to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub league: String,
    pub team1: Team,
    /// Absent for solo events (single fight card, "TBA" opponent).
    #[serde(default)]
    pub team2: Option<Team>,
    /// Display-oriented pair, local to the feed's fixed UTC+7 offset.
    #[serde(default)]
    pub kickoff_date: String,
    #[serde(default)]
    pub kickoff_time: String,
    /// Authoritative pair used for status and countdown computation.
    #[serde(default)]
    pub match_date: String,
    #[serde(default)]
    pub match_time: String,
    /// Decimal hour count, or the "live" sentinel.
    #[serde(default)]
    pub duration: String,
    /// Mirror list; order defines default selection and display order.
    #[serde(default)]
    pub servers: Vec<StreamServer>,
}

impl Match {
    /// Display title. Centralizes the solo-event branch so list, player
    /// and share views agree on what a one-participant match looks like.
    pub fn title(&self) -> String {
        match &self.team2 {
            Some(team2) => format!("{} vs {}", self.team1.name, team2.name),
            None => self.team1.name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    schedule_url: String,
    update_url: String,
}

impl FeedClient {
    pub fn new(schedule_url: String, update_url: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("govoet-tui")
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            schedule_url,
            update_url,
        }
    }

    /// Fetch and decode the schedule feed. Non-2xx and undecodable bodies
    /// are errors for the caller to surface; individual malformed fields
    /// inside a record are not (the classifier absorbs those).
    pub async fn fetch_schedule(&self) -> Result<Vec<Match>, FeedError> {
        let resp = self.client.get(&self.schedule_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        let matches: Vec<Match> = serde_json::from_str(&body)?;
        Ok(matches)
    }

    /// Fetch the update-check feed as raw text, bypassing caches. The body
    /// is the fingerprint: the detector compares it byte-for-byte.
    pub async fn fetch_raw(&self) -> Result<String, FeedError> {
        let resp = self
            .client
            .get(&self.update_url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }
        Ok(resp.text().await?)
    }
}
