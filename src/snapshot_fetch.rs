use std::env;
use std::fs;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::Deserialize;

use crate::http_client::http_client;

/// Where the external generator drops its output when served locally.
pub const DEFAULT_SNAPSHOT_URL: &str = "http://localhost:8000/championship_results.json";

/// One matchup snapshot as written by the external generator. All fields are
/// precomputed upstream; nothing here is ever recalculated, `total_points`
/// included.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    pub generated_at: String,
    #[serde(default)]
    pub weekend: String,
    pub team1: TeamResult,
    pub team2: TeamResult,
    #[serde(default)]
    pub top_performers: Vec<PerformerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamResult {
    pub name: String,
    pub total_points: f64,
    #[serde(default)]
    pub roster: Vec<PlayerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerEntry {
    /// Roster slot label: QB, RB, WR, TE, FLEX, D/ST or K.
    pub position: String,
    pub name: String,
    pub team: String,
    #[serde(default)]
    pub stats: String,
    /// May be negative, e.g. a kicker with missed field goals.
    pub points: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerformerEntry {
    /// 1-based rank assigned by the generator; displayed verbatim.
    pub rank: u32,
    pub position: String,
    pub name: String,
    pub team: String,
    #[serde(default)]
    pub stats: String,
    pub points: f64,
}

pub fn snapshot_url() -> String {
    env::var("SNAPSHOT_URL")
        .ok()
        .filter(|val| !val.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SNAPSHOT_URL.to_string())
}

/// Appends the cache-defeating `v=<epoch millis>` parameter so intermediary
/// caches never serve a stale snapshot.
pub fn cache_busted_url(base: &str, epoch_millis: i64) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}v={epoch_millis}")
}

pub fn fetch_snapshot(base_url: &str) -> Result<Snapshot> {
    let client = http_client()?;
    let url = cache_busted_url(base_url, Utc::now().timestamp_millis());

    let response = client.get(&url).send().context("snapshot request failed")?;
    let status = response.status();
    if !status.is_success() {
        bail!("snapshot request returned {status}");
    }
    let body = response.text().context("snapshot body unreadable")?;
    parse_snapshot_json(&body)
}

pub fn read_snapshot_file(path: &str) -> Result<Snapshot> {
    let body =
        fs::read_to_string(path).with_context(|| format!("snapshot file {path} unreadable"))?;
    parse_snapshot_json(&body)
}

pub fn parse_snapshot_json(raw: &str) -> Result<Snapshot> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        bail!("snapshot body is empty");
    }
    serde_json::from_str(trimmed).context("invalid snapshot json")
}
