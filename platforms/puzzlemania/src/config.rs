//! Configuration loader for the Puzzle Mania bot

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Top-level configuration, deserialized from a TOML file.
///
/// Every field carries a compiled default so a missing file (or a partial
/// file) still yields a working configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PuzzleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub login: LoginSettings,
}

/// Endpoints and platform identifiers. Overridable so integration tests can
/// point the bot at a local mock server.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the wallet-auth host
    #[serde(default = "default_auth_base_url")]
    pub auth_base_url: String,
    /// Campaign GraphQL endpoint
    #[serde(default = "default_campaign_url")]
    pub campaign_url: String,
    /// Fixed campaign identifier
    #[serde(default = "default_campaign_id")]
    pub campaign_id: String,
    #[serde(default = "default_privy_app_id")]
    pub privy_app_id: String,
    #[serde(default = "default_privy_ca_id")]
    pub privy_ca_id: String,
    #[serde(default = "default_privy_client")]
    pub privy_client: String,
    /// Site origin, also the SIWE domain and URI
    #[serde(default = "default_site_origin")]
    pub site_origin: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Chain referenced by the sign-in message
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Delay between identities within one pass, in milliseconds
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,
    /// Full cycle length in milliseconds
    #[serde(default = "default_cycle_ms")]
    pub cycle_ms: u64,
    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// HTTP connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Countdown re-render interval in milliseconds
    #[serde(default = "default_countdown_tick_ms")]
    pub countdown_tick_ms: u64,
}

/// Rate-limit retry budget, consumed by the shared retry executor.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_retry_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginSettings {
    /// Login attempts per identity per cycle; the last one runs direct
    #[serde(default = "default_login_max_attempts")]
    pub max_attempts: u32,
}

fn default_auth_base_url() -> String {
    "https://auth.privy.io".to_string()
}
fn default_campaign_url() -> String {
    "https://api.deform.cc/".to_string()
}
fn default_campaign_id() -> String {
    "f7e24f14-b911-4f11-b903-edac89a095ec".to_string()
}
fn default_privy_app_id() -> String {
    "clphlvsh3034xjw0fvs59mrdc".to_string()
}
fn default_privy_ca_id() -> String {
    "94f3cea1-8c2b-478d-90da-edc794f7114b".to_string()
}
fn default_privy_client() -> String {
    "react-auth:2.4.1".to_string()
}
fn default_site_origin() -> String {
    "https://puzzlemania.0g.ai".to_string()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36".to_string()
}
fn default_chain_id() -> u64 {
    8453
}
fn default_pacing_delay_ms() -> u64 {
    3000
}
fn default_cycle_ms() -> u64 {
    24 * 60 * 60 * 1000
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_countdown_tick_ms() -> u64 {
    1000
}
fn default_retry_max_attempts() -> u32 {
    30
}
fn default_retry_delay_ms() -> u64 {
    2000
}
fn default_login_max_attempts() -> u32 {
    5
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_base_url: default_auth_base_url(),
            campaign_url: default_campaign_url(),
            campaign_id: default_campaign_id(),
            privy_app_id: default_privy_app_id(),
            privy_ca_id: default_privy_ca_id(),
            privy_client: default_privy_client(),
            site_origin: default_site_origin(),
            user_agent: default_user_agent(),
            chain_id: default_chain_id(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            pacing_delay_ms: default_pacing_delay_ms(),
            cycle_ms: default_cycle_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            countdown_tick_ms: default_countdown_tick_ms(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_retry_max_attempts(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_login_max_attempts(),
        }
    }
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            timing: TimingConfig::default(),
            retry: RetrySettings::default(),
            login: LoginSettings::default(),
        }
    }
}

impl PuzzleConfig {
    /// Load configuration from a TOML file, falling back to compiled
    /// defaults when the file does not exist.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!("Config file {} not found, using defaults", path);
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(path).context(format!("Failed to read config from {}", path))?;
        toml::from_str(&content).context("Failed to parse config TOML")
    }
}

impl ApiConfig {
    /// SIWE domain: the site origin without its scheme.
    pub fn site_domain(&self) -> &str {
        self.site_origin
            .trim_start_matches("https://")
            .trim_start_matches("http://")
    }

    /// Chain descriptor submitted with the signed message.
    pub fn chain_descriptor(&self) -> String {
        format!("eip155:{}", self.chain_id)
    }
}
