//! # Core Error Types
//!
//! Centralized error definitions for the core-logic crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Unified error type for core-logic operations.
///
/// This enum wraps all specific error types and provides a unified
/// error interface for the application layer.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Network(NetworkError),

    #[error(transparent)]
    Auth(AuthError),

    #[error(transparent)]
    Campaign(CampaignError),

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl From<ConfigError> for CoreError {
    fn from(e: ConfigError) -> Self {
        CoreError::Config(e)
    }
}

impl From<NetworkError> for CoreError {
    fn from(e: NetworkError) -> Self {
        CoreError::Network(e)
    }
}

impl From<AuthError> for CoreError {
    fn from(e: AuthError) -> Self {
        CoreError::Auth(e)
    }
}

impl From<CampaignError> for CoreError {
    fn from(e: CampaignError) -> Self {
        CoreError::Campaign(e)
    }
}

/// Startup and configuration errors. All of these terminate the process.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Identity count ({identities}) does not match proxy count ({proxies})")]
    CountMismatch { identities: usize, proxies: usize },

    #[error("No valid identities parsed from input")]
    NoIdentities,

    #[error("Missing required configuration field: '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },
}

/// Network and HTTP-level errors
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Request timeout after {timeout_ms}ms to {endpoint}")]
    Timeout { timeout_ms: u64, endpoint: String },

    #[error("Rate limited by {endpoint}")]
    RateLimited { endpoint: String },

    #[error("HTTP error {status_code} from {endpoint}")]
    HttpError { status_code: u16, endpoint: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("Unsupported proxy scheme in '{url}' (expected http, https or socks5)")]
    UnsupportedProxyScheme { url: String },

    #[error("{operation} exhausted retry budget after {attempts} rate-limited attempts")]
    RetryBudgetExhausted { operation: String, attempts: u32 },
}

/// Sign-in handshake errors
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    #[error("Nonce request rejected for {address}: {reason}")]
    NonceRejected { address: String, reason: String },

    #[error("Authentication rejected for {address}: {reason}")]
    AuthenticationRejected { address: String, reason: String },

    #[error("Message signing failed for {address}: {reason}")]
    SigningFailed { address: String, reason: String },

    #[error("Missing field '{field}' in auth response")]
    MissingField { field: String },
}

/// Campaign data errors
#[derive(Error, Debug, Clone)]
pub enum CampaignError {
    #[error("Campaign data unavailable: {reason}")]
    DataUnavailable { reason: String },
}
