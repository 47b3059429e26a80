//! Identity session manager: the SIWE handshake
//!
//! Runs the whole sign-in protocol for one identity inside the shared retry
//! executor and yields a time-stamped [`AuthSession`]. Any non-rate-limit
//! failure is terminal for the attempt; the scheduler decides whether to try
//! again with a different dialer.

use crate::client::AttemptClient;
use crate::config::PuzzleConfig;
use crate::identity::Identity;
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use core_logic::{short_address, with_rate_limit_retry, AuthError, Clock, RetryConfig};
use serde_json::{json, Value};
use tracing::debug;

/// Placeholder used when the profile carries no usable display name.
pub const FALLBACK_DISPLAY_NAME: &str = "unknown user";

const USER_LOGIN_QUERY: &str = "mutation UserLogin($data: UserLoginInput!) {\n  userLogin(data: $data)\n}";

/// An authenticated platform session for exactly one identity.
///
/// Discarded at the end of the identity's pass; every cycle re-authenticates.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Platform bearer token
    pub token: String,
    pub display_name: String,
    /// Checksummed address of the owning identity
    pub address: String,
    /// Clock reading at handshake completion, milliseconds
    pub issued_at_ms: u64,
}

/// Performs the full handshake for `identity`, retrying only on rate limits.
pub async fn login(
    client: &AttemptClient,
    config: &PuzzleConfig,
    identity: &Identity,
    clock: &dyn Clock,
) -> Result<AuthSession> {
    let retry = RetryConfig::new(config.retry.max_attempts, config.retry.delay_ms);
    with_rate_limit_retry(retry, clock, "login", || {
        handshake(client, config, identity, clock)
    })
    .await
    .with_context(|| format!("Login failed for {}", short_address(identity.address())))
}

async fn handshake(
    client: &AttemptClient,
    config: &PuzzleConfig,
    identity: &Identity,
    clock: &dyn Clock,
) -> Result<AuthSession> {
    let address = identity.address();
    let short = short_address(address);
    debug!("[{}] requesting sign-in nonce", short);

    let init = client
        .siwe_init(&json!({ "address": address }))
        .await
        .context("SIWE init request failed")?;
    let nonce = init
        .get("nonce")
        .and_then(Value::as_str)
        .ok_or_else(|| AuthError::MissingField {
            field: "nonce".to_string(),
        })?;
    debug!("[{}] nonce obtained", short);

    let issued_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let message = siwe_message(
        config.api.site_domain(),
        &config.api.site_origin,
        address,
        config.api.chain_id,
        nonce,
        &issued_at,
    );
    let signature = identity.sign_message(&message).await?;
    debug!("[{}] message signed", short);

    let auth_payload = json!({
        "message": message,
        "signature": signature,
        "chainId": config.api.chain_descriptor(),
        "walletClientType": "metamask",
        "connectorType": "injected",
        "mode": "login-or-sign-up",
    });
    let auth = client
        .siwe_authenticate(&auth_payload)
        .await
        .context("SIWE authenticate request failed")?;
    let external_token = auth
        .get("token")
        .and_then(Value::as_str)
        .ok_or_else(|| AuthError::MissingField {
            field: "token".to_string(),
        })?;
    let display_name = display_name_from_profile(auth.get("user").unwrap_or(&Value::Null));
    debug!("[{}] authenticated as {}", short, display_name);

    let login_payload = json!({
        "operationName": "UserLogin",
        "variables": { "data": { "externalAuthToken": external_token } },
        "query": USER_LOGIN_QUERY,
    });
    let login = client
        .graphql("UserLogin", &login_payload, None)
        .await
        .context("UserLogin mutation failed")?;
    let platform_token = login
        .pointer("/data/userLogin")
        .and_then(Value::as_str)
        .ok_or_else(|| AuthError::MissingField {
            field: "userLogin".to_string(),
        })?;
    debug!("[{}] platform token obtained", short);

    Ok(AuthSession {
        token: platform_token.to_string(),
        display_name,
        address: address.to_string(),
        issued_at_ms: clock.now_millis(),
    })
}

/// The canonical sign-in message the wallet signs, byte-for-byte.
pub fn siwe_message(
    domain: &str,
    uri: &str,
    address: &str,
    chain_id: u64,
    nonce: &str,
    issued_at: &str,
) -> String {
    format!(
        "{domain} wants you to sign in with your Ethereum account:\n\
         {address}\n\
         \n\
         By signing, you are proving you own this wallet and logging in. This does not initiate a transaction or cost any fees.\n\
         \n\
         URI: {uri}\n\
         Version: 1\n\
         Chain ID: {chain_id}\n\
         Nonce: {nonce}\n\
         Issued At: {issued_at}\n\
         Resources:\n\
         - https://privy.io"
    )
}

/// First named Twitter OAuth account in the profile, truncated at its first
/// `|` separator; otherwise the generic placeholder.
pub fn display_name_from_profile(user: &Value) -> String {
    user.get("linked_accounts")
        .and_then(Value::as_array)
        .and_then(|accounts| {
            accounts.iter().find(|account| {
                account.get("type").and_then(Value::as_str) == Some("twitter_oauth")
                    && account.get("name").and_then(Value::as_str).is_some()
            })
        })
        .and_then(|account| account.get("name").and_then(Value::as_str))
        .map(|name| name.split('|').next().unwrap_or(name).trim().to_string())
        .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string())
}
