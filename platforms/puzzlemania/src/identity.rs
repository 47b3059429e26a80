//! Wallet-backed identities built from user-supplied key material

use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use anyhow::{Context, Result};
use core_logic::{parse_pool, short_address, AuthError, ConfigError, ProxyDescriptor};
use std::fmt;
use tracing::{error, info};
use zeroize::Zeroize;

/// One wallet-controlled identity: a local signer, its checksummed address
/// and the proxy descriptor paired with it at startup.
///
/// Immutable for the process lifetime. The raw key string is wiped once the
/// signer is constructed.
pub struct Identity {
    signer: PrivateKeySigner,
    address: String,
    proxy: Option<ProxyDescriptor>,
}

impl Identity {
    pub fn from_key(raw_key: &str, proxy: Option<ProxyDescriptor>) -> Result<Self> {
        let trimmed = raw_key.trim();
        let mut key = trimmed
            .strip_prefix("0x")
            .unwrap_or(trimmed)
            .to_string();

        let parsed = key.parse::<PrivateKeySigner>();
        key.zeroize();
        let signer = parsed.context("Invalid private key")?;

        let address = signer.address().to_checksum(None);
        Ok(Self {
            signer,
            address,
            proxy,
        })
    }

    /// EIP-55 checksummed address, derived once at construction.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn assigned_proxy(&self) -> Option<&ProxyDescriptor> {
        self.proxy.as_ref()
    }

    /// EIP-191 signature over `message`, hex-encoded with a `0x` prefix.
    pub async fn sign_message(&self, message: &str) -> Result<String> {
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| AuthError::SigningFailed {
                address: short_address(&self.address),
                reason: e.to_string(),
            })?;
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("address", &self.address)
            .field("proxy", &self.proxy)
            .finish_non_exhaustive()
    }
}

/// Builds the identity set from paired key and proxy lines.
///
/// The counts must match 1:1 by line order; a mismatch is fatal. Individual
/// bad key lines are logged with their 1-based line number and skipped; zero
/// survivors is fatal too. Every key line is wiped in place once consumed,
/// valid or not.
pub fn build_identities(keys: &mut [String], proxy_lines: &[String]) -> Result<Vec<Identity>> {
    if keys.len() != proxy_lines.len() {
        return Err(ConfigError::CountMismatch {
            identities: keys.len(),
            proxies: proxy_lines.len(),
        }
        .into());
    }

    let mut identities = Vec::with_capacity(keys.len());
    for (i, (key, proxy_line)) in keys.iter_mut().zip(proxy_lines.iter()).enumerate() {
        let proxy = ProxyDescriptor::parse(proxy_line);
        let built = Identity::from_key(key, proxy);
        key.zeroize();
        match built {
            Ok(identity) => {
                if let Some(proxy) = identity.assigned_proxy() {
                    info!(
                        "Wallet {} using proxy {}",
                        short_address(identity.address()),
                        proxy
                    );
                }
                info!("Wallet {} added", short_address(identity.address()));
                identities.push(identity);
            }
            Err(e) => error!("Bad private key on line {}: {:#}", i + 1, e),
        }
    }

    if identities.is_empty() {
        return Err(ConfigError::NoIdentities.into());
    }
    Ok(identities)
}

/// Variant of [`build_identities`] for the shared-proxy flow: every identity
/// gets the same descriptor (or none), so no count invariant applies.
pub fn build_identities_shared(
    keys: &mut [String],
    shared: Option<ProxyDescriptor>,
) -> Result<Vec<Identity>> {
    let mut identities = Vec::with_capacity(keys.len());
    for (i, key) in keys.iter_mut().enumerate() {
        let built = Identity::from_key(key, shared.clone());
        key.zeroize();
        match built {
            Ok(identity) => {
                info!("Wallet {} added", short_address(identity.address()));
                identities.push(identity);
            }
            Err(e) => error!("Bad private key on line {}: {:#}", i + 1, e),
        }
    }
    if identities.is_empty() {
        return Err(ConfigError::NoIdentities.into());
    }
    Ok(identities)
}

/// Proxy pool for per-attempt rotation: every parsable descriptor line.
pub fn build_proxy_pool(proxy_lines: &[String]) -> Vec<ProxyDescriptor> {
    parse_pool(proxy_lines)
}
