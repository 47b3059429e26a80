use crate::error::NetworkError;
use std::fmt;

/// Dialer family derived from a proxy URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    /// HTTP(S) CONNECT tunnel
    Http,
    /// SOCKS5
    Socks5,
}

/// A proxy endpoint parsed from a free-form descriptor line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyDescriptor {
    /// Full connection URL, credentials embedded as userinfo when present.
    pub url: String,
}

impl ProxyDescriptor {
    /// Parses a descriptor into a connection URL.
    ///
    /// `ip:port` and `ip:port:username:password` become `http://` URLs; any
    /// other non-empty shape passes through unchanged so pre-formed URLs keep
    /// working. Empty input means no proxy.
    pub fn parse(descriptor: &str) -> Option<ProxyDescriptor> {
        let descriptor = descriptor.trim();
        if descriptor.is_empty() {
            return None;
        }

        let parts: Vec<&str> = descriptor.split(':').collect();
        let url = match parts.as_slice() {
            [ip, port] => format!("http://{}:{}", ip, port),
            [ip, port, username, password] => {
                format!("http://{}:{}@{}:{}", username, password, ip, port)
            }
            _ => descriptor.to_string(),
        };

        Some(ProxyDescriptor { url })
    }

    /// Classifies the URL scheme into a dialer family.
    ///
    /// An unrecognized scheme is an error the caller is expected to treat as
    /// non-fatal (fall back to a direct connection).
    pub fn kind(&self) -> Result<ProxyKind, NetworkError> {
        if self.url.starts_with("http://") || self.url.starts_with("https://") {
            Ok(ProxyKind::Http)
        } else if self.url.starts_with("socks5://") {
            Ok(ProxyKind::Socks5)
        } else {
            Err(NetworkError::UnsupportedProxyScheme {
                url: self.url.clone(),
            })
        }
    }
}

impl fmt::Display for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Parses every line of a proxy list, dropping blanks.
pub fn parse_pool(lines: &[String]) -> Vec<ProxyDescriptor> {
    lines
        .iter()
        .filter_map(|line| ProxyDescriptor::parse(line))
        .collect()
}
