use reqwest::Proxy;
use serde::{Deserialize, Serialize};

use super::TransportError;

/// Proxy configuration types
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyType {
    /// Proxy every request regardless of the target scheme
    #[default]
    All,
    /// Only proxy `http://` targets
    Http,
    /// Only proxy `https://` targets
    Https,
    /// SOCKS5 proxy
    Socks5,
}

/// Proxy authentication type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

/// Proxy configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy server URL (e.g., "http://proxy.example.com:8080")
    pub url: String,
    pub proxy_type: ProxyType,
    pub auth: Option<ProxyAuth>,
}

impl ProxyConfig {
    /// Build a config from a bare proxy URL. `socks5://` and `socks5h://`
    /// select SOCKS5; anything else proxies all schemes.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let proxy_type = if url.starts_with("socks5://") || url.starts_with("socks5h://") {
            ProxyType::Socks5
        } else {
            ProxyType::All
        };
        Self {
            url,
            proxy_type,
            auth: None,
        }
    }

    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(ProxyAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }
}

/// Build a reqwest Proxy object from our proxy configuration
pub fn build_proxy_from_config(config: &ProxyConfig) -> Result<Proxy, TransportError> {
    let proxy_url = &config.url;

    let mut proxy = match config.proxy_type {
        ProxyType::All => Proxy::all(proxy_url)
            .map_err(|e| TransportError::Proxy(format!("Invalid proxy URL: {e}")))?,
        ProxyType::Http => Proxy::http(proxy_url)
            .map_err(|e| TransportError::Proxy(format!("Invalid HTTP proxy URL: {e}")))?,
        ProxyType::Https => Proxy::https(proxy_url)
            .map_err(|e| TransportError::Proxy(format!("Invalid HTTPS proxy URL: {e}")))?,
        ProxyType::Socks5 => {
            let url = if proxy_url.starts_with("socks5://") || proxy_url.starts_with("socks5h://") {
                proxy_url.to_string()
            } else {
                format!("socks5://{proxy_url}")
            };

            Proxy::all(&url)
                .map_err(|e| TransportError::Proxy(format!("Invalid SOCKS5 proxy URL: {e}")))?
        }
    };

    if let Some(auth) = &config.auth {
        proxy = proxy.basic_auth(&auth.username, &auth.password);
    }

    Ok(proxy)
}
