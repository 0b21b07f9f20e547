use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vivo_parser::{ClientOptions, ProbePolicy, ProxyConfig};

use crate::cli::Args;
use crate::error::Result;

const MASKED: &str = "********";

/// Settings read from `config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Proxy URL used for every request
    pub proxy: Option<String>,
    pub proxy_username: Option<String>,
    pub proxy_password: Option<String>,
    /// Request timeout in seconds, 0 for none
    pub timeout_secs: u64,
    pub disable_compression: bool,
    /// Overrides the built-in browser user agent
    pub user_agent: Option<String>,
    /// Default destination for downloads
    pub output_dir: PathBuf,
    pub probe_policy: ProbePolicy,
    pub colored: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            proxy_username: None,
            proxy_password: None,
            timeout_secs: 0,
            disable_compression: true,
            user_agent: None,
            output_dir: PathBuf::from("."),
            probe_policy: ProbePolicy::default(),
            colored: true,
        }
    }
}

impl AppConfig {
    /// Load from an explicit path, or from the per-user config file.
    ///
    /// A missing per-user file yields defaults; a missing explicit path is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vivo-dl").join("config.toml"))
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading configuration");
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply command line flags on top of the file values.
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(proxy) = &args.proxy {
            self.proxy = Some(proxy.clone());
        }
        if let (Some(username), Some(password)) = (&args.proxy_username, &args.proxy_password) {
            self.proxy_username = Some(username.clone());
            self.proxy_password = Some(password.clone());
        }
        if let Some(timeout) = args.timeout {
            self.timeout_secs = timeout;
        }
        if let Some(output) = &args.output {
            self.output_dir = output.clone();
        }
        if let Some(policy) = args.probe_policy {
            self.probe_policy = policy.into();
        }
        if args.clean {
            self.colored = false;
        }
        self
    }

    pub fn client_options(&self) -> ClientOptions {
        let proxy = self.proxy.as_deref().filter(|p| !p.is_empty()).map(|url| {
            let config = ProxyConfig::from_url(url);
            match (&self.proxy_username, &self.proxy_password) {
                (Some(username), Some(password)) => config.with_auth(username, password),
                _ => config,
            }
        });

        ClientOptions {
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            proxy,
            disable_compression: self.disable_compression,
            ..ClientOptions::default()
        }
    }

    /// Effective configuration as TOML, with the proxy password masked.
    pub fn show(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.proxy_password.is_some() {
            shown.proxy_password = Some(MASKED.to_string());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use vivo_parser::ProxyType;

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "probe_policy = \"fatal\"\ntimeout_secs = 20").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.probe_policy, ProbePolicy::Fatal);
        assert_eq!(config.timeout_secs, 20);
        assert!(config.disable_compression);
        assert!(config.colored);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(dir.path().join("nope.toml").as_path())).is_err());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "probe_policy = \"sometimes\"").unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let config = AppConfig {
            proxy: Some("http://file-proxy:8080".into()),
            timeout_secs: 10,
            ..AppConfig::default()
        };
        let args = Args::parse_from([
            "vivo",
            "-c",
            "-p",
            "socks5://127.0.0.1:1080",
            "--timeout",
            "0",
            "-o",
            "/downloads",
            "--probe-policy",
            "fatal",
            "vivo.sx/abcdefghij",
        ]);

        let config = config.with_args(&args);
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert_eq!(config.timeout_secs, 0);
        assert_eq!(config.output_dir, PathBuf::from("/downloads"));
        assert_eq!(config.probe_policy, ProbePolicy::Fatal);
        assert!(!config.colored);
    }

    #[test]
    fn test_client_options() {
        let options = AppConfig::default().client_options();
        assert_eq!(options.timeout, None);
        assert!(options.proxy.is_none());
        assert!(options.disable_compression);

        let config = AppConfig {
            proxy: Some("socks5://127.0.0.1:1080".into()),
            proxy_username: Some("user".into()),
            proxy_password: Some("pass".into()),
            timeout_secs: 5,
            ..AppConfig::default()
        };
        let options = config.client_options();
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        let proxy = options.proxy.unwrap();
        assert_eq!(proxy.proxy_type, ProxyType::Socks5);
        assert_eq!(proxy.auth.unwrap().username, "user");
    }

    #[test]
    fn test_show_masks_proxy_password() {
        let config = AppConfig {
            proxy: Some("http://proxy:8080".into()),
            proxy_username: Some("user".into()),
            proxy_password: Some("hunter2".into()),
            ..AppConfig::default()
        };
        let shown = config.show().unwrap();
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("proxy_password = \"********\""));
        assert!(shown.contains("proxy_username = \"user\""));
        assert_eq!(config.proxy_password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_show_is_loadable() {
        let config = AppConfig {
            user_agent: Some("custom/1.0".into()),
            ..AppConfig::default()
        };
        let shown = config.show().unwrap();
        assert!(shown.contains("probe_policy = \"tolerate\""));
        let parsed: AppConfig = toml::from_str(&shown).unwrap();
        assert_eq!(parsed, config);
    }
}
