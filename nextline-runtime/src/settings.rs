use crate::config_store::ConfigStore;
use anyhow::{Context, anyhow};
use nextline_core::config::AppConfig;
use std::path::Path;

pub const API_HOSTNAME_ENV: &str = "NEXTLINE_API_HOSTNAME";

/// Builds the effective config.
///
/// Precedence: explicit host override (flag or env) > config file > defaults.
/// A config path that was asked for but does not exist is an error.
pub fn resolve_config(
    config_path: Option<&Path>,
    api_host_override: Option<&str>,
) -> anyhow::Result<AppConfig> {
    let mut cfg = match config_path {
        Some(path) => {
            let store = ConfigStore::at_path(path);
            if !store.exists() {
                return Err(anyhow!("config file not found: {}", path.display()));
            }
            log::debug!("loading config from {}", path.display());
            store.load()?
        }
        None => AppConfig::default(),
    };

    if let Some(host) = api_host_override.map(str::trim).filter(|h| !h.is_empty()) {
        cfg.api_hostname = host.to_string();
    }

    validate_api_hostname(&cfg.api_hostname)?;
    Ok(cfg)
}

pub fn validate_api_hostname(host: &str) -> anyhow::Result<()> {
    let url = url::Url::parse(host).with_context(|| format!("invalid API hostname: {host:?}"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(anyhow!("unsupported API hostname scheme: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextline_core::config::DEFAULT_API_HOSTNAME;
    use nextline_core::mood::Mood;

    #[test]
    fn defaults_without_file_or_override() {
        let cfg = resolve_config(None, None).unwrap();
        assert_eq!(cfg.api_hostname, DEFAULT_API_HOSTNAME);
    }

    #[test]
    fn override_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let stored = AppConfig {
            api_hostname: "https://from-file.example.com".into(),
            connect_timeout_secs: 5,
            default_mood: Mood::Random,
        };
        ConfigStore::at_path(&path).save(&stored).unwrap();

        let from_file = resolve_config(Some(&path), None).unwrap();
        assert_eq!(from_file, stored);

        let overridden = resolve_config(Some(&path), Some(" https://flag.example.com ")).unwrap();
        assert_eq!(overridden.api_hostname, "https://flag.example.com");
        assert_eq!(overridden.default_mood, Mood::Random);
    }

    #[test]
    fn blank_override_is_ignored() {
        let cfg = resolve_config(None, Some("   ")).unwrap();
        assert_eq!(cfg.api_hostname, DEFAULT_API_HOSTNAME);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_config(Some(&dir.path().join("nope.json")), None).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn rejects_non_http_hosts() {
        assert!(validate_api_hostname("https://api.example.com").is_ok());
        assert!(validate_api_hostname("http://localhost:8000/").is_ok());
        assert!(validate_api_hostname("ftp://example.com").is_err());
        assert!(validate_api_hostname("not a url").is_err());
    }
}
