use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_SLACK_API_BASE_URL: &str = "https://slack.com/api";
const MAX_PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackApiConfig {
    pub base_url: String,
    /// Unset keeps the http client's own default.
    pub request_timeout_secs: Option<u64>,
}

impl Default for SlackApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SLACK_API_BASE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub channels_limit: u32,
    pub history_limit: u32,
    pub replies_limit: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            channels_limit: 1000,
            history_limit: 200,
            replies_limit: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AugmentConfig {
    pub api: SlackApiConfig,
    pub paging: PagingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialAugmentConfig {
    api: Option<SlackApiConfig>,
    paging: Option<PagingConfig>,
}

fn parse_u32(raw: Option<String>, fallback: u32) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(fallback)
}

fn apply_env_overrides<F>(cfg: &mut AugmentConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("SLACK_API_BASE_URL")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    {
        cfg.api.base_url = url;
    }
    if let Some(secs) = lookup("SLACK_AUGMENT_TIMEOUT_SECS").and_then(|v| v.trim().parse::<u64>().ok())
    {
        cfg.api.request_timeout_secs = Some(secs);
    }
    cfg.paging.channels_limit = parse_u32(
        lookup("SLACK_AUGMENT_CHANNELS_LIMIT"),
        cfg.paging.channels_limit,
    );
    cfg.paging.history_limit = parse_u32(
        lookup("SLACK_AUGMENT_HISTORY_LIMIT"),
        cfg.paging.history_limit,
    );
    cfg.paging.replies_limit = parse_u32(
        lookup("SLACK_AUGMENT_REPLIES_LIMIT"),
        cfg.paging.replies_limit,
    );
}

fn validate(cfg: &AugmentConfig) -> Result<()> {
    let base = cfg.api.base_url.trim();
    if !(base.starts_with("https://") || base.starts_with("http://")) {
        return Err(anyhow!(
            "invalid slack api base url `{base}`: must start with http:// or https://"
        ));
    }
    if cfg.api.request_timeout_secs == Some(0) {
        return Err(anyhow!("invalid request timeout: must be >= 1 second"));
    }
    for (name, limit) in [
        ("channels", cfg.paging.channels_limit),
        ("history", cfg.paging.history_limit),
        ("replies", cfg.paging.replies_limit),
    ] {
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(anyhow!(
                "invalid {name} page limit {limit}: require 1 <= limit <= {MAX_PAGE_LIMIT}"
            ));
        }
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("SLACK_AUGMENT_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let base = dirs::config_dir()?;
    Some(base.join("slack-export-augment").join("config.toml"))
}

fn merge_file_config(base: &mut AugmentConfig, raw: &str, origin: &str) -> Result<()> {
    let parsed: PartialAugmentConfig = toml::from_str(raw)
        .map_err(|err| anyhow!("failed to parse config {origin}: {err}"))?;
    if let Some(api) = parsed.api {
        base.api = api;
    }
    if let Some(paging) = parsed.paging {
        base.paging = paging;
    }
    Ok(())
}

pub fn load_config() -> Result<AugmentConfig> {
    let mut cfg = AugmentConfig::default();

    if let Some(path) = resolve_config_path()
        && path.exists()
    {
        let raw = fs::read_to_string(&path)?;
        merge_file_config(&mut cfg, &raw, &path.display().to_string())?;
    }

    apply_env_overrides(&mut cfg, |var| env::var(var).ok());
    validate(&cfg)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::{AugmentConfig, apply_env_overrides, merge_file_config, validate};
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_slack_page_sizes() {
        let cfg = AugmentConfig::default();
        assert_eq!(cfg.api.base_url, "https://slack.com/api");
        assert_eq!(cfg.api.request_timeout_secs, None);
        assert_eq!(cfg.paging.channels_limit, 1000);
        assert_eq!(cfg.paging.history_limit, 200);
        assert_eq!(cfg.paging.replies_limit, 200);
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn env_overrides_apply_and_bad_numbers_fall_back() {
        let mut cfg = AugmentConfig::default();
        apply_env_overrides(
            &mut cfg,
            env_of(&[
                ("SLACK_API_BASE_URL", " http://127.0.0.1:8080/api "),
                ("SLACK_AUGMENT_TIMEOUT_SECS", "15"),
                ("SLACK_AUGMENT_HISTORY_LIMIT", "50"),
                ("SLACK_AUGMENT_REPLIES_LIMIT", "lots"),
            ]),
        );
        assert_eq!(cfg.api.base_url, "http://127.0.0.1:8080/api");
        assert_eq!(cfg.api.request_timeout_secs, Some(15));
        assert_eq!(cfg.paging.channels_limit, 1000);
        assert_eq!(cfg.paging.history_limit, 50);
        assert_eq!(cfg.paging.replies_limit, 200);
    }

    #[test]
    fn file_sections_replace_defaults() {
        let mut cfg = AugmentConfig::default();
        let raw = r#"
[paging]
channels_limit = 500
history_limit = 100
replies_limit = 100
"#;
        merge_file_config(&mut cfg, raw, "inline").expect("parse");
        assert_eq!(cfg.paging.channels_limit, 500);
        assert_eq!(cfg.api.base_url, "https://slack.com/api");
    }

    #[test]
    fn partial_sections_keep_defaults_for_missing_keys() {
        let mut cfg = AugmentConfig::default();
        merge_file_config(&mut cfg, "[api]\nrequest_timeout_secs = 60\n", "inline")
            .expect("parse api");
        assert_eq!(cfg.api.base_url, "https://slack.com/api");
        assert_eq!(cfg.api.request_timeout_secs, Some(60));

        let mut cfg = AugmentConfig::default();
        merge_file_config(&mut cfg, "[paging]\nhistory_limit = 100\n", "inline")
            .expect("parse paging");
        assert_eq!(cfg.paging.channels_limit, 1000);
        assert_eq!(cfg.paging.history_limit, 100);
        assert_eq!(cfg.paging.replies_limit, 200);
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn rejects_out_of_range_limits_and_bad_urls() {
        let mut cfg = AugmentConfig::default();
        cfg.paging.history_limit = 0;
        assert!(validate(&cfg).is_err());

        let mut cfg = AugmentConfig::default();
        cfg.paging.channels_limit = 1001;
        assert!(validate(&cfg).is_err());

        let mut cfg = AugmentConfig::default();
        cfg.api.base_url = "slack.com/api".to_string();
        assert!(validate(&cfg).is_err());

        let mut cfg = AugmentConfig::default();
        cfg.api.request_timeout_secs = Some(0);
        assert!(validate(&cfg).is_err());
    }
}
