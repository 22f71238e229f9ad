//! Configuration management for rampup

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scan::{FailurePolicy, IgnoreMatch, ScanFilterConfig, DEFAULT_EXTENSIONS, DEFAULT_IGNORE};
use crate::summary::DEFAULT_SUMMARY_FILE;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub azure: AzureConfig,
    pub scan: ScanConfig,
    pub prompt: PromptConfig,
    #[serde(skip)]
    pub verbose: bool,
}

/// Azure OpenAI connection settings, passed through to the client untouched
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureConfig {
    pub endpoint: String,
    pub deployment_name: String,
    pub api_version: String,
    /// Used only when the environment variable named by `api_key_env` is unset
    pub api_key: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub extensions: Vec<String>,
    pub ignore: Vec<String>,
    pub ignore_match: IgnoreMatch,
    pub failure_policy: FailurePolicy,
    pub summary_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Cap on embedded file content; 0 disables it
    pub max_content_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            azure: AzureConfig::default(),
            scan: ScanConfig::default(),
            prompt: PromptConfig::default(),
            verbose: false,
        }
    }
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            deployment_name: "gpt-4o".to_string(),
            api_version: "2024-02-15-preview".to_string(),
            api_key: String::new(),
            api_key_env: "AZURE_OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            ignore_match: IgnoreMatch::default(),
            failure_policy: FailurePolicy::default(),
            summary_file: DEFAULT_SUMMARY_FILE.to_string(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_content_bytes: 256 * 1024,
        }
    }
}

impl AzureConfig {
    /// Resolve the API key: environment variable first, then the config file
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(&self.api_key_env) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }
        if !self.api_key.trim().is_empty() {
            return Ok(self.api_key.clone());
        }
        anyhow::bail!(
            "No Azure OpenAI API key: set {} or azure.api_key in the config file",
            self.api_key_env
        )
    }
}

impl ScanConfig {
    /// Filter for a scan; `extensions_override` is raw comma-separated user input
    pub fn filter(&self, extensions_override: Option<&str>) -> ScanFilterConfig {
        let filter = ScanFilterConfig::default()
            .with_ignored(self.ignore.iter().cloned())
            .with_ignore_match(self.ignore_match)
            .with_failure_policy(self.failure_policy);

        match extensions_override {
            Some(input) => filter.with_extensions_input(input),
            None => filter.with_extensions(&self.extensions),
        }
    }
}

/// Get the configuration file path
fn config_path() -> Result<PathBuf> {
    let config_dir = directories::ProjectDirs::from("dev", "rampup", "rampup")
        .context("Failed to determine config directory")?
        .config_dir()
        .to_path_buf();

    Ok(config_dir.join("config.toml"))
}

/// Load configuration from file or use defaults
pub fn load_config(custom_path: Option<&str>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        PathBuf::from(p)
    } else {
        config_path()?
    };

    if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

/// Initialize configuration file with defaults
pub fn init_config(custom_path: Option<&str>) -> Result<()> {
    let path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => config_path()?,
    };

    if path.exists() {
        println!("Configuration file already exists at {:?}", path);
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }

    let default_config = Config::default();
    let content = toml::to_string_pretty(&default_config)
        .context("Failed to serialize default config")?;

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config to {:?}", path))?;

    println!("Configuration initialized at {:?}", path);
    Ok(())
}

/// Show current configuration with the API key redacted
pub fn show_config(config: &Config) -> Result<()> {
    let mut shown = config.clone();
    if !shown.azure.api_key.is_empty() {
        shown.azure.api_key = "********".to_string();
    }
    let content = toml::to_string_pretty(&shown)
        .context("Failed to serialize config")?;
    println!("{}", content);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("none.toml");
        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.scan.summary_file, "repo_summary.json");
        assert_eq!(config.scan.ignore_match, IgnoreMatch::Substring);
        assert_eq!(config.scan.failure_policy, FailurePolicy::FailFast);
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[azure]
endpoint = "https://example.openai.azure.com"

[scan]
ignore_match = "segment"
failure_policy = "skip"
"#,
        )
        .unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.azure.endpoint, "https://example.openai.azure.com");
        assert_eq!(config.azure.api_key_env, "AZURE_OPENAI_API_KEY");
        assert_eq!(config.scan.ignore_match, IgnoreMatch::Segment);
        assert_eq!(config.scan.failure_policy, FailurePolicy::SkipAndLog);
        assert_eq!(config.scan.extensions.len(), DEFAULT_EXTENSIONS.len());
    }

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.prompt.max_content_bytes, 256 * 1024);
        assert_eq!(parsed.scan.ignore, Config::default().scan.ignore);
    }

    #[test]
    fn test_api_key_from_file_when_env_unset() {
        let azure = AzureConfig {
            api_key: "from-file".to_string(),
            api_key_env: "RAMPUP_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..AzureConfig::default()
        };
        assert_eq!(azure.resolve_api_key().unwrap(), "from-file");
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let azure = AzureConfig {
            api_key_env: "RAMPUP_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..AzureConfig::default()
        };
        assert!(azure.resolve_api_key().is_err());
    }

    #[test]
    fn test_skip_policy_from_file_reaches_scan() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scan]\nfailure_policy = \"skip\"\n").unwrap();
        let config = load_config(path.to_str()).unwrap();

        let repo = TempDir::new().unwrap();
        std::fs::write(repo.path().join("a.py"), "a = 1\n").unwrap();
        std::fs::write(repo.path().join("b.py"), "b = 2\n").unwrap();

        let filter = config.scan.filter(Some("py"));
        assert_eq!(filter.failure_policy, FailurePolicy::SkipAndLog);

        let root = repo.path().to_path_buf();
        let mut deleted = false;
        let outcome = crate::scan::scan_with_progress(repo.path(), &filter, |_| {
            if !deleted {
                deleted = true;
                let _ = std::fs::remove_file(root.join("a.py"));
                let _ = std::fs::remove_file(root.join("b.py"));
            }
        })
        .unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
    }

    #[test]
    fn test_extension_override_wins() {
        let filter = ScanConfig::default().filter(Some("rs, toml"));
        assert!(filter.allowed_extensions.contains(".rs"));
        assert!(filter.allowed_extensions.contains(".toml"));
        assert!(!filter.allowed_extensions.contains(".py"));
    }
}
