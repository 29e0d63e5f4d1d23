use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Simple configuration for revu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bitbucket: BitbucketConfig,

    #[serde(default)]
    pub review: ReviewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BitbucketConfig {
    #[serde(default)]
    pub username: String,

    /// Never read from or written to the config file; env only.
    #[serde(skip)]
    pub app_password: String,

    #[serde(default)]
    pub workspace: String,

    #[serde(default)]
    pub repositories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default = "default_max_comments")]
    pub max_comments_per_pr: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bitbucket: BitbucketConfig::default(),
            review: ReviewConfig::default(),
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_comments_per_pr: default_max_comments(),
        }
    }
}

fn default_max_comments() -> usize {
    20
}

impl Config {
    /// Load config from default location or create default if not found,
    /// then apply environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            config
        };

        config.apply_env();
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "revu", "revu") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.revu/config.toml")
        }
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("BITBUCKET_USERNAME") {
            self.bitbucket.username = v;
        }
        if let Ok(v) = std::env::var("BITBUCKET_APP_PASSWORD") {
            self.bitbucket.app_password = v;
        }
        if let Ok(v) = std::env::var("BITBUCKET_WORKSPACE") {
            self.bitbucket.workspace = v;
        }
        if let Ok(v) = std::env::var("BITBUCKET_REPOSITORIES") {
            self.bitbucket.repositories = split_repositories(&v);
        } else if let Ok(v) = std::env::var("BITBUCKET_REPOSITORY") {
            self.bitbucket.repositories = split_repositories(&v);
        }
    }
}

fn split_repositories(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.review.max_comments_per_pr, 20);
        assert!(config.bitbucket.repositories.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.review.max_comments_per_pr,
            config.review.max_comments_per_pr
        );
    }

    #[test]
    fn test_app_password_never_serialized() {
        let mut config = Config::default();
        config.bitbucket.app_password = "supersecret".to_string();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(!toml_str.contains("supersecret"));
        assert!(!toml_str.contains("app_password"));
    }

    #[test]
    fn test_split_repositories() {
        assert_eq!(
            split_repositories("billing-api, android-app ,"),
            vec!["billing-api".to_string(), "android-app".to_string()]
        );
        assert!(split_repositories("").is_empty());
    }
}
