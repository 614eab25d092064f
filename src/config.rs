use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::aggregator::SearchRequest;
use crate::cli::Cli;
use crate::error::{HacktoberError, Result};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillLevel::Beginner => write!(f, "beginner"),
            SkillLevel::Intermediate => write!(f, "intermediate"),
            SkillLevel::Advanced => write!(f, "advanced"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
    pub preferred_languages: Vec<String>,
    pub skill_level: SkillLevel,
    pub max_repos: usize,
    pub max_issues_per_repo: usize,
    pub min_stars: u32,
    pub topic: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            preferred_languages: ["Go", "JavaScript", "Python", "TypeScript"]
                .iter()
                .map(|l| l.to_string())
                .collect(),
            skill_level: SkillLevel::Intermediate,
            max_repos: 50,
            max_issues_per_repo: 20,
            min_stars: 20,
            topic: "hacktoberfest".to_string(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("hacktober").join("config.toml"))
}

impl Config {
    /// Load from the default location. A missing or broken file means defaults.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Config::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Config::default();
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
                Config::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = config_path()
            .ok_or_else(|| HacktoberError::Config("could not find config directory".into()))?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| HacktoberError::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Command-line flags win over the file
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.no_languages {
            self.preferred_languages.clear();
        } else if !cli.languages.is_empty() {
            self.preferred_languages = cli.languages.clone();
        }
        if let Some(n) = cli.max_repos {
            self.max_repos = n;
        }
        if let Some(n) = cli.max_issues {
            self.max_issues_per_repo = n;
        }
        if let Some(n) = cli.min_stars {
            self.min_stars = n;
        }
        if let Some(topic) = &cli.topic {
            self.topic = topic.clone();
        }
        if let Some(level) = cli.skill_level {
            self.skill_level = level;
        }
    }
}

/// Resolved, read-only settings for the lifetime of the process
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub preferred_languages: Vec<String>,
    pub skill_level: SkillLevel,
    pub max_repos: usize,
    pub max_issues_per_repo: usize,
    pub min_stars: u32,
    pub topic: String,
}

impl Settings {
    pub fn new(config: Config, token: String) -> Self {
        Self {
            token,
            preferred_languages: config.preferred_languages,
            skill_level: config.skill_level,
            max_repos: config.max_repos.max(1),
            max_issues_per_repo: config.max_issues_per_repo.max(1),
            min_stars: config.min_stars,
            topic: config.topic,
        }
    }

    pub fn search_request(&self, page: u32) -> SearchRequest {
        SearchRequest {
            topic: self.topic.clone(),
            min_stars: self.min_stars,
            languages: self.preferred_languages.clone(),
            max_results: self.max_repos,
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
github_token = "ghp_example"
preferred_languages = ["Rust", "Go"]
skill_level = "advanced"
max_repos = 25
max_issues_per_repo = 10
min_stars = 100
topic = "hacktoberfest"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.github_token.as_deref(), Some("ghp_example"));
        assert_eq!(config.preferred_languages, vec!["Rust", "Go"]);
        assert_eq!(config.skill_level, SkillLevel::Advanced);
        assert_eq!(config.max_repos, 25);
        assert_eq!(config.max_issues_per_repo, 10);
        assert_eq!(config.min_stars, 100);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: Config = toml::from_str("max_repos = 10").unwrap();
        assert_eq!(config.max_repos, 10);
        assert_eq!(config.max_issues_per_repo, 20);
        assert_eq!(config.skill_level, SkillLevel::Intermediate);
        assert_eq!(config.preferred_languages.len(), 4);
        assert_eq!(config.topic, "hacktoberfest");
    }

    #[test]
    fn missing_file_uses_default() {
        let config = Config::load_from(Path::new("/nonexistent/hacktober/config.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn broken_file_uses_default() {
        let path = std::env::temp_dir().join(format!("hacktober-broken-{}.toml", std::process::id()));
        std::fs::write(&path, "max_repos = [oops").unwrap();
        let config = Config::load_from(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("hacktober-cfg-{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut config = Config::default();
        config.preferred_languages = vec!["Rust".to_string()];
        config.min_stars = 3;

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path);
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn cli_overrides_file() {
        let mut config = Config::default();
        let cli = Cli {
            languages: vec!["Rust".to_string()],
            max_repos: Some(5),
            skill_level: Some(SkillLevel::Beginner),
            ..Cli::default()
        };
        config.apply_cli(&cli);
        assert_eq!(config.preferred_languages, vec!["Rust"]);
        assert_eq!(config.max_repos, 5);
        assert_eq!(config.skill_level, SkillLevel::Beginner);
        assert_eq!(config.min_stars, 20);
    }

    #[test]
    fn no_languages_clears_list() {
        let mut config = Config::default();
        let cli = Cli {
            no_languages: true,
            ..Cli::default()
        };
        config.apply_cli(&cli);
        assert!(config.preferred_languages.is_empty());
    }

    #[test]
    fn settings_clamp_zero_limits() {
        let config = Config {
            max_repos: 0,
            max_issues_per_repo: 0,
            ..Config::default()
        };
        let settings = Settings::new(config, "token".to_string());
        assert_eq!(settings.max_repos, 1);
        assert_eq!(settings.max_issues_per_repo, 1);
        let request = settings.search_request(2);
        assert_eq!(request.page, 2);
        assert_eq!(request.max_results, 1);
    }
}
