use crate::config::Config;
use crate::error::{HacktoberError, Result};

const TOKEN_ENV: &str = "GITHUB_TOKEN";
const TOKEN_COMMAND: &str = "gh auth token";

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

fn non_empty(token: Option<String>) -> Option<String> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Find a GitHub token, trying in order:
/// 1. `GITHUB_TOKEN`
/// 2. `github_token` from the config file
/// 3. `gh auth token`
pub fn resolve_token(config: &Config) -> Result<String> {
    resolve_token_from(
        std::env::var(TOKEN_ENV).ok(),
        config,
        || try_cli_token(TOKEN_COMMAND),
    )
}

fn resolve_token_from(
    env_token: Option<String>,
    config: &Config,
    cli_token: impl FnOnce() -> Option<String>,
) -> Result<String> {
    if let Some(token) = non_empty(env_token) {
        tracing::debug!(source = "env", "using GitHub token");
        return Ok(token);
    }

    if let Some(token) = non_empty(config.github_token.clone()) {
        tracing::debug!(source = "config", "using GitHub token");
        return Ok(token);
    }

    if let Some(token) = cli_token() {
        tracing::debug!(source = "gh", "using GitHub token");
        return Ok(token);
    }

    Err(HacktoberError::Auth(format!(
        "No GitHub token found. Set {}, add github_token to the config file, or log in with `gh auth login`.",
        TOKEN_ENV
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(token: Option<&str>) -> Config {
        Config {
            github_token: token.map(str::to_string),
            ..Config::default()
        }
    }

    #[test]
    fn env_wins() {
        let token = resolve_token_from(
            Some("from-env".to_string()),
            &config_with(Some("from-config")),
            || Some("from-gh".to_string()),
        )
        .unwrap();
        assert_eq!(token, "from-env");
    }

    #[test]
    fn blank_env_falls_through_to_config() {
        let token = resolve_token_from(
            Some("  ".to_string()),
            &config_with(Some("from-config")),
            || None,
        )
        .unwrap();
        assert_eq!(token, "from-config");
    }

    #[test]
    fn gh_cli_is_last_resort() {
        let token =
            resolve_token_from(None, &config_with(None), || Some("from-gh".to_string())).unwrap();
        assert_eq!(token, "from-gh");
    }

    #[test]
    fn missing_token_is_an_auth_error() {
        let err = resolve_token_from(None, &config_with(None), || None).unwrap_err();
        assert!(matches!(err, HacktoberError::Auth(_)));
    }
}
