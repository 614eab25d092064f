use clap::Parser;

use crate::config::SkillLevel;

/// Find Hacktoberfest repositories and issues that match your skills
#[derive(Debug, Default, Parser)]
#[command(name = "hacktober", version, about)]
pub struct Cli {
    /// Preferred language (repeatable); replaces the configured list
    #[arg(short = 'l', long = "language", value_name = "LANG")]
    pub languages: Vec<String>,

    /// Search without any language filter
    #[arg(long, conflicts_with = "languages")]
    pub no_languages: bool,

    /// Maximum repositories per page
    #[arg(long, value_name = "N")]
    pub max_repos: Option<usize>,

    /// Maximum issues fetched per repository
    #[arg(long, value_name = "N")]
    pub max_issues: Option<usize>,

    /// Minimum star count
    #[arg(long, value_name = "N")]
    pub min_stars: Option<u32>,

    /// Repository topic to search for
    #[arg(long)]
    pub topic: Option<String>,

    #[arg(long, value_enum)]
    pub skill_level: Option<SkillLevel>,

    /// Write the merged configuration to the config file and exit
    #[arg(long)]
    pub save_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_languages() {
        let cli = Cli::parse_from(["hacktober", "-l", "Rust", "--language", "Go"]);
        assert_eq!(cli.languages, vec!["Rust".to_string(), "Go".to_string()]);
        assert!(!cli.no_languages);
    }

    #[test]
    fn parses_limits_and_skill_level() {
        let cli = Cli::parse_from([
            "hacktober",
            "--max-repos",
            "30",
            "--min-stars",
            "5",
            "--skill-level",
            "beginner",
        ]);
        assert_eq!(cli.max_repos, Some(30));
        assert_eq!(cli.min_stars, Some(5));
        assert_eq!(cli.skill_level, Some(SkillLevel::Beginner));
    }

    #[test]
    fn no_languages_conflicts_with_language() {
        let result = Cli::try_parse_from(["hacktober", "--no-languages", "-l", "Go"]);
        assert!(result.is_err());
    }
}
