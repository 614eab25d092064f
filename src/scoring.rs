//! Relevance and difficulty heuristics.
//!
//! Both scores are pure functions of their inputs. The repository score takes
//! the reference time explicitly so callers (and tests) control "now".

use chrono::{DateTime, Duration, Utc};

use crate::types::{Issue, Repository};

const RECENT_WINDOW_DAYS: i64 = 30;

/// `min(100, stars / 10)` + 20 if updated in the last 30 days + 50 if the
/// language matches a preferred one. The sum is not capped.
pub fn score_repository(repo: &Repository, preferred_languages: &[String]) -> u32 {
    score_repository_at(repo, preferred_languages, Utc::now())
}

pub fn score_repository_at(
    repo: &Repository,
    preferred_languages: &[String],
    now: DateTime<Utc>,
) -> u32 {
    let mut score = (repo.stars / 10).min(100);

    if repo.updated_at > now - Duration::days(RECENT_WINDOW_DAYS) {
        score += 20;
    }

    if let Some(language) = &repo.language {
        if preferred_languages
            .iter()
            .any(|preferred| preferred.eq_ignore_ascii_case(language))
        {
            score += 50;
        }
    }

    score
}

/// Start at 50 and let each label move the score. Per label only the first
/// matching rule applies; across labels the rules apply in label order, so an
/// "easy" label followed by a "hard" one ends at 80.
pub fn score_issue(issue: &Issue) -> u32 {
    let mut score: i32 = 50;

    for label in &issue.labels {
        let label = label.to_lowercase();
        if contains_any(&label, &["good first issue", "beginner", "easy"]) {
            score = 20;
        } else if label.contains("help wanted") {
            score = score.min(40);
        } else if contains_any(&label, &["hard", "difficult", "expert"]) {
            score = 80;
        } else if label.contains("bug") {
            score += 10;
        } else if label.contains("feature") {
            score += 5;
        }
    }

    if issue.comments > 10 {
        score += 15;
    } else if issue.comments < 3 {
        score -= 10;
    }

    score.clamp(10, 100) as u32
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RepoId;

    fn repo(stars: u32, language: Option<&str>, updated_at: DateTime<Utc>) -> Repository {
        Repository {
            id: RepoId::new("owner", "repo"),
            description: None,
            url: String::new(),
            stars,
            language: language.map(str::to_string),
            updated_at,
            archived: false,
            relevance_score: 0,
        }
    }

    fn issue(labels: &[&str], comments: u32) -> Issue {
        Issue {
            repo: RepoId::new("owner", "repo"),
            number: 7,
            title: "Fix the thing".to_string(),
            author: "octocat".to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            comments,
            body: None,
            url: String::new(),
            created_at: Utc::now(),
            difficulty_score: 0,
        }
    }

    fn langs(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn zero_star_recent_preferred_repo_scores_70() {
        let now = Utc::now();
        let r = repo(0, Some("Rust"), now);
        assert_eq!(score_repository_at(&r, &langs(&["Go", "Rust"]), now), 70);
    }

    #[test]
    fn star_component_is_capped_at_100() {
        let now = Utc::now();
        let old = now - Duration::days(90);
        assert_eq!(score_repository_at(&repo(59, None, old), &[], now), 5);
        assert_eq!(score_repository_at(&repo(5_000, None, old), &[], now), 100);
    }

    #[test]
    fn total_score_is_not_capped() {
        let now = Utc::now();
        let r = repo(50_000, Some("go"), now);
        assert_eq!(score_repository_at(&r, &langs(&["Go"]), now), 170);
    }

    #[test]
    fn language_match_ignores_case_and_does_not_stack() {
        let now = Utc::now();
        let old = now - Duration::days(31);
        let r = repo(100, Some("TypeScript"), old);
        let preferred = langs(&["typescript", "TYPESCRIPT"]);
        assert_eq!(score_repository_at(&r, &preferred, now), 60);
    }

    #[test]
    fn stale_repo_gets_no_recency_bonus() {
        let now = Utc::now();
        let r = repo(200, Some("Python"), now - Duration::days(45));
        assert_eq!(score_repository_at(&r, &langs(&["Go"]), now), 20);
    }

    #[test]
    fn unlabelled_issue_with_moderate_discussion_scores_50() {
        assert_eq!(score_issue(&issue(&[], 5)), 50);
    }

    #[test]
    fn good_first_bug_with_few_comments_scores_20() {
        assert_eq!(score_issue(&issue(&["good first issue", "bug"], 1)), 20);
    }

    #[test]
    fn label_order_decides_between_overwrites() {
        assert_eq!(score_issue(&issue(&["easy", "hard"], 5)), 80);
        assert_eq!(score_issue(&issue(&["hard", "easy"], 5)), 20);
    }

    #[test]
    fn first_matching_rule_wins_within_a_label() {
        // "easy bug" only triggers the beginner rule
        assert_eq!(score_issue(&issue(&["Easy Bug"], 5)), 20);
    }

    #[test]
    fn help_wanted_lowers_but_never_raises() {
        assert_eq!(score_issue(&issue(&["help wanted"], 5)), 40);
        assert_eq!(score_issue(&issue(&["beginner", "help wanted"], 5)), 20);
    }

    #[test]
    fn additive_labels_and_busy_threads() {
        assert_eq!(score_issue(&issue(&["bug", "feature request"], 11)), 80);
        assert_eq!(score_issue(&issue(&["expert", "bug", "bug-report"], 20)), 100);
    }

    #[test]
    fn score_is_clamped_to_range() {
        assert_eq!(score_issue(&issue(&["beginner"], 0)), 10);
        assert_eq!(score_issue(&issue(&["difficult", "bug", "bug", "bug"], 50)), 100);
    }
}
