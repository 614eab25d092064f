use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::forge::Forge;
use crate::scoring::score_issue;
use crate::types::{IssueCollection, IssueSort, IssueState, RepoId};

/// Fetch the open issues of `repo`, score them and rank easiest first.
/// A single page of at most `min(max_issues, 100)` issues is requested.
pub async fn fetch_issues(
    forge: &dyn Forge,
    repo: &RepoId,
    max_issues: usize,
) -> Result<IssueCollection> {
    let started = Instant::now();
    let per_page = max_issues.clamp(1, 100) as u8;

    let page = forge
        .list_issues(repo, IssueState::Open, IssueSort::Updated, 1, per_page)
        .await?;
    if let Some(rate) = page.rate_limit {
        debug!(
            repo = %repo,
            rate_remaining = rate.remaining,
            rate_limit = rate.limit,
            "issue listing quota"
        );
    }

    let mut issues: Vec<_> = page
        .items
        .into_iter()
        .map(|mut issue| {
            issue.difficulty_score = score_issue(&issue);
            debug!(
                repo = %repo,
                number = issue.number,
                difficulty = issue.difficulty_score,
                labels = ?issue.labels,
                "scored issue"
            );
            issue
        })
        .collect();

    // Stable: equal difficulty keeps the upstream "recently updated" order
    issues.sort_by_key(|issue| issue.difficulty_score);

    let collection = IssueCollection::from_issues(issues);
    if collection.is_empty() {
        debug!(repo = %repo, "repository has no open issues");
    }
    info!(
        repo = %repo,
        returned = collection.len(),
        unique_labels = collection.label_counts.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "issue search completed"
    );

    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::fake::FakeForge;
    use crate::types::Issue;
    use chrono::Utc;

    fn issue(repo: &RepoId, number: u64, labels: &[&str], comments: u32) -> Issue {
        Issue {
            repo: repo.clone(),
            number,
            title: format!("Issue {}", number),
            author: "octocat".to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            comments,
            body: Some("body".to_string()),
            url: format!("https://github.com/{}/issues/{}", repo, number),
            created_at: Utc::now(),
            difficulty_score: 0,
        }
    }

    #[tokio::test]
    async fn scores_and_ranks_easiest_first() {
        let repo = RepoId::new("rust-lang", "rust");
        let forge = FakeForge::new().with_issues(
            &repo,
            vec![
                issue(&repo, 1, &["hard"], 5),
                issue(&repo, 2, &[], 5),
                issue(&repo, 3, &["good first issue"], 5),
                issue(&repo, 4, &[], 5),
            ],
        );

        let collection = fetch_issues(&forge, &repo, 20).await.unwrap();
        let order: Vec<(u64, u32)> = collection
            .issues
            .iter()
            .map(|i| (i.number, i.difficulty_score))
            .collect();
        assert_eq!(order, vec![(3, 20), (2, 50), (4, 50), (1, 80)]);
    }

    #[tokio::test]
    async fn builds_label_counts() {
        let repo = RepoId::new("owner", "repo");
        let forge = FakeForge::new().with_issues(
            &repo,
            vec![
                issue(&repo, 1, &["Bug", "Help Wanted"], 5),
                issue(&repo, 2, &["bug"], 5),
            ],
        );

        let collection = fetch_issues(&forge, &repo, 20).await.unwrap();
        assert_eq!(collection.label_counts.get("bug"), Some(&2));
        assert_eq!(collection.label_counts.get("help wanted"), Some(&1));
    }

    #[tokio::test]
    async fn requests_one_capped_page() {
        let repo = RepoId::new("owner", "repo");
        let forge = FakeForge::new();

        let collection = fetch_issues(&forge, &repo, 500).await.unwrap();
        assert!(collection.is_empty());
        assert_eq!(
            forge.recorded(),
            vec!["issues owner/repo page=1 per_page=100".to_string()]
        );
    }

    #[tokio::test]
    async fn propagates_transport_failure() {
        let repo = RepoId::new("owner", "repo");
        let forge = FakeForge::new().with_issues_error(&repo);

        assert!(fetch_issues(&forge, &repo, 20).await.is_err());
    }
}
