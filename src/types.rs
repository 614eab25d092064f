use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

/// Sort order for repository search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSort {
    Stars,
}

impl RepoSort {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            RepoSort::Stars => "stars",
        }
    }
}

/// Which issues to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
}

/// Listing order for issues, newest activity first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSort {
    Updated,
}

/// Identity of a repository. Comparison goes through `key()`, which ignores case.
#[derive(Debug, Clone)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Case-insensitive dedup key
    pub fn key(&self) -> String {
        format!("{}/{}", self.owner, self.name).to_lowercase()
    }
}

impl PartialEq for RepoId {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for RepoId {}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone)]
pub struct Repository {
    pub id: RepoId,
    pub description: Option<String>,
    pub url: String,
    pub stars: u32,
    pub language: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub archived: bool,
    pub relevance_score: u32,
}

impl Repository {
    /// Attach the relevance score. Called once by the aggregator.
    pub fn scored(mut self, score: u32) -> Self {
        self.relevance_score = score;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Issue {
    pub repo: RepoId,
    pub number: u64,
    pub title: String,
    pub author: String,
    pub labels: Vec<String>,
    pub comments: u32,
    pub body: Option<String>,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub difficulty_score: u32,
}

impl Issue {
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_score(self.difficulty_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=30 => Difficulty::Easy,
            31..=60 => Difficulty::Medium,
            61..=80 => Difficulty::Hard,
            _ => Difficulty::Expert,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        };
        f.pad(tag)
    }
}

/// All fetched issues of one repository. Always rebuilt from scratch.
#[derive(Debug, Clone, Default)]
pub struct IssueCollection {
    pub issues: Vec<Issue>,
    pub label_counts: HashMap<String, usize>,
}

impl IssueCollection {
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        let mut label_counts = HashMap::new();
        for issue in &issues {
            for label in &issue.labels {
                *label_counts.entry(label.to_lowercase()).or_insert(0) += 1;
            }
        }
        Self {
            issues,
            label_counts,
        }
    }

    /// Labels by count descending, name ascending on ties
    pub fn top_labels(&self, n: usize) -> Vec<(&str, usize)> {
        let mut labels: Vec<(&str, usize)> = self
            .label_counts
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        labels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        labels.truncate(n);
        labels
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }
}

/// Snapshot of the upstream API quota
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: DateTime<Utc>,
}

/// One page of an upstream listing
#[derive(Debug, Clone)]
pub struct SearchPage<T> {
    pub items: Vec<T>,
    pub total_count: Option<u64>,
    pub rate_limit: Option<RateLimit>,
}

#[cfg(test)]
impl<T> SearchPage<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            total_count: None,
            rate_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(labels: &[&str]) -> Issue {
        Issue {
            repo: RepoId::new("owner", "repo"),
            number: 1,
            title: "t".to_string(),
            author: "a".to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            comments: 0,
            body: None,
            url: String::new(),
            created_at: Utc::now(),
            difficulty_score: 50,
        }
    }

    #[test]
    fn repo_id_ignores_case() {
        assert_eq!(RepoId::new("OwnerA", "RepoX"), RepoId::new("ownera", "repox"));
        assert_eq!(RepoId::new("OwnerA", "RepoX").key(), "ownera/repox");
        assert_ne!(RepoId::new("owner", "a"), RepoId::new("owner", "b"));
    }

    #[test]
    fn difficulty_boundaries() {
        assert_eq!(Difficulty::from_score(10), Difficulty::Easy);
        assert_eq!(Difficulty::from_score(30), Difficulty::Easy);
        assert_eq!(Difficulty::from_score(31), Difficulty::Medium);
        assert_eq!(Difficulty::from_score(60), Difficulty::Medium);
        assert_eq!(Difficulty::from_score(80), Difficulty::Hard);
        assert_eq!(Difficulty::from_score(81), Difficulty::Expert);
    }

    #[test]
    fn label_counts_are_lowercased() {
        let collection = IssueCollection::from_issues(vec![
            issue(&["Bug", "good first issue"]),
            issue(&["bug"]),
            issue(&[]),
        ]);
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.label_counts.get("bug"), Some(&2));
        assert_eq!(collection.label_counts.get("good first issue"), Some(&1));
        assert_eq!(collection.label_counts.len(), 2);
    }

    #[test]
    fn top_labels_orders_by_count_then_name() {
        let collection = IssueCollection::from_issues(vec![
            issue(&["docs", "bug"]),
            issue(&["bug", "api"]),
            issue(&["zeta"]),
        ]);
        let top = collection.top_labels(3);
        assert_eq!(top, vec![("bug", 2), ("api", 1), ("docs", 1)]);
    }
}
