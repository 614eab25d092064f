use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use tracing::{debug, info};

use crate::error::{HacktoberError, Result};
use crate::forge::Forge;
use crate::retry::{with_retry, RetryConfig};
use crate::types::{
    Issue, IssueSort, IssueState, RateLimit, RepoId, RepoSort, Repository, SearchPage,
};

/// One search fans out into several requests within a second or two; the
/// quota is read once per burst.
const RATE_LIMIT_INTERVAL: Duration = Duration::from_secs(5);

pub struct GitHub {
    client: Octocrab,
    retry: RetryConfig,
    rate_check: Throttle,
}

/// Lets a call through at most once per interval
#[derive(Debug)]
struct Throttle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    fn ready_at(&self, now: Instant) -> bool {
        let Ok(mut last) = self.last.lock() else {
            return false;
        };
        match *last {
            Some(at) if now.saturating_duration_since(at) < self.interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub").finish_non_exhaustive()
    }
}

impl From<octocrab::Error> for HacktoberError {
    fn from(err: octocrab::Error) -> Self {
        let status = match &err {
            octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
            _ => None,
        };
        HacktoberError::Api {
            status,
            message: err.to_string(),
        }
    }
}

impl GitHub {
    pub fn new(token: String) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token)
            .build()
            .map_err(|e| HacktoberError::Auth(e.to_string()))?;

        Ok(Self {
            client,
            retry: RetryConfig::default(),
            rate_check: Throttle::new(RATE_LIMIT_INTERVAL),
        })
    }

    /// Best-effort quota snapshot. The rate limit endpoint does not count
    /// against the quota but is an extra round-trip, so it is throttled.
    async fn rate_limit(&self, search: bool) -> Option<RateLimit> {
        if !self.rate_check.ready_at(Instant::now()) {
            return None;
        }
        let limits = self.client.ratelimit().get().await.ok()?;
        let rate = if search {
            limits.resources.search
        } else {
            limits.resources.core
        };
        Some(RateLimit {
            limit: rate.limit as u64,
            remaining: rate.remaining as u64,
            reset: DateTime::from_timestamp(rate.reset as i64, 0).unwrap_or_else(Utc::now),
        })
    }
}

fn issue_state(state: IssueState) -> octocrab::params::State {
    match state {
        IssueState::Open => octocrab::params::State::Open,
    }
}

fn issue_sort(sort: IssueSort) -> octocrab::params::issues::Sort {
    match sort {
        IssueSort::Updated => octocrab::params::issues::Sort::Updated,
    }
}

#[async_trait]
impl Forge for GitHub {
    fn name(&self) -> &str {
        "GitHub"
    }

    async fn search_repositories(
        &self,
        query: &str,
        sort: RepoSort,
        page: u32,
        per_page: u8,
    ) -> Result<SearchPage<Repository>> {
        let started = Instant::now();
        let result = with_retry(&self.retry, || async move {
            self.client
                .search()
                .repositories(query)
                .sort(sort.as_api_str())
                .order("desc")
                .per_page(per_page)
                .page(page)
                .send()
                .await
                .map_err(HacktoberError::from)
        })
        .await?;

        let total_count = result.total_count;
        let items: Vec<Repository> = result
            .items
            .into_iter()
            .map(|repo| Repository {
                id: RepoId::new(
                    repo.owner
                        .map(|o| o.login)
                        .unwrap_or_else(|| "unknown".to_string()),
                    repo.name,
                ),
                description: repo.description,
                url: repo.html_url.map(|u| u.to_string()).unwrap_or_default(),
                stars: repo.stargazers_count.unwrap_or(0),
                language: repo
                    .language
                    .as_ref()
                    .and_then(|l| l.as_str())
                    .map(str::to_string),
                updated_at: repo.updated_at.unwrap_or_else(Utc::now),
                archived: repo.archived.unwrap_or(false),
                relevance_score: 0,
            })
            .collect();

        let rate_limit = self.rate_limit(true).await;
        info!(
            endpoint = "search/repositories",
            query,
            page,
            per_page,
            returned = items.len(),
            total_count = total_count.unwrap_or(0),
            elapsed_ms = started.elapsed().as_millis() as u64,
            rate_remaining = rate_limit.map(|r| r.remaining),
            rate_limit = rate_limit.map(|r| r.limit),
            rate_reset = ?rate_limit.map(|r| r.reset),
            "GitHub API request"
        );

        Ok(SearchPage {
            items,
            total_count,
            rate_limit,
        })
    }

    async fn list_issues(
        &self,
        repo: &RepoId,
        state: IssueState,
        sort: IssueSort,
        page: u32,
        per_page: u8,
    ) -> Result<SearchPage<Issue>> {
        let started = Instant::now();
        let result = with_retry(&self.retry, || async move {
            self.client
                .issues(&repo.owner, &repo.name)
                .list()
                .state(issue_state(state))
                .sort(issue_sort(sort))
                .direction(octocrab::params::Direction::Descending)
                .per_page(per_page)
                .page(page)
                .send()
                .await
                .map_err(HacktoberError::from)
        })
        .await?;

        let total_count = result.total_count;
        let fetched = result.items.len();
        let items: Vec<Issue> = result
            .items
            .into_iter()
            .filter(|i| i.pull_request.is_none()) // Filter out PRs
            .map(|issue| Issue {
                repo: repo.clone(),
                number: issue.number,
                title: issue.title,
                author: issue.user.login,
                labels: issue.labels.into_iter().map(|l| l.name).collect(),
                comments: issue.comments,
                body: issue.body,
                url: issue.html_url.to_string(),
                created_at: issue.created_at,
                difficulty_score: 0,
            })
            .collect();

        debug!(
            repo = %repo,
            fetched,
            pull_requests_skipped = fetched - items.len(),
            "filtered pull requests from issue listing"
        );

        let rate_limit = self.rate_limit(false).await;
        info!(
            endpoint = "issues/list",
            repo = %repo,
            page,
            per_page,
            returned = items.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            rate_remaining = rate_limit.map(|r| r.remaining),
            rate_limit = rate_limit.map(|r| r.limit),
            rate_reset = ?rate_limit.map(|r| r.reset),
            "GitHub API request"
        );

        Ok(SearchPage {
            items,
            total_count,
            rate_limit,
        })
    }
}
