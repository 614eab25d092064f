//! Repository search across preferred languages.
//!
//! One unfiltered count query gives the "~N total" estimate, then one paged
//! query per preferred language feeds an identity-keyed merge. The merged set
//! is ranked by relevance score and capped.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::forge::Forge;
use crate::scoring::score_repository;
use crate::types::{RepoSort, Repository};

/// GitHub caps search page size at 100
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub topic: String,
    pub min_stars: u32,
    pub languages: Vec<String>,
    pub max_results: usize,
    pub page: u32,
}

impl SearchRequest {
    /// Base query shared by the count query and every language pass
    pub fn base_query(&self) -> String {
        format!(
            "topic:{} stars:>={} archived:false",
            self.topic, self.min_stars
        )
    }

    pub fn language_query(&self, language: Option<&str>) -> String {
        match language {
            Some(lang) => format!("{} language:{}", self.base_query(), lang.to_lowercase()),
            None => self.base_query(),
        }
    }

    fn page_size(&self) -> u8 {
        self.max_results.clamp(1, MAX_PAGE_SIZE) as u8
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub repositories: Vec<Repository>,
    /// Approximate: comes from the unfiltered count query
    pub total_available_estimate: u64,
    /// Languages whose query failed and were skipped
    pub failed_languages: Vec<String>,
}

pub struct SearchAggregator<'a> {
    forge: &'a dyn Forge,
}

impl<'a> SearchAggregator<'a> {
    pub fn new(forge: &'a dyn Forge) -> Self {
        Self { forge }
    }

    /// Never fails: individual query failures are logged and skipped, and a
    /// search where nothing succeeds comes back empty.
    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        let started = Instant::now();
        info!(
            languages = ?request.languages,
            page = request.page,
            max_results = request.max_results,
            "starting repository search"
        );

        let total_available_estimate = self.global_count(request).await;

        let passes: Vec<Option<&str>> = if request.languages.is_empty() {
            vec![None]
        } else {
            request.languages.iter().map(|l| Some(l.as_str())).collect()
        };

        let mut seen: HashSet<String> = HashSet::new();
        let mut merged: Vec<Repository> = Vec::new();
        let mut failed_languages = Vec::new();

        for language in passes {
            let query = request.language_query(language);
            let page = match self
                .forge
                .search_repositories(&query, RepoSort::Stars, request.page, request.page_size())
                .await
            {
                Ok(page) => page,
                Err(err) => {
                    warn!(
                        language = language.unwrap_or("any"),
                        query = %query,
                        error = %err,
                        "language search failed, skipping"
                    );
                    failed_languages.push(language.unwrap_or_default().to_string());
                    continue;
                }
            };

            debug!(
                language = language.unwrap_or("any"),
                total_count = page.total_count.unwrap_or(0),
                returned = page.items.len(),
                rate_remaining = page.rate_limit.map(|r| r.remaining),
                "language search completed"
            );

            for repo in page.items {
                if repo.stars < request.min_stars {
                    continue;
                }
                if repo.archived {
                    debug!(repo = %repo.id, "skipping archived repository");
                    continue;
                }
                if !seen.insert(repo.id.key()) {
                    debug!(repo = %repo.id, "skipping duplicate repository");
                    continue;
                }
                let score = score_repository(&repo, &request.languages);
                merged.push(repo.scored(score));
            }

            if merged.len() >= request.max_results {
                info!(max_results = request.max_results, "reached result cap, stopping search");
                break;
            }
        }

        rank(&mut merged, request.max_results);

        info!(
            returned = merged.len(),
            total_available_estimate,
            failed = failed_languages.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "repository search completed"
        );

        SearchOutcome {
            repositories: merged,
            total_available_estimate,
            failed_languages,
        }
    }

    /// Page size 1 against the unfiltered query, only for the total count.
    /// A failure leaves the estimate at 0.
    async fn global_count(&self, request: &SearchRequest) -> u64 {
        let query = request.base_query();
        match self
            .forge
            .search_repositories(&query, RepoSort::Stars, 1, 1)
            .await
        {
            Ok(page) => {
                let total = page.total_count.unwrap_or(0);
                info!(query = %query, total, "global repository count");
                total
            }
            Err(err) => {
                warn!(query = %query, error = %err, "global repository count failed");
                0
            }
        }
    }
}

/// Stable sort by score descending, so ties keep merge order, then cap.
pub fn rank(repos: &mut Vec<Repository>, max_results: usize) {
    repos.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    repos.truncate(max_results);
}
