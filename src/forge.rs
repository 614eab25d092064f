use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Issue, IssueSort, IssueState, RepoId, RepoSort, Repository, SearchPage};

/// The code-hosting API as seen by the explorer. Both calls are slow,
/// fallible and rate limited.
#[async_trait]
pub trait Forge: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Repository search. Returned repositories are unscored.
    async fn search_repositories(
        &self,
        query: &str,
        sort: RepoSort,
        page: u32,
        per_page: u8,
    ) -> Result<SearchPage<Repository>>;

    /// Issues of one repository, pull requests excluded. Returned issues are unscored.
    async fn list_issues(
        &self,
        repo: &RepoId,
        state: IssueState,
        sort: IssueSort,
        page: u32,
        per_page: u8,
    ) -> Result<SearchPage<Issue>>;
}
