use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::action::{Action, Command, LoadId};
use crate::aggregator::SearchAggregator;
use crate::config::Settings;
use crate::forge::Forge;
use crate::issues::fetch_issues;
use crate::paging::Direction;
use crate::types::RepoId;

/// Carries out the commands the state machine emits. Every fetch runs on its
/// own task and reports back with exactly one action on the channel.
pub struct CommandRunner {
    forge: Arc<dyn Forge>,
    settings: Arc<Settings>,
    action_tx: UnboundedSender<Action>,
}

impl CommandRunner {
    pub fn new(
        forge: Arc<dyn Forge>,
        settings: Arc<Settings>,
        action_tx: UnboundedSender<Action>,
    ) -> Self {
        Self {
            forge,
            settings,
            action_tx,
        }
    }

    pub fn dispatch(&self, command: Command) {
        match command {
            Command::SearchRepos {
                page,
                direction,
                load_id,
            } => self.spawn_search(page, direction, load_id),
            Command::FetchIssues { repo, load_id } => self.spawn_fetch_issues(repo, load_id),
            Command::OpenUrl(url) => self.spawn_open(url),
            Command::CopyToClipboard(text) => self.spawn_copy(text),
        }
    }

    fn spawn_search(&self, page: u32, direction: Direction, load_id: LoadId) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        let request = self.settings.search_request(page);
        tokio::spawn(async move {
            info!(load_id, page, forge = forge.name(), "repository search started");
            let outcome = SearchAggregator::new(forge.as_ref()).search(&request).await;
            tx.send(Action::ReposLoaded {
                outcome,
                page,
                direction,
                load_id,
            })
            .ok();
        });
    }

    fn spawn_fetch_issues(&self, repo: RepoId, load_id: LoadId) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        let max_issues = self.settings.max_issues_per_repo;
        tokio::spawn(async move {
            match fetch_issues(forge.as_ref(), &repo, max_issues).await {
                Ok(collection) => {
                    tx.send(Action::IssuesLoaded {
                        collection,
                        load_id,
                    })
                    .ok();
                }
                Err(e) => {
                    warn!(repo = %repo, load_id, error = %e, "issue fetch failed");
                    tx.send(Action::load_failed(e, load_id)).ok();
                }
            }
        });
    }

    fn spawn_open(&self, url: String) {
        let tx = self.action_tx.clone();
        tokio::task::spawn_blocking(move || {
            let notice = match open::that(&url) {
                Ok(()) => "Opened in browser".to_string(),
                Err(e) => {
                    warn!(url = %url, error = %e, "failed to open browser");
                    format!("Failed to open browser: {}", e)
                }
            };
            tx.send(Action::Notice(notice)).ok();
        });
    }

    fn spawn_copy(&self, text: String) {
        let tx = self.action_tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
            let notice = match result {
                Ok(()) => "Copied URL to clipboard".to_string(),
                Err(e) => {
                    warn!(error = %e, "clipboard unavailable");
                    format!("Failed to copy: {}", e)
                }
            };
            tx.send(Action::Notice(notice)).ok();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::forge::fake::FakeForge;
    use crate::types::{Issue, Repository};
    use chrono::Utc;
    use tokio::sync::mpsc;

    fn settings(languages: &[&str]) -> Arc<Settings> {
        let config = Config {
            preferred_languages: languages.iter().map(|l| l.to_string()).collect(),
            max_repos: 10,
            max_issues_per_repo: 5,
            ..Config::default()
        };
        Arc::new(Settings::new(config, "token".to_string()))
    }

    fn repo(name: &str, stars: u32) -> Repository {
        Repository {
            id: RepoId::new("owner", name),
            description: None,
            url: format!("https://github.com/owner/{}", name),
            stars,
            language: Some("Rust".to_string()),
            updated_at: Utc::now(),
            archived: false,
            relevance_score: 0,
        }
    }

    fn issue(repo: &RepoId, number: u64, labels: &[&str]) -> Issue {
        Issue {
            repo: repo.clone(),
            number,
            title: format!("Issue {}", number),
            author: "octocat".to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            comments: 5,
            body: None,
            url: format!("https://github.com/{}/issues/{}", repo, number),
            created_at: Utc::now(),
            difficulty_score: 0,
        }
    }

    #[tokio::test]
    async fn search_reports_one_completion_with_its_load_id() {
        let forge = FakeForge::new().with_search(
            "topic:hacktoberfest stars:>=20 archived:false language:rust",
            vec![repo("a", 500), repo("b", 50)],
            2,
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = CommandRunner::new(Arc::new(forge), settings(&["Rust"]), tx);

        runner.dispatch(Command::SearchRepos {
            page: 3,
            direction: Direction::Backward,
            load_id: 7,
        });

        match rx.recv().await {
            Some(Action::ReposLoaded {
                outcome,
                page,
                direction,
                load_id,
            }) => {
                assert_eq!(load_id, 7);
                assert_eq!(page, 3);
                assert_eq!(direction, Direction::Backward);
                assert_eq!(outcome.repositories.len(), 2);
                assert_eq!(outcome.repositories[0].id, RepoId::new("owner", "a"));
            }
            other => panic!("expected ReposLoaded, got {:?}", other),
        }
        drop(runner);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn issues_are_scored_and_delivered() {
        let target = RepoId::new("owner", "repo");
        let forge = FakeForge::new().with_issues(
            &target,
            vec![
                issue(&target, 1, &["hard"]),
                issue(&target, 2, &["good first issue"]),
            ],
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = CommandRunner::new(Arc::new(forge), settings(&[]), tx);

        runner.dispatch(Command::FetchIssues {
            repo: target.clone(),
            load_id: 2,
        });

        match rx.recv().await {
            Some(Action::IssuesLoaded {
                collection,
                load_id,
            }) => {
                assert_eq!(load_id, 2);
                let numbers: Vec<u64> = collection.issues.iter().map(|i| i.number).collect();
                assert_eq!(numbers, vec![2, 1]);
            }
            other => panic!("expected IssuesLoaded, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn issue_failure_becomes_load_failed() {
        let target = RepoId::new("owner", "broken");
        let forge = FakeForge::new().with_issues_error(&target);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = CommandRunner::new(Arc::new(forge), settings(&[]), tx);

        runner.dispatch(Command::FetchIssues {
            repo: target,
            load_id: 9,
        });

        match rx.recv().await {
            Some(Action::LoadFailed { message, load_id }) => {
                assert_eq!(load_id, 9);
                assert!(message.contains("issues unavailable"));
            }
            other => panic!("expected LoadFailed, got {:?}", other),
        }
    }
}
