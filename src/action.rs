use crate::aggregator::SearchOutcome;
use crate::error::HacktoberError;
use crate::paging::Direction;
use crate::types::{IssueCollection, RepoId};

/// Identifies one dispatched fetch so stale completions can be recognised
pub type LoadId = u64;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    GoToTop,
    GoToBottom,
    Confirm,
    NextPage,
    PrevPage,
    Refresh,
    OpenInBrowser,
    YankUrl,

    // Completions
    ReposLoaded {
        outcome: SearchOutcome,
        page: u32,
        direction: Direction,
        load_id: LoadId,
    },
    IssuesLoaded {
        collection: IssueCollection,
        load_id: LoadId,
    },
    LoadFailed {
        message: String,
        load_id: LoadId,
    },

    /// Outcome of a non-fetch side effect (browser, clipboard)
    Notice(String),
    None,
}

impl Action {
    pub fn load_failed(err: HacktoberError, load_id: LoadId) -> Self {
        Action::LoadFailed {
            message: err.to_string(),
            load_id,
        }
    }
}

/// Side effects requested by the state machine, carried out by the runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SearchRepos {
        page: u32,
        direction: Direction,
        load_id: LoadId,
    },
    FetchIssues {
        repo: RepoId,
        load_id: LoadId,
    },
    OpenUrl(String),
    CopyToClipboard(String),
}
