use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, info, warn};

use crate::action::{Action, Command, LoadId};
use crate::config::Settings;
use crate::event::Event;
use crate::paging::{Direction, PagingCursor};
use crate::types::{Issue, IssueCollection, Repository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,     // Configuration summary, Enter starts the search
    Searching,   // First repository search in flight
    RepoList,    // Ranked repositories, paged
    IssueList,   // Issues of the selected repository, easiest first
    IssueDetail, // One issue
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadKind {
    Repos,
    Issues,
}

/// The one fetch the state machine is waiting for
#[derive(Debug, Clone, Copy)]
struct InFlight {
    load_id: LoadId,
    kind: LoadKind,
    /// Cursor page shown before the dispatch, restored on cancel and failure
    restore_page: u32,
    direction: Direction,
    /// Where cancelling returns to
    origin: Screen,
}

pub struct App {
    pub screen: Screen,

    // Repository list
    pub repos: Vec<Repository>,
    pub repo_index: usize,
    pub cursor: PagingCursor,

    // Issue list
    pub issues: IssueCollection,
    pub issue_index: usize,

    pub selected_repo: Option<Repository>,
    pub selected_issue: Option<Issue>,
    pub scroll_offset: usize,

    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub should_quit: bool,
    pub ticks: usize,

    pub settings: Arc<Settings>,
    pub log_path: Option<PathBuf>,
    in_flight: Option<InFlight>,
    next_load_id: LoadId,
    /// Page whose load failed, requested again by a retry
    failed_page: Option<(u32, Direction)>,
}

impl App {
    pub fn new(settings: Arc<Settings>, log_path: Option<PathBuf>) -> Self {
        Self {
            screen: Screen::Welcome,
            repos: Vec::new(),
            repo_index: 0,
            cursor: PagingCursor::new(settings.max_repos),
            issues: IssueCollection::default(),
            issue_index: 0,
            selected_repo: None,
            selected_issue: None,
            scroll_offset: 0,
            loading: false,
            error: None,
            notice: None,
            should_quit: false,
            ticks: 0,
            settings,
            log_path,
            in_flight: None,
            next_load_id: 0,
            failed_page: None,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    /// Advance the loading spinner
    pub fn tick(&mut self) {
        if self.loading {
            self.ticks = self.ticks.wrapping_add(1);
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.screen == Screen::Welcome && !self.loading {
                    Action::Quit
                } else {
                    Action::Back
                }
            }
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Char('l') | KeyCode::Right => Action::NextPage,
            KeyCode::Char('h') | KeyCode::Left => Action::PrevPage,
            KeyCode::Enter => Action::Confirm,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('y') => Action::YankUrl,
            _ => Action::None,
        }
    }

    /// Apply one action. Returns the side effect to run, if any.
    pub fn update(&mut self, action: Action) -> Option<Command> {
        if self.loading && !Self::allowed_while_loading(&action) {
            return None;
        }
        if self.error.is_some() && Self::is_navigation(&action) {
            // Error overlays only offer back and retry
            return None;
        }
        if !matches!(action, Action::Notice(_) | Action::None) {
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::Back => {
                if self.loading {
                    self.cancel_load();
                } else {
                    self.back();
                }
                None
            }
            Action::ScrollUp => {
                match self.screen {
                    Screen::RepoList => self.repo_index = self.repo_index.saturating_sub(1),
                    Screen::IssueList => self.issue_index = self.issue_index.saturating_sub(1),
                    Screen::IssueDetail => self.scroll_offset = self.scroll_offset.saturating_sub(1),
                    Screen::Welcome | Screen::Searching => {}
                }
                None
            }
            Action::ScrollDown => {
                match self.screen {
                    Screen::RepoList => {
                        if self.repo_index + 1 < self.repos.len() {
                            self.repo_index += 1;
                        }
                    }
                    Screen::IssueList => {
                        if self.issue_index + 1 < self.issues.len() {
                            self.issue_index += 1;
                        }
                    }
                    Screen::IssueDetail => self.scroll_offset += 1,
                    Screen::Welcome | Screen::Searching => {}
                }
                None
            }
            Action::GoToTop => {
                match self.screen {
                    Screen::RepoList => self.repo_index = 0,
                    Screen::IssueList => self.issue_index = 0,
                    Screen::IssueDetail => self.scroll_offset = 0,
                    Screen::Welcome | Screen::Searching => {}
                }
                None
            }
            Action::GoToBottom => {
                match self.screen {
                    Screen::RepoList => self.repo_index = self.repos.len().saturating_sub(1),
                    Screen::IssueList => self.issue_index = self.issues.len().saturating_sub(1),
                    Screen::Welcome | Screen::Searching | Screen::IssueDetail => {}
                }
                None
            }
            Action::Confirm => self.confirm(),
            Action::NextPage => {
                if self.screen != Screen::RepoList {
                    return None;
                }
                let shown = self.cursor.current_page();
                if !self.cursor.advance() {
                    return None;
                }
                Some(self.dispatch_repos(Direction::Forward, shown, Screen::RepoList))
            }
            Action::PrevPage => {
                if self.screen != Screen::RepoList {
                    return None;
                }
                let shown = self.cursor.current_page();
                if !self.cursor.retreat() {
                    return None;
                }
                Some(self.dispatch_repos(Direction::Backward, shown, Screen::RepoList))
            }
            Action::Refresh => match self.screen {
                Screen::RepoList => {
                    let shown = self.cursor.current_page();
                    let (page, direction) =
                        self.failed_page.take().unwrap_or((shown, Direction::Forward));
                    self.cursor.restore(page);
                    Some(self.dispatch_repos(direction, shown, Screen::RepoList))
                }
                Screen::IssueList => self.dispatch_issues(Screen::IssueList),
                Screen::Welcome | Screen::Searching | Screen::IssueDetail => None,
            },
            Action::OpenInBrowser => self.detail_url().map(Command::OpenUrl),
            Action::YankUrl => self.detail_url().map(Command::CopyToClipboard),

            Action::ReposLoaded {
                outcome,
                page,
                direction,
                load_id,
            } => {
                self.accept(load_id)?;
                self.cursor.record_fetch(
                    page,
                    outcome.repositories.len(),
                    outcome.total_available_estimate,
                );
                if !outcome.failed_languages.is_empty() {
                    warn!(
                        page,
                        failed_languages = ?outcome.failed_languages,
                        "showing partial results"
                    );
                }
                self.repos = outcome.repositories;
                self.repo_index = direction.focus_index(self.repos.len());
                self.failed_page = None;
                self.error = None;
                self.screen = Screen::RepoList;
                info!(
                    page,
                    returned = self.repos.len(),
                    total_estimate = self.cursor.total_estimate(),
                    has_more = self.cursor.has_more_pages(),
                    "repositories loaded"
                );
                None
            }
            Action::IssuesLoaded {
                collection,
                load_id,
            } => {
                self.accept(load_id)?;
                self.issues = collection;
                self.issue_index = 0;
                self.error = None;
                self.screen = Screen::IssueList;
                None
            }
            Action::LoadFailed { message, load_id } => {
                let in_flight = self.accept(load_id)?;
                if in_flight.kind == LoadKind::Repos {
                    if self.screen == Screen::Searching {
                        // The error is an overlay on the list screen, not a screen of its own
                        self.screen = Screen::RepoList;
                    }
                    // The rows on screen still belong to the page shown before the request
                    self.failed_page = Some((self.cursor.current_page(), in_flight.direction));
                    self.cursor.restore(in_flight.restore_page);
                }
                self.error = Some(message);
                None
            }
            Action::Notice(message) => {
                self.notice = Some(message);
                None
            }
            Action::None => None,
        }
    }

    fn allowed_while_loading(action: &Action) -> bool {
        matches!(
            action,
            Action::Quit
                | Action::Back
                | Action::ReposLoaded { .. }
                | Action::IssuesLoaded { .. }
                | Action::LoadFailed { .. }
                | Action::Notice(_)
                | Action::None
        )
    }

    fn is_navigation(action: &Action) -> bool {
        matches!(
            action,
            Action::ScrollUp
                | Action::ScrollDown
                | Action::GoToTop
                | Action::GoToBottom
                | Action::Confirm
                | Action::NextPage
                | Action::PrevPage
                | Action::OpenInBrowser
                | Action::YankUrl
        )
    }

    fn confirm(&mut self) -> Option<Command> {
        match self.screen {
            Screen::Welcome => {
                self.screen = Screen::Searching;
                let shown = self.cursor.current_page();
                Some(self.dispatch_repos(Direction::Forward, shown, Screen::Welcome))
            }
            Screen::RepoList => {
                let repo = self.repos.get(self.repo_index)?.clone();
                self.selected_repo = Some(repo);
                self.issues = IssueCollection::default();
                self.issue_index = 0;
                self.screen = Screen::IssueList;
                self.dispatch_issues(Screen::RepoList)
            }
            Screen::IssueList => {
                let issue = self.issues.issues.get(self.issue_index)?.clone();
                self.selected_issue = Some(issue);
                self.scroll_offset = 0;
                self.screen = Screen::IssueDetail;
                None
            }
            Screen::Searching | Screen::IssueDetail => None,
        }
    }

    fn back(&mut self) {
        self.error = None;
        self.failed_page = None;
        match self.screen {
            Screen::Welcome => {
                self.should_quit = true;
            }
            Screen::Searching => {
                self.screen = Screen::Welcome;
            }
            Screen::RepoList => {
                self.screen = Screen::Welcome;
                self.repos.clear();
                self.repo_index = 0;
                self.cursor.reset();
            }
            Screen::IssueList => {
                self.screen = Screen::RepoList;
                self.issues = IssueCollection::default();
                self.issue_index = 0;
                self.selected_repo = None;
            }
            Screen::IssueDetail => {
                self.screen = Screen::IssueList;
                self.selected_issue = None;
                self.scroll_offset = 0;
            }
        }
    }

    /// Abandon the in-flight fetch. Its completion, if it ever arrives, is dropped.
    fn cancel_load(&mut self) {
        self.loading = false;
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };
        info!(load_id = in_flight.load_id, "fetch cancelled");
        self.cursor.restore(in_flight.restore_page);
        if in_flight.origin != self.screen {
            if in_flight.kind == LoadKind::Issues {
                self.selected_repo = None;
                self.issues = IssueCollection::default();
            }
            self.screen = in_flight.origin;
        }
    }

    fn dispatch_repos(&mut self, direction: Direction, restore_page: u32, origin: Screen) -> Command {
        let load_id = self.begin_load(LoadKind::Repos, restore_page, direction, origin);
        Command::SearchRepos {
            page: self.cursor.current_page(),
            direction,
            load_id,
        }
    }

    fn dispatch_issues(&mut self, origin: Screen) -> Option<Command> {
        let repo = self.selected_repo.as_ref()?.id.clone();
        let page = self.cursor.current_page();
        let load_id = self.begin_load(LoadKind::Issues, page, Direction::Forward, origin);
        Some(Command::FetchIssues { repo, load_id })
    }

    fn begin_load(
        &mut self,
        kind: LoadKind,
        restore_page: u32,
        direction: Direction,
        origin: Screen,
    ) -> LoadId {
        self.next_load_id += 1;
        let load_id = self.next_load_id;
        self.in_flight = Some(InFlight {
            load_id,
            kind,
            restore_page,
            direction,
            origin,
        });
        self.loading = true;
        self.error = None;
        load_id
    }

    /// Match a completion against the in-flight fetch. Stale completions
    /// (cancelled or superseded fetches) yield `None` and are dropped.
    fn accept(&mut self, load_id: LoadId) -> Option<InFlight> {
        match self.in_flight {
            Some(in_flight) if in_flight.load_id == load_id => {
                self.in_flight = None;
                self.loading = false;
                Some(in_flight)
            }
            _ => {
                debug!(load_id, "dropping stale completion");
                None
            }
        }
    }

    fn detail_url(&self) -> Option<String> {
        if self.screen != Screen::IssueDetail {
            return None;
        }
        self.selected_issue.as_ref().map(|issue| issue.url.clone())
    }
}
