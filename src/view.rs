use chrono::{DateTime, Utc};

use crate::app::{App, Screen};
use crate::types::{Difficulty, Issue, IssueCollection, Repository};

const LABELS_PER_ROW: usize = 3;
const LABEL_SUMMARY_LEN: usize = 10;
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Everything the presentation layer needs for one frame. Built from the
/// state machine, never mutated by the renderer.
#[derive(Debug, Clone)]
pub struct ViewModel {
    pub title: String,
    pub screen: ScreenView,
    pub loading: Option<String>,
    pub spinner: char,
    pub error: Option<ErrorView>,
    pub notice: Option<String>,
    pub help: &'static str,
}

#[derive(Debug, Clone)]
pub struct ErrorView {
    pub message: String,
    pub log_path: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ScreenView {
    Welcome(WelcomeView),
    Searching(WelcomeView),
    RepoList(RepoListView),
    IssueList(IssueListView),
    IssueDetail(IssueDetailView),
}

#[derive(Debug, Clone)]
pub struct WelcomeView {
    pub topic: String,
    pub languages: String,
    pub skill_level: String,
    pub min_stars: u32,
    pub max_repos: usize,
    pub max_issues: usize,
}

#[derive(Debug, Clone)]
pub struct RepoListView {
    pub items: Vec<RepoRow>,
    pub selected: usize,
    pub page_label: String,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepoRow {
    pub rank: usize,
    pub full_name: String,
    pub stars: u32,
    pub language: String,
    pub score: u32,
    pub description: String,
    pub updated: String,
}

#[derive(Debug, Clone)]
pub struct IssueListView {
    pub repo: String,
    pub items: Vec<IssueRow>,
    pub selected: usize,
    pub labels: Vec<String>,
    pub more_labels: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueRow {
    pub number: u64,
    pub title: String,
    pub difficulty: Difficulty,
    pub score: u32,
    pub comments: u32,
    pub labels: Vec<String>,
    pub created: String,
}

#[derive(Debug, Clone)]
pub struct IssueDetailView {
    pub repo: String,
    pub number: u64,
    pub title: String,
    pub author: String,
    pub difficulty: Difficulty,
    pub score: u32,
    pub comments: u32,
    pub labels: Vec<String>,
    pub created: String,
    pub url: String,
    pub body: String,
    pub scroll: usize,
}

impl ViewModel {
    pub fn from_app(app: &App) -> Self {
        Self::at(app, Utc::now())
    }

    fn at(app: &App, now: DateTime<Utc>) -> Self {
        let screen = match app.screen {
            Screen::Welcome => ScreenView::Welcome(welcome(app)),
            Screen::Searching => ScreenView::Searching(welcome(app)),
            Screen::RepoList => ScreenView::RepoList(repo_list(app, now)),
            Screen::IssueList => ScreenView::IssueList(issue_list(app, now)),
            Screen::IssueDetail => match &app.selected_issue {
                Some(issue) => ScreenView::IssueDetail(issue_detail(issue, app.scroll_offset, now)),
                None => ScreenView::IssueList(issue_list(app, now)),
            },
        };

        let loading = app.loading.then(|| match app.screen {
            Screen::IssueList => "Loading issues...".to_string(),
            _ => format!("Searching page {}...", app.cursor.current_page()),
        });

        let error = app.error.as_ref().map(|message| ErrorView {
            message: message.clone(),
            log_path: app.log_path.as_ref().map(|p| p.display().to_string()),
        });

        Self {
            title: title(app),
            screen,
            loading,
            spinner: SPINNER[app.ticks % SPINNER.len()],
            error,
            notice: app.notice.clone(),
            help: help(app),
        }
    }
}

fn title(app: &App) -> String {
    match app.screen {
        Screen::Welcome | Screen::Searching => "hacktober".to_string(),
        Screen::RepoList => format!("hacktober - #{} repositories", app.settings.topic),
        Screen::IssueList => match &app.selected_repo {
            Some(repo) => format!("hacktober - {}", repo.id),
            None => "hacktober - Issues".to_string(),
        },
        Screen::IssueDetail => match &app.selected_issue {
            Some(issue) => format!("hacktober - {}#{}", issue.repo, issue.number),
            None => "hacktober - Issue".to_string(),
        },
    }
}

fn help(app: &App) -> &'static str {
    if app.error.is_some() {
        return "Esc: back | r: retry | Ctrl+C: quit";
    }
    if app.loading {
        return "Esc: cancel | Ctrl+C: quit";
    }
    match app.screen {
        Screen::Welcome => "Enter: search | q: quit",
        Screen::Searching => "Esc: cancel",
        Screen::RepoList => "j/k/g/G: nav | h/l: page | Enter: issues | r: refresh | q: back",
        Screen::IssueList => "j/k/g/G: nav | Enter: details | r: refresh | q: back",
        Screen::IssueDetail => "j/k: scroll | o: open in browser | y: copy URL | q: back",
    }
}

fn welcome(app: &App) -> WelcomeView {
    let settings = &app.settings;
    let languages = if settings.preferred_languages.is_empty() {
        "any".to_string()
    } else {
        settings.preferred_languages.join(", ")
    };
    WelcomeView {
        topic: settings.topic.clone(),
        languages,
        skill_level: settings.skill_level.to_string(),
        min_stars: settings.min_stars,
        max_repos: settings.max_repos,
        max_issues: settings.max_issues_per_repo,
    }
}

fn repo_list(app: &App, now: DateTime<Utc>) -> RepoListView {
    let cursor = &app.cursor;
    let offset = (cursor.current_page().saturating_sub(1) as usize) * cursor.page_size();
    let items = app
        .repos
        .iter()
        .enumerate()
        .map(|(i, repo)| repo_row(offset + i + 1, repo, now))
        .collect();

    RepoListView {
        items,
        selected: app.repo_index,
        page_label: format!(
            "Page {} of {} (~{} repositories)",
            cursor.current_page(),
            cursor.total_pages(),
            cursor.total_estimate()
        ),
        has_prev: cursor.current_page() > 1,
        has_next: cursor.has_more_pages(),
    }
}

fn repo_row(rank: usize, repo: &Repository, now: DateTime<Utc>) -> RepoRow {
    RepoRow {
        rank,
        full_name: repo.id.to_string(),
        stars: repo.stars,
        language: repo.language.clone().unwrap_or_else(|| "-".to_string()),
        score: repo.relevance_score,
        description: repo.description.clone().unwrap_or_default(),
        updated: relative_time(repo.updated_at, now),
    }
}

fn issue_list(app: &App, now: DateTime<Utc>) -> IssueListView {
    let (labels, more_labels) = label_summary(&app.issues);
    IssueListView {
        repo: app
            .selected_repo
            .as_ref()
            .map(|r| r.id.to_string())
            .unwrap_or_default(),
        items: app
            .issues
            .issues
            .iter()
            .map(|issue| issue_row(issue, now))
            .collect(),
        selected: app.issue_index,
        labels,
        more_labels,
    }
}

fn label_summary(issues: &IssueCollection) -> (Vec<String>, usize) {
    let labels = issues
        .top_labels(LABEL_SUMMARY_LEN)
        .into_iter()
        .map(|(name, count)| format!("{} ({})", name, count))
        .collect();
    let more = issues.label_counts.len().saturating_sub(LABEL_SUMMARY_LEN);
    (labels, more)
}

fn issue_row(issue: &Issue, now: DateTime<Utc>) -> IssueRow {
    IssueRow {
        number: issue.number,
        title: issue.title.clone(),
        difficulty: issue.difficulty(),
        score: issue.difficulty_score,
        comments: issue.comments,
        labels: issue.labels.iter().take(LABELS_PER_ROW).cloned().collect(),
        created: relative_time(issue.created_at, now),
    }
}

fn issue_detail(issue: &Issue, scroll: usize, now: DateTime<Utc>) -> IssueDetailView {
    let body = match issue.body.as_deref().map(str::trim) {
        Some(body) if !body.is_empty() => body.to_string(),
        _ => "No description provided.".to_string(),
    };
    IssueDetailView {
        repo: issue.repo.to_string(),
        number: issue.number,
        title: issue.title.clone(),
        author: issue.author.clone(),
        difficulty: issue.difficulty(),
        score: issue.difficulty_score,
        comments: issue.comments,
        labels: issue.labels.clone(),
        created: relative_time(issue.created_at, now),
        url: issue.url.clone(),
        body,
        scroll,
    }
}

/// "just now", "5 minutes ago", "3 days ago", ...
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let (n, unit) = if elapsed.num_minutes() < 1 {
        return "just now".to_string();
    } else if elapsed.num_hours() < 1 {
        (elapsed.num_minutes(), "minute")
    } else if elapsed.num_days() < 1 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_days() < 30 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_days() < 365 {
        (elapsed.num_days() / 30, "month")
    } else {
        (elapsed.num_days() / 365, "year")
    };
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Cut to `max` characters, ending in "..." when shortened
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
