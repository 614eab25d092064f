mod issue_detail;
mod issue_list;
mod popup;
mod repo_list;
mod welcome;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::types::Difficulty;
use crate::view::{ScreenView, ViewModel};

pub fn render(frame: &mut Frame, view: &ViewModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);

    match &view.screen {
        ScreenView::Welcome(w) | ScreenView::Searching(w) => welcome::render(frame, w, chunks[1]),
        ScreenView::RepoList(list) => repo_list::render(frame, list, chunks[1]),
        ScreenView::IssueList(list) => issue_list::render(frame, list, chunks[1]),
        ScreenView::IssueDetail(detail) => issue_detail::render(frame, detail, chunks[1]),
    }

    // Overlays: an error replaces the loading indicator
    if let Some(error) = &view.error {
        popup::render_error(frame, error);
    } else if let Some(message) = &view.loading {
        popup::render_loading(frame, view.spinner, message);
    }

    render_status_bar(frame, view, chunks[2]);
}

fn render_header(frame: &mut Frame, view: &ViewModel, area: Rect) {
    let header = Paragraph::new(Line::from(vec![Span::styled(
        view.title.as_str(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, view: &ViewModel, area: Rect) {
    let status = match &view.notice {
        Some(notice) => Line::from(vec![
            Span::styled(notice.as_str(), Style::default().fg(Color::Green)),
            Span::styled(format!("  {}", view.help), Style::default().fg(Color::Gray)),
        ]),
        None => Line::from(vec![Span::styled(view.help, Style::default().fg(Color::Gray))]),
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::LightRed,
        Difficulty::Expert => Color::Red,
    }
}
