use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::difficulty_color;
use crate::view::IssueDetailView;

pub fn render(frame: &mut Frame, issue: &IssueDetailView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    render_header(frame, issue, chunks[0]);
    render_body(frame, issue, chunks[1]);
}

fn render_header(frame: &mut Frame, issue: &IssueDetailView, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("#{} ", issue.number),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                issue.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{} ({})", issue.difficulty, issue.score),
                Style::default()
                    .fg(difficulty_color(issue.difficulty))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::styled(
                format!("@{}", issue.author),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(format!(" | {} comments | opened {}", issue.comments, issue.created)),
        ]),
        Line::from(vec![
            Span::styled("Labels: ", Style::default().fg(Color::Gray)),
            Span::styled(issue.labels.join(", "), Style::default().fg(Color::Magenta)),
        ]),
        Line::from(vec![
            Span::styled("URL: ", Style::default().fg(Color::Gray)),
            Span::styled(issue.url.as_str(), Style::default().fg(Color::Blue)),
        ]),
    ];

    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(issue.repo.as_str()),
    );

    frame.render_widget(header, area);
}

fn render_body(frame: &mut Frame, issue: &IssueDetailView, area: Rect) {
    let lines: Vec<Line> = issue
        .body
        .lines()
        .map(|l| Line::from(l.replace('\t', "    ")))
        .collect();

    // Clamp scroll offset to content bounds
    let inner_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(inner_height);
    let scroll = issue.scroll.min(max_scroll) as u16;

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Description"))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(body, area);
}
