use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use super::difficulty_color;
use crate::view::{truncate, IssueListView};

pub fn render(frame: &mut Frame, view: &IssueListView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    render_list(frame, view, chunks[0]);
    render_labels(frame, view, chunks[1]);
}

fn render_list(frame: &mut Frame, view: &IssueListView, area: Rect) {
    let title = format!("Open issues in {} ({})", view.repo, view.items.len());

    if view.items.is_empty() {
        let block = Block::default().borders(Borders::ALL).title(title);
        let empty = Paragraph::new("No open issues")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = 46; // number(7) + difficulty(8) + comments(6) + labels(25)
    let flex = w.saturating_sub(fixed).max(10);

    let items: Vec<ListItem> = view
        .items
        .iter()
        .enumerate()
        .map(|(i, issue)| {
            let style = if i == view.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let line = Line::from(vec![
                Span::styled(format!("#{:<6}", issue.number), Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{:<7} ", issue.difficulty),
                    Style::default().fg(difficulty_color(issue.difficulty)),
                ),
                Span::styled(format!("{:<flex$}", truncate(&issue.title, flex)), style),
                Span::styled(
                    format!(" 💬{:>3} ", issue.comments),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    truncate(&issue.labels.join(", "), 25),
                    Style::default().fg(Color::Magenta),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(view.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_labels(frame: &mut Frame, view: &IssueListView, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();
    for (i, label) in view.labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(label.as_str(), Style::default().fg(Color::Magenta)));
    }
    if view.more_labels > 0 {
        spans.push(Span::styled(
            format!("  ... and {} more labels", view.more_labels),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let summary = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Labels"))
        .wrap(Wrap { trim: true });
    frame.render_widget(summary, area);
}
