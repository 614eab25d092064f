use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::view::{truncate, RepoListView};

pub fn render(frame: &mut Frame, view: &RepoListView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    render_list(frame, view, chunks[0]);
    render_pager(frame, view, chunks[1]);
}

fn render_list(frame: &mut Frame, view: &RepoListView, area: Rect) {
    if view.items.is_empty() {
        let block = Block::default().borders(Borders::ALL).title("Repositories");
        let empty = Paragraph::new("No repositories found. Try fewer languages or a lower star minimum.")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = 70; // rank(5) + name(30) + stars(8) + language(12) + score(6) + updated(9)
    let flex = w.saturating_sub(fixed).max(10);

    let items: Vec<ListItem> = view
        .items
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            let style = if i == view.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let line = Line::from(vec![
                Span::styled(format!("{:>3}. ", repo.rank), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<30}", truncate(&repo.full_name, 30)), style),
                Span::styled(
                    format!(" ★ {:>5}", repo.stars),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!(" {:<11}", truncate(&repo.language, 11)),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(format!(" {:>4} ", repo.score), Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{:<flex$}", truncate(&repo.description, flex)),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!(" {}", repo.updated),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Repositories ({})", view.items.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(view.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_pager(frame: &mut Frame, view: &RepoListView, area: Rect) {
    let enabled = Style::default().fg(Color::Green);
    let disabled = Style::default().fg(Color::DarkGray);

    let line = Line::from(vec![
        Span::styled("← prev ", if view.has_prev { enabled } else { disabled }),
        Span::raw(view.page_label.as_str()),
        Span::styled(" next →", if view.has_next { enabled } else { disabled }),
    ]);

    frame.render_widget(Paragraph::new(line).alignment(ratatui::layout::Alignment::Center), area);
}
