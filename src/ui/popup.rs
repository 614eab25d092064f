use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::view::ErrorView;

/// Centered spinner box shown while a fetch is in flight
pub fn render_loading(frame: &mut Frame, spinner: char, message: &str) {
    let area = centered_rect(40, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} ", spinner), Style::default().fg(Color::Yellow)),
            Span::raw(message),
        ]),
    ];

    let popup = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(popup, area);
}

/// Centered error box offering back and retry
pub fn render_error(frame: &mut Frame, error: &ErrorView) {
    let area = centered_rect(70, 11, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            error.message.as_str(),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
    ];
    if let Some(path) = &error.log_path {
        lines.push(Line::from(Span::styled(
            format!("Check logs for details: {}", path),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(vec![
        Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
        Span::raw(" back  "),
        Span::styled("[r]", Style::default().fg(Color::Green)),
        Span::raw(" retry"),
    ]));

    let popup = Paragraph::new(lines)
        .block(
            Block::default().borders(Borders::ALL).title(Span::styled(
                " Error ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(popup, area);
}

/// Rect of at most `width` x `height` centered in `outer`
pub fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let popup_width = width.min(outer.width);
    let popup_height = height.min(outer.height);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((outer.height.saturating_sub(popup_height)) / 2),
            Constraint::Length(popup_height),
            Constraint::Min(0),
        ])
        .split(outer);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((outer.width.saturating_sub(popup_width)) / 2),
            Constraint::Length(popup_width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}
