use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::view::WelcomeView;

pub fn render(frame: &mut Frame, view: &WelcomeView, area: Rect) {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::Yellow);

    let setting = |name: &'static str, text: String| {
        Line::from(vec![
            Span::styled(format!("{:>20}  ", name), label),
            Span::styled(text, value),
        ])
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Find your next open source contribution",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::from(""),
        setting("Topic", format!("#{}", view.topic)),
        setting("Languages", view.languages.clone()),
        setting("Skill level", view.skill_level.clone()),
        setting("Minimum stars", view.min_stars.to_string()),
        setting("Repositories/page", view.max_repos.to_string()),
        setting("Issues/repository", view.max_issues.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" to search"),
        ])
        .alignment(Alignment::Center),
    ];

    let welcome = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Hacktoberfest Explorer"),
    );
    frame.render_widget(welcome, area);
}
