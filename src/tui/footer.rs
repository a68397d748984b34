use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::AppState;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let narrow = area.width < crate::app::NARROW_WIDTH_THRESHOLD;

    let hints: &[(&str, &str)] = if narrow {
        &[("j/k", "nav"), ("⏎", "sel"), ("s/w/i", "sort"), ("v", "view"), ("q", "quit")]
    } else {
        &[
            ("↑↓/jk", "navigate"),
            ("Enter", "select"),
            ("s", "by start"),
            ("w", "by workers"),
            ("i", "by id"),
            ("v", "view"),
            ("q", "quit"),
        ]
    };

    // The status label doubles as the view-summary button
    let mut spans = vec![
        Span::styled(
            format!(" {} ", state.status_label()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    if let Some(notif) = state.notifications.last() {
        spans.push(Span::styled("★ ", Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(
            notif.message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    } else {
        for (i, (key, desc)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
            spans.push(Span::styled(
                format!(" {desc}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}
