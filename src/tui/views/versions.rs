use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Title
        Constraint::Min(10),   // History
        Constraint::Length(3), // Help
    ])
    .split(frame.area());

    let name = app
        .session
        .as_ref()
        .map(|s| s.prompt.name.as_str())
        .unwrap_or("?");
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "Version history",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" — {name}")),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(title, chunks[0]);

    render_history(frame, chunks[1], app);

    let help = Paragraph::new(Line::from(vec![
        Span::styled(" ↑↓ ", Style::default().fg(Color::Cyan)),
        Span::raw("Scroll  "),
        Span::styled(" Esc ", Style::default().fg(Color::Cyan)),
        Span::raw("Back to editor"),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(help, chunks[2]);
}

fn render_history(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if let Some(err) = &app.versions_error {
        let error = Paragraph::new(format!("Error: {err}"))
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(error, area);
        return;
    }

    if app.versions.is_empty() {
        let empty = Paragraph::new("No versions yet. Save the draft to create one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let current = app.versions.iter().map(|v| v.number).max().unwrap_or(0);

    let mut lines: Vec<Line> = Vec::new();
    for v in &app.versions {
        let mut heading = vec![
            Span::styled(
                format!("v{}", v.number),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", v.created_at.format("%Y-%m-%d %H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if v.number == current {
            heading.push(Span::styled(
                "  (current)",
                Style::default().fg(Color::Cyan),
            ));
        }
        lines.push(Line::from(heading));
        for text_line in v.system_prompt.lines() {
            lines.push(Line::raw(format!("    {text_line}")));
        }
        lines.push(Line::raw(""));
    }

    let history = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.versions_scroll as u16, 0))
        .block(block);
    frame.render_widget(history, area);
}
