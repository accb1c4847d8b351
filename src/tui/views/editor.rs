use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::editor::RunResults;
use crate::tui::app::{App, Focus};

pub fn render(frame: &mut Frame, app: &App) {
    let Some(session) = &app.session else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(10),   // Buffer + results
        Constraint::Length(3), // Status bar
    ])
    .split(frame.area());

    render_header(frame, chunks[0], app);

    let panes = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);
    render_buffer(frame, panes[0], app);
    render_results(frame, panes[1], app);

    render_status(frame, chunks[2], app);

    // Visible cursor only while typing in the buffer.
    if app.focus == Focus::Buffer {
        let inner = panes[0].inner(ratatui::layout::Margin {
            horizontal: 1,
            vertical: 1,
        });
        let (row, col) = cursor_position(session.buffer(), app.buffer_cursor, inner.width);
        frame.set_cursor_position(Position::new(
            inner.x + col.min(inner.width.saturating_sub(1)),
            inner.y + row.min(inner.height.saturating_sub(1)),
        ));
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = &app.session else {
        return;
    };

    let mut spans = vec![
        Span::styled(
            session.prompt.name.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];

    if session.version_number() == 0 {
        spans.push(Span::styled(
            "no versions yet",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            format!("v{}", session.version_number()),
            Style::default().fg(Color::Green),
        ));
    }

    if session.can_save() {
        spans.push(Span::styled(
            "  ● unsaved changes",
            Style::default().fg(Color::Yellow),
        ));
    }
    if session.is_saving() {
        spans.push(Span::styled(
            "  Saving...",
            Style::default().fg(Color::Yellow),
        ));
    }
    if session.is_running() {
        spans.push(Span::styled(
            "  Running...",
            Style::default().fg(Color::Yellow),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

fn render_buffer(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = &app.session else {
        return;
    };

    let border = if app.focus == Focus::Buffer {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let buffer = Paragraph::new(session.buffer())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" System Prompt ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    frame.render_widget(buffer, area);
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = &app.session else {
        return;
    };

    let border = if app.focus == Focus::Results {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let title = if session.is_outdated() {
        Line::from(vec![
            Span::raw(" Results "),
            Span::styled(
                "[Outdated]",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
        ])
    } else {
        Line::from(" Results ")
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let body: Vec<Line> = match session.results() {
        RunResults::None => {
            if app.test_cases.is_empty() {
                vec![Line::styled(
                    "No test cases. Add some with `promptdeck tests add`.",
                    Style::default().fg(Color::DarkGray),
                )]
            } else {
                vec![Line::styled(
                    format!(
                        "{} test case(s). Press Ctrl+R to run.",
                        app.test_cases.len()
                    ),
                    Style::default().fg(Color::DarkGray),
                )]
            }
        }
        RunResults::Pending => vec![Line::styled(
            "Running test cases...",
            Style::default().fg(Color::Yellow),
        )],
        RunResults::Ready(results) => {
            let mut lines = Vec::new();
            for r in results {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("#{} ", r.test_case_id),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        r.user_message.clone(),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]));
                for out in r.output.lines() {
                    lines.push(Line::raw(out.to_string()));
                }
                lines.push(Line::raw(""));
            }
            lines
        }
    };

    let results = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .scroll((app.results_scroll as u16, 0))
        .block(block);
    frame.render_widget(results, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let line = if let Some(notice) = &app.notice {
        let color = if notice.is_error {
            Color::Red
        } else {
            Color::Green
        };
        Line::from(Span::styled(
            format!(" {}", notice.text),
            Style::default().fg(color),
        ))
    } else {
        Line::from(vec![
            Span::styled(" ^S ", Style::default().fg(Color::Cyan)),
            Span::raw("Save  "),
            Span::styled(" ^R ", Style::default().fg(Color::Cyan)),
            Span::raw("Run  "),
            Span::styled(" ^V ", Style::default().fg(Color::Cyan)),
            Span::raw("Versions  "),
            Span::styled(" Tab ", Style::default().fg(Color::Cyan)),
            Span::raw("Focus  "),
            Span::styled(" Esc ", Style::default().fg(Color::Cyan)),
            Span::raw("Back"),
        ])
    };

    let status = Paragraph::new(line).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(status, area);
}

/// Map a byte offset into the wrapped buffer to a (row, col) cell. Mirrors
/// the Paragraph wrap above closely enough for cursor placement: hard
/// newlines break rows, and rows overflow at the pane width.
fn cursor_position(text: &str, at: usize, width: u16) -> (u16, u16) {
    let width = width.max(1) as usize;
    let mut row = 0usize;
    let mut col = 0usize;
    for (idx, c) in text.char_indices() {
        if idx >= at {
            break;
        }
        if c == '\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
            if col >= width {
                row += 1;
                col = 0;
            }
        }
    }
    (row as u16, col as u16)
}
