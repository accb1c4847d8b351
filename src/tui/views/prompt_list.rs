use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::tui::app::{App, ListMode};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Title bar
        Constraint::Min(10),   // Prompt list
        Constraint::Length(3), // Help / input bar
    ])
    .split(frame.area());

    render_title(frame, chunks[0]);
    render_prompts(frame, chunks[1], app);
    render_footer(frame, chunks[2], app);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "promptdeck",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" — Select a prompt to edit"),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(title, area);
}

fn render_prompts(frame: &mut Frame, area: Rect, app: &App) {
    if app.list_loading {
        let loading = Paragraph::new("Loading prompts...")
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(bordered(" Prompts ", Color::DarkGray));
        frame.render_widget(loading, area);
        return;
    }

    if let Some(err) = &app.list_error {
        let error = Paragraph::new(format!("Error: {err}"))
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .block(bordered(" Prompts ", Color::Red));
        frame.render_widget(error, area);
        return;
    }

    if app.prompts.is_empty() {
        let empty = Paragraph::new("No prompts yet. Press n to create one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(bordered(" Prompts ", Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .prompts
        .iter()
        .enumerate()
        .map(|(i, prompt)| {
            let name_style = if i == app.list_index {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let line = Line::from(vec![
                Span::raw("  "),
                Span::styled(&prompt.name, name_style),
                Span::raw("  "),
                Span::styled(
                    format!("created {}", prompt.created_at.format("%Y-%m-%d")),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(bordered(
            &format!(" Prompts ({}) ", app.prompts.len()),
            Color::Cyan,
        ))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(app.list_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let footer = match app.list_mode {
        ListMode::Creating => Paragraph::new(Line::from(vec![
            Span::styled(" New prompt name: ", Style::default().fg(Color::Cyan)),
            Span::raw(app.name_input.as_str()),
            Span::styled("▌", Style::default().fg(Color::Cyan)),
            Span::styled(
                "  (Enter to create, Esc to cancel)",
                Style::default().fg(Color::DarkGray),
            ),
        ]))
        .alignment(Alignment::Left),
        ListMode::ConfirmDelete => {
            let name = app
                .prompts
                .get(app.list_index)
                .map(|p| p.name.as_str())
                .unwrap_or("?");
            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!(" Delete \"{name}\" and all its versions? "),
                    Style::default().fg(Color::Red),
                ),
                Span::styled(" y ", Style::default().fg(Color::Cyan)),
                Span::raw("Confirm  "),
                Span::styled(" any other key ", Style::default().fg(Color::Cyan)),
                Span::raw("Cancel"),
            ]))
            .alignment(Alignment::Center)
        }
        ListMode::Normal => Paragraph::new(Line::from(vec![
            Span::styled(" ↑↓ ", Style::default().fg(Color::Cyan)),
            Span::raw("Navigate  "),
            Span::styled(" Enter ", Style::default().fg(Color::Cyan)),
            Span::raw("Open  "),
            Span::styled(" n ", Style::default().fg(Color::Cyan)),
            Span::raw("New  "),
            Span::styled(" d ", Style::default().fg(Color::Cyan)),
            Span::raw("Delete  "),
            Span::styled(" r ", Style::default().fg(Color::Cyan)),
            Span::raw("Refresh  "),
            Span::styled(" q ", Style::default().fg(Color::Cyan)),
            Span::raw("Quit"),
        ]))
        .alignment(Alignment::Center),
    };

    frame.render_widget(
        footer.block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        area,
    );
}

fn bordered(title: &str, color: Color) -> Block<'static> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}
