pub mod app;
pub mod views;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use self::app::{App, Focus, ListMode, Screen};
use crate::api::ApiClient;

/// Main entry point for the TUI.
pub async fn run(api: Arc<ApiClient>, prompt_id: Option<i64>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!("starting interactive session");
    let mut app = App::new(api);
    app.load_prompts().await;

    // Jump straight into an editor when a prompt ID was given.
    if let Some(id) = prompt_id {
        app.open_prompt_by_id(id).await;
    }

    let result = run_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| match &app.screen {
            Screen::PromptList => views::prompt_list::render(frame, app),
            Screen::Editor => views::editor::render(frame, app),
            Screen::Versions => views::versions::render(frame, app),
        })?;

        // Poll with a timeout so completed saves/runs are picked up even
        // when no key is pressed.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    return Ok(());
                }

                let screen = app.screen.clone();
                match screen {
                    Screen::PromptList => handle_list_keys(app, key).await,
                    Screen::Editor => handle_editor_keys(app, key).await,
                    Screen::Versions => handle_versions_keys(app, key),
                }
            }
        }

        app.poll_session();

        if app.should_quit {
            return Ok(());
        }
    }
}

async fn handle_list_keys(app: &mut App, key: event::KeyEvent) {
    match app.list_mode {
        ListMode::Creating => match key.code {
            KeyCode::Esc => {
                app.name_input.clear();
                app.list_mode = ListMode::Normal;
            }
            KeyCode::Enter => app.create_prompt().await,
            KeyCode::Backspace => {
                app.name_input.pop();
            }
            KeyCode::Char(c) => app.name_input.push(c),
            _ => {}
        },
        ListMode::ConfirmDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.delete_selected().await,
            _ => app.list_mode = ListMode::Normal,
        },
        ListMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => app.list_up(),
            KeyCode::Down | KeyCode::Char('j') => app.list_down(),
            KeyCode::Enter => app.open_selected().await,
            KeyCode::Char('r') => app.load_prompts().await,
            KeyCode::Char('n') => app.list_mode = ListMode::Creating,
            KeyCode::Char('d') if !app.prompts.is_empty() => {
                app.list_mode = ListMode::ConfirmDelete;
            }
            _ => {}
        },
    }
}

async fn handle_editor_keys(app: &mut App, key: event::KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.leave_editor(),
        KeyCode::Char('s') if ctrl => app.trigger_save(),
        KeyCode::Char('r') if ctrl => app.trigger_run(),
        KeyCode::Char('v') if ctrl => app.open_versions().await,
        KeyCode::Tab => app.toggle_focus(),
        _ => match app.focus {
            Focus::Buffer => match key.code {
                KeyCode::Char(c) if !ctrl => app.buffer_insert(c),
                KeyCode::Enter => app.buffer_newline(),
                KeyCode::Backspace => app.buffer_backspace(),
                KeyCode::Left => app.cursor_left(),
                KeyCode::Right => app.cursor_right(),
                _ => {}
            },
            Focus::Results => match key.code {
                KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
                KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
                KeyCode::PageUp => app.scroll_results_up(),
                KeyCode::PageDown => app.scroll_results_down(),
                _ => {}
            },
        },
    }
}

fn handle_versions_keys(app: &mut App, key: event::KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_versions(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_versions_up(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_versions_down(),
        _ => {}
    }
}
