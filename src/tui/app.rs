use std::sync::Arc;

use crate::api::{ApiClient, Prompt, TestCase, Version};
use crate::editor::{EditorSession, SessionEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    PromptList,
    Editor,
    Versions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Focus {
    Buffer,
    Results,
}

/// Prompt-list modal state: creating captures typed text as the new prompt
/// name, confirm-delete waits for y/n.
#[derive(Debug, Clone, PartialEq)]
pub enum ListMode {
    Normal,
    Creating,
    ConfirmDelete,
}

/// Transient status-bar message, replaced by the next operation's outcome.
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

pub struct App {
    api: Arc<ApiClient>,
    pub screen: Screen,
    pub should_quit: bool,

    // Prompt list
    pub prompts: Vec<Prompt>,
    pub list_index: usize,
    pub list_loading: bool,
    pub list_error: Option<String>,
    pub list_mode: ListMode,
    pub name_input: String,

    // Editor
    pub session: Option<EditorSession>,
    pub test_cases: Vec<TestCase>,
    pub focus: Focus,
    pub buffer_cursor: usize,
    pub results_scroll: usize,
    pub notice: Option<Notice>,

    // Version history
    pub versions: Vec<Version>,
    pub versions_scroll: usize,
    pub versions_error: Option<String>,
}

impl App {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            screen: Screen::PromptList,
            should_quit: false,
            prompts: Vec::new(),
            list_index: 0,
            list_loading: false,
            list_error: None,
            list_mode: ListMode::Normal,
            name_input: String::new(),
            session: None,
            test_cases: Vec::new(),
            focus: Focus::Buffer,
            buffer_cursor: 0,
            results_scroll: 0,
            notice: None,
            versions: Vec::new(),
            versions_scroll: 0,
            versions_error: None,
        }
    }

    // ── Prompt list ─────────────────────────────────────────────

    pub async fn load_prompts(&mut self) {
        self.list_loading = true;
        self.list_error = None;
        match self.api.list_prompts().await {
            Ok(prompts) => {
                self.prompts = prompts;
                if !self.prompts.is_empty() {
                    self.list_index = self.list_index.min(self.prompts.len() - 1);
                } else {
                    self.list_index = 0;
                }
            }
            Err(e) => self.list_error = Some(e.to_string()),
        }
        self.list_loading = false;
    }

    pub fn list_up(&mut self) {
        if self.list_index > 0 {
            self.list_index -= 1;
        }
    }

    pub fn list_down(&mut self) {
        if !self.prompts.is_empty() && self.list_index < self.prompts.len() - 1 {
            self.list_index += 1;
        }
    }

    pub async fn open_selected(&mut self) {
        if self.prompts.is_empty() {
            return;
        }
        let prompt = self.prompts[self.list_index].clone();
        self.open_editor(prompt).await;
    }

    pub async fn open_prompt_by_id(&mut self, prompt_id: i64) {
        if let Some(idx) = self.prompts.iter().position(|p| p.id == prompt_id) {
            self.list_index = idx;
        }
        match self.api.get_prompt(prompt_id).await {
            Ok(prompt) => self.open_editor(prompt).await,
            Err(e) => self.list_error = Some(e.to_string()),
        }
    }

    async fn open_editor(&mut self, prompt: Prompt) {
        let session = match EditorSession::open(prompt, self.api.clone(), self.api.clone()).await {
            Ok(session) => session,
            Err(e) => {
                self.list_error = Some(e.to_string());
                return;
            }
        };
        self.test_cases = match self.api.list_test_cases(session.prompt.id).await {
            Ok(cases) => cases,
            Err(e) => {
                self.notice = Some(Notice::error(format!("failed to load test cases: {e}")));
                Vec::new()
            }
        };
        self.buffer_cursor = session.buffer().len();
        self.session = Some(session);
        self.focus = Focus::Buffer;
        self.results_scroll = 0;
        self.screen = Screen::Editor;
    }

    pub async fn create_prompt(&mut self) {
        let name = self.name_input.trim().to_string();
        self.name_input.clear();
        self.list_mode = ListMode::Normal;
        if name.is_empty() {
            return;
        }
        match self.api.create_prompt(&name).await {
            Ok(created) => {
                self.load_prompts().await;
                if let Some(idx) = self.prompts.iter().position(|p| p.id == created.id) {
                    self.list_index = idx;
                }
            }
            Err(e) => self.list_error = Some(e.to_string()),
        }
    }

    pub async fn delete_selected(&mut self) {
        self.list_mode = ListMode::Normal;
        if self.prompts.is_empty() {
            return;
        }
        let prompt_id = self.prompts[self.list_index].id;
        match self.api.delete_prompt(prompt_id).await {
            Ok(()) => self.load_prompts().await,
            Err(e) => self.list_error = Some(e.to_string()),
        }
    }

    // ── Editor ──────────────────────────────────────────────────

    /// Back to the list. Run results are ephemeral view state and do not
    /// survive navigation: dropping the session discards them.
    pub fn leave_editor(&mut self) {
        self.session = None;
        self.test_cases.clear();
        self.notice = None;
        self.buffer_cursor = 0;
        self.results_scroll = 0;
        self.screen = Screen::PromptList;
    }

    pub fn trigger_save(&mut self) {
        if let Some(session) = &mut self.session {
            if session.is_saving() || !session.can_save() {
                return;
            }
            session.start_save();
        }
    }

    pub fn trigger_run(&mut self) {
        if let Some(session) = &mut self.session {
            if session.is_running() {
                return;
            }
            session.start_run();
            self.results_scroll = 0;
        }
    }

    /// Apply completed save/run outcomes. Called every event-loop tick.
    pub fn poll_session(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        for event in session.poll() {
            self.notice = Some(match event {
                SessionEvent::Saved(v) => Notice::info(format!("Saved as version {}", v.number)),
                SessionEvent::SaveFailed(e) => Notice::error(format!("Save failed: {e}")),
                SessionEvent::RunFinished => Notice::info("Run finished"),
                SessionEvent::RunFailed(e) => Notice::error(format!("Run failed: {e}")),
            });
        }
    }

    // ── Buffer editing ──────────────────────────────────────────

    pub fn buffer_insert(&mut self, c: char) {
        if let Some(session) = &mut self.session {
            let mut text = session.buffer().to_string();
            let at = self.buffer_cursor.min(text.len());
            text.insert(at, c);
            self.buffer_cursor = at + c.len_utf8();
            session.edit(text);
        }
    }

    pub fn buffer_newline(&mut self) {
        self.buffer_insert('\n');
    }

    pub fn buffer_backspace(&mut self) {
        if let Some(session) = &mut self.session {
            if self.buffer_cursor == 0 {
                return;
            }
            let mut text = session.buffer().to_string();
            let at = prev_char_boundary(&text, self.buffer_cursor);
            text.remove(at);
            self.buffer_cursor = at;
            session.edit(text);
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some(session) = &self.session {
            if self.buffer_cursor == 0 {
                return;
            }
            self.buffer_cursor = prev_char_boundary(session.buffer(), self.buffer_cursor);
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(session) = &self.session {
            let text = session.buffer();
            if self.buffer_cursor >= text.len() {
                return;
            }
            self.buffer_cursor = next_char_boundary(text, self.buffer_cursor);
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Buffer => Focus::Results,
            Focus::Results => Focus::Buffer,
        };
    }

    pub fn scroll_results_up(&mut self) {
        self.results_scroll = self.results_scroll.saturating_sub(3);
    }

    pub fn scroll_results_down(&mut self) {
        self.results_scroll = self.results_scroll.saturating_add(3);
    }

    // ── Version history ─────────────────────────────────────────

    pub async fn open_versions(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        self.versions_error = None;
        self.versions_scroll = 0;
        match self.api.list_versions(session.prompt.id).await {
            Ok(mut versions) => {
                versions.sort_by(|a, b| b.number.cmp(&a.number));
                self.versions = versions;
            }
            Err(e) => self.versions_error = Some(e.to_string()),
        }
        self.screen = Screen::Versions;
    }

    pub fn close_versions(&mut self) {
        self.versions.clear();
        self.screen = Screen::Editor;
    }

    pub fn scroll_versions_up(&mut self) {
        self.versions_scroll = self.versions_scroll.saturating_sub(1);
    }

    pub fn scroll_versions_down(&mut self) {
        self.versions_scroll = self
            .versions_scroll
            .saturating_add(1)
            .min(self.versions.len().saturating_sub(1));
    }
}

fn prev_char_boundary(text: &str, at: usize) -> usize {
    let mut at = at.min(text.len()).saturating_sub(1);
    while !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}

fn next_char_boundary(text: &str, at: usize) -> usize {
    let mut at = at + 1;
    while at < text.len() && !text.is_char_boundary(at) {
        at += 1;
    }
    at.min(text.len())
}
