use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::{Action, Direction};
use crate::controller::event::IntentSender;
use crate::engine::{Notice, ProcessEntry, ViewModel};

const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    ConfirmKill(u32),
}

/// Terminal-side state: what is selected and typed. Everything about the
/// host comes from the latest [`ViewModel`].
pub struct App {
    pub running: bool,
    pub view: ViewModel,
    pub input_mode: InputMode,
    pub filter_text: String,
    pub selected_index: usize,
    notice_since: Option<Instant>,
    intents: IntentSender,
}

impl App {
    pub fn new(intents: IntentSender, view: ViewModel) -> Self {
        Self {
            running: true,
            filter_text: view.filter.clone(),
            view,
            input_mode: InputMode::Normal,
            selected_index: 0,
            notice_since: None,
            intents,
        }
    }

    pub fn on_view(&mut self, view: ViewModel) {
        if view.notice.is_some() && view.notice_serial != self.view.notice_serial {
            self.notice_since = Some(Instant::now());
        }
        self.view = view;
        let len = self.view.visible_processes.len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    /// The controller's last notice, for a few seconds after it appeared.
    pub fn active_notice(&self) -> Option<&Notice> {
        match self.notice_since {
            Some(since) if since.elapsed() < NOTICE_TTL => self.view.notice.as_ref(),
            _ => None,
        }
    }

    pub fn selected_process(&self) -> Option<&ProcessEntry> {
        self.view.visible_processes.get(self.selected_index)
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.selected_process().map(|p| p.pid)
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Filter => self.map_key_filter(key),
            InputMode::ConfirmKill(_) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Action::ConfirmKill,
                _ => Action::CancelKill,
            },
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => Action::Navigate(Direction::Up),
            KeyCode::Down => Action::Navigate(Direction::Down),
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('/') => Action::EnterFilterMode,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('k') => match self.selected_pid() {
                Some(pid) => Action::Kill(pid),
                None => Action::None,
            },
            KeyCode::Esc if !self.filter_text.is_empty() => Action::ClearFilter,
            _ => Action::None,
        }
    }

    fn map_key_filter(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ClearFilter,
            KeyCode::Enter => Action::ExitFilterMode,
            KeyCode::Backspace => {
                let mut text = self.filter_text.clone();
                text.pop();
                Action::UpdateFilter(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.filter_text.clone();
                text.push(c);
                Action::UpdateFilter(text)
            }
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.running = false;
                self.intents.quit();
            }
            Action::Navigate(dir) => self.navigate(dir),
            Action::EnterFilterMode => self.input_mode = InputMode::Filter,
            Action::ExitFilterMode => self.input_mode = InputMode::Normal,
            Action::ClearFilter => {
                self.filter_text.clear();
                self.input_mode = InputMode::Normal;
                self.intents.set_filter("");
            }
            Action::UpdateFilter(text) => {
                self.intents.set_filter(text.clone());
                self.filter_text = text;
                self.selected_index = 0;
            }
            Action::Kill(pid) => self.input_mode = InputMode::ConfirmKill(pid),
            Action::ConfirmKill => {
                if let InputMode::ConfirmKill(pid) = self.input_mode {
                    self.intents.request_kill(pid);
                }
                self.input_mode = InputMode::Normal;
            }
            Action::CancelKill => self.input_mode = InputMode::Normal,
            Action::Refresh => self.intents.refresh(),
            Action::None => {}
        }
    }

    fn navigate(&mut self, direction: Direction) {
        let len = self.view.visible_processes.len();
        if len == 0 {
            return;
        }
        self.selected_index = match direction {
            Direction::Up => self.selected_index.saturating_sub(1),
            Direction::Down => (self.selected_index + 1).min(len - 1),
        };
    }
}
