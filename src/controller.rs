use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::debounce::Debouncer;
use crate::sanitize::validate;
use crate::state::{AppState, DEFAULT_PLACEHOLDER, Delta, Focus, Phase, ProviderCommand, apply_delta};

/// Wires input and selection events to the fetch pipeline.
///
/// Owns the whole UI state; the event loop feeds it key/mouse derived calls,
/// clock ticks and provider deltas.
pub struct Controller {
    pub state: AppState,
    debouncer: Debouncer<String>,
    cmd_tx: Option<Sender<ProviderCommand>>,
}

impl Controller {
    pub fn new(debounce: Duration, cmd_tx: Option<Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            debouncer: Debouncer::new(debounce),
            cmd_tx,
        }
    }

    pub fn input(&self) -> &str {
        &self.state.session.input
    }

    /// Input notification: the field now holds `text`.
    pub fn on_input(&mut self, text: String, now: Instant) {
        self.state.session.input = text.clone();
        self.state.session.phase = Phase::Typing;
        self.debouncer.call(text, now);
    }

    pub fn type_char(&mut self, c: char, now: Instant) {
        let mut text = self.state.session.input.clone();
        text.push(c);
        self.on_input(text, now);
    }

    pub fn backspace(&mut self, now: Instant) {
        let mut text = self.state.session.input.clone();
        if text.pop().is_some() {
            self.on_input(text, now);
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(text) = self.debouncer.poll(now) {
            self.settle(text);
        }
    }

    fn settle(&mut self, text: String) {
        if text.is_empty() {
            self.state.autocomplete.clear();
            self.state.autocomplete.hide();
            self.state.session.term = None;
            if self.state.session.phase != Phase::Selected {
                self.state.session.phase = Phase::Idle;
            }
            self.state.normalize_focus();
            return;
        }

        match validate(&text) {
            Ok(term) => {
                let term = term.to_string();
                self.state.session.term = Some(Ok(term.clone()));
                self.state.session.phase = Phase::Suggesting;
                let seq = self.state.team_requests.issue();
                self.send(ProviderCommand::SearchTeams { seq, term }, "Team search");
            }
            Err(invalid) => {
                self.state.autocomplete.render_invalid();
                self.state.session.term = Some(Err(invalid));
                self.state.session.phase = Phase::Invalid;
            }
        }
        self.state.normalize_focus();
    }

    /// Candidate click: fetch the roster of the autocomplete row at `index`.
    pub fn select_candidate(&mut self, index: usize, now: Instant) {
        let Some(team) = self.state.autocomplete.team_at(index).cloned() else {
            return;
        };

        self.state.session.input.clear();
        // A still-pending keystroke must not reopen the list after selection.
        if self.debouncer.is_pending() {
            self.debouncer.call(String::new(), now);
        }
        self.state.autocomplete.clear();
        self.state.autocomplete.hide();
        self.state.session.selected = Some(team.clone());
        self.state.session.phase = Phase::Selected;
        self.state.focus = Focus::SearchField;

        let seq = self.state.roster_requests.issue();
        self.state.push_log(format!("[INFO] Selected {}", team.name));
        self.send(ProviderCommand::SearchPlayers { seq, team }, "Player search");
    }

    pub fn apply(&mut self, delta: Delta, now: DateTime<Local>) {
        apply_delta(&mut self.state, delta, now);
    }

    /// History row click: replays the search as if the name had been typed.
    pub fn replay_history(&mut self, index: usize, now: Instant) {
        let Some(name) = self.state.history.get(index).map(|e| e.team.name.clone()) else {
            return;
        };
        self.state.focus = Focus::SearchField;
        self.on_input(name, now);
    }

    pub fn remove_history(&mut self, index: usize) {
        if let Some(entry) = self.state.history.remove(index) {
            self.state.push_log(format!("[INFO] Removed {} from history", entry.team.name));
        }
        self.hover_history(None);
        self.state.focus = Focus::SearchField;
    }

    pub fn clear_history(&mut self) {
        self.state.history.clear();
        self.hover_history(None);
        self.state.focus = Focus::SearchField;
    }

    /// Shows the hovered entry's team name as the field placeholder.
    pub fn hover_history(&mut self, index: Option<usize>) {
        let hovered = index.and_then(|idx| self.state.history.get(idx));
        match hovered {
            Some(entry) => {
                self.state.placeholder = entry.team.name.clone();
                self.state.hovered_history = Some(entry.team.id.clone());
            }
            None => {
                self.state.placeholder = DEFAULT_PLACEHOLDER.to_string();
                self.state.hovered_history = None;
            }
        }
    }

    /// Scrolls the results pane by `lines`, up to `max`.
    pub fn scroll_results(&mut self, lines: isize, max: usize) {
        self.state.results.scroll_by(lines, max);
    }

    /// Click anywhere outside the search box.
    pub fn click_outside(&mut self) {
        self.state.autocomplete.hide();
        self.state.normalize_focus();
    }

    pub fn focus(&mut self, focus: Focus) {
        self.state.focus = focus;
        if focus == Focus::SearchField && !self.state.session.input.is_empty() {
            self.state.autocomplete.show();
        }
        match focus {
            Focus::HistoryText(idx) | Focus::HistoryRemove(idx) => self.hover_history(Some(idx)),
            _ => self.hover_history(None),
        }
    }

    pub fn focus_next(&mut self) {
        self.cycle_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.cycle_focus(-1);
    }

    fn cycle_focus(&mut self, step: isize) {
        let order = self.state.focus_order();
        let len = order.len() as isize;
        let current = order
            .iter()
            .position(|f| *f == self.state.focus)
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(len) as usize;
        self.focus(order[next]);
    }

    /// Up/Down within the focused list.
    pub fn move_focus(&mut self, down: bool) {
        let next = match self.state.focus {
            Focus::SearchField if down => Focus::Autocomplete(0),
            Focus::Autocomplete(0) if !down => Focus::SearchField,
            Focus::Autocomplete(idx) => Focus::Autocomplete(step(idx, down)),
            Focus::HistoryText(idx) => Focus::HistoryText(step(idx, down)),
            Focus::HistoryRemove(idx) => Focus::HistoryRemove(step(idx, down)),
            other => other,
        };
        if self.state.focus_order().contains(&next) {
            self.focus(next);
        }
    }

    /// Enter: activates whatever control has focus.
    pub fn activate(&mut self, now: Instant) {
        match self.state.focus {
            Focus::SearchField => {}
            Focus::Autocomplete(idx) => self.select_candidate(idx, now),
            Focus::HistoryText(idx) => self.replay_history(idx, now),
            Focus::HistoryRemove(idx) => self.remove_history(idx),
            Focus::ClearHistory => self.clear_history(),
        }
    }

    fn send(&mut self, cmd: ProviderCommand, what: &str) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log(format!("[INFO] {what} unavailable"));
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log(format!("[WARN] {what} request failed"));
        }
    }
}

fn step(idx: usize, down: bool) -> usize {
    if down { idx + 1 } else { idx.saturating_sub(1) }
}
