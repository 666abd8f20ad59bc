use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::error::FetchResult;
use crate::history::HistoryList;
use crate::render::{AutocompleteRegion, ResultsRegion};
use crate::sanitize::InvalidInput;

pub const DEFAULT_PLACEHOLDER: &str = "Type your search here";
const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub sport: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Player {
    pub name: String,
    pub number: Option<String>,
    pub nationality: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Typing,
    Invalid,
    Suggesting,
    Selected,
}

/// The control that currently has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    SearchField,
    Autocomplete(usize),
    HistoryText(usize),
    HistoryRemove(usize),
    ClearHistory,
}

/// Per-kind request counter. Responses are only rendered when newer than the
/// last one rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSeq {
    issued: u64,
    rendered: u64,
}

impl RequestSeq {
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn accept(&mut self, seq: u64) -> bool {
        if seq <= self.rendered || seq > self.issued {
            return false;
        }
        self.rendered = seq;
        true
    }

    pub fn latest_issued(&self) -> u64 {
        self.issued
    }

    pub fn latest_rendered(&self) -> u64 {
        self.rendered
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    pub input: String,
    pub term: Option<Result<String, InvalidInput>>,
    pub selected: Option<Team>,
    pub roster: Option<Vec<Player>>,
    pub phase: Phase,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub session: SearchSession,
    pub history: HistoryList,
    pub autocomplete: AutocompleteRegion,
    pub results: ResultsRegion,
    pub placeholder: String,
    pub focus: Focus,
    /// Team id of the hovered history row; follows the row when it moves.
    pub hovered_history: Option<String>,
    pub team_requests: RequestSeq,
    pub roster_requests: RequestSeq,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: SearchSession::default(),
            history: HistoryList::new(),
            autocomplete: AutocompleteRegion::default(),
            results: ResultsRegion::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            focus: Focus::SearchField,
            hovered_history: None,
            team_requests: RequestSeq::default(),
            roster_requests: RequestSeq::default(),
            logs: VecDeque::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Current row of the hovered history entry.
    pub fn hovered_history_row(&self) -> Option<usize> {
        self.hovered_history
            .as_deref()
            .and_then(|id| self.history.position(id))
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Focusable controls in tab order.
    pub fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::SearchField];
        if self.autocomplete.is_visible() {
            order.extend(
                self.autocomplete
                    .rows()
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| row.is_selectable())
                    .map(|(idx, _)| Focus::Autocomplete(idx)),
            );
        }
        if self.history.is_visible() {
            for idx in 0..self.history.len() {
                order.push(Focus::HistoryText(idx));
                order.push(Focus::HistoryRemove(idx));
            }
            order.push(Focus::ClearHistory);
        }
        order
    }

    /// Drops focus back to the field if the focused control no longer exists.
    pub fn normalize_focus(&mut self) {
        if !self.focus_order().contains(&self.focus) {
            self.focus = Focus::SearchField;
        }
    }
}

#[derive(Debug)]
pub enum Delta {
    TeamsLoaded {
        seq: u64,
        query: String,
        result: FetchResult<Vec<Team>>,
    },
    RosterLoaded {
        seq: u64,
        team: Team,
        result: FetchResult<Vec<Player>>,
    },
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    SearchTeams { seq: u64, term: String },
    SearchPlayers { seq: u64, team: Team },
}

pub fn apply_delta(state: &mut AppState, delta: Delta, now: DateTime<Local>) {
    match delta {
        Delta::TeamsLoaded { seq, query, result } => {
            // A selection or a cleared field already closed the suggestion list.
            if state.session.phase != Phase::Suggesting {
                state.push_log(format!("[INFO] Dropped team results for \"{query}\""));
                return;
            }
            if !state.team_requests.accept(seq) {
                state.push_log(format!("[INFO] Dropped stale team results for \"{query}\""));
                return;
            }
            match result {
                Ok(teams) => {
                    state.autocomplete.render(&teams, &query);
                }
                Err(err) => {
                    state.autocomplete.render_failed();
                    state.push_log(format!("[WARN] Team search failed: {err}"));
                }
            }
            state.normalize_focus();
        }
        Delta::RosterLoaded { seq, team, result } => {
            if !state.roster_requests.accept(seq) {
                state.push_log(format!("[INFO] Dropped stale roster for {}", team.name));
                return;
            }
            state.results.render_title(&team);
            match result {
                Ok(players) => {
                    state.history.record_selection(&team, now);
                    state.results.render_roster(&players);
                    state.push_log(format!(
                        "[INFO] {} players for {}",
                        players.len(),
                        team.name
                    ));
                    state.session.roster = Some(players);
                }
                Err(err) => {
                    state.results.render_failed();
                    state.session.roster = None;
                    state.push_log(format!("[WARN] Player search failed: {err}"));
                }
            }
            if state.session.phase == Phase::Selected {
                state.session.phase = Phase::Idle;
            }
        }
        Delta::Log(line) => state.push_log(line),
    }
}
