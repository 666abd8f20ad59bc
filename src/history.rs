use chrono::{DateTime, Local};

use crate::state::Team;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub team: Team,
    pub last_searched_at: DateTime<Local>,
}

impl HistoryEntry {
    pub fn timestamp_label(&self) -> String {
        format_timestamp(&self.last_searched_at)
    }
}

/// Previously selected teams, most recent first, at most one entry per team id.
#[derive(Debug, Clone, Default)]
pub struct HistoryList {
    entries: Vec<HistoryEntry>,
    visible: bool,
}

impl HistoryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new entry at the front, or moves the existing one there and
    /// refreshes its timestamp.
    pub fn record_selection(&mut self, team: &Team, at: DateTime<Local>) {
        match self.position(&team.id) {
            Some(idx) => {
                let mut entry = self.entries.remove(idx);
                entry.last_searched_at = at;
                self.entries.insert(0, entry);
            }
            None => self.entries.insert(
                0,
                HistoryEntry {
                    team: team.clone(),
                    last_searched_at: at,
                },
            ),
        }
        self.visible = true;
    }

    pub fn remove(&mut self, index: usize) -> Option<HistoryEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Empties and hides the list. The next recorded selection shows it again.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.visible = false;
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self, team_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.team.id == team_id)
    }
}

/// `YYYY-MM-DD, HH:MM`, 24-hour local time.
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d, %H:%M").to_string()
}
