//! Render regions.
//!
//! Each region is a plain model that the renderer functions rewrite in full
//! and that `ui::draw` turns into widgets. Nothing here touches the terminal,
//! so tests can assert on what would be shown.

use crate::state::{Player, Team};

pub const INVALID_INPUT_TEXT: &str = "Invalid input";
pub const SEARCH_FAILED_TEXT: &str = "Search failed";
pub const NO_RESULTS_TEXT: &str = "No results found for your search..";
pub const PLACEHOLDER_PORTRAIT: &str = "img/icons/avatar-player.svg";

/// Team name split around the first case-insensitive occurrence of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    pub before: String,
    pub matched: String,
    pub after: String,
}

impl Highlighted {
    pub fn plain(&self) -> String {
        format!("{}{}{}", self.before, self.matched, self.after)
    }
}

pub fn highlight(name: &str, query: &str) -> Highlighted {
    let unmatched = || Highlighted {
        before: name.to_string(),
        matched: String::new(),
        after: String::new(),
    };
    let needle = query.as_bytes();
    // Only ASCII queries get past the sanitizer; slicing on an ASCII match
    // always lands on char boundaries.
    if needle.is_empty() || !query.is_ascii() || needle.len() > name.len() {
        return unmatched();
    }
    let hay = name.as_bytes();
    let start = (0..=hay.len() - needle.len())
        .find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle));
    match start {
        Some(i) => {
            let end = i + needle.len();
            Highlighted {
                before: name[..i].to_string(),
                matched: name[i..end].to_string(),
                after: name[end..].to_string(),
            }
        }
        None => unmatched(),
    }
}

/// `icon-sports--{sport}` style slug: lowercased, spaces as dashes.
pub fn sport_slug(sport: &str) -> String {
    sport.trim().to_lowercase().replace(' ', "-")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteRow {
    Team {
        team: Team,
        label: Highlighted,
        sport_class: String,
    },
    Notice(String),
}

impl AutocompleteRow {
    pub fn team(&self) -> Option<&Team> {
        match self {
            AutocompleteRow::Team { team, .. } => Some(team),
            AutocompleteRow::Notice(_) => None,
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.team().is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AutocompleteRegion {
    rows: Vec<AutocompleteRow>,
    visible: bool,
}

impl AutocompleteRegion {
    pub fn render(&mut self, matches: &[Team], query: &str) {
        self.clear();
        self.rows = matches
            .iter()
            .map(|team| AutocompleteRow::Team {
                team: team.clone(),
                label: highlight(&team.name, query),
                sport_class: format!("icon-sports--{}", sport_slug(&team.sport)),
            })
            .collect();
        self.visible = true;
    }

    pub fn render_invalid(&mut self) {
        self.render_notice(INVALID_INPUT_TEXT);
    }

    pub fn render_failed(&mut self) {
        self.render_notice(SEARCH_FAILED_TEXT);
    }

    fn render_notice(&mut self, text: &str) {
        self.clear();
        self.rows.push(AutocompleteRow::Notice(text.to_string()));
        self.visible = true;
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn rows(&self) -> &[AutocompleteRow] {
        &self.rows
    }

    pub fn selectable_len(&self) -> usize {
        self.rows.iter().filter(|r| r.is_selectable()).count()
    }

    pub fn team_at(&self, index: usize) -> Option<&Team> {
        self.rows.get(index).and_then(AutocompleteRow::team)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCard {
    pub name: String,
    pub portrait: String,
    pub portrait_alt: String,
    pub attributes: Vec<(&'static str, String)>,
}

impl PlayerCard {
    pub fn from_player(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            portrait: player
                .thumbnail_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_PORTRAIT.to_string()),
            portrait_alt: format!("Portrait of {}", player.name),
            attributes: player_attributes(player),
        }
    }

    pub fn has_placeholder_portrait(&self) -> bool {
        self.portrait == PLACEHOLDER_PORTRAIT
    }
}

/// Labelled attributes in display order, absent values dropped.
pub fn player_attributes(player: &Player) -> Vec<(&'static str, String)> {
    [
        ("Number", &player.number),
        ("Nationality", &player.nationality),
        ("Position", &player.position),
        ("Team", &player.team),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| (label, v.to_string()))
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultItem {
    Card(PlayerCard),
    Notice(String),
}

#[derive(Debug, Clone, Default)]
pub struct ResultsRegion {
    title: Option<String>,
    items: Vec<ResultItem>,
    visible: bool,
    /// First drawn line; every render starts back at the top.
    scroll: usize,
}

impl ResultsRegion {
    pub fn render_title(&mut self, team: &Team) {
        self.title = Some(format!("Results for: {}", team.name));
        self.scroll = 0;
    }

    pub fn render_roster(&mut self, players: &[Player]) {
        if players.is_empty() {
            self.render_empty();
            return;
        }
        self.items = players
            .iter()
            .map(|p| ResultItem::Card(PlayerCard::from_player(p)))
            .collect();
        self.visible = true;
        self.scroll = 0;
    }

    pub fn render_empty(&mut self) {
        self.render_notice(NO_RESULTS_TEXT);
    }

    pub fn render_failed(&mut self) {
        self.render_notice(SEARCH_FAILED_TEXT);
    }

    fn render_notice(&mut self, text: &str) {
        self.items = vec![ResultItem::Notice(text.to_string())];
        self.visible = true;
        self.scroll = 0;
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Moves the first drawn line by `lines`, kept within `0..=max`.
    pub fn scroll_by(&mut self, lines: isize, max: usize) {
        self.scroll = self.scroll.saturating_add_signed(lines).min(max);
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub fn cards(&self) -> impl Iterator<Item = &PlayerCard> {
        self.items.iter().filter_map(|item| match item {
            ResultItem::Card(card) => Some(card),
            ResultItem::Notice(_) => None,
        })
    }

    pub fn notices(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            ResultItem::Notice(text) => Some(text.as_str()),
            ResultItem::Card(_) => None,
        })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
