use std::time::Duration;

use once_cell::sync::OnceCell;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::DEFAULT_BASE_URL;
use crate::error::{FetchError, FetchResult};
use crate::http_client::build_client;
use crate::state::{Player, Team};

const TEAMS_PATH: &str = "searchteams.php?t=";
const PLAYERS_PATH: &str = "searchplayers.php?t=";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Teams,
    Players,
}

impl SearchKind {
    fn path(self) -> &'static str {
        match self {
            SearchKind::Teams => TEAMS_PATH,
            SearchKind::Players => PLAYERS_PATH,
        }
    }
}

/// The two read-only lookups the search box needs.
pub trait SportsApi: Send + Sync {
    fn search_teams(&self, term: &str) -> FetchResult<Vec<Team>>;

    /// Players of one team, looked up by the team's display name.
    fn search_players(&self, team_name: &str) -> FetchResult<Vec<Player>>;
}

pub fn build_search_url(base_url: &str, kind: SearchKind, term: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let encoded = utf8_percent_encode(term, NON_ALPHANUMERIC);
    format!("{base}/{}{encoded}", kind.path())
}

/// TheSportsDB lookups over one lazily built HTTP client.
#[derive(Debug, Clone)]
pub struct SportsDbClient {
    base_url: String,
    timeout: Duration,
    client: OnceCell<Client>,
}

impl Default for SportsDbClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(10))
    }
}

impl SportsDbClient {
    /// Each client owns its HTTP client, built on first use with `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            client: OnceCell::new(),
        }
    }

    /// Uses a prebuilt client; its own timeout applies.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::ZERO,
            client: OnceCell::with_value(client),
        }
    }

    fn client(&self) -> FetchResult<&Client> {
        self.client.get_or_try_init(|| build_client(self.timeout))
    }

    fn fetch_body(&self, kind: SearchKind, term: &str) -> FetchResult<String> {
        let client = self.client()?;
        let url = build_search_url(&self.base_url, kind, term);
        let resp = client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }
        resp.text().map_err(|source| FetchError::Body { url, source })
    }
}

impl SportsApi for SportsDbClient {
    fn search_teams(&self, term: &str) -> FetchResult<Vec<Team>> {
        let body = self.fetch_body(SearchKind::Teams, term)?;
        parse_teams_json(&body)
    }

    fn search_players(&self, team_name: &str) -> FetchResult<Vec<Player>> {
        let body = self.fetch_body(SearchKind::Players, team_name)?;
        parse_players_json(&body)
    }
}

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    // `null` and a missing key both mean "no matches".
    #[serde(default)]
    teams: Option<Vec<TeamRecord>>,
}

#[derive(Debug, Deserialize)]
struct TeamRecord {
    #[serde(rename = "idTeam")]
    id: String,
    #[serde(rename = "strTeam")]
    name: String,
    #[serde(rename = "strSport", default)]
    sport: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlayersResponse {
    #[serde(default)]
    player: Option<Vec<PlayerRecord>>,
}

#[derive(Debug, Deserialize)]
struct PlayerRecord {
    #[serde(rename = "strPlayer")]
    name: String,
    #[serde(rename = "strNumber", default)]
    number: Option<String>,
    #[serde(rename = "strNationality", default)]
    nationality: Option<String>,
    #[serde(rename = "strPosition", default)]
    position: Option<String>,
    #[serde(rename = "strTeam", default)]
    team: Option<String>,
    #[serde(rename = "strThumb", default)]
    thumb: Option<String>,
}

pub fn parse_teams_json(raw: &str) -> FetchResult<Vec<Team>> {
    let data: TeamsResponse = serde_json::from_str(raw)?;
    Ok(data
        .teams
        .unwrap_or_default()
        .into_iter()
        .map(|t| Team {
            id: t.id,
            name: t.name,
            sport: t.sport.unwrap_or_default(),
        })
        .collect())
}

pub fn parse_players_json(raw: &str) -> FetchResult<Vec<Player>> {
    let data: PlayersResponse = serde_json::from_str(raw)?;
    Ok(data
        .player
        .unwrap_or_default()
        .into_iter()
        .map(|p| Player {
            name: p.name,
            number: non_empty(p.number),
            nationality: non_empty(p.nationality),
            position: non_empty(p.position),
            team: non_empty(p.team),
            thumbnail_url: non_empty(p.thumb),
        })
        .collect())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
