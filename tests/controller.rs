use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, TimeZone};

use teamsearch_terminal::controller::Controller;
use teamsearch_terminal::error::FetchError;
use teamsearch_terminal::render::{AutocompleteRow, INVALID_INPUT_TEXT, NO_RESULTS_TEXT, SEARCH_FAILED_TEXT};
use teamsearch_terminal::state::{
    DEFAULT_PLACEHOLDER, Delta, Focus, Phase, Player, ProviderCommand, Team,
};

const DEBOUNCE: Duration = Duration::from_millis(250);

fn team(id: &str, name: &str) -> Team {
    Team {
        id: id.to_string(),
        name: name.to_string(),
        sport: "Soccer".to_string(),
    }
}

fn wall(minute: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 5, 2, 12, minute, 0)
        .single()
        .expect("unambiguous local time")
}

fn parse_error() -> FetchError {
    FetchError::Parse(serde_json::from_str::<serde_json::Value>("{").unwrap_err())
}

fn setup() -> (Controller, Receiver<ProviderCommand>, Instant) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    (Controller::new(DEBOUNCE, Some(cmd_tx)), cmd_rx, Instant::now())
}

fn type_text(controller: &mut Controller, text: &str, start: Instant) -> Instant {
    let mut now = start;
    for c in text.chars() {
        controller.type_char(c, now);
        now += Duration::from_millis(40);
    }
    now
}

/// Types `text`, lets the debounce settle, and returns the issued team search.
fn search(controller: &mut Controller, rx: &Receiver<ProviderCommand>, text: &str, start: Instant) -> (u64, String, Instant) {
    let now = type_text(controller, text, start) + DEBOUNCE;
    controller.tick(now);
    match rx.try_recv().expect("team search issued") {
        ProviderCommand::SearchTeams { seq, term } => (seq, term, now),
        other => panic!("unexpected command {other:?}"),
    }
}

fn suggest(controller: &mut Controller, seq: u64, query: &str, teams: Vec<Team>) {
    controller.apply(
        Delta::TeamsLoaded {
            seq,
            query: query.to_string(),
            result: Ok(teams),
        },
        wall(0),
    );
}

fn select(controller: &mut Controller, rx: &Receiver<ProviderCommand>, index: usize, now: Instant) -> (u64, Team) {
    controller.select_candidate(index, now);
    match rx.try_recv().expect("player search issued") {
        ProviderCommand::SearchPlayers { seq, team } => (seq, team),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn typing_burst_issues_one_search_after_the_pause() {
    let (mut controller, rx, t0) = setup();
    let last = type_text(&mut controller, "ars", t0) - Duration::from_millis(40);
    assert_eq!(controller.state.phase(), Phase::Typing);

    controller.tick(last + DEBOUNCE - Duration::from_millis(1));
    assert!(rx.try_recv().is_err());

    controller.tick(last + DEBOUNCE);
    assert_eq!(
        rx.try_recv().unwrap(),
        ProviderCommand::SearchTeams {
            seq: 1,
            term: "ars".to_string()
        }
    );
    assert!(rx.try_recv().is_err());
    assert_eq!(controller.state.phase(), Phase::Suggesting);
}

#[test]
fn invalid_input_renders_notice_without_fetching() {
    let (mut controller, rx, t0) = setup();
    let now = type_text(&mut controller, "team!", t0);
    controller.tick(now + DEBOUNCE);

    assert!(rx.try_recv().is_err());
    assert_eq!(controller.state.phase(), Phase::Invalid);
    assert!(controller.state.autocomplete.is_visible());
    assert_eq!(
        controller.state.autocomplete.rows(),
        &[AutocompleteRow::Notice(INVALID_INPUT_TEXT.to_string())]
    );
    assert_eq!(controller.state.autocomplete.selectable_len(), 0);
}

#[test]
fn erasing_the_field_hides_the_list() {
    let (mut controller, rx, t0) = setup();
    let (seq, term, now) = search(&mut controller, &rx, "ars", t0);
    suggest(&mut controller, seq, &term, vec![team("1", "Arsenal")]);
    assert!(controller.state.autocomplete.is_visible());

    let mut now = now;
    for _ in 0..3 {
        controller.backspace(now);
        now += Duration::from_millis(10);
    }
    controller.tick(now + DEBOUNCE);

    assert!(rx.try_recv().is_err());
    assert!(!controller.state.autocomplete.is_visible());
    assert!(controller.state.autocomplete.rows().is_empty());
    assert_eq!(controller.state.phase(), Phase::Idle);
}

#[test]
fn suggestions_highlight_the_query() {
    let (mut controller, rx, t0) = setup();
    let (seq, term, _) = search(&mut controller, &rx, "ars", t0);
    suggest(&mut controller, seq, &term, vec![team("1", "Arsenal"), team("2", "Mars FC")]);

    let rows = controller.state.autocomplete.rows();
    assert_eq!(rows.len(), 2);
    match &rows[1] {
        AutocompleteRow::Team { team, label, sport_class } => {
            assert_eq!(team.id, "2");
            assert_eq!(label.before, "M");
            assert_eq!(label.matched, "ars");
            assert_eq!(label.after, " FC");
            assert_eq!(sport_class, "icon-sports--soccer");
        }
        other => panic!("expected team row, got {other:?}"),
    }
}

#[test]
fn empty_team_result_shows_an_empty_visible_list() {
    let (mut controller, rx, t0) = setup();
    let (seq, term, _) = search(&mut controller, &rx, "zzz", t0);
    suggest(&mut controller, seq, &term, Vec::new());
    assert!(controller.state.autocomplete.is_visible());
    assert!(controller.state.autocomplete.rows().is_empty());
}

#[test]
fn selection_renders_results_and_history() {
    let (mut controller, rx, t0) = setup();
    let (seq, term, now) = search(&mut controller, &rx, "ars", t0);
    suggest(&mut controller, seq, &term, vec![team("1", "Arsenal")]);

    let (roster_seq, selected) = select(&mut controller, &rx, 0, now);
    assert_eq!(selected.name, "Arsenal");
    assert_eq!(controller.input(), "");
    assert!(!controller.state.autocomplete.is_visible());
    assert_eq!(controller.state.phase(), Phase::Selected);

    let players = vec![
        Player {
            name: "A. Smith".to_string(),
            number: Some("9".to_string()),
            position: Some("Forward".to_string()),
            ..Player::default()
        },
        Player {
            name: "B. Jones".to_string(),
            ..Player::default()
        },
    ];
    controller.apply(
        Delta::RosterLoaded {
            seq: roster_seq,
            team: selected,
            result: Ok(players),
        },
        wall(7),
    );

    assert_eq!(controller.state.phase(), Phase::Idle);
    assert_eq!(controller.state.results.title(), Some("Results for: Arsenal"));
    assert_eq!(controller.state.results.cards().count(), 2);
    assert!(controller.state.results.is_visible());
    assert_eq!(controller.state.history.len(), 1);
    assert_eq!(controller.state.history.entries()[0].last_searched_at, wall(7));
}

#[test]
fn empty_roster_shows_single_notice() {
    let (mut controller, rx, t0) = setup();
    let (seq, term, now) = search(&mut controller, &rx, "ars", t0);
    suggest(&mut controller, seq, &term, vec![team("1", "Arsenal")]);
    let (roster_seq, selected) = select(&mut controller, &rx, 0, now);

    controller.apply(
        Delta::RosterLoaded {
            seq: roster_seq,
            team: selected,
            result: Ok(Vec::new()),
        },
        wall(1),
    );

    assert_eq!(controller.state.results.cards().count(), 0);
    assert_eq!(controller.state.results.notices().collect::<Vec<_>>(), vec![NO_RESULTS_TEXT]);
    assert!(controller.state.results.is_visible());
    assert_eq!(controller.state.history.len(), 1);
}

#[test]
fn failed_roster_is_not_treated_as_empty() {
    let (mut controller, rx, t0) = setup();
    let (seq, term, now) = search(&mut controller, &rx, "ars", t0);
    suggest(&mut controller, seq, &term, vec![team("1", "Arsenal")]);
    let (roster_seq, selected) = select(&mut controller, &rx, 0, now);

    controller.apply(
        Delta::RosterLoaded {
            seq: roster_seq,
            team: selected,
            result: Err(parse_error()),
        },
        wall(1),
    );

    assert_eq!(controller.state.results.notices().collect::<Vec<_>>(), vec![SEARCH_FAILED_TEXT]);
    assert!(controller.state.history.is_empty());
    assert!(controller.state.logs.iter().any(|l| l.starts_with("[WARN] Player search failed")));
    assert_eq!(controller.state.phase(), Phase::Idle);
}

#[test]
fn failed_team_search_shows_failure_row() {
    let (mut controller, rx, t0) = setup();
    let (seq, term, _) = search(&mut controller, &rx, "ars", t0);
    controller.apply(
        Delta::TeamsLoaded {
            seq,
            query: term,
            result: Err(parse_error()),
        },
        wall(0),
    );
    assert_eq!(
        controller.state.autocomplete.rows(),
        &[AutocompleteRow::Notice(SEARCH_FAILED_TEXT.to_string())]
    );
}

#[test]
fn older_team_response_is_dropped_after_newer_one_rendered() {
    let (mut controller, rx, t0) = setup();
    let (first, _, now) = search(&mut controller, &rx, "ar", t0);
    let (second, _, _) = search(&mut controller, &rx, "s", now);
    assert!(second > first);

    suggest(&mut controller, second, "ars", vec![team("1", "Arsenal")]);
    suggest(&mut controller, first, "ar", vec![team("9", "Arbroath")]);

    let ids: Vec<&str> = controller
        .state
        .autocomplete
        .rows()
        .iter()
        .filter_map(|r| r.team())
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(ids, vec!["1"]);
    assert!(controller.state.logs.iter().any(|l| l.contains("stale team results")));
}

#[test]
fn older_roster_is_dropped_when_selections_race() {
    let (mut controller, rx, t0) = setup();
    let (seq, term, now) = search(&mut controller, &rx, "e", t0);
    suggest(&mut controller, seq, &term, vec![team("1", "Everton"), team("2", "Leeds")]);
    let (first_seq, first) = select(&mut controller, &rx, 0, now);

    let (seq, term, now) = search(&mut controller, &rx, "le", now);
    suggest(&mut controller, seq, &term, vec![team("2", "Leeds")]);
    let (second_seq, second) = select(&mut controller, &rx, 0, now);

    controller.apply(
        Delta::RosterLoaded { seq: second_seq, team: second, result: Ok(Vec::new()) },
        wall(2),
    );
    controller.apply(
        Delta::RosterLoaded { seq: first_seq, team: first, result: Ok(Vec::new()) },
        wall(3),
    );

    assert_eq!(controller.state.results.title(), Some("Results for: Leeds"));
    assert_eq!(controller.state.history.len(), 1);
}

#[test]
fn team_results_after_selection_do_not_reopen_list() {
    let (mut controller, rx, t0) = setup();
    let (seq, term, now) = search(&mut controller, &rx, "ars", t0);
    suggest(&mut controller, seq, &term, vec![team("1", "Arsenal")]);

    // A second lookup is in flight when the user picks a row.
    let (late_seq, late_term, now) = search(&mut controller, &rx, "e", now);
    select(&mut controller, &rx, 0, now);
    suggest(&mut controller, late_seq, &late_term, vec![team("5", "Arsenal Tula")]);

    assert!(!controller.state.autocomplete.is_visible());
    assert!(controller.state.autocomplete.rows().is_empty());
}

#[test]
fn pending_keystroke_does_not_reopen_list_after_selection() {
    let (mut controller, rx, t0) = setup();
    let (seq, term, now) = search(&mut controller, &rx, "ars", t0);
    suggest(&mut controller, seq, &term, vec![team("1", "Arsenal")]);

    controller.type_char('e', now);
    select(&mut controller, &rx, 0, now);
    controller.tick(now + DEBOUNCE * 2);

    assert!(rx.try_recv().is_err());
    assert!(!controller.state.autocomplete.is_visible());
    assert_eq!(controller.state.phase(), Phase::Selected);
}

#[test]
fn clear_then_reselect_builds_fresh_entry() {
    let (mut controller, rx, t0) = setup();
    let (seq, term, now) = search(&mut controller, &rx, "ars", t0);
    suggest(&mut controller, seq, &term, vec![team("1", "Arsenal")]);
    let (roster_seq, selected) = select(&mut controller, &rx, 0, now);
    controller.apply(
        Delta::RosterLoaded { seq: roster_seq, team: selected, result: Ok(Vec::new()) },
        wall(1),
    );

    controller.clear_history();
    assert!(controller.state.history.is_empty());
    assert!(!controller.state.history.is_visible());

    let (seq, term, now) = search(&mut controller, &rx, "ars", now);
    suggest(&mut controller, seq, &term, vec![team("1", "Arsenal")]);
    let (roster_seq, selected) = select(&mut controller, &rx, 0, now);
    controller.apply(
        Delta::RosterLoaded { seq: roster_seq, team: selected, result: Ok(Vec::new()) },
        wall(9),
    );

    assert_eq!(controller.state.history.len(), 1);
    assert!(controller.state.history.is_visible());
    assert_eq!(controller.state.history.entries()[0].last_searched_at, wall(9));
}

fn with_history(names: &[(&str, &str)]) -> (Controller, Receiver<ProviderCommand>, Instant) {
    let (mut controller, rx, mut now) = setup();
    for (minute, (id, name)) in names.iter().enumerate() {
        let (seq, term, later) = search(&mut controller, &rx, name, now);
        suggest(&mut controller, seq, &term, vec![team(id, name)]);
        let (roster_seq, selected) = select(&mut controller, &rx, 0, later);
        controller.apply(
            Delta::RosterLoaded { seq: roster_seq, team: selected, result: Ok(Vec::new()) },
            wall(minute as u32),
        );
        now = later;
    }
    (controller, rx, now)
}

#[test]
fn hover_swaps_placeholder_and_reverts() {
    let (mut controller, _rx, _) = with_history(&[("1", "Arsenal"), ("2", "Chelsea")]);
    controller.hover_history(Some(1));
    assert_eq!(controller.state.placeholder, "Arsenal");
    controller.hover_history(None);
    assert_eq!(controller.state.placeholder, DEFAULT_PLACEHOLDER);
}

#[test]
fn hover_follows_the_entry_when_it_moves_to_the_front() {
    let (mut controller, rx, now) = with_history(&[("1", "Arsenal"), ("2", "Chelsea")]);
    controller.hover_history(Some(1));
    assert_eq!(controller.state.hovered_history_row(), Some(1));

    let (seq, term, later) = search(&mut controller, &rx, "Arsenal", now);
    suggest(&mut controller, seq, &term, vec![team("1", "Arsenal")]);
    let (roster_seq, selected) = select(&mut controller, &rx, 0, later);
    controller.apply(
        Delta::RosterLoaded { seq: roster_seq, team: selected, result: Ok(Vec::new()) },
        wall(5),
    );

    assert_eq!(controller.state.history.get(0).map(|e| e.team.name.as_str()), Some("Arsenal"));
    assert_eq!(controller.state.hovered_history.as_deref(), Some("1"));
    assert_eq!(controller.state.hovered_history_row(), Some(0));
    assert_eq!(controller.state.placeholder, "Arsenal");
}

#[test]
fn history_click_replays_the_search() {
    let (mut controller, rx, now) = with_history(&[("1", "Arsenal"), ("2", "Chelsea")]);
    controller.replay_history(1, now);
    assert_eq!(controller.input(), "Arsenal");
    assert_eq!(controller.state.phase(), Phase::Typing);

    controller.tick(now + DEBOUNCE);
    assert_eq!(
        rx.try_recv().unwrap(),
        ProviderCommand::SearchTeams {
            seq: 3,
            term: "Arsenal".to_string()
        }
    );
}

#[test]
fn enter_activates_the_focused_control() {
    let (mut controller, rx, now) = with_history(&[("1", "Arsenal"), ("2", "Chelsea")]);
    assert_eq!(
        controller.state.focus_order(),
        vec![
            Focus::SearchField,
            Focus::HistoryText(0),
            Focus::HistoryRemove(0),
            Focus::HistoryText(1),
            Focus::HistoryRemove(1),
            Focus::ClearHistory,
        ]
    );

    controller.focus_next();
    controller.focus_next();
    assert_eq!(controller.state.focus, Focus::HistoryRemove(0));
    controller.activate(now);
    assert_eq!(controller.state.history.len(), 1);
    assert_eq!(controller.state.history.entries()[0].team.name, "Arsenal");
    assert_eq!(controller.state.focus, Focus::SearchField);

    controller.focus_prev();
    assert_eq!(controller.state.focus, Focus::ClearHistory);
    controller.activate(now);
    assert!(controller.state.history.is_empty());
    assert!(rx.try_recv().is_err());
}

#[test]
fn keyboard_selects_a_candidate() {
    let (mut controller, rx, t0) = setup();
    let (seq, term, now) = search(&mut controller, &rx, "ars", t0);
    suggest(&mut controller, seq, &term, vec![team("1", "Arsenal"), team("2", "Arsenal Tula")]);

    controller.move_focus(true);
    controller.move_focus(true);
    assert_eq!(controller.state.focus, Focus::Autocomplete(1));
    controller.activate(now);

    match rx.try_recv().unwrap() {
        ProviderCommand::SearchPlayers { team, .. } => assert_eq!(team.name, "Arsenal Tula"),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn click_outside_hides_and_refocus_reveals() {
    let (mut controller, rx, t0) = setup();
    let (seq, term, _) = search(&mut controller, &rx, "ars", t0);
    suggest(&mut controller, seq, &term, vec![team("1", "Arsenal")]);

    controller.click_outside();
    assert!(!controller.state.autocomplete.is_visible());
    assert_eq!(controller.input(), "ars");

    controller.focus(Focus::SearchField);
    assert!(controller.state.autocomplete.is_visible());
    assert_eq!(controller.state.autocomplete.rows().len(), 1);
}

#[test]
fn missing_provider_is_logged() {
    let mut controller = Controller::new(DEBOUNCE, None);
    let t0 = Instant::now();
    controller.on_input("ars".to_string(), t0);
    controller.tick(t0 + DEBOUNCE);
    assert!(controller.state.logs.iter().any(|l| l == "[INFO] Team search unavailable"));
}

#[test]
fn results_scroll_is_clamped_and_reset_by_the_next_roster() {
    let (mut controller, rx, now) = setup();
    let (seq, term, later) = search(&mut controller, &rx, "Arsenal", now);
    suggest(&mut controller, seq, &term, vec![team("1", "Arsenal")]);
    let (roster_seq, selected) = select(&mut controller, &rx, 0, later);
    let players = (0..30)
        .map(|n| Player { name: format!("Player {n}"), ..Player::default() })
        .collect();
    controller.apply(
        Delta::RosterLoaded { seq: roster_seq, team: selected, result: Ok(players) },
        wall(1),
    );

    controller.scroll_results(20, 12);
    assert_eq!(controller.state.results.scroll(), 12);
    controller.scroll_results(-5, 12);
    assert_eq!(controller.state.results.scroll(), 7);

    controller.replay_history(0, later);
    let settle = later + DEBOUNCE;
    controller.tick(settle);
    let seq = match rx.try_recv().expect("team search issued") {
        ProviderCommand::SearchTeams { seq, .. } => seq,
        other => panic!("unexpected command {other:?}"),
    };
    suggest(&mut controller, seq, "Arsenal", vec![team("1", "Arsenal")]);
    let (roster_seq, selected) = select(&mut controller, &rx, 0, settle);
    controller.apply(
        Delta::RosterLoaded { seq: roster_seq, team: selected, result: Ok(Vec::new()) },
        wall(2),
    );
    assert_eq!(controller.state.results.scroll(), 0);
}
