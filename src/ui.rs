use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::render::{AutocompleteRow, ResultItem};
use crate::state::{AppState, Focus, Phase};

const AUTOCOMPLETE_HEIGHT: u16 = 10;
const REMOVE_LABEL: &str = "[x]";
const CLEAR_LABEL: &str = "[ Clear history ]";

/// Screen areas, shared by drawing and mouse hit-testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Regions {
    pub header: Rect,
    pub field: Rect,
    pub autocomplete: Rect,
    pub history: Rect,
    pub results: Rect,
    pub console: Rect,
    pub footer: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Field,
    AutocompleteRow(usize),
    HistoryText(usize),
    HistoryRemove(usize),
    ClearHistory,
    /// Inside the search box but not on a control.
    SearchBox,
    /// The results pane; outside the search box, but wheel events scroll it.
    Results,
    Outside,
}

pub fn layout(area: Rect) -> Regions {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(AUTOCOMPLETE_HEIGHT),
            Constraint::Min(1),
        ])
        .split(columns[0]);

    Regions {
        header: rows[0],
        field: left[0],
        autocomplete: left[1],
        history: left[2],
        results: columns[1],
        console: rows[2],
        footer: rows[3],
    }
}

fn inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x && col < area.x + area.width && row >= area.y && row < area.y + area.height
}

pub fn hit_test(regions: &Regions, state: &AppState, col: u16, row: u16) -> Hit {
    if contains(regions.field, col, row) {
        return Hit::Field;
    }
    if contains(regions.autocomplete, col, row) {
        let list = inner(regions.autocomplete);
        if state.autocomplete.is_visible() && contains(list, col, row) {
            let (start, _) = autocomplete_window(state, list.height);
            let idx = start + (row - list.y) as usize;
            if state.autocomplete.team_at(idx).is_some() {
                return Hit::AutocompleteRow(idx);
            }
        }
        return Hit::SearchBox;
    }
    if state.history.is_visible() && contains(regions.history, col, row) {
        let list = inner(regions.history);
        if contains(list, col, row) {
            let idx = (row - list.y) as usize;
            let shown = history_rows_shown(state, list);
            if idx < shown {
                let remove_x = list.x + list.width.saturating_sub(REMOVE_LABEL.len() as u16);
                return if col >= remove_x {
                    Hit::HistoryRemove(idx)
                } else {
                    Hit::HistoryText(idx)
                };
            }
            if idx == shown && col < list.x + CLEAR_LABEL.len() as u16 {
                return Hit::ClearHistory;
            }
        }
    }
    if contains(regions.results, col, row) {
        return Hit::Results;
    }
    Hit::Outside
}

fn history_rows_shown(state: &AppState, list: Rect) -> usize {
    // One line is kept for the clear control.
    state
        .history
        .len()
        .min(list.height.saturating_sub(1) as usize)
}

pub fn draw(frame: &mut Frame, state: &AppState) -> Regions {
    let regions = layout(frame.size());

    let header = Paragraph::new(header_text(state))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, regions.header);

    render_field(frame, regions.field, state);
    if state.autocomplete.is_visible() {
        render_autocomplete(frame, regions.autocomplete, state);
    }
    if state.history.is_visible() {
        render_history(frame, regions.history, state);
    }
    render_results(frame, regions.results, state);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, regions.console);

    let footer = Paragraph::new(footer_text())
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, regions.footer);

    regions
}

fn header_text(state: &AppState) -> String {
    format!("TEAM SEARCH | {}", phase_label(state.phase()))
}

fn footer_text() -> &'static str {
    "Type to search | Tab/Shift-Tab Focus | ↑/↓ Move | Enter Activate | Esc Close list | PgUp/PgDn Results | Ctrl-C Quit"
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "IDLE",
        Phase::Typing => "TYPING",
        Phase::Invalid => "INVALID",
        Phase::Suggesting => "SUGGESTING",
        Phase::Selected => "LOADING",
    }
}

fn focused_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default()
    }
}

fn render_field(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == Focus::SearchField;
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let text = if state.session.input.is_empty() {
        Line::from(Span::styled(
            state.placeholder.clone(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(state.session.input.clone())
    };
    let field = Paragraph::new(text).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(field, area);

    if focused && area.width > 2 && area.height > 2 {
        let x = area.x + 1 + (state.session.input.chars().count() as u16).min(area.width - 3);
        frame.set_cursor(x, area.y + 1);
    }
}

fn render_autocomplete(frame: &mut Frame, area: Rect, state: &AppState) {
    let (start, end) = autocomplete_window(state, inner(area).height);
    let lines: Vec<Line> = state.autocomplete.rows()[start..end]
        .iter()
        .enumerate()
        .map(|(offset, row)| {
            autocomplete_line(row, state.focus == Focus::Autocomplete(start + offset))
        })
        .collect();
    let list = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(list, area);
}

/// Rows of the autocomplete list that fit, keeping the focused row in view.
fn autocomplete_window(state: &AppState, height: u16) -> (usize, usize) {
    let total = state.autocomplete.rows().len();
    let visible = height as usize;
    let focused = match state.focus {
        Focus::Autocomplete(idx) => idx,
        _ => 0,
    };
    visible_range(focused, total, visible)
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn autocomplete_line(row: &AutocompleteRow, focused: bool) -> Line<'static> {
    match row {
        AutocompleteRow::Team {
            label, sport_class, ..
        } => {
            let base = focused_style(focused);
            let slug = sport_class.trim_start_matches("icon-sports--");
            Line::from(vec![
                Span::styled(
                    format!("{:<4}", sport_tag(slug)),
                    base.fg(sport_color(slug)),
                ),
                Span::styled(label.before.clone(), base),
                Span::styled(label.matched.clone(), base.add_modifier(Modifier::BOLD)),
                Span::styled(label.after.clone(), base),
            ])
        }
        AutocompleteRow::Notice(text) => Line::from(Span::styled(
            text.clone(),
            Style::default().fg(Color::Red),
        )),
    }
}

fn sport_tag(slug: &str) -> String {
    match slug {
        "soccer" => "SOC".to_string(),
        "basketball" => "BSK".to_string(),
        "ice-hockey" => "HKY".to_string(),
        "american-football" => "NFL".to_string(),
        "baseball" => "BSB".to_string(),
        "rugby" => "RUG".to_string(),
        "" => "---".to_string(),
        other => other.chars().take(3).collect::<String>().to_uppercase(),
    }
}

fn sport_color(slug: &str) -> Color {
    match slug {
        "soccer" => Color::Green,
        "basketball" => Color::Yellow,
        "ice-hockey" => Color::Cyan,
        "american-football" => Color::Red,
        "baseball" => Color::Blue,
        "motorsport" => Color::Magenta,
        _ => Color::Gray,
    }
}

fn render_history(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("History").borders(Borders::ALL);
    let list = block.inner(area);
    frame.render_widget(block, area);
    if list.width == 0 || list.height == 0 {
        return;
    }

    let shown = history_rows_shown(state, list);
    let hovered = state.hovered_history_row();
    for (idx, entry) in state.history.entries().iter().take(shown).enumerate() {
        let row = Rect {
            x: list.x,
            y: list.y + idx as u16,
            width: list.width,
            height: 1,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(19),
                Constraint::Length(REMOVE_LABEL.len() as u16),
            ])
            .split(row);

        let mut name_style = focused_style(state.focus == Focus::HistoryText(idx));
        if hovered == Some(idx) {
            name_style = name_style.add_modifier(Modifier::UNDERLINED);
        }
        frame.render_widget(Paragraph::new(entry.team.name.clone()).style(name_style), cols[0]);
        frame.render_widget(
            Paragraph::new(entry.timestamp_label()).style(Style::default().fg(Color::DarkGray)),
            cols[1],
        );
        frame.render_widget(
            Paragraph::new(REMOVE_LABEL)
                .style(focused_style(state.focus == Focus::HistoryRemove(idx)).fg(Color::Red)),
            cols[2],
        );
    }

    let clear = Rect {
        x: list.x,
        y: list.y + shown as u16,
        width: list.width.min(CLEAR_LABEL.len() as u16),
        height: 1,
    };
    if clear.y < list.y + list.height {
        frame.render_widget(
            Paragraph::new(CLEAR_LABEL).style(focused_style(state.focus == Focus::ClearHistory)),
            clear,
        );
    }
}

fn render_results(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = state.results.title().unwrap_or("Results").to_string();
    let block = Block::default().title(title).borders(Borders::ALL);
    if !state.results.is_visible() {
        frame.render_widget(block, area);
        return;
    }

    let list = block.inner(area);
    let lines = results_lines(state, list.width as usize);
    let max = lines.len().saturating_sub(list.height as usize);
    let start = state.results.scroll().min(max);
    let shown: Vec<Line> = lines.into_iter().skip(start).collect();
    frame.render_widget(Paragraph::new(shown).block(block), area);
}

/// Highest useful results scroll offset for the current layout.
pub fn results_max_scroll(regions: &Regions, state: &AppState) -> usize {
    let list = inner(regions.results);
    results_lines(state, list.width as usize)
        .len()
        .saturating_sub(list.height as usize)
}

/// Lines moved by one PageUp/PageDown.
pub fn results_page(regions: &Regions) -> usize {
    (inner(regions.results).height.saturating_sub(1) as usize).max(1)
}

/// Results pane content, pre-wrapped to `width` so scrolling counts real rows.
fn results_lines(state: &AppState, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for item in state.results.items() {
        match item {
            ResultItem::Card(card) => {
                lines.extend(wrapped(
                    &card.name,
                    Style::default().add_modifier(Modifier::BOLD),
                    width,
                ));
                for (label, value) in &card.attributes {
                    lines.push(Line::from(vec![
                        Span::raw(format!("  {label}: ")),
                        Span::styled(value.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    ]));
                }
                lines.extend(wrapped(
                    &format!("  {}: {}", card.portrait_alt, card.portrait),
                    Style::default().fg(Color::DarkGray),
                    width,
                ));
                lines.push(Line::from(""));
            }
            ResultItem::Notice(text) => {
                lines.extend(wrapped(text, Style::default().fg(Color::DarkGray), width));
            }
        }
    }
    lines
}

fn wrapped(text: &str, style: Style, width: usize) -> Vec<Line<'static>> {
    let chars: Vec<char> = text.chars().collect();
    if width == 0 || chars.is_empty() {
        return vec![Line::from(Span::styled(text.to_string(), style))];
    }
    chars
        .chunks(width)
        .map(|chunk| Line::from(Span::styled(chunk.iter().collect::<String>(), style)))
        .collect()
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No activity yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}
