use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

use teamsearch_terminal::config::Config;
use teamsearch_terminal::controller::Controller;
use teamsearch_terminal::provider::spawn_provider;
use teamsearch_terminal::sportsdb_fetch::SportsDbClient;
use teamsearch_terminal::state::{Delta, Focus};
use teamsearch_terminal::ui::{self, Hit, Regions};

const WHEEL_LINES: isize = 3;

struct App {
    controller: Controller,
    regions: Regions,
    should_quit: bool,
}

impl App {
    fn new(controller: Controller) -> Self {
        Self {
            controller,
            regions: Regions::default(),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Tab => self.controller.focus_next(),
            KeyCode::BackTab => self.controller.focus_prev(),
            KeyCode::Down => self.controller.move_focus(true),
            KeyCode::Up => self.controller.move_focus(false),
            KeyCode::PageDown => self.scroll_results(ui::results_page(&self.regions) as isize),
            KeyCode::PageUp => self.scroll_results(-(ui::results_page(&self.regions) as isize)),
            KeyCode::Enter => self.controller.activate(now),
            KeyCode::Esc => self.controller.click_outside(),
            KeyCode::Backspace if self.field_focused() => self.controller.backspace(now),
            KeyCode::Char(c) if self.field_focused() && !ctrl => {
                self.controller.type_char(c, now)
            }
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let now = Instant::now();
        let hit = ui::hit_test(&self.regions, &self.controller.state, mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => match hit {
                Hit::HistoryText(idx) => self.controller.hover_history(Some(idx)),
                _ if self.controller.state.hovered_history.is_some() => {
                    self.controller.hover_history(None)
                }
                _ => {}
            },
            MouseEventKind::Down(MouseButton::Left) => match hit {
                Hit::Field => self.controller.focus(Focus::SearchField),
                Hit::AutocompleteRow(idx) => self.controller.select_candidate(idx, now),
                Hit::SearchBox => {}
                Hit::HistoryText(idx) => {
                    self.controller.click_outside();
                    self.controller.replay_history(idx, now);
                }
                Hit::HistoryRemove(idx) => {
                    self.controller.click_outside();
                    self.controller.remove_history(idx);
                }
                Hit::ClearHistory => {
                    self.controller.click_outside();
                    self.controller.clear_history();
                }
                Hit::Results | Hit::Outside => self.controller.click_outside(),
            },
            MouseEventKind::ScrollDown if hit == Hit::Results => self.scroll_results(WHEEL_LINES),
            MouseEventKind::ScrollUp if hit == Hit::Results => self.scroll_results(-WHEEL_LINES),
            _ => {}
        }
    }

    fn scroll_results(&mut self, lines: isize) {
        let max = ui::results_max_scroll(&self.regions, &self.controller.state);
        self.controller.scroll_results(lines, max);
    }

    fn field_focused(&self) -> bool {
        self.controller.state.focus == Focus::SearchField
    }
}

fn main() -> Result<()> {
    let config = Config::load();

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let api = Arc::new(SportsDbClient::new(
        config.base_url.clone(),
        config.request_timeout,
    ));
    spawn_provider(api, tx, cmd_rx);

    let mut app = App::new(Controller::new(config.debounce, Some(cmd_tx)));
    app.controller
        .state
        .push_log(format!("[INFO] Using {}", config.base_url));

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend).context("create terminal")?;

    let res = run_app(&mut terminal, &mut app, rx, config.tick_rate);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            app.controller.apply(delta, Local::now());
        }

        app.controller.tick(Instant::now());

        terminal.draw(|f| app.regions = ui::draw(f, &app.controller.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
