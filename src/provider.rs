use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::sportsdb_fetch::SportsApi;
use crate::state::{Delta, ProviderCommand};

/// Runs commands against `api` off the UI thread.
///
/// Each command gets its own fetch thread, so a slow request does not hold up
/// later ones and replies can arrive in any order. The worker exits when the
/// command channel closes.
pub fn spawn_provider(
    api: Arc<dyn SportsApi>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let api = Arc::clone(&api);
            let tx = tx.clone();
            thread::spawn(move || run_command(api.as_ref(), cmd, &tx));
        }
    })
}

pub fn run_command(api: &dyn SportsApi, cmd: ProviderCommand, tx: &Sender<Delta>) {
    let delta = match cmd {
        ProviderCommand::SearchTeams { seq, term } => {
            let _ = tx.send(Delta::Log(format!("[INFO] Searching teams for \"{term}\"")));
            let result = api.search_teams(&term);
            Delta::TeamsLoaded {
                seq,
                query: term,
                result,
            }
        }
        ProviderCommand::SearchPlayers { seq, team } => {
            let _ = tx.send(Delta::Log(format!("[INFO] Fetching players for {}", team.name)));
            let result = api.search_players(&team.name);
            Delta::RosterLoaded { seq, team, result }
        }
    };
    let _ = tx.send(delta);
}
