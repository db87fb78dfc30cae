//! Live-updating status dashboard.
//!
//! Drives a [`PollController`] and re-renders on every state transition.
//! Uses the alternate screen buffer so the shell scrollback survives, and
//! restores the terminal on exit. Dropping the controller on the way out
//! is what stops the refresh timer.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use proxwatch_api::types::ClusterStatus;
use proxwatch_api::ApiClient;
use proxwatch_sync::{FetchState, PollController};
use tokio::signal;
use tokio::sync::watch;
use tracing::debug;

use crate::display;

fn enter_alternate_screen() -> Result<()> {
    print!("\x1b[?1049h"); // enter alternate screen
    print!("\x1b[?25l"); // hide cursor
    io::stdout().flush()?;
    Ok(())
}

fn leave_alternate_screen() -> Result<()> {
    print!("\x1b[?25h"); // show cursor
    print!("\x1b[?1049l"); // leave alternate screen
    io::stdout().flush()?;
    Ok(())
}

fn clear_screen() {
    print!("\x1b[2J\x1b[H");
}

fn render(
    state: &FetchState<ClusterStatus>,
    last_updated: Option<&chrono::DateTime<chrono::Utc>>,
    period: Duration,
) -> Result<()> {
    clear_screen();
    println!("{}\n", display::watch_header(period));
    print!(
        "{}",
        display::format_status(state.data.as_ref(), state.error.as_ref(), last_updated)
    );
    io::stdout().flush()?;
    Ok(())
}

pub async fn run(client: ApiClient, cluster_id: String, period: Duration) -> Result<()> {
    debug!(
        cluster = %cluster_id,
        period_ms = period.as_millis() as u64,
        "starting watch view"
    );

    let poll = PollController::new(cluster_id, period, move |id: String| {
        let client = client.clone();
        async move { client.cluster_status(&id).await }
    });
    let mut rx = poll.subscribe();

    enter_alternate_screen()?;
    // First frame from the current snapshot, so the screen is never blank
    // while the initial fetch is in flight.
    let outcome = match render(&poll.state(), poll.last_updated().as_ref(), period) {
        Ok(()) => watch_loop(&poll, &mut rx, period).await,
        Err(e) => Err(e),
    };
    leave_alternate_screen()?;
    debug!("watch view closed");
    outcome
}

async fn watch_loop(
    poll: &PollController<String, ClusterStatus>,
    rx: &mut watch::Receiver<FetchState<ClusterStatus>>,
    period: Duration,
) -> Result<()> {
    loop {
        tokio::select! {
            _ = signal::ctrl_c() => return Ok(()),
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = rx.borrow_and_update().clone();
                if state.error.is_some() {
                    debug!("status refresh failed; keeping last good snapshot");
                }
                render(&state, poll.last_updated().as_ref(), period)?;
            }
        }
    }
}
