//! The background refresh loops.
//!
//! One of three policies runs on the main thread, chosen once at startup
//! from the initially selected screen. Every policy polls the render
//! thread's liveness each iteration and returns as soon as it is gone;
//! render-thread death is the process's one shutdown signal, not an error.
//!
//! Poll intervals are parameters so tests can compress time; `run` wires
//! in the production cadences.

use crate::data::Data;
use crate::screen::ScreenType;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Cadence for the off-day and standings policies.
pub const OFFDAY_REFRESH_INTERVAL: Duration = Duration::from_secs(30);
/// Cadence for the games policy. Fine-grained: live scores move fast.
pub const GAME_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Run the refresh policy matching the selected screen, blocking until
/// the render thread exits.
pub fn run<T>(screen: ScreenType, render: &JoinHandle<T>, data: &Data) {
    match screen {
        ScreenType::News => run_offday(render, data, OFFDAY_REFRESH_INTERVAL),
        ScreenType::Standings => run_standings(render, data, OFFDAY_REFRESH_INTERVAL),
        ScreenType::Games => run_games(render, data, GAME_POLL_INTERVAL),
    }
}

/// Off-day content: weather and headlines on a slow cadence.
pub fn run_offday<T>(render: &JoinHandle<T>, data: &Data, interval: Duration) {
    debug!("refreshing off-day information");
    while !render.is_finished() {
        thread::sleep(interval);
        data.refresh_weather();
        data.refresh_news_ticker();
    }
}

/// Standings on a slow cadence. With no divisions in the store there is
/// nothing to refresh, so this degrades to the off-day policy.
pub fn run_standings<T>(render: &JoinHandle<T>, data: &Data, interval: Duration) {
    if data.has_standings() {
        debug!("refreshing standings");
        while !render.is_finished() {
            thread::sleep(interval);
            data.refresh_standings();
        }
    } else {
        run_offday(render, data, interval);
    }
}

/// Game day: poll the schedule, keep the live game fresh, and rotate the
/// current game once its dwell time has elapsed.
pub fn run_games<T>(render: &JoinHandle<T>, data: &Data, interval: Duration) {
    debug!("refreshing game and schedule information");

    let mut clock = Instant::now();
    let mut promised_game = false;

    while !render.is_finished() {
        thread::sleep(interval);

        if data.config().standings.no_games && !data.games_live() {
            data.refresh_standings();
            // Jump past the idle game once so a live or upcoming one is
            // on deck when play resumes.
            if !promised_game {
                promised_game = true;
                data.advance_to_next_game();
            }
        }

        data.refresh_schedule();

        let rotate = data.should_rotate_to_next_game();
        if data.games_live() && !rotate {
            data.refresh_game();
        }

        let rate = data.config().rotate_rate_for_status(data.current_game_status());
        match rotation_action(clock.elapsed(), rate, data.scrolling_finished(), rotate) {
            RotationAction::Hold => {}
            RotationAction::Reset => clock = Instant::now(),
            RotationAction::Advance => {
                clock = Instant::now();
                data.advance_to_next_game();
            }
        }
    }
}

// ── Rotation gate ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RotationAction {
    /// Dwell time not yet served, or a scroll is still in flight.
    Hold,
    /// Gate passed but no rotation due: restart the dwell clock only.
    Reset,
    /// Gate passed with a rotation due: restart the clock and advance.
    Advance,
}

/// The dwell clock resets only when the gate passes; a status change
/// mid-dwell keeps the elapsed time and is simply measured against the
/// new status's rate at the next check. A rotation can never happen while
/// the display is mid-scroll, no matter how long the dwell has run.
fn rotation_action(
    elapsed: Duration,
    rate: Duration,
    scrolling_finished: bool,
    rotate_due: bool,
) -> RotationAction {
    if elapsed < rate || !scrolling_finished {
        RotationAction::Hold
    } else if rotate_due {
        RotationAction::Advance
    } else {
        RotationAction::Reset
    }
}
