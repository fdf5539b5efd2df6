use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::api::{ApiClient, ApiError};
use crate::models::{BoardHealth, BoardStatus, DiagReport};
use crate::utils::REFRESH_INTERVAL_MS;

// ============================================================================
// BOARD POLLER
// ============================================================================

const WAIT_SLICE_MS: u64 = 100;

/// Latest snapshot fetched from the board, shared with the UI thread.
#[derive(Clone, Debug, Default)]
pub struct PollState {
    pub status: Option<BoardStatus>,
    pub health: Option<BoardHealth>,
    pub diag: Option<DiagReport>,
    pub last_error: Option<String>,
    pub refreshed_at: Option<i64>,
    pub generation: u64,
}

/// Fetch status, health, and diagnostics on a fixed interval, bumping the
/// generation counter after every attempt. Setting `refresh_now` cuts the
/// wait short; setting `shutdown` ends the thread.
pub fn start_board_poller(
    client: ApiClient,
    state: Arc<Mutex<PollState>>,
    refresh_now: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
) {
    thread::spawn(move || {
        // First fetch happens immediately.
        let mut waited_ms = REFRESH_INTERVAL_MS;

        while !shutdown.load(Ordering::Relaxed) {
            if waited_ms < REFRESH_INTERVAL_MS && !refresh_now.swap(false, Ordering::Relaxed) {
                thread::sleep(Duration::from_millis(WAIT_SLICE_MS));
                waited_ms += WAIT_SLICE_MS;
                continue;
            }
            waited_ms = 0;

            let result = fetch_snapshot(&client);
            let mut shared = state.lock().unwrap();
            match result {
                Ok((status, health, diag)) => {
                    shared.status = Some(status);
                    shared.health = Some(health);
                    shared.diag = Some(diag);
                    shared.last_error = None;
                }
                Err(e) => {
                    shared.last_error = Some(e.to_string());
                }
            }
            shared.refreshed_at = Some(chrono::Utc::now().timestamp());
            shared.generation += 1;
        }
    });
}

fn fetch_snapshot(client: &ApiClient) -> Result<(BoardStatus, BoardHealth, DiagReport), ApiError> {
    let status = client.status()?;
    let health = client.health()?;
    let diag = client.diag()?;
    Ok((status, health, diag))
}
