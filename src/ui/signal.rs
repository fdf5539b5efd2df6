use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use signal_hook::consts::signal::*;
use signal_hook::iterator::Signals;

// ============================================================================
// SIGNAL LISTENER
// ============================================================================

/// Flip the shutdown flag on SIGTERM/SIGINT so the dashboard loop can
/// restore the terminal before the process exits.
pub fn start_signal_listener(shutdown: Arc<AtomicBool>) {
    thread::spawn(move || {
        if let Ok(mut signals) = Signals::new(&[SIGTERM, SIGINT]) {
            for signal in signals.forever() {
                if signal == SIGTERM || signal == SIGINT {
                    shutdown.store(true, Ordering::Relaxed);
                    break;
                }
            }
        }
    });
}
