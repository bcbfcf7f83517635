//! Background sweep task — deletes expired challenge rows past their
//! grace window. Best-effort, never on the request path, following the
//! `tokio::spawn` + `tokio::time::interval` tick-loop shape of the pack's
//! own `Scheduler::start` (errors are swallowed so the loop stays alive).

use crate::state::AppState;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub fn spawn(state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(state.settings.sweep_interval);
        loop {
            interval.tick().await;
            let now = state.clock.now();
            match state
                .challenge_store
                .sweep(now, state.settings.challenge_grace)
            {
                Ok(removed) if removed > 0 => {
                    tracing::debug!(removed, "swept expired challenges");
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "challenge sweep failed, will retry next tick");
                }
            }
        }
    })
}
