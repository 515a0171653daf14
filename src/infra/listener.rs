use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use crate::application::interactors::profile::LoadProfileInteractor;
use crate::application::session_store::SessionStore;
use crate::infra::state::{AppState, FromAppState};

/// Applies auth events to the session store until the bus closes, and
/// periodically evicts sessions whose refresh token has lapsed.
pub fn spawn_session_listener(state: AppState) -> JoinHandle<()> {
    let mut receiver = state.events.subscribe();
    let mut sweep = interval(Duration::from_secs(state.config.events.sweep_interval.max(1)));
    sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::spawn(async move {
        info!("Session listener started");
        loop {
            tokio::select! {
                received = receiver.recv() => match received {
                    Ok(event) => {
                        debug!("Applying auth event {:?}", event);
                        match LoadProfileInteractor::from_app_state(&state).await {
                            Ok(loader) => state.sessions.handle(event, &loader).await,
                            Err(err) => error!("Failed to build profile loader: {}", err),
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Session listener lagged, {} auth events skipped", skipped);
                        sweep_expired(&state.sessions).await;
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = sweep.tick() => sweep_expired(&state.sessions).await,
            }
        }
        info!("Session listener stopped");
    })
}

async fn sweep_expired(sessions: &SessionStore) {
    let evicted = sessions.evict_expired(Utc::now()).await;
    if evicted > 0 {
        info!("Evicted {} expired sessions from the store", evicted);
    }
}
