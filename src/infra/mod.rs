use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::adapter::crypto::argon2::ArgonPasswordHasher;
use crate::adapter::crypto::token::RandomTokenGenerator;
use crate::adapter::events::broadcast::BroadcastAuthEvents;
use crate::application::session_store::SessionStore;
use crate::infra::config::AppConfig;
use crate::infra::db::init_db;
use crate::infra::listener::spawn_session_listener;
use crate::infra::state::AppState;

pub mod app;
pub mod config;
pub mod db;
pub mod listener;
pub mod setup;
pub mod state;

pub fn build_app_state(pool: sqlx::PgPool, config: &AppConfig) -> AppState {
    AppState {
        pool,
        hasher: Arc::new(ArgonPasswordHasher::default()),
        tokens: Arc::new(RandomTokenGenerator),
        events: Arc::new(BroadcastAuthEvents::new(config.events.capacity)),
        sessions: Arc::new(SessionStore::new()),
        config: Arc::new(config.clone()),
    }
}

/// Connects the database, creates the session store and its event bus and
/// starts the listener that keeps the store current.
pub async fn init_app_state(config: &AppConfig) -> anyhow::Result<(AppState, JoinHandle<()>)> {
    let pool = init_db(config).await?;
    let state = build_app_state(pool, config);
    let listener = spawn_session_listener(state.clone());
    Ok((state, listener))
}
