use tokio::sync::broadcast;
use tracing::debug;

use crate::application::interface::events::{AuthEvent, AuthEventPublisher};

/// Auth event bus backed by a tokio broadcast channel. Publishing never
/// blocks; slow subscribers observe `Lagged` and skip ahead.
#[derive(Clone)]
pub struct BroadcastAuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl BroadcastAuthEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }
}

impl AuthEventPublisher for BroadcastAuthEvents {
    fn publish(&self, event: AuthEvent) {
        if self.sender.send(event).is_err() {
            debug!("Auth event dropped: no subscribers");
        }
    }
}
