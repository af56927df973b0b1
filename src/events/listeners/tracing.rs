use async_trait::async_trait;

use crate::events::{CommunityEvent, Listener};

/// Emits events through `tracing`. Requires the `tracing` feature.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &CommunityEvent) {
        tracing::info!(
            target: "townhall::events",
            event_name = event.name(),
            community_id = event.community_id(),
            actor_id = event.actor_id(),
            ?event,
            "community event"
        );
    }
}
