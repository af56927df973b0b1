use async_trait::async_trait;

use crate::events::{CommunityEvent, Listener};

/// Writes every event to the `log` facade under the `townhall::events` target,
/// one logfmt line per event.
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    /// Logs at INFO.
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

fn detail(event: &CommunityEvent) -> String {
    match event {
        CommunityEvent::CommunityCreated {
            name, is_private, ..
        } => format!("name=\"{name}\", is_private={is_private}"),
        CommunityEvent::CommunityDeleted { hard, .. } => format!("hard={hard}"),
        CommunityEvent::MemberJoined { via_invite, .. } => format!("via_invite={via_invite}"),
        CommunityEvent::InviteCreated { token_id, .. } => format!("token_id={token_id}"),
        CommunityEvent::InviteInvalidated {
            token_id, reason, ..
        } => format!("token_id={token_id}, reason=\"{}\"", reason.as_str()),
        CommunityEvent::CommunityUpdated { .. } => String::new(),
    }
}

fn line(event: &CommunityEvent) -> String {
    let mut line = format!(
        "event=\"{}\", community_id={}",
        event.name(),
        event.community_id()
    );
    if let Some(actor) = event.actor_id() {
        line.push_str(&format!(", actor_id={actor}"));
    }
    let detail = detail(event);
    if !detail.is_empty() {
        line.push_str(", ");
        line.push_str(&detail);
    }
    line
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &CommunityEvent) {
        if log::log_enabled!(target: "townhall::events", self.level) {
            log::log!(target: "townhall::events", self.level, "{}", line(event));
        }
    }
}
