use async_trait::async_trait;

use super::CommunityEvent;

/// Receives every dispatched [`CommunityEvent`].
///
/// Listeners run inline, in registration order, after the action's store
/// write. A slow listener slows the action down.
///
/// # Example
///
/// ```rust,ignore
/// use townhall::events::{CommunityEvent, Listener};
/// use async_trait::async_trait;
///
/// struct WelcomeMailer;
///
/// #[async_trait]
/// impl Listener for WelcomeMailer {
///     async fn handle(&self, event: &CommunityEvent) {
///         if let CommunityEvent::MemberJoined { user_id, community_id, .. } = event {
///             // queue a welcome message
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    async fn handle(&self, event: &CommunityEvent);
}
