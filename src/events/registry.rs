use std::sync::OnceLock;

use super::{CommunityEvent, Listener};

static REGISTRY: OnceLock<EventRegistry> = OnceLock::new();

struct Subscription {
    /// Matches events whose [`CommunityEvent::name`] starts with it.
    prefix: Option<&'static str>,
    listener: Box<dyn Listener>,
}

impl Subscription {
    fn wants(&self, event: &CommunityEvent) -> bool {
        self.prefix
            .map_or(true, |prefix| event.name().starts_with(prefix))
    }
}

/// Listeners configured through [`register_event_listeners`].
pub struct EventRegistry {
    subscriptions: Vec<Subscription>,
}

impl EventRegistry {
    fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Subscribes a listener to every event.
    ///
    /// Listeners are called in the order they are registered.
    pub fn listen(&mut self, listener: impl Listener) -> &mut Self {
        self.subscriptions.push(Subscription {
            prefix: None,
            listener: Box::new(listener),
        });
        self
    }

    /// Subscribes a listener to events whose name starts with `prefix`,
    /// e.g. `"invite."` or `"community.member_joined"`.
    pub fn listen_to(&mut self, prefix: &'static str, listener: impl Listener) -> &mut Self {
        self.subscriptions.push(Subscription {
            prefix: Some(prefix),
            listener: Box::new(listener),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    async fn dispatch(&self, event: &CommunityEvent) {
        for subscription in self.subscriptions.iter().filter(|s| s.wants(event)) {
            subscription.listener.handle(event).await;
        }
    }
}

/// Configures the process-wide listeners.
///
/// Call this once during initialization. Until it is called, events are
/// dropped.
///
/// ```rust,ignore
/// use townhall::register_event_listeners;
/// use townhall::events::listeners::LoggingListener;
///
/// register_event_listeners(|registry| {
///     registry
///         .listen(LoggingListener::new())
///         .listen_to("community.member_joined", WelcomeMailer);
/// });
/// ```
///
/// Only the first call takes effect; later calls log a warning.
pub fn register_event_listeners<F>(f: F)
where
    F: FnOnce(&mut EventRegistry),
{
    let mut registry = EventRegistry::new();
    f(&mut registry);

    let count = registry.len();
    if REGISTRY.set(registry).is_err() {
        log::warn!(
            target: "townhall",
            "msg=\"listeners already registered, ignoring\""
        );
        return;
    }

    log::debug!(target: "townhall", "msg=\"listeners registered\", count={count}");
}

/// Hands an event to every matching listener. A no-op before registration.
pub async fn dispatch(event: CommunityEvent) {
    if let Some(registry) = REGISTRY.get() {
        registry.dispatch(&event).await;
    }
}
