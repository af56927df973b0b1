//! Community lifecycle events.
//!
//! Every mutating action dispatches a [`CommunityEvent`] once its store write
//! has succeeded. Denied and failed operations emit nothing.
//!
//! ```rust,ignore
//! use townhall::register_event_listeners;
//! use townhall::events::listeners::LoggingListener;
//!
//! register_event_listeners(|registry| {
//!     registry.listen(LoggingListener::new());
//! });
//! ```
//!
//! Implement [`Listener`] to feed events elsewhere, e.g. a notification
//! queue or a search index.

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::{CommunityEvent, InvalidationReason};
pub use listener::Listener;
pub use registry::{EventRegistry, dispatch, register_event_listeners};
