//! Identity lookup.
//!
//! The engine never authenticates anyone: it receives an already
//! authenticated login and resolves it through [`UserRepository`].
//!
//! | Item | Description |
//! |------|-------------|
//! | [`User`] | A resolved principal |
//! | [`Role`] | Ordered capability tier |
//! | [`RoleRequirement`] | Named check against a role |
//! | [`UserRepository`] | Login and id lookup |
//!
//! Enable the `mocks` feature for [`MockUserRepository`].

mod role;
mod user;

#[cfg(any(test, feature = "mocks"))]
mod user_mock;

pub use role::{Role, RoleRequirement};
pub use user::{User, UserRepository};

#[cfg(any(test, feature = "mocks"))]
pub use user_mock::MockUserRepository;
