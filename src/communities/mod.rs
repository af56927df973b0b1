//! Communities, memberships and invite links.
//!
//! Each operation is an action struct holding the repositories it needs.
//! Construct one per request or keep it around; actions hold no state of
//! their own.
//!
//! | Action | Who may run it |
//! |--------|----------------|
//! | [`CreateCommunityAction`] | anyone within their creation quota |
//! | [`GetCommunityAction`] | anyone who can see the community |
//! | [`ListCommunitiesAction`] | anyone |
//! | [`UpdateCommunityAction`] | creator or administrator |
//! | [`DeleteCommunityAction`] | creator (soft) or administrator (hard) |
//! | [`JoinPublicCommunityAction`] | non-members of a public community |
//! | [`CreateInviteTokenAction`] | creator |
//! | [`JoinByInviteAction`] | holder of a live invite code |
//!
//! A private community is visible to its members only. Everyone else gets
//! `PermissionDenied` from any operation addressing it by id.

mod actions;
mod quota;
mod repository;
mod types;
mod visibility;

pub use actions::{
    CreateCommunityAction, CreateInviteInput, CreateInviteTokenAction, DeleteCommunityAction,
    Deletion, GetCommunityAction, JoinByInviteAction, JoinPublicCommunityAction,
    ListCommunitiesAction, MAX_CODE_ATTEMPTS, UpdateCommunityAction, parse_expiry,
};
pub use quota::QuotaEnforcer;
pub use repository::{
    CommunityRepository, CreateCommunity, CreateInviteToken, InviteTokenRepository,
};
pub use types::{
    Community, CommunityCategory, CommunityPatch, CommunitySummary, EntityStatus, InviteToken,
    InviteTokenView, count_active_tokens, count_all_tokens,
};
pub use visibility::{resolve_principal, resolve_visible_community};

#[cfg(any(test, feature = "mocks"))]
mod mocks;

#[cfg(any(test, feature = "mocks"))]
pub use mocks::{MockCommunityRepository, MockInviteTokenRepository};
