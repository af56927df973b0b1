mod accept;
mod create;
mod delete;
mod get;
mod invite;
mod join;
mod list;
mod update;

pub use accept::JoinByInviteAction;
pub use create::CreateCommunityAction;
pub use delete::{DeleteCommunityAction, Deletion};
pub use get::GetCommunityAction;
pub use invite::{CreateInviteInput, CreateInviteTokenAction, MAX_CODE_ATTEMPTS, parse_expiry};
pub use join::JoinPublicCommunityAction;
pub use list::ListCommunitiesAction;
pub use update::UpdateCommunityAction;
