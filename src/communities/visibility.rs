//! Principal and community resolution shared by the actions.

use super::repository::CommunityRepository;
use super::types::Community;
use crate::{CommunityError, User, UserRepository};

/// Resolves an authenticated login into a stored user.
///
/// Fails with `CommunityError::UserNotFound` when no user has that login.
pub async fn resolve_principal<U>(users: &U, login: &str) -> Result<User, CommunityError>
where
    U: UserRepository + ?Sized,
{
    users
        .find_user_by_login(login)
        .await?
        .ok_or(CommunityError::UserNotFound)
}

/// Loads an active community and checks that `login` may see it.
///
/// The existence check runs before the principal is resolved, so an unknown
/// id reports `NotFound` even for an unknown login.
///
/// # Returns
///
/// - `Ok((community, principal))` - the community is visible
/// - `Err(CommunityError::NotFound)` - no such community, or it is deleted
/// - `Err(CommunityError::UserNotFound)` - the login does not resolve
/// - `Err(CommunityError::PermissionDenied)` - private and the principal is not a member
pub async fn resolve_visible_community<C, U>(
    communities: &C,
    users: &U,
    community_id: i64,
    login: &str,
) -> Result<(Community, User), CommunityError>
where
    C: CommunityRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    let community = communities
        .find_by_id(community_id)
        .await?
        .filter(|c| !c.is_deleted())
        .ok_or(CommunityError::NotFound)?;

    let principal = resolve_principal(users, login).await?;

    if community.is_private && !community.is_member(principal.id) {
        log::warn!(
            target: "townhall",
            "msg=\"private community hidden\", community_id={}, user_id={}",
            community.id,
            principal.id
        );
        return Err(CommunityError::PermissionDenied);
    }

    Ok((community, principal))
}
