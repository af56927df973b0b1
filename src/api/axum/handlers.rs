//! HTTP handlers for the community endpoints.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::error::AppError;
use super::extract::{ApiJson, ApiPath};
use super::middleware::Principal;
use super::routes::CommunityState;
use crate::UserRepository;
use crate::api::{
    CommunityResponse, CreateCommunityRequest, CreateInviteRequest, ListCommunitiesQuery,
    MessageResponse, UpdateCommunityRequest,
};
use crate::communities::{
    CommunityRepository, CreateCommunityAction, CreateInviteTokenAction, DeleteCommunityAction,
    Deletion, GetCommunityAction, InviteTokenRepository, JoinByInviteAction,
    JoinPublicCommunityAction, ListCommunitiesAction, UpdateCommunityAction,
};

/// POST /
pub async fn create_community<U, C, I>(
    State(state): State<CommunityState<U, C, I>>,
    principal: Principal,
    ApiJson(body): ApiJson<CreateCommunityRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    C: CommunityRepository + Clone + Send + Sync + 'static,
    I: Clone + Send + Sync + 'static,
{
    let action =
        CreateCommunityAction::with_config(state.community_repo, state.user_repo, state.config.quota);
    let community = action
        .execute(&body.name, body.is_private, principal.login())
        .await?;

    Ok((StatusCode::CREATED, Json(CommunityResponse::from(community))))
}

/// GET /?type=
pub async fn list_communities<U, C, I>(
    State(state): State<CommunityState<U, C, I>>,
    principal: Principal,
    Query(query): Query<ListCommunitiesQuery>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    C: CommunityRepository + Clone + Send + Sync + 'static,
    I: Clone + Send + Sync + 'static,
{
    let action = ListCommunitiesAction::new(state.community_repo, state.user_repo);
    let summaries = action
        .execute(query.category.as_deref(), principal.login())
        .await?;

    Ok(Json(summaries))
}

/// GET /{id}
pub async fn get_community<U, C, I>(
    State(state): State<CommunityState<U, C, I>>,
    principal: Principal,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    C: CommunityRepository + Clone + Send + Sync + 'static,
    I: Clone + Send + Sync + 'static,
{
    let action = GetCommunityAction::new(state.community_repo, state.user_repo);
    let community = action.execute(id, principal.login()).await?;

    Ok(Json(CommunityResponse::from(community)))
}

/// PUT /{id}
pub async fn update_community<U, C, I>(
    State(state): State<CommunityState<U, C, I>>,
    principal: Principal,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<UpdateCommunityRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    C: CommunityRepository + Clone + Send + Sync + 'static,
    I: Clone + Send + Sync + 'static,
{
    let action = UpdateCommunityAction::new(state.community_repo, state.user_repo);
    let community = action.execute(id, body.into(), principal.login()).await?;

    Ok(Json(CommunityResponse::from(community)))
}

/// DELETE /{id}
pub async fn delete_community<U, C, I>(
    State(state): State<CommunityState<U, C, I>>,
    principal: Principal,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    C: CommunityRepository + Clone + Send + Sync + 'static,
    I: Clone + Send + Sync + 'static,
{
    let action = DeleteCommunityAction::new(state.community_repo, state.user_repo);
    let message = match action.execute(id, principal.login()).await? {
        Deletion::Hard => "community removed",
        Deletion::Soft => "community deleted",
    };

    Ok(Json(MessageResponse {
        message: message.to_owned(),
    }))
}

/// POST /{id}/join
pub async fn join_community<U, C, I>(
    State(state): State<CommunityState<U, C, I>>,
    principal: Principal,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    C: CommunityRepository + Clone + Send + Sync + 'static,
    I: Clone + Send + Sync + 'static,
{
    let action = JoinPublicCommunityAction::new(state.community_repo, state.user_repo);
    let community = action.execute(id, principal.login()).await?;

    Ok(Json(CommunityResponse::from(community)))
}

/// POST /{id}/invites
///
/// `{}` issues a reusable, non-expiring code.
pub async fn create_invite<U, C, I>(
    State(state): State<CommunityState<U, C, I>>,
    principal: Principal,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<CreateInviteRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    C: CommunityRepository + Clone + Send + Sync + 'static,
    I: InviteTokenRepository + Clone + Send + Sync + 'static,
{
    let action = CreateInviteTokenAction::with_config(
        state.invite_repo,
        state.community_repo,
        state.user_repo,
        state.config.invites,
    );
    let view = action
        .execute(body.into_input(id), principal.login())
        .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// POST /join/{code}
pub async fn join_by_invite<U, C, I>(
    State(state): State<CommunityState<U, C, I>>,
    principal: Principal,
    ApiPath(code): ApiPath<String>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    C: CommunityRepository + Clone + Send + Sync + 'static,
    I: InviteTokenRepository + Clone + Send + Sync + 'static,
{
    let action = JoinByInviteAction::new(state.invite_repo, state.community_repo, state.user_repo);
    let community = action.execute(&code, principal.login()).await?;

    Ok(Json(CommunityResponse::from(community)))
}
