use chrono::{DateTime, NaiveDateTime, Utc};

use crate::communities::visibility::resolve_visible_community;
use crate::communities::{
    CommunityRepository, CreateInviteToken, InviteTokenRepository, InviteTokenView,
};
use crate::config::InviteConfig;
use crate::crypto::{CodeGenerator, RandomCodeGenerator};
use crate::events::{CommunityEvent, dispatch};
use crate::{CommunityError, UserRepository};

/// How many candidate codes are drawn before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 16;

/// Naive layouts accepted for an expiry, read as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Input data for issuing an invite.
#[derive(Debug, Clone, Default)]
pub struct CreateInviteInput {
    pub community_id: i64,
    /// Blank or absent means the token never expires.
    pub expires_at: Option<String>,
    /// Absent means reusable.
    pub one_time_use: Option<bool>,
}

/// Issues an invite code for a community.
///
/// This action:
/// 1. Resolves the community as visible to the principal
/// 2. Verifies the principal created it
/// 3. Enforces the per-community token cap
/// 4. Draws a code not used by any stored token
/// 5. Parses the expiry and stores the token
pub struct CreateInviteTokenAction<I, C, U>
where
    I: InviteTokenRepository,
    C: CommunityRepository,
    U: UserRepository,
{
    invite_repo: I,
    community_repo: C,
    user_repo: U,
    config: InviteConfig,
    generator: Box<dyn CodeGenerator>,
}

impl<I, C, U> CreateInviteTokenAction<I, C, U>
where
    I: InviteTokenRepository,
    C: CommunityRepository,
    U: UserRepository,
{
    /// Creates a new `CreateInviteTokenAction` with default configuration.
    pub fn new(invite_repo: I, community_repo: C, user_repo: U) -> Self {
        Self::with_config(invite_repo, community_repo, user_repo, InviteConfig::default())
    }

    pub fn with_config(invite_repo: I, community_repo: C, user_repo: U, config: InviteConfig) -> Self {
        let generator = Box::new(RandomCodeGenerator::new(config.code_length));
        Self {
            invite_repo,
            community_repo,
            user_repo,
            config,
            generator,
        }
    }

    /// Replaces the code source.
    #[must_use]
    pub fn with_generator(mut self, generator: impl CodeGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// # Returns
    ///
    /// - `Ok(view)` - the stored token's public view
    /// - `Err(CommunityError::PermissionDenied)` - principal is not the creator
    /// - `Err(CommunityError::TooManyTokens)` - the community is at its cap
    /// - `Err(CommunityError::InvalidTimestamp(_))` - the expiry did not parse
    /// - `Err(CommunityError::Internal(_))` - no free code after [`MAX_CODE_ATTEMPTS`] draws
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_invite_token", skip_all, err)
    )]
    pub async fn execute(
        &self,
        input: CreateInviteInput,
        principal: &str,
    ) -> Result<InviteTokenView, CommunityError> {
        let (community, user) = resolve_visible_community(
            &self.community_repo,
            &self.user_repo,
            input.community_id,
            principal,
        )
        .await?;

        if !community.is_created_by(user.id) {
            log::warn!(
                target: "townhall",
                "msg=\"invite denied\", community_id={}, user_id={}",
                community.id,
                user.id
            );
            return Err(CommunityError::PermissionDenied);
        }

        let counted = self
            .invite_repo
            .find_by_community(community.id)
            .await?
            .iter()
            .filter(|t| (self.config.counts_toward_cap)(t))
            .count();
        if counted >= self.config.max_tokens_per_community {
            return Err(CommunityError::TooManyTokens);
        }

        let code = self.unique_code().await?;
        let expires_at = parse_expiry(input.expires_at.as_deref())?;

        let token = self
            .invite_repo
            .create(CreateInviteToken {
                community_id: community.id,
                code,
                expires_at,
                one_time_use: input.one_time_use.unwrap_or(false),
                created_by: user.id,
            })
            .await?;

        dispatch(CommunityEvent::InviteCreated {
            token_id: token.id,
            community_id: token.community_id,
            created_by: user.id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "townhall",
            "msg=\"invite created\", community_id={}, token_id={}, one_time_use={}",
            token.community_id,
            token.id,
            token.one_time_use
        );

        Ok(InviteTokenView::from(&token))
    }

    async fn unique_code(&self) -> Result<String, CommunityError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let candidate = self.generator.generate();
            if self.invite_repo.find_by_code(&candidate).await?.is_none() {
                return Ok(candidate);
            }
            log::debug!(target: "townhall", "msg=\"invite code collision\", attempt={attempt}");
        }

        log::error!(
            target: "townhall",
            "msg=\"invite code space exhausted\", attempts={MAX_CODE_ATTEMPTS}"
        );
        Err(CommunityError::Internal(
            "could not generate a unique invite code".into(),
        ))
    }
}

/// Parses an optional expiry.
///
/// Accepts RFC 3339 (`2018-05-05T11:50:55+02:00`) and naive local date-times
/// with optional seconds and fraction (`2018-05-05T11:50:55.1234`,
/// `2018-05-05T11:50`), the latter read as UTC. Blank input yields `None`.
///
/// ```rust
/// use townhall::communities::parse_expiry;
///
/// assert!(parse_expiry(Some("2018-05-05T11:50:55.1234")).unwrap().is_some());
/// assert!(parse_expiry(Some("   ")).unwrap().is_none());
/// assert!(parse_expiry(Some("tomorrow")).is_err());
/// ```
pub fn parse_expiry(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, CommunityError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| CommunityError::InvalidTimestamp(raw.to_owned()))
}
