//! Configuration types for the community engine.
//!
//! The engine reads two groups of settings: the creation quota applied to
//! non-privileged users, and the invite-link policy.
//!
//! # Example
//!
//! ```rust
//! use townhall::config::{InviteConfig, QuotaConfig, TownhallConfig};
//!
//! // Use defaults
//! let config = TownhallConfig::default();
//!
//! // Or customize
//! let config = TownhallConfig {
//!     quota: QuotaConfig { max_communities: 10 },
//!     invites: InviteConfig {
//!         max_tokens_per_community: 3,
//!         ..Default::default()
//!     },
//! };
//! ```

use crate::communities::{InviteToken, count_all_tokens};
use crate::CommunityError;

/// Environment variable holding [`QuotaConfig::max_communities`].
pub const MAX_COMMUNITIES_ENV: &str = "TOWNHALL_MAX_COMMUNITIES";

/// Environment variable holding [`InviteConfig::max_tokens_per_community`].
pub const MAX_INVITES_ENV: &str = "TOWNHALL_MAX_INVITES_PER_COMMUNITY";

/// Decides whether a stored invite token counts toward the per-community cap.
pub type TokenCountPredicate = fn(&InviteToken) -> bool;

/// Main configuration struct.
#[derive(Debug, Clone, Default)]
pub struct TownhallConfig {
    /// Community creation quota.
    pub quota: QuotaConfig,

    /// Invite link policy.
    pub invites: InviteConfig,
}

impl TownhallConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lenient settings for local development.
    pub fn development() -> Self {
        Self {
            quota: QuotaConfig {
                max_communities: 100,
            },
            invites: InviteConfig {
                max_tokens_per_community: 50,
                ..InviteConfig::default()
            },
        }
    }

    /// Tighter limits and longer invite codes.
    pub fn strict() -> Self {
        Self {
            quota: QuotaConfig { max_communities: 1 },
            invites: InviteConfig {
                max_tokens_per_community: 2,
                code_length: 32,
                ..InviteConfig::default()
            },
        }
    }

    /// Builds a configuration from the process environment.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `CommunityError::ConfigurationError` if a variable is set but
    /// is not a non-negative integer.
    pub fn from_env() -> Result<Self, CommunityError> {
        let mut config = Self::default();

        if let Some(max) = read_env_usize(MAX_COMMUNITIES_ENV)? {
            config.quota.max_communities = max;
        }
        if let Some(max) = read_env_usize(MAX_INVITES_ENV)? {
            config.invites.max_tokens_per_community = max;
        }

        Ok(config)
    }
}

fn read_env_usize(name: &str) -> Result<Option<usize>, CommunityError> {
    match std::env::var(name) {
        Ok(raw) => parse_usize(name, &raw).map(Some),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(CommunityError::ConfigurationError(format!("{name}: {e}"))),
    }
}

fn parse_usize(name: &str, raw: &str) -> Result<usize, CommunityError> {
    raw.trim().parse::<usize>().map_err(|e| {
        CommunityError::ConfigurationError(format!("{name}=\"{raw}\" is not a valid count: {e}"))
    })
}

/// Limits how many communities a user may create.
#[derive(Debug, Clone)]
pub struct QuotaConfig {
    /// Maximum number of communities a privileged user may have created.
    ///
    /// Every user may create their first community regardless of this value.
    ///
    /// Default: 3
    pub max_communities: usize,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self { max_communities: 3 }
    }
}

/// Invite link policy.
#[derive(Debug, Clone)]
pub struct InviteConfig {
    /// How many tokens a community may hold.
    ///
    /// Default: 5
    pub max_tokens_per_community: usize,

    /// Length of generated invite codes (alphanumeric characters). Values
    /// below [`MIN_CODE_LENGTH`](crate::crypto::MIN_CODE_LENGTH) are raised
    /// to it.
    ///
    /// Default: 16
    pub code_length: usize,

    /// Which stored tokens count toward `max_tokens_per_community`.
    ///
    /// Default: [`count_all_tokens`], so deleted tokens keep occupying a slot.
    pub counts_toward_cap: TokenCountPredicate,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_community: 5,
            code_length: crate::crypto::DEFAULT_CODE_LENGTH,
            counts_toward_cap: count_all_tokens,
        }
    }
}
