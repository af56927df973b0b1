use chrono::{DateTime, Utc};

/// Why an invite token stopped being usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationReason {
    /// The token was presented after its expiry.
    Expired,
    /// A one-time token was used.
    Consumed,
}

impl InvalidationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Consumed => "consumed",
        }
    }
}

/// Events emitted by community actions.
///
/// Dispatched after the store write succeeds. With no listeners registered
/// they are dropped.
#[derive(Debug, Clone)]
pub enum CommunityEvent {
    // community lifecycle
    CommunityCreated {
        community_id: i64,
        creator_id: i64,
        name: String,
        is_private: bool,
        at: DateTime<Utc>,
    },
    CommunityUpdated {
        community_id: i64,
        user_id: i64,
        at: DateTime<Utc>,
    },
    CommunityDeleted {
        community_id: i64,
        user_id: i64,
        /// `true` when the record was removed rather than marked deleted.
        hard: bool,
        at: DateTime<Utc>,
    },

    // membership
    MemberJoined {
        community_id: i64,
        user_id: i64,
        via_invite: bool,
        at: DateTime<Utc>,
    },

    // invites
    InviteCreated {
        token_id: i64,
        community_id: i64,
        created_by: i64,
        at: DateTime<Utc>,
    },
    InviteInvalidated {
        token_id: i64,
        community_id: i64,
        reason: InvalidationReason,
        at: DateTime<Utc>,
    },
}

impl CommunityEvent {
    /// Returns a dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CommunityCreated { .. } => "community.created",
            Self::CommunityUpdated { .. } => "community.updated",
            Self::CommunityDeleted { .. } => "community.deleted",
            Self::MemberJoined { .. } => "community.member_joined",
            Self::InviteCreated { .. } => "invite.created",
            Self::InviteInvalidated { .. } => "invite.invalidated",
        }
    }

    /// Returns the community the event concerns.
    pub fn community_id(&self) -> i64 {
        match self {
            Self::CommunityCreated { community_id, .. }
            | Self::CommunityUpdated { community_id, .. }
            | Self::CommunityDeleted { community_id, .. }
            | Self::MemberJoined { community_id, .. }
            | Self::InviteCreated { community_id, .. }
            | Self::InviteInvalidated { community_id, .. } => *community_id,
        }
    }

    /// The user who caused the event. Invalidations are system-driven and
    /// have none.
    pub fn actor_id(&self) -> Option<i64> {
        match self {
            Self::CommunityCreated { creator_id, .. } => Some(*creator_id),
            Self::CommunityUpdated { user_id, .. }
            | Self::CommunityDeleted { user_id, .. }
            | Self::MemberJoined { user_id, .. } => Some(*user_id),
            Self::InviteCreated { created_by, .. } => Some(*created_by),
            Self::InviteInvalidated { .. } => None,
        }
    }

    /// Returns the timestamp when this event occurred.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::CommunityCreated { at, .. }
            | Self::CommunityUpdated { at, .. }
            | Self::CommunityDeleted { at, .. }
            | Self::MemberJoined { at, .. }
            | Self::InviteCreated { at, .. }
            | Self::InviteInvalidated { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let now = Utc::now();

        assert_eq!(
            CommunityEvent::CommunityCreated {
                community_id: 1,
                creator_id: 1,
                name: "Runners".to_owned(),
                is_private: false,
                at: now
            }
            .name(),
            "community.created"
        );

        assert_eq!(
            CommunityEvent::CommunityDeleted {
                community_id: 1,
                user_id: 1,
                hard: true,
                at: now
            }
            .name(),
            "community.deleted"
        );

        assert_eq!(
            CommunityEvent::MemberJoined {
                community_id: 1,
                user_id: 2,
                via_invite: true,
                at: now
            }
            .name(),
            "community.member_joined"
        );

        assert_eq!(
            CommunityEvent::InviteInvalidated {
                token_id: 1,
                community_id: 1,
                reason: InvalidationReason::Expired,
                at: now
            }
            .name(),
            "invite.invalidated"
        );
    }

    #[test]
    fn test_event_accessors() {
        let now = Utc::now();
        let event = CommunityEvent::InviteCreated {
            token_id: 4,
            community_id: 9,
            created_by: 1,
            at: now,
        };

        assert_eq!(event.timestamp(), now);
        assert_eq!(event.community_id(), 9);
        assert_eq!(event.actor_id(), Some(1));

        let expired = CommunityEvent::InviteInvalidated {
            token_id: 4,
            community_id: 9,
            reason: InvalidationReason::Expired,
            at: now,
        };
        assert_eq!(expired.actor_id(), None);
    }

    #[test]
    fn test_event_debug() {
        let event = CommunityEvent::InviteInvalidated {
            token_id: 3,
            community_id: 1,
            reason: InvalidationReason::Consumed,
            at: Utc::now(),
        };

        let debug_str = format!("{event:?}");
        assert!(debug_str.contains("InviteInvalidated"));
        assert!(debug_str.contains("Consumed"));
        assert_eq!(InvalidationReason::Consumed.as_str(), "consumed");
    }
}
