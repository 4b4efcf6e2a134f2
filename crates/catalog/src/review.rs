use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campdex_core::{DomainError, DomainResult, Entity, ResourceId, UserId};

use crate::provider::ProviderId;

/// Collection the reviews live in.
pub const COLLECTION: &str = "reviews";

/// Numeric child field the rating aggregate is computed from.
pub const RATING_FIELD: &str = "rating";

/// Review identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(pub ResourceId);

impl ReviewId {
    pub fn new(id: ResourceId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Client-supplied review attributes (create payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub title: String,
    pub text: String,
    /// 1–10 inclusive.
    pub rating: u8,
    pub user_id: UserId,
}

/// Child resource: a user's review of a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    /// Parent reference; nullable, zero or one parent.
    pub provider_id: Option<ProviderId>,
    pub title: String,
    pub text: String,
    pub rating: u8,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn from_draft(provider_id: ProviderId, draft: ReviewDraft) -> DomainResult<Self> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("review title must not be empty"));
        }
        if title.len() > 100 {
            return Err(DomainError::validation(
                "review title must not exceed 100 characters",
            ));
        }
        if !(1..=10).contains(&draft.rating) {
            return Err(DomainError::validation("rating must be between 1 and 10"));
        }

        Ok(Self {
            id: ReviewId::new(ResourceId::new()),
            provider_id: Some(provider_id),
            title,
            text: draft.text,
            rating: draft.rating,
            user_id: draft.user_id,
            created_at: Utc::now(),
        })
    }
}

impl Entity for Review {
    type Id = ReviewId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(rating: u8) -> ReviewDraft {
        ReviewDraft {
            title: "solid course".to_string(),
            text: "learned a lot".to_string(),
            rating,
            user_id: UserId::new(),
        }
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        let provider = ProviderId::new(ResourceId::new());
        assert!(Review::from_draft(provider, draft(1)).is_ok());
        assert!(Review::from_draft(provider, draft(10)).is_ok());
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let provider = ProviderId::new(ResourceId::new());
        assert!(matches!(
            Review::from_draft(provider, draft(0)),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Review::from_draft(provider, draft(11)),
            Err(DomainError::Validation(_))
        ));
    }
}
