use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campdex_core::{DomainError, DomainResult, Entity, ResourceId};

use crate::provider::ProviderId;

/// Collection the courses live in.
pub const COLLECTION: &str = "courses";

/// Numeric child field the tuition aggregate is computed from.
pub const TUITION_FIELD: &str = "tuition";

/// Course identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub ResourceId);

impl CourseId {
    pub fn new(id: ResourceId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CourseId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinimumSkill {
    Beginner,
    Intermediate,
    Advanced,
}

/// Client-supplied course attributes (create payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: u64,
    pub minimum_skill: MinimumSkill,
    #[serde(default)]
    pub scholarships_available: bool,
}

/// Child resource: a course offered by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    /// Parent reference; nullable, zero or one parent.
    pub provider_id: Option<ProviderId>,
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: u64,
    pub minimum_skill: MinimumSkill,
    pub scholarships_available: bool,
    pub created_at: DateTime<Utc>,
}

impl Course {
    pub fn from_draft(provider_id: ProviderId, draft: CourseDraft) -> DomainResult<Self> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("course title must not be empty"));
        }

        Ok(Self {
            id: CourseId::new(ResourceId::new()),
            provider_id: Some(provider_id),
            title,
            description: draft.description,
            weeks: draft.weeks,
            tuition: draft.tuition,
            minimum_skill: draft.minimum_skill,
            scholarships_available: draft.scholarships_available,
            created_at: Utc::now(),
        })
    }
}

impl Entity for Course {
    type Id = CourseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
