use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campdex_core::{DomainError, DomainResult, Entity, ResourceId};

/// Collection the providers live in.
pub const COLLECTION: &str = "providers";

/// Derived fields owned exclusively by the aggregate maintainers.
///
/// No other writer may set these; the provider repository strips them from
/// inbound patches.
pub mod derived {
    pub const AVERAGE_TUITION: &str = "average_tuition";
    pub const AVERAGE_RATING: &str = "average_rating";
    pub const REVIEW_COUNT: &str = "review_count";

    pub const ALL: [&str; 3] = [AVERAGE_TUITION, AVERAGE_RATING, REVIEW_COUNT];
}

/// Provider identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(pub ResourceId);

impl ProviderId {
    pub fn new(id: ResourceId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Client-supplied provider attributes (create payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDraft {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub careers: Vec<String>,
    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
}

/// Parent resource: a training provider listed in the directory.
///
/// `average_tuition`, `average_rating` and `review_count` are denormalized
/// from the provider's children and recomputed from scratch on every child
/// mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub careers: Vec<String>,
    pub housing: bool,
    pub job_assistance: bool,

    /// Mean course tuition, rounded up to the nearest multiple of 10.
    #[serde(default)]
    pub average_tuition: u64,
    /// Mean review rating; 0 when the provider has no reviews.
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub review_count: u64,

    pub created_at: DateTime<Utc>,
}

impl Provider {
    /// Validate a draft and mint a new provider document.
    ///
    /// Derived fields start at their zero value; only maintainers move them.
    pub fn from_draft(draft: ProviderDraft) -> DomainResult<Self> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("provider name must not be empty"));
        }
        if name.len() > 50 {
            return Err(DomainError::validation(
                "provider name must not exceed 50 characters",
            ));
        }
        if let Some(phone) = &draft.phone {
            if phone.len() > 20 {
                return Err(DomainError::validation(
                    "phone must not exceed 20 characters",
                ));
            }
        }

        let slug = slugify(&name);

        Ok(Self {
            id: ProviderId::new(ResourceId::new()),
            name,
            slug,
            description: draft.description,
            website: draft.website,
            email: draft.email,
            phone: draft.phone,
            careers: draft.careers,
            housing: draft.housing,
            job_assistance: draft.job_assistance,
            average_tuition: 0,
            average_rating: 0.0,
            review_count: 0,
            created_at: Utc::now(),
        })
    }
}

impl Entity for Provider {
    type Id = ProviderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// URL-safe slug derived from the provider name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
