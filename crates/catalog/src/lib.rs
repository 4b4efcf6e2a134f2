//! `campdex-catalog` — directory domain documents.
//!
//! Providers are the parent resource; courses and reviews are their children,
//! linked by a nullable `provider_id` reference enforced only at the
//! application layer. Every document is a plain serde struct persisted as a
//! schemaless JSON document.

pub mod course;
pub mod provider;
pub mod review;

pub use course::{Course, CourseDraft, CourseId, MinimumSkill};
pub use provider::{Provider, ProviderDraft, ProviderId};
pub use review::{Review, ReviewDraft, ReviewId};

/// JSON field holding a child's parent reference.
pub const PARENT_REF_FIELD: &str = "provider_id";
