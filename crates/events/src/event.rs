use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campdex_core::ResourceId;

/// The closed set of lifecycle notifications.
///
/// `Before*` variants fire at pre-image capture, before the store applies the
/// mutation; `After*` variants fire exactly once per logical mutation, after
/// the store has durably applied it. Parent references are nullable because a
/// child may be parentless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleKind {
    BeforeUpdate {
        subject: ResourceId,
        parent_before: Option<ResourceId>,
    },
    BeforeDelete {
        subject: ResourceId,
        parent_before: Option<ResourceId>,
    },
    AfterCreate {
        subject: ResourceId,
        parent_after: Option<ResourceId>,
    },
    AfterUpdate {
        subject: ResourceId,
        parent_before: Option<ResourceId>,
        parent_after: Option<ResourceId>,
    },
    AfterDelete {
        subject: ResourceId,
        parent_before: Option<ResourceId>,
    },
}

impl LifecycleKind {
    /// The mutated child resource.
    pub fn subject(&self) -> ResourceId {
        match *self {
            Self::BeforeUpdate { subject, .. }
            | Self::BeforeDelete { subject, .. }
            | Self::AfterCreate { subject, .. }
            | Self::AfterUpdate { subject, .. }
            | Self::AfterDelete { subject, .. } => subject,
        }
    }

    /// Whether the mutation has already been applied by the store.
    pub fn is_after(&self) -> bool {
        matches!(
            self,
            Self::AfterCreate { .. } | Self::AfterUpdate { .. } | Self::AfterDelete { .. }
        )
    }
}

/// A lifecycle notification for one mutating call.
///
/// Created transiently per mutation and dropped once listeners finish
/// reacting; nothing persists these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    event_id: Uuid,
    /// Child collection the mutation targeted (listeners filter on this).
    collection: String,
    occurred_at: DateTime<Utc>,
    kind: LifecycleKind,
}

impl LifecycleEvent {
    pub fn new(collection: impl Into<String>, kind: LifecycleKind) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            collection: collection.into(),
            occurred_at: Utc::now(),
            kind,
        }
    }

    pub fn before_update(
        collection: impl Into<String>,
        subject: ResourceId,
        parent_before: Option<ResourceId>,
    ) -> Self {
        Self::new(
            collection,
            LifecycleKind::BeforeUpdate {
                subject,
                parent_before,
            },
        )
    }

    pub fn before_delete(
        collection: impl Into<String>,
        subject: ResourceId,
        parent_before: Option<ResourceId>,
    ) -> Self {
        Self::new(
            collection,
            LifecycleKind::BeforeDelete {
                subject,
                parent_before,
            },
        )
    }

    pub fn after_create(
        collection: impl Into<String>,
        subject: ResourceId,
        parent_after: Option<ResourceId>,
    ) -> Self {
        Self::new(
            collection,
            LifecycleKind::AfterCreate {
                subject,
                parent_after,
            },
        )
    }

    pub fn after_update(
        collection: impl Into<String>,
        subject: ResourceId,
        parent_before: Option<ResourceId>,
        parent_after: Option<ResourceId>,
    ) -> Self {
        Self::new(
            collection,
            LifecycleKind::AfterUpdate {
                subject,
                parent_before,
                parent_after,
            },
        )
    }

    pub fn after_delete(
        collection: impl Into<String>,
        subject: ResourceId,
        parent_before: Option<ResourceId>,
    ) -> Self {
        Self::new(
            collection,
            LifecycleKind::AfterDelete {
                subject,
                parent_before,
            },
        )
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn kind(&self) -> &LifecycleKind {
        &self.kind
    }
}
