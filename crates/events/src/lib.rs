//! `campdex-events` — typed lifecycle events around child-resource mutations.
//!
//! Mutating a child resource (create, update, delete, including
//! find-and-mutate variants) produces a [`LifecycleEvent`] carrying enough
//! identity to locate the affected parent: the subject id plus the parent
//! reference **before** and **after** the mutation. The pre-mutation parent
//! must come from a pre-image fetched before the store applies the change,
//! because after a delete or a filter-driven update the post-state can no
//! longer tell you which parent owned the child.
//!
//! The event set is closed and dispatch is explicit: repositories emit events
//! on a [`LifecycleHub`] right after a committed mutation. There is no
//! operation-name pattern matching and no hidden schema middleware.

pub mod event;
pub mod hub;

pub use event::{LifecycleEvent, LifecycleKind};
pub use hub::{LifecycleHub, LifecycleListener};
