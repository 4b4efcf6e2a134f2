//! `campdex-infra` — storage, repositories, and consistency maintenance.
//!
//! This crate owns every writer of the document store:
//! - [`document_store`]: the storage abstraction (find/filter/sort/project
//!   plus group-aggregate, nothing more) and an in-memory implementation for
//!   tests/dev.
//! - [`repository`]: the only code allowed to mutate documents; child
//!   repositories capture pre-images and emit lifecycle events around every
//!   mutation.
//! - [`maintainer`]: recompute-from-scratch derived aggregates on parents.
//! - [`cascade`]: application-enforced cascade deletion of children.

pub mod cascade;
pub mod document_store;
pub mod maintainer;
pub mod repository;


pub use cascade::CascadeDeleter;
pub use document_store::{DocumentStore, GroupRow, InMemoryDocumentStore, StoreError};
pub use maintainer::{
    AggregateMaintainer, RatingStatsMaintainer, RecomputeOnLifecycle, TuitionAverageMaintainer,
};
pub use repository::{CourseRepository, ProviderRepository, ReviewRepository};
