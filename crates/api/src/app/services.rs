//! Infrastructure wiring: one document store, one lifecycle hub, the
//! maintainers subscribed to it, and the repositories the routes call.

use std::sync::Arc;

use campdex_events::LifecycleHub;
use campdex_infra::{
    CascadeDeleter, CourseRepository, InMemoryDocumentStore, ProviderRepository,
    RatingStatsMaintainer, RecomputeOnLifecycle, ReviewRepository, TuitionAverageMaintainer,
};

type Store = Arc<InMemoryDocumentStore>;

/// Shared application services injected into every handler.
pub struct AppServices {
    pub providers: ProviderRepository<Store>,
    pub courses: CourseRepository<Store>,
    pub reviews: ReviewRepository<Store>,
}

/// Wire the in-memory graph: store → hub → maintainers → repositories.
///
/// The maintainers are registered before any repository can emit, so no
/// lifecycle event is ever dispatched into an empty hub.
pub fn build_services() -> AppServices {
    let store: Store = Arc::new(InMemoryDocumentStore::new());
    let hub = Arc::new(LifecycleHub::new());

    hub.register(Arc::new(RecomputeOnLifecycle::new(
        TuitionAverageMaintainer::new(store.clone()),
    )));
    hub.register(Arc::new(RecomputeOnLifecycle::new(
        RatingStatsMaintainer::new(store.clone()),
    )));

    AppServices {
        providers: ProviderRepository::new(store.clone(), CascadeDeleter::new(store.clone())),
        courses: CourseRepository::new(store.clone(), hub.clone()),
        reviews: ReviewRepository::new(store, hub),
    }
}
