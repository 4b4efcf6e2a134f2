//! Synchronous, in-process lifecycle dispatch.
//!
//! The hub fans one event out to every registered listener, in registration
//! order, inside the request that performed the mutation. Listener failures
//! are logged and swallowed: by the time an `After*` event is dispatched the
//! child mutation is already committed, and nothing here may roll it back.

use std::sync::{Arc, RwLock};

use campdex_core::{DomainError, DomainResult};

use crate::event::LifecycleEvent;

/// Reacts to lifecycle events (aggregate maintainers, audit hooks, ...).
///
/// Listeners must tolerate events for collections they do not care about and
/// simply ignore them.
pub trait LifecycleListener: Send + Sync {
    /// Stable name used in dispatch logging.
    fn name(&self) -> &'static str;

    fn on_event(&self, event: &LifecycleEvent) -> DomainResult<()>;
}

impl<L> LifecycleListener for Arc<L>
where
    L: LifecycleListener + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn on_event(&self, event: &LifecycleEvent) -> DomainResult<()> {
        (**self).on_event(event)
    }
}

/// In-process lifecycle event hub.
///
/// - No IO / no async
/// - Synchronous dispatch in registration order
/// - Listener errors never propagate to the emitting repository
#[derive(Default)]
pub struct LifecycleHub {
    listeners: RwLock<Vec<Arc<dyn LifecycleListener>>>,
}

impl LifecycleHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: Arc<dyn LifecycleListener>) {
        // If the lock is poisoned, registration is silently lost; the process
        // is already unwinding in that case.
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push(listener);
        }
    }

    /// Dispatch one event to every listener.
    ///
    /// A `NotFound` from a listener means its recompute target vanished; that
    /// aborts only the listener's own reaction and is logged at debug level.
    /// Any other failure is logged as a warning.
    pub fn emit(&self, event: &LifecycleEvent) {
        let listeners = match self.listeners.read() {
            Ok(listeners) => listeners,
            Err(_) => {
                tracing::warn!(event_id = %event.event_id(), "lifecycle hub lock poisoned; event dropped");
                return;
            }
        };

        for listener in listeners.iter() {
            match listener.on_event(event) {
                Ok(()) => {}
                Err(DomainError::NotFound) => {
                    tracing::debug!(
                        listener = listener.name(),
                        collection = event.collection(),
                        subject = %event.kind().subject(),
                        "lifecycle listener target not found; reaction skipped"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        listener = listener.name(),
                        collection = event.collection(),
                        subject = %event.kind().subject(),
                        error = %e,
                        "lifecycle listener failed"
                    );
                }
            }
        }
    }
}
