//! Cache Events Module
//!
//! Optional observer hook for engine activity. The hook is supplied at
//! construction time; when no observer is registered the hot path performs
//! no dispatch at all.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

// == Cache Event ==
/// A structured notification emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "key", rename_all = "snake_case")]
pub enum CacheEvent {
    /// A read found a live entry
    Hit(String),
    /// A read found no live entry
    Miss(String),
    /// An entry was inserted or replaced
    Set(String),
    /// An entry was explicitly deleted
    Del(String),
    /// An entry was removed because its TTL elapsed
    Expired(String),
    /// An entry was silently removed by the LRU policy
    Evicted(String),
    /// The whole store was cleared
    Flush,
}

// == Event Hook ==
/// Shared observer callback invoked synchronously for each event.
pub type EventHook = Arc<dyn Fn(&CacheEvent) + Send + Sync>;

/// Wrapper holding the optional observer.
#[derive(Clone, Default)]
pub struct EventSink {
    hook: Option<EventHook>,
}

impl EventSink {
    /// Creates a sink with no observer registered.
    pub fn disabled() -> Self {
        Self { hook: None }
    }

    /// Creates a sink dispatching to the given observer.
    pub fn new(hook: EventHook) -> Self {
        Self { hook: Some(hook) }
    }

    /// Emits an event to the observer, if one is registered.
    #[inline]
    pub fn emit(&self, event: CacheEvent) {
        if let Some(hook) = &self.hook {
            hook(&event);
        }
    }

    /// Emits an event built lazily, skipping construction when no observer
    /// is registered.
    #[inline]
    pub fn emit_with(&self, make: impl FnOnce() -> CacheEvent) {
        if let Some(hook) = &self.hook {
            hook(&make());
        }
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink")
            .field("registered", &self.hook.is_some())
            .finish()
    }
}
