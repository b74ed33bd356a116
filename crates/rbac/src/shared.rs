//! Process-wide engine handle with atomic replacement.

use std::sync::{Arc, RwLock};

use crate::engine::RbacEngine;

/// Cloneable handle to the live engine.
///
/// Serving threads read through [`snapshot`](Self::snapshot); a config
/// reload builds a complete replacement engine off to the side and installs
/// it with [`swap`](Self::swap). Readers hold an `Arc` to whichever engine
/// was live when they looked, so a swap never exposes a partially built
/// cache.
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<RwLock<Arc<RbacEngine>>>,
}

impl SharedEngine {
    pub fn new(engine: RbacEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(engine))),
        }
    }

    /// The engine currently live. Cheap: one `Arc` clone under a read lock.
    pub fn snapshot(&self) -> Arc<RbacEngine> {
        self.inner.read().expect("engine lock poisoned").clone()
    }

    /// Install a fully built engine and return the one it replaced.
    ///
    /// In-flight checks keep using the engine they snapshotted; new checks
    /// see the replacement.
    pub fn swap(&self, engine: RbacEngine) -> Arc<RbacEngine> {
        let next = Arc::new(engine);
        let mut slot = self.inner.write().expect("engine lock poisoned");
        std::mem::replace(&mut *slot, next)
    }
}
