use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::{Bridge, BridgeConfig};

/// A bridge that can be driven from several threads.
///
/// Each call takes the lock once and holds it only for the duration of that
/// call. The engine never calls back into the bridge, so no call can re-enter
/// while the lock is held.
#[derive(Clone, Default)]
pub struct SharedBridge {
    inner: Arc<Mutex<Bridge>>,
}

impl SharedBridge {
    /// Creates a shared bridge with the default configuration
    pub fn new() -> Self {
        Self::from_bridge(Bridge::new())
    }

    /// Creates a shared bridge with the given configuration
    pub fn with_config(config: BridgeConfig) -> Self {
        Self::from_bridge(Bridge::with_config(config))
    }

    /// Wraps an existing bridge
    pub fn from_bridge(bridge: Bridge) -> Self {
        Self {
            inner: Arc::new(Mutex::new(bridge)),
        }
    }

    /// Runs `f` with exclusive access to the bridge
    pub fn with<R>(&self, f: impl FnOnce(&mut Bridge) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// Handles one protocol message under the lock
    #[cfg(feature = "protocol")]
    pub fn handle_message(&self, message: &str) -> String {
        self.with(|bridge| crate::protocol::handle_message(bridge, message))
    }

    fn lock(&self) -> MutexGuard<'_, Bridge> {
        // A panic in another caller leaves the registry consistent: every
        // operation validates before it mutates.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
