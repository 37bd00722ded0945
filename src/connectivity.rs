//! Online/offline signal.
//!
//! The image cache only asks "are we online right now?". Platforms plug in
//! their own source through [`Connectivity`]; [`ManualConnectivity`] is a
//! settable flag that also publishes transitions on a `watch` channel.

use std::sync::Arc;

use tokio::sync::watch;

/// Source of the current connectivity state.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Connectivity that never changes.
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

impl Connectivity for StaticConnectivity {
    fn is_online(&self) -> bool {
        self.0
    }
}

/// Settable connectivity flag.
///
/// Cloning shares the flag. Subscribers see every change through
/// [`subscribe()`](Self::subscribe); feed that receiver to
/// [`ImageFetchCache::watch_connectivity()`](crate::ImageFetchCache::watch_connectivity)
/// to replay deferred lookups when the flag turns back on.
#[derive(Debug, Clone)]
pub struct ManualConnectivity {
    tx: Arc<watch::Sender<bool>>,
}

impl ManualConnectivity {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx: Arc::new(tx) }
    }

    /// Set the flag. Returns `true` if the value changed.
    pub fn set_online(&self, online: bool) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ManualConnectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ManualConnectivity {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_flag_toggles() {
        let c = ManualConnectivity::new(true);
        assert!(c.is_online());
        assert!(c.set_online(false));
        assert!(!c.is_online());
        assert!(!c.set_online(false), "no change should report false");
    }

    #[test]
    fn clones_share_state() {
        let a = ManualConnectivity::default();
        let b = a.clone();
        a.set_online(false);
        assert!(!b.is_online());
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let c = ManualConnectivity::new(false);
        let mut rx = c.subscribe();
        c.set_online(true);
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }
}
