use std::{future::Future, sync::{Arc, Mutex}};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{ClientError, ClientResult, lock};

/// What happened to a single [`Resource::load`] call.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The response was stored.
    Applied,
    /// The fetch failed; the previous value is untouched.
    Failed(ClientError),
    /// A newer load started before this one finished; the response was dropped.
    Stale,
    /// [`Resource::cancel`] ran while the fetch was in flight.
    Cancelled,
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied)
    }
}

struct Slot<T> {
    value: Option<T>,
    loading: bool,
    latest: u64,
    cancel: CancellationToken,
}

/// Remote data owned by a page, with a loading flag and latest-wins loads.
///
/// Every call to [`Resource::load`] takes a new ticket. A response is stored
/// only if its ticket is still the newest when it arrives, so overlapping
/// loads can finish in any order. Clones share state.
pub struct Resource<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self { slot: self.slot.clone() }
    }
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Resource<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                value: None,
                loading: false,
                latest: 0,
                cancel: CancellationToken::new(),
            })),
        }
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.slot).loading
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(lock(&self.slot).value.as_ref())
    }

    /// Run `fetch` and store its value if no newer load has started meanwhile.
    ///
    /// The loading flag is cleared when the newest load settles, whether it
    /// succeeded or failed.
    pub async fn load<F>(&self, fetch: F) -> LoadOutcome
    where
        F: Future<Output = ClientResult<T>>,
    {
        let (ticket, cancel) = {
            let mut slot = lock(&self.slot);
            slot.latest += 1;
            slot.loading = true;
            (slot.latest, slot.cancel.clone())
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(ticket, "load cancelled");
                return LoadOutcome::Cancelled;
            }
            result = fetch => result,
        };

        let mut slot = lock(&self.slot);
        if slot.latest != ticket {
            debug!(ticket, latest = slot.latest, "dropping stale response");
            return LoadOutcome::Stale;
        }
        slot.loading = false;
        match result {
            Ok(value) => {
                slot.value = Some(value);
                LoadOutcome::Applied
            }
            Err(e) => LoadOutcome::Failed(e),
        }
    }

    /// Abandon every in-flight load. Pending fetch futures are dropped and
    /// their responses never applied. The resource can be loaded again.
    pub fn cancel(&self) {
        let mut slot = lock(&self.slot);
        slot.latest += 1;
        slot.loading = false;
        slot.cancel.cancel();
        slot.cancel = CancellationToken::new();
    }
}

impl<T: Clone> Resource<T> {
    pub fn get(&self) -> Option<T> {
        lock(&self.slot).value.clone()
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
