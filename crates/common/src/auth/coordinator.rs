//! Single-flight token refresh
//!
//! Every API call asks the coordinator for a bearer token. When the stored
//! access token is still valid it is returned directly. Otherwise exactly one
//! refresh call goes to the auth API, however many tasks are asking; all of
//! them await the same shared future and observe the same outcome. Running two
//! refreshes at once would let the second one invalidate the refresh token the
//! first one just received.
//!
//! A failed refresh clears the whole session (fail closed). The pending
//! handle is cleared when the refresh settles, success or failure, so the
//! next expiry starts a new refresh.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use jobportal_domain::RefreshRequest;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::token_store::TokenStore;
use super::traits::RefreshBackend;

type PendingRefresh = Shared<BoxFuture<'static, Option<String>>>;
type PendingSlot = Mutex<Option<PendingRefresh>>;

/// Process-wide refresh coordinator
///
/// Construct one per application and share it (it is cheap to wrap in an
/// `Arc`). All clients built from the same coordinator share its
/// single-flight guarantee.
pub struct RefreshCoordinator {
    store: TokenStore,
    backend: Arc<dyn RefreshBackend>,
    pending: Arc<PendingSlot>,
    /// Bumped on login/logout; a refresh started in an older epoch must not
    /// overwrite or wipe the session of a newer one.
    epoch: Arc<AtomicU64>,
}

impl RefreshCoordinator {
    /// Create a coordinator over the given store and refresh backend.
    #[must_use]
    pub fn new(store: TokenStore, backend: Arc<dyn RefreshBackend>) -> Self {
        Self {
            store,
            backend,
            pending: Arc::new(Mutex::new(None)),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The store this coordinator reads and writes.
    #[must_use]
    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Get a usable access token, refreshing if needed
    ///
    /// 1. A stored, unexpired access token is returned without network I/O.
    /// 2. Otherwise the pending refresh is joined, or a new one started.
    /// 3. If the refresh yields nothing, `bootstrap_token` is returned
    ///    instead. Callers pass it right after login, before the store has
    ///    been populated.
    pub async fn get_or_refresh_token(&self, bootstrap_token: Option<&str>) -> Option<String> {
        if let Some(token) = self.store.valid_access_token() {
            return Some(token);
        }

        debug!("stored access token missing or expired");
        self.force_refresh().await.or_else(|| {
            bootstrap_token.filter(|t| !t.is_empty()).map(|token| {
                debug!("refresh yielded no token; using bootstrap token");
                token.to_owned()
            })
        })
    }

    /// Refresh regardless of the stored expiry
    ///
    /// Used after the server rejected a token it considers invalid. Joins an
    /// in-flight refresh if there is one.
    pub async fn force_refresh(&self) -> Option<String> {
        let refresh = self.join_or_start();
        refresh.await
    }

    /// True while a refresh call is outstanding.
    #[must_use]
    pub fn is_refresh_pending(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Start a new session epoch
    ///
    /// Call on login and logout. A refresh still in flight from the previous
    /// epoch will neither persist its result nor clear the new session.
    pub fn begin_epoch(&self) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(epoch, "session epoch advanced");
    }

    fn join_or_start(&self) -> PendingRefresh {
        let mut pending = self.pending.lock();
        if let Some(existing) = pending.as_ref() {
            debug!("joining in-flight token refresh");
            return existing.clone();
        }

        let refresh = run_refresh(
            self.store.clone(),
            Arc::clone(&self.backend),
            Arc::downgrade(&self.pending),
            Arc::clone(&self.epoch),
        )
        .boxed()
        .shared();
        *pending = Some(refresh.clone());
        refresh
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refresh_pending", &self.is_refresh_pending())
            .field("epoch", &self.epoch.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Empties the pending slot when the refresh it guards ends
///
/// Runs on completion, on panic unwinding and when the refresh future is
/// dropped unfinished.
struct ClearPendingOnDrop(Weak<PendingSlot>);

impl Drop for ClearPendingOnDrop {
    fn drop(&mut self) {
        if let Some(slot) = self.0.upgrade() {
            let finished = slot.lock().take();
            drop(finished);
        }
    }
}

async fn run_refresh(
    store: TokenStore,
    backend: Arc<dyn RefreshBackend>,
    pending: Weak<PendingSlot>,
    epoch: Arc<AtomicU64>,
) -> Option<String> {
    let _clear_pending = ClearPendingOnDrop(pending);
    let started_in = epoch.load(Ordering::SeqCst);
    exchange(&store, backend.as_ref(), started_in, &epoch).await
}

async fn exchange(
    store: &TokenStore,
    backend: &dyn RefreshBackend,
    started_in: u64,
    epoch: &AtomicU64,
) -> Option<String> {
    let session = store.read();
    let Some(refresh_token) = session.refresh_token.clone().filter(|t| !t.is_empty()) else {
        info!("no refresh token stored; clearing session");
        clear_if_current(store, started_in, epoch);
        return None;
    };

    info!("refreshing access token");
    let request = RefreshRequest { refresh_token, access_token: session.access_token.clone() };

    match backend.refresh(request).await {
        Ok(response) => {
            if epoch.load(Ordering::SeqCst) != started_in {
                debug!("session changed during refresh; discarding refreshed tokens");
                return store.valid_access_token();
            }
            let updated = response.merge_into(session, Utc::now());
            let token = updated.access_token.clone();
            if let Err(err) = store.write(Some(&updated)) {
                warn!(error = %err, "refreshed tokens could not be persisted");
            }
            info!("access token refreshed");
            token
        }
        Err(err) => {
            warn!(error = %err, "token refresh failed; clearing session");
            clear_if_current(store, started_in, epoch);
            None
        }
    }
}

fn clear_if_current(store: &TokenStore, started_in: u64, epoch: &AtomicU64) {
    if epoch.load(Ordering::SeqCst) != started_in {
        return;
    }
    if let Err(err) = store.clear() {
        warn!(error = %err, "failed to clear session after refresh failure");
    }
}
