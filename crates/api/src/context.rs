use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use stockroom_core::SessionId;
use stockroom_inventory::{Catalog, Ledger};

/// Session context for a request.
///
/// Inserted by the session middleware; present for all page routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionContext {
    session_id: SessionId,
}

impl SessionContext {
    pub fn new(session_id: SessionId) -> Self {
        Self { session_id }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }
}

/// Everything one browser session owns.
#[derive(Debug, Default)]
pub struct Session {
    pub catalog: Catalog,
    pub ledger: Ledger,
}

#[derive(Debug)]
struct Slot {
    session: Session,
    last_seen: Instant,
}

impl Slot {
    fn touch(&mut self) -> &mut Session {
        self.last_seen = Instant::now();
        &mut self.session
    }
}

/// Per-session in-memory state.
///
/// A session is stored from its first mutation until it has been idle longer than the
/// configured limit (see [`SessionStore::evict_idle`]). Each operation runs to completion
/// under the lock, so a session never observes a half-applied mutation.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<SessionId, Slot>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Slot>> {
        // Ledger operations never panic mid-mutation; a poisoned map is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the session, creating it if needed.
    pub fn with_session<R>(
        &self,
        session_id: SessionId,
        f: impl FnOnce(&mut Session) -> R,
    ) -> R {
        let mut sessions = self.lock();
        let slot = sessions.entry(session_id).or_insert_with(|| Slot {
            session: Session::default(),
            last_seen: Instant::now(),
        });
        f(slot.touch())
    }

    /// Run `f` against the session without creating it; unknown sessions read as empty.
    pub fn read_session<R>(
        &self,
        session_id: SessionId,
        f: impl FnOnce(&Session) -> R,
    ) -> R {
        let mut sessions = self.lock();
        match sessions.get_mut(&session_id) {
            Some(slot) => f(&*slot.touch()),
            None => f(&Session::default()),
        }
    }

    /// Drop sessions not touched within `idle`. Returns how many were dropped.
    pub fn evict_idle(&self, idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, slot| now.duration_since(slot.last_seen) < idle);
        before - sessions.len()
    }

    /// Periodically evict idle sessions for as long as the runtime lives.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_sweeper(&self, idle: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        let period = idle.clamp(Duration::from_secs(1), Duration::from_secs(60));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(idle);
                if evicted > 0 {
                    tracing::debug!(evicted, remaining = store.len(), "evicted idle sessions");
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
