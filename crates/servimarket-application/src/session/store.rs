//! Session store.
//!
//! Owns the authentication state and mediates between the view layer, the
//! key-value persistence collaborator, and the user directory. Every state
//! change goes through [`apply`] and is broadcast on a watch channel.

use super::writer::SessionWriter;
use crate::error::LoginError;
use servimarket_core::directory::UserDirectory;
use servimarket_core::session::{apply, AuthEvent, AuthState, Role, Session, SessionPatch};
use servimarket_core::storage::{KeyValueStore, SESSION_KEY};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Builder for [`SessionStore`].
///
/// The store only exists bootstrapped (or bootstrapping): both finishing
/// methods read the persisted session exactly once.
pub struct SessionStoreBuilder {
    storage: Arc<dyn KeyValueStore>,
    directory: Arc<dyn UserDirectory>,
    login_delay: Duration,
}

impl SessionStoreBuilder {
    /// Simulated backend latency applied before each credential lookup.
    pub fn login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    /// Builds the store and waits for bootstrap to finish.
    pub async fn start(self) -> SessionStore {
        let store = self.build();
        store.bootstrap().await;
        store
    }

    /// Builds the store and bootstraps it on a spawned task.
    ///
    /// The returned store reports `Initializing` until the persisted session
    /// has been read.
    pub fn spawn(self) -> (SessionStore, JoinHandle<()>) {
        let store = self.build();
        let background = store.clone();
        let handle = tokio::spawn(async move { background.bootstrap().await });
        (store, handle)
    }

    /// Must run within a tokio runtime: the session writer is spawned here.
    fn build(self) -> SessionStore {
        let (state, _) = watch::channel(AuthState::initial());
        let writer = SessionWriter::spawn(self.storage.clone());
        SessionStore {
            inner: Arc::new(Inner {
                storage: self.storage,
                writer,
                runtime: Handle::current(),
                directory: self.directory,
                login_delay: self.login_delay,
                state,
                bootstrapped: AtomicBool::new(false),
            }),
        }
    }
}

struct Inner {
    /// Read directly at bootstrap; all writes go through `writer`.
    storage: Arc<dyn KeyValueStore>,
    writer: SessionWriter,
    runtime: Handle,
    directory: Arc<dyn UserDirectory>,
    login_delay: Duration,
    /// Current state; the sender doubles as the state cell.
    state: watch::Sender<AuthState>,
    bootstrapped: AtomicBool,
}

/// Process-wide authentication state with login/logout/update operations.
///
/// Cloning yields another handle to the same store.
///
/// # Concurrency
///
/// Each transition is applied atomically, and persistence writes land in the
/// order they were issued. Overlapping `login` calls are not sequenced against
/// each other. Callers serialize login attempts, for
/// example by disabling the trigger while `is_loading` is true.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    pub fn builder(
        storage: Arc<dyn KeyValueStore>,
        directory: Arc<dyn UserDirectory>,
    ) -> SessionStoreBuilder {
        SessionStoreBuilder {
            storage,
            directory,
            login_delay: Duration::ZERO,
        }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Returns a receiver notified after every transition.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.inner.state.borrow().session.clone()
    }

    /// Attempts to sign in. Returns `true` on success.
    ///
    /// Wrong credentials and persistence failures both yield `false`; use
    /// [`Self::login_detailed`] to tell them apart.
    pub async fn login(&self, email: &str, secret: &str, role: Role) -> bool {
        self.login_detailed(email, secret, role).await.is_ok()
    }

    /// Attempts to sign in, reporting why a failed attempt failed.
    ///
    /// State ends `Authenticated` on `Ok` and `Unauthenticated` on `Err`.
    pub async fn login_detailed(
        &self,
        email: &str,
        secret: &str,
        role: Role,
    ) -> Result<Session, LoginError> {
        self.dispatch(AuthEvent::LoginAttempt);

        if !self.inner.login_delay.is_zero() {
            tokio::time::sleep(self.inner.login_delay).await;
        }

        match self.authenticate(email, secret, role).await {
            Ok(session) => {
                tracing::info!(
                    "[SessionStore] Signed in user {} ({})",
                    session.id,
                    session.role
                );
                self.dispatch(AuthEvent::LoginSuccess(session.clone()));
                Ok(session)
            }
            Err(LoginError::InvalidCredentials) => {
                tracing::info!("[SessionStore] Rejected login for {} as {}", email, role);
                self.dispatch(AuthEvent::LoginFailure);
                Err(LoginError::InvalidCredentials)
            }
            Err(err) => {
                tracing::error!("[SessionStore] Error during login: {}", err);
                self.dispatch(AuthEvent::LoginFailure);
                Err(err)
            }
        }
    }

    /// Signs out. The in-memory state is cleared even if the persisted
    /// record cannot be removed.
    pub async fn logout(&self) {
        // queued behind any pending update, so a stale record cannot reappear
        if let Err(e) = SessionWriter::settle(self.inner.writer.clear()).await {
            tracing::error!("[SessionStore] Error during logout: {}", e);
        }
        self.dispatch(AuthEvent::Logout);
        tracing::info!("[SessionStore] Signed out");
    }

    /// Merges `patch` into the active session and re-persists it.
    ///
    /// Does nothing and returns `None` when no session is active. Otherwise
    /// the new state is visible as soon as this returns, and the write is
    /// queued behind earlier writes. The returned handle resolves once it has
    /// landed; dropping it leaves the write fire-and-forget. Write failures
    /// are logged, never raised.
    pub fn update_user(&self, patch: SessionPatch) -> Option<JoinHandle<()>> {
        let mut pending = None;
        let applied = self.inner.state.send_if_modified(|state| {
            if state.session.is_none() {
                return false;
            }
            let current = std::mem::take(state);
            *state = apply(current, AuthEvent::UpdateSession(patch));

            // queue while the state is held so writes follow update order
            match state.session.as_ref().map(Session::to_json) {
                Some(Ok(raw)) => pending = Some(self.inner.writer.save(raw)),
                Some(Err(e)) => {
                    tracing::error!("[SessionStore] Failed to serialize session: {}", e)
                }
                None => {}
            }
            true
        });

        if !applied {
            tracing::debug!("[SessionStore] update_user ignored: no active session");
            return None;
        }

        let pending = pending?;
        Some(self.inner.runtime.spawn(async move {
            if let Err(e) = SessionWriter::settle(pending).await {
                tracing::error!("[SessionStore] Failed to persist session update: {}", e);
            }
        }))
    }

    async fn authenticate(&self, email: &str, secret: &str, role: Role) -> Result<Session, LoginError> {
        let record = self
            .inner
            .directory
            .find(email, role)
            .filter(|_| self.inner.directory.accepts_secret(secret))
            .ok_or(LoginError::InvalidCredentials)?;

        let session = record.to_session();
        let raw = session.to_json()?;
        SessionWriter::settle(self.inner.writer.save(raw)).await?;

        Ok(session)
    }

    /// Reads the persisted session once per store lifetime.
    async fn bootstrap(&self) {
        if self.inner.bootstrapped.swap(true, Ordering::SeqCst) {
            tracing::warn!("[SessionStore] Bootstrap already ran, ignoring");
            return;
        }

        self.dispatch(AuthEvent::Bootstrap);

        let event = match self.inner.storage.get(SESSION_KEY).await {
            Ok(Some(raw)) => match Session::from_json(&raw) {
                Ok(session) => {
                    tracing::info!("[Bootstrap] Restored session for user {}", session.id);
                    AuthEvent::BootstrapFound(session)
                }
                Err(e) => {
                    tracing::warn!("[Bootstrap] Ignoring malformed session record: {}", e);
                    AuthEvent::BootstrapEmpty
                }
            },
            Ok(None) => {
                tracing::info!("[Bootstrap] No persisted session");
                AuthEvent::BootstrapEmpty
            }
            Err(e) => {
                tracing::error!("[Bootstrap] Error checking auth status: {}", e);
                AuthEvent::BootstrapEmpty
            }
        };

        self.dispatch(event);
    }

    fn dispatch(&self, event: AuthEvent) {
        let name = event.name();
        self.inner.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = apply(current, event);
        });
        tracing::debug!(event = name, "[SessionStore] Transition applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use servimarket_core::error::{MarketError, Result as MarketResult};
    use servimarket_core::session::AuthPhase;
    use servimarket_infrastructure::{FileKeyValueStore, MemoryKeyValueStore, StaticUserDirectory};
    use tokio::sync::Notify;

    /// Wraps a memory store and fails selected operations on demand.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryKeyValueStore,
        fail_get: AtomicBool,
        fail_set: AtomicBool,
        fail_remove: AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> MarketResult<Option<String>> {
            if self.fail_get.load(Ordering::SeqCst) {
                return Err(MarketError::storage("get unavailable"));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> MarketResult<()> {
            if self.fail_set.load(Ordering::SeqCst) {
                return Err(MarketError::storage("set unavailable"));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> MarketResult<()> {
            if self.fail_remove.load(Ordering::SeqCst) {
                return Err(MarketError::storage("remove unavailable"));
            }
            self.inner.remove(key).await
        }
    }

    /// Holds every `set` until released, to observe in-flight state.
    struct GatedStore {
        inner: MemoryKeyValueStore,
        gate: Notify,
    }

    #[async_trait]
    impl KeyValueStore for GatedStore {
        async fn get(&self, key: &str) -> MarketResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> MarketResult<()> {
            self.gate.notified().await;
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> MarketResult<()> {
            self.inner.remove(key).await
        }
    }

    fn directory() -> Arc<dyn UserDirectory> {
        Arc::new(StaticUserDirectory::with_fixtures())
    }

    async fn store_over(storage: Arc<dyn KeyValueStore>) -> SessionStore {
        SessionStore::builder(storage, directory()).start().await
    }

    fn assert_signed_out(state: &AuthState) {
        assert!(state.session.is_none());
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.phase, AuthPhase::Unauthenticated);
    }

    #[tokio::test]
    async fn test_bootstrap_with_empty_storage() {
        let store = store_over(Arc::new(MemoryKeyValueStore::new())).await;
        assert_signed_out(&store.snapshot());
    }

    #[tokio::test]
    async fn test_login_client_succeeds() {
        let store = store_over(Arc::new(MemoryKeyValueStore::new())).await;

        assert!(store.login("juan@example.com", "123456", Role::Client).await);

        let state = store.snapshot();
        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        let session = state.session.unwrap();
        assert_eq!(session.id, "1");
        assert_eq!(session.role, Role::Client);
    }

    #[tokio::test]
    async fn test_login_wrong_secret_fails() {
        let storage = MemoryKeyValueStore::new();
        let store = store_over(Arc::new(storage.clone())).await;

        assert!(!store.login("juan@example.com", "wrongpass", Role::Client).await);

        assert_signed_out(&store.snapshot());
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_login_role_mismatch_fails() {
        let store = store_over(Arc::new(MemoryKeyValueStore::new())).await;
        assert!(!store.login("maria@example.com", "123456", Role::Client).await);
        assert_signed_out(&store.snapshot());
    }

    #[tokio::test]
    async fn test_login_business_succeeds() {
        let store = store_over(Arc::new(MemoryKeyValueStore::new())).await;
        let session = store
            .login_detailed("maria@example.com", "123456", Role::Business)
            .await
            .unwrap();
        assert_eq!(session.id, "2");
        assert_eq!(store.current_session(), Some(session));
    }

    #[tokio::test]
    async fn test_failed_login_clears_previous_session() {
        let store = store_over(Arc::new(MemoryKeyValueStore::new())).await;
        assert!(store.login("juan@example.com", "123456", Role::Client).await);

        assert!(!store.login("juan@example.com", "nope", Role::Client).await);

        assert_signed_out(&store.snapshot());
    }

    #[tokio::test]
    async fn test_login_persistence_failure_returns_false() {
        let storage = Arc::new(FlakyStore::default());
        storage.fail_set.store(true, Ordering::SeqCst);
        let store = store_over(storage.clone()).await;

        assert!(!store.login("juan@example.com", "123456", Role::Client).await);
        assert_signed_out(&store.snapshot());

        let err = store
            .login_detailed("juan@example.com", "123456", Role::Client)
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::Storage(ref e) if e.is_storage()));
    }

    #[tokio::test]
    async fn test_login_detailed_separates_invalid_credentials() {
        let store = store_over(Arc::new(MemoryKeyValueStore::new())).await;
        let err = store
            .login_detailed("nobody@example.com", "123456", Role::Client)
            .await
            .unwrap_err();
        assert!(err.is_invalid_credentials());
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let storage = MemoryKeyValueStore::new();
        let first = store_over(Arc::new(storage.clone())).await;
        assert!(first.login("juan@example.com", "123456", Role::Client).await);
        let produced = first.current_session().unwrap();

        let second = store_over(Arc::new(storage)).await;
        let state = second.snapshot();
        assert!(state.is_authenticated);
        assert_eq!(state.session, Some(produced));
    }

    #[tokio::test]
    async fn test_session_survives_restart_on_disk() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");

        let first = store_over(Arc::new(FileKeyValueStore::new(path.clone()))).await;
        assert!(first.login("maria@example.com", "123456", Role::Business).await);

        let second = store_over(Arc::new(FileKeyValueStore::new(path))).await;
        assert_eq!(second.current_session(), first.current_session());
    }

    #[tokio::test]
    async fn test_bootstrap_with_well_formed_record() {
        let raw = r#"{"id":"7","name":"Lucía","email":"lucia@example.com","phone":"+34600000000","userType":"client"}"#;
        let storage = MemoryKeyValueStore::with_entries([(SESSION_KEY, raw)]);

        let store = store_over(Arc::new(storage)).await;

        let state = store.snapshot();
        assert!(state.is_authenticated);
        assert_eq!(state.phase, AuthPhase::Authenticated);
        assert_eq!(state.session.unwrap().name, "Lucía");
    }

    #[tokio::test]
    async fn test_bootstrap_with_malformed_record() {
        let storage = MemoryKeyValueStore::with_entries([(SESSION_KEY, "{\"id\": 1,")]);
        let store = store_over(Arc::new(storage)).await;
        assert_signed_out(&store.snapshot());
    }

    #[tokio::test]
    async fn test_bootstrap_read_failure_is_unauthenticated() {
        let storage = Arc::new(FlakyStore::default());
        storage.fail_get.store(true, Ordering::SeqCst);
        let store = store_over(storage).await;
        assert_signed_out(&store.snapshot());
    }

    #[tokio::test]
    async fn test_spawn_reports_initializing_until_bootstrapped() {
        let (store, handle) =
            SessionStore::builder(Arc::new(MemoryKeyValueStore::new()), directory()).spawn();
        let mut updates = store.subscribe();

        // current-thread runtime: the bootstrap task has not run yet
        assert_eq!(store.snapshot().phase, AuthPhase::Initializing);
        assert!(store.snapshot().is_loading);

        handle.await.unwrap();

        assert!(updates.has_changed().unwrap());
        assert_signed_out(&updates.borrow_and_update());
    }

    #[tokio::test]
    async fn test_bootstrap_runs_once() {
        let storage = MemoryKeyValueStore::new();
        let store = store_over(Arc::new(storage.clone())).await;
        assert!(store.login("juan@example.com", "123456", Role::Client).await);

        store.bootstrap().await;

        assert!(store.snapshot().is_authenticated);
    }

    #[tokio::test]
    async fn test_logout_clears_state_and_storage() {
        let storage = MemoryKeyValueStore::new();
        let store = store_over(Arc::new(storage.clone())).await;
        assert!(store.login("juan@example.com", "123456", Role::Client).await);

        store.logout().await;

        assert_signed_out(&store.snapshot());
        assert_eq!(storage.get(SESSION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_when_signed_out_is_unchanged() {
        let store = store_over(Arc::new(MemoryKeyValueStore::new())).await;
        let before = store.snapshot();
        store.logout().await;
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_logout_remove_failure_still_signs_out() {
        let storage = Arc::new(FlakyStore::default());
        let store = store_over(storage.clone()).await;
        assert!(store.login("juan@example.com", "123456", Role::Client).await);
        storage.fail_remove.store(true, Ordering::SeqCst);

        store.logout().await;

        assert_signed_out(&store.snapshot());
    }

    #[tokio::test]
    async fn test_update_user_merges_and_persists() {
        let storage = MemoryKeyValueStore::new();
        let store = store_over(Arc::new(storage.clone())).await;
        assert!(store.login("juan@example.com", "123456", Role::Client).await);

        let write = store
            .update_user(SessionPatch::new().with_phone("+34600111222"))
            .unwrap();

        let session = store.current_session().unwrap();
        assert_eq!(session.phone, "+34600111222");
        assert_eq!(session.name, "Juan Pérez");
        assert_eq!(session.email, "juan@example.com");

        write.await.unwrap();
        let raw = storage.get(SESSION_KEY).await.unwrap().unwrap();
        assert_eq!(Session::from_json(&raw).unwrap(), session);
    }

    #[tokio::test]
    async fn test_update_user_without_session_is_noop() {
        let storage = MemoryKeyValueStore::new();
        let store = store_over(Arc::new(storage.clone())).await;

        assert!(store.update_user(SessionPatch::new().with_name("B")).is_none());

        assert_signed_out(&store.snapshot());
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_user_write_failure_keeps_state() {
        let storage = Arc::new(FlakyStore::default());
        let store = store_over(storage.clone()).await;
        assert!(store.login("juan@example.com", "123456", Role::Client).await);
        storage.fail_set.store(true, Ordering::SeqCst);

        let write = store.update_user(SessionPatch::new().with_name("Juan P.")).unwrap();
        write.await.unwrap();

        assert_eq!(store.current_session().unwrap().name, "Juan P.");
        assert!(store.snapshot().is_authenticated);
    }

    #[tokio::test]
    async fn test_login_is_loading_while_persisting() {
        let storage = Arc::new(GatedStore {
            inner: MemoryKeyValueStore::new(),
            gate: Notify::new(),
        });
        let store = store_over(storage.clone()).await;
        let mut updates = store.subscribe();
        updates.borrow_and_update();

        let attempt = {
            let store = store.clone();
            tokio::spawn(async move { store.login("juan@example.com", "123456", Role::Client).await })
        };

        updates.changed().await.unwrap();
        let in_flight = updates.borrow_and_update().clone();
        assert!(in_flight.is_loading);
        assert_eq!(in_flight.phase, AuthPhase::LoadingTransition);
        assert!(in_flight.is_consistent());

        storage.gate.notify_one();
        assert!(attempt.await.unwrap());
        assert!(!store.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_login_delay_is_applied() {
        let store = SessionStore::builder(Arc::new(MemoryKeyValueStore::new()), directory())
            .login_delay(Duration::from_millis(20))
            .start()
            .await;

        let started = tokio::time::Instant::now();
        assert!(store.login("juan@example.com", "123456", Role::Client).await);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_every_observed_state_is_consistent() {
        let storage = Arc::new(FlakyStore::default());
        let store = store_over(storage.clone()).await;
        let mut updates = store.subscribe();

        let mut observed = vec![store.snapshot()];
        store.login("juan@example.com", "123456", Role::Client).await;
        observed.push(updates.borrow_and_update().clone());
        store.update_user(SessionPatch::new().with_phone("2"));
        observed.push(updates.borrow_and_update().clone());
        storage.fail_set.store(true, Ordering::SeqCst);
        store.login("juan@example.com", "123456", Role::Client).await;
        observed.push(updates.borrow_and_update().clone());
        store.logout().await;
        observed.push(updates.borrow_and_update().clone());

        assert!(observed.iter().all(AuthState::is_consistent));
    }

    #[tokio::test]
    async fn test_update_then_logout_stays_signed_out_after_restart() {
        let storage = MemoryKeyValueStore::new();
        let store = store_over(Arc::new(storage.clone())).await;
        assert!(store.login("juan@example.com", "123456", Role::Client).await);

        drop(store.update_user(SessionPatch::new().with_phone("9")));
        store.logout().await;
        tokio::task::yield_now().await;

        let restarted = store_over(Arc::new(storage.clone())).await;
        assert_signed_out(&restarted.snapshot());
        assert_eq!(storage.get(SESSION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_back_to_back_updates_persist_the_last_one() {
        let storage = MemoryKeyValueStore::new();
        let store = store_over(Arc::new(storage.clone())).await;
        assert!(store.login("juan@example.com", "123456", Role::Client).await);

        let mut last = None;
        for n in 0..4 {
            last = store.update_user(SessionPatch::new().with_phone(format!("p{}", n)));
        }
        last.unwrap().await.unwrap();

        let restarted = store_over(Arc::new(storage)).await;
        assert_eq!(restarted.current_session().unwrap().phone, "p3");
        assert_eq!(restarted.current_session(), store.current_session());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_updates_on_disk_match_memory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        let store = store_over(Arc::new(FileKeyValueStore::new(path.clone()))).await;
        assert!(store.login("juan@example.com", "123456", Role::Client).await);

        for round in 0..10 {
            let writes: Vec<_> = (0..4)
                .filter_map(|n| {
                    store.update_user(SessionPatch::new().with_phone(format!("r{}p{}", round, n)))
                })
                .collect();
            for write in writes {
                write.await.unwrap();
            }

            let on_disk = FileKeyValueStore::new(path.clone())
                .get(SESSION_KEY)
                .await
                .unwrap()
                .map(|raw| Session::from_json(&raw).unwrap());
            assert_eq!(on_disk, store.current_session(), "round {}", round);
        }
    }
}
