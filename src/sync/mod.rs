//! Optimistic interaction synchronizer.
//!
//! Flips a like/favorite against the backend while keeping the local view
//! responsive: the like transition is written to the store before the network
//! round trip, then reconciled with the authoritative server values, or
//! rolled back to the pre-toggle snapshot on failure.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::api::ArtworkApi;
use crate::app::{ArtifyError, Result};
use crate::auth::Session;
use crate::domain::{
    apply_optimistic, reconcile, ArtworkId, InteractionKind, InteractionState, ServerToggle,
};
use crate::notify::{Notice, Notifier};
use crate::store::StoreHandle;

/// Result of a [`Synchronizer::toggle`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The toggle completed and this is the reconciled state.
    Applied(InteractionState),
    /// A toggle for the same (artwork, kind) pair was already in flight;
    /// this intent was dropped, no request was made.
    Dropped,
}

type PendingKey = (ArtworkId, InteractionKind);

/// Orchestrates the toggle protocol for like/favorite interactions.
///
/// The session is injected at construction; there is no ambient identity.
/// At most one toggle per (artwork, kind) pair is in flight at any time,
/// enforced by the keyed pending set. Store writes go through a weak handle,
/// so a response arriving after the owning view is gone is discarded.
pub struct Synchronizer {
    api: Arc<dyn ArtworkApi>,
    session: Option<Session>,
    store: StoreHandle,
    pending: Mutex<HashSet<PendingKey>>,
    notifier: Arc<dyn Notifier>,
}

impl Synchronizer {
    pub fn new(
        api: Arc<dyn ArtworkApi>,
        session: Option<Session>,
        store: StoreHandle,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            session,
            store,
            pending: Mutex::new(HashSet::new()),
            notifier,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Flip one interaction for one artwork.
    ///
    /// Exactly one network request on the happy path, zero when a guard
    /// short-circuits. On failure the pre-toggle snapshot is restored and the
    /// error is propagated after a user-facing notice; local state is never
    /// left inconsistent.
    pub async fn toggle(&self, id: &ArtworkId, kind: InteractionKind) -> Result<ToggleOutcome> {
        if self.session.is_none() {
            return Err(ArtifyError::Unauthenticated);
        }

        let key = (id.clone(), kind);
        {
            let mut pending = lock_pending(&self.pending);
            if !pending.insert(key.clone()) {
                tracing::debug!(artwork = %id, %kind, "toggle already in flight, dropping");
                return Ok(ToggleOutcome::Dropped);
            }
        }
        // Cleared on every exit path, including early returns below.
        let _guard = PendingGuard {
            pending: &self.pending,
            key,
        };

        let snapshot = self.store.get(id).unwrap_or_default();
        let optimistic = apply_optimistic(&snapshot, kind);
        if kind == InteractionKind::Like {
            self.store.put(id.clone(), optimistic.clone());
        }

        let result: Result<ServerToggle> = match kind {
            InteractionKind::Like => self.api.toggle_like(id).await.map(Into::into),
            InteractionKind::Favorite => self.api.toggle_favorite(id).await.map(Into::into),
        };

        // A resolution that lands after the owning view is gone has nothing
        // to update and no one to tell.
        match result {
            Ok(server) => {
                let state = reconcile(&optimistic, &server);
                if self.store.is_live() {
                    self.store.put(id.clone(), state.clone());
                    self.notifier.notify(Notice::success(success_message(kind, &state)));
                }
                Ok(ToggleOutcome::Applied(state))
            }
            Err(e) => {
                if self.store.is_live() {
                    self.store.put(id.clone(), snapshot);
                    self.notifier
                        .notify(Notice::error(failure_message(kind, &e)));
                }
                Err(e)
            }
        }
    }

    /// One-time read-only seed of the interaction state, performed when an
    /// authenticated user and an artwork first meet. A 404 from either check
    /// means "no interaction yet" and reads as `false`.
    pub async fn seed(&self, id: &ArtworkId) -> Result<InteractionState> {
        let Some(session) = &self.session else {
            return Err(ArtifyError::Unauthenticated);
        };

        let (liked, favorited) = futures::try_join!(
            self.api.like_status(id, &session.user_key),
            self.api.favorite_status(&session.user_key, id),
        )?;

        let mut state = self.store.get(id).unwrap_or_default();
        state.liked = liked;
        state.favorited = favorited;
        self.store.put(id.clone(), state.clone());
        Ok(state)
    }
}

fn lock_pending<'a>(
    pending: &'a Mutex<HashSet<PendingKey>>,
) -> std::sync::MutexGuard<'a, HashSet<PendingKey>> {
    // A panic while holding this lock is unrecoverable anyway.
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct PendingGuard<'a> {
    pending: &'a Mutex<HashSet<PendingKey>>,
    key: PendingKey,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        lock_pending(self.pending).remove(&self.key);
    }
}

fn success_message(kind: InteractionKind, state: &InteractionState) -> String {
    match kind {
        InteractionKind::Like if state.liked => "Added to likes".to_string(),
        InteractionKind::Like => "Removed from likes".to_string(),
        InteractionKind::Favorite if state.favorited => "Added to favorites".to_string(),
        InteractionKind::Favorite => "Removed from favorites".to_string(),
    }
}

fn failure_message(kind: InteractionKind, error: &ArtifyError) -> String {
    match error {
        ArtifyError::Api { status, message } => {
            format!("Failed to update {kind} ({status}): {message}")
        }
        _ => format!("Failed to update {kind}: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::api::testing::Gate;
    use crate::api::{FavoriteToggle, LikeToggle};
    use crate::domain::{Artwork, ArtworkFilter};
    use crate::notify::testing::RecordingNotifier;
    use crate::notify::NoticeLevel;
    use crate::store::InteractionStore;

    #[derive(Clone)]
    enum Script<T> {
        Succeed(T),
        Fail(u16),
    }

    impl<T: Clone> Script<T> {
        fn resolve(&self) -> Result<T> {
            match self {
                Script::Succeed(value) => Ok(value.clone()),
                Script::Fail(status) => Err(ArtifyError::Api {
                    status: *status,
                    message: "scripted failure".into(),
                }),
            }
        }
    }

    struct MockApi {
        like: Script<LikeToggle>,
        favorite: Script<FavoriteToggle>,
        like_status: bool,
        favorite_status: bool,
        gate: Option<Arc<Gate>>,
        toggle_calls: AtomicUsize,
    }

    impl MockApi {
        fn new() -> Self {
            Self {
                like: Script::Succeed(LikeToggle {
                    liked: Some(true),
                    likes_count: Some(6),
                }),
                favorite: Script::Succeed(FavoriteToggle {
                    favorited: Some(true),
                }),
                like_status: false,
                favorite_status: false,
                gate: None,
                toggle_calls: AtomicUsize::new(0),
            }
        }

        async fn pass_gate(&self) {
            if let Some(gate) = &self.gate {
                gate.entered.notify_one();
                gate.release.acquire().await.expect("gate closed").forget();
            }
        }

        fn calls(&self) -> usize {
            self.toggle_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ArtworkApi for MockApi {
        async fn toggle_like(&self, _id: &ArtworkId) -> Result<LikeToggle> {
            self.toggle_calls.fetch_add(1, Ordering::SeqCst);
            self.pass_gate().await;
            self.like.resolve()
        }

        async fn toggle_favorite(&self, _id: &ArtworkId) -> Result<FavoriteToggle> {
            self.toggle_calls.fetch_add(1, Ordering::SeqCst);
            self.pass_gate().await;
            self.favorite.resolve()
        }

        async fn like_status(&self, _id: &ArtworkId, _user_key: &str) -> Result<bool> {
            Ok(self.like_status)
        }

        async fn favorite_status(&self, _user_key: &str, _id: &ArtworkId) -> Result<bool> {
            Ok(self.favorite_status)
        }

        async fn artwork(&self, _id: &ArtworkId) -> Result<Artwork> {
            unreachable!("not exercised")
        }

        async fn featured(&self) -> Result<Vec<Artwork>> {
            unreachable!("not exercised")
        }

        async fn public(&self, _filter: &ArtworkFilter) -> Result<Vec<Artwork>> {
            unreachable!("not exercised")
        }

        async fn by_user(&self, _user_key: &str) -> Result<Vec<Artwork>> {
            unreachable!("not exercised")
        }

        async fn categories(&self) -> Result<Vec<String>> {
            unreachable!("not exercised")
        }

        async fn favorites(&self, _user_key: &str) -> Result<Vec<Artwork>> {
            unreachable!("not exercised")
        }

        async fn favorite_ids(&self, _user_key: &str) -> Result<Vec<String>> {
            unreachable!("not exercised")
        }

        async fn favorites_count(&self, _user_key: &str) -> Result<u64> {
            unreachable!("not exercised")
        }

        async fn add_favorite(&self, _user_key: &str, _id: &ArtworkId) -> Result<()> {
            unreachable!("not exercised")
        }

        async fn remove_favorite(&self, _user_key: &str, _id: &ArtworkId) -> Result<()> {
            unreachable!("not exercised")
        }

        async fn clear_favorites(&self, _user_key: &str) -> Result<()> {
            unreachable!("not exercised")
        }
    }

    fn artwork_id() -> ArtworkId {
        ArtworkId::parse("65f1c2d3e4a5b6c7d8e9f0a1").unwrap()
    }

    fn session() -> Session {
        Session {
            user_key: "ada@example.com".into(),
            token: "token-1".into(),
        }
    }

    fn seeded_store() -> InteractionStore {
        let store = InteractionStore::new();
        store.put(
            artwork_id(),
            InteractionState {
                liked: false,
                likes_count: 5,
                favorited: false,
            },
        );
        store
    }

    struct Harness {
        api: Arc<MockApi>,
        store: InteractionStore,
        notifier: Arc<RecordingNotifier>,
        sync: Arc<Synchronizer>,
    }

    fn harness(api: MockApi, session: Option<Session>) -> Harness {
        let api = Arc::new(api);
        let store = seeded_store();
        let notifier = Arc::new(RecordingNotifier::default());
        let sync = Arc::new(Synchronizer::new(
            api.clone(),
            session,
            store.handle(),
            notifier.clone(),
        ));
        Harness {
            api,
            store,
            notifier,
            sync,
        }
    }

    #[tokio::test]
    async fn test_unauthenticated_short_circuit() {
        let h = harness(MockApi::new(), None);

        let err = h
            .sync
            .toggle(&artwork_id(), InteractionKind::Like)
            .await
            .unwrap_err();

        assert!(err.is_unauthenticated());
        assert_eq!(h.api.calls(), 0);
        assert_eq!(h.store.get(&artwork_id()).unwrap().likes_count, 5);
    }

    #[tokio::test]
    async fn test_like_success_reconciles_to_server_values() {
        let h = harness(MockApi::new(), Some(session()));

        let outcome = h
            .sync
            .toggle(&artwork_id(), InteractionKind::Like)
            .await
            .unwrap();

        let state = h.store.get(&artwork_id()).unwrap();
        assert!(state.liked);
        assert_eq!(state.likes_count, 6);
        assert_eq!(outcome, ToggleOutcome::Applied(state));
        assert_eq!(h.api.calls(), 1);

        let notices = h.notifier.take();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn test_server_count_wins_over_optimistic() {
        let mut api = MockApi::new();
        // Another user liked concurrently: server says 7, optimistic said 6.
        api.like = Script::Succeed(LikeToggle {
            liked: Some(true),
            likes_count: Some(7),
        });
        let h = harness(api, Some(session()));

        h.sync
            .toggle(&artwork_id(), InteractionKind::Like)
            .await
            .unwrap();

        assert_eq!(h.store.get(&artwork_id()).unwrap().likes_count, 7);
    }

    #[tokio::test]
    async fn test_omitted_server_fields_keep_optimistic_values() {
        let mut api = MockApi::new();
        api.like = Script::Succeed(LikeToggle {
            liked: Some(true),
            likes_count: None,
        });
        let h = harness(api, Some(session()));

        h.sync
            .toggle(&artwork_id(), InteractionKind::Like)
            .await
            .unwrap();

        assert_eq!(h.store.get(&artwork_id()).unwrap().likes_count, 6);
    }

    #[tokio::test]
    async fn test_rollback_on_server_error() {
        let mut api = MockApi::new();
        api.like = Script::Fail(500);
        let h = harness(api, Some(session()));

        let err = h
            .sync
            .toggle(&artwork_id(), InteractionKind::Like)
            .await
            .unwrap_err();
        assert!(matches!(err, ArtifyError::Api { status: 500, .. }));

        // State is exactly what it was before the toggle began.
        let state = h.store.get(&artwork_id()).unwrap();
        assert!(!state.liked);
        assert_eq!(state.likes_count, 5);

        let notices = h.notifier.take();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_pending_clears_after_failure() {
        let mut api = MockApi::new();
        api.like = Script::Fail(500);
        let h = harness(api, Some(session()));

        let _ = h.sync.toggle(&artwork_id(), InteractionKind::Like).await;
        let _ = h.sync.toggle(&artwork_id(), InteractionKind::Like).await;

        // The pair is reusable; the second attempt issued its own request.
        assert_eq!(h.api.calls(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_toggle_dropped_while_in_flight() {
        let gate = Gate::new();
        let mut api = MockApi::new();
        api.gate = Some(gate.clone());
        let h = harness(api, Some(session()));

        let sync = h.sync.clone();
        let id = artwork_id();
        let first = tokio::spawn(async move { sync.toggle(&id, InteractionKind::Like).await });

        gate.entered.notified().await;

        // Second click while the first request is held open.
        let second = h
            .sync
            .toggle(&artwork_id(), InteractionKind::Like)
            .await
            .unwrap();
        assert_eq!(second, ToggleOutcome::Dropped);

        gate.open();
        let first = first.await.unwrap().unwrap();
        assert!(matches!(first, ToggleOutcome::Applied(_)));

        // Exactly one network request for the two clicks.
        assert_eq!(h.api.calls(), 1);
    }

    #[tokio::test]
    async fn test_optimistic_state_visible_before_resolution() {
        let gate = Gate::new();
        let mut api = MockApi::new();
        api.gate = Some(gate.clone());
        let h = harness(api, Some(session()));

        let sync = h.sync.clone();
        let id = artwork_id();
        let task = tokio::spawn(async move { sync.toggle(&id, InteractionKind::Like).await });

        gate.entered.notified().await;

        // The view re-renders from this state before the server answered.
        let state = h.store.get(&artwork_id()).unwrap();
        assert!(state.liked);
        assert_eq!(state.likes_count, 6);

        gate.open();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_favorite_has_no_optimistic_change() {
        let gate = Gate::new();
        let mut api = MockApi::new();
        api.gate = Some(gate.clone());
        let h = harness(api, Some(session()));

        let sync = h.sync.clone();
        let id = artwork_id();
        let task = tokio::spawn(async move { sync.toggle(&id, InteractionKind::Favorite).await });

        gate.entered.notified().await;
        assert!(!h.store.get(&artwork_id()).unwrap().favorited);

        gate.open();
        task.await.unwrap().unwrap();
        assert!(h.store.get(&artwork_id()).unwrap().favorited);
    }

    #[tokio::test]
    async fn test_independent_kinds_may_be_in_flight_together() {
        let gate = Gate::new();
        let mut api = MockApi::new();
        api.gate = Some(gate.clone());
        let h = harness(api, Some(session()));

        let sync = h.sync.clone();
        let id = artwork_id();
        let like = tokio::spawn(async move { sync.toggle(&id, InteractionKind::Like).await });
        gate.entered.notified().await;

        // A favorite for the same artwork is a different pending key.
        let sync = h.sync.clone();
        let id = artwork_id();
        let favorite =
            tokio::spawn(async move { sync.toggle(&id, InteractionKind::Favorite).await });
        gate.entered.notified().await;

        gate.release.add_permits(2);
        assert!(matches!(
            like.await.unwrap().unwrap(),
            ToggleOutcome::Applied(_)
        ));
        assert!(matches!(
            favorite.await.unwrap().unwrap(),
            ToggleOutcome::Applied(_)
        ));
        assert_eq!(h.api.calls(), 2);
    }

    #[tokio::test]
    async fn test_resolution_after_store_drop_is_ignored() {
        let gate = Gate::new();
        let mut api = MockApi::new();
        api.gate = Some(gate.clone());
        let h = harness(api, Some(session()));

        let sync = h.sync.clone();
        let id = artwork_id();
        let task = tokio::spawn(async move { sync.toggle(&id, InteractionKind::Like).await });
        gate.entered.notified().await;

        // View unmounts while the request is pending.
        drop(h.store);
        gate.open();

        // The toggle still resolves cleanly; the write simply went nowhere
        // and no notice was raised for the dead view.
        let outcome = task.await.unwrap().unwrap();
        assert!(matches!(outcome, ToggleOutcome::Applied(_)));
        assert!(h.notifier.take().is_empty());
    }

    #[tokio::test]
    async fn test_seed_writes_statuses_and_keeps_count() {
        let mut api = MockApi::new();
        api.like_status = true;
        api.favorite_status = false;
        let h = harness(api, Some(session()));

        let state = h.sync.seed(&artwork_id()).await.unwrap();

        assert!(state.liked);
        assert!(!state.favorited);
        assert_eq!(state.likes_count, 5);
        assert_eq!(h.store.get(&artwork_id()).unwrap(), state);
    }

    #[tokio::test]
    async fn test_seed_requires_session() {
        let h = harness(MockApi::new(), None);
        let err = h.sync.seed(&artwork_id()).await.unwrap_err();
        assert!(err.is_unauthenticated());
    }
}
