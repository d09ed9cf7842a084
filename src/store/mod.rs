use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use crate::domain::{Artwork, ArtworkId, InteractionState};

type StateMap = Mutex<HashMap<ArtworkId, InteractionState>>;

/// Per-process cache of interaction state, keyed by artwork.
///
/// The store is exclusively owned by the surface that renders it (a CLI
/// command or the TUI). The synchronizer only ever holds a [`StoreHandle`],
/// so once the owning surface drops the store, late responses from in-flight
/// requests are silently discarded instead of writing to a dead view.
pub struct InteractionStore {
    inner: Arc<StateMap>,
}

impl InteractionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn handle(&self) -> StoreHandle {
        StoreHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn get(&self, id: &ArtworkId) -> Option<InteractionState> {
        self.inner.lock().ok()?.get(id).cloned()
    }

    pub fn put(&self, id: ArtworkId, state: InteractionState) {
        if let Ok(mut map) = self.inner.lock() {
            map.insert(id, state);
        }
    }

    /// Seed the likes counter from a fetched projection without touching the
    /// per-user booleans (those come from the status-check endpoints).
    pub fn prime(&self, artwork: &Artwork) {
        let Some(id) = artwork.interactive_id() else {
            return;
        };
        if let Ok(mut map) = self.inner.lock() {
            let state = map.entry(id).or_default();
            state.likes_count = artwork.likes_count;
        }
    }
}

impl Default for InteractionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak reference to an [`InteractionStore`], safe to hold across await
/// points. Reads and writes are no-ops once the store is gone.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Weak<StateMap>,
}

impl StoreHandle {
    pub fn get(&self, id: &ArtworkId) -> Option<InteractionState> {
        let inner = self.inner.upgrade()?;
        let map = inner.lock().ok()?;
        map.get(id).cloned()
    }

    pub fn put(&self, id: ArtworkId, state: InteractionState) {
        if let Some(inner) = self.inner.upgrade() {
            if let Ok(mut map) = inner.lock() {
                map.insert(id, state);
            }
        }
    }

    pub fn is_live(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
