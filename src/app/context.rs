use std::sync::Arc;

use crate::api::http::HttpApi;
use crate::api::ArtworkApi;
use crate::app::Result;
use crate::auth::Session;
use crate::config::Config;
use crate::notify::Notifier;
use crate::store::InteractionStore;
use crate::sync::Synchronizer;

/// Wires together the pieces every surface needs: the API client, the
/// stored session (if any), the interaction store, and the synchronizer.
///
/// The context owns the store; the synchronizer only holds a weak handle to
/// it, so dropping the context invalidates any still-pending writes.
pub struct AppContext {
    pub api: Arc<dyn ArtworkApi>,
    pub session: Option<Session>,
    pub store: InteractionStore,
    pub sync: Synchronizer,
}

impl AppContext {
    pub fn new(notifier: Arc<dyn Notifier>) -> Result<Self> {
        let config = Config::load()?;
        let session = Session::load()?;
        Self::with_config(config, session, notifier)
    }

    pub fn with_config(
        config: Config,
        session: Option<Session>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let api: Arc<dyn ArtworkApi> = Arc::new(HttpApi::new(&config.api, session.as_ref())?);
        let store = InteractionStore::new();
        let sync = Synchronizer::new(api.clone(), session.clone(), store.handle(), notifier);

        Ok(Self {
            api,
            session,
            store,
            sync,
        })
    }

    /// Wire a context around an already-built API client; tests use this to
    /// substitute a canned backend.
    #[cfg(test)]
    pub fn from_parts(
        api: Arc<dyn ArtworkApi>,
        session: Option<Session>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let store = InteractionStore::new();
        let sync = Synchronizer::new(api.clone(), session.clone(), store.handle(), notifier);
        Self {
            api,
            session,
            store,
            sync,
        }
    }

    /// The current user's key, when signed in.
    pub fn user_key(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_key.as_str())
    }
}
