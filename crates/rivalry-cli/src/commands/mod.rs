//! Command handlers and the wiring they share.

pub mod compare;
pub mod history;
pub mod render;
pub mod saved;

use anyhow::{Context, Result};
use rivalry_application::{
    BookmarkStore, FeedbackLedger, HistoryLedger, PersonaCache, SessionCoordinator,
    ThemePreference,
};
use rivalry_core::clock::{Clock, SystemClock};
use rivalry_core::config::RivalryConfig;
use rivalry_core::store::PersistentStore;
use rivalry_infrastructure::{ConfigService, FileStore, RivalryPaths, UrlShareLink};
use rivalry_interaction::GeminiClient;
use std::sync::Arc;

/// Long-lived components, built once per invocation.
pub struct AppContext {
    pub config: RivalryConfig,
    pub clock: Arc<dyn Clock>,
    pub store: Arc<dyn PersistentStore>,
    pub history: Arc<HistoryLedger>,
    pub bookmarks: Arc<BookmarkStore>,
    pub feedback: FeedbackLedger,
    pub theme: ThemePreference,
}

impl AppContext {
    pub fn load(paths: RivalryPaths) -> Result<Self> {
        let config = ConfigService::new(&paths)?
            .get_config()
            .context("Failed to load configuration")?;

        let state_file = match &config.storage.path {
            Some(path) => path.clone(),
            None => paths.state_file()?,
        };
        tracing::debug!("[CLI] Using state file {:?}", state_file);

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store: Arc<dyn PersistentStore> = Arc::new(FileStore::open(state_file));

        Ok(Self {
            history: Arc::new(HistoryLedger::new(store.clone(), clock.clone())),
            bookmarks: Arc::new(BookmarkStore::new(store.clone(), clock.clone())),
            feedback: FeedbackLedger::new(store.clone()),
            theme: ThemePreference::new(store.clone()),
            config,
            clock,
            store,
        })
    }

    /// Builds the networked session pieces; needs a Gemini API key.
    pub fn session(&self, share: Arc<UrlShareLink>) -> Result<Session> {
        let gemini = Arc::new(
            GeminiClient::from_config(&self.config.gemini)
                .context("Gemini is not configured")?,
        );
        let personas = Arc::new(PersonaCache::new(gemini.clone(), self.store.clone()));
        let coordinator = SessionCoordinator::new(
            gemini,
            self.history.clone(),
            self.bookmarks.clone(),
            personas.clone(),
            share,
            self.clock.clone(),
        );
        Ok(Session {
            coordinator,
            personas,
        })
    }

    pub fn share_link(&self, link: &str) -> Result<Arc<UrlShareLink>> {
        Ok(Arc::new(UrlShareLink::parse(link, self.config.share.param.clone())?))
    }
}

pub struct Session {
    pub coordinator: SessionCoordinator,
    pub personas: Arc<PersonaCache>,
}
