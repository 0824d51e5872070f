//! The search session state machine.
//!
//! ```text
//! Idle ──search──▶ Loading ──ok──▶ Success
//!                     │  ▲           │
//!                     │  └──search───┤
//!                     └──err──▶ Error ┘
//! ```
//!
//! Each dispatch bumps a sequence number under the state lock. A completion
//! is applied only if its number is still the latest, so overlapping searches
//! resolve to the last one issued regardless of arrival order. Loading a
//! bookmark also bumps the sequence.

use rivalry_core::analysis::{AnalysisResult, SavedComparison};
use rivalry_core::clock::Clock;
use rivalry_core::comparison::ComparisonService;
use rivalry_core::extraction::{extract_record, extract_sources};
use rivalry_core::history::HistoryEntry;
use rivalry_core::share::ShareLink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::bookmark_store::BookmarkStore;
use crate::history_ledger::HistoryLedger;
use crate::persona_cache::PersonaCache;

/// Shown for every failed comparison; the cause is only logged.
pub const GENERIC_ERROR_MESSAGE: &str = "Failed to generate comparison. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Loading { query: String },
    Success(Box<AnalysisResult>),
    Error { query: String, message: String },
}

impl SessionState {
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Success(result) => Some(result.as_ref()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

struct Session {
    state: SessionState,
    sequence: u64,
}

pub struct SessionCoordinator {
    comparison: Arc<dyn ComparisonService>,
    history: Arc<HistoryLedger>,
    bookmarks: Arc<BookmarkStore>,
    personas: Arc<PersonaCache>,
    share: Arc<dyn ShareLink>,
    clock: Arc<dyn Clock>,
    session: RwLock<Session>,
    deep_link_read: AtomicBool,
    persona_prefetch: Mutex<Option<JoinHandle<()>>>,
}

impl SessionCoordinator {
    pub fn new(
        comparison: Arc<dyn ComparisonService>,
        history: Arc<HistoryLedger>,
        bookmarks: Arc<BookmarkStore>,
        personas: Arc<PersonaCache>,
        share: Arc<dyn ShareLink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            comparison,
            history,
            bookmarks,
            personas,
            share,
            clock,
            session: RwLock::new(Session {
                state: SessionState::Idle,
                sequence: 0,
            }),
            deep_link_read: AtomicBool::new(false),
            persona_prefetch: Mutex::new(None),
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.session.read().await.state.clone()
    }

    pub async fn current_result(&self) -> Option<AnalysisResult> {
        self.session.read().await.state.result().cloned()
    }

    /// Runs a comparison for `query` and returns the state afterwards.
    ///
    /// Blank queries are ignored. If another search or a bookmark load
    /// happens while this one is in flight, its outcome is discarded.
    pub async fn search(&self, query: &str) -> SessionState {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("[Session] Ignoring blank query");
            return self.snapshot().await;
        }

        let sequence = {
            let mut session = self.session.write().await;
            session.sequence += 1;
            session.state = SessionState::Loading {
                query: query.to_string(),
            };
            session.sequence
        };
        self.share.write_query(query);
        tracing::info!("[Session] Dispatching #{} '{}'", sequence, query);

        let outcome = self.comparison.compare(query).await;

        let mut session = self.session.write().await;
        if session.sequence != sequence {
            tracing::debug!(
                "[Session] Dropping stale completion #{} (latest #{})",
                sequence,
                session.sequence
            );
            return session.state.clone();
        }

        match outcome {
            Ok(raw) => {
                let extraction = extract_record(&raw.text);
                let sources = raw
                    .grounding
                    .as_ref()
                    .map(extract_sources)
                    .unwrap_or_default();
                let result =
                    AnalysisResult::new(query, extraction, sources, self.clock.now_millis());
                tracing::info!(
                    "[Session] #{} succeeded (structured: {}, sources: {})",
                    sequence,
                    result.is_structured(),
                    result.sources.len()
                );

                self.history.record(query);
                session.state = SessionState::Success(Box::new(result.clone()));
                drop(session);

                self.spawn_persona_prefetch(result.clone());
                SessionState::Success(Box::new(result))
            }
            Err(e) => {
                tracing::error!("[Session] #{} failed for '{}': {}", sequence, query, e);
                session.state = SessionState::Error {
                    query: query.to_string(),
                    message: GENERIC_ERROR_MESSAGE.to_string(),
                };
                session.state.clone()
            }
        }
    }

    /// Runs the query carried by the share link, at most once per coordinator.
    pub async fn load_deep_link(&self) -> Option<SessionState> {
        if self.deep_link_read.swap(true, Ordering::SeqCst) {
            return None;
        }
        let query = self.share.read_query().filter(|q| !q.trim().is_empty())?;
        tracing::info!("[Session] Loading deep link '{}'", query);
        Some(self.search(&query).await)
    }

    /// Shows a saved comparison without contacting the comparison service.
    pub async fn load_bookmark(&self, saved: &SavedComparison) -> SessionState {
        let state = {
            let mut session = self.session.write().await;
            session.sequence += 1;
            session.state = SessionState::Success(Box::new(saved.result.clone()));
            session.state.clone()
        };
        tracing::info!("[Session] Loaded bookmark {}", saved.id);

        self.spawn_persona_prefetch(saved.result.clone());
        state
    }

    /// Re-runs a history entry.
    pub async fn replay(&self, entry: &HistoryEntry) -> SessionState {
        self.search(&entry.query).await
    }

    /// Toggles the bookmark for the current result; `None` when there is none.
    pub async fn toggle_bookmark(&self) -> Option<bool> {
        let result = self.current_result().await?;
        Some(self.bookmarks.toggle(&result))
    }

    pub async fn is_current_saved(&self) -> bool {
        match self.current_result().await {
            Some(result) => self.bookmarks.is_saved(&result),
            None => false,
        }
    }

    /// Points the share link at the current result's query and returns it.
    pub async fn share_url(&self) -> Option<String> {
        let result = self.current_result().await?;
        self.share.write_query(&result.query);
        Some(self.share.href())
    }

    /// Waits for the persona prefetch started by the last successful load.
    pub async fn settle_personas(&self) {
        let handle = self
            .persona_prefetch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!("[Session] Persona prefetch task failed: {}", e);
            }
        }
    }

    /// Starts activating `result` in the persona cache.
    ///
    /// The new task first waits for the previous prefetch, so activations
    /// always apply in load order.
    fn spawn_persona_prefetch(&self, result: AnalysisResult) {
        let personas = self.personas.clone();
        let mut slot = self
            .persona_prefetch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = slot.take();

        *slot = Some(tokio::spawn(async move {
            if let Some(previous) = previous {
                if let Err(e) = previous.await {
                    tracing::warn!("[Session] Earlier persona prefetch failed: {}", e);
                }
            }
            personas.activate(&result).await
        }));
    }
}
