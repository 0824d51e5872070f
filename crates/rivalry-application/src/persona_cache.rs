//! Persona selection and per-persona verdicts for the current result.
//!
//! The cache tracks one active result at a time. Activating a result picks a
//! persona (the remembered preference when the record still offers it, else
//! the record's suggestion) and prefetches its verdict. Verdicts are cached per
//! persona until a different result is activated.
//!
//! Every analysis dispatch is tagged with the active result, the selected
//! persona and a dispatch sequence number. A completion whose tag no longer
//! matches the current selection is dropped, so a slow answer can never
//! overwrite a newer selection.

use rivalry_core::analysis::{AnalysisResult, ResultIdentity};
use rivalry_core::comparison::ComparisonRecord;
use rivalry_core::persona::{PersonaAnalysisService, PersonaVerdict};
use rivalry_core::store::{PersistentStore, keys};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Analysis state of the selected persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersonaState {
    /// No persona has been selected for the active result.
    NotSelected,
    Loading,
    Ready(PersonaVerdict),
    /// The last analysis failed; nothing to show.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaSnapshot {
    pub selected_persona_id: Option<String>,
    pub state: PersonaState,
}

struct ActiveResult {
    identity: ResultIdentity,
    record: ComparisonRecord,
}

struct Inner {
    active: Option<ActiveResult>,
    selected: Option<String>,
    state: PersonaState,
    dispatch: u64,
    verdicts: HashMap<String, PersonaVerdict>,
}

/// Tag carried by an in-flight analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DispatchTag {
    identity: ResultIdentity,
    persona_id: String,
    sequence: u64,
}

pub struct PersonaCache {
    service: Arc<dyn PersonaAnalysisService>,
    store: Arc<dyn PersistentStore>,
    inner: RwLock<Inner>,
}

impl PersonaCache {
    pub fn new(service: Arc<dyn PersonaAnalysisService>, store: Arc<dyn PersistentStore>) -> Self {
        Self {
            service,
            store,
            inner: RwLock::new(Inner {
                active: None,
                selected: None,
                state: PersonaState::NotSelected,
                dispatch: 0,
                verdicts: HashMap::new(),
            }),
        }
    }

    /// The remembered persona id, shared across sessions.
    pub fn preferred_persona_id(&self) -> Option<String> {
        self.store
            .get(keys::PREFERRED_PERSONA_ID)
            .filter(|id| !id.trim().is_empty())
    }

    pub async fn snapshot(&self) -> PersonaSnapshot {
        let inner = self.inner.read().await;
        PersonaSnapshot {
            selected_persona_id: inner.selected.clone(),
            state: inner.state.clone(),
        }
    }

    /// Makes `result` the active result and prefetches a verdict for the
    /// auto-selected persona.
    ///
    /// Re-activating the result that is already active does nothing, so the
    /// prefetch runs at most once per result.
    pub async fn activate(&self, result: &AnalysisResult) {
        let identity = result.identity();
        let preferred = self.preferred_persona_id();

        let (persona_id, label) = {
            let mut inner = self.inner.write().await;
            if inner
                .active
                .as_ref()
                .is_some_and(|active| active.identity == identity)
            {
                return;
            }

            inner.verdicts.clear();
            inner.selected = None;
            inner.state = PersonaState::NotSelected;
            // Invalidate analyses dispatched for the previous result.
            inner.dispatch += 1;

            let Some(record) = result.record.clone() else {
                inner.active = None;
                return;
            };

            let pick = preferred
                .as_deref()
                .and_then(|id| record.persona(id))
                .or_else(|| record.persona(&record.suggested_persona_id))
                .map(|persona| (persona.id.clone(), persona.label.clone()));
            inner.active = Some(ActiveResult { identity, record });

            match pick {
                Some(pick) => pick,
                None => return,
            }
        };

        tracing::debug!("[Persona] Auto-selecting '{}' for {}", persona_id, result.query);
        self.store.set(keys::PREFERRED_PERSONA_ID, &persona_id);
        self.run(&persona_id, &label).await;
    }

    /// Selects a persona, remembers it as the preference and analyzes it.
    pub async fn select(&self, persona_id: &str, label: &str) {
        self.store.set(keys::PREFERRED_PERSONA_ID, persona_id);

        if self.inner.read().await.active.is_none() {
            tracing::warn!("[Persona] Selection of '{}' ignored: no active comparison", persona_id);
            return;
        }

        self.inner.write().await.verdicts.remove(persona_id);
        self.run(persona_id, label).await;
    }

    async fn run(&self, persona_id: &str, label: &str) {
        let (tag, record) = {
            let mut inner = self.inner.write().await;
            let Some(active) = inner.active.as_ref() else {
                return;
            };
            let identity = active.identity.clone();
            let record = active.record.clone();

            inner.selected = Some(persona_id.to_string());
            if let Some(cached) = inner.verdicts.get(persona_id).cloned() {
                inner.state = PersonaState::Ready(cached);
                return;
            }

            inner.dispatch += 1;
            inner.state = PersonaState::Loading;
            let tag = DispatchTag {
                identity,
                persona_id: persona_id.to_string(),
                sequence: inner.dispatch,
            };
            (tag, record)
        };

        let outcome = self.service.analyze_persona(&record, label).await;

        let mut inner = self.inner.write().await;
        if !inner.is_current(&tag) {
            tracing::debug!(
                "[Persona] Dropping stale analysis for '{}' (dispatch {})",
                tag.persona_id,
                tag.sequence
            );
            return;
        }

        match outcome {
            Ok(verdict) => {
                inner.verdicts.insert(tag.persona_id, verdict.clone());
                inner.state = PersonaState::Ready(verdict);
            }
            Err(e) => {
                tracing::warn!("[Persona] Analysis for '{}' failed: {}", label, e);
                inner.state = PersonaState::Failed;
            }
        }
    }
}

impl Inner {
    fn is_current(&self, tag: &DispatchTag) -> bool {
        self.dispatch == tag.sequence
            && self.selected.as_deref() == Some(tag.persona_id.as_str())
            && self
                .active
                .as_ref()
                .is_some_and(|active| active.identity == tag.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        MockPersonaService, result_with_suggestion, structured_result, unstructured_result,
    };
    use rivalry_core::store::MemoryStore;
    use std::time::Duration;

    fn cache(service: MockPersonaService) -> (Arc<PersonaCache>, Arc<MockPersonaService>, Arc<MemoryStore>) {
        let service = Arc::new(service);
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(PersonaCache::new(service.clone(), store.clone()));
        (cache, service, store)
    }

    fn ready(reason: &str) -> PersonaState {
        PersonaState::Ready(PersonaVerdict {
            winner: "A".to_string(),
            reason: reason.to_string(),
        })
    }

    #[tokio::test]
    async fn test_activate_selects_suggestion_and_persists_it() {
        let (cache, service, store) = cache(MockPersonaService::default());
        cache.activate(&result_with_suggestion("A vs B", "budget")).await;

        let snapshot = cache.snapshot().await;
        assert_eq!(snapshot.selected_persona_id.as_deref(), Some("budget"));
        assert_eq!(snapshot.state, ready("BUDGET pick"));
        assert_eq!(store.get(keys::PREFERRED_PERSONA_ID).as_deref(), Some("budget"));
        assert_eq!(service.calls(), vec!["BUDGET"]);
    }

    #[tokio::test]
    async fn test_stored_preference_wins_over_suggestion() {
        let (cache, _, store) = cache(MockPersonaService::default());
        store.set(keys::PREFERRED_PERSONA_ID, "athlete");

        cache.activate(&result_with_suggestion("A vs B", "budget")).await;
        assert_eq!(
            cache.snapshot().await.selected_persona_id.as_deref(),
            Some("athlete")
        );
    }

    #[tokio::test]
    async fn test_unknown_preference_falls_back_to_suggestion() {
        let (cache, _, store) = cache(MockPersonaService::default());
        store.set(keys::PREFERRED_PERSONA_ID, "astronaut");

        cache.activate(&result_with_suggestion("A vs B", "gourmet")).await;
        assert_eq!(
            cache.snapshot().await.selected_persona_id.as_deref(),
            Some("gourmet")
        );
        assert_eq!(store.get(keys::PREFERRED_PERSONA_ID).as_deref(), Some("gourmet"));
    }

    #[tokio::test]
    async fn test_prefetch_runs_once_per_result() {
        let (cache, service, _) = cache(MockPersonaService::default());
        let result = structured_result("A vs B", 1);

        cache.activate(&result).await;
        cache.activate(&result).await;
        assert_eq!(service.calls().len(), 1);

        cache.activate(&structured_result("A vs B", 1)).await;
        assert_eq!(service.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_select_replaces_verdict_and_preference() {
        let (cache, service, store) = cache(MockPersonaService::default());
        cache.activate(&structured_result("A vs B", 1)).await;

        cache.select("gourmet", "GOURMET").await;
        let snapshot = cache.snapshot().await;
        assert_eq!(snapshot.selected_persona_id.as_deref(), Some("gourmet"));
        assert_eq!(snapshot.state, ready("GOURMET pick"));
        assert_eq!(store.get(keys::PREFERRED_PERSONA_ID).as_deref(), Some("gourmet"));
        assert_eq!(service.calls(), vec!["STUDENT", "GOURMET"]);
    }

    #[tokio::test]
    async fn test_failure_is_distinct_from_not_selected() {
        let (cache, _, _) = cache(MockPersonaService {
            failing: vec!["STUDENT".to_string()],
            ..Default::default()
        });
        assert_eq!(cache.snapshot().await.state, PersonaState::NotSelected);

        cache.activate(&structured_result("A vs B", 1)).await;
        let snapshot = cache.snapshot().await;
        assert_eq!(snapshot.state, PersonaState::Failed);
        assert_eq!(snapshot.selected_persona_id.as_deref(), Some("student"));
    }

    #[tokio::test]
    async fn test_later_selection_supersedes_slow_one() {
        let (cache, _, _) = cache(MockPersonaService {
            delays: vec![("ATHLETE".to_string(), Duration::from_millis(80))],
            ..Default::default()
        });
        cache.activate(&structured_result("A vs B", 1)).await;

        let slow = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.select("athlete", "ATHLETE").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.select("budget", "BUDGET").await;
        slow.await.unwrap();

        let snapshot = cache.snapshot().await;
        assert_eq!(snapshot.selected_persona_id.as_deref(), Some("budget"));
        assert_eq!(snapshot.state, ready("BUDGET pick"));
    }

    #[tokio::test]
    async fn test_unstructured_result_clears_selection() {
        let (cache, service, _) = cache(MockPersonaService::default());
        cache.activate(&structured_result("A vs B", 1)).await;
        cache.activate(&unstructured_result("C vs D", 2)).await;

        assert_eq!(
            cache.snapshot().await,
            PersonaSnapshot {
                selected_persona_id: None,
                state: PersonaState::NotSelected
            }
        );

        cache.select("student", "STUDENT").await;
        assert_eq!(service.calls().len(), 1);
    }
}
