//! Light/dark theme preference.

use rivalry_core::store::{PersistentStore, keys};
use rivalry_core::theme::Theme;
use std::sync::Arc;

/// Stored as the bare string `light` or `dark` under the `theme` key.
pub struct ThemePreference {
    store: Arc<dyn PersistentStore>,
}

impl ThemePreference {
    pub fn new(store: Arc<dyn PersistentStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Theme {
        match self.store.get(keys::THEME) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("[Theme] {}; using default", e);
                Theme::default()
            }),
            None => Theme::default(),
        }
    }

    pub fn set(&self, theme: Theme) {
        self.store.set(keys::THEME, theme.as_str());
    }

    pub fn toggle(&self) -> Theme {
        let next = self.get().toggled();
        self.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivalry_core::store::MemoryStore;

    #[test]
    fn test_default_set_toggle() {
        let store = Arc::new(MemoryStore::new());
        let theme = ThemePreference::new(store.clone());
        assert_eq!(theme.get(), Theme::Light);

        assert_eq!(theme.toggle(), Theme::Dark);
        assert_eq!(store.get(keys::THEME).as_deref(), Some("dark"));

        theme.set(Theme::Light);
        assert_eq!(theme.get(), Theme::Light);
    }

    #[test]
    fn test_unknown_value_falls_back_to_light() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::THEME, "sepia");
        assert_eq!(ThemePreference::new(store).get(), Theme::Light);
    }
}
