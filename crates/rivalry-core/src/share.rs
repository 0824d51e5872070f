//! Shareable deep-link parameter.

use std::sync::Mutex;

/// Default query-string key carrying the last searched query.
pub const DEFAULT_SHARE_PARAM: &str = "q";

/// The single query-string parameter that encodes the current query.
///
/// Writes are non-reloading: they only replace the parameter.
pub trait ShareLink: Send + Sync {
    /// Returns the parameter value, if present.
    fn read_query(&self) -> Option<String>;

    /// Replaces the parameter value.
    fn write_query(&self, query: &str);

    /// The full shareable link for the current parameter value.
    fn href(&self) -> String;
}

/// Share link that only remembers the parameter in memory.
///
/// Its `href` is a readable `?q=<query>` label with the value left as typed.
/// It is not a percent-encoded URL; real links come from the URL-backed
/// implementation in the infrastructure layer.
#[derive(Debug, Default)]
pub struct MemoryShareLink {
    query: Mutex<Option<String>>,
}

impl MemoryShareLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Mutex::new(Some(query.into())),
        }
    }
}

impl ShareLink for MemoryShareLink {
    fn read_query(&self) -> Option<String> {
        self.query.lock().ok().and_then(|q| q.clone())
    }

    fn write_query(&self, query: &str) {
        if let Ok(mut current) = self.query.lock() {
            *current = Some(query.to_string());
        }
    }

    fn href(&self) -> String {
        match self.read_query() {
            Some(query) => format!("?{}={}", DEFAULT_SHARE_PARAM, query),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_link_remembers_last_write() {
        let link = MemoryShareLink::new();
        assert!(link.read_query().is_none());
        assert!(link.href().is_empty());

        link.write_query("A vs B");
        link.write_query("C vs D");
        assert_eq!(link.read_query().as_deref(), Some("C vs D"));
        assert!(link.href().starts_with("?q="));
    }
}
