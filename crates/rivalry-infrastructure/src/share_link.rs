//! URL-backed share link.

use reqwest::Url;
use rivalry_core::error::{Result, RivalryError};
use rivalry_core::share::ShareLink;
use std::sync::Mutex;

/// Keeps the shareable URL and edits its query parameter in place.
///
/// Other query parameters on the URL are preserved.
#[derive(Debug)]
pub struct UrlShareLink {
    url: Mutex<Url>,
    param: String,
}

impl UrlShareLink {
    /// Parses `link` and uses `param` as the query key.
    pub fn parse(link: &str, param: impl Into<String>) -> Result<Self> {
        let url = Url::parse(link)
            .map_err(|e| RivalryError::config(format!("Invalid share URL '{}': {}", link, e)))?;
        Ok(Self {
            url: Mutex::new(url),
            param: param.into(),
        })
    }

    pub fn param(&self) -> &str {
        &self.param
    }
}

impl ShareLink for UrlShareLink {
    fn read_query(&self) -> Option<String> {
        let url = self.url.lock().ok()?;
        url.query_pairs()
            .find(|(key, _)| key == self.param.as_str())
            .map(|(_, value)| value.into_owned())
    }

    fn write_query(&self, query: &str) {
        let Ok(mut url) = self.url.lock() else {
            tracing::warn!("[ShareLink] URL unavailable, parameter not updated");
            return;
        };

        let others: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != self.param.as_str())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &others {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(&self.param, query);
    }

    fn href(&self) -> String {
        self.url
            .lock()
            .map(|url| url.to_string())
            .unwrap_or_default()
    }
}
