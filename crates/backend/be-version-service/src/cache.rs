//! Immutable per-platform response cache

use std::collections::BTreeMap;

use axum::body::Bytes;

use crate::types::IndexResponse;

/// Serialized `IndexResponse` per platform id.
///
/// Only the fetcher builds one, and only after every configured platform
/// succeeded. Once handed to the router it is never mutated, so concurrent
/// handlers read it without locking.
#[derive(Debug, Clone, Default)]
pub struct PlatformCache {
    entries: BTreeMap<String, Bytes>,
}

impl PlatformCache {
    pub(crate) fn insert(
        &mut self,
        platform: &str,
        response: &IndexResponse,
    ) -> Result<(), serde_json::Error> {
        let body = serde_json::to_vec(response)?;
        self.entries.insert(platform.to_string(), Bytes::from(body));
        Ok(())
    }

    /// Cached body for `platform`. Cloning the returned `Bytes` is a refcount bump.
    pub fn get(&self, platform: &str) -> Option<&Bytes> {
        self.entries.get(platform)
    }

    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_serialized_response() {
        let mut cache = PlatformCache::default();
        cache
            .insert(
                "mac",
                &IndexResponse {
                    current_version: "1.2.3".into(),
                    download_url: "https://x/download/App-1.2.3.dmg".into(),
                },
            )
            .unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get("mac").unwrap().as_ref(),
            br#"{"currentVersion":"1.2.3","downloadUrl":"https://x/download/App-1.2.3.dmg"}"#
        );
        assert!(cache.get("windows").is_none());
        assert_eq!(cache.platforms().collect::<Vec<_>>(), vec!["mac"]);
    }
}
