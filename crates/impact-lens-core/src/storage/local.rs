//! Typed access to the persisted keys.
//!
//! The raw `usage` key is only reachable from the `usage` module; every other
//! component goes through the typed accessors below.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::store::{KeyValueStore, MemoryStore, StoreError};
use crate::analysis::AnalysisResult;
use crate::content::ContentPayload;
use crate::i18n::Language;
use crate::usage::UsageRecord;

const USAGE_KEY: &str = "usage";
const LATEST_CONTENT_KEY: &str = "latestContent";
const CONTENT_TIMESTAMP_KEY: &str = "contentTimestamp";
const LATEST_ANALYSIS_KEY: &str = "latestAnalysis";
const ANALYSIS_TIMESTAMP_KEY: &str = "analysisTimestamp";
const SELECTED_LANGUAGE_KEY: &str = "selectedLanguage";

/// A cached value together with the moment it was written
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<T> {
    pub value: T,
    pub stored_at: DateTime<Utc>,
}

impl<T> Stamped<T> {
    /// Whether the value was stored less than `max_age` before `now`
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: chrono::Duration) -> bool {
        now - self.stored_at < max_age
    }
}

/// Shared handle to the extension's local storage area
#[derive(Clone)]
pub struct Storage {
    inner: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Storage that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.inner.get(key)? {
            Some(value) if !value.is_null() => Ok(Some(serde_json::from_value(value)?)),
            _ => Ok(None),
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.inner.set(key, serde_json::to_value(value)?)
    }

    fn load_stamped<T: DeserializeOwned>(
        &self,
        key: &str,
        timestamp_key: &str,
    ) -> Result<Option<Stamped<T>>, StoreError> {
        let Some(value) = self.load::<T>(key)? else {
            return Ok(None);
        };
        let stored_at = self
            .load::<i64>(timestamp_key)?
            .and_then(DateTime::from_timestamp_millis);
        Ok(stored_at.map(|stored_at| Stamped { value, stored_at }))
    }

    fn save_stamped<T: Serialize>(
        &self,
        key: &str,
        timestamp_key: &str,
        value: &T,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.inner.set_many(vec![
            (key.to_string(), serde_json::to_value(value)?),
            (
                timestamp_key.to_string(),
                serde_json::to_value(at.timestamp_millis())?,
            ),
        ])
    }

    pub(crate) fn load_usage(&self) -> Result<Option<UsageRecord>, StoreError> {
        self.load(USAGE_KEY)
    }

    pub(crate) fn save_usage(&self, record: &UsageRecord) -> Result<(), StoreError> {
        self.save(USAGE_KEY, record)
    }

    /// Content most recently announced by a page
    pub fn latest_content(&self) -> Result<Option<Stamped<ContentPayload>>, StoreError> {
        self.load_stamped(LATEST_CONTENT_KEY, CONTENT_TIMESTAMP_KEY)
    }

    pub fn save_latest_content(
        &self,
        payload: &ContentPayload,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.save_stamped(LATEST_CONTENT_KEY, CONTENT_TIMESTAMP_KEY, payload, at)
    }

    /// Result of the most recent successful analysis
    pub fn latest_analysis(&self) -> Result<Option<Stamped<AnalysisResult>>, StoreError> {
        self.load_stamped(LATEST_ANALYSIS_KEY, ANALYSIS_TIMESTAMP_KEY)
    }

    pub fn save_latest_analysis(
        &self,
        result: &AnalysisResult,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.save_stamped(LATEST_ANALYSIS_KEY, ANALYSIS_TIMESTAMP_KEY, result, at)
    }

    /// Language picked in the panel. Unknown stored tags fall back to the default.
    pub fn selected_language(&self) -> Result<Option<Language>, StoreError> {
        Ok(self
            .load::<String>(SELECTED_LANGUAGE_KEY)?
            .map(|tag| Language::from_tag(&tag)))
    }

    pub fn save_selected_language(&self, language: Language) -> Result<(), StoreError> {
        self.save(SELECTED_LANGUAGE_KEY, &language.tag())
    }
}
