//! Promotional campaign labels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CampaignMode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CampaignModeError {
    /// An entry is not of the form `key=label`.
    #[error("campaign entry must be key=label, got {0:?}")]
    MalformedEntry(String),
    /// An entry has an empty key.
    #[error("campaign key cannot be empty")]
    EmptyKey,
}

/// The set of active promotional labels (e.g. a sale or holiday tag).
///
/// Built once at startup and read-only afterwards: there are no mutating
/// methods. It is handed to whoever needs it through configuration and
/// application state.
///
/// ```
/// use tiendita_core::CampaignMode;
///
/// let mode = CampaignMode::parse("rebajas=Rebajas, navidad=Navidad").unwrap();
/// assert_eq!(mode.label("rebajas"), Some("Rebajas"));
/// assert_eq!(mode.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignMode(BTreeMap<String, String>);

impl Default for CampaignMode {
    fn default() -> Self {
        Self::from_pairs([("rebajas", "rebajas"), ("navidad", "navidad")])
    }
}

impl CampaignMode {
    /// Build from `(key, label)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// An empty mapping (no active campaigns).
    #[must_use]
    pub const fn none() -> Self {
        Self(BTreeMap::new())
    }

    /// Parse a comma-separated `key=label` list. Blank entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry has no `=` or an empty key.
    pub fn parse(s: &str) -> Result<Self, CampaignModeError> {
        let mut map = BTreeMap::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, label) = entry
                .split_once('=')
                .ok_or_else(|| CampaignModeError::MalformedEntry(entry.to_owned()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(CampaignModeError::EmptyKey);
            }
            map.insert(key.to_owned(), label.trim().to_owned());
        }
        Ok(Self(map))
    }

    /// Label for a campaign key, if active.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate `(key, label)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
