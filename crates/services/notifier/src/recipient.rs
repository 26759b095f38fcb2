//! Recipient data: the address plus template substitution variables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::events::VAR_EMAIL;

/// Key/value data for one dispatch. The recipient address lives under `email`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientData(BTreeMap<String, String>);

impl RecipientData {
    /// Start recipient data for an address.
    pub fn new(email: impl Into<String>) -> Self {
        Self::default().with(VAR_EMAIL, email)
    }

    /// Builder method to add a substitution variable.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// A variable counts as present only when it is not blank.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.trim().is_empty())
    }

    /// Recipient address, if set.
    pub fn email(&self) -> Option<&str> {
        self.get(VAR_EMAIL)
    }
}

impl<K, V> FromIterator<(K, V)> for RecipientData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
