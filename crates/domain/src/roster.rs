//! Entity roster and case-insensitive name canonicalization.
//!
//! The backend owns entities; the roster is a snapshot of their names taken
//! for a single resolution. Free-text references ("weft", "WEFT") are mapped
//! onto the backend's canonical casing ("Weft"). Names the roster does not
//! know pass through verbatim so the backend can reject them precisely.

use std::collections::BTreeMap;

use crate::error::DomainError;

/// Snapshot of canonical entity names, indexed case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityRoster {
    /// lower-cased name -> canonical name
    by_folded: BTreeMap<String, String>,
}

impl EntityRoster {
    /// Build a roster from canonical names. When two names differ only by
    /// case, the first one seen wins.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut by_folded = BTreeMap::new();
        for name in names {
            let name = name.into();
            by_folded.entry(fold(&name)).or_insert(name);
        }
        Self { by_folded }
    }

    /// Canonical name for `name`, if the roster knows it.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.by_folded.get(&fold(name)).map(String::as_str)
    }

    /// Canonical name for `name`, or `name` unchanged (trimmed) when unknown.
    ///
    /// Idempotent: canonicalizing a canonical name returns it unchanged.
    pub fn canonicalize(&self, name: &str) -> String {
        self.lookup(name)
            .map(str::to_string)
            .unwrap_or_else(|| name.trim().to_string())
    }

    /// Like `canonicalize`, but unknown names are an error.
    pub fn require(&self, name: &str) -> Result<String, DomainError> {
        self.lookup(name)
            .map(str::to_string)
            .ok_or_else(|| DomainError::unknown_entity(name.trim()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Canonical names in case-insensitive order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_folded.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_folded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_folded.is_empty()
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}
