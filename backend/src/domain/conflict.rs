//! Uniquely indexed account fields and conflict field sets.
//!
//! Storage adapters report a failed insert as the set of unique keys that
//! collided. The registration resolver decides whether to retry or abort
//! purely from that set, so adapters must never drop a colliding field.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// An account field protected by a unique index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueField {
    Phone,
    Username,
    Email,
}

impl UniqueField {
    /// Every uniquely indexed field.
    pub const ALL: [Self; 3] = [Self::Phone, Self::Username, Self::Email];

    /// Column / key name used by storage backends.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Username => "username",
            Self::Email => "email",
        }
    }

    /// Match a bare key name as it appears in storage error payloads.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of unique fields that collided during one insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConflictFields(BTreeSet<UniqueField>);

impl ConflictFields {
    /// Whether `field` is part of the conflict.
    pub fn contains(&self, field: UniqueField) -> bool {
        self.0.contains(&field)
    }

    /// Record a colliding field.
    pub fn insert(&mut self, field: UniqueField) {
        self.0.insert(field);
    }

    /// Whether no field could be identified.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the collision is on the derived identifier rather than the
    /// phone number.
    pub fn touches_identifier(&self) -> bool {
        self.contains(UniqueField::Username) || self.contains(UniqueField::Email)
    }

    /// Iterate over the colliding fields in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = UniqueField> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<UniqueField> for ConflictFields {
    fn from_iter<I: IntoIterator<Item = UniqueField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<UniqueField> for ConflictFields {
    fn extend<I: IntoIterator<Item = UniqueField>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl fmt::Display for ConflictFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<unknown>");
        }
        let names: Vec<&str> = self.iter().map(UniqueField::as_str).collect();
        f.write_str(&names.join(", "))
    }
}
