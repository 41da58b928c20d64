//! Classification of PostgreSQL unique violations into account fields.
//!
//! PostgreSQL reports a unique violation with several partially redundant
//! pieces of information:
//!
//! ```text
//! message:    duplicate key value violates unique constraint "accounts_phone_key"
//! detail:     Key (phone)=(0123456789) already exists.
//! constraint: accounts_phone_key
//! ```
//!
//! Every source is consulted and the results are unioned, so a field named by
//! any of them is never dropped. An empty result means the violation could
//! not be attributed to a known field.

use std::sync::OnceLock;

use diesel::result::DatabaseErrorInformation;
use regex::Regex;

use crate::domain::{ConflictFields, UniqueField};

static KEY_PATTERN_RE: OnceLock<Regex> = OnceLock::new();

fn key_pattern_regex() -> &'static Regex {
    KEY_PATTERN_RE.get_or_init(|| {
        Regex::new(r"Key \(([^)]*)\)=")
            .unwrap_or_else(|error| panic!("key pattern regex failed to compile: {error}"))
    })
}

/// Columns named in `Key (a, b)=(…)` detail payloads.
fn fields_from_key_pattern(detail: &str) -> impl Iterator<Item = UniqueField> + '_ {
    key_pattern_regex()
        .captures_iter(detail)
        .filter_map(|captures| captures.get(1))
        .flat_map(|columns| columns.as_str().split(','))
        .filter_map(UniqueField::from_key)
}

/// Field names appearing as whole words in identifiers or free text, e.g.
/// `accounts_username_key` or `index: phone_1 dup key`.
fn fields_from_words(text: &str) -> impl Iterator<Item = UniqueField> + '_ {
    text.split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .filter_map(UniqueField::from_key)
}

/// Determine which unique account fields a violation refers to.
pub(crate) fn classify_conflict(info: &dyn DatabaseErrorInformation) -> ConflictFields {
    let mut fields = ConflictFields::default();
    if let Some(detail) = info.details() {
        fields.extend(fields_from_key_pattern(detail));
    }
    if let Some(constraint) = info.constraint_name() {
        fields.extend(fields_from_words(constraint));
    }
    if let Some(column) = info.column_name() {
        fields.extend(UniqueField::from_key(column));
    }
    fields.extend(fields_from_words(info.message()));
    fields
}
