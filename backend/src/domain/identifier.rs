//! Username and email derivation from free-text display names.
//!
//! The derivation is a fixed, culture-specific heuristic for names written
//! family-name first (for example `Nguyễn Ngọc Quyết`): the **last** token is
//! the given name and becomes the username stem, and every preceding token
//! contributes its first letter, in original order.
//!
//! ```
//! use registration::domain::derive_candidate;
//!
//! let candidate = derive_candidate("Nguyễn Ngọc Quyết", "edulive.net").unwrap();
//! assert_eq!(candidate.username, "quyetnn");
//! assert_eq!(candidate.email, "quyetnn@edulive.net");
//! ```
//!
//! Both functions are pure; uniqueness against storage is the resolver's job.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Errors raised while deriving a candidate identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CandidateError {
    /// The name holds no letters or digits usable as a username stem.
    #[error("name does not contain any usable letters or digits")]
    EmptyName,
}

/// A `(username, email)` pair proposed for a new account.
///
/// ## Invariants
/// - `username` matches `[a-z0-9]+`.
/// - `email` is `username@<domain>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub username: String,
    pub email: String,
}

impl Candidate {
    /// Build a candidate from a username and the mail domain it lives under.
    pub fn new(username: impl Into<String>, domain: &str) -> Self {
        let username = username.into();
        let email = format!("{username}@{domain}");
        Self { username, email }
    }

    /// Mail domain shared by every candidate derived from this one.
    pub fn domain(&self) -> &str {
        self.email
            .rsplit_once('@')
            .map_or("", |(_, domain)| domain)
    }

    /// Candidate for the `suffix`-th probe. Suffix `0` is the base itself;
    /// `1, 2, …` are appended to the base username.
    pub fn with_suffix(&self, suffix: u32) -> Self {
        if suffix == 0 {
            return self.clone();
        }
        Self::new(format!("{}{suffix}", self.username), self.domain())
    }
}

/// Fold one display-name token into a lowercase ASCII fragment.
///
/// Never fails; the result matches `[a-z0-9]*` and may be empty.
pub fn normalize(token: &str) -> String {
    let token = token.trim();
    if token.is_empty() {
        return String::new();
    }

    token
        .chars()
        .map(|ch| match ch {
            // Stroked D has no canonical decomposition.
            'Đ' => 'D',
            'đ' => 'd',
            other => other,
        })
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit())
        .collect()
}

/// Derive the base candidate for `full_name` under `domain`.
///
/// # Errors
///
/// Returns [`CandidateError::EmptyName`] when the name has no tokens or its
/// last token normalizes to an empty string.
pub fn derive_candidate(full_name: &str, domain: &str) -> Result<Candidate, CandidateError> {
    let mut tokens: Vec<&str> = full_name.split_whitespace().collect();
    let last = tokens.pop().ok_or(CandidateError::EmptyName)?;

    let mut username = normalize(last);
    if username.is_empty() {
        return Err(CandidateError::EmptyName);
    }

    username.extend(
        tokens
            .into_iter()
            .filter_map(|token| normalize(token).chars().next()),
    );

    Ok(Candidate::new(username, domain))
}
