//! Default admin email derivation.
//!
//! A tenant title is reduced to a stable local-part token, then probed
//! against the user service until an unused address is found.
//!
//! Probing is check-then-act: two tenants created concurrently with titles
//! that normalize identically may both settle on the same candidate. The
//! user store's own email uniqueness constraint is the only backstop; a
//! violation surfaces as [`DomainError::EmailConflict`].

use std::sync::Arc;

use tenant_lifecycle_sdk::TenantId;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::error::{DomainError, StepContext};
use super::ports::UserService;

/// Placeholder local part for titles that normalize to nothing.
pub const DEFAULT_LOCAL_PART: &str = "tenant";

/// Whether `s` is already a normalized local part: non-empty `[a-z0-9]+`.
#[must_use]
pub fn is_local_part_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Reduce a human-entered title to an email-local-part-safe token.
///
/// Decomposes to NFD, drops combining marks, lower-cases (locale
/// independent) and keeps only `[a-z0-9]`. Whitespace and symbols vanish.
/// Returns `fallback` when nothing survives, or [`DEFAULT_LOCAL_PART`] if
/// `fallback` is not itself a normalized token. The result is never empty.
#[must_use]
pub fn normalize_title(title: Option<&str>, fallback: &str) -> String {
    let normalized: String = title
        .unwrap_or_default()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| !c.is_whitespace())
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();

    if !normalized.is_empty() {
        normalized
    } else if is_local_part_token(fallback) {
        fallback.to_owned()
    } else {
        DEFAULT_LOCAL_PART.to_owned()
    }
}

/// Allocates unused default-admin email addresses.
pub struct EmailAllocator {
    users: Arc<dyn UserService>,
    domain_suffix: String,
    fallback_local_part: String,
}

impl EmailAllocator {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserService>,
        domain_suffix: String,
        fallback_local_part: String,
    ) -> Self {
        Self {
            users,
            domain_suffix,
            fallback_local_part,
        }
    }

    /// Normalized local part for `title`.
    #[must_use]
    pub fn normalize(&self, title: Option<&str>) -> String {
        normalize_title(title, &self.fallback_local_part)
    }

    /// Candidate address for probe number `counter`.
    #[must_use]
    pub fn candidate(&self, local_part: &str, counter: u64) -> String {
        if counter == 0 {
            format!("{local_part}{}", self.domain_suffix)
        } else {
            format!("{local_part}{counter}{}", self.domain_suffix)
        }
    }

    /// First candidate not known to the user service.
    ///
    /// For `N` existing accounts occupying `local_part`, `local_part1`, ...
    /// this performs at most `N + 1` lookups.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Collaborator`] if an email lookup fails.
    pub async fn allocate(&self, local_part: &str) -> Result<String, DomainError> {
        let mut counter: u64 = 0;
        loop {
            let email = self.candidate(local_part, counter);
            let existing = self
                .users
                .find_by_email(TenantId::SYSTEM, &email)
                .await
                .step("email lookup")?;
            if existing.is_none() {
                return Ok(email);
            }
            tracing::debug!(email = %email, "Default admin email taken, probing next");
            counter += 1;
        }
    }

    /// Normalize `title` and allocate an address for it.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Collaborator`] if an email lookup fails.
    pub async fn allocate_for_title(&self, title: Option<&str>) -> Result<String, DomainError> {
        let local_part = self.normalize(title);
        self.allocate(&local_part).await
    }
}
