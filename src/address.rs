//! Raw address parsing.
//!
//! [`EmailAddress::parse`] only splits an input into a local part and a
//! domain; it deliberately performs no RFC 2822 grammar checking beyond the
//! presence of an `@` with usable text on both sides. Deeper syntax policy
//! belongs to the caller.

use std::fmt;

use thiserror::Error;

/// Reasons a raw string cannot be split into local part and domain.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    #[error("missing '@'")]
    MissingAt,
    #[error("empty local part")]
    EmptyLocalPart,
    #[error("empty domain")]
    EmptyDomain,
    #[error("domain contains '@'")]
    DomainContainsAt,
}

/// An email address split into its two halves. Immutable once parsed; the
/// local part feeds `RCPT TO`, the domain feeds the MX lookup.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    local: String,
    domain: String,
}

impl EmailAddress {
    /// Split `raw` on the first `@`. Surrounding whitespace is trimmed;
    /// both halves must be non-empty and the domain must not contain a
    /// further `@`.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();
        let (local, domain) = trimmed.split_once('@').ok_or(AddressError::MissingAt)?;
        if local.trim().is_empty() {
            return Err(AddressError::EmptyLocalPart);
        }
        if domain.trim().is_empty() {
            return Err(AddressError::EmptyDomain);
        }
        if domain.contains('@') {
            return Err(AddressError::DomainContainsAt);
        }
        Ok(Self {
            local: local.to_string(),
            domain: domain.to_string(),
        })
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Sentinel sender used for `MAIL FROM` when no envelope sender is
    /// configured. `domain` must already be validated non-empty.
    pub(crate) fn postmaster(domain: &str) -> Self {
        Self {
            local: "postmaster".to_string(),
            domain: domain.to_string(),
        }
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}
