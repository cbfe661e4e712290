//! Mail-server discovery.
//!
//! The public entry point is [`resolve_mail_servers`], which queries MX
//! records for a domain (ascending preference, stable on ties) and falls
//! back to the domain's address records when no MX is published. The
//! result is the ordered candidate list the verification coordinator
//! probes one host at a time.

mod error;
mod resolver;
mod types;

pub use error::MxError;
pub use resolver::{mx_lookup_supported, resolve_mail_servers};
pub use types::{MailServerCandidate, MxRecord};

pub(crate) use resolver::{LookupHosts, normalize_domain, resolve_candidates, system_resolver};

#[cfg(test)]
mod tests;
