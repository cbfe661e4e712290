use thiserror::Error;

use crate::address::AddressError;

/// Fatal misconfigurations, deliberately distinct from every per-call
/// [`VerificationResult`](super::VerificationResult): when one of these
/// fires, the subsystem cannot verify anything here, and silently mapping
/// that to "this address is invalid" would mislead the caller.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("DNS resolver unavailable: {source}")]
    ResolverUnavailable {
        #[source]
        source: std::io::Error,
    },
    #[error("configured sender address is invalid: {source}")]
    InvalidSender {
        #[source]
        source: AddressError,
    },
}
