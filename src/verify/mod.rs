//! Verification coordination.
//!
//! [`verify`] ties the pieces together: parse the raw address, resolve the
//! domain's mail-exchanger candidates, then probe them one host at a time
//! under an aggregate deadline, mapping the first conclusive reply into
//! the closed [`VerificationResult`] set. No network traffic happens for
//! input that fails to parse, and no state survives the call.

mod error;
mod options;
mod types;

pub use error::VerifyError;
pub use options::VerifyOptions;
pub use types::{Verification, VerificationResult};

use std::time::Instant;

use tracing::debug;

use crate::address::EmailAddress;
use crate::mx::{
    LookupHosts, MailServerCandidate, MxError, normalize_domain, resolve_candidates,
    system_resolver,
};
use crate::smtp::{ProbeHost, ProbeOutcome, SmtpProber};

/// Verify `raw` with default options.
pub fn verify(raw: &str) -> Result<Verification, VerifyError> {
    verify_with_options(raw, &VerifyOptions::default())
}

/// Verify an untyped byte input. Anything that is not valid UTF-8 is a
/// [`VerificationResult::InvalidInput`] defect, reported without touching
/// the network.
pub fn verify_bytes(raw: &[u8], options: &VerifyOptions) -> Result<Verification, VerifyError> {
    match std::str::from_utf8(raw) {
        Ok(text) => verify_with_options(text, options),
        Err(_) => Ok(Verification::new(
            String::from_utf8_lossy(raw),
            VerificationResult::InvalidInput,
        )),
    }
}

/// Verify `raw` against the given options, using the system DNS resolver
/// and a plaintext SMTP prober.
pub fn verify_with_options(
    raw: &str,
    options: &VerifyOptions,
) -> Result<Verification, VerifyError> {
    let resolver = system_resolver(options.dns_timeout)
        .map_err(|source| VerifyError::ResolverUnavailable { source })?;
    let prober = SmtpProber::new(options.port, options.helo_domain());
    verify_with(raw, options, &resolver, &prober)
}

pub(crate) fn verify_with<R, P>(
    raw: &str,
    options: &VerifyOptions,
    resolver: &R,
    prober: &P,
) -> Result<Verification, VerifyError>
where
    R: LookupHosts,
    P: ProbeHost,
{
    let trimmed = raw.trim();

    let address = match EmailAddress::parse(trimmed) {
        Ok(address) => address,
        Err(err) => {
            debug!(input = trimmed, error = %err, "address parse failed");
            return Ok(Verification::new(trimmed, VerificationResult::InvalidFormat));
        }
    };

    let ascii_domain = match normalize_domain(address.domain()) {
        Ok(domain) => domain,
        Err(_) => {
            let result = VerificationResult::InvalidHostname {
                hostname: address.domain().to_string(),
            };
            return Ok(Verification::new(trimmed, result)
                .with_parts(address.local(), address.domain()));
        }
    };

    let sender = match &options.sender_address {
        Some(value) => {
            EmailAddress::parse(value).map_err(|source| VerifyError::InvalidSender { source })?
        }
        None => EmailAddress::postmaster(&ascii_domain),
    };

    let candidates = match resolve_candidates(resolver, &ascii_domain) {
        Ok(candidates) => candidates,
        Err(err) => {
            let result = match err {
                MxError::Timeout => VerificationResult::DnsTimeout,
                MxError::NoMailServers => VerificationResult::NoMailServers {
                    hostname: ascii_domain.clone(),
                },
                MxError::EmptyDomain | MxError::IdnaConversion { .. } => {
                    VerificationResult::InvalidHostname {
                        hostname: ascii_domain.clone(),
                    }
                }
                MxError::ResolverInit { source } => {
                    return Err(VerifyError::ResolverUnavailable { source });
                }
            };
            return Ok(
                Verification::new(trimmed, result).with_parts(address.local(), address.domain())
            );
        }
    };

    let (result, servers_tried) = probe_candidates(&address, &sender, &candidates, options, prober);
    Ok(Verification::new(trimmed, result)
        .with_parts(address.local(), address.domain())
        .with_servers(servers_tried))
}

/// Sequential candidate iteration under the aggregate deadline. A
/// definitive reply from one exchanger ends the call; transport failures
/// and inconclusive replies move on to the next host.
fn probe_candidates<P: ProbeHost>(
    recipient: &EmailAddress,
    sender: &EmailAddress,
    candidates: &[MailServerCandidate],
    options: &VerifyOptions,
    prober: &P,
) -> (VerificationResult, Vec<String>) {
    let deadline = Instant::now() + options.total_timeout;
    let mut servers_tried = Vec::new();
    let mut saw_timeout = false;
    let mut indeterminate: Option<(u16, String)> = None;

    for candidate in candidates.iter().take(options.max_servers.max(1)) {
        let now = Instant::now();
        if now >= deadline {
            debug!("aggregate budget exhausted with candidates remaining");
            saw_timeout = true;
            break;
        }
        let budget = options.smtp_timeout.min(deadline - now);

        servers_tried.push(candidate.hostname.clone());
        let outcome = prober.probe(&candidate.hostname, sender, recipient, budget);
        debug!(host = %candidate.hostname, ?outcome, "candidate probed");

        match outcome {
            ProbeOutcome::Response(reply) => {
                if reply.is_positive_completion() {
                    // first acceptance wins; no further hosts are tried
                    return (VerificationResult::Verified, servers_tried);
                }
                match reply.code {
                    // a definitive negative from one exchanger is
                    // conclusive for the whole domain
                    550 | 551 | 553 => {
                        let result = VerificationResult::UnknownUser {
                            local_part: recipient.local().to_string(),
                        };
                        return (result, servers_tried);
                    }
                    552 => return (VerificationResult::MailboxFull, servers_tried),
                    _ => {
                        // soft failure or host-level rejection; remember
                        // the first one and try the next exchanger
                        indeterminate.get_or_insert((reply.code, reply.message));
                    }
                }
            }
            ProbeOutcome::Timeout => saw_timeout = true,
            ProbeOutcome::Unreachable | ProbeOutcome::ConnectionRefused => {}
        }
    }

    let result = if let Some((code, message)) = indeterminate {
        VerificationResult::Indeterminate { code, message }
    } else if saw_timeout {
        VerificationResult::SmtpTimeout
    } else {
        VerificationResult::SmtpUnreachable
    };
    (result, servers_tried)
}
