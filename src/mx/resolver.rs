use std::io;
use std::net::IpAddr;
use std::time::Duration;

use tracing::{debug, warn};
use trust_dns_resolver::Resolver;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::system_conf::read_system_conf;

use super::{MailServerCandidate, MxError, MxRecord};

/// Resolve the ordered mail-exchanger candidates for `domain` using the
/// system resolver.
///
/// MX records are tried first, sorted by ascending preference; when the
/// domain publishes none, its own address records stand in as an implicit
/// exchanger list. `dns_timeout` bounds each DNS query.
pub fn resolve_mail_servers(
    domain: &str,
    dns_timeout: Duration,
) -> Result<Vec<MailServerCandidate>, MxError> {
    let ascii = normalize_domain(domain)?;
    let resolver = system_resolver(dns_timeout).map_err(MxError::resolver_init)?;
    resolve_candidates(&resolver, &ascii)
}

/// Capability probe: whether this environment can perform MX resolution at
/// all. A `false` here is a deployment misconfiguration; per-address
/// verification cannot work without it.
pub fn mx_lookup_supported() -> bool {
    system_resolver(Duration::from_secs(5)).is_ok()
}

/// Build a synchronous resolver from the system configuration, with
/// `dns_timeout` applied to every query it performs.
pub(crate) fn system_resolver(dns_timeout: Duration) -> io::Result<Resolver> {
    let (config, mut opts) = read_system_conf()?;
    opts.timeout = dns_timeout;
    Resolver::new(config, opts)
}

/// IDNA-normalize `domain` for DNS queries.
pub(crate) fn normalize_domain(domain: &str) -> Result<String, MxError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(MxError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(MxError::idna)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    exchange.trim_end_matches('.').to_ascii_lowercase()
}

pub(crate) fn resolve_candidates<R>(
    resolver: &R,
    ascii_domain: &str,
) -> Result<Vec<MailServerCandidate>, MxError>
where
    R: LookupHosts,
{
    let mut records = match resolver.mx_records(ascii_domain) {
        Ok(records) => records,
        Err(err) => lookup_failure_as_empty(ascii_domain, "MX", &err)?,
    };

    // stable sort: equal preferences keep lookup order
    records.sort_by_key(|record| record.preference);
    records.dedup();

    if !records.is_empty() {
        debug!(domain = ascii_domain, count = records.len(), "MX records found");
        return Ok(records
            .into_iter()
            .map(MailServerCandidate::from_mx)
            .collect());
    }

    // no MX published: the domain's own address records act as the
    // implicit exchanger list, in resolver-returned order
    let addresses = match resolver.address_records(ascii_domain) {
        Ok(addresses) => addresses,
        Err(err) => lookup_failure_as_empty(ascii_domain, "address", &err)?,
    };

    if addresses.is_empty() {
        return Err(MxError::NoMailServers);
    }
    debug!(
        domain = ascii_domain,
        count = addresses.len(),
        "falling back to address records"
    );
    Ok(addresses
        .into_iter()
        .map(|address| MailServerCandidate::implicit(address.to_string()))
        .collect())
}

/// Missing records are an empty set; a timed-out query is its own outcome;
/// every other lookup failure is logged and treated as "no usable records",
/// letting the caller fall through to the next source.
fn lookup_failure_as_empty<T>(
    domain: &str,
    kind: &str,
    err: &ResolveError,
) -> Result<Vec<T>, MxError> {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { .. } => Ok(Vec::new()),
        ResolveErrorKind::Timeout => Err(MxError::Timeout),
        _ => {
            warn!(domain, error = %err, "{kind} lookup failed");
            Ok(Vec::new())
        }
    }
}

/// Seam over the DNS queries the resolver component needs, so tests can
/// substitute scripted answers.
pub(crate) trait LookupHosts {
    fn mx_records(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError>;
    fn address_records(&self, domain: &str) -> Result<Vec<IpAddr>, ResolveError>;
}

impl LookupHosts for Resolver {
    fn mx_records(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        let lookup = self.mx_lookup(domain)?;
        let mut records = Vec::new();
        for mx in lookup.iter() {
            let exchange = normalize_exchange(mx.exchange().to_utf8());
            records.push(MxRecord::new(mx.preference(), exchange));
        }
        Ok(records)
    }

    fn address_records(&self, domain: &str) -> Result<Vec<IpAddr>, ResolveError> {
        Ok(self.lookup_ip(domain)?.iter().collect())
    }
}
