use std::net::IpAddr;

use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};

use super::resolver::{self, LookupHosts};
use super::{MailServerCandidate, MxError, MxRecord};

type MxResult = Result<Vec<MxRecord>, ResolveError>;
type AddrResult = Result<Vec<IpAddr>, ResolveError>;

pub(crate) struct StubHosts {
    pub on_mx: Box<dyn Fn(&str) -> MxResult>,
    pub on_addresses: Box<dyn Fn(&str) -> AddrResult>,
}

impl StubHosts {
    pub(crate) fn with_mx<F>(f: F) -> Self
    where
        F: Fn(&str) -> MxResult + 'static,
    {
        Self {
            on_mx: Box::new(f),
            on_addresses: Box::new(|_| Ok(Vec::new())),
        }
    }

    pub(crate) fn empty() -> Self {
        Self::with_mx(|_| Ok(Vec::new()))
    }
}

impl LookupHosts for StubHosts {
    fn mx_records(&self, domain: &str) -> MxResult {
        (self.on_mx)(domain)
    }

    fn address_records(&self, domain: &str) -> AddrResult {
        (self.on_addresses)(domain)
    }
}

#[test]
fn normalize_domain_rejects_empty() {
    let err = resolver::normalize_domain("  ").expect_err("empty domain should fail");
    assert!(matches!(err, MxError::EmptyDomain));
}

#[test]
fn normalize_exchange_trims_dot_and_lowercases() {
    let out = resolver::normalize_exchange("Mail.EXAMPLE.com.".to_string());
    assert_eq!(out, "mail.example.com");
}

#[test]
fn candidates_sorted_by_ascending_preference() {
    let stub = StubHosts::with_mx(|domain| {
        assert_eq!(domain, "example.com");
        Ok(vec![
            MxRecord::new(20, "backup.example.com"),
            MxRecord::new(5, "primary.example.com"),
            MxRecord::new(10, "secondary.example.com"),
        ])
    });

    let candidates = resolver::resolve_candidates(&stub, "example.com").expect("lookup succeeds");
    let hostnames: Vec<&str> = candidates
        .iter()
        .map(|candidate| candidate.hostname.as_str())
        .collect();
    assert_eq!(
        hostnames,
        ["primary.example.com", "secondary.example.com", "backup.example.com"]
    );
    assert_eq!(candidates[0].preference, Some(5));
}

#[test]
fn preference_ties_keep_lookup_order() {
    let stub = StubHosts::with_mx(|_| {
        Ok(vec![
            MxRecord::new(10, "mx-b.example.com"),
            MxRecord::new(10, "mx-a.example.com"),
        ])
    });

    let candidates = resolver::resolve_candidates(&stub, "example.com").expect("lookup succeeds");
    assert_eq!(candidates[0].hostname, "mx-b.example.com");
    assert_eq!(candidates[1].hostname, "mx-a.example.com");
}

#[test]
fn duplicate_records_collapse() {
    let stub = StubHosts::with_mx(|_| {
        Ok(vec![
            MxRecord::new(10, "mx.example.com"),
            MxRecord::new(10, "mx.example.com"),
        ])
    });

    let candidates = resolver::resolve_candidates(&stub, "example.com").expect("lookup succeeds");
    assert_eq!(candidates.len(), 1);
}

#[test]
fn no_mx_falls_back_to_address_records() {
    let stub = StubHosts {
        on_mx: Box::new(|_| Ok(Vec::new())),
        on_addresses: Box::new(|domain| {
            assert_eq!(domain, "example.com");
            Ok(vec![
                "192.0.2.1".parse().unwrap(),
                "192.0.2.2".parse().unwrap(),
            ])
        }),
    };

    let candidates = resolver::resolve_candidates(&stub, "example.com").expect("lookup succeeds");
    assert_eq!(
        candidates,
        vec![
            MailServerCandidate::implicit("192.0.2.1"),
            MailServerCandidate::implicit("192.0.2.2"),
        ]
    );
    assert!(candidates.iter().all(|candidate| candidate.preference.is_none()));
}

#[test]
fn nothing_resolvable_reports_no_mail_servers() {
    let stub = StubHosts::empty();
    let err = resolver::resolve_candidates(&stub, "example.com").expect_err("should fail");
    assert!(matches!(err, MxError::NoMailServers));
}

#[test]
fn mx_query_timeout_is_its_own_outcome() {
    let stub = StubHosts::with_mx(|_| Err(ResolveError::from(ResolveErrorKind::Timeout)));
    let err = resolver::resolve_candidates(&stub, "example.com").expect_err("should fail");
    assert!(matches!(err, MxError::Timeout));
}

#[test]
fn other_lookup_failures_fall_through_to_fallback() {
    let stub = StubHosts {
        on_mx: Box::new(|_| Err(ResolveError::from("servfail"))),
        on_addresses: Box::new(|_| Ok(vec!["192.0.2.9".parse().unwrap()])),
    };

    let candidates = resolver::resolve_candidates(&stub, "example.com").expect("lookup succeeds");
    assert_eq!(candidates, vec![MailServerCandidate::implicit("192.0.2.9")]);
}
