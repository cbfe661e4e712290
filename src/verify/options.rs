use std::time::Duration;

/// Configuration bundle for a verification call.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// SMTP port on the candidate hosts.
    pub port: u16,
    /// Name announced in `EHLO`/`HELO`. Some receivers reject probes whose
    /// greeting does not resolve back to the connecting host; set this to
    /// a name you control.
    pub helo_domain: Option<String>,
    /// Envelope sender for `MAIL FROM`. When unset, a
    /// `postmaster@<target-domain>` sentinel is synthesised. Never used to
    /// deliver anything.
    pub sender_address: Option<String>,
    /// Bound on each DNS query, independent of the SMTP budgets.
    pub dns_timeout: Duration,
    /// Bound on one probe session against one candidate host.
    pub smtp_timeout: Duration,
    /// Aggregate wall-clock budget across all candidate attempts.
    pub total_timeout: Duration,
    /// Maximum number of candidate hosts to try.
    pub max_servers: usize,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            port: 25,
            helo_domain: None,
            sender_address: None,
            dns_timeout: Duration::from_secs(5),
            smtp_timeout: Duration::from_secs(5),
            total_timeout: Duration::from_secs(30),
            max_servers: 3,
        }
    }
}

impl VerifyOptions {
    pub(crate) fn helo_domain(&self) -> &str {
        self.helo_domain
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or("localhost")
    }
}
