use std::fmt;

/// The closed set of outcomes a verification call can produce. Expected
/// conditions are values here, never panics or opaque errors.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    /// The input was not a valid UTF-8 string.
    InvalidInput,
    /// The input has no usable `local@domain` shape.
    InvalidFormat,
    /// The domain part cannot be turned into a DNS hostname.
    InvalidHostname { hostname: String },
    /// DNS resolution timed out; safe to retry later.
    DnsTimeout,
    /// Neither MX nor address records exist for the domain.
    NoMailServers { hostname: String },
    /// An exchanger rejected the mailbox as nonexistent; authoritative.
    UnknownUser { local_part: String },
    /// An exchanger rejected the mailbox as full / over quota.
    MailboxFull,
    /// A server answered, but not conclusively (greylisting, policy
    /// deferrals, odd codes). Carries the raw reply for diagnostics.
    Indeterminate { code: u16, message: String },
    /// At least one exchanger was contacted but none answered in time.
    SmtpTimeout,
    /// No exchanger could be reached at all.
    SmtpUnreachable,
    /// An exchanger accepted the recipient.
    Verified,
}

impl VerificationResult {
    pub fn is_deliverable(&self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Infrastructure-side outcomes a caller may retry later. Input
    /// defects and authoritative server verdicts are not retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DnsTimeout | Self::SmtpTimeout | Self::SmtpUnreachable | Self::Indeterminate { .. }
        )
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput => f.write_str("input is not a valid UTF-8 string"),
            Self::InvalidFormat => f.write_str("not a valid email address format: missing '@'"),
            Self::InvalidHostname { hostname } => {
                write!(f, "'{hostname}' is not a valid hostname")
            }
            Self::DnsTimeout => f.write_str("DNS timeout"),
            Self::NoMailServers { hostname } => {
                write!(f, "'{hostname}' has no mail servers")
            }
            Self::UnknownUser { local_part } => {
                write!(f, "'{local_part}': no such user")
            }
            Self::MailboxFull => f.write_str("mailbox full"),
            Self::Indeterminate { code, .. } => {
                write!(f, "inconclusive server response ({code})")
            }
            Self::SmtpTimeout => f.write_str("SMTP timeout"),
            Self::SmtpUnreachable => f.write_str("cannot connect to any SMTP server"),
            Self::Verified => f.write_str("deliverable"),
        }
    }
}

/// Result of one verification call: the outcome plus the context fields a
/// message-rendering layer needs (`hostname`, `local_part`) and the hosts
/// actually contacted, in order.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub address: String,
    pub result: VerificationResult,
    pub hostname: Option<String>,
    pub local_part: Option<String>,
    pub servers_tried: Vec<String>,
}

impl Verification {
    pub(crate) fn new(address: impl Into<String>, result: VerificationResult) -> Self {
        Self {
            address: address.into(),
            result,
            hostname: None,
            local_part: None,
            servers_tried: Vec::new(),
        }
    }

    pub(crate) fn with_parts(mut self, local_part: &str, hostname: &str) -> Self {
        self.local_part = Some(local_part.to_string());
        self.hostname = Some(hostname.to_string());
        self
    }

    pub(crate) fn with_servers(mut self, servers_tried: Vec<String>) -> Self {
        self.servers_tried = servers_tried;
        self
    }

    pub fn is_deliverable(&self) -> bool {
        self.result.is_deliverable()
    }
}
