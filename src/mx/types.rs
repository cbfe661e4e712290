#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// One host to try an SMTP probe against. `preference` is `None` for
/// implicit exchangers synthesised from the domain's address records.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailServerCandidate {
    pub hostname: String,
    pub preference: Option<u16>,
}

impl MailServerCandidate {
    pub fn from_mx(record: MxRecord) -> Self {
        Self {
            hostname: record.exchange,
            preference: Some(record.preference),
        }
    }

    pub fn implicit(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            preference: None,
        }
    }
}
