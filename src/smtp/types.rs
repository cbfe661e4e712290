/// A raw SMTP reply, preserving the numeric status code and message text.
/// Multiline replies are folded into one message with `\n` separators.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_positive_intermediate(&self) -> bool {
        (300..400).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }
}

/// What a single probe session against one candidate host produced. The
/// transport variants are terminal failures; `Response` carries the raw
/// reply that ended the dialogue, uninterpreted. Deciding what a reply
/// means for the mailbox is the coordinator's job, not the session's.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// No response arrived within the remaining time budget.
    Timeout,
    /// The host could not be reached at the transport layer.
    Unreachable,
    /// The host actively refused the connection.
    ConnectionRefused,
    /// The protocol reply that ended the dialogue; for a completed session
    /// this is the `RCPT TO` reply, the probe's primary signal.
    Response(SmtpReply),
}
