#![forbid(unsafe_code)]
//! mailprobe_lib — mailbox deliverability verification via MX resolution
//! and SMTP probing.
//!
//! The crate answers "does this mailbox plausibly exist?" by resolving the
//! domain's mail exchangers and driving a partial SMTP dialogue (greeting,
//! `MAIL FROM`, `RCPT TO`, `QUIT`) against them, one host at a time. No
//! message is ever queued and no state survives a call; the observable
//! output is a single [`VerificationResult`] plus context for rendering.

pub mod address;
pub mod mx;
pub mod smtp;
pub mod verify;

pub use address::{AddressError, EmailAddress};
pub use mx::{MailServerCandidate, MxError, MxRecord, mx_lookup_supported, resolve_mail_servers};
pub use smtp::{ProbeHost, ProbeOutcome, SmtpProber, SmtpReply};
pub use verify::{
    Verification, VerificationResult, VerifyError, VerifyOptions, verify, verify_bytes,
    verify_with_options,
};
