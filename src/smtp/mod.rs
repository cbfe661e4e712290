//! SMTP probe sessions.
//!
//! A probe is a partial mail transaction: connect, greet, announce a
//! sentinel sender, name the recipient under test, quit. The session never
//! reaches `DATA`, so nothing is delivered. The whole session runs under
//! one wall-clock deadline and always releases its connection before
//! returning, whatever the exit path.

mod probe;
mod session;
mod types;

pub use probe::{ProbeHost, SmtpProber};
pub use types::{ProbeOutcome, SmtpReply};
