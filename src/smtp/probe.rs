use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::debug;

use super::session::SmtpSession;
use super::types::{ProbeOutcome, SmtpReply};
use crate::address::EmailAddress;

/// Seam between the coordinator and the SMTP transport. Tests substitute
/// scripted probers; production uses [`SmtpProber`].
pub trait ProbeHost {
    /// Run one bounded probe session against `host` and report what came
    /// back. Never panics, never blocks past `timeout`.
    fn probe(
        &self,
        host: &str,
        sender: &EmailAddress,
        recipient: &EmailAddress,
        timeout: Duration,
    ) -> ProbeOutcome;
}

/// Plaintext SMTP prober. Drives the fixed dialogue
/// greeting → `EHLO`/`HELO` → `MAIL FROM` → `RCPT TO` → `QUIT`
/// against one host, one session per call, and returns the raw reply that
/// ended it. No message is ever queued: the session stops short of `DATA`.
#[derive(Debug, Clone)]
pub struct SmtpProber {
    pub port: u16,
    pub helo_domain: String,
}

impl SmtpProber {
    pub fn new(port: u16, helo_domain: impl Into<String>) -> Self {
        Self {
            port,
            helo_domain: helo_domain.into(),
        }
    }
}

impl ProbeHost for SmtpProber {
    fn probe(
        &self,
        host: &str,
        sender: &EmailAddress,
        recipient: &EmailAddress,
        timeout: Duration,
    ) -> ProbeOutcome {
        let deadline = Instant::now() + timeout;

        let addrs: Vec<SocketAddr> = match (host, self.port).to_socket_addrs() {
            Ok(iter) => iter.collect(),
            Err(err) => {
                debug!(host, error = %err, "no socket addresses for host");
                return ProbeOutcome::Unreachable;
            }
        };
        if addrs.is_empty() {
            return ProbeOutcome::Unreachable;
        }

        let mut session = match SmtpSession::connect(&addrs, deadline) {
            Ok(session) => session,
            Err(err) => {
                debug!(host, error = %err, "connect failed");
                return transport_outcome(&err);
            }
        };

        let outcome = dialogue(&mut session, &self.helo_domain, sender, recipient);
        // guaranteed cleanup on every exit path
        session.quit();
        debug!(host, ?outcome, "probe session closed");
        outcome
    }
}

/// The command sequence proper. Each step checks the reply before the next
/// command is sent; any reply that does not let the dialogue continue is
/// returned raw for the coordinator to interpret.
fn dialogue(
    session: &mut SmtpSession,
    helo_domain: &str,
    sender: &EmailAddress,
    recipient: &EmailAddress,
) -> ProbeOutcome {
    let greeting = match session.read_reply() {
        Ok(reply) => reply,
        Err(err) => return transport_outcome(&err),
    };
    if !lets_us_continue(&greeting) {
        // the host rejected the session before any command
        return ProbeOutcome::Response(greeting);
    }

    let hello = match say_hello(session, helo_domain) {
        Ok(reply) => reply,
        Err(err) => return transport_outcome(&err),
    };
    if !lets_us_continue(&hello) {
        return ProbeOutcome::Response(hello);
    }

    let mail = match session.exchange(&format!("MAIL FROM:<{sender}>")) {
        Ok(reply) => reply,
        Err(err) => return transport_outcome(&err),
    };
    if !lets_us_continue(&mail) {
        return ProbeOutcome::Response(mail);
    }

    // the RCPT reply is the probe's primary signal; returned uninterpreted
    match session.exchange(&format!("RCPT TO:<{recipient}>")) {
        Ok(reply) => ProbeOutcome::Response(reply),
        Err(err) => transport_outcome(&err),
    }
}

/// `EHLO`, downgrading to `HELO` when the server rejects the extended
/// greeting outright.
fn say_hello(session: &mut SmtpSession, helo_domain: &str) -> io::Result<SmtpReply> {
    let reply = session.exchange(&format!("EHLO {helo_domain}"))?;
    if reply.is_permanent_failure() {
        return session.exchange(&format!("HELO {helo_domain}"));
    }
    Ok(reply)
}

fn lets_us_continue(reply: &SmtpReply) -> bool {
    reply.is_positive_completion() || reply.is_positive_intermediate()
}

fn transport_outcome(err: &io::Error) -> ProbeOutcome {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ProbeOutcome::Timeout,
        io::ErrorKind::ConnectionRefused => ProbeOutcome::ConnectionRefused,
        _ => ProbeOutcome::Unreachable,
    }
}
