use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use super::types::SmtpReply;

/// One plaintext SMTP connection, bounded by a single wall-clock deadline.
/// Every connect, read and write derives its timeout from the time left on
/// that deadline, so a stalled server cannot consume more than the budget
/// the caller granted for the whole session.
pub(crate) struct SmtpSession {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
    deadline: Instant,
}

impl SmtpSession {
    pub(crate) fn connect(addrs: &[SocketAddr], deadline: Instant) -> io::Result<Self> {
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(addr, remaining(deadline)?) {
                Ok(stream) => {
                    let reader = BufReader::new(stream.try_clone()?);
                    return Ok(Self {
                        stream,
                        reader,
                        deadline,
                    });
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "no socket address available",
            )
        }))
    }

    pub(crate) fn send_command(&mut self, command: &str) -> io::Result<()> {
        self.arm()?;
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        self.stream.write_all(&line)?;
        self.stream.flush()
    }

    pub(crate) fn read_reply(&mut self) -> io::Result<SmtpReply> {
        let stream = &self.stream;
        let deadline = self.deadline;
        read_reply_from(&mut self.reader, || {
            // a multiline reply must not stretch the deadline one
            // continuation line at a time
            let left = remaining(deadline)?;
            stream.set_read_timeout(Some(left))
        })
    }

    /// Send a command and read the server's reply for it.
    pub(crate) fn exchange(&mut self, command: &str) -> io::Result<SmtpReply> {
        self.send_command(command)?;
        self.read_reply()
    }

    /// Best-effort `QUIT`; the socket is released on drop either way.
    pub(crate) fn quit(&mut self) {
        if self.send_command("QUIT").is_ok() {
            let _ = self.read_reply();
        }
    }

    /// Refresh the socket timeouts from the time left on the deadline.
    fn arm(&mut self) -> io::Result<()> {
        let left = remaining(self.deadline)?;
        self.stream.set_read_timeout(Some(left))?;
        self.stream.set_write_timeout(Some(left))?;
        Ok(())
    }
}

fn remaining(deadline: Instant) -> io::Result<Duration> {
    let now = Instant::now();
    if now >= deadline {
        Err(io::Error::new(
            io::ErrorKind::TimedOut,
            "probe deadline exceeded",
        ))
    } else {
        Ok(deadline - now)
    }
}

/// A reply spanning more continuation lines than this is not something a
/// sane mail server sends; cutting it off bounds both memory and the time
/// a dripping server can hold the session.
const MAX_REPLY_LINES: usize = 64;

/// Read one SMTP reply, folding multiline continuations (`250-...`) into a
/// single [`SmtpReply`]. Inconsistent codes across continuation lines are
/// a protocol violation and reported as `InvalidData`. `before_line` runs
/// ahead of every read so the caller can enforce its deadline per line.
pub(crate) fn read_reply_from<R: BufRead>(
    reader: &mut R,
    mut before_line: impl FnMut() -> io::Result<()>,
) -> io::Result<SmtpReply> {
    let mut code = None;
    let mut message_lines = Vec::new();
    loop {
        before_line()?;
        let mut raw = String::new();
        let bytes = reader.read_line(&mut raw)?;
        if bytes == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed while reading reply",
            ));
        }
        if raw.ends_with('\n') {
            raw.pop();
            if raw.ends_with('\r') {
                raw.pop();
            }
        }

        // byte offsets only; `get` rejects a reply that is too short or
        // puts multibyte text where the code belongs
        let code_part = raw.get(..3).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid SMTP reply: '{raw}'"),
            )
        })?;
        let parsed_code = code_part.parse::<u16>().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid SMTP status code: '{code_part}'"),
            )
        })?;
        if let Some(existing) = code {
            if existing != parsed_code {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("inconsistent SMTP reply codes: {existing} vs {parsed_code}"),
                ));
            }
        } else {
            code = Some(parsed_code);
        }
        let continuation = raw.as_bytes().get(3).copied() == Some(b'-');
        let text_start = if raw.len() > 3 { 4 } else { 3 };
        let text = raw.get(text_start..).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid SMTP reply: '{raw}'"),
            )
        })?;
        message_lines.push(text.to_string());
        if !continuation {
            break;
        }
        if message_lines.len() >= MAX_REPLY_LINES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "SMTP reply exceeded the continuation line limit",
            ));
        }
    }
    Ok(SmtpReply {
        code: code.ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "SMTP reply missing status code")
        })?,
        message: message_lines.join("\n"),
    })
}
