use anyhow::{Context, Result};
use clap::CommandFactory;
use clap::{Parser, Subcommand};
use mailprobe_lib::{Verification, VerifyOptions, verify_with_options};

use std::io::{self, BufRead};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mailprobe-cli")]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Commands>,

    /// read addresses from stdin (one per line)
    #[arg(long)]
    stdin: bool,

    /// format: human|json
    #[arg(long, default_value = "human")]
    format: String,

    /// name used for EHLO/HELO
    #[arg(long)]
    helo: Option<String>,

    /// MAIL FROM envelope (default postmaster@<target domain>)
    #[arg(long = "from")]
    sender: Option<String>,

    /// SMTP port on the candidate hosts
    #[arg(long, default_value_t = 25)]
    port: u16,

    /// DNS timeout (ms)
    #[arg(long = "dns-timeout", default_value_t = 5_000)]
    dns_timeout_ms: u64,

    /// per-host SMTP timeout (ms)
    #[arg(long = "smtp-timeout", default_value_t = 5_000)]
    smtp_timeout_ms: u64,

    /// overall budget per address (ms)
    #[arg(long = "total-timeout", default_value_t = 30_000)]
    total_timeout_ms: u64,

    /// maximum number of exchangers tried
    #[arg(long = "max-servers", default_value_t = 3)]
    max_servers: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// verify a single address
    Verify { email: String },
}

impl Cli {
    fn options(&self) -> VerifyOptions {
        VerifyOptions {
            port: self.port,
            helo_domain: self.helo.clone(),
            sender_address: self.sender.clone(),
            dns_timeout: Duration::from_millis(self.dns_timeout_ms),
            smtp_timeout: Duration::from_millis(self.smtp_timeout_ms),
            total_timeout: Duration::from_millis(self.total_timeout_ms),
            max_servers: self.max_servers,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = cli.options();
    let mut rows: Vec<Verification> = Vec::new();

    if cli.stdin {
        for line in io::stdin().lock().lines() {
            let email = line.context("read stdin")?;
            if email.trim().is_empty() {
                continue;
            }
            rows.push(verify_with_options(&email, &options)?);
        }
    } else if let Some(Commands::Verify { email }) = cli.cmd {
        rows.push(verify_with_options(&email, &options)?);
    } else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    match cli.format.as_str() {
        "human" => {
            for row in &rows {
                if row.is_deliverable() {
                    println!("[OK]      {}", row.address);
                } else {
                    println!("[FAILED]  {} :: {}", row.address, row.result);
                }
                if !row.servers_tried.is_empty() {
                    println!("          tried: {}", row.servers_tried.join(", "));
                }
            }
        }
        "json" => {
            #[cfg(feature = "with-serde")]
            {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
            #[cfg(not(feature = "with-serde"))]
            {
                eprintln!("format=json requires the 'with-serde' feature");
                std::process::exit(1);
            }
        }
        other => {
            eprintln!("unknown --format '{}', use: human|json", other);
            std::process::exit(1);
        }
    }

    // exit codes: 0 all deliverable, 2 any non-deliverable, 1 fatal
    if rows.iter().any(|row| !row.is_deliverable()) {
        std::process::exit(2);
    }
    Ok(())
}
