mod args;
mod check;
mod output;

use std::io::{self, BufRead};

use anyhow::{Context, Result, bail};

use args::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let rows = match &cli.cmd {
        Commands::Validate {
            email,
            unique,
            known,
        } => {
            let emails = collect_emails(cli.stdin, email.as_deref())?;
            check::run_validate(&emails, unique.as_deref(), known.as_deref())?
        }
        Commands::Genuine {
            email,
            key,
            endpoint,
        } => {
            let emails = collect_emails(cli.stdin, email.as_deref())?;
            check::run_genuine(&emails, key.clone(), endpoint.as_deref())?
        }
    };

    output::write_reports(&rows, &cli)?;

    match output::exit_code(&rows) {
        0 => Ok(()),
        code => std::process::exit(code),
    }
}

fn collect_emails(stdin: bool, email: Option<&str>) -> Result<Vec<String>> {
    if stdin {
        let mut emails = Vec::new();
        for line in io::stdin().lock().lines() {
            let line = line.context("read stdin")?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                emails.push(trimmed.to_string());
            }
        }
        Ok(emails)
    } else if let Some(email) = email {
        Ok(vec![email.to_string()])
    } else {
        bail!("no address given: pass EMAIL or --stdin")
    }
}

#[cfg(feature = "with-tracing")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("genuine_email=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(not(feature = "with-tracing"))]
fn init_tracing(verbose: bool) {
    if verbose {
        eprintln!("--verbose nécessite la feature 'with-tracing'");
    }
}
