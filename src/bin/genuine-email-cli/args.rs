use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "genuine-email-cli",
    version,
    about = "Email syntax/uniqueness validation and MailboxLayer deliverability checks"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,

    /// lit des adresses depuis stdin (une par ligne)
    #[arg(long, global = true)]
    pub stdin: bool,

    /// write report to file (JSON/NDJSON/CSV selon --format)
    #[arg(long, global = true)]
    pub out: Option<String>,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human", global = true)]
    pub format: String,

    /// logs de debug sur stderr (feature `with-tracing`)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Syntax check: required|string|email|max:255, plus uniqueness with --unique
    Validate {
        email: Option<String>,
        /// uniqueness scope (ex: "users")
        #[arg(long)]
        unique: Option<String>,
        /// addresses already present in the scope, one per line
        #[arg(long, requires = "unique")]
        known: Option<PathBuf>,
    },
    /// Deliverability check through the MailboxLayer API (consumes quota)
    Genuine {
        email: Option<String>,
        /// MailboxLayer access key
        #[arg(long, env = "MAILBOXLAYER_KEY", hide_env_values = true)]
        key: Option<String>,
        /// remplace l'endpoint https://apilayer.net/api/check
        #[arg(long)]
        endpoint: Option<String>,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_requires_unique() {
        let parsed = <Cli as Parser>::try_parse_from([
            "genuine-email-cli",
            "validate",
            "a@example.com",
            "--known",
            "users.txt",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = <Cli as Parser>::try_parse_from([
            "genuine-email-cli",
            "genuine",
            "--key",
            "abc",
            "--format",
            "json",
            "a@example.com",
        ])
        .unwrap();
        assert_eq!(cli.format, "json");
        match cli.cmd {
            Commands::Genuine { email, key, .. } => {
                assert_eq!(email.as_deref(), Some("a@example.com"));
                assert_eq!(key.as_deref(), Some("abc"));
            }
            Commands::Validate { .. } => panic!("expected genuine"),
        }
    }
}
