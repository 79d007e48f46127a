use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::args::Cli;
use genuine_email::{
    Genuineness, ValidationOutcome, VerificationResult, VerifyError, email_shape_violations,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Valid,
    Invalid,
    Genuine,
    NotGenuine,
    /// the provider could not answer: not the same thing as `NotGenuine`
    Unavailable,
}

impl RowStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Valid => "[OK]",
            Self::Invalid => "[INVALID]",
            Self::Genuine => "[GENUINE]",
            Self::NotGenuine => "[NOT GENUINE]",
            Self::Unavailable => "[UNAVAILABLE]",
        }
    }

    #[cfg_attr(not(feature = "with-csv"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Genuine => "genuine",
            Self::NotGenuine => "not_genuine",
            Self::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputRow {
    pub email: String,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<VerificationResult>,
}

impl OutputRow {
    pub fn from_outcome(email: &str, outcome: &ValidationOutcome) -> Self {
        if outcome.passes() {
            return Self::new(email, RowStatus::Valid);
        }
        let mut reasons: Vec<String> = outcome.messages().map(str::to_string).collect();
        // détail des violations de forme, seulement si la règle `email` a échoué
        let shape_failed = outcome
            .errors_for("email")
            .iter()
            .any(|m| m.ends_with("must be a valid email address."));
        if shape_failed {
            reasons.extend(email_shape_violations(email));
        }
        Self {
            reasons,
            ..Self::new(email, RowStatus::Invalid)
        }
    }

    pub fn from_genuineness(email: &str, genuineness: Genuineness) -> Self {
        match genuineness {
            Genuineness::Genuine(result) => Self {
                result: Some(result),
                ..Self::new(email, RowStatus::Genuine)
            },
            Genuineness::NotGenuine => Self::new(email, RowStatus::NotGenuine),
        }
    }

    pub fn unavailable(email: &str, error: &VerifyError) -> Self {
        Self {
            reasons: vec![error.to_string()],
            ..Self::new(email, RowStatus::Unavailable)
        }
    }

    fn new(email: &str, status: RowStatus) -> Self {
        Self {
            email: email.to_string(),
            status,
            reasons: Vec::new(),
            result: None,
        }
    }

    fn human_line(&self) -> String {
        let label = format!("{:<13}", self.status.label());
        let mut line = format!("{label} {}", self.email);
        if !self.reasons.is_empty() {
            line.push_str(" :: ");
            line.push_str(&self.reasons.join("; "));
        }
        if let Some(result) = &self.result {
            let mut extras = Vec::new();
            if let Some(score) = result.score() {
                extras.push(format!("score {score:.2}"));
            }
            if let Some(suggestion) = result.suggestion() {
                extras.push(format!("did you mean {suggestion}"));
            }
            if !extras.is_empty() {
                line.push_str(&format!(" ({})", extras.join(", ")));
            }
        }
        line
    }
}

pub fn write_reports(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => {
            for row in rows {
                println!("{}", row.human_line());
            }
            Ok(())
        }
        "json" => {
            let s = serde_json::to_string_pretty(rows)?;
            emit(cli, s.as_bytes())
        }
        "ndjson" => {
            let mut buf = Vec::new();
            for row in rows {
                serde_json::to_writer(&mut buf, row)?;
                buf.push(b'\n');
            }
            emit(cli, &buf)
        }
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

/// 0 when every row is fine, 2 when at least one address was rejected, 1 when
/// the provider was unavailable for at least one address (wins over 2).
pub fn exit_code(rows: &[OutputRow]) -> i32 {
    if any_unavailable(rows) {
        1
    } else if any_rejected(rows) {
        2
    } else {
        0
    }
}

fn any_unavailable(rows: &[OutputRow]) -> bool {
    rows.iter().any(|row| row.status == RowStatus::Unavailable)
}

fn any_rejected(rows: &[OutputRow]) -> bool {
    rows.iter()
        .any(|row| matches!(row.status, RowStatus::Invalid | RowStatus::NotGenuine))
}

fn emit(cli: &Cli, bytes: &[u8]) -> Result<()> {
    if let Some(path) = &cli.out {
        write_all_atomically(path, bytes)
    } else {
        use std::io::Write;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(bytes)?;
        if !bytes.ends_with(b"\n") {
            stdout.write_all(b"\n")?;
        }
        Ok(())
    }
}

#[cfg(feature = "with-csv")]
fn write_csv(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["email", "status", "reasons", "mx_found", "score", "did_you_mean"])?;
    for row in rows {
        wtr.write_record(csv_record(row))?;
    }
    let data = wtr.into_inner().context("flush csv")?;
    emit(cli, &data)
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=csv nécessite la feature 'with-csv'")
}

#[cfg(feature = "with-csv")]
fn csv_record(row: &OutputRow) -> Vec<String> {
    let result = row.result.as_ref();
    vec![
        row.email.clone(),
        row.status.as_str().to_string(),
        row.reasons.join("|"),
        result
            .and_then(|r| r.flag("mx_found"))
            .map(|b| b.to_string())
            .unwrap_or_default(),
        result
            .and_then(|r| r.score())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        result
            .and_then(|r| r.suggestion())
            .unwrap_or_default()
            .to_string(),
    ]
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp).with_context(|| format!("create {tmp}"))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}
