use std::path::Path;

use anyhow::{Context, Result};
use genuine_email::{
    Credentials, GenuineEmailValidator, InMemoryStore, UniquenessStore, validate_email_syntax,
};

use crate::output::OutputRow;

pub fn run_validate(
    emails: &[String],
    unique: Option<&str>,
    known: Option<&Path>,
) -> Result<Vec<OutputRow>> {
    let store = unique.map(|scope| load_store(scope, known)).transpose()?;
    let store = store.as_ref().map(|s| s as &dyn UniquenessStore);

    emails
        .iter()
        .map(|email| {
            let outcome = validate_email_syntax(email, unique, store)
                .with_context(|| format!("validate {email}"))?;
            Ok(OutputRow::from_outcome(email, &outcome))
        })
        .collect()
}

fn load_store(scope: &str, known: Option<&Path>) -> Result<InMemoryStore> {
    let mut store = InMemoryStore::new();
    store.register_scope(scope);
    if let Some(path) = known {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            store.insert(scope, "email", line);
        }
    }
    Ok(store)
}

/// Remote check for each address. Addresses failing the syntax rules are
/// reported invalid without spending an API call.
pub fn run_genuine(
    emails: &[String],
    key: Option<String>,
    endpoint: Option<&str>,
) -> Result<Vec<OutputRow>> {
    let credentials = match key {
        Some(key) => Credentials::new(key)?,
        None => Credentials::from_env()?,
    };
    let credentials = match endpoint {
        Some(endpoint) => credentials.with_endpoint(endpoint)?,
        None => credentials,
    };
    let validator = GenuineEmailValidator::new(credentials);

    emails
        .iter()
        .map(|email| {
            let outcome = validator
                .is_syntactically_valid(email, None)
                .with_context(|| format!("validate {email}"))?;
            if outcome.fails() {
                return Ok(OutputRow::from_outcome(email, &outcome));
            }
            Ok(match validator.is_genuine(email) {
                Ok(genuineness) => OutputRow::from_genuineness(email, genuineness),
                Err(err) => OutputRow::unavailable(email, &err),
            })
        })
        .collect()
}
