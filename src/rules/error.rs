use thiserror::Error;

/// Errors raised by a [`UniquenessStore`](super::UniquenessStore) lookup.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown uniqueness scope '{scope}'")]
    UnknownScope { scope: String },
    #[error("uniqueness lookup failed: {0}")]
    Backend(String),
}

impl StoreError {
    pub(crate) fn unknown_scope(scope: impl Into<String>) -> Self {
        Self::UnknownScope {
            scope: scope.into(),
        }
    }
}

/// Errors raised while parsing or evaluating a rule set.
///
/// These are configuration problems (bad rule strings, missing store), not
/// validation failures: a value that breaks a rule ends up in the
/// [`ValidationOutcome`](super::ValidationOutcome) instead.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("unknown rule '{name}'")]
    UnknownRule { name: String },
    #[error("rule '{rule}' has an invalid parameter '{param}'")]
    InvalidParameter { rule: String, param: String },
    #[error("rule 'unique:{scope}' needs a uniqueness store")]
    NoStore { scope: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RuleError {
    pub(crate) fn invalid_parameter(rule: impl Into<String>, param: impl Into<String>) -> Self {
        Self::InvalidParameter {
            rule: rule.into(),
            param: param.into(),
        }
    }
}
