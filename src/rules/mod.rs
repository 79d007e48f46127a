//! Field validation driven by rule-set strings.
//!
//! A [`Validator`] takes a field → value map and a field → rules map
//! (`"required|string|email|max:255|unique:users"`) and returns a
//! [`ValidationOutcome`] listing the violated rules per field.

mod email;
mod error;
mod rule;
mod store;

pub use email::email_shape_violations;
pub use error::{RuleError, StoreError};
pub use rule::{Rule, parse_rules};
pub use store::{InMemoryStore, UniquenessStore};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Input value of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Bool(bool),
    Null,
}

impl FieldValue {
    fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Null => true,
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    fn as_lookup_key(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Result of running a [`Validator`]: violated-rule messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationOutcome {
    pub fn passes(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fails(&self) -> bool {
        !self.passes()
    }

    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// All messages, field by field in name order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors.values().flatten().map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    fn push(&mut self, field: &str, message: String) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message);
    }
}

/// Evaluates rule sets against field values.
///
/// `unique` rules need a [`UniquenessStore`]; without one they fail with
/// [`RuleError::NoStore`].
#[derive(Clone, Copy, Default)]
pub struct Validator<'s> {
    store: Option<&'s dyn UniquenessStore>,
}

impl<'s> Validator<'s> {
    pub fn new() -> Self {
        Self { store: None }
    }

    pub fn with_store(store: &'s dyn UniquenessStore) -> Self {
        Self { store: Some(store) }
    }

    /// Validate `data` against `rules` (field name → rule-set string).
    /// Fields named in `rules` but absent from `data` are treated as null.
    pub fn make<F, R>(
        &self,
        data: &BTreeMap<String, FieldValue>,
        rules: impl IntoIterator<Item = (F, R)>,
    ) -> Result<ValidationOutcome, RuleError>
    where
        F: AsRef<str>,
        R: AsRef<str>,
    {
        let mut outcome = ValidationOutcome::default();
        for (field, rule_set) in rules {
            let field = field.as_ref();
            let parsed = parse_rules(rule_set.as_ref())?;
            self.check_field(field, data.get(field), &parsed, &mut outcome)?;
        }
        Ok(outcome)
    }

    /// Shortcut for a single field.
    pub fn validate_field(
        &self,
        field: &str,
        value: impl Into<FieldValue>,
        rules: &str,
    ) -> Result<ValidationOutcome, RuleError> {
        let data = BTreeMap::from([(field.to_string(), value.into())]);
        self.make(&data, [(field, rules)])
    }

    fn check_field(
        &self,
        field: &str,
        value: Option<&FieldValue>,
        rules: &[Rule],
        outcome: &mut ValidationOutcome,
    ) -> Result<(), RuleError> {
        let value = match value {
            Some(value) if !value.is_blank() => value,
            // champ absent: seul `required` s'applique
            _ => {
                if rules.contains(&Rule::Required) {
                    outcome.push(field, format!("The {field} field is required."));
                }
                return Ok(());
            }
        };

        for rule in rules {
            if let Some(message) = self.check_rule(field, value, rule)? {
                outcome.push(field, message);
            }
        }
        Ok(())
    }

    fn check_rule(
        &self,
        field: &str,
        value: &FieldValue,
        rule: &Rule,
    ) -> Result<Option<String>, RuleError> {
        let message = match (rule, value) {
            (Rule::Required, _) => None,
            (Rule::String, FieldValue::Text(_)) => None,
            (Rule::String, _) => Some(format!("The {field} field must be a string.")),
            (Rule::Email, FieldValue::Text(text)) if email_shape_violations(text).is_empty() => {
                None
            }
            (Rule::Email, _) => Some(format!("The {field} field must be a valid email address.")),
            (Rule::Max(limit), FieldValue::Text(text)) => (text.chars().count() > *limit).then(|| {
                format!("The {field} field must not be greater than {limit} characters.")
            }),
            (Rule::Max(limit), FieldValue::Number(n)) => {
                let over = usize::try_from(*n).is_ok_and(|n| n > *limit);
                over.then(|| format!("The {field} field must not be greater than {limit}."))
            }
            (Rule::Max(_), _) => None,
            (Rule::Unique { scope, column }, _) => {
                let store = self.store.ok_or_else(|| RuleError::NoStore {
                    scope: scope.clone(),
                })?;
                let column = column.as_deref().unwrap_or(field);
                let taken = match value.as_lookup_key() {
                    Some(key) => store.exists(scope, column, &key)?,
                    None => false,
                };
                taken.then(|| format!("The {field} has already been taken."))
            }
        };
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = "required|string|email|max:255";

    #[test]
    fn invalid_email_fails() {
        let outcome = Validator::new()
            .validate_field("email", "not-an-email", RULES)
            .unwrap();
        assert!(outcome.fails());
        assert_eq!(
            outcome.errors_for("email"),
            ["The email field must be a valid email address."]
        );
    }

    #[test]
    fn valid_email_passes() {
        let outcome = Validator::new()
            .validate_field("email", "alice@example.com", RULES)
            .unwrap();
        assert!(outcome.passes(), "{:?}", outcome.errors());
    }

    #[test]
    fn missing_value_only_reports_required() {
        let outcome = Validator::new()
            .validate_field("email", None::<String>, RULES)
            .unwrap();
        assert_eq!(outcome.messages().collect::<Vec<_>>(), [
            "The email field is required."
        ]);

        let blank = Validator::new()
            .validate_field("email", "   ", RULES)
            .unwrap();
        assert_eq!(blank.errors_for("email").len(), 1);
    }

    #[test]
    fn optional_field_may_be_absent() {
        let outcome = Validator::new()
            .validate_field("email", FieldValue::Null, "email|max:255")
            .unwrap();
        assert!(outcome.passes());
    }

    #[test]
    fn non_string_values() {
        let outcome = Validator::new()
            .validate_field("email", 42_i64, RULES)
            .unwrap();
        assert_eq!(outcome.errors_for("email"), [
            "The email field must be a string.",
            "The email field must be a valid email address.",
        ]);

        let age = Validator::new().validate_field("age", 300_i64, "max:150").unwrap();
        assert_eq!(age.errors_for("age"), ["The age field must not be greater than 150."]);
    }

    #[test]
    fn max_counts_characters() {
        let long = format!("{}@example.com", "a".repeat(250));
        let outcome = Validator::new().validate_field("email", long, RULES).unwrap();
        assert!(
            outcome
                .messages()
                .any(|m| m == "The email field must not be greater than 255 characters.")
        );
    }

    #[test]
    fn unique_against_store() {
        let store = InMemoryStore::with_values("users", "email", ["taken@example.com"]);
        let validator = Validator::with_store(&store);
        let rules = "required|email|unique:users";

        let taken = validator
            .validate_field("email", "taken@example.com", rules)
            .unwrap();
        assert_eq!(taken.errors_for("email"), ["The email has already been taken."]);

        let free = validator
            .validate_field("email", "free@example.com", rules)
            .unwrap();
        assert!(free.passes());
    }

    #[test]
    fn unique_with_explicit_column() {
        let store = InMemoryStore::with_values("accounts", "contact", ["a@example.com"]);
        let outcome = Validator::with_store(&store)
            .validate_field("email", "a@example.com", "unique:accounts,contact")
            .unwrap();
        assert!(outcome.fails());
    }

    #[test]
    fn unique_without_store_is_an_error() {
        let err = Validator::new()
            .validate_field("email", "a@example.com", "unique:users")
            .unwrap_err();
        assert!(matches!(err, RuleError::NoStore { ref scope } if scope == "users"));
    }

    #[test]
    fn several_fields() {
        let data = BTreeMap::from([
            ("email".to_string(), FieldValue::from("bad")),
            ("backup".to_string(), FieldValue::from("ok@example.org")),
        ]);
        let outcome = Validator::new()
            .make(&data, [("email", RULES), ("backup", RULES), ("name", "required")])
            .unwrap();
        assert_eq!(outcome.errors().len(), 2);
        assert!(outcome.errors_for("backup").is_empty());
        assert_eq!(outcome.errors_for("name"), ["The name field is required."]);
    }
}
