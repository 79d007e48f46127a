use std::fmt;
use std::str::FromStr;

use super::RuleError;

/// A single validation rule, as written in a rule-set string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    String,
    Email,
    Max(usize),
    /// `unique:scope` or `unique:scope,column`
    Unique {
        scope: String,
        column: Option<String>,
    },
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, param) = match s.split_once(':') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (s.trim(), None),
        };

        match (name, param) {
            ("required", None) => Ok(Self::Required),
            ("string", None) => Ok(Self::String),
            ("email", None) => Ok(Self::Email),
            ("max", Some(limit)) => limit
                .parse()
                .map(Self::Max)
                .map_err(|_| RuleError::invalid_parameter(name, limit)),
            ("unique", Some(scope)) => parse_unique(scope),
            ("required" | "string" | "email" | "max" | "unique", _) => {
                Err(RuleError::invalid_parameter(name, param.unwrap_or_default()))
            }
            (other, _) => Err(RuleError::UnknownRule {
                name: other.to_string(),
            }),
        }
    }
}

fn parse_unique(param: &str) -> Result<Rule, RuleError> {
    let mut parts = param.split(',').map(str::trim);
    let scope = parts.next().unwrap_or_default();
    let column = parts.next();
    if scope.is_empty() || parts.next().is_some() || column.is_some_and(str::is_empty) {
        return Err(RuleError::invalid_parameter("unique", param));
    }
    Ok(Rule::Unique {
        scope: scope.to_string(),
        column: column.map(str::to_string),
    })
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::String => f.write_str("string"),
            Self::Email => f.write_str("email"),
            Self::Max(limit) => write!(f, "max:{limit}"),
            Self::Unique {
                scope,
                column: Some(column),
            } => write!(f, "unique:{scope},{column}"),
            Self::Unique { scope, column: None } => write!(f, "unique:{scope}"),
        }
    }
}

/// Parse a `|`-separated rule set such as `required|string|email|max:255`.
/// Empty segments are ignored.
pub fn parse_rules(rules: &str) -> Result<Vec<Rule>, RuleError> {
    rules
        .split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_email_rules() {
        let rules = parse_rules("required|string|email|max:255|unique:users").unwrap();
        assert_eq!(
            rules,
            vec![
                Rule::Required,
                Rule::String,
                Rule::Email,
                Rule::Max(255),
                Rule::Unique {
                    scope: "users".into(),
                    column: None
                },
            ]
        );
    }

    #[test]
    fn unique_with_column() {
        let rule: Rule = "unique:accounts,contact_email".parse().unwrap();
        assert_eq!(rule.to_string(), "unique:accounts,contact_email");
    }

    #[test]
    fn rejects_unknown_and_malformed() {
        assert!(matches!(
            parse_rules("required|uuid"),
            Err(RuleError::UnknownRule { ref name }) if name == "uuid"
        ));
        assert!(matches!(
            parse_rules("max:lots"),
            Err(RuleError::InvalidParameter { .. })
        ));
        assert!(matches!(
            parse_rules("unique"),
            Err(RuleError::InvalidParameter { .. })
        ));
        assert!(matches!(
            parse_rules("unique:users,"),
            Err(RuleError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn skips_empty_segments() {
        let rules = parse_rules(" required || email ").unwrap();
        assert_eq!(rules, vec![Rule::Required, Rule::Email]);
    }
}
