use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded `/api/check` response, kept exactly as the API sent it.
///
/// Nothing is coerced on the way in: explicit `null`s, unknown fields and
/// key order all survive a re-serialisation. The accessors read the
/// documented MailboxLayer fields leniently, so a `"0.8"` score or a `1`
/// flag is understood rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationResult(Map<String, Value>);

impl VerificationResult {
    /// Raw value of `field`, if the API sent it.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Truthiness of `field`: `false`, `0`, `""`, `"0"` and `[]` are false.
    /// `None` when the field is absent or `null`.
    pub fn flag(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(truthiness)
    }

    /// `true` only when `mx_found` is truthy.
    pub fn has_mx(&self) -> bool {
        self.flag("mx_found") == Some(true)
    }

    pub fn email(&self) -> Option<&str> {
        self.get("email")?.as_str()
    }

    pub fn user(&self) -> Option<&str> {
        self.get("user")?.as_str()
    }

    pub fn domain(&self) -> Option<&str> {
        self.get("domain")?.as_str()
    }

    /// Deliverability score, from a JSON number or a numeric string.
    pub fn score(&self) -> Option<f64> {
        self.get("score").and_then(number)
    }

    /// Typo suggestion (`did_you_mean`), ignoring the empty string the API
    /// sends when it has none.
    pub fn suggestion(&self) -> Option<&str> {
        self.get("did_you_mean")?
            .as_str()
            .filter(|s| !s.is_empty())
    }

    /// `success` present and falsy. A missing or `null` flag is not a failure.
    pub(crate) fn is_failure(&self) -> bool {
        self.flag("success") == Some(false)
    }

    pub(crate) fn provider_error(&self) -> ProviderErrorBody {
        ProviderErrorBody::from_value(self.get("error"))
    }
}

impl From<Map<String, Value>> for VerificationResult {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// `error` object of a failed response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProviderErrorBody {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

impl ProviderErrorBody {
    fn from_value(error: Option<&Value>) -> Self {
        let field = |name: &str| error.and_then(|e| e.get(name));
        Self {
            kind: field("type").and_then(text),
            info: field("info").and_then(text),
            code: field("code").and_then(integer),
        }
    }
}

fn truthiness(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_none_or(|f| f != 0.0)),
        Value::String(s) => Some(!(s.is_empty() || s == "0")),
        Value::Array(items) => Some(!items.is_empty()),
        Value::Object(_) => Some(true),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Outcome of a deliverability check that reached the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum Genuineness {
    /// MX records found; carries the full provider response.
    Genuine(VerificationResult),
    /// The provider answered but found no MX records.
    NotGenuine,
}

impl Genuineness {
    pub fn is_genuine(&self) -> bool {
        matches!(self, Self::Genuine(_))
    }

    pub fn result(&self) -> Option<&VerificationResult> {
        match self {
            Self::Genuine(result) => Some(result),
            Self::NotGenuine => None,
        }
    }

    pub fn into_result(self) -> Option<VerificationResult> {
        match self {
            Self::Genuine(result) => Some(result),
            Self::NotGenuine => None,
        }
    }
}

impl From<VerificationResult> for Genuineness {
    fn from(result: VerificationResult) -> Self {
        if result.has_mx() {
            Self::Genuine(result)
        } else {
            Self::NotGenuine
        }
    }
}
