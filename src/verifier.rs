use crate::mailboxlayer::{
    ConfigError, Credentials, Genuineness, HttpGet, MailboxLayer, ReqwestTransport,
    VerificationResult, VerifyError,
};
use crate::rules::{RuleError, UniquenessStore, ValidationOutcome, Validator};

/// Rules applied by [`validate_email_syntax`], before any uniqueness rule.
pub const EMAIL_RULES: &str = "required|string|email|max:255";

/// Validate `email` with [`EMAIL_RULES`], plus `unique:{scope}` when a
/// scope is given. A scope without a `store` is a [`RuleError::NoStore`].
pub fn validate_email_syntax(
    email: &str,
    uniqueness_scope: Option<&str>,
    store: Option<&dyn UniquenessStore>,
) -> Result<ValidationOutcome, RuleError> {
    let rules = match uniqueness_scope {
        Some(scope) => format!("{EMAIL_RULES}|unique:{scope}"),
        None => EMAIL_RULES.to_string(),
    };
    let validator = match store {
        Some(store) => Validator::with_store(store),
        None => Validator::new(),
    };
    validator.validate_field("email", email, &rules)
}

/// Email checks in two tiers: local syntax/uniqueness rules, and a remote
/// MailboxLayer deliverability lookup.
///
/// ```no_run
/// use genuine_email::{Credentials, GenuineEmailValidator, Genuineness};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let validator = GenuineEmailValidator::new(Credentials::from_env()?);
/// if validator.is_syntactically_valid("alice@example.com", None)?.passes() {
///     match validator.is_genuine("alice@example.com")? {
///         Genuineness::Genuine(result) => println!("score {:?}", result.score()),
///         Genuineness::NotGenuine => println!("no MX records"),
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct GenuineEmailValidator<T = ReqwestTransport> {
    api: MailboxLayer<T>,
    store: Option<Box<dyn UniquenessStore>>,
}

impl GenuineEmailValidator {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(credentials, ReqwestTransport::new())
    }

    /// Same as [`new`](Self::new) with the key taken from `MAILBOXLAYER_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Credentials::from_env().map(Self::new)
    }
}

impl<T: HttpGet> GenuineEmailValidator<T> {
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            api: MailboxLayer::with_transport(credentials, transport),
            store: None,
        }
    }

    /// Store consulted by `unique` rules.
    #[must_use]
    pub fn with_store(mut self, store: impl UniquenessStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn is_syntactically_valid(
        &self,
        email: &str,
        uniqueness_scope: Option<&str>,
    ) -> Result<ValidationOutcome, RuleError> {
        validate_email_syntax(email, uniqueness_scope, self.store.as_deref())
    }

    /// [`Genuineness::Genuine`] with the full response when MX records were
    /// found, [`Genuineness::NotGenuine`] otherwise. Provider or transport
    /// failures are errors, never `NotGenuine`.
    pub fn is_genuine(&self, email: &str) -> Result<Genuineness, VerifyError> {
        self.api.genuineness(email)
    }

    /// Raw MailboxLayer lookup, whatever the MX outcome.
    pub fn verify_remotely(&self, email: &str) -> Result<VerificationResult, VerifyError> {
        self.api.check(email)
    }

    pub fn credentials(&self) -> &Credentials {
        self.api.credentials()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailboxlayer::tests::{INVALID_KEY, MX_FOUND, NO_MX, StubTransport};
    use crate::rules::InMemoryStore;

    fn validator(transport: StubTransport) -> GenuineEmailValidator<StubTransport> {
        GenuineEmailValidator::with_transport(Credentials::new("k").unwrap(), transport)
    }

    fn offline() -> GenuineEmailValidator<StubTransport> {
        validator(StubTransport::new(|_| panic!("no network call expected")))
    }

    #[test]
    fn syntax_rejects_garbage() {
        let outcome = offline().is_syntactically_valid("not-an-email", None).unwrap();
        assert!(outcome.fails());
    }

    #[test]
    fn syntax_accepts_valid_address_without_scope() {
        let outcome = offline()
            .is_syntactically_valid("alice@example.com", None)
            .unwrap();
        assert!(outcome.passes());
    }

    #[test]
    fn syntax_checks_the_address_as_sent() {
        let outcome = offline()
            .is_syntactically_valid(" alice@example.com", None)
            .unwrap();
        assert_eq!(outcome.errors_for("email"), [
            "The email field must be a valid email address."
        ]);
    }

    #[test]
    fn uniqueness_scope() {
        let store = InMemoryStore::with_values("users", "email", ["alice@example.com"]);
        let v = offline().with_store(store);

        let dup = v
            .is_syntactically_valid("alice@example.com", Some("users"))
            .unwrap();
        assert_eq!(dup.errors_for("email"), ["The email has already been taken."]);

        let fresh = v
            .is_syntactically_valid("bob@example.com", Some("users"))
            .unwrap();
        assert!(fresh.passes());
    }

    #[test]
    fn scope_without_store_is_an_error() {
        let err = offline()
            .is_syntactically_valid("alice@example.com", Some("users"))
            .unwrap_err();
        assert!(matches!(err, RuleError::NoStore { .. }));
    }

    #[test]
    fn scope_unknown_to_store_is_an_error() {
        let v = offline().with_store(InMemoryStore::new());
        let err = v
            .is_syntactically_valid("alice@example.com", Some("users"))
            .unwrap_err();
        assert!(matches!(err, RuleError::Store(_)));
    }

    #[test]
    fn verify_remotely_maps_status() {
        let err = validator(StubTransport::respond(500, ""))
            .verify_remotely("a@example.com")
            .unwrap_err();
        assert!(matches!(err, VerifyError::Transport { status: 500 }));
    }

    #[test]
    fn verify_remotely_maps_provider_error() {
        let err = validator(StubTransport::respond(200, INVALID_KEY))
            .verify_remotely("a@example.com")
            .unwrap_err();
        assert_eq!(err.provider_code(), Some(101));
    }

    #[test]
    fn verify_remotely_returns_negative_results_too() {
        let result = validator(StubTransport::respond(200, NO_MX))
            .verify_remotely("nobody@nowhere.invalid")
            .unwrap();
        assert_eq!(result.flag("mx_found"), Some(false));
    }

    #[test]
    fn genuine_returns_full_result() {
        let outcome = validator(StubTransport::respond(200, MX_FOUND))
            .is_genuine("support@apilayer.com")
            .unwrap();
        let result = outcome.into_result().expect("genuine");
        assert!(result.has_mx());
        assert_eq!(result.user(), Some("support"));
        assert_eq!(result.flag("role"), Some(true));
    }

    #[test]
    fn no_mx_is_not_genuine() {
        let outcome = validator(StubTransport::respond(200, NO_MX))
            .is_genuine("nobody@nowhere.invalid")
            .unwrap();
        assert_eq!(outcome, Genuineness::NotGenuine);
    }

    #[test]
    fn failures_stay_errors() {
        let v = validator(StubTransport::respond(503, ""));
        assert!(v.is_genuine("a@example.com").is_err());
    }
}
