#![forbid(unsafe_code)]
//! genuine_email — validation d'adresses e-mail (syntaxe, unicité) et
//! vérification de délivrabilité via l'API MailboxLayer.
//!
//! - [`validate_email_syntax`] / [`Validator`]: local rules
//!   (`required|string|email|max:255|unique:scope`), no network.
//! - [`MailboxLayer`]: one blocking `GET https://apilayer.net/api/check`.
//! - [`GenuineEmailValidator`]: both of the above behind one value.

pub mod mailboxlayer;
pub mod rules;
mod verifier;

pub use mailboxlayer::{
    API_KEY_ENV, ConfigError, Credentials, DEFAULT_ENDPOINT, Genuineness, HttpGet, HttpResponse,
    MailboxLayer, ProviderErrorBody, ReqwestTransport, VerificationResult, VerifyError,
};
pub use rules::{
    FieldValue, InMemoryStore, Rule, RuleError, StoreError, UniquenessStore, ValidationOutcome,
    Validator, email_shape_violations, parse_rules,
};
pub use verifier::{EMAIL_RULES, GenuineEmailValidator, validate_email_syntax};
