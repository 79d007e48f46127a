use std::collections::{HashMap, HashSet};

use super::StoreError;

/// Answers the `unique:scope,column` rule: does `value` already exist in
/// `column` of the collection named `scope`?
///
/// Implementations typically wrap a database table; [`InMemoryStore`] is the
/// bundled one.
pub trait UniquenessStore {
    fn exists(&self, scope: &str, column: &str, value: &str) -> Result<bool, StoreError>;
}

impl<S: UniquenessStore + ?Sized> UniquenessStore for &S {
    fn exists(&self, scope: &str, column: &str, value: &str) -> Result<bool, StoreError> {
        (**self).exists(scope, column, value)
    }
}

impl<S: UniquenessStore + ?Sized> UniquenessStore for Box<S> {
    fn exists(&self, scope: &str, column: &str, value: &str) -> Result<bool, StoreError> {
        (**self).exists(scope, column, value)
    }
}

/// Scope → column → known values. Values are trimmed and compared ASCII
/// case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    scopes: HashMap<String, HashMap<String, HashSet<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an (initially empty) scope. Lookups against undeclared scopes
    /// fail with [`StoreError::UnknownScope`].
    pub fn register_scope(&mut self, scope: impl Into<String>) -> &mut Self {
        self.scopes.entry(scope.into()).or_default();
        self
    }

    pub fn insert(
        &mut self,
        scope: impl Into<String>,
        column: impl Into<String>,
        value: &str,
    ) -> &mut Self {
        self.scopes
            .entry(scope.into())
            .or_default()
            .entry(column.into())
            .or_default()
            .insert(value.trim().to_ascii_lowercase());
        self
    }

    pub fn with_values<I, S>(scope: &str, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        store.register_scope(scope);
        for value in values {
            store.insert(scope, column, value.as_ref());
        }
        store
    }
}

impl UniquenessStore for InMemoryStore {
    fn exists(&self, scope: &str, column: &str, value: &str) -> Result<bool, StoreError> {
        let columns = self
            .scopes
            .get(scope)
            .ok_or_else(|| StoreError::unknown_scope(scope))?;
        Ok(columns
            .get(column)
            .is_some_and(|values| values.contains(&value.trim().to_ascii_lowercase())))
    }
}
