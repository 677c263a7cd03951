//! Dynamic variable types and the per-session registry

mod naming;
mod value;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

pub use naming::{
    SECRET_PREFIX, SYSTEM_PREFIX, is_referenceable_name, is_reserved_name, is_secret_name,
    validate_user_name,
};
pub use value::VariableValue;

/// Where a variable value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableOrigin {
    /// Supplied by the caller (or an agent default) at session start.
    User,
    /// Computed by the platform; read-only.
    System,
}

/// A named variable with its value and origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// The variable name (without `{{ }}`).
    pub name: String,
    /// The typed value.
    pub value: VariableValue,
    /// Where the value came from.
    pub origin: VariableOrigin,
}

impl Variable {
    /// Creates a user-defined variable after validating its name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is reserved or unreachable, or the value
    /// is a non-finite number.
    pub fn user(name: impl Into<String>, value: impl Into<VariableValue>) -> DomainResult<Self> {
        let name = name.into();
        validate_user_name(&name)?;
        let value = value.into().validated(&name)?;
        Ok(Self {
            name,
            value,
            origin: VariableOrigin::User,
        })
    }

    /// Returns true if this is a `secret__` user variable.
    #[must_use]
    pub fn is_secret(&self) -> bool {
        self.origin == VariableOrigin::User && is_secret_name(&self.name)
    }
}

/// A variable after substitution: its name, rendered value, and origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVariable {
    /// The variable name (without `{{ }}`).
    pub name: String,
    /// The canonical text that was substituted.
    pub value: String,
    /// The namespace that supplied the value.
    pub origin: VariableOrigin,
}

impl ResolvedVariable {
    /// Creates a new resolved variable.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, origin: VariableOrigin) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            origin,
        }
    }
}

/// The user-defined variables of one session.
///
/// Built once at session start and read-only afterwards; shared reads need no
/// locking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableSet {
    variables: HashMap<String, Variable>,
}

impl VariableSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from caller-supplied JSON values.
    ///
    /// Entries are registered in name order so the first reported error is
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns the first naming or type error encountered.
    pub fn from_json_map(values: &BTreeMap<String, serde_json::Value>) -> DomainResult<Self> {
        let mut set = Self::new();
        for (name, value) in values {
            set.register_json(name, value)?;
        }
        Ok(set)
    }

    /// Registers a typed value, replacing any previous value for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ReservedName`] if `name` starts with `system__`,
    /// [`DomainError::InvalidVariableName`] if no placeholder can reach it and
    /// [`DomainError::UnsupportedType`] for a non-finite number.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        value: impl Into<VariableValue>,
    ) -> DomainResult<()> {
        let variable = Variable::user(name, value)?;
        self.variables.insert(variable.name.clone(), variable);
        Ok(())
    }

    /// Registers an untyped JSON value, checking that it is a string, number
    /// or boolean.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnsupportedType`] for any other JSON type, plus
    /// the naming errors of [`register`](Self::register).
    pub fn register_json(&mut self, name: &str, value: &serde_json::Value) -> DomainResult<()> {
        validate_user_name(name)?;
        let value = VariableValue::from_json(name, value)?;
        self.register(name, value)
    }

    /// Returns the value registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UndefinedVariable`] if nothing is registered.
    pub fn get(&self, name: &str) -> DomainResult<&VariableValue> {
        self.variables
            .get(name)
            .map(|v| &v.value)
            .ok_or_else(|| DomainError::UndefinedVariable {
                name: name.to_string(),
                offset: None,
            })
    }

    /// Returns the full variable registered under `name`.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Returns the number of registered variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if no variables are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Returns all registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterates over the registered variables in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    /// Layers `overrides` on top of this set; entries in `overrides` win.
    #[must_use]
    pub fn merged_with(mut self, overrides: Self) -> Self {
        self.variables.extend(overrides.variables);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn register_then_get_round_trips_value_and_type() {
        let mut set = VariableSet::new();
        set.register("user_name", "Angelo").unwrap();
        set.register("balance", VariableValue::Number(5000.5)).unwrap();
        set.register("is_premium", true).unwrap();

        assert_eq!(set.get("user_name").unwrap(), &VariableValue::from("Angelo"));
        assert_eq!(set.get("balance").unwrap(), &VariableValue::Number(5000.5));
        assert_eq!(set.get("is_premium").unwrap(), &VariableValue::Boolean(true));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn register_reserved_name_fails() {
        let mut set = VariableSet::new();
        let err = set.register("system__foo", "x").unwrap_err();
        assert_eq!(
            err,
            DomainError::ReservedName {
                name: "system__foo".to_string()
            }
        );
        assert!(set.is_empty());
    }

    #[test]
    fn register_rejects_non_finite_numbers() {
        let mut set = VariableSet::new();
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = set.register("n", VariableValue::Number(value)).unwrap_err();
            assert_eq!(
                err,
                DomainError::UnsupportedType {
                    name: "n".to_string(),
                    found: "non-finite number".to_string(),
                }
            );
        }
        assert!(set.is_empty());
    }

    #[test]
    fn register_json_never_rounds_large_integers() {
        let mut set = VariableSet::new();
        let err = set
            .register_json("account", &json!(12_345_678_901_234_567_u64))
            .unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedType { .. }));
        assert!(!set.contains("account"));

        set.register_json("account", &json!("12345678901234567"))
            .unwrap();
        assert_eq!(set.get("account").unwrap().render(), "12345678901234567");
    }

    #[test]
    fn get_missing_is_undefined() {
        let set = VariableSet::new();
        assert_eq!(
            set.get("missing"),
            Err(DomainError::UndefinedVariable {
                name: "missing".to_string(),
                offset: None,
            })
        );
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut set = VariableSet::new();
        set.register("Name", "upper").unwrap();
        set.register("name", "lower").unwrap();

        assert_eq!(set.get("Name").unwrap().render(), "upper");
        assert_eq!(set.get("name").unwrap().render(), "lower");
        assert_eq!(set.names(), vec!["Name", "name"]);
    }

    #[test]
    fn re_register_replaces_value() {
        let mut set = VariableSet::new();
        set.register("plan", "basic").unwrap();
        set.register("plan", "pro").unwrap();
        assert_eq!(set.get("plan").unwrap().render(), "pro");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn register_json_rejects_unsupported_types() {
        let mut set = VariableSet::new();
        let err = set.register_json("tags", &json!(["a", "b"])).unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedType { ref name, .. } if name == "tags"));
    }

    #[test]
    fn reserved_name_is_checked_before_type() {
        let mut set = VariableSet::new();
        let err = set.register_json("system__x", &json!(null)).unwrap_err();
        assert!(matches!(err, DomainError::ReservedName { .. }));
    }

    #[test]
    fn from_json_map_builds_typed_set() {
        let mut values = BTreeMap::new();
        values.insert("user_name".to_string(), json!("Angelo"));
        values.insert("balance".to_string(), json!(5000.5));
        values.insert("is_premium".to_string(), json!(true));

        let set = VariableSet::from_json_map(&values).expect("valid map");
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("balance").unwrap(), &VariableValue::Number(5000.5));
        assert!(set.iter().all(|v| v.origin == VariableOrigin::User));
    }

    #[test]
    fn from_json_map_reports_first_error_in_name_order() {
        let mut values = BTreeMap::new();
        values.insert("z_bad".to_string(), json!(null));
        values.insert("a_bad".to_string(), json!({}));

        let err = VariableSet::from_json_map(&values).unwrap_err();
        assert_eq!(err.variable_name(), "a_bad");
    }

    #[test]
    fn merged_with_prefers_overrides() {
        let mut defaults = VariableSet::new();
        defaults.register("plan", "basic").unwrap();
        defaults.register("locale", "en").unwrap();

        let mut supplied = VariableSet::new();
        supplied.register("plan", "pro").unwrap();

        let merged = defaults.merged_with(supplied);
        assert_eq!(merged.get("plan").unwrap().render(), "pro");
        assert_eq!(merged.get("locale").unwrap().render(), "en");
    }

    #[test]
    fn secret_variables_are_flagged() {
        let secret = Variable::user("secret__token", "abc").unwrap();
        let plain = Variable::user("token", "abc").unwrap();
        assert!(secret.is_secret());
        assert!(!plain.is_secret());
    }
}
