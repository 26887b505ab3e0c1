//! Active environment selection.

use crate::error::{ConfigError, ConfigResult};
use std::collections::HashMap;

/// Read-only access to named variables.
pub trait VarLookup {
    fn var(&self, name: &str) -> Option<String>;
}

/// Variables of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl VarLookup for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Determines the active environment name.
///
/// The selector variable is read once, when the resolver is built; later changes
/// to the variable are not observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentResolver {
    var_name: String,
    explicit: Option<String>,
    from_var: Option<String>,
}

impl EnvironmentResolver {
    pub fn new(var_name: impl Into<String>, explicit: Option<String>, lookup: &dyn VarLookup) -> Self {
        let var_name = var_name.into();
        let from_var = lookup
            .var(&var_name)
            .filter(|value| !value.trim().is_empty());
        Self {
            var_name,
            explicit,
            from_var,
        }
    }

    /// The explicit override if given, else the selector variable.
    pub fn resolve(&self) -> ConfigResult<&str> {
        self.explicit
            .as_deref()
            .or(self.from_var.as_deref())
            .ok_or_else(|| ConfigError::UndeterminedEnvironment {
                var: self.var_name.clone(),
            })
    }

    pub fn var_name(&self) -> &str {
        &self.var_name
    }
}
