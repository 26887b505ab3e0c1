//! Resolution pipeline.
//!
//! `ConfigResolver::new` validates the file set up front. `load()` then:
//! 1. loads every configured file that exists, in declared order
//! 2. resolves the active environment
//! 3. checks that some file declares that environment
//! 4. layers each file's `DEFAULTS` beneath its environment section
//! 5. folds the per-file results, later files winning
//! 6. fills in `env`, then freezes when requested

use super::environment::{EnvironmentResolver, ProcessEnv, VarLookup};
use super::freeze::FrozenValue;
use super::keys::{Key, Node};
use super::loader::{MultiEnvConfig, existing_config_files, load_config_file};
use super::merge::{deep_merge_all, layer_defaults};
use super::options::{ConfigOptions, KeyMode};
use super::validate::validate;
use super::vcs::{GitCli, VersionControl};
use crate::error::{ConfigError, ConfigResult};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::info;

/// Key of the entry holding the active environment name.
pub const ENV_KEY: &str = "env";

/// Resolves a merged configuration from the configured files.
///
/// Read-only once constructed; `load()` may be called any number of times.
#[derive(Debug)]
pub struct ConfigResolver {
    options: ConfigOptions,
    key_mode: KeyMode,
    environment: EnvironmentResolver,
    warnings: Vec<ConfigError>,
}

impl ConfigResolver {
    /// Build a resolver reading the process environment and checking files with git.
    pub fn new(options: ConfigOptions) -> ConfigResult<Self> {
        Self::with_capabilities(options, &ProcessEnv, &GitCli)
    }

    /// Build a resolver with explicit variable lookup and version control.
    pub fn with_capabilities(
        options: ConfigOptions,
        vars: &dyn VarLookup,
        vcs: &dyn VersionControl,
    ) -> ConfigResult<Self> {
        let key_mode = options.key_mode()?;
        let warnings = validate(&options, vcs)?;
        let environment =
            EnvironmentResolver::new(options.env_var_name.clone(), options.env.clone(), vars);
        Ok(Self {
            options,
            key_mode,
            environment,
            warnings,
        })
    }

    pub fn options(&self) -> &ConfigOptions {
        &self.options
    }

    /// Non-fatal problems found during validation.
    pub fn warnings(&self) -> &[ConfigError] {
        &self.warnings
    }

    /// The active environment name.
    pub fn environment(&self) -> ConfigResult<&str> {
        self.environment.resolve()
    }

    /// Configured files present on disk, in declared order.
    pub fn existing_files(&self) -> Vec<String> {
        existing_config_files(&self.options)
    }

    /// Resolve the merged configuration for the active environment.
    pub fn load(&self) -> ConfigResult<MergedConfig> {
        let files = self.existing_files();
        let configs = files
            .iter()
            .map(|file| load_config_file(&self.options, file))
            .collect::<ConfigResult<Vec<MultiEnvConfig>>>()?;

        let env = self.environment.resolve()?;
        info!(files = ?files, env, "Loading config");

        if !configs.iter().any(|config| config.has_environment(env)) {
            return Err(ConfigError::UnknownEnvironment {
                env: env.to_string(),
            });
        }

        let layers = configs
            .iter()
            .map(|config| layer_defaults(config, env))
            .collect::<ConfigResult<Vec<_>>>()?;
        let mut merged = deep_merge_all(layers);
        let entry = merged.entry(ENV_KEY).or_insert(Value::Null);
        if matches!(entry, Value::Null | Value::Bool(false)) {
            *entry = Value::String(env.to_string());
        }

        let value = Value::Object(merged);
        let root = if self.options.read_only {
            Root::Frozen(FrozenValue::freeze(value))
        } else {
            Root::Mutable(value)
        };

        Ok(MergedConfig {
            root,
            key_mode: self.key_mode,
            environment: env.to_string(),
        })
    }
}

/// Storage of a merged configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Root {
    Mutable(Value),
    Frozen(FrozenValue),
}

/// The merged configuration for one environment.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedConfig {
    root: Root,
    key_mode: KeyMode,
    environment: String,
}

impl MergedConfig {
    /// Environment this configuration was resolved for.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn key_mode(&self) -> KeyMode {
        self.key_mode
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.root, Root::Frozen(_))
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    /// The mutable tree, unless frozen.
    pub fn as_value(&self) -> Option<&Value> {
        match &self.root {
            Root::Mutable(value) => Some(value),
            Root::Frozen(_) => None,
        }
    }

    /// Mutable access; `None` when frozen.
    pub fn as_value_mut(&mut self) -> Option<&mut Value> {
        match &mut self.root {
            Root::Mutable(value) => Some(value),
            Root::Frozen(_) => None,
        }
    }

    pub fn as_frozen(&self) -> Option<&FrozenValue> {
        match &self.root {
            Root::Frozen(frozen) => Some(frozen),
            Root::Mutable(_) => None,
        }
    }

    /// Freeze the tree. No-op when already frozen.
    pub fn freeze(self) -> Self {
        let root = match self.root {
            Root::Mutable(value) => Root::Frozen(FrozenValue::freeze(value)),
            frozen => frozen,
        };
        Self { root, ..self }
    }

    /// Value at `path`, matching each key by its text.
    pub fn lookup(&self, path: &[&str]) -> Option<Value> {
        match &self.root {
            Root::Mutable(value) => find_path(value, path).cloned(),
            Root::Frozen(frozen) => find_path(frozen, path).map(FrozenValue::thaw),
        }
    }

    /// Value at `path` where each key must be in a form the key mode accepts:
    /// strings for `Strings`, symbols for `Symbols`, either for `Indifferent`.
    pub fn lookup_keys(&self, path: &[Key<'_>]) -> Option<Value> {
        if !path.iter().all(|key| self.accepts(key)) {
            return None;
        }
        let texts: Vec<&str> = path.iter().map(Key::text).collect();
        self.lookup(&texts)
    }

    fn accepts(&self, key: &Key<'_>) -> bool {
        match self.key_mode {
            KeyMode::Strings => !key.is_symbol(),
            KeyMode::Symbols => key.is_symbol(),
            KeyMode::Indifferent => true,
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.lookup(&[key])
    }

    /// Like [`lookup`](Self::lookup), failing with `MissingKey` when absent.
    pub fn deep_fetch(&self, path: &[&str]) -> ConfigResult<Value> {
        self.lookup(path).ok_or_else(|| ConfigError::MissingKey {
            path: path.join("."),
        })
    }

    /// An owned copy of the whole tree.
    pub fn to_value(&self) -> Value {
        match &self.root {
            Root::Mutable(value) => value.clone(),
            Root::Frozen(frozen) => frozen.thaw(),
        }
    }

    pub fn into_value(self) -> Value {
        match self.root {
            Root::Mutable(value) => value,
            Root::Frozen(frozen) => frozen.thaw(),
        }
    }
}

fn find_path<'a, N: Node>(root: &'a N, path: &[&str]) -> Option<&'a N> {
    path.iter().try_fold(root, |node, key| node.child(key))
}

impl Serialize for MergedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.root {
            Root::Mutable(value) => value.serialize(serializer),
            Root::Frozen(frozen) => frozen.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::vcs::NoVersionControl;
    use serde_json::json;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write(temp: &TempDir, file: &str, content: &str) {
        std::fs::write(temp.path().join(file), content).unwrap();
    }

    fn resolver(options: ConfigOptions, env: Option<&str>) -> ConfigResult<ConfigResolver> {
        let vars: HashMap<String, String> = env
            .map(|e| (options.env_var_name.clone(), e.to_string()))
            .into_iter()
            .collect();
        ConfigResolver::with_capabilities(options, &vars, &NoVersionControl)
    }

    fn two_file_options(temp: &TempDir) -> ConfigOptions {
        ConfigOptions::default()
            .with_config_path(temp.path())
            .with_config_files(["base.yml", "local.yml"])
            .with_required_config_files(["base.yml"])
            .with_suggested_config_files(Vec::<String>::new())
            .with_local_config_files(["local.yml"])
    }

    #[test]
    fn test_local_overrides_base() {
        let temp = TempDir::new().unwrap();
        write(&temp, "base.yml", "test:\n  db:\n    host: a\n");
        write(&temp, "local.yml", "test:\n  db:\n    host: b\n    port: 5432\n");

        let config = resolver(two_file_options(&temp), Some("test"))
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(
            config.to_value(),
            json!({"db": {"host": "b", "port": 5432}, "env": "test"})
        );
        assert_eq!(config.environment(), "test");
    }

    #[test]
    fn test_existing_env_entry_kept() {
        let temp = TempDir::new().unwrap();
        write(&temp, "base.yml", "test:\n  env: custom\n");
        let config = resolver(two_file_options(&temp), Some("test"))
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.get("env"), Some(json!("custom")));
    }

    #[test]
    fn test_null_or_false_env_entry_replaced() {
        for entry in ["~", "null", "false"] {
            let temp = TempDir::new().unwrap();
            write(&temp, "base.yml", &format!("test:\n  env: {entry}\n"));
            let config = resolver(two_file_options(&temp), Some("test"))
                .unwrap()
                .load()
                .unwrap();
            assert_eq!(config.get("env"), Some(json!("test")), "env: {entry}");
        }
    }

    #[test]
    fn test_true_env_entry_kept() {
        let temp = TempDir::new().unwrap();
        write(&temp, "base.yml", "test:\n  env: true\n");
        let config = resolver(two_file_options(&temp), Some("test"))
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.get("env"), Some(json!(true)));
    }

    #[test]
    fn test_lookup_keys_follow_key_mode() {
        use crate::config::keys::Symbol;

        let temp = TempDir::new().unwrap();
        write(&temp, "base.yml", "test:\n  db:\n    host: a\n");
        let db = Symbol::new("db");
        let host = Symbol::new("host");
        let by_symbol = [Key::from(&db), Key::from(&host)];
        let by_string = [Key::from("db"), Key::from("host")];
        let mixed = [Key::from(&db), Key::from("host")];

        let strings = resolver(two_file_options(&temp), Some("test"))
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(strings.lookup_keys(&by_string), Some(json!("a")));
        assert_eq!(strings.lookup_keys(&by_symbol), None);

        let symbols = resolver(two_file_options(&temp).with_symbol_keys(true), Some("test"))
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(symbols.lookup_keys(&by_symbol), Some(json!("a")));
        assert_eq!(symbols.lookup_keys(&by_string), None);

        let indifferent = resolver(two_file_options(&temp).with_indifferent_keys(true), Some("test"))
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(indifferent.lookup_keys(&mixed), Some(json!("a")));
        assert_eq!(indifferent.lookup_keys(&by_string), Some(json!("a")));
    }

    #[test]
    fn test_unknown_environment() {
        let temp = TempDir::new().unwrap();
        write(&temp, "base.yml", "DEFAULTS:\n  a: 1\ntest:\n  b: 2\n");
        let err = resolver(two_file_options(&temp), Some("staging"))
            .unwrap()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEnvironment { ref env } if env == "staging"));
    }

    #[test]
    fn test_defaults_section_alone_is_not_an_environment() {
        let temp = TempDir::new().unwrap();
        write(&temp, "base.yml", "DEFAULTS:\n  a: 1\n");
        let err = resolver(two_file_options(&temp), Some("DEFAULTS"))
            .unwrap()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEnvironment { .. }));
    }

    #[test]
    fn test_undetermined_environment() {
        let temp = TempDir::new().unwrap();
        write(&temp, "base.yml", "test: {}\n");
        let err = resolver(two_file_options(&temp), None)
            .unwrap()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UndeterminedEnvironment { ref var } if var == "APP_ENV"));
    }

    #[test]
    fn test_read_only_is_frozen() {
        let temp = TempDir::new().unwrap();
        write(&temp, "base.yml", "test:\n  a: [1, 2]\n");
        let mut config = resolver(two_file_options(&temp).with_read_only(true), Some("test"))
            .unwrap()
            .load()
            .unwrap();
        assert!(config.is_frozen());
        assert!(config.as_value_mut().is_none());
        assert_eq!(config.lookup(&["a"]), Some(json!([1, 2])));
    }

    #[test]
    fn test_mutable_by_default() {
        let temp = TempDir::new().unwrap();
        write(&temp, "base.yml", "test:\n  a: 1\n");
        let mut config = resolver(two_file_options(&temp), Some("test"))
            .unwrap()
            .load()
            .unwrap();
        config.as_value_mut().unwrap()["a"] = json!(2);
        assert_eq!(config.get("a"), Some(json!(2)));

        let frozen = config.freeze();
        assert!(frozen.is_frozen());
        assert_eq!(frozen.get("a"), Some(json!(2)));
    }

    #[test]
    fn test_deep_fetch_missing_key() {
        let temp = TempDir::new().unwrap();
        write(&temp, "base.yml", "test:\n  db:\n    host: a\n");
        let config = resolver(two_file_options(&temp), Some("test"))
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.deep_fetch(&["db", "host"]).unwrap(), json!("a"));
        match config.deep_fetch(&["db", "port"]) {
            Err(ConfigError::MissingKey { path }) => assert_eq!(path, "db.port"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
