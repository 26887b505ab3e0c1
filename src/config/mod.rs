//! Layered, per-environment configuration.
//!
//! Each config file maps environment names to settings:
//!
//! ```yaml
//! DEFAULTS:
//!   db:
//!     adapter: postgres
//! development:
//!   db:
//!     host: localhost
//! production:
//!   db:
//!     host: db.internal
//! ```
//!
//! ## Merge Strategy
//! - Within a file: the environment section is deep-merged over `DEFAULTS`
//! - Across files: later files in `config_files` override earlier ones
//! - Mappings merge key by key; sequences and scalars are replaced wholesale
//!
//! ## Safety Checks
//! - Required files must exist
//! - Suggested files produce a warning when absent
//! - Local (secret) files must not be tracked by git

pub mod environment;
pub mod freeze;
pub mod keys;
mod loader;
mod merge;
mod options;
mod resolver;
pub mod validate;
pub mod vcs;

pub use environment::{EnvironmentResolver, ProcessEnv, VarLookup};
pub use freeze::{FrozenMap, FrozenValue};
pub use keys::{Indifferent, Key, Node, Symbol};
pub use loader::{DEFAULTS_KEY, MultiEnvConfig, existing_config_files, load_config_file};
pub use merge::{deep_merge, deep_merge_all, layer_defaults, merge_maps};
pub use options::{ConfigOptions, DEFAULT_ENV_VAR, KeyMode};
pub use resolver::{ConfigResolver, ENV_KEY, MergedConfig, Root};
pub use vcs::{GitCli, NoVersionControl, VersionControl};
