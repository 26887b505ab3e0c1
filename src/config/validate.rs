//! Setup-time validation of the configured file set.
//!
//! Runs before any file is parsed:
//! 1. normalization flags must not conflict
//! 2. required files must exist (fatal)
//! 3. suggested files should exist (warning)
//! 4. local files must not be tracked by version control (fatal, best-effort)

use super::options::ConfigOptions;
use super::vcs::VersionControl;
use crate::error::{ConfigError, ConfigResult};
use tracing::{debug, warn};

/// Run every setup check. Returns the non-fatal warnings on success.
pub fn validate(options: &ConfigOptions, vcs: &dyn VersionControl) -> ConfigResult<Vec<ConfigError>> {
    options.key_mode()?;
    ensure_required_files_exist(options)?;
    let warnings = check_suggested_files_exist(options);
    ensure_local_files_not_tracked(options, vcs)?;
    Ok(warnings)
}

pub fn ensure_required_files_exist(options: &ConfigOptions) -> ConfigResult<()> {
    for file in &options.required_config_files {
        let path = options.full_path(file);
        if !path.exists() {
            return Err(ConfigError::MissingRequiredFile {
                file: file.clone(),
                path,
            });
        }
    }
    Ok(())
}

/// Suggested files that are absent, skipping files already required.
pub fn check_suggested_files_exist(options: &ConfigOptions) -> Vec<ConfigError> {
    options
        .suggested_config_files
        .iter()
        .filter(|file| !options.required_config_files.contains(file))
        .filter_map(|file| {
            let path = options.full_path(file);
            if path.exists() {
                return None;
            }
            warn!(file = %file, path = %path.display(), "Suggested config file does not exist");
            Some(ConfigError::SuggestedFileMissing {
                file: file.clone(),
                path,
            })
        })
        .collect()
}

pub fn ensure_local_files_not_tracked(
    options: &ConfigOptions,
    vcs: &dyn VersionControl,
) -> ConfigResult<()> {
    if !vcs.is_available() {
        debug!("Version control unavailable, skipping local file check");
        return Ok(());
    }
    if !vcs.is_repository() {
        debug!("Not inside a repository, skipping local file check");
        return Ok(());
    }

    for file in &options.local_config_files {
        let path = options.relative_path(file);
        if vcs.is_tracked(&path) {
            return Err(ConfigError::LocalFileTracked { path });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::vcs::NoVersionControl;
    use std::cell::Cell;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct StubVcs {
        available: bool,
        repository: bool,
        tracked: Vec<PathBuf>,
        queries: Cell<usize>,
    }

    impl StubVcs {
        fn tracking(tracked: &[PathBuf]) -> Self {
            Self {
                available: true,
                repository: true,
                tracked: tracked.to_vec(),
                queries: Cell::new(0),
            }
        }
    }

    impl VersionControl for StubVcs {
        fn is_available(&self) -> bool {
            self.available
        }

        fn is_repository(&self) -> bool {
            self.repository
        }

        fn is_tracked(&self, path: &Path) -> bool {
            self.queries.set(self.queries.get() + 1);
            self.tracked.iter().any(|p| p == path)
        }
    }

    fn options_with_files(temp: &TempDir, present: &[&str]) -> ConfigOptions {
        for file in present {
            std::fs::write(temp.path().join(file), "test: {}\n").unwrap();
        }
        ConfigOptions::default().with_config_path(temp.path())
    }

    #[test]
    fn test_missing_required_file() {
        let temp = TempDir::new().unwrap();
        let options = options_with_files(&temp, &["config.yml"]);
        match validate(&options, &NoVersionControl) {
            Err(ConfigError::MissingRequiredFile { file, path }) => {
                assert_eq!(file, "config.secret.yml");
                assert!(path.ends_with("config.secret.yml"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_suggested_files_warn_only() {
        let temp = TempDir::new().unwrap();
        let options = options_with_files(&temp, &["config.yml"])
            .with_required_config_files(["config.yml"])
            .with_suggested_config_files(["config.yml", "config.secret.yml"]);
        let warnings = validate(&options, &NoVersionControl).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            ConfigError::SuggestedFileMissing { file, .. } if file == "config.secret.yml"
        ));
    }

    #[test]
    fn test_suggested_and_required_not_double_reported() {
        let temp = TempDir::new().unwrap();
        let options = options_with_files(&temp, &["config.yml", "config.secret.yml"]);
        assert!(validate(&options, &NoVersionControl).unwrap().is_empty());
    }

    #[test]
    fn test_tracked_local_file_rejected() {
        let temp = TempDir::new().unwrap();
        let options = options_with_files(&temp, &["config.yml", "config.secret.yml"]);
        let vcs = StubVcs::tracking(&[options.relative_path("config.secret.yml")]);
        match validate(&options, &vcs) {
            Err(ConfigError::LocalFileTracked { path }) => {
                assert!(path.ends_with("config.secret.yml"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_unavailable_vcs_skips_checks() {
        let temp = TempDir::new().unwrap();
        let options = options_with_files(&temp, &["config.yml", "config.secret.yml"]);
        let mut vcs = StubVcs::tracking(&[options.relative_path("config.secret.yml")]);
        vcs.available = false;
        assert!(validate(&options, &vcs).is_ok());
        assert_eq!(vcs.queries.get(), 0);
    }

    #[test]
    fn test_outside_repository_skips_checks() {
        let temp = TempDir::new().unwrap();
        let options = options_with_files(&temp, &["config.yml", "config.secret.yml"]);
        let mut vcs = StubVcs::tracking(&[options.relative_path("config.secret.yml")]);
        vcs.repository = false;
        assert!(validate(&options, &vcs).is_ok());
        assert_eq!(vcs.queries.get(), 0);
    }

    #[test]
    fn test_conflicting_options_checked_first() {
        let temp = TempDir::new().unwrap();
        let options = ConfigOptions::default()
            .with_config_path(temp.path())
            .with_symbol_keys(true)
            .with_indifferent_keys(true);
        assert!(matches!(
            validate(&options, &NoVersionControl),
            Err(ConfigError::ConflictingOptions)
        ));
    }
}
