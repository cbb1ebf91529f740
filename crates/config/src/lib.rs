//! Layered configuration for rechapter.
//!
//! Sources are merged in increasing priority:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. The user's config file (`<config dir>/rechapter/config.toml`)
//! 3. `rechapter.toml` in the working directory
//! 4. An explicit file passed to [`Config::load`]
//! 5. Environment variables prefixed with `RECHAPTER_`
//!
//! Command-line arguments are applied on top by the binary.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use rechapter_archive::Compression;
use rechapter_library::DEFAULT_SCRATCH;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Prefix for environment variable overrides, e.g. `RECHAPTER_DESTINATION`.
pub const ENV_PREFIX: &str = "RECHAPTER_";
/// Name of the per-directory configuration file.
pub const LOCAL_FILE: &str = "rechapter.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory receiving the output archives. Cleared before every run.
    pub destination: PathBuf,
    /// Session journal, truncated at the start of every run.
    pub journal: PathBuf,
    /// Name of the scratch directory created inside `destination`.
    pub scratch: String,
    /// Output archive name template; `None` uses the built-in default.
    pub template: Option<String>,
    /// How pages are stored in output archives.
    pub compression: Compression,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("output"),
            journal: PathBuf::from("log.txt"),
            scratch: DEFAULT_SCRATCH.to_string(),
            template: None,
            compression: Compression::default(),
        }
    }
}
impl Config {
    /// Loads and validates the configuration from every source.
    ///
    /// Missing implicit files are skipped; a missing `explicit` file is an
    /// error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit
            && !path.is_file()
        {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        Self::from_figment(Self::figment(explicit))
    }

    /// The merged provider stack, exposed so callers can layer more on top.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(dirs) = ProjectDirs::from("", "", "rechapter") {
            figment = figment.merge(Toml::file(dirs.config_dir().join("config.toml")));
        }
        figment = figment.merge(Toml::file(LOCAL_FILE));
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(?config, "Loaded configuration");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut components = Path::new(&self.scratch).components();
        if !matches!((components.next(), components.next()), (Some(Component::Normal(_)), None)) {
            exn::bail!(ErrorKind::Invalid {
                field: "scratch",
                reason: format!("must be a single directory name, got `{}`", self.scratch),
            });
        }
        if self.destination.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid { field: "destination", reason: "must not be empty".to_string() });
        }
        if self.journal.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid { field: "journal", reason: "must not be empty".to_string() });
        }
        Ok(())
    }
}
