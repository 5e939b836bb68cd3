//! Directory provisioning: resolve configured locations and create them.
//!
//! Runs once at startup, before the listener binds. Each logical directory
//! resolves to its environment override when one is set, otherwise to a
//! default under the user's home directory. Creation is idempotent;
//! re-provisioning an existing tree is a no-op. Any creation failure other
//! than "already exists" is fatal.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;
use crate::error::{Result, ServiceError};

/// A named filesystem location with a configurable physical path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalDir {
    /// Durable service data.
    Data,
    /// Log files.
    Log,
    /// Rebuildable cached state.
    Cache,
}

impl LogicalDir {
    /// All logical directories, in no significant order.
    pub const ALL: [LogicalDir; 3] = [LogicalDir::Data, LogicalDir::Log, LogicalDir::Cache];

    /// Short name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            LogicalDir::Data => "data",
            LogicalDir::Log => "log",
            LogicalDir::Cache => "cache",
        }
    }

    /// Environment variable that overrides this directory's path.
    pub fn env_key(self) -> &'static str {
        match self {
            LogicalDir::Data => "APP_DATA_DIR",
            LogicalDir::Log => "APP_LOG_DIR",
            LogicalDir::Cache => "APP_CACHE_DIR",
        }
    }

    /// Default location relative to the user's home directory.
    fn default_suffix(self) -> &'static str {
        match self {
            LogicalDir::Data => ".local/share/statusd",
            LogicalDir::Log => ".cache/statusd/logs",
            LogicalDir::Cache => ".cache/statusd",
        }
    }

    /// Resolve the physical path: the override when present, else the
    /// home-relative default.
    pub fn resolve(self, override_path: Option<&str>, home: &Path) -> PathBuf {
        match override_path {
            Some(p) => PathBuf::from(p),
            None => home.join(self.default_suffix()),
        }
    }
}

/// The resolved set of directories, retained in app state after startup.
#[derive(Debug, Clone)]
pub struct ProvisionedDirs {
    /// Data directory.
    pub data: PathBuf,
    /// Log directory.
    pub log: PathBuf,
    /// Cache directory.
    pub cache: PathBuf,
}

impl ProvisionedDirs {
    /// Path for a given logical directory.
    pub fn path(&self, dir: LogicalDir) -> &Path {
        match dir {
            LogicalDir::Data => &self.data,
            LogicalDir::Log => &self.log,
            LogicalDir::Cache => &self.cache,
        }
    }
}

/// Resolve and create all logical directories.
///
/// Fatal on any creation error other than "already exists"; the caller must
/// abort startup before binding the listener.
pub fn provision(config: &Config) -> Result<ProvisionedDirs> {
    let home = dirs::home_dir().ok_or(ServiceError::NoHomeDir)?;
    provision_with_home(config, &home)
}

/// [`provision`] with an explicit home directory, so tests can supply a
/// temporary one.
pub fn provision_with_home(config: &Config, home: &Path) -> Result<ProvisionedDirs> {
    let data = ensure_one(config, LogicalDir::Data, home)?;
    let log = ensure_one(config, LogicalDir::Log, home)?;
    let cache = ensure_one(config, LogicalDir::Cache, home)?;
    Ok(ProvisionedDirs { data, log, cache })
}

/// Resolve one logical directory and make sure it exists on disk.
fn ensure_one(config: &Config, dir: LogicalDir, home: &Path) -> Result<PathBuf> {
    let path = dir.resolve(config.override_for(dir), home);
    ensure_dir(dir, &path)?;
    info!(dir = dir.name(), path = %path.display(), "directory provisioned");
    Ok(path)
}

/// Create a directory and all missing ancestors. `create_dir_all` already
/// treats an existing directory as success, so the only errors surfaced here
/// are genuine I/O or permission failures.
fn ensure_dir(dir: LogicalDir, path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| ServiceError::Provision {
        name: dir.name(),
        path: path.to_path_buf(),
        source,
    })
}
