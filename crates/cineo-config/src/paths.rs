use anyhow::{anyhow, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Pins every cineo file under one directory when set
pub const BASE_PATH_ENV: &str = "CINEO_BASE_PATH";

/// Created by the container image
const CONTAINER_BASE: &str = "/app";

/// Where the directories of a `PathManager` came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOrigin {
    Env,
    Container,
    Platform,
}

impl fmt::Display for PathOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => write!(f, "{}", BASE_PATH_ENV),
            Self::Container => write!(f, "container ({})", CONTAINER_BASE),
            Self::Platform => write!(f, "platform directories"),
        }
    }
}

/// Locations of the config file, the credential store and the user documents
#[derive(Debug, Clone)]
pub struct PathManager {
    origin: PathOrigin,
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl PathManager {
    /// `CINEO_BASE_PATH` first, then the container base, then the platform
    /// config and data directories
    pub fn discover() -> Result<Self> {
        let env_base = std::env::var_os(BASE_PATH_ENV).map(PathBuf::from);
        Self::discover_from(env_base, Path::new(CONTAINER_BASE))
    }

    fn discover_from(env_base: Option<PathBuf>, container_base: &Path) -> Result<Self> {
        if let Some(base) = env_base.filter(|b| !b.as_os_str().is_empty()) {
            return Ok(Self::rooted(base, PathOrigin::Env));
        }
        if container_base.is_dir() {
            return Ok(Self::rooted(container_base.to_path_buf(), PathOrigin::Container));
        }
        Self::platform()
    }

    /// `~/.config/cineo` for settings, the local data directory for user documents
    pub fn platform() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?
            .join("cineo");
        let data_dir = dirs::data_local_dir()
            .map(|dir| dir.join("cineo"))
            .unwrap_or_else(|| config_dir.join("data"));
        Ok(Self {
            origin: PathOrigin::Platform,
            config_dir,
            data_dir,
        })
    }

    /// Config files at `base`, user documents in `base/data`
    pub fn from_base(base: PathBuf) -> Self {
        Self::rooted(base, PathOrigin::Env)
    }

    fn rooted(base: PathBuf, origin: PathOrigin) -> Self {
        Self {
            origin,
            data_dir: base.join("data"),
            config_dir: base,
        }
    }

    pub fn origin(&self) -> PathOrigin {
        self.origin
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    /// Durable store holding every user document
    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }

    /// Create the config and data directories; returns the ones that were missing
    pub fn prepare(&self) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        for dir in [&self.config_dir, &self.data_dir] {
            if !dir.is_dir() {
                std::fs::create_dir_all(dir)?;
                created.push(dir.clone());
            }
        }
        Ok(created)
    }
}
