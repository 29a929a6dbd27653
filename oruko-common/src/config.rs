//! Configuration loading and root folder resolution
//!
//! The root folder holds the database file and stored review audio. It is
//! resolved with graceful degradation: a missing config file never terminates
//! startup, it only drops through to the next tier.
//!
//! Priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`ORUKO_ROOT_FOLDER`, then `ORUKO_ROOT`)
//! 3. TOML config file (`~/.config/oruko/config.toml`, then `/etc/oruko/config.toml`)
//! 4. OS-dependent compiled default (fallback)

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::Result;

/// Compiled platform defaults used when no configuration is available
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl CompiledDefaults {
    /// Defaults for the platform this binary was compiled for
    pub fn for_current_platform() -> Self {
        let root_folder = if cfg!(target_os = "linux") {
            dirs::data_local_dir()
                .map(|d| d.join("oruko"))
                .unwrap_or_else(|| PathBuf::from("/var/lib/oruko"))
        } else if cfg!(target_os = "macos") {
            dirs::data_dir()
                .map(|d| d.join("oruko"))
                .unwrap_or_else(|| PathBuf::from("/Library/Application Support/oruko"))
        } else if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .map(|d| d.join("oruko"))
                .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\oruko"))
        } else {
            PathBuf::from("./oruko_data")
        };

        Self {
            root_folder,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Logging section of the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

/// Parsed TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Load from the first config file found, or defaults if none exists.
    /// A malformed file is logged and treated as absent.
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<TomlConfig>(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        warn!("Ignoring malformed config file {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Cannot read config file {}: {}", path.display(), e);
                }
            }
        }
        TomlConfig::default()
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("oruko").join("config.toml"));
        }
        if cfg!(target_os = "linux") {
            paths.push(PathBuf::from("/etc/oruko/config.toml"));
        }
        paths
    }
}

/// Resolves the root folder for one service module
#[derive(Debug)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
        }
    }

    /// Attach the command-line override (tier 1)
    pub fn with_cli_arg(mut self, arg: Option<&str>) -> Self {
        self.cli_arg = arg.map(PathBuf::from);
        self
    }

    /// Resolve the root folder through the 4-tier priority order
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var("ORUKO_ROOT_FOLDER") {
            return PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("ORUKO_ROOT") {
            return PathBuf::from(path);
        }

        let config = TomlConfig::load();
        if let Some(path) = config.root_folder {
            return path;
        }

        let defaults = CompiledDefaults::for_current_platform();
        warn!(
            "{}: no root folder configured, using default {}",
            self.module_name,
            defaults.root_folder.display()
        );
        defaults.root_folder
    }
}

/// Creates the root folder layout and derives well-known paths within it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root folder and audio subfolder if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.audio_folder())?;
        Ok(())
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.root.join("oruko.db")
    }

    /// Folder holding reviewer-recorded audio
    pub fn audio_folder(&self) -> PathBuf {
        self.root.join("review_audio")
    }
}
