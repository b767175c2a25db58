use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SettingsError;
use crate::grid::{
    DEFAULT_CELL_SIZE, DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_SPACING, GridGeometry,
};
use crate::panel::DEFAULT_SLOT_COUNT;

pub const SETTINGS_PATH_ENV: &str = "STASH_SETTINGS_PATH";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StashSettings {
    pub version: u32,
    pub rows: usize,
    pub columns: usize,
    pub cell_size: f32,
    pub spacing: f32,
    pub slot_count: usize,
    /// Panel sampling seed. Zero is remapped by the rng.
    pub seed: u64,
}

impl Default for StashSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            cell_size: DEFAULT_CELL_SIZE,
            spacing: DEFAULT_SPACING,
            slot_count: DEFAULT_SLOT_COUNT,
            seed: 0,
        }
    }
}

impl StashSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.rows = self.rows.max(1);
        self.columns = self.columns.max(1);
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            self.cell_size = DEFAULT_CELL_SIZE;
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            self.spacing = 0.0;
        }
        self.slot_count = self.slot_count.max(1);
        self
    }

    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(self.cell_size, self.spacing)
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os(SETTINGS_PATH_ENV) {
            return Self::new(explicit);
        }

        let mut path = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("stash");
        path.push("settings.json");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing files load as defaults; unreadable ones are logged and also
    /// fall back to defaults.
    pub fn load(&self) -> StashSettings {
        let Ok(bytes) = fs::read(&self.path) else {
            return StashSettings::default();
        };
        match serde_json::from_slice::<StashSettings>(&bytes) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring unreadable settings file");
                StashSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &StashSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
