// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Editor configuration system

use crate::geometry::SubdivisionMethod;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Config file picked up from the working directory by [`EditorConfig::load`]
pub const CONFIG_FILE: &str = "polyedit.toml";

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Points sampled along a built curve
    pub curve_samples: usize,
    /// Samples per direction when tessellating a built surface
    pub surface_resolution: usize,
    /// Level applied by the subdivision tool until changed
    pub subdivision_level: u32,
    /// Highest level the subdivision tool accepts
    pub max_subdivision_level: u32,
    /// Face budget for a subdivided mesh
    pub max_faces: usize,
    /// Subdivision scheme
    pub subdivision_method: SubdivisionMethod,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            curve_samples: 50,
            surface_resolution: 20,
            subdivision_level: 1,
            max_subdivision_level: 5,
            max_faces: 1_000_000,
            subdivision_method: SubdivisionMethod::Loop,
        }
    }
}

impl EditorConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: EditorConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `polyedit.toml` if present, then apply environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `POLYEDIT_*` overrides from `lookup`. Unparseable values are
    /// logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        override_from(&lookup, "POLYEDIT_CURVE_SAMPLES", &mut self.curve_samples);
        override_from(&lookup, "POLYEDIT_SURFACE_RESOLUTION", &mut self.surface_resolution);
        override_from(&lookup, "POLYEDIT_SUBDIVISION_LEVEL", &mut self.subdivision_level);
        override_from(&lookup, "POLYEDIT_MAX_SUBDIVISION_LEVEL", &mut self.max_subdivision_level);
        override_from(&lookup, "POLYEDIT_MAX_FACES", &mut self.max_faces);
        override_from(&lookup, "POLYEDIT_SUBDIVISION_METHOD", &mut self.subdivision_method);
    }

    /// Reject settings the editor cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.curve_samples < 2 {
            bail!("curve_samples must be at least 2, got {}", self.curve_samples);
        }
        if self.surface_resolution < 2 {
            bail!("surface_resolution must be at least 2, got {}", self.surface_resolution);
        }
        if self.max_subdivision_level == 0 {
            bail!("max_subdivision_level must be at least 1");
        }
        if self.subdivision_level == 0 || self.subdivision_level > self.max_subdivision_level {
            bail!(
                "subdivision_level must be within 1..={}, got {}",
                self.max_subdivision_level,
                self.subdivision_level
            );
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

fn override_from<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T)
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(e) => warn!("Ignoring {}={:?}: {}", key, raw, e),
        }
    }
}
