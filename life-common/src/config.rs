use serde::{Deserialize, Serialize};
use anyhow::{Context, Result};
use crate::sim_params::LifeParams;
use std::path::Path;

/// Largest accepted width or height, in cells.
pub const MAX_GRID_DIMENSION: usize = 10_000;

// Configuration for the grid dimensions
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig { width: 30, height: 15 }
    }
}

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Seconds of accumulated frame time between generations.
    pub update_interval_s: f64,
    /// Pause between loop iterations so the input poll doesn't spin a core.
    pub frame_pause_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            update_interval_s: 0.75,
            frame_pause_ms: 16,
        }
    }
}

// Configuration for pattern placement
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PatternConfig {
    pub random_block_width: usize,
    pub random_block_height: usize,
    /// Seed for the random block generator. Omit to seed from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        PatternConfig {
            random_block_width: 5,
            random_block_height: 5,
            seed: None,
        }
    }
}

// Configuration for the text renderer
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub alive: char,
    pub dead: char,
    pub cursor: char,
    /// Print the key help above the grid.
    pub show_help: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            alive: 'O',
            dead: '.',
            cursor: 'X',
            show_help: true,
        }
    }
}

/// Characters used to draw a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub alive: char,
    pub dead: char,
    pub cursor: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        DisplayConfig::default().glyphs()
    }
}

impl DisplayConfig {
    pub fn glyphs(&self) -> Glyphs {
        Glyphs {
            alive: self.alive,
            dead: self.dead,
            cursor: self.cursor,
        }
    }
}

// Main configuration structure, loaded from config.toml.
// Every section is optional; missing sections fall back to the defaults above.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct LifeConfig {
    pub grid: GridConfig,
    pub timing: TimingConfig,
    pub patterns: PatternConfig,
    pub display: DisplayConfig,
}

impl LifeConfig {
    /// Loads the configuration from a TOML file without validating it,
    /// so command-line overrides can still be applied before `validate`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file '{}'", path_ref.display()))?;
        Self::parse_toml_str(&config_str)
            .with_context(|| format!("Invalid config in '{}'", path_ref.display()))
    }

    /// Parses a configuration from TOML text without validating it.
    pub fn parse_toml_str(config_str: &str) -> Result<Self> {
        toml::from_str(config_str).map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config = Self::parse_toml_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            anyhow::bail!(
                "grid dimensions must be positive (got {}x{}).",
                self.grid.width,
                self.grid.height
            );
        }
        if self.grid.width > MAX_GRID_DIMENSION || self.grid.height > MAX_GRID_DIMENSION {
            anyhow::bail!(
                "grid dimensions must not exceed {} (got {}x{}).",
                MAX_GRID_DIMENSION,
                self.grid.width,
                self.grid.height
            );
        }
        if !self.timing.update_interval_s.is_finite() || self.timing.update_interval_s <= 0.0 {
            anyhow::bail!(
                "update_interval_s must be a positive number (got {}).",
                self.timing.update_interval_s
            );
        }
        if self.patterns.random_block_width == 0 || self.patterns.random_block_height == 0 {
            anyhow::bail!("random block dimensions must be positive.");
        }
        Ok(())
    }

    /// Serializes the effective configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize config to TOML")
    }

    /// Converts the configuration into parameters used at runtime.
    pub fn get_life_params(&self) -> LifeParams {
        LifeParams {
            width: self.grid.width,
            height: self.grid.height,
            update_interval_s: self.timing.update_interval_s,
            random_block_width: self.patterns.random_block_width,
            random_block_height: self.patterns.random_block_height,
            seed: self.patterns.seed,
        }
    }
}
