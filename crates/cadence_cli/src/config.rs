//! Cadence configuration file handling

use anyhow::{Context, Result};
use cadence_animation::{AnimationConfig, Easing};
use cadence_core::error::{validate_duration, validate_finite};
use cadence_core::CadenceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE: &str = "cadence.toml";

/// Top-level configuration (cadence.toml)
#[derive(Debug, Deserialize, Serialize)]
pub struct CadenceConfig {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default, rename = "animation")]
    pub animations: Vec<AnimationSpec>,
}

/// Frame loop configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct ClockConfig {
    /// Frames per second delivered to the animator
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Upper bound on frames per run
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
}

fn default_fps() -> u32 {
    60
}

fn default_max_frames() -> u32 {
    10_000
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            max_frames: default_max_frames(),
        }
    }
}

impl ClockConfig {
    /// Milliseconds between frames
    pub fn interval_ms(&self) -> f64 {
        1000.0 / self.fps as f64
    }
}

/// One animated property
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnimationSpec {
    /// Property written on the shared target
    pub property: String,
    /// Start value; when omitted, the value the property holds on the shared
    /// target (0, or the `from` of an earlier animation of the same property)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    pub to: f64,
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_easing")]
    pub easing: String,
}

fn default_duration() -> f64 {
    cadence_animation::DEFAULT_DURATION
}

fn default_easing() -> String {
    Easing::Linear.name().to_string()
}

impl AnimationSpec {
    /// Validate and convert into engine configuration (without a target)
    pub fn to_config(&self) -> cadence_core::Result<AnimationConfig> {
        let duration = validate_duration(self.duration)?;
        let from = validate_finite("from", self.from)?;
        validate_finite("to", Some(self.to))?;
        let easing: Easing = self.easing.parse()?;

        let mut config = AnimationConfig::new()
            .duration(duration)
            .to(self.to)
            .easing(easing)
            .property(self.property.clone());
        config.from = from;
        Ok(config)
    }
}

impl CadenceConfig {
    /// Load configuration from a file or a directory containing cadence.toml
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found at {}. Run `cadence init` to create one.",
                CONFIG_FILE,
                config_path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

        tracing::debug!(
            path = %config_path.display(),
            animations = config.animations.len(),
            "loaded configuration"
        );

        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: CadenceConfig = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value the engine would otherwise silently misbehave on
    pub fn validate(&self) -> cadence_core::Result<()> {
        if self.clock.fps == 0 || self.clock.fps > 1000 {
            return Err(CadenceError::InvalidFrameRate(self.clock.fps));
        }
        for spec in &self.animations {
            spec.to_config()?;
        }
        Ok(())
    }

    /// A configuration with a single animation
    pub fn single(spec: AnimationSpec) -> Self {
        Self {
            clock: ClockConfig::default(),
            animations: vec![spec],
        }
    }

    /// The sample written by `cadence init`
    pub fn sample() -> Self {
        Self {
            clock: ClockConfig::default(),
            animations: vec![
                AnimationSpec {
                    property: "x".to_string(),
                    from: Some(0.0),
                    to: 100.0,
                    duration: 1200.0,
                    easing: Easing::OutCubic.name().to_string(),
                },
                AnimationSpec {
                    property: "opacity".to_string(),
                    from: Some(0.0),
                    to: 1.0,
                    duration: 600.0,
                    easing: Easing::InOutSine.name().to_string(),
                },
            ],
        }
    }

    /// Write the sample configuration into `dir`, returning the file path
    ///
    /// Refuses to replace an existing file unless `force` is set.
    pub fn write_sample(dir: &Path, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

        let file = dir.join(CONFIG_FILE);
        if file.exists() && !force {
            anyhow::bail!(
                "{} already exists. Use --force to overwrite.",
                file.display()
            );
        }

        let content = Self::sample().to_toml()?;
        fs::write(&file, content).with_context(|| format!("Failed to write {}", file.display()))?;

        tracing::info!(path = %file.display(), "wrote sample configuration");
        Ok(file)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
