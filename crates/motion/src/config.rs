use roadfly_input::KeyBindings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for [`crate::Controls`].
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub bindings: KeyBindings,
    /// Acceleration while a direction is held, in units/s².
    pub step: f32,
    /// Exponential velocity damping rate, per second.
    pub damping: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            bindings: KeyBindings::default(),
            step: 20.0,
            damping: 10.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid controls config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
}

impl ControlsConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&data)?;
        tracing::info!("loaded controls config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step.is_nan() || self.step <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "step",
                value: self.step,
            });
        }
        if self.damping.is_nan() || self.damping <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "damping",
                value: self.damping,
            });
        }
        Ok(())
    }
}
