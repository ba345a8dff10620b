use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod layout;
pub mod simulation;

pub use layout::*;
pub use simulation::*;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GarageConfig {
    pub simulation: SimulationParams,
    #[serde(default)]
    pub random: RandomConfig,
    pub layout: LayoutConfig,
}

impl GarageConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading garage config {}", path.display()))?;

        let config = Self::from_toml_str(&content)
            .with_context(|| format!("parsing garage config {}", path.display()))?;

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GarageConfig = toml::from_str(content)?;

        // Validate configurations
        config.simulation.validate()?;
        config.layout.validate()?;

        Ok(config)
    }

    /// The twelve-spot garage the simulation was designed around.
    pub fn reference() -> Self {
        Self {
            simulation: SimulationParams::reference(),
            random: RandomConfig::default(),
            layout: LayoutConfig::reference(),
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_config_is_valid() {
        let config = GarageConfig::reference();
        config.simulation.validate().unwrap();
        config.layout.validate().unwrap();
        assert_eq!(config.layout.spots.len(), 12);
    }

    #[test]
    fn reference_survives_toml() {
        let text = toml::to_string(&GarageConfig::reference()).unwrap();
        let parsed = GarageConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed.simulation.population, 100);
        assert_eq!(parsed.layout.spots.len(), 12);
    }

    #[test]
    fn rejects_inverted_dwell_range() {
        let mut config = GarageConfig::reference();
        config.simulation.dwell = IntervalRange::new(50.0, 10.0);
        let text = toml::to_string(&config).unwrap();
        let err = GarageConfig::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("dwell"), "{err}");
    }
}
