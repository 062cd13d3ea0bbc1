use gridplace_assets::{AssetError, Prototype};
use gridplace_common::GridCell;
use gridplace_grid::GridSpec;
use gridplace_input::Viewport;
use gridplace_rules::{RestrictedZones, RuleSet};
use gridplace_scene::CameraState;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating a session configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Session configuration. Every field has a default; the defaults give the
/// plain 12x12 editor with no proximity rule and no restricted cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub grid_divisions: u32,
    pub cell_size: f32,
    /// Minimum distance between placed objects, in cells; `None` disables
    /// the check.
    pub proximity_threshold: Option<f32>,
    pub restricted: Vec<GridCell>,
    pub camera: CameraState,
    pub viewport: Viewport,
    /// glTF file to use as the placement prototype instead of the marker sphere.
    pub prototype: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_divisions: 12,
            cell_size: 1.0,
            proximity_threshold: None,
            restricted: Vec::new(),
            camera: CameraState::default(),
            viewport: Viewport::default(),
            prototype: None,
        }
    }
}

impl SessionConfig {
    /// Load and validate a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&data)
    }

    pub fn from_yaml_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        GridSpec::check_divisions(self.grid_divisions)
            .map_err(|reason| ConfigError::Invalid(reason.into()))?;
        if self.cell_size.is_nan() || self.cell_size <= 0.0 {
            return Err(ConfigError::Invalid("cell_size must be positive".into()));
        }
        if let Some(t) = self.proximity_threshold {
            if t.is_nan() || t < 0.0 {
                return Err(ConfigError::Invalid(
                    "proximity_threshold must be non-negative".into(),
                ));
            }
        }
        let grid = self.grid();
        if let Some(cell) = self.restricted.iter().find(|c| !grid.contains(**c)) {
            return Err(ConfigError::Invalid(format!(
                "restricted cell {cell} lies outside the grid"
            )));
        }
        Ok(())
    }

    pub fn grid(&self) -> GridSpec {
        GridSpec::new(self.grid_divisions, self.cell_size)
    }

    pub fn rules(&self) -> RuleSet {
        let restricted: RestrictedZones = self.restricted.iter().copied().collect();
        let rules = RuleSet::new(self.grid()).with_restricted(restricted);
        match self.proximity_threshold {
            Some(t) => rules.with_proximity(t),
            None => rules,
        }
    }

    /// Load the configured prototype, or the built-in marker when none is set.
    pub fn load_prototype(&self) -> Result<Prototype, AssetError> {
        match &self.prototype {
            Some(path) => gridplace_assets::import_gltf(path),
            None => Ok(Prototype::default_marker()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_plain_editor() {
        let config = SessionConfig::default();
        assert_eq!(config.grid().divisions(), 12);
        assert!(config.rules().proximity_threshold().is_none());
        assert!(config.rules().restricted().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = SessionConfig::from_yaml_str(
            "proximity_threshold: 2.0\nrestricted:\n  - { x: 1, z: 1 }\n  - { x: -2, z: 3 }\n",
        )
        .unwrap();
        assert_eq!(config.grid_divisions, 12);
        assert_eq!(config.proximity_threshold, Some(2.0));
        assert_eq!(config.restricted.len(), 2);
        let rules = config.rules();
        assert!(rules.restricted().contains(GridCell::new(-2, 3)));
        assert_eq!(rules.proximity_threshold(), Some(2.0));
    }

    #[test]
    fn yaml_roundtrip_of_defaults() {
        let yaml = SessionConfig::default().to_yaml().unwrap();
        let back = SessionConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(back, SessionConfig::default());
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            SessionConfig::from_yaml_str("cell_size: 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SessionConfig::from_yaml_str("grid_divisions: 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SessionConfig::from_yaml_str("proximity_threshold: -1.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SessionConfig::from_yaml_str("restricted: [{ x: 40, z: 0 }]"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn odd_or_oversized_grids_rejected() {
        for yaml in ["grid_divisions: 5", "grid_divisions: 4097", "grid_divisions: 2147483647"] {
            assert!(
                matches!(SessionConfig::from_yaml_str(yaml), Err(ConfigError::Invalid(_))),
                "{yaml}"
            );
        }
        let config = SessionConfig::from_yaml_str("grid_divisions: 6").unwrap();
        assert_eq!(config.grid().cell_count(), 36);
    }

    #[test]
    fn malformed_yaml_is_yaml_error() {
        assert!(matches!(
            SessionConfig::from_yaml_str("grid_divisions: [oops"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"grid_divisions: 8\n").unwrap();
        let config = SessionConfig::load(tmp.path()).unwrap();
        assert_eq!(config.grid().divisions(), 8);
    }

    #[test]
    fn default_prototype_is_marker() {
        let p = SessionConfig::default().load_prototype().unwrap();
        assert_eq!(p, Prototype::default_marker());
    }
}
