use bevy::prelude::*;
use constants::building::{
    DEFAULT_EXTENSION, DEFAULT_FLAT_THICKNESS, DEFAULT_GABLE_SLOPE_DEG, DEFAULT_LENGTH,
    DEFAULT_ROOF_TRANSPARENCY, DEFAULT_ROTATION, DEFAULT_WALL_HEIGHT, DEFAULT_WIDTH,
    MAX_SLOPE_DEG, MIN_SLOPE_DEG,
};
use constants::interaction::PIXELS_PER_UNIT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tools::building::model::{BuildingParams, Roof, RoofKind};

/// Asset path of the runtime configuration, relative to `assets/`.
pub const EDITOR_CONFIG_PATH: &str = "editor_config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no maps configured")]
    NoMaps,
    #[error("default map `{0}` is not in the map list")]
    UnknownDefaultMap(String),
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("roof transparency {0} is outside 0..=1")]
    TransparencyOutOfRange(f32),
    #[error("default gable slope {0}° is outside 0.01..=89.99")]
    SlopeOutOfRange(f32),
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Background satellite image the buildings are drawn over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub id: String,
    pub name: String,
    /// Image path relative to `assets/`.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatDefaults {
    pub width: f32,
    pub length: f32,
    pub thickness: f32,
    pub wall_height: f32,
    pub extension: f32,
    #[serde(default)]
    pub rotation: f32,
}

impl Default for FlatDefaults {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            length: DEFAULT_LENGTH,
            thickness: DEFAULT_FLAT_THICKNESS,
            wall_height: DEFAULT_WALL_HEIGHT,
            extension: DEFAULT_EXTENSION,
            rotation: DEFAULT_ROTATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GableDefaults {
    pub width: f32,
    pub length: f32,
    /// Degrees.
    pub slope: f32,
    pub wall_height: f32,
    pub extension: f32,
    #[serde(default)]
    pub rotation: f32,
}

impl Default for GableDefaults {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            length: DEFAULT_LENGTH,
            slope: DEFAULT_GABLE_SLOPE_DEG,
            wall_height: DEFAULT_WALL_HEIGHT,
            extension: DEFAULT_EXTENSION,
            rotation: DEFAULT_ROTATION,
        }
    }
}

/// Parameters given to newly placed buildings, per roof type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingDefaults {
    pub flat: FlatDefaults,
    pub gable: GableDefaults,
}

fn default_pixels_per_unit() -> f32 {
    PIXELS_PER_UNIT
}

fn default_roof_transparency() -> f32 {
    DEFAULT_ROOF_TRANSPARENCY
}

/// Runtime editor configuration. Mirrors `assets/editor_config.json`.
#[derive(Asset, Debug, Clone, PartialEq, Serialize, Deserialize, TypePath, Resource)]
pub struct EditorConfig {
    pub maps: Vec<MapConfig>,
    pub default_map: String,
    /// Ground image pixels per world metre.
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f32,
    /// Initial plan-view roof opacity.
    #[serde(default = "default_roof_transparency")]
    pub roof_transparency: f32,
    #[serde(default)]
    pub defaults: BuildingDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            maps: vec![MapConfig {
                id: "isci-bloklari".to_string(),
                name: "İşçi Blokları".to_string(),
                image: "map-images/isci_bloklari.jpg".to_string(),
                description: None,
            }],
            default_map: "isci-bloklari".to_string(),
            pixels_per_unit: PIXELS_PER_UNIT,
            roof_transparency: DEFAULT_ROOF_TRANSPARENCY,
            defaults: BuildingDefaults::default(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

impl EditorConfig {
    /// Parses and validates a config document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.maps.is_empty() {
            return Err(ConfigError::NoMaps);
        }
        if self.map(&self.default_map).is_none() {
            return Err(ConfigError::UnknownDefaultMap(self.default_map.clone()));
        }
        positive("pixels_per_unit", self.pixels_per_unit)?;
        if !(0.0..=1.0).contains(&self.roof_transparency) {
            return Err(ConfigError::TransparencyOutOfRange(self.roof_transparency));
        }

        let flat = &self.defaults.flat;
        positive("defaults.flat.width", flat.width)?;
        positive("defaults.flat.length", flat.length)?;
        positive("defaults.flat.thickness", flat.thickness)?;
        positive("defaults.flat.wall_height", flat.wall_height)?;

        let gable = &self.defaults.gable;
        positive("defaults.gable.width", gable.width)?;
        positive("defaults.gable.length", gable.length)?;
        positive("defaults.gable.wall_height", gable.wall_height)?;
        if !(MIN_SLOPE_DEG..=MAX_SLOPE_DEG).contains(&gable.slope) {
            return Err(ConfigError::SlopeOutOfRange(gable.slope));
        }
        Ok(())
    }

    pub fn map(&self, id: &str) -> Option<&MapConfig> {
        self.maps.iter().find(|map| map.id == id)
    }

    /// Map following `current` in list order, wrapping around.
    pub fn next_map(&self, current: &str) -> Option<&MapConfig> {
        let index = self.maps.iter().position(|map| map.id == current).map_or(0, |i| i + 1);
        self.maps.get(index % self.maps.len().max(1))
    }

    /// Parameters for a new building of `kind` anchored at `position`.
    pub fn building_params(&self, kind: RoofKind, position: Vec3) -> BuildingParams {
        let position = Vec3::new(position.x, 0.0, position.z);
        match kind {
            RoofKind::Flat => {
                let d = self.defaults.flat;
                BuildingParams {
                    position,
                    rotation: d.rotation,
                    wall_height: d.wall_height,
                    extension: d.extension,
                    roof: Roof::Flat { width: d.width, length: d.length, thickness: d.thickness },
                }
            }
            RoofKind::Gable => {
                let d = self.defaults.gable;
                BuildingParams {
                    position,
                    rotation: d.rotation,
                    wall_height: d.wall_height,
                    extension: d.extension,
                    roof: Roof::Gable { width: d.width, length: d.length, slope: d.slope },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "maps": [
            { "id": "a", "name": "Alpha", "image": "map-images/a.jpg" },
            { "id": "b", "name": "Beta", "image": "map-images/b.jpg", "description": "second" }
        ],
        "default_map": "b",
        "pixels_per_unit": 50.0,
        "defaults": {
            "flat": { "width": 4.0, "length": 5.0, "thickness": 0.2, "wall_height": 6.0, "extension": 0.1 },
            "gable": { "width": 3.0, "length": 3.0, "slope": 45.0, "wall_height": 3.0, "extension": 0.15 }
        }
    }"#;

    #[test]
    fn parses_sample_and_fills_optional_fields() {
        let config = EditorConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.maps.len(), 2);
        assert_eq!(config.maps[1].description.as_deref(), Some("second"));
        assert_eq!(config.pixels_per_unit, 50.0);
        assert_eq!(config.roof_transparency, DEFAULT_ROOF_TRANSPARENCY);
        assert_eq!(config.defaults.flat.rotation, 0.0);
    }

    #[test]
    fn shipped_config_is_valid() {
        let config = EditorConfig::from_json_str(include_str!("../../../assets/editor_config.json"))
            .unwrap();
        assert_eq!(config.maps.len(), 3);
        assert_eq!(config.map(&config.default_map).unwrap().name, "İşçi Blokları");
    }

    #[test]
    fn built_in_defaults_are_valid() {
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_unknown_default_map_and_bad_values() {
        let mut config = EditorConfig::default();
        config.default_map = "missing".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::UnknownDefaultMap(_))));

        let mut config = EditorConfig::default();
        config.defaults.flat.thickness = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "defaults.flat.thickness", .. })
        ));

        let mut config = EditorConfig::default();
        config.roof_transparency = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::TransparencyOutOfRange(_))));

        let mut config = EditorConfig::default();
        config.maps.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoMaps)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = EditorConfig::from_json_str("{ \"maps\": [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn next_map_wraps() {
        let config = EditorConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.next_map("a").map(|m| m.id.as_str()), Some("b"));
        assert_eq!(config.next_map("b").map(|m| m.id.as_str()), Some("a"));
        assert_eq!(config.next_map("unknown").map(|m| m.id.as_str()), Some("a"));
    }

    #[test]
    fn building_params_follow_kind_defaults() {
        let config = EditorConfig::from_json_str(SAMPLE).unwrap();
        let params = config.building_params(RoofKind::Flat, Vec3::new(2.0, 5.0, -1.0));
        assert_eq!(params.position, Vec3::new(2.0, 0.0, -1.0));
        assert_eq!(params.wall_height, 6.0);
        assert_eq!(params.roof, Roof::Flat { width: 4.0, length: 5.0, thickness: 0.2 });

        let params = config.building_params(RoofKind::Gable, Vec3::ZERO);
        assert_eq!(params.roof, Roof::Gable { width: 3.0, length: 3.0, slope: 45.0 });
    }
}
