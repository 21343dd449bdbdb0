use std::fmt;

use bevy::prelude::*;
use constants::building::{DEFAULT_FLAT_THICKNESS, DEFAULT_GABLE_SLOPE_DEG};

/// Stable identifier assigned by the building store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildingId(pub u64);

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "building-{}", self.0)
    }
}

/// Roof type tag, used wherever the full roof payload is not needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoofKind {
    Flat,
    Gable,
}

impl RoofKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Gable => "gable",
        }
    }
}

impl fmt::Display for RoofKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Roof parameters. Width and length are the full roof footprint including overhang.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roof {
    Flat { width: f32, length: f32, thickness: f32 },
    /// `slope` is in degrees, strictly between 0 and 90.
    Gable { width: f32, length: f32, slope: f32 },
}

impl Roof {
    pub fn kind(&self) -> RoofKind {
        match self {
            Self::Flat { .. } => RoofKind::Flat,
            Self::Gable { .. } => RoofKind::Gable,
        }
    }

    pub fn width(&self) -> f32 {
        match *self {
            Self::Flat { width, .. } | Self::Gable { width, .. } => width,
        }
    }

    pub fn length(&self) -> f32 {
        match *self {
            Self::Flat { length, .. } | Self::Gable { length, .. } => length,
        }
    }

    fn set_width(&mut self, value: f32) {
        match self {
            Self::Flat { width, .. } | Self::Gable { width, .. } => *width = value,
        }
    }

    fn set_length(&mut self, value: f32) {
        match self {
            Self::Flat { length, .. } | Self::Gable { length, .. } => *length = value,
        }
    }

    /// Same footprint, different roof type. Type-specific fields take their defaults.
    pub fn converted(&self, kind: RoofKind) -> Self {
        let (width, length) = (self.width(), self.length());
        match (self, kind) {
            (Self::Flat { .. }, RoofKind::Flat) | (Self::Gable { .. }, RoofKind::Gable) => *self,
            (_, RoofKind::Flat) => Self::Flat { width, length, thickness: DEFAULT_FLAT_THICKNESS },
            (_, RoofKind::Gable) => Self::Gable { width, length, slope: DEFAULT_GABLE_SLOPE_DEG },
        }
    }
}

/// Everything needed to create a building except its id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingParams {
    /// Ground anchor; only X and Z are meaningful.
    pub position: Vec3,
    /// Yaw about +Y in radians.
    pub rotation: f32,
    pub wall_height: f32,
    /// Roof overhang beyond the walls.
    pub extension: f32,
    pub roof: Roof,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Building {
    pub id: BuildingId,
    pub position: Vec3,
    pub rotation: f32,
    pub wall_height: f32,
    pub extension: f32,
    pub roof: Roof,
}

impl Building {
    pub fn new(id: BuildingId, params: BuildingParams) -> Self {
        Self {
            id,
            position: params.position,
            rotation: params.rotation,
            wall_height: params.wall_height,
            extension: params.extension,
            roof: params.roof,
        }
    }

    pub fn kind(&self) -> RoofKind {
        self.roof.kind()
    }

    pub fn params(&self) -> BuildingParams {
        BuildingParams {
            position: self.position,
            rotation: self.rotation,
            wall_height: self.wall_height,
            extension: self.extension,
            roof: self.roof,
        }
    }
}

/// Partial parameter update. `None` leaves a field untouched.
///
/// Fields that do not exist on the building's roof variant (thickness on a
/// gable, slope on a flat roof) are ignored, unless `kind` switches the
/// variant in the same patch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BuildingPatch {
    pub position: Option<Vec3>,
    pub rotation: Option<f32>,
    pub wall_height: Option<f32>,
    pub extension: Option<f32>,
    pub kind: Option<RoofKind>,
    pub width: Option<f32>,
    pub length: Option<f32>,
    pub thickness: Option<f32>,
    pub slope: Option<f32>,
}

impl BuildingPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, building: &mut Building) {
        if let Some(kind) = self.kind {
            building.roof = building.roof.converted(kind);
        }
        if let Some(position) = self.position {
            building.position = position;
        }
        if let Some(rotation) = self.rotation {
            building.rotation = rotation;
        }
        if let Some(wall_height) = self.wall_height {
            building.wall_height = wall_height;
        }
        if let Some(extension) = self.extension {
            building.extension = extension;
        }
        if let Some(width) = self.width {
            building.roof.set_width(width);
        }
        if let Some(length) = self.length {
            building.roof.set_length(length);
        }
        match &mut building.roof {
            Roof::Flat { thickness, .. } => {
                if let Some(value) = self.thickness {
                    *thickness = value;
                }
            }
            Roof::Gable { slope, .. } => {
                if let Some(value) = self.slope {
                    *slope = value;
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn patch_sets_only_given_fields() {
        let mut b = flat(3.0, 3.0, 3.0);
        BuildingPatch { wall_height: Some(4.0), width: Some(5.0), ..default() }.apply(&mut b);
        assert_eq!(b.wall_height, 4.0);
        assert_eq!(b.roof.width(), 5.0);
        assert_eq!(b.roof.length(), 3.0);
        assert_eq!(b.extension, 0.15);
    }

    #[test]
    fn patch_ignores_fields_of_other_variant() {
        let mut b = gable(4.0, 6.0, 3.0, 30.0);
        BuildingPatch { thickness: Some(1.0), ..default() }.apply(&mut b);
        assert_eq!(b.roof, Roof::Gable { width: 4.0, length: 6.0, slope: 30.0 });
    }

    #[test]
    fn kind_switch_keeps_footprint_and_applies_new_fields() {
        let mut b = flat(4.0, 6.0, 3.0);
        BuildingPatch { kind: Some(RoofKind::Gable), slope: Some(45.0), ..default() }.apply(&mut b);
        assert_eq!(b.roof, Roof::Gable { width: 4.0, length: 6.0, slope: 45.0 });

        BuildingPatch { kind: Some(RoofKind::Flat), ..default() }.apply(&mut b);
        assert_eq!(
            b.roof,
            Roof::Flat { width: 4.0, length: 6.0, thickness: DEFAULT_FLAT_THICKNESS }
        );
    }
}
