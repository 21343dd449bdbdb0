//! Pure geometry derived from building parameters.
//!
//! Nothing in here touches the ECS or asset storage: every function maps a
//! [`Building`] to numbers. Flat-only and gable-only calculators refuse the
//! other roof variant with [`GeometryError::RoofMismatch`].

use bevy::prelude::*;
use constants::building::MIN_DIMENSION;
use constants::interaction::{
    EXTENSION_GUIDE_OFFSET, FOOTPRINT_GUIDE_OFFSET, RIDGE_GUIDE_OFFSET,
};
use thiserror::Error;

use super::model::{Building, BuildingId, Roof, RoofKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("{operation} needs a {expected} roof but {id} has a {found} roof")]
    RoofMismatch {
        operation: &'static str,
        id: BuildingId,
        expected: RoofKind,
        found: RoofKind,
    },
}

fn mismatch(operation: &'static str, building: &Building, expected: RoofKind) -> GeometryError {
    GeometryError::RoofMismatch {
        operation,
        id: building.id,
        expected,
        found: building.kind(),
    }
}

/// Tag carried by every mesh a building owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildingComponent {
    Wall,
    Roof,
    Footprint,
    Extension,
    Ridge,
}

impl BuildingComponent {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Wall => "walls",
            Self::Roof => "roof",
            Self::Footprint => "footprint",
            Self::Extension => "extension",
            Self::Ridge => "ridge",
        }
    }

    pub fn is_guide(&self) -> bool {
        matches!(self, Self::Footprint | Self::Extension | Self::Ridge)
    }

    /// Components a building of the given roof type is made of, in spawn order.
    pub fn set_for(kind: RoofKind) -> &'static [BuildingComponent] {
        match kind {
            RoofKind::Flat => &[Self::Wall, Self::Roof, Self::Footprint, Self::Extension],
            RoofKind::Gable => {
                &[Self::Wall, Self::Roof, Self::Footprint, Self::Extension, Self::Ridge]
            }
        }
    }
}

/// Width and length of the wall box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallFootprint {
    pub width: f32,
    pub length: f32,
}

/// Flat roofs overhang on all four sides, gable roofs only along the eaves.
pub fn wall_footprint(building: &Building) -> WallFootprint {
    let overhang = 2.0 * building.extension;
    let width = building.roof.width() - overhang;
    let length = match building.roof {
        Roof::Flat { length, .. } => length - overhang,
        Roof::Gable { length, .. } => length,
    };
    WallFootprint {
        width: width.max(MIN_DIMENSION),
        length: length.max(MIN_DIMENSION),
    }
}

/// An axis-aligned box in the building frame, placed in the world by `center` and yaw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub size: Vec3,
    pub center: Vec3,
    pub rotation: f32,
}

pub fn wall_geometry(building: &Building) -> BoxGeometry {
    let footprint = wall_footprint(building);
    let height = building.wall_height.max(MIN_DIMENSION);
    BoxGeometry {
        size: Vec3::new(footprint.width, height, footprint.length),
        center: Vec3::new(building.position.x, height / 2.0, building.position.z),
        rotation: building.rotation,
    }
}

pub fn flat_roof_geometry(building: &Building) -> Result<BoxGeometry, GeometryError> {
    let Roof::Flat { width, length, thickness } = building.roof else {
        return Err(mismatch("flat_roof_geometry", building, RoofKind::Flat));
    };
    Ok(BoxGeometry {
        size: Vec3::new(
            width.max(MIN_DIMENSION),
            thickness.max(MIN_DIMENSION),
            length.max(MIN_DIMENSION),
        ),
        center: Vec3::new(
            building.position.x,
            building.wall_height + thickness / 2.0,
            building.position.z,
        ),
        rotation: building.rotation,
    })
}

/// Vertical rise of a gable from eave to ridge.
pub fn ridge_rise(width: f32, slope_deg: f32) -> f32 {
    (width / 2.0) * slope_deg.to_radians().tan()
}

/// Inverse of [`ridge_rise`]: the slope in degrees that produces `rise`.
pub fn slope_for_rise(rise: f32, half_width: f32) -> f32 {
    (rise / half_width).atan().to_degrees()
}

/// Triangular prism: the profile is extruded along local Z, base at the eave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GableRoofGeometry {
    /// Base corners and apex in the local X/Y plane.
    pub profile: [Vec2; 3],
    pub length: f32,
    pub rise: f32,
    /// World position of the profile base centre (eave level).
    pub base: Vec3,
    pub rotation: f32,
}

pub fn gable_roof_geometry(building: &Building) -> Result<GableRoofGeometry, GeometryError> {
    let Roof::Gable { width, length, slope } = building.roof else {
        return Err(mismatch("gable_roof_geometry", building, RoofKind::Gable));
    };
    let half = width / 2.0;
    let rise = ridge_rise(width, slope);
    Ok(GableRoofGeometry {
        profile: [Vec2::new(-half, 0.0), Vec2::new(0.0, rise), Vec2::new(half, 0.0)],
        length,
        rise,
        base: Vec3::new(building.position.x, building.wall_height, building.position.z),
        rotation: building.rotation,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ridge {
    pub rise: f32,
    /// Ridge height above ground.
    pub height: f32,
}

pub fn ridge(building: &Building) -> Result<Ridge, GeometryError> {
    let Roof::Gable { width, slope, .. } = building.roof else {
        return Err(mismatch("ridge", building, RoofKind::Gable));
    };
    let rise = ridge_rise(width, slope);
    Ok(Ridge { rise, height: building.wall_height + rise })
}

/// Polyline in the building frame. Heights are baked into the points.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideGeometry {
    pub points: Vec<Vec3>,
    pub dashed: bool,
}

fn closed_rectangle(half_width: f32, half_length: f32, y: f32) -> Vec<Vec3> {
    vec![
        Vec3::new(-half_width, y, -half_length),
        Vec3::new(half_width, y, -half_length),
        Vec3::new(half_width, y, half_length),
        Vec3::new(-half_width, y, half_length),
        Vec3::new(-half_width, y, -half_length),
    ]
}

pub fn footprint_guide(building: &Building) -> GuideGeometry {
    let footprint = wall_footprint(building);
    GuideGeometry {
        points: closed_rectangle(
            footprint.width / 2.0,
            footprint.length / 2.0,
            FOOTPRINT_GUIDE_OFFSET,
        ),
        dashed: false,
    }
}

pub fn extension_guide(building: &Building) -> GuideGeometry {
    GuideGeometry {
        points: closed_rectangle(
            building.roof.width() / 2.0,
            building.roof.length() / 2.0,
            EXTENSION_GUIDE_OFFSET,
        ),
        dashed: true,
    }
}

pub fn ridge_guide(building: &Building) -> Result<GuideGeometry, GeometryError> {
    let ridge = ridge(building).map_err(|_| mismatch("ridge_guide", building, RoofKind::Gable))?;
    let y = ridge.height + RIDGE_GUIDE_OFFSET;
    let half_length = building.roof.length() / 2.0;
    Ok(GuideGeometry {
        points: vec![Vec3::new(0.0, y, -half_length), Vec3::new(0.0, y, half_length)],
        dashed: false,
    })
}

/// Per-axis extent of a component, compared between snapshots on the fast path.
pub fn component_extents(
    component: BuildingComponent,
    building: &Building,
) -> Result<Vec3, GeometryError> {
    let footprint = wall_footprint(building);
    Ok(match component {
        BuildingComponent::Wall => {
            Vec3::new(footprint.width, building.wall_height.max(MIN_DIMENSION), footprint.length)
        }
        BuildingComponent::Roof => {
            let height = match building.roof {
                Roof::Flat { thickness, .. } => thickness,
                Roof::Gable { width, slope, .. } => ridge_rise(width, slope).max(MIN_DIMENSION),
            };
            Vec3::new(building.roof.width(), height, building.roof.length())
        }
        BuildingComponent::Footprint => Vec3::new(footprint.width, 1.0, footprint.length),
        BuildingComponent::Extension => {
            Vec3::new(building.roof.width(), 1.0, building.roof.length())
        }
        BuildingComponent::Ridge => {
            let ridge =
                ridge(building).map_err(|_| mismatch("ridge extents", building, RoofKind::Gable))?;
            Vec3::new(1.0, ridge.height + RIDGE_GUIDE_OFFSET, building.roof.length())
        }
    })
}

/// Which axes of a component follow parameter changes on the fast path.
pub fn scaled_axes(component: BuildingComponent) -> BVec3 {
    match component {
        BuildingComponent::Wall | BuildingComponent::Roof => BVec3::TRUE,
        BuildingComponent::Footprint | BuildingComponent::Extension => BVec3::new(true, false, true),
        BuildingComponent::Ridge => BVec3::new(false, true, true),
    }
}

/// World-space origin of a component's mesh.
pub fn component_anchor(component: BuildingComponent, building: &Building) -> Vec3 {
    let ground = Vec3::new(building.position.x, 0.0, building.position.z);
    match (component, building.roof) {
        (BuildingComponent::Wall, _) => ground.with_y(building.wall_height.max(MIN_DIMENSION) / 2.0),
        (BuildingComponent::Roof, Roof::Flat { thickness, .. }) => {
            ground.with_y(building.wall_height + thickness / 2.0)
        }
        (BuildingComponent::Roof, Roof::Gable { .. }) => ground.with_y(building.wall_height),
        (BuildingComponent::Footprint | BuildingComponent::Extension | BuildingComponent::Ridge, _) => {
            ground
        }
    }
}

/// Read-only values shown in the status overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayValues {
    pub wall_width: f32,
    pub wall_length: f32,
    /// Roof top: ridge for gables, slab top for flat roofs.
    pub total_height: f32,
    pub ridge_rise: Option<f32>,
    pub rotation_deg: f32,
}

pub fn display_values(building: &Building) -> DisplayValues {
    let footprint = wall_footprint(building);
    let (total_height, ridge_rise) = match ridge(building) {
        Ok(ridge) => (ridge.height, Some(ridge.rise)),
        Err(_) => match building.roof {
            Roof::Flat { thickness, .. } => (building.wall_height + thickness, None),
            Roof::Gable { .. } => (building.wall_height, None),
        },
    };
    DisplayValues {
        wall_width: footprint.width,
        wall_length: footprint.length,
        total_height,
        ridge_rise,
        rotation_deg: building.rotation.to_degrees().rem_euclid(360.0),
    }
}

#[cfg(test)]
mod tests {
    use super::super::model::fixtures::{flat, gable};
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn flat_footprint_subtracts_overhang_on_both_axes() {
        let b = flat(3.0, 5.0, 3.0);
        let f = wall_footprint(&b);
        assert!((f.width - 2.7).abs() < EPS, "width={}", f.width);
        assert!((f.length - 4.7).abs() < EPS, "length={}", f.length);
    }

    #[test]
    fn gable_footprint_keeps_full_length() {
        let b = gable(4.0, 6.0, 3.0, 30.0);
        let f = wall_footprint(&b);
        assert!((f.width - 3.7).abs() < EPS);
        assert!((f.length - 6.0).abs() < EPS);
    }

    #[test]
    fn oversized_extension_clamps_to_min_dimension() {
        let mut b = flat(1.0, 1.0, 3.0);
        b.extension = 2.0;
        let f = wall_footprint(&b);
        assert_eq!(f.width, MIN_DIMENSION);
        assert_eq!(f.length, MIN_DIMENSION);
    }

    #[test]
    fn wall_box_sits_on_ground() {
        let mut b = flat(3.0, 3.0, 4.0);
        b.position = Vec3::new(5.0, 0.0, -2.0);
        b.rotation = 0.5;
        let wall = wall_geometry(&b);
        assert_eq!(wall.center, Vec3::new(5.0, 2.0, -2.0));
        assert_eq!(wall.rotation, 0.5);
        assert!((wall.size.y - 4.0).abs() < EPS);
    }

    #[test]
    fn collapsed_wall_stays_on_ground() {
        let wall = wall_geometry(&flat(3.0, 3.0, 0.0));
        assert_eq!(wall.size.y, MIN_DIMENSION);
        assert!((wall.center.y - MIN_DIMENSION / 2.0).abs() < EPS);
        assert_eq!(component_anchor(BuildingComponent::Wall, &flat(3.0, 3.0, 0.0)).y, wall.center.y);
    }

    #[test]
    fn flat_roof_rests_on_walls() {
        let b = flat(3.0, 3.0, 3.0);
        let roof = flat_roof_geometry(&b).unwrap();
        assert!((roof.center.y - 3.075).abs() < EPS);
        assert_eq!(roof.size, Vec3::new(3.0, 0.15, 3.0));
    }

    #[test]
    fn gable_profile_apex_matches_rise() {
        let b = gable(4.0, 6.0, 3.0, 45.0);
        let roof = gable_roof_geometry(&b).unwrap();
        assert!((roof.rise - 2.0).abs() < EPS);
        assert!((roof.profile[1].y - 2.0).abs() < EPS);
        assert_eq!(roof.profile[0], Vec2::new(-2.0, 0.0));
        assert_eq!(roof.base.y, 3.0);
    }

    #[test]
    fn variant_specific_calculators_reject_other_roof() {
        let f = flat(3.0, 3.0, 3.0);
        let g = gable(3.0, 3.0, 3.0, 30.0);
        assert!(matches!(
            gable_roof_geometry(&f),
            Err(GeometryError::RoofMismatch { expected: RoofKind::Gable, found: RoofKind::Flat, .. })
        ));
        assert!(flat_roof_geometry(&g).is_err());
        assert!(ridge(&f).is_err());
        assert!(ridge_guide(&f).is_err());
        assert!(component_extents(BuildingComponent::Ridge, &f).is_err());
    }

    #[test]
    fn ridge_height_grows_with_slope_and_wall_height() {
        let mut last = 0.0;
        for slope in [5.0, 15.0, 30.0, 45.0, 60.0, 89.0] {
            let h = ridge(&gable(4.0, 6.0, 3.0, slope)).unwrap().height;
            assert!(h > last, "slope={} height={}", slope, h);
            last = h;
        }
        let mut last = 0.0;
        for wall in [0.5, 1.0, 3.0, 10.0] {
            let h = ridge(&gable(4.0, 6.0, wall, 30.0)).unwrap().height;
            assert!(h > last, "wall={} height={}", wall, h);
            last = h;
        }
    }

    #[test]
    fn slope_for_rise_inverts_ridge_rise() {
        for slope in [1.0, 22.5, 30.0, 70.0] {
            let rise = ridge_rise(4.0, slope);
            assert!((slope_for_rise(rise, 2.0) - slope).abs() < 1e-3);
        }
    }

    #[test]
    fn guides_are_closed_and_elevated() {
        let b = gable(4.0, 6.0, 3.0, 30.0);
        let footprint = footprint_guide(&b);
        assert_eq!(footprint.points.len(), 5);
        assert_eq!(footprint.points.first(), footprint.points.last());
        assert!(!footprint.dashed);
        assert!(footprint.points.iter().all(|p| p.y == FOOTPRINT_GUIDE_OFFSET));

        let extension = extension_guide(&b);
        assert!(extension.dashed);
        assert_eq!(extension.points[2], Vec3::new(2.0, EXTENSION_GUIDE_OFFSET, 3.0));

        let ridge_line = ridge_guide(&b).unwrap();
        let expected = 3.0 + ridge_rise(4.0, 30.0) + RIDGE_GUIDE_OFFSET;
        assert!((ridge_line.points[0].y - expected).abs() < EPS);
        assert_eq!(ridge_line.points[0].z, -3.0);
    }

    #[test]
    fn anchors_follow_component_type() {
        let f = flat(3.0, 3.0, 3.0);
        assert_eq!(component_anchor(BuildingComponent::Wall, &f).y, 1.5);
        assert!((component_anchor(BuildingComponent::Roof, &f).y - 3.075).abs() < EPS);
        let g = gable(3.0, 3.0, 3.0, 30.0);
        assert_eq!(component_anchor(BuildingComponent::Roof, &g).y, 3.0);
        assert_eq!(component_anchor(BuildingComponent::Ridge, &g).y, 0.0);
    }

    #[test]
    fn display_values_report_total_height() {
        let g = gable(4.0, 6.0, 3.0, 45.0);
        let v = display_values(&g);
        assert!((v.total_height - 5.0).abs() < EPS);
        assert!((v.ridge_rise.unwrap() - 2.0).abs() < EPS);

        let mut f = flat(3.0, 3.0, 3.0);
        f.rotation = -std::f32::consts::FRAC_PI_2;
        let v = display_values(&f);
        assert!((v.total_height - 3.15).abs() < EPS);
        assert!(v.ridge_rise.is_none());
        assert!((v.rotation_deg - 270.0).abs() < 1e-3);
    }
}
