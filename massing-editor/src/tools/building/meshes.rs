use std::collections::HashMap;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use constants::materials::{
    EXTENSION_GUIDE_COLOR, FOOTPRINT_GUIDE_COLOR, RIDGE_GUIDE_COLOR, ROOF_COLOR,
    SECTION_ROOF_COLOR, SECTION_WALL_COLOR, WALL_COLOR,
};

use super::geometry::BuildingComponent;

/// Solid triangular prism. The profile lies in local X/Y and is extruded
/// symmetrically along Z; faces are flat shaded.
pub fn gable_prism_mesh(profile: [Vec2; 3], length: f32) -> Mesh {
    let half_length = length / 2.0;
    let [left, apex, right] = profile;
    let front = |p: Vec2| Vec3::new(p.x, p.y, half_length);
    let back = |p: Vec2| Vec3::new(p.x, p.y, -half_length);

    let (a, b, c) = (front(left), front(apex), front(right));
    let (a2, b2, c2) = (back(left), back(apex), back(right));

    let faces: [[Vec3; 3]; 8] = [
        [a, c, b],
        [a2, b2, c2],
        [a, b, b2],
        [a, b2, a2],
        [b, c, c2],
        [b, c2, b2],
        [a, a2, c2],
        [a, c2, c],
    ];

    let mut positions = Vec::with_capacity(faces.len() * 3);
    let mut normals = Vec::with_capacity(faces.len() * 3);
    for [p0, p1, p2] in faces {
        let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
        for p in [p0, p1, p2] {
            positions.push(p.to_array());
            normals.push(normal.to_array());
        }
    }
    let uvs = vec![[0.0f32, 0.0]; positions.len()];

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
}

/// Consecutive points joined into line segments.
pub fn polyline_segments(points: &[Vec3]) -> Vec<[Vec3; 2]> {
    points.windows(2).map(|pair| [pair[0], pair[1]]).collect()
}

/// Splits a polyline into dashes of `dash` length separated by `gap`.
/// The pattern carries over corners so the dashes stay evenly spaced.
pub fn dashed_segments(points: &[Vec3], dash: f32, gap: f32) -> Vec<[Vec3; 2]> {
    let period = dash + gap;
    if dash <= 0.0 || period <= 0.0 {
        return polyline_segments(points);
    }

    let mut out = Vec::new();
    let mut phase = 0.0f32;
    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let length = start.distance(end);
        if length <= f32::EPSILON {
            continue;
        }
        let dir = (end - start) / length;
        let mut travelled = 0.0;
        while travelled < length {
            let in_dash = phase < dash;
            let remaining_in_phase = if in_dash { dash - phase } else { period - phase };
            let step = remaining_in_phase.min(length - travelled);
            if in_dash {
                out.push([start + dir * travelled, start + dir * (travelled + step)]);
            }
            travelled += step;
            phase = (phase + step) % period;
        }
    }
    out
}

pub fn line_list_mesh(segments: &[[Vec3; 2]]) -> Mesh {
    let positions: Vec<[f32; 3]> = segments
        .iter()
        .flat_map(|[a, b]| [a.to_array(), b.to_array()])
        .collect();
    let count = positions.len() as u32;

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(Indices::U32((0..count).collect()));
    mesh
}

/// Surface appearance a building mesh can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Wall,
    Roof,
    Guide(BuildingComponent),
}

impl Surface {
    pub fn for_component(component: BuildingComponent) -> Self {
        match component {
            BuildingComponent::Wall => Self::Wall,
            BuildingComponent::Roof => Self::Roof,
            other => Self::Guide(other),
        }
    }
}

/// Normal building look, or the flat grey cut-away look of the section view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaterialVariant {
    #[default]
    Normal,
    Section,
}

/// Shared material handles keyed by surface, variant and opacity.
///
/// Opacity is bucketed to thousandths so slider jitter does not grow the cache.
#[derive(Resource, Default)]
pub struct MaterialLibrary {
    cache: HashMap<(Surface, MaterialVariant, u16), Handle<StandardMaterial>>,
}

impl MaterialLibrary {
    pub fn get(
        &mut self,
        materials: &mut Assets<StandardMaterial>,
        surface: Surface,
        variant: MaterialVariant,
        alpha: f32,
    ) -> Handle<StandardMaterial> {
        let alpha = alpha.clamp(0.0, 1.0);
        let key = (surface, variant, (alpha * 1000.0).round() as u16);
        self.cache
            .entry(key)
            .or_insert_with(|| materials.add(build_material(surface, variant, alpha)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }
}

fn build_material(surface: Surface, variant: MaterialVariant, alpha: f32) -> StandardMaterial {
    let alpha_mode = if alpha < 1.0 { AlphaMode::Blend } else { AlphaMode::Opaque };
    match (surface, variant) {
        (Surface::Guide(component), _) => StandardMaterial {
            base_color: guide_color(component),
            unlit: true,
            ..default()
        },
        (Surface::Wall, variant) => StandardMaterial {
            base_color: match variant {
                MaterialVariant::Normal => WALL_COLOR,
                MaterialVariant::Section => SECTION_WALL_COLOR,
            }
            .with_alpha(alpha),
            perceptual_roughness: 0.9,
            reflectance: 0.1,
            alpha_mode,
            ..default()
        },
        (Surface::Roof, variant) => StandardMaterial {
            base_color: match variant {
                MaterialVariant::Normal => ROOF_COLOR,
                MaterialVariant::Section => SECTION_ROOF_COLOR,
            }
            .with_alpha(alpha),
            perceptual_roughness: 0.7,
            double_sided: true,
            cull_mode: None,
            alpha_mode,
            ..default()
        },
    }
}

fn guide_color(component: BuildingComponent) -> Color {
    match component {
        BuildingComponent::Extension => EXTENSION_GUIDE_COLOR,
        BuildingComponent::Ridge => RIDGE_GUIDE_COLOR,
        _ => FOOTPRINT_GUIDE_COLOR,
    }
}
