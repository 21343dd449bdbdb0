use bevy::prelude::*;
use constants::building::DEFAULT_ROOF_TRANSPARENCY;
use constants::materials::{GHOST_ALPHA, GHOST_GABLE_ROOF_FACTOR};

use crate::engine::camera::viewports::ViewKind;
use crate::tools::building::geometry::BuildingComponent;
use crate::tools::building::meshes::MaterialVariant;
use crate::tools::building::model::{BuildingId, RoofKind};
use crate::tools::building::sync::MeshOwner;

/// Global view toggles.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    /// Opacity of building solids in the plan view, 0 to 1.
    pub roof_transparency: f32,
    pub show_3d_guides: bool,
    pub show_3d_gizmos: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            roof_transparency: DEFAULT_ROOF_TRANSPARENCY,
            show_3d_guides: false,
            show_3d_gizmos: false,
        }
    }
}

impl ViewSettings {
    pub fn step_roof_transparency(&mut self, delta: f32) {
        let next = (self.roof_transparency + delta).clamp(0.0, 1.0);
        // Two decimals.
        let next = (next * 100.0).round() / 100.0;
        if next != self.roof_transparency {
            self.roof_transparency = next;
            info!("Roof transparency set to {:.2}", next);
        }
    }
}

/// What a mesh is, as far as presentation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshDescriptor {
    /// Ground and other context geometry. Always shown as is.
    Scenery,
    Part {
        owner: MeshOwner,
        component: BuildingComponent,
        roof_kind: RoofKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedPresentation {
    pub visible: bool,
    pub alpha: f32,
    pub edges: bool,
    pub material: MaterialVariant,
}

impl AppliedPresentation {
    const HIDDEN: Self = Self {
        visible: false,
        alpha: 1.0,
        edges: false,
        material: MaterialVariant::Normal,
    };

    const PLAIN: Self = Self {
        visible: true,
        alpha: 1.0,
        edges: false,
        material: MaterialVariant::Normal,
    };
}

struct ViewRules {
    alpha: f32,
    edges: bool,
    guides: bool,
    material: MaterialVariant,
}

fn view_rules(view: ViewKind, settings: &ViewSettings) -> ViewRules {
    match view {
        ViewKind::Plan => ViewRules {
            alpha: settings.roof_transparency,
            edges: false,
            guides: true,
            material: MaterialVariant::Normal,
        },
        ViewKind::Perspective => ViewRules {
            alpha: 1.0,
            edges: true,
            guides: settings.show_3d_guides,
            material: MaterialVariant::Normal,
        },
        ViewKind::Section => ViewRules {
            alpha: 1.0,
            edges: true,
            guides: false,
            material: MaterialVariant::Section,
        },
    }
}

/// How one mesh looks in one view.
pub fn present(
    view: ViewKind,
    settings: &ViewSettings,
    selected: Option<BuildingId>,
    descriptor: MeshDescriptor,
) -> AppliedPresentation {
    let MeshDescriptor::Part { owner, component, roof_kind } = descriptor else {
        return AppliedPresentation::PLAIN;
    };
    let rules = view_rules(view, settings);
    let in_section = view == ViewKind::Section;

    match owner {
        MeshOwner::Ghost => {
            if in_section {
                return AppliedPresentation::HIDDEN;
            }
            if component.is_guide() {
                return AppliedPresentation::PLAIN;
            }
            let alpha = match (component, roof_kind) {
                (BuildingComponent::Roof, RoofKind::Gable) => GHOST_ALPHA * GHOST_GABLE_ROOF_FACTOR,
                _ => GHOST_ALPHA,
            };
            AppliedPresentation { alpha, ..AppliedPresentation::PLAIN }
        }
        MeshOwner::Building(id) => {
            if in_section && selected != Some(id) {
                return AppliedPresentation::HIDDEN;
            }
            match component {
                BuildingComponent::Ridge => AppliedPresentation {
                    visible: view == ViewKind::Plan,
                    ..AppliedPresentation::PLAIN
                },
                BuildingComponent::Footprint | BuildingComponent::Extension => {
                    AppliedPresentation { visible: rules.guides, ..AppliedPresentation::PLAIN }
                }
                BuildingComponent::Wall | BuildingComponent::Roof => AppliedPresentation {
                    visible: true,
                    alpha: rules.alpha,
                    edges: rules.edges,
                    material: rules.material,
                },
            }
        }
    }
}
