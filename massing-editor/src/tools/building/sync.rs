//! Keeps building meshes in step with the building store.
//!
//! A building's mesh set is rebuilt from scratch only when it has never been
//! built, has lost its parts, or switched roof type. Every other edit rescales
//! and repositions the existing meshes relative to the snapshot they were
//! built from.

use std::collections::HashMap;
use std::fmt;

use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::building::MIN_DIMENSION;
use constants::interaction::{GHOST_HIDDEN_Y, PERSPECTIVE_LAYER, PLAN_LAYER, SECTION_LAYER};
use constants::materials::{GUIDE_DASH, GUIDE_GAP};

use super::geometry::{
    BuildingComponent, GeometryError, GuideGeometry, component_anchor, component_extents,
    extension_guide, flat_roof_geometry, footprint_guide, gable_roof_geometry, ridge_guide,
    scaled_axes, wall_geometry,
};
use super::ghost::GhostPreview;
use super::meshes::{
    MaterialLibrary, MaterialVariant, Surface, dashed_segments, gable_prism_mesh, line_list_mesh,
    polyline_segments,
};
use super::model::{Building, BuildingId, Roof, RoofKind};
use super::store::BuildingStore;
use crate::engine::camera::viewports::ViewKind;
use crate::engine::picking::pick::{PickBounds, PickKind};

/// Who a mesh set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshOwner {
    Building(BuildingId),
    Ghost,
}

impl fmt::Display for MeshOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Building(id) => write!(f, "{}", id),
            Self::Ghost => f.write_str("ghost"),
        }
    }
}

/// Carried by the transform root of every building mesh.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildingPart {
    pub owner: MeshOwner,
    pub component: BuildingComponent,
}

/// One renderable copy of a part, visible to a single camera.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewProxy {
    pub view: ViewKind,
    pub owner: MeshOwner,
    pub component: BuildingComponent,
    pub roof_kind: RoofKind,
}

#[derive(Debug, Clone)]
pub struct MeshSet {
    /// Parameters the meshes were built from. Scales are relative to this.
    pub base: Building,
    /// Parameters last written to the transforms.
    pub last: Building,
    pub lift: f32,
    pub parts: Vec<(BuildingComponent, Entity)>,
}

#[derive(Resource, Default)]
pub struct MeshSets(pub HashMap<MeshOwner, MeshSet>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPlan {
    Rebuild(RebuildReason),
    Incremental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
    NeverBuilt,
    NoParts,
    RoofKindChanged,
}

pub fn decide(base: Option<&Building>, current: &Building, set_is_empty: bool) -> SyncPlan {
    match base {
        None => SyncPlan::Rebuild(RebuildReason::NeverBuilt),
        Some(_) if set_is_empty => SyncPlan::Rebuild(RebuildReason::NoParts),
        Some(base) if base.kind() != current.kind() => {
            SyncPlan::Rebuild(RebuildReason::RoofKindChanged)
        }
        Some(_) => SyncPlan::Incremental,
    }
}

/// Transform that turns a part built from `base` into one matching `current`.
///
/// Axes the component ignores, and axes whose base extent is zero or not
/// finite, keep a scale of 1.
pub fn part_transform(
    component: BuildingComponent,
    base: &Building,
    current: &Building,
) -> Result<Transform, GeometryError> {
    let before = component_extents(component, base)?;
    let after = component_extents(component, current)?;
    let axes = scaled_axes(component);

    let ratio = |scaled: bool, old: f32, new: f32| {
        if !scaled || old == 0.0 || !old.is_finite() || !new.is_finite() {
            1.0
        } else {
            new / old
        }
    };

    Ok(Transform {
        translation: component_anchor(component, current),
        rotation: Quat::from_rotation_y(current.rotation),
        scale: Vec3::new(
            ratio(axes.x, before.x, after.x),
            ratio(axes.y, before.y, after.y),
            ratio(axes.z, before.z, after.z),
        ),
    })
}

fn guide_mesh(guide: &GuideGeometry) -> Mesh {
    let segments = if guide.dashed {
        dashed_segments(&guide.points, GUIDE_DASH, GUIDE_GAP)
    } else {
        polyline_segments(&guide.points)
    };
    line_list_mesh(&segments)
}

fn component_mesh(component: BuildingComponent, building: &Building) -> Result<Mesh, GeometryError> {
    Ok(match component {
        BuildingComponent::Wall => Mesh::from(Cuboid::from_size(wall_geometry(building).size)),
        BuildingComponent::Roof => match building.roof {
            Roof::Flat { .. } => Mesh::from(Cuboid::from_size(flat_roof_geometry(building)?.size)),
            Roof::Gable { .. } => {
                let roof = gable_roof_geometry(building)?;
                gable_prism_mesh(roof.profile, roof.length)
            }
        },
        BuildingComponent::Footprint => guide_mesh(&footprint_guide(building)),
        BuildingComponent::Extension => guide_mesh(&extension_guide(building)),
        BuildingComponent::Ridge => guide_mesh(&ridge_guide(building)?),
    })
}

/// Local pick volume for solid parts. Guides are never picked.
fn pick_bounds(component: BuildingComponent, building: &Building) -> Option<PickBounds> {
    match (component, building.roof) {
        (BuildingComponent::Wall, _) => {
            Some(PickBounds::new(wall_geometry(building).size, Vec3::ZERO, PickKind::Body))
        }
        (BuildingComponent::Roof, Roof::Flat { .. }) => flat_roof_geometry(building)
            .ok()
            .map(|roof| PickBounds::new(roof.size, Vec3::ZERO, PickKind::Body)),
        (BuildingComponent::Roof, Roof::Gable { .. }) => {
            gable_roof_geometry(building).ok().map(|roof| {
                let rise = roof.rise.max(MIN_DIMENSION);
                PickBounds::new(
                    Vec3::new(building.roof.width(), rise, roof.length),
                    Vec3::new(0.0, rise / 2.0, 0.0),
                    PickKind::Body,
                )
            })
        }
        _ => None,
    }
}

fn lifted(mut transform: Transform, lift: f32) -> Transform {
    transform.translation.y += lift;
    transform
}

struct SpawnContext<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<StandardMaterial>,
    library: &'a mut MaterialLibrary,
}

fn spawn_mesh_set(
    ctx: &mut SpawnContext,
    owner: MeshOwner,
    building: &Building,
    lift: f32,
) -> Vec<(BuildingComponent, Entity)> {
    let mut parts = Vec::new();
    for &component in BuildingComponent::set_for(building.kind()) {
        let mesh = match component_mesh(component, building) {
            Ok(mesh) => ctx.meshes.add(mesh),
            Err(err) => {
                error!("Skipping {} of {}: {}", component.label(), owner, err);
                continue;
            }
        };
        let transform = match part_transform(component, building, building) {
            Ok(transform) => lifted(transform, lift),
            Err(err) => {
                error!("Skipping {} of {}: {}", component.label(), owner, err);
                continue;
            }
        };
        let material = ctx.library.get(
            ctx.materials,
            Surface::for_component(component),
            MaterialVariant::Normal,
            1.0,
        );

        let mut root = ctx.commands.spawn((
            Name::new(format!("{} {}", owner, component.label())),
            BuildingPart { owner, component },
            transform,
            GlobalTransform::from(transform),
            Visibility::default(),
        ));
        if let (MeshOwner::Building(_), Some(bounds)) = (owner, pick_bounds(component, building)) {
            root.insert((
                bounds,
                RenderLayers::from_layers(&[PLAN_LAYER, PERSPECTIVE_LAYER, SECTION_LAYER]),
            ));
        }
        root.with_children(|parent| {
            for view in ViewKind::ALL {
                parent.spawn((
                    ViewProxy { view, owner, component, roof_kind: building.kind() },
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(material.clone()),
                    RenderLayers::layer(view.layer()),
                    Visibility::default(),
                ));
            }
        });
        parts.push((component, root.id()));
    }
    parts
}

/// Rebuilds or rescales the mesh set of every building and the ghost.
pub fn sync_building_meshes(
    mut commands: Commands,
    store: Res<BuildingStore>,
    ghost: Res<GhostPreview>,
    mut sets: ResMut<MeshSets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut library: ResMut<MaterialLibrary>,
    mut roots: Query<(&mut Transform, &mut GlobalTransform), With<BuildingPart>>,
) {
    let mut targets: Vec<(MeshOwner, Building, f32)> = store
        .buildings
        .iter()
        .map(|b| (MeshOwner::Building(b.id), *b, 0.0))
        .collect();
    if let Some(preview) = ghost.building {
        let lift = if ghost.parked { GHOST_HIDDEN_Y } else { 0.0 };
        targets.push((MeshOwner::Ghost, preview, lift));
    }

    let stale: Vec<MeshOwner> = sets
        .0
        .keys()
        .filter(|owner| !targets.iter().any(|(o, _, _)| o == *owner))
        .copied()
        .collect();
    for owner in stale {
        if let Some(set) = sets.0.remove(&owner) {
            for (_, entity) in set.parts {
                commands.entity(entity).despawn();
            }
            debug!("Despawned meshes of {}", owner);
        }
    }

    let mut ctx = SpawnContext {
        commands: &mut commands,
        meshes: &mut *meshes,
        materials: &mut *materials,
        library: &mut *library,
    };

    for (owner, building, lift) in targets {
        let existing = sets.0.get(&owner);
        let plan = decide(
            existing.map(|set| &set.base),
            &building,
            existing.is_none_or(|set| set.parts.is_empty()),
        );

        match plan {
            SyncPlan::Rebuild(reason) => {
                if let Some(old) = sets.0.remove(&owner) {
                    for (_, entity) in old.parts {
                        ctx.commands.entity(entity).despawn();
                    }
                }
                let parts = spawn_mesh_set(&mut ctx, owner, &building, lift);
                debug!("Rebuilt {} ({:?}, {} parts)", owner, reason, parts.len());
                sets.0.insert(owner, MeshSet { base: building, last: building, lift, parts });
            }
            SyncPlan::Incremental => {
                let Some(set) = sets.0.get_mut(&owner) else {
                    continue;
                };
                if set.last == building && set.lift == lift {
                    continue;
                }
                for &(component, entity) in &set.parts {
                    let transform = match part_transform(component, &set.base, &building) {
                        Ok(transform) => lifted(transform, lift),
                        Err(err) => {
                            error!("Cannot update {} of {}: {}", component.label(), owner, err);
                            continue;
                        }
                    };
                    if let Ok((mut local, mut global)) = roots.get_mut(entity) {
                        *local = transform;
                        *global = GlobalTransform::from(transform);
                    }
                }
                set.last = building;
                set.lift = lift;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::model::fixtures::{flat, gable};
    use super::super::model::BuildingPatch;
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn first_build_and_empty_sets_rebuild() {
        let b = flat(3.0, 3.0, 3.0);
        assert_eq!(decide(None, &b, true), SyncPlan::Rebuild(RebuildReason::NeverBuilt));
        assert_eq!(decide(Some(&b), &b, true), SyncPlan::Rebuild(RebuildReason::NoParts));
        assert_eq!(decide(Some(&b), &b, false), SyncPlan::Incremental);
    }

    #[test]
    fn roof_kind_change_always_rebuilds() {
        let base = flat(3.0, 3.0, 3.0);
        let mut current = base;
        current.roof = base.roof.converted(RoofKind::Gable);
        assert_eq!(
            decide(Some(&base), &current, false),
            SyncPlan::Rebuild(RebuildReason::RoofKindChanged)
        );
    }

    #[test]
    fn incremental_wall_matches_fresh_build() {
        let base = flat(3.0, 4.0, 3.0);
        let mut current = flat(5.0, 7.0, 4.5);
        current.position = Vec3::new(2.0, 0.0, -1.0);
        current.rotation = 0.7;

        let transform = part_transform(BuildingComponent::Wall, &base, &current).unwrap();
        let built = wall_geometry(&base).size * transform.scale;
        let fresh = wall_geometry(&current);
        assert!((built - fresh.size).abs().max_element() < EPS, "{:?} vs {:?}", built, fresh.size);
        assert!((transform.translation - fresh.center).abs().max_element() < EPS);
        assert!(transform.rotation.angle_between(Quat::from_rotation_y(0.7)) < EPS);
    }

    #[test]
    fn incremental_gable_roof_tracks_rise() {
        let base = gable(4.0, 6.0, 3.0, 30.0);
        let current = gable(6.0, 8.0, 3.5, 45.0);
        let transform = part_transform(BuildingComponent::Roof, &base, &current).unwrap();
        let base_roof = gable_roof_geometry(&base).unwrap();
        let fresh = gable_roof_geometry(&current).unwrap();
        assert!((base_roof.rise * transform.scale.y - fresh.rise).abs() < EPS);
        assert!((base_roof.length * transform.scale.z - fresh.length).abs() < EPS);
        assert!((transform.translation.y - 3.5).abs() < EPS);
    }

    #[test]
    fn guides_keep_vertical_scale() {
        let base = flat(3.0, 3.0, 3.0);
        let current = flat(6.0, 3.0, 9.0);
        let transform = part_transform(BuildingComponent::Footprint, &base, &current).unwrap();
        assert_eq!(transform.scale.y, 1.0);
        assert!(transform.scale.x > 2.0);
        assert_eq!(transform.translation.y, 0.0);
    }

    #[test]
    fn degenerate_base_extent_skips_axis() {
        let mut base = flat(3.0, 3.0, 3.0);
        base.roof = Roof::Flat { width: 3.0, length: 3.0, thickness: 0.0 };
        let current = flat(3.0, 3.0, 3.0);
        let transform = part_transform(BuildingComponent::Roof, &base, &current).unwrap();
        assert_eq!(transform.scale.y, 1.0);
        assert!(transform.scale.is_finite());
    }

    #[test]
    fn ridge_part_rejects_flat_roof() {
        let base = flat(3.0, 3.0, 3.0);
        assert!(part_transform(BuildingComponent::Ridge, &base, &base).is_err());
    }

    #[test]
    fn incremental_ridge_guide_matches_fresh_build() {
        let base = gable(4.0, 6.0, 3.0, 30.0);
        let current = gable(4.0, 8.0, 9.0, 30.0);
        let transform = part_transform(BuildingComponent::Ridge, &base, &current).unwrap();
        let built = ridge_guide(&base).unwrap().points[1] * transform.scale + transform.translation;
        let fresh = ridge_guide(&current).unwrap().points[1] + component_anchor(BuildingComponent::Ridge, &current);
        assert!((built - fresh).abs().max_element() < EPS, "{:?} vs {:?}", built, fresh);
    }

    fn sync_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<BuildingStore>()
            .init_resource::<GhostPreview>()
            .init_resource::<MeshSets>()
            .init_resource::<MaterialLibrary>()
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .add_systems(Update, sync_building_meshes);
        app
    }

    fn add_building(app: &mut App, building: Building) -> BuildingId {
        app.world_mut().resource_mut::<BuildingStore>().insert_new(building.params())
    }

    fn proxies_of(app: &mut App, id: BuildingId) -> Vec<ViewProxy> {
        let mut query = app.world_mut().query::<&ViewProxy>();
        query
            .iter(app.world())
            .filter(|proxy| proxy.owner == MeshOwner::Building(id))
            .copied()
            .collect()
    }

    fn patch(app: &mut App, id: BuildingId, patch: BuildingPatch) {
        assert!(app.world_mut().resource_mut::<BuildingStore>().apply_patch(id, &patch));
    }

    #[test]
    fn roof_kind_change_replaces_the_mesh_set() {
        let mut app = sync_app();
        let id = add_building(&mut app, flat(3.0, 3.0, 3.0));
        app.update();

        let old_roots: Vec<Entity> = app.world().resource::<MeshSets>().0[&MeshOwner::Building(id)]
            .parts
            .iter()
            .map(|(_, entity)| *entity)
            .collect();
        assert_eq!(old_roots.len(), BuildingComponent::set_for(RoofKind::Flat).len());
        assert_eq!(proxies_of(&mut app, id).len(), old_roots.len() * ViewKind::ALL.len());

        patch(&mut app, id, BuildingPatch { kind: Some(RoofKind::Gable), ..default() });
        app.update();

        for entity in &old_roots {
            assert!(app.world().get_entity(*entity).is_err(), "{:?} survived the rebuild", entity);
        }
        let set = &app.world().resource::<MeshSets>().0[&MeshOwner::Building(id)];
        assert_eq!(set.base.kind(), RoofKind::Gable);
        let roots: Vec<Entity> = set.parts.iter().map(|(_, entity)| *entity).collect();
        assert_eq!(roots.len(), BuildingComponent::set_for(RoofKind::Gable).len());
        for root in &roots {
            let children = app.world().get::<Children>(*root).map_or(0, |c| c.len());
            assert_eq!(children, ViewKind::ALL.len());
        }
        let proxies = proxies_of(&mut app, id);
        assert_eq!(proxies.len(), roots.len() * ViewKind::ALL.len());
        assert!(proxies.iter().all(|proxy| proxy.roof_kind == RoofKind::Gable));
    }

    #[test]
    fn incremental_update_writes_global_transform_in_the_same_frame() {
        let mut app = sync_app();
        let id = add_building(&mut app, flat(3.0, 3.0, 3.0));
        app.update();
        let wall = app.world().resource::<MeshSets>().0[&MeshOwner::Building(id)]
            .parts
            .iter()
            .find(|(component, _)| *component == BuildingComponent::Wall)
            .map(|(_, entity)| *entity)
            .unwrap();

        patch(
            &mut app,
            id,
            BuildingPatch {
                wall_height: Some(6.0),
                position: Some(Vec3::new(2.0, 0.0, 1.0)),
                ..default()
            },
        );
        app.update();

        let set = &app.world().resource::<MeshSets>().0[&MeshOwner::Building(id)];
        assert!(set.parts.iter().any(|(_, entity)| *entity == wall), "wall was rebuilt");
        let global = app.world().get::<GlobalTransform>(wall).unwrap();
        assert!((global.translation() - Vec3::new(2.0, 3.0, 1.0)).abs().max_element() < EPS);
        assert!((global.compute_transform().scale.y - 2.0).abs() < EPS);
    }
}
