use std::collections::HashMap;

use bevy::pbr::wireframe::{Wireframe, WireframeColor};
use bevy::prelude::*;
use constants::materials::EDGE_COLOR;

use super::policy::{AppliedPresentation, MeshDescriptor, ViewSettings, present};
use crate::tools::building::meshes::{MaterialLibrary, Surface};
use crate::tools::building::store::BuildingStore;
use crate::tools::building::sync::ViewProxy;

/// Last presentation written to each view proxy.
#[derive(Resource, Default)]
pub struct PresentationCache(pub HashMap<Entity, AppliedPresentation>);

/// Applies the per-view presentation rules to every proxy, touching only
/// proxies whose outcome changed since the last frame.
pub fn apply_view_presentation(
    mut commands: Commands,
    settings: Res<ViewSettings>,
    store: Res<BuildingStore>,
    mut cache: ResMut<PresentationCache>,
    mut library: ResMut<MaterialLibrary>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut proxies: Query<(
        Entity,
        &ViewProxy,
        &mut Visibility,
        &mut MeshMaterial3d<StandardMaterial>,
    )>,
    mut removed: RemovedComponents<ViewProxy>,
) {
    for entity in removed.read() {
        cache.0.remove(&entity);
    }

    let selected = store.selected();
    for (entity, proxy, mut visibility, mut material) in &mut proxies {
        let descriptor = MeshDescriptor::Part {
            owner: proxy.owner,
            component: proxy.component,
            roof_kind: proxy.roof_kind,
        };
        let applied = present(proxy.view, &settings, selected, descriptor);
        let previous = cache.0.get(&entity).copied();
        if previous == Some(applied) {
            continue;
        }

        let wanted_visibility = if applied.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *visibility != wanted_visibility {
            *visibility = wanted_visibility;
        }

        let handle = library.get(
            &mut materials,
            Surface::for_component(proxy.component),
            applied.material,
            applied.alpha,
        );
        if material.0 != handle {
            material.0 = handle;
        }

        let had_edges = previous.is_some_and(|p| p.edges);
        if applied.edges && !had_edges {
            commands
                .entity(entity)
                .insert((Wireframe, WireframeColor { color: EDGE_COLOR }));
        } else if !applied.edges && had_edges {
            commands.entity(entity).remove::<(Wireframe, WireframeColor)>();
        }

        cache.0.insert(entity, applied);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::camera::viewports::ViewKind;
    use crate::tools::building::geometry::BuildingComponent;
    use crate::tools::building::model::{BuildingId, RoofKind};
    use crate::tools::building::sync::MeshOwner;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ViewSettings>()
            .init_resource::<BuildingStore>()
            .init_resource::<PresentationCache>()
            .init_resource::<MaterialLibrary>()
            .init_resource::<Assets<StandardMaterial>>()
            .add_systems(Update, apply_view_presentation);
        app
    }

    fn spawn_proxy(app: &mut App, view: ViewKind, component: BuildingComponent) -> Entity {
        app.world_mut()
            .spawn((
                ViewProxy {
                    view,
                    owner: MeshOwner::Building(BuildingId(7)),
                    component,
                    roof_kind: RoofKind::Flat,
                },
                Visibility::default(),
                MeshMaterial3d::<StandardMaterial>::default(),
            ))
            .id()
    }

    #[test]
    fn perspective_walls_get_edges_and_plan_walls_do_not() {
        let mut app = app();
        let perspective = spawn_proxy(&mut app, ViewKind::Perspective, BuildingComponent::Wall);
        let plan = spawn_proxy(&mut app, ViewKind::Plan, BuildingComponent::Wall);
        app.update();

        assert!(app.world().entity(perspective).contains::<Wireframe>());
        assert!(!app.world().entity(plan).contains::<Wireframe>());
        assert_eq!(app.world().resource::<PresentationCache>().0.len(), 2);
    }

    #[test]
    fn unselected_building_is_hidden_in_section() {
        let mut app = app();
        let section = spawn_proxy(&mut app, ViewKind::Section, BuildingComponent::Roof);
        app.update();
        assert_eq!(app.world().get::<Visibility>(section), Some(&Visibility::Hidden));
    }

    #[test]
    fn despawned_proxies_leave_the_cache() {
        let mut app = app();
        let proxy = spawn_proxy(&mut app, ViewKind::Plan, BuildingComponent::Footprint);
        app.update();
        app.world_mut().despawn(proxy);
        app.update();
        assert!(app.world().resource::<PresentationCache>().0.is_empty());
    }
}
