/// Satellite-image ground plane
use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::interaction::{FALLBACK_GROUND_SIZE, PERSPECTIVE_LAYER, PLAN_LAYER, SECTION_LAYER};

use crate::engine::assets::editor_config::EditorConfig;

#[derive(Component)]
pub struct GroundPlane;

/// Id of the map currently shown on the ground.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveMap(pub String);

/// Image backing the ground plane and whether the plane has been sized to it.
#[derive(Resource, Default)]
pub struct GroundImage {
    pub handle: Option<Handle<Image>>,
    pub fitted: bool,
}

/// Switch to the next configured map.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct CycleMapEvent;

/// World size of an image drawn at `pixels_per_unit`.
pub fn ground_size(image_px: UVec2, pixels_per_unit: f32) -> Vec2 {
    if pixels_per_unit <= 0.0 {
        return Vec2::splat(FALLBACK_GROUND_SIZE);
    }
    image_px.as_vec2() / pixels_per_unit
}

pub fn cycle_map(
    mut events: EventReader<CycleMapEvent>,
    config: Res<EditorConfig>,
    mut active: ResMut<ActiveMap>,
) {
    for _ in events.read() {
        if let Some(next) = config.next_map(&active.0) {
            info!("Switching map to {} ({})", next.name, next.id);
            active.0 = next.id.clone();
        }
    }
}

/// Respawns the ground plane whenever the active map changes.
pub fn load_active_map(
    mut commands: Commands,
    active: Res<ActiveMap>,
    config: Res<EditorConfig>,
    asset_server: Res<AssetServer>,
    mut ground_image: ResMut<GroundImage>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    grounds: Query<Entity, With<GroundPlane>>,
) {
    if !active.is_changed() {
        return;
    }
    let Some(map) = config.map(&active.0) else {
        warn!("Unknown map `{}`, ground not changed", active.0);
        return;
    };

    for entity in &grounds {
        commands.entity(entity).despawn();
    }

    let image: Handle<Image> = asset_server.load(&map.image);
    ground_image.handle = Some(image.clone());
    ground_image.fitted = false;

    let material = materials.add(StandardMaterial {
        base_color_texture: Some(image),
        unlit: true,
        ..default()
    });
    commands.spawn((
        Name::new(format!("Ground {}", map.id)),
        GroundPlane,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(1.0, 1.0))),
        MeshMaterial3d(material),
        Transform::from_scale(Vec3::new(FALLBACK_GROUND_SIZE, 1.0, FALLBACK_GROUND_SIZE)),
        RenderLayers::from_layers(&[PLAN_LAYER, PERSPECTIVE_LAYER, SECTION_LAYER]),
    ));
    info!("Ground plane created for map {}", map.name);
}

/// Scales the ground plane to the image once its pixel size is known.
pub fn fit_ground_to_image(
    images: Res<Assets<Image>>,
    config: Res<EditorConfig>,
    mut ground_image: ResMut<GroundImage>,
    mut grounds: Query<&mut Transform, With<GroundPlane>>,
) {
    if ground_image.fitted {
        return;
    }
    let Some(image) = ground_image.handle.as_ref().and_then(|handle| images.get(handle)) else {
        return;
    };
    let size = ground_size(image.size(), config.pixels_per_unit);
    for mut transform in &mut grounds {
        transform.scale = Vec3::new(size.x, 1.0, size.y);
    }
    ground_image.fitted = true;
    debug!("Ground plane sized to {:.1} x {:.1} m", size.x, size.y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_pixels_map_to_metres() {
        let size = ground_size(UVec2::new(4000, 2500), 100.0);
        assert_eq!(size, Vec2::new(40.0, 25.0));
        assert_eq!(ground_size(UVec2::new(10, 10), 0.0), Vec2::splat(FALLBACK_GROUND_SIZE));
    }

    #[test]
    fn cycling_walks_the_map_list() {
        let mut app = App::new();
        let mut config = EditorConfig::default();
        config.maps.push(crate::engine::assets::editor_config::MapConfig {
            id: "second".to_string(),
            name: "Second".to_string(),
            image: "map-images/second.jpg".to_string(),
            description: None,
        });
        app.add_plugins(MinimalPlugins)
            .add_event::<CycleMapEvent>()
            .insert_resource(config)
            .insert_resource(ActiveMap("isci-bloklari".to_string()))
            .add_systems(Update, cycle_map);

        app.world_mut().send_event(CycleMapEvent);
        app.update();
        assert_eq!(app.world().resource::<ActiveMap>().0, "second");

        app.world_mut().send_event(CycleMapEvent);
        app.update();
        assert_eq!(app.world().resource::<ActiveMap>().0, "isci-bloklari");
    }
}
