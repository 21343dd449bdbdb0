use bevy::asset::AssetMetaCheck;
use bevy::pbr::wireframe::{WireframeConfig, WireframePlugin};
use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::interaction::{PERSPECTIVE_LAYER, PLAN_LAYER, SECTION_LAYER};
use constants::materials::EDGE_COLOR;

use crate::engine::assets::editor_config::EditorConfig;
use crate::engine::camera::controls::{
    CameraDrag, perspective_camera_controls, plan_camera_controls, section_camera_controls,
    track_camera_drag, track_section_target,
};
use crate::engine::camera::viewports::{
    ViewportLayout, apply_camera_layers, apply_camera_rigs, spawn_editor_cameras,
    update_viewport_layout,
};
use crate::engine::core::app_state::{AppState, EditorSet};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::config_loader::{ConfigLoader, resolve_config, start_loading};
use crate::engine::picking::pointer::{PointerState, update_pointer_state};
use crate::engine::presentation::apply::{PresentationCache, apply_view_presentation};
use crate::engine::presentation::policy::ViewSettings;
use crate::engine::scene::ground::{
    CycleMapEvent, GroundImage, cycle_map, fit_ground_to_image, load_active_map,
};
use crate::tools::building::BuildingPlugin;
use crate::tools::gizmo::GizmoPlugin;
use crate::tools::tool_manager::{
    ModeSelectionEvent, ToolManager, handle_editor_shortcuts, handle_mode_selection_events,
};
use crate::tools::ui::EditorUiPlugin;
use crate::tools::ui::numeric_input::numeric_input_keyboard;
use crate::tools::ui::status::mode_button_interaction;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        // Registers EditorConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<EditorConfig>::new(&["json"]))
        .add_plugins(WireframePlugin::default())
        .insert_resource(WireframeConfig {
            global: false,
            default_color: EDGE_COLOR,
        })
        .insert_resource(AmbientLight {
            brightness: 400.0,
            ..default()
        });

    app.add_plugins((BuildingPlugin, GizmoPlugin, EditorUiPlugin));

    // Initialise resources early
    app.init_resource::<EditorConfig>()
        .init_resource::<ConfigLoader>()
        .init_resource::<ViewSettings>()
        .init_resource::<ViewportLayout>()
        .init_resource::<PointerState>()
        .init_resource::<CameraDrag>()
        .init_resource::<PresentationCache>()
        .init_resource::<GroundImage>()
        .init_resource::<ToolManager>()
        .add_event::<ModeSelectionEvent>()
        .add_event::<CycleMapEvent>();

    app.configure_sets(
        Update,
        (
            EditorSet::Input,
            EditorSet::Pointer,
            EditorSet::Gizmos,
            EditorSet::Selection,
            EditorSet::Apply,
            EditorSet::Sync,
            EditorSet::Layout,
            EditorSet::Present,
        )
            .chain()
            .run_if(in_state(AppState::Running)),
    );

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(Update, resolve_config.run_if(in_state(AppState::Loading)));

    app.add_systems(
        Update,
        (
            (
                update_viewport_layout,
                handle_editor_shortcuts.before(numeric_input_keyboard),
                handle_mode_selection_events.after(mode_button_interaction),
                cycle_map,
                track_camera_drag,
                (plan_camera_controls, perspective_camera_controls, section_camera_controls)
                    .after(track_camera_drag),
            )
                .in_set(EditorSet::Input),
            update_pointer_state.in_set(EditorSet::Pointer),
            (track_section_target, load_active_map, fit_ground_to_image)
                .in_set(EditorSet::Sync),
            apply_camera_rigs.in_set(EditorSet::Layout),
            (apply_view_presentation, apply_camera_layers).in_set(EditorSet::Present),
        ),
    );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
        RenderLayers::from_layers(&[PLAN_LAYER, PERSPECTIVE_LAYER, SECTION_LAYER]),
    ));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands, layout: Res<ViewportLayout>) {
    spawn_lighting(&mut commands);
    spawn_editor_cameras(commands, layout);
}
