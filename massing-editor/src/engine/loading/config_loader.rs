use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::assets::editor_config::{EDITOR_CONFIG_PATH, EditorConfig};
use crate::engine::core::app_state::AppState;
use crate::engine::presentation::policy::ViewSettings;
use crate::engine::scene::ground::ActiveMap;

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<EditorConfig>>,
}

// Start the loading process
pub fn start_loading(mut loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    loader.handle = Some(asset_server.load(EDITOR_CONFIG_PATH));
    info!("Loading editor config from {}", EDITOR_CONFIG_PATH);
}

/// Installs the loaded config, or the built-in defaults when it is missing
/// or invalid, then starts the editor.
pub fn resolve_config(
    mut commands: Commands,
    loader: Res<ConfigLoader>,
    configs: Res<Assets<EditorConfig>>,
    asset_server: Res<AssetServer>,
    mut settings: ResMut<ViewSettings>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(handle) = &loader.handle else {
        return;
    };

    let config = if let Some(config) = configs.get(handle) {
        match config.validate() {
            Ok(()) => {
                info!(
                    "Editor config loaded: {} maps, default `{}`",
                    config.maps.len(),
                    config.default_map
                );
                config.clone()
            }
            Err(err) => {
                warn!("Invalid editor config: {}. Using built-in defaults", err);
                EditorConfig::default()
            }
        }
    } else if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
        warn!("Editor config unavailable: {}. Using built-in defaults", err);
        EditorConfig::default()
    } else {
        return;
    };

    settings.roof_transparency = config.roof_transparency;
    commands.insert_resource(ActiveMap(config.default_map.clone()));
    commands.insert_resource(config);
    next_state.set(AppState::Running);
}
