use bevy::prelude::*;

use super::model::{Building, BuildingId};
use crate::engine::assets::editor_config::EditorConfig;
use crate::engine::picking::pointer::PointerState;
use crate::tools::tool_manager::ToolManager;

/// Id reserved for the placement preview. Never handed out by the store.
pub const GHOST_ID: BuildingId = BuildingId(0);

/// Translucent placement preview that follows the cursor in placement modes.
///
/// `building` is `None` outside placement modes. While the cursor is off the
/// ground the preview keeps its last position and is parked out of sight.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct GhostPreview {
    pub building: Option<Building>,
    pub parked: bool,
}

impl GhostPreview {
    /// Preview state for the current mode and ground point.
    pub fn next(
        &self,
        tools: &ToolManager,
        config: &EditorConfig,
        ground: Option<Vec3>,
    ) -> GhostPreview {
        let Some(kind) = tools.mode().placement_kind() else {
            return GhostPreview::default();
        };
        let position = ground
            .or_else(|| {
                self.building
                    .filter(|b| b.kind() == kind)
                    .map(|b| b.position)
            })
            .unwrap_or(Vec3::ZERO);
        GhostPreview {
            building: Some(Building::new(GHOST_ID, config.building_params(kind, position))),
            parked: ground.is_none(),
        }
    }
}

pub fn update_ghost_preview(
    tools: Res<ToolManager>,
    config: Res<EditorConfig>,
    pointer: Res<PointerState>,
    mut ghost: ResMut<GhostPreview>,
) {
    let next = ghost.next(&tools, &config, pointer.ground);
    ghost.set_if_neq(next);
}
