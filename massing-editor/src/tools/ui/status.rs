use bevy::prelude::*;

use crate::tools::building::geometry::display_values;
use crate::tools::building::model::Building;
use crate::tools::building::store::BuildingStore;
use crate::tools::tool_manager::{
    InteractionMode, ModeSelectionEvent, ModeSelectionSource, ToolManager,
};

#[derive(Component)]
pub struct StatusText;

/// Toolbar button that switches to a mode.
#[derive(Component, Debug, Clone, Copy)]
pub struct ModeButton(pub InteractionMode);

const BUTTON_IDLE: Color = Color::srgb(0.22, 0.24, 0.28);
const BUTTON_HOVER: Color = Color::srgb(0.26, 0.28, 0.32);
const BUTTON_PRESSED: Color = Color::srgb(0.18, 0.20, 0.24);
const BUTTON_ACTIVE: Color = Color::srgb(0.16, 0.50, 0.32);

/// One-line summary of the mode and the selected building.
pub fn status_line(mode: InteractionMode, selected: Option<&Building>) -> String {
    let mut line = format!("Mode: {}", mode.label());
    let Some(building) = selected else {
        line.push_str("  |  Nothing selected");
        return line;
    };

    let values = display_values(building);
    line.push_str(&format!(
        "  |  {} ({})  |  Walls {:.2} x {:.2} m  |  Height {:.2} m",
        building.id,
        building.kind(),
        values.wall_width,
        values.wall_length,
        values.total_height,
    ));
    if let Some(rise) = values.ridge_rise {
        line.push_str(&format!("  |  Rise {:.2} m", rise));
    }
    line.push_str(&format!("  |  Rotation {:.1}°", values.rotation_deg));
    line
}

// Toolbar across the top of the plan view and a status line along the bottom
pub fn spawn_status_ui(mut commands: Commands) {
    commands
        .spawn((
            Name::new("Toolbar"),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(8.0),
                left: Val::Px(8.0),
                column_gap: Val::Px(6.0),
                flex_direction: FlexDirection::Row,
                ..default()
            },
        ))
        .with_children(|bar| {
            for mode in [InteractionMode::Select, InteractionMode::PlaceFlat, InteractionMode::PlaceGable] {
                bar.spawn((
                    Button,
                    ModeButton(mode),
                    BackgroundColor(BUTTON_IDLE),
                    BorderColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
                    Node {
                        padding: UiRect::axes(Val::Px(10.0), Val::Px(5.0)),
                        border: UiRect::all(Val::Px(1.0)),
                        ..default()
                    },
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new(mode.label()),
                        TextFont { font_size: 14.0, ..default() },
                        TextColor(Color::WHITE),
                    ));
                });
            }
        });

    commands
        .spawn((
            Name::new("StatusBar"),
            BackgroundColor(Color::srgba(0.10, 0.11, 0.13, 0.85)),
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(0.0),
                left: Val::Px(0.0),
                padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
                ..default()
            },
        ))
        .with_children(|bar| {
            bar.spawn((
                StatusText,
                Text::new(""),
                TextFont { font_size: 13.0, ..default() },
                TextColor(Color::srgb(0.85, 0.87, 0.90)),
            ));
        });
}

// Toolbar buttons request a mode change, the active mode stays highlighted
pub fn mode_button_interaction(
    mut q: Query<(&Interaction, &ModeButton, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
    tools: Res<ToolManager>,
    mut mode_events: EventWriter<ModeSelectionEvent>,
) {
    for (interaction, button, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                mode_events.write(ModeSelectionEvent {
                    mode: button.0,
                    source: ModeSelectionSource::Toolbar,
                });
                *bg = BackgroundColor(BUTTON_PRESSED);
            }
            Interaction::Hovered => *bg = BackgroundColor(BUTTON_HOVER),
            Interaction::None => {
                *bg = BackgroundColor(if tools.is_mode_active(button.0) { BUTTON_ACTIVE } else { BUTTON_IDLE })
            }
        }
    }
}

pub fn highlight_active_mode(
    tools: Res<ToolManager>,
    mut q: Query<(&Interaction, &ModeButton, &mut BackgroundColor)>,
) {
    if !tools.is_changed() {
        return;
    }
    for (interaction, button, mut bg) in &mut q {
        if *interaction == Interaction::None {
            let wanted = if tools.is_mode_active(button.0) { BUTTON_ACTIVE } else { BUTTON_IDLE };
            bg.set_if_neq(BackgroundColor(wanted));
        }
    }
}

pub fn update_status_text(
    tools: Res<ToolManager>,
    store: Res<BuildingStore>,
    mut q: Query<&mut Text, With<StatusText>>,
) {
    if !tools.is_changed() && !store.is_changed() {
        return;
    }
    let line = status_line(tools.mode(), store.selected_building());
    for mut text in &mut q {
        if text.0 != line {
            text.0 = line.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::building::model::fixtures::{flat, gable};

    #[test]
    fn status_without_selection() {
        assert_eq!(
            status_line(InteractionMode::PlaceGable, None),
            "Mode: Gable roof  |  Nothing selected"
        );
    }

    #[test]
    fn status_shows_footprint_height_and_rotation() {
        let line = status_line(InteractionMode::Select, Some(&flat(3.0, 3.0, 3.0)));
        assert!(line.contains("Walls 2.70 x 2.70 m"), "{}", line);
        assert!(line.contains("Height 3.15 m"), "{}", line);
        assert!(line.contains("Rotation 0.0°"), "{}", line);
        assert!(!line.contains("Rise"));

        let line = status_line(InteractionMode::Select, Some(&gable(4.0, 6.0, 3.0, 45.0)));
        assert!(line.contains("Height 5.00 m"), "{}", line);
        assert!(line.contains("Rise 2.00 m"), "{}", line);
    }
}
