use bevy::prelude::*;
use constants::building::{MAX_SLOPE_DEG, MIN_DIMENSION, MIN_SLOPE_DEG, MIN_WALL_HEIGHT};

use super::numeric_input::{
    NumericAction, NumericInputRequested, NumericInputState, NumericInputSubmitted,
};
use crate::tools::building::model::{Building, BuildingId, BuildingPatch, Roof, RoofKind};
use crate::tools::building::store::{BuildingStore, UpdateBuilding};

/// Building parameter editable from the properties panel.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyField {
    Width,
    Length,
    WallHeight,
    Extension,
    Rotation,
    Thickness,
    Slope,
}

impl PropertyField {
    pub const ALL: [PropertyField; 7] = [
        Self::Width,
        Self::Length,
        Self::WallHeight,
        Self::Extension,
        Self::Rotation,
        Self::Thickness,
        Self::Slope,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Width => "Roof Width",
            Self::Length => "Roof Length",
            Self::WallHeight => "Wall Height",
            Self::Extension => "Extension",
            Self::Rotation => "Rotation",
            Self::Thickness => "Roof Thickness",
            Self::Slope => "Roof Slope",
        }
    }

    pub fn applies_to(&self, kind: RoofKind) -> bool {
        match self {
            Self::Thickness => kind == RoofKind::Flat,
            Self::Slope => kind == RoofKind::Gable,
            _ => true,
        }
    }

    /// Current value in display units: metres, or degrees for rotation and slope.
    pub fn value(&self, building: &Building) -> Option<f32> {
        match (self, building.roof) {
            (Self::Width, roof) => Some(roof.width()),
            (Self::Length, roof) => Some(roof.length()),
            (Self::WallHeight, _) => Some(building.wall_height),
            (Self::Extension, _) => Some(building.extension),
            (Self::Rotation, _) => Some(building.rotation.to_degrees().rem_euclid(360.0)),
            (Self::Thickness, Roof::Flat { thickness, .. }) => Some(thickness),
            (Self::Slope, Roof::Gable { slope, .. }) => Some(slope),
            _ => None,
        }
    }

    /// Accepted range. The extension may not eat the whole roof.
    pub fn bounds(&self, building: &Building) -> (f32, Option<f32>) {
        match self {
            Self::Width | Self::Length | Self::Thickness => (MIN_DIMENSION, None),
            Self::WallHeight => (MIN_WALL_HEIGHT, None),
            Self::Extension => {
                let half = building.roof.width().min(building.roof.length()) / 2.0;
                (0.0, Some((half - MIN_DIMENSION).max(0.0)))
            }
            Self::Rotation => (0.0, Some(360.0)),
            Self::Slope => (MIN_SLOPE_DEG, Some(MAX_SLOPE_DEG)),
        }
    }

    pub fn patch(&self, value: f32) -> BuildingPatch {
        match self {
            Self::Width => BuildingPatch { width: Some(value), ..default() },
            Self::Length => BuildingPatch { length: Some(value), ..default() },
            Self::WallHeight => BuildingPatch { wall_height: Some(value), ..default() },
            Self::Extension => BuildingPatch { extension: Some(value), ..default() },
            Self::Rotation => BuildingPatch { rotation: Some(value.to_radians()), ..default() },
            Self::Thickness => BuildingPatch { thickness: Some(value), ..default() },
            Self::Slope => BuildingPatch { slope: Some(value), ..default() },
        }
    }

    pub fn display(&self, building: &Building) -> Option<String> {
        let value = self.value(building)?;
        Some(match self {
            Self::Rotation | Self::Slope => format!("{}: {:.1}°", self.label(), value),
            _ => format!("{}: {:.2} m", self.label(), value),
        })
    }
}

/// Numeric edit of one field of one building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyEdit {
    pub building: BuildingId,
    pub field: PropertyField,
}

pub fn property_request(field: PropertyField, building: &Building) -> Option<NumericInputRequested> {
    let initial = field.value(building)?;
    let (min, max) = field.bounds(building);
    Some(NumericInputRequested {
        title: format!("Set {}", field.label()),
        initial,
        min,
        max,
        action: NumericAction::Property(PropertyEdit { building: building.id, field }),
    })
}

#[derive(Component)]
pub struct PropertiesPanel;

/// Text inside a property row.
#[derive(Component, Debug, Clone, Copy)]
pub struct PropertyText(pub PropertyField);

const ROW_IDLE: Color = Color::srgba(0.18, 0.20, 0.24, 0.0);
const ROW_HOVER: Color = Color::srgb(0.26, 0.28, 0.32);
const ROW_PRESSED: Color = Color::srgb(0.18, 0.20, 0.24);

// Panel under the toolbar; each row opens the numeric dialog for its field
pub fn spawn_properties_panel(mut commands: Commands) {
    commands
        .spawn((
            PropertiesPanel,
            Name::new("PropertiesPanel"),
            Interaction::default(),
            BackgroundColor(Color::srgba(0.10, 0.11, 0.13, 0.9)),
            BorderColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(48.0),
                left: Val::Px(8.0),
                width: Val::Px(220.0),
                padding: UiRect::all(Val::Px(6.0)),
                row_gap: Val::Px(2.0),
                flex_direction: FlexDirection::Column,
                border: UiRect::all(Val::Px(1.0)),
                display: Display::None,
                ..default()
            },
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new("Properties"),
                TextFont { font_size: 14.0, ..default() },
                TextColor(Color::WHITE),
            ));
            for field in PropertyField::ALL {
                panel
                    .spawn((
                        Button,
                        field,
                        BackgroundColor(ROW_IDLE),
                        Node {
                            padding: UiRect::axes(Val::Px(6.0), Val::Px(3.0)),
                            ..default()
                        },
                    ))
                    .with_children(|row| {
                        row.spawn((
                            PropertyText(field),
                            Text::new(field.label()),
                            TextFont { font_size: 13.0, ..default() },
                            TextColor(Color::srgb(0.85, 0.87, 0.90)),
                        ));
                    });
            }
        });
}

pub fn property_button_interaction(
    mut q: Query<(&Interaction, &PropertyField, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
    store: Res<BuildingStore>,
    numeric_input: Res<NumericInputState>,
    mut requests: EventWriter<NumericInputRequested>,
) {
    for (interaction, field, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                *bg = BackgroundColor(ROW_PRESSED);
                if numeric_input.is_open() {
                    continue;
                }
                if let Some(request) =
                    store.selected_building().and_then(|b| property_request(*field, b))
                {
                    requests.write(request);
                }
            }
            Interaction::Hovered => *bg = BackgroundColor(ROW_HOVER),
            Interaction::None => *bg = BackgroundColor(ROW_IDLE),
        }
    }
}

/// Turns confirmed property values into building edits.
pub fn apply_property_input(
    mut submitted: EventReader<NumericInputSubmitted>,
    store: Res<BuildingStore>,
    mut updates: EventWriter<UpdateBuilding>,
) {
    for NumericInputSubmitted { value, action } in submitted.read() {
        let NumericAction::Property(edit) = action else {
            continue;
        };
        if store.get(edit.building).is_none() {
            warn!("Property edit for unknown {}", edit.building);
            continue;
        }
        updates.write(UpdateBuilding { id: edit.building, patch: edit.field.patch(*value) });
    }
}

/// Shows the panel while something is selected and keeps row texts current.
pub fn reflect_properties(
    store: Res<BuildingStore>,
    mut panels: Query<&mut Node, With<PropertiesPanel>>,
    mut rows: Query<(&PropertyField, &mut Node), Without<PropertiesPanel>>,
    mut texts: Query<(&PropertyText, &mut Text)>,
) {
    if !store.is_changed() {
        return;
    }
    let selected = store.selected_building();
    let shown = |visible: bool| if visible { Display::Flex } else { Display::None };

    if let Ok(mut node) = panels.single_mut() {
        node.display = shown(selected.is_some());
    }
    let Some(building) = selected else {
        return;
    };
    for (field, mut node) in &mut rows {
        node.display = shown(field.applies_to(building.kind()));
    }
    for (PropertyText(field), mut text) in &mut texts {
        if let Some(line) = field.display(building) {
            if text.0 != line {
                text.0 = line;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::building::model::fixtures::{flat, gable};
    use crate::tools::building::store::{
        AddBuilding, DeleteSelectedBuilding, SelectBuilding, apply_building_events,
    };
    use crate::tools::tool_manager::ToolManager;

    const EPS: f32 = 1e-4;

    #[test]
    fn roof_specific_fields_follow_kind() {
        assert!(PropertyField::Thickness.applies_to(RoofKind::Flat));
        assert!(!PropertyField::Thickness.applies_to(RoofKind::Gable));
        assert!(PropertyField::Slope.applies_to(RoofKind::Gable));
        assert!(property_request(PropertyField::Slope, &flat(3.0, 3.0, 3.0)).is_none());
        assert!(property_request(PropertyField::Thickness, &gable(4.0, 6.0, 3.0, 30.0)).is_none());
    }

    #[test]
    fn extension_is_bounded_by_the_shorter_side() {
        let request = property_request(PropertyField::Extension, &flat(3.0, 5.0, 3.0)).unwrap();
        assert_eq!(request.min, 0.0);
        assert!((request.max.unwrap() - (1.5 - MIN_DIMENSION)).abs() < EPS);
        assert!((request.initial - 0.15).abs() < EPS);
        assert_eq!(request.title, "Set Extension");
    }

    #[test]
    fn rotation_is_edited_in_degrees() {
        let mut building = flat(3.0, 3.0, 3.0);
        building.rotation = -std::f32::consts::FRAC_PI_2;
        assert!((PropertyField::Rotation.value(&building).unwrap() - 270.0).abs() < 1e-3);
        let patch = PropertyField::Rotation.patch(90.0);
        assert!((patch.rotation.unwrap() - std::f32::consts::FRAC_PI_2).abs() < EPS);
        assert_eq!(
            PropertyField::Rotation.display(&building).as_deref(),
            Some("Rotation: 270.0°")
        );
    }

    #[test]
    fn confirmed_property_values_reach_the_store() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<BuildingStore>()
            .init_resource::<ToolManager>()
            .add_event::<NumericInputSubmitted>()
            .add_event::<AddBuilding>()
            .add_event::<UpdateBuilding>()
            .add_event::<DeleteSelectedBuilding>()
            .add_event::<SelectBuilding>()
            .add_systems(Update, (apply_property_input, apply_building_events).chain());

        let id = app
            .world_mut()
            .resource_mut::<BuildingStore>()
            .insert_new(flat(3.0, 3.0, 3.0).params());
        for (field, value) in [
            (PropertyField::Extension, 0.4),
            (PropertyField::Thickness, 0.3),
            (PropertyField::Rotation, 90.0),
        ] {
            app.world_mut().send_event(NumericInputSubmitted {
                value,
                action: NumericAction::Property(PropertyEdit { building: id, field }),
            });
        }
        app.update();

        let store = app.world().resource::<BuildingStore>();
        let building = store.get(id).unwrap();
        assert!((building.extension - 0.4).abs() < EPS);
        assert_eq!(building.roof, Roof::Flat { width: 3.0, length: 3.0, thickness: 0.3 });
        assert!((building.rotation - std::f32::consts::FRAC_PI_2).abs() < EPS);
    }
}
