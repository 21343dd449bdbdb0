use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

use super::properties::PropertyEdit;
use crate::tools::gizmo::section::{NumericRequestSpec, SectionEdit};

/// What a confirmed value edits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericAction {
    Section(SectionEdit),
    Property(PropertyEdit),
}

/// Ask the user for a number.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct NumericInputRequested {
    pub title: String,
    pub initial: f32,
    pub min: f32,
    pub max: Option<f32>,
    pub action: NumericAction,
}

impl From<NumericRequestSpec> for NumericInputRequested {
    fn from(spec: NumericRequestSpec) -> Self {
        Self {
            title: spec.title.to_string(),
            initial: spec.initial,
            min: spec.min,
            max: spec.max,
            action: NumericAction::Section(spec.edit),
        }
    }
}

/// Confirmed dialog value, already clamped to the request bounds.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct NumericInputSubmitted {
    pub value: f32,
    pub action: NumericAction,
}

/// Open dialog, if any. While open it owns the keyboard and pointer.
#[derive(Resource, Debug, Default)]
pub struct NumericInputState {
    request: Option<NumericInputRequested>,
    buffer: String,
    /// Prefilled text is replaced by the first typed character.
    fresh: bool,
}

impl NumericInputState {
    pub fn is_open(&self) -> bool {
        self.request.is_some()
    }

    pub fn open(&mut self, request: NumericInputRequested) {
        self.buffer = format!("{:.2}", request.initial);
        self.fresh = true;
        self.request = Some(request);
    }

    pub fn close(&mut self) {
        self.request = None;
        self.buffer.clear();
    }

    pub fn request(&self) -> Option<&NumericInputRequested> {
        self.request.as_ref()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }
}

/// Parses the typed value and clamps it into `[min, max]`.
pub fn parse_and_clamp(text: &str, min: f32, max: Option<f32>) -> Option<f32> {
    let value = text.trim().parse::<f32>().ok().filter(|v| v.is_finite())?;
    let value = value.max(min);
    Some(max.map_or(value, |max| value.min(max)))
}

/// Degrees for slope and rotation dialogs, metres for everything else.
pub fn unit_for(title: &str) -> &'static str {
    let title = title.to_lowercase();
    if title.contains("slope") || title.contains("rotation") { "°" } else { "m" }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Edited,
    Confirm,
    Cancel,
    Ignored,
}

/// Applies one key press to the text buffer.
pub fn apply_key(buffer: &mut String, fresh: &mut bool, key: &Key) -> KeyOutcome {
    match key {
        Key::Enter => KeyOutcome::Confirm,
        Key::Escape => KeyOutcome::Cancel,
        Key::Backspace => {
            if *fresh {
                buffer.clear();
                *fresh = false;
            } else {
                buffer.pop();
            }
            KeyOutcome::Edited
        }
        Key::Character(text) => {
            let accepted: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            if accepted.is_empty() {
                return KeyOutcome::Ignored;
            }
            if *fresh {
                buffer.clear();
                *fresh = false;
            }
            buffer.push_str(&accepted);
            KeyOutcome::Edited
        }
        _ => KeyOutcome::Ignored,
    }
}

pub fn open_numeric_input(
    mut requests: EventReader<NumericInputRequested>,
    mut state: ResMut<NumericInputState>,
) {
    if let Some(request) = requests.read().last() {
        info!("Numeric input opened: {}", request.title);
        state.open(request.clone());
    }
}

pub fn numeric_input_keyboard(
    mut keys: EventReader<KeyboardInput>,
    mut state: ResMut<NumericInputState>,
    mut submitted: EventWriter<NumericInputSubmitted>,
) {
    if !state.is_open() {
        keys.clear();
        return;
    }

    for event in keys.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        let state = &mut *state;
        match apply_key(&mut state.buffer, &mut state.fresh, &event.logical_key) {
            KeyOutcome::Confirm => {
                let Some(request) = state.request.as_ref() else {
                    break;
                };
                match parse_and_clamp(&state.buffer, request.min, request.max) {
                    Some(value) => {
                        submitted.write(NumericInputSubmitted { value, action: request.action });
                        info!("{} confirmed: {:.2}", request.title, value);
                        state.close();
                        break;
                    }
                    None => warn!("Ignoring invalid number `{}`", state.buffer),
                }
            }
            KeyOutcome::Cancel => {
                debug!("Numeric input cancelled");
                state.close();
                break;
            }
            KeyOutcome::Edited | KeyOutcome::Ignored => {}
        }
    }
}

#[derive(Component)]
pub struct NumericInputRoot;

#[derive(Component)]
pub struct NumericInputTitle;

#[derive(Component)]
pub struct NumericInputValue;

#[derive(Component)]
pub struct NumericInputHint;

// Spawns the hidden dialog; `reflect_numeric_input` shows it on request
pub fn spawn_numeric_input_ui(mut commands: Commands) {
    commands
        .spawn((
            NumericInputRoot,
            Name::new("NumericInputOverlay"),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.45)),
            GlobalZIndex(10),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                display: Display::None,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    Name::new("NumericInputPanel"),
                    BackgroundColor(Color::srgb(0.10, 0.11, 0.13)),
                    BorderColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
                    Node {
                        width: Val::Px(280.0),
                        padding: UiRect::all(Val::Px(16.0)),
                        row_gap: Val::Px(10.0),
                        flex_direction: FlexDirection::Column,
                        border: UiRect::all(Val::Px(1.0)),
                        ..default()
                    },
                ))
                .with_children(|panel| {
                    panel.spawn((
                        NumericInputTitle,
                        Text::new(""),
                        TextFont { font_size: 18.0, ..default() },
                        TextColor(Color::WHITE),
                    ));
                    panel
                        .spawn((
                            BackgroundColor(Color::srgb(0.18, 0.20, 0.24)),
                            Node {
                                width: Val::Percent(100.0),
                                padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                                ..default()
                            },
                        ))
                        .with_children(|field| {
                            field.spawn((
                                NumericInputValue,
                                Text::new(""),
                                TextFont { font_size: 20.0, ..default() },
                                TextColor(Color::WHITE),
                            ));
                        });
                    panel.spawn((
                        NumericInputHint,
                        Text::new(""),
                        TextFont { font_size: 13.0, ..default() },
                        TextColor(Color::srgb(0.65, 0.68, 0.72)),
                    ));
                });
        });
}

pub fn reflect_numeric_input(
    state: Res<NumericInputState>,
    mut roots: Query<&mut Node, With<NumericInputRoot>>,
    mut texts: ParamSet<(
        Query<&mut Text, With<NumericInputTitle>>,
        Query<&mut Text, With<NumericInputValue>>,
        Query<&mut Text, With<NumericInputHint>>,
    )>,
) {
    if !state.is_changed() {
        return;
    }
    if let Ok(mut node) = roots.single_mut() {
        node.display = if state.is_open() { Display::Flex } else { Display::None };
    }
    let Some(request) = state.request() else {
        return;
    };

    if let Ok(mut text) = texts.p0().single_mut() {
        *text = Text::new(request.title.clone());
    }
    if let Ok(mut text) = texts.p1().single_mut() {
        *text = Text::new(format!("{} {}", state.buffer(), unit_for(&request.title)));
    }
    if let Ok(mut text) = texts.p2().single_mut() {
        let range = match request.max {
            Some(max) => format!("{:.2} to {:.2}", request.min, max),
            None => format!("min {:.2}", request.min),
        };
        *text = Text::new(format!("{}. Enter to confirm, Esc to cancel", range));
    }
}
