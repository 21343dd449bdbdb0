//! The three editor viewports and the camera rigs that drive them.
//!
//! ```text
//! +-------------------+-------------+
//! |                   | perspective |
//! |       plan        +-------------+
//! |                   |   section   |
//! +-------------------+-------------+
//! ```
//!
//! Rigs hold the camera state (target, zoom, angles); `apply_camera_rigs`
//! turns that state into `Transform` and `Projection`.

use bevy::prelude::*;
use bevy::render::camera::{ScalingMode, Viewport};
use bevy::render::view::RenderLayers;
use bevy::window::PrimaryWindow;
use constants::camera::{
    ORTHO_FAR, PERSPECTIVE_INITIAL_ALPHA, PERSPECTIVE_INITIAL_BETA, PERSPECTIVE_INITIAL_RADIUS,
    PLAN_CAMERA_HEIGHT, PLAN_INITIAL_WIDTH, PLAN_VIEW_WIDTH_FRACTION, SECTION_CAMERA_DISTANCE,
    SECTION_INITIAL_BOTTOM, SECTION_INITIAL_TOP, SECTION_SIDE_NE, SECTION_SIDE_NW,
    SECTION_SIDE_SE, SECTION_SIDE_SW,
};
use constants::interaction::{
    PERSPECTIVE_LAYER, PLAN_LAYER, SECTION_GIZMO_LAYER, SECTION_LAYER, TRANSFORM_GIZMO_LAYER,
};
use constants::materials::CLEAR_COLOR;

use crate::engine::presentation::policy::ViewSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Plan,
    Perspective,
    Section,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [Self::Plan, Self::Perspective, Self::Section];

    /// Render layer holding this view's copy of the building meshes.
    pub fn layer(&self) -> usize {
        match self {
            Self::Plan => PLAN_LAYER,
            Self::Perspective => PERSPECTIVE_LAYER,
            Self::Section => SECTION_LAYER,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Perspective => "perspective",
            Self::Section => "section",
        }
    }

    fn order(&self) -> isize {
        match self {
            Self::Plan => 0,
            Self::Perspective => 1,
            Self::Section => 2,
        }
    }

    /// Everything this view's camera renders.
    pub fn camera_layers(&self, settings: &ViewSettings) -> RenderLayers {
        match self {
            Self::Plan => RenderLayers::from_layers(&[PLAN_LAYER, TRANSFORM_GIZMO_LAYER]),
            Self::Perspective if settings.show_3d_gizmos => {
                RenderLayers::from_layers(&[PERSPECTIVE_LAYER, TRANSFORM_GIZMO_LAYER])
            }
            Self::Perspective => RenderLayers::layer(PERSPECTIVE_LAYER),
            Self::Section => RenderLayers::from_layers(&[SECTION_LAYER, SECTION_GIZMO_LAYER]),
        }
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct EditorCamera {
    pub view: ViewKind,
}

/// Viewport rectangles in logical window pixels, origin top-left.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewportLayout {
    pub plan: Rect,
    pub perspective: Rect,
    pub section: Rect,
}

impl Default for ViewportLayout {
    fn default() -> Self {
        Self::for_window(Vec2::new(1280.0, 720.0))
    }
}

impl ViewportLayout {
    pub fn for_window(size: Vec2) -> Self {
        let split_x = size.x * PLAN_VIEW_WIDTH_FRACTION;
        let split_y = size.y / 2.0;
        Self {
            plan: Rect::new(0.0, 0.0, split_x, size.y),
            perspective: Rect::new(split_x, 0.0, size.x, split_y),
            section: Rect::new(split_x, split_y, size.x, size.y),
        }
    }

    pub fn rect(&self, view: ViewKind) -> Rect {
        match view {
            ViewKind::Plan => self.plan,
            ViewKind::Perspective => self.perspective,
            ViewKind::Section => self.section,
        }
    }

    /// The view under a window cursor position and the viewport-local position.
    pub fn locate(&self, cursor: Vec2) -> Option<(ViewKind, Vec2)> {
        ViewKind::ALL
            .into_iter()
            .find(|view| self.rect(*view).contains(cursor))
            .map(|view| (view, self.local(view, cursor)))
    }

    /// Window cursor position relative to a viewport, even when outside it.
    pub fn local(&self, view: ViewKind, cursor: Vec2) -> Vec2 {
        cursor - self.rect(view).min
    }

    fn physical(&self, view: ViewKind, scale_factor: f32) -> Viewport {
        let rect = self.rect(view);
        let position = (rect.min * scale_factor).round().as_uvec2();
        let size = (rect.size() * scale_factor).round().as_uvec2().max(UVec2::ONE);
        Viewport {
            physical_position: position,
            physical_size: size,
            ..default()
        }
    }
}

/// Top-down orthographic camera. North (-Z) is up on screen.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlanRig {
    pub target: Vec3,
    /// Visible ground width in metres.
    pub width: f32,
}

impl Default for PlanRig {
    fn default() -> Self {
        Self { target: Vec3::ZERO, width: PLAN_INITIAL_WIDTH }
    }
}

impl PlanRig {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.target.with_y(PLAN_CAMERA_HEIGHT))
            .looking_at(self.target.with_y(0.0), Vec3::NEG_Z)
    }

    pub fn projection(&self) -> Projection {
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedHorizontal { viewport_width: self.width },
            far: ORTHO_FAR,
            ..OrthographicProjection::default_3d()
        })
    }
}

/// Orbit camera around a ground target. `alpha` is the azimuth, `beta` the
/// polar angle from +Y.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitRig {
    pub target: Vec3,
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            alpha: PERSPECTIVE_INITIAL_ALPHA,
            beta: PERSPECTIVE_INITIAL_BETA,
            radius: PERSPECTIVE_INITIAL_RADIUS,
        }
    }
}

impl OrbitRig {
    pub fn eye(&self) -> Vec3 {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let (sin_b, cos_b) = self.beta.sin_cos();
        self.target + self.radius * Vec3::new(cos_a * sin_b, cos_b, -sin_a * sin_b)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }
}

/// Compass side the section camera looks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionSide {
    NorthEast,
    SouthEast,
    SouthWest,
    #[default]
    NorthWest,
}

impl SectionSide {
    pub fn angle(&self) -> f32 {
        match self {
            Self::NorthEast => SECTION_SIDE_NE,
            Self::SouthEast => SECTION_SIDE_SE,
            Self::SouthWest => SECTION_SIDE_SW,
            Self::NorthWest => SECTION_SIDE_NW,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::NorthEast => Self::SouthEast,
            Self::SouthEast => Self::SouthWest,
            Self::SouthWest => Self::NorthWest,
            Self::NorthWest => Self::NorthEast,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Self::NorthEast => Self::NorthWest,
            Self::SouthEast => Self::NorthEast,
            Self::SouthWest => Self::SouthEast,
            Self::NorthWest => Self::SouthWest,
        }
    }

    /// Horizontal unit vector from the target towards the camera.
    pub fn direction(&self) -> Vec3 {
        Quat::from_rotation_y(self.angle()) * Vec3::new(-1.0, 0.0, -1.0).normalize()
    }
}

/// Orthographic elevation camera.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SectionRig {
    pub target: Vec3,
    pub side: SectionSide,
    /// Visible height in metres.
    pub height: f32,
    /// Vertical position of the target in the viewport, 0 bottom to 1 top.
    pub origin_y: f32,
}

impl Default for SectionRig {
    fn default() -> Self {
        let height = SECTION_INITIAL_TOP - SECTION_INITIAL_BOTTOM;
        Self {
            target: Vec3::ZERO,
            side: SectionSide::default(),
            height,
            origin_y: -SECTION_INITIAL_BOTTOM / height,
        }
    }
}

impl SectionRig {
    pub fn transform(&self) -> Transform {
        let eye = self.target + self.side.direction() * SECTION_CAMERA_DISTANCE;
        Transform::from_translation(eye).looking_at(self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Projection {
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical { viewport_height: self.height },
            viewport_origin: Vec2::new(0.5, self.origin_y),
            far: ORTHO_FAR,
            ..OrthographicProjection::default_3d()
        })
    }
}

pub fn spawn_editor_cameras(mut commands: Commands, layout: Res<ViewportLayout>) {
    let settings = ViewSettings::default();
    let camera = |view: ViewKind| Camera {
        order: view.order(),
        viewport: Some(layout.physical(view, 1.0)),
        clear_color: ClearColorConfig::Custom(CLEAR_COLOR),
        ..default()
    };

    let plan = PlanRig::default();
    commands.spawn((
        Name::new("Plan Camera"),
        Camera3d::default(),
        camera(ViewKind::Plan),
        plan.projection(),
        plan.transform(),
        plan,
        EditorCamera { view: ViewKind::Plan },
        ViewKind::Plan.camera_layers(&settings),
    ));

    let orbit = OrbitRig::default();
    commands.spawn((
        Name::new("Perspective Camera"),
        Camera3d::default(),
        camera(ViewKind::Perspective),
        Projection::Perspective(PerspectiveProjection::default()),
        orbit.transform(),
        orbit,
        EditorCamera { view: ViewKind::Perspective },
        ViewKind::Perspective.camera_layers(&settings),
    ));

    let section = SectionRig::default();
    commands.spawn((
        Name::new("Section Camera"),
        Camera3d::default(),
        camera(ViewKind::Section),
        section.projection(),
        section.transform(),
        section,
        EditorCamera { view: ViewKind::Section },
        ViewKind::Section.camera_layers(&settings),
    ));

    // Full-window overlay camera for bevy_ui.
    commands.spawn((
        Name::new("UI Camera"),
        Camera2d,
        Camera {
            order: 3,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        IsDefaultUiCamera,
        RenderLayers::none(),
    ));
}

/// Keeps the layout and camera viewports in step with the window size.
pub fn update_viewport_layout(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut layout: ResMut<ViewportLayout>,
    mut cameras: Query<(&EditorCamera, &mut Camera)>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = window.size();
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let next = ViewportLayout::for_window(size);
    let scale_factor = window.scale_factor();

    for (editor_camera, mut camera) in &mut cameras {
        let viewport = next.physical(editor_camera.view, scale_factor);
        let stale = camera.viewport.as_ref().is_none_or(|current| {
            current.physical_position != viewport.physical_position
                || current.physical_size != viewport.physical_size
        });
        if stale {
            camera.viewport = Some(viewport);
        }
    }

    if *layout != next {
        debug!("Viewport layout updated for {}x{}", size.x, size.y);
        *layout = next;
    }
}

pub fn apply_camera_rigs(
    mut plans: Query<(Ref<PlanRig>, &mut Transform, &mut Projection)>,
    mut orbits: Query<(Ref<OrbitRig>, &mut Transform), Without<PlanRig>>,
    mut sections: Query<
        (Ref<SectionRig>, &mut Transform, &mut Projection),
        (Without<PlanRig>, Without<OrbitRig>),
    >,
) {
    for (rig, mut transform, mut projection) in &mut plans {
        if rig.is_changed() {
            *transform = rig.transform();
            *projection = rig.projection();
        }
    }
    for (rig, mut transform) in &mut orbits {
        if rig.is_changed() {
            *transform = rig.transform();
        }
    }
    for (rig, mut transform, mut projection) in &mut sections {
        if rig.is_changed() {
            *transform = rig.transform();
            *projection = rig.projection();
        }
    }
}

/// Shows or hides transform gizmos in the perspective view.
pub fn apply_camera_layers(
    settings: Res<ViewSettings>,
    mut cameras: Query<(&EditorCamera, &mut RenderLayers)>,
) {
    if !settings.is_changed() {
        return;
    }
    for (camera, mut layers) in &mut cameras {
        let wanted = camera.view.camera_layers(&settings);
        if *layers != wanted {
            *layers = wanted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_splits_window_into_three_views() {
        let layout = ViewportLayout::for_window(Vec2::new(1000.0, 800.0));
        assert_eq!(layout.plan, Rect::new(0.0, 0.0, 600.0, 800.0));
        assert_eq!(layout.locate(Vec2::new(100.0, 700.0)).map(|(v, _)| v), Some(ViewKind::Plan));
        let (view, local) = layout.locate(Vec2::new(700.0, 100.0)).unwrap();
        assert_eq!(view, ViewKind::Perspective);
        assert_eq!(local, Vec2::new(100.0, 100.0));
        let (view, local) = layout.locate(Vec2::new(650.0, 500.0)).unwrap();
        assert_eq!(view, ViewKind::Section);
        assert_eq!(local, Vec2::new(50.0, 100.0));
        assert!(layout.locate(Vec2::new(-5.0, 10.0)).is_none());
    }

    #[test]
    fn orbit_starts_south_of_target_looking_north() {
        let rig = OrbitRig::default();
        let eye = rig.eye();
        assert!(eye.x.abs() < 1e-3);
        assert!(eye.z > 0.0 && eye.y > 0.0);
        assert!((eye.length() - PERSPECTIVE_INITIAL_RADIUS).abs() < 1e-3);
    }

    #[test]
    fn section_sides_cycle_through_all_four_corners() {
        let mut side = SectionSide::NorthEast;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(side);
            side = side.next();
        }
        assert_eq!(side, SectionSide::NorthEast);
        assert_eq!(seen.len(), 4);
        assert_eq!(SectionSide::NorthEast.previous(), SectionSide::NorthWest);

        let ne = SectionSide::NorthEast.direction();
        assert!(ne.x > 0.0 && ne.z < 0.0, "ne={:?}", ne);
        let sw = SectionSide::SouthWest.direction();
        assert!(sw.x < 0.0 && sw.z > 0.0, "sw={:?}", sw);
    }

    #[test]
    fn perspective_layers_follow_gizmo_toggle() {
        let mut settings = ViewSettings::default();
        let gizmos = RenderLayers::layer(TRANSFORM_GIZMO_LAYER);
        settings.show_3d_gizmos = false;
        assert!(!ViewKind::Perspective.camera_layers(&settings).intersects(&gizmos));
        settings.show_3d_gizmos = true;
        assert!(ViewKind::Perspective.camera_layers(&settings).intersects(&gizmos));
        assert!(ViewKind::Plan.camera_layers(&settings).intersects(&gizmos));
    }
}
