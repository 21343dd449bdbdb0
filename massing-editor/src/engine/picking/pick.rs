use bevy::prelude::*;
use bevy::render::view::RenderLayers;

use super::ray::ray_hits_obb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickKind {
    /// Manipulation handle. Wins over any body behind or in front of it.
    Gizmo,
    Body,
}

/// Local-space box used for ray picking.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PickBounds {
    pub size: Vec3,
    pub offset: Vec3,
    pub kind: PickKind,
}

impl PickBounds {
    pub fn new(size: Vec3, offset: Vec3, kind: PickKind) -> Self {
        Self { size, offset, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub entity: Entity,
    pub distance: f32,
    pub kind: PickKind,
}

pub type Pickables<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static GlobalTransform,
        &'static PickBounds,
        Option<&'static RenderLayers>,
        Option<&'static Visibility>,
    ),
>;

/// Nearest pickable under the ray that the camera can see and `accept` allows.
/// Any gizmo hit is preferred over body hits.
pub fn pick<'a>(
    ray: Ray3d,
    camera_layers: &RenderLayers,
    candidates: impl IntoIterator<
        Item = (
            Entity,
            &'a GlobalTransform,
            &'a PickBounds,
            Option<&'a RenderLayers>,
            Option<&'a Visibility>,
        ),
    >,
    mut accept: impl FnMut(Entity, &PickBounds) -> bool,
) -> Option<PickHit> {
    let mut best_gizmo: Option<PickHit> = None;
    let mut best_body: Option<PickHit> = None;

    for (entity, xf, bounds, layers, visibility) in candidates {
        if visibility == Some(&Visibility::Hidden) {
            continue;
        }
        let layers = layers.cloned().unwrap_or_default();
        if !camera_layers.intersects(&layers) || !accept(entity, bounds) {
            continue;
        }
        let Some(distance) = ray_hits_obb(ray, xf, bounds.size, bounds.offset) else {
            continue;
        };
        let slot = match bounds.kind {
            PickKind::Gizmo => &mut best_gizmo,
            PickKind::Body => &mut best_body,
        };
        if slot.is_none_or(|hit| distance < hit.distance) {
            *slot = Some(PickHit { entity, distance, kind: bounds.kind });
        }
    }

    best_gizmo.or(best_body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(kind: PickKind) -> PickBounds {
        PickBounds::new(Vec3::ONE, Vec3::ZERO, kind)
    }

    #[test]
    fn gizmo_wins_over_nearer_body() {
        let body_xf = GlobalTransform::from_xyz(0.0, 5.0, 0.0);
        let gizmo_xf = GlobalTransform::from_xyz(0.0, 1.0, 0.0);
        let body = unit(PickKind::Body);
        let gizmo = unit(PickKind::Gizmo);
        let layers = RenderLayers::layer(1);
        let ray = Ray3d::new(Vec3::new(0.0, 20.0, 0.0), Dir3::NEG_Y);

        let candidates = [
            (Entity::from_raw(1), &body_xf, &body, Some(&layers), None),
            (Entity::from_raw(2), &gizmo_xf, &gizmo, Some(&layers), None),
        ];
        let hit = pick(ray, &layers, candidates, |_, _| true).unwrap();
        assert_eq!(hit.entity, Entity::from_raw(2));
        assert_eq!(hit.kind, PickKind::Gizmo);
    }

    #[test]
    fn camera_layers_hidden_entities_and_predicate_filter_hits() {
        let xf = GlobalTransform::IDENTITY;
        let body = unit(PickKind::Body);
        let plan = RenderLayers::layer(1);
        let section = RenderLayers::layer(3);
        let ray = Ray3d::new(Vec3::new(0.0, 20.0, 0.0), Dir3::NEG_Y);

        let only_section = [(Entity::from_raw(1), &xf, &body, Some(&section), None)];
        assert!(pick(ray, &plan, only_section, |_, _| true).is_none());

        let hidden = Visibility::Hidden;
        let hidden_body = [(Entity::from_raw(1), &xf, &body, Some(&plan), Some(&hidden))];
        assert!(pick(ray, &plan, hidden_body, |_, _| true).is_none());

        let visible = [(Entity::from_raw(1), &xf, &body, Some(&plan), None)];
        assert!(pick(ray, &plan, visible, |_, b| b.kind == PickKind::Gizmo).is_none());
        assert!(pick(ray, &plan, visible, |_, _| true).is_some());
    }

    #[test]
    fn nearest_body_wins() {
        let near_xf = GlobalTransform::from_xyz(0.0, 4.0, 0.0);
        let far_xf = GlobalTransform::from_xyz(0.0, 0.0, 0.0);
        let body = unit(PickKind::Body);
        let layers = RenderLayers::layer(2);
        let ray = Ray3d::new(Vec3::new(0.0, 20.0, 0.0), Dir3::NEG_Y);
        let candidates = [
            (Entity::from_raw(1), &far_xf, &body, Some(&layers), None),
            (Entity::from_raw(2), &near_xf, &body, Some(&layers), None),
        ];
        let hit = pick(ray, &layers, candidates, |_, _| true).unwrap();
        assert_eq!(hit.entity, Entity::from_raw(2));
        assert!((hit.distance - 15.5).abs() < 1e-4);
    }
}
