use bevy::prelude::*;
use bevy::render::camera::CameraProjection;
use constants::interaction::GROUND_PARALLEL_EPSILON;

/// Builds the world-space ray under a viewport-local pointer position.
///
/// The projection is recomputed from a clone for the given viewport size, so
/// the result does not depend on whether the renderer has caught up with a
/// resize or zoom this frame.
pub fn pointer_ray(
    local: Vec2,
    viewport_size: Vec2,
    projection: &Projection,
    camera_transform: &Transform,
) -> Option<Ray3d> {
    if viewport_size.x <= 0.0 || viewport_size.y <= 0.0 {
        return None;
    }
    let mut projection = projection.clone();
    projection.update(viewport_size.x, viewport_size.y);
    let world_from_ndc =
        camera_transform.compute_matrix() * projection.get_clip_from_view().inverse();

    let ndc = Vec2::new(
        local.x / viewport_size.x * 2.0 - 1.0,
        1.0 - local.y / viewport_size.y * 2.0,
    );
    // Reverse-Z: the near plane sits at depth 1.
    let near = world_from_ndc.project_point3(ndc.extend(1.0));
    let far = world_from_ndc.project_point3(ndc.extend(f32::EPSILON));
    if !near.is_finite() || !far.is_finite() {
        return None;
    }
    let direction = Dir3::new(far - near).ok()?;
    Some(Ray3d::new(near, direction))
}

/// Intersection with the ground plane `y = 0`.
pub fn ground_hit(ray: Ray3d) -> Option<Vec3> {
    let dir = *ray.direction;
    if dir.y.abs() < GROUND_PARALLEL_EPSILON {
        return None;
    }
    let t = -ray.origin.y / dir.y;
    if t < 0.0 {
        return None;
    }
    Some(ray.origin + dir * t)
}

/// Projects a world point into viewport-local logical pixels.
pub fn world_to_viewport(
    world: Vec3,
    viewport_size: Vec2,
    projection: &Projection,
    camera_transform: &Transform,
) -> Option<Vec2> {
    let mut projection = projection.clone();
    projection.update(viewport_size.x, viewport_size.y);
    let clip = projection.get_clip_from_view()
        * camera_transform.compute_matrix().inverse()
        * world.extend(1.0);
    if clip.w.abs() <= f32::EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    if !(0.0..=1.0).contains(&ndc.z) {
        return None;
    }
    Some(Vec2::new(
        (ndc.x + 1.0) / 2.0 * viewport_size.x,
        (1.0 - ndc.y) / 2.0 * viewport_size.y,
    ))
}

/// Distance along the ray to an oriented box, or `None` on a miss.
///
/// `size` and `offset` are in the entity's local frame; the transform's scale
/// applies to both.
pub fn ray_hits_obb(ray: Ray3d, xf: &GlobalTransform, size: Vec3, offset: Vec3) -> Option<f32> {
    let local_from_world = xf.compute_matrix().inverse();
    let origin = local_from_world.transform_point3(ray.origin) - offset;
    let direction = local_from_world.transform_vector3(*ray.direction);
    let half = size * 0.5;
    ray_aabb_hit_t(origin, direction, -half, half)
}

/// Slab test against an axis-aligned box. Returns the entry distance, or the
/// exit distance when the origin is inside.
pub fn ray_aabb_hit_t(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let (o, d) = (origin[axis], direction[axis]);
        if d == 0.0 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let (mut t0, mut t1) = ((min[axis] - o) / d, (max[axis] - o) / d);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}

#[cfg(test)]
mod tests {
    use bevy::render::camera::ScalingMode;

    use super::*;

    const EPS: f32 = 1e-3;

    fn plan_camera() -> (Projection, Transform) {
        let projection = Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedHorizontal { viewport_width: 40.0 },
            far: 10_000.0,
            ..OrthographicProjection::default_3d()
        });
        let transform = Transform::from_xyz(5.0, 100.0, -3.0)
            .looking_at(Vec3::new(5.0, 0.0, -3.0), Vec3::NEG_Z);
        (projection, transform)
    }

    fn perspective_camera() -> (Projection, Transform) {
        let transform = Transform::from_xyz(0.0, 30.0, 40.0).looking_at(Vec3::ZERO, Vec3::Y);
        (Projection::Perspective(PerspectiveProjection::default()), transform)
    }

    #[test]
    fn plan_center_hits_camera_target() {
        let (projection, transform) = plan_camera();
        let size = Vec2::new(800.0, 600.0);
        let ray = pointer_ray(size / 2.0, size, &projection, &transform).unwrap();
        let hit = ground_hit(ray).unwrap();
        assert!((hit - Vec3::new(5.0, 0.0, -3.0)).length() < EPS, "hit={:?}", hit);
    }

    #[test]
    fn plan_right_edge_is_half_the_view_width_east() {
        let (projection, transform) = plan_camera();
        let size = Vec2::new(800.0, 600.0);
        let ray = pointer_ray(Vec2::new(800.0, 300.0), size, &projection, &transform).unwrap();
        let hit = ground_hit(ray).unwrap();
        assert!((hit.x - 25.0).abs() < EPS, "hit={:?}", hit);
        assert!((hit.z + 3.0).abs() < EPS);
    }

    #[test]
    fn perspective_center_ray_passes_through_target() {
        let (projection, transform) = perspective_camera();
        let size = Vec2::new(640.0, 480.0);
        let ray = pointer_ray(size / 2.0, size, &projection, &transform).unwrap();
        let hit = ground_hit(ray).unwrap();
        assert!(hit.length() < EPS, "hit={:?}", hit);
    }

    #[test]
    fn world_to_viewport_inverts_pointer_ray() {
        let (projection, transform) = perspective_camera();
        let size = Vec2::new(640.0, 480.0);
        let pointer = Vec2::new(200.0, 330.0);
        let ray = pointer_ray(pointer, size, &projection, &transform).unwrap();
        let hit = ground_hit(ray).unwrap();
        let back = world_to_viewport(hit, size, &projection, &transform).unwrap();
        assert!((back - pointer).length() < 0.5, "back={:?}", back);
    }

    #[test]
    fn parallel_or_backward_rays_miss_ground() {
        let flat = Ray3d::new(Vec3::new(0.0, 5.0, 0.0), Dir3::X);
        assert!(ground_hit(flat).is_none());
        let up = Ray3d::new(Vec3::new(0.0, 5.0, 0.0), Dir3::Y);
        assert!(ground_hit(up).is_none());
    }

    #[test]
    fn obb_hit_respects_rotation_scale_and_offset() {
        let xf = GlobalTransform::from(
            Transform::from_xyz(10.0, 0.0, 0.0)
                .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4))
                .with_scale(Vec3::new(2.0, 1.0, 2.0)),
        );
        let down = Ray3d::new(Vec3::new(10.0, 50.0, 0.0), Dir3::NEG_Y);
        let t = ray_hits_obb(down, &xf, Vec3::ONE, Vec3::new(0.0, 0.5, 0.0)).unwrap();
        assert!((t - 49.0).abs() < EPS, "t={}", t);

        // 0.9 east of the centre lies inside only because of the scale.
        let near_edge = Ray3d::new(Vec3::new(10.9, 50.0, 0.0), Dir3::NEG_Y);
        assert!(ray_hits_obb(near_edge, &xf, Vec3::ONE, Vec3::ZERO).is_some());
        let outside = Ray3d::new(Vec3::new(12.0, 50.0, 0.0), Dir3::NEG_Y);
        assert!(ray_hits_obb(outside, &xf, Vec3::ONE, Vec3::ZERO).is_none());
    }

    #[test]
    fn origin_inside_box_reports_exit() {
        let t = ray_aabb_hit_t(Vec3::ZERO, Vec3::X, Vec3::splat(-1.0), Vec3::splat(1.0)).unwrap();
        assert!((t - 1.0).abs() < EPS);
    }
}
