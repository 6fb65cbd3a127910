use bevy::prelude::*;
use bevy::render::primitives::Aabb;

/// Ray versus oriented box: a node's local-space `Aabb` carried through its
/// world transform. Returns the hit distance along the ray, if any.
pub fn ray_hits_obb(
    origin: Vec3,
    direction: Vec3,
    transform: &GlobalTransform,
    aabb: &Aabb,
) -> Option<f32> {
    let inverse = transform.compute_matrix().inverse();
    let local_origin = inverse.transform_point3(origin);
    let local_direction = inverse.transform_vector3(direction);
    let center = Vec3::from(aabb.center);
    let half = Vec3::from(aabb.half_extents);
    ray_aabb_hit(local_origin, local_direction, center - half, center + half)
}

/// Slab-method ray/AABB intersection. Rays starting inside the box report
/// the exit distance; boxes fully behind the origin miss.
pub fn ray_aabb_hit(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < f32::EPSILON {
            // Parallel to this slab: either always inside it or never.
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut near = (min[axis] - o) * inv;
        let mut far = (max[axis] - o) * inv;
        if near > far {
            std::mem::swap(&mut near, &mut far);
        }
        t_enter = t_enter.max(near);
        t_exit = t_exit.min(far);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}
