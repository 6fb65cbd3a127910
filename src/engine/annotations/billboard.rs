use bevy::prelude::*;

use crate::constants::BILLBOARD_EPSILON;
use crate::engine::annotations::index::AnnotationIndex;
use crate::engine::camera::rig::ViewerCamera;
use crate::engine::systems::redraw::RedrawFlag;

/// Scale-reference figure that keeps its feet planted: it yaws towards the
/// camera but never pitches or rolls.
#[derive(Component)]
pub struct ReferenceFigure;

/// Turns every annotation marker to face the camera each frame, plus the
/// yaw-only reference figure. The facing is computed in world space and
/// composed back through the parent's world rotation before it lands in the
/// node's local transform, so markers nested under rotated grouping nodes
/// face the camera too. Rotations already within tolerance are left alone
/// so a still camera produces no redraw churn.
pub fn orient_billboards(
    index: Res<AnnotationIndex>,
    cameras: Query<&GlobalTransform, With<ViewerCamera>>,
    figures: Query<Entity, With<ReferenceFigure>>,
    parents: Query<&ChildOf>,
    globals: Query<&GlobalTransform>,
    mut nodes: Query<(&GlobalTransform, &mut Transform), Without<ViewerCamera>>,
    mut redraw: ResMut<RedrawFlag>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };
    let camera_position = camera.translation();
    let mut changed = false;

    for annotation in index.iter() {
        let parent_rotation = parent_world_rotation(annotation.marker, &parents, &globals);
        let Ok((global, mut transform)) = nodes.get_mut(annotation.marker) else {
            continue;
        };
        let desired_world = Transform::from_translation(global.translation())
            .looking_at(camera_position, Vec3::Y)
            .rotation;
        let desired = parent_rotation.inverse() * desired_world;
        if transform.rotation.angle_between(desired) > BILLBOARD_EPSILON {
            transform.rotation = desired;
            changed = true;
        }
    }

    for figure in figures.iter() {
        let parent_rotation = parent_world_rotation(figure, &parents, &globals);
        let Ok((global, mut transform)) = nodes.get_mut(figure) else {
            continue;
        };
        let forward = camera_position - global.translation();
        if Vec2::new(forward.x, forward.z).length_squared() < f32::EPSILON {
            // Camera directly overhead, yaw is undefined.
            continue;
        }
        let desired_world = Quat::from_rotation_y(forward.x.atan2(forward.z));
        let desired = parent_rotation.inverse() * desired_world;
        if transform.rotation.angle_between(desired) > BILLBOARD_EPSILON {
            transform.rotation = desired;
            changed = true;
        }
    }

    if changed {
        redraw.request();
    }
}

/// World rotation of a node's parent, identity for root-level nodes.
fn parent_world_rotation(
    entity: Entity,
    parents: &Query<&ChildOf>,
    globals: &Query<&GlobalTransform>,
) -> Quat {
    parents
        .get(entity)
        .ok()
        .and_then(|child_of| globals.get(child_of.parent()).ok())
        .map_or(Quat::IDENTITY, GlobalTransform::rotation)
}
