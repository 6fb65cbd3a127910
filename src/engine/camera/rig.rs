use bevy::prelude::*;
use bevy::render::primitives::Aabb;

use crate::constants::{CAMERA_SETTLE_EPSILON, CAMERA_SMOOTHING_RATE, DEFAULT_FOV};
use crate::engine::loading::model::ModelLoader;
use crate::engine::systems::redraw::RedrawFlag;

/// Marker for the interactive viewer camera, as opposed to cameras embedded
/// in the loaded asset (those only serve as bookmarks).
#[derive(Component)]
pub struct ViewerCamera;

/// Command: frame the whole scene's bounding sphere.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct FitToSceneEvent;

/// Damped camera transition state.
///
/// Two states: settled (pose equals goal, ticks are free) and transitioning
/// (exponential approach to the goal pose, parameterised by elapsed time so
/// motion is frame-rate independent). Retargeting mid-flight replaces the
/// goal and continues from the current interpolated pose, so there is never
/// a visible discontinuity. Within the settle epsilon the pose snaps exactly
/// onto the goal to avoid residual drift.
#[derive(Resource, Debug, Clone)]
pub struct CameraRig {
    position: Vec3,
    target: Vec3,
    goal_position: Vec3,
    goal_target: Vec3,
    settled: bool,
}

impl Default for CameraRig {
    fn default() -> Self {
        let position = Vec3::new(0.0, 5.0, 10.0);
        let target = Vec3::ZERO;
        Self {
            position,
            target,
            goal_position: position,
            goal_target: target,
            settled: false,
        }
    }
}

impl CameraRig {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn goal_position(&self) -> Vec3 {
        self.goal_position
    }

    pub fn goal_target(&self) -> Vec3 {
        self.goal_target
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Sets a new goal pose. `animate: false` jumps straight there; the next
    /// tick still reports an update so the jump reaches the screen.
    pub fn set_look_at(&mut self, position: Vec3, target: Vec3, animate: bool) {
        self.goal_position = position;
        self.goal_target = target;
        if !animate {
            self.position = position;
            self.target = target;
        }
        self.settled = false;
    }

    /// Frames `radius` around `center` at the given perspective, keeping the
    /// current viewing direction. The smaller of the vertical and horizontal
    /// half-angles is used so the sphere fits on both axes.
    pub fn fit_to_sphere(&mut self, center: Vec3, radius: f32, fov_y: f32, aspect: f32, animate: bool) {
        let half_vertical = (fov_y * 0.5).max(1e-3);
        let half_horizontal = (half_vertical.tan() * aspect.max(1e-3)).atan();
        let half = half_vertical.min(half_horizontal);
        let distance = radius.max(1e-3) / half.sin();
        let direction = (self.position - self.target)
            .try_normalize()
            .unwrap_or(Vec3::new(0.0, 0.35, 1.0).normalize());
        self.set_look_at(center + direction * distance, center, animate);
    }

    /// Advances the transition by `delta_secs` and reports whether the pose
    /// needs re-rendering. Settled rigs return false without touching
    /// anything; negative or non-finite deltas are rejected.
    pub fn tick(&mut self, delta_secs: f32) -> bool {
        if self.settled {
            return false;
        }
        if !delta_secs.is_finite() || delta_secs < 0.0 {
            return false;
        }
        let alpha = if delta_secs > 0.0 {
            1.0 - (-CAMERA_SMOOTHING_RATE * delta_secs).exp()
        } else {
            0.0
        };
        self.position = self.position.lerp(self.goal_position, alpha);
        self.target = self.target.lerp(self.goal_target, alpha);
        if self.position.distance(self.goal_position) <= CAMERA_SETTLE_EPSILON
            && self.target.distance(self.goal_target) <= CAMERA_SETTLE_EPSILON
        {
            self.position = self.goal_position;
            self.target = self.goal_target;
            self.settled = true;
        }
        true
    }
}

/// Advances the transition each frame and mirrors the rig pose into the
/// viewer camera's transform. The tick result is the camera-side redraw
/// signal.
pub fn advance_camera_rig(
    time: Res<Time>,
    mut rig: ResMut<CameraRig>,
    mut cameras: Query<&mut Transform, With<ViewerCamera>>,
    mut redraw: ResMut<RedrawFlag>,
) {
    if !rig.tick(time.delta_secs()) {
        return;
    }
    if let Ok(mut transform) = cameras.single_mut() {
        *transform = Transform::from_translation(rig.position()).looking_at(rig.target(), Vec3::Y);
    }
    redraw.request();
}

/// Frames the loaded model only: the bounding sphere is taken over the
/// model subtree, so viewer furniture like the ground plane never inflates
/// the fit.
pub fn handle_fit_to_scene(
    mut events: EventReader<FitToSceneEvent>,
    loader: Res<ModelLoader>,
    children: Query<&Children>,
    geometry: Query<(&GlobalTransform, &Aabb)>,
    projections: Query<&Projection, With<ViewerCamera>>,
    mut rig: ResMut<CameraRig>,
) {
    for _ in events.read() {
        let Some(root) = loader.root else {
            warn!("fit-to-scene ignored: no model spawned");
            continue;
        };
        let model_bounds = std::iter::once(root)
            .chain(children.iter_descendants(root))
            .filter_map(|entity| geometry.get(entity).ok());
        let Some((center, radius)) = scene_bounding_sphere(model_bounds) else {
            warn!("fit-to-scene ignored: no bounded geometry loaded");
            continue;
        };
        let (fov, aspect) = match projections.single() {
            Ok(Projection::Perspective(perspective)) => (perspective.fov, perspective.aspect_ratio),
            _ => (DEFAULT_FOV, 16.0 / 9.0),
        };
        rig.fit_to_sphere(center, radius, fov, aspect, true);
        info!("fitting camera to scene, radius {radius:.2}");
    }
}

const BOX_CORNERS: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
];

/// Sphere around the union of the world-space bounds of every
/// geometry-bearing node. None when nothing bounded has loaded yet.
pub fn scene_bounding_sphere<'a>(
    bounds: impl Iterator<Item = (&'a GlobalTransform, &'a Aabb)>,
) -> Option<(Vec3, f32)> {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    let mut any = false;
    for (transform, aabb) in bounds {
        any = true;
        let center = Vec3::from(aabb.center);
        let half = Vec3::from(aabb.half_extents);
        for corner in BOX_CORNERS {
            let world = transform.transform_point(center + corner * half);
            min = min.min(world);
            max = max.max(world);
        }
    }
    any.then(|| {
        let center = (min + max) * 0.5;
        let radius = (max - center).length().max(1e-3);
        (center, radius)
    })
}
