use bevy::prelude::*;
use bevy::render::primitives::Aabb;

use crate::engine::annotations::index::{is_marker_name, AnnotationIndex};
use crate::engine::camera::rig::ViewerCamera;
use crate::engine::loading::content::InfoContent;
use crate::engine::systems::redraw::RedrawFlag;
use crate::tools::ray::ray_hits_obb;

/// A world-space pick ray, decoupled from the windowing layer so the pick
/// path is testable headless.
#[derive(Event, Debug, Clone, Copy)]
pub struct PickRequest {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Outcome of a pick: the selected annotation id, or None for a miss.
/// Every pick produces exactly one of these.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    pub id: Option<String>,
}

/// Info panel container, hidden while nothing is selected.
#[derive(Component)]
pub struct InfoPanel;

/// The text node inside the info panel.
#[derive(Component)]
pub struct InfoPanelText;

/// Converts a primary click under the cursor into a world-space pick ray.
pub fn emit_pick_on_click(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform), With<ViewerCamera>>,
    mut requests: EventWriter<PickRequest>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };
    requests.write(PickRequest {
        origin: ray.origin,
        direction: ray.direction.as_vec3(),
    });
}

/// Tests the pick ray against the bounds of every node under every
/// annotation marker, keeps the nearest hit, and resolves it back to its
/// marker ancestor. Markers stay pickable while hidden, matching the
/// toggle's role as a visual declutter rather than an interaction filter.
pub fn process_pick_requests(
    mut requests: EventReader<PickRequest>,
    index: Res<AnnotationIndex>,
    children: Query<&Children>,
    parents: Query<&ChildOf>,
    names: Query<&Name>,
    geometry: Query<(&GlobalTransform, &Aabb)>,
    mut selections: EventWriter<SelectionChanged>,
) {
    for request in requests.read() {
        if !index.is_built() {
            selections.write(SelectionChanged { id: None });
            continue;
        }

        let mut nearest: Option<(f32, Entity)> = None;
        for annotation in index.iter() {
            let candidates =
                std::iter::once(annotation.marker).chain(children.iter_descendants(annotation.marker));
            for entity in candidates {
                let Ok((transform, aabb)) = geometry.get(entity) else {
                    continue;
                };
                let Some(distance) = ray_hits_obb(request.origin, request.direction, transform, aabb)
                else {
                    continue;
                };
                if distance > 0.0 && nearest.is_none_or(|(best, _)| distance < best) {
                    nearest = Some((distance, entity));
                }
            }
        }

        let id = nearest.and_then(|(_, entity)| {
            let resolved = resolve_marker_ancestor(entity, &parents, &names);
            if resolved.is_none() {
                warn!("pick hit an unindexed node, discarding");
            }
            resolved
        });
        debug!("pick resolved to {id:?}");
        selections.write(SelectionChanged { id });
    }
}

/// Walks up from a hit node to the nearest marker-named ancestor. The hit
/// geometry itself counts if it carries the marker name.
pub fn resolve_marker_ancestor(
    entity: Entity,
    parents: &Query<&ChildOf>,
    names: &Query<&Name>,
) -> Option<String> {
    let mut node = entity;
    loop {
        if let Ok(name) = names.get(node) {
            if is_marker_name(name.as_str()) {
                return Some(name.as_str().to_owned());
            }
        }
        node = parents.get(node).ok().map(ChildOf::parent)?;
    }
}

/// Mirrors selection results into the info panel: show the resolved body
/// text on a hit, hide the panel on a miss.
pub fn update_info_panel(
    mut selections: EventReader<SelectionChanged>,
    content: Res<InfoContent>,
    mut panels: Query<&mut Visibility, With<InfoPanel>>,
    mut texts: Query<&mut Text, With<InfoPanelText>>,
    mut redraw: ResMut<RedrawFlag>,
) {
    for selection in selections.read() {
        match &selection.id {
            Some(id) => {
                if let Ok(mut text) = texts.single_mut() {
                    text.0 = content.resolve(id).to_owned();
                }
                if let Ok(mut visibility) = panels.single_mut() {
                    *visibility = Visibility::Visible;
                }
            }
            None => {
                if let Ok(mut visibility) = panels.single_mut() {
                    *visibility = Visibility::Hidden;
                }
            }
        }
        redraw.request();
    }
}
