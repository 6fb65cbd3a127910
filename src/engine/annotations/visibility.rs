use bevy::prelude::*;

use crate::engine::annotations::index::AnnotationIndex;
use crate::engine::systems::redraw::RedrawFlag;

/// Command: flip the visibility of every annotation marker as a group.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ToggleAnnotationsEvent;

/// Group toggle with any-visible semantics: if at least one marker is
/// visible the whole group hides, otherwise the whole group shows. A mixed
/// state therefore collapses to uniform on the first toggle.
pub fn apply_annotation_toggle(
    mut events: EventReader<ToggleAnnotationsEvent>,
    index: Res<AnnotationIndex>,
    mut visibilities: Query<&mut Visibility>,
    mut redraw: ResMut<RedrawFlag>,
) {
    for _ in events.read() {
        if index.is_empty() {
            debug!("annotation toggle ignored: no markers indexed");
            continue;
        }
        let any_visible = index.iter().any(|annotation| {
            visibilities
                .get(annotation.marker)
                .is_ok_and(|visibility| *visibility != Visibility::Hidden)
        });
        let next = if any_visible {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };
        for annotation in index.iter() {
            if let Ok(mut visibility) = visibilities.get_mut(annotation.marker) {
                *visibility = next;
            }
        }
        info!("annotation markers now {next:?}");
        redraw.request();
    }
}
