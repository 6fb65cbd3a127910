use bevy::prelude::*;

use crate::engine::annotations::visibility::ToggleAnnotationsEvent;
use crate::engine::camera::bookmarks::BookmarkNavigationEvent;
use crate::engine::camera::rig::FitToSceneEvent;

/// Digit row 1-9, mapped to bookmark slots 0-8.
const BOOKMARK_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

pub fn keyboard_navigation(
    keys: Res<ButtonInput<KeyCode>>,
    mut bookmark_events: EventWriter<BookmarkNavigationEvent>,
    mut toggle_events: EventWriter<ToggleAnnotationsEvent>,
    mut fit_events: EventWriter<FitToSceneEvent>,
) {
    for (slot, key) in BOOKMARK_KEYS.iter().enumerate() {
        if keys.just_pressed(*key) {
            bookmark_events.write(BookmarkNavigationEvent {
                index: slot as i32,
                animate: true,
            });
        }
    }
    if keys.just_pressed(KeyCode::KeyT) {
        toggle_events.write(ToggleAnnotationsEvent);
    }
    if keys.just_pressed(KeyCode::KeyF) {
        fit_events.write(FitToSceneEvent);
    }
}
