use bevy::prelude::*;
use thiserror::Error;

use crate::engine::camera::rig::CameraRig;

/// One stored camera pose, harvested from a camera node embedded in the
/// loaded asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBookmark {
    pub position: Vec3,
    pub target: Vec3,
}

/// Command: move the viewer camera to the bookmark at `index`.
#[derive(Event, Debug, Clone, Copy)]
pub struct BookmarkNavigationEvent {
    pub index: i32,
    pub animate: bool,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BookmarkError {
    #[error("bookmark index {index} out of range (0..{count})")]
    OutOfRange { index: i32, count: usize },
}

/// Bookmark list in asset authoring order, published once when the scene
/// finishes spawning.
#[derive(Resource, Default)]
pub struct CameraBookmarks {
    list: Vec<CameraBookmark>,
}

impl CameraBookmarks {
    pub fn publish(&mut self, list: Vec<CameraBookmark>) {
        self.list = list;
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, index: i32) -> Result<&CameraBookmark, BookmarkError> {
        usize::try_from(index)
            .ok()
            .and_then(|slot| self.list.get(slot))
            .ok_or(BookmarkError::OutOfRange {
                index,
                count: self.list.len(),
            })
    }

    /// Validates `index` and retargets the rig. Rejected indices leave the
    /// rig untouched.
    pub fn apply(&self, index: i32, animate: bool, rig: &mut CameraRig) -> Result<(), BookmarkError> {
        let bookmark = self.get(index)?;
        rig.set_look_at(bookmark.position, bookmark.target, animate);
        Ok(())
    }
}

pub fn handle_bookmark_navigation(
    mut events: EventReader<BookmarkNavigationEvent>,
    bookmarks: Res<CameraBookmarks>,
    mut rig: ResMut<CameraRig>,
) {
    for event in events.read() {
        match bookmarks.apply(event.index, event.animate, &mut rig) {
            Ok(()) => info!("navigating to camera bookmark {}", event.index),
            Err(err) => warn!("bookmark navigation rejected: {err}"),
        }
    }
}
