//! Annotation ("infopoint") handling: discovery over the loaded scene
//! graph, group visibility toggling, and per-frame billboard orientation.

pub mod billboard;
pub mod index;
pub mod visibility;
