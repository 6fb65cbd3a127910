//! Interactive viewer tools: click-to-inspect picking over annotation
//! geometry, and keyboard navigation across camera bookmarks, annotation
//! toggling and scene fit.

pub mod inspect;
pub mod navigation;
pub mod ray;
