pub mod bookmarks;
pub mod rig;
