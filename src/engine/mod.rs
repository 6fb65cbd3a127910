pub mod annotations;
pub mod camera;
pub mod loading;
pub mod systems;
