//! Shared configuration for annotation discovery, camera motion and the
//! viewer's asset layout.

/// Sentinel prefix marking a scene node as an annotation ("infopoint") marker.
pub const MARKER_PREFIX: char = '!';

/// Scene asset containing the showcased model, its annotation markers and the
/// embedded presentation cameras.
pub const MODEL_ASSET_PATH: &str = "models/airburner_5p.glb";

/// JSON table mapping annotation ids to info markup fragments.
pub const INFO_ASSET_PATH: &str = "info/annotations.info.json";

/// Naming convention linking a camera node to its look-at node: a node named
/// `<camera>.Target` supplies the bookmark's target, world origin otherwise.
pub const BOOKMARK_TARGET_SUFFIX: &str = ".Target";

/// Scene node that yaws around +Y to face the camera instead of fully
/// billboarding.
pub const REFERENCE_FIGURE_NAME: &str = "ReferenceHuman_Object";

/// Exponential smoothing rate for camera transitions (per second). The decay
/// is parameterised by elapsed time, so motion is frame-rate independent.
pub const CAMERA_SMOOTHING_RATE: f32 = 6.0;

/// Distance below which a transitioning camera pose snaps onto its goal.
pub const CAMERA_SETTLE_EPSILON: f32 = 1e-3;

/// Minimum angular change (radians) in a billboard orientation that counts as
/// a visual update worth a redraw.
pub const BILLBOARD_EPSILON: f32 = 1e-4;

/// Markup shown when the content table has not loaded yet or has no entry for
/// an annotation.
pub const FALLBACK_INFO: &str = "<h3>No information available</h3>";

/// Vertical field of view assumed when the viewer camera exposes no
/// perspective projection to read.
pub const DEFAULT_FOV: f32 = std::f32::consts::PI / 3.0;
