use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;
use std::collections::HashMap;

use crate::constants::{BOOKMARK_TARGET_SUFFIX, MODEL_ASSET_PATH, REFERENCE_FIGURE_NAME};
use crate::engine::annotations::billboard::ReferenceFigure;
use crate::engine::annotations::index::{collect_annotations, AnnotationIndex};
use crate::engine::camera::bookmarks::{CameraBookmark, CameraBookmarks};
use crate::engine::camera::rig::{FitToSceneEvent, ViewerCamera};
use crate::engine::systems::redraw::RedrawFlag;

/// Tracks the spawned scene root and whether the one-shot post-spawn pass
/// has run yet.
#[derive(Resource, Default)]
pub struct ModelLoader {
    pub root: Option<Entity>,
    pub populated: bool,
}

pub fn spawn_model_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut loader: ResMut<ModelLoader>,
) {
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(MODEL_ASSET_PATH));
    let root = commands
        .spawn((SceneRoot(scene), Transform::default(), Visibility::default()))
        .id();
    loader.root = Some(root);
    info!("loading model scene from {MODEL_ASSET_PATH}");
}

/// One-shot pass over the freshly spawned scene graph: builds the
/// annotation index, harvests embedded cameras into bookmarks, tags the
/// scale-reference figure, and deactivates the embedded cameras so the
/// viewer camera keeps sole ownership of the screen. Finishes by issuing
/// an initial fit-to-scene so the model opens framed.
///
/// Polls until the scene root has children; the scene spawner populates
/// them asynchronously some frames after the handle loads.
#[allow(clippy::too_many_arguments)]
pub fn populate_scene_indices(
    mut commands: Commands,
    mut loader: ResMut<ModelLoader>,
    names: Query<&Name>,
    children: Query<&Children>,
    transforms: Query<&GlobalTransform>,
    camera_nodes: Query<(), With<Projection>>,
    mut embedded_cameras: Query<&mut Camera, Without<ViewerCamera>>,
    mut index: ResMut<AnnotationIndex>,
    mut bookmarks: ResMut<CameraBookmarks>,
    mut fit_events: EventWriter<FitToSceneEvent>,
    mut redraw: ResMut<RedrawFlag>,
) {
    if loader.populated {
        return;
    }
    let Some(root) = loader.root else {
        return;
    };
    if children.get(root).is_err() {
        return;
    }

    let mut named: HashMap<String, Entity> = HashMap::new();
    let mut camera_entities = Vec::new();
    for entity in children.iter_descendants(root) {
        if let Ok(name) = names.get(entity) {
            named.entry(name.as_str().to_owned()).or_insert(entity);
            if name.as_str() == REFERENCE_FIGURE_NAME {
                commands.entity(entity).insert(ReferenceFigure);
            }
        }
        if camera_nodes.get(entity).is_ok() {
            camera_entities.push(entity);
        }
    }

    index.publish(collect_annotations(root, &names, &children));

    let mut list = Vec::new();
    for entity in camera_entities {
        let Ok(transform) = transforms.get(entity) else {
            continue;
        };
        let target = names
            .get(entity)
            .ok()
            .and_then(|name| named.get(&format!("{}{BOOKMARK_TARGET_SUFFIX}", name.as_str())))
            .and_then(|target| transforms.get(*target).ok())
            .map_or(Vec3::ZERO, GlobalTransform::translation);
        list.push(CameraBookmark {
            position: transform.translation(),
            target,
        });
        if let Ok(mut camera) = embedded_cameras.get_mut(entity) {
            camera.is_active = false;
        }
    }
    bookmarks.publish(list);

    loader.populated = true;
    fit_events.write(FitToSceneEvent);
    redraw.request();
    info!(
        "scene populated: {} annotations, {} camera bookmarks",
        index.len(),
        bookmarks.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::camera::rig::CameraRig;

    fn populate_app() -> App {
        let mut app = App::new();
        app.init_resource::<ModelLoader>();
        app.init_resource::<AnnotationIndex>();
        app.init_resource::<CameraBookmarks>();
        app.init_resource::<RedrawFlag>();
        app.add_event::<FitToSceneEvent>();
        app.add_systems(Update, populate_scene_indices);
        app
    }

    fn spawn_scene(app: &mut App) -> Entity {
        let world = app.world_mut();
        let root = world.spawn(Name::new("Scene")).id();
        world.spawn((Name::new("!Burner"), ChildOf(root)));
        world.spawn((Name::new(REFERENCE_FIGURE_NAME), ChildOf(root)));
        world.spawn((
            Name::new("View1.Target"),
            GlobalTransform::from_translation(Vec3::new(0.0, 1.0, 0.0)),
            ChildOf(root),
        ));
        world.spawn((
            Name::new("View1"),
            Camera::default(),
            Projection::default(),
            GlobalTransform::from_translation(Vec3::new(0.0, 2.0, 8.0)),
            ChildOf(root),
        ));
        world.resource_mut::<ModelLoader>().root = Some(root);
        root
    }

    #[test]
    fn populate_builds_index_bookmarks_and_tags() {
        let mut app = populate_app();
        spawn_scene(&mut app);
        app.update();

        let index = app.world().resource::<AnnotationIndex>();
        assert!(index.is_built());
        assert_eq!(index.len(), 1);
        assert!(index.get("!Burner").is_some());

        let bookmarks = app.world().resource::<CameraBookmarks>();
        assert_eq!(bookmarks.len(), 1);
        let bookmark = bookmarks.get(0).unwrap();
        assert_eq!(bookmark.position, Vec3::new(0.0, 2.0, 8.0));
        assert_eq!(bookmark.target, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn embedded_cameras_are_deactivated() {
        let mut app = populate_app();
        spawn_scene(&mut app);
        app.update();

        let mut cameras = app.world_mut().query::<&Camera>();
        for camera in cameras.iter(app.world()) {
            assert!(!camera.is_active);
        }
    }

    #[test]
    fn reference_figure_gets_tagged() {
        let mut app = populate_app();
        spawn_scene(&mut app);
        app.update();

        let mut figures = app
            .world_mut()
            .query_filtered::<&Name, With<ReferenceFigure>>();
        let names: Vec<_> = figures.iter(app.world()).collect();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].as_str(), REFERENCE_FIGURE_NAME);
    }

    #[test]
    fn camera_without_target_node_looks_at_origin() {
        let mut app = populate_app();
        let world = app.world_mut();
        let root = world.spawn(Name::new("Scene")).id();
        world.spawn((
            Name::new("Orphan"),
            Camera::default(),
            Projection::default(),
            GlobalTransform::from_translation(Vec3::new(3.0, 3.0, 3.0)),
            ChildOf(root),
        ));
        world.resource_mut::<ModelLoader>().root = Some(root);
        app.update();

        let bookmarks = app.world().resource::<CameraBookmarks>();
        assert_eq!(bookmarks.get(0).unwrap().target, Vec3::ZERO);
    }

    #[test]
    fn population_issues_an_initial_fit() {
        let mut app = populate_app();
        spawn_scene(&mut app);
        app.update();
        assert_eq!(app.world().resource::<Events<FitToSceneEvent>>().len(), 1);

        // Steady-state frames do not keep re-fitting.
        app.update();
        app.update();
        assert!(app.world().resource::<Events<FitToSceneEvent>>().is_empty());
    }

    #[test]
    fn populate_runs_exactly_once() {
        let mut app = populate_app();
        let root = spawn_scene(&mut app);
        app.update();
        assert!(app.world().resource::<ModelLoader>().populated);

        // A marker added after population is not picked up.
        app.world_mut().spawn((Name::new("!Late"), ChildOf(root)));
        app.update();
        assert_eq!(app.world().resource::<AnnotationIndex>().len(), 1);
    }

    #[test]
    fn populate_waits_for_scene_children() {
        let mut app = populate_app();
        let root = app.world_mut().spawn(Name::new("Scene")).id();
        app.world_mut().resource_mut::<ModelLoader>().root = Some(root);
        app.update();
        assert!(!app.world().resource::<ModelLoader>().populated);
        assert!(!app.world().resource::<AnnotationIndex>().is_built());
    }

    #[test]
    fn bookmark_drives_the_rig_end_to_end() {
        let mut app = populate_app();
        spawn_scene(&mut app);
        app.update();

        let mut rig = CameraRig::default();
        app.world()
            .resource::<CameraBookmarks>()
            .apply(0, true, &mut rig)
            .unwrap();
        assert_eq!(rig.goal_position(), Vec3::new(0.0, 2.0, 8.0));
    }
}
