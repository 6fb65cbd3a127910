use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::WinitSettings;
use bevy_common_assets::json::JsonAssetPlugin;

mod constants;
mod engine;
mod tools;

use engine::annotations::billboard::orient_billboards;
use engine::annotations::index::AnnotationIndex;
use engine::annotations::visibility::{apply_annotation_toggle, ToggleAnnotationsEvent};
use engine::camera::bookmarks::{handle_bookmark_navigation, BookmarkNavigationEvent, CameraBookmarks};
use engine::camera::rig::{advance_camera_rig, handle_fit_to_scene, CameraRig, FitToSceneEvent, ViewerCamera};
use engine::loading::content::{
    load_info_content, publish_info_content, InfoContent, InfoContentLoader, InfoContentSource,
};
use engine::loading::model::{populate_scene_indices, spawn_model_scene, ModelLoader};
use engine::systems::redraw::{flush_redraw, RedrawFlag};
use tools::inspect::{
    emit_pick_on_click, process_pick_requests, update_info_panel, InfoPanel, InfoPanelText,
    PickRequest, SelectionChanged,
};
use tools::navigation::keyboard_navigation;

/// Frame order: poll loading, gather input, apply commands, move the
/// camera, face the billboards, then flush the redraw flag last so every
/// change made this frame reaches the window.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
enum ViewerSet {
    Loading,
    Input,
    Commands,
    Camera,
    Billboard,
    Redraw,
}

fn main() {
    create_app().run();
}

fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(JsonAssetPlugin::<InfoContentSource>::new(&["info.json"]))
        .insert_resource(WinitSettings::desktop_app());

    app.init_resource::<ModelLoader>()
        .init_resource::<InfoContentLoader>()
        .init_resource::<InfoContent>()
        .init_resource::<AnnotationIndex>()
        .init_resource::<CameraBookmarks>()
        .init_resource::<CameraRig>()
        .init_resource::<RedrawFlag>()
        .add_event::<PickRequest>()
        .add_event::<SelectionChanged>()
        .add_event::<BookmarkNavigationEvent>()
        .add_event::<ToggleAnnotationsEvent>()
        .add_event::<FitToSceneEvent>()
        .configure_sets(
            Update,
            (
                ViewerSet::Loading,
                ViewerSet::Input,
                ViewerSet::Commands,
                ViewerSet::Camera,
                ViewerSet::Billboard,
                ViewerSet::Redraw,
            )
                .chain(),
        )
        .add_systems(Startup, (setup, spawn_model_scene, load_info_content))
        .add_systems(
            Update,
            (
                (populate_scene_indices, publish_info_content).in_set(ViewerSet::Loading),
                (emit_pick_on_click, keyboard_navigation).in_set(ViewerSet::Input),
                (
                    process_pick_requests,
                    apply_annotation_toggle,
                    handle_bookmark_navigation,
                    handle_fit_to_scene,
                    update_info_panel,
                )
                    .chain()
                    .in_set(ViewerSet::Commands),
                advance_camera_rig.in_set(ViewerSet::Camera),
                orient_billboards.in_set(ViewerSet::Billboard),
                flush_redraw.in_set(ViewerSet::Redraw),
            ),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(Window {
            title: "Annotated Model Viewer".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn setup(
    mut commands: Commands,
    rig: Res<CameraRig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        ViewerCamera,
        Camera3d::default(),
        Transform::from_translation(rig.position()).looking_at(rig.target(), Vec3::Y),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });
    spawn_lighting(&mut commands);
    spawn_ground(&mut commands, &mut meshes, &mut materials);
    spawn_ui(&mut commands);
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(12.0, 12.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.35, 0.38),
            perceptual_roughness: 0.95,
            ..default()
        })),
    ));
}

fn spawn_ui(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("1-9: camera views  T: toggle infopoints  F: fit to scene"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
            ));

            parent
                .spawn((
                    InfoPanel,
                    Node {
                        position_type: PositionType::Absolute,
                        bottom: Val::Px(12.0),
                        left: Val::Percent(5.0),
                        width: Val::Percent(90.0),
                        padding: UiRect::all(Val::Px(10.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.9)),
                    Visibility::Hidden,
                ))
                .with_children(|panel| {
                    panel.spawn((
                        InfoPanelText,
                        Text::new(""),
                        TextFont {
                            font_size: 15.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.1, 0.1, 0.1)),
                    ));
                });
        });
}
