//! island demo – generates a world and lets you fly over and edit it
//!
//! WASD pan · Q/E zoom · F1 chunk outlines · F2 stats · R regenerate
//! LMB place stone wall · RMB break top tile
//!
//! Optional first argument: world seed.

use std::sync::Arc;

use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use tile_isle::constants::*;
use tile_isle::{terrain_tileset, RenderDiagnostics, TileWorld, TilemapPlugin, WorldGen};

#[derive(Resource)]
struct Generator(WorldGen);

/* ------------------------------------------------------------------------ */
/* startup                                                                  */
/* ------------------------------------------------------------------------ */
fn setup_world(mut commands: Commands) {
    let (registry, tiles, atlas) = terrain_tileset();
    let generator = WorldGen::new(tiles, Arc::new(atlas), Arc::new(registry));

    let seed = std::env::args().nth(1).and_then(|s| s.parse::<u64>().ok());
    let world = generator.generate_world(DEMO_CHUNKS_X, DEMO_CHUNKS_Y, seed);

    let spawn = world.spawn_point;
    commands.spawn((Camera2d, Transform::from_xyz(spawn.x, -spawn.y, 100.0)));

    commands.insert_resource(world);
    commands.insert_resource(Generator(generator));
}

/* ------------------------------------------------------------------------ */
/* camera – WASD pan, Q/E zoom                                              */
/* ------------------------------------------------------------------------ */
fn camera_control_system(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut cam_q: Query<(&mut Transform, &mut OrthographicProjection), With<Camera2d>>,
) {
    let Ok((mut tf, mut proj)) = cam_q.get_single_mut() else { return };
    let dt = time.delta_secs();

    let mut dir = Vec2::ZERO;
    match (keys.pressed(KeyCode::KeyA), keys.pressed(KeyCode::KeyD)) {
        (true, false) => dir.x = -1.0,
        (false, true) => dir.x = 1.0,
        _ => {}
    }
    match (keys.pressed(KeyCode::KeyS), keys.pressed(KeyCode::KeyW)) {
        (true, false) => dir.y = -1.0,
        (false, true) => dir.y = 1.0,
        _ => {}
    }
    let step = dir.normalize_or_zero() * CAMERA_PAN_SPEED * proj.scale * dt;
    tf.translation.x += step.x;
    tf.translation.y += step.y;

    if keys.pressed(KeyCode::KeyQ) {
        proj.scale *= CAMERA_ZOOM_SPEED.powf(dt);
    }
    if keys.pressed(KeyCode::KeyE) {
        proj.scale /= CAMERA_ZOOM_SPEED.powf(dt);
    }
    proj.scale = proj.scale.clamp(0.25, 16.0);
}

/* ------------------------------------------------------------------------ */
/* F1 / F2 / R                                                              */
/* ------------------------------------------------------------------------ */
fn debug_keys_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut diag: ResMut<RenderDiagnostics>,
    mut world: ResMut<TileWorld>,
    generator: Res<Generator>,
) {
    if keys.just_pressed(KeyCode::F1) {
        diag.draw_chunk_outlines = !diag.draw_chunk_outlines;
    }
    if keys.just_pressed(KeyCode::F2) {
        info!(
            "seed {} · {} chunks drawn last frame · {}+{} chunks cached",
            world.seed,
            diag.rendered_chunks,
            world.base_layer.chunk_count(),
            world.top_layer.chunk_count(),
        );
    }
    if keys.just_pressed(KeyCode::KeyR) {
        generator.0.regenerate_world(&mut world, None);
    }
}

/* ------------------------------------------------------------------------ */
/* mouse editing on the top layer                                           */
/* ------------------------------------------------------------------------ */
fn edit_tiles_system(
    buttons: Res<ButtonInput<MouseButton>>,
    window_q: Query<&Window, With<PrimaryWindow>>,
    cam_q: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut world: ResMut<TileWorld>,
    generator: Res<Generator>,
) {
    let place = buttons.just_pressed(MouseButton::Left);
    let dig = buttons.just_pressed(MouseButton::Right);
    if !place && !dig {
        return;
    }

    let Ok(window) = window_q.get_single() else { return };
    let Ok((camera, cam_gt)) = cam_q.get_single() else { return };
    let Some(cursor) = window.cursor_position() else { return };
    let Ok(p) = camera.viewport_to_world_2d(cam_gt, cursor) else { return };

    // bevy is y‑up, the map is y‑down
    let (tx, ty) = world.top_layer.world_to_tile(Vec2::new(p.x, -p.y));

    if place {
        world.top_layer.set_tile(tx, ty, generator.0.tiles.stone_wall);
    } else {
        let drops = world.top_layer.destroy_tile(tx, ty, &mut rand::thread_rng());
        for (item, count) in drops {
            info!("tile ({tx}, {ty}) dropped {count}× item {}", item.0);
        }
    }
}

/* ------------------------------------------------------------------------ */
/* main                                                                     */
/* ------------------------------------------------------------------------ */
fn main() {
    App::new()
        /* diagnostics ----------------------------------------------------- */
        .add_plugins((
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin::default(),
        ))

        /* bevy core ------------------------------------------------------- */
        .insert_resource(ClearColor(Color::srgb(0.05, 0.12, 0.35)))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "tile_isle".into(),
                        resolution: (1280., 720.).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )

        /* tilemap --------------------------------------------------------- */
        .add_plugins(TilemapPlugin)

        .add_systems(Startup, setup_world)
        .add_systems(
            Update,
            (camera_control_system, debug_keys_system, edit_tiles_system)
                .run_if(resource_exists::<TileWorld>),
        )
        .run();
}
