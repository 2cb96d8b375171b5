//! Real Rapier simulation: a player dropped on tagged surfaces, jumping and walking.

use bevy::prelude::*;
use bevy::time::Virtual;
use bevy_rapier2d::prelude::*;
use game_core::{JumpGate, PlayerBundle, SurfaceTag};
use game_physics::{GamePhysicsPlugin, PhysicsConfig};

fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(TransformPlugin);
    app.init_resource::<ButtonInput<KeyCode>>();
    app.add_plugins(GamePhysicsPlugin);
    app.finish();
    app.cleanup();
    app
}

fn spawn_surface(app: &mut App, center: Vec2, half: Vec2, tag: SurfaceTag) -> Entity {
    let transform = Transform::from_translation(center.extend(0.0));
    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y),
            tag,
        ))
        .id()
}

fn tick(app: &mut App) {
    let timestep = std::time::Duration::from_secs_f64(1.0 / 60.0);
    app.world_mut()
        .resource_mut::<Time<Virtual>>()
        .advance_by(timestep);
    app.update();
}

fn run_until(app: &mut App, frames: usize, mut done: impl FnMut(&App) -> bool) -> bool {
    for _ in 0..frames {
        tick(app);
        if done(app) {
            return true;
        }
    }
    false
}

#[test]
fn landing_on_floor_opens_gate() {
    let mut app = create_test_app();
    spawn_surface(&mut app, Vec2::ZERO, Vec2::new(200.0, 5.0), SurfaceTag::Floor);
    let player = app
        .world_mut()
        .spawn(PlayerBundle::new(Vec2::new(0.0, 60.0), Vec2::splat(32.0)))
        .id();

    let landed = run_until(&mut app, 240, |app| {
        app.world().get::<JumpGate>(player).is_some_and(|g| g.can_jump)
    });
    assert!(landed, "player never touched the floor");
    let gate = app.world().get::<JumpGate>(player).unwrap();
    assert!(!gate.inverted);

    let y = app.world().get::<Transform>(player).unwrap().translation.y;
    assert!(y < 60.0, "player should have fallen, y={y}");
}

#[test]
fn landing_on_wall_keeps_gate_closed() {
    let mut app = create_test_app();
    spawn_surface(&mut app, Vec2::ZERO, Vec2::new(200.0, 5.0), SurfaceTag::Wall);
    let player = app
        .world_mut()
        .spawn(PlayerBundle::new(Vec2::new(0.0, 60.0), Vec2::splat(32.0)))
        .id();

    let fallen = run_until(&mut app, 240, |app| {
        app.world()
            .get::<Transform>(player)
            .is_some_and(|t| t.translation.y < 30.0)
    });
    assert!(fallen, "player never reached the surface");
    for _ in 0..10 {
        tick(&mut app);
    }
    assert!(!app.world().get::<JumpGate>(player).unwrap().can_jump);
}

fn press(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
}

fn release_all(app: &mut App) {
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release_all();
    keys.clear();
}

fn position(app: &App, player: Entity) -> Vec2 {
    app.world()
        .get::<Transform>(player)
        .unwrap()
        .translation
        .truncate()
}

fn land(app: &mut App, player: Entity) {
    let landed = run_until(app, 240, |app| {
        app.world().get::<JumpGate>(player).is_some_and(|g| g.can_jump)
    });
    assert!(landed, "player never touched the floor");
    // settle so the body rests on the floor
    for _ in 0..20 {
        tick(app);
    }
}

#[test]
fn jump_lifts_player_well_above_the_floor() {
    let mut app = create_test_app();
    spawn_surface(&mut app, Vec2::ZERO, Vec2::new(400.0, 5.0), SurfaceTag::Floor);
    let player = app
        .world_mut()
        .spawn(PlayerBundle::new(Vec2::new(0.0, 40.0), Vec2::splat(32.0)))
        .id();
    land(&mut app, player);
    let rest = position(&app, player).y;

    press(&mut app, KeyCode::Space);
    tick(&mut app);
    release_all(&mut app);
    let mut apex = rest;
    for _ in 0..60 {
        tick(&mut app);
        apex = apex.max(position(&app, player).y);
    }
    // default tuning reaches about 400 px; several body heights is plenty
    assert!(apex - rest > 3.0 * 32.0, "jump rose only {}", apex - rest);
    assert!(!app.world().get::<JumpGate>(player).unwrap().inverted);
}

#[test]
fn holding_move_key_walks_along_the_floor() {
    let mut app = create_test_app();
    spawn_surface(&mut app, Vec2::ZERO, Vec2::new(800.0, 5.0), SurfaceTag::Floor);
    let player = app
        .world_mut()
        .spawn(PlayerBundle::new(Vec2::new(0.0, 40.0), Vec2::splat(32.0)))
        .id();
    land(&mut app, player);
    let start = position(&app, player);

    press(&mut app, KeyCode::KeyD);
    for _ in 0..30 {
        tick(&mut app);
    }
    let moved = position(&app, player) - start;
    assert!(moved.x > 32.0, "walked only {} px", moved.x);
    assert!(moved.y.abs() < 8.0, "left the floor while walking: dy={}", moved.y);
    let speed = app.world().get::<Velocity>(player).unwrap().linvel.x;
    assert!(speed <= 360.0 + 60.0, "run speed cap ignored: {speed}");

    release_all(&mut app);
    press(&mut app, KeyCode::KeyA);
    let turn = position(&app, player).x;
    for _ in 0..60 {
        tick(&mut app);
    }
    assert!(position(&app, player).x < turn, "never turned back");
}

#[test]
fn non_positive_length_unit_still_simulates() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(TransformPlugin)
        .init_resource::<ButtonInput<KeyCode>>()
        .insert_resource(PhysicsConfig {
            pixels_per_meter: 0.0,
            ..Default::default()
        })
        .add_plugins(GamePhysicsPlugin);
    app.finish();
    app.cleanup();
    spawn_surface(&mut app, Vec2::ZERO, Vec2::new(200.0, 5.0), SurfaceTag::Floor);
    let player = app
        .world_mut()
        .spawn(PlayerBundle::new(Vec2::new(0.0, 60.0), Vec2::splat(32.0)))
        .id();
    land(&mut app, player);
    assert!(position(&app, player).y < 60.0);
}
