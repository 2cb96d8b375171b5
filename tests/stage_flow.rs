//! Stage controller behaviour across crates, without a physics backend.
//! Player movement is driven by writing the body transform directly.

use bevy::prelude::*;
use bevy_rapier2d::prelude::{CollisionEvent, ExternalImpulse};
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;
use game_core::{
    FragmentId, GameCorePlugin, JumpGate, Player, StageCompleted, StageProgress, SurfaceTag,
};
use game_physics::PlayerControlPlugin;
use stage::{
    StageAction, StageAppExt, StageCatalog, StageContext, StageFile, StagePlugin, StageScript,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const STAGE: &str = r#"(
    version: 1,
    name: "flow",
    player_start: (x: 40.0, y: 40.0),
    end_gate: (x: 800.0, y: 0.0, w: 100.0, h: 100.0),
    objective: (x: 400.0, y: 0.0, w: 40.0, h: 40.0),
    surfaces: [ (rect: (x: 0.0, y: 0.0, w: 1000.0, h: 20.0), tag: Some(Floor)) ],
)"#;

#[derive(Clone, Default)]
struct CountingScript {
    ends: Arc<AtomicUsize>,
}

impl StageScript for CountingScript {
    fn end_stage(&self, _ctx: &StageContext) -> Vec<StageAction> {
        self.ends.fetch_add(1, Ordering::SeqCst);
        Vec::new()
    }

    fn fragment_collision(&self, _f: Option<FragmentId>, _ctx: &StageContext) -> Vec<StageAction> {
        Vec::new()
    }
}

fn create_app(script: Option<CountingScript>) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .init_resource::<ButtonInput<KeyCode>>()
        .insert_resource(StageCatalog::from_stages([(
            "flow".to_string(),
            StageFile::from_ron_str(STAGE).unwrap(),
        )]))
        .add_plugins((GameCorePlugin, PlayerControlPlugin, StagePlugin));
    if let Some(script) = script {
        app.register_stage_script("flow", script);
    }
    app.update();
    app
}

fn player(app: &mut App) -> Entity {
    let mut q = app.world_mut().query_filtered::<Entity, With<Player>>();
    q.single(app.world()).unwrap()
}

fn place_player(app: &mut App, at: Vec2) {
    let e = player(app);
    let mut tf = app.world_mut().get_mut::<Transform>(e).unwrap();
    tf.translation = at.extend(0.0);
}

fn progress(app: &App) -> StageProgress {
    *app.world().resource::<StageProgress>()
}

#[test]
fn goal_without_objective_never_completes() {
    let ends = CountingScript::default();
    let mut app = create_app(Some(ends.clone()));
    // jump over the objective and land in the goal
    for at in [(100.0, 40.0), (300.0, 200.0), (420.0, 240.0), (600.0, 120.0), (850.0, 40.0)] {
        place_player(&mut app, Vec2::from(at));
        app.update();
    }
    for _ in 0..5 {
        app.update();
    }
    assert!(!progress(&app).objective_acquired);
    assert!(!progress(&app).complete);
    assert_eq!(ends.ends.load(Ordering::SeqCst), 0);
}

#[test]
fn objective_then_goal_ten_frames_later_completes_once() {
    let script = CountingScript::default();
    let mut app = create_app(Some(script.clone()));

    place_player(&mut app, Vec2::new(420.0, 20.0));
    app.update();
    assert!(progress(&app).objective_acquired);
    assert!(!progress(&app).complete);

    // nine frames on the way to the goal
    for i in 1..10 {
        place_player(&mut app, Vec2::new(420.0 + i as f32 * 40.0, 60.0));
        app.update();
        assert!(!progress(&app).complete, "completed early at frame {i}");
    }
    place_player(&mut app, Vec2::new(850.0, 50.0));
    app.update();
    assert!(progress(&app).complete);
    assert_eq!(script.ends.load(Ordering::SeqCst), 1);

    // staying in the goal, or leaving and re-entering, never fires again
    for x in [850.0, 600.0, 850.0] {
        place_player(&mut app, Vec2::new(x, 50.0));
        app.update();
    }
    assert!(progress(&app).complete);
    assert!(progress(&app).objective_acquired);
    assert_eq!(script.ends.load(Ordering::SeqCst), 1);
}

#[test]
fn completion_event_carries_stage_id() {
    let mut app = create_app(None);
    place_player(&mut app, Vec2::new(420.0, 20.0));
    app.update();
    place_player(&mut app, Vec2::new(850.0, 50.0));
    app.update();

    let events = app.world().resource::<Events<StageCompleted>>();
    let mut cursor = events.get_cursor();
    let got: Vec<_> = cursor.read(events).cloned().collect();
    assert_eq!(
        got,
        vec![StageCompleted {
            stage_id: "flow".into()
        }]
    );
}

#[test]
fn floor_contact_from_stage_surface_allows_upward_jump() {
    let mut app = create_app(None);
    let p = player(&mut app);

    let mut q = app.world_mut().query::<(Entity, &SurfaceTag)>();
    let floor = q
        .iter(app.world())
        .find(|(_, tag)| **tag == SurfaceTag::Floor)
        .map(|(e, _)| e)
        .unwrap();

    app.world_mut().send_event(CollisionEvent::Started(
        p,
        floor,
        CollisionEventFlags::empty(),
    ));
    app.update();
    assert_eq!(
        *app.world().get::<JumpGate>(p).unwrap(),
        JumpGate {
            can_jump: true,
            inverted: false
        }
    );
    app.world_mut()
        .get_mut::<ExternalImpulse>(p)
        .unwrap()
        .impulse = Vec2::ZERO;

    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::Space);
    app.update();
    // 32x32 body at density 1
    let impulse = app.world().get::<ExternalImpulse>(p).unwrap().impulse;
    assert_eq!(impulse / 1024.0, Vec2::new(0.0, 1400.0));
}
