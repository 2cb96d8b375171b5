use bevy::prelude::*;
use bevy_rapier2d::prelude::{Collider, RigidBody};
use game_core::controls::any_just_pressed;
use game_core::{
    ActiveStage, ControlBindings, EndGate, Fragment, ObjectiveBlock, PlayerBundle, RectDef, Region,
    StageEntity, StageHud, StageProgress, StageRequest, SurfaceTag,
};
use game_physics::PlayerConfig;

use crate::config::{StageConfig, WorldConfig};
use crate::layout::StageFile;
use crate::registry::StageCatalog;
use crate::script::{ActiveScript, StageActionQueue, StageScripts};

const LOG_TARGET: &str = "stage";
const GROUND_HALF_THICKNESS: f32 = 1.0;

/// Static map geometry; `size` is the full collider extent.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MapSurface {
    pub size: Vec2,
}

/// Stage id asked for on the command line or through the environment.
#[derive(Resource, Debug, Default, Clone)]
pub struct StageSelection {
    pub requested: Option<String>,
}

/// A stage change waiting for its delay to run out.
#[derive(Resource, Debug, Default)]
pub struct PendingStageChange(pub Option<(StageRequest, Timer)>);

impl PendingStageChange {
    pub fn schedule(&mut self, request: StageRequest, delay_secs: f32) {
        self.0 = Some((request, Timer::from_seconds(delay_secs, TimerMode::Once)));
    }

    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }
}

/// Startup: resolve the first stage and request it. Loads the catalog from disk if none was inserted.
pub fn request_initial_stage(
    mut commands: Commands,
    catalog: Option<Res<StageCatalog>>,
    cfg: Res<StageConfig>,
    selection: Res<StageSelection>,
    mut requests: EventWriter<StageRequest>,
) {
    let requested = selection.requested.as_deref();
    let (id, warning) = match catalog.as_deref() {
        Some(catalog) => catalog.select(requested, &cfg.default_stage),
        None => match StageCatalog::load_dir(&cfg.stages_dir) {
            Ok(catalog) => {
                let picked = catalog.select(requested, &cfg.default_stage);
                commands.insert_resource(catalog);
                picked
            }
            Err(e) => {
                error!(target: LOG_TARGET, "no stages available: {e}");
                return;
            }
        },
    };
    if let Some(w) = warning {
        warn!(target: LOG_TARGET, "{w}");
    }
    info!(
        target: LOG_TARGET,
        "requested={:?} configured='{}' selected stage '{}'", requested, cfg.default_stage, id
    );
    requests.write(StageRequest::Load(id));
}

/// Rebuilds the stage for the newest request of the frame. Unknown ids keep the current stage.
#[allow(clippy::too_many_arguments)]
pub fn process_stage_requests(
    mut commands: Commands,
    mut requests: EventReader<StageRequest>,
    catalog: Option<Res<StageCatalog>>,
    scripts: Res<StageScripts>,
    world_cfg: Res<WorldConfig>,
    player_cfg: Res<PlayerConfig>,
    mut active: ResMut<ActiveStage>,
    mut progress: ResMut<StageProgress>,
    mut hud: ResMut<StageHud>,
    mut pending: ResMut<PendingStageChange>,
    mut queue: ResMut<StageActionQueue>,
    stage_entities: Query<Entity, With<StageEntity>>,
) {
    let Some(request) = requests.read().last().cloned() else {
        return;
    };
    let id = match request {
        StageRequest::Load(id) => id,
        StageRequest::Restart => active.id.clone(),
    };
    let Some(file) = catalog.as_deref().and_then(|c| c.get(&id)) else {
        error!(
            target: LOG_TARGET,
            "stage '{}' is not loaded; staying on '{}'", id, active.id
        );
        return;
    };

    for entity in &stage_entities {
        commands.entity(entity).despawn();
    }
    *progress = StageProgress::default();
    hud.effect = None;
    pending.0 = None;
    queue.0.clear();
    commands.insert_resource(ActiveScript(scripts.resolve(&id, file)));
    spawn_stage(&mut commands, file, &world_cfg, &player_cfg);

    info!(
        target: LOG_TARGET,
        "{} stage '{}' ({})",
        if active.id == id { "restarted" } else { "loaded" },
        id,
        file.name
    );
    active.id = id;
}

/// Spawns every entity of a stage, each tagged `StageEntity`.
pub fn spawn_stage(
    commands: &mut Commands,
    file: &StageFile,
    world: &WorldConfig,
    player: &PlayerConfig,
) {
    if file.ground {
        spawn_surface(
            commands,
            "Ground",
            Vec2::new(world.width * 0.5, -GROUND_HALF_THICKNESS),
            Vec2::new(world.width, GROUND_HALF_THICKNESS),
            None,
        );
    }
    for (i, surface) in file.surfaces.iter().enumerate() {
        if surface.rect.is_degenerate() {
            continue;
        }
        let rect = Rect::from(surface.rect);
        spawn_surface(
            commands,
            &format!("Surface {i}"),
            rect.center(),
            rect.half_size(),
            surface.tag,
        );
    }
    spawn_region(commands, "End Gate", EndGate, file.end_gate);
    spawn_region(commands, "Objective", ObjectiveBlock, file.objective);
    for fragment in &file.fragments {
        spawn_region(
            commands,
            &format!("Fragment {}", fragment.id),
            Fragment { id: fragment.id },
            fragment.area,
        );
    }
    commands.spawn(PlayerBundle::new(file.player_start(), player.size.into()));
}

fn spawn_surface(
    commands: &mut Commands,
    name: &str,
    center: Vec2,
    half: Vec2,
    tag: Option<SurfaceTag>,
) {
    let transform = Transform::from_translation(center.extend(0.0));
    let mut entity = commands.spawn((
        Name::new(name.to_string()),
        StageEntity,
        MapSurface { size: half * 2.0 },
        RigidBody::Fixed,
        Collider::cuboid(half.x, half.y),
        transform,
        GlobalTransform::from(transform),
    ));
    if let Some(tag) = tag {
        entity.insert(tag);
    }
}

fn spawn_region<M: Component>(commands: &mut Commands, name: &str, marker: M, rect: RectDef) {
    let region = Region(rect.into());
    let transform = Transform::from_translation(region.center().extend(1.0));
    commands.spawn((
        Name::new(name.to_string()),
        StageEntity,
        marker,
        region,
        transform,
        GlobalTransform::from(transform),
    ));
}

pub fn handle_restart_key(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    bindings: Res<ControlBindings>,
    mut requests: EventWriter<StageRequest>,
) {
    let Some(keys) = keys else {
        return;
    };
    if any_just_pressed(&keys, &bindings.restart) {
        debug!(target: LOG_TARGET, "restart key");
        requests.write(StageRequest::Restart);
    }
}

pub fn tick_pending_stage_change(
    time: Res<Time>,
    mut pending: ResMut<PendingStageChange>,
    mut requests: EventWriter<StageRequest>,
) {
    let Some((request, timer)) = pending.0.as_mut() else {
        return;
    };
    if timer.tick(time.delta()).finished() {
        requests.write(request.clone());
        pending.0 = None;
    }
}
