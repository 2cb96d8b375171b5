use bevy::prelude::*;
use bevy_rapier2d::prelude::GravityScale;
use game_core::{
    ActiveStage, EndGate, Fragment, ObjectiveAcquired, ObjectiveBlock, Player, Region,
    StageCompleted, StageHud, StageProgress, StageRequest,
};
use game_physics::PlayerConfig;

use crate::config::StageConfig;
use crate::loader::PendingStageChange;
use crate::script::{ActiveScript, StageAction, StageActionQueue, StageContext};

const LOG_TARGET: &str = "stage";

/// Carries an acquired objective with the player, or picks it up when the player enters it.
pub fn evaluate_objective(
    cfg: Res<StageConfig>,
    active: Res<ActiveStage>,
    mut progress: ResMut<StageProgress>,
    players: Query<&Transform, (With<Player>, Without<ObjectiveBlock>)>,
    mut objectives: Query<(&mut Region, &mut Transform), With<ObjectiveBlock>>,
    mut acquired: EventWriter<ObjectiveAcquired>,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let pos = Player::position(player);
    if progress.objective_acquired {
        let carried = pos + Vec2::from(cfg.carry_offset);
        for (mut region, mut transform) in &mut objectives {
            region.center_on(carried);
            transform.translation.x = carried.x;
            transform.translation.y = carried.y;
        }
        return;
    }
    let inside = objectives.iter().any(|(region, _)| region.contains(pos));
    if progress.acquire_objective(inside) {
        info!(target: LOG_TARGET, "objective acquired in '{}'", active.id);
        acquired.write(ObjectiveAcquired {
            stage_id: active.id.clone(),
        });
    }
}

/// Completes the stage once, when the player reaches the goal holding the objective.
pub fn evaluate_goal(
    active: Res<ActiveStage>,
    mut progress: ResMut<StageProgress>,
    players: Query<&Transform, With<Player>>,
    gates: Query<&Region, With<EndGate>>,
    script: Res<ActiveScript>,
    mut queue: ResMut<StageActionQueue>,
    mut completed: EventWriter<StageCompleted>,
) {
    if progress.complete {
        return;
    }
    let Ok(player) = players.single() else {
        return;
    };
    let pos = Player::position(player);
    let in_goal = gates.iter().any(|gate| gate.contains(pos));
    if !progress.try_complete(in_goal) {
        return;
    }
    info!(target: LOG_TARGET, "stage '{}' complete", active.id);
    completed.write(StageCompleted {
        stage_id: active.id.clone(),
    });
    let ctx = StageContext {
        stage_id: &active.id,
        progress: *progress,
    };
    queue.0.extend(script.0.end_stage(&ctx));
}

/// Reports the fragment under the player (lowest id on overlap) to the stage script.
pub fn evaluate_fragments(
    active: Res<ActiveStage>,
    progress: Res<StageProgress>,
    players: Query<&Transform, With<Player>>,
    fragments: Query<(&Fragment, &Region)>,
    script: Res<ActiveScript>,
    mut queue: ResMut<StageActionQueue>,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let pos = Player::position(player);
    let current = fragments
        .iter()
        .filter(|(_, region)| region.contains(pos))
        .map(|(fragment, _)| fragment.id)
        .min();
    let ctx = StageContext {
        stage_id: &active.id,
        progress: *progress,
    };
    queue.0.extend(script.0.fragment_collision(current, &ctx));
}

pub fn apply_stage_actions(
    mut queue: ResMut<StageActionQueue>,
    mut hud: ResMut<StageHud>,
    player_cfg: Res<PlayerConfig>,
    mut bodies: Query<&mut GravityScale, With<Player>>,
    mut pending: ResMut<PendingStageChange>,
    mut requests: EventWriter<StageRequest>,
    mut exit: EventWriter<AppExit>,
) {
    for action in queue.0.drain(..) {
        match action {
            StageAction::ShowEffect(label) => {
                hud.set_if_neq(StageHud {
                    effect: Some(label),
                });
            }
            StageAction::ClearEffect => {
                hud.set_if_neq(StageHud { effect: None });
            }
            StageAction::SetGravityScale(scale) => set_gravity_scale(&mut bodies, scale),
            StageAction::ResetGravityScale => {
                set_gravity_scale(&mut bodies, player_cfg.gravity_scale)
            }
            StageAction::LoadStage { id, delay_secs } => {
                info!(target: LOG_TARGET, "next stage '{id}' in {delay_secs:.2}s");
                request_change(&mut pending, &mut requests, StageRequest::Load(id), delay_secs);
            }
            StageAction::Restart => {
                request_change(&mut pending, &mut requests, StageRequest::Restart, 0.0)
            }
            StageAction::Exit => {
                info!(target: LOG_TARGET, "stage script requested exit");
                exit.write(AppExit::Success);
            }
        }
    }
}

fn set_gravity_scale(bodies: &mut Query<&mut GravityScale, With<Player>>, scale: f32) {
    for mut g in bodies.iter_mut() {
        if g.0 != scale {
            g.0 = scale;
        }
    }
}

fn request_change(
    pending: &mut PendingStageChange,
    requests: &mut EventWriter<StageRequest>,
    request: StageRequest,
    delay_secs: f32,
) {
    if delay_secs > 0.0 {
        pending.schedule(request, delay_secs);
    } else {
        requests.write(request);
    }
}
