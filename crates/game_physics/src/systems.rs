use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use game_core::controls::any_just_pressed;
use game_core::{ControlBindings, JumpGate, Player, SpriteOrigin, SurfaceTag};

use crate::config::{PhysicsConfig, PlayerConfig};
use crate::controller::{step_player, ControlInput};

const LOG_TARGET: &str = "physics";

/// Creates the player's rigid body once, when the `Player` component first appears.
pub fn attach_player_body(
    mut commands: Commands,
    cfg: Res<PlayerConfig>,
    players: Query<(Entity, &Player), (Added<Player>, Without<RigidBody>)>,
) {
    for (entity, player) in &players {
        commands.entity(entity).insert((
            RigidBody::Dynamic,
            Collider::cuboid(player.half_extents.x, player.half_extents.y),
            LockedAxes::ROTATION_LOCKED,
            ColliderMassProperties::Density(cfg.density),
            Friction::coefficient(cfg.friction),
            Restitution::coefficient(cfg.restitution),
            GravityScale(cfg.gravity_scale),
            ExternalImpulse::default(),
            ReadMassProperties::default(),
            Velocity::zero(),
            ActiveEvents::COLLISION_EVENTS,
            Sleeping::disabled(),
        ));
        debug!(target: LOG_TARGET, "attached player body to {entity:?}");
    }
}

/// Pushes `PhysicsConfig` gravity into the Rapier context (which may appear a frame late).
pub fn apply_physics_config(
    cfg: Res<PhysicsConfig>,
    mut contexts: Query<&mut RapierConfiguration>,
    mut done: Local<bool>,
) {
    if *done && !cfg.is_changed() {
        return;
    }
    let mut applied = false;
    for mut rapier in &mut contexts {
        rapier.gravity = Vect::from(cfg.gravity);
        applied = true;
    }
    if applied {
        *done = true;
        info!(
            target: LOG_TARGET,
            "gravity -> ({:.1}, {:.1})", cfg.gravity.x, cfg.gravity.y
        );
    }
}

pub fn toggle_player_freeze(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    bindings: Res<ControlBindings>,
    mut players: Query<&mut Player>,
) {
    let Some(keys) = keys else {
        return;
    };
    if !any_just_pressed(&keys, &bindings.freeze) {
        return;
    }
    for mut player in &mut players {
        player.toggle_frozen();
        info!(
            target: LOG_TARGET,
            "player {}", if player.frozen { "frozen" } else { "unfrozen" }
        );
    }
}

/// Rapier writes the mass back after the first step; until then use the cuboid's.
/// Rapier does not rescale by `pixels_per_meter`, so mass is density times area in px^2.
fn body_mass(mass: Option<&ReadMassProperties>, player: &Player, density: f32) -> f32 {
    mass.map(|m| m.mass)
        .filter(|m| *m > 0.0)
        .unwrap_or_else(|| density * 4.0 * player.half_extents.x * player.half_extents.y)
}

/// Per-frame controller update: sprite origin, move impulses, gated jump.
/// Impulses are the controller's velocity changes times body mass.
pub fn drive_player(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    bindings: Res<ControlBindings>,
    cfg: Res<PlayerConfig>,
    mut players: Query<(
        &Player,
        &Transform,
        &mut JumpGate,
        &mut SpriteOrigin,
        &mut ExternalImpulse,
        Option<&Velocity>,
        Option<&ReadMassProperties>,
    )>,
) {
    let input = keys
        .map(|k| ControlInput::read(&k, &bindings))
        .unwrap_or_default();
    for (player, transform, mut gate, mut origin, mut ext, vel, mass) in &mut players {
        let linvel = vel.map(|v| v.linvel).unwrap_or(Vec2::ZERO);
        let Some(step) = step_player(
            player,
            Player::position(transform),
            linvel,
            input,
            &mut gate,
            &cfg,
        ) else {
            continue;
        };
        origin.set_if_neq(SpriteOrigin(step.sprite_origin));
        if step.delta_v != Vec2::ZERO {
            ext.impulse += step.delta_v * body_mass(mass, player, cfg.density);
        }
        if let Some(dir) = step.jumped {
            debug!(target: LOG_TARGET, "jump {:?} delta_v={:?}", dir, step.delta_v);
        }
    }
}

/// Contact listener: every contact-begin involving a player updates that player's gate.
pub fn handle_contact_events(
    mut collisions: EventReader<CollisionEvent>,
    mut players: Query<&mut JumpGate, With<Player>>,
    surfaces: Query<&SurfaceTag>,
) {
    for ev in collisions.read() {
        let CollisionEvent::Started(a, b, _flags) = ev else {
            continue;
        };
        for (player, other) in [(*a, *b), (*b, *a)] {
            let Ok(mut gate) = players.get_mut(player) else {
                continue;
            };
            let tag = surfaces.get(other).ok().copied();
            gate.on_contact_begin(tag);
            debug!(
                target: LOG_TARGET,
                "contact {:?} tag={:?} -> can_jump={} inverted={}",
                other,
                tag,
                gate.can_jump,
                gate.inverted
            );
        }
    }
}
