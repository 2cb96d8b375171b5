//! Input -> impulse decisions for the player, free of ECS plumbing.

use bevy::prelude::*;
use game_core::controls::{any_just_pressed, any_pressed};
use game_core::{ControlBindings, JumpDirection, JumpGate, Player};

use crate::config::PlayerConfig;

/// Keyboard state relevant to the controller for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlInput {
    pub left: bool,
    pub right: bool,
    /// Edge triggered: true only on the frame the key went down.
    pub jump: bool,
}

impl ControlInput {
    pub fn read(keys: &ButtonInput<KeyCode>, bindings: &ControlBindings) -> Self {
        Self {
            left: any_pressed(keys, &bindings.left),
            right: any_pressed(keys, &bindings.right),
            jump: any_just_pressed(keys, &bindings.jump),
        }
    }
}

/// Outcome of one controller update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStep {
    pub sprite_origin: Vec2,
    /// Velocity change in px/s; the caller multiplies by body mass.
    pub delta_v: Vec2,
    pub jumped: Option<JumpDirection>,
}

/// Returns `None` while frozen: nothing is read and nothing is applied.
pub fn step_player(
    player: &Player,
    body_position: Vec2,
    linvel: Vec2,
    input: ControlInput,
    gate: &mut JumpGate,
    cfg: &PlayerConfig,
) -> Option<PlayerStep> {
    if player.frozen {
        return None;
    }
    let mut delta_v = Vec2::ZERO;
    let cap = cfg.max_run_speed;
    if input.left && (cap <= 0.0 || linvel.x > -cap) {
        delta_v.x -= cfg.move_impulse;
    }
    if input.right && (cap <= 0.0 || linvel.x < cap) {
        delta_v.x += cfg.move_impulse;
    }
    let jumped = if input.jump { gate.try_jump() } else { None };
    if let Some(dir) = jumped {
        delta_v.y += dir.sign() * cfg.jump_impulse;
    }
    Some(PlayerStep {
        sprite_origin: player.sprite_origin(body_position),
        delta_v,
        jumped,
    })
}
