use bevy::prelude::*;

use crate::{JumpGate, Player, SpriteOrigin, StageEntity};

/// Gameplay side of the player. Physics components are attached by `game_physics` when it sees `Added<Player>`.
#[derive(Bundle)]
pub struct PlayerBundle {
    pub name: Name,
    pub player: Player,
    pub gate: JumpGate,
    pub sprite_origin: SpriteOrigin,
    pub stage: StageEntity,
    pub transform: Transform,
    pub global_transform: GlobalTransform,
}

impl PlayerBundle {
    pub fn new(start: Vec2, size: Vec2) -> Self {
        let player = Player::new(size);
        let transform = Transform::from_translation(start.extend(0.0));
        Self {
            name: Name::new("Player"),
            player,
            gate: JumpGate::default(),
            sprite_origin: SpriteOrigin(player.sprite_origin(start)),
            stage: StageEntity,
            transform,
            global_transform: GlobalTransform::from(transform),
        }
    }
}
