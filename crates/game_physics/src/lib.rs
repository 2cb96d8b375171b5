//! game_physics: Rapier2D integration + the player controller.
//!
//! Responsibilities:
//! * Install Rapier with one fixed sub-step per frame and config-driven gravity.
//! * Give each new `Player` its dynamic body (fixed rotation, gravity scale, material).
//! * Translate key state into move impulses and a gated jump impulse.
//! * Contact listener feeding each player's `JumpGate`.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use game_core::{configure_stage_sets, ControlBindings, StageSet};

mod config;
pub mod controller;
mod systems;

pub use config::{PhysicsConfig, PlayerConfig};
pub use controller::{step_player, ControlInput, PlayerStep};
pub use systems::*;

/// Rapier + player controller. Reads `PhysicsConfig` if it was inserted before the plugin.
pub struct GamePhysicsPlugin;
impl Plugin for GamePhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PhysicsConfig>();
        let cfg = app.world().resource::<PhysicsConfig>().clone();

        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(
            cfg.length_unit(),
        ));
        // Overrides the plugin default: exactly one fixed step per frame.
        app.insert_resource(TimestepMode::Fixed {
            dt: cfg.timestep(),
            substeps: 1,
        });
        app.configure_sets(
            PostUpdate,
            StageSet::Contacts.after(PhysicsSet::Writeback),
        );
        app.add_plugins(PlayerControlPlugin)
            .add_systems(Update, apply_physics_config);
    }
}

/// Controller and contact systems without the Rapier plugin (headless tests install their own).
pub struct PlayerControlPlugin;
impl Plugin for PlayerControlPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerConfig>()
            .init_resource::<ControlBindings>()
            .add_event::<CollisionEvent>();
        configure_stage_sets(app);
        app.add_systems(
            Update,
            (attach_player_body, toggle_player_freeze, drive_player)
                .chain()
                .in_set(StageSet::Input),
        )
        .add_systems(PostUpdate, handle_contact_events.in_set(StageSet::Contacts));
    }
}
