//! game_core: ECS types shared by the physics and stage crates.

use bevy::prelude::*;

pub mod bundles;
pub mod components;
pub mod controls;
pub mod events;
pub mod jump_gate;
pub mod math;
pub mod resources;
pub mod system_order;

pub use bundles::*;
pub use components::*;
pub use controls::{ControlBindings, ControlsConfig};
pub use events::*;
pub use jump_gate::{JumpDirection, JumpGate};
pub use math::{RectDef, Vec2Def};
pub use resources::*;
pub use system_order::{configure_stage_sets, StageSet};

pub struct GameCorePlugin;
impl Plugin for GameCorePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ObjectiveAcquired>()
            .add_event::<StageCompleted>()
            .add_event::<StageRequest>()
            .init_resource::<StageProgress>()
            .init_resource::<ActiveStage>()
            .init_resource::<StageHud>()
            .init_resource::<ControlBindings>();
        configure_stage_sets(app);
    }
}
