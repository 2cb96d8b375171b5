//! stage: stage files, the stage loader, per-frame objective/goal/fragment
//! evaluation and the per-stage hooks.
//!
//! Frame flow (see `game_core::system_order`):
//! * `PreUpdate`: pending `StageRequest`s rebuild the stage.
//! * `Update`: restart key.
//! * `PostUpdate` / `StageSet::Evaluate`: objective, goal, fragments, then the
//!   actions the hooks returned.

use bevy::prelude::*;
use game_core::{ControlBindings, GameCorePlugin, StageSet};
use game_physics::PlayerConfig;

pub mod config;
pub mod layout;
pub mod loader;
pub mod overlay;
pub mod registry;
pub mod script;
pub mod systems;

pub use config::{StageConfig, WorldConfig};
pub use layout::{CompletionDef, FragmentEffectDef, StageFile};
pub use loader::{MapSurface, PendingStageChange, StageSelection};
pub use overlay::StagePresentationPlugin;
pub use registry::{StageCatalog, StageRegistry};
pub use script::{
    ActiveScript, DataStageScript, StageAction, StageActionQueue, StageAppExt, StageContext,
    StageScript, StageScripts,
};

use loader::{handle_restart_key, process_stage_requests, request_initial_stage, tick_pending_stage_change};
use systems::{apply_stage_actions, evaluate_fragments, evaluate_goal, evaluate_objective};

/// Stage logic without rendering. Insert a `StageCatalog` first to skip reading `StageConfig::stages_dir`.
pub struct StagePlugin;

impl Plugin for StagePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<GameCorePlugin>() {
            app.add_plugins(GameCorePlugin);
        }
        app.init_resource::<StageConfig>()
            .init_resource::<WorldConfig>()
            .init_resource::<StageSelection>()
            .init_resource::<StageScripts>()
            .init_resource::<ActiveScript>()
            .init_resource::<StageActionQueue>()
            .init_resource::<PendingStageChange>()
            .init_resource::<PlayerConfig>()
            .init_resource::<ControlBindings>()
            .add_systems(Startup, request_initial_stage)
            .add_systems(PreUpdate, process_stage_requests)
            .add_systems(Update, handle_restart_key.in_set(StageSet::Input))
            .add_systems(
                PostUpdate,
                (
                    evaluate_objective,
                    evaluate_goal,
                    evaluate_fragments,
                    apply_stage_actions,
                    tick_pending_stage_change,
                )
                    .chain()
                    .in_set(StageSet::Evaluate),
            );
    }
}
