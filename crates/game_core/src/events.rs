use bevy::prelude::*;

/// Fired once, on the frame the player first enters the objective region.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ObjectiveAcquired {
    pub stage_id: String,
}

/// Fired once per stage run when the goal is reached with the objective in hand.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct StageCompleted {
    pub stage_id: String,
}

/// Ask the stage loader to (re)build a stage.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum StageRequest {
    Load(String),
    Restart,
}
