use bevy::prelude::*;

/// Progress of the running stage. Both flags only ever go from false to true until the stage is reloaded.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StageProgress {
    pub objective_acquired: bool,
    pub complete: bool,
}

impl StageProgress {
    /// Returns true on the frame the objective becomes acquired.
    pub fn acquire_objective(&mut self, player_inside: bool) -> bool {
        if self.objective_acquired || !player_inside {
            return false;
        }
        self.objective_acquired = true;
        true
    }

    /// Returns true on the frame the stage completes.
    pub fn try_complete(&mut self, player_in_goal: bool) -> bool {
        if self.complete || !player_in_goal || !self.objective_acquired {
            return false;
        }
        self.complete = true;
        true
    }
}

/// Identifier of the stage currently spawned (empty before the first load).
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct ActiveStage {
    pub id: String,
}

/// Text lines drawn by the screen-space overlay.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct StageHud {
    pub effect: Option<String>,
}
