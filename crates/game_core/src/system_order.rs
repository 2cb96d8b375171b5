//! Frame ordering labels.
//! 1. Input (Update): controller reads keys and queues impulses
//! 2. Rapier step (PostUpdate, plugin owned)
//! 3. Contacts: collision events drive each player's jump gate
//! 4. Evaluate: objective, goal, fragment checks
//! 5. Present: overlay text and sprite sync
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum StageSet {
    Input,
    Contacts,
    Evaluate,
    Present,
}

/// Chains the post-physics sets. Safe to call from several plugins.
pub fn configure_stage_sets(app: &mut App) {
    app.configure_sets(
        PostUpdate,
        (StageSet::Contacts, StageSet::Evaluate, StageSet::Present).chain(),
    );
}
