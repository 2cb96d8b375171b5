//! Per-stage hooks.
//!
//! A stage reacts to two moments: completion (`end_stage`) and, every frame, the
//! fragment the player currently stands in (`fragment_collision`). Hooks do not
//! touch the world directly; they return `StageAction`s that the stage systems
//! apply afterwards.

use bevy::prelude::*;
use game_core::{FragmentId, StageProgress};
use std::collections::HashMap;
use std::sync::Arc;

use crate::layout::{CompletionDef, FragmentEffectDef, StageFile};

/// Side effects a hook may request.
#[derive(Debug, Clone, PartialEq)]
pub enum StageAction {
    ShowEffect(String),
    ClearEffect,
    SetGravityScale(f32),
    /// Back to the configured player gravity scale.
    ResetGravityScale,
    LoadStage { id: String, delay_secs: f32 },
    Restart,
    Exit,
}

/// Read-only view handed to hooks.
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub stage_id: &'a str,
    pub progress: StageProgress,
}

pub trait StageScript: Send + Sync + 'static {
    /// Called exactly once per stage run, on the frame the stage completes.
    fn end_stage(&self, ctx: &StageContext) -> Vec<StageAction>;

    /// Called every frame with the fragment containing the player, if any.
    fn fragment_collision(&self, fragment: Option<FragmentId>, ctx: &StageContext) -> Vec<StageAction>;
}

/// Hooks described entirely by the stage file.
#[derive(Debug, Clone, Default)]
pub struct DataStageScript {
    on_complete: CompletionDef,
    complete_delay: f32,
    effects: HashMap<FragmentId, FragmentEffectDef>,
}

impl DataStageScript {
    pub fn from_file(file: &StageFile) -> Self {
        Self {
            on_complete: file.on_complete.clone(),
            complete_delay: file.complete_delay.max(0.0),
            effects: file
                .fragment_effects
                .iter()
                .map(|e| (e.id, e.clone()))
                .collect(),
        }
    }
}

impl StageScript for DataStageScript {
    fn end_stage(&self, _ctx: &StageContext) -> Vec<StageAction> {
        match &self.on_complete {
            CompletionDef::Hold => Vec::new(),
            CompletionDef::Advance(id) => vec![StageAction::LoadStage {
                id: id.clone(),
                delay_secs: self.complete_delay,
            }],
            CompletionDef::Restart => vec![StageAction::Restart],
            CompletionDef::Exit => vec![StageAction::Exit],
        }
    }

    fn fragment_collision(&self, fragment: Option<FragmentId>, _ctx: &StageContext) -> Vec<StageAction> {
        let Some(effect) = fragment.and_then(|id| self.effects.get(&id)) else {
            return vec![StageAction::ClearEffect, StageAction::ResetGravityScale];
        };
        let mut out = vec![StageAction::ShowEffect(effect.label.clone())];
        out.push(match effect.gravity_scale {
            Some(scale) => StageAction::SetGravityScale(scale),
            None => StageAction::ResetGravityScale,
        });
        out
    }
}

/// Code-defined scripts keyed by stage id. Stages without one use their `DataStageScript`.
#[derive(Resource, Default, Clone)]
pub struct StageScripts {
    custom: HashMap<String, Arc<dyn StageScript>>,
}

impl StageScripts {
    pub fn insert(&mut self, stage_id: impl Into<String>, script: impl StageScript) {
        self.custom.insert(stage_id.into(), Arc::new(script));
    }

    pub fn get(&self, stage_id: &str) -> Option<Arc<dyn StageScript>> {
        self.custom.get(stage_id).cloned()
    }

    /// Registered script, or one built from the stage file.
    pub fn resolve(&self, stage_id: &str, file: &StageFile) -> Arc<dyn StageScript> {
        self.get(stage_id)
            .unwrap_or_else(|| Arc::new(DataStageScript::from_file(file)))
    }
}

/// Hooks of the stage currently spawned.
#[derive(Resource, Clone)]
pub struct ActiveScript(pub Arc<dyn StageScript>);

impl Default for ActiveScript {
    fn default() -> Self {
        Self(Arc::new(DataStageScript::default()))
    }
}

/// Actions produced this frame, drained by `apply_stage_actions`.
#[derive(Resource, Debug, Default)]
pub struct StageActionQueue(pub Vec<StageAction>);

pub trait StageAppExt {
    fn register_stage_script(&mut self, stage_id: impl Into<String>, script: impl StageScript) -> &mut Self;
}

impl StageAppExt for App {
    fn register_stage_script(&mut self, stage_id: impl Into<String>, script: impl StageScript) -> &mut Self {
        self.world_mut()
            .get_resource_or_insert_with(StageScripts::default)
            .insert(stage_id, script);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> StageContext<'static> {
        StageContext {
            stage_id: "s",
            progress: StageProgress::default(),
        }
    }

    fn file(extra: &str) -> StageFile {
        StageFile::from_ron_str(&format!(
            "(version: 1, player_start: (x: 0.0, y: 50.0), \
             end_gate: (x: 10.0, y: 0.0, w: 5.0, h: 5.0), \
             objective: (x: 20.0, y: 0.0, w: 5.0, h: 5.0), {extra})"
        ))
        .unwrap()
    }

    #[test]
    fn hold_does_nothing_on_completion() {
        let s = DataStageScript::from_file(&file(""));
        assert!(s.end_stage(&ctx()).is_empty());
    }

    #[test]
    fn advance_carries_delay() {
        let s = DataStageScript::from_file(&file(r#"on_complete: Advance("b"), complete_delay: 2.0"#));
        assert_eq!(
            s.end_stage(&ctx()),
            vec![StageAction::LoadStage { id: "b".into(), delay_secs: 2.0 }]
        );
    }

    #[test]
    fn fragment_effects_show_and_clear() {
        let s = DataStageScript::from_file(&file(
            r#"fragments: [(id: 3, area: (x: 0.0, y: 0.0, w: 1.0, h: 1.0))],
               fragment_effects: [(id: 3, label: "Low gravity", gravity_scale: Some(1.0))]"#,
        ));
        assert_eq!(
            s.fragment_collision(Some(3), &ctx()),
            vec![
                StageAction::ShowEffect("Low gravity".into()),
                StageAction::SetGravityScale(1.0)
            ]
        );
        let cleared = vec![StageAction::ClearEffect, StageAction::ResetGravityScale];
        assert_eq!(s.fragment_collision(None, &ctx()), cleared);
        // fragment without an effect behaves like no fragment
        assert_eq!(s.fragment_collision(Some(9), &ctx()), cleared);
    }

    struct Fixed;
    impl StageScript for Fixed {
        fn end_stage(&self, _ctx: &StageContext) -> Vec<StageAction> {
            vec![StageAction::Exit]
        }
        fn fragment_collision(&self, _f: Option<FragmentId>, _ctx: &StageContext) -> Vec<StageAction> {
            Vec::new()
        }
    }

    #[test]
    fn registered_script_wins_over_data() {
        let mut app = App::new();
        app.register_stage_script("boss", Fixed);
        let scripts = app.world().resource::<StageScripts>();
        let f = file(r#"on_complete: Advance("b")"#);
        assert_eq!(scripts.resolve("boss", &f).end_stage(&ctx()), vec![StageAction::Exit]);
        assert_eq!(
            scripts.resolve("other", &f).end_stage(&ctx()),
            vec![StageAction::LoadStage { id: "b".into(), delay_secs: 0.0 }]
        );
    }
}
