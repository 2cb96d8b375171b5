use bevy::prelude::*;
use game_core::Vec2Def;
use serde::Deserialize;

/// Visible world size in world units; the camera frames `(0,0)..(width,height)`.
#[derive(Resource, Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl WorldConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Resource, Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StageConfig {
    /// Directory holding `stages.ron` and the stage files it lists.
    pub stages_dir: String,
    /// Preferred first stage; empty means the registry default.
    pub default_stage: String,
    pub credit: String,
    pub restart_hint: String,
    /// Offset from the player position at which a carried objective is drawn.
    pub carry_offset: Vec2Def,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            stages_dir: "assets/stages".into(),
            default_stage: String::new(),
            credit: "github.com/frankpaschen99".into(),
            restart_hint: "Press 'R' to restart.".into(),
            carry_offset: Vec2Def::new(0.0, 0.0),
        }
    }
}

impl StageConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.stages_dir.trim().is_empty() {
            w.push("stage.stages_dir is empty".into());
        }
        w
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.width <= 0.0 || self.height <= 0.0 {
            w.push(format!(
                "world size {}x{} must be > 0",
                self.width, self.height
            ));
        }
        w
    }
}
