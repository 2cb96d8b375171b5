use bevy::prelude::*;
use game_core::{FragmentId, RectDef, SurfaceTag, Vec2Def};
use serde::Deserialize;
use std::collections::HashSet;
use std::{fs, path::Path};

pub const STAGE_FILE_VERSION: u32 = 1;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SurfaceDef {
    pub rect: RectDef,
    #[serde(default)]
    pub tag: Option<SurfaceTag>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FragmentDef {
    pub id: FragmentId,
    pub area: RectDef,
}

/// What happens once the stage is complete.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub enum CompletionDef {
    /// Stay on the finished stage.
    #[default]
    Hold,
    Advance(String),
    Restart,
    Exit,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FragmentEffectDef {
    pub id: FragmentId,
    pub label: String,
    #[serde(default)]
    pub gravity_scale: Option<f32>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StageFile {
    pub version: u32,
    #[serde(default)]
    pub name: String,
    /// Player body centre at spawn.
    pub player_start: Vec2Def,
    pub end_gate: RectDef,
    pub objective: RectDef,
    #[serde(default)]
    pub surfaces: Vec<SurfaceDef>,
    #[serde(default)]
    pub fragments: Vec<FragmentDef>,
    /// Adds an untagged floor along y = 0 across the whole world.
    #[serde(default = "default_true")]
    pub ground: bool,
    #[serde(default)]
    pub on_complete: CompletionDef,
    /// Seconds between completion and the `on_complete` transition.
    #[serde(default)]
    pub complete_delay: f32,
    #[serde(default)]
    pub fragment_effects: Vec<FragmentEffectDef>,
}

impl StageFile {
    pub fn from_ron_str(txt: &str) -> Result<Self, String> {
        let sf: StageFile = ron::from_str(txt).map_err(|e| format!("parse stage: {e}"))?;
        if sf.version != STAGE_FILE_VERSION {
            return Err(format!(
                "StageFile version {} unsupported (expected {STAGE_FILE_VERSION})",
                sf.version
            ));
        }
        Ok(sf)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|e| format!("read stage {path:?}: {e}"))?;
        Self::from_ron_str(&txt).map_err(|e| format!("{path:?}: {e}"))
    }

    pub fn player_start(&self) -> Vec2 {
        self.player_start.into()
    }

    /// Non-fatal problems; the stage still loads.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.end_gate.is_degenerate() {
            w.push("end_gate has an empty size".into());
        }
        if self.objective.is_degenerate() {
            w.push("objective has an empty size".into());
        }
        for (i, s) in self.surfaces.iter().enumerate() {
            if s.rect.is_degenerate() {
                w.push(format!("surface #{i} has an empty size"));
            }
        }
        let start = self.player_start();
        if Rect::from(self.end_gate).contains(start) {
            w.push("player_start lies inside end_gate".into());
        }
        let mut seen = HashSet::new();
        for f in &self.fragments {
            if !seen.insert(f.id) {
                w.push(format!("duplicate fragment id {}", f.id));
            }
        }
        for e in &self.fragment_effects {
            if !seen.contains(&e.id) {
                w.push(format!("fragment effect '{}' references unknown fragment {}", e.label, e.id));
            }
        }
        if self.complete_delay < 0.0 {
            w.push(format!("complete_delay {} is negative", self.complete_delay));
        }
        w
    }
}
