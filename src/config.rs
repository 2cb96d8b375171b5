use bevy::prelude::*;
use game_core::ControlsConfig;
use game_physics::{PhysicsConfig, PlayerConfig};
use serde::Deserialize;
use stage::{StageConfig, WorldConfig};
use std::{fs, path::Path};

pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["assets/config/game.ron", "assets/config/game.local.ron"];

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    /// Seconds until the app exits on its own; 0 disables.
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "flipside".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct DebugConfig {
    /// Draw Rapier collider outlines.
    pub physics_wireframe: bool,
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub world: WorldConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub controls: ControlsConfig,
    pub stage: StageConfig,
    pub debug: DebugConfig,
}

impl GameConfig {
    pub fn from_ron_str(txt: &str) -> Result<Self, String> {
        ron::from_str(txt).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| format!("read config {}: {e}", path.display()))?;
        Self::from_ron_str(&data).map_err(|e| format!("{}: {e}", path.display()))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Deep-merges every readable file in order (later files win per key).
    /// Returns the config, the paths that were used and the problems met on the way.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;

        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(base_map), Value::Map(overlay_map)) => {
                    for (key, incoming) in overlay_map.into_iter() {
                        let found = base_map.iter_mut().find(|(k, _)| **k == key);
                        match found {
                            Some((_, existing)) => merge_value(existing, incoming),
                            None => {
                                base_map.insert(key, incoming);
                            }
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }

        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        for p in paths {
            let path = p.as_ref();
            let txt = match fs::read_to_string(path) {
                Ok(txt) => txt,
                Err(e) => {
                    errors.push(format!("{}: read error: {e}", path.display()));
                    continue;
                }
            };
            match ron::from_str::<Value>(&txt) {
                Ok(val) => {
                    match merged.as_mut() {
                        Some(cur) => merge_value(cur, val),
                        None => merged = Some(val),
                    }
                    used.push(path.display().to_string());
                }
                Err(e) => errors.push(format!("{}: parse error: {e}", path.display())),
            }
        }

        let Some(val) = merged else {
            return (GameConfig::default(), used, errors);
        };
        match val.into_rust::<GameConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (GameConfig::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled",
                self.window.auto_close
            ));
        }
        w.extend(self.world.validate());
        w.extend(self.physics.validate());
        w.extend(self.player.validate());
        w.extend(self.stage.validate());
        let (_, key_errors) = game_core::ControlBindings::from_config(&self.controls);
        w.extend(key_errors);
        w
    }
}
