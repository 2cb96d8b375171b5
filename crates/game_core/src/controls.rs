use bevy::prelude::*;
use serde::Deserialize;
use smallvec::{smallvec, SmallVec};

pub type KeyList = SmallVec<[KeyCode; 2]>;

/// Key names per action as written in the config file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
    pub freeze: Vec<String>,
    pub restart: Vec<String>,
    pub exit: Vec<String>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            left: vec!["KeyA".into(), "ArrowLeft".into()],
            right: vec!["KeyD".into(), "ArrowRight".into()],
            jump: vec!["Space".into()],
            freeze: vec!["KeyF".into()],
            restart: vec!["KeyR".into()],
            exit: vec!["Escape".into()],
        }
    }
}

/// Parsed bindings consulted by the gameplay systems.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ControlBindings {
    pub left: KeyList,
    pub right: KeyList,
    pub jump: KeyList,
    pub freeze: KeyList,
    pub restart: KeyList,
    pub exit: KeyList,
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self {
            left: smallvec![KeyCode::KeyA, KeyCode::ArrowLeft],
            right: smallvec![KeyCode::KeyD, KeyCode::ArrowRight],
            jump: smallvec![KeyCode::Space],
            freeze: smallvec![KeyCode::KeyF],
            restart: smallvec![KeyCode::KeyR],
            exit: smallvec![KeyCode::Escape],
        }
    }
}

impl ControlBindings {
    /// Unknown key names are skipped and reported; the rest still bind.
    pub fn from_config(cfg: &ControlsConfig) -> (Self, Vec<String>) {
        let mut errors = Vec::new();
        let mut parse = |action: &str, names: &[String]| -> KeyList {
            let mut out = KeyList::new();
            for name in names {
                match parse_keycode(name) {
                    Ok(k) => out.push(k),
                    Err(e) => errors.push(format!("controls.{action}: {e}")),
                }
            }
            if out.is_empty() {
                errors.push(format!("controls.{action}: no usable key bound"));
            }
            out
        };
        let bindings = Self {
            left: parse("left", &cfg.left),
            right: parse("right", &cfg.right),
            jump: parse("jump", &cfg.jump),
            freeze: parse("freeze", &cfg.freeze),
            restart: parse("restart", &cfg.restart),
            exit: parse("exit", &cfg.exit),
        };
        (bindings, errors)
    }
}

pub fn any_pressed(keys: &ButtonInput<KeyCode>, list: &KeyList) -> bool {
    list.iter().any(|k| keys.pressed(*k))
}

pub fn any_just_pressed(keys: &ButtonInput<KeyCode>, list: &KeyList) -> bool {
    list.iter().any(|k| keys.just_pressed(*k))
}

pub fn parse_keycode(name: &str) -> Result<KeyCode, String> {
    let trimmed = name.trim();
    let bare = trimmed.strip_prefix("Key:").unwrap_or(trimmed);
    let kc = match bare {
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" | "Esc" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ArrowLeft" | "Left" => KeyCode::ArrowLeft,
        "ArrowRight" | "Right" => KeyCode::ArrowRight,
        "ArrowUp" | "Up" => KeyCode::ArrowUp,
        "ArrowDown" | "Down" => KeyCode::ArrowDown,
        "F1" => KeyCode::F1,
        "F2" => KeyCode::F2,
        other => return parse_letter(other),
    };
    Ok(kc)
}

fn parse_letter(name: &str) -> Result<KeyCode, String> {
    let letter = name.strip_prefix("Key").unwrap_or(name);
    let mut chars = letter.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(format!("Unsupported KeyCode '{name}'"));
    };
    let kc = match c.to_ascii_uppercase() {
        'A' => KeyCode::KeyA,
        'B' => KeyCode::KeyB,
        'C' => KeyCode::KeyC,
        'D' => KeyCode::KeyD,
        'E' => KeyCode::KeyE,
        'F' => KeyCode::KeyF,
        'G' => KeyCode::KeyG,
        'H' => KeyCode::KeyH,
        'I' => KeyCode::KeyI,
        'J' => KeyCode::KeyJ,
        'K' => KeyCode::KeyK,
        'L' => KeyCode::KeyL,
        'M' => KeyCode::KeyM,
        'N' => KeyCode::KeyN,
        'O' => KeyCode::KeyO,
        'P' => KeyCode::KeyP,
        'Q' => KeyCode::KeyQ,
        'R' => KeyCode::KeyR,
        'S' => KeyCode::KeyS,
        'T' => KeyCode::KeyT,
        'U' => KeyCode::KeyU,
        'V' => KeyCode::KeyV,
        'W' => KeyCode::KeyW,
        'X' => KeyCode::KeyX,
        'Y' => KeyCode::KeyY,
        'Z' => KeyCode::KeyZ,
        _ => return Err(format!("Unsupported KeyCode '{name}'")),
    };
    Ok(kc)
}
