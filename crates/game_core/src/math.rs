use bevy::prelude::*;
use serde::Deserialize;

/// Serde-friendly 2D vector, written `(x: 1.0, y: 2.0)` in RON.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Vec2Def {
    pub x: f32,
    pub y: f32,
}

impl Vec2Def {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Vec2Def> for Vec2 {
    fn from(v: Vec2Def) -> Self {
        Vec2::new(v.x, v.y)
    }
}

impl From<Vec2> for Vec2Def {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Rectangle given by its bottom-left corner and size.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct RectDef {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectDef {
    pub fn corner(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn is_degenerate(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

impl From<RectDef> for Rect {
    fn from(r: RectDef) -> Self {
        Rect::from_corners(r.corner(), r.corner() + r.size())
    }
}
