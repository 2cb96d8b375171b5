//! Per-player jump permission and direction.
//!
//! Mutated only by contact-begin handling and by a successful jump. Losing a
//! contact does not change anything.

use bevy::prelude::*;

use crate::components::SurfaceTag;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpDirection {
    Up,
    Down,
}

impl JumpDirection {
    pub fn sign(self) -> f32 {
        match self {
            JumpDirection::Up => 1.0,
            JumpDirection::Down => -1.0,
        }
    }
}

#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JumpGate {
    pub can_jump: bool,
    pub inverted: bool,
}

impl JumpGate {
    /// Applies one contact-begin event against a surface (untagged surfaces pass `None`).
    pub fn on_contact_begin(&mut self, tag: Option<SurfaceTag>) {
        self.can_jump = true;
        match tag {
            Some(SurfaceTag::Ceiling) => self.inverted = true,
            Some(SurfaceTag::Floor) => self.inverted = false,
            Some(SurfaceTag::Wall | SurfaceTag::Undefined) => self.can_jump = false,
            None => {}
        }
    }

    pub fn direction(&self) -> JumpDirection {
        if self.inverted {
            JumpDirection::Down
        } else {
            JumpDirection::Up
        }
    }

    /// Consumes the jump if allowed.
    pub fn try_jump(&mut self) -> Option<JumpDirection> {
        if !self.can_jump {
            return None;
        }
        self.can_jump = false;
        Some(self.direction())
    }
}
