use bevy::prelude::*;
use game_core::Vec2Def;
use serde::Deserialize;

/// World-level physics settings.
#[derive(Resource, Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Rapier's length unit. Non-positive values fall back to 50.
    pub pixels_per_meter: f32,
    pub gravity: Vec2Def,
    /// One fixed physics step of `1 / timestep_hz` seconds is taken per frame.
    pub timestep_hz: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            pixels_per_meter: 50.0,
            gravity: Vec2Def::new(0.0, -9.81 * 50.0),
            timestep_hz: 60.0,
        }
    }
}

impl PhysicsConfig {
    pub fn length_unit(&self) -> f32 {
        if self.pixels_per_meter > 0.0 {
            self.pixels_per_meter
        } else {
            50.0
        }
    }

    pub fn timestep(&self) -> f32 {
        if self.timestep_hz > 0.0 {
            1.0 / self.timestep_hz
        } else {
            1.0 / 60.0
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.pixels_per_meter <= 0.0 {
            w.push(format!(
                "physics.pixels_per_meter {} must be > 0 (falling back to 50)",
                self.pixels_per_meter
            ));
        }
        if self.timestep_hz <= 0.0 {
            w.push(format!(
                "physics.timestep_hz {} must be > 0 (falling back to 60)",
                self.timestep_hz
            ));
        }
        if self.gravity.y > 0.0 {
            w.push(format!(
                "physics.gravity.y is positive ({}); world is Y-up so bodies will rise",
                self.gravity.y
            ));
        }
        w
    }
}

/// Body and controller tuning for the player.
#[derive(Resource, Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub size: Vec2Def,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Multiplier on world gravity for the player body only.
    pub gravity_scale: f32,
    /// Velocity change in px/s per frame while a move key is held.
    /// Scaled by the body's mass when applied, so density does not change the feel.
    pub move_impulse: f32,
    /// Velocity change in px/s for one jump, scaled by mass like `move_impulse`.
    /// 1400 against gravity 490.5 x 5 gives roughly a 400 px apex.
    pub jump_impulse: f32,
    /// Horizontal speed above which move impulses are skipped. 0 disables the cap.
    pub max_run_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: Vec2Def::new(32.0, 32.0),
            density: 1.0,
            friction: 1.0,
            restitution: 0.2,
            gravity_scale: 5.0,
            move_impulse: 50.0,
            jump_impulse: 1400.0,
            max_run_speed: 360.0,
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            w.push(format!(
                "player.size ({}, {}) must be > 0 on both axes",
                self.size.x, self.size.y
            ));
        }
        if self.density <= 0.0 {
            w.push("player.density must be > 0".into());
        }
        if !(0.0..=1.5).contains(&self.restitution) {
            w.push(format!(
                "player.restitution {} outside recommended 0..1.5",
                self.restitution
            ));
        }
        if self.friction < 0.0 {
            w.push("player.friction negative".into());
        }
        if self.move_impulse < 0.0 || self.jump_impulse < 0.0 {
            w.push("player impulses must be >= 0 (direction comes from input)".into());
        }
        if self.max_run_speed < 0.0 {
            w.push(format!(
                "player.max_run_speed {} negative -> treated as disabled",
                self.max_run_speed
            ));
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(PhysicsConfig::default().validate().is_empty());
        assert!(PlayerConfig::default().validate().is_empty());
    }

    #[test]
    fn zero_rate_falls_back_to_sixty_hz() {
        let cfg = PhysicsConfig {
            timestep_hz: 0.0,
            ..Default::default()
        };
        assert!((cfg.timestep() - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(cfg.validate().len(), 1);
    }

    #[test]
    fn non_positive_length_unit_falls_back() {
        let cfg = PhysicsConfig {
            pixels_per_meter: -3.0,
            ..Default::default()
        };
        assert_eq!(cfg.length_unit(), 50.0);
        assert_eq!(cfg.validate().len(), 1);
        let cfg = PhysicsConfig {
            pixels_per_meter: 0.0,
            ..Default::default()
        };
        assert_eq!(cfg.length_unit(), 50.0);
        assert_eq!(PhysicsConfig::default().length_unit(), 50.0);
    }

    #[test]
    fn player_defaults_keep_tuned_constants() {
        let p = PlayerConfig::default();
        assert_eq!(p.gravity_scale, 5.0);
        assert_eq!(p.move_impulse, 50.0);
        assert_eq!(p.jump_impulse, 1400.0);
        assert_eq!(p.max_run_speed, 360.0);
    }
}
