use bevy::prelude::*;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Player entity marker + controller state. The physics body lives on the same entity.
#[derive(Component, Clone, Copy, Debug)]
pub struct Player {
    pub half_extents: Vec2,
    pub frozen: bool,
}

impl Player {
    pub fn new(size: Vec2) -> Self {
        Self {
            half_extents: size * 0.5,
            frozen: false,
        }
    }

    /// Body position as written back by the physics engine.
    pub fn position(transform: &Transform) -> Vec2 {
        transform.translation.truncate()
    }

    /// Bottom-left corner the sprite is drawn from.
    pub fn sprite_origin(&self, body_position: Vec2) -> Vec2 {
        body_position - self.half_extents
    }

    pub fn toggle_frozen(&mut self) {
        self.frozen = !self.frozen;
    }
}

/// Drawable position of the player sprite. Only follows the body while the player is not frozen.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Deref, DerefMut)]
pub struct SpriteOrigin(pub Vec2);

/// Surface classification carried by static map colliders.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum SurfaceTag {
    Floor,
    Ceiling,
    Wall,
    Undefined,
}

impl SurfaceTag {
    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceTag::Floor => "floor",
            SurfaceTag::Ceiling => "ceiling",
            SurfaceTag::Wall => "wall",
            SurfaceTag::Undefined => "undefined",
        }
    }
}

impl fmt::Display for SurfaceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurfaceTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floor" => Ok(SurfaceTag::Floor),
            "ceiling" | "ceil" => Ok(SurfaceTag::Ceiling),
            "wall" => Ok(SurfaceTag::Wall),
            "undefined" => Ok(SurfaceTag::Undefined),
            other => Err(format!("unknown surface tag '{other}'")),
        }
    }
}

/// Axis-aligned trigger rectangle in world space.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Region(pub Rect);

impl Region {
    /// Builds a region from a bottom-left corner and a size.
    pub fn from_corner_size(corner: Vec2, size: Vec2) -> Self {
        Self(Rect::from_corners(corner, corner + size))
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: Vec2) -> bool {
        self.0.contains(point)
    }

    pub fn center(&self) -> Vec2 {
        self.0.center()
    }

    pub fn size(&self) -> Vec2 {
        self.0.size()
    }

    /// Moves the rectangle so its center sits on `center`, keeping its size.
    pub fn center_on(&mut self, center: Vec2) {
        self.0 = Rect::from_center_size(center, self.0.size());
    }
}

/// Goal region of a stage.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct EndGate;

/// Collectible that must be carried into the goal.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct ObjectiveBlock;

pub type FragmentId = u8;

/// Named map area used by per-stage region effects.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub id: FragmentId,
}

/// Everything spawned for the current stage; despawned on stage change.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct StageEntity;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_origin_is_body_minus_half_extent() {
        let p = Player::new(Vec2::new(32.0, 48.0));
        assert_eq!(p.sprite_origin(Vec2::new(100.0, 100.0)), Vec2::new(84.0, 76.0));
    }

    #[test]
    fn toggle_frozen_flips() {
        let mut p = Player::new(Vec2::splat(16.0));
        p.toggle_frozen();
        assert!(p.frozen);
        p.toggle_frozen();
        assert!(!p.frozen);
    }

    #[test]
    fn region_contains_edges_inclusive() {
        let r = Region::from_corner_size(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0));
        assert!(r.contains(Vec2::new(10.0, 20.0)));
        assert!(r.contains(Vec2::new(40.0, 60.0)));
        assert!(r.contains(Vec2::new(25.0, 30.0)));
        assert!(!r.contains(Vec2::new(9.9, 30.0)));
        assert!(!r.contains(Vec2::new(25.0, 60.1)));
    }

    #[test]
    fn region_center_on_keeps_size() {
        let mut r = Region::from_corner_size(Vec2::ZERO, Vec2::new(20.0, 10.0));
        r.center_on(Vec2::new(100.0, 50.0));
        assert_eq!(r.size(), Vec2::new(20.0, 10.0));
        assert_eq!(r.center(), Vec2::new(100.0, 50.0));
        assert!(r.contains(Vec2::new(91.0, 46.0)));
    }

    #[test]
    fn surface_tag_parses_by_value() {
        let owned = String::from("floor");
        assert_eq!(owned.parse::<SurfaceTag>(), Ok(SurfaceTag::Floor));
        assert_eq!("ceil".parse::<SurfaceTag>(), Ok(SurfaceTag::Ceiling));
        assert_eq!("Ceiling".parse::<SurfaceTag>(), Ok(SurfaceTag::Ceiling));
        assert_eq!(" wall ".parse::<SurfaceTag>(), Ok(SurfaceTag::Wall));
        assert_eq!("undefined".parse::<SurfaceTag>(), Ok(SurfaceTag::Undefined));
        assert!("lava".parse::<SurfaceTag>().is_err());
    }
}
