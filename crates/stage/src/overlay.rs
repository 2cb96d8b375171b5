//! Plain sprite rendering of the stage plus the screen-space text overlay.

use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::sprite::Anchor;
use game_core::{
    EndGate, Fragment, ObjectiveBlock, Player, Region, SpriteOrigin, StageEntity, StageHud,
    StageProgress, StageSet, SurfaceTag,
};

use crate::config::{StageConfig, WorldConfig};
use crate::loader::MapSurface;

const HUD_FONT_SIZE: f32 = 16.0;
const LINE_HEIGHT: f32 = 20.0;

/// Sprite entity drawing a player at its `SpriteOrigin`.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerVisual {
    pub owner: Entity,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudLine {
    Credit,
    Effect,
    RestartHint,
    Complete,
}

pub struct StagePresentationPlugin;

impl Plugin for StagePresentationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, (spawn_camera, spawn_hud))
            .add_systems(
                Update,
                (attach_surface_sprites, attach_region_sprites, spawn_player_visuals)
                    .after(StageSet::Input),
            )
            .add_systems(
                PostUpdate,
                (sync_player_visuals, update_hud).in_set(StageSet::Present),
            );
    }
}

fn spawn_camera(mut commands: Commands, world: Res<WorldConfig>) {
    commands.spawn((
        Name::new("Stage Camera"),
        Camera2d,
        Projection::from(OrthographicProjection {
            scaling_mode: ScalingMode::AutoMin {
                min_width: world.width,
                min_height: world.height,
            },
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(world.width * 0.5, world.height * 0.5, 0.0),
    ));
}

fn spawn_hud(mut commands: Commands, cfg: Res<StageConfig>) {
    let lines = [
        (HudLine::Credit, cfg.credit.clone(), Visibility::Inherited),
        (HudLine::Effect, String::new(), Visibility::Hidden),
        (HudLine::RestartHint, cfg.restart_hint.clone(), Visibility::Inherited),
        (HudLine::Complete, "Stage Complete".to_string(), Visibility::Hidden),
    ];
    for (i, (line, text, visibility)) in lines.into_iter().enumerate() {
        commands.spawn((
            line,
            Text::new(text),
            TextFont {
                font_size: HUD_FONT_SIZE,
                ..default()
            },
            TextColor(Color::WHITE),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(i as f32 * LINE_HEIGHT),
                left: Val::Px(4.0),
                ..default()
            },
            visibility,
        ));
    }
}

fn surface_color(tag: Option<&SurfaceTag>) -> Color {
    match tag {
        Some(SurfaceTag::Floor) => Color::srgb(0.35, 0.55, 0.35),
        Some(SurfaceTag::Ceiling) => Color::srgb(0.35, 0.4, 0.7),
        Some(SurfaceTag::Wall) => Color::srgb(0.5, 0.5, 0.5),
        Some(SurfaceTag::Undefined) => Color::srgb(0.45, 0.3, 0.3),
        None => Color::srgb(0.25, 0.25, 0.28),
    }
}

fn attach_surface_sprites(
    mut commands: Commands,
    surfaces: Query<(Entity, &MapSurface, Option<&SurfaceTag>), Added<MapSurface>>,
) {
    for (entity, surface, tag) in &surfaces {
        commands
            .entity(entity)
            .insert(Sprite::from_color(surface_color(tag), surface.size));
    }
}

fn attach_region_sprites(
    mut commands: Commands,
    regions: Query<(Entity, &Region, Has<EndGate>, Has<ObjectiveBlock>, Has<Fragment>), Added<Region>>,
) {
    for (entity, region, gate, objective, fragment) in &regions {
        let color = if gate {
            Color::srgb(0.2, 0.8, 0.3)
        } else if objective {
            Color::srgb(0.95, 0.8, 0.2)
        } else if fragment {
            Color::srgba(0.6, 0.3, 0.8, 0.15)
        } else {
            continue;
        };
        commands
            .entity(entity)
            .insert(Sprite::from_color(color, region.size()));
    }
}

fn spawn_player_visuals(
    mut commands: Commands,
    players: Query<(Entity, &Player, &SpriteOrigin), Added<Player>>,
) {
    for (owner, player, origin) in &players {
        commands.spawn((
            Name::new("Player Sprite"),
            PlayerVisual { owner },
            StageEntity,
            Sprite {
                anchor: Anchor::BottomLeft,
                ..Sprite::from_color(Color::srgb(0.9, 0.3, 0.3), player.half_extents * 2.0)
            },
            Transform::from_translation(origin.0.extend(2.0)),
        ));
    }
}

fn sync_player_visuals(
    players: Query<&SpriteOrigin, With<Player>>,
    mut visuals: Query<(&PlayerVisual, &mut Transform)>,
) {
    for (visual, mut transform) in &mut visuals {
        if let Ok(origin) = players.get(visual.owner) {
            transform.translation.x = origin.x;
            transform.translation.y = origin.y;
        }
    }
}

fn update_hud(
    hud: Res<StageHud>,
    progress: Res<StageProgress>,
    mut lines: Query<(&HudLine, &mut Text, &mut Visibility)>,
) {
    if !hud.is_changed() && !progress.is_changed() {
        return;
    }
    for (line, mut text, mut visibility) in &mut lines {
        match line {
            HudLine::Effect => {
                let shown = hud.effect.as_deref().unwrap_or_default();
                if text.0 != shown {
                    text.0 = shown.to_string();
                }
                visibility.set_if_neq(if hud.effect.is_some() {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                });
            }
            HudLine::Complete => {
                visibility.set_if_neq(if progress.complete {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                });
            }
            HudLine::Credit | HudLine::RestartHint => {}
        }
    }
}
