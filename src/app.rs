use bevy::prelude::*;
use bevy_rapier2d::render::RapierDebugRenderPlugin;
use game_core::controls::any_just_pressed;
use game_core::{ControlBindings, GameCorePlugin};
use game_physics::GamePhysicsPlugin;
use stage::{StagePlugin, StagePresentationPlugin, StageSelection};

use crate::config::GameConfig;

const LOG_TARGET: &str = "app";

/// Problems found while loading the config, logged once the log plugin is up.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConfigReport {
    pub used: Vec<String>,
    pub errors: Vec<String>,
}

/// Wires config, physics and stages. `headless` skips camera, sprites and text.
pub struct GamePlugin {
    pub config: GameConfig,
    pub requested_stage: Option<String>,
    pub headless: bool,
}

impl GamePlugin {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            requested_stage: None,
            headless: false,
        }
    }

    pub fn with_stage(mut self, id: Option<String>) -> Self {
        self.requested_stage = id;
        self
    }

    pub fn headless(mut self) -> Self {
        self.headless = true;
        self
    }
}

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        let cfg = &self.config;
        let (bindings, _) = ControlBindings::from_config(&cfg.controls);
        // physics reads its config at build time
        app.insert_resource(cfg.clone())
            .insert_resource(cfg.world.clone())
            .insert_resource(cfg.physics.clone())
            .insert_resource(cfg.player.clone())
            .insert_resource(cfg.stage.clone())
            .insert_resource(bindings)
            .insert_resource(StageSelection {
                requested: self.requested_stage.clone(),
            })
            .init_resource::<ConfigReport>();

        app.add_plugins((GameCorePlugin, GamePhysicsPlugin, StagePlugin))
            .add_systems(Startup, (report_config, setup_auto_close))
            .add_systems(Update, (exit_on_key, check_auto_close));

        if !self.headless {
            app.add_plugins(StagePresentationPlugin);
            if cfg.debug.physics_wireframe {
                app.add_plugins(RapierDebugRenderPlugin::default());
            }
        }
    }
}

fn report_config(cfg: Res<GameConfig>, report: Res<ConfigReport>) {
    if !report.used.is_empty() {
        info!(target: LOG_TARGET, "config layers: {:?}", report.used);
    }
    for e in &report.errors {
        warn!(target: LOG_TARGET, "config: {e}");
    }
    for w in cfg.validate() {
        warn!(target: LOG_TARGET, "config: {w}");
    }
}

pub fn exit_on_key(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    bindings: Res<ControlBindings>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(keys) = keys else {
        return;
    };
    if any_just_pressed(&keys, &bindings.exit) {
        info!(target: LOG_TARGET, "exit key pressed");
        exit.write(AppExit::Success);
    }
}

#[derive(Resource, Deref, DerefMut)]
struct AutoCloseTimer(Timer);

fn setup_auto_close(mut commands: Commands, cfg: Res<GameConfig>) {
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!(target: LOG_TARGET, "auto close after {secs}s");
        commands.insert_resource(AutoCloseTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

fn check_auto_close(
    time: Res<Time>,
    timer: Option<ResMut<AutoCloseTimer>>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(mut timer) = timer else {
        return;
    };
    if timer.tick(time.delta()).just_finished() {
        info!(target: LOG_TARGET, "auto close timer finished");
        exit.write(AppExit::Success);
    }
}
