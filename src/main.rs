use anyhow::{bail, Context};
use bevy::prelude::*;
use clap::Parser;
use flipside::{Cli, ConfigReport, GameConfig, GamePlugin};
use stage::StageCatalog;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (mut cfg, used, errors) = GameConfig::load_layered(cli.config_paths());
    if used.is_empty() {
        bail!("no readable config file: {}", errors.join("; "));
    }
    cli.apply_overrides(&mut cfg);

    // fail before opening a window when the stage set is unusable
    let catalog = StageCatalog::load_dir(&cfg.stage.stages_dir)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("loading stages from '{}'", cfg.stage.stages_dir))?;

    let window = Window {
        title: cfg.window.title.clone(),
        resolution: (cfg.window.width, cfg.window.height).into(),
        resizable: true,
        ..default()
    };
    let exit = App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(window),
            ..default()
        }))
        .insert_resource(ConfigReport { used, errors })
        .insert_resource(catalog)
        .add_plugins(GamePlugin::new(cfg).with_stage(cli.requested_stage()))
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => bail!("app exited with code {code}"),
    }
}
