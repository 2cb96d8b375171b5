use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::{GameConfig, DEFAULT_CONFIG_PATHS};

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "flipside", version, about = "Platformer where ceilings flip your jump")]
pub struct Cli {
    /// Config file; repeat to layer several (later wins). Defaults to assets/config/game.ron
    /// plus game.local.ron when present.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Vec<PathBuf>,

    /// Stage id to start on.
    #[arg(long, env = "LEVEL_ID", value_name = "ID")]
    pub level: Option<String>,

    /// Directory with stages.ron, overriding `stage.stages_dir`.
    #[arg(long, value_name = "DIR")]
    pub stages_dir: Option<PathBuf>,
}

impl Cli {
    pub fn config_paths(&self) -> Vec<PathBuf> {
        if !self.config.is_empty() {
            return self.config.clone();
        }
        let [base, local] = DEFAULT_CONFIG_PATHS;
        let mut paths = vec![PathBuf::from(base)];
        if Path::new(local).exists() {
            paths.push(PathBuf::from(local));
        }
        paths
    }

    /// Command-line values that override the loaded config.
    pub fn apply_overrides(&self, cfg: &mut GameConfig) {
        if let Some(dir) = &self.stages_dir {
            cfg.stage.stages_dir = dir.display().to_string();
        }
    }

    pub fn requested_stage(&self) -> Option<String> {
        self.level
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}
