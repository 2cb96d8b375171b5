pub mod app;
pub mod cli;
pub mod config;

pub use app::{ConfigReport, GamePlugin};
pub use cli::Cli;
pub use config::{DebugConfig, GameConfig, WindowConfig};
