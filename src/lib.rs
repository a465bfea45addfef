//! ModPlan - per-game mod content installers
//!
//! Library crate shared between mod manager hosts and the `modplan` CLI.
//! Given the flat file listing of an extracted archive, it decides which
//! game-specific installer claims the archive and computes the copy plan.
//! No file I/O happens here; hosts apply the plan themselves.

pub mod config;
pub mod game_finder;
pub mod host;
pub mod installers;
pub mod logging;
pub mod migration;
pub mod mod_types;
pub mod paths;
pub mod setup;

pub use config::{AppConfig, ConfigError};
pub use installers::{
    CopyInstruction, InstallError, InstallPlan, InstallResult, InstallerRegistry, PlanOptions,
    SupportResult,
};
pub use setup::SetupError;
