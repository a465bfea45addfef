//! Mod content installers
//!
//! Every layout variant a game registers becomes one `ModInstaller`. The
//! registry asks them in priority order whether they support an archive
//! listing and lets the first one that does compute the copy plan.

pub mod builder;
pub mod classifier;
pub mod common;
pub mod layout;
pub mod variants;

pub use builder::InstructionBuilder;
pub use classifier::ContentClassifier;
pub use common::{
    sanitize_mod_name, CopyInstruction, InstallError, InstallResult, InstructionKind, PlanOptions,
    SupportResult,
};
pub use layout::{AnchorRule, DestinationStrategy, ExclusionRule, LayoutVariant};
pub use variants::{AmbiguityPolicy, Resolution, VariantResolver};

use std::sync::Arc;

use serde::Serialize;

use crate::game_finder::{find_by_id, GameProfile, KNOWN_GAMES};
use crate::logging::{log_info, log_install};
use crate::mod_types::mod_type_for;

// ============================================================================
// Shared Types
// ============================================================================

/// Callbacks for a host driving installs
#[derive(Clone)]
pub struct TaskContext {
    pub log_callback: Arc<dyn Fn(String) + Send + Sync>,
    pub progress_callback: Arc<dyn Fn(f32) + Send + Sync>,
}

impl TaskContext {
    pub fn new(
        log: impl Fn(String) + Send + Sync + 'static,
        progress: impl Fn(f32) + Send + Sync + 'static,
    ) -> Self {
        Self {
            log_callback: Arc::new(log),
            progress_callback: Arc::new(progress),
        }
    }

    pub fn log(&self, msg: String) {
        (self.log_callback)(msg);
    }

    pub fn set_progress(&self, p: f32) {
        (self.progress_callback)(p);
    }
}

/// One registered installer: a layout variant of a known game
#[derive(Debug, Clone, Copy)]
pub struct ModInstaller {
    pub game: &'static GameProfile,
    pub variant: &'static LayoutVariant,
}

impl ModInstaller {
    pub fn id(&self) -> &'static str {
        self.variant.installer_id
    }

    pub fn priority(&self) -> i32 {
        self.variant.priority
    }

    pub fn game_id(&self) -> &'static str {
        self.game.id
    }

    pub fn test<S: AsRef<str>>(
        &self,
        files: &[S],
        game_id: &str,
        options: &PlanOptions,
    ) -> SupportResult {
        ContentClassifier::new(self.game, self.variant).test(files, game_id, options)
    }

    pub fn install<S: AsRef<str>>(
        &self,
        files: &[S],
        destination_path: &str,
        game_id: &str,
        options: &PlanOptions,
        ctx: Option<&TaskContext>,
    ) -> Result<InstallResult, InstallError> {
        if game_id != self.game.id {
            return Err(InstallError::WrongGame {
                installer: self.id().to_string(),
                expected: self.game.id.to_string(),
                actual: game_id.to_string(),
            });
        }

        if let Some(ctx) = ctx {
            ctx.set_progress(0.0);
            ctx.log(format!("{}: planning {} entries", self.id(), files.len()));
        }

        let result = InstructionBuilder::new(self.game, self.variant).install(
            files,
            destination_path,
            options,
        )?;

        if let Some(ctx) = ctx {
            ctx.log(format!(
                "{}: {} copy instructions",
                self.id(),
                result.instructions.len()
            ));
            ctx.set_progress(1.0);
        }
        Ok(result)
    }
}

/// A finished plan together with the installer that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallPlan {
    pub installer_id: &'static str,
    pub instructions: Vec<CopyInstruction>,
    /// Set when the content deploys somewhere other than the default mod folder
    pub mod_type: Option<&'static str>,
}

// ============================================================================
// Installer Registry
// ============================================================================

pub struct InstallerRegistry {
    installers: Vec<ModInstaller>,
    options: PlanOptions,
}

impl InstallerRegistry {
    /// Installers of every known game
    pub fn new(options: PlanOptions) -> Self {
        Self::with_games(KNOWN_GAMES, options)
    }

    pub fn with_games(games: &'static [GameProfile], options: PlanOptions) -> Self {
        let mut installers: Vec<ModInstaller> = games
            .iter()
            .flat_map(|game| {
                game.variants
                    .iter()
                    .map(move |variant| ModInstaller { game, variant })
            })
            .collect();
        // stable: registration order breaks ties
        installers.sort_by_key(|i| i.priority());

        log_info(&format!("Registered {} installers", installers.len()));
        Self {
            installers,
            options,
        }
    }

    pub fn installers(&self) -> &[ModInstaller] {
        &self.installers
    }

    pub fn options(&self) -> &PlanOptions {
        &self.options
    }

    pub fn find(&self, installer_id: &str) -> Option<&ModInstaller> {
        self.installers.iter().find(|i| i.id() == installer_id)
    }

    /// First installer, in priority order, that supports the listing
    pub fn test<S: AsRef<str>>(&self, files: &[S], game_id: &str) -> Option<&ModInstaller> {
        self.installers
            .iter()
            .filter(|i| i.game_id() == game_id)
            .find(|i| i.test(files, game_id, &self.options).supported)
    }

    /// Plan an install, or `Ok(None)` when no installer supports the listing
    pub fn plan<S: AsRef<str>>(
        &self,
        files: &[S],
        game_id: &str,
        destination_path: &str,
        ctx: Option<&TaskContext>,
    ) -> Result<Option<InstallPlan>, InstallError> {
        let game = find_by_id(game_id).ok_or_else(|| InstallError::UnknownGame(game_id.to_string()))?;

        let Some(installer) = self.test(files, game_id) else {
            self.check_rejected(game, files)?;
            log_install(&format!(
                "No installer for {} supports '{}'",
                game_id, destination_path
            ));
            return Ok(None);
        };

        log_install(&format!("{} claimed '{}'", installer.id(), destination_path));
        let result = installer.install(files, destination_path, game_id, &self.options, ctx)?;
        let mod_type = mod_type_for(game, &result.instructions).map(|t| t.id);

        Ok(Some(InstallPlan {
            installer_id: installer.id(),
            instructions: result.instructions,
            mod_type,
        }))
    }

    /// Turn a rejected ambiguous archive into an error instead of "unsupported"
    fn check_rejected<S: AsRef<str>>(
        &self,
        game: &GameProfile,
        files: &[S],
    ) -> Result<(), InstallError> {
        if self.options.ambiguity != AmbiguityPolicy::Reject {
            return Ok(());
        }
        match VariantResolver::new(game.variants).resolve(files) {
            Some(resolution) if resolution.is_ambiguous() => Err(InstallError::AmbiguousVariant {
                game: game.id.to_string(),
                chosen: resolution.variant.installer_id.to_string(),
                also_matched: resolution.also_matched_ids(),
            }),
            _ => Ok(()),
        }
    }
}

impl Default for InstallerRegistry {
    fn default() -> Self {
        Self::new(PlanOptions::default())
    }
}
