//! Preparing a discovered game for modding
//!
//! Runs a game's declarative setup steps against the host: injecting the Unity
//! patcher where the game needs one and making sure mod folders exist.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::game_finder::{GameProfile, ModLocation};
use crate::host::{HostContext, HostError, Notification, NotificationKind, PatcherInvocation};
use crate::logging::{log_error, log_setup, log_warning};

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("{0} was not found in any game store")]
    GameNotFound(String),

    #[error("{0} does not use the Unity patcher")]
    NoPatcher(String),

    #[error("Can't run the patcher while a tool or the game is running")]
    GameRunning,

    #[error("{game} install is missing {missing:?}")]
    MissingFiles { game: String, missing: Vec<String> },

    #[error("{0} has no fixed mod folder; the host has to resolve it")]
    UnresolvedModPath(String),

    #[error("Failed to prepare {path}: {source}")]
    Directory {
        path: String,
        #[source]
        source: HostError,
    },

    #[error("Patcher failed: {0}")]
    Patcher(#[source] HostError),
}

/// Unity patcher settings (paths relative to the game folder, '/' separated)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatcherConfig {
    /// Managed assembly directory
    pub data_path: &'static str,
    pub entry_point: &'static str,
    /// Folder the patched game loads mods from, if the patcher is told about one
    pub mods_path: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    /// Inject the patcher; with `only_without_mods`, games that already have
    /// mods are left alone (they may still be running the old loader)
    RunPatcher { only_without_mods: bool },
    EnsureDir {
        location: ModLocation,
        writable: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatcherAction {
    Add,
    Remove,
}

// ============================================================================
// Public API
// ============================================================================

/// Run every setup step of `game` for the install at `game_path`
pub fn prepare_for_modding(
    game: &GameProfile,
    game_path: &Path,
    host: &HostContext<'_>,
) -> Result<(), SetupError> {
    log_setup(&format!("Preparing {} at {:?}", game.name, game_path));

    for step in game.setup {
        match *step {
            SetupStep::RunPatcher { only_without_mods } => {
                if only_without_mods && host.mods.has_existing_mods(game.id) {
                    log_setup(&format!(
                        "{} already has mods installed, leaving the patcher alone",
                        game.name
                    ));
                    continue;
                }
                let invocation = patcher_invocation(game, game_path, host, false)?;
                run_patcher(host, &invocation)?;
            }
            SetupStep::EnsureDir { location, writable } => {
                let path = location
                    .resolve(game_path)
                    .ok_or_else(|| SetupError::UnresolvedModPath(game.id.to_string()))?;
                host.fs
                    .ensure_dir(&path, writable)
                    .map_err(|source| SetupError::Directory {
                        path: path.display().to_string(),
                        source,
                    })?;
                log_setup(&format!("Ensured {:?}", path));
            }
        }
    }

    Ok(())
}

/// Add or remove the patcher on request, refusing while the game runs
pub fn run_patcher_action(
    game: &GameProfile,
    action: PatcherAction,
    game_path: &Path,
    host: &HostContext<'_>,
) -> Result<(), SetupError> {
    if host.session.tools_running() {
        host.notifier.send_notification(Notification {
            id: None,
            kind: NotificationKind::Info,
            message: "Can't run harmony patcher while a tool/game is running".to_string(),
            no_dismiss: false,
        });
        return Err(SetupError::GameRunning);
    }

    let invocation = patcher_invocation(game, game_path, host, action == PatcherAction::Remove)?;
    run_patcher(host, &invocation).inspect_err(|err| {
        host.notifier.send_notification(Notification {
            id: None,
            kind: NotificationKind::Error,
            message: format!("The patcher was unable to finish its operation \"{}\"", err),
            no_dismiss: false,
        });
    })
}

fn patcher_invocation(
    game: &GameProfile,
    game_path: &Path,
    host: &HostContext<'_>,
    remove: bool,
) -> Result<PatcherInvocation, SetupError> {
    let patcher = game
        .patcher
        .ok_or_else(|| SetupError::NoPatcher(game.id.to_string()))?;

    Ok(PatcherInvocation {
        extension_root: host.extension_root.to_path_buf(),
        data_path: relative_to(game_path, patcher.data_path),
        entry_point: patcher.entry_point.to_string(),
        remove,
        mods_path: patcher.mods_path.map(|rel| relative_to(game_path, rel)),
    })
}

fn relative_to(game_path: &Path, rel: &'static str) -> PathBuf {
    ModLocation::GameRelative(rel)
        .resolve(game_path)
        .unwrap_or_else(|| game_path.to_path_buf())
}

fn run_patcher(host: &HostContext<'_>, invocation: &PatcherInvocation) -> Result<(), SetupError> {
    let verb = if invocation.remove { "Removing" } else { "Injecting" };
    log_setup(&format!(
        "{} patcher at {} in {:?}",
        verb, invocation.entry_point, invocation.data_path
    ));

    host.patcher.run_patcher(invocation).map_err(|err| {
        log_error(&format!("Patcher failed: {}", err));
        SetupError::Patcher(err)
    })?;

    if invocation.mods_path.is_none() && !invocation.remove {
        log_warning("Patcher runs without a mods folder; mods load from its default location");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_finder::find_by_id;
    use crate::host::testing::FakeHost;

    #[test]
    fn test_dawn_of_man_setup_patches_then_ensures_folders() {
        let host = FakeHost::default();
        let root = PathBuf::from("/ext/dawnofman");
        let game = find_by_id("dawnofman").unwrap();

        prepare_for_modding(game, Path::new("/games/dom"), &host.context(&root)).unwrap();

        let runs = host.patcher_runs.borrow();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].extension_root, root);
        assert_eq!(runs[0].data_path, PathBuf::from("/games/dom/DawnOfMan_Data/Managed"));
        assert_eq!(runs[0].entry_point, "DawnOfMan.TitleStateMain::init");
        assert!(!runs[0].remove);
        assert_eq!(runs[0].mods_path, Some(PathBuf::from("/games/dom/Mods")));

        let ensured = host.ensured.borrow();
        assert_eq!(ensured.len(), 2);
        assert!(ensured[0].0.ends_with("DawnOfMan/Scenarios"));
        assert_eq!(ensured[1], (PathBuf::from("/games/dom/Mods"), true));
    }

    #[test]
    fn test_existing_mods_skip_patcher() {
        let host = FakeHost::default().with_mods_for("pathfinderkingmaker");
        let game = find_by_id("pathfinderkingmaker").unwrap();

        prepare_for_modding(game, Path::new("/games/pk"), &host.context(Path::new("/ext"))).unwrap();

        assert!(host.patcher_runs.borrow().is_empty());
        assert_eq!(host.ensured.borrow().len(), 1);
    }

    #[test]
    fn test_goose_always_patches_without_mods_folder() {
        let host = FakeHost::default().with_mods_for("untitledgoosegame");
        let game = find_by_id("untitledgoosegame").unwrap();

        prepare_for_modding(game, Path::new("/games/goose"), &host.context(Path::new("/ext"))).unwrap();

        let runs = host.patcher_runs.borrow();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].mods_path, None);
        assert_eq!(
            host.ensured.borrow()[0].0,
            PathBuf::from("/games/goose/Untitled_Data/Managed/VortexMods")
        );
    }

    #[test]
    fn test_plain_games_only_ensure_folders() {
        let host = FakeHost::default();
        let game = find_by_id("elex").unwrap();

        prepare_for_modding(game, Path::new("/games/elex"), &host.context(Path::new("/ext"))).unwrap();

        assert!(host.patcher_runs.borrow().is_empty());
        assert_eq!(
            host.ensured.borrow().as_slice(),
            &[(PathBuf::from("/games/elex/data/packed"), true)]
        );
    }

    #[test]
    fn test_patcher_failure_aborts_setup() {
        let host = FakeHost::default().with_failing_patcher();
        let game = find_by_id("dawnofman").unwrap();

        let err = prepare_for_modding(game, Path::new("/games/dom"), &host.context(Path::new("/ext")))
            .unwrap_err();
        assert!(matches!(err, SetupError::Patcher(_)));
        assert!(host.ensured.borrow().is_empty());
    }

    #[test]
    fn test_patcher_action_refused_while_running() {
        let host = FakeHost::default().while_running();
        let game = find_by_id("dawnofman").unwrap();

        let err = run_patcher_action(
            game,
            PatcherAction::Remove,
            Path::new("/games/dom"),
            &host.context(Path::new("/ext")),
        )
        .unwrap_err();

        assert_eq!(err, SetupError::GameRunning);
        assert!(host.patcher_runs.borrow().is_empty());
        assert_eq!(host.notifications.borrow().len(), 1);
    }

    #[test]
    fn test_patcher_remove_action() {
        let host = FakeHost::default();
        let game = find_by_id("pathfinderkingmaker").unwrap();

        run_patcher_action(
            game,
            PatcherAction::Remove,
            Path::new("/games/pk"),
            &host.context(Path::new("/ext")),
        )
        .unwrap();

        let runs = host.patcher_runs.borrow();
        assert!(runs[0].remove);
        assert_eq!(runs[0].entry_point, "Kingmaker.GameStarter::Awake");
    }

    #[test]
    fn test_patcher_action_needs_patcher() {
        let host = FakeHost::default();
        let game = find_by_id("elex").unwrap();

        let err = run_patcher_action(
            game,
            PatcherAction::Add,
            Path::new("/games/elex"),
            &host.context(Path::new("/ext")),
        )
        .unwrap_err();
        assert_eq!(err, SetupError::NoPatcher("elex".to_string()));
    }
}
