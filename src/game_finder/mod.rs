//! Game registration and discovery
//!
//! Resolves where a supported game is installed, where its mods go, and
//! whether it has to be started through a store launcher. The actual store
//! lookups are delegated to the host's `GameStore`.
//!
//! # Example
//!
//! ```rust,ignore
//! use modplan::game_finder::{find_by_id, find_game};
//!
//! let elex = find_by_id("elex").unwrap();
//! let install_path = find_game(elex, &my_store)?;
//! ```

pub mod known_games;

use std::path::{Path, PathBuf};

use crate::host::{FileSystem, GameStore, StoreKind};
use crate::logging::{log_info, log_warning};
use crate::setup::SetupError;

pub use known_games::{
    find_by_epic_id, find_by_id, find_by_name, find_by_steam_id, GameProfile, KNOWN_GAMES,
};

// ============================================================================
// Core Types
// ============================================================================

/// One way of asking the host where a game is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameQuery {
    ByName(&'static str),
    /// Any of these store ids (Steam App ID, Epic AppName, Microsoft Store id)
    ByAppId(&'static [&'static str]),
    /// HKLM registry value holding the install directory
    Registry {
        key: &'static str,
        value: &'static str,
    },
}

/// Where a game's mods are deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModLocation {
    /// Relative to the game install ('/' separated)
    GameRelative(&'static str),
    /// Relative to the user's Documents folder
    Documents(&'static str),
    /// Only the host can work it out (per-user folders named after account ids)
    HostResolved(&'static str),
}

impl ModLocation {
    /// Absolute mod directory, or `None` when the host has to resolve it.
    pub fn resolve(&self, game_path: &Path) -> Option<PathBuf> {
        match self {
            ModLocation::GameRelative(rel) => Some(join_segments(game_path, rel)),
            ModLocation::Documents(rel) => {
                let documents = dirs::document_dir()
                    .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))?;
                Some(join_segments(&documents, rel))
            }
            ModLocation::HostResolved(_) => None,
        }
    }
}

fn join_segments(base: &Path, rel: &str) -> PathBuf {
    rel.split('/')
        .filter(|s| !s.is_empty())
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

/// When a game has to be started through a store launcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherRule {
    /// Steam builds ship a marker file in the game folder
    SteamIfFilePresent {
        file: &'static str,
        app_id: &'static str,
    },
    /// Microsoft Store installs live under a fixed prefix
    XboxIfPathPrefix {
        prefix: &'static str,
        app_id: &'static str,
    },
    EpicIfInstalled { app_id: &'static str },
}

/// Launcher the host has to go through, and the id it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherRequirement {
    pub launcher: String,
    pub app_info: String,
}

// ============================================================================
// Public API
// ============================================================================

/// Find a game's install directory by trying its queries in order
pub fn find_game(game: &GameProfile, store: &dyn GameStore) -> Result<PathBuf, SetupError> {
    for query in game.queries {
        let found = match query {
            GameQuery::ByName(name) => store.find_by_name(name),
            GameQuery::ByAppId(ids) => store.find_by_app_id(ids),
            GameQuery::Registry { key, value } => store
                .read_registry(key, value)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        };

        if let Some(path) = found {
            log_info(&format!("Found {} at {:?} via {:?}", game.name, path, query));
            return Ok(path);
        }
    }

    log_warning(&format!("{} was not found in any store", game.name));
    Err(SetupError::GameNotFound(game.id.to_string()))
}

/// Absolute path of the game's executable
pub fn executable_path(game: &GameProfile, game_path: &Path) -> PathBuf {
    join_segments(game_path, game.executable)
}

/// Check that every required file of the game exists under `game_path`
pub fn validate_install(
    game: &GameProfile,
    game_path: &Path,
    fs: &dyn FileSystem,
) -> Result<(), SetupError> {
    let missing: Vec<String> = game
        .required_files
        .iter()
        .filter(|file| !fs.exists(&join_segments(game_path, file)))
        .map(|file| file.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    log_warning(&format!(
        "{} at {:?} is missing {:?}",
        game.name, game_path, missing
    ));
    Err(SetupError::MissingFiles {
        game: game.id.to_string(),
        missing,
    })
}

/// Find a game's absolute mod directory
pub fn mod_path(game: &GameProfile, game_path: &Path) -> Option<PathBuf> {
    game.mod_location.resolve(game_path)
}

/// Check whether the game must be started through a store launcher
pub fn requires_launcher(
    game: &GameProfile,
    game_path: &Path,
    store: &dyn GameStore,
    fs: &dyn FileSystem,
) -> Option<LauncherRequirement> {
    match game.launcher? {
        LauncherRule::SteamIfFilePresent { file, app_id } => fs
            .exists(&game_path.join(file))
            .then(|| LauncherRequirement {
                launcher: "steamstorelauncher".to_string(),
                app_info: app_id.to_string(),
            }),
        LauncherRule::XboxIfPathPrefix { prefix, app_id } => game_path
            .to_string_lossy()
            .starts_with(prefix)
            .then(|| LauncherRequirement {
                launcher: "xbox".to_string(),
                app_info: app_id.to_string(),
            }),
        LauncherRule::EpicIfInstalled { app_id } => store
            .is_game_installed(app_id, StoreKind::Epic)
            .filter(|launcher| !launcher.is_empty())
            .map(|launcher| LauncherRequirement {
                launcher,
                app_info: app_id.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::FakeHost;

    #[test]
    fn test_find_game_falls_back_to_second_name() {
        let host = FakeHost::default().with_game_named("State of Decay", "/games/sod");
        let game = find_by_id("stateofdecay").unwrap();

        let path = find_game(game, &host).unwrap();
        assert_eq!(path, PathBuf::from("/games/sod"));
    }

    #[test]
    fn test_find_game_prefers_registry() {
        let host = FakeHost::default()
            .with_registry("instdir", "C:\\Games\\Torchlight II")
            .with_app_id("200710", "/steam/torchlight2");
        let game = find_by_id("torchlight2").unwrap();

        let path = find_game(game, &host).unwrap();
        assert_eq!(path, PathBuf::from("C:\\Games\\Torchlight II"));
    }

    #[test]
    fn test_find_game_reports_missing_game() {
        let host = FakeHost::default();
        let game = find_by_id("elex").unwrap();

        let err = find_game(game, &host).unwrap_err();
        assert!(matches!(err, SetupError::GameNotFound(ref id) if id == "elex"));
    }

    #[test]
    fn test_torchlight_install_needs_both_executables() {
        let game = find_by_id("torchlight2").unwrap();
        let partial = FakeHost::default().with_file("/games/tl2/Torchlight2.exe");

        let err = validate_install(game, Path::new("/games/tl2"), &partial).unwrap_err();
        assert_eq!(
            err,
            SetupError::MissingFiles {
                game: "torchlight2".to_string(),
                missing: vec!["ModLauncher.exe".to_string()],
            }
        );

        let complete = partial.with_file("/games/tl2/ModLauncher.exe");
        assert!(validate_install(game, Path::new("/games/tl2"), &complete).is_ok());
    }

    #[test]
    fn test_games_without_required_files_always_validate() {
        let game = find_by_id("dawnofman").unwrap();
        assert!(game.required_files.is_empty());
        assert!(validate_install(game, Path::new("/games/dom"), &FakeHost::default()).is_ok());
    }

    #[test]
    fn test_executable_path_follows_nested_layout() {
        let elex = find_by_id("elex").unwrap();
        assert_eq!(
            executable_path(elex, Path::new("/games/elex")),
            PathBuf::from("/games/elex/system/ELEX.exe")
        );
        let elex_host = FakeHost::default().with_file("/games/elex/system/ELEX.exe");
        assert!(validate_install(elex, Path::new("/games/elex"), &elex_host).is_ok());
    }

    #[test]
    fn test_game_relative_mod_path() {
        let game = find_by_id("elex").unwrap();
        let path = mod_path(game, Path::new("/games/elex")).unwrap();
        assert_eq!(path, PathBuf::from("/games/elex/data/packed"));
    }

    #[test]
    fn test_host_resolved_mod_path_is_unknown() {
        let game = find_by_id("halothemasterchiefcollection").unwrap();
        assert!(mod_path(game, Path::new("/games/mcc")).is_none());
    }

    #[test]
    fn test_steam_launcher_requires_marker_file() {
        let game = find_by_id("torchlight2").unwrap();
        let without = FakeHost::default();
        assert!(requires_launcher(game, Path::new("/games/tl2"), &without, &without).is_none());

        let with = FakeHost::default().with_file("/games/tl2/steam_api.dll");
        let req = requires_launcher(game, Path::new("/games/tl2"), &with, &with).unwrap();
        assert_eq!(req.launcher, "steamstorelauncher");
        assert_eq!(req.app_info, "200710");
    }

    #[test]
    fn test_xbox_launcher_for_store_installs() {
        let game = find_by_id("halothemasterchiefcollection").unwrap();
        let host = FakeHost::default();

        let req = requires_launcher(
            game,
            Path::new("C:\\Program Files\\WindowsApps\\Chelan"),
            &host,
            &host,
        )
        .unwrap();
        assert_eq!(req.launcher, "xbox");
        assert_eq!(req.app_info, "Microsoft.Chelan");

        assert!(requires_launcher(game, Path::new("D:\\Steam\\MCC"), &host, &host).is_none());
    }

    #[test]
    fn test_epic_launcher_when_installed() {
        let game = find_by_id("untitledgoosegame").unwrap();
        let host = FakeHost::default().with_epic_launcher("Flour", "epic");

        let req = requires_launcher(game, Path::new("/games/goose"), &host, &host).unwrap();
        assert_eq!(req.launcher, "epic");
        assert_eq!(req.app_info, "Flour");
    }

    #[test]
    fn test_games_without_launcher_rule() {
        let game = find_by_id("elex").unwrap();
        let host = FakeHost::default().with_file("/games/elex/steam_api.dll");
        assert!(requires_launcher(game, Path::new("/games/elex"), &host, &host).is_none());
    }
}
