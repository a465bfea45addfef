//! Known games configuration
//!
//! Contains the registration data for every game ModPlan supports:
//! - Store identifiers (Steam App ID, Epic AppName, Microsoft Store id)
//! - Executable and required files used to validate a discovered install
//! - Where mods go and what has to happen before modding
//! - The installer layouts recognised for the game

use crate::installers::layout::{
    AnchorRule, DestinationStrategy, LayoutVariant, FOMOD_INSTALLER,
};
use crate::migration::MigrationRule;
use crate::mod_types::ModType;
use crate::setup::{PatcherConfig, SetupStep};

use super::{GameQuery, LauncherRule, ModLocation};

/// Registration record for a supported game
#[derive(Debug, Clone)]
pub struct GameProfile {
    /// Nexus Mods game id
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Executable relative to the game folder ('/' separated)
    pub executable: &'static str,
    /// Files that must exist in a valid install
    pub required_files: &'static [&'static str],
    pub steam_app_id: Option<&'static str>,
    pub epic_app_id: Option<&'static str>,
    pub ms_app_id: Option<&'static str>,
    /// How to find the install, tried in order
    pub queries: &'static [GameQuery],
    pub mod_location: ModLocation,
    /// Mods are deployed into one shared folder
    pub merge_mods: bool,
    pub launcher: Option<LauncherRule>,
    pub patcher: Option<PatcherConfig>,
    /// Run in order by `prepare_for_modding`
    pub setup: &'static [SetupStep],
    /// Installer registrations, one per recognised layout
    pub variants: &'static [LayoutVariant],
    pub mod_types: &'static [ModType],
    pub migrations: &'static [MigrationRule],
}

impl GameProfile {
    pub fn has_installers(&self) -> bool {
        !self.variants.is_empty()
    }
}

const DAWN_OF_MAN_SCENARIOS: ModLocation = ModLocation::Documents("DawnOfMan/Scenarios");
const SCENE_FILE: AnchorRule = AnchorRule::Extension(".scn.xml");
const UMM_MOD_INFO: AnchorRule = AnchorRule::FileName("Info.json");

/// All known games that ModPlan supports
pub const KNOWN_GAMES: &[GameProfile] = &[
    GameProfile {
        id: "breakingwheel",
        name: "Breaking Wheel",
        executable: "Ellie_Ball_Project.exe",
        required_files: &["Ellie_Ball_Project.exe"],
        steam_app_id: Some("545890"),
        epic_app_id: None,
        ms_app_id: None,
        queries: &[GameQuery::ByName("Breaking Wheel")],
        mod_location: ModLocation::GameRelative("ModdingTools"),
        merge_mods: true,
        launcher: None,
        patcher: None,
        setup: &[],
        variants: &[],
        mod_types: &[],
        migrations: &[],
    },
    GameProfile {
        id: "dawnofman",
        name: "Dawn of Man",
        executable: "DawnOfMan.exe",
        required_files: &[],
        steam_app_id: Some("858810"),
        epic_app_id: None,
        ms_app_id: None,
        queries: &[GameQuery::ByName("Dawn of Man")],
        mod_location: ModLocation::GameRelative("Mods"),
        merge_mods: true,
        launcher: None,
        patcher: Some(PatcherConfig {
            data_path: "DawnOfMan_Data/Managed",
            entry_point: "DawnOfMan.TitleStateMain::init",
            mods_path: Some("Mods"),
        }),
        setup: &[
            SetupStep::RunPatcher { only_without_mods: true },
            SetupStep::EnsureDir { location: DAWN_OF_MAN_SCENARIOS, writable: true },
            SetupStep::EnsureDir { location: ModLocation::GameRelative("Mods"), writable: true },
        ],
        // Scene archives are tried first; see VariantResolver for ties
        variants: &[
            LayoutVariant {
                installer_id: "dom-scene-installer",
                priority: 25,
                anchor: SCENE_FILE,
                exclusion: None,
                destination: DestinationStrategy::NameSpaced,
            },
            LayoutVariant {
                installer_id: "dom-mod",
                priority: 25,
                anchor: UMM_MOD_INFO,
                exclusion: None,
                destination: DestinationStrategy::NameSpaced,
            },
        ],
        mod_types: &[ModType {
            id: "dom-scene-modtype",
            priority: 25,
            marker: SCENE_FILE,
            location: DAWN_OF_MAN_SCENARIOS,
        }],
        migrations: &[MigrationRule {
            below_version: "0.1.0",
            notice_id: "dom-requires-upgrade",
        }],
    },
    GameProfile {
        id: "elex",
        name: "Elex",
        executable: "system/ELEX.exe",
        required_files: &["system/ELEX.exe"],
        steam_app_id: Some("411300"),
        epic_app_id: None,
        ms_app_id: None,
        queries: &[GameQuery::ByAppId(&["411300"])],
        mod_location: ModLocation::GameRelative("data/packed"),
        merge_mods: true,
        launcher: None,
        patcher: None,
        setup: &[SetupStep::EnsureDir {
            location: ModLocation::GameRelative("data/packed"),
            writable: true,
        }],
        variants: &[LayoutVariant {
            installer_id: "elex-mod",
            priority: 25,
            anchor: AnchorRule::Extension(".pak"),
            exclusion: Some(FOMOD_INSTALLER),
            destination: DestinationStrategy::RootRelative,
        }],
        mod_types: &[],
        migrations: &[],
    },
    GameProfile {
        id: "grimrock",
        name: "Legend of Grimrock",
        executable: "grimrock.exe",
        required_files: &["grimrock.exe"],
        steam_app_id: Some("207170"),
        epic_app_id: None,
        ms_app_id: None,
        queries: &[GameQuery::ByName("Legend of Grimrock")],
        mod_location: ModLocation::Documents("Almost Human/Legend of Grimrock/Dungeons"),
        merge_mods: true,
        launcher: None,
        patcher: None,
        setup: &[SetupStep::EnsureDir {
            location: ModLocation::Documents("Almost Human/Legend of Grimrock/Dungeons"),
            writable: false,
        }],
        variants: &[],
        mod_types: &[],
        migrations: &[],
    },
    GameProfile {
        id: "halothemasterchiefcollection",
        name: "Master Chief Collection:\tREACH",
        executable: "mcclauncher.exe",
        required_files: &[],
        steam_app_id: Some("976730"),
        epic_app_id: None,
        ms_app_id: Some("Microsoft.Chelan"),
        queries: &[GameQuery::ByAppId(&["Microsoft.Chelan", "976730"])],
        // LocalLow/MCC/LocalFiles/<xbox user id>/HaloReach, known only after the game ran once
        mod_location: ModLocation::HostResolved("HaloReach"),
        merge_mods: true,
        launcher: Some(LauncherRule::XboxIfPathPrefix {
            prefix: "C:\\Program Files\\WindowsApps",
            app_id: "Microsoft.Chelan",
        }),
        patcher: None,
        setup: &[],
        variants: &[],
        mod_types: &[],
        migrations: &[],
    },
    GameProfile {
        id: "pathfinderkingmaker",
        name: "Pathfinder:\tKingmaker",
        executable: "Kingmaker.exe",
        required_files: &["Kingmaker.exe"],
        steam_app_id: Some("640820"),
        epic_app_id: None,
        ms_app_id: None,
        queries: &[GameQuery::ByName("Kingmaker")],
        mod_location: ModLocation::GameRelative("Mods"),
        merge_mods: true,
        launcher: None,
        patcher: Some(PatcherConfig {
            data_path: "Kingmaker_Data/Managed",
            entry_point: "Kingmaker.GameStarter::Awake",
            mods_path: Some("Mods"),
        }),
        setup: &[
            SetupStep::RunPatcher { only_without_mods: true },
            SetupStep::EnsureDir { location: ModLocation::GameRelative("Mods"), writable: true },
        ],
        variants: &[],
        mod_types: &[],
        migrations: &[MigrationRule {
            below_version: "0.3.0",
            notice_id: "pk-requires-upgrade",
        }],
    },
    GameProfile {
        id: "stateofdecay",
        name: "State of Decay",
        executable: "StateOfDecay.exe",
        required_files: &["StateOfDecay.exe"],
        steam_app_id: Some("241540"),
        epic_app_id: None,
        ms_app_id: None,
        queries: &[
            GameQuery::ByName("State of Decay: Year-One"),
            GameQuery::ByName("State of Decay"),
        ],
        mod_location: ModLocation::GameRelative("game"),
        merge_mods: true,
        launcher: None,
        patcher: None,
        setup: &[],
        variants: &[],
        mod_types: &[],
        migrations: &[],
    },
    GameProfile {
        id: "torchlight2",
        name: "Torchlight II",
        executable: "ModLauncher.exe",
        required_files: &["Torchlight2.exe", "ModLauncher.exe"],
        steam_app_id: Some("200710"),
        epic_app_id: None,
        ms_app_id: None,
        queries: &[
            GameQuery::Registry {
                key: "SOFTWARE\\WOW6432Node\\runic games\\torchlight ii",
                value: "instdir",
            },
            GameQuery::ByAppId(&["200710"]),
        ],
        mod_location: ModLocation::Documents("My Games/runic games/torchlight 2/mods"),
        merge_mods: true,
        launcher: Some(LauncherRule::SteamIfFilePresent {
            file: "steam_api.dll",
            app_id: "200710",
        }),
        patcher: None,
        setup: &[SetupStep::EnsureDir {
            location: ModLocation::Documents("My Games/runic games/torchlight 2/mods"),
            writable: true,
        }],
        variants: &[LayoutVariant {
            installer_id: "torchlight2-mod",
            priority: 25,
            anchor: AnchorRule::Extension(".mod"),
            exclusion: None,
            destination: DestinationStrategy::FolderPerAnchor,
        }],
        mod_types: &[],
        migrations: &[],
    },
    GameProfile {
        id: "untitledgoosegame",
        name: "Untitled Goose Game",
        executable: "Untitled.exe",
        required_files: &["Untitled.exe", "UnityPlayer.dll"],
        steam_app_id: None,
        epic_app_id: Some("Flour"),
        ms_app_id: None,
        queries: &[GameQuery::ByAppId(&["Flour"])],
        mod_location: ModLocation::GameRelative("Untitled_Data/Managed/VortexMods"),
        merge_mods: true,
        launcher: Some(LauncherRule::EpicIfInstalled { app_id: "Flour" }),
        patcher: Some(PatcherConfig {
            data_path: "Untitled_Data/Managed",
            entry_point: "GameManager::Awake",
            mods_path: None,
        }),
        setup: &[
            SetupStep::RunPatcher { only_without_mods: false },
            SetupStep::EnsureDir {
                location: ModLocation::GameRelative("Untitled_Data/Managed/VortexMods"),
                writable: true,
            },
        ],
        variants: &[],
        mod_types: &[],
        migrations: &[],
    },
];

// ============================================================================
// Lookup Functions
// ============================================================================

/// Find a known game by its game id
pub fn find_by_id(id: &str) -> Option<&'static GameProfile> {
    KNOWN_GAMES.iter().find(|g| g.id == id)
}

/// Find a known game by Steam App ID
pub fn find_by_steam_id(app_id: &str) -> Option<&'static GameProfile> {
    KNOWN_GAMES
        .iter()
        .find(|g| g.steam_app_id == Some(app_id))
}

/// Find a known game by Epic AppName
pub fn find_by_epic_id(app_name: &str) -> Option<&'static GameProfile> {
    KNOWN_GAMES
        .iter()
        .find(|g| g.epic_app_id == Some(app_name))
}

/// Find a known game by display name (case-insensitive, tabs read as spaces)
pub fn find_by_name(name: &str) -> Option<&'static GameProfile> {
    let wanted = normalize_name(name);
    KNOWN_GAMES
        .iter()
        .find(|g| normalize_name(g.name) == wanted)
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
