//! Capabilities the host application provides
//!
//! ModPlan never touches game stores, the filesystem, the user interface or the
//! patcher directly. Hosts implement these traits and hand them in.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure reported by a host capability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HostError(pub String);

impl From<&str> for HostError {
    fn from(msg: &str) -> Self {
        Self(msg.to_string())
    }
}

impl From<String> for HostError {
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

/// Store a game can be installed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Steam,
    Epic,
    Xbox,
}

/// Game-store discovery (Steam, Epic, Xbox, Windows registry).
pub trait GameStore {
    fn find_by_name(&self, name: &str) -> Option<PathBuf>;

    /// First installed game matching any of `app_ids`
    fn find_by_app_id(&self, app_ids: &[&str]) -> Option<PathBuf>;

    /// Launcher id if the game is installed through `store`
    fn is_game_installed(&self, app_id: &str, store: StoreKind) -> Option<String>;

    /// Value under HKEY_LOCAL_MACHINE, if the host has a registry
    fn read_registry(&self, _key: &str, _value: &str) -> Option<String> {
        None
    }
}

pub trait FileSystem {
    /// Create `path` if needed; with `writable`, also verify it can be written to
    fn ensure_dir(&self, path: &Path, writable: bool) -> Result<(), HostError>;

    fn exists(&self, path: &Path) -> bool;
}

/// Read access to the host's persistent mod state.
pub trait ModsRegistry {
    fn has_existing_mods(&self, game_id: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Option<String>,
    pub kind: NotificationKind,
    pub message: String,
    /// Stays until the user acts on it
    pub no_dismiss: bool,
}

pub trait Notifier {
    fn send_notification(&self, notification: Notification);
}

/// Arguments for one run of the Unity assembly patcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatcherInvocation {
    pub extension_root: PathBuf,
    /// Managed assembly directory
    pub data_path: PathBuf,
    pub entry_point: String,
    pub remove: bool,
    pub mods_path: Option<PathBuf>,
}

pub trait Patcher {
    fn run_patcher(&self, invocation: &PatcherInvocation) -> Result<(), HostError>;
}

pub trait SessionState {
    /// Whether the game or another tool is currently running
    fn tools_running(&self) -> bool;
}

/// Everything setup needs from the host, borrowed for the duration of a call.
#[derive(Clone, Copy)]
pub struct HostContext<'a> {
    pub store: &'a dyn GameStore,
    pub fs: &'a dyn FileSystem,
    pub mods: &'a dyn ModsRegistry,
    pub notifier: &'a dyn Notifier,
    pub patcher: &'a dyn Patcher,
    pub session: &'a dyn SessionState,
    /// Directory the patcher ships its payload from
    pub extension_root: &'a Path,
}
