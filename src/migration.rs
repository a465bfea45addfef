//! Upgrade notices for games whose mod loader changed
//!
//! Games that used to rely on Unity Mod Manager now get the built-in patcher.
//! Users upgrading from an older registration with mods already installed are
//! told to remove the UMM patch before adding the new one.

use crate::game_finder::GameProfile;
use crate::host::{ModsRegistry, Notification, NotificationKind, Notifier};
use crate::logging::{log_info, log_warning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationRule {
    /// Registrations older than this need the notice
    pub below_version: &'static str,
    pub notice_id: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationNotice {
    pub notice_id: &'static str,
    pub game_id: &'static str,
    /// Dialog title
    pub title: &'static str,
    pub message: String,
    pub explanation: String,
}

/// Notice to show for an upgrade from `old_version`, if any
pub fn check_migration(
    game: &'static GameProfile,
    old_version: &str,
    mods: &dyn ModsRegistry,
) -> Option<MigrationNotice> {
    let rule = game
        .migrations
        .iter()
        .find(|rule| is_older(old_version, rule.below_version))?;

    if !mods.has_existing_mods(game.id) {
        log_info(&format!(
            "{}: upgrading from {} with no mods installed, nothing to migrate",
            game.id, old_version
        ));
        return None;
    }

    log_warning(&format!(
        "{}: upgrading from {} (< {}) with mods installed",
        game.id, old_version, rule.below_version
    ));

    Some(MigrationNotice {
        notice_id: rule.notice_id,
        game_id: game.id,
        title: game.name,
        message: "Unity Mod Manager is no longer required".to_string(),
        explanation: explanation(game.name),
    })
}

/// Send the notice as a sticky warning
pub fn notify_migration(notice: &MigrationNotice, notifier: &dyn Notifier) {
    notifier.send_notification(Notification {
        id: Some(notice.notice_id.to_string()),
        kind: NotificationKind::Warning,
        message: notice.message.clone(),
        no_dismiss: true,
    });
}

/// Unparseable versions count as up to date
fn is_older(old_version: &str, below: &str) -> bool {
    let old_version = old_version.trim();
    if old_version.is_empty() {
        return false;
    }
    version_compare::compare_to(old_version, below, version_compare::Cmp::Lt).unwrap_or(false)
}

fn explanation(game_name: &str) -> String {
    let name = game_name.replace('\t', " ");
    format!(
        "A built-in Unity patcher now loads existing UMM mods as well as patcher mods.\n\n\
         1. Your mods and UMM installation are intact; you can keep playing {name} through UMM, \
         but UMM cannot load patcher mods.\n\n\
         2. Do not add the built-in patcher until the UMM patch has been removed.\n\n\
         3. To remove the UMM patch, start UMM, select {name} and click uninstall.\n\n\
         4. Then run the \"Patcher - Add\" action to inject the built-in patcher."
    )
}
