//! Common installer types shared between the classifier, builder and resolver
//!
//! File entries are archive-relative path strings. Both `/` and `\` are read
//! as separators; a trailing separator marks a directory placeholder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;

use super::variants::AmbiguityPolicy;

// ============================================================================
// Shared Installation Errors
// ============================================================================

/// Failure of a single install attempt.
///
/// "Not my mod" is never an error: classifiers report it as an unsupported
/// `SupportResult` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstallError {
    /// The builder was called on an archive without an anchor file
    #[error("{installer}: no anchor file found in archive '{archive}'")]
    NoAnchorFound { installer: String, archive: String },

    /// More than one layout variant matched and the policy rejects ambiguity
    #[error("{game}: archive matches '{chosen}' and also {also_matched:?}")]
    AmbiguousVariant {
        game: String,
        chosen: String,
        also_matched: Vec<String>,
    },

    /// Every entry was filtered out of the plan
    #[error("{installer}: nothing to install from archive '{archive}'")]
    EmptyPlan { installer: String, archive: String },

    /// The installer was invoked for a game it doesn't own
    #[error("{installer} installs mods for '{expected}', not '{actual}'")]
    WrongGame {
        installer: String,
        expected: String,
        actual: String,
    },

    /// No game with this id is known
    #[error("Unknown game: {0}")]
    UnknownGame(String),
}

// ============================================================================
// Host-facing Results
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionKind {
    Copy,
}

/// One file to relocate from the archive into the mod's install directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CopyInstruction {
    #[serde(rename = "type")]
    pub kind: InstructionKind,
    pub source: String,
    pub destination: String,
}

impl CopyInstruction {
    pub fn copy(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            kind: InstructionKind::Copy,
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Answer to "can this installer handle the archive?"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportResult {
    pub supported: bool,
    pub required_files: Vec<String>,
}

impl SupportResult {
    pub fn supported() -> Self {
        Self {
            supported: true,
            required_files: Vec::new(),
        }
    }

    pub fn unsupported() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallResult {
    pub instructions: Vec<CopyInstruction>,
}

// ============================================================================
// Plan Options
// ============================================================================

/// Knobs that shape a plan; usually derived from `AppConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    /// Separator used when joining destination paths
    pub separator: char,
    /// Suffix the host appends to staging directories (e.g. ".installing")
    pub working_suffix: String,
    pub ambiguity: AmbiguityPolicy,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            separator: '/',
            working_suffix: ".installing".to_string(),
            ambiguity: AmbiguityPolicy::FirstMatch,
        }
    }
}

impl From<&AppConfig> for PlanOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            separator: config.path_separator,
            working_suffix: config.working_suffix.clone(),
            ambiguity: config.ambiguity_policy,
        }
    }
}

// ============================================================================
// Path Helpers
// ============================================================================

pub fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Directory placeholders (and empty entries) carry no file content.
pub fn is_directory(entry: &str) -> bool {
    entry.is_empty() || entry.ends_with(is_separator)
}

/// Everything after the last separator.
pub fn file_name(entry: &str) -> &str {
    match entry.rfind(is_separator) {
        Some(idx) => &entry[idx + 1..],
        None => entry,
    }
}

/// Everything up to and including the last separator ("" for top-level entries).
pub fn parent_prefix(entry: &str) -> &str {
    match entry.rfind(is_separator) {
        Some(idx) => &entry[..=idx],
        None => "",
    }
}

/// Name of the directory directly containing `entry`, if any.
pub fn parent_name(entry: &str) -> Option<&str> {
    let prefix = parent_prefix(entry);
    if prefix.is_empty() {
        return None;
    }
    Some(file_name(&prefix[..prefix.len() - 1]))
}

/// True if any segment of `path` is `..`.
pub fn has_parent_traversal(path: &str) -> bool {
    path.split(is_separator).any(|segment| segment == "..")
}

/// True if `path` would resolve outside a directory it is joined onto:
/// a `..` segment, a leading separator, or a drive prefix like `C:`.
pub fn escapes_root(path: &str) -> bool {
    let mut chars = path.chars();
    let drive_prefix = matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    );
    drive_prefix || path.starts_with(is_separator) || has_parent_traversal(path)
}

/// Join `rest` onto `base`; every separator in the result is `separator`.
pub fn join(separator: char, base: &str, rest: &str) -> String {
    let rest: String = rest
        .chars()
        .map(|c| if is_separator(c) { separator } else { c })
        .collect();
    if base.is_empty() {
        return rest;
    }
    format!("{}{}{}", base, separator, rest)
}

/// Derive the mod folder name from the host's staging directory.
///
/// Takes the last path segment, strips `working_suffix`, and keeps ASCII letters only.
pub fn sanitize_mod_name(destination_path: &str, working_suffix: &str) -> String {
    let trimmed = destination_path.trim_end_matches(is_separator);
    let base = file_name(trimmed);
    let base = match base.strip_suffix(working_suffix) {
        Some(stripped) if !stripped.is_empty() && !working_suffix.is_empty() => stripped,
        _ => base,
    };
    base.chars().filter(char::is_ascii_alphabetic).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_detection() {
        assert!(is_directory("mods/MyMod/"));
        assert!(is_directory("mods\\MyMod\\"));
        assert!(is_directory(""));
        assert!(!is_directory("mods/MyMod/data.pak"));
    }

    #[test]
    fn test_file_name_and_prefix() {
        assert_eq!(file_name("mods/MyMod/data.pak"), "data.pak");
        assert_eq!(file_name("mods\\MyMod\\data.pak"), "data.pak");
        assert_eq!(file_name("data.pak"), "data.pak");
        assert_eq!(parent_prefix("mods/MyMod/data.pak"), "mods/MyMod/");
        assert_eq!(parent_prefix("data.pak"), "");
    }

    #[test]
    fn test_parent_name() {
        assert_eq!(parent_name("Some Mod/fomod/ModuleConfig.xml"), Some("fomod"));
        assert_eq!(parent_name("fomod\\ModuleConfig.xml"), Some("fomod"));
        assert_eq!(parent_name("ModuleConfig.xml"), None);
    }

    #[test]
    fn test_parent_traversal() {
        assert!(has_parent_traversal("../evil.pak"));
        assert!(has_parent_traversal("a/../../b"));
        assert!(!has_parent_traversal("a/..b/c"));
    }

    #[test]
    fn test_escapes_root() {
        assert!(escapes_root("/etc/evil.txt"));
        assert!(escapes_root("\\Windows\\evil.dll"));
        assert!(escapes_root("C:\\Windows\\evil.dll"));
        assert!(escapes_root("c:evil.dll"));
        assert!(escapes_root("a/../../b"));
        assert!(!escapes_root("Scripts/Mod.cs"));
        assert!(!escapes_root("1:2.txt"));
    }

    #[test]
    fn test_join_uses_configured_separator() {
        assert_eq!(join('\\', "Fire", "Scripts/Mod.cs"), "Fire\\Scripts\\Mod.cs");
        assert_eq!(join('/', "Fire", "Scripts\\Mod.cs"), "Fire/Scripts/Mod.cs");
        assert_eq!(join('/', "", "a\\b.pak"), "a/b.pak");
    }

    #[test]
    fn test_sanitize_mod_name() {
        assert_eq!(
            sanitize_mod_name("/staging/dawnofman/Better Fire-12-1-0.installing", ".installing"),
            "BetterFire"
        );
        assert_eq!(sanitize_mod_name("C:\\staging\\My_Mod 2\\", ".installing"), "MyMod");
        assert_eq!(sanitize_mod_name("1234.installing", ".installing"), "");
    }

    #[test]
    fn test_instruction_serializes_like_host_expects() {
        let inst = CopyInstruction::copy("mods/MyMod/data.pak", "data.pak");
        let json = serde_json::to_value(&inst).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "copy",
                "source": "mods/MyMod/data.pak",
                "destination": "data.pak",
            })
        );

        let support = serde_json::to_value(SupportResult::supported()).unwrap();
        assert_eq!(support, serde_json::json!({ "supported": true, "requiredFiles": [] }));
    }
}
