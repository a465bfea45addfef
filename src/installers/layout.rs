//! Declarative description of a recognised mod layout
//!
//! A game registers one `LayoutVariant` per installer. Everything here is
//! `const`-constructible so the game table can live in static data.

use super::common::{file_name, is_directory, parent_name};

/// Predicate that finds the file anchoring a mod's root.
///
/// Comparisons are case-insensitive; archives come with arbitrary casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorRule {
    /// File name ends with the extension (multi-dot extensions like `.scn.xml` allowed)
    Extension(&'static str),
    /// File name equals the given name
    FileName(&'static str),
}

impl AnchorRule {
    pub fn matches(&self, entry: &str) -> bool {
        if is_directory(entry) {
            return false;
        }
        let name = file_name(entry).to_lowercase();
        match self {
            // A bare ".pak" is a dotfile, not a .pak file
            AnchorRule::Extension(ext) => {
                name.len() > ext.len() && name.ends_with(&ext.to_lowercase())
            }
            AnchorRule::FileName(expected) => name == expected.to_lowercase(),
        }
    }

    /// First matching entry in list order.
    pub fn find<'f, S: AsRef<str>>(&self, files: &'f [S]) -> Option<Anchor<'f>> {
        files
            .iter()
            .map(|entry| entry.as_ref())
            .enumerate()
            .find(|(_, entry)| self.matches(entry))
            .map(|(index, path)| Anchor { index, path })
    }

    pub fn describe(&self) -> String {
        match self {
            AnchorRule::Extension(ext) => format!("*{}", ext),
            AnchorRule::FileName(name) => (*name).to_string(),
        }
    }
}

/// The file that established a mod's root, and where it sits in the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor<'f> {
    pub index: usize,
    pub path: &'f str,
}

impl<'f> Anchor<'f> {
    /// Byte offset of the anchor's file name within its own path.
    ///
    /// Also the length of the mod root prefix.
    pub fn offset(&self) -> usize {
        self.path.len() - file_name(self.path).len()
    }

    /// Directory prefix every installed entry must share, separator included.
    pub fn root(&self) -> &'f str {
        &self.path[..self.offset()]
    }
}

/// Disqualifies an archive that would otherwise match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionRule {
    /// A `dir/file` pair anywhere in the archive, e.g. a FOMOD installer script
    FileInDirectory {
        dir: &'static str,
        file: &'static str,
    },
}

impl ExclusionRule {
    pub fn is_triggered<S: AsRef<str>>(&self, files: &[S]) -> bool {
        match self {
            ExclusionRule::FileInDirectory { dir, file } => files.iter().any(|entry| {
                let entry = entry.as_ref();
                !is_directory(entry)
                    && file_name(entry).eq_ignore_ascii_case(file)
                    && parent_name(entry).is_some_and(|parent| parent.eq_ignore_ascii_case(dir))
            }),
        }
    }
}

/// FOMOD scripted installers are handled by a dedicated installer on the host side.
pub const FOMOD_INSTALLER: ExclusionRule = ExclusionRule::FileInDirectory {
    dir: "fomod",
    file: "ModuleConfig.xml",
};

/// How an entry's archive path maps to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationStrategy {
    /// Strip the mod root; keep the structure below it
    RootRelative,
    /// Strip the mod root and nest under the sanitized mod name
    NameSpaced,
    /// Copy only anchor files, each into a folder named after its stem
    FolderPerAnchor,
}

/// One installer registration: how to recognise a layout and how to place it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutVariant {
    pub installer_id: &'static str,
    /// Lower runs first
    pub priority: i32,
    pub anchor: AnchorRule,
    pub exclusion: Option<ExclusionRule>,
    pub destination: DestinationStrategy,
}

impl LayoutVariant {
    /// Anchor present and no exclusion triggered.
    pub fn matches<S: AsRef<str>>(&self, files: &[S]) -> bool {
        if self.anchor.find(files).is_none() {
            return false;
        }
        !self
            .exclusion
            .is_some_and(|exclusion| exclusion.is_triggered(files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_rule_ignores_case() {
        let rule = AnchorRule::Extension(".pak");
        assert!(rule.matches("mods/MyMod/data.pak"));
        assert!(rule.matches("mods/MyMod/DATA.PAK"));
        assert!(!rule.matches("mods/MyMod/data.pak.txt"));
        assert!(!rule.matches("mods/MyMod/.pak"));
        assert!(!rule.matches("mods/weird.pak/"));
    }

    #[test]
    fn test_multi_dot_extension() {
        let rule = AnchorRule::Extension(".scn.xml");
        assert!(rule.matches("Scenarios/level.scn.xml"));
        assert!(rule.matches("level.SCN.XML"));
        assert!(!rule.matches("level.xml"));
    }

    #[test]
    fn test_file_name_rule_requires_exact_name() {
        let rule = AnchorRule::FileName("Info.json");
        assert!(rule.matches("MyMod/Info.json"));
        assert!(rule.matches("MyMod/info.JSON"));
        assert!(!rule.matches("MyMod/ModInfo.json"));
    }

    #[test]
    fn test_first_anchor_wins() {
        let files = ["a/first.pak", "b/second.pak"];
        let anchor = AnchorRule::Extension(".pak").find(&files).unwrap();
        assert_eq!(anchor.index, 0);
        assert_eq!(anchor.path, "a/first.pak");
        assert_eq!(anchor.root(), "a/");
        assert_eq!(anchor.offset(), 2);
    }

    #[test]
    fn test_top_level_anchor_has_empty_root() {
        let files = vec!["Info.json".to_string()];
        let anchor = AnchorRule::FileName("Info.json").find(&files).unwrap();
        assert_eq!(anchor.root(), "");
        assert_eq!(anchor.offset(), 0);
    }

    #[test]
    fn test_fomod_exclusion() {
        assert!(FOMOD_INSTALLER.is_triggered(&["MyMod/data.pak", "MyMod/FOMOD/moduleconfig.xml"]));
        assert!(FOMOD_INSTALLER.is_triggered(&["fomod/ModuleConfig.xml"]));
        assert!(!FOMOD_INSTALLER.is_triggered(&["ModuleConfig.xml", "fomod/info.xml"]));
    }

    #[test]
    fn test_variant_matches_respects_exclusion() {
        let variant = LayoutVariant {
            installer_id: "test-mod",
            priority: 25,
            anchor: AnchorRule::Extension(".pak"),
            exclusion: Some(FOMOD_INSTALLER),
            destination: DestinationStrategy::RootRelative,
        };
        assert!(variant.matches(&["data.pak"]));
        assert!(!variant.matches(&["data.pak", "fomod/ModuleConfig.xml"]));
        assert!(!variant.matches(&["readme.txt"]));
    }
}
