//! Variant resolution for games with more than one mod layout
//!
//! Variants are tried in priority order (lower first, registration order on
//! ties). The first match wins; later matches are reported as ambiguity.

use serde::{Deserialize, Serialize};

use super::layout::LayoutVariant;

/// What to do with an archive that matches several variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguityPolicy {
    /// Take the first variant in priority order and log a warning
    #[default]
    FirstMatch,
    /// Treat the archive as unsupported and fail installs
    Reject,
}

/// Outcome of resolving a file list against a game's variants.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub variant: &'a LayoutVariant,
    pub also_matched: Vec<&'a LayoutVariant>,
}

impl Resolution<'_> {
    pub fn is_ambiguous(&self) -> bool {
        !self.also_matched.is_empty()
    }

    pub fn also_matched_ids(&self) -> Vec<String> {
        self.also_matched
            .iter()
            .map(|v| v.installer_id.to_string())
            .collect()
    }
}

pub struct VariantResolver<'a> {
    ordered: Vec<&'a LayoutVariant>,
}

impl<'a> VariantResolver<'a> {
    pub fn new(variants: &'a [LayoutVariant]) -> Self {
        let mut ordered: Vec<&LayoutVariant> = variants.iter().collect();
        // stable: equal priorities keep registration order
        ordered.sort_by_key(|v| v.priority);
        Self { ordered }
    }

    /// Variants in the order they are tried.
    pub fn ordered(&self) -> &[&'a LayoutVariant] {
        &self.ordered
    }

    pub fn resolve<S: AsRef<str>>(&self, files: &[S]) -> Option<Resolution<'a>> {
        let mut matching = self.ordered.iter().copied().filter(|v| v.matches(files));
        let variant = matching.next()?;
        Some(Resolution {
            variant,
            also_matched: matching.collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installers::layout::{AnchorRule, DestinationStrategy};

    const SCENE: LayoutVariant = LayoutVariant {
        installer_id: "scene",
        priority: 25,
        anchor: AnchorRule::Extension(".scn.xml"),
        exclusion: None,
        destination: DestinationStrategy::NameSpaced,
    };

    const MANIFEST: LayoutVariant = LayoutVariant {
        installer_id: "manifest",
        priority: 25,
        anchor: AnchorRule::FileName("Info.json"),
        exclusion: None,
        destination: DestinationStrategy::NameSpaced,
    };

    #[test]
    fn test_resolves_each_marker_to_its_variant() {
        let variants = [SCENE, MANIFEST];
        let resolver = VariantResolver::new(&variants);

        let scene = resolver.resolve(&["level.scn.xml"]).unwrap();
        assert_eq!(scene.variant.installer_id, "scene");
        assert!(!scene.is_ambiguous());

        let manifest = resolver.resolve(&["Info.json", "Scripts/Mod.cs"]).unwrap();
        assert_eq!(manifest.variant.installer_id, "manifest");

        assert!(resolver.resolve(&["readme.txt"]).is_none());
    }

    #[test]
    fn test_ambiguous_archive_takes_registration_order() {
        let variants = [SCENE, MANIFEST];
        let resolver = VariantResolver::new(&variants);

        let resolution = resolver.resolve(&["Info.json", "level.scn.xml"]).unwrap();
        assert_eq!(resolution.variant.installer_id, "scene");
        assert!(resolution.is_ambiguous());
        assert_eq!(resolution.also_matched_ids(), vec!["manifest".to_string()]);
    }

    #[test]
    fn test_lower_priority_value_runs_first() {
        let early_manifest = LayoutVariant {
            priority: 10,
            ..MANIFEST
        };
        let variants = [SCENE, early_manifest];
        let resolver = VariantResolver::new(&variants);

        assert_eq!(resolver.ordered()[0].installer_id, "manifest");
        let resolution = resolver.resolve(&["Info.json", "level.scn.xml"]).unwrap();
        assert_eq!(resolution.variant.installer_id, "manifest");
    }

    #[test]
    fn test_policy_serializes_kebab_case() {
        let json = serde_json::to_string(&AmbiguityPolicy::FirstMatch).unwrap();
        assert_eq!(json, "\"first-match\"");
        let policy: AmbiguityPolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(policy, AmbiguityPolicy::Reject);
    }
}
