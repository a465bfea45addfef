//! Decides whether an archive listing is a supported mod for a game

use crate::game_finder::GameProfile;
use crate::logging::{log_test, log_warning};

use super::common::{PlanOptions, SupportResult};
use super::layout::{Anchor, LayoutVariant};
use super::variants::{AmbiguityPolicy, VariantResolver};

/// Support check for one variant of one game. Pure and reentrant.
pub struct ContentClassifier<'a> {
    game: &'a GameProfile,
    variant: &'a LayoutVariant,
}

impl<'a> ContentClassifier<'a> {
    pub fn new(game: &'a GameProfile, variant: &'a LayoutVariant) -> Self {
        Self { game, variant }
    }

    pub fn locate_anchor<'f, S: AsRef<str>>(&self, files: &'f [S]) -> Option<Anchor<'f>> {
        self.variant.anchor.find(files)
    }

    pub fn test<S: AsRef<str>>(
        &self,
        files: &[S],
        game_id: &str,
        options: &PlanOptions,
    ) -> SupportResult {
        if game_id != self.game.id {
            return SupportResult::unsupported();
        }

        let Some(anchor) = self.locate_anchor(files) else {
            return SupportResult::unsupported();
        };

        if let Some(exclusion) = self.variant.exclusion {
            if exclusion.is_triggered(files) {
                log_test(&format!(
                    "{}: {} matched but {:?} is present, leaving it to another installer",
                    self.variant.installer_id, anchor.path, exclusion
                ));
                return SupportResult::unsupported();
            }
        }

        // Competing layouts: only the resolved variant claims the archive
        if self.game.variants.len() > 1 {
            let resolver = VariantResolver::new(self.game.variants);
            let Some(resolution) = resolver.resolve(files) else {
                return SupportResult::unsupported();
            };

            if resolution.variant.installer_id != self.variant.installer_id {
                return SupportResult::unsupported();
            }

            if resolution.is_ambiguous() {
                match options.ambiguity {
                    AmbiguityPolicy::Reject => {
                        log_warning(&format!(
                            "{}: archive also matches {:?}, rejecting ambiguous archive",
                            self.variant.installer_id,
                            resolution.also_matched_ids()
                        ));
                        return SupportResult::unsupported();
                    }
                    AmbiguityPolicy::FirstMatch => {
                        log_warning(&format!(
                            "{}: archive also matches {:?}, taking {} by priority",
                            self.variant.installer_id,
                            resolution.also_matched_ids(),
                            self.variant.installer_id
                        ));
                    }
                }
            }
        }

        log_test(&format!(
            "{}: supported, anchored at {}",
            self.variant.installer_id, anchor.path
        ));
        SupportResult::supported()
    }
}
