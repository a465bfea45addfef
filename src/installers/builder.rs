//! Turns an archive listing into copy instructions
//!
//! The builder re-locates the anchor itself; it is callable without a prior
//! support check and fails closed when the listing has no anchor.

use crate::game_finder::GameProfile;
use crate::logging::{log_info, log_install, log_warning};

use super::common::{
    escapes_root, file_name, is_directory, join, sanitize_mod_name, CopyInstruction,
    InstallError, InstallResult, PlanOptions,
};
use super::layout::{Anchor, DestinationStrategy, LayoutVariant};
use super::variants::{AmbiguityPolicy, VariantResolver};

pub struct InstructionBuilder<'a> {
    game: &'a GameProfile,
    variant: &'a LayoutVariant,
}

impl<'a> InstructionBuilder<'a> {
    pub fn new(game: &'a GameProfile, variant: &'a LayoutVariant) -> Self {
        Self { game, variant }
    }

    /// Compute the plan for `files`, installing into `destination_path`.
    ///
    /// `destination_path` doubles as the archive identity in error messages.
    pub fn install<S: AsRef<str>>(
        &self,
        files: &[S],
        destination_path: &str,
        options: &PlanOptions,
    ) -> Result<InstallResult, InstallError> {
        let installer = self.variant.installer_id;

        let anchor = self.variant.anchor.find(files).ok_or_else(|| {
            log_warning(&format!(
                "{}: no {} in archive {}",
                installer,
                self.variant.anchor.describe(),
                destination_path
            ));
            InstallError::NoAnchorFound {
                installer: installer.to_string(),
                archive: destination_path.to_string(),
            }
        })?;

        self.check_ambiguity(files, options)?;

        let instructions = match self.variant.destination {
            DestinationStrategy::RootRelative => self.root_relative(files, &anchor, "", options),
            DestinationStrategy::NameSpaced => {
                let mod_name = sanitize_mod_name(destination_path, &options.working_suffix);
                if mod_name.is_empty() {
                    log_warning(&format!(
                        "{}: '{}' has no usable mod name, installing without a mod folder",
                        installer, destination_path
                    ));
                }
                self.root_relative(files, &anchor, &mod_name, options)
            }
            DestinationStrategy::FolderPerAnchor => self.folder_per_anchor(files, options),
        };

        if instructions.is_empty() {
            return Err(InstallError::EmptyPlan {
                installer: installer.to_string(),
                archive: destination_path.to_string(),
            });
        }

        log_install(&format!(
            "{}: planned {} copies from root '{}'",
            installer,
            instructions.len(),
            anchor.root()
        ));

        Ok(InstallResult { instructions })
    }

    fn check_ambiguity<S: AsRef<str>>(
        &self,
        files: &[S],
        options: &PlanOptions,
    ) -> Result<(), InstallError> {
        if self.game.variants.len() < 2 || options.ambiguity != AmbiguityPolicy::Reject {
            return Ok(());
        }

        let resolver = VariantResolver::new(self.game.variants);
        match resolver.resolve(files) {
            Some(resolution) if resolution.is_ambiguous() => Err(InstallError::AmbiguousVariant {
                game: self.game.id.to_string(),
                chosen: resolution.variant.installer_id.to_string(),
                also_matched: resolution.also_matched_ids(),
            }),
            _ => Ok(()),
        }
    }

    /// Entries under the anchor's root, re-rooted and optionally nested under `mod_name`.
    fn root_relative<S: AsRef<str>>(
        &self,
        files: &[S],
        anchor: &Anchor<'_>,
        mod_name: &str,
        options: &PlanOptions,
    ) -> Vec<CopyInstruction> {
        let root = anchor.root();
        let mut outside = 0usize;

        let instructions: Vec<CopyInstruction> = files
            .iter()
            .map(|entry| entry.as_ref())
            .filter(|entry| !is_directory(entry))
            .filter_map(|entry| {
                let Some(relative) = entry.strip_prefix(root) else {
                    outside += 1;
                    return None;
                };
                if escapes_root(relative) {
                    self.warn_escape(entry);
                    return None;
                }
                Some(CopyInstruction::copy(
                    entry,
                    join(options.separator, mod_name, relative),
                ))
            })
            .collect();

        if outside > 0 {
            log_info(&format!(
                "{}: ignored {} entries outside '{}'",
                self.variant.installer_id, outside, root
            ));
        }

        instructions
    }

    /// Every anchor file goes into a folder named after it, extension cased as authored.
    fn folder_per_anchor<S: AsRef<str>>(
        &self,
        files: &[S],
        options: &PlanOptions,
    ) -> Vec<CopyInstruction> {
        let rule = self.variant.anchor;
        files
            .iter()
            .map(|entry| entry.as_ref())
            .filter(|entry| rule.matches(entry))
            .filter_map(|entry| {
                let name = file_name(entry);
                // "C:evil.mod" is drive-relative on Windows
                if escapes_root(name) {
                    self.warn_escape(entry);
                    return None;
                }
                let stem = match name.rfind('.') {
                    Some(idx) if idx > 0 => &name[..idx],
                    _ => name,
                };
                Some(CopyInstruction::copy(entry, join(options.separator, stem, name)))
            })
            .collect()
    }

    fn warn_escape(&self, entry: &str) {
        log_warning(&format!(
            "{}: skipping {} (escapes the mod root)",
            self.variant.installer_id, entry
        ));
    }
}
