//! Mod types: plans whose content belongs somewhere other than the game's
//! default mod folder.

use std::path::{Path, PathBuf};

use crate::game_finder::{GameProfile, ModLocation};
use crate::installers::layout::AnchorRule;
use crate::installers::CopyInstruction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModType {
    pub id: &'static str,
    /// Lower runs first
    pub priority: i32,
    /// A plan belongs to this type if any instruction source matches
    pub marker: AnchorRule,
    pub location: ModLocation,
}

impl ModType {
    pub fn matches(&self, instructions: &[CopyInstruction]) -> bool {
        instructions.iter().any(|inst| self.marker.matches(&inst.source))
    }

    /// Deployment folder for this type, `None` if the host has to resolve it
    pub fn target(&self, game_path: &Path) -> Option<PathBuf> {
        self.location.resolve(game_path)
    }
}

/// First mod type of `game` (by priority) that claims the plan
pub fn mod_type_for(
    game: &'static GameProfile,
    instructions: &[CopyInstruction],
) -> Option<&'static ModType> {
    let mut types: Vec<&'static ModType> = game.mod_types.iter().collect();
    types.sort_by_key(|t| t.priority);
    types.into_iter().find(|t| t.matches(instructions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_finder::find_by_id;

    #[test]
    fn test_scene_plan_is_scene_type() {
        let game = find_by_id("dawnofman").unwrap();
        let plan = vec![CopyInstruction::copy("maps/Valley.scn.xml", "Valley/Valley.scn.xml")];

        let mod_type = mod_type_for(game, &plan).unwrap();
        assert_eq!(mod_type.id, "dom-scene-modtype");
        assert!(mod_type.target(Path::new("/games/dom")).unwrap().ends_with("DawnOfMan/Scenarios"));
    }

    #[test]
    fn test_umm_plan_has_default_type() {
        let game = find_by_id("dawnofman").unwrap();
        let plan = vec![CopyInstruction::copy("Info.json", "Fire/Info.json")];
        assert!(mod_type_for(game, &plan).is_none());
    }

    #[test]
    fn test_games_without_mod_types() {
        let game = find_by_id("elex").unwrap();
        let plan = vec![CopyInstruction::copy("a.scn.xml", "a.scn.xml")];
        assert!(mod_type_for(game, &plan).is_none());
    }
}
