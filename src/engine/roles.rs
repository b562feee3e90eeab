use tracing::info;

use super::GameWorld;
use crate::constants::required_ghost_count;

impl GameWorld {
    pub fn ghost_ids(&self) -> Vec<String> {
        self.players
            .iter()
            .filter(|player| player.is_ghost)
            .map(|player| player.id.clone())
            .collect()
    }

    /// Tops the ghost roster up to one per started ten players.
    ///
    /// Returns the ids that were newly turned into ghosts. Players that are
    /// already ghosts are never demoted.
    pub(super) fn top_up_ghosts(&mut self) -> Vec<String> {
        let required = required_ghost_count(self.players.len());
        let assigned = self.players.iter().filter(|player| player.is_ghost).count();
        if assigned >= required {
            return Vec::new();
        }

        let candidates: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, player)| !player.is_ghost)
            .map(|(idx, _)| idx)
            .collect();
        let picked = self.rng.sample(&candidates, required - assigned);
        let mut promoted = Vec::with_capacity(picked.len());
        for idx in picked {
            self.players[idx].is_ghost = true;
            promoted.push(self.players[idx].id.clone());
        }
        info!(required, already = assigned, promoted = ?promoted, "ghost roster topped up");
        promoted
    }
}
