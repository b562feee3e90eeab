use std::collections::HashSet;

use tracing::{debug, warn};

use super::GameWorld;
use crate::constants::{POWER_UP_BATCH_MAX, POWER_UP_BATCH_MIN};
use crate::error::{GameError, GameResult};
use crate::types::{PowerUpKind, PowerUpView, Vec2};

impl GameWorld {
    /// True while any player anywhere holds a live freeze effect.
    pub fn ghosts_frozen(&self) -> bool {
        self.players.iter().any(|player| {
            player
                .effects
                .iter()
                .any(|effect| effect.kind == PowerUpKind::FreezeGhosts && effect.remaining_secs > 0)
        })
    }

    /// Open cells not covered by a living player or an existing power-up.
    pub(super) fn free_cells(&self) -> Vec<Vec2> {
        let reserved: HashSet<(i32, i32)> = self
            .players
            .iter()
            .filter(|player| player.alive)
            .map(|player| (player.x, player.y))
            .chain(self.power_ups.iter().map(|power_up| (power_up.x, power_up.y)))
            .collect();
        self.grid
            .open_cells()
            .into_iter()
            .filter(|cell| !reserved.contains(&(cell.x, cell.y)))
            .collect()
    }

    /// Places up to `count` power-ups on distinct free cells.
    pub(super) fn spawn_power_ups(&mut self, count: usize) -> GameResult<usize> {
        let free = self.free_cells();
        if free.is_empty() {
            return Err(GameError::NoFreeCell);
        }
        let cells = self.rng.sample(&free, count);
        for cell in &cells {
            let kind = PowerUpKind::CATALOG[self.rng.pick_index(PowerUpKind::CATALOG.len())];
            let id = self.make_id("powerup");
            self.power_ups.push(PowerUpView {
                id,
                kind,
                x: cell.x,
                y: cell.y,
            });
        }
        Ok(cells.len())
    }

    /// Swaps every unclaimed power-up for a fresh batch of one to five.
    pub(super) fn refresh_power_ups(&mut self) {
        self.power_ups.clear();
        let batch = self.rng.int(POWER_UP_BATCH_MIN, POWER_UP_BATCH_MAX) as usize;
        match self.spawn_power_ups(batch) {
            Ok(placed) => debug!(requested = batch, placed, "power-ups refreshed"),
            Err(err) => warn!(error = %err, "power-up refresh skipped"),
        }
    }

    /// One second of decay for every active effect; spent effects are dropped.
    pub(super) fn decay_effects(&mut self) {
        for player in &mut self.players {
            for effect in &mut player.effects {
                effect.remaining_secs = effect.remaining_secs.saturating_sub(1);
            }
            player.effects.retain(|effect| effect.remaining_secs > 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::super::tests::{join_many, make_world, place, use_corridor};
    use crate::constants::{POWER_UP_BATCH_MAX, POWER_UP_REFRESH_MS};
    use crate::error::GameError;
    use crate::types::{ActiveEffect, PowerUpKind};

    #[test]
    fn lock_places_exactly_one_power_up_on_a_free_cell() {
        let mut world = make_world(31);
        join_many(&mut world, 3);
        world.lock(0).expect("lock");
        assert_eq!(world.power_ups.len(), 1);
        let power_up = &world.power_ups[0];
        assert!(world.grid.is_open(power_up.x, power_up.y));
        assert!(world
            .players
            .iter()
            .all(|player| (player.x, player.y) != (power_up.x, power_up.y)));
    }

    #[test]
    fn refresh_replaces_batch_without_duplicate_cells() {
        let mut world = make_world(32);
        join_many(&mut world, 3);
        world.lock(0).expect("lock");
        let first_id = world.power_ups[0].id.clone();

        for round in 1..=10u64 {
            world.advance(round * POWER_UP_REFRESH_MS);
            let count = world.power_ups.len();
            assert!((1..=POWER_UP_BATCH_MAX as usize).contains(&count), "round {round}");
            let cells: HashSet<(i32, i32)> =
                world.power_ups.iter().map(|p| (p.x, p.y)).collect();
            assert_eq!(cells.len(), count);
            assert!(world.power_ups.iter().all(|p| p.id != first_id));
            assert!(world.power_ups.iter().all(|p| world.grid.is_open(p.x, p.y)));
        }
    }

    #[test]
    fn no_refresh_before_lock() {
        let mut world = make_world(33);
        join_many(&mut world, 3);
        world.advance(POWER_UP_REFRESH_MS * 3);
        assert!(world.power_ups.is_empty());
    }

    #[test]
    fn spawn_is_clamped_to_free_cells_and_fails_when_none_remain() {
        let mut world = make_world(34);
        let ids = join_many(&mut world, 1);
        use_corridor(&mut world, 3);
        place(&mut world, &ids[0], 1, 1);
        assert_eq!(world.spawn_power_ups(5), Ok(2));
        assert_eq!(world.spawn_power_ups(1), Err(GameError::NoFreeCell));
    }

    #[test]
    fn lock_aborts_when_no_cell_is_free() {
        let mut world = make_world(35);
        let ids = join_many(&mut world, 2);
        use_corridor(&mut world, 2);
        place(&mut world, &ids[0], 1, 1);
        place(&mut world, &ids[1], 2, 1);
        assert_eq!(world.lock(0), Err(GameError::NoFreeCell));
        assert!(!world.is_locked());
        assert!(world.ghost_ids().is_empty());
    }

    #[test]
    fn effects_decay_once_per_tick_and_expire() {
        let mut world = make_world(36);
        let ids = join_many(&mut world, 2);
        world.lock(0).expect("lock");
        let idx = world.player_index(&ids[0]).expect("player");
        world.players[idx].effects = vec![
            ActiveEffect {
                kind: PowerUpKind::SpeedBoost,
                remaining_secs: 3,
            },
            ActiveEffect {
                kind: PowerUpKind::FreezeGhosts,
                remaining_secs: 1,
            },
        ];
        assert!(world.ghosts_frozen());

        world.advance(1_000);
        assert!(!world.ghosts_frozen());
        assert_eq!(world.players[idx].effects.len(), 1);
        assert_eq!(world.players[idx].effects[0].remaining_secs, 2);

        world.advance(3_000);
        assert!(world.players[idx].effects.is_empty());
    }

    #[test]
    fn freeze_held_by_a_dead_player_still_counts() {
        let mut world = make_world(37);
        let ids = join_many(&mut world, 2);
        let idx = world.player_index(&ids[1]).expect("player");
        world.players[idx].alive = false;
        world.players[idx].effects.push(ActiveEffect {
            kind: PowerUpKind::FreezeGhosts,
            remaining_secs: 5,
        });
        assert!(world.ghosts_frozen());
    }
}
