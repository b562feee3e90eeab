use tracing::{debug, info};

use super::utils::{offset, position_of, within_step};
use super::GameWorld;
use crate::constants::POWER_UP_DURATION_SECS;
use crate::error::{GameError, GameResult};
use crate::types::{ActiveEffect, Direction, PlayerView};

impl GameWorld {
    /// Applies one step for `player_id`, then resolves kills and pickups.
    ///
    /// A step into a wall or off the grid leaves the player in place; kill and
    /// pickup checks still run against the unchanged position.
    pub fn move_player(
        &mut self,
        player_id: &str,
        direction: &str,
        now_ms: u64,
    ) -> GameResult<PlayerView> {
        if player_id.trim().is_empty() {
            return Err(GameError::MissingPlayerId);
        }
        let dir = Direction::parse_move(direction)
            .ok_or_else(|| GameError::InvalidDirection(direction.to_string()))?;
        let idx = self
            .player_index(player_id)
            .ok_or_else(|| GameError::UnknownPlayer(player_id.to_string()))?;
        if !self.players[idx].alive {
            return Err(GameError::PlayerDead);
        }
        if self.players[idx].is_ghost && self.ghosts_frozen() {
            return Err(GameError::GhostsFrozen);
        }

        let from = position_of(&self.players[idx]);
        let target = offset(from, dir);
        if self.grid.is_rect_open(from, target) {
            self.players[idx].x = target.x;
            self.players[idx].y = target.y;
        }

        if self.players[idx].is_ghost {
            self.resolve_kill(idx, now_ms);
        }
        self.collect_power_ups(idx);

        Ok(self.players[idx].clone())
    }

    /// Kills at most one survivor sharing the ghost's cell, first in roster order.
    fn resolve_kill(&mut self, ghost_idx: usize, now_ms: u64) {
        let ghost_pos = position_of(&self.players[ghost_idx]);
        let victim_idx = self.players.iter().enumerate().position(|(idx, player)| {
            idx != ghost_idx
                && player.alive
                && !player.is_ghost
                && within_step(ghost_pos, position_of(player))
        });
        let Some(victim_idx) = victim_idx else {
            return;
        };

        let ghost_id = self.players[ghost_idx].id.clone();
        let victim = &mut self.players[victim_idx];
        victim.alive = false;
        victim.death_time = Some(now_ms);
        victim.killed_by = Some(ghost_id.clone());
        info!(ghost = %ghost_id, victim = %victim.id, "player caught");
    }

    fn collect_power_ups(&mut self, player_idx: usize) {
        let pos = position_of(&self.players[player_idx]);
        let (taken, remaining): (Vec<_>, Vec<_>) = self
            .power_ups
            .drain(..)
            .partition(|power_up| within_step(pos, power_up.position()));
        self.power_ups = remaining;

        let player = &mut self.players[player_idx];
        for power_up in taken {
            debug!(player_id = %player.id, kind = ?power_up.kind, "power-up collected");
            player.effects.push(ActiveEffect {
                kind: power_up.kind,
                remaining_secs: POWER_UP_DURATION_SECS,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::super::tests::{join_many, make_world, place, set_ghost, use_corridor};
    use crate::constants::POWER_UP_DURATION_SECS;
    use crate::error::GameError;
    use crate::types::{PowerUpKind, PowerUpView};

    #[test]
    fn rejects_bad_input_and_unknown_players() {
        let mut world = make_world(21);
        let ids = join_many(&mut world, 1);
        assert_eq!(
            world.move_player(&ids[0], "north", 0),
            Err(GameError::InvalidDirection("north".to_string()))
        );
        assert_eq!(world.move_player("", "up", 0), Err(GameError::MissingPlayerId));
        assert_eq!(
            world.move_player("player_999", "up", 0),
            Err(GameError::UnknownPlayer("player_999".to_string()))
        );
    }

    #[test]
    fn wall_bump_is_a_silent_no_op() {
        let mut world = make_world(22);
        let ids = join_many(&mut world, 1);
        use_corridor(&mut world, 3);
        place(&mut world, &ids[0], 1, 1);
        let view = world.move_player(&ids[0], "left", 0).expect("bump");
        assert_eq!((view.x, view.y), (1, 1));
        let view = world.move_player(&ids[0], "up", 0).expect("bump");
        assert_eq!((view.x, view.y), (1, 1));
        let view = world.move_player(&ids[0], "right", 0).expect("step");
        assert_eq!((view.x, view.y), (2, 1));
    }

    #[test]
    fn ghost_kills_only_first_survivor_in_roster_order() {
        let mut world = make_world(23);
        let ids = join_many(&mut world, 4);
        use_corridor(&mut world, 5);
        set_ghost(&mut world, &ids[0], true);
        place(&mut world, &ids[0], 2, 1);
        place(&mut world, &ids[1], 3, 1);
        place(&mut world, &ids[2], 3, 1);
        place(&mut world, &ids[3], 5, 1);

        world.move_player(&ids[0], "right", 1_234).expect("move");
        let first = world.player(&ids[1]).expect("p2");
        assert!(!first.alive);
        assert_eq!(first.death_time, Some(1_234));
        assert_eq!(first.killed_by.as_deref(), Some(ids[0].as_str()));
        assert!(world.player(&ids[2]).expect("p3").alive);

        // staying put still catches the second survivor on the next call
        world.move_player(&ids[0], "up", 2_000).expect("bump");
        let second = world.player(&ids[2]).expect("p3");
        assert!(!second.alive);
        assert_eq!(second.death_time, Some(2_000));
        assert_eq!(world.player(&ids[1]).expect("p2").death_time, Some(1_234));
    }

    #[test]
    fn ghosts_never_kill_ghosts_and_dead_players_cannot_move() {
        let mut world = make_world(24);
        let ids = join_many(&mut world, 3);
        use_corridor(&mut world, 4);
        set_ghost(&mut world, &ids[0], true);
        set_ghost(&mut world, &ids[1], true);
        place(&mut world, &ids[0], 1, 1);
        place(&mut world, &ids[1], 2, 1);
        place(&mut world, &ids[2], 2, 1);

        world.move_player(&ids[0], "right", 10).expect("move");
        assert!(world.player(&ids[1]).expect("ghost").alive);
        assert!(!world.player(&ids[2]).expect("survivor").alive);
        assert_eq!(world.move_player(&ids[2], "left", 20), Err(GameError::PlayerDead));
    }

    #[test]
    fn survivors_walking_into_a_ghost_are_not_killed_by_their_own_move() {
        let mut world = make_world(25);
        let ids = join_many(&mut world, 2);
        use_corridor(&mut world, 4);
        set_ghost(&mut world, &ids[0], true);
        place(&mut world, &ids[0], 2, 1);
        place(&mut world, &ids[1], 1, 1);
        world.move_player(&ids[1], "right", 10).expect("move");
        assert!(world.player(&ids[1]).expect("survivor").alive);
    }

    #[test]
    fn pickup_grants_timed_effect_for_every_colocated_power_up() {
        let mut world = make_world(26);
        let ids = join_many(&mut world, 1);
        use_corridor(&mut world, 4);
        place(&mut world, &ids[0], 1, 1);
        world.power_ups = vec![
            PowerUpView {
                id: "powerup_a".to_string(),
                kind: PowerUpKind::SpeedBoost,
                x: 2,
                y: 1,
            },
            PowerUpView {
                id: "powerup_b".to_string(),
                kind: PowerUpKind::FreezeGhosts,
                x: 2,
                y: 1,
            },
            PowerUpView {
                id: "powerup_c".to_string(),
                kind: PowerUpKind::Invisibility,
                x: 4,
                y: 1,
            },
        ];

        let view = world.move_player(&ids[0], "right", 0).expect("move");
        assert_eq!(view.effects.len(), 2);
        assert!(view
            .effects
            .iter()
            .all(|effect| effect.remaining_secs == POWER_UP_DURATION_SECS));
        assert_eq!(world.power_ups.len(), 1);
        assert_eq!(world.power_ups[0].id, "powerup_c");
    }

    proptest! {
        #[test]
        fn random_walks_stay_on_open_cells(
            seed in 0u64..500,
            moves in proptest::collection::vec(0usize..4, 1..120),
        ) {
            let mut world = make_world(seed);
            let ids = join_many(&mut world, 1);
            for step in moves {
                let token = ["up", "down", "left", "right"][step];
                let view = world.move_player(&ids[0], token, 0).expect("move");
                prop_assert!(world.grid.is_open(view.x, view.y));
            }
        }
    }
}
