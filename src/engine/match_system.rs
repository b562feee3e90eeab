use tracing::{error, info};

use super::{build_grid, GameWorld};
use crate::constants::{
    MATCH_DURATION_MS, MATCH_TICK_MS, MIN_PLAYERS_TO_LOCK, POWER_UP_REFRESH_MS,
    RESET_COOLDOWN_MS, SURVIVOR_WIN_THRESHOLD_MS,
};
use crate::error::{GameError, GameResult};
use crate::schedule::TaskKind;
use crate::types::{EndReason, GhostScore, MatchPhase, MatchResult, SurvivorScore, Winner};

impl GameWorld {
    /// Freezes the roster, finalises roles and starts the match clock.
    ///
    /// Returns every ghost id after the top-up.
    pub fn lock(&mut self, now_ms: u64) -> GameResult<Vec<String>> {
        if self.phase != MatchPhase::Lobby {
            return Err(GameError::AlreadyLocked);
        }
        if self.players.len() < MIN_PLAYERS_TO_LOCK {
            return Err(GameError::InsufficientPlayers {
                count: self.players.len(),
            });
        }
        if self.free_cells().is_empty() {
            return Err(GameError::NoFreeCell);
        }

        if let Some(handle) = self.reset_task.take() {
            self.timers.cancel(handle);
        }
        self.generation += 1;
        self.phase = MatchPhase::Running;
        self.started_at_ms = Some(now_ms);
        self.ended_at_ms = None;
        self.result = None;

        self.top_up_ghosts();
        self.spawn_power_ups(1)?;

        self.tick_task = Some(self.timers.schedule_every(
            TaskKind::MatchTick,
            now_ms + MATCH_TICK_MS,
            MATCH_TICK_MS,
            self.generation,
        ));
        self.refresh_task = Some(self.timers.schedule_every(
            TaskKind::PowerUpRefresh,
            now_ms + POWER_UP_REFRESH_MS,
            POWER_UP_REFRESH_MS,
            self.generation,
        ));

        let ghosts = self.ghost_ids();
        info!(
            generation = self.generation,
            players = self.players.len(),
            ghosts = ?ghosts,
            "match locked"
        );
        Ok(ghosts)
    }

    pub(super) fn on_match_tick(&mut self, now_ms: u64) {
        self.decay_effects();
        if let Some(reason) = self.end_condition(now_ms) {
            self.end_match(now_ms, reason);
        }
    }

    fn end_condition(&self, now_ms: u64) -> Option<EndReason> {
        let started = self.started_at_ms?;
        if self.alive_survivor_count() == 0 {
            return Some(EndReason::AllCaught);
        }
        if now_ms.saturating_sub(started) > MATCH_DURATION_MS {
            return Some(EndReason::Timeout);
        }
        None
    }

    fn end_match(&mut self, now_ms: u64, reason: EndReason) {
        for handle in [self.tick_task.take(), self.refresh_task.take()]
            .into_iter()
            .flatten()
        {
            self.timers.cancel(handle);
        }

        let result = self.build_result(now_ms, reason);
        info!(
            generation = self.generation,
            reason = ?result.reason,
            winner = ?result.winner,
            "match ended"
        );
        self.phase = MatchPhase::Ended;
        self.ended_at_ms = Some(now_ms);
        self.result = Some(result);
        self.reset_task = Some(self.timers.schedule_once(
            TaskKind::Reset,
            now_ms + RESET_COOLDOWN_MS,
            self.generation,
        ));
    }

    fn build_result(&self, now_ms: u64, reason: EndReason) -> MatchResult {
        let started = self.started_at_ms.unwrap_or(now_ms);
        let ghosts: Vec<GhostScore> = self
            .players
            .iter()
            .filter(|player| player.is_ghost)
            .map(|ghost| GhostScore {
                id: ghost.id.clone(),
                name: ghost.name.clone(),
                kills: self
                    .players
                    .iter()
                    .filter(|player| player.killed_by.as_deref() == Some(ghost.id.as_str()))
                    .count(),
            })
            .collect();
        let survivors: Vec<SurvivorScore> = self
            .players
            .iter()
            .filter(|player| !player.is_ghost)
            .map(|player| SurvivorScore {
                id: player.id.clone(),
                name: player.name.clone(),
                live_time_ms: player.death_time.unwrap_or(now_ms).saturating_sub(started),
                alive: player.alive,
            })
            .collect();

        let best_live_time = survivors
            .iter()
            .map(|survivor| survivor.live_time_ms)
            .max()
            .unwrap_or(0);
        let winner = if best_live_time >= SURVIVOR_WIN_THRESHOLD_MS {
            Winner::Survivors
        } else if self.alive_survivor_count() == 0 {
            Winner::Ghosts
        } else {
            Winner::Survivors
        };

        MatchResult {
            reason,
            winner,
            started_at_ms: started,
            ended_at_ms: now_ms,
            ghosts,
            survivors,
        }
    }

    /// Starts a fresh round: new maze, same roster, everyone back to survivor.
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.tick_task = None;
        self.refresh_task = None;
        self.reset_task = None;

        match build_grid(self.grid.cols, self.grid.rows, &mut self.rng) {
            Ok(grid) => self.grid = grid,
            Err(err) => error!(error = %err, "maze regeneration failed, keeping previous maze"),
        }
        let open = self.grid.open_cells();
        for idx in 0..self.players.len() {
            if !open.is_empty() {
                let spawn = open[self.rng.pick_index(open.len())];
                self.players[idx].x = spawn.x;
                self.players[idx].y = spawn.y;
            }
            let player = &mut self.players[idx];
            player.alive = true;
            player.is_ghost = false;
            player.death_time = None;
            player.killed_by = None;
            player.effects.clear();
        }

        self.power_ups.clear();
        self.phase = MatchPhase::Lobby;
        self.started_at_ms = None;
        self.ended_at_ms = None;
        self.result = None;
        info!(players = self.players.len(), "world reset");
    }

    fn alive_survivor_count(&self) -> usize {
        self.players
            .iter()
            .filter(|player| player.alive && !player.is_ghost)
            .count()
    }
}
