use tracing::{debug, info};

use crate::constants::{
    is_join_ghost, maze_dimensions, CELL_SIZE, DISPLAY_HEIGHT, DISPLAY_WIDTH, MATCH_DURATION_MS,
};
use crate::error::{GameError, GameResult};
use crate::maze::{generate_maze, to_snapshot, Grid};
use crate::rng::Rng;
use crate::schedule::{TaskHandle, TaskKind, Timers};
use crate::server_utils::sanitize_name;
use crate::types::{
    JoinOutcome, MatchPhase, MatchResult, MazeSnapshot, PlayerView, PlayersSnapshot, PowerUpView,
    StatusView, Vec2,
};

mod match_system;
mod movement;
mod power_ups;
mod roles;
mod utils;

#[derive(Clone, Debug)]
pub struct GameWorldOptions {
    pub cols: i32,
    pub rows: i32,
    pub cell_size: u32,
    pub seed: Option<u64>,
}

impl Default for GameWorldOptions {
    fn default() -> Self {
        let (cols, rows) =
            maze_dimensions(DISPLAY_WIDTH, DISPLAY_HEIGHT, CELL_SIZE).unwrap_or_default();
        Self {
            cols,
            rows,
            cell_size: CELL_SIZE,
            seed: None,
        }
    }
}

/// The single owned aggregate holding maze, roster, power-ups and match clock.
#[derive(Clone, Debug)]
pub struct GameWorld {
    pub cell_size: u32,

    grid: Grid,
    rng: Rng,
    players: Vec<PlayerView>,
    power_ups: Vec<PowerUpView>,
    timers: Timers,

    phase: MatchPhase,
    generation: u64,
    started_at_ms: Option<u64>,
    ended_at_ms: Option<u64>,
    result: Option<MatchResult>,
    tick_task: Option<TaskHandle>,
    refresh_task: Option<TaskHandle>,
    reset_task: Option<TaskHandle>,
    next_id_counter: u64,
}

impl GameWorld {
    pub fn new(options: GameWorldOptions) -> GameResult<Self> {
        let mut rng = match options.seed {
            Some(seed) => Rng::new(seed),
            None => Rng::from_entropy(),
        };
        let grid = build_grid(options.cols, options.rows, &mut rng)?;
        info!(
            cols = grid.cols,
            rows = grid.rows,
            open_cells = grid.open_cells().len(),
            "maze generated"
        );

        Ok(Self {
            cell_size: options.cell_size,
            grid,
            rng,
            players: Vec::new(),
            power_ups: Vec::new(),
            timers: Timers::new(),
            phase: MatchPhase::Lobby,
            generation: 0,
            started_at_ms: None,
            ended_at_ms: None,
            result: None,
            tick_task: None,
            refresh_task: None,
            reset_task: None,
            next_id_counter: 1,
        })
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_locked(&self) -> bool {
        self.phase != MatchPhase::Lobby
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self, player_id: &str) -> Option<&PlayerView> {
        self.players.iter().find(|player| player.id == player_id)
    }

    pub fn power_ups(&self) -> &[PowerUpView] {
        &self.power_ups
    }

    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    pub fn maze_snapshot(&self) -> MazeSnapshot {
        to_snapshot(&self.grid, self.cell_size)
    }

    pub fn players_snapshot(&self) -> PlayersSnapshot {
        PlayersSnapshot {
            players: self.players.clone(),
            game_locked: self.is_locked(),
        }
    }

    pub fn status(&self, now_ms: u64) -> StatusView {
        let elapsed_ms = match (self.started_at_ms, self.ended_at_ms) {
            (Some(started), Some(ended)) => ended.saturating_sub(started),
            (Some(started), None) => now_ms.saturating_sub(started),
            (None, _) => 0,
        };
        StatusView {
            time_left_secs: (MATCH_DURATION_MS / 1000).saturating_sub(elapsed_ms / 1000),
            game_locked: self.is_locked(),
            phase: self.phase,
            power_ups: self.power_ups.clone(),
        }
    }

    /// Joins under `raw_name`, or hands back the id already bound to that name.
    pub fn join(&mut self, raw_name: &str) -> GameResult<JoinOutcome> {
        let name = sanitize_name(raw_name);
        let key = name.to_lowercase();
        if let Some(existing) = self
            .players
            .iter()
            .find(|player| player.name.to_lowercase() == key)
        {
            debug!(player_id = %existing.id, name = %name, "rejoin by name");
            return Ok(JoinOutcome {
                player_id: existing.id.clone(),
                created: false,
            });
        }
        if self.is_locked() {
            return Err(GameError::MatchLocked);
        }

        let spawn = self.random_open_cell()?;
        let is_ghost = is_join_ghost(self.players.len() + 1);
        let id = self.make_id("player");
        self.players.push(PlayerView {
            id: id.clone(),
            name: name.clone(),
            x: spawn.x,
            y: spawn.y,
            alive: true,
            is_ghost,
            death_time: None,
            killed_by: None,
            effects: Vec::new(),
        });
        info!(player_id = %id, name = %name, is_ghost, "player joined");

        Ok(JoinOutcome {
            player_id: id,
            created: true,
        })
    }

    /// Runs every scheduled task that is due at `now_ms`.
    pub fn advance(&mut self, now_ms: u64) {
        for task in self.timers.due(now_ms) {
            if task.generation != self.generation {
                debug!(kind = ?task.kind, generation = task.generation, "dropping stale task");
                continue;
            }
            match task.kind {
                TaskKind::MatchTick => {
                    if self.tick_task == Some(task.handle) {
                        self.on_match_tick(now_ms);
                    }
                }
                TaskKind::PowerUpRefresh => {
                    if self.refresh_task == Some(task.handle) {
                        self.refresh_power_ups();
                    }
                }
                TaskKind::Reset => {
                    if self.reset_task == Some(task.handle) {
                        self.reset_task = None;
                        self.reset();
                    }
                }
            }
        }
    }

    fn player_index(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|player| player.id == player_id)
    }

    fn random_open_cell(&mut self) -> GameResult<Vec2> {
        let open = self.grid.open_cells();
        if open.is_empty() {
            return Err(GameError::NoFreeCell);
        }
        Ok(open[self.rng.pick_index(open.len())])
    }

    fn make_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}_{}", self.next_id_counter);
        self.next_id_counter += 1;
        id
    }
}

fn build_grid(cols: i32, rows: i32, rng: &mut Rng) -> GameResult<Grid> {
    if cols.checked_mul(rows).is_none() {
        return Err(GameError::InvalidMazeSize { cols, rows });
    }
    let grid = generate_maze(cols, rows, rng);
    if grid.open_cells().is_empty() {
        return Err(GameError::InvalidMazeSize { cols, rows });
    }
    Ok(grid)
}
