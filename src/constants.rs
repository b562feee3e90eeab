use crate::error::{GameError, GameResult};

pub const CELL_SIZE: u32 = 40;
pub const DISPLAY_WIDTH: u32 = 1920;
pub const DISPLAY_HEIGHT: u32 = 1080;

pub const MATCH_TICK_MS: u64 = 1_000;
pub const POWER_UP_REFRESH_MS: u64 = 20_000;
pub const RESET_COOLDOWN_MS: u64 = 10_000;
pub const MATCH_DURATION_MS: u64 = 10 * 60 * 1000;
pub const SURVIVOR_WIN_THRESHOLD_MS: u64 = 2 * 60 * 1000;

pub const MIN_PLAYERS_TO_LOCK: usize = 2;
pub const PLAYERS_PER_GHOST: usize = 10;

pub const MOVE_STEP: i32 = 1;
pub const POWER_UP_DURATION_SECS: u32 = 10;
pub const POWER_UP_BATCH_MIN: i32 = 1;
pub const POWER_UP_BATCH_MAX: i32 = 5;

pub const MAX_NAME_LEN: usize = 16;
pub const DEFAULT_PLAYER_NAME: &str = "Player";

pub const CHAT_MAX_TEXT_LEN: usize = 100;
pub const CHAT_HISTORY_LIMIT: usize = 100;
pub const CHAT_RECENT_LIMIT: usize = 30;

/// Grid size for a display, rejected when the cell count does not fit an `i32`.
pub fn maze_dimensions(
    display_width: u32,
    display_height: u32,
    cell_size: u32,
) -> GameResult<(i32, i32)> {
    if cell_size == 0 {
        return Ok((0, 0));
    }
    let cols = i32::try_from(display_width / cell_size);
    let rows = i32::try_from(display_height / cell_size);
    match (cols, rows) {
        (Ok(cols), Ok(rows)) if cols.checked_mul(rows).is_some() => Ok((cols, rows)),
        (cols, rows) => Err(GameError::InvalidMazeSize {
            cols: cols.unwrap_or(i32::MAX),
            rows: rows.unwrap_or(i32::MAX),
        }),
    }
}

pub fn required_ghost_count(player_count: usize) -> usize {
    player_count.div_ceil(PLAYERS_PER_GHOST)
}

/// Join-time rule: the 11th, 21st, ... joiner starts as a ghost.
pub fn is_join_ghost(join_number: usize) -> bool {
    join_number > 1 && join_number % PLAYERS_PER_GHOST == 1
}
