use std::path::PathBuf;

use clap::Parser;

use crate::constants::{maze_dimensions, CELL_SIZE, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::engine::GameWorldOptions;
use crate::error::GameResult;

#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Ghost maze match server")]
pub struct ServerConfig {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Display width in pixels the maze is sized for.
    #[arg(long, env = "DISPLAY_WIDTH", default_value_t = DISPLAY_WIDTH)]
    pub display_width: u32,

    #[arg(long, env = "DISPLAY_HEIGHT", default_value_t = DISPLAY_HEIGHT)]
    pub display_height: u32,

    #[arg(long, env = "CELL_SIZE", default_value_t = CELL_SIZE)]
    pub cell_size: u32,

    /// Fixed seed for maze and spawn randomness.
    #[arg(long, env = "GAME_SEED")]
    pub seed: Option<u64>,

    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn world_options(&self) -> GameResult<GameWorldOptions> {
        let (cols, rows) =
            maze_dimensions(self.display_width, self.display_height, self.cell_size)?;
        Ok(GameWorldOptions {
            cols,
            rows,
            cell_size: self.cell_size,
            seed: self.seed,
        })
    }
}
