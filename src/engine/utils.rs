use crate::constants::MOVE_STEP;
use crate::types::{Direction, PlayerView, Vec2};

pub(super) fn position_of(player: &PlayerView) -> Vec2 {
    Vec2 {
        x: player.x,
        y: player.y,
    }
}

pub(super) fn offset(pos: Vec2, dir: Direction) -> Vec2 {
    let (dx, dy) = dir.delta();
    Vec2 {
        x: pos.x + dx * MOVE_STEP,
        y: pos.y + dy * MOVE_STEP,
    }
}

/// Contact test shared by kills and pickups: closer than one step on both axes.
pub(super) fn within_step(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < MOVE_STEP && (a.y - b.y).abs() < MOVE_STEP
}
