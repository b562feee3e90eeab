use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn parse_move(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    FreezeGhosts,
    SpeedBoost,
    Invisibility,
}

impl PowerUpKind {
    pub const CATALOG: [PowerUpKind; 3] =
        [Self::FreezeGhosts, Self::SpeedBoost, Self::Invisibility];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ActiveEffect {
    #[serde(rename = "type")]
    pub kind: PowerUpKind,
    #[serde(rename = "remaining")]
    pub remaining_secs: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: String,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub alive: bool,
    #[serde(rename = "isGhost")]
    pub is_ghost: bool,
    #[serde(rename = "deathTime")]
    pub death_time: Option<u64>,
    #[serde(rename = "killedBy")]
    pub killed_by: Option<String>,
    #[serde(rename = "powerUps")]
    pub effects: Vec<ActiveEffect>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PowerUpView {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PowerUpKind,
    pub x: i32,
    pub y: i32,
}

impl PowerUpView {
    pub fn position(&self) -> Vec2 {
        Vec2 {
            x: self.x,
            y: self.y,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MazeSnapshot {
    /// Row-major, `1` for open and `0` for wall.
    pub maze: Vec<Vec<u8>>,
    pub cols: i32,
    pub rows: i32,
    #[serde(rename = "cellSize")]
    pub cell_size: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayersSnapshot {
    pub players: Vec<PlayerView>,
    #[serde(rename = "gameLocked")]
    pub game_locked: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Lobby,
    Running,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    AllCaught,
    Timeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Ghosts,
    Survivors,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GhostScore {
    pub id: String,
    pub name: String,
    pub kills: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SurvivorScore {
    pub id: String,
    pub name: String,
    #[serde(rename = "liveTime")]
    pub live_time_ms: u64,
    pub alive: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchResult {
    pub reason: EndReason,
    pub winner: Winner,
    #[serde(rename = "startedAt")]
    pub started_at_ms: u64,
    #[serde(rename = "endedAt")]
    pub ended_at_ms: u64,
    pub ghosts: Vec<GhostScore>,
    pub survivors: Vec<SurvivorScore>,
}

#[derive(Clone, Debug, Serialize)]
pub struct StatusView {
    /// Whole seconds left on the match clock.
    #[serde(rename = "timeLeft")]
    pub time_left_secs: u64,
    #[serde(rename = "gameLocked")]
    pub game_locked: bool,
    pub phase: MatchPhase,
    #[serde(rename = "powerUps")]
    pub power_ups: Vec<PowerUpView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JoinOutcome {
    #[serde(rename = "playerId")]
    pub player_id: String,
    #[serde(skip)]
    pub created: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub name: String,
    pub text: String,
    #[serde(rename = "sentAt")]
    pub sent_at_ms: u64,
}
