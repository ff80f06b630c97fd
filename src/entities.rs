//! All game entity types and playfield constants: pure data, no logic.
//!
//! Positions are in playfield pixels.  The origin is the top-left corner of
//! the `GAME_WIDTH` x `GAME_HEIGHT` field; `y` grows downward.

// ── Playfield ─────────────────────────────────────────────────────────────────

pub const GAME_WIDTH: i32 = 375;
pub const GAME_HEIGHT: i32 = 500;

pub const ENEMY_WIDTH: i32 = 75;
pub const ENEMY_HEIGHT: i32 = 156;
/// Number of enemies kept on the field at all times while the game runs.
pub const MAX_ENEMIES: usize = 3;
/// Horizontal buckets an enemy can occupy.
pub const SLOT_COUNT: usize = (GAME_WIDTH / ENEMY_WIDTH) as usize;

pub const PLAYER_WIDTH: i32 = 75;
pub const PLAYER_HEIGHT: i32 = 75;
/// Gap between the player's lowest row and the bottom edge.
pub const PLAYER_BOTTOM_MARGIN: i32 = 10;

/// Enemy fall speed in pixels per millisecond, drawn uniformly from this range.
pub const ENEMY_SPEED_MIN: f64 = 0.25;
pub const ENEMY_SPEED_MAX: f64 = 0.75;

// ── Asset names ───────────────────────────────────────────────────────────────

pub const ENEMY_SPRITE: &str = "enemy.png";
pub const BACKGROUND_SPRITE: &str = "grass.png";
pub const PLAYER_SPRITE: &str = "decode.png";

// ── Keyboard codes ────────────────────────────────────────────────────────────

pub const LEFT_ARROW_CODE: u32 = 37;
pub const UP_ARROW_CODE: u32 = 38;
pub const RIGHT_ARROW_CODE: u32 = 39;
pub const DOWN_ARROW_CODE: u32 = 40;
pub const SPACEBAR_CODE: u32 = 32;

// ── Enums ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// What a recognised key press asks the game to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    /// Honoured only after the game is over.
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    GameOver,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: i32,
    /// Fractional so slow enemies still advance on short frames.
    pub y: f64,
    /// Pixels per millisecond; fixed for the enemy's lifetime.
    pub speed: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
}

impl Player {
    pub const START_X: i32 = 2 * PLAYER_WIDTH;
    pub const START_Y: i32 = GAME_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN;
}

impl Default for Player {
    fn default() -> Self {
        Player {
            x: Player::START_X,
            y: Player::START_Y,
        }
    }
}

/// One entry per horizontal bucket; `None` means the bucket is free.
pub type Slots = [Option<Enemy>; SLOT_COUNT];

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire session state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub slots: Slots,
    /// Milliseconds survived.
    pub score: u64,
    pub status: GameStatus,
}

impl GameState {
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.slots.iter().flatten()
    }
}
