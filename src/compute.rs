//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current state
//! (and, where needed, an RNG handle) and returns a brand-new value.  Side
//! effects are limited to the injected RNG.

use log::trace;
use rand::Rng;

use crate::entities::{
    Command, Direction, Enemy, GameState, GameStatus, Player, Slots, ENEMY_HEIGHT,
    ENEMY_SPEED_MAX, ENEMY_SPEED_MIN, ENEMY_WIDTH, GAME_HEIGHT, GAME_WIDTH, MAX_ENEMIES,
    PLAYER_BOTTOM_MARGIN, PLAYER_HEIGHT, PLAYER_WIDTH, SLOT_COUNT,
};

// Rejection sampling in `ensure_full_roster` never terminates otherwise.
const _: () = assert!(MAX_ENEMIES <= SLOT_COUNT);

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session: score zero, player at the start cell, full roster.
pub fn init_state(rng: &mut impl Rng) -> GameState {
    let empty: Slots = Default::default();
    GameState {
        player: Player::default(),
        slots: ensure_full_roster(&empty, rng),
        score: 0,
        status: GameStatus::Running,
    }
}

/// A new enemy just above the visible area in bucket `slot`.
pub fn spawn_enemy(slot: usize, rng: &mut impl Rng) -> Enemy {
    Enemy {
        x: slot as i32 * ENEMY_WIDTH,
        y: -f64::from(ENEMY_HEIGHT),
        speed: rng.gen_range(ENEMY_SPEED_MIN..ENEMY_SPEED_MAX),
    }
}

// ── Entity updates ───────────────────────────────────────────────────────────

/// Integrate the enemy's fall over `time_diff` milliseconds.  No bounds check.
pub fn update_enemy(enemy: &Enemy, time_diff: u64) -> Enemy {
    Enemy {
        y: enemy.y + time_diff as f64 * enemy.speed,
        ..enemy.clone()
    }
}

/// Displace the player by one sprite unit, or not at all when the destination
/// would leave the player's allowed region.
pub fn step_player(player: &Player, direction: Direction) -> Player {
    let lowest = GAME_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN;
    let (x, y) = match direction {
        Direction::Left if player.x > 0 => (player.x - PLAYER_WIDTH, player.y),
        Direction::Right if player.x < GAME_WIDTH - PLAYER_WIDTH => {
            (player.x + PLAYER_WIDTH, player.y)
        }
        // The top bound is one sprite height below the edge, the bottom bound
        // only a small margin above it.
        Direction::Up if player.y - PLAYER_HEIGHT >= PLAYER_HEIGHT => {
            (player.x, player.y - PLAYER_HEIGHT)
        }
        Direction::Down if player.y < lowest => (player.x, player.y + PLAYER_HEIGHT),
        _ => (player.x, player.y),
    };
    Player { x, y }
}

pub fn move_player(state: &GameState, direction: Direction) -> GameState {
    GameState {
        player: step_player(&state.player, direction),
        ..state.clone()
    }
}

// ── Roster maintenance ───────────────────────────────────────────────────────

/// Fill random free slots until `MAX_ENEMIES` are occupied.  Occupied slots
/// are left untouched.
pub fn ensure_full_roster(slots: &Slots, rng: &mut impl Rng) -> Slots {
    let mut slots = slots.clone();
    while slots.iter().filter(|s| s.is_some()).count() < MAX_ENEMIES {
        let slot = loop {
            let candidate = rng.gen_range(0..SLOT_COUNT);
            if slots[candidate].is_none() {
                break candidate;
            }
        };
        let enemy = spawn_enemy(slot, rng);
        trace!("spawned enemy in slot {} at speed {:.3}", slot, enemy.speed);
        slots[slot] = Some(enemy);
    }
    slots
}

/// Clear every slot whose enemy has fallen past the bottom edge.
pub fn retire_enemies(slots: &Slots) -> Slots {
    let mut slots = slots.clone();
    for (i, slot) in slots.iter_mut().enumerate() {
        if slot.as_ref().is_some_and(|e| e.y > f64::from(GAME_HEIGHT)) {
            trace!("retired enemy in slot {}", i);
            *slot = None;
        }
    }
    slots
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Vertical overlap with exact horizontal alignment.  Enemies and the player
/// share a width, so equal `x` means the same slot.
pub fn collides(player: &Player, enemy: &Enemy) -> bool {
    enemy.y <= f64::from(player.y + PLAYER_HEIGHT)
        && enemy.y + f64::from(ENEMY_HEIGHT) >= f64::from(player.y)
        && player.x == enemy.x
}

pub fn is_player_dead(state: &GameState) -> bool {
    state.enemies().any(|e| collides(&state.player, e))
}

// ── Per-frame phases ─────────────────────────────────────────────────────────

/// Credit `time_diff` to the score and move every enemy.
pub fn advance(state: &GameState, time_diff: u64) -> GameState {
    let mut slots = state.slots.clone();
    for slot in slots.iter_mut() {
        if let Some(enemy) = slot {
            *enemy = update_enemy(enemy, time_diff);
        }
    }
    GameState {
        slots,
        score: state.score + time_diff,
        ..state.clone()
    }
}

/// Retire fallen enemies, refill the roster, then evaluate the death predicate.
pub fn settle(state: &GameState, rng: &mut impl Rng) -> GameState {
    let slots = ensure_full_roster(&retire_enemies(&state.slots), rng);
    let settled = GameState {
        slots,
        ..state.clone()
    };
    let status = if is_player_dead(&settled) {
        GameStatus::GameOver
    } else {
        GameStatus::Running
    };
    GameState { status, ..settled }
}

// ── Whole-frame step (nearly pure, RNG is injected) ─────────────────────────

/// Advance the simulation by one frame without rendering.
///
/// Inputs are applied first, in order.  A finished game ignores everything
/// except `Command::Restart`, which yields a fresh session; a running game
/// ignores `Command::Restart`.
pub fn step(
    state: &GameState,
    time_diff: u64,
    inputs: &[Command],
    rng: &mut impl Rng,
) -> GameState {
    if state.status == GameStatus::GameOver {
        return if inputs.contains(&Command::Restart) {
            init_state(rng)
        } else {
            state.clone()
        };
    }

    let moved = inputs.iter().fold(state.clone(), |s, command| match command {
        Command::Move(direction) => move_player(&s, *direction),
        Command::Restart => s,
    });
    settle(&advance(&moved, time_diff), rng)
}
