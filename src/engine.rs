//! Frame-loop driver.
//!
//! The engine owns one session's state plus the timestamp of the last
//! completed frame.  A host calls `handle_key` for every key press and
//! `frame` whenever its scheduler fires, and stops calling `frame` once it
//! returns `Schedule::Halt`.  Timestamps are milliseconds on any monotonic
//! clock the host chooses.

use log::{debug, info};
use rand::Rng;

use crate::assets::AssetRegistry;
use crate::compute::{advance, init_state, move_player, settle};
use crate::display::{draw_game_over, draw_scene, draw_score};
use crate::entities::{Command, GameState, GameStatus};
use crate::input::command_for;
use crate::surface::Surface;

/// What the host should do after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedule {
    NextFrame,
    Halt,
}

pub struct Engine<'a, R: Rng> {
    assets: &'a AssetRegistry,
    rng: R,
    state: GameState,
    last_frame: u64,
}

impl<'a, R: Rng> Engine<'a, R> {
    /// Start a session whose first frame measures time from `now`.
    pub fn new(assets: &'a AssetRegistry, mut rng: R, now: u64) -> Self {
        let state = init_state(&mut rng);
        info!("session started");
        Engine {
            assets,
            rng,
            state,
            last_frame: now,
        }
    }

    /// Pick up an existing session, e.g. one built by `compute::step`.
    pub fn resume(assets: &'a AssetRegistry, rng: R, state: GameState, now: u64) -> Self {
        Engine {
            assets,
            rng,
            state,
            last_frame: now,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.status == GameStatus::Running
    }

    /// Apply a key press immediately.  Moves only count while running and
    /// restart only once the game is over; other codes are ignored.
    pub fn handle_key(&mut self, code: u32, now: u64) {
        match (command_for(code), self.state.status) {
            (Some(Command::Move(direction)), GameStatus::Running) => {
                self.state = move_player(&self.state, direction);
            }
            (Some(Command::Restart), GameStatus::GameOver) => self.restart(now),
            _ => {}
        }
    }

    /// Throw the whole session away and begin a fresh one.
    pub fn restart(&mut self, now: u64) {
        info!("restarting after score {}", self.state.score);
        self.state = init_state(&mut self.rng);
        self.last_frame = now;
    }

    /// Run one frame: update, draw, retire and refill, then either show the
    /// score and ask for another frame or show the banner and halt.
    pub fn frame(&mut self, now: u64, surface: &mut dyn Surface) -> Schedule {
        if !self.is_running() {
            return Schedule::Halt;
        }

        let time_diff = now.saturating_sub(self.last_frame);
        self.state = advance(&self.state, time_diff);

        // Drawn before the death check so the fatal frame is still visible.
        draw_scene(surface, &self.state, self.assets);

        self.state = settle(&self.state, &mut self.rng);

        if self.is_running() {
            draw_score(surface, self.state.score);
            self.last_frame = now;
            Schedule::NextFrame
        } else {
            info!("player died with score {}", self.state.score);
            debug!("final player position {:?}", self.state.player);
            draw_game_over(surface, self.state.score);
            Schedule::Halt
        }
    }
}
