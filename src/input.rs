//! Keyboard translation.
//!
//! Terminal key events are first reduced to the numeric key codes the game
//! recognises, then to a `Command`.  Anything else is ignored.

use crossterm::event::KeyCode;

use crate::entities::{
    Command, Direction, DOWN_ARROW_CODE, LEFT_ARROW_CODE, RIGHT_ARROW_CODE, SPACEBAR_CODE,
    UP_ARROW_CODE,
};

/// Numeric code for a terminal key, if it is one the game listens to.
pub fn key_code(code: &KeyCode) -> Option<u32> {
    match code {
        KeyCode::Left => Some(LEFT_ARROW_CODE),
        KeyCode::Up => Some(UP_ARROW_CODE),
        KeyCode::Right => Some(RIGHT_ARROW_CODE),
        KeyCode::Down => Some(DOWN_ARROW_CODE),
        KeyCode::Char(' ') => Some(SPACEBAR_CODE),
        _ => None,
    }
}

pub fn command_for(code: u32) -> Option<Command> {
    match code {
        LEFT_ARROW_CODE => Some(Command::Move(Direction::Left)),
        UP_ARROW_CODE => Some(Command::Move(Direction::Up)),
        RIGHT_ARROW_CODE => Some(Command::Move(Direction::Right)),
        DOWN_ARROW_CODE => Some(Command::Move(Direction::Down)),
        SPACEBAR_CODE => Some(Command::Restart),
        _ => None,
    }
}
