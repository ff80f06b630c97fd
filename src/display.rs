//! Rendering layer.
//!
//! Each function receives a drawing surface and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state into surface calls, always back to front.

use crossterm::style::Color;

use crate::assets::AssetRegistry;
use crate::entities::{
    Enemy, GameState, Player, BACKGROUND_SPRITE, ENEMY_SPRITE, GAME_HEIGHT, GAME_WIDTH,
    PLAYER_SPRITE,
};
use crate::surface::{Render, Surface, TextAlign, TextBaseline};

// ── Text styles ───────────────────────────────────────────────────────────────

const SCORE_FONT: &str = "bold 30px Impact";
const C_SCORE: Color = Color::White;
const BANNER_FONT: &str = "40px serif bold";
const C_BANNER: Color = Color::Black;
/// Vertical gap between the two banner lines.
const BANNER_LINE_GAP: f64 = 50.0;

// ── Entities ──────────────────────────────────────────────────────────────────

fn blit(surface: &mut dyn Surface, assets: &AssetRegistry, name: &str, x: f64, y: f64) {
    // An unregistered sprite is simply not drawn.
    if let Some(sprite) = assets.get(name) {
        surface.draw_image(sprite, x, y);
    }
}

impl Render for Enemy {
    fn render(&self, surface: &mut dyn Surface, assets: &AssetRegistry) {
        blit(surface, assets, ENEMY_SPRITE, f64::from(self.x), self.y);
    }
}

impl Render for Player {
    fn render(&self, surface: &mut dyn Surface, assets: &AssetRegistry) {
        blit(surface, assets, PLAYER_SPRITE, f64::from(self.x), f64::from(self.y));
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Background, then every enemy in slot order, then the player.
pub fn draw_scene(surface: &mut dyn Surface, state: &GameState, assets: &AssetRegistry) {
    blit(surface, assets, BACKGROUND_SPRITE, 0.0, 0.0);
    for enemy in state.enemies() {
        enemy.render(surface, assets);
    }
    state.player.render(surface, assets);
}

/// Running score in the top-left corner.
pub fn draw_score(surface: &mut dyn Surface, score: u64) {
    surface.set_text_align(TextAlign::Left);
    surface.set_text_baseline(TextBaseline::Alphabetic);
    surface.set_font(SCORE_FONT);
    surface.set_fill_style(C_SCORE);
    surface.fill_text(&score.to_string(), 5.0, 30.0);
}

/// Centered final score and restart prompt.
pub fn draw_game_over(surface: &mut dyn Surface, score: u64) {
    let cx = f64::from(GAME_WIDTH) / 2.0;
    let cy = f64::from(GAME_HEIGHT) / 2.0;
    surface.set_text_align(TextAlign::Center);
    surface.set_text_baseline(TextBaseline::Hanging);
    surface.set_font(BANNER_FONT);
    surface.set_fill_style(C_BANNER);
    surface.fill_text(&format!("{} GAME OVER", score), cx, cy);
    surface.fill_text("HIT SPACE TO RESTART", cx, cy + BANNER_LINE_GAP);
}
