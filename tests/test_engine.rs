use approx::assert_relative_eq;
use crossterm::style::Color;
use kittens::assets::AssetRegistry;
use kittens::engine::{Engine, Schedule};
use kittens::entities::*;
use kittens::surface::{Scale, Sprite, Surface, TextAlign, TextBaseline};

use rand::rngs::StdRng;
use rand::SeedableRng;

const SCALE: Scale = Scale {
    px_per_col: 7.5,
    px_per_row: 20.0,
};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    /// Sprite size in cells, so background/enemy/player are distinguishable.
    Image { size: (u16, u16), x: f64, y: f64 },
    Text {
        text: String,
        x: f64,
        y: f64,
        align: TextAlign,
        baseline: TextBaseline,
        font: String,
        fill: Color,
    },
}

struct RecordingSurface {
    calls: Vec<Call>,
    align: TextAlign,
    baseline: TextBaseline,
    font: String,
    fill: Color,
}

impl RecordingSurface {
    fn new() -> Self {
        RecordingSurface {
            calls: Vec::new(),
            align: TextAlign::default(),
            baseline: TextBaseline::default(),
            font: String::new(),
            fill: Color::Reset,
        }
    }

    fn texts(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Text { .. }))
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn draw_image(&mut self, sprite: &Sprite, x: f64, y: f64) {
        self.calls.push(Call::Image {
            size: (sprite.cols(), sprite.rows()),
            x,
            y,
        });
    }
    fn set_text_align(&mut self, align: TextAlign) {
        self.align = align;
    }
    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.baseline = baseline;
    }
    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
    }
    fn set_fill_style(&mut self, color: Color) {
        self.fill = color;
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.calls.push(Call::Text {
            text: text.to_string(),
            x,
            y,
            align: self.align,
            baseline: self.baseline,
            font: self.font.clone(),
            fill: self.fill,
        });
    }
}

const GRASS: (u16, u16) = (50, 25);
const ENEMY: (u16, u16) = (10, 8);
const PLAYER: (u16, u16) = (10, 4);

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn state_with(enemies: &[(usize, f64)]) -> GameState {
    let mut slots: Slots = Default::default();
    for &(slot, y) in enemies {
        slots[slot] = Some(Enemy {
            x: slot as i32 * ENEMY_WIDTH,
            y,
            speed: 0.5,
        });
    }
    GameState {
        player: Player::default(),
        slots,
        score: 0,
        status: GameStatus::Running,
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

#[test]
fn frame_draws_back_to_front_then_score() {
    let assets = AssetRegistry::placeholders(&SCALE);
    let state = state_with(&[(0, 0.0), (1, 0.0), (4, 0.0)]);
    let mut engine = Engine::resume(&assets, seeded_rng(), state, 0);
    let mut surface = RecordingSurface::new();

    assert_eq!(engine.frame(20, &mut surface), Schedule::NextFrame);

    let sizes: Vec<_> = surface
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Image { size, .. } => Some(*size),
            _ => None,
        })
        .collect();
    assert_eq!(sizes, vec![GRASS, ENEMY, ENEMY, ENEMY, PLAYER]);

    // Enemies are drawn at their updated positions: 20ms * 0.5 px/ms.
    match &surface.calls[1] {
        Call::Image { x, y, .. } => {
            assert_relative_eq!(*x, 0.0);
            assert_relative_eq!(*y, 10.0);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        surface.calls.last(),
        Some(&Call::Text {
            text: "20".to_string(),
            x: 5.0,
            y: 30.0,
            align: TextAlign::Left,
            baseline: TextBaseline::Alphabetic,
            font: "bold 30px Impact".to_string(),
            fill: Color::White,
        })
    );
}

#[test]
fn score_sums_frame_deltas() {
    let assets = AssetRegistry::placeholders(&SCALE);
    let mut engine = Engine::new(&assets, seeded_rng(), 1000);
    let mut surface = RecordingSurface::new();
    for now in [1016, 1033, 1033, 1050, 1100] {
        assert_eq!(engine.frame(now, &mut surface), Schedule::NextFrame);
    }
    assert_eq!(engine.state().score, 100);
}

#[test]
fn clock_going_backwards_counts_as_zero() {
    let assets = AssetRegistry::placeholders(&SCALE);
    let mut engine = Engine::new(&assets, seeded_rng(), 500);
    let mut surface = RecordingSurface::new();
    engine.frame(400, &mut surface);
    assert_eq!(engine.state().score, 0);
}

#[test]
fn fallen_enemy_is_replaced_in_the_same_frame() {
    let assets = AssetRegistry::placeholders(&SCALE);
    let state = state_with(&[(0, 499.0), (1, 0.0), (3, 0.0)]);
    let mut engine = Engine::resume(&assets, seeded_rng(), state, 0);
    let mut surface = RecordingSurface::new();
    engine.frame(10, &mut surface); // slot 0 reaches 504
    assert_eq!(engine.state().occupied(), MAX_ENEMIES);
    assert!(engine.state().enemies().all(|e| e.y <= f64::from(GAME_HEIGHT)));
}

#[test]
fn fatal_frame_shows_scene_then_banner_and_halts() {
    let assets = AssetRegistry::placeholders(&SCALE);
    let state = state_with(&[(0, 0.0), (2, 400.0), (4, 0.0)]);
    let mut engine = Engine::resume(&assets, seeded_rng(), state, 0);
    let mut surface = RecordingSurface::new();

    assert_eq!(engine.frame(0, &mut surface), Schedule::Halt);
    assert!(!engine.is_running());
    assert_eq!(engine.state().status, GameStatus::GameOver);

    assert!(matches!(surface.calls[4], Call::Image { size: PLAYER, .. }));
    let texts = surface.texts();
    assert_eq!(texts.len(), 2);
    assert_eq!(
        texts[0],
        &Call::Text {
            text: "0 GAME OVER".to_string(),
            x: 187.5,
            y: 250.0,
            align: TextAlign::Center,
            baseline: TextBaseline::Hanging,
            font: "40px serif bold".to_string(),
            fill: Color::Black,
        }
    );
    match texts[1] {
        Call::Text { text, y, .. } => {
            assert_eq!(text, "HIT SPACE TO RESTART");
            assert_relative_eq!(*y, 300.0);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn no_frames_run_after_game_over() {
    let assets = AssetRegistry::placeholders(&SCALE);
    let state = state_with(&[(0, 0.0), (2, 400.0), (4, 0.0)]);
    let mut engine = Engine::resume(&assets, seeded_rng(), state, 0);
    let mut surface = RecordingSurface::new();
    engine.frame(40, &mut surface);
    let score = engine.state().score;

    let mut after = RecordingSurface::new();
    assert_eq!(engine.frame(1000, &mut after), Schedule::Halt);
    assert!(after.calls.is_empty());
    assert_eq!(engine.state().score, score);
}

#[test]
fn missing_sprites_are_skipped() {
    let assets = AssetRegistry::default();
    let mut engine = Engine::new(&assets, seeded_rng(), 0);
    let mut surface = RecordingSurface::new();
    assert_eq!(engine.frame(16, &mut surface), Schedule::NextFrame);
    assert_eq!(surface.calls.len(), 1);
    assert_eq!(surface.texts().len(), 1);
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[test]
fn arrows_move_the_player_immediately() {
    let assets = AssetRegistry::placeholders(&SCALE);
    let mut engine = Engine::new(&assets, seeded_rng(), 0);
    engine.handle_key(LEFT_ARROW_CODE, 0);
    engine.handle_key(UP_ARROW_CODE, 0);
    assert_eq!(engine.state().player, Player { x: 75, y: 340 });
    engine.handle_key(RIGHT_ARROW_CODE, 0);
    engine.handle_key(DOWN_ARROW_CODE, 0);
    assert_eq!(engine.state().player, Player::default());
    // Unrecognised codes do nothing
    engine.handle_key(65, 0);
    assert_eq!(engine.state().player, Player::default());
}

#[test]
fn space_does_nothing_while_running() {
    let assets = AssetRegistry::placeholders(&SCALE);
    let mut engine = Engine::new(&assets, seeded_rng(), 0);
    let mut surface = RecordingSurface::new();
    engine.frame(50, &mut surface);
    engine.handle_key(SPACEBAR_CODE, 50);
    assert_eq!(engine.state().score, 50);
}

#[test]
fn space_restarts_a_finished_game() {
    let assets = AssetRegistry::placeholders(&SCALE);
    let state = state_with(&[(0, 0.0), (2, 400.0), (4, 0.0)]);
    let mut engine = Engine::resume(&assets, seeded_rng(), state, 0);
    let mut surface = RecordingSurface::new();
    engine.frame(30, &mut surface);
    assert!(!engine.is_running());

    // Moves are ignored once the game is over.
    engine.handle_key(LEFT_ARROW_CODE, 100);
    assert_eq!(engine.state().player, Player::default());

    engine.handle_key(SPACEBAR_CODE, 5000);
    assert!(engine.is_running());
    assert_eq!(engine.state().score, 0);
    assert_eq!(engine.state().player, Player::default());
    assert_eq!(engine.state().occupied(), MAX_ENEMIES);
    assert!(engine.state().enemies().all(|e| e.y == -f64::from(ENEMY_HEIGHT)));

    // Time is measured from the restart, not the old session.
    assert_eq!(engine.frame(5016, &mut surface), Schedule::NextFrame);
    assert_eq!(engine.state().score, 16);
}
