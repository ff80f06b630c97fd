//! Sprite registry.
//!
//! Built once at startup and handed to the engine by reference.  Each PNG is
//! scaled to the cell footprint of the entity it depicts and converted to
//! half-block glyphs (two pixels per cell, stacked vertically).  A file that
//! cannot be decoded is replaced by a placeholder so the game still runs.

use std::collections::HashMap;
use std::path::Path;

use crossterm::style::Color;
use image::imageops::FilterType;
use image::RgbaImage;
use log::{debug, warn};

use crate::entities::{
    BACKGROUND_SPRITE, ENEMY_HEIGHT, ENEMY_SPRITE, ENEMY_WIDTH, GAME_HEIGHT, GAME_WIDTH,
    PLAYER_HEIGHT, PLAYER_SPRITE, PLAYER_WIDTH,
};
use crate::error::{GameError, Result};
use crate::surface::{Cell, Scale, Sprite};

/// Alpha at or above which a pixel counts as opaque.
const OPAQUE: u8 = 128;

/// Every asset the game draws, with its footprint in playfield pixels.
const MANIFEST: [(&str, i32, i32); 3] = [
    (ENEMY_SPRITE, ENEMY_WIDTH, ENEMY_HEIGHT),
    (BACKGROUND_SPRITE, GAME_WIDTH, GAME_HEIGHT),
    (PLAYER_SPRITE, PLAYER_WIDTH, PLAYER_HEIGHT),
];

#[derive(Clone, Debug, Default)]
pub struct AssetRegistry {
    sprites: HashMap<String, Sprite>,
}

impl AssetRegistry {
    /// Load every manifest entry from `dir`, falling back per asset.
    pub fn load(dir: &Path, scale: &Scale) -> Self {
        let mut registry = AssetRegistry::default();
        for (name, width, height) in MANIFEST {
            let (cols, rows) = scale.cells(width, height);
            let sprite = match load_sprite(&dir.join(name), name, cols, rows) {
                Ok(sprite) => {
                    debug!("loaded {} as {}x{} cells", name, cols, rows);
                    sprite
                }
                Err(err) => {
                    warn!("{}; using placeholder", err);
                    placeholder(name, cols, rows)
                }
            };
            registry.insert(name, sprite);
        }
        registry
    }

    /// Placeholders only, without touching the filesystem.
    pub fn placeholders(scale: &Scale) -> Self {
        let mut registry = AssetRegistry::default();
        for (name, width, height) in MANIFEST {
            let (cols, rows) = scale.cells(width, height);
            registry.insert(name, placeholder(name, cols, rows));
        }
        registry
    }

    pub fn insert(&mut self, name: &str, sprite: Sprite) {
        self.sprites.insert(name.to_string(), sprite);
    }

    pub fn get(&self, name: &str) -> Option<&Sprite> {
        self.sprites.get(name)
    }
}

fn load_sprite(path: &Path, name: &str, cols: u16, rows: u16) -> Result<Sprite> {
    let img = image::open(path).map_err(|source| GameError::Asset {
        name: name.to_string(),
        source,
    })?;
    let pixels = img
        .resize_exact(u32::from(cols), u32::from(rows) * 2, FilterType::Nearest)
        .to_rgba8();
    Ok(half_blocks(&pixels, cols, rows))
}

/// Pack pairs of pixel rows into one row of `▀`/`▄` cells.  `pixels` must be
/// `cols` x `2 * rows`.
pub fn half_blocks(pixels: &RgbaImage, cols: u16, rows: u16) -> Sprite {
    let mut cells = Vec::with_capacity(cols as usize * rows as usize);
    for r in 0..u32::from(rows) {
        for c in 0..u32::from(cols) {
            let top = opaque_color(pixels, c, r * 2);
            let bottom = opaque_color(pixels, c, r * 2 + 1);
            let cell = match (top, bottom) {
                (Some(fg), bg @ Some(_)) => Some(Cell { ch: '▀', fg, bg }),
                (Some(fg), None) => Some(Cell { ch: '▀', fg, bg: None }),
                (None, Some(fg)) => Some(Cell { ch: '▄', fg, bg: None }),
                (None, None) => None,
            };
            cells.push(cell);
        }
    }
    Sprite::new(cols, rows, cells)
}

fn opaque_color(pixels: &RgbaImage, x: u32, y: u32) -> Option<Color> {
    let [r, g, b, a] = pixels.get_pixel_checked(x, y)?.0;
    (a >= OPAQUE).then_some(Color::Rgb { r, g, b })
}

fn placeholder(name: &str, cols: u16, rows: u16) -> Sprite {
    match name {
        BACKGROUND_SPRITE => Sprite::solid(cols, rows, Color::DarkGreen),
        ENEMY_SPRITE => Sprite::framed(cols, rows, '▓', Color::Red),
        _ => Sprite::framed(cols, rows, '█', Color::White),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const SCALE: Scale = Scale {
        px_per_col: 7.5,
        px_per_row: 20.0,
    };

    #[test]
    fn missing_directory_falls_back_to_placeholders() {
        let registry = AssetRegistry::load(Path::new("/nonexistent/images"), &SCALE);
        for (name, _, _) in MANIFEST {
            assert!(registry.get(name).is_some(), "{} missing", name);
        }
        let enemy = registry.get(ENEMY_SPRITE).unwrap();
        assert_eq!((enemy.cols(), enemy.rows()), (10, 8));
        let grass = registry.get(BACKGROUND_SPRITE).unwrap();
        assert_eq!((grass.cols(), grass.rows()), (50, 25));
    }

    #[test]
    fn unknown_name_is_absent() {
        let registry = AssetRegistry::placeholders(&SCALE);
        assert!(registry.get("cat.png").is_none());
    }

    #[test]
    fn half_blocks_pair_rows_and_keep_transparency() {
        let red = Rgba([255, 0, 0, 255]);
        let blue = Rgba([0, 0, 255, 255]);
        let clear = Rgba([0, 0, 0, 0]);
        // 2 columns x 4 pixel rows -> 2 x 2 cells
        let mut img = RgbaImage::new(2, 4);
        img.put_pixel(0, 0, red);
        img.put_pixel(0, 1, blue);
        img.put_pixel(1, 0, red);
        img.put_pixel(1, 1, clear);
        img.put_pixel(0, 2, clear);
        img.put_pixel(0, 3, blue);
        img.put_pixel(1, 2, clear);
        img.put_pixel(1, 3, clear);

        let sprite = half_blocks(&img, 2, 2);
        let rgb_red = Color::Rgb { r: 255, g: 0, b: 0 };
        let rgb_blue = Color::Rgb { r: 0, g: 0, b: 255 };
        assert_eq!(
            sprite.cell(0, 0),
            Some(Cell { ch: '▀', fg: rgb_red, bg: Some(rgb_blue) })
        );
        assert_eq!(
            sprite.cell(1, 0),
            Some(Cell { ch: '▀', fg: rgb_red, bg: None })
        );
        assert_eq!(
            sprite.cell(0, 1),
            Some(Cell { ch: '▄', fg: rgb_blue, bg: None })
        );
        assert_eq!(sprite.cell(1, 1), None);
    }
}
