// Copyright © 2018 Cormac O'Brien
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of this software
// and associated documentation files (the "Software"), to deal in the Software without
// restriction, including without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all copies or
// substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Texture and model themes.
//!
//! A theme decides how each part of a level looks. The exporter asks it for one texture per
//! surface kind and texture group, and remembers the answer, so a theme only needs to make each
//! choice once.

use std::collections::HashMap;

use cgmath::{Vector2, Vector3};
use rand::{rngs::StdRng, Rng};
use strum_macros::{Display, EnumIter, EnumString};

/// The side of a cell a wall is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ThemeTexture {
    pub name: String,
    pub width: u32,
    pub height: u32,

    /// Multiplier on top of the one-texture-per-cell scale.
    pub scale: f64,

    /// Rotation in degrees.
    pub angle: f64,
}

impl ThemeTexture {
    pub fn new<S>(name: S, width: u32, height: u32) -> ThemeTexture
    where
        S: Into<String>,
    {
        ThemeTexture {
            name: name.into(),
            width,
            height,
            scale: 1.0,
            angle: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ThemeModel {
    /// Path relative to `models/`.
    pub name: String,
    pub scale: f64,
    pub angle: f64,
}

impl ThemeModel {
    pub fn new<S>(name: S, scale: f64) -> ThemeModel
    where
        S: Into<String>,
    {
        ThemeModel {
            name: name.into(),
            scale,
            angle: 0.0,
        }
    }
}

/// A wall that could carry a decoration.
#[derive(Clone, Debug, PartialEq)]
pub struct WallArtLocation {
    /// Corners of the wall, in cells.
    pub a: Vector3<f64>,
    pub b: Vector3<f64>,

    /// Points from the wall into the cell it bounds.
    pub interior_direction: Vector3<f64>,

    /// One-based (row, column) of the cell.
    pub cell: Vector2<i32>,
    pub group: i32,
    pub direction: Direction,
}

/// The floor of a cell, which could carry a decoration.
#[derive(Clone, Debug, PartialEq)]
pub struct FloorArtLocation {
    /// Center of the floor, in cells.
    pub location: Vector3<f64>,
    pub cell: Vector2<i32>,
    pub group: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WallDecoration {
    pub texture: ThemeTexture,
    pub location: WallArtLocation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloorDecoration {
    pub model: ThemeModel,
    pub location: FloorArtLocation,
}

pub trait Theme {
    fn floor(&self, group: i32, rng: &mut StdRng) -> ThemeTexture;

    fn ceiling(&self, group: i32, rng: &mut StdRng) -> ThemeTexture;

    fn wall(&self, group: i32, direction: Direction, rng: &mut StdRng) -> ThemeTexture;

    fn platform_riser(&self) -> ThemeTexture;

    fn platform_tread(&self) -> ThemeTexture;

    /// Decals the exporter may scatter over walls.
    fn wall_decals(&self) -> &[ThemeTexture] {
        &[]
    }

    /// Models the exporter may mount on walls.
    fn wall_models(&self) -> &[ThemeModel] {
        &[]
    }

    /// Models the exporter may scatter over floors.
    fn floor_models(&self) -> &[ThemeModel] {
        &[]
    }

    /// Decals this theme places itself, given every wall in the level.
    fn wall_decorations(
        &self,
        _locations: &[WallArtLocation],
        _rng: &mut StdRng,
    ) -> Vec<WallDecoration> {
        Vec::new()
    }

    /// Models this theme places itself, given every floor in the level.
    fn floor_decorations(
        &self,
        _locations: &[FloorArtLocation],
        _rng: &mut StdRng,
    ) -> Vec<FloorDecoration> {
        Vec::new()
    }
}

/// The built-in themes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ThemeKind {
    Default,
    Mishmash,
    Tron,
    Minesweeper,
    Tetris,
    Go,
    Pacman,
    Null,
}

impl ThemeKind {
    pub fn theme(self) -> Box<dyn Theme> {
        Box::new(StockTheme { kind: self })
    }
}

impl std::default::Default for ThemeKind {
    fn default() -> Self {
        ThemeKind::Default
    }
}

const TEXTURE_DIM: u32 = 1024;

struct TextureSet {
    floor: Vec<ThemeTexture>,
    ceiling: Vec<ThemeTexture>,
    wall: Vec<ThemeTexture>,
    wall_decals: Vec<ThemeTexture>,
    wall_models: Vec<ThemeModel>,
    floor_models: Vec<ThemeModel>,
}

fn lab_games(names: &[&str]) -> Vec<ThemeTexture> {
    names
        .iter()
        .map(|n| ThemeTexture::new(format!("map/lab_games/{}", n), TEXTURE_DIM, TEXTURE_DIM))
        .collect()
}

fn models(names: &[&str]) -> Vec<ThemeModel> {
    names.iter().map(|n| ThemeModel::new(*n, 1.0)).collect()
}

/// Floor and wall names for the given styles, in style order.
fn style_surfaces(styles: &[usize], surface: &str) -> Vec<ThemeTexture> {
    let mut names = Vec::new();
    for style in styles {
        let (first, second) = STYLE_COLORS[style - 1];
        let colors = if surface == "floor" { first } else { second };
        for color in colors.iter() {
            names.push(format!("lg_style_{:02}_{}_{}", style, surface, color));
            names.push(format!("lg_style_{:02}_{}_{}_bright", style, surface, color));
        }
    }
    let names: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
    lab_games(&names)
}

// (floor colors, wall colors) of styles 1 through 5
static STYLE_COLORS: [(&[&str], &[&str]); 5] = [
    (&["orange", "blue"], &["green", "red"]),
    (&["blue", "green"], &["yellow", "blue"]),
    (&["green", "blue"], &["orange", "gray"]),
    (&["blue", "orange"], &["green", "red"]),
    (&["blue", "orange"], &["red", "yellow"]),
];

fn texture_set(styles: &[usize], wall_models: Vec<ThemeModel>, floor_models: Vec<ThemeModel>) -> TextureSet {
    TextureSet {
        floor: style_surfaces(styles, "floor"),
        ceiling: lab_games(&["fake_sky"]),
        wall: style_surfaces(styles, "wall"),
        wall_decals: (*WALL_DECALS).clone(),
        wall_models,
        floor_models,
    }
}

lazy_static! {
    /// Decals shared by every stock theme: 20 images in each of 4 styles.
    static ref WALL_DECALS: Vec<ThemeTexture> = {
        let mut decals = Vec::new();
        for style in 1..=4 {
            for i in 1..=20 {
                decals.push(ThemeTexture::new(
                    format!("decal/lab_games/dec_img_style{:02}_{:03}", style, i),
                    TEXTURE_DIM,
                    TEXTURE_DIM,
                ));
            }
        }
        decals
    };

    static ref TEXTURE_SETS: HashMap<ThemeKind, TextureSet> = {
        let mut sets = HashMap::new();
        sets.insert(ThemeKind::Default, texture_set(&[1, 2, 3, 4, 5], Vec::new(), Vec::new()));
        sets.insert(ThemeKind::Mishmash, texture_set(&[1, 2, 3, 4, 5], Vec::new(), Vec::new()));
        sets.insert(ThemeKind::Tron, texture_set(&[1], Vec::new(), Vec::new()));
        sets.insert(
            ThemeKind::Minesweeper,
            texture_set(
                &[4],
                models(&["fut_obj_barbell_01.md3", "fut_obj_cylinder_01.md3"]),
                Vec::new(),
            ),
        );
        sets.insert(ThemeKind::Tetris, texture_set(&[2], Vec::new(), Vec::new()));
        sets.insert(
            ThemeKind::Go,
            texture_set(
                &[3],
                models(&[
                    "fut_obj_barbell_01.md3",
                    "fut_obj_coil_01.md3",
                    "fut_obj_cone_01.md3",
                    "fut_obj_crossbar_01.md3",
                    "fut_obj_cube_01.md3",
                    "fut_obj_cylinder_01.md3",
                    "fut_obj_doubleprism_01.md3",
                    "fut_obj_glowball_01.md3",
                ]),
                models(&[
                    "fut_obj_toroid_01.md3",
                    "fut_obj_toroid_02.md3",
                    "fut_obj_toroid_03.md3",
                ]),
            ),
        );
        sets.insert(
            ThemeKind::Pacman,
            texture_set(
                &[5],
                models(&[
                    "fut_obj_toroid_01.md3",
                    "fut_obj_cylinder_01.md3",
                    "fut_obj_crossbar_01.md3",
                    "fut_obj_cube_01.md3",
                ]),
                Vec::new(),
            ),
        );
        sets.insert(
            ThemeKind::Null,
            TextureSet {
                floor: lab_games(&["lg_style_01_floor_orange"]),
                ceiling: lab_games(&["fake_sky"]),
                wall: lab_games(&["lg_style_01_wall_green"]),
                wall_decals: Vec::new(),
                wall_models: Vec::new(),
                floor_models: Vec::new(),
            },
        );
        sets
    };

    static ref PLATFORM_RISER: ThemeTexture =
        ThemeTexture::new("map/lab_games/lg_style_02_wall_blue", TEXTURE_DIM, TEXTURE_DIM);
    static ref PLATFORM_TREAD: ThemeTexture = ThemeTexture::new("map/black_d", 64, 64);
}

/// Picks the first texture for group 0 and a random one for every other group.
///
/// Group 0 covers corridors and unmarked cells, so the overall look of a level stays fixed while
/// rooms vary.
fn pick(textures: &[ThemeTexture], group: i32, rng: &mut StdRng) -> ThemeTexture {
    if group == 0 || textures.len() == 1 {
        return textures[0].clone();
    }

    textures[rng.gen_range(0..textures.len())].clone()
}

struct StockTheme {
    kind: ThemeKind,
}

impl StockTheme {
    fn set(&self) -> &'static TextureSet {
        &TEXTURE_SETS[&self.kind]
    }
}

impl Theme for StockTheme {
    fn floor(&self, group: i32, rng: &mut StdRng) -> ThemeTexture {
        pick(&self.set().floor, group, rng)
    }

    fn ceiling(&self, group: i32, rng: &mut StdRng) -> ThemeTexture {
        pick(&self.set().ceiling, group, rng)
    }

    fn wall(&self, group: i32, _direction: Direction, rng: &mut StdRng) -> ThemeTexture {
        pick(&self.set().wall, group, rng)
    }

    fn platform_riser(&self) -> ThemeTexture {
        (*PLATFORM_RISER).clone()
    }

    fn platform_tread(&self) -> ThemeTexture {
        (*PLATFORM_TREAD).clone()
    }

    fn wall_decals(&self) -> &[ThemeTexture] {
        &self.set().wall_decals
    }

    fn wall_models(&self) -> &[ThemeModel] {
        &self.set().wall_models
    }

    fn floor_models(&self) -> &[ThemeModel] {
        &self.set().floor_models
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_theme_names() {
        assert_eq!(ThemeKind::from_str("pacman"), Ok(ThemeKind::Pacman));
        assert_eq!(ThemeKind::Minesweeper.to_string(), "minesweeper");
        assert!(ThemeKind::from_str("vaporwave").is_err());

        for kind in ThemeKind::iter() {
            assert_eq!(ThemeKind::from_str(&kind.to_string()), Ok(kind));
        }
    }

    #[test]
    fn test_every_theme_has_textures() {
        for kind in ThemeKind::iter() {
            let set = &TEXTURE_SETS[&kind];
            assert!(!set.floor.is_empty(), "{} has no floors", kind);
            assert!(!set.ceiling.is_empty(), "{} has no ceilings", kind);
            assert!(!set.wall.is_empty(), "{} has no walls", kind);
        }
    }

    #[test]
    fn test_default_tables() {
        let set = &TEXTURE_SETS[&ThemeKind::Default];
        assert_eq!(set.floor.len(), 20);
        assert_eq!(set.wall.len(), 20);
        assert_eq!(set.wall_decals.len(), 80);
        assert_eq!(set.floor[0].name, "map/lab_games/lg_style_01_floor_orange");
        assert_eq!(set.floor[1].name, "map/lab_games/lg_style_01_floor_orange_bright");
        assert_eq!(set.floor[19].name, "map/lab_games/lg_style_05_floor_orange_bright");
        assert_eq!(set.wall[0].name, "map/lab_games/lg_style_01_wall_green");
        assert_eq!(set.wall[8].name, "map/lab_games/lg_style_03_wall_orange");
        assert_eq!(set.ceiling[0].name, "map/lab_games/fake_sky");
        assert_eq!(set.wall_decals[0].name, "decal/lab_games/dec_img_style01_001");
        assert_eq!(set.wall_decals[79].name, "decal/lab_games/dec_img_style04_020");
    }

    #[test]
    fn test_group_zero_gets_first_texture() {
        let mut rng = StdRng::seed_from_u64(7);
        let theme = ThemeKind::Default.theme();
        for _ in 0..10 {
            assert_eq!(
                theme.wall(0, Direction::East, &mut rng).name,
                "map/lab_games/lg_style_01_wall_green"
            );
            assert_eq!(
                theme.floor(0, &mut rng).name,
                "map/lab_games/lg_style_01_floor_orange"
            );
        }
    }

    #[test]
    fn test_other_groups_vary() {
        let mut rng = StdRng::seed_from_u64(7);
        let theme = ThemeKind::Default.theme();
        let picks: Vec<_> = (0..50).map(|_| theme.floor('A' as i32, &mut rng).name).collect();
        assert!(picks.iter().any(|p| *p != picks[0]));
        assert!(picks.iter().all(|p| p.starts_with("map/lab_games/lg_style_0")));
    }

    #[test]
    fn test_theme_models() {
        let go = ThemeKind::Go.theme();
        assert_eq!(go.wall_models().len(), 8);
        assert_eq!(go.floor_models()[0].name, "fut_obj_toroid_01.md3");
        assert!(ThemeKind::Tron.theme().wall_models().is_empty());
        assert!(ThemeKind::Null.theme().wall_decals().is_empty());
    }

    #[test]
    fn test_platform_textures() {
        let theme = ThemeKind::Tetris.theme();
        assert_eq!(theme.platform_riser().name, "map/lab_games/lg_style_02_wall_blue");
        assert_eq!(theme.platform_tread().width, 64);
    }
}
