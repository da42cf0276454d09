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

//! Text level to map translation.
//!
//! Grid rows run top to bottom while map coordinates grow upwards, so the cell at `(row, col)`
//! covers the unit square with its lower left corner at `x = col`, `y = height - row - 1`.

use crate::{
    common::format::fmt_g,
    level::{
        exporter::{TextLevelExporter, HEIGHT_SCALE},
        maze::Opening,
        parse::parse_text_level,
        settings::TextLevelSettings,
    },
    map::entity::Entity,
};

use cgmath::{Deg, Rad, Vector2, Vector3};
use rand::{rngs::StdRng, Rng};

/// Height above the floor of lights, in cells.
const LIGHT_HEIGHT: f64 = 0.7;

/// Height above the floor of spawned entities, in cells.
const SPAWN_ELEVATION: f64 = 0.3;

const DOOR_TEXTURE: &str = "map/fut_door_d";
const DOOR_TEXTURE_SIZE: Vector2<i32> = Vector2 { x: 1024, y: 1024 };
const DOOR_THICKNESS: f64 = 0.01;
const DOOR_SURROUND: f64 = 0.01;

const FENCE_THICKNESS: f64 = 0.04;
const FENCE_POSTS: usize = 4;
const FENCE_POST_SPACING: f64 = 0.3;
const FENCE_BAR_HEIGHT: f64 = 0.08;
const FENCE_TEXTURE_SCALE: f64 = 1.02 / 1024.0;

/// What a per-cell callback made of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CallbackResult {
    /// The cell falls through to the built-in handler.
    NotHandled,

    /// Map text for the cell. Blank entries are dropped, so `Handled(vec![])` suppresses the
    /// built-in handler without emitting anything.
    Handled(Vec<String>),
}

/// The axis a door spans.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorDirection {
    /// Along x, written `H`.
    Horizontal,

    /// Along y, written `I`.
    Vertical,
}

impl DoorDirection {
    pub fn from_char(c: char) -> Option<DoorDirection> {
        match c {
            'H' => Some(DoorDirection::Horizontal),
            'I' => Some(DoorDirection::Vertical),
            _ => None,
        }
    }

    fn angle(self) -> &'static str {
        match self {
            DoorDirection::Horizontal => "0",
            DoorDirection::Vertical => "90",
        }
    }

    /// Swaps x and y of both corners of a box for vertical doors.
    fn orient(self, (min, max): (Vector3<f64>, Vector3<f64>)) -> (Vector3<f64>, Vector3<f64>) {
        match self {
            DoorDirection::Horizontal => (min, max),
            DoorDirection::Vertical => (
                Vector3::new(min.y, min.x, min.z),
                Vector3::new(max.y, max.x, max.z),
            ),
        }
    }
}

/// Produces map text for individual cells while a level is being translated.
///
/// Handed to the per-cell callback after the level geometry is complete.
pub struct MapSnippetEmitter<'e, 'a> {
    exporter: &'e mut TextLevelExporter<'a>,
    maze_height: usize,
}

impl<'e, 'a> MapSnippetEmitter<'e, 'a> {
    pub fn new(
        exporter: &'e mut TextLevelExporter<'a>,
        maze_height: usize,
    ) -> MapSnippetEmitter<'e, 'a> {
        MapSnippetEmitter {
            exporter,
            maze_height,
        }
    }

    /// Lower left corner of a cell in map coordinates, in cells.
    fn corner(&self, row: usize, col: usize) -> Vector2<f64> {
        Vector2::new(col as f64, (self.maze_height - row - 1) as f64)
    }

    fn center(&self, row: usize, col: usize, height: f64) -> Vector3<f64> {
        let corner = self.corner(row, col);
        Vector3::new(
            corner.x + 0.5,
            corner.y + 0.5,
            height * HEIGHT_SCALE + SPAWN_ELEVATION,
        )
    }

    /// A point entity in the middle of a cell, `height` platform steps up.
    pub fn add_entity<S, I, K, V>(
        &self,
        row: usize,
        col: usize,
        height: f64,
        class_name: S,
        attributes: I,
    ) -> String
    where
        S: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.exporter
            .make_entity(self.center(row, col, height), class_name, attributes)
            .to_string()
    }

    /// A player spawn in the middle of a cell facing `angle`.
    pub fn add_spawn(&self, row: usize, col: usize, height: f64, angle: Rad<f64>) -> String {
        let pos = self.center(row, col, height) * self.exporter.settings().cell_size;
        Entity::spawn(pos, Deg::from(angle)).to_string()
    }

    /// A sliding door across a cell with trigger volumes on both sides.
    ///
    /// Returns an empty string if `direction` is not a door character.
    pub fn add_door(&mut self, row: usize, col: usize, direction: char) -> String {
        let direction = match DoorDirection::from_char(direction) {
            Some(d) => d,
            None => {
                warn!("Not a door: '{}'", direction);
                return String::new();
            }
        };

        let corner = self.corner(row, col);
        let target = door_target(corner);

        // boxes are laid out for a horizontal door with (u, v) standing in for (x, y)
        let (u, v) = match direction {
            DoorDirection::Horizontal => (corner.x, corner.y),
            DoorDirection::Vertical => (corner.y, corner.x),
        };
        let door = direction.orient((
            Vector3::new(u + DOOR_SURROUND, v + 0.5 - DOOR_THICKNESS, 0.0),
            Vector3::new(u + 1.0 - DOOR_SURROUND, v + 0.5 + DOOR_THICKNESS, 1.0),
        ));

        let door_entity = self.exporter.make_fitted_brush_entity(
            door.0,
            door.1,
            "func_door",
            DOOR_TEXTURE,
            DOOR_TEXTURE_SIZE,
            vec![("angle", direction.angle().to_owned()), ("targetname", target.clone())],
        );

        let mut snippets = vec![door_entity.to_string()];
        snippets.extend(self.door_triggers(direction, u, v, &target));
        snippets.join("\n\n")
    }

    /// A door made of a rail at the top and bottom joined by posts.
    ///
    /// Returns an empty string if `direction` is not a door character.
    pub fn add_fence_door(&mut self, row: usize, col: usize, direction: char) -> String {
        let direction = match DoorDirection::from_char(direction) {
            Some(d) => d,
            None => {
                warn!("Not a door: '{}'", direction);
                return String::new();
            }
        };

        let corner = self.corner(row, col);
        let target = door_target(corner);
        let (u, v) = match direction {
            DoorDirection::Horizontal => (corner.x, corner.y),
            DoorDirection::Vertical => (corner.y, corner.x),
        };

        let near = v + 0.5 - FENCE_THICKNESS;
        let far = v + 0.5 + FENCE_THICKNESS;
        let start = u + DOOR_SURROUND;
        let end = u + 1.0 + DOOR_SURROUND;

        let mut blocks = vec![
            (
                Vector3::new(start, near, 1.0 - FENCE_BAR_HEIGHT),
                Vector3::new(end, far, 1.0),
            ),
            (
                Vector3::new(start, near, 0.0),
                Vector3::new(end, far, FENCE_BAR_HEIGHT),
            ),
        ];
        for k in 0..FENCE_POSTS {
            let post = u + 0.05 + k as f64 * FENCE_POST_SPACING;
            blocks.push((
                Vector3::new(post - FENCE_THICKNESS, near, FENCE_BAR_HEIGHT),
                Vector3::new(post + FENCE_THICKNESS, far, 1.0 - FENCE_BAR_HEIGHT),
            ));
        }
        let blocks: Vec<_> = blocks.into_iter().map(|b| direction.orient(b)).collect();

        let fence = self.exporter.make_brush_entity_blocks(
            &blocks,
            "func_door",
            &format!("door_placeholder:{}", target),
            Vector2::new(FENCE_TEXTURE_SCALE, FENCE_TEXTURE_SCALE),
            vec![("angle", direction.angle().to_owned()), ("targetname", target.clone())],
        );

        let mut snippets = vec![fence.to_string()];
        snippets.extend(self.door_triggers(direction, u, v, &target));
        snippets.join("\n\n")
    }

    /// The two volumes either side of a door that open it.
    fn door_triggers(
        &mut self,
        direction: DoorDirection,
        u: f64,
        v: f64,
        target: &str,
    ) -> Vec<String> {
        let volumes = [
            (
                Vector3::new(u, v, 0.0),
                Vector3::new(u + 1.0, v + 0.5 - DOOR_THICKNESS, 1.0),
            ),
            (
                Vector3::new(u, v + 0.5 + DOOR_THICKNESS, 0.0),
                Vector3::new(u + 1.0, v + 1.0, 1.0),
            ),
        ];

        volumes
            .iter()
            .map(|volume| {
                let (min, max) = direction.orient(*volume);
                self.exporter
                    .make_brush_entity(
                        min,
                        max,
                        "trigger_multiple",
                        "",
                        Vector2::new(0.0, 0.0),
                        vec![("target", target), ("wait", "1")],
                    )
                    .to_string()
            })
            .collect()
    }

    /// Raises the floor of a cell by `height` steps. Adds to the level directly and returns an
    /// empty string.
    pub fn add_platform(&mut self, row: usize, col: usize, height: i32) -> String {
        let corner = self.corner(row, col);
        self.exporter.add_platform(corner.x, corner.y, height);
        String::new()
    }

    /// Blocks a cell with an invisible column `height` steps tall. Adds to the level directly and
    /// returns an empty string.
    pub fn add_glass_column(&mut self, row: usize, col: usize, height: f64) -> String {
        let corner = self.corner(row, col);
        self.exporter.add_glass_column(corner.x, corner.y, height);
        String::new()
    }
}

fn door_target(corner: Vector2<f64>) -> String {
    format!("door_{}_{}", fmt_g(corner.x), fmt_g(corner.y))
}

/// Handles the cell characters every level understands: `P` for the player spawn, `H` and `I`
/// for doors.
pub fn default_handler(
    row: usize,
    col: usize,
    value: char,
    emitter: &mut MapSnippetEmitter,
) -> CallbackResult {
    match value {
        'P' => CallbackResult::Handled(vec![emitter.add_spawn(row, col, 0.0, Rad(0.0))]),
        'H' | 'I' => CallbackResult::Handled(vec![emitter.add_door(row, col, value)]),
        _ => CallbackResult::NotHandled,
    }
}

/// Translates a text level into map source.
///
/// `callback` sees every accessible cell after the level geometry is complete, and cells it does
/// not handle go to [`default_handler`]. The map text is followed by every snippet produced for
/// the cells, each separated by a blank line.
pub fn translate_text_level<L, V, F>(
    level_text: L,
    variations_text: V,
    rng: &mut StdRng,
    mut callback: F,
    settings: &TextLevelSettings,
) -> String
where
    L: AsRef<str>,
    V: AsRef<str>,
    F: FnMut(usize, usize, char, &mut MapSnippetEmitter) -> CallbackResult,
{
    let maze = parse_text_level(level_text, variations_text);
    let height = maze.height();
    let width = maze.width();

    let mut exporter = TextLevelExporter::new(settings, rng);
    exporter.set_bounding_box(Vector3::new(width as f64, height as f64, settings.ceiling_height));

    if settings.draw_default_layout {
        maze.visit(|i, j, cell| {
            if !cell.is_accessible() {
                return;
            }

            let x = j as f64;
            let y = (height - i - 1) as f64;
            let location = Vector2::new(i as i32 + 1, j as i32 + 1);
            let group = cell.group();

            let walls = [
                (
                    Opening::NORTH,
                    Vector3::new(x, y + 1.0, 0.0),
                    Vector3::new(x + 1.0, y + 1.0, 1.0),
                    Vector3::new(0.0, -1.0, 0.0),
                ),
                (
                    Opening::EAST,
                    Vector3::new(x + 1.0, y, 0.0),
                    Vector3::new(x + 1.0, y + 1.0, 1.0),
                    Vector3::new(-1.0, 0.0, 0.0),
                ),
                (
                    Opening::SOUTH,
                    Vector3::new(x, y, 0.0),
                    Vector3::new(x + 1.0, y, 1.0),
                    Vector3::new(0.0, 1.0, 0.0),
                ),
                (
                    Opening::WEST,
                    Vector3::new(x, y, 0.0),
                    Vector3::new(x, y + 1.0, 1.0),
                    Vector3::new(1.0, 0.0, 0.0),
                ),
            ];
            for (side, a, b, interior) in walls.iter() {
                if !cell.opening.contains(*side) {
                    exporter.add_wall(*a, *b, *interior, location, group);
                }
            }

            exporter.add_floor(
                Vector3::new(x, y, 0.0),
                Vector3::new(x + 1.0, y + 1.0, 0.0),
                location,
                group,
            );

            if (height - 1 - i + j) % 2 == 0 {
                let intensity = exporter.rng().gen_range(10..=19);
                let light = exporter.make_light(
                    Vector3::new(x + 0.5, y + 0.5, LIGHT_HEIGHT),
                    intensity as f64,
                );
                exporter.add(light);
            }
        });
    }

    exporter.finalize();

    let mut snippets: Vec<String> = Vec::new();
    {
        let mut emitter = MapSnippetEmitter::new(&mut exporter, height);
        maze.visit(|i, j, cell| {
            if !cell.is_accessible() {
                return;
            }

            let result = match callback(i, j, cell.value, &mut emitter) {
                CallbackResult::NotHandled => default_handler(i, j, cell.value, &mut emitter),
                handled => handled,
            };

            if let CallbackResult::Handled(texts) = result {
                snippets.extend(texts.into_iter().filter(|t| !t.trim().is_empty()));
            }
        });
    }

    format!("{}\n{}\n\n", exporter, snippets.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::theme::ThemeKind;
    use rand::SeedableRng;

    static ENTITIES: &str = "   ******
 ***    *********
 *    x    I    *
 ** P ***H****H**
  *   *     *   *
  ***************
";

    static VARIATIONS: &str = ".........
....AAAAAAAAAAAAAA
.
.CCCCCCCCCCCCCCCCCCCCCCCCCC
.CCCCCCCCCCCCCCCCCCCCCCC
$%^&*()
.............
";

    fn not_handled(_: usize, _: usize, _: char, _: &mut MapSnippetEmitter) -> CallbackResult {
        CallbackResult::NotHandled
    }

    fn translate<F>(
        level: &str,
        variations: &str,
        seed: u64,
        callback: F,
        settings: &TextLevelSettings,
    ) -> String
    where
        F: FnMut(usize, usize, char, &mut MapSnippetEmitter) -> CallbackResult,
    {
        let mut rng = StdRng::seed_from_u64(seed);
        translate_text_level(level, variations, &mut rng, callback, settings)
    }

    #[test]
    fn test_simple() {
        let settings = TextLevelSettings::default();
        let map = translate(ENTITIES, "", 123, not_handled, &settings);

        assert!(map.starts_with("{\n  \"classname\" \"worldspawn\"\n"));
        assert!(map.contains("\"classname\" \"info_player_start\""));
        assert_eq!(map.matches("\"classname\" \"func_door\"").count(), 3);
        assert_eq!(map.matches("\"classname\" \"trigger_multiple\"").count(), 6);
        assert!(map.contains("\"classname\" \"light\""));
        assert!(map.ends_with("}\n\n"));
    }

    #[test]
    fn test_single_cell() {
        let settings = TextLevelSettings::default();
        let map = translate("x\n", "", 1, not_handled, &settings);

        // four walls, a floor and a ceiling
        assert_eq!(map.matches("\n  {\n    ( ").count(), 6);
        assert_eq!(map.matches("\"classname\" \"light\"").count(), 1);
        assert!(map.contains("\"origin\" \"50 50 70\""));
    }

    #[test]
    fn test_light_follows_floor_model() {
        let mut settings = TextLevelSettings::default();
        settings.set_theme(ThemeKind::Go);
        settings.floor_object_frequency = 1.0;
        let map = translate("x\n", "", 9, not_handled, &settings);

        let model = map.find("\"classname\" \"misc_model\"").unwrap();
        let light = map.find("\"classname\" \"light\"").unwrap();
        assert!(model < light);
    }

    #[test]
    fn test_custom_entity() {
        let settings = TextLevelSettings::default();
        let map = translate(
            ENTITIES,
            "",
            123,
            |i, j, c, emitter: &mut MapSnippetEmitter| {
                if c == 'x' {
                    CallbackResult::Handled(vec![emitter.add_entity(
                        i,
                        j,
                        0.0,
                        "XyzzyEntity",
                        vec![("a", "1"), ("b", "2")],
                    )])
                } else {
                    CallbackResult::NotHandled
                }
            },
            &settings,
        );

        assert!(map.contains(
            "{\n  \"classname\" \"XyzzyEntity\"\n  \"a\" \"1\"\n  \"b\" \"2\"\n  \"origin\" \"650 350 30\"\n}"
        ));
    }

    #[test]
    fn test_skybox() {
        let mut settings = TextLevelSettings::default();
        settings.skybox_texture_name = "map/lab_games/sky/lg_sky_01".to_owned();
        let map = translate(ENTITIES, "", 123, not_handled, &settings);

        assert!(map.contains(
            "    ( -626 0 0 ) ( -626 32 0 ) ( -626 0 32 ) map/lab_games/sky/lg_sky_01_up 378 0 0 -0.375 0.03125 0 0 0\n"
        ));
        assert!(map.contains("{\n  \"classname\" \"_skybox\"\n  \"origin\" \"-434 -434 0\"\n}"));
        assert!(!map.contains("fake_sky"));
    }

    #[test]
    fn test_fence_door() {
        let settings = TextLevelSettings::default();
        let map = translate(
            ENTITIES,
            "",
            123,
            |i, j, c, emitter: &mut MapSnippetEmitter| match c {
                'H' | 'I' => CallbackResult::Handled(vec![emitter.add_fence_door(i, j, c)]),
                _ => CallbackResult::NotHandled,
            },
            &settings,
        );

        assert!(map.contains("\"angle\" \"90\"\n  \"targetname\" \"door_11_3\"\n"));
        assert!(map.contains("( 1146 0 0 ) ( 1146 32 0 ) ( 1146 0 32 ) door_placeholder:door_11_3"));
        assert!(map.contains("\"angle\" \"0\"\n  \"targetname\" \"door_9_2\"\n"));
        assert!(map.contains("( 901 0 0 ) ( 901 32 0 ) ( 901 0 32 ) door_placeholder:door_9_2"));
        assert!(!map.contains(DOOR_TEXTURE));
    }

    #[test]
    fn test_door_geometry() {
        let settings = TextLevelSettings::default();
        let map = translate(ENTITIES, "", 123, not_handled, &settings);

        // the horizontal door at column 9 spans x and is thin in y
        assert!(map.contains("( 901 0 0 ) ( 901 32 0 ) ( 901 0 32 ) map/fut_door_d"));
        assert!(map.contains("( 999 0 0 ) ( 999 0 32 ) ( 999 32 0 ) map/fut_door_d"));
        assert!(map.contains("( 0 249 0 ) ( 0 249 32 ) ( 32 249 0 ) map/fut_door_d"));
        assert!(map.contains("\"target\" \"door_9_2\"\n  \"wait\" \"1\"\n"));
    }

    #[test]
    fn test_variations_keep_geometry() {
        let settings = TextLevelSettings::default();
        let plain = translate(ENTITIES, "", 123, not_handled, &settings);
        let varied = translate(ENTITIES, VARIATIONS, 123, not_handled, &settings);

        for needle in &["\n  {\n", "\"classname\" \"light\"", "\"classname\" \"func_door\""] {
            assert_eq!(plain.matches(needle).count(), varied.matches(needle).count());
        }
        assert!(varied.contains("map/lab_games/lg_style_01_wall_green"));
    }

    #[test]
    fn test_same_seed_same_output() {
        let settings = TextLevelSettings::default();
        let first = translate(ENTITIES, VARIATIONS, 123, not_handled, &settings);
        let second = translate(ENTITIES, VARIATIONS, 123, not_handled, &settings);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_default_layout() {
        let mut settings = TextLevelSettings::default();
        settings.draw_default_layout = false;
        let map = translate(ENTITIES, "", 123, not_handled, &settings);

        assert!(map.starts_with(
            "{\n  \"classname\" \"worldspawn\"\n  \"light\" \"100\"\n  \"worldtype\" \"2\"\n}\n\n{"
        ));
        assert!(!map.contains("\"classname\" \"light\""));
        assert!(map.contains("\"classname\" \"info_player_start\""));
    }

    #[test]
    fn test_blank_snippets_suppress_default() {
        let settings = TextLevelSettings::default();
        let map = translate(
            ENTITIES,
            "",
            123,
            |_, _, c, _: &mut MapSnippetEmitter| match c {
                'P' => CallbackResult::Handled(vec!["  ".to_owned()]),
                _ => CallbackResult::NotHandled,
            },
            &settings,
        );

        assert!(!map.contains("info_player_start"));
        assert!(!map.contains("\n\n  \n\n"));
    }

    #[test]
    fn test_snippets_in_cell_order() {
        let settings = TextLevelSettings::default();
        let map = translate(
            "* xyzw *\n",
            "",
            7,
            |i, j, c, emitter: &mut MapSnippetEmitter| match c {
                'x' => CallbackResult::Handled(vec![
                    emitter.add_entity(i, j, 0.0, "xyzzy", vec![("goodattr", "1")]),
                ]),
                'y' => CallbackResult::Handled(vec![emitter.add_door(i, j, 'H')]),
                'z' => CallbackResult::Handled(vec![emitter.add_spawn(i, j, 0.0, Rad(0.0))]),
                'w' => CallbackResult::Handled(vec!["x".into(), "y".into(), "z".into()]),
                _ => CallbackResult::NotHandled,
            },
            &settings,
        );

        let xyzzy = map.find("\"classname\" \"xyzzy\"");
        let door = map.find("\"classname\" \"func_door\"");
        let spawn = map.find("\"classname\" \"info_player_start\"");
        assert!(xyzzy.is_some() && door.is_some() && spawn.is_some());
        assert!(xyzzy < door && door < spawn);
        assert!(map.ends_with("\n\nx\n\ny\n\nz\n\n"));
    }

    #[test]
    fn test_platforms_and_glass() {
        let mut settings = TextLevelSettings::default();
        settings.set_theme(ThemeKind::Null);
        let map = translate(
            "ab\n",
            "",
            7,
            |i, j, c, emitter: &mut MapSnippetEmitter| match c {
                'a' => CallbackResult::Handled(vec![
                    emitter.add_platform(i, j, 2),
                    emitter.add_spawn(i, j, 2.0, Rad(std::f64::consts::PI)),
                ]),
                'b' => CallbackResult::Handled(vec![emitter.add_glass_column(i, j, 5.0)]),
                _ => CallbackResult::NotHandled,
            },
            &settings,
        );

        assert!(map.contains("map/black_d"));
        assert!(map.contains("( 100 0 0 ) ( 100 32 0 ) ( 100 0 32 ) map/poltergeist"));
        assert!(map.contains("( 0 0 100 ) ( 0 32 100 ) ( 32 0 100 ) map/poltergeist"));
        assert!(map.contains("\"angle\" \"180\""));
        assert!(map.contains("\"origin\" \"50 50 70\""));
    }
}
