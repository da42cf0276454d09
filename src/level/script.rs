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

//! The boundary between level scripts and the translator.
//!
//! Scripts hand back loosely typed values. A per-cell callback may return nothing, a string or a
//! list of strings; anything else, or a failed call, is a bug in the script and aborts the
//! translation.

use std::{collections::BTreeMap, convert::TryFrom, fmt};

use crate::{
    common::format::fmt_g,
    level::{
        exporter::GLASS_TEXTURE,
        theme::{
            Direction, FloorArtLocation, FloorDecoration, Theme, ThemeModel, ThemeTexture,
            WallArtLocation, WallDecoration,
        },
        translate::{CallbackResult, MapSnippetEmitter},
    },
};

use cgmath::Vector2;
use rand::rngs::StdRng;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ScriptError {
    #[error("Script call failed: {0}")]
    CallFailed(String),
    #[error("Missing field '{0}'")]
    MissingField(String),
    #[error("Field '{name}' should be {expected}")]
    WrongType { name: String, expected: &'static str },
}

/// A value crossing the script boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptValue {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
    Array(Vec<ScriptValue>),
    Table(BTreeMap<String, ScriptValue>),
}

impl ScriptValue {
    /// Builds a table from key/value pairs.
    pub fn table<I, K>(entries: I) -> ScriptValue
    where
        I: IntoIterator<Item = (K, ScriptValue)>,
        K: Into<String>,
    {
        ScriptValue::Table(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn get(&self, key: &str) -> Option<&ScriptValue> {
        match self {
            ScriptValue::Table(table) => table.get(key),
            _ => None,
        }
    }

    /// The value as text, if it is a string or a number.
    pub fn as_text(&self) -> Option<String> {
        match self {
            ScriptValue::Str(s) => Some(s.clone()),
            ScriptValue::Number(n) => Some(fmt_g(*n)),
            _ => None,
        }
    }

    /// The value as a number. Numeric strings count.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ScriptValue::Number(n) => Some(*n),
            ScriptValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Nil => "nil",
            ScriptValue::Bool(_) => "boolean",
            ScriptValue::Number(_) => "number",
            ScriptValue::Str(_) => "string",
            ScriptValue::Array(_) => "array",
            ScriptValue::Table(_) => "table",
        }
    }
}

impl From<&str> for ScriptValue {
    fn from(s: &str) -> Self {
        ScriptValue::Str(s.to_owned())
    }
}

impl From<String> for ScriptValue {
    fn from(s: String) -> Self {
        ScriptValue::Str(s)
    }
}

impl From<f64> for ScriptValue {
    fn from(n: f64) -> Self {
        ScriptValue::Number(n)
    }
}

impl From<bool> for ScriptValue {
    fn from(b: bool) -> Self {
        ScriptValue::Bool(b)
    }
}

impl<T> From<Vec<T>> for ScriptValue
where
    T: Into<ScriptValue>,
{
    fn from(v: Vec<T>) -> Self {
        ScriptValue::Array(v.into_iter().map(Into::into).collect())
    }
}

/// Interprets what a script callback returned for a cell.
///
/// # Panics
///
/// Panics if the call failed or returned anything other than nil, a string or an array of
/// strings.
pub fn callback_result(result: Result<ScriptValue, ScriptError>) -> CallbackResult {
    let value = match result {
        Ok(v) => v,
        Err(e) => panic!("Entity callback failed: {}", e),
    };

    match value {
        ScriptValue::Nil => CallbackResult::NotHandled,
        ScriptValue::Str(s) => CallbackResult::Handled(vec![s]),
        ScriptValue::Array(items) => CallbackResult::Handled(
            items
                .into_iter()
                .map(|item| match item {
                    ScriptValue::Str(s) => s,
                    other => panic!(
                        "Entity callback returned an array containing a {}",
                        other.type_name()
                    ),
                })
                .collect(),
        ),
        other => panic!(
            "Entity callback must return nil, a string or an array of strings, not a {}",
            other.type_name()
        ),
    }
}

/// Wraps a script callback as a translation callback, enforcing the return contract of
/// [`callback_result`].
pub fn script_callback<F>(
    mut f: F,
) -> impl FnMut(usize, usize, char, &mut MapSnippetEmitter) -> CallbackResult
where
    F: FnMut(usize, usize, char, &mut MapSnippetEmitter) -> Result<ScriptValue, ScriptError>,
{
    move |row: usize, col: usize, value: char, emitter: &mut MapSnippetEmitter| {
        callback_result(f(row, col, value, emitter))
    }
}

/// Converts a table of script attributes to entity attributes.
///
/// Only strings and numbers can be written to a map; other values are logged and dropped.
pub fn entity_attributes(attributes: &ScriptValue) -> Vec<(String, String)> {
    let table = match attributes {
        ScriptValue::Table(table) => table,
        ScriptValue::Nil => return Vec::new(),
        other => {
            warn!("Entity attributes must be a table, not a {}", other.type_name());
            return Vec::new();
        }
    };

    table
        .iter()
        .filter_map(|(key, value)| match value.as_text() {
            Some(text) => Some((key.clone(), text)),
            None => {
                warn!(
                    "Dropping attribute '{}': {} is not a string or a number",
                    key,
                    value.type_name()
                );
                None
            }
        })
        .collect()
}

/// Reads a texture of the form `{ tex = name, width = 1024, height = 1024, scale = 1, angle = 0 }`.
///
/// Every field is optional. A missing name selects the invisible texture, a missing size is taken
/// to be 1024x1024, and scale and angle default to 1 and 0.
pub fn read_texture(value: &ScriptValue) -> Result<ThemeTexture, ScriptError> {
    let name = match value.get("tex") {
        Some(ScriptValue::Str(s)) => s.clone(),
        None | Some(ScriptValue::Nil) => GLASS_TEXTURE.to_owned(),
        Some(_) => return Err(wrong_type("tex", "a string")),
    };

    let width = read_size(value, "width")?;
    let height = read_size(value, "height")?;

    let mut texture = ThemeTexture::new(name, width, height);
    texture.scale = read_number(value, "scale")?.unwrap_or(1.0);
    texture.angle = read_number(value, "angle")?.unwrap_or(0.0);
    Ok(texture)
}

fn read_number(value: &ScriptValue, field: &str) -> Result<Option<f64>, ScriptError> {
    match value.get(field) {
        None | Some(ScriptValue::Nil) => Ok(None),
        Some(v) => v
            .as_number()
            .map(Some)
            .ok_or_else(|| wrong_type(field, "a number")),
    }
}

// whole texels only; a zero size would make the texture scale infinite
fn read_size(value: &ScriptValue, field: &str) -> Result<u32, ScriptError> {
    match read_number(value, field)? {
        None => Ok(DEFAULT_TEXTURE_SIZE),
        Some(n) if n >= 1.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(n as u32),
        Some(_) => Err(wrong_type(field, "a positive whole number")),
    }
}

fn wrong_type(name: &str, expected: &'static str) -> ScriptError {
    ScriptError::WrongType {
        name: name.to_owned(),
        expected,
    }
}

const DEFAULT_TEXTURE_SIZE: u32 = 1024;

/// Stands in for surfaces a theme leaves out entirely.
const MISSING_SURFACE_SIZE: u32 = 64;

const SURFACES: [&str; 8] = [
    "floor", "ceiling", "wallN", "wallE", "wallS", "wallW", "riser", "tread",
];

/// Places decorations given the candidate locations, like a script's `placeWallDecals` or
/// `placeFloorModels`.
pub type Placement = Box<dyn Fn(&ScriptValue) -> Result<ScriptValue, ScriptError>>;

/// A theme read from a table of texture sets keyed by variation letter.
///
/// The `default` set covers the whole level, and sets for a variation fall back to it surface by
/// surface. The surfaces are `floor`, `ceiling`, `wallN`, `wallE`, `wallS`, `wallW`, `riser` and
/// `tread`; one missing from `default` too is drawn with a small invisible texture.
///
/// Wall decals and floor models are placed by optional [`Placement`] functions. Each receives an
/// array of `{ index, i, j, variation, direction }` location tables (walls only carry
/// `direction`, one of `N`, `E`, `S` or `W`) and returns an array of `{ index = n, decal = {...} }`
/// or `{ index = n, model = { mod, scale, angle } }` entries, where `n` is a one-based index into
/// the locations.
pub struct TableTheme {
    default: BTreeMap<&'static str, ThemeTexture>,
    variations: BTreeMap<i32, BTreeMap<&'static str, ThemeTexture>>,
    place_wall_decals: Option<Placement>,
    place_floor_models: Option<Placement>,
}

impl TableTheme {
    pub fn from_value(value: &ScriptValue) -> Result<TableTheme, ScriptError> {
        let table = match value {
            ScriptValue::Table(t) => t,
            _ => return Err(wrong_type("theme", "a table")),
        };

        let default = match table.get("default") {
            Some(set) => read_surfaces(set)?,
            None => return Err(ScriptError::MissingField("default".to_owned())),
        };

        let mut variations = BTreeMap::new();
        for (key, set) in table.iter() {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c @ 'A'..='Z'), None) => {
                    variations.insert(c as i32, read_surfaces(set)?);
                }
                _ if key == "default" => (),
                _ => warn!("Ignoring theme entry '{}'", key),
            }
        }

        Ok(TableTheme {
            default,
            variations,
            place_wall_decals: None,
            place_floor_models: None,
        })
    }

    pub fn with_wall_decals<F>(mut self, place: F) -> TableTheme
    where
        F: Fn(&ScriptValue) -> Result<ScriptValue, ScriptError> + 'static,
    {
        self.place_wall_decals = Some(Box::new(place));
        self
    }

    pub fn with_floor_models<F>(mut self, place: F) -> TableTheme
    where
        F: Fn(&ScriptValue) -> Result<ScriptValue, ScriptError> + 'static,
    {
        self.place_floor_models = Some(Box::new(place));
        self
    }

    fn texture(&self, group: i32, surface: &'static str) -> ThemeTexture {
        self.variations
            .get(&group)
            .and_then(|set| set.get(surface))
            .or_else(|| self.default.get(surface))
            .cloned()
            .unwrap_or_else(|| {
                ThemeTexture::new(GLASS_TEXTURE, MISSING_SURFACE_SIZE, MISSING_SURFACE_SIZE)
            })
    }
}

impl fmt::Debug for TableTheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TableTheme")
            .field("default", &self.default)
            .field("variations", &self.variations)
            .field("place_wall_decals", &self.place_wall_decals.is_some())
            .field("place_floor_models", &self.place_floor_models.is_some())
            .finish()
    }
}

fn read_surfaces(value: &ScriptValue) -> Result<BTreeMap<&'static str, ThemeTexture>, ScriptError> {
    let mut surfaces = BTreeMap::new();
    for surface in SURFACES.iter() {
        if let Some(texture) = value.get(surface) {
            surfaces.insert(*surface, read_texture(texture)?);
        }
    }
    Ok(surfaces)
}

fn read_model(value: &ScriptValue) -> Result<ThemeModel, ScriptError> {
    let name = match value.get("mod") {
        Some(ScriptValue::Str(s)) => s.clone(),
        None | Some(ScriptValue::Nil) => String::new(),
        Some(_) => return Err(wrong_type("mod", "a string")),
    };

    let mut model = ThemeModel::new(name, read_number(value, "scale")?.unwrap_or(1.0));
    model.angle = read_number(value, "angle")?.unwrap_or(0.0);
    Ok(model)
}

fn location_table(
    index: usize,
    cell: Vector2<i32>,
    group: i32,
) -> Vec<(&'static str, ScriptValue)> {
    let mut entries = vec![
        ("index", ScriptValue::from((index + 1) as f64)),
        ("i", ScriptValue::from(cell.x as f64)),
        ("j", ScriptValue::from(cell.y as f64)),
    ];
    if let Some(c) = u8::try_from(group).ok().map(char::from).filter(char::is_ascii_uppercase) {
        entries.push(("variation", ScriptValue::from(c.to_string())));
    }
    entries
}

/// Runs a placement function and returns each placed location with its `field` table.
///
/// # Panics
///
/// Panics if the call failed, or if it returned something other than nil or an array of tables
/// each holding an in-range `index` and a `field` table.
fn placements(
    place: &Placement,
    locations: ScriptValue,
    count: usize,
    context: &str,
    field: &str,
) -> Vec<(usize, ScriptValue)> {
    let entries = match place(&locations) {
        Ok(ScriptValue::Nil) => return Vec::new(),
        Ok(ScriptValue::Array(entries)) => entries,
        Ok(other) => panic!(
            "{}: must return an array of tables, not a {}",
            context,
            other.type_name()
        ),
        Err(e) => panic!("{}: {}", context, e),
    };

    entries
        .into_iter()
        .map(|entry| {
            let index = match entry.get("index").and_then(ScriptValue::as_number) {
                Some(n) if n >= 1.0 && n.fract() == 0.0 && n <= count as f64 => n as usize - 1,
                Some(n) => panic!("{}: index {} is out of bounds", context, fmt_g(n)),
                None => panic!("{}: missing number 'index'", context),
            };
            match entry.get(field) {
                Some(table @ ScriptValue::Table(_)) => (index, table.clone()),
                _ => panic!("{}: missing table '{}'", context, field),
            }
        })
        .collect()
}

impl Theme for TableTheme {
    fn floor(&self, group: i32, _rng: &mut StdRng) -> ThemeTexture {
        self.texture(group, "floor")
    }

    fn ceiling(&self, group: i32, _rng: &mut StdRng) -> ThemeTexture {
        self.texture(group, "ceiling")
    }

    fn wall(&self, group: i32, direction: Direction, _rng: &mut StdRng) -> ThemeTexture {
        let surface = match direction {
            Direction::North => "wallN",
            Direction::East => "wallE",
            Direction::South => "wallS",
            Direction::West => "wallW",
        };
        self.texture(group, surface)
    }

    fn platform_riser(&self) -> ThemeTexture {
        self.texture(0, "riser")
    }

    fn platform_tread(&self) -> ThemeTexture {
        self.texture(0, "tread")
    }

    fn wall_decorations(
        &self,
        locations: &[WallArtLocation],
        _rng: &mut StdRng,
    ) -> Vec<WallDecoration> {
        let place = match self.place_wall_decals {
            Some(ref place) => place,
            None => return Vec::new(),
        };

        let tables = locations
            .iter()
            .enumerate()
            .map(|(index, location)| {
                let mut entries = location_table(index, location.cell, location.group);
                let direction = match location.direction {
                    Direction::North => "N",
                    Direction::East => "E",
                    Direction::South => "S",
                    Direction::West => "W",
                };
                entries.push(("direction", ScriptValue::from(direction)));
                ScriptValue::table(entries)
            })
            .collect();

        let context = "Wall decal placement";
        placements(place, ScriptValue::Array(tables), locations.len(), context, "decal")
            .into_iter()
            .map(|(index, decal)| match read_texture(&decal) {
                Ok(texture) => WallDecoration {
                    texture,
                    location: locations[index].clone(),
                },
                Err(e) => panic!("{}: {}", context, e),
            })
            .collect()
    }

    fn floor_decorations(
        &self,
        locations: &[FloorArtLocation],
        _rng: &mut StdRng,
    ) -> Vec<FloorDecoration> {
        let place = match self.place_floor_models {
            Some(ref place) => place,
            None => return Vec::new(),
        };

        let tables = locations
            .iter()
            .enumerate()
            .map(|(index, location)| {
                ScriptValue::table(location_table(index, location.cell, location.group))
            })
            .collect();

        let context = "Floor model placement";
        placements(place, ScriptValue::Array(tables), locations.len(), context, "model")
            .into_iter()
            .map(|(index, model)| match read_model(&model) {
                Ok(model) => FloorDecoration {
                    model,
                    location: locations[index].clone(),
                },
                Err(e) => panic!("{}: {}", context, e),
            })
            .collect()
    }
}
