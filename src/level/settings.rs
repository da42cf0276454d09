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

use std::{fmt, str::FromStr};

use crate::{
    common::WORLD_TO_GAME_UNITS,
    level::theme::{Theme, ThemeKind},
};

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("No such setting: {0}")]
    NoSuchSetting(String),
    #[error("Could not parse setting: {name} = \"{value}\"")]
    ParseFailed { name: String, value: String },
    #[error("No such theme: {0}")]
    NoSuchTheme(String),
}

/// Options controlling how a text level becomes a map.
pub struct TextLevelSettings {
    /// Edge length of one maze cell, in world units.
    pub cell_size: f64,

    /// Ceiling height, in cells.
    pub ceiling_height: f64,

    /// Multiplier applied to the ceiling height.
    pub ceiling_scale: f64,

    /// Multiplier applied to every light's brightness.
    pub light_intensity: f64,

    /// Whether walls, floors and lights are generated from the layout.
    pub draw_default_layout: bool,

    /// Base name of the six skybox textures. Empty for a ceiling instead of a sky.
    pub skybox_texture_name: String,

    /// Fraction of walls that get a decal or a wall model.
    pub wall_decal_frequency: f64,

    /// Probability that a floor cell gets a model.
    pub floor_object_frequency: f64,

    theme: Box<dyn Theme>,

    /// `None` for a custom theme.
    theme_kind: Option<ThemeKind>,
}

impl TextLevelSettings {
    pub fn theme(&self) -> &dyn Theme {
        self.theme.as_ref()
    }

    pub fn theme_kind(&self) -> Option<ThemeKind> {
        self.theme_kind
    }

    pub fn set_theme(&mut self, kind: ThemeKind) {
        self.theme = kind.theme();
        self.theme_kind = Some(kind);
    }

    pub fn set_custom_theme(&mut self, theme: Box<dyn Theme>) {
        self.theme = theme;
        self.theme_kind = None;
    }

    /// Sets an option from its name and textual value, e.g. `("ceiling_scale", "1.5")`.
    pub fn set<S>(&mut self, name: S, value: S) -> Result<(), SettingsError>
    where
        S: AsRef<str>,
    {
        let name = name.as_ref();
        let value = value.as_ref().trim();

        match name {
            "cell_size" => self.cell_size = parse_value(name, value)?,
            "ceiling_height" => self.ceiling_height = parse_value(name, value)?,
            "ceiling_scale" => self.ceiling_scale = parse_value(name, value)?,
            "light_intensity" => self.light_intensity = parse_value(name, value)?,
            "draw_default_layout" => self.draw_default_layout = parse_value(name, value)?,
            "skybox_texture_name" => self.skybox_texture_name = value.to_owned(),
            "wall_decal_frequency" => self.wall_decal_frequency = parse_value(name, value)?,
            "floor_object_frequency" => self.floor_object_frequency = parse_value(name, value)?,
            "theme" => {
                let kind = ThemeKind::from_str(value)
                    .map_err(|_| SettingsError::NoSuchTheme(value.to_owned()))?;
                self.set_theme(kind);
            }
            _ => return Err(SettingsError::NoSuchSetting(name.to_owned())),
        }

        debug!("{} = {}", name, value);
        Ok(())
    }
}

fn parse_value<T>(name: &str, value: &str) -> Result<T, SettingsError>
where
    T: FromStr,
{
    value.parse().map_err(|_| SettingsError::ParseFailed {
        name: name.to_owned(),
        value: value.to_owned(),
    })
}

impl Default for TextLevelSettings {
    fn default() -> Self {
        TextLevelSettings {
            cell_size: 100.0 / WORLD_TO_GAME_UNITS,
            ceiling_height: 1.0,
            ceiling_scale: 1.0,
            light_intensity: 1.0,
            draw_default_layout: true,
            skybox_texture_name: String::new(),
            wall_decal_frequency: 0.1,
            floor_object_frequency: 0.05,
            theme: ThemeKind::Default.theme(),
            theme_kind: Some(ThemeKind::Default),
        }
    }
}

impl fmt::Debug for TextLevelSettings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TextLevelSettings")
            .field("cell_size", &self.cell_size)
            .field("ceiling_height", &self.ceiling_height)
            .field("ceiling_scale", &self.ceiling_scale)
            .field("light_intensity", &self.light_intensity)
            .field("draw_default_layout", &self.draw_default_layout)
            .field("skybox_texture_name", &self.skybox_texture_name)
            .field("wall_decal_frequency", &self.wall_decal_frequency)
            .field("floor_object_frequency", &self.floor_object_frequency)
            .field("theme", &self.theme_kind)
            .finish()
    }
}
