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

use std::{collections::BTreeMap, fmt};

use crate::{
    common::{
        format::{fmt_g, fmt_g3},
        math::Angles,
        WORLD_TO_GAME_UNITS,
    },
    map::brush::{Brush, Patch},
};

use cgmath::{Deg, Vector3};
use strum_macros::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Team {
    Red,
    Blue,
}

/// Formats a world-space position as a game-space `origin` value.
pub fn origin_string(pos: Vector3<f64>) -> String {
    let p = pos * WORLD_TO_GAME_UNITS;
    fmt_g3(p.x, p.y, p.z)
}

/// A `.map` entity: a class name, string attributes and optional geometry.
///
/// Attributes are kept sorted by key so that output is stable. Setting an attribute that
/// already exists replaces its value. The class name is fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    class_name: String,
    attributes: BTreeMap<String, String>,
    brushes: Vec<Brush>,
    patches: Vec<Patch>,
}

impl Entity {
    pub fn new<S>(class_name: S) -> Entity
    where
        S: Into<String>,
    {
        Entity {
            class_name: class_name.into(),
            attributes: BTreeMap::new(),
            brushes: Vec::new(),
            patches: Vec::new(),
        }
    }

    /// Creates an entity with an `origin` attribute at the world-space position `pos`.
    pub fn with_origin<S>(class_name: S, pos: Vector3<f64>) -> Entity
    where
        S: Into<String>,
    {
        let mut entity = Entity::new(class_name);
        entity.set_attribute("origin", origin_string(pos));
        entity
    }

    pub fn point_light(pos: Vector3<f64>, intensity: f64) -> Entity {
        let mut light = Entity::with_origin("light", pos);
        light.set_attribute("light", fmt_g(intensity));
        light.set_attribute("style", "0");
        light
    }

    pub fn spawn(pos: Vector3<f64>, angle: Deg<f64>) -> Entity {
        let mut spawn = Entity::with_origin("info_player_start", pos);
        spawn.set_attribute("angle", fmt_g(angle.0));
        spawn
    }

    /// Returns the player start and the respawn point for `team`.
    pub fn team_spawn(pos: Vector3<f64>, angle: Deg<f64>, team: Team) -> (Entity, Entity) {
        let angle = fmt_g(angle.0);

        let mut player = Entity::with_origin(format!("team_CTF_{}player", team), pos);
        player.set_attribute("angle", angle.clone());

        let mut spawn = Entity::with_origin(format!("team_CTF_{}spawn", team), pos);
        spawn.set_attribute("angle", angle);

        (player, spawn)
    }

    pub fn flag(pos: Vector3<f64>, team: Team) -> Entity {
        Entity::with_origin(format!("team_CTF_{}flag", team), pos)
    }

    /// Creates a `misc_model`. Zero rotation and unit scale are left to the engine defaults.
    pub fn model<S>(path: S, pos: Vector3<f64>, angles: Angles, scale: Vector3<f64>) -> Entity
    where
        S: Into<String>,
    {
        let mut model = Entity::with_origin("misc_model", pos);
        model.set_attribute("model", path);

        if !angles.is_zero() {
            model.set_attribute("angles", fmt_g3(angles.pitch.0, angles.yaw.0, angles.roll.0));
        }

        if scale != Vector3::new(1.0, 1.0, 1.0) {
            model.set_attribute("modelscale_vec", fmt_g3(scale.x, scale.y, scale.z));
        }

        model
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn set_attribute<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let key = key.into();
        if key == "classname" {
            warn!("Ignoring classname override on {}", self.class_name);
            return;
        }

        self.attributes.insert(key, value.into());
    }

    pub fn set_attributes<I, K, V>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in attributes {
            self.set_attribute(key, value);
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        if key == "classname" {
            return Some(&self.class_name);
        }

        self.attributes.get(key).map(|v| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn add_brush(&mut self, brush: Brush) {
        self.brushes.push(brush);
    }

    pub fn add_brushes<I>(&mut self, brushes: I)
    where
        I: IntoIterator<Item = Brush>,
    {
        self.brushes.extend(brushes);
    }

    pub fn add_patch(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    pub fn brushes(&self) -> &[Brush] {
        &self.brushes
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{{")?;
        writeln!(f, "  \"classname\" \"{}\"", self.class_name)?;
        for (key, value) in self.attributes.iter() {
            writeln!(f, "  \"{}\" \"{}\"", key, value)?;
        }
        for brush in self.brushes.iter() {
            writeln!(f, "  {}", brush)?;
        }
        for patch in self.patches.iter() {
            writeln!(f, "  {}", patch)?;
        }
        write!(f, "}}")
    }
}
