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

//! Converts maze geometry into a map document.
//!
//! Positions given to the exporter are in cells: one unit is one maze cell, and the exporter
//! scales everything by the configured cell size. Textures are chosen by the theme the first time
//! a texture group needs one and reused from then on.

use std::{collections::BTreeMap, fmt};

use crate::{
    common::{
        format::fmt_g,
        math::{angle_between, max_elementwise, min_elementwise, rotate_about, Angles},
        WORLD_TO_GAME_UNITS,
    },
    level::{
        settings::TextLevelSettings,
        theme::{Direction, FloorArtLocation, ThemeModel, ThemeTexture, WallArtLocation},
    },
    map::{
        brush::{create_box_brush, create_fitted_box_brush, create_grid_patch, Patch, Texture},
        builder::Builder,
        entity::Entity,
    },
};

use cgmath::{Deg, Vector2, Vector3, Zero};
use rand::{rngs::StdRng, seq::SliceRandom, Rng};

/// Texture scales are chosen so one texture spans this many game units.
pub const TEXEL_SIZE: f64 = 100.0;

/// Height of one platform step, in cells.
pub const HEIGHT_SCALE: f64 = 0.2;

/// Invisible texture used for glass columns.
pub const GLASS_TEXTURE: &str = "map/poltergeist";

/// Platform thickness, in steps.
const PLATFORM_THICKNESS: f64 = 2.0;

/// Thickness of the border along the top edge of a platform, in cells.
const BORDER_THICKNESS: f64 = 0.075;

const SKYBOX_TEXTURE_SIZE: Vector2<i32> = Vector2 { x: 1024, y: 1024 };

/// Converts a theme texture to a map texture scaled to span one cell.
pub fn map_texture(texture: &ThemeTexture) -> Texture {
    let mut out = Texture::with_scale(
        texture.name.clone(),
        Vector2::new(
            TEXEL_SIZE / texture.width as f64 * texture.scale,
            TEXEL_SIZE / texture.height as f64 * texture.scale,
        ),
    );
    out.rot_angle = texture.angle;
    out
}

fn direction_index(direction: Direction) -> usize {
    match direction {
        Direction::North => 0,
        Direction::East => 1,
        Direction::South => 2,
        Direction::West => 3,
    }
}

/// Classifies the side of a cell a wall is on from the direction pointing into the cell.
pub fn wall_direction(interior_direction: Vector3<f64>) -> Direction {
    if interior_direction.x > 0.0 {
        Direction::West
    } else if interior_direction.x < 0.0 {
        Direction::East
    } else if interior_direction.y < 0.0 {
        Direction::North
    } else {
        Direction::South
    }
}

#[derive(Clone, Copy, Debug)]
enum WallPiece {
    Decal(usize),
    Model(usize),
}

/// Builds level geometry, then decorates it in [`finalize`](TextLevelExporter::finalize).
///
/// Call `finalize` exactly once, after every wall and floor has been added and before the map
/// text is taken.
pub struct TextLevelExporter<'a> {
    settings: &'a TextLevelSettings,
    rng: &'a mut StdRng,
    builder: Builder,

    floor_textures: BTreeMap<i32, Texture>,
    ceiling_textures: BTreeMap<i32, Texture>,
    wall_textures: [BTreeMap<i32, Texture>; 4],
    riser_texture: Option<Texture>,
    tread_texture: Option<Texture>,
    glass_texture: Texture,

    wall_art_locations: Vec<WallArtLocation>,
    floor_art_locations: Vec<FloorArtLocation>,
    bounding_box_size: Vector3<f64>,
    finalized: bool,
}

impl<'a> TextLevelExporter<'a> {
    pub fn new(settings: &'a TextLevelSettings, rng: &'a mut StdRng) -> TextLevelExporter<'a> {
        let mut builder = Builder::new();
        let world = builder.world_entity_mut();
        world.set_attribute("light", "100");
        world.set_attribute("worldtype", "2");

        TextLevelExporter {
            settings,
            rng,
            builder,
            floor_textures: BTreeMap::new(),
            ceiling_textures: BTreeMap::new(),
            wall_textures: Default::default(),
            riser_texture: None,
            tread_texture: None,
            glass_texture: Texture::new(GLASS_TEXTURE),
            wall_art_locations: Vec::new(),
            floor_art_locations: Vec::new(),
            bounding_box_size: Vector3::zero(),
            finalized: false,
        }
    }

    pub fn settings(&self) -> &TextLevelSettings {
        self.settings
    }

    /// The random source shared by everything generated for this level.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut *self.rng
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    /// Sets the size of the level in cells. The height is scaled by `ceiling_scale`.
    pub fn set_bounding_box(&mut self, size: Vector3<f64>) {
        self.bounding_box_size = Vector3::new(size.x, size.y, size.z * self.settings.ceiling_scale);
    }

    pub fn floor_texture(&mut self, group: i32) -> Texture {
        let settings = self.settings;
        let rng = &mut *self.rng;
        self.floor_textures
            .entry(group)
            .or_insert_with(|| map_texture(&settings.theme().floor(group, rng)))
            .clone()
    }

    pub fn ceiling_texture(&mut self, group: i32) -> Texture {
        let settings = self.settings;
        let rng = &mut *self.rng;
        self.ceiling_textures
            .entry(group)
            .or_insert_with(|| map_texture(&settings.theme().ceiling(group, rng)))
            .clone()
    }

    pub fn wall_texture(&mut self, group: i32, direction: Direction) -> Texture {
        let settings = self.settings;
        let rng = &mut *self.rng;
        self.wall_textures[direction_index(direction)]
            .entry(group)
            .or_insert_with(|| map_texture(&settings.theme().wall(group, direction, rng)))
            .clone()
    }

    fn riser_texture(&mut self) -> Texture {
        let settings = self.settings;
        self.riser_texture
            .get_or_insert_with(|| map_texture(&settings.theme().platform_riser()))
            .clone()
    }

    fn tread_texture(&mut self) -> Texture {
        let settings = self.settings;
        self.tread_texture
            .get_or_insert_with(|| map_texture(&settings.theme().platform_tread()))
            .clone()
    }

    /// Adds a wall between corners `a` and `b`.
    ///
    /// The wall is thickened by one game unit into the cell it faces.
    pub fn add_wall(
        &mut self,
        a: Vector3<f64>,
        b: Vector3<f64>,
        interior_direction: Vector3<f64>,
        cell: Vector2<i32>,
        group: i32,
    ) {
        let direction = wall_direction(interior_direction);
        let texture = self.wall_texture(group, direction);
        let cell_size = self.settings.cell_size;

        let brush = create_box_brush(
            a * cell_size + min_elementwise(Vector3::zero(), interior_direction) / WORLD_TO_GAME_UNITS,
            b * cell_size + max_elementwise(Vector3::zero(), interior_direction) / WORLD_TO_GAME_UNITS,
            &texture,
        );
        self.builder.world_entity_mut().add_brush(brush);

        self.wall_art_locations.push(WallArtLocation {
            a,
            b,
            interior_direction,
            cell,
            group,
            direction,
        });
    }

    /// Adds a floor between `a` and `b`, and a ceiling above it unless the level has a skybox.
    pub fn add_floor(&mut self, a: Vector3<f64>, b: Vector3<f64>, cell: Vector2<i32>, group: i32) {
        // brushes need some thickness to be rendered
        let thickness = Vector3::new(0.0, 0.0, 1.0 / WORLD_TO_GAME_UNITS);
        let cell_size = self.settings.cell_size;

        let floor = self.floor_texture(group);
        let ceiling = self.ceiling_texture(group);

        self.builder.world_entity_mut().add_brush(create_box_brush(
            a * cell_size,
            b * cell_size + thickness,
            &floor,
        ));

        if self.settings.skybox_texture_name.is_empty() {
            let height = Vector3::new(0.0, 0.0, self.bounding_box_size.z);
            self.builder.world_entity_mut().add_brush(create_box_brush(
                (a + height) * cell_size - thickness,
                (b + height) * cell_size,
                &ceiling,
            ));
        }

        let settings = self.settings;
        let floor_models = settings.theme().floor_models();
        if !floor_models.is_empty() && self.rng.gen::<f64>() < settings.floor_object_frequency {
            let model = floor_models[self.rng.gen_range(0..floor_models.len())].clone();
            let angle = self.rng.gen_range(0..360);
            let entity = self.make_entity_with_real_offset(
                (a + b) / 2.0,
                Vector3::new(0.0, 0.0, 1.0),
                "misc_model",
                vec![
                    ("model", format!("models/{}", model.name)),
                    ("angle", angle.to_string()),
                    ("modelscale", fmt_g(model.scale)),
                ],
            );
            self.add(entity);
        }

        self.floor_art_locations.push(FloorArtLocation {
            location: (a + b) / 2.0,
            cell,
            group,
        });
    }

    /// Adds a raised platform `height` steps tall over the cell at `(x, y)`.
    pub fn add_platform(&mut self, x: f64, y: f64, height: i32) {
        let floor = self.floor_texture(height);
        let riser = self.riser_texture();
        let tread = self.tread_texture();

        let min_thickness = 1.0 / WORLD_TO_GAME_UNITS;
        let z = height as f64 * HEIGHT_SCALE - min_thickness;
        let cell_size = self.settings.cell_size;

        let layers = [
            (z - PLATFORM_THICKNESS * HEIGHT_SCALE, z - BORDER_THICKNESS, riser),
            (z - BORDER_THICKNESS, z, tread),
            (z, z + min_thickness, floor),
        ];

        let world = self.builder.world_entity_mut();
        for (bottom, top, texture) in layers.iter() {
            world.add_brush(create_box_brush(
                Vector3::new(x, y, *bottom) * cell_size,
                Vector3::new(x + 1.0, y + 1.0, *top) * cell_size,
                texture,
            ));
        }
    }

    /// Adds an invisible column `height` steps tall over the cell at `(x, y)`.
    pub fn add_glass_column(&mut self, x: f64, y: f64, height: f64) {
        let cell_size = self.settings.cell_size;
        let brush = create_box_brush(
            Vector3::new(x, y, 0.0) * cell_size,
            Vector3::new(x + 1.0, y + 1.0, height * HEIGHT_SCALE) * cell_size,
            &self.glass_texture,
        );
        self.builder.world_entity_mut().add_brush(brush);
    }

    pub fn add(&mut self, entity: Entity) {
        self.builder.add_entity(entity);
    }

    pub fn make_light(&self, position: Vector3<f64>, intensity: f64) -> Entity {
        self.make_entity(
            position,
            "light",
            vec![
                ("light", fmt_g(intensity * 5.0 * self.settings.light_intensity)),
                ("style", "0".to_owned()),
                ("spawnflags", "0".to_owned()),
            ],
        )
    }

    /// Creates a point entity at `position`, in cells.
    pub fn make_entity<S, I, K, V>(&self, position: Vector3<f64>, class_name: S, attributes: I) -> Entity
    where
        S: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entity = Entity::with_origin(class_name, position * self.settings.cell_size);
        entity.set_attributes(attributes);
        entity
    }

    /// Creates a point entity at `position`, in cells, moved by `offset` world units.
    pub fn make_entity_with_real_offset<S, I, K, V>(
        &self,
        position: Vector3<f64>,
        offset: Vector3<f64>,
        class_name: S,
        attributes: I,
    ) -> Entity
    where
        S: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entity =
            Entity::with_origin(class_name, position * self.settings.cell_size + offset);
        entity.set_attributes(attributes);
        entity
    }

    /// Texture for brush entities. An empty name selects the corridor floor.
    fn brush_entity_texture(&mut self, texture_name: &str, scale: Vector2<f64>) -> Texture {
        if texture_name.is_empty() {
            self.floor_texture(0)
        } else {
            Texture::with_scale(texture_name, scale * TEXEL_SIZE)
        }
    }

    /// Creates a brush entity with a single box between `min` and `max`, in cells.
    ///
    /// To fit the texture to the box, pass the box size divided by the texture size as
    /// `texture_scale`. Zero leaves the scale to the compiler.
    pub fn make_brush_entity<S, I, K, V>(
        &mut self,
        min: Vector3<f64>,
        max: Vector3<f64>,
        class_name: S,
        texture_name: &str,
        texture_scale: Vector2<f64>,
        attributes: I,
    ) -> Entity
    where
        S: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.make_brush_entity_blocks(&[(min, max)], class_name, texture_name, texture_scale, attributes)
    }

    /// Creates a brush entity made of several boxes, all sharing one texture.
    pub fn make_brush_entity_blocks<S, I, K, V>(
        &mut self,
        blocks: &[(Vector3<f64>, Vector3<f64>)],
        class_name: S,
        texture_name: &str,
        texture_scale: Vector2<f64>,
        attributes: I,
    ) -> Entity
    where
        S: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let texture = self.brush_entity_texture(texture_name, texture_scale);
        let cell_size = self.settings.cell_size;

        let mut entity = Entity::new(class_name);
        for (min, max) in blocks.iter() {
            entity.add_brush(create_box_brush(*min * cell_size, *max * cell_size, &texture));
        }
        entity.set_attributes(attributes);
        entity
    }

    /// Creates a brush entity whose faces each show the whole texture once.
    pub fn make_fitted_brush_entity<S, I, K, V>(
        &self,
        min: Vector3<f64>,
        max: Vector3<f64>,
        class_name: S,
        texture_name: &str,
        texture_size: Vector2<i32>,
        attributes: I,
    ) -> Entity
    where
        S: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let cell_size = self.settings.cell_size;
        let mut entity = Entity::new(class_name);
        entity.add_brush(create_fitted_box_brush(
            min * cell_size,
            max * cell_size,
            texture_name,
            texture_size,
        ));
        entity.set_attributes(attributes);
        entity
    }

    /// A 3x3 patch over the middle of a wall, `size` world units across its longer side.
    fn wall_decal(&self, texture: &ThemeTexture, size: f64, location: &WallArtLocation) -> Patch {
        let mut extent = Vector2::new(size, size);
        let (width, height) = (texture.width as f64, texture.height as f64);
        if width > height {
            extent.y *= height / width;
        } else if width < height {
            extent.x *= width / height;
        }

        let interior = location.interior_direction;
        let pos = (location.a + location.b) * (0.5 * self.settings.cell_size)
            + interior * (2.0 / WORLD_TO_GAME_UNITS);
        let up = rotate_about(Vector3::unit_z(), interior, Deg(texture.angle));

        create_grid_patch(
            pos,
            -interior,
            up,
            extent,
            Vector2::new(3, 3),
            &Texture::new(texture.name.clone()),
        )
    }

    fn wall_model(&self, model: &ThemeModel, location: &WallArtLocation) -> Entity {
        let interior = location.interior_direction;
        let center = (location.a + location.b) / 2.0;
        let angles = Angles {
            yaw: Deg::from(angle_between(interior, Vector3::unit_y())),
            ..Angles::zero()
        };

        Entity::model(
            format!("models/{}", model.name),
            center * self.settings.cell_size + interior,
            angles,
            Vector3::new(model.scale, model.scale, model.scale),
        )
    }

    /// Places the theme's own decorations.
    fn add_theme_decorations(&mut self) {
        let settings = self.settings;
        let theme = settings.theme();

        let floor_decorations =
            theme.floor_decorations(&self.floor_art_locations, &mut *self.rng);
        for decoration in floor_decorations.iter() {
            if decoration.model.name.is_empty() {
                continue;
            }

            let entity = self.make_entity_with_real_offset(
                decoration.location.location,
                Vector3::new(0.0, 0.0, 1.0),
                "misc_model",
                vec![
                    ("model", decoration.model.name.clone()),
                    ("angle", fmt_g(decoration.model.angle)),
                    ("modelscale", fmt_g(decoration.model.scale)),
                ],
            );
            self.add(entity);
        }

        let wall_decorations = theme.wall_decorations(&self.wall_art_locations, &mut *self.rng);
        for decoration in wall_decorations.iter() {
            if decoration.texture.name.is_empty() {
                continue;
            }

            let patch = self.wall_decal(
                &decoration.texture,
                decoration.texture.scale,
                &decoration.location,
            );
            self.builder.world_entity_mut().add_patch(patch);
        }
    }

    /// Hangs decals and wall models from the theme's pools on randomly chosen walls.
    fn add_wall_hangings(&mut self) {
        let settings = self.settings;
        let theme = settings.theme();
        let decals = theme.wall_decals();
        let models = theme.wall_models();

        let mut pieces: Vec<WallPiece> = (0..decals.len())
            .map(WallPiece::Decal)
            .chain((0..models.len()).map(WallPiece::Model))
            .collect();
        pieces.shuffle(&mut *self.rng);
        self.wall_art_locations.shuffle(&mut *self.rng);

        let locations = self.wall_art_locations.len();
        let mut requested =
            (locations as f64 * self.settings.wall_decal_frequency + 0.5) as usize;

        if requested > pieces.len() {
            warn!(
                "Not enough paintings to match requested density: {}({}) requested, {}({}) achieved.",
                self.settings.wall_decal_frequency,
                requested,
                pieces.len() as f64 / locations as f64,
                pieces.len()
            );
            requested = pieces.len();
        } else {
            info!("Requested wall hangings: {}", requested);
        }

        let cell_size = self.settings.cell_size;
        for i in 0..requested {
            let location = &self.wall_art_locations[i];
            match pieces[i] {
                WallPiece::Decal(d) => {
                    let texture = &decals[d];
                    let size = cell_size * (0.25 + self.rng.gen::<f64>() * 0.5) * texture.scale;
                    let patch = self.wall_decal(texture, size, location);
                    self.builder.world_entity_mut().add_patch(patch);
                }
                WallPiece::Model(m) => {
                    let entity = self.wall_model(&models[m], location);
                    self.builder.add_entity(entity);
                }
            }
        }
    }

    /// Adds decorations and, if configured, the skybox.
    pub fn finalize(&mut self) {
        if self.finalized {
            warn!("Level already finalized");
            return;
        }
        self.finalized = true;

        self.add_theme_decorations();
        self.add_wall_hangings();

        if !self.settings.skybox_texture_name.is_empty() {
            let cell_size = Vector3::new(
                self.settings.cell_size,
                self.settings.cell_size,
                self.settings.cell_size,
            );
            let world_size = self.bounding_box_size * self.settings.cell_size + cell_size;
            let pos = (world_size - cell_size) * 0.5;
            let texture_name = self.settings.skybox_texture_name.clone();
            self.builder
                .add_skybox(pos, world_size, &texture_name, SKYBOX_TEXTURE_SIZE);
        }
    }
}

impl<'a> fmt::Display for TextLevelExporter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.builder)
    }
}
