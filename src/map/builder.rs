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

use std::fmt;

use crate::map::{
    brush::{create_hollow_box, create_skybox, Texture},
    entity::Entity,
};

use cgmath::{Vector2, Vector3};

/// Edge length of the skybox room, in world units.
const SKYBOX_SIZE: f64 = 12.0;
const SKYBOX_THICKNESS: f64 = 1.0;

/// Shader applied to the shell around a level with a skybox. Surfaces using it show the view from
/// the `_skybox` entity.
pub const SKY_PORTAL_TEXTURE: &str = "map/sky_portal";

/// A `.map` document. The world entity is always first.
#[derive(Clone, Debug)]
pub struct Builder {
    entities: Vec<Entity>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            entities: vec![Entity::new("worldspawn")],
        }
    }

    pub fn world_entity(&self) -> &Entity {
        &self.entities[0]
    }

    pub fn world_entity_mut(&mut self) -> &mut Entity {
        &mut self.entities[0]
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Adds a skybox for a level of `world_size` centered on `center`.
    ///
    /// The skybox room is placed outside the level, past its minimum x and y corner, and marked
    /// with a `_skybox` entity. The level itself is sealed in a sky portal shell.
    pub fn add_skybox(
        &mut self,
        center: Vector3<f64>,
        world_size: Vector3<f64>,
        texture_name: &str,
        texture_size: Vector2<i32>,
    ) {
        let world_min = center - world_size * 0.5;
        let world_max = center + world_size * 0.5;
        let skybox_pos = Vector3::new(world_min.x - SKYBOX_SIZE, world_min.y - SKYBOX_SIZE, 0.0);

        let world = self.world_entity_mut();
        world.add_brushes(create_skybox(
            skybox_pos,
            Vector3::new(SKYBOX_SIZE, SKYBOX_SIZE, SKYBOX_SIZE),
            SKYBOX_THICKNESS,
            texture_name,
            texture_size,
        ));
        world.add_brushes(create_hollow_box(
            world_min,
            world_max,
            SKYBOX_THICKNESS,
            &Texture::new(SKY_PORTAL_TEXTURE),
        ));

        self.add_entity(Entity::with_origin("_skybox", skybox_pos));
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for entity in self.entities.iter() {
            writeln!(f, "{}", entity)?;
        }

        Ok(())
    }
}
