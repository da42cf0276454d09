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

//! Brush and patch geometry.
//!
//! All positions are stored in world units and only converted to game units (see
//! [`WORLD_TO_GAME_UNITS`](crate::common::WORLD_TO_GAME_UNITS)) when serialized.

use std::fmt;

use crate::common::{
    format::fmt_g,
    math::{fract_floor, max_elementwise, min_elementwise},
    parse::plane_record,
    WORLD_TO_GAME_UNITS,
};

use cgmath::{InnerSpace, Vector2, Vector3};

bitflags! {
    /// Surface flags consumed by the BSP compiler.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TextureFlags: u32 {
        /// Excludes the brush from the PVS tree. See q3map2's brush.c.
        const DETAIL = 0x8000000;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    /// Path relative to the game's texture root.
    pub path: String,

    /// Offset in texels. Should be a multiple of 16.
    pub offset: Vector2<i32>,

    /// Rotation in degrees.
    pub rot_angle: f64,

    /// Negative values flip the texture.
    pub scale: Vector2<f64>,

    pub flags: TextureFlags,
}

impl Texture {
    pub fn new<S>(path: S) -> Texture
    where
        S: Into<String>,
    {
        Texture {
            path: path.into(),
            offset: Vector2::new(0, 0),
            rot_angle: 0.0,
            scale: Vector2::new(0.0, 0.0),
            flags: TextureFlags::empty(),
        }
    }

    pub fn with_scale<S>(path: S, scale: Vector2<f64>) -> Texture
    where
        S: Into<String>,
    {
        Texture {
            scale,
            ..Texture::new(path)
        }
    }
}

impl Default for Texture {
    fn default() -> Self {
        Texture::new("")
    }
}

impl fmt::Display for Texture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let path: String = self.path.chars().take(256).collect();
        write!(
            f,
            "{} {} {} {} {} {} {} 0 0",
            path,
            self.offset.x,
            self.offset.y,
            fmt_g(self.rot_angle),
            fmt_g(self.scale.x),
            fmt_g(self.scale.y),
            self.flags.bits() as i32,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    pub a: Vector3<f64>,
    pub b: Vector3<f64>,
    pub c: Vector3<f64>,
    pub texture: Texture,
}

impl Plane {
    pub fn new(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>, texture: Texture) -> Plane {
        Plane { a, b, c, texture }
    }
}

fn fmt_game_point(p: Vector3<f64>) -> String {
    format!(
        "( {} {} {} )",
        fmt_g(p.x * WORLD_TO_GAME_UNITS),
        fmt_g(p.y * WORLD_TO_GAME_UNITS),
        fmt_g(p.z * WORLD_TO_GAME_UNITS)
    )
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            fmt_game_point(self.a),
            fmt_game_point(self.b),
            fmt_game_point(self.c),
            self.texture
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Brush {
    pub planes: Vec<Plane>,
}

impl fmt::Display for Brush {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{{")?;
        for plane in self.planes.iter() {
            writeln!(f, "    {}", plane)?;
        }
        write!(f, "  }}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatchPoint {
    pub pos: Vector3<f64>,
    pub uv: Vector2<f64>,
}

impl PatchPoint {
    pub fn zero() -> PatchPoint {
        PatchPoint {
            pos: Vector3::new(0.0, 0.0, 0.0),
            uv: Vector2::new(0.0, 0.0),
        }
    }
}

impl fmt::Display for PatchPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "( {} {} {} {} {} )",
            fmt_g(self.pos.x * WORLD_TO_GAME_UNITS),
            fmt_g(self.pos.y * WORLD_TO_GAME_UNITS),
            fmt_g(self.pos.z * WORLD_TO_GAME_UNITS),
            fmt_g(self.uv.x),
            fmt_g(self.uv.y)
        )
    }
}

/// A `patchDef2` control lattice.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    grid_size: Vector2<usize>,
    points: Vec<PatchPoint>,
    texture: Texture,
}

impl Patch {
    pub fn new(grid_size: Vector2<usize>, texture: Texture) -> Patch {
        Patch {
            grid_size,
            points: vec![PatchPoint::zero(); grid_size.x * grid_size.y],
            texture,
        }
    }

    pub fn grid_size(&self) -> Vector2<usize> {
        self.grid_size
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn set_point(&mut self, grid_pos: Vector2<usize>, point: PatchPoint) {
        let index = self.index(grid_pos);
        self.points[index] = point;
    }

    pub fn point(&self, grid_pos: Vector2<usize>) -> PatchPoint {
        self.points[self.index(grid_pos)]
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    fn index(&self, grid_pos: Vector2<usize>) -> usize {
        grid_pos.y * self.grid_size.x + grid_pos.x
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{{\n    patchDef2\n    {{\n      {}\n      ( {} {} 0 0 0 )\n",
            self.texture.path, self.grid_size.x, self.grid_size.y
        )?;
        writeln!(f, "      (")?;
        for x in 0..self.grid_size.x {
            write!(f, "        (")?;
            for y in 0..self.grid_size.y {
                write!(f, " {}", self.point(Vector2::new(x, y)))?;
            }
            writeln!(f, " )")?;
        }
        write!(f, "      )\n    }}\n  }}")
    }
}

fn parse_single_brush(src: &str) -> Brush {
    let mut planes = Vec::new();

    for line in src.split('\n') {
        let record = match plane_record(line.trim_start()) {
            Ok((_, r)) => r,
            Err(_) => continue,
        };

        let [a, b, c] = record.points;
        planes.push(Plane {
            a: a / WORLD_TO_GAME_UNITS,
            b: b / WORLD_TO_GAME_UNITS,
            c: c / WORLD_TO_GAME_UNITS,
            texture: Texture {
                path: record.texture.to_owned(),
                offset: Vector2::new(record.offset[0], record.offset[1]),
                rot_angle: record.rotation,
                scale: Vector2::new(record.scale[0], record.scale[1]),
                flags: TextureFlags::from_bits_retain(record.flags as u32),
            },
        });
    }

    Brush { planes }
}

/// Parses every brush block found in `src`.
///
/// Each `}` closes the block opened by the most recent `{`; stray closing braces are ignored.
/// Lines that are not plane records are skipped, and blocks without a single plane are
/// dropped.
pub fn parse_brushes<S>(src: S) -> Vec<Brush>
where
    S: AsRef<str>,
{
    let src = src.as_ref();
    let mut brushes = Vec::new();
    let mut brush_start = None;

    for (i, c) in src.char_indices() {
        match c {
            '{' => brush_start = Some(i),
            '}' => {
                if let Some(start) = brush_start.take() {
                    let brush = parse_single_brush(&src[start..=i]);
                    if !brush.planes.is_empty() {
                        brushes.push(brush);
                    }
                }
            }
            _ => (),
        }
    }

    brushes
}

pub fn create_box_brush(a: Vector3<f64>, b: Vector3<f64>, texture: &Texture) -> Brush {
    let min = min_elementwise(a, b);
    let max = max_elementwise(a, b);
    let v = Vector3::new;

    let planes = vec![
        Plane::new(v(min.x, 0.0, 0.0), v(min.x, 1.0, 0.0), v(min.x, 0.0, 1.0), texture.clone()),
        Plane::new(v(max.x, 0.0, 0.0), v(max.x, 0.0, 1.0), v(max.x, 1.0, 0.0), texture.clone()),
        Plane::new(v(0.0, min.y, 0.0), v(0.0, min.y, 1.0), v(1.0, min.y, 0.0), texture.clone()),
        Plane::new(v(0.0, max.y, 0.0), v(1.0, max.y, 0.0), v(0.0, max.y, 1.0), texture.clone()),
        Plane::new(v(0.0, 0.0, min.z), v(1.0, 0.0, min.z), v(0.0, 1.0, min.z), texture.clone()),
        Plane::new(v(0.0, 0.0, max.z), v(0.0, 1.0, max.z), v(1.0, 0.0, max.z), texture.clone()),
    ];

    Brush { planes }
}

/// Creates a box whose faces each show the whole texture exactly once.
pub fn create_fitted_box_brush(
    a: Vector3<f64>,
    b: Vector3<f64>,
    texture_name: &str,
    texture_size: Vector2<i32>,
) -> Brush {
    let min = min_elementwise(a, b);
    let max = max_elementwise(a, b);
    let size = max - min;
    let tex = Vector2::new(texture_size.x as f64, texture_size.y as f64);
    let scale = Vector2::new(WORLD_TO_GAME_UNITS / tex.x, WORLD_TO_GAME_UNITS / tex.y);

    let offset = |u: f64, v: f64| {
        Vector2::new(
            (fract_floor(u) * tex.x) as i32,
            (fract_floor(v) * tex.y) as i32,
        )
    };
    let offset_xy = offset(min.x / size.x, min.y / size.y);
    let offset_xz = offset(min.x / size.x, min.z / size.z);
    let offset_yz = offset(min.y / size.y, min.z / size.z);

    let face = |offset, scale| Texture {
        offset,
        scale,
        ..Texture::new(texture_name)
    };
    let x_face = face(offset_yz, Vector2::new(-scale.x * size.y, scale.y * size.z));
    let y_face = face(offset_xz, Vector2::new(-scale.x * size.x, scale.y * size.z));
    let z_face = face(offset_xy, Vector2::new(-scale.x * size.x, scale.y * size.y));

    let v = Vector3::new;
    let planes = vec![
        Plane::new(v(min.x, 0.0, 0.0), v(min.x, 1.0, 0.0), v(min.x, 0.0, 1.0), x_face.clone()),
        Plane::new(v(max.x, 0.0, 0.0), v(max.x, 0.0, 1.0), v(max.x, 1.0, 0.0), x_face),
        Plane::new(v(0.0, min.y, 0.0), v(0.0, min.y, 1.0), v(1.0, min.y, 0.0), y_face.clone()),
        Plane::new(v(0.0, max.y, 0.0), v(1.0, max.y, 0.0), v(0.0, max.y, 1.0), y_face),
        Plane::new(v(0.0, 0.0, min.z), v(1.0, 0.0, min.z), v(0.0, 1.0, min.z), z_face.clone()),
        Plane::new(v(0.0, 0.0, max.z), v(0.0, 1.0, max.z), v(1.0, 0.0, max.z), z_face),
    ];

    Brush { planes }
}

/// Creates six overlapping boxes enclosing the space between `a` and `b`.
pub fn create_hollow_box(
    a: Vector3<f64>,
    b: Vector3<f64>,
    thickness: f64,
    texture: &Texture,
) -> Vec<Brush> {
    let t = Vector3::new(thickness, thickness, thickness);
    let min = min_elementwise(a, b);
    let max = max_elementwise(a, b);
    let v = Vector3::new;

    vec![
        // top
        create_box_brush(v(min.x - t.x, min.y - t.y, max.z), max + t, texture),
        // bottom
        create_box_brush(min - t, v(max.x + t.x, max.y + t.y, min.z), texture),
        // left
        create_box_brush(min - t, v(min.x, max.y + t.y, max.z + t.z), texture),
        // right
        create_box_brush(v(max.x, min.y - t.y, min.z - t.z), max + t, texture),
        // front
        create_box_brush(v(min.x - t.x, max.y, min.z - t.z), max + t, texture),
        // back
        create_box_brush(min - t, v(max.x + t.x, min.y, max.z + t.z), texture),
    ]
}

/// Creates the six faces of a skybox room, suffixing `texture_name` with `_up`, `_dn`, `_lf`,
/// `_rt`, `_ft` and `_bk`.
pub fn create_skybox(
    position: Vector3<f64>,
    size: Vector3<f64>,
    thickness: f64,
    texture_name: &str,
    texture_size: Vector2<i32>,
) -> Vec<Brush> {
    let half_size = size * 0.5;
    let min = position - half_size;
    let max = position + half_size;
    let v = Vector3::new;
    let face = |a, b, suffix: &str| {
        create_fitted_box_brush(a, b, &format!("{}_{}", texture_name, suffix), texture_size)
    };

    vec![
        face(max, v(min.x, min.y, max.z + thickness), "up"),
        face(min, v(max.x, max.y, min.z - thickness), "dn"),
        face(min, v(min.x - thickness, max.y, max.z), "lf"),
        face(max, v(max.x + thickness, min.y, min.z), "rt"),
        face(min, v(max.x, min.y - thickness, max.z), "ft"),
        face(max, v(min.x, max.y + thickness, min.z), "bk"),
    ]
}

/// Creates a flat patch centered on `center`, facing along `normal`.
///
/// The first lattice column lies on the left edge and the first row on the bottom edge; `v`
/// runs from 1 at the bottom to 0 at the top.
///
/// # Panics
///
/// Panics if the lattice has fewer than two points along either axis.
pub fn create_grid_patch(
    center: Vector3<f64>,
    normal: Vector3<f64>,
    up: Vector3<f64>,
    size: Vector2<f64>,
    grid_size: Vector2<usize>,
    texture: &Texture,
) -> Patch {
    assert!(
        grid_size.x >= 2 && grid_size.y >= 2,
        "Patch lattice must be at least 2x2, not {}x{}",
        grid_size.x,
        grid_size.y
    );

    let normal = normal.normalize();
    let up = up.normalize();
    let right = normal.cross(up).normalize();

    let start = center - right * size.x * 0.5 - up * size.y * 0.5;
    let cols = (grid_size.x - 1) as f64;
    let rows = (grid_size.y - 1) as f64;
    let step = Vector2::new(size.x / cols, size.y / rows);

    let mut patch = Patch::new(grid_size, texture.clone());
    for x in 0..grid_size.x {
        for y in 0..grid_size.y {
            let pos = start + right * step.x * x as f64 + up * step.y * y as f64;
            let uv = Vector2::new(x as f64 / cols, 1.0 - y as f64 / rows);
            patch.set_point(Vector2::new(x, y), PatchPoint { pos, uv });
        }
    }

    patch
}

#[cfg(test)]
mod tests {
    use super::*;

    static BRUSH: &str = "{
    ( 0 0 0 ) ( 0 32 0 ) ( 0 0 32 ) test_texture 0 0 0 0 0 0 0 0
    ( 64 0 0 ) ( 64 0 32 ) ( 64 32 0 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 32 0 ) ( 0 32 32 ) ( 32 32 0 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 64 0 ) ( 32 64 0 ) ( 0 64 32 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 0 160 ) ( 32 0 160 ) ( 0 32 160 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 0 64 ) ( 0 32 64 ) ( 32 0 64 ) test_texture 0 0 0 0 0 0 0 0
  }";

    static NESTED_BRUSHES: &str = "
{
  {
    ( 0 0 0 ) ( 0 32 0 ) ( 0 0 32 ) test_texture 0 0 0 0 0 0 0 0
    ( 64 0 0 ) ( 64 0 32 ) ( 64 32 0 ) test_texture 0 0 0 0 0 0 0 0
  }
}";

    #[test]
    fn test_box_brush() {
        let brush = create_box_brush(
            Vector3::new(5.0, 5.0, 5.0),
            Vector3::new(1.0, 2.0, 3.0),
            &Texture::new("test_texture"),
        );

        let expected = "{
    ( 32 0 0 ) ( 32 32 0 ) ( 32 0 32 ) test_texture 0 0 0 0 0 0 0 0
    ( 160 0 0 ) ( 160 0 32 ) ( 160 32 0 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 64 0 ) ( 0 64 32 ) ( 32 64 0 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 160 0 ) ( 32 160 0 ) ( 0 160 32 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 0 96 ) ( 32 0 96 ) ( 0 32 96 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 0 160 ) ( 0 32 160 ) ( 32 0 160 ) test_texture 0 0 0 0 0 0 0 0
  }";
        assert_eq!(brush.to_string(), expected);
    }

    #[test]
    fn test_hollow_box() {
        let brushes = create_hollow_box(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(5.0, 5.0, 5.0),
            1.0,
            &Texture::new("test_texture"),
        );
        assert_eq!(brushes.len(), 6);

        let top = "{
    ( 0 0 0 ) ( 0 32 0 ) ( 0 0 32 ) test_texture 0 0 0 0 0 0 0 0
    ( 192 0 0 ) ( 192 0 32 ) ( 192 32 0 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 32 0 ) ( 0 32 32 ) ( 32 32 0 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 192 0 ) ( 32 192 0 ) ( 0 192 32 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 0 160 ) ( 32 0 160 ) ( 0 32 160 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 0 192 ) ( 0 32 192 ) ( 32 0 192 ) test_texture 0 0 0 0 0 0 0 0
  }";
        let left = "{
    ( 0 0 0 ) ( 0 32 0 ) ( 0 0 32 ) test_texture 0 0 0 0 0 0 0 0
    ( 32 0 0 ) ( 32 0 32 ) ( 32 32 0 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 32 0 ) ( 0 32 32 ) ( 32 32 0 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 192 0 ) ( 32 192 0 ) ( 0 192 32 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 0 64 ) ( 32 0 64 ) ( 0 32 64 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 0 192 ) ( 0 32 192 ) ( 32 0 192 ) test_texture 0 0 0 0 0 0 0 0
  }";
        let front = "{
    ( 0 0 0 ) ( 0 32 0 ) ( 0 0 32 ) test_texture 0 0 0 0 0 0 0 0
    ( 192 0 0 ) ( 192 0 32 ) ( 192 32 0 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 160 0 ) ( 0 160 32 ) ( 32 160 0 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 192 0 ) ( 32 192 0 ) ( 0 192 32 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 0 64 ) ( 32 0 64 ) ( 0 32 64 ) test_texture 0 0 0 0 0 0 0 0
    ( 0 0 192 ) ( 0 32 192 ) ( 32 0 192 ) test_texture 0 0 0 0 0 0 0 0
  }";
        assert_eq!(brushes[0].to_string(), top);
        assert_eq!(brushes[2].to_string(), left);
        assert_eq!(brushes[4].to_string(), front);
    }

    #[test]
    fn test_fitted_box_brush() {
        let brush = create_fitted_box_brush(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 1.0, 4.0),
            "fitted",
            Vector2::new(64, 128),
        );

        let x_face = &brush.planes[0].texture;
        assert_eq!(x_face.path, "fitted");
        assert_eq!(x_face.offset, Vector2::new(0, 0));
        assert_eq!(x_face.scale, Vector2::new(-0.5, 1.0));

        let y_face = &brush.planes[3].texture;
        assert_eq!(y_face.scale, Vector2::new(-1.0, 1.0));

        let z_face = &brush.planes[5].texture;
        assert_eq!(z_face.scale, Vector2::new(-1.0, 0.25));
    }

    #[test]
    fn test_fitted_box_brush_offset() {
        // min.x / size.x = 1.25, so a quarter of the texture is skipped
        let brush = create_fitted_box_brush(
            Vector3::new(5.0, 0.0, 0.0),
            Vector3::new(9.0, 1.0, 1.0),
            "fitted",
            Vector2::new(1024, 1024),
        );
        assert_eq!(brush.planes[4].texture.offset, Vector2::new(256, 0));
        assert_eq!(brush.planes[2].texture.offset, Vector2::new(256, 0));
        assert_eq!(brush.planes[0].texture.offset, Vector2::new(0, 0));
    }

    #[test]
    fn test_skybox_faces() {
        let brushes = create_skybox(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(12.0, 12.0, 12.0),
            1.0,
            "sky/test",
            Vector2::new(1024, 1024),
        );

        let names: Vec<_> = brushes
            .iter()
            .map(|b| b.planes[0].texture.path.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["sky/test_up", "sky/test_dn", "sky/test_lf", "sky/test_rt", "sky/test_ft", "sky/test_bk"]
        );

        // the top face sits on the room and is one unit thick
        assert_eq!(brushes[0].planes[4].a.z, 6.0);
        assert_eq!(brushes[0].planes[5].a.z, 7.0);
    }

    #[test]
    fn test_patch() {
        let p1 = PatchPoint {
            pos: Vector3::new(0.0, 1.0, 1.0),
            uv: Vector2::new(0.0, 0.0),
        };
        let p2 = PatchPoint {
            pos: Vector3::new(1.0, 2.0, 3.0),
            uv: Vector2::new(1.0, 1.0),
        };

        let mut patch = Patch::new(Vector2::new(2, 2), Texture::new("test"));
        assert_eq!(patch.num_points(), 4);

        patch.set_point(Vector2::new(0, 0), p1);
        patch.set_point(Vector2::new(1, 1), p2);
        assert_eq!(patch.point(Vector2::new(0, 0)), p1);
        assert_eq!(patch.point(Vector2::new(1, 1)), p2);

        let expected = "{
    patchDef2
    {
      test
      ( 2 2 0 0 0 )
      (
        ( ( 0 32 32 0 0 ) ( 0 0 0 0 0 ) )
        ( ( 0 0 0 0 0 ) ( 32 64 96 1 1 ) )
      )
    }
  }";
        assert_eq!(patch.to_string(), expected);
    }

    #[test]
    fn test_grid_patch() {
        let patch = create_grid_patch(
            Vector3::new(2.0, 0.0, 1.5),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector2::new(4.0, 3.0),
            Vector2::new(3, 3),
            &Texture::new("test/texture"),
        );

        assert_eq!(patch.num_points(), 9);

        let first = patch.point(Vector2::new(0, 0));
        assert_eq!(first.pos, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(first.uv, Vector2::new(0.0, 1.0));

        let last = patch.point(Vector2::new(2, 2));
        assert_eq!(last.pos, Vector3::new(4.0, 0.0, 3.0));
        assert_eq!(last.uv, Vector2::new(1.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "at least 2x2, not 0x3")]
    fn test_grid_patch_needs_two_points_per_axis() {
        create_grid_patch(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0, 3),
            &Texture::new("test/texture"),
        );
    }

    #[test]
    fn test_parse_brush() {
        let brushes = parse_brushes(BRUSH);
        assert_eq!(brushes.len(), 1);

        let brush = &brushes[0];
        assert_eq!(brush.planes.len(), 6);
        assert_eq!(brush.planes[0].a, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(brush.planes[1].b, Vector3::new(2.0, 0.0, 1.0));
        assert_eq!(brush.planes[2].c, Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(brush.to_string(), BRUSH);

        let brushes = parse_brushes(format!("{}\n{}", BRUSH, BRUSH));
        assert_eq!(brushes.len(), 2);
        assert_eq!(brushes[0].to_string(), brushes[1].to_string());

        assert!(parse_brushes("{}").is_empty());
    }

    #[test]
    fn test_parse_nested_brushes() {
        let brushes = parse_brushes(NESTED_BRUSHES);
        assert_eq!(brushes.len(), 1);
        assert_eq!(brushes[0].planes.len(), 2);
        assert_eq!(brushes[0].planes[1].a, Vector3::new(2.0, 0.0, 0.0));

        let brushes = parse_brushes(format!("{}{}\n", NESTED_BRUSHES, NESTED_BRUSHES));
        assert_eq!(brushes.len(), 2);
    }

    #[test]
    fn test_parse_generated_brushes() {
        let mut texture = Texture::new("walls/rock");
        texture.offset = Vector2::new(16, 32);
        texture.rot_angle = 90.0;
        texture.scale = Vector2::new(0.5, -0.25);
        texture.flags = TextureFlags::DETAIL;

        let hollow = create_hollow_box(
            Vector3::new(-1.0, 0.5, 2.0),
            Vector3::new(3.0, 4.0, 8.0),
            0.25,
            &texture,
        );
        let text: Vec<_> = hollow.iter().map(|b| b.to_string()).collect();
        let parsed = parse_brushes(text.join("\n"));

        assert_eq!(parsed, hollow);
    }

    #[test]
    fn test_unknown_flags_survive() {
        let line = "{\n ( 0 0 0 ) ( 0 32 0 ) ( 0 0 32 ) t 0 0 0 1 1 5 0 0\n}";
        let brushes = parse_brushes(line);
        assert_eq!(brushes[0].planes[0].texture.flags.bits(), 5);
        assert!(brushes[0].to_string().contains(" t 0 0 0 1 1 5 0 0"));
    }
}
