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

use crate::common::parse::{non_newline_spaces, parenthesized_vector3, word};

use cgmath::Vector3;
use nom::{
    bytes::complete::tag,
    character::complete::{i32 as int, space0},
    combinator::opt,
    number::complete::double,
    sequence::{pair, preceded, tuple},
};

/// One plane line of a brush block, before any unit conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneRecord<'a> {
    pub points: [Vector3<f64>; 3],
    pub texture: &'a str,
    pub offset: [i32; 2],
    pub rotation: f64,
    pub scale: [f64; 2],
    pub flags: i32,
}

// ( x y z ) ( x y z ) ( x y z ) path offx offy rot scalex scaley flags 0 0
//
// The trailing "0 0" is optional.
pub fn plane_record(input: &str) -> nom::IResult<&str, PlaneRecord<'_>> {
    let (input, (a, b, c)) = tuple((
        preceded(space0, parenthesized_vector3),
        preceded(space0, parenthesized_vector3),
        preceded(space0, parenthesized_vector3),
    ))(input)?;

    let (input, (texture, offset_x, offset_y, rotation, scale_x, scale_y, flags)) = tuple((
        preceded(non_newline_spaces, word),
        preceded(non_newline_spaces, int),
        preceded(non_newline_spaces, int),
        preceded(non_newline_spaces, double),
        preceded(non_newline_spaces, double),
        preceded(non_newline_spaces, double),
        preceded(non_newline_spaces, int),
    ))(input)?;

    let (input, _) = opt(pair(
        preceded(non_newline_spaces, tag("0")),
        preceded(non_newline_spaces, tag("0")),
    ))(input)?;

    Ok((
        input,
        PlaneRecord {
            points: [a, b, c],
            texture,
            offset: [offset_x, offset_y],
            rotation,
            scale: [scale_x, scale_y],
            flags,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_record() {
        let line = "( 0 0 0 ) ( 0 32 0 ) ( 0 0 32 ) test_texture 16 -8 45 0.5 -0.25 134217728 0 0";
        let (rest, record) = plane_record(line).unwrap();
        assert_eq!(rest, "");
        assert_eq!(record.points[1], Vector3::new(0.0, 32.0, 0.0));
        assert_eq!(record.texture, "test_texture");
        assert_eq!(record.offset, [16, -8]);
        assert_eq!(record.rotation, 45.0);
        assert_eq!(record.scale, [0.5, -0.25]);
        assert_eq!(record.flags, 0x8000000);
    }

    #[test]
    fn test_plane_record_without_trailer() {
        let line = "( 1 2 3 ) ( 4 5 6 ) ( 7 8 9 ) a/b 0 0 0 1 1 0";
        let (_, record) = plane_record(line).unwrap();
        assert_eq!(record.points[2], Vector3::new(7.0, 8.0, 9.0));
        assert_eq!(record.texture, "a/b");
    }

    #[test]
    fn test_plane_record_rejects_short_line() {
        assert!(plane_record("( 1 2 3 ) ( 4 5 6 ) ( 7 8 9 ) a/b 0 0").is_err());
        assert!(plane_record("patchDef2").is_err());
    }
}
