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

pub mod map;

use cgmath::Vector3;
use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{space0, space1},
    combinator::{map, recognize},
    number::complete::double,
    sequence::{delimited, pair, preceded, tuple},
};

pub use self::map::plane_record;

pub fn non_newline_spaces(input: &str) -> nom::IResult<&str, &str> {
    space1(input)
}

/// A run of non-whitespace characters.
pub fn word(input: &str) -> nom::IResult<&str, &str> {
    recognize(take_while1(|c: char| !c.is_whitespace()))(input)
}

/// Three whitespace-separated reals, e.g. `1 -2.5 3e2`.
pub fn vector3(input: &str) -> nom::IResult<&str, Vector3<f64>> {
    map(
        tuple((
            double,
            preceded(non_newline_spaces, double),
            preceded(non_newline_spaces, double),
        )),
        |(x, y, z)| Vector3::new(x, y, z),
    )(input)
}

// ( x y z )
pub fn parenthesized_vector3(input: &str) -> nom::IResult<&str, Vector3<f64>> {
    delimited(pair(tag("("), space0), vector3, pair(space0, tag(")")))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthesized_vector3() {
        assert_eq!(
            parenthesized_vector3("( 0 -32 1.5 ) tail"),
            Ok((" tail", Vector3::new(0.0, -32.0, 1.5)))
        );
    }
}
