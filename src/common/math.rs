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

use cgmath::{Deg, InnerSpace, Quaternion, Rad, Rotation, Rotation3, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Angles {
    pub pitch: Deg<f64>,
    pub yaw: Deg<f64>,
    pub roll: Deg<f64>,
}

impl Angles {
    pub fn zero() -> Angles {
        Angles {
            pitch: Deg(0.0),
            yaw: Deg(0.0),
            roll: Deg(0.0),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.pitch.0 == 0.0 && self.yaw.0 == 0.0 && self.roll.0 == 0.0
    }
}

impl Default for Angles {
    fn default() -> Self {
        Angles::zero()
    }
}

impl std::ops::Add for Angles {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            pitch: self.pitch + other.pitch,
            yaw: self.yaw + other.yaw,
            roll: self.roll + other.roll,
        }
    }
}

pub fn min_elementwise(a: Vector3<f64>, b: Vector3<f64>) -> Vector3<f64> {
    Vector3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

pub fn max_elementwise(a: Vector3<f64>, b: Vector3<f64>) -> Vector3<f64> {
    Vector3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}

/// Returns the fractional part of `v`, always in `[0, 1)`.
pub fn fract_floor(v: f64) -> f64 {
    v - v.floor()
}

/// Rotates `v` counter-clockwise by `angle` around `axis`.
pub fn rotate_about(v: Vector3<f64>, axis: Vector3<f64>, angle: Deg<f64>) -> Vector3<f64> {
    if axis.magnitude2() == 0.0 {
        return v;
    }

    let rotation = Quaternion::from_axis_angle(axis.normalize(), Rad::from(angle));
    rotation.rotate_vector(v)
}

/// The unsigned angle between two vectors.
pub fn angle_between(a: Vector3<f64>, b: Vector3<f64>) -> Rad<f64> {
    Rad(a.cross(b).magnitude().atan2(a.dot(b)))
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_vec_eq(a: Vector3<f64>, b: Vector3<f64>) {
        assert!((a - b).magnitude() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_elementwise_min_max() {
        let a = Vector3::new(1.0, 5.0, -2.0);
        let b = Vector3::new(3.0, 2.0, -4.0);
        assert_eq!(min_elementwise(a, b), Vector3::new(1.0, 2.0, -4.0));
        assert_eq!(max_elementwise(a, b), Vector3::new(3.0, 5.0, -2.0));
    }

    #[test]
    fn test_fract_floor_negative() {
        assert_eq!(fract_floor(1.25), 0.25);
        assert_eq!(fract_floor(-1.25), 0.75);
        assert_eq!(fract_floor(3.0), 0.0);
    }

    #[test]
    fn test_rotate_about_z() {
        let v = rotate_about(Vector3::unit_x(), Vector3::unit_z(), Deg(90.0));
        assert_vec_eq(v, Vector3::unit_y());
    }

    #[test]
    fn test_rotate_about_zero_axis() {
        let v = rotate_about(Vector3::unit_z(), Vector3::new(0.0, 0.0, 0.0), Deg(45.0));
        assert_eq!(v, Vector3::unit_z());
    }

    #[test]
    fn test_angle_between() {
        let angle = angle_between(Vector3::unit_x(), Vector3::unit_y());
        assert!((angle.0 - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        let angle = angle_between(Vector3::unit_y(), Vector3::unit_y());
        assert_eq!(angle.0, 0.0);
    }
}
