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

//! Quake 3 `.map` source documents.
//!
//! # Format
//!
//! A map is a list of entities. The first entity is always `worldspawn`, which carries the static
//! level geometry. Every entity is a brace-delimited block of quoted key/value pairs followed by
//! its brushes and patches:
//!
//! ```text
//! {
//!   "classname" "worldspawn"
//!   "light" "100"
//!   {
//!     ( 32 0 0 ) ( 32 32 0 ) ( 32 0 32 ) texture/path 0 0 0 0.5 0.5 0 0 0
//!     ...
//!   }
//!   {
//!     patchDef2
//!     {
//!       texture/path
//!       ( 3 3 0 0 0 )
//!       (
//!         ( ( x y z u v ) ( x y z u v ) ( x y z u v ) )
//!         ...
//!       )
//!     }
//!   }
//! }
//! ```
//!
//! ## Brushes
//!
//! A brush is a convex solid given as the intersection of half-spaces. Each line defines one
//! plane by three points followed by the texture applied to that face: path, x and y offset,
//! rotation, x and y scale, surface flags, and two unused zeros.
//!
//! ## Patches
//!
//! A `patchDef2` is a lattice of control points, each with a position and a texture coordinate.
//! Points are written column by column.

pub mod brush;
pub mod builder;
pub mod entity;

pub use self::{
    brush::{Brush, Patch, PatchPoint, Plane, Texture, TextureFlags},
    builder::Builder,
    entity::{Entity, Team},
};
