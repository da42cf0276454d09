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

//! Text levels.
//!
//! A text level is a picture of a maze drawn with one character per cell. `*` is solid wall,
//! anything else is open floor, and letters mark where entities go. An optional second layer of
//! the same shape assigns uppercase variation letters to cells, which select texture groups.
//!
//! [`translate_text_level`] turns the two layers into `.map` source.

pub mod compile;
pub mod exporter;
pub mod grid;
pub mod maze;
pub mod parse;
pub mod script;
pub mod settings;
pub mod theme;
pub mod translate;

pub use self::{
    compile::{run_map_compile_for, MapCompileError, MapCompileSettings},
    exporter::TextLevelExporter,
    maze::{Cell, GridMaze, Opening},
    parse::parse_text_level,
    settings::{SettingsError, TextLevelSettings},
    theme::{Theme, ThemeKind},
    translate::{default_handler, translate_text_level, CallbackResult, MapSnippetEmitter},
};
