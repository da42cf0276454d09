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

extern crate docopt;
extern crate env_logger;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
extern crate mazemap;
extern crate rand;
#[macro_use]
extern crate serde_derive;

use std::{fs, path::PathBuf, process::exit};

use mazemap::{
    common::WORLD_TO_GAME_UNITS,
    level::{
        run_map_compile_for, translate_text_level, CallbackResult, MapCompileSettings,
        MapSnippetEmitter, TextLevelSettings,
    },
};

use docopt::Docopt;
use failure::{Error, ResultExt};
use rand::{rngs::StdRng, SeedableRng};

#[derive(Deserialize)]
struct Args {
    arg_level: String,
    arg_output: Option<String>,
    flag_variations: Option<String>,
    flag_seed: u64,
    flag_theme: String,
    flag_skybox: Option<String>,
    flag_cell_size: f64,
    flag_set: Vec<String>,
    flag_compile: Option<String>,
    flag_bots: bool,
}

const USAGE: &'static str = "
Usage: text2map [options] [--set=<setting>]... <level> [<output>]
       text2map (-h | --help)
       text2map --version

Converts a text level into .map source. The output defaults to the level path with a .map
extension.

Options:
    --variations=<file>  Variations layer for the level.
    --seed=<n>           Random seed [default: 0].
    --theme=<name>       Texture theme: default, mishmash, tron, minesweeper, tetris, go,
                         pacman or null [default: default].
    --skybox=<name>      Base name of the skybox textures. Without one the level gets a ceiling.
    --cell-size=<units>  Size of a cell in game units [default: 100].
    --set=<setting>      Override a level setting, as name=value.
    --compile=<rundir>   Compile the map with <rundir>/compile_map.sh.
    --bots               Generate bot navigation data when compiling.

    -h, --help           Show this message and exit.
        --version        Print version information and exit.
";

const VERSION: &'static str = "text2map 0.1";

fn settings(args: &Args) -> Result<TextLevelSettings, Error> {
    let mut settings = TextLevelSettings::default();
    settings.set("theme", args.flag_theme.as_str())?;
    settings.cell_size = args.flag_cell_size / WORLD_TO_GAME_UNITS;

    if let Some(ref skybox) = args.flag_skybox {
        settings.skybox_texture_name = skybox.clone();
    }

    for setting in args.flag_set.iter() {
        let (name, value) = match setting.split_once('=') {
            Some(pair) => pair,
            None => bail!("Expected name=value, got '{}'", setting),
        };
        settings.set(name, value)?;
    }

    Ok(settings)
}

fn run(args: Args) -> Result<(), Error> {
    let settings = settings(&args)?;

    let level = fs::read_to_string(&args.arg_level)
        .context(format!("Couldn't read {}", args.arg_level))?;
    let variations = match args.flag_variations {
        Some(ref path) => {
            fs::read_to_string(path).context(format!("Couldn't read {}", path))?
        }
        None => String::new(),
    };
    ensure!(!level.trim().is_empty(), "{} is empty", args.arg_level);

    let mut rng = StdRng::seed_from_u64(args.flag_seed);
    let map = translate_text_level(
        &level,
        &variations,
        &mut rng,
        |_, _, _, _: &mut MapSnippetEmitter| CallbackResult::NotHandled,
        &settings,
    );

    let output = match args.arg_output {
        Some(ref o) => PathBuf::from(o),
        None => PathBuf::from(&args.arg_level).with_extension("map"),
    };
    fs::write(&output, map).context(format!("Couldn't write {}", output.display()))?;
    info!("Wrote {}", output.display());

    if let Some(ref rundir) = args.flag_compile {
        let compile_settings = MapCompileSettings {
            generate_aas: args.flag_bots,
        };
        run_map_compile_for(rundir, output.with_extension(""), &compile_settings)?;
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.version(Some(VERSION.to_owned())).deserialize())
        .unwrap_or_else(|e| e.exit());

    if let Err(e) = run(args) {
        for cause in e.iter_chain() {
            eprintln!("{}", cause);
        }
        exit(1);
    }
}
