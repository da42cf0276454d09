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

//! Compiling generated maps with the external build script.

use std::{
    io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use chrono::Utc;
use thiserror::Error;

/// Name of the build script, relative to the run directory.
pub const COMPILE_SCRIPT: &str = "compile_map.sh";

/// Exit status a shell reports when it cannot run a command.
const SHELL_EXEC_FAILED: i32 = 127;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MapCompileSettings {
    /// Also build the navigation data bots need.
    pub generate_aas: bool,
}

#[derive(Error, Debug)]
pub enum MapCompileError {
    #[error("Compile script not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to start compile script: {0}")]
    Spawn(#[from] io::Error),
    #[error("Shell could not execute the compile script")]
    ExecFailed,
    #[error("Compile script exited with status {0}")]
    ExitCode(i32),
    #[error("Compile script killed by signal {0}")]
    Signal(i32),
}

/// Compiles `<base>.map` by running `<rundir>/compile_map.sh [-a] <base>`.
///
/// Blocks until the script finishes.
pub fn run_map_compile_for<P, Q>(
    rundir: P,
    base: Q,
    settings: &MapCompileSettings,
) -> Result<(), MapCompileError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let script = rundir.as_ref().join(COMPILE_SCRIPT);
    if !script.is_file() {
        error!("No compile script at {}", script.display());
        return Err(MapCompileError::NotFound(script));
    }

    let mut command = Command::new("sh");
    command.arg(&script);
    if settings.generate_aas {
        command.arg("-a");
    }
    command.arg(base.as_ref());
    debug!("Running {:?}", command);

    let start = Utc::now();
    let status = command.status()?;
    let elapsed = Utc::now().signed_duration_since(start);

    match check_status(status) {
        Ok(()) => {
            info!(
                "Compiled {} in {}ms",
                base.as_ref().display(),
                elapsed.num_milliseconds()
            );
            Ok(())
        }
        Err(e) => {
            error!("Compiling {} failed: {}", base.as_ref().display(), e);
            Err(e)
        }
    }
}

fn check_status(status: ExitStatus) -> Result<(), MapCompileError> {
    match status.code() {
        Some(0) => Ok(()),
        Some(SHELL_EXEC_FAILED) => Err(MapCompileError::ExecFailed),
        Some(code) => Err(MapCompileError::ExitCode(code)),
        None => Err(MapCompileError::Signal(signal(status))),
    }
}

#[cfg(unix)]
fn signal(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().unwrap_or(0)
}

#[cfg(not(unix))]
fn signal(_: ExitStatus) -> i32 {
    0
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::{env, fs};

    fn rundir(name: &str, script: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("mazemap-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(COMPILE_SCRIPT), script).unwrap();
        dir
    }

    #[test]
    fn test_compile_success() {
        let dir = rundir("ok", "echo \"$@\" > \"$(dirname \"$0\")/args\"\n");

        run_map_compile_for(&dir, "maps/test", &MapCompileSettings::default()).unwrap();
        assert_eq!(fs::read_to_string(dir.join("args")).unwrap(), "maps/test\n");

        let settings = MapCompileSettings { generate_aas: true };
        run_map_compile_for(&dir, "maps/test", &settings).unwrap();
        assert_eq!(fs::read_to_string(dir.join("args")).unwrap(), "-a maps/test\n");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_compile_failure() {
        let dir = rundir("fail", "exit 3\n");
        match run_map_compile_for(&dir, "maps/test", &MapCompileSettings::default()) {
            Err(MapCompileError::ExitCode(3)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_compile_exec_failure() {
        let dir = rundir("exec", "exit 127\n");
        match run_map_compile_for(&dir, "maps/test", &MapCompileSettings::default()) {
            Err(MapCompileError::ExecFailed) => (),
            other => panic!("unexpected result: {:?}", other),
        }
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_compile_signal() {
        let dir = rundir("signal", "kill -9 $$\n");
        match run_map_compile_for(&dir, "maps/test", &MapCompileSettings::default()) {
            Err(MapCompileError::Signal(9)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_script() {
        let dir = env::temp_dir().join(format!("mazemap-missing-{}", std::process::id()));
        match run_map_compile_for(&dir, "maps/test", &MapCompileSettings::default()) {
            Err(MapCompileError::NotFound(path)) => assert!(path.ends_with(COMPILE_SCRIPT)),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
