// Copyright (c) 2021 Tangram Robotics Inc. - All Rights Reserved
// Unauthorized copying of this file, via any medium is strictly prohibited
// Proprietary and confidential
// ----------------------------

//! Bootstrap and launch of the companion Streamlit viewer.
//!
//! The viewer is a Python app living next to the user's models
//! (`app.py` + `requirements.txt` by default). `launch` resolves a Python
//! interpreter, creates the virtual environment on first use, installs the
//! requirements through it, and then hands the terminal to
//! `streamlit run` until the server exits.
//!
//! Only the interpreter check gets a friendly error; pip and streamlit
//! failures surface their own output, and we stop at the first failing step.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use anyhow::{bail, Context, Result};
use log::debug;

use crate::app_config::ViewerConfig;

/// Interpreter names probed when the config doesn't pin one.
const DEFAULT_INTERPRETERS: [&str; 2] = ["python3", "python"];

/// Whether `ensure_venv` created the environment or found it already there.
#[derive(Debug, PartialEq)]
pub enum VenvBootstrap {
    Created,
    Existing,
}

/// Resolve a Python interpreter, or fail with a user-facing message.
///
/// An `override_` (from `viewer.python` config) is probed alone; otherwise
/// `python3` then `python` are tried in order.
pub fn find_python(override_: Option<&str>) -> Result<String> {
    let candidates: Vec<&str> = match override_ {
        Some(python) => vec![python],
        None => DEFAULT_INTERPRETERS.to_vec(),
    };

    for candidate in &candidates {
        match probe_interpreter(candidate) {
            Ok(version) => {
                debug!("interpreter {} reports {}", candidate, version);
                return Ok((*candidate).to_string());
            }
            Err(e) => debug!("interpreter probe {} failed: {:#}", candidate, e),
        }
    }
    bail!(
        "Python was not found on PATH (tried: {}). Install Python 3 to use the viewer.",
        candidates.join(", ")
    );
}

fn probe_interpreter(python: &str) -> Result<String> {
    let output = Command::new(python)
        .arg("--version")
        .output()
        .with_context(|| format!("Could not execute {}", python))?;
    if !output.status.success() {
        bail!("{} --version exited with {}", python, output.status);
    }
    // Python 2 prints its version to stderr.
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if stdout.is_empty() {
        Ok(String::from_utf8_lossy(&output.stderr).trim().to_string())
    } else {
        Ok(stdout)
    }
}

/// Create the virtual environment unless it already exists.
pub fn ensure_venv(python: &str, venv_dir: &Path) -> Result<VenvBootstrap> {
    if venv_dir.exists() {
        println!(
            "Virtual environment {} already exists, skipping creation.",
            venv_dir.display()
        );
        return Ok(VenvBootstrap::Existing);
    }

    println!("Creating virtual environment in {}...", venv_dir.display());
    let mut cmd = Command::new(python);
    cmd.args(&["-m", "venv"]).arg(venv_dir);
    run_checked(cmd, "virtual environment creation")?;
    Ok(VenvBootstrap::Created)
}

/// The environment's binary directory (`bin`, or `Scripts` on Windows).
pub fn venv_bin_dir(venv_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_dir.join("Scripts")
    } else {
        venv_dir.join("bin")
    }
}

/// Build a command for a program in the venv, "activated" for the child: the
/// venv's binary directory leads PATH and VIRTUAL_ENV is set, so anything the
/// program spawns also resolves to the isolated environment.
fn venv_command(venv_dir: &Path, program: &str) -> Command {
    let bin_dir = venv_bin_dir(venv_dir);
    let mut cmd = Command::new(bin_dir.join(program));

    let mut paths = vec![bin_dir];
    if let Some(path) = env::var_os("PATH") {
        paths.extend(env::split_paths(&path));
    }
    if let Ok(joined) = env::join_paths(paths) {
        cmd.env("PATH", joined);
    }
    cmd.env("VIRTUAL_ENV", venv_dir);
    cmd
}

/// Upgrade pip, then install the requirements manifest.
///
/// The manifest contents are opaque here; a missing or broken manifest shows
/// up as pip's own error output.
pub fn install_requirements(venv_dir: &Path, requirements: &Path) -> Result<()> {
    println!("Installing dependencies from {}...", requirements.display());

    let mut upgrade = venv_command(venv_dir, "python");
    upgrade.args(&["-m", "pip", "install", "--upgrade", "pip"]);
    run_checked(upgrade, "pip upgrade")?;

    let mut install = venv_command(venv_dir, "python");
    install.args(&["-m", "pip", "install", "-r"]).arg(requirements);
    run_checked(install, "dependency installation")?;
    Ok(())
}

/// Run the Streamlit app in the foreground; returns when the server exits.
pub fn run_app(venv_dir: &Path, app: &Path) -> Result<ExitStatus> {
    println!("Starting viewer (interrupt to stop)...");
    let mut cmd = venv_command(venv_dir, "streamlit");
    cmd.arg("run").arg(app);
    debug!("running {:?}", cmd);
    cmd.status()
        .context("Could not execute streamlit from the virtual environment")
}

/// The whole quick-start sequence. The returned status is the viewer
/// process's; the caller propagates its exit code.
pub fn launch(config: &ViewerConfig) -> Result<ExitStatus> {
    let python = find_python(config.python.as_deref())?;
    let venv_dir = Path::new(&config.venv_dir);
    ensure_venv(&python, venv_dir)?;
    install_requirements(venv_dir, Path::new(&config.requirements))?;
    run_app(venv_dir, Path::new(&config.app))
}

fn run_checked(mut cmd: Command, what: &str) -> Result<()> {
    debug!("running {:?}", cmd);
    let status = cmd
        .status()
        .with_context(|| format!("Could not start {}", what))?;
    if !status.success() {
        bail!("{} failed ({})", what, status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A name that should never resolve on any test machine's PATH.
    const BOGUS_PYTHON: &str = "assay-test-missing-python-3f9c";

    #[test]
    fn test_find_python_missing_override_is_err() {
        let e = find_python(Some(BOGUS_PYTHON)).unwrap_err().to_string();
        assert!(e.contains("not found on PATH"), "{}", e);
        assert!(e.contains(BOGUS_PYTHON), "{}", e);
    }

    #[test]
    fn test_ensure_venv_skips_existing_dir_without_interpreter() {
        // The existence check must come before any interpreter invocation:
        // with a directory already there, even a bogus python succeeds.
        let tmp = tempfile::tempdir().unwrap();
        let venv = tmp.path().join("venv");
        std::fs::create_dir(&venv).unwrap();
        let result = ensure_venv(BOGUS_PYTHON, &venv).unwrap();
        assert_eq!(result, VenvBootstrap::Existing);
    }

    #[test]
    fn test_ensure_venv_missing_interpreter_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let venv = tmp.path().join("venv");
        ensure_venv(BOGUS_PYTHON, &venv).unwrap_err();
        assert!(!venv.exists());
    }

    #[test]
    fn test_launch_stops_at_interpreter_check() {
        let tmp = tempfile::tempdir().unwrap();
        let venv = tmp.path().join("venv");
        let config = ViewerConfig {
            python: Some(BOGUS_PYTHON.to_string()),
            venv_dir: venv.to_str().unwrap().to_string(),
            requirements: "requirements.txt".to_string(),
            app: "app.py".to_string(),
        };
        launch(&config).unwrap_err();
        // No environment may be created when the interpreter check fails.
        assert!(!venv.exists());
    }

    #[test]
    fn test_venv_bin_dir_layout() {
        let bin = venv_bin_dir(Path::new("venv"));
        if cfg!(windows) {
            assert_eq!(bin, Path::new("venv").join("Scripts"));
        } else {
            assert_eq!(bin, Path::new("venv").join("bin"));
        }
    }
}
