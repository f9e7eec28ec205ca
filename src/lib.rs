// Copyright (c) 2021 Tangram Robotics Inc. - All Rights Reserved
// Unauthorized copying of this file, via any medium is strictly prohibited
// Proprietary and confidential
// ----------------------------

//! Assay is a Command Line Interface (CLI) from Tangram Vision for weighing
//! 3D models in precious metals.
//!
//! Assay reads an STL mesh (binary or ASCII), measures its enclosed volume
//! with the signed-tetrahedra method, and reports the piece's weight across a
//! catalog of jewelry alloys (gold karats, sterling silver, platinum alloys,
//! palladium) in grams, troy ounces, and pennyweight. It also bootstraps and
//! launches the companion Streamlit viewer for interactive 3D inspection.
//!
//! # Installation
//!
//! If you have [Rust installed](https://rustup.rs/), you can install assay
//! with:
//!
//! ```shell
//! cargo install --branch=main --git=https://gitlab.com/tangram-vision/assay.git
//! ```
//!
//! # Usage
//!
//! View CLI help with `assay help` or `assay help <subcommand>`.
//!
//! ## Configuration
//!
//! Assay runs fine with no configuration at all. To change defaults, place a
//! TOML file at `~/.config/assay/assay.toml` or pass one with the
//! `--config path/to/assay.toml` flag:
//!
//! ```toml
//! [display]
//! material = "platinum-950"
//! units = "troy"
//!
//! [viewer]
//! python = "python3.11"
//! venv_dir = "venv"
//! requirements = "requirements.txt"
//! app = "app.py"
//! ```
//!
//! Individual settings may also be overridden with environment variables,
//! e.g. `ASSAY__VIEWER__VENV_DIR=.venv` (note the double underscore to reach
//! into lower struct levels!).
//!
//! ## Commands
//!
//! ```assay analyze <path>...```
//!
//! Analyzes the given STL files (directories are searched recursively for
//! `*.stl`) and prints mesh statistics followed by the weight table. The
//! mesh must be watertight and modeled in millimeters for the volume to
//! mean anything. `--material` highlights one alloy, `--units` selects
//! metric/troy/both columns, and `--json` emits a machine-readable report.
//!
//! <br>
//!
//! ---
//!
//! ```assay calc --volume <mm3> [--material <material>]```
//!
//! Quick weight calculator for a known volume, without a mesh. Prints grams,
//! troy ounces, and pennyweight.
//!
//! <br>
//!
//! ---
//!
//! ```assay materials```
//!
//! Prints the material reference catalog: CLI token, display name, density,
//! display color, and purity notes.
//!
//! <br>
//!
//! ---
//!
//! ```assay launch```
//!
//! Quick-start for the interactive viewer: finds a Python interpreter
//! (exits with an error if none is on PATH), creates the virtual
//! environment if it doesn't exist yet, installs the requirements manifest
//! through it, and runs `streamlit run` in the foreground until the server
//! is interrupted. The viewer's exit code becomes assay's exit code.
//!
//! <br>
//!
//! ---
//!
//! ```assay config```
//!
//! Echoes current config (with any overrides applied) and exits.
//!
//! ## Examples
//!
//! ```shell
//! # Weigh a ring in the default material (18K gold).
//! assay analyze ring.stl
//!
//! # Weigh every model in a folder as sterling silver, troy units only.
//! assay analyze models/ --material=silver-925 --units=troy
//!
//! # 1.2 cm^3 pendant in platinum.
//! assay calc --volume=1200 --material=platinum-950
//!
//! # Start the interactive 3D viewer.
//! assay launch
//! ```
//!
//! # Weighing method
//!
//! Volume is computed by the signed-tetrahedra method: every facet spans a
//! tetrahedron with the origin, and signed volumes cancel outside the solid.
//! Weight is then `volume x density` per alloy. Higher facet counts give
//! more accurate volumes; non-watertight meshes give meaningless ones.
//!
//! # Troubleshooting
//!
//! | Error                        | Resolution                                                                                                              |
//! |-                             |-                                                                                                                        |
//! | Python was not found on PATH | `assay launch` needs a Python 3 installation for the viewer. Install one, or pin an interpreter via `viewer.python`.    |
//! | Binary STL declares N facets | The file is truncated or isn't an STL. Re-export it from your modeling software.                                        |
//! | Volume looks wrong           | Check that the mesh is watertight (closed, no holes) and modeled in millimeters.                                        |

#[cfg(not(debug_assertions))]
use human_panic::setup_panic;

mod app_config;
mod cli;
mod core;

use anyhow::Result;

#[doc(hidden)]
/// Main entrypoint
pub fn run() -> Result<()> {
    // Human Panic. Only enabled when *not* debugging.
    //
    // Example of what panic message looks like:
    // https://docs.rs/human-panic/1.0.3/human_panic/
    #[cfg(not(debug_assertions))]
    {
        setup_panic!();
    }

    // Better Panic. Only enabled *when* debugging.
    #[cfg(debug_assertions)]
    {
        better_panic::Settings::debug()
            .most_recent_first(false)
            .lineno_suffix(true)
            .verbosity(better_panic::Verbosity::Full)
            .install();
    }

    // Setup Logging
    env_logger::init();

    // Get CLI arguments and flags (one may have provided the config file to use)
    let cli_matches = cli::cli_config()?;

    let mut settings = config::Config::default();
    // Use cmdline arg config file if provided, otherwise fall back to the
    // config file at the default ~/.config/... path. The default file is
    // optional; assay works with built-in defaults.
    if let Some(config_file) = cli_matches.value_of("config") {
        settings.merge(config::File::with_name(config_file))?;
    } else {
        settings.merge(
            config::File::with_name(&shellexpand::tilde("~/.config/assay/assay.toml"))
                .required(false),
        )?;
    }

    // Override with environment variables, if present
    // Example of overriding: ASSAY__VIEWER__VENV_DIR=.venv
    // (Note double underscore to reach into lower struct levels!)
    settings.merge(config::Environment::with_prefix("ASSAY_").separator("__"))?;

    // Match against CLI subcommands, which delegate to functions
    cli::cli_match(settings, cli_matches)
}
