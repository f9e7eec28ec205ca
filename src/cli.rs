// Copyright (c) 2021 Tangram Robotics Inc. - All Rights Reserved
// Unauthorized copying of this file, via any medium is strictly prohibited
// Proprietary and confidential
// ----------------------------

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{crate_authors, crate_description, crate_version};
use clap::{App, AppSettings, Arg};
use strum::VariantNames;

use crate::core::commands;
use crate::core::materials::Material;
use crate::core::units::UnitSystem;

/// Match commands
pub fn cli_match(config: config::Config, cli_matches: clap::ArgMatches) -> Result<()> {
    // Handle config subcommand first, because it doesn't need any valid configuration, and is helpful for debugging bad config!
    if let Some(("config", _config_matches)) = cli_matches.subcommand() {
        commands::print_config(config)?;
        return Ok(());
    }

    match cli_matches.subcommand() {
        Some(("analyze", analyze_matches)) => {
            // Safe to unwrap because the argument is required
            let paths: Vec<PathBuf> = analyze_matches
                .values_of("path")
                .unwrap()
                .map(PathBuf::from)
                .collect();
            let material = match analyze_matches.value_of("material") {
                Some(token) => Some(Material::from_str(token)?),
                None => None,
            };
            let unit_system = match analyze_matches.value_of("units") {
                Some(token) => Some(UnitSystem::from_str(token)?),
                None => None,
            };
            commands::analyze(
                config,
                &paths,
                material,
                unit_system,
                analyze_matches.is_present("json"),
            )?;
        }
        Some(("calc", calc_matches)) => {
            // Safe to unwrap because the argument is required
            let volume_mm3: f64 = calc_matches
                .value_of_t("volume")
                .unwrap_or_else(|e| e.exit());
            let material = match calc_matches.value_of("material") {
                Some(token) => Some(Material::from_str(token)?),
                None => None,
            };
            commands::quick_calc(config, volume_mm3, material)?;
        }
        Some(("materials", _materials_matches)) => {
            commands::list_materials()?;
        }
        Some(("launch", _launch_matches)) => {
            commands::launch_viewer(config)?;
        }
        _ => {
            // Arguments are required by default (in Clap).
            // This section should never execute.
            unreachable!("No matching subcommand!");
        }
    }
    Ok(())
}

/// Configure Clap
/// This function will configure clap and match arguments
pub fn cli_config() -> Result<clap::ArgMatches> {
    let cli_app = App::new("assay")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .version(crate_version!())
        .about(crate_description!())
        .author(crate_authors!("\n"))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .about("Set a custom config file")
                .takes_value(true),
        )
        .subcommand(
            App::new("analyze")
                .about("Analyze STL files and report precious-metal weights")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_name("PATH")
                        .about("STL files or directories to analyze")
                        .takes_value(true)
                        .multiple(true),
                )
                .arg(
                    Arg::new("material")
                        .short('m')
                        .long("material")
                        .value_name("MATERIAL")
                        .about("Material to highlight in the report")
                        .possible_values(Material::VARIANTS)
                        .takes_value(true),
                )
                .arg(
                    Arg::new("units")
                        .short('u')
                        .long("units")
                        .value_name("UNITS")
                        .about("Unit system for the weight table")
                        .possible_values(UnitSystem::VARIANTS)
                        .takes_value(true),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .about("Emit a JSON report instead of text"),
                ),
        )
        .subcommand(
            App::new("calc")
                .about("Quick weight calculator from a known volume")
                .arg(
                    Arg::new("volume")
                        .short('v')
                        .long("volume")
                        .value_name("MM3")
                        .about("Volume in cubic millimeters")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::new("material")
                        .short('m')
                        .long("material")
                        .value_name("MATERIAL")
                        .about("Material to weigh")
                        .possible_values(Material::VARIANTS)
                        .takes_value(true),
                ),
        )
        .subcommand(App::new("materials").about("Show the material reference catalog"))
        .subcommand(
            App::new("launch")
                .about("Set up the viewer environment and run the Streamlit app"),
        )
        .subcommand(App::new("config").about("Show Configuration"));

    // Get matches
    let cli_matches = cli_app.get_matches();

    Ok(cli_matches)
}
