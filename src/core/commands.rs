// Copyright (c) 2021 Tangram Robotics Inc. - All Rights Reserved
// Unauthorized copying of this file, via any medium is strictly prohibited
// Proprietary and confidential
// ----------------------------

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use indicatif::ProgressBar;
use log::debug;
use walkdir::WalkDir;

use super::geometry::MeshStats;
use super::materials::Material;
use super::mesh::TriangleMesh;
use super::report::{self, AnalysisReport};
use super::units::{self, UnitSystem};
use super::viewer;
use crate::app_config::{CompleteAppConfig, DisplaySection, ViewerSection};

/// Analyze STL files and print a weight report for each.
pub fn analyze(
    config: config::Config,
    paths: &[PathBuf],
    material: Option<Material>,
    unit_system: Option<UnitSystem>,
    json: bool,
) -> Result<()> {
    let display = config.try_into::<DisplaySection>()?.display;
    let material = resolve_material(material, display.material.as_deref())?;
    let unit_system = resolve_units(unit_system, display.units.as_deref())?;

    let files = collect_stl_files(paths)?;
    debug!("analyzing {} file(s)", files.len());
    for (i, file) in files.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let analysis = analyze_file(file)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        } else {
            print!("{}", report::render_human(&analysis, material, unit_system));
        }
    }
    Ok(())
}

fn analyze_file(path: &Path) -> Result<AnalysisReport> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Loading 3D model...");
    spinner.enable_steady_tick(100);

    let bytes = fs::read(path)
        .map_err(|e| anyhow!("Failed to read STL file {}: {}", path.display(), e))?;
    let digest = format!("{:x}", md5::compute(&bytes));
    let mesh = TriangleMesh::from_bytes(&bytes)
        .map_err(|e| anyhow!("Failed to parse STL file {}: {:#}", path.display(), e))?;

    spinner.set_message("Calculating volume...");
    let stats = MeshStats::measure(&mesh);
    spinner.finish_and_clear();

    Ok(AnalysisReport::new(
        path.display().to_string(),
        bytes.len() as u64,
        digest,
        stats,
    ))
}

/// Expand CLI paths into STL files: files are taken as given, directories are
/// walked recursively for `*.stl` (symlinks not followed).
fn collect_stl_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path) {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let is_stl = entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("stl"))
                    .unwrap_or(false);
                if is_stl {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if path.exists() {
            files.push(path.clone());
        } else {
            bail!("No such file or directory: {}", path.display());
        }
    }
    if files.is_empty() {
        bail!("No STL files found in the given path(s)");
    }
    files.sort();
    Ok(files)
}

/// Quick weight calculator from a known volume.
pub fn quick_calc(config: config::Config, volume_mm3: f64, material: Option<Material>) -> Result<()> {
    let display = config.try_into::<DisplaySection>()?.display;
    let material = resolve_material(material, display.material.as_deref())?;

    let grams = material.weight_grams(volume_mm3);
    println!(
        "{:.2} mm3 of {} ({:.4} g/mm3):",
        volume_mm3,
        material.display_name(),
        material.density()
    );
    println!("  {:<14}{:.4}", "grams", grams);
    println!("  {:<14}{:.4}", "troy oz", units::troy_ounces(grams));
    println!("  {:<14}{:.4}", "pennyweight", units::pennyweight(grams));
    Ok(())
}

/// Show the material reference catalog.
pub fn list_materials() -> Result<()> {
    use strum::IntoEnumIterator;

    println!(
        "{:<16} {:<18} {:>9} {:>9}  {}",
        "token", "material", "g/mm3", "color", "notes"
    );
    for material in Material::iter() {
        println!(
            "{:<16} {:<18} {:>9.4} {:>9}  {}",
            material.as_ref(),
            material.display_name(),
            material.density(),
            material.color(),
            material.info()
        );
    }
    Ok(())
}

/// Bootstrap the viewer environment and run it until it exits; the viewer's
/// exit code becomes ours.
pub fn launch_viewer(config: config::Config) -> Result<()> {
    let viewer_config = config.try_into::<ViewerSection>()?.viewer;
    let status = viewer::launch(&viewer_config)?;
    if !status.success() {
        debug!("viewer exited with {}", status);
    }
    std::process::exit(status.code().unwrap_or(1));
}

/// Show the configuration file
pub fn print_config(config: config::Config) -> Result<()> {
    let app_config: CompleteAppConfig = config.try_into()?;
    println!("{}", toml::to_string(&app_config)?);

    Ok(())
}

fn resolve_material(flag: Option<Material>, configured: Option<&str>) -> Result<Material> {
    match flag {
        Some(material) => Ok(material),
        None => match configured {
            Some(token) => Material::from_str(token).map_err(|_| {
                anyhow!(
                    "Unknown material '{}' in config (expected one of: {})",
                    token,
                    material_tokens()
                )
            }),
            None => Ok(Material::default()),
        },
    }
}

fn resolve_units(flag: Option<UnitSystem>, configured: Option<&str>) -> Result<UnitSystem> {
    match flag {
        Some(unit_system) => Ok(unit_system),
        None => match configured {
            Some(token) => UnitSystem::from_str(token).map_err(|_| {
                anyhow!(
                    "Unknown unit system '{}' in config (expected one of: {})",
                    token,
                    unit_tokens()
                )
            }),
            None => Ok(UnitSystem::default()),
        },
    }
}

fn material_tokens() -> String {
    use strum::VariantNames;
    Material::VARIANTS.join(", ")
}

fn unit_tokens() -> String {
    use strum::VariantNames;
    UnitSystem::VARIANTS.join(", ")
}
