// Copyright (c) 2021 Tangram Robotics Inc. - All Rights Reserved
// Unauthorized copying of this file, via any medium is strictly prohibited
// Proprietary and confidential
// ----------------------------

//! Rendering analysis results for humans and machines.

use byte_unit::Byte;
use serde::Serialize;
use strum::IntoEnumIterator;

use super::geometry::MeshStats;
use super::materials::Material;
use super::units::{self, UnitSystem};

/// One row of the weight table.
#[derive(Clone, Debug, Serialize)]
pub struct WeightRow {
    pub material: String,
    pub density_g_mm3: f64,
    pub grams: f64,
    pub troy_oz: f64,
    pub pennyweight: f64,
}

/// Full analysis of one STL file, serializable for `--json`.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub file: String,
    pub size_bytes: u64,
    /// md5 of the file contents, for integrity bookkeeping.
    pub md5: String,
    pub stats: MeshStats,
    /// Weights across the whole catalog.
    pub weights: Vec<WeightRow>,
}

impl AnalysisReport {
    pub fn new(file: String, size_bytes: u64, md5: String, stats: MeshStats) -> AnalysisReport {
        let weights = weight_rows(stats.volume_mm3);
        AnalysisReport {
            file,
            size_bytes,
            md5,
            stats,
            weights,
        }
    }
}

/// Weight of `volume_mm3` in every cataloged material.
pub fn weight_rows(volume_mm3: f64) -> Vec<WeightRow> {
    Material::iter()
        .map(|material| {
            let grams = material.weight_grams(volume_mm3);
            WeightRow {
                material: material.display_name().to_string(),
                density_g_mm3: material.density(),
                grams,
                troy_oz: units::troy_ounces(grams),
                pennyweight: units::pennyweight(grams),
            }
        })
        .collect()
}

/// Human-readable report: statistics block, then the weight table with the
/// selected material marked.
pub fn render_human(report: &AnalysisReport, selected: Material, units: UnitSystem) -> String {
    let mut out = String::new();
    let size = Byte::from_bytes(u128::from(report.size_bytes))
        .get_appropriate_unit(false)
        .to_string();
    out.push_str(&format!("{} ({}, md5 {})\n", report.file, size, report.md5));

    let s = &report.stats;
    out.push_str(&format!("  {:<14}{}\n", "triangles", s.triangles));
    out.push_str(&format!("  {:<14}{:.2} mm3\n", "volume", s.volume_mm3));
    out.push_str(&format!(
        "  {:<14}{:.2} mm2\n",
        "surface area", s.surface_area_mm2
    ));
    out.push_str(&format!(
        "  {:<14}{:.1} x {:.1} x {:.1} mm\n",
        "dimensions", s.dimensions_mm[0], s.dimensions_mm[1], s.dimensions_mm[2]
    ));
    out.push_str(&format!(
        "  {:<14}{:.2}, {:.2}, {:.2}\n",
        "center", s.center_mm[0], s.center_mm[1], s.center_mm[2]
    ));
    out.push('\n');

    out.push_str(&header_line(units));
    for row in &report.weights {
        let marker = if row.material == selected.display_name() {
            '*'
        } else {
            ' '
        };
        out.push_str(&format!(
            "{} {:<18} {:>9.4}",
            marker, row.material, row.density_g_mm3
        ));
        if units.shows_metric() {
            out.push_str(&format!(" {:>12.4}", row.grams));
        }
        if units.shows_troy() {
            out.push_str(&format!(" {:>10.4} {:>10.4}", row.troy_oz, row.pennyweight));
        }
        out.push('\n');
    }
    out
}

fn header_line(units: UnitSystem) -> String {
    let mut line = format!("  {:<18} {:>9}", "material", "g/mm3");
    if units.shows_metric() {
        line.push_str(&format!(" {:>12}", "grams"));
    }
    if units.shows_troy() {
        line.push_str(&format!(" {:>10} {:>10}", "troy oz", "dwt"));
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::super::geometry::MeshStats;
    use super::*;

    fn stats_for_volume(volume: f64) -> MeshStats {
        MeshStats {
            triangles: 12,
            volume_mm3: volume,
            surface_area_mm2: 600.0,
            min_mm: [0.0; 3],
            max_mm: [10.0; 3],
            dimensions_mm: [10.0; 3],
            center_mm: [5.0; 3],
        }
    }

    fn sample_report() -> AnalysisReport {
        AnalysisReport::new(
            "ring.stl".to_string(),
            684,
            "d41d8cd98f00b204e9800998ecf8427e".to_string(),
            stats_for_volume(1000.0),
        )
    }

    #[test]
    fn test_weight_rows_cover_catalog() {
        let rows = weight_rows(1000.0);
        assert_eq!(rows.len(), 10);
        let gold = rows.iter().find(|r| r.material == "18K Gold").unwrap();
        assert!((gold.grams - 15.4).abs() < 1e-9);
        assert!((gold.troy_oz - 15.4 / 31.1035).abs() < 1e-9);
        assert!((gold.pennyweight - 15.4 / 1.55517).abs() < 1e-9);
    }

    #[test]
    fn test_render_marks_selected_material() {
        let text = render_human(&sample_report(), Material::Silver925, UnitSystem::Both);
        assert!(text.contains("* Silver (925)"), "{}", text);
        assert!(!text.contains("* 18K Gold"), "{}", text);
    }

    #[test]
    fn test_render_metric_hides_troy_columns() {
        let text = render_human(&sample_report(), Material::default(), UnitSystem::Metric);
        assert!(text.contains("grams"), "{}", text);
        assert!(!text.contains("troy oz"), "{}", text);
    }

    #[test]
    fn test_render_troy_hides_gram_column() {
        let text = render_human(&sample_report(), Material::default(), UnitSystem::Troy);
        assert!(!text.contains("grams"), "{}", text);
        assert!(text.contains("troy oz"), "{}", text);
        assert!(text.contains("dwt"), "{}", text);
    }

    #[test]
    fn test_render_includes_stats() {
        let text = render_human(&sample_report(), Material::default(), UnitSystem::Both);
        assert!(text.contains("triangles     12"), "{}", text);
        assert!(text.contains("1000.00 mm3"), "{}", text);
        assert!(text.contains("10.0 x 10.0 x 10.0 mm"), "{}", text);
    }

    #[test]
    fn test_json_report_shape() {
        let json = serde_json::to_value(&sample_report()).unwrap();
        assert_eq!(json["file"], "ring.stl");
        assert_eq!(json["stats"]["triangles"], 12);
        assert_eq!(json["weights"].as_array().unwrap().len(), 10);
    }
}
