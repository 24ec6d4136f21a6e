use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TreemapError};
use crate::labels::LabelConfig;
use crate::legend::LegendConfig;
use crate::palette::default_palette;
use crate::treemap::{Tiling, TreemapLayout};

/// Largest diagram side accepted, in pixels.
pub const MAX_EXTENT: f64 = 100_000.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 70.0,
            bottom: 90.0,
            left: 30.0,
            right: 30.0,
        }
    }
}

/// Everything that shapes a chart besides the data. Every field has a
/// default, so a config file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub margin: Margin,
    pub layout: TreemapLayout,
    pub legend: LegendConfig,
    pub labels: LabelConfig,
    pub palette: Vec<String>,
    pub tile_stroke: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            layout: TreemapLayout::default(),
            legend: LegendConfig::default(),
            labels: LabelConfig::default(),
            palette: default_palette(),
            tile_stroke: "white".to_string(),
        }
    }
}

impl ChartConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| TreemapError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: ChartConfig = serde_json::from_str(&text)?;
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "loaded chart config");
        Ok(cfg)
    }

    /// Rejects geometry the layout and label fitter cannot work with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(TreemapError::InvalidConfig(msg)) };
        for (key, v) in [("layout.width", self.layout.width), ("layout.height", self.layout.height)] {
            if !v.is_finite() || v <= 0.0 || v > MAX_EXTENT {
                return invalid(format!("{key} must be in (0, {MAX_EXTENT}], got {v}"));
            }
        }
        for (key, v) in [
            ("layout.padding_inner", self.layout.padding_inner),
            ("layout.padding_outer", self.layout.padding_outer),
        ] {
            if !v.is_finite() || v < 0.0 {
                return invalid(format!("{key} must be finite and not negative, got {v}"));
            }
        }
        if let Tiling::Squarify { ratio } = self.layout.tiling {
            if !ratio.is_finite() || ratio <= 0.0 {
                return invalid(format!("squarify ratio must be finite and positive, got {ratio}"));
            }
        }
        let labels = &self.labels;
        if !labels.size_divisor.is_finite() || labels.size_divisor <= 0.0 {
            return invalid(format!(
                "labels.size_divisor must be finite and positive, got {}",
                labels.size_divisor
            ));
        }
        if !labels.min_font_size.is_finite() || labels.min_font_size < 0.0 {
            return invalid(format!(
                "labels.min_font_size must be finite and not negative, got {}",
                labels.min_font_size
            ));
        }
        Ok(())
    }

    pub fn svg_width(&self) -> f64 {
        self.margin.left + self.layout.width + self.margin.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_chart() {
        let cfg = ChartConfig::default();
        assert_eq!(cfg.svg_width(), 1710.0);
        assert_eq!(cfg.layout.height, 650.0);
        assert_eq!(cfg.palette.len(), 20);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        std::fs::write(
            &path,
            r#"{ "layout": { "width": 800, "tiling": { "kind": "slice-dice" } }, "margin": { "top": 10 } }"#,
        )
        .unwrap();
        let cfg = ChartConfig::from_file(&path).unwrap();
        assert_eq!(cfg.layout.width, 800.0);
        assert_eq!(cfg.layout.height, 650.0);
        assert_eq!(cfg.layout.tiling, Tiling::SliceDice);
        assert_eq!(cfg.margin.top, 10.0);
        assert_eq!(cfg.margin.left, 30.0);
        assert_eq!(cfg.legend.per_row, 10);
    }

    #[test]
    fn zero_size_divisor_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        std::fs::write(&path, r#"{ "labels": { "size_divisor": 0 } }"#).unwrap();
        let err = ChartConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, TreemapError::InvalidConfig(_)));
        assert!(err.to_string().contains("size_divisor"));
    }

    #[test]
    fn unbounded_extents_are_rejected() {
        for width in [f64::INFINITY, f64::NAN, 1e17, 0.0, -5.0] {
            let mut cfg = ChartConfig::default();
            cfg.layout.width = width;
            assert!(
                matches!(cfg.validate(), Err(TreemapError::InvalidConfig(_))),
                "width {width} accepted"
            );
        }
        assert!(ChartConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ChartConfig::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
