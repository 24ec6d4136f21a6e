use serde::{Deserialize, Serialize};

use crate::palette::ColorScale;
use crate::treemap::Rect;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    /// Side of the colour swatch.
    pub swatch: f64,
    pub margin_top: f64,
    pub margin_left: f64,
    /// Horizontal room for one swatch plus its label.
    pub item_width: f64,
    pub per_row: usize,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            swatch: 20.0,
            margin_top: 5.0,
            margin_left: 5.0,
            item_width: 150.0,
            per_row: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    pub category: String,
    pub color: String,
    pub swatch: Rect,
    pub label_x: f64,
    pub label_y: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub items: Vec<LegendItem>,
    pub height: f64,
}

/// One swatch per category, in domain order, flowing left to right and
/// wrapping every `per_row` items. Coordinates are relative to the
/// legend's own origin.
pub fn build_legend(scale: &ColorScale, cfg: &LegendConfig) -> Legend {
    let per_row = cfg.per_row.max(1);
    let column = cfg.margin_left + cfg.item_width;
    let row_height = cfg.margin_top + cfg.swatch;

    let items: Vec<LegendItem> = scale
        .domain
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let col = (i % per_row) as f64;
            let row = (i / per_row) as f64;
            let x = cfg.margin_left + column * col;
            let y = cfg.margin_top + row_height * row;
            LegendItem {
                category: category.clone(),
                color: scale.color(category).to_string(),
                swatch: Rect::new(x, y, x + cfg.swatch, y + cfg.swatch),
                label_x: x + cfg.swatch + 3.0,
                label_y: y + cfg.swatch - 3.0,
            }
        })
        .collect();

    let rows = scale.domain.len().div_ceil(per_row).max(1) as f64;
    Legend {
        items,
        height: rows * row_height + cfg.margin_top,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::default_palette;

    fn scale(n: usize) -> ColorScale {
        ColorScale::new((0..n).map(|i| format!("cat{i}")).collect(), default_palette())
    }

    #[test]
    fn first_row_positions() {
        let legend = build_legend(&scale(2), &LegendConfig::default());
        let a = &legend.items[0];
        let b = &legend.items[1];
        assert_eq!((a.swatch.x0, a.swatch.y0), (5.0, 5.0));
        assert_eq!((b.swatch.x0, b.swatch.y0), (160.0, 5.0));
        assert_eq!((a.label_x, a.label_y), (28.0, 22.0));
        assert_eq!(legend.height, 30.0);
    }

    #[test]
    fn eleventh_item_wraps_to_second_row() {
        let legend = build_legend(&scale(11), &LegendConfig::default());
        let item = &legend.items[10];
        assert_eq!((item.swatch.x0, item.swatch.y0), (5.0, 30.0));
        assert_eq!(item.label_y, 47.0);
        assert_eq!(legend.height, 55.0);
    }

    #[test]
    fn swatches_use_scale_colors() {
        let legend = build_legend(&scale(3), &LegendConfig::default());
        let colors: Vec<_> = legend.items.iter().map(|i| i.color.as_str()).collect();
        assert_eq!(colors, ["#a6cee3", "#1f78b4", "#b2df8a"]);
    }
}
