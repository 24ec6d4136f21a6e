use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ChartConfig;
use crate::dataset::heading_for;
use crate::error::{Result, TreemapError};
use crate::labels::{fit_label, FittedLabel, TextMeasure};
use crate::legend::{build_legend, Legend};
use crate::model::{DataNode, Hierarchy, NodeId};
use crate::palette::{category_domain, ColorScale};
use crate::tooltip::TooltipContent;
use crate::treemap::Rect;

/// A leaf of the hierarchy, placed and styled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: NodeId,
    pub name: String,
    pub category: String,
    pub value: f64,
    /// Diagram coordinates, without the chart margins.
    pub rect: Rect,
    pub color: String,
    pub label: FittedLabel,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chart {
    pub root_name: String,
    pub title: String,
    pub description: String,
    pub total: f64,
    pub tiles: Vec<Tile>,
    pub scale: ColorScale,
    pub legend: Legend,
    pub config: ChartConfig,
}

impl Chart {
    pub fn build(data: &DataNode, config: &ChartConfig, measure: &dyn TextMeasure) -> Result<Chart> {
        config.validate()?;
        let mut h = Hierarchy::from_data(data)?;
        h.sum().sort_by_value_desc();
        let total = h.node(h.root).value;
        if total.is_nan() || total <= 0.0 {
            return Err(TreemapError::EmptyHierarchy);
        }
        config.layout.layout(&mut h);

        let scale = ColorScale::new(category_domain(&h), config.palette.clone());
        let leaves = h.leaves();
        let labels = &config.labels;
        let tiles: Vec<Tile> = leaves
            .par_iter()
            .map(|id| {
                let n = h.node(*id);
                let category = n
                    .category
                    .clone()
                    .or_else(|| n.parent.map(|p| h.node(p).name.clone()))
                    .unwrap_or_else(|| n.name.clone());
                let rect = Rect::new(n.x0, n.y0, n.x1, n.y1);
                Tile {
                    id: n.id,
                    name: n.name.clone(),
                    color: scale.color(&category).to_string(),
                    category,
                    value: n.value,
                    label: fit_label(measure, labels, &n.name, rect.width(), rect.height()),
                    rect,
                }
            })
            .collect();

        let legend = build_legend(&scale, &config.legend);
        let (title, description) = heading_for(&data.name);
        tracing::info!(
            tiles = tiles.len(),
            categories = scale.domain.len(),
            total,
            "chart built"
        );

        Ok(Chart {
            root_name: data.name.clone(),
            title,
            description,
            total,
            tiles,
            scale,
            legend,
            config: config.clone(),
        })
    }

    pub fn svg_width(&self) -> f64 {
        self.config.svg_width()
    }

    /// Total height; the legend sits in the bottom margin and grows it
    /// when there are too many rows.
    pub fn svg_height(&self) -> f64 {
        let m = &self.config.margin;
        m.top + self.config.layout.height + m.bottom.max(self.legend.height)
    }

    /// Index of the tile under a point in diagram coordinates.
    pub fn tile_at(&self, x: f64, y: f64) -> Option<usize> {
        self.tiles
            .iter()
            .position(|t| t.rect.area() > 0.0 && t.rect.contains(x, y))
    }

    pub fn tooltip_content(&self, index: usize) -> Option<TooltipContent> {
        self.tiles.get(index).map(|t| TooltipContent {
            tile: index,
            name: t.name.clone(),
            category: t.category.clone(),
            value: t.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::ApproxMetrics;

    fn data() -> DataNode {
        DataNode::branch(
            "Movies",
            vec![
                DataNode::branch(
                    "Action",
                    vec![
                        DataNode::leaf("Avatar", "Action", 760.0),
                        DataNode::leaf("The Avengers", "Action", 623.0),
                    ],
                ),
                DataNode::branch("Drama", vec![DataNode::leaf("Titanic", "Drama", 658.0)]),
                DataNode::branch(
                    "Family",
                    vec![DataNode {
                        category: None,
                        ..DataNode::leaf("Frozen", "", 400.0)
                    }],
                ),
            ],
        )
    }

    #[test]
    fn tiles_are_leaves_in_layout_order() {
        let chart = Chart::build(&data(), &ChartConfig::default(), &ApproxMetrics).unwrap();
        let names: Vec<_> = chart.tiles.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Avatar", "The Avengers", "Titanic", "Frozen"]);
        assert_eq!(chart.total, 2441.0);
        assert_eq!(chart.title, "Movie Sales");
    }

    #[test]
    fn missing_category_falls_back_to_parent() {
        let chart = Chart::build(&data(), &ChartConfig::default(), &ApproxMetrics).unwrap();
        let frozen = chart.tiles.iter().find(|t| t.name == "Frozen").unwrap();
        assert_eq!(frozen.category, "Family");
        assert_eq!(frozen.color, chart.scale.color("Family"));
    }

    #[test]
    fn tiles_in_one_category_share_a_color() {
        let chart = Chart::build(&data(), &ChartConfig::default(), &ApproxMetrics).unwrap();
        assert_eq!(chart.tiles[0].color, chart.tiles[1].color);
        assert_ne!(chart.tiles[0].color, chart.tiles[2].color);
        assert_eq!(chart.legend.items.len(), 3);
    }

    #[test]
    fn hit_testing_finds_tile() {
        let chart = Chart::build(&data(), &ChartConfig::default(), &ApproxMetrics).unwrap();
        let t = &chart.tiles[2];
        let cx = (t.rect.x0 + t.rect.x1) / 2.0;
        let cy = (t.rect.y0 + t.rect.y1) / 2.0;
        assert_eq!(chart.tile_at(cx, cy), Some(2));
        assert_eq!(chart.tile_at(-1.0, -1.0), None);
        assert_eq!(chart.tooltip_content(2).unwrap().name, "Titanic");
    }

    #[test]
    fn bad_label_config_fails_instead_of_hanging() {
        let mut cfg = ChartConfig::default();
        cfg.labels.size_divisor = 0.0;
        assert!(matches!(
            Chart::build(&data(), &cfg, &ApproxMetrics),
            Err(TreemapError::InvalidConfig(_))
        ));

        let mut cfg = ChartConfig::default();
        cfg.layout.width = 1e17;
        assert!(matches!(
            Chart::build(&data(), &cfg, &ApproxMetrics),
            Err(TreemapError::InvalidConfig(_))
        ));
    }

    #[test]
    fn wide_chart_builds_in_bounded_time() {
        let mut cfg = ChartConfig::default();
        cfg.layout.width = crate::config::MAX_EXTENT;
        cfg.layout.height = 40.0;
        let chart = Chart::build(&data(), &cfg, &ApproxMetrics).unwrap();
        assert!(chart.tiles.iter().all(|t| t.label.font_size <= 40.0));
    }

    #[test]
    fn zero_total_is_rejected() {
        let empty = DataNode::branch("Nothing", vec![DataNode::branch("Empty", vec![])]);
        assert!(matches!(
            Chart::build(&empty, &ChartConfig::default(), &ApproxMetrics),
            Err(TreemapError::EmptyHierarchy)
        ));
    }
}
