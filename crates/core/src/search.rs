use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::chart::Chart;

/// Tiles whose name matches `needle`, best match first, as
/// `(tile index, score)`.
pub fn find_tiles(chart: &Chart, needle: &str) -> Vec<(usize, i64)> {
    if needle.trim().is_empty() {
        return Vec::new();
    }
    let m = SkimMatcherV2::default();
    let mut hits: Vec<(usize, i64)> = chart
        .tiles
        .iter()
        .enumerate()
        .filter_map(|(i, t)| m.fuzzy_match(&t.name, needle).map(|s| (i, s)))
        .collect();
    hits.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::labels::ApproxMetrics;
    use crate::model::DataNode;

    #[test]
    fn finds_by_partial_name() {
        let data = DataNode::branch(
            "Games",
            vec![DataNode::branch(
                "Wii",
                vec![
                    DataNode::leaf("Wii Sports", "Wii", 82.53),
                    DataNode::leaf("Mario Kart Wii", "Wii", 35.52),
                    DataNode::leaf("Wii Fit", "Wii", 22.72),
                ],
            )],
        );
        let chart = Chart::build(&data, &ChartConfig::default(), &ApproxMetrics).unwrap();
        let hits = find_tiles(&chart, "kart");
        assert_eq!(hits.len(), 1);
        assert_eq!(chart.tiles[hits[0].0].name, "Mario Kart Wii");
        assert!(find_tiles(&chart, "  ").is_empty());
        assert_eq!(chart.tiles[find_tiles(&chart, "spt")[0].0].name, "Wii Sports");
    }
}
