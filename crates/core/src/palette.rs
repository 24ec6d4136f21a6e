use serde::{Deserialize, Serialize};

use crate::model::Hierarchy;

pub const SCHEME_PAIRED: [&str; 12] = [
    "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c", "#fdbf6f", "#ff7f00",
    "#cab2d6", "#6a3d9a", "#ffff99", "#b15928",
];

pub const SCHEME_DARK2: [&str; 8] = [
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#666666",
];

pub const FALLBACK_COLOR: &str = "#cccccc";

/// The default 20-colour range: paired followed by dark2.
pub fn default_palette() -> Vec<String> {
    SCHEME_PAIRED
        .iter()
        .chain(SCHEME_DARK2.iter())
        .map(|c| c.to_string())
        .collect()
}

/// Names of the non-root internal nodes, in breadth-first order, without
/// duplicates. After a descending sort the biggest groups come first.
pub fn category_domain(h: &Hierarchy) -> Vec<String> {
    let mut domain: Vec<String> = Vec::new();
    for id in h.descendants() {
        let n = h.node(id);
        if n.depth != 0 && n.height > 0 && !domain.contains(&n.name) {
            domain.push(n.name.clone());
        }
    }
    domain
}

/// Ordinal scale from category name to colour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorScale {
    pub domain: Vec<String>,
    pub range: Vec<String>,
}

impl ColorScale {
    pub fn new(domain: Vec<String>, range: Vec<String>) -> Self {
        Self { domain, range }
    }

    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.domain.iter().position(|c| c == category)
    }

    /// Colour for a category. The range wraps when there are more
    /// categories than colours.
    pub fn color(&self, category: &str) -> &str {
        match self.index_of(category) {
            Some(i) if !self.range.is_empty() => &self.range[i % self.range.len()],
            _ => FALLBACK_COLOR,
        }
    }
}

/// Parses `#rgb` or `#rrggbb`.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => Some((
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataNode;

    #[test]
    fn palette_has_twenty_distinct_colors() {
        let p = default_palette();
        assert_eq!(p.len(), 20);
        let mut dedup = p.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 20);
    }

    #[test]
    fn domain_follows_sorted_group_order() {
        let data = DataNode::branch(
            "root",
            vec![
                DataNode::branch("Small", vec![DataNode::leaf("a", "Small", 1.0)]),
                DataNode::branch("Big", vec![DataNode::leaf("b", "Big", 9.0)]),
            ],
        );
        let mut h = Hierarchy::from_data(&data).unwrap();
        h.sum().sort_by_value_desc();
        assert_eq!(category_domain(&h), ["Big", "Small"]);
    }

    #[test]
    fn colors_wrap_and_fall_back() {
        let domain: Vec<String> = (0..3).map(|i| format!("c{i}")).collect();
        let scale = ColorScale::new(domain, vec!["#000000".into(), "#ffffff".into()]);
        assert_eq!(scale.color("c0"), "#000000");
        assert_eq!(scale.color("c2"), "#000000");
        assert_eq!(scale.color("nope"), FALLBACK_COLOR);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex("#1f78b4"), Some((0x1f, 0x78, 0xb4)));
        assert_eq!(parse_hex("#fff"), Some((255, 255, 255)));
        assert_eq!(parse_hex("red"), None);
        assert_eq!(parse_hex("#aéaba"), None);
        assert_eq!(parse_hex("#é1"), None);
    }
}
