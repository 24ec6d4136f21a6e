use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::model::{Hierarchy, NodeId};

/// Golden ratio, the target aspect ratio of squarified rows.
pub const PHI: f64 = 1.618_033_988_749_895;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Half-open containment, so a point on a shared edge hits one tile.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Tiling {
    Squarify { ratio: f64 },
    Dice,
    Slice,
    SliceDice,
}

impl Default for Tiling {
    fn default() -> Self {
        Tiling::Squarify { ratio: PHI }
    }
}

impl FromStr for Tiling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "squarify" => Ok(Tiling::default()),
            "dice" => Ok(Tiling::Dice),
            "slice" => Ok(Tiling::Slice),
            "slice-dice" | "slicedice" => Ok(Tiling::SliceDice),
            other => Err(format!(
                "unknown tiling {other:?} (expected squarify, dice, slice or slice-dice)"
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreemapLayout {
    pub width: f64,
    pub height: f64,
    pub tiling: Tiling,
    pub padding_inner: f64,
    pub padding_outer: f64,
    pub round: bool,
}

impl Default for TreemapLayout {
    fn default() -> Self {
        Self {
            width: 1650.0,
            height: 650.0,
            tiling: Tiling::default(),
            padding_inner: 0.0,
            padding_outer: 0.0,
            round: false,
        }
    }
}

impl TreemapLayout {
    /// Positions every node of a summed hierarchy. Children must already
    /// be in the order they should be packed.
    pub fn layout(&self, h: &mut Hierarchy) {
        if h.is_empty() {
            return;
        }
        let root = h.root;
        {
            let r = h.node_mut(root);
            r.x0 = 0.0;
            r.y0 = 0.0;
            r.x1 = self.width;
            r.y1 = self.height;
        }

        let mut padding_stack: Vec<f64> = vec![0.0];
        for id in h.pre_order() {
            let depth = h.node(id).depth as usize;
            if padding_stack.len() <= depth + 1 {
                padding_stack.resize(depth + 2, 0.0);
            }
            let p = padding_stack[depth];
            let n = h.node(id);
            let (x0, y0, x1, y1) = collapse(n.x0 + p, n.y0 + p, n.x1 - p, n.y1 - p);
            {
                let n = h.node_mut(id);
                n.x0 = x0;
                n.y0 = y0;
                n.x1 = x1;
                n.y1 = y1;
            }
            if h.node(id).is_leaf() {
                continue;
            }
            let p = self.padding_inner / 2.0;
            padding_stack[depth + 1] = p;
            let inset = self.padding_outer - p;
            let (x0, y0, x1, y1) = collapse(x0 + inset, y0 + inset, x1 - inset, y1 - inset);
            self.tile(h, id, x0, y0, x1, y1);
        }

        if self.round {
            for n in h.nodes.iter_mut() {
                n.x0 = n.x0.round();
                n.y0 = n.y0.round();
                n.x1 = n.x1.round();
                n.y1 = n.y1.round();
            }
        }
    }

    fn tile(&self, h: &mut Hierarchy, parent: NodeId, x0: f64, y0: f64, x1: f64, y1: f64) {
        let children = h.node(parent).children.clone();
        let value = h.node(parent).value;
        match self.tiling {
            Tiling::Squarify { ratio } => squarify(h, &children, value, ratio, x0, y0, x1, y1),
            Tiling::Dice => dice(h, &children, value, x0, y0, x1, y1),
            Tiling::Slice => slice(h, &children, value, x0, y0, x1, y1),
            Tiling::SliceDice => {
                if h.node(parent).depth % 2 == 1 {
                    slice(h, &children, value, x0, y0, x1, y1)
                } else {
                    dice(h, &children, value, x0, y0, x1, y1)
                }
            }
        }
    }
}

fn collapse(mut x0: f64, mut y0: f64, mut x1: f64, mut y1: f64) -> (f64, f64, f64, f64) {
    if x1 < x0 {
        x0 = (x0 + x1) / 2.0;
        x1 = x0;
    }
    if y1 < y0 {
        y0 = (y0 + y1) / 2.0;
        y1 = y0;
    }
    (x0, y0, x1, y1)
}

/// Splits the box horizontally, left to right, proportionally to value.
pub fn dice(h: &mut Hierarchy, nodes: &[NodeId], value: f64, x0: f64, y0: f64, x1: f64, y1: f64) {
    let k = if value != 0.0 { (x1 - x0) / value } else { 0.0 };
    let mut x = x0;
    for id in nodes {
        let n = h.node_mut(*id);
        n.y0 = y0;
        n.y1 = y1;
        n.x0 = x;
        x += n.value * k;
        n.x1 = x;
    }
}

/// Splits the box vertically, top to bottom, proportionally to value.
pub fn slice(h: &mut Hierarchy, nodes: &[NodeId], value: f64, x0: f64, y0: f64, x1: f64, y1: f64) {
    let k = if value != 0.0 { (y1 - y0) / value } else { 0.0 };
    let mut y = y0;
    for id in nodes {
        let n = h.node_mut(*id);
        n.x0 = x0;
        n.x1 = x1;
        n.y0 = y;
        y += n.value * k;
        n.y1 = y;
    }
}

/// Squarified layout: children are packed into rows, each row growing
/// while its worst aspect ratio does not get worse than `ratio` allows.
#[allow(clippy::too_many_arguments)]
pub fn squarify(
    h: &mut Hierarchy,
    nodes: &[NodeId],
    mut value: f64,
    ratio: f64,
    mut x0: f64,
    mut y0: f64,
    x1: f64,
    y1: f64,
) {
    let n = nodes.len();
    let mut i0 = 0;
    let mut i1 = 0;

    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // Skip leading empty nodes; they join the row with zero area.
        let mut sum_value;
        loop {
            sum_value = h.node(nodes[i1]).value;
            i1 += 1;
            if sum_value != 0.0 || i1 >= n {
                break;
            }
        }
        let mut min_value = sum_value;
        let mut max_value = sum_value;
        let alpha = (dy / dx).max(dx / dy) / (value * ratio);
        let mut beta = sum_value * sum_value * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        while i1 < n {
            let node_value = h.node(nodes[i1]).value;
            sum_value += node_value;
            if node_value < min_value {
                min_value = node_value;
            }
            if node_value > max_value {
                max_value = node_value;
            }
            beta = sum_value * sum_value * alpha;
            let new_ratio = (max_value / beta).max(beta / min_value);
            if new_ratio > min_ratio {
                sum_value -= node_value;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = &nodes[i0..i1];
        if dx < dy {
            let y_end = if value != 0.0 { y0 + dy * sum_value / value } else { y1 };
            dice(h, row, sum_value, x0, y0, x1, y_end);
            if value != 0.0 {
                y0 = y_end;
            }
        } else {
            let x_end = if value != 0.0 { x0 + dx * sum_value / value } else { x1 };
            slice(h, row, sum_value, x0, y0, x_end, y1);
            if value != 0.0 {
                x0 = x_end;
            }
        }
        value -= sum_value;
        i0 = i1;
    }
}
