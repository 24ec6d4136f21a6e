//! SVG and standalone HTML output for a built chart.

use std::fmt::Write as _;

use crate::chart::{Chart, Tile};
use crate::tooltip::{FADE_IN, FADE_OUT, OFFSET_X, OFFSET_Y, SHOWN_OPACITY};

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Compact number for attributes: at most two decimals, no trailing zeros.
pub(crate) fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

pub fn to_svg(chart: &Chart) -> String {
    let cfg = &chart.config;
    let m = &cfg.margin;
    let mut out = String::with_capacity(64 * 1024);

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = num(chart.svg_width()),
        h = num(chart.svg_height()),
    );
    let cx = num(m.left + cfg.layout.width / 2.0);
    let _ = writeln!(
        out,
        r#"  <text id="title" x="{cx}" y="{y}" text-anchor="middle" font-size="28">{}</text>"#,
        escape(&chart.title),
        y = num(m.top * 0.45),
    );
    let _ = writeln!(
        out,
        r#"  <text id="description" x="{cx}" y="{y}" text-anchor="middle" font-size="16">{}</text>"#,
        escape(&chart.description),
        y = num(m.top * 0.75),
    );

    let _ = writeln!(
        out,
        r#"  <g id="diagram" transform="translate({},{})">"#,
        num(m.left),
        num(m.top)
    );
    for tile in &chart.tiles {
        write_tile(&mut out, tile, &cfg.tile_stroke, cfg.labels.offset_x, cfg.labels.offset_y);
    }
    out.push_str("  </g>\n");

    let _ = writeln!(
        out,
        r#"  <g id="legend" transform="translate({},{})">"#,
        num(m.left),
        num(m.top + cfg.layout.height)
    );
    let swatch = cfg.legend.swatch;
    for item in &chart.legend.items {
        let _ = writeln!(
            out,
            r#"    <rect class="legend-item" x="{}" y="{}" width="{s}" height="{s}" fill="{}" stroke="black"/>"#,
            num(item.swatch.x0),
            num(item.swatch.y0),
            escape(&item.color),
            s = num(swatch),
        );
        let _ = writeln!(
            out,
            r#"    <text x="{}" y="{}" font-size="14">{}</text>"#,
            num(item.label_x),
            num(item.label_y),
            escape(&item.category)
        );
    }
    out.push_str("  </g>\n</svg>\n");
    out
}

fn write_tile(out: &mut String, tile: &Tile, stroke: &str, dx: f64, dy: f64) {
    let r = &tile.rect;
    let _ = writeln!(
        out,
        r#"    <g transform="translate({},{})">"#,
        num(r.x0),
        num(r.y0)
    );
    let _ = writeln!(
        out,
        r#"      <rect class="tile" width="{}" height="{}" fill="{}" stroke="{}" data-name="{}" data-category="{}" data-value="{}"><title>{}</title></rect>"#,
        num(r.width()),
        num(r.height()),
        escape(&tile.color),
        escape(stroke),
        escape(&tile.name),
        escape(&tile.category),
        tile.value,
        escape(&format!("{} ({}): {}", tile.name, tile.category, tile.value)),
    );
    if !tile.label.lines.is_empty() {
        let class = if tile.label.truncated { r#" class="wordwrapped""# } else { "" };
        let _ = write!(
            out,
            r#"      <text{class} dx="{}" dy="{}" font-size="{}" pointer-events="none">"#,
            num(dx),
            num(dy),
            num(tile.label.font_size)
        );
        for line in &tile.label.lines {
            let _ = write!(
                out,
                r#"<tspan x="0" dx="0.15em" dy="0.9em">{}</tspan>"#,
                escape(line)
            );
        }
        out.push_str("</text>\n");
    }
    out.push_str("    </g>\n");
}

/// A self-contained page: the SVG, the floating tooltip and the script
/// that drives it.
pub fn to_html(chart: &Chart) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<main>
{svg}</main>
<div id="tooltip" class="tooltip" data-value="0" style="opacity: 0"></div>
<script>{js}</script>
</body>
</html>
"#,
        title = escape(&chart.title),
        css = inline_css(),
        svg = to_svg(chart),
        js = inline_javascript(),
    )
}

fn inline_css() -> &'static str {
    r#"
body { margin: 0; background: #fafafa; color: #222; font-family: sans-serif; }
main { display: flex; justify-content: center; }
rect.tile:hover { fill-opacity: 0.8; }
.tooltip {
  position: absolute;
  pointer-events: none;
  padding: 6px 8px;
  background: rgba(30, 30, 30, 0.9);
  color: #fff;
  border-radius: 4px;
  font-size: 13px;
  line-height: 1.4;
}
"#
}

fn inline_javascript() -> String {
    format!(
        r#"
(function () {{
  var tip = document.getElementById("tooltip");
  function esc(s) {{
    var d = document.createElement("div");
    d.textContent = s;
    return d.innerHTML;
  }}
  document.querySelectorAll("rect.tile").forEach(function (tile) {{
    tile.addEventListener("mouseover", function (e) {{
      var d = tile.dataset;
      tip.innerHTML = "Name: " + esc(d.name) + "<br>Category: " + esc(d.category) + "<br>Value: " + esc(d.value);
      tip.setAttribute("data-value", d.value);
      tip.style.left = (e.pageX + {ox}) + "px";
      tip.style.top = (e.pageY + {oy}) + "px";
      tip.style.transition = "opacity {fade_in}ms";
      tip.style.opacity = {shown};
    }});
    tile.addEventListener("mouseout", function () {{
      tip.style.transition = "opacity {fade_out}ms";
      tip.style.opacity = 0;
    }});
  }});
}})();
"#,
        ox = OFFSET_X,
        oy = OFFSET_Y,
        fade_in = FADE_IN.as_millis(),
        fade_out = FADE_OUT.as_millis(),
        shown = SHOWN_OPACITY,
    )
}
