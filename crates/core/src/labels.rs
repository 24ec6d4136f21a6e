//! Fits tile names into their rectangles: pick a font size from the tile
//! width, then wrap words greedily and cut with an ellipsis when the
//! text runs out of room.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const ELLIPSIS: &str = "...";

/// Text measurement used by the fitter. Implementations must be cheap;
/// the fitter calls them many times per tile.
pub trait TextMeasure: Sync {
    fn text_width(&self, text: &str, font_size: f64) -> f64;

    /// Height of a single rendered line.
    fn line_height(&self, font_size: f64) -> f64 {
        font_size * 1.15
    }
}

/// Width estimate for a generic sans-serif face, in ems per character.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMetrics;

impl ApproxMetrics {
    fn char_em(c: char) -> f64 {
        match c {
            ' ' | 'i' | 'j' | 'l' | 'I' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.28,
            'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' | '/' => 0.35,
            'm' | 'w' => 0.8,
            'M' | 'W' => 0.85,
            '0'..='9' => 0.56,
            c if c.is_ascii_uppercase() => 0.67,
            c if c.is_ascii_lowercase() => 0.52,
            c if c.is_ascii() => 0.56,
            _ => 0.9,
        }
    }
}

impl TextMeasure for ApproxMetrics {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(Self::char_em).sum::<f64>() * font_size
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Smallest size the shrink loop will go down to.
    pub min_font_size: f64,
    /// Initial size is the tile width divided by this.
    pub size_divisor: f64,
    /// Baseline advance between wrapped lines, in ems.
    pub line_spacing_em: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            min_font_size: 12.0,
            size_divisor: 5.0,
            line_spacing_em: 0.9,
            offset_x: 4.0,
            offset_y: 15.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FittedLabel {
    pub font_size: f64,
    pub lines: Vec<String>,
    pub truncated: bool,
}

fn words(name: &str) -> impl Iterator<Item = &str> {
    name.split(' ').filter(|w| !w.is_empty())
}

/// Starts at `width / size_divisor` and shrinks one pixel at a time while
/// the first word does not fit, stopping at the minimum size.
pub fn fit_font_size(m: &dyn TextMeasure, cfg: &LabelConfig, name: &str, width: f64, height: f64) -> f64 {
    let first = words(name).next().unwrap_or("");
    let mut size = width / cfg.size_divisor;
    if !size.is_finite() {
        return cfg.min_font_size;
    }
    // Every size above the box height fails the height test, so skip
    // those steps in one go. The fractional part is kept.
    let floor = height.max(cfg.min_font_size);
    if size > floor {
        size -= (size - floor).ceil();
    }
    while (m.text_width(first, size) >= width || m.line_height(size) >= height)
        && size > cfg.min_font_size
    {
        size -= 1.0;
    }
    size
}

fn block_height(m: &dyn TextMeasure, cfg: &LabelConfig, lines: usize, size: f64) -> f64 {
    if lines == 0 {
        return 0.0;
    }
    m.line_height(size) + (lines - 1) as f64 * cfg.line_spacing_em * size
}

/// Longest prefix of `text` that fits in `width` once the ellipsis is added.
fn cut_to_fit(m: &dyn TextMeasure, text: &str, size: f64, width: f64) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    for end in (1..chars.len()).rev() {
        let candidate: String = chars[..end].iter().collect::<String>() + ELLIPSIS;
        if m.text_width(&candidate, size) <= width {
            return Some(candidate);
        }
    }
    None
}

/// Greedy word wrap. Returns the lines and whether text was dropped.
pub fn wrap_words(
    m: &dyn TextMeasure,
    cfg: &LabelConfig,
    name: &str,
    size: f64,
    width: f64,
    height: f64,
) -> (Vec<String>, bool) {
    let mut pending: VecDeque<&str> = words(name).collect();
    let mut lines: Vec<String> = Vec::new();
    let mut line: Vec<&str> = Vec::new();
    let mut truncated = false;

    while let Some(word) = pending.pop_front() {
        line.push(word);
        let candidate = match pending.front() {
            Some(next) => format!("{} {}", line.join(" "), next),
            None => line.join(" "),
        };
        if m.text_width(&candidate, size) < width && !pending.is_empty() {
            continue;
        }

        let text = line.join(" ");
        if m.text_width(&text, size) > width {
            match lines.last_mut() {
                Some(prev) => prev.push_str(ELLIPSIS),
                None => lines.extend(cut_to_fit(m, &text, size, width)),
            }
            truncated = true;
            break;
        }
        lines.push(text);

        if block_height(m, cfg, lines.len(), size) > height && !pending.is_empty() {
            if let Some(last) = lines.last_mut() {
                last.push_str(ELLIPSIS);
            }
            truncated = true;
            break;
        }
        line.clear();
    }
    (lines, truncated)
}

pub fn fit_label(m: &dyn TextMeasure, cfg: &LabelConfig, name: &str, width: f64, height: f64) -> FittedLabel {
    let font_size = fit_font_size(m, cfg, name, width, height);
    let (lines, truncated) = wrap_words(m, cfg, name, font_size, width, height);
    FittedLabel {
        font_size,
        lines,
        truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is exactly one em wide.
    struct Mono;

    impl TextMeasure for Mono {
        fn text_width(&self, text: &str, font_size: f64) -> f64 {
            text.chars().count() as f64 * font_size
        }

        fn line_height(&self, font_size: f64) -> f64 {
            font_size
        }
    }

    fn cfg() -> LabelConfig {
        LabelConfig::default()
    }

    #[test]
    fn font_starts_at_a_fifth_of_width_when_it_fits() {
        // "ab" at 20px is 40 wide, inside a 100 wide box.
        assert_eq!(fit_font_size(&Mono, &cfg(), "ab cd", 100.0, 100.0), 20.0);
    }

    #[test]
    fn font_shrinks_until_first_word_fits() {
        // "abcdefgh" needs size < 100/8 = 12.5, so 13 is too big but 12 stops.
        let size = fit_font_size(&Mono, &cfg(), "abcdefgh", 100.0, 100.0);
        assert_eq!(size, 12.0);
    }

    #[test]
    fn font_never_shrinks_below_minimum() {
        let size = fit_font_size(&Mono, &cfg(), "averyveryverylongword", 100.0, 100.0);
        assert_eq!(size, 12.0);
    }

    #[test]
    fn narrow_tiles_start_below_minimum() {
        assert_eq!(fit_font_size(&Mono, &cfg(), "a", 30.0, 100.0), 6.0);
    }

    #[test]
    fn infinite_start_size_falls_back_to_minimum() {
        assert_eq!(fit_font_size(&Mono, &cfg(), "abc", f64::INFINITY, 50.0), 12.0);
        let zero_divisor = LabelConfig {
            size_divisor: 0.0,
            ..cfg()
        };
        assert_eq!(fit_font_size(&Mono, &zero_divisor, "abc", 100.0, 50.0), 12.0);
    }

    #[test]
    fn very_wide_tile_starts_from_box_height() {
        // 1e6 / 5 would take 200k single steps; it lands on 40 and then
        // shrinks once because a 40 tall line does not fit in 40.
        assert_eq!(fit_font_size(&Mono, &cfg(), "ab", 1.0e6, 40.0), 39.0);
        assert_eq!(fit_font_size(&Mono, &cfg(), "ab", 1.0e15, 40.0), 39.0);
    }

    #[test]
    fn words_wrap_onto_lines() {
        let (lines, truncated) = wrap_words(&Mono, &cfg(), "aa bb cc", 10.0, 55.0, 100.0);
        assert_eq!(lines, ["aa bb", "cc"]);
        assert!(!truncated);
    }

    #[test]
    fn overflowing_word_marks_previous_line() {
        let (lines, truncated) = wrap_words(&Mono, &cfg(), "aa bbbbbbbb", 10.0, 55.0, 100.0);
        assert_eq!(lines, ["aa..."]);
        assert!(truncated);
    }

    #[test]
    fn overflowing_first_word_is_cut() {
        let (lines, truncated) = wrap_words(&Mono, &cfg(), "abcdefghij", 10.0, 60.0, 100.0);
        assert_eq!(lines, ["abc..."]);
        assert!(truncated);
    }

    #[test]
    fn too_many_lines_get_ellipsis() {
        // Each line holds one word; the box fits two lines (10 + 9 = 19).
        let (lines, truncated) = wrap_words(&Mono, &cfg(), "aa bb cc dd", 10.0, 25.0, 19.5);
        assert_eq!(lines, ["aa", "bb", "cc..."]);
        assert!(truncated);
    }

    #[test]
    fn empty_name_has_no_lines() {
        let label = fit_label(&Mono, &cfg(), "", 100.0, 100.0);
        assert!(label.lines.is_empty());
        assert!(!label.truncated);
    }

    #[test]
    fn approx_metrics_scale_with_size() {
        let m = ApproxMetrics;
        let w12 = m.text_width("Pebble", 12.0);
        let w24 = m.text_width("Pebble", 24.0);
        assert!((w24 - 2.0 * w12).abs() < 1e-9);
        assert!(m.text_width("mmm", 12.0) > m.text_width("iii", 12.0));
    }
}
