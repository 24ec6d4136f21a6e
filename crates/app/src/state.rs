use anyhow::Context as _;
use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use treemap_core::labels::TextMeasure;
use treemap_core::loader::{LoadMsg, Loader};
use treemap_core::tooltip::TooltipController;
use treemap_core::{render, search, Chart, ChartConfig, DataNode};

/// Measures label text with the fonts egui will actually paint with.
pub struct EguiMetrics {
    ctx: egui::Context,
}

impl EguiMetrics {
    pub fn new(ctx: &egui::Context) -> Self {
        Self { ctx: ctx.clone() }
    }
}

impl TextMeasure for EguiMetrics {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        if font_size <= 0.0 || text.is_empty() {
            return 0.0;
        }
        let font = egui::FontId::proportional(font_size as f32);
        self.ctx.fonts(|f| {
            f.layout_no_wrap(text.to_owned(), font, egui::Color32::WHITE)
                .size()
                .x as f64
        })
    }
}

pub struct AppState {
    pub path: Option<PathBuf>,
    pub cancel: Arc<AtomicBool>,
    pub load_rx: Option<Receiver<LoadMsg>>,
    pub data: Option<DataNode>,
    pub config: ChartConfig,
    pub chart: Option<Chart>,
    /// Diagram size the current chart was laid out for.
    pub chart_size: egui::Vec2,
    pub tooltip: TooltipController,
    pub hovered: Option<usize>,
    pub search: String,
    pub matches: Vec<usize>,
    pub status: String,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            path: None,
            cancel: Arc::new(AtomicBool::new(false)),
            load_rx: None,
            data: None,
            config: ChartConfig::default(),
            chart: None,
            chart_size: egui::Vec2::ZERO,
            tooltip: TooltipController::new(),
            hovered: None,
            search: String::new(),
            matches: Vec::new(),
            status: "Open a hierarchy JSON file to start".to_string(),
        }
    }

    pub fn start_load(&mut self, path: PathBuf) {
        // A load still in flight must not overwrite the new one.
        self.cancel.store(true, Ordering::Relaxed);
        self.cancel = Arc::new(AtomicBool::new(false));

        self.path = Some(path.clone());
        self.data = None;
        self.chart = None;
        self.hovered = None;
        self.tooltip = TooltipController::new();
        self.status = format!("Loading {}…", path.display());

        let (tx, rx): (Sender<LoadMsg>, Receiver<LoadMsg>) = unbounded();
        self.load_rx = Some(rx);
        let cancel = self.cancel.clone();

        std::thread::spawn(move || {
            let loader = Loader::new(cancel);
            loader.load(path, tx);
        });
    }

    pub fn cancel_load(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.load_rx = None;
        self.status = "Load cancelled".to_string();
    }

    pub fn on_loaded(&mut self, data: DataNode) {
        self.status = format!(
            "Loaded {} at {}",
            data.name,
            chrono::Local::now().format("%H:%M:%S")
        );
        self.data = Some(data);
        self.chart = None;
    }

    /// Lays the data out again when the diagram area changed size.
    pub fn ensure_chart(&mut self, size: egui::Vec2, measure: &dyn TextMeasure) {
        let Some(data) = &self.data else { return };
        if self.chart.is_some() && (self.chart_size - size).length() < 0.5 {
            return;
        }
        // Minimised or collapsed; keep the last layout.
        if size.x < 1.0 || size.y < 1.0 {
            return;
        }
        self.config.layout.width = size.x as f64;
        self.config.layout.height = size.y as f64;
        match Chart::build(data, &self.config, measure) {
            Ok(chart) => {
                self.chart = Some(chart);
                self.chart_size = size;
                // Tile indices changed; the old tooltip points at nothing.
                if self.hovered.take().is_some() {
                    self.tooltip.on_mouse_out(Instant::now());
                }
                self.refresh_matches();
            }
            Err(e) => {
                tracing::warn!(error = %e, "chart build failed");
                self.status = e.to_string();
                self.data = None;
            }
        }
    }

    pub fn refresh_matches(&mut self) {
        self.matches = match &self.chart {
            Some(chart) => search::find_tiles(chart, &self.search)
                .into_iter()
                .map(|(i, _)| i)
                .collect(),
            None => Vec::new(),
        };
    }

    /// Feeds the pointer position (diagram coordinates) to the tooltip.
    pub fn hover(&mut self, pointer: Option<(f64, f64)>, page: egui::Pos2, now: Instant) {
        let Some(chart) = &self.chart else { return };
        let tile = pointer.and_then(|(x, y)| chart.tile_at(x, y));
        match tile {
            Some(i) if self.hovered != Some(i) => {
                if let Some(content) = chart.tooltip_content(i) {
                    self.tooltip
                        .on_mouse_over(content, page.x as f64, page.y as f64, now);
                }
                self.hovered = Some(i);
            }
            Some(_) => {}
            None => {
                if self.hovered.take().is_some() {
                    self.tooltip.on_mouse_out(now);
                }
            }
        }
    }

    pub fn export(&mut self, path: &Path) -> anyhow::Result<()> {
        let chart = self.chart.as_ref().context("nothing to export yet")?;
        let text = match path.extension().and_then(|e| e.to_str()) {
            Some("svg") => render::to_svg(chart),
            _ => render::to_html(chart),
        };
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        self.status = format!("Exported {}", path.display());
        Ok(())
    }

    /// Writes the HTML page next to the temp dir and opens it in the browser.
    pub fn open_in_browser(&mut self) -> anyhow::Result<()> {
        let path = std::env::temp_dir().join("treemap-preview.html");
        self.export(&path)?;
        open::that(&path).with_context(|| format!("opening {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use treemap_core::labels::ApproxMetrics;

    fn loaded() -> AppState {
        let mut app = AppState::new();
        app.on_loaded(DataNode::branch(
            "Budget",
            vec![DataNode::branch(
                "Home",
                vec![DataNode::leaf("Rent", "Home", 900.0), DataNode::leaf("Power", "Home", 100.0)],
            )],
        ));
        app
    }

    #[test]
    fn resize_fades_out_open_tooltip() {
        let mut app = loaded();
        app.ensure_chart(egui::vec2(400.0, 300.0), &ApproxMetrics);
        let now = Instant::now();
        app.hover(Some((10.0, 10.0)), egui::pos2(10.0, 10.0), now);
        assert_eq!(app.hovered, Some(0));
        assert!(app.tooltip.is_active());

        app.ensure_chart(egui::vec2(600.0, 300.0), &ApproxMetrics);
        assert_eq!(app.hovered, None);
        assert!(!app.tooltip.is_active());
        assert_eq!(app.tooltip.opacity(Instant::now() + Duration::from_secs(1)), 0.0);
    }

    #[test]
    fn same_size_keeps_hover() {
        let mut app = loaded();
        app.ensure_chart(egui::vec2(400.0, 300.0), &ApproxMetrics);
        app.hover(Some((10.0, 10.0)), egui::pos2(10.0, 10.0), Instant::now());
        app.ensure_chart(egui::vec2(400.2, 300.0), &ApproxMetrics);
        assert_eq!(app.hovered, Some(0));
        assert!(app.tooltip.is_active());
    }

    #[test]
    fn collapsed_area_keeps_data_and_chart() {
        let mut app = loaded();
        app.ensure_chart(egui::vec2(400.0, 300.0), &ApproxMetrics);
        app.ensure_chart(egui::vec2(0.0, 0.0), &ApproxMetrics);
        assert!(app.data.is_some());
        assert!(app.chart.is_some());
    }
}
