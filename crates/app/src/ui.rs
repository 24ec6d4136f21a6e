use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui};
use std::time::Instant;
use treemap_core::human::human_value;
use treemap_core::loader::LoadMsg;
use treemap_core::palette::parse_hex;
use treemap_core::Chart;

use crate::state::{AppState, EguiMetrics};

pub fn draw(app: &mut AppState, ctx: &egui::Context) {
    poll_load(app, ctx);

    egui::TopBottomPanel::top("top").show(ctx, |ui| {
        top_bar(ui, app);
    });

    egui::TopBottomPanel::bottom("legend").show(ctx, |ui| {
        legend(ui, app);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        if app.data.is_none() {
            ui.centered_and_justified(|ui| ui.label(&app.status));
            return;
        }
        if let Some(chart) = &app.chart {
            ui.vertical_centered(|ui| {
                ui.heading(&chart.title);
                if !chart.description.is_empty() {
                    ui.label(&chart.description);
                }
            });
        }
        diagram(ui, app, ctx);
    });

    paint_tooltip(app, ctx);
}

fn top_bar(ui: &mut Ui, app: &mut AppState) {
    ui.horizontal(|ui| {
        if ui.button("Open JSON…").clicked() {
            if let Some(path) = rfd::FileDialog::new().add_filter("json", &["json"]).pick_file() {
                app.start_load(path);
            }
        }
        if app.load_rx.is_some() && ui.button("Cancel").clicked() {
            app.cancel_load();
        }
        ui.separator();
        if ui.button("Export…").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("svg", &["svg"])
                .add_filter("html", &["html"])
                .save_file()
            {
                if let Err(e) = app.export(&path) {
                    app.status = format!("{e:#}");
                }
            }
        }
        if ui.button("Open in browser").clicked() {
            if let Err(e) = app.open_in_browser() {
                app.status = format!("{e:#}");
            }
        }
        ui.separator();
        ui.label("Search:");
        if ui.text_edit_singleline(&mut app.search).changed() {
            app.refresh_matches();
        }
        if !app.search.is_empty() {
            ui.label(format!("{} found", app.matches.len()));
        }
        ui.separator();
        ui.label(&app.status);
    });
}

fn legend(ui: &mut Ui, app: &AppState) {
    let Some(chart) = &app.chart else { return };
    ui.horizontal_wrapped(|ui| {
        for item in &chart.legend.items {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
            ui.painter().rect_filled(rect, 0.0, color(&item.color));
            ui.painter().rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::BLACK));
            ui.label(&item.category);
            ui.add_space(8.0);
        }
    });
}

fn diagram(ui: &mut Ui, app: &mut AppState, ctx: &egui::Context) {
    let (area, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    app.ensure_chart(area.size(), &EguiMetrics::new(ctx));
    let Some(chart) = &app.chart else { return };

    let painter = ui.painter_at(area);
    let origin = area.min;
    for (i, tile) in chart.tiles.iter().enumerate() {
        let rect = tile_rect(chart, i, origin);
        if rect.area() <= 0.0 {
            continue;
        }
        painter.rect_filled(rect, 0.0, color(&tile.color));
        let stroke = if app.matches.contains(&i) {
            Stroke::new(2.5, Color32::BLACK)
        } else {
            Stroke::new(1.0, Color32::WHITE)
        };
        painter.rect_stroke(rect, 0.0, stroke);

        let labels = &chart.config.labels;
        let size = tile.label.font_size as f32;
        if size < 1.0 {
            continue;
        }
        let clipped = painter.with_clip_rect(rect.intersect(area));
        for (line_no, line) in tile.label.lines.iter().enumerate() {
            let pos = rect.min
                + egui::vec2(
                    labels.offset_x as f32,
                    4.0 + line_no as f32 * labels.line_spacing_em as f32 * size,
                );
            clipped.text(pos, Align2::LEFT_TOP, line, FontId::proportional(size), Color32::from_gray(20));
        }
    }

    let now = Instant::now();
    let pointer = response
        .hover_pos()
        .map(|p| ((p.x - origin.x) as f64, (p.y - origin.y) as f64));
    let page = response.hover_pos().unwrap_or(Pos2::ZERO);
    app.hover(pointer, page, now);
    if app.tooltip.is_animating(now) {
        ctx.request_repaint();
    }
}

fn tile_rect(chart: &Chart, i: usize, origin: Pos2) -> Rect {
    let r = &chart.tiles[i].rect;
    Rect::from_min_max(
        origin + egui::vec2(r.x0 as f32, r.y0 as f32),
        origin + egui::vec2(r.x1 as f32, r.y1 as f32),
    )
}

fn paint_tooltip(app: &AppState, ctx: &egui::Context) {
    let opacity = app.tooltip.opacity(Instant::now());
    let Some(content) = app.tooltip.content() else { return };
    if opacity <= 0.0 {
        return;
    }
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Tooltip,
        egui::Id::new("tile-tooltip"),
    ));
    let text = format!(
        "Name: {}\nCategory: {}\nValue: {}",
        content.name,
        content.category,
        human_value(content.value)
    );
    let galley = painter.layout_no_wrap(text, FontId::proportional(13.0), Color32::WHITE.gamma_multiply(opacity));
    let (left, top) = app.tooltip.position();
    let pos = egui::pos2(left as f32, top as f32);
    let frame = Rect::from_min_size(pos, galley.size() + egui::vec2(16.0, 12.0));
    painter.rect_filled(frame, 4.0, Color32::from_black_alpha((opacity * 230.0) as u8));
    painter.galley(pos + egui::vec2(8.0, 6.0), galley, Color32::WHITE);
}

fn color(hex: &str) -> Color32 {
    let (r, g, b) = parse_hex(hex).unwrap_or((204, 204, 204));
    Color32::from_rgb(r, g, b)
}

fn poll_load(app: &mut AppState, ctx: &egui::Context) {
    // Take ownership of the receiver to avoid borrowing while we might assign to it.
    let Some(rx) = app.load_rx.take() else { return; };
    let mut had_msg = false;
    let mut finished = false;
    while let Ok(msg) = rx.try_recv() {
        had_msg = true;
        match msg {
            LoadMsg::Started { path } => {
                tracing::debug!(path = %path.display(), "load started");
            }
            LoadMsg::Loaded(data) => {
                app.on_loaded(data);
                finished = true;
                break;
            }
            LoadMsg::Error(e) => {
                app.status = e;
                finished = true;
                break;
            }
        }
    }
    if !finished {
        // Put the receiver back to keep polling next frame
        app.load_rx = Some(rx);
        ctx.request_repaint();
    }
    if had_msg {
        ctx.request_repaint();
    }
}
