use crate::chart::Chart;
use crate::error::{Result, TreemapError};
use crate::palette::parse_hex;

pub fn to_csv(chart: &Chart, mut w: impl std::io::Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record(["name", "category", "value", "x0", "y0", "x1", "y1", "color"])?;
    for t in &chart.tiles {
        writer.write_record([
            t.name.clone(),
            t.category.clone(),
            t.value.to_string(),
            t.rect.x0.to_string(),
            t.rect.y0.to_string(),
            t.rect.x1.to_string(),
            t.rect.y1.to_string(),
            t.color.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_json(chart: &Chart) -> serde_json::Value {
    serde_json::json!({
        "title": chart.title,
        "description": chart.description,
        "generated": chart_timestamp(),
        "width": chart.config.layout.width,
        "height": chart.config.layout.height,
        "total": chart.total,
        "tiles": chart.tiles.iter().map(|t| serde_json::json!({
            "id": t.id.0,
            "name": t.name,
            "category": t.category,
            "value": t.value,
            "x0": t.rect.x0,
            "y0": t.rect.y0,
            "x1": t.rect.x1,
            "y1": t.rect.y1,
            "color": t.color,
            "label": t.label.lines,
            "font_size": t.label.font_size,
        })).collect::<Vec<_>>(),
        "legend": chart.legend.items.iter().map(|i| serde_json::json!({
            "category": i.category,
            "color": i.color,
        })).collect::<Vec<_>>(),
    })
}

fn chart_timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}

const MM_PER_PX: f64 = 25.4 / 96.0;

/// A one-page PDF with the title and filled tile rectangles.
pub fn to_pdf(chart: &Chart, out: &std::path::Path) -> Result<()> {
    use printpdf::path::{PaintMode, WindingOrder};
    use printpdf::*;

    let pdf_err = |e: printpdf::Error| TreemapError::Pdf(e.to_string());
    let mm = |px: f64| Mm((px * MM_PER_PX) as f32);

    let page_w = chart.svg_width();
    let page_h = chart.svg_height();
    let (doc, page1, layer1) = PdfDocument::new(&chart.title, mm(page_w), mm(page_h), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;

    let m = &chart.config.margin;
    // PDF space grows upwards.
    let flip = |y: f64| page_h - y;

    layer.set_fill_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));
    layer.use_text(chart.title.as_str(), 14.0, mm(m.left), mm(flip(m.top * 0.45)), &font);

    layer.set_outline_color(Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None)));
    layer.set_outline_thickness(0.5);
    for t in &chart.tiles {
        if t.rect.area() <= 0.0 {
            continue;
        }
        let (r, g, b) = parse_hex(&t.color).unwrap_or((204, 204, 204));
        layer.set_fill_color(Color::Rgb(Rgb::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            None,
        )));
        let x0 = m.left + t.rect.x0;
        let x1 = m.left + t.rect.x1;
        let y0 = flip(m.top + t.rect.y0);
        let y1 = flip(m.top + t.rect.y1);
        let ring = vec![
            (Point::new(mm(x0), mm(y0)), false),
            (Point::new(mm(x1), mm(y0)), false),
            (Point::new(mm(x1), mm(y1)), false),
            (Point::new(mm(x0), mm(y1)), false),
        ];
        layer.add_polygon(Polygon {
            rings: vec![ring],
            mode: PaintMode::FillStroke,
            winding_order: WindingOrder::NonZero,
        });
    }

    let file = std::fs::File::create(out)?;
    let mut buf = std::io::BufWriter::new(file);
    doc.save(&mut buf).map_err(pdf_err)?;
    tracing::info!(path = %out.display(), "pdf written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::labels::ApproxMetrics;
    use crate::model::DataNode;

    fn chart() -> Chart {
        let data = DataNode::branch(
            "Budget",
            vec![DataNode::branch(
                "Rent",
                vec![DataNode::leaf("Flat, 2nd floor", "Rent", 900.0), DataNode::leaf("Garage", "Rent", 100.0)],
            )],
        );
        Chart::build(&data, &ChartConfig::default(), &ApproxMetrics).unwrap()
    }

    #[test]
    fn csv_has_one_row_per_tile() {
        let mut buf = Vec::new();
        to_csv(&chart(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("name,category,value"));
        assert!(lines[1].starts_with("\"Flat, 2nd floor\",Rent,900,"));
    }

    #[test]
    fn json_lists_tiles_and_legend() {
        let json = to_json(&chart());
        assert_eq!(json["title"], "Budget");
        assert_eq!(json["tiles"].as_array().unwrap().len(), 2);
        assert_eq!(json["legend"][0]["category"], "Rent");
        assert!(json["generated"].as_str().is_some());
    }

    #[test]
    fn pdf_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.pdf");
        to_pdf(&chart(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
