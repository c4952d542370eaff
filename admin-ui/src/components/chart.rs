//! Chart Component
//!
//! Plots a [`ChartSpec`] on an HTML5 canvas: vertical and horizontal bars,
//! filled lines, and doughnuts with a centre label.

use std::f64::consts::PI;

use admin_shell::{ChartKind, ChartSpec};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const GRID_COLOR: &str = "#e5e7eb";
const TEXT_COLOR: &str = "#6b7280";
const TITLE_COLOR: &str = "#374151";
const GRID_LINES: usize = 5;
/// Doughnut hole as a fraction of the radius
const DOUGHNUT_CUTOUT: f64 = 0.7;

/// Drawing area left after margins, titles and legend
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn for_chart(width: f64, height: f64, chart: &ChartSpec) -> Self {
        let mut top = 20.0;
        if chart.title.is_some() {
            top += 20.0;
        }
        if chart.show_legend {
            top += 20.0;
        }

        let (left, bottom) = match chart.kind {
            ChartKind::Doughnut => (20.0, 20.0),
            // Category names sit left of horizontal bars
            ChartKind::HorizontalBar => (110.0, 30.0),
            _ => (
                if chart.y_axis_title.is_some() { 70.0 } else { 50.0 },
                if chart.x_axis_title.is_some() { 55.0 } else { 35.0 },
            ),
        };

        Self {
            left,
            top,
            width: (width - left - 20.0).max(1.0),
            height: (height - top - bottom).max(1.0),
        }
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Upper bound of a zero-based value axis, rounded up to 1, 2 or 5 times a
/// power of ten
fn axis_max(max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(max.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|candidate| *candidate >= max)
        .unwrap_or(10.0 * magnitude)
}

/// Start and end angles of each doughnut segment, clockwise from 12 o'clock
fn doughnut_segments(values: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = -PI / 2.0;
    values
        .iter()
        .map(|v| {
            let sweep = v.max(0.0) / total * 2.0 * PI;
            let segment = (start, start + sweep);
            start += sweep;
            segment
        })
        .collect()
}

/// Axis value label: no decimals for whole numbers
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

/// Draw `chart` on `canvas`, replacing whatever was there
pub fn draw_chart(canvas: &HtmlCanvasElement, chart: &ChartSpec) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let area = PlotArea::for_chart(width, height, chart);

    ctx.clear_rect(0.0, 0.0, width, height);

    if let Some(title) = &chart.title {
        ctx.set_fill_style(&TITLE_COLOR.into());
        ctx.set_font("bold 14px sans-serif");
        ctx.set_text_align("center");
        let _ = ctx.fill_text(title, width / 2.0, 22.0);
    }

    if chart.show_legend {
        draw_legend(&ctx, chart, width, if chart.title.is_some() { 44.0 } else { 22.0 });
    }

    match chart.kind {
        ChartKind::Bar => draw_bars(&ctx, chart, &area),
        ChartKind::HorizontalBar => draw_horizontal_bars(&ctx, chart, &area),
        ChartKind::Line => draw_line(&ctx, chart, &area),
        ChartKind::Doughnut => draw_doughnut(&ctx, chart, &area),
    }
}

fn draw_legend(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, width: f64, y: f64) {
    ctx.set_font("12px sans-serif");
    ctx.set_text_align("left");

    let labelled: Vec<_> = chart
        .datasets
        .iter()
        .filter_map(|d| d.label.as_deref().map(|label| (label, d)))
        .collect();
    let mut x = width / 2.0 - 50.0 * labelled.len() as f64;

    for (label, dataset) in labelled {
        let swatch = dataset.border_color.as_deref().unwrap_or(dataset.color_at(0));
        ctx.set_fill_style(&swatch.into());
        ctx.fill_rect(x, y - 9.0, 24.0, 10.0);
        ctx.set_fill_style(&TEXT_COLOR.into());
        let _ = ctx.fill_text(label, x + 30.0, y);
        x += 100.0;
    }
}

/// Horizontal grid with value labels for a zero-based vertical axis
fn draw_value_grid(ctx: &CanvasRenderingContext2d, area: &PlotArea, max: f64) {
    ctx.set_stroke_style(&GRID_COLOR.into());
    ctx.set_line_width(1.0);
    ctx.set_fill_style(&TEXT_COLOR.into());
    ctx.set_font("12px sans-serif");
    ctx.set_text_align("right");

    for i in 0..=GRID_LINES {
        let y = area.top + (i as f64 / GRID_LINES as f64) * area.height;
        ctx.begin_path();
        ctx.move_to(area.left, y);
        ctx.line_to(area.right(), y);
        ctx.stroke();

        let value = max - (i as f64 / GRID_LINES as f64) * max;
        let _ = ctx.fill_text(&format_value(value), area.left - 8.0, y + 4.0);
    }
}

fn draw_axis_titles(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, area: &PlotArea) {
    ctx.set_fill_style(&TEXT_COLOR.into());
    ctx.set_font("12px sans-serif");
    ctx.set_text_align("center");

    if let Some(title) = &chart.x_axis_title {
        let _ = ctx.fill_text(title, area.left + area.width / 2.0, area.bottom() + 42.0);
    }

    if let Some(title) = &chart.y_axis_title {
        ctx.save();
        let _ = ctx.translate(14.0, area.top + area.height / 2.0);
        let _ = ctx.rotate(-PI / 2.0);
        let _ = ctx.fill_text(title, 0.0, 0.0);
        ctx.restore();
    }
}

/// Category labels centred under `count` equal slots
fn draw_category_labels(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, area: &PlotArea) {
    let count = chart.labels.len().max(1);
    let slot = area.width / count as f64;

    ctx.set_fill_style(&TEXT_COLOR.into());
    ctx.set_font("12px sans-serif");
    ctx.set_text_align("center");
    for (i, label) in chart.labels.iter().enumerate() {
        let x = area.left + slot * (i as f64 + 0.5);
        let _ = ctx.fill_text(&truncate_label(label, 14), x, area.bottom() + 18.0);
    }
}

fn draw_bars(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, area: &PlotArea) {
    let max = axis_max(chart.max_value());
    draw_value_grid(ctx, area, max);

    let count = chart.labels.len().max(1);
    let slot = area.width / count as f64;
    let series = chart.datasets.len().max(1);
    let bar_width = slot * 0.7 / series as f64;

    for (s, dataset) in chart.datasets.iter().enumerate() {
        for (i, value) in dataset.data.iter().enumerate() {
            let bar_height = value.max(0.0) / max * area.height;
            let x = area.left + slot * i as f64 + slot * 0.15 + bar_width * s as f64;
            ctx.set_fill_style(&dataset.color_at(i).into());
            ctx.fill_rect(x, area.bottom() - bar_height, bar_width, bar_height);
        }
    }

    draw_category_labels(ctx, chart, area);
    draw_axis_titles(ctx, chart, area);
}

fn draw_horizontal_bars(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, area: &PlotArea) {
    let max = axis_max(chart.max_value());

    // Vertical grid with value labels along the bottom
    ctx.set_stroke_style(&GRID_COLOR.into());
    ctx.set_line_width(1.0);
    ctx.set_fill_style(&TEXT_COLOR.into());
    ctx.set_font("12px sans-serif");
    ctx.set_text_align("center");
    for i in 0..=GRID_LINES {
        let x = area.left + (i as f64 / GRID_LINES as f64) * area.width;
        ctx.begin_path();
        ctx.move_to(x, area.top);
        ctx.line_to(x, area.bottom());
        ctx.stroke();

        let value = (i as f64 / GRID_LINES as f64) * max;
        let _ = ctx.fill_text(&format_value(value), x, area.bottom() + 18.0);
    }

    let count = chart.labels.len().max(1);
    let slot = area.height / count as f64;
    let bar_height = slot * 0.7;

    ctx.set_text_align("right");
    for (i, label) in chart.labels.iter().enumerate() {
        let y = area.top + slot * i as f64;
        ctx.set_fill_style(&TEXT_COLOR.into());
        let _ = ctx.fill_text(&truncate_label(label, 14), area.left - 8.0, y + slot / 2.0 + 4.0);

        if let Some(dataset) = chart.datasets.first() {
            let value = dataset.data.get(i).copied().unwrap_or(0.0).max(0.0);
            ctx.set_fill_style(&dataset.color_at(i).into());
            ctx.fill_rect(area.left, y + slot * 0.15, value / max * area.width, bar_height);
        }
    }
}

fn draw_line(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, area: &PlotArea) {
    let max = axis_max(chart.max_value());
    draw_value_grid(ctx, area, max);

    let count = chart.labels.len().max(1);
    let slot = area.width / count as f64;
    let point = |i: usize, value: f64| {
        (
            area.left + slot * (i as f64 + 0.5),
            area.bottom() - value.max(0.0) / max * area.height,
        )
    };

    for dataset in &chart.datasets {
        if dataset.data.is_empty() {
            continue;
        }
        let stroke = dataset.border_color.as_deref().unwrap_or(dataset.color_at(0));

        if dataset.fill {
            ctx.set_fill_style(&dataset.color_at(0).into());
            ctx.begin_path();
            ctx.move_to(point(0, 0.0).0, area.bottom());
            for (i, value) in dataset.data.iter().enumerate() {
                let (x, y) = point(i, *value);
                ctx.line_to(x, y);
            }
            ctx.line_to(point(dataset.data.len() - 1, 0.0).0, area.bottom());
            ctx.close_path();
            ctx.fill();
        }

        ctx.set_stroke_style(&stroke.into());
        ctx.set_line_width(2.0);
        ctx.begin_path();
        for (i, value) in dataset.data.iter().enumerate() {
            let (x, y) = point(i, *value);
            if i == 0 {
                ctx.move_to(x, y);
            } else {
                ctx.line_to(x, y);
            }
        }
        ctx.stroke();

        ctx.set_fill_style(&stroke.into());
        for (i, value) in dataset.data.iter().enumerate() {
            let (x, y) = point(i, *value);
            ctx.begin_path();
            let _ = ctx.arc(x, y, 4.0, 0.0, PI * 2.0);
            ctx.fill();
        }
    }

    draw_category_labels(ctx, chart, area);
    draw_axis_titles(ctx, chart, area);
}

fn draw_doughnut(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, area: &PlotArea) {
    let cx = area.left + area.width / 2.0;
    let cy = area.top + area.height / 2.0;
    let radius = area.width.min(area.height) / 2.0;
    let inner = radius * DOUGHNUT_CUTOUT;

    if let Some(dataset) = chart.datasets.first() {
        for (i, (start, end)) in doughnut_segments(&dataset.data).into_iter().enumerate() {
            if end <= start {
                continue;
            }
            ctx.set_fill_style(&dataset.color_at(i).into());
            ctx.begin_path();
            let _ = ctx.arc(cx, cy, radius, start, end);
            let _ = ctx.arc_with_anticlockwise(cx, cy, inner, end, start, true);
            ctx.close_path();
            ctx.fill();
        }
    }

    if let Some(label) = &chart.center_label {
        ctx.set_fill_style(&TITLE_COLOR.into());
        ctx.set_font(&format!("bold {}px sans-serif", (inner * 0.5).clamp(12.0, 28.0) as u32));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(label, cx, cy);
        ctx.set_text_baseline("alphabetic");
    }
}
