use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::bar_colors;
use crate::query::ResultTable;

// ---------------------------------------------------------------------------
// Bar chart of a query result
// ---------------------------------------------------------------------------

/// Render `result` as a bar chart, one bar per row with a numeric value.
/// Bars are named after their label so hovering shows which row they belong to.
pub fn result_chart(ui: &mut Ui, id: &str, result: &ResultTable) {
    let points = result.chart_points();
    if points.is_empty() {
        return;
    }
    let series = result
        .chart
        .and_then(|hint| result.columns.get(hint.value))
        .cloned()
        .unwrap_or_default();

    let colors = bar_colors(points.len());
    let bars: Vec<Bar> = points
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, ((label, value), color))| {
            Bar::new(i as f64, *value)
                .name(label)
                .fill(color)
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .legend(Legend::default())
        .height(260.0)
        .y_axis_label(series.clone())
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(series));
        });
}
