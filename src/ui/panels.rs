use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{CategoryFilter, FormatSelector, YearRange, ALL_CATEGORIES};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let table = match &state.table {
        Some(t) => t,
        None => {
            ui.label("No catalog loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the closures.
    let categories: Vec<String> = table.categories.iter().cloned().collect();
    let (first_year, last_year) = table.year_bounds.unwrap_or((0, 0));
    let before = state.filters.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Category ----
            ui.strong("Category");
            egui::ComboBox::from_id_salt("category")
                .selected_text(state.filters.category.to_string())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(
                        &mut state.filters.category,
                        CategoryFilter::All,
                        ALL_CATEGORIES,
                    );
                    for cat in &categories {
                        ui.selectable_value(
                            &mut state.filters.category,
                            CategoryFilter::Exact(cat.clone()),
                            cat.as_str(),
                        );
                    }
                });
            ui.separator();

            // ---- Format ----
            ui.strong("Format");
            for format in FormatSelector::ALL {
                ui.radio_value(&mut state.filters.format, format, format.label());
            }
            ui.separator();

            // ---- Year range ----
            ui.strong("Published");
            let mut lo = state.filters.years.min().clamp(first_year, last_year);
            let mut hi = state.filters.years.max().clamp(first_year, last_year);
            ui.horizontal(|ui: &mut Ui| {
                ui.add(egui::DragValue::new(&mut lo).range(first_year..=hi).prefix("from "));
                ui.add(egui::DragValue::new(&mut hi).range(lo..=last_year).prefix("to "));
            });
            if ui.small_button("Full range").clicked() {
                lo = first_year;
                hi = last_year;
            }
            state.filters.years = YearRange::new(lo, hi);
        });

    if state.filters != before {
        state.refilter();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} books loaded, {} visible",
                table.len(),
                state.visible
            ));
            if let Some(source) = &state.source {
                ui.weak(source.display().to_string());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open book catalog")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
