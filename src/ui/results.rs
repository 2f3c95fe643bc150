use eframe::egui::{self, Key, Ui};
use egui_extras::{Column, TableBuilder};

use crate::query::{QueryId, ResultTable};
use crate::state::AppState;
use crate::ui::chart::result_chart;

// ---------------------------------------------------------------------------
// Central panel – analytics and title search
// ---------------------------------------------------------------------------

/// Render the query selector, its result, and the title search.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a book catalog to explore it  (File → Open…)");
        });
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            analytics_section(ui, state);
            ui.add_space(12.0);
            ui.separator();
            search_section(ui, state);
        });
}

fn analytics_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Analytics");

    let mut run = false;
    ui.horizontal(|ui: &mut Ui| {
        let previous = state.selected_query;
        egui::ComboBox::from_id_salt("query")
            .selected_text(state.selected_query.label())
            .width(360.0)
            .show_ui(ui, |ui: &mut Ui| {
                for id in QueryId::all() {
                    ui.selectable_value(&mut state.selected_query, id, id.label());
                }
            });
        if state.selected_query != previous {
            state.query_result = None;
        }
        run |= ui.button("Run Query").clicked();
    });

    if state.selected_query == QueryId::TitleKeyword {
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Keyword");
            let response = ui.text_edit_singleline(&mut state.params.keyword);
            run |= response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        });
    }

    if run {
        state.run_query();
    }

    if let Some(result) = &state.query_result {
        result_view(ui, "query_result", result);
    }
}

fn search_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Search titles");

    let mut run = false;
    ui.horizontal(|ui: &mut Ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.search_text).hint_text("Title contains…"),
        );
        run |= response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        run |= ui.button("Search").clicked();
    });

    if run {
        state.run_search();
    }

    if let Some(result) = &state.search_result {
        result_view(ui, "search_result", result);
    }
}

// ---------------------------------------------------------------------------
// Result rendering
// ---------------------------------------------------------------------------

fn result_view(ui: &mut Ui, id: &str, result: &ResultTable) {
    if result.is_empty() {
        ui.label("No rows.");
        return;
    }
    ui.label(format!("{} rows", result.len()));
    ui.push_id(id, |ui: &mut Ui| {
        result_table(ui, result);
    });
    ui.add_space(8.0);
    result_chart(ui, &format!("{id}_chart"), result);
}

fn result_table(ui: &mut Ui, result: &ResultTable) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(280.0)
        .columns(Column::auto().at_least(80.0), result.columns.len())
        .header(20.0, |mut header| {
            for name in &result.columns {
                header.col(|ui| {
                    ui.strong(name.as_str());
                });
            }
        })
        .body(|mut body| {
            for row in &result.rows {
                body.row(18.0, |mut cells| {
                    for value in row {
                        cells.col(|ui| {
                            ui.label(value.to_string());
                        });
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::epaint::Shape;

    fn rendered_text(result: &ResultTable) -> Vec<String> {
        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| result_view(ui, "result", result));
        });
        output
            .shapes
            .iter()
            .filter_map(|clipped| match &clipped.shape {
                Shape::Text(text) => Some(text.galley.text().to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_aggregate_says_no_rows() {
        let empty = ResultTable::new(["Publisher", "Books Published"]);
        let text = rendered_text(&empty);
        assert!(text.iter().any(|t| t == "No rows."), "{text:?}");
        assert!(!text.iter().any(|t| t.contains("books")), "{text:?}");
    }
}
