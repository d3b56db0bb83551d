use eframe::egui::{self, Align, Color32, Layout, RichText, Ui};
use egui_extras::{Column as TableColumn, DatePickerButton, TableBuilder};

use crate::grid::{cell_gesture, CellGesture, Column, SortDirection, COLUMNS};
use crate::models::DisplayRow;
use crate::view::{Access, Event, ViewState};

pub const ACCENT: Color32 = Color32::from_rgb(0x04, 0xBE, 0x00);
const ROW_HEIGHT: f32 = 30.0;
const HEADER_HEIGHT: f32 = 32.0;

fn accent_button(text: impl Into<String>, size: f32) -> egui::Button<'static> {
    egui::Button::new(RichText::new(text.into()).size(size).color(Color32::BLACK)).fill(ACCENT)
}

/// Draw the workout list and return the user's actions for this frame.
pub fn show_workouts(ctx: &egui::Context, view: &mut ViewState) -> Vec<Event> {
    let mut events = Vec::new();

    egui::TopBottomPanel::top("title_bar")
        .exact_height(75.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                if ui.add_enabled(!view.logging_out, accent_button("Logout", 24.0)).clicked() {
                    events.push(Event::Logout);
                }
                ui.separator();
                ui.label(RichText::new("View Workouts").heading().size(40.0).strong());
            });
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.with_layout(Layout::top_down(Align::Center), |ui| {
            ui.add_space(30.0);
            ui.allocate_ui(egui::vec2(ui.available_width() * 0.5, 420.0), |ui| {
                show_grid(ui, view, &mut events);
            });
            ui.add_space(10.0);
            show_pager(ui, view);
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                let delete = ui.add_enabled(!view.deleting && !view.selected().is_empty(), accent_button("🗑", 22.0));
                if delete.on_hover_text("Delete selected").clicked() {
                    events.push(Event::DeleteSelected);
                }
                ui.add_space(20.0);
                if ui.add(accent_button("+", 22.0)).clicked() {
                    events.push(Event::OpenCreate);
                }
            });
            ui.add_space(10.0);
            if ui.add(accent_button("View PRs", 22.0)).clicked() {
                events.push(Event::ViewBests);
            }
        });
    });

    if view.form.open {
        show_create_dialog(ctx, view, &mut events);
    }
    if let Some(message) = view.alert.clone() {
        show_alert(ctx, &message, &mut events);
    }

    events
}

fn show_grid(ui: &mut Ui, view: &mut ViewState, events: &mut Vec<Event>) {
    if (view.loading || view.access == Access::Pending) && view.rows().is_empty() {
        ui.spinner();
    }

    let visible: Vec<DisplayRow> = view.grid.visible(view.rows()).into_iter().cloned().collect();
    let mut selection: Option<Vec<usize>> = None;

    TableBuilder::new(ui)
        .striped(true)
        .sense(egui::Sense::click())
        .column(TableColumn::exact(32.0))
        .column(TableColumn::initial(200.0).resizable(true))
        .column(TableColumn::remainder())
        .header(HEADER_HEIGHT, |mut header| {
            header.col(|_ui| {});
            for column in COLUMNS {
                header.col(|ui| {
                    let arrow = match view.grid.sort {
                        Some((c, SortDirection::Ascending)) if c == column => " ⏶",
                        Some((c, SortDirection::Descending)) if c == column => " ⏷",
                        _ => "",
                    };
                    let title = RichText::new(format!("{}{}", column.header(), arrow)).strong();
                    if ui.add(egui::Label::new(title).sense(egui::Sense::click())).clicked() {
                        view.grid.toggle_sort(column);
                    }
                });
            }
        })
        .body(|mut body| {
            for row in &visible {
                body.row(ROW_HEIGHT, |mut table_row| {
                    let mut toggled = false;
                    table_row.col(|ui| {
                        let mut checked = view.is_checked(row.id);
                        if ui.checkbox(&mut checked, "").changed() {
                            selection = Some(view.toggled(row.id));
                            toggled = true;
                        }
                    });
                    let mut activated = false;
                    for column in COLUMNS {
                        table_row.col(|ui| activated |= show_cell(ui, view, row, column));
                    }
                    if activated || (!toggled && view.grid.editing.is_none() && table_row.response().clicked()) {
                        events.push(Event::RowActivated(row.id));
                    }
                });
            }
        });

    if let Some(ids) = selection {
        events.push(Event::SelectionChanged(ids));
    }
}

/// Draws one cell; returns true when the cell was clicked. Right-click opens
/// an inline editor.
fn show_cell(ui: &mut Ui, view: &mut ViewState, row: &DisplayRow, column: Column) -> bool {
    let editing_here = matches!(&view.grid.editing, Some(edit) if edit.row_id == row.id && edit.column == column);
    if editing_here {
        let mut finished = false;
        if let Some(edit) = view.grid.editing.as_mut() {
            let response = ui.text_edit_singleline(&mut edit.buffer);
            response.request_focus();
            finished = response.lost_focus();
        }
        if finished {
            view.grid.finish_edit();
        }
        return false;
    }

    let response = ui.add(egui::Label::new(column.value(row)).sense(egui::Sense::click()));
    match cell_gesture(response.clicked(), response.secondary_clicked()) {
        CellGesture::Edit => {
            view.grid.begin_edit(row, column);
            false
        }
        CellGesture::Activate => true,
        CellGesture::Ignore => false,
    }
}

fn show_pager(ui: &mut Ui, view: &mut ViewState) {
    let total = view.rows().len();
    let pages = view.grid.page_count(total);
    ui.horizontal(|ui| {
        if ui.add_enabled(view.grid.page > 0, egui::Button::new("◀")).clicked() {
            view.grid.prev_page();
        }
        let first = if total == 0 { 0 } else { view.grid.page * crate::grid::PAGE_SIZE + 1 };
        let last = ((view.grid.page + 1) * crate::grid::PAGE_SIZE).min(total);
        ui.label(format!("{first}–{last} of {total}"));
        if ui.add_enabled(view.grid.page + 1 < pages, egui::Button::new("▶")).clicked() {
            view.grid.next_page(total);
        }
    });
}

fn show_create_dialog(ctx: &egui::Context, view: &mut ViewState, events: &mut Vec<Event>) {
    let modal = egui::Modal::new(egui::Id::new("create_workout")).show(ctx, |ui| {
        ui.set_width(420.0);
        ui.vertical_centered(|ui| {
            ui.heading("Create Workout");
        });
        ui.add_space(10.0);

        ui.add_enabled_ui(!view.form.submitting, |ui| {
            ui.horizontal(|ui| {
                ui.label("Name");
                ui.text_edit_singleline(&mut view.form.name);
            });
            ui.horizontal(|ui| {
                ui.label("Date");
                let mut day = view.form.date.date();
                ui.add(DatePickerButton::new(&mut day).id_salt("create_workout_date"));
                if day != view.form.date.date() {
                    view.form.date = day.and_time(view.form.date.time());
                }
            });
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                if ui.add(accent_button("Submit", 18.0)).clicked() {
                    events.push(Event::SubmitCreate);
                }
            });
        });
        if view.form.submitting {
            ui.spinner();
        }
    });

    if modal.should_close() {
        events.push(Event::CloseCreate);
    }
}

fn show_alert(ctx: &egui::Context, message: &str, events: &mut Vec<Event>) {
    let modal = egui::Modal::new(egui::Id::new("alert")).show(ctx, |ui| {
        ui.set_width(320.0);
        ui.label(RichText::new(message).size(20.0));
        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            if ui.button("OK").clicked() {
                events.push(Event::DismissAlert);
            }
        });
    });
    if modal.should_close() {
        events.push(Event::DismissAlert);
    }
}

/// Minimal panel for a surface owned by another screen.
pub fn show_surface(ctx: &egui::Context, title: &str, detail: &str, action: &str) -> bool {
    let mut clicked = false;
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.with_layout(Layout::top_down(Align::Center), |ui| {
            ui.add_space(80.0);
            ui.label(RichText::new(title).heading().size(36.0).strong());
            ui.add_space(20.0);
            ui.label(RichText::new(detail).size(22.0));
            ui.add_space(30.0);
            clicked = ui.add(accent_button(action, 22.0)).clicked();
        });
    });
    clicked
}
