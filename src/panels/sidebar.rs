use egui::color_picker::{Alpha, color_edit_button_srgba};

use crate::NotesApp;
use crate::app::Dialog;
use crate::canvas::Tool;
use crate::document::{Block, BlockKind};
use crate::util::time;

pub fn sidebar(app: &mut NotesApp, ctx: &egui::Context) {
    egui::SidePanel::left("sidebar")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("SNotesApp");
            ui.separator();

            ui.horizontal_wrapped(|ui| {
                if ui.button("New").on_hover_text("Start new notes").clicked() {
                    app.dialog = Some(Dialog::New);
                }
                if ui.button("Open").on_hover_text("Open saved notes").clicked() {
                    app.dialog = Some(app.open_dialog());
                }
                if ui.button("Save").clicked() {
                    log::info!("Saving {}", app.document.name());
                    app.save_notes();
                }
                if ui.button("Save as").clicked() {
                    app.dialog = Some(Dialog::SaveAs {
                        name: app.document.name().to_string(),
                    });
                }
                if ui
                    .button("Export PDF")
                    .on_hover_text(format!("Print the notes to {}", app.store.export_dir().display()))
                    .clicked()
                {
                    app.export_pdf();
                }
            });

            let mut editing = app.global_editing;
            if ui
                .checkbox(&mut editing, "Edit mode")
                .on_hover_text("Show block controls and allow editing")
                .changed()
            {
                app.set_global_editing(editing);
            }
            ui.checkbox(&mut app.periodic_save, "Save periodically")
                .on_hover_text("Save every five minutes once the notes have a name");

            ui.separator();

            egui::Grid::new("notes_info_grid")
                .num_columns(2)
                .spacing([20.0, 4.0])
                .striped(true)
                .show(ui, |ui| {
                    ui.label("File");
                    ui.label(app.document.name());
                    ui.end_row();

                    ui.label("Author");
                    ui.label(app.config.author.as_str());
                    ui.end_row();

                    ui.label("Blocks");
                    ui.label(app.document.len().to_string());
                    ui.end_row();

                    ui.label("Status");
                    ui.label(if app.document.is_saved() { "saved" } else { "unsaved" });
                    ui.end_row();

                    if let Some(at) = app.document.last_saved() {
                        ui.label("Last saved");
                        ui.label(time::format_timestamp(at, app.config.months_language));
                        ui.end_row();
                    }

                    if let Some(path) = &app.last_export {
                        ui.label("Exported");
                        ui.label(path.display().to_string());
                        ui.end_row();
                    }
                });

            ui.separator();
            canvas_tools(app, ui);

            if let Some(status) = &app.status {
                ui.separator();
                ui.colored_label(ui.visuals().error_fg_color, status.as_str());
            }
        });
}

fn canvas_tools(app: &mut NotesApp, ui: &mut egui::Ui) {
    ui.heading("Canvas");

    let settings = &mut app.tool_settings;
    for tool in Tool::ALL {
        if ui
            .selectable_label(settings.tool == tool, tool.label())
            .clicked()
        {
            log::info!("Tool selected from UI: {}", tool.label());
            settings.tool = tool;
        }
    }

    ui.add(egui::Slider::new(&mut settings.stroke_width, 1.0..=25.0).text("Stroke width"));
    if settings.tool == Tool::Point {
        ui.add(egui::Slider::new(&mut settings.point_radius, 1.0..=20.0).text("Point radius"));
    }

    ui.horizontal(|ui| {
        color_edit_button_srgba(ui, &mut settings.stroke, Alpha::Opaque);
        ui.label("Stroke");
    });

    let mut fill = settings.fill();
    let fill_changed = ui
        .horizontal(|ui| {
            let changed = color_edit_button_srgba(ui, &mut fill, Alpha::Opaque).changed();
            ui.label("Fill");
            changed
        })
        .inner;
    if fill_changed {
        if let Err(err) = settings.set_fill(fill) {
            log::warn!("{}", err);
            app.status = Some(err.to_string());
        }
    }

    let drawing = app.document.editing_block().filter(|id| {
        matches!(
            app.document.block(*id).map(Block::kind),
            Some(BlockKind::Drawing(_))
        )
    });
    if ui
        .add_enabled(drawing.is_some(), egui::Button::new("Clear canvas"))
        .on_hover_text("Remove everything from the canvas being edited")
        .clicked()
    {
        if let Some(BlockKind::Drawing(canvas)) =
            drawing.and_then(|id| app.document.block_mut(id)).map(Block::kind_mut)
        {
            canvas.clear();
            app.document.mark_unsaved();
        }
    }
}
