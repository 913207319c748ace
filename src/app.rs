use std::collections::HashMap;
use std::path::PathBuf;

use egui_commonmark::CommonMarkCache;

use crate::canvas::{Canvas, ToolSettings};
use crate::config::Config;
use crate::document::{BlockId, BlockKind, Document};
use crate::error::ExportError;
use crate::export;
use crate::panels::{self, BlockAction};
use crate::persistence::NoteStore;
use crate::util::time;
use crate::widgets::CanvasView;

/// Modal dialog currently shown over the notes
#[derive(Debug, Clone)]
pub(crate) enum Dialog {
    New,
    Open {
        files: Vec<String>,
        selected: Option<String>,
    },
    SaveAs {
        name: String,
    },
    AddBlock {
        index: Option<usize>,
        drawing: bool,
    },
}

/// We derive Deserialize/Serialize so we can persist UI preferences on shutdown.
/// The notes themselves are saved explicitly through the sidebar.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct NotesApp {
    pub(crate) tool_settings: ToolSettings,
    pub(crate) global_editing: bool,
    pub(crate) periodic_save: bool,

    #[serde(skip)]
    pub(crate) document: Document,
    #[serde(skip)]
    pub(crate) config: Config,
    #[serde(skip)]
    pub(crate) store: NoteStore,
    // Gesture state per drawing block
    #[serde(skip)]
    pub(crate) canvas_views: HashMap<BlockId, CanvasView>,
    #[serde(skip)]
    pub(crate) dialog: Option<Dialog>,
    #[serde(skip)]
    pub(crate) status: Option<String>,
    #[serde(skip)]
    pub(crate) last_export: Option<PathBuf>,
    // Rendered markdown of text blocks
    #[serde(skip)]
    pub(crate) markdown: CommonMarkCache,
}

impl Default for NotesApp {
    fn default() -> Self {
        let config = Config::default();
        Self {
            tool_settings: ToolSettings::default(),
            global_editing: true,
            periodic_save: false,
            document: Document::new(),
            store: NoteStore::new(config.data_dir.clone()),
            config,
            canvas_views: HashMap::new(),
            dialog: None,
            status: None,
            last_export: None,
            markdown: CommonMarkCache::default(),
        }
    }
}

impl NotesApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.store = NoteStore::new(config.data_dir.clone());
        app.config = config;
        app
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn report(&mut self, context: &str, err: impl std::fmt::Display) {
        log::error!("{}: {}", context, err);
        self.status = Some(format!("{context}: {err}"));
    }

    pub(crate) fn save_notes(&mut self) -> bool {
        match self.store.save(&mut self.document) {
            Ok(_) => {
                self.status = None;
                true
            }
            Err(err) => {
                self.report("Failed to save notes", err);
                false
            }
        }
    }

    /// Renders the notes to PDF in the export directory
    pub(crate) fn export_pdf(&mut self) {
        let date = time::format_timestamp(time::timestamp_secs(), self.config.months_language);
        let result = export::render_pdf(&self.document, &self.config.author, &date).and_then(|pdf| {
            let stem = export::file_stem(self.document.title().unwrap_or_default());
            self.store.write_export(&stem, &pdf.bytes).map_err(ExportError::from)
        });
        match result {
            Ok(path) => {
                self.last_export = Some(path);
                self.status = None;
            }
            Err(err) => self.report("Failed to export PDF", err),
        }
    }

    pub(crate) fn open_notes(&mut self, name: &str) {
        match self.store.load(name) {
            Ok(doc) => {
                self.document = doc;
                self.canvas_views.clear();
                self.last_export = None;
                self.status = None;
            }
            Err(err) => self.report("Failed to open notes", err),
        }
    }

    pub(crate) fn new_notes(&mut self) {
        self.document = Document::new();
        self.canvas_views.clear();
        self.last_export = None;
        self.status = None;
    }

    pub(crate) fn open_dialog(&mut self) -> Dialog {
        match self.store.list() {
            Ok(files) => Dialog::Open {
                selected: files.first().cloned(),
                files,
            },
            Err(err) => {
                self.report("Failed to list notes", err);
                Dialog::Open {
                    files: Vec::new(),
                    selected: None,
                }
            }
        }
    }

    pub(crate) fn set_global_editing(&mut self, editing: bool) {
        if !editing {
            self.document.collapse_editing();
        }
        self.global_editing = editing;
    }

    pub(crate) fn apply(&mut self, action: BlockAction) {
        let result = match action {
            BlockAction::Edit(id) => self.document.activate_editing(id),
            BlockAction::SaveEdits(id) => self.document.save_edits(id),
            BlockAction::Delete(id) => {
                self.canvas_views.remove(&id);
                self.document.delete_block(id).map(|_| ())
            }
            BlockAction::Add(index) => {
                self.dialog = Some(Dialog::AddBlock {
                    index,
                    drawing: false,
                });
                Ok(())
            }
        };
        if let Err(err) = result {
            self.report("Block action failed", err);
        }
    }

    fn add_block(&mut self, index: Option<usize>, drawing: bool) {
        let kind = if drawing {
            BlockKind::Drawing(Canvas::new())
        } else {
            BlockKind::Text("...".to_string())
        };
        if let Err(err) = self.document.add_block(index, kind) {
            self.report("Failed to add block", err);
        }
    }

    fn autosave(&mut self) {
        if self.periodic_save
            && self.store.should_autosave(&self.document, time::timestamp_secs())
            && !self.save_notes()
        {
            // Don't retry every frame
            self.periodic_save = false;
        }
    }

    fn unsaved_warning(&self, ui: &mut egui::Ui) {
        if !self.document.is_saved() && self.document.len() != 1 {
            ui.colored_label(ui.visuals().warn_fg_color, "⚠ You have unsaved changes!");
        }
    }

    /// Shows `dialog`; returns false once it should close
    fn show_dialog(&mut self, ctx: &egui::Context, dialog: &mut Dialog) -> bool {
        let mut keep_open = true;

        match dialog {
            Dialog::New => {
                modal("New notes").show(ctx, |ui| {
                    self.unsaved_warning(ui);
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            keep_open = false;
                        }
                        if ui.button("New notes").clicked() {
                            self.new_notes();
                            keep_open = false;
                        }
                    });
                });
            }
            Dialog::Open { files, selected } => {
                modal("Open notes").show(ctx, |ui| {
                    self.unsaved_warning(ui);
                    egui::ComboBox::from_label("Choose a file")
                        .selected_text(selected.as_deref().unwrap_or("-"))
                        .show_ui(ui, |ui| {
                            for file in files.iter() {
                                ui.selectable_value(selected, Some(file.clone()), file.as_str());
                            }
                        });
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            keep_open = false;
                        }
                        let open = ui.add_enabled(selected.is_some(), egui::Button::new("Open"));
                        if let (true, Some(name)) = (open.clicked(), selected.as_deref()) {
                            self.open_notes(name);
                            keep_open = false;
                        }
                    });
                });
            }
            Dialog::SaveAs { name } => {
                modal("Save notes as").show(ctx, |ui| {
                    ui.label(format!("Include the extension, for example notes{}", crate::document::NOTES_EXTENSION));
                    ui.text_edit_singleline(name);
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            keep_open = false;
                        }
                        if ui.button("Just rename").clicked() {
                            self.document.rename(name.clone());
                            keep_open = false;
                        }
                        if ui.button("Save").clicked() {
                            self.document.rename(name.clone());
                            self.save_notes();
                            keep_open = false;
                        }
                    });
                });
            }
            Dialog::AddBlock { index, drawing } => {
                let index = *index;
                modal("Add a new block").show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("New block type");
                        ui.radio_value(drawing, false, "text");
                        ui.radio_value(drawing, true, "drawing");
                    });
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            keep_open = false;
                        }
                        if ui.button("Create new block").clicked() {
                            self.add_block(index, *drawing);
                            keep_open = false;
                        }
                    });
                });
            }
        }

        keep_open
    }
}

fn modal(title: &str) -> egui::Window<'_> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

impl eframe::App for NotesApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::sidebar(self, ctx);
        panels::central_panel(self, ctx);

        if let Some(mut dialog) = self.dialog.take() {
            if self.show_dialog(ctx, &mut dialog) && self.dialog.is_none() {
                self.dialog = Some(dialog);
            }
        }

        self.autosave();
    }
}
