use std::collections::HashMap;

use egui_commonmark::{CommonMarkCache, CommonMarkViewer};

use crate::NotesApp;
use crate::canvas::ToolSettings;
use crate::document::{Block, BlockId, BlockKind};
use crate::widgets::CanvasView;
use crate::widgets::canvas_view;

/// Block button pressed during a frame, applied once rendering is done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAction {
    Edit(BlockId),
    SaveEdits(BlockId),
    Delete(BlockId),
    /// Ask for a new block at this index, or at the end
    Add(Option<usize>),
}

pub fn central_panel(app: &mut NotesApp, ctx: &egui::Context) {
    let mut actions = Vec::new();

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let NotesApp {
                    document,
                    canvas_views,
                    tool_settings,
                    global_editing,
                    markdown,
                    ..
                } = &mut *app;

                // Collect ids first so blocks can be borrowed mutably one at a time
                let ids: Vec<BlockId> = document.blocks().iter().map(Block::id).collect();
                for (index, id) in ids.into_iter().enumerate() {
                    let Some(block) = document.block_mut(id) else {
                        continue;
                    };
                    let changed = if *global_editing {
                        block_ui(ui, block, index, canvas_views, markdown, tool_settings, &mut actions)
                    } else {
                        read_only_ui(ui, block, markdown);
                        false
                    };
                    if changed {
                        document.mark_unsaved();
                    }
                }

                if *global_editing {
                    ui.add_space(8.0);
                    ui.vertical_centered(|ui| {
                        if ui.button("Add new block").clicked() {
                            actions.push(BlockAction::Add(None));
                        }
                    });
                }
            });
    });

    for action in actions {
        log::debug!("Block action: {:?}", action);
        app.apply(action);
    }
}

/// Text blocks are markdown
fn show_markdown(ui: &mut egui::Ui, id: BlockId, text: &str, cache: &mut CommonMarkCache) {
    ui.push_id(id, |ui| {
        CommonMarkViewer::new().show(ui, cache, text);
    });
}

fn read_only_ui(ui: &mut egui::Ui, block: &Block, markdown: &mut CommonMarkCache) {
    match block.kind() {
        BlockKind::Title(title) => {
            ui.heading(title.as_str());
            ui.separator();
        }
        BlockKind::Text(text) => show_markdown(ui, block.id(), text, markdown),
        BlockKind::Drawing(canvas) => canvas_view::show_static(ui, canvas),
    }
    ui.add_space(4.0);
}

/// Renders one block with its controls; returns true if its content changed
fn block_ui(
    ui: &mut egui::Ui,
    block: &mut Block,
    index: usize,
    views: &mut HashMap<BlockId, CanvasView>,
    markdown: &mut CommonMarkCache,
    settings: &ToolSettings,
    actions: &mut Vec<BlockAction>,
) -> bool {
    let id = block.id();
    let editing = block.is_editing();

    if let BlockKind::Title(title) = block.kind_mut() {
        let changed = ui
            .horizontal(|ui| {
                ui.label("Title");
                let changed = ui.text_edit_singleline(title).changed();
                if ui.button("➕").on_hover_text("Add a block below").clicked() {
                    actions.push(BlockAction::Add(Some(index + 1)));
                }
                changed
            })
            .inner;
        ui.separator();
        return changed;
    }

    let mut changed = false;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                changed = match block.kind_mut() {
                    BlockKind::Text(text) if editing => ui
                        .add(
                            egui::TextEdit::multiline(text)
                                .desired_width(500.0)
                                .desired_rows(6),
                        )
                        .changed(),
                    BlockKind::Text(text) => {
                        show_markdown(ui, id, text, markdown);
                        false
                    }
                    BlockKind::Drawing(canvas) if editing => {
                        views.entry(id).or_default().show(ui, canvas, settings)
                    }
                    BlockKind::Drawing(canvas) => {
                        canvas_view::show_static(ui, canvas);
                        false
                    }
                    BlockKind::Title(_) => false,
                };
            });

            ui.vertical(|ui| {
                if editing {
                    if ui.button("✔").on_hover_text("Finish editing").clicked() {
                        actions.push(BlockAction::SaveEdits(id));
                    }
                } else if ui.button("✏").on_hover_text("Edit this block").clicked() {
                    actions.push(BlockAction::Edit(id));
                }
                if ui.button("🗑").on_hover_text("Delete this block").clicked() {
                    actions.push(BlockAction::Delete(id));
                }
                if ui.button("➕").on_hover_text("Add a block below").clicked() {
                    actions.push(BlockAction::Add(Some(index + 1)));
                }
            });
        });
    });
    changed
}
