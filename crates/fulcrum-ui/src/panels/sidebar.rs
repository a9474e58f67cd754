//! Sidebar: conversation list and chat controls.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use crate::state::UiState;
use crate::theme::*;

pub const EMPTY_HINT: &str = "Your conversations will appear here once you start chatting!";

/// What the caller should do after rendering the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarAction {
    NewChat,
    Open(String),
    Delete(String),
    DeleteAll,
}

/// Render the sidebar. At most one action per frame.
pub fn sidebar_panel(ui: &mut egui::Ui, state: &UiState) -> Option<SidebarAction> {
    let mut action = None;

    egui::Frame::default()
        .fill(BG_SIDEBAR)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                let new_chat = egui::Button::new(RichText::new("+ New chat").color(TEXT_PRIMARY))
                    .fill(ACCENT)
                    .corner_radius(PANEL_ROUNDING)
                    .min_size(Vec2::new(ui.available_width(), 28.0));
                if ui.add(new_chat).clicked() {
                    action = Some(SidebarAction::NewChat);
                }

                ui.add_space(8.0);
                ui.label(RichText::new("Recent").color(TEXT_SECONDARY).small());

                let list_height = ui.available_height() - 64.0;
                ScrollArea::vertical()
                    .max_height(list_height)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        if state.conversations.is_empty() {
                            ui.add_space(8.0);
                            ui.label(RichText::new(EMPTY_HINT).color(TEXT_SECONDARY).small());
                        }
                        for chat in &state.conversations {
                            let selected = state.active_id.as_deref() == Some(chat.id.as_str());
                            ui.horizontal(|ui| {
                                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                    let delete = ui
                                        .small_button(RichText::new("🗑").color(TEXT_SECONDARY))
                                        .on_hover_text("Delete conversation");
                                    if delete.clicked() {
                                        action = Some(SidebarAction::Delete(chat.id.clone()));
                                    }
                                    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                                        let title = RichText::new(&chat.title).color(if selected {
                                            TEXT_PRIMARY
                                        } else {
                                            TEXT_SECONDARY
                                        });
                                        if ui.selectable_label(selected, title).clicked() && !selected {
                                            action = Some(SidebarAction::Open(chat.id.clone()));
                                        }
                                    });
                                });
                            });
                        }
                    });

                ui.separator();

                let has_chats = !state.conversations.is_empty();
                if ui
                    .add_enabled(has_chats, egui::Button::new(RichText::new("Delete all chats").color(ERROR)))
                    .clicked()
                {
                    action = Some(SidebarAction::DeleteAll);
                }

                if let Some(name) = &state.user_name {
                    ui.label(RichText::new(name).color(TEXT_SECONDARY).small());
                }
            });
        });

    if let Some(action) = &action {
        log::debug!("Sidebar action: {:?}", action);
    }
    action
}
