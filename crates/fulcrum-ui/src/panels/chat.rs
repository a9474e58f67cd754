//! Chat panel — greeting, message thread and composer.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use fulcrum_types::message::Role;
use crate::state::{ChatEntry, UiState, STATUS_READY};
use crate::theme::*;

/// Render the chat panel. Returns Some(message) when user submits input.
pub fn chat_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<String> {
    let mut submitted = None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                // Header
                ui.horizontal(|ui| {
                    if ui
                        .button(RichText::new("☰").color(TEXT_SECONDARY))
                        .on_hover_text("Toggle sidebar")
                        .clicked()
                    {
                        state.show_sidebar = !state.show_sidebar;
                    }
                    ui.heading(RichText::new("Fulcrum").color(TEXT_PRIMARY).strong());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let status_color = if state.is_sending {
                            WARNING
                        } else if state.status_text == STATUS_READY {
                            SUCCESS
                        } else {
                            ERROR
                        };
                        ui.label(
                            RichText::new(&state.status_text)
                                .color(status_color)
                                .small(),
                        );
                    });
                });

                ui.separator();

                // Messages area
                let available_height = ui.available_height() - 60.0;
                ScrollArea::vertical()
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        ui.set_max_width(THREAD_MAX_WIDTH.min(ui.available_width()));
                        if state.shows_greeting() {
                            greeting(ui);
                        }
                        for entry in &state.messages {
                            render_message(ui, entry);
                            ui.add_space(4.0);
                        }
                        if state.is_sending {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label(RichText::new("Thinking...").color(TEXT_SECONDARY).italics());
                            });
                        }
                    });

                ui.add_space(8.0);

                // Composer; locked while a reply is pending
                ui.horizontal(|ui| {
                    let input = egui::TextEdit::singleline(&mut state.input_text)
                        .hint_text("Send a message...")
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::proportional(14.0));

                    let response = ui.add_enabled(!state.is_sending, input);

                    let send_enabled = !state.input_text.trim().is_empty() && !state.is_sending;
                    let send_btn = ui.add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                            .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    // Submit on Enter or button click
                    let entered =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if entered || send_btn.clicked() {
                        submitted = state.take_input();
                        response.request_focus();
                    }
                });
            });
        });

    submitted
}

fn greeting(ui: &mut egui::Ui) {
    ui.add_space(48.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("Hello there!").color(TEXT_PRIMARY).size(26.0).strong());
        ui.label(
            RichText::new("How can I help you today?")
                .color(TEXT_SECONDARY)
                .size(20.0),
        );
    });
    ui.add_space(24.0);
}

fn render_message(ui: &mut egui::Ui, entry: &ChatEntry) {
    let (label, label_color, bg) = match (entry.role, entry.is_error) {
        (Role::User, _) => ("You", ACCENT, BG_SECONDARY),
        (Role::Assistant, false) => ("Assistant", SUCCESS, BG_SURFACE),
        (Role::Assistant, true) => ("Assistant", ERROR, BG_ERROR),
    };

    egui::Frame::default()
        .fill(bg)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(label).color(label_color).strong().small());
            ui.label(RichText::new(&entry.content).color(TEXT_PRIMARY));
        });
}
