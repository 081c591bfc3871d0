//! egui widgets for the page: music controls and the computer-screen overlay.
//!
//! Widgets read the page state and return the commands the user issued.

use egui::{Align2, Color32, Context, RichText, Stroke};
use roomview_audio::{ButtonLook, MediaTrack};
use roomview_control::CursorIcon;
use roomview_input::UiCommand;

use crate::page::PageState;

const NEON: Color32 = Color32::from_rgb(0x00, 0xf3, 0xff);

/// Draw every page widget and collect the commands issued this frame.
pub fn draw<M: MediaTrack>(ctx: &Context, page: &PageState<M>) -> Vec<UiCommand> {
    let mut commands = Vec::new();
    music_panel(ctx, page, &mut commands);
    if page.overlay.is_visible() {
        overlay_window(ctx, &mut commands);
    }
    // Over a widget, egui picks the cursor itself.
    if !ctx.is_pointer_over_area() {
        ctx.set_cursor_icon(egui_cursor(page.cursor));
    }
    commands
}

pub fn egui_cursor(cursor: CursorIcon) -> egui::CursorIcon {
    match cursor {
        CursorIcon::Default => egui::CursorIcon::Default,
        CursorIcon::Pointer => egui::CursorIcon::PointingHand,
    }
}

fn button_text(look: ButtonLook) -> RichText {
    let [r, g, b] = look.color;
    let text = RichText::new(look.label)
        .monospace()
        .strong()
        .color(Color32::from_rgb(r, g, b));
    if look.glow {
        text.background_color(Color32::from_black_alpha(160))
    } else {
        text
    }
}

fn music_panel<M: MediaTrack>(ctx: &Context, page: &PageState<M>, commands: &mut Vec<UiCommand>) {
    egui::Area::new(egui::Id::new("music_panel"))
        .anchor(Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    let look = page.music.button();
                    let mut button = egui::Button::new(button_text(look));
                    if look.glow {
                        button = button.stroke(Stroke::new(1.0, NEON));
                    }
                    if ui.add(button).clicked() {
                        commands.push(UiCommand::ToggleMusic);
                    }

                    let mut volume = page.music.volume();
                    let slider = egui::Slider::new(&mut volume, 0.0..=1.0)
                        .show_value(false)
                        .text("VOL");
                    if ui.add(slider).changed() {
                        commands.push(UiCommand::SetVolume(volume));
                    }
                });
            });
        });
}

fn overlay_window(ctx: &Context, commands: &mut Vec<UiCommand>) {
    egui::Window::new("computer_screen")
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([520.0, 320.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("GAMER PC").monospace().strong().color(NEON));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("X").clicked() {
                        commands.push(UiCommand::CloseOverlay);
                    }
                });
            });
            ui.separator();
            ui.label("SYSTEM ONLINE");
            ui.label("WASD: move | Drag: orbit camera | Wheel: zoom");
            ui.add_space(8.0);
            if ui.button("CLOSE").clicked() {
                commands.push(UiCommand::CloseOverlay);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomview_audio::SilentTrack;

    fn run_frame(page: &PageState<SilentTrack>) -> Vec<UiCommand> {
        let ctx = Context::default();
        let mut commands = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            commands = draw(ctx, page);
        });
        commands
    }

    #[test]
    fn idle_frame_issues_no_commands() {
        let page = PageState::new(SilentTrack::new());
        assert!(run_frame(&page).is_empty());
    }

    #[test]
    fn overlay_frame_draws_without_commands() {
        let mut page = PageState::new(SilentTrack::new());
        page.dispatch(UiCommand::OpenOverlay);
        assert!(run_frame(&page).is_empty());
    }

    #[test]
    fn cursor_mapping() {
        assert_eq!(
            egui_cursor(CursorIcon::Pointer),
            egui::CursorIcon::PointingHand
        );
        assert_eq!(egui_cursor(CursorIcon::Default), egui::CursorIcon::Default);
    }
}
