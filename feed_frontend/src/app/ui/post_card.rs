use eframe::egui::{self, Align2, Color32, Context, RichText, Stroke, TextureHandle, Ui};

use crate::models::{Post, Session};

use super::super::format_date;
use super::super::post_card::{
    CardLayout, DeleteDialogAction, PostCardAction, PostCardCapabilities, PostCardState,
};
use super::icons;

const AVATAR_SIZE: f32 = 40.0;
const AUTHOR_RING: Color32 = Color32::from_rgb(0x78, 0x28, 0xC8);

pub struct CardView<'a> {
    pub post: &'a Post,
    pub state: &'a PostCardState,
    pub capabilities: PostCardCapabilities,
    pub session: Option<&'a Session>,
    pub avatar: Option<&'a TextureHandle>,
}

pub fn render_post_card(ui: &mut Ui, view: CardView<'_>) -> Option<PostCardAction> {
    let CardView {
        post,
        state,
        capabilities,
        session,
        avatar,
    } = view;
    let layout = CardLayout::new(post, session, capabilities);
    let mut action = None;

    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::vec2(12.0, 8.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                render_avatar(ui, post, avatar, layout.highlight_avatar);
                ui.add_space(6.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(&post.name).strong());
                    ui.label(RichText::new(format_date(&post.created_at)).weak());
                });
            });

            ui.add_space(6.0);
            ui.label(post.content.as_str());
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                let comments = RichText::new(layout.comment_label.as_str()).weak();
                if layout.comment_link {
                    if ui.link(comments).clicked() {
                        action = Some(PostCardAction::OpenDetail);
                    }
                } else {
                    ui.label(comments);
                }
                ui.add_space(8.0);

                if layout.heart_interactive && state.like_loading {
                    ui.add(
                        egui::Spinner::new()
                            .size(icons::ICON_SIZE)
                            .color(icons::LIKED_COLOR),
                    );
                } else {
                    let clicked = icons::heart(ui, layout.liked, layout.heart_interactive).clicked();
                    if clicked && layout.can_like {
                        action = Some(PostCardAction::Like);
                    }
                }
                ui.label(
                    RichText::new(layout.like_count.to_string())
                        .color(icons::like_count_color(layout.liked)),
                );

                if layout.show_delete {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if icons::trash(ui).clicked() {
                            action = Some(PostCardAction::OpenDelete);
                        }
                    });
                }
            });
        });
    ui.add_space(10.0);

    action
}

fn render_avatar(ui: &mut Ui, post: &Post, texture: Option<&TextureHandle>, highlight: bool) {
    let rect = if let Some(texture) = texture {
        ui.add(
            egui::Image::from_texture(texture)
                .fit_to_exact_size(egui::vec2(AVATAR_SIZE, AVATAR_SIZE))
                .rounding(AVATAR_SIZE / 2.0),
        )
        .rect
    } else {
        let (rect, _) =
            ui.allocate_exact_size(egui::vec2(AVATAR_SIZE, AVATAR_SIZE), egui::Sense::hover());
        let painter = ui.painter();
        painter.circle_filled(rect.center(), AVATAR_SIZE / 2.0, ui.visuals().faint_bg_color);
        let initial = post
            .name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default();
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            initial,
            egui::FontId::proportional(18.0),
            ui.visuals().text_color(),
        );
        rect
    };

    if highlight {
        ui.painter().circle_stroke(
            rect.center(),
            AVATAR_SIZE / 2.0 + 2.0,
            Stroke::new(2.0, AUTHOR_RING),
        );
    }
}

/// Confirmation modal for deleting `post_id`. Only call while it is open;
/// the caller keeps the rest of the UI disabled meanwhile.
pub fn render_delete_dialog(
    ctx: &Context,
    post_id: &str,
    state: &PostCardState,
) -> Option<DeleteDialogAction> {
    let mut open = true;
    let mut action = None;

    egui::Window::new("Delete post")
        .id(egui::Id::new(("delete-post", post_id)))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.label(RichText::new("Are you sure you want to delete this post?").size(18.0));
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    action = Some(DeleteDialogAction::Cancel);
                }
                if state.delete_loading {
                    ui.add(egui::Spinner::new());
                } else if ui
                    .button(RichText::new("Delete").color(icons::LIKED_COLOR))
                    .clicked()
                {
                    action = Some(DeleteDialogAction::Confirm);
                }
            });
        });

    if !open {
        action = Some(DeleteDialogAction::Cancel);
    }
    action
}
