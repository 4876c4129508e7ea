use eframe::egui::{self, Color32, RichText};

use crate::models::{Comment, Post};

use super::super::post_card::PostCardAction;
use super::super::state::ViewState;
use super::super::{format_date, FeedApp};
use super::post_card::{render_post_card, CardView};

#[derive(Default)]
pub struct FeedOutcome {
    pub retry: bool,
    pub back: bool,
    pub card_actions: Vec<(Post, PostCardAction)>,
}

impl FeedApp {
    pub(crate) fn render_feed(&mut self, ui: &mut egui::Ui) -> FeedOutcome {
        match self.view {
            ViewState::Posts(_) => self.render_listing(ui),
            ViewState::Post(_) => self.render_detail(ui),
        }
    }

    fn render_listing(&mut self, ui: &mut egui::Ui) -> FeedOutcome {
        let mut outcome = FeedOutcome::default();
        let ViewState::Posts(listing) = &self.view else {
            return outcome;
        };

        ui.heading("Posts");
        ui.add_space(8.0);

        if listing.is_loading && listing.posts.is_empty() {
            ui.add(egui::Spinner::new());
            return outcome;
        }
        if let Some(err) = &listing.error {
            ui.colored_label(Color32::LIGHT_RED, err);
            if ui.button("Retry").clicked() {
                outcome.retry = true;
            }
            return outcome;
        }
        if listing.posts.is_empty() {
            ui.label("No posts yet.");
            return outcome;
        }

        let posts = listing.posts.clone();
        egui::ScrollArea::vertical()
            .id_source("feed-posts")
            .show(ui, |ui| {
                for post in &posts {
                    if let Some(action) = self.render_card(ui, post) {
                        outcome.card_actions.push((post.clone(), action));
                    }
                }
            });
        outcome
    }

    fn render_detail(&mut self, ui: &mut egui::Ui) -> FeedOutcome {
        let mut outcome = FeedOutcome::default();
        let ViewState::Post(detail) = &self.view else {
            return outcome;
        };

        if ui.button("← Back to posts").clicked() {
            outcome.back = true;
        }
        ui.add_space(8.0);

        if let Some(err) = &detail.error {
            ui.colored_label(Color32::LIGHT_RED, err);
            if ui.button("Retry").clicked() {
                outcome.retry = true;
            }
            return outcome;
        }
        let Some(post) = detail.post.clone() else {
            ui.add(egui::Spinner::new());
            return outcome;
        };

        egui::ScrollArea::vertical()
            .id_source("post-detail")
            .show(ui, |ui| {
                if let Some(action) = self.render_card(ui, &post) {
                    outcome.card_actions.push((post.clone(), action));
                }
                ui.separator();
                ui.label(RichText::new("Comments").strong());
                if post.comments.is_empty() {
                    ui.label(RichText::new("No comments yet.").weak());
                }
                for comment in &post.comments {
                    render_comment(ui, comment);
                }
            });
        outcome
    }

    fn render_card(&mut self, ui: &mut egui::Ui, post: &Post) -> Option<PostCardAction> {
        let avatar = self.avatar_texture(ui.ctx(), &post.avatar);
        let state = self.cards.get(&post.id).cloned().unwrap_or_default();
        render_post_card(
            ui,
            CardView {
                post,
                state: &state,
                capabilities: self.capabilities(),
                session: self.session.as_ref(),
                avatar: avatar.as_ref(),
            },
        )
    }
}

fn render_comment(ui: &mut egui::Ui, comment: &Comment) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::vec2(10.0, 6.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(&comment.user.name).strong());
                ui.label(RichText::new(format_date(&comment.created_at)).weak());
            });
            ui.label(comment.content.as_str());
        });
    ui.add_space(4.0);
}
