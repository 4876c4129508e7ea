use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use eframe::egui::{self, Context, TextureHandle};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, PostApi};
use crate::config::{CardVariant, FrontendConfig, DEFAULT_API_URL};
use crate::models::{Post, Session};
use crate::router::{AppRouter, NavCommand, Route, Router};

pub(crate) mod messages;
pub mod post_card;
mod state;
pub(crate) mod tasks;
mod ui;

use messages::AppMessage;
use post_card::{
    any_confirm_open, DeleteDialogAction, PostCardAction, PostCardCapabilities, PostCardState,
};
use state::{AvatarCache, DetailState, ListingState, SessionState, ViewState};

const SETTINGS_KEY: &str = "feed_frontend_settings";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSettings {
    api_url: String,
    card_variant: CardVariant,
}

pub struct FeedApp {
    api: ApiClient,
    post_api: Arc<dyn PostApi>,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    session: Option<Session>,
    session_state: SessionState,
    router: AppRouter,
    view: ViewState,
    cards: HashMap<String, PostCardState>,
    card_variant: CardVariant,
    avatars: AvatarCache,
    base_url_input: String,
    info_banner: Option<String>,
    load_generation: u64,
}

impl FeedApp {
    pub fn new(cc: &eframe::CreationContext<'_>, mut config: FrontendConfig) -> Self {
        if let Some(storage) = cc.storage {
            if let Some(saved) = eframe::get_value::<PersistedSettings>(storage, SETTINGS_KEY) {
                config.apply_saved(saved.api_url, saved.card_variant);
            }
        }
        Self::from_config(config)
    }

    pub fn from_config(config: FrontendConfig) -> Self {
        let (api, info_banner) = build_api_client(&config);
        let (tx, rx) = mpsc::channel();

        let mut app = Self {
            post_api: Arc::new(api.clone()),
            base_url_input: api.base_url().to_string(),
            api,
            tx,
            rx,
            session: None,
            session_state: SessionState::default(),
            router: AppRouter::new(config.start_route.clone()),
            view: ViewState::Posts(ListingState::default()),
            cards: HashMap::new(),
            card_variant: config.card_variant,
            avatars: AvatarCache::default(),
            info_banner,
            load_generation: 0,
        };
        app.spawn_load_session();
        app.show_route(config.start_route);
        app
    }

    pub(crate) fn capabilities(&self) -> PostCardCapabilities {
        self.card_variant.into()
    }

    fn spawn_load_session(&mut self) {
        if !self.api.has_session_token() {
            self.session = None;
            return;
        }
        self.session_state.loading = true;
        self.session_state.error = None;
        tasks::load_session(self.api.clone(), self.tx.clone());
    }

    /// Switches the central view to `route` and starts loading its data.
    fn show_route(&mut self, route: Route) {
        self.view = match &route {
            Route::Posts => ViewState::Posts(ListingState::default()),
            Route::Post(id) => ViewState::Post(DetailState::new(id.clone())),
        };
        self.reload_view();
    }

    /// Re-fetches the current view's data, keeping whatever is on screen
    /// until the new data arrives.
    fn reload_view(&mut self) {
        self.load_generation += 1;
        let generation = self.load_generation;
        match &mut self.view {
            ViewState::Posts(listing) => {
                listing.begin_load(generation);
                tasks::load_posts(self.api.clone(), self.tx.clone(), generation);
            }
            ViewState::Post(detail) => {
                detail.begin_load(generation);
                let post_id = detail.post_id.clone();
                tasks::load_post(self.api.clone(), self.tx.clone(), post_id, generation);
            }
        }
    }

    fn apply_navigation(&mut self) {
        while let Some(command) = self.router.next_command() {
            match command {
                NavCommand::Refresh => {
                    info!("refreshing {}", self.router.current());
                    self.reload_view();
                }
                NavCommand::Push(route) => self.show_route(route),
            }
        }
    }

    fn handle_card_action(&mut self, post: &Post, action: PostCardAction) {
        let capabilities = self.capabilities();
        let session = self.session.as_ref();
        let card = self.cards.entry(post.id.clone()).or_default();
        match action {
            PostCardAction::Like => {
                if card.request_like(capabilities, session) {
                    tasks::add_like(self.post_api.clone(), self.tx.clone(), post.id.clone());
                }
            }
            PostCardAction::OpenDelete => {
                card.open_delete_confirm(capabilities, post, session);
            }
            PostCardAction::OpenDetail => {
                self.router.push(&Route::Post(post.id.clone()).path());
            }
        }
    }

    fn render_delete_dialogs(&mut self, ctx: &Context) {
        let mut actions = Vec::new();
        for (post_id, card) in self.cards.iter().filter(|(_, card)| card.confirm_open) {
            if let Some(action) = ui::post_card::render_delete_dialog(ctx, post_id, card) {
                actions.push((post_id.clone(), action));
            }
        }
        for (post_id, action) in actions {
            let Some(card) = self.cards.get_mut(&post_id) else {
                continue;
            };
            match action {
                DeleteDialogAction::Cancel => card.close_delete_confirm(),
                DeleteDialogAction::Confirm => {
                    if card.request_delete() {
                        tasks::delete_post(self.post_api.clone(), self.tx.clone(), post_id);
                    }
                }
            }
        }
    }

    /// Returns the avatar texture for `reference`, starting a download the
    /// first time a URL is seen.
    pub(crate) fn avatar_texture(&mut self, ctx: &Context, reference: &str) -> Option<TextureHandle> {
        if reference.trim().is_empty() {
            return None;
        }
        let url = self.api.resolve_asset_url(reference);
        if let Some(texture) = self.avatars.textures.get(&url) {
            return Some(texture.clone());
        }
        if let Some(pending) = self.avatars.pending.remove(&url) {
            let image = egui::ColorImage::from_rgba_unmultiplied(pending.size, &pending.pixels);
            let texture = ctx.load_texture(&url, image, egui::TextureOptions::default());
            self.avatars.textures.insert(url, texture.clone());
            return Some(texture);
        }
        if !self.avatars.failed.contains(&url) && self.avatars.loading.insert(url.clone()) {
            tasks::download_avatar(self.api.clone(), self.tx.clone(), url);
        }
        None
    }

    fn apply_base_url(&mut self) {
        match self.api.set_base_url(self.base_url_input.clone()) {
            Ok(()) => {
                self.post_api = Arc::new(self.api.clone());
                self.base_url_input = self.api.base_url().to_string();
                self.avatars = AvatarCache::default();
                self.info_banner = Some("API URL updated".into());
                self.spawn_load_session();
                self.reload_view();
            }
            Err(err) => {
                self.info_banner = Some(format!("Failed to update URL: {err:#}"));
            }
        }
    }

    fn modal_open(&self) -> bool {
        any_confirm_open(self.cards.values())
    }

    fn render_top_bar(&mut self, ctx: &Context) {
        let enabled = !self.modal_open();
        egui::TopBottomPanel::top("top_controls").show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                self.render_controls(ui);
            });

            if let Some(err) = &self.session_state.error {
                ui.colored_label(egui::Color32::LIGHT_RED, format!("Session unavailable: {err}"));
            }

            if let Some(message) = self.info_banner.clone() {
                let mut dismiss = false;
                egui::Frame::group(ui.style())
                    .fill(ui.visuals().extreme_bg_color)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(message.as_str());
                            if ui.add_enabled(enabled, egui::Button::new("Dismiss")).clicked() {
                                dismiss = true;
                            }
                        });
                    });
                if dismiss {
                    self.info_banner = None;
                }
            }
        });
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("API Base URL");
            ui.text_edit_singleline(&mut self.base_url_input);
            if ui.button("Apply").clicked() {
                self.apply_base_url();
            }
            if ui.button("Refresh").clicked() {
                self.router.refresh();
            }
            ui.separator();
            ui.selectable_value(&mut self.card_variant, CardVariant::Rich, "Rich cards");
            ui.selectable_value(&mut self.card_variant, CardVariant::Reduced, "Reduced cards");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if self.session_state.loading {
                    ui.spinner();
                } else {
                    ui.label(viewer_label(self.session.as_ref()));
                }
            });
        });
    }
}

impl eframe::App for FeedApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        messages::process_messages(self);
        self.apply_navigation();

        let modal_open = self.modal_open();
        self.render_top_bar(ctx);

        let outcome = egui::CentralPanel::default()
            .show(ctx, |ui| {
                ui.add_enabled_ui(!modal_open, |ui| self.render_feed(ui))
                    .inner
            })
            .inner;

        // Anything the disabled background still reported is ignored while
        // a confirmation is up.
        if !modal_open {
            if outcome.retry {
                self.reload_view();
            }
            if outcome.back {
                self.router.push(crate::router::POSTS_PATH);
            }
            for (post, action) in outcome.card_actions {
                self.handle_card_action(&post, action);
            }
        }
        self.render_delete_dialogs(ctx);

        // Worker threads report through the channel; keep polling while busy.
        if self.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            api_url: self.api.base_url().to_string(),
            card_variant: self.card_variant,
        };
        eframe::set_value(storage, SETTINGS_KEY, &settings);
    }
}

impl FeedApp {
    fn is_busy(&self) -> bool {
        let view_loading = match &self.view {
            ViewState::Posts(listing) => listing.is_loading,
            ViewState::Post(detail) => detail.is_loading,
        };
        view_loading
            || self.session_state.loading
            || self.router.has_pending()
            || !self.avatars.loading.is_empty()
            || self
                .cards
                .values()
                .any(|card| card.like_loading || card.delete_loading)
    }
}

/// Builds the client from `config`. A bad session token costs the session,
/// not the configured URL; the returned message is shown in the banner.
fn build_api_client(config: &FrontendConfig) -> (ApiClient, Option<String>) {
    let timeout = config.request_timeout;
    match ApiClient::with_options(config.api_url.clone(), config.session_token.clone(), timeout) {
        Ok(api) => (api, None),
        Err(err) => {
            error!("failed to initialise API client: {err:#}");
            let banner = format!("Continuing without a session: {err:#}");
            match ApiClient::with_options(config.api_url.clone(), None, timeout) {
                Ok(api) => (api, Some(banner)),
                Err(err) => {
                    error!("configured API URL unusable, using {DEFAULT_API_URL}: {err:#}");
                    let api = ApiClient::with_options(DEFAULT_API_URL, None, timeout)
                        .unwrap_or_else(|_| unreachable!("default API URL is valid"));
                    (api, Some(format!("Invalid API URL: {err:#}")))
                }
            }
        }
    }
}

fn viewer_label(session: Option<&Session>) -> String {
    match session {
        Some(session) => {
            let name = session
                .user
                .name
                .as_deref()
                .or(session.user.email.as_deref())
                .unwrap_or(session.user_id());
            format!("Signed in as {name}")
        }
        None => "Anonymous".to_string(),
    }
}

pub(crate) fn format_date(ts: &str) -> String {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Utc).format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| ts.to_string())
}
