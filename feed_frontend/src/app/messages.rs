use log::{info, warn};

use crate::models::{Post, Session};

use super::state::{LoadedImage, ViewState};
use super::FeedApp;

pub enum AppMessage {
    PostsLoaded {
        generation: u64,
        result: Result<Vec<Post>, anyhow::Error>,
    },
    PostLoaded {
        post_id: String,
        generation: u64,
        result: Result<Post, anyhow::Error>,
    },
    SessionLoaded(Result<Option<Session>, anyhow::Error>),
    LikeFinished {
        post_id: String,
        result: Result<(), anyhow::Error>,
    },
    DeleteFinished {
        post_id: String,
        result: Result<(), anyhow::Error>,
    },
    AvatarLoaded {
        url: String,
        result: Result<LoadedImage, String>,
    },
}

pub(super) fn process_messages(app: &mut FeedApp) {
    while let Ok(message) = app.rx.try_recv() {
        match message {
            AppMessage::PostsLoaded { generation, result } => {
                if let ViewState::Posts(listing) = &mut app.view {
                    listing.finish_load(generation, result);
                }
            }
            AppMessage::PostLoaded {
                post_id,
                generation,
                result,
            } => {
                if let ViewState::Post(detail) = &mut app.view {
                    detail.finish_load(&post_id, generation, result);
                }
            }
            AppMessage::SessionLoaded(result) => {
                app.session_state.loading = false;
                match result {
                    Ok(session) => {
                        match &session {
                            Some(session) => info!("signed in as {}", session.user_id()),
                            None => info!("session token not accepted, browsing anonymously"),
                        }
                        app.session = session;
                        app.session_state.error = None;
                    }
                    Err(err) => {
                        warn!("failed to load session: {err:#}");
                        app.session = None;
                        app.session_state.error = Some(format!("{err:#}"));
                    }
                }
            }
            AppMessage::LikeFinished { post_id, result } => {
                let card = app.cards.entry(post_id.clone()).or_default();
                card.finish_like(&post_id, &result, &mut app.router);
            }
            AppMessage::DeleteFinished { post_id, result } => {
                let card = app.cards.entry(post_id.clone()).or_default();
                card.finish_delete(&post_id, &result, &mut app.router);
                if result.is_ok() {
                    app.cards.remove(&post_id);
                }
            }
            AppMessage::AvatarLoaded { url, result } => {
                app.avatars.loading.remove(&url);
                match result {
                    Ok(image) => {
                        app.avatars.pending.insert(url, image);
                    }
                    Err(err) => {
                        warn!("avatar {url} unavailable: {err}");
                        app.avatars.failed.insert(url);
                    }
                }
            }
        }
    }
}
