use std::collections::{HashMap, HashSet};

use anyhow::Result;
use eframe::egui::TextureHandle;
use log::{debug, error, info};

use crate::models::Post;

/// Each load request carries a generation; only the response to the most
/// recent request is applied.
#[derive(Default)]
pub struct ListingState {
    pub posts: Vec<Post>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub generation: u64,
}

impl ListingState {
    pub fn begin_load(&mut self, generation: u64) {
        self.generation = generation;
        self.is_loading = true;
        self.error = None;
    }

    /// Returns false when the response belongs to an older request.
    pub fn finish_load(&mut self, generation: u64, result: Result<Vec<Post>>) -> bool {
        if generation != self.generation {
            debug!("dropping stale post list (generation {generation})");
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(posts) => {
                info!("loaded {} posts", posts.len());
                self.posts = posts;
                self.error = None;
            }
            Err(err) => {
                error!("failed to load posts: {err:#}");
                self.error = Some(format!("{err:#}"));
            }
        }
        true
    }
}

pub struct DetailState {
    pub post_id: String,
    pub post: Option<Post>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub generation: u64,
}

impl DetailState {
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            post: None,
            is_loading: false,
            error: None,
            generation: 0,
        }
    }

    pub fn begin_load(&mut self, generation: u64) {
        self.generation = generation;
        self.is_loading = true;
        self.error = None;
    }

    pub fn finish_load(&mut self, post_id: &str, generation: u64, result: Result<Post>) -> bool {
        if post_id != self.post_id || generation != self.generation {
            debug!("dropping stale response for post {post_id} (generation {generation})");
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(post) => {
                self.post = Some(post);
                self.error = None;
            }
            Err(err) => {
                error!("failed to load post {post_id}: {err:#}");
                self.error = Some(format!("{err:#}"));
            }
        }
        true
    }
}

pub enum ViewState {
    Posts(ListingState),
    Post(DetailState),
}

#[derive(Default)]
pub struct SessionState {
    pub loading: bool,
    pub error: Option<String>,
}

pub struct LoadedImage {
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

/// Avatar textures keyed by resolved URL.
#[derive(Default)]
pub struct AvatarCache {
    pub textures: HashMap<String, TextureHandle>,
    pub loading: HashSet<String>,
    pub pending: HashMap<String, LoadedImage>,
    pub failed: HashSet<String>,
}
