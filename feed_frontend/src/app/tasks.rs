use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use log::error;

use crate::api::{ApiClient, PostApi};

use super::messages::AppMessage;
use super::state::LoadedImage;

pub fn load_posts(client: ApiClient, tx: Sender<AppMessage>, generation: u64) {
    thread::spawn(move || {
        let result = client.list_posts();
        if tx
            .send(AppMessage::PostsLoaded { generation, result })
            .is_err()
        {
            error!("failed to send PostsLoaded message");
        }
    });
}

pub fn load_post(client: ApiClient, tx: Sender<AppMessage>, post_id: String, generation: u64) {
    thread::spawn(move || {
        let result = client.get_post(&post_id);
        let message = AppMessage::PostLoaded {
            post_id,
            generation,
            result,
        };
        if tx.send(message).is_err() {
            error!("failed to send PostLoaded message");
        }
    });
}

pub fn load_session(client: ApiClient, tx: Sender<AppMessage>) {
    thread::spawn(move || {
        let result = client.get_session();
        if tx.send(AppMessage::SessionLoaded(result)).is_err() {
            error!("failed to send SessionLoaded message");
        }
    });
}

pub fn add_like(api: Arc<dyn PostApi>, tx: Sender<AppMessage>, post_id: String) {
    thread::spawn(move || {
        let result = api.add_like(&post_id);
        if tx.send(AppMessage::LikeFinished { post_id, result }).is_err() {
            error!("failed to send LikeFinished message");
        }
    });
}

pub fn delete_post(api: Arc<dyn PostApi>, tx: Sender<AppMessage>, post_id: String) {
    thread::spawn(move || {
        let result = api.delete_post(&post_id);
        if tx.send(AppMessage::DeleteFinished { post_id, result }).is_err() {
            error!("failed to send DeleteFinished message");
        }
    });
}

pub fn download_avatar(client: ApiClient, tx: Sender<AppMessage>, url: String) {
    thread::spawn(move || {
        log::info!("Downloading avatar from URL: {}", url);

        let result: Result<LoadedImage, String> = (|| {
            let bytes = client.fetch_bytes(&url).map_err(|e| format!("{e:#}"))?;
            let dyn_img =
                image::load_from_memory(&bytes).map_err(|e| format!("Image decode error: {}", e))?;
            let rgba = dyn_img.to_rgba8();
            let size = [dyn_img.width() as usize, dyn_img.height() as usize];
            Ok(LoadedImage {
                size,
                pixels: rgba.as_flat_samples().as_slice().to_vec(),
            })
        })();

        if tx.send(AppMessage::AvatarLoaded { url, result }).is_err() {
            error!("failed to send AvatarLoaded message");
        }
    });
}
